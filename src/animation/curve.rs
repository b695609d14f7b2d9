use crate::foundation::error::{SfxError, SfxResult};

/// One authored key of an [`AnimationCurve`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Normalized lifetime position (0..=1).
    pub time: f32,
    /// Curve value at `time`.
    pub value: f32,
    /// Slope arriving at this key. Non-finite means a step.
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key. Non-finite means a step.
    #[serde(default)]
    pub out_tangent: f32,
}

impl CurveKey {
    /// Key with flat tangents.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }
}

/// Cubic Hermite curve over normalized lifetime, clamped outside its key range.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationCurve {
    /// Keys sorted by time.
    pub keys: Vec<CurveKey>,
}

impl AnimationCurve {
    /// Single-key curve.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    /// Piecewise-linear curve through `points`; tangents are set to the segment slopes.
    pub fn linear(points: &[(f32, f32)]) -> Self {
        let mut keys: Vec<CurveKey> = points.iter().map(|&(t, v)| CurveKey::new(t, v)).collect();
        for i in 0..keys.len().saturating_sub(1) {
            let dt = keys[i + 1].time - keys[i].time;
            let slope = if dt.abs() > f32::EPSILON {
                (keys[i + 1].value - keys[i].value) / dt
            } else {
                0.0
            };
            keys[i].out_tangent = slope;
            keys[i + 1].in_tangent = slope;
        }
        Self { keys }
    }

    /// Keys must be finite and sorted by time.
    pub fn validate(&self) -> SfxResult<()> {
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(SfxError::validation("curve keys must be sorted by time"));
        }
        if self
            .keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(SfxError::validation("curve keys must be finite"));
        }
        Ok(())
    }

    /// Value at normalized `time`.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let idx = self.keys.partition_point(|k| k.time <= time);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let dt = b.time - a.time;
        if dt <= 0.0 {
            return a.value;
        }
        if !a.out_tangent.is_finite() || !b.in_tangent.is_finite() {
            return a.value;
        }

        let t = (time - a.time) / dt;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * a.value + h10 * a.out_tangent * dt + h01 * b.value + h11 * b.in_tangent * dt
    }
}

/// A module property: a constant, a curve, or one of the randomized forms the track format cannot
/// express.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MinMaxCurve {
    /// Fixed value.
    Constant {
        /// The value.
        value: f32,
    },
    /// Curve scaled by `multiplier`.
    Curve {
        /// Shape over lifetime.
        curve: AnimationCurve,
        /// Scale applied to every evaluation.
        #[serde(default = "unit_multiplier")]
        multiplier: f32,
    },
    /// Random between two constants.
    TwoConstants {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Random between two curves.
    TwoCurves {
        /// Lower curve.
        min: AnimationCurve,
        /// Upper curve.
        max: AnimationCurve,
        /// Scale applied to both curves.
        #[serde(default = "unit_multiplier")]
        multiplier: f32,
    },
}

fn unit_multiplier() -> f32 {
    1.0
}

impl Default for MinMaxCurve {
    fn default() -> Self {
        Self::Constant { value: 0.0 }
    }
}

/// A [`MinMaxCurve`] narrowed to the two modes the sampler supports.
#[derive(Clone, Copy, Debug)]
pub enum CurveValue<'a> {
    /// Fixed value.
    Constant(f32),
    /// Scaled curve.
    Curve {
        /// Shape over lifetime.
        curve: &'a AnimationCurve,
        /// Scale applied to every evaluation.
        multiplier: f32,
    },
}

impl CurveValue<'_> {
    /// Value at lifetime fraction `t`; constants ignore `t`.
    pub fn at(self, t: f32) -> f32 {
        match self {
            Self::Constant(v) => v,
            Self::Curve { curve, multiplier } => curve.evaluate(t) * multiplier,
        }
    }
}

impl MinMaxCurve {
    /// [`MinMaxCurve::Constant`] shorthand.
    pub fn constant(value: f32) -> Self {
        Self::Constant { value }
    }

    /// [`MinMaxCurve::Curve`] shorthand.
    pub fn curve(curve: AnimationCurve, multiplier: f32) -> Self {
        Self::Curve { curve, multiplier }
    }

    /// Mode name used in error messages.
    pub fn mode_label(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Curve { .. } => "curve",
            Self::TwoConstants { .. } => "two constants",
            Self::TwoCurves { .. } => "two curves",
        }
    }

    /// Narrow to a supported mode, or fail naming `part` and `module`.
    pub fn resolve(&self, part: &str, module: &str) -> SfxResult<CurveValue<'_>> {
        match self {
            Self::Constant { value } => Ok(CurveValue::Constant(*value)),
            Self::Curve { curve, multiplier } => Ok(CurveValue::Curve {
                curve,
                multiplier: *multiplier,
            }),
            Self::TwoConstants { .. } | Self::TwoCurves { .. } => Err(
                SfxError::unsupported_curve_mode(part, module, self.mode_label()),
            ),
        }
    }

    /// Constants, multipliers and curve keys must be finite.
    pub fn validate(&self) -> SfxResult<()> {
        match self {
            Self::Constant { value } if !value.is_finite() => {
                Err(SfxError::validation("curve constant must be finite"))
            }
            Self::Curve { curve, multiplier } => {
                if !multiplier.is_finite() {
                    return Err(SfxError::validation("curve multiplier must be finite"));
                }
                curve.validate()
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
