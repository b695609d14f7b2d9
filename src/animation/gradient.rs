use crate::foundation::error::{SfxError, SfxResult};
use crate::foundation::math::lerp;

/// Alpha stop of a [`Gradient`]. Color stops are not carried: the track has no color channel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlphaKey {
    /// Normalized lifetime position (0..=1).
    pub time: f32,
    /// Opacity (0..=1).
    pub alpha: f32,
}

impl AlphaKey {
    /// Alpha stop at `time`.
    pub fn new(time: f32, alpha: f32) -> Self {
        Self { time, alpha }
    }
}

/// Interpolation between alpha keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMode {
    /// Linear blend between neighbouring keys.
    #[default]
    Blend,
    /// Hold each key until the next one.
    Fixed,
}

/// Color-over-lifetime gradient, reduced to its alpha stops.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gradient {
    /// Interpolation mode.
    #[serde(default)]
    pub mode: GradientMode,
    /// Stops sorted by time.
    pub alpha_keys: Vec<AlphaKey>,
}

impl Gradient {
    /// Blended gradient over `alpha_keys`.
    pub fn blend(alpha_keys: Vec<AlphaKey>) -> Self {
        Self {
            mode: GradientMode::Blend,
            alpha_keys,
        }
    }

    /// Stops must be sorted and finite.
    pub fn validate(&self) -> SfxResult<()> {
        if !self.alpha_keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(SfxError::validation(
                "gradient alpha keys must be sorted by time",
            ));
        }
        if self
            .alpha_keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.alpha.is_finite())
        {
            return Err(SfxError::validation("gradient alpha keys must be finite"));
        }
        Ok(())
    }

    /// Alpha at lifetime fraction `t`. A gradient without keys is fully opaque.
    pub fn alpha_at(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.alpha_keys.first(), self.alpha_keys.last()) else {
            return 1.0;
        };
        if t <= first.time {
            return first.alpha;
        }
        if t >= last.time {
            return last.alpha;
        }

        let idx = self.alpha_keys.partition_point(|k| k.time <= t);
        let a = &self.alpha_keys[idx - 1];
        let b = &self.alpha_keys[idx];
        match self.mode {
            GradientMode::Fixed => a.alpha,
            GradientMode::Blend => {
                let span = b.time - a.time;
                if span <= 0.0 {
                    return a.alpha;
                }
                lerp(a.alpha, b.alpha, (t - a.time) / span)
            }
        }
    }
}
