//! Per-module curve samplers.
//!
//! Each sampler is a pure function of the part description and the sampling grid and returns a
//! sparse list of `(frame, value)` samples; merging into the keyframe table happens in
//! [`crate::track::build`]. An unsupported curve mode fails the whole module before any sample is
//! produced.

use crate::{
    animation::{curve::CurveValue, noise::gradient_noise_2d},
    effect::model::{Axes3, EffectPart, RotationAxes, SizeAxes},
    foundation::core::{FrameIndex, RAD2DEG, Vec3},
    foundation::error::{SfxError, SfxResult},
};

/// Module names carried by unsupported-curve-mode errors.
pub const SIZE_MODULE: &str = "size over lifetime";
/// See [`SIZE_MODULE`].
pub const ROTATION_MODULE: &str = "rotation over lifetime";
/// See [`SIZE_MODULE`].
pub const LINEAR_VELOCITY_MODULE: &str = "velocity over lifetime (linear)";
/// See [`SIZE_MODULE`].
pub const ORBITAL_VELOCITY_MODULE: &str = "velocity over lifetime (orbital)";

/// Tunables of the curve discretization.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Lifetime subdivisions; `subdivisions + 1` points are sampled, both ends included.
    pub subdivisions: u32,
    /// Unit conversion applied to linear velocity steps.
    pub velocity_modifier: f32,
    /// Divisor turning a per-second velocity constant into a per-sample step.
    pub velocity_step_divisor: f32,
    /// Gain applied to orbital velocity curve steps.
    pub orbital_modifier: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            subdivisions: 20,
            velocity_modifier: 0.5,
            velocity_step_divisor: 6.0,
            orbital_modifier: 20.0,
        }
    }
}

impl SamplingConfig {
    /// At least one subdivision, finite modifiers and a usable step divisor.
    pub fn validate(&self) -> SfxResult<()> {
        if self.subdivisions == 0 {
            return Err(SfxError::validation("sampling subdivisions must be > 0"));
        }
        if !self.velocity_modifier.is_finite() || !self.orbital_modifier.is_finite() {
            return Err(SfxError::validation("sampling modifiers must be finite"));
        }
        if !self.velocity_step_divisor.is_finite() || self.velocity_step_divisor == 0.0 {
            return Err(SfxError::validation(
                "sampling velocity step divisor must be finite and non-zero",
            ));
        }
        Ok(())
    }
}

/// A sampled module value at one frame.
pub type Sample = (FrameIndex, Vec3);

/// Evenly spaced lifetime fractions of one part record and the frames they land on.
#[derive(Clone, Copy, Debug)]
pub struct SampleGrid {
    /// Lifetime subdivisions.
    pub subdivisions: u32,
    /// Part duration in seconds.
    pub duration: f32,
    /// Frame shift of the particle copy being sampled.
    pub frame_offset: u64,
}

impl SampleGrid {
    /// `(t, frame)` for every subdivision, `t` running from 0 to 1 inclusive.
    pub fn points(self) -> impl Iterator<Item = (f32, FrameIndex)> {
        let n = self.subdivisions as f32;
        (0..=self.subdivisions).map(move |i| {
            let t = i as f32 / n;
            (
                t,
                FrameIndex::at_fraction(t, self.duration).offset(self.frame_offset),
            )
        })
    }
}

struct ResolvedAxes<'a> {
    x: CurveValue<'a>,
    y: CurveValue<'a>,
    z: CurveValue<'a>,
}

fn resolve_axes<'a>(axes: &'a Axes3, part: &str, module: &str) -> SfxResult<ResolvedAxes<'a>> {
    Ok(ResolvedAxes {
        x: axes.x.resolve(part, module)?,
        y: axes.y.resolve(part, module)?,
        z: axes.z.resolve(part, module)?,
    })
}

/// Scale samples. A disabled module still pins every subdivision to the start size.
pub fn sample_size(part: &EffectPart, grid: SampleGrid) -> SfxResult<Vec<Sample>> {
    if !part.size.enabled {
        let scale = Vec3::splat(part.start_size);
        return Ok(grid.points().map(|(_, frame)| (frame, scale)).collect());
    }

    match &part.size.axes {
        SizeAxes::Uniform(curve) => {
            let v = curve.resolve(&part.name, SIZE_MODULE)?;
            Ok(grid
                .points()
                .map(|(t, frame)| (frame, Vec3::splat(v.at(t))))
                .collect())
        }
        SizeAxes::Separate(axes) => {
            let a = resolve_axes(axes, &part.name, SIZE_MODULE)?;
            Ok(grid
                .points()
                .map(|(t, frame)| (frame, Vec3::new(a.x.at(t), a.y.at(t), a.z.at(t))))
                .collect())
        }
    }
}

/// Rotation samples in degrees.
///
/// Per-axis constants ramp linearly from zero (`constant * t`). A negative curve value is applied
/// as is rather than ramped toward; this is a known approximation.
pub fn sample_rotation(part: &EffectPart, grid: SampleGrid) -> SfxResult<Vec<Sample>> {
    if !part.rotation.enabled {
        return Ok(Vec::new());
    }

    match &part.rotation.axes {
        RotationAxes::Separate(axes) => {
            let a = resolve_axes(axes, &part.name, ROTATION_MODULE)?;
            let axis = |v: CurveValue<'_>, t: f32| match v {
                CurveValue::Constant(c) => c * t,
                CurveValue::Curve { .. } => v.at(t) * RAD2DEG,
            };
            Ok(grid
                .points()
                .map(|(t, frame)| (frame, Vec3::new(axis(a.x, t), axis(a.y, t), axis(a.z, t))))
                .collect())
        }
        RotationAxes::AngularVelocity(curve) => {
            let v = curve.resolve(&part.name, ROTATION_MODULE)?;
            let duration = part.duration;
            Ok(grid
                .points()
                .map(|(t, frame)| {
                    let z = match v {
                        CurveValue::Constant(c) => c * t * duration * RAD2DEG,
                        CurveValue::Curve { .. } => v.at(t) * RAD2DEG,
                    };
                    (frame, Vec3::new(0.0, 0.0, z))
                })
                .collect())
        }
    }
}

/// Position displacement synthesized from gradient noise along decorrelated axis pairs.
pub fn sample_noise(part: &EffectPart, grid: SampleGrid) -> Vec<Sample> {
    let noise = &part.noise;
    if !noise.enabled {
        return Vec::new();
    }

    grid.points()
        .map(|(t, frame)| {
            let s = t * noise.frequency;
            let v = Vec3::new(
                gradient_noise_2d(s, 0.0, noise.seed),
                gradient_noise_2d(0.0, s, noise.seed),
                gradient_noise_2d(s, s, noise.seed),
            );
            (frame, v * noise.strength)
        })
        .collect()
}

/// Accumulated linear displacement; each sample carries the running sum of all steps so far.
pub fn sample_velocity(
    part: &EffectPart,
    grid: SampleGrid,
    cfg: &SamplingConfig,
) -> SfxResult<Vec<Sample>> {
    if !part.velocity.enabled {
        return Ok(Vec::new());
    }

    let a = resolve_axes(&part.velocity.linear, &part.name, LINEAR_VELOCITY_MODULE)?;
    let step = |v: CurveValue<'_>, t: f32| match v {
        CurveValue::Constant(c) => c * cfg.velocity_modifier / cfg.velocity_step_divisor,
        CurveValue::Curve { .. } => v.at(t) * cfg.velocity_modifier,
    };
    Ok(accumulate(grid, |t| {
        Vec3::new(step(a.x, t), step(a.y, t), step(a.z, t))
    }))
}

/// Accumulated orbital displacement for `pos_rotation`. Y and Z are swapped to match the track's
/// axis convention.
pub fn sample_orbital(
    part: &EffectPart,
    grid: SampleGrid,
    cfg: &SamplingConfig,
) -> SfxResult<Vec<Sample>> {
    if !part.velocity.enabled {
        return Ok(Vec::new());
    }

    let a = resolve_axes(&part.velocity.orbital, &part.name, ORBITAL_VELOCITY_MODULE)?;
    let step = |v: CurveValue<'_>, t: f32| match v {
        CurveValue::Constant(c) => c,
        CurveValue::Curve { .. } => v.at(t) * cfg.orbital_modifier,
    };
    Ok(accumulate(grid, |t| {
        Vec3::new(step(a.x, t), step(a.z, t), step(a.y, t))
    }))
}

fn accumulate(grid: SampleGrid, mut step: impl FnMut(f32) -> Vec3) -> Vec<Sample> {
    grid.points()
        .scan(Vec3::ZERO, |acc, (t, frame)| {
            *acc += step(t);
            Some((frame, *acc))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/track/sample.rs"]
mod tests;
