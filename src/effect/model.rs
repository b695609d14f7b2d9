use std::path::Path;

use anyhow::Context as _;

use crate::{
    animation::{curve::MinMaxCurve, gradient::Gradient},
    foundation::core::{FRAMES_PER_SECOND, Vec3},
    foundation::error::{SfxError, SfxResult},
};

/// Most part records one emitter may expand into (the part itself plus its particle copies).
pub const MAX_PART_RECORDS: u64 = u16::MAX as u64;

/// A composite effect: the root emitter followed by its children, each becoming one or more part
/// records in the exported track.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Effect {
    /// Effect name, also the output file stem.
    pub name: String,
    /// Root emitter first, then its children.
    pub parts: Vec<EffectPart>,
}

impl Effect {
    /// Parse an effect from its JSON description.
    pub fn from_json_str(s: &str) -> SfxResult<Self> {
        serde_json::from_str(s).map_err(|e| SfxError::serde(format!("parse effect JSON: {e}")))
    }

    /// Read and parse an effect JSON file.
    pub fn from_path(path: &Path) -> SfxResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read effect '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Effect-level checks. Parts are validated one by one during export.
    pub fn validate(&self) -> SfxResult<()> {
        if self.name.trim().is_empty() {
            return Err(SfxError::validation("effect name must be non-empty"));
        }
        if self.name.contains(['/', '\\']) || self.name == "." || self.name == ".." {
            return Err(SfxError::validation(format!(
                "effect name '{}' cannot be used as a file name",
                self.name
            )));
        }
        if self.parts.is_empty() {
            return Err(SfxError::validation(format!(
                "effect '{}' has no parts",
                self.name
            )));
        }
        Ok(())
    }
}

/// One emitter.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EffectPart {
    /// Part name written into each record.
    pub name: String,
    /// Emitter duration in seconds; must equal `start_lifetime`.
    pub duration: f32,
    /// Particle lifetime in seconds.
    pub start_lifetime: f32,
    /// Base size multiplied into every scale sample.
    pub start_size: f32,
    /// Must be zero: linear motion comes from the velocity module only.
    #[serde(default)]
    pub start_speed: f32,
    /// World-space origin, added to every keyframe position.
    #[serde(default)]
    pub position: Vec3,
    /// Emission module.
    #[serde(default)]
    pub emission: Emission,
    /// Renderer module.
    pub renderer: Renderer,
    /// Size over lifetime.
    #[serde(default)]
    pub size: SizeModule,
    /// Rotation over lifetime.
    #[serde(default)]
    pub rotation: RotationModule,
    /// Noise module.
    #[serde(default)]
    pub noise: NoiseModule,
    /// Velocity over lifetime.
    #[serde(default)]
    pub velocity: VelocityModule,
    /// Color over lifetime.
    #[serde(default)]
    pub color: ColorModule,
    /// Active modules outside the converted set.
    #[serde(default)]
    pub other_modules: Vec<UnsupportedModule>,
}

impl EffectPart {
    /// Billboard part with matching duration/lifetime, unit start size and every module off.
    pub fn new(name: impl Into<String>, duration: f32, texture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration,
            start_lifetime: duration,
            start_size: 1.0,
            start_speed: 0.0,
            position: Vec3::ZERO,
            emission: Emission::default(),
            renderer: Renderer {
                enabled: true,
                render_mode: RenderMode::Billboard,
                alignment: RenderAlignment::View,
                material_mode: 0,
                texture: texture.into(),
            },
            size: SizeModule::default(),
            rotation: RotationModule::default(),
            noise: NoiseModule::default(),
            velocity: VelocityModule::default(),
            color: ColorModule::default(),
            other_modules: Vec::new(),
        }
    }

    /// Checks that must pass before any sampling happens.
    pub fn validate(&self) -> SfxResult<()> {
        let name = &self.name;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SfxError::validation(format!(
                "part '{name}': duration must be > 0 seconds"
            )));
        }
        if (self.duration - self.start_lifetime).abs() > f32::EPSILON * self.duration.max(1.0) {
            return Err(SfxError::validation(format!(
                "part '{name}': duration ({}) and start lifetime ({}) must be equal",
                self.duration, self.start_lifetime
            )));
        }
        if self.start_speed != 0.0 {
            return Err(SfxError::validation(format!(
                "part '{name}': start speed is not supported, set it to 0 and use velocity over lifetime instead"
            )));
        }
        if !self.start_size.is_finite() {
            return Err(SfxError::validation(format!(
                "part '{name}': start size must be finite"
            )));
        }
        if !self.position.is_finite() {
            return Err(SfxError::validation(format!(
                "part '{name}': position must be finite"
            )));
        }
        self.emission
            .validate()
            .map_err(|e| SfxError::validation(format!("part '{name}': {e}")))?;
        self.validate_copies()?;

        let curves = self
            .size
            .curves()
            .chain(self.rotation.curves())
            .chain(self.velocity.curves());
        for curve in curves {
            curve
                .validate()
                .map_err(|e| SfxError::validation(format!("part '{name}': {e}")))?;
        }
        self.color
            .gradient
            .validate()
            .map_err(|e| SfxError::validation(format!("part '{name}': {e}")))?;
        if !self.noise.frequency.is_finite() || !self.noise.strength.is_finite() {
            return Err(SfxError::validation(format!(
                "part '{name}': noise frequency and strength must be finite"
            )));
        }
        Ok(())
    }

    /// Rate-over-time copies must fit the record count and every shifted frame must fit `u16`.
    fn validate_copies(&self) -> SfxResult<()> {
        let name = &self.name;
        let rate = self.emission.rate_over_time;
        if !self.emission.enabled || rate <= 0.0 {
            return Ok(());
        }
        let copies = (rate * self.duration).floor();
        if !copies.is_finite() || copies >= MAX_PART_RECORDS as f32 {
            return Err(SfxError::validation(format!(
                "part '{name}': rate over time {rate} spawns too many particle copies (at most {} allowed)",
                MAX_PART_RECORDS - 1
            )));
        }
        let copies = copies as u64;
        let last_frame = self.copy_frame_offset(copies) as f32
            + (self.duration * FRAMES_PER_SECOND).floor();
        if copies > 0 && last_frame > f32::from(u16::MAX) {
            return Err(SfxError::validation(format!(
                "part '{name}': last particle copy ends at frame {last_frame}, past the u16 frame range"
            )));
        }
        Ok(())
    }

    /// Active modules the track format cannot express, in declaration order without repeats.
    pub fn unsupported_modules(&self) -> Vec<UnsupportedModule> {
        let mut out = Vec::new();
        for m in &self.other_modules {
            if !out.contains(m) {
                out.push(*m);
            }
        }
        out
    }

    /// Extra particle records spawned by rate-over-time emission.
    pub fn particle_copies(&self) -> u64 {
        let rate = self.emission.rate_over_time;
        if !self.emission.enabled || rate <= 0.0 {
            return 0;
        }
        (rate * self.duration).floor() as u64
    }

    /// Frame shift of particle copy `copy` (0 is the part itself).
    pub fn copy_frame_offset(&self, copy: u64) -> u64 {
        let rate = self.emission.rate_over_time;
        if copy == 0 || rate <= 0.0 {
            return 0;
        }
        (copy as f32 * (FRAMES_PER_SECOND / rate)).floor() as u64
    }
}

/// Emission module. Only time-zero bursts or a constant rate are accepted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Emission {
    /// Module toggle.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Particles per second.
    #[serde(default)]
    pub rate_over_time: f32,
    /// Burst list; every burst must fire at time 0.
    #[serde(default)]
    pub bursts: Vec<Burst>,
}

impl Default for Emission {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_over_time: 0.0,
            bursts: Vec::new(),
        }
    }
}

impl Emission {
    fn validate(&self) -> SfxResult<()> {
        if !self.rate_over_time.is_finite() || self.rate_over_time < 0.0 {
            return Err(SfxError::validation(
                "emission rate over time must be finite and >= 0",
            ));
        }
        if self.bursts.iter().any(|b| b.time != 0.0) {
            return Err(SfxError::validation(
                "emission bursts must fire at time 0",
            ));
        }
        if !self.bursts.is_empty() && self.rate_over_time > 0.0 {
            return Err(SfxError::validation(
                "emission cannot combine bursts with a rate over time",
            ));
        }
        Ok(())
    }
}

/// One emission burst.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Burst {
    /// Fire time in seconds.
    pub time: f32,
    /// Particles emitted.
    pub count: u32,
}

fn enabled_by_default() -> bool {
    true
}

/// Renderer module: billboard kind, blend mode and texture.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Renderer {
    /// Module toggle.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// How particles are drawn.
    #[serde(default)]
    pub render_mode: RenderMode,
    /// Billboard alignment space.
    #[serde(default)]
    pub alignment: RenderAlignment,
    /// Material blend mode index (`_Mode` shader property).
    #[serde(default)]
    pub material_mode: u32,
    /// Logical texture name, resolved to a file at export time.
    pub texture: String,
}

/// Particle render mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Camera-facing quad.
    #[default]
    Billboard,
    /// Quad stretched along velocity.
    Stretch,
    /// Quad lying flat on the ground plane.
    HorizontalBillboard,
    /// Upright quad rotating about Y.
    VerticalBillboard,
    /// Mesh particles.
    Mesh,
    /// Nothing drawn.
    None,
}

/// Space billboards are aligned in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderAlignment {
    /// Face the camera plane.
    #[default]
    View,
    /// World axes.
    World,
    /// Emitter transform.
    Local,
    /// Face the camera position.
    Facing,
    /// Follow particle velocity.
    Velocity,
}

/// Per-axis module property.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Axes3 {
    /// X axis.
    #[serde(default)]
    pub x: MinMaxCurve,
    /// Y axis.
    #[serde(default)]
    pub y: MinMaxCurve,
    /// Z axis.
    #[serde(default)]
    pub z: MinMaxCurve,
}

impl Axes3 {
    fn iter(&self) -> impl Iterator<Item = &MinMaxCurve> {
        [&self.x, &self.y, &self.z].into_iter()
    }
}

/// Size curves, shared or per axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeAxes {
    /// One curve for all three axes.
    Uniform(MinMaxCurve),
    /// Independent X/Y/Z curves.
    Separate(Axes3),
}

/// Size over lifetime.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizeModule {
    /// Module toggle.
    #[serde(default)]
    pub enabled: bool,
    /// Size multipliers.
    pub axes: SizeAxes,
}

impl Default for SizeModule {
    fn default() -> Self {
        Self {
            enabled: false,
            axes: SizeAxes::Uniform(MinMaxCurve::constant(1.0)),
        }
    }
}

impl SizeModule {
    fn curves(&self) -> impl Iterator<Item = &MinMaxCurve> {
        let v: Vec<&MinMaxCurve> = match &self.axes {
            SizeAxes::Uniform(c) => vec![c],
            SizeAxes::Separate(a) => a.iter().collect(),
        };
        v.into_iter()
    }
}

/// Rotation curves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationAxes {
    /// Z-only angular velocity in radians per second.
    AngularVelocity(MinMaxCurve),
    /// Per-axis angular velocity in radians per second.
    Separate(Axes3),
}

/// Rotation over lifetime.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RotationModule {
    /// Module toggle.
    #[serde(default)]
    pub enabled: bool,
    /// Angular velocity curves.
    pub axes: RotationAxes,
}

impl Default for RotationModule {
    fn default() -> Self {
        Self {
            enabled: false,
            axes: RotationAxes::AngularVelocity(MinMaxCurve::default()),
        }
    }
}

impl RotationModule {
    fn curves(&self) -> impl Iterator<Item = &MinMaxCurve> {
        let v: Vec<&MinMaxCurve> = match &self.axes {
            RotationAxes::AngularVelocity(c) => vec![c],
            RotationAxes::Separate(a) => a.iter().collect(),
        };
        v.into_iter()
    }
}

/// Velocity over lifetime: linear axes drive position, orbital axes drive `pos_rotation`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VelocityModule {
    /// Module toggle.
    #[serde(default)]
    pub enabled: bool,
    /// Linear velocity in units per second.
    #[serde(default)]
    pub linear: Axes3,
    /// Orbital velocity in radians per second.
    #[serde(default)]
    pub orbital: Axes3,
}

impl VelocityModule {
    fn curves(&self) -> impl Iterator<Item = &MinMaxCurve> {
        self.linear.iter().chain(self.orbital.iter())
    }
}

/// Positional noise.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NoiseModule {
    /// Module toggle.
    #[serde(default)]
    pub enabled: bool,
    /// Noise cells per second of lifetime.
    #[serde(default = "default_noise_frequency")]
    pub frequency: f32,
    /// Displacement amplitude.
    #[serde(default = "default_noise_strength")]
    pub strength: f32,
    /// Field seed.
    #[serde(default)]
    pub seed: u64,
}

fn default_noise_frequency() -> f32 {
    0.5
}

fn default_noise_strength() -> f32 {
    1.0
}

impl Default for NoiseModule {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: default_noise_frequency(),
            strength: default_noise_strength(),
            seed: 0,
        }
    }
}

/// Color over lifetime. Only the alpha channel reaches the track.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorModule {
    /// Module toggle.
    #[serde(default)]
    pub enabled: bool,
    /// Color gradient; only its alpha keys are read.
    #[serde(default)]
    pub gradient: Gradient,
}

/// Particle system modules that are reported but never exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedModule {
    /// Emitter shape.
    Shape,
    /// Limit velocity over lifetime.
    LimitVelocityOverLifetime,
    /// Inherit velocity.
    InheritVelocity,
    /// Force over lifetime.
    ForceOverLifetime,
    /// Color by speed.
    ColorBySpeed,
    /// Size by speed.
    SizeBySpeed,
    /// Rotation by speed.
    RotationBySpeed,
    /// External forces.
    ExternalForces,
    /// Collision.
    Collision,
    /// Trigger.
    Trigger,
    /// Sub emitters.
    SubEmitters,
    /// Texture sheet animation.
    TextureSheetAnimation,
    /// Lights.
    Lights,
    /// Trails.
    Trails,
    /// Custom data.
    CustomData,
}

impl UnsupportedModule {
    /// Human-readable module name used in warnings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::LimitVelocityOverLifetime => "limit velocity over lifetime",
            Self::InheritVelocity => "inherit velocity",
            Self::ForceOverLifetime => "force over lifetime",
            Self::ColorBySpeed => "color by speed",
            Self::SizeBySpeed => "size by speed",
            Self::RotationBySpeed => "rotation by speed",
            Self::ExternalForces => "external forces",
            Self::Collision => "collision",
            Self::Trigger => "trigger",
            Self::SubEmitters => "sub emitters",
            Self::TextureSheetAnimation => "texture sheet animation",
            Self::Lights => "lights",
            Self::Trails => "trails",
            Self::CustomData => "custom data",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/model.rs"]
mod tests;
