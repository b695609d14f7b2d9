use std::ops::{Add, AddAssign, Mul};

/// Output clock of the visual-effects player.
pub const FRAMES_PER_SECOND: f32 = 60.0;

/// Radians to degrees, single precision to match the stored track values.
pub const RAD2DEG: f32 = 180.0 / std::f32::consts::PI;

/// 0-based frame index on the 60 fps output clock.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Frame reached after `secs` seconds, floored.
    pub fn from_secs_floor(secs: f32) -> Self {
        Self((secs * FRAMES_PER_SECOND).floor().max(0.0) as u64)
    }

    /// Frame for lifetime fraction `t` of a part lasting `duration` seconds.
    pub fn at_fraction(t: f32, duration: f32) -> Self {
        Self::from_secs_floor(t * duration)
    }

    /// Shift forward by `by` frames.
    pub fn offset(self, by: u64) -> Self {
        Self(self.0.saturating_add(by))
    }

    /// Lifetime fraction of this frame once `copy_offset` is removed.
    pub fn to_fraction(self, copy_offset: u64, duration: f32) -> f32 {
        let local = self.0 as i64 - copy_offset as i64;
        local as f32 / (duration * FRAMES_PER_SECOND)
    }
}

/// Three-component single precision vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All ones.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same value on every axis.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// `[x, y, z]`.
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// True when no component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
