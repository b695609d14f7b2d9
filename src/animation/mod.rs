//! Curve and gradient primitives evaluated over a normalized lifetime `t` in `[0, 1]`.

/// Keyframed curves and their module-property wrapper.
pub mod curve;
/// Alpha gradients.
pub mod gradient;
/// Deterministic gradient noise.
pub mod noise;
