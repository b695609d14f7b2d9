/// Frame clock and vector primitives.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
