//! `.sfx` keyframe track format.
//!
//! All integers and floats are little-endian and fixed width, with no padding or alignment.

/// Reader for `.sfx` files.
pub mod decode;
/// Part records and the file writer.
pub mod sfx;
