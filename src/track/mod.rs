//! Keyframe track construction: sampling, merging and the alpha post-pass.

/// Alpha post-pass over a merged table.
pub mod alpha;
/// Per-part track assembly.
pub mod build;
/// Keyframes and the frame-keyed merge table.
pub mod keyframe;
/// Module samplers on the lifetime grid.
pub mod sample;
