//! Effect → `.sfx` export.

/// Diagnostics collected during an export.
pub mod diagnostics;
/// Part sampling, failure handling and file assembly.
pub mod pipeline;
/// Texture name resolution and copying.
pub mod textures;
