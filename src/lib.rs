//! sfxbake converts particle effect descriptions into `.sfx` keyframe tracks.
//!
//! Each emitter of an [`Effect`] is sampled at fixed lifetime subdivisions, its module
//! contributions are merged into one sparse keyframe timeline per part record, and the records are
//! encoded into the flat little-endian `.sfx` layout:
//!
//! - Load an [`Effect`] (in memory or from JSON)
//! - Run [`export_effect`] (or [`export_to_dir`]) with [`ExportOpts`] and a [`TextureResolver`]
//! - Read the result back with [`decode_sfx`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

/// Curves, gradients and noise evaluated over normalized lifetime.
pub mod animation;
/// Effect and emitter description.
pub mod effect;
/// `.sfx` encoder and decoder.
pub mod encode;
/// Export pipeline, diagnostics and texture resolution.
pub mod export;
/// Shared primitives and the error type.
pub mod foundation;
/// Keyframe track construction.
pub mod track;

pub use crate::animation::curve::{AnimationCurve, CurveKey, MinMaxCurve};
pub use crate::animation::gradient::{AlphaKey, Gradient, GradientMode};
pub use crate::effect::model::{
    Axes3, Burst, ColorModule, Effect, EffectPart, Emission, NoiseModule, RenderAlignment,
    RenderMode, Renderer, RotationAxes, RotationModule, SizeAxes, SizeModule, UnsupportedModule,
    VelocityModule,
};
pub use crate::encode::decode::{SfxFile, decode_sfx};
pub use crate::encode::sfx::{
    AlphaBlendKind, BillboardKind, PartRecord, SFX_VERSION, encode_sfx, write_sfx_file,
};
pub use crate::export::diagnostics::{Diagnostic, ExportReport, Severity};
pub use crate::export::pipeline::{
    ExportOpts, ExportOutcome, ExportSummary, FailurePolicy, export_effect, export_to_dir,
};
pub use crate::export::textures::{DirTextureResolver, NameOnlyTextures, TextureResolver};
pub use crate::foundation::core::{FrameIndex, Vec3};
pub use crate::foundation::error::{SfxError, SfxResult};
pub use crate::track::build::{PartTracks, build_part_tracks, build_track};
pub use crate::track::keyframe::Keyframe;
pub use crate::track::sample::SamplingConfig;
