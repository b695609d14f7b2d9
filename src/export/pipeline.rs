use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    effect::model::{Effect, EffectPart},
    encode::sfx::{PartRecord, encode_file, write_sfx_file},
    export::{diagnostics::ExportReport, textures::TextureResolver},
    foundation::error::{SfxError, SfxResult},
    track::build::{PartTracks, build_part_tracks},
    track::sample::SamplingConfig,
};

/// What happens to the rest of the export when one part fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the part, drop its records and keep going.
    #[default]
    SkipFailed,
    /// Stop at the first failing part and produce no output.
    Abort,
}

/// Export controls.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Lifetime sampling grid.
    pub sampling: SamplingConfig,
    /// Sample parts on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Handling of parts that fail to sample or encode.
    pub failure_policy: FailurePolicy,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            parallel: false,
            threads: None,
            failure_policy: FailurePolicy::SkipFailed,
        }
    }
}

impl ExportOpts {
    /// Reject a zero thread count and an invalid sampling grid.
    pub fn validate(&self) -> SfxResult<()> {
        if self.threads == Some(0) {
            return Err(SfxError::validation(
                "export 'threads' must be >= 1 when set",
            ));
        }
        self.sampling.validate()
    }
}

/// Encoded file plus everything reported while producing it.
#[derive(Clone, Debug)]
pub struct ExportOutcome {
    /// Complete `.sfx` file contents.
    pub bytes: Vec<u8>,
    /// Diagnostics and record counts.
    pub report: ExportReport,
}

/// Convert `effect` into the bytes of one `.sfx` file.
///
/// Parts are sampled first (optionally in parallel), then textures are resolved and records
/// encoded sequentially in part order. A part's records are committed only once all of them
/// encoded, so a failing part contributes no bytes.
#[tracing::instrument(skip(effect, opts, textures), fields(effect = %effect.name))]
pub fn export_effect(
    effect: &Effect,
    opts: &ExportOpts,
    textures: &mut dyn TextureResolver,
) -> SfxResult<ExportOutcome> {
    effect.validate()?;
    opts.validate()?;

    let mut report = ExportReport::default();
    for part in &effect.parts {
        let unsupported = part.unsupported_modules();
        if !unsupported.is_empty() {
            let names: Vec<&str> = unsupported.iter().map(|m| m.label()).collect();
            report.warning(
                &part.name,
                format!(
                    "active modules are not supported and will not be exported: {}",
                    names.join(", ")
                ),
            );
        }
    }

    let sampled = sample_parts(&effect.parts, opts)?;

    let mut records: Vec<Vec<u8>> = Vec::new();
    for (part, tracks) in effect.parts.iter().zip(sampled) {
        match tracks.and_then(|t| encode_part_records(part, t, &mut *textures)) {
            Ok(encoded) => {
                tracing::debug!(part = %part.name, records = encoded.len(), "part encoded");
                records.extend(encoded);
            }
            Err(e) => match opts.failure_policy {
                FailurePolicy::Abort => {
                    tracing::error!(part = %part.name, "{e}");
                    return Err(e);
                }
                FailurePolicy::SkipFailed => report.fatal(&part.name, e.to_string()),
            },
        }
    }

    let bytes = encode_file(&records)?;
    report.records_written = records.len();
    report.info(format!(
        "effect '{}' exported: {} part records, {} failed parts",
        effect.name, report.records_written, report.parts_failed
    ));
    Ok(ExportOutcome { bytes, report })
}

/// Result of [`export_to_dir`].
#[derive(Clone, Debug)]
pub struct ExportSummary {
    /// Written `.sfx` path.
    pub path: PathBuf,
    /// Diagnostics and record counts.
    pub report: ExportReport,
}

/// Export `effect` and write it to `<out_dir>/<effect name>.sfx`.
pub fn export_to_dir(
    effect: &Effect,
    out_dir: &Path,
    opts: &ExportOpts,
    textures: &mut dyn TextureResolver,
) -> SfxResult<ExportSummary> {
    let outcome = export_effect(effect, opts, textures)?;
    let path = out_dir.join(format!("{}.sfx", effect.name));
    write_sfx_file(&path, &outcome.bytes)?;
    tracing::info!(path = %path.display(), bytes = outcome.bytes.len(), "sfx written");
    Ok(ExportSummary {
        path,
        report: outcome.report,
    })
}

fn sample_parts(parts: &[EffectPart], opts: &ExportOpts) -> SfxResult<Vec<SfxResult<PartTracks>>> {
    if !opts.parallel {
        return Ok(parts
            .iter()
            .map(|p| build_part_tracks(p, &opts.sampling))
            .collect());
    }

    let pool = build_thread_pool(opts.threads)?;
    Ok(pool.install(|| {
        parts
            .par_iter()
            .map(|p| build_part_tracks(p, &opts.sampling))
            .collect()
    }))
}

fn encode_part_records(
    part: &EffectPart,
    tracks: PartTracks,
    textures: &mut dyn TextureResolver,
) -> SfxResult<Vec<Vec<u8>>> {
    let texture = textures.resolve(&part.renderer.texture)?;
    tracks
        .tracks
        .into_iter()
        .map(|keyframes| PartRecord::from_part(part, texture.as_str(), keyframes).encode())
        .collect()
}

/// `threads` was checked by [`ExportOpts::validate`].
fn build_thread_pool(threads: Option<usize>) -> SfxResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
