use crate::{
    effect::model::EffectPart,
    foundation::error::SfxResult,
    track::{
        alpha::apply_alpha,
        keyframe::{Keyframe, KeyframeTable},
        sample::{
            SampleGrid, SamplingConfig, sample_noise, sample_orbital, sample_rotation,
            sample_size, sample_velocity,
        },
    },
};

/// Keyframe tracks of one part: the part itself followed by its particle copies.
#[derive(Clone, Debug)]
pub struct PartTracks {
    /// One keyframe track per part record, in record order.
    pub tracks: Vec<Vec<Keyframe>>,
}

/// Validate `part` and build one track per emitted record.
#[tracing::instrument(skip(part, cfg), fields(part = %part.name))]
pub fn build_part_tracks(part: &EffectPart, cfg: &SamplingConfig) -> SfxResult<PartTracks> {
    part.validate()?;
    cfg.validate()?;

    let copies = part.particle_copies();
    let mut tracks = Vec::with_capacity(usize::try_from(copies).unwrap_or(0).saturating_add(1));
    for copy in 0..=copies {
        tracks.push(build_track(part, copy, cfg)?);
    }
    tracing::debug!(
        records = tracks.len(),
        keyframes = tracks.first().map_or(0, Vec::len),
        "part sampled"
    );
    Ok(PartTracks { tracks })
}

/// Sample, merge and finalize the track of particle copy `copy` (0 is the part itself).
///
/// Module order: size, rotation, noise, linear velocity, orbital velocity, transform offset,
/// then alpha over the merged table.
pub fn build_track(
    part: &EffectPart,
    copy: u64,
    cfg: &SamplingConfig,
) -> SfxResult<Vec<Keyframe>> {
    let copy_offset = part.copy_frame_offset(copy);
    let grid = SampleGrid {
        subdivisions: cfg.subdivisions,
        duration: part.duration,
        frame_offset: copy_offset,
    };
    let mut table = KeyframeTable::new();

    for (frame, scale) in sample_size(part, grid)? {
        table.set_scale(frame, scale);
    }
    for (frame, rotation) in sample_rotation(part, grid)? {
        table.set_rotation(frame, rotation);
    }
    for (frame, delta) in sample_noise(part, grid) {
        table.add_position(frame, delta);
    }
    for (frame, delta) in sample_velocity(part, grid, cfg)? {
        table.add_position(frame, delta);
    }
    for (frame, pos_rotation) in sample_orbital(part, grid, cfg)? {
        table.set_pos_rotation(frame, pos_rotation);
    }
    table.offset_positions(part.position);
    apply_alpha(&mut table, &part.color, part.duration, copy_offset);

    Ok(table.into_sorted())
}

#[cfg(test)]
#[path = "../../tests/unit/track/build.rs"]
mod tests;
