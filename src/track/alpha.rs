use crate::{
    effect::model::ColorModule,
    foundation::core::FrameIndex,
    track::keyframe::{Keyframe, KeyframeTable},
};

/// Apply the color module's alpha to a fully merged table.
///
/// First every existing keyframe receives the gradient alpha at its own lifetime fraction, so a
/// two-key gradient still shades keyframes produced by other modules. Then each authored alpha key
/// is pinned to its exact frame, cloning the nearest keyframe when that frame does not exist yet.
pub fn apply_alpha(table: &mut KeyframeTable, color: &ColorModule, duration: f32, copy_offset: u64) {
    if !color.enabled {
        return;
    }
    let gradient = &color.gradient;

    for kf in table.iter_mut() {
        let t = kf.frame.to_fraction(copy_offset, duration);
        kf.alpha = to_alpha_truncated(gradient.alpha_at(t));
    }

    for key in &gradient.alpha_keys {
        let frame = FrameIndex::at_fraction(key.time, duration).offset(copy_offset);
        let alpha = to_alpha_floored(key.alpha);

        if let Some(existing) = table.get(frame) {
            let mut kf = *existing;
            kf.alpha = alpha;
            table.insert(kf);
            continue;
        }

        let mut kf = table
            .nearest(frame)
            .copied()
            .unwrap_or_else(|| Keyframe::new(frame));
        kf.frame = frame;
        kf.alpha = alpha;
        table.insert(kf);
    }
}

fn to_alpha_truncated(a: f32) -> i32 {
    ((a * 255.0) as i32).clamp(0, 255)
}

fn to_alpha_floored(a: f32) -> i32 {
    ((a * 255.0).floor() as i32).clamp(0, 255)
}

#[cfg(test)]
#[path = "../../tests/unit/track/alpha.rs"]
mod tests;
