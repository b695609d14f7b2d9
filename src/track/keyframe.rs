use std::collections::BTreeMap;

use crate::foundation::core::{FrameIndex, Vec3};

/// One timestamped record of the output track.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Absolute output frame.
    pub frame: FrameIndex,
    /// Accumulated displacement plus the part origin.
    pub position: Vec3,
    /// Orbital displacement expressed as a rotation around the part origin.
    pub pos_rotation: Vec3,
    /// Per-axis size.
    pub scale: Vec3,
    /// Degrees.
    pub rotation: Vec3,
    /// 0..=255.
    pub alpha: i32,
}

impl Keyframe {
    /// Alpha of a keyframe no gradient touched.
    pub const OPAQUE: i32 = 255;

    /// Identity keyframe: no displacement or rotation, unit scale, opaque.
    pub fn new(frame: FrameIndex) -> Self {
        Self {
            frame,
            position: Vec3::ZERO,
            pos_rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            alpha: Self::OPAQUE,
        }
    }
}

/// Sparse timeline of keyframes for one part record, keyed by frame.
///
/// Scale, rotation and pos_rotation are last-writer-wins per frame; position accumulates.
#[derive(Clone, Debug, Default)]
pub struct KeyframeTable {
    keys: BTreeMap<FrameIndex, Keyframe>,
}

impl KeyframeTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct frames.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no frame has been touched.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keyframe at exactly `frame`.
    pub fn get(&self, frame: FrameIndex) -> Option<&Keyframe> {
        self.keys.get(&frame)
    }

    fn entry(&mut self, frame: FrameIndex) -> &mut Keyframe {
        self.keys
            .entry(frame)
            .or_insert_with(|| Keyframe::new(frame))
    }

    /// Overwrite scale, creating the keyframe if needed.
    pub fn set_scale(&mut self, frame: FrameIndex, scale: Vec3) {
        self.entry(frame).scale = scale;
    }

    /// Overwrite rotation, creating the keyframe if needed.
    pub fn set_rotation(&mut self, frame: FrameIndex, rotation: Vec3) {
        self.entry(frame).rotation = rotation;
    }

    /// Overwrite pos_rotation, creating the keyframe if needed.
    pub fn set_pos_rotation(&mut self, frame: FrameIndex, pos_rotation: Vec3) {
        self.entry(frame).pos_rotation = pos_rotation;
    }

    /// Add `delta` to the position at `frame`, creating the keyframe if needed.
    pub fn add_position(&mut self, frame: FrameIndex, delta: Vec3) {
        self.entry(frame).position += delta;
    }

    /// Shift every existing keyframe by `origin`; creates nothing.
    pub fn offset_positions(&mut self, origin: Vec3) {
        for kf in self.keys.values_mut() {
            kf.position += origin;
        }
    }

    /// Keyframes in ascending frame order.
    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.keys.values()
    }

    /// Mutable keyframes in ascending frame order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Keyframe> {
        self.keys.values_mut()
    }

    /// Keyframe with the smallest absolute frame distance to `frame`; the earliest wins ties.
    pub fn nearest(&self, frame: FrameIndex) -> Option<&Keyframe> {
        let mut best: Option<(u64, &Keyframe)> = None;
        for kf in self.keys.values() {
            let distance = kf.frame.0.abs_diff(frame.0);
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, kf));
            }
        }
        best.map(|(_, kf)| kf)
    }

    /// Insert or replace the keyframe at `kf.frame`.
    pub fn insert(&mut self, kf: Keyframe) {
        self.keys.insert(kf.frame, kf);
    }

    /// Flatten into ascending frame order.
    pub fn into_sorted(self) -> Vec<Keyframe> {
        self.keys.into_values().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/keyframe.rs"]
mod tests;
