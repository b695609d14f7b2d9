use std::path::Path;

use crate::{
    effect::model::{EffectPart, RenderAlignment, RenderMode},
    foundation::core::Vec3,
    foundation::error::{SfxError, SfxResult},
    track::keyframe::Keyframe,
};

/// Leading tag of every `.sfx` file, space padded to 8 bytes.
pub const SFX_VERSION: &[u8; 8] = b"SFX0.3  ";

/// Part type code of a billboard part, the only kind this exporter writes.
pub const PART_TYPE_BILLBOARD: i32 = 1;

/// Encoded size of one keyframe: frame, 12 floats, alpha.
pub const KEYFRAME_BYTES: usize = 2 + 12 * 4 + 4;

/// How the client orients a part's quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillboardKind {
    /// World-aligned quad.
    Normal,
    /// Camera-facing quad.
    Billboard,
    /// Quad lying on the ground.
    Bottom,
}

impl BillboardKind {
    /// Map the renderer's mode and alignment; anything unrecognized is [`BillboardKind::Normal`].
    pub fn from_renderer(mode: RenderMode, alignment: RenderAlignment) -> Self {
        match (mode, alignment) {
            (RenderMode::Billboard, RenderAlignment::World) => Self::Normal,
            (RenderMode::Billboard, _) => Self::Billboard,
            (RenderMode::HorizontalBillboard, _) => Self::Bottom,
            _ => Self::Normal,
        }
    }

    /// Wire code.
    pub fn code(self) -> i32 {
        match self {
            Self::Normal => 4,
            Self::Billboard => 1,
            Self::Bottom => 2,
        }
    }

    /// Inverse of [`BillboardKind::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            4 => Some(Self::Normal),
            1 => Some(Self::Billboard),
            2 => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Blend mode written per part record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaBlendKind {
    /// Additive.
    Glow,
    /// Alpha blended.
    Blend,
}

impl AlphaBlendKind {
    /// Material mode 2 blends, everything else (including 4, additive) glows.
    pub fn from_material_mode(mode: u32) -> Self {
        match mode {
            2 => Self::Blend,
            _ => Self::Glow,
        }
    }

    /// Wire code.
    pub fn code(self) -> i32 {
        match self {
            Self::Glow => 2,
            Self::Blend => 1,
        }
    }

    /// Inverse of [`AlphaBlendKind::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            2 => Some(Self::Glow),
            1 => Some(Self::Blend),
            _ => None,
        }
    }
}

/// One part record as stored in the file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartRecord {
    /// Part name.
    pub name: String,
    /// Physical texture file name.
    pub texture: String,
    /// Texture sheet frame count; the exporter writes 1.
    pub texture_frame: u16,
    /// Texture sheet loop count; the exporter writes 1.
    pub texture_loop: u16,
    /// Renderer enabled flag.
    pub visible: bool,
    /// Quad orientation.
    pub billboard: BillboardKind,
    /// Blend mode.
    pub alpha_blend: AlphaBlendKind,
    /// Keyframes in ascending frame order.
    pub keyframes: Vec<Keyframe>,
}

impl PartRecord {
    /// Record for `part`; a part whose emission is disabled keeps its header but no keyframes.
    pub fn from_part(part: &EffectPart, texture: impl Into<String>, keyframes: Vec<Keyframe>) -> Self {
        let renderer = &part.renderer;
        Self {
            name: part.name.clone(),
            texture: texture.into(),
            texture_frame: 1,
            texture_loop: 1,
            visible: renderer.enabled,
            billboard: BillboardKind::from_renderer(renderer.render_mode, renderer.alignment),
            alpha_blend: AlphaBlendKind::from_material_mode(renderer.material_mode),
            keyframes: if part.emission.enabled {
                keyframes
            } else {
                Vec::new()
            },
        }
    }

    /// Serialize this record into a standalone buffer.
    ///
    /// Nothing is returned on error, so a failing record never leaves partial bytes in a file.
    pub fn encode(&self) -> SfxResult<Vec<u8>> {
        let mut out = Vec::with_capacity(
            4 * 8 + self.name.len() + self.texture.len() + self.keyframes.len() * KEYFRAME_BYTES,
        );
        put_i32(&mut out, PART_TYPE_BILLBOARD);
        put_str(&mut out, &self.name, "part name")?;
        put_str(&mut out, &self.texture, "texture name")?;
        out.extend_from_slice(&self.texture_frame.to_le_bytes());
        out.extend_from_slice(&self.texture_loop.to_le_bytes());
        put_i32(&mut out, i32::from(self.visible));
        put_i32(&mut out, self.billboard.code());
        put_i32(&mut out, self.alpha_blend.code());
        put_i32(&mut out, count_i32(self.keyframes.len(), "keyframe count")?);

        for kf in &self.keyframes {
            let frame = u16::try_from(kf.frame.0).map_err(|_| {
                SfxError::encode(format!(
                    "part '{}': frame {} does not fit in 16 bits",
                    self.name, kf.frame.0
                ))
            })?;
            out.extend_from_slice(&frame.to_le_bytes());
            for v in [kf.position, kf.pos_rotation, kf.scale, kf.rotation] {
                put_vec3(&mut out, v);
            }
            put_i32(&mut out, kf.alpha);
        }
        Ok(out)
    }
}

/// Assemble a file from already encoded part records.
pub fn encode_file<B: AsRef<[u8]>>(records: &[B]) -> SfxResult<Vec<u8>> {
    let body: usize = records.iter().map(|r| r.as_ref().len()).sum();
    let mut out = Vec::with_capacity(SFX_VERSION.len() + 4 + body);
    out.extend_from_slice(SFX_VERSION);
    put_i32(&mut out, count_i32(records.len(), "part record count")?);
    for r in records {
        out.extend_from_slice(r.as_ref());
    }
    Ok(out)
}

/// Encode every record and assemble the file. Fails on the first record that cannot be encoded.
pub fn encode_sfx(records: &[PartRecord]) -> SfxResult<Vec<u8>> {
    let encoded = records
        .iter()
        .map(PartRecord::encode)
        .collect::<SfxResult<Vec<_>>>()?;
    encode_file(&encoded)
}

/// Write `bytes` to `path`, creating the parent directory first.
pub fn write_sfx_file(path: &Path, bytes: &[u8]) -> SfxResult<()> {
    use anyhow::Context as _;

    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> SfxResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_vec3(out: &mut Vec<u8>, v: Vec3) {
    for c in v.to_array() {
        out.extend_from_slice(&c.to_le_bytes());
    }
}

fn put_str(out: &mut Vec<u8>, s: &str, what: &str) -> SfxResult<()> {
    put_i32(out, count_i32(s.len(), what)?);
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn count_i32(n: usize, what: &str) -> SfxResult<i32> {
    i32::try_from(n).map_err(|_| SfxError::encode(format!("{what} {n} exceeds i32 range")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sfx.rs"]
mod tests;
