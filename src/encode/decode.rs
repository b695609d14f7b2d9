use crate::{
    encode::sfx::{AlphaBlendKind, BillboardKind, PART_TYPE_BILLBOARD, PartRecord, SFX_VERSION},
    foundation::core::{FrameIndex, Vec3},
    foundation::error::{SfxError, SfxResult},
    track::keyframe::Keyframe,
};

/// Decoded `.sfx` file.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SfxFile {
    /// Version tag, padding included.
    pub version: String,
    /// Records in file order.
    pub parts: Vec<PartRecord>,
}

/// Read a whole `.sfx` buffer. Trailing bytes after the last record are an error.
pub fn decode_sfx(bytes: &[u8]) -> SfxResult<SfxFile> {
    let mut r = Reader { buf: bytes, pos: 0 };

    let tag = r.take(SFX_VERSION.len(), "version tag")?;
    if tag != SFX_VERSION {
        return Err(SfxError::decode(format!(
            "unexpected version tag {:?}",
            String::from_utf8_lossy(tag)
        )));
    }
    let count = r.count("part record count")?;
    let mut parts = Vec::with_capacity(count.min(1024));
    for i in 0..count {
        parts.push(read_part(&mut r).map_err(|e| match e {
            SfxError::Decode(msg) => SfxError::decode(format!("part record {i}: {msg}")),
            other => other,
        })?);
    }
    if r.pos != bytes.len() {
        return Err(SfxError::decode(format!(
            "{} trailing bytes after the last part record",
            bytes.len() - r.pos
        )));
    }

    Ok(SfxFile {
        version: String::from_utf8_lossy(SFX_VERSION).into_owned(),
        parts,
    })
}

fn read_part(r: &mut Reader<'_>) -> SfxResult<PartRecord> {
    let part_type = r.i32("part type")?;
    if part_type != PART_TYPE_BILLBOARD {
        return Err(SfxError::decode(format!("unsupported part type {part_type}")));
    }
    let name = r.string("part name")?;
    let texture = r.string("texture name")?;
    let texture_frame = r.u16("texture frame")?;
    let texture_loop = r.u16("texture loop")?;
    let visible = match r.i32("visible flag")? {
        0 => false,
        1 => true,
        v => return Err(SfxError::decode(format!("invalid visible flag {v}"))),
    };
    let code = r.i32("billboard type")?;
    let billboard = BillboardKind::from_code(code)
        .ok_or_else(|| SfxError::decode(format!("invalid billboard type {code}")))?;
    let code = r.i32("alpha blend type")?;
    let alpha_blend = AlphaBlendKind::from_code(code)
        .ok_or_else(|| SfxError::decode(format!("invalid alpha blend type {code}")))?;

    let count = r.count("keyframe count")?;
    let mut keyframes = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        keyframes.push(Keyframe {
            frame: FrameIndex(u64::from(r.u16("keyframe frame")?)),
            position: r.vec3("position")?,
            pos_rotation: r.vec3("pos rotation")?,
            scale: r.vec3("scale")?,
            rotation: r.vec3("rotation")?,
            alpha: r.i32("alpha")?,
        });
    }

    Ok(PartRecord {
        name,
        texture,
        texture_frame,
        texture_loop,
        visible,
        billboard,
        alpha_blend,
        keyframes,
    })
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &str) -> SfxResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| {
                SfxError::decode(format!("truncated input while reading {what} at byte {}", self.pos))
            })?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self, what: &str) -> SfxResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn i32(&mut self, what: &str) -> SfxResult<i32> {
        Ok(i32::from_le_bytes(self.array(what)?))
    }

    fn u16(&mut self, what: &str) -> SfxResult<u16> {
        Ok(u16::from_le_bytes(self.array(what)?))
    }

    fn f32(&mut self, what: &str) -> SfxResult<f32> {
        Ok(f32::from_le_bytes(self.array(what)?))
    }

    fn vec3(&mut self, what: &str) -> SfxResult<Vec3> {
        Ok(Vec3::new(self.f32(what)?, self.f32(what)?, self.f32(what)?))
    }

    fn count(&mut self, what: &str) -> SfxResult<usize> {
        let n = self.i32(what)?;
        usize::try_from(n).map_err(|_| SfxError::decode(format!("negative {what} {n}")))
    }

    fn string(&mut self, what: &str) -> SfxResult<String> {
        let len = self.count(what)?;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| SfxError::decode(format!("{what} is not valid UTF-8")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/decode.rs"]
mod tests;
