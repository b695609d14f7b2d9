use super::*;
use crate::foundation::core::FrameIndex;

fn record(keyframes: Vec<Keyframe>) -> PartRecord {
    PartRecord {
        name: "fx".to_string(),
        texture: "glow.png".to_string(),
        texture_frame: 1,
        texture_loop: 1,
        visible: true,
        billboard: BillboardKind::Billboard,
        alpha_blend: AlphaBlendKind::Glow,
        keyframes,
    }
}

fn i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

#[test]
fn billboard_kind_mapping() {
    use crate::effect::model::{RenderAlignment as A, RenderMode as M};
    assert_eq!(BillboardKind::from_renderer(M::Billboard, A::World), BillboardKind::Normal);
    assert_eq!(BillboardKind::from_renderer(M::Billboard, A::View), BillboardKind::Billboard);
    assert_eq!(BillboardKind::from_renderer(M::Billboard, A::Local), BillboardKind::Billboard);
    assert_eq!(
        BillboardKind::from_renderer(M::HorizontalBillboard, A::View),
        BillboardKind::Bottom
    );
    assert_eq!(BillboardKind::from_renderer(M::Mesh, A::View), BillboardKind::Normal);
    assert_eq!(BillboardKind::from_renderer(M::Stretch, A::World), BillboardKind::Normal);
}

#[test]
fn alpha_blend_mapping() {
    assert_eq!(AlphaBlendKind::from_material_mode(4), AlphaBlendKind::Glow);
    assert_eq!(AlphaBlendKind::from_material_mode(2), AlphaBlendKind::Blend);
    assert_eq!(AlphaBlendKind::from_material_mode(0), AlphaBlendKind::Glow);
    assert_eq!(AlphaBlendKind::Glow.code(), 2);
    assert_eq!(AlphaBlendKind::Blend.code(), 1);
}

#[test]
fn record_layout_is_packed() {
    let kf = Keyframe::new(FrameIndex(7));
    let bytes = record(vec![kf, Keyframe::new(FrameIndex(9))]).encode().unwrap();

    // type, name, texture, frame/loop, visible, billboard, blend, count, keyframes.
    let header = 4 + (4 + 2) + (4 + 8) + 4 + 4 + 4 + 4 + 4;
    assert_eq!(bytes.len(), header + 2 * KEYFRAME_BYTES);
    assert_eq!(i32_at(&bytes, 0), PART_TYPE_BILLBOARD);
    assert_eq!(i32_at(&bytes, 4), 2);
    assert_eq!(&bytes[8..10], b"fx");
    assert_eq!(i32_at(&bytes, 10), 8);
    assert_eq!(&bytes[14..22], b"glow.png");
    assert_eq!(&bytes[22..26], &[1, 0, 1, 0]);
    assert_eq!(i32_at(&bytes, 26), 1);
    assert_eq!(i32_at(&bytes, 30), 1);
    assert_eq!(i32_at(&bytes, 34), 2);
    assert_eq!(i32_at(&bytes, 38), 2);
    assert_eq!(&bytes[42..44], &[7, 0]);
    // Scale defaults to one; it starts after frame, position and pos_rotation.
    let scale_at = 44 + 24;
    assert_eq!(&bytes[scale_at..scale_at + 4], &1.0f32.to_le_bytes());
    assert_eq!(i32_at(&bytes, 44 + 48), 255);
}

#[test]
fn name_length_counts_utf8_bytes() {
    let mut r = record(Vec::new());
    r.name = "불꽃".to_string();
    let bytes = r.encode().unwrap();
    assert_eq!(i32_at(&bytes, 4), 6);
}

#[test]
fn disabled_emission_writes_no_keyframes() {
    let mut part = EffectPart::new("off", 1.0, "t");
    part.emission.enabled = false;
    let r = PartRecord::from_part(&part, "t.png", vec![Keyframe::new(FrameIndex(0))]);
    assert!(r.keyframes.is_empty());
    let bytes = r.encode().unwrap();
    assert_eq!(i32_at(&bytes, bytes.len() - 4), 0);
}

#[test]
fn from_part_maps_renderer() {
    let mut part = EffectPart::new("p", 1.0, "t");
    part.renderer.enabled = false;
    part.renderer.alignment = RenderAlignment::World;
    part.renderer.material_mode = 2;
    let r = PartRecord::from_part(&part, "t.png", Vec::new());
    assert!(!r.visible);
    assert_eq!(r.billboard, BillboardKind::Normal);
    assert_eq!(r.alpha_blend, AlphaBlendKind::Blend);
    assert_eq!((r.texture_frame, r.texture_loop), (1, 1));
}

#[test]
fn frame_past_u16_is_encode_error() {
    let err = record(vec![Keyframe::new(FrameIndex(70_000))])
        .encode()
        .unwrap_err();
    assert!(matches!(err, SfxError::Encode(_)));
    assert!(err.to_string().contains("70000"));
}

#[test]
fn file_header_counts_records() {
    let a = record(Vec::new()).encode().unwrap();
    let bytes = encode_file(&[a.clone(), a.clone(), a.clone()]).unwrap();
    assert_eq!(&bytes[..8], SFX_VERSION);
    assert_eq!(i32_at(&bytes, 8), 3);
    assert_eq!(bytes.len(), 12 + 3 * a.len());

    let empty = encode_file::<Vec<u8>>(&[]).unwrap();
    assert_eq!(empty.len(), 12);
    assert_eq!(i32_at(&empty, 8), 0);
}

#[test]
fn write_creates_parent_dir() {
    let dir = std::env::temp_dir().join(format!("sfxbake_write_{}", std::process::id()));
    let path = dir.join("nested").join("a.sfx");
    write_sfx_file(&path, b"abc").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    let _ = std::fs::remove_dir_all(&dir);
}
