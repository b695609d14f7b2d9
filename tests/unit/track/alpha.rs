use super::*;
use crate::animation::gradient::{AlphaKey, Gradient};
use crate::foundation::core::Vec3;

fn fade_out_in() -> ColorModule {
    ColorModule {
        enabled: true,
        gradient: Gradient::blend(vec![AlphaKey::new(0.0, 0.0), AlphaKey::new(1.0, 1.0)]),
    }
}

fn table_with(frames: &[u64]) -> KeyframeTable {
    let mut t = KeyframeTable::new();
    for &f in frames {
        t.set_scale(FrameIndex(f), Vec3::splat(f as f32));
    }
    t
}

#[test]
fn disabled_color_keeps_opaque() {
    let mut t = table_with(&[0, 30, 60]);
    let mut color = fade_out_in();
    color.enabled = false;
    apply_alpha(&mut t, &color, 1.0, 0);
    assert!(t.iter().all(|k| k.alpha == 255));
}

#[test]
fn two_key_gradient_interpolates_across_existing_frames() {
    let frames: Vec<u64> = (0..=20).map(|i| i * 3).collect();
    let mut t = table_with(&frames);
    apply_alpha(&mut t, &fade_out_in(), 1.0, 0);

    let out = t.into_sorted();
    assert_eq!(out.len(), 21);
    assert_eq!(out[0].alpha, 0);
    assert_eq!(out[20].alpha, 255);
    for kf in &out {
        let expected = (kf.frame.0 as f32 / 60.0 * 255.0) as i32;
        assert_eq!(kf.alpha, expected, "frame {}", kf.frame.0);
    }
    assert!(out.windows(2).all(|w| w[0].alpha <= w[1].alpha));
}

#[test]
fn explicit_key_clones_nearest_template() {
    let mut t = table_with(&[0, 60]);
    let color = ColorModule {
        enabled: true,
        gradient: Gradient::blend(vec![AlphaKey::new(0.5, 0.5)]),
    };
    apply_alpha(&mut t, &color, 1.0, 0);

    assert_eq!(t.len(), 3);
    let inserted = t.get(FrameIndex(30)).unwrap();
    assert_eq!(inserted.alpha, 127);
    // Equidistant: the earlier keyframe is the template.
    assert_eq!(inserted.scale, Vec3::splat(0.0));
    // The template itself keeps the gradient alpha from the first pass.
    assert_eq!(t.get(FrameIndex(0)).unwrap().alpha, 127);
    assert_eq!(t.get(FrameIndex(0)).unwrap().frame, FrameIndex(0));
}

#[test]
fn explicit_key_on_existing_frame_merges() {
    let mut t = table_with(&[0, 30, 60]);
    let color = ColorModule {
        enabled: true,
        gradient: Gradient::blend(vec![AlphaKey::new(0.5, 0.2)]),
    };
    apply_alpha(&mut t, &color, 1.0, 0);
    assert_eq!(t.len(), 3);
    assert_eq!(t.get(FrameIndex(30)).unwrap().alpha, 51);
    assert_eq!(t.get(FrameIndex(30)).unwrap().scale, Vec3::splat(30.0));
}

#[test]
fn copy_offset_is_removed_before_evaluating() {
    let mut t = table_with(&[15, 45, 75]);
    apply_alpha(&mut t, &fade_out_in(), 1.0, 15);
    assert_eq!(t.get(FrameIndex(15)).unwrap().alpha, 0);
    assert_eq!(t.get(FrameIndex(45)).unwrap().alpha, 127);
    assert_eq!(t.get(FrameIndex(75)).unwrap().alpha, 255);
    assert_eq!(t.len(), 3);
}

#[test]
fn empty_table_gets_default_keyframes() {
    let mut t = KeyframeTable::new();
    apply_alpha(&mut t, &fade_out_in(), 1.0, 0);
    let out = t.into_sorted();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].frame, FrameIndex(0));
    assert_eq!(out[0].alpha, 0);
    assert_eq!(out[1].frame, FrameIndex(60));
    assert_eq!(out[1].alpha, 255);
}
