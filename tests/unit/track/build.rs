use super::*;
use crate::animation::curve::MinMaxCurve;
use crate::animation::gradient::{AlphaKey, Gradient};
use crate::effect::model::{Axes3, RotationAxes, UnsupportedModule};
use crate::foundation::core::{FrameIndex, Vec3};
use crate::foundation::error::SfxError;

fn part() -> EffectPart {
    EffectPart::new("spark", 1.0, "spark")
}

#[test]
fn bare_part_yields_21_uniform_keyframes() {
    let mut p = part();
    p.start_size = 0.75;
    let tracks = build_part_tracks(&p, &SamplingConfig::default()).unwrap();
    assert_eq!(tracks.tracks.len(), 1);
    let track = &tracks.tracks[0];
    assert_eq!(track.len(), 21);
    for kf in track {
        assert_eq!(kf.scale, Vec3::splat(0.75));
        assert_eq!(kf.position, Vec3::ZERO);
        assert_eq!(kf.alpha, 255);
    }
}

#[test]
fn keyframes_are_strictly_ascending() {
    let mut p = EffectPart::new("short", 0.1, "t");
    p.velocity.enabled = true;
    p.velocity.linear.x = MinMaxCurve::constant(3.0);
    let track = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    assert!(track.windows(2).all(|w| w[0].frame < w[1].frame));
    assert_eq!(track.last().unwrap().frame, FrameIndex(6));
}

#[test]
fn colliding_frames_accumulate_position() {
    let mut p = EffectPart::new("short", 0.1, "t");
    p.velocity.enabled = true;
    p.velocity.linear.x = MinMaxCurve::constant(6.0);
    let track = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    // Every subdivision contributes its running sum (0.5, 1.0, ...) to its frame, so the sum over
    // all frames equals the sum of all 21 carried values.
    let total: f32 = track.iter().map(|k| k.position.x).sum();
    let expected: f32 = (1..=21).map(|i| 0.5 * i as f32).sum();
    assert!((total - expected).abs() < 1e-3);
}

#[test]
fn transform_offset_is_added_once() {
    let mut p = part();
    p.position = Vec3::new(1.0, 2.0, 3.0);
    p.noise.enabled = true;
    p.noise.frequency = 0.0;
    p.noise.strength = 2.0;
    let track = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    // Zero frequency keeps noise on the lattice: 0.5 * strength per axis.
    for kf in &track {
        assert_eq!(kf.position, Vec3::new(2.0, 3.0, 4.0));
    }
}

#[test]
fn modules_write_their_own_fields() {
    let mut p = part();
    p.rotation.enabled = true;
    p.rotation.axes = RotationAxes::Separate(Axes3 {
        z: MinMaxCurve::constant(40.0),
        ..Axes3::default()
    });
    p.velocity.enabled = true;
    p.velocity.orbital.x = MinMaxCurve::constant(1.0);
    let track = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    let last = track.last().unwrap();
    assert!((last.rotation.z - 40.0).abs() < 1e-4);
    assert_eq!(last.pos_rotation, Vec3::new(21.0, 0.0, 0.0));
    assert_eq!(last.position, Vec3::ZERO);
    assert_eq!(last.scale, Vec3::ONE);
}

#[test]
fn alpha_runs_after_transform_and_velocity() {
    let mut p = part();
    p.color.enabled = true;
    p.color.gradient = Gradient::blend(vec![AlphaKey::new(0.0, 1.0), AlphaKey::new(1.0, 0.0)]);
    let track = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    assert_eq!(track.len(), 21);
    assert_eq!(track[0].alpha, 255);
    assert_eq!(track[20].alpha, 0);
}

#[test]
fn rate_over_time_spawns_shifted_copies() {
    let mut p = part();
    p.emission.rate_over_time = 2.0;
    let tracks = build_part_tracks(&p, &SamplingConfig::default()).unwrap();
    assert_eq!(tracks.tracks.len(), 3);
    let firsts: Vec<u64> = tracks.tracks.iter().map(|t| t[0].frame.0).collect();
    assert_eq!(firsts, vec![0, 30, 60]);
    assert_eq!(tracks.tracks[2].last().unwrap().frame, FrameIndex(120));
}

#[test]
fn unsupported_modules_do_not_change_the_track() {
    let mut p = part();
    p.velocity.enabled = true;
    p.velocity.linear.y = MinMaxCurve::constant(1.0);
    let plain = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    p.other_modules = vec![UnsupportedModule::Shape, UnsupportedModule::Collision];
    let flagged = build_track(&p, 0, &SamplingConfig::default()).unwrap();
    assert_eq!(plain, flagged);
}

#[test]
fn lifetime_mismatch_fails_before_sampling() {
    let mut p = part();
    p.start_lifetime = 3.0;
    let err = build_part_tracks(&p, &SamplingConfig::default()).unwrap_err();
    assert!(matches!(err, SfxError::Validation(_)));
}

#[test]
fn unsupported_curve_mode_fails_part() {
    let mut p = part();
    p.velocity.enabled = true;
    p.velocity.orbital.z = MinMaxCurve::TwoConstants { min: 0.0, max: 2.0 };
    let err = build_part_tracks(&p, &SamplingConfig::default()).unwrap_err();
    assert!(matches!(err, SfxError::UnsupportedCurveMode { .. }));
}

#[test]
fn huge_rate_over_time_is_rejected_before_sampling() {
    let mut p = part();
    p.emission.rate_over_time = f32::MAX;
    let err = build_part_tracks(&p, &SamplingConfig::default()).unwrap_err();
    assert!(matches!(err, SfxError::Validation(_)));
}
