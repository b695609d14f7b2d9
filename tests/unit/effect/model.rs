use super::*;

fn part() -> EffectPart {
    EffectPart::new("spark", 1.0, "spark_tex")
}

#[test]
fn default_part_validates() {
    part().validate().unwrap();
}

#[test]
fn validate_rejects_lifetime_mismatch() {
    let mut p = part();
    p.start_lifetime = 1.5;
    let err = p.validate().unwrap_err();
    assert!(matches!(err, SfxError::Validation(_)));
    assert!(err.to_string().contains("spark"));
}

#[test]
fn validate_rejects_start_speed() {
    let mut p = part();
    p.start_speed = 2.0;
    assert!(p.validate().is_err());
    p.start_speed = -1.0;
    assert!(p.validate().is_err());
}

#[test]
fn validate_rejects_zero_duration() {
    let mut p = part();
    p.duration = 0.0;
    p.start_lifetime = 0.0;
    assert!(p.validate().is_err());
}

#[test]
fn validate_rejects_delayed_burst_and_mixed_emission() {
    let mut p = part();
    p.emission.bursts.push(Burst {
        time: 0.5,
        count: 10,
    });
    assert!(p.validate().is_err());

    let mut p = part();
    p.emission.bursts.push(Burst {
        time: 0.0,
        count: 10,
    });
    p.validate().unwrap();
    p.emission.rate_over_time = 5.0;
    assert!(p.validate().is_err());
}

#[test]
fn particle_copies_follow_rate() {
    let mut p = part();
    assert_eq!(p.particle_copies(), 0);

    p.emission.rate_over_time = 4.0;
    assert_eq!(p.particle_copies(), 4);
    assert_eq!(p.copy_frame_offset(0), 0);
    assert_eq!(p.copy_frame_offset(1), 15);
    assert_eq!(p.copy_frame_offset(3), 45);

    p.emission.enabled = false;
    assert_eq!(p.particle_copies(), 0);
}

#[test]
fn unsupported_modules_are_deduplicated() {
    let mut p = part();
    p.other_modules = vec![
        UnsupportedModule::Shape,
        UnsupportedModule::Trails,
        UnsupportedModule::Shape,
    ];
    assert_eq!(
        p.unsupported_modules(),
        vec![UnsupportedModule::Shape, UnsupportedModule::Trails]
    );
}

#[test]
fn effect_validate_rejects_path_like_names() {
    let mut effect = Effect {
        name: "fire".to_string(),
        parts: vec![part()],
    };
    effect.validate().unwrap();
    effect.name = "../fire".to_string();
    assert!(effect.validate().is_err());
    effect.name = "fire".to_string();
    effect.parts.clear();
    assert!(effect.validate().is_err());
}

#[test]
fn json_defaults_fill_missing_modules() {
    let json = r#"{
        "name": "glow",
        "duration": 2.0,
        "start_lifetime": 2.0,
        "start_size": 0.5,
        "renderer": { "texture": "glow01" },
        "other_modules": ["shape"]
    }"#;
    let p: EffectPart = serde_json::from_str(json).unwrap();
    assert!(p.emission.enabled);
    assert!(p.renderer.enabled);
    assert_eq!(p.renderer.render_mode, RenderMode::Billboard);
    assert!(!p.size.enabled);
    assert_eq!(p.noise.frequency, 0.5);
    assert_eq!(p.other_modules, vec![UnsupportedModule::Shape]);
    p.validate().unwrap();
}

#[test]
fn from_json_str_maps_parse_errors() {
    let err = Effect::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, SfxError::Serde(_)));
}

#[test]
fn validate_rejects_unbounded_rate_over_time() {
    let mut p = part();
    p.emission.rate_over_time = f32::MAX;
    let err = p.validate().unwrap_err();
    assert!(matches!(err, SfxError::Validation(_)));
    assert!(err.to_string().contains("too many particle copies"));

    p.emission.rate_over_time = 1.0e7;
    assert!(matches!(p.validate(), Err(SfxError::Validation(_))));
}

#[test]
fn validate_accepts_copy_count_below_record_limit() {
    let mut p = part();
    p.emission.rate_over_time = (MAX_PART_RECORDS - 1) as f32;
    p.validate().unwrap();
    assert_eq!(p.particle_copies(), MAX_PART_RECORDS - 1);

    p.emission.rate_over_time = MAX_PART_RECORDS as f32;
    assert!(p.validate().is_err());
}

#[test]
fn validate_rejects_copies_shifted_past_u16_frames() {
    let mut p = EffectPart::new("slow", 1000.0, "t");
    p.emission.rate_over_time = 0.002;
    assert_eq!(p.particle_copies(), 2);
    let err = p.validate().unwrap_err();
    assert!(matches!(err, SfxError::Validation(_)));
    assert!(err.to_string().contains("frame"));
}

#[test]
fn disabled_emission_ignores_rate_over_time() {
    let mut p = part();
    p.emission.enabled = false;
    p.emission.rate_over_time = f32::MAX;
    p.validate().unwrap();
    assert_eq!(p.particle_copies(), 0);
}
