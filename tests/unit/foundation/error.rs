use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SfxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SfxError::encode("x").to_string().contains("encode error:"));
    assert!(SfxError::decode("x").to_string().contains("decode error:"));
    assert!(
        SfxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn unsupported_curve_mode_names_part_and_module() {
    let msg = SfxError::unsupported_curve_mode("spark", "size over lifetime", "two curves")
        .to_string();
    assert!(msg.contains("'spark'"));
    assert!(msg.contains("size over lifetime"));
    assert!(msg.contains("two curves"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SfxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
