use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelError::invalid_recipe("x")
            .to_string()
            .contains("invalid recipe:")
    );
    assert!(
        ReelError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        ReelError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
}

#[test]
fn structured_variants_render_their_fields() {
    let e = ReelError::missing_media("split_screen_swipe", "plated_meal");
    assert_eq!(
        e.to_string(),
        "missing media: template 'split_screen_swipe' requires plated_meal"
    );

    let e = ReelError::ExportSizeExceeded {
        size_bytes: 60,
        limit_bytes: 50,
    };
    assert!(e.to_string().contains("60 bytes > limit 50 bytes"));

    let e = ReelError::safe_zone("cta", "bottom inset crossed by 4px");
    assert!(e.to_string().contains("'cta'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
