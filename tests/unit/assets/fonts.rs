use super::*;

#[test]
fn unconfigured_weights_have_no_font_file() {
    let book = FontBook::load(&FontConfig::default()).unwrap();
    assert!(book.font(Weight::Bold).is_none());
    assert_eq!(book.family(Weight::Bold), "Inter Bold");
    assert_eq!(book.family(Weight::Regular), "Inter");
}

#[test]
fn missing_font_file_is_an_error() {
    let mut cfg = FontConfig::default();
    cfg.bold.path = Some("/nonexistent/font.ttf".into());
    let err = FontBook::load(&cfg).unwrap_err();
    assert!(err.to_string().contains("read font"));
}

#[test]
fn layout_rejects_bad_size() {
    let mut engine = TextLayoutEngine::new();
    assert!(
        engine
            .layout_lines("x", b"", f32::NAN, TextBrushRgba8::default(), 10.0, Align::Left)
            .is_err()
    );
}
