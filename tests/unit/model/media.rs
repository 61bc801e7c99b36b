use super::*;
use crate::foundation::core::Rgba8Premul;

fn still() -> StillImage {
    StillImage::solid(2, 2, Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap()
}

#[test]
fn bundle_needs_a_still() {
    let empty = MediaBundle::default();
    assert!(empty.validate().is_err());
    assert!(!empty.has(MediaField::AnyStill));

    let b = MediaBundle {
        after: Some(still()),
        ..MediaBundle::default()
    };
    b.validate().unwrap();
    assert!(b.has(MediaField::After));
    assert!(!b.has(MediaField::Before));
    assert_eq!(b.stills().len(), 1);
}

#[test]
fn clips_are_usable_only_with_ffmpeg_support() {
    let b = MediaBundle {
        before: Some(still()),
        clips: vec![ClipRef::new("a.mp4")],
        ..MediaBundle::default()
    };
    assert_eq!(b.has(MediaField::Clips), cfg!(feature = "media-ffmpeg"));
}

#[test]
fn field_names_are_snake_case() {
    assert_eq!(MediaField::PlatedMeal.to_string(), "plated_meal");
}
