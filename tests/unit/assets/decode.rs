use super::*;

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn decode_premultiplies() {
    let img = StillImage::decode(&png_bytes([200, 100, 50, 128])).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(&img.rgba8_premul[..4], &[100, 50, 25, 128]);
}

#[test]
fn decode_rejects_garbage() {
    let err = StillImage::decode(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn open_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("before.png");
    std::fs::write(&path, png_bytes([10, 20, 30, 255])).unwrap();
    let img = StillImage::open(&path).unwrap();
    assert_eq!(&img.rgba8_premul[..4], &[10, 20, 30, 255]);
    assert!(StillImage::open(&dir.path().join("missing.png")).is_err());
}

#[test]
fn from_premul_validates_size() {
    assert!(StillImage::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(StillImage::from_premul(0, 2, vec![]).is_err());
    let s = StillImage::solid(2, 2, Rgba8Premul::from_straight_rgba(255, 0, 0, 255)).unwrap();
    assert_eq!(s.rgba8_premul.len(), 16);
}

#[test]
fn identity_tracks_content() {
    let a = StillImage::solid(4, 4, Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap();
    let b = StillImage::solid(4, 4, Rgba8Premul::from_straight_rgba(3, 2, 1, 255)).unwrap();
    assert_eq!(a.identity(), a.clone().identity());
    assert_ne!(a.identity(), b.identity());
}
