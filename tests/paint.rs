use image::{DynamicImage, GrayImage, Luma, Rgb, Rgb32FImage, RgbImage, Rgba, RgbaImage};
use image::{ImageBuffer, LumaA};
use sprite_patch::geometry::Rect;
use sprite_patch::paint::*;

const GREY: FillColor = FillColor::new(182, 202, 212);

fn label_rect() -> Rect {
    Rect::new(110, 90, 390, 150).unwrap()
}

// Helper: a 500×240 RGBA sprite with a distinct value at every pixel.
fn patterned_rgba() -> RgbaImage {
    RgbaImage::from_fn(500, 240, |x, y| Rgba([x as u8, y as u8, (x ^ y) as u8, 128]))
}

// ── fill_rect ─────────────────────────────────────────────────────────────

#[test]
fn rgba_region_is_opaque_fill() {
    let mut img = DynamicImage::ImageRgba8(patterned_rgba());
    let n = fill_rect(&mut img, label_rect(), GREY).unwrap();
    assert_eq!(n, 281 * 61);

    let buf = img.as_rgba8().unwrap();
    assert_eq!(*buf.get_pixel(110, 90), Rgba([182, 202, 212, 255]));
    assert_eq!(*buf.get_pixel(390, 150), Rgba([182, 202, 212, 255]));
    assert!(region_is_uniform(&img, label_rect(), GREY));
}

#[test]
fn rgba_pixels_outside_region_untouched() {
    let original = patterned_rgba();
    let mut img = DynamicImage::ImageRgba8(original.clone());
    fill_rect(&mut img, label_rect(), GREY).unwrap();

    let buf = img.as_rgba8().unwrap();
    let rect = label_rect();
    for (x, y, px) in buf.enumerate_pixels() {
        if !rect.contains(x, y) {
            assert_eq!(px, original.get_pixel(x, y), "pixel ({x}, {y}) changed");
        }
    }
}

#[test]
fn fill_keeps_color_type() {
    let mut img = DynamicImage::ImageRgb8(RgbImage::new(400, 200));
    fill_rect(&mut img, label_rect(), GREY).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    assert_eq!(*img.as_rgb8().unwrap().get_pixel(200, 120), Rgb([182, 202, 212]));
}

#[test]
fn grayscale_fill_uses_luma() {
    let mut img = DynamicImage::ImageLuma8(GrayImage::new(400, 200));
    fill_rect(&mut img, label_rect(), GREY).unwrap();
    assert_eq!(img.color(), image::ColorType::L8);
    assert_eq!(*img.as_luma8().unwrap().get_pixel(200, 120), Luma([197]));
    assert!(region_is_uniform(&img, label_rect(), GREY));
}

#[test]
fn gray_alpha_fill_is_opaque() {
    let buf: ImageBuffer<LumaA<u8>, Vec<u8>> = ImageBuffer::new(400, 200);
    let mut img = DynamicImage::ImageLumaA8(buf);
    fill_rect(&mut img, label_rect(), GREY).unwrap();
    assert_eq!(*img.as_luma_alpha8().unwrap().get_pixel(110, 90), LumaA([197, 255]));
}

#[test]
fn sixteen_bit_fill_scales_channels() {
    let mut img = DynamicImage::ImageRgba16(ImageBuffer::new(400, 200));
    fill_rect(&mut img, label_rect(), GREY).unwrap();
    let px = img.as_rgba16().unwrap().get_pixel(300, 100);
    assert_eq!(*px, Rgba([182 * 257, 202 * 257, 212 * 257, u16::MAX]));
}

#[test]
fn float_fill_normalises_channels() {
    let mut img = DynamicImage::ImageRgb32F(Rgb32FImage::new(400, 200));
    fill_rect(&mut img, label_rect(), FillColor::new(255, 0, 51)).unwrap();
    let px = img.as_rgb32f().unwrap().get_pixel(300, 100);
    assert!((px[0] - 1.0).abs() < 1e-6);
    assert_eq!(px[1], 0.0);
    assert!((px[2] - 0.2).abs() < 1e-6);
}

#[test]
fn fill_clips_to_small_image() {
    let mut img = DynamicImage::ImageRgb8(RgbImage::new(200, 100));
    let n = fill_rect(&mut img, label_rect(), GREY).unwrap();
    // Columns 110..=199, rows 90..=99.
    assert_eq!(n, 90 * 10);
    assert_eq!(*img.as_rgb8().unwrap().get_pixel(199, 99), Rgb([182, 202, 212]));
    assert_eq!(*img.as_rgb8().unwrap().get_pixel(109, 99), Rgb([0, 0, 0]));
}

#[test]
fn fill_outside_image_is_noop() {
    let original = RgbImage::from_pixel(64, 64, Rgb([1, 2, 3]));
    let mut img = DynamicImage::ImageRgb8(original.clone());
    assert_eq!(fill_rect(&mut img, label_rect(), GREY).unwrap(), 0);
    assert_eq!(img.as_rgb8().unwrap(), &original);
}

#[test]
fn fill_twice_is_stable() {
    let mut once = DynamicImage::ImageRgba8(patterned_rgba());
    fill_rect(&mut once, label_rect(), GREY).unwrap();
    let mut twice = once.clone();
    fill_rect(&mut twice, label_rect(), GREY).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn unsupported_layout_error_names_the_color_type() {
    let err = sprite_patch::PatchError::UnsupportedLayout(image::ColorType::La16);
    assert_eq!(err.to_string(), "cannot paint into La16 pixels");
}

// ── region_is_uniform ─────────────────────────────────────────────────────

#[test]
fn untouched_region_is_not_uniform() {
    let img = DynamicImage::ImageRgba8(patterned_rgba());
    assert!(!region_is_uniform(&img, label_rect(), GREY));
}

#[test]
fn single_stray_pixel_breaks_uniformity() {
    let mut img = DynamicImage::ImageRgb8(RgbImage::new(400, 200));
    fill_rect(&mut img, label_rect(), GREY).unwrap();
    if let DynamicImage::ImageRgb8(buf) = &mut img {
        buf.put_pixel(250, 120, Rgb([0, 0, 0]));
    }
    assert!(!region_is_uniform(&img, label_rect(), GREY));
}

// ── FillColor ─────────────────────────────────────────────────────────────

#[test]
fn fill_color_serializes_as_triple() {
    assert_eq!(serde_json::to_string(&GREY).unwrap(), "[182,202,212]");
    let c: FillColor = serde_json::from_str("[1, 2, 3]").unwrap();
    assert_eq!(c, FillColor::new(1, 2, 3));
}
