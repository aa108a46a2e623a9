use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::geometry::Rect;

// ── FillColor ────────────────────────────────────────────────────────────────

/// Opaque 8-bit sRGB colour used to paint over a sprite region.
///
/// Serialized as `[r, g, b]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FillColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey level using ITU-R 601-2 weights, rounded to nearest.
    ///
    /// `L = R * 299/1000 + G * 587/1000 + B * 114/1000`, in 16.16 fixed point.
    pub fn luma(&self) -> u8 {
        let l = self.r as u32 * 19595 + self.g as u32 * 38470 + self.b as u32 * 7471 + 0x8000;
        (l >> 16) as u8
    }

    fn luma8(&self) -> Luma<u8> {
        Luma([self.luma()])
    }

    fn luma_a8(&self) -> LumaA<u8> {
        LumaA([self.luma(), u8::MAX])
    }

    fn rgb8(&self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    fn rgba8(&self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, u8::MAX])
    }

    fn luma16(&self) -> Luma<u16> {
        Luma([widen(self.luma())])
    }

    fn luma_a16(&self) -> LumaA<u16> {
        LumaA([widen(self.luma()), u16::MAX])
    }

    fn rgb16(&self) -> Rgb<u16> {
        Rgb([widen(self.r), widen(self.g), widen(self.b)])
    }

    fn rgba16(&self) -> Rgba<u16> {
        Rgba([widen(self.r), widen(self.g), widen(self.b), u16::MAX])
    }

    fn rgb32f(&self) -> Rgb<f32> {
        Rgb([unit(self.r), unit(self.g), unit(self.b)])
    }

    fn rgba32f(&self) -> Rgba<f32> {
        Rgba([unit(self.r), unit(self.g), unit(self.b), 1.0])
    }
}

impl From<[u8; 3]> for FillColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<FillColor> for [u8; 3] {
    fn from(c: FillColor) -> Self {
        [c.r, c.g, c.b]
    }
}

/// 0..=255 onto 0..=65535 (255 * 257 == 65535).
#[inline]
fn widen(v: u8) -> u16 {
    v as u16 * 257
}

#[inline]
fn unit(v: u8) -> f32 {
    v as f32 / 255.0
}

// ── Fill ─────────────────────────────────────────────────────────────────────

/// Paint every pixel of `rect` that lands on `image` with `color`.
///
/// The rectangle is clipped to the image bounds first; a rectangle lying
/// completely outside the image is a no-op. The image keeps its colour type:
/// `color` is converted to whatever pixel format the buffer already uses, and
/// any alpha channel is set fully opaque.
///
/// Returns the number of pixels written, or
/// [`PatchError::UnsupportedLayout`] for a pixel layout it cannot paint.
pub fn fill_rect(
    image: &mut DynamicImage,
    rect: Rect,
    color: FillColor,
) -> Result<usize, PatchError> {
    let Some(clipped) = rect.clip(image.width(), image.height()) else {
        tracing::debug!(?rect, "fill rectangle lies outside the image; nothing to paint");
        return Ok(0);
    };

    let written = match image {
        DynamicImage::ImageLuma8(buf) => fill_buffer(buf, clipped, color.luma8()),
        DynamicImage::ImageLumaA8(buf) => fill_buffer(buf, clipped, color.luma_a8()),
        DynamicImage::ImageRgb8(buf) => fill_buffer(buf, clipped, color.rgb8()),
        DynamicImage::ImageRgba8(buf) => fill_buffer(buf, clipped, color.rgba8()),
        DynamicImage::ImageLuma16(buf) => fill_buffer(buf, clipped, color.luma16()),
        DynamicImage::ImageLumaA16(buf) => fill_buffer(buf, clipped, color.luma_a16()),
        DynamicImage::ImageRgb16(buf) => fill_buffer(buf, clipped, color.rgb16()),
        DynamicImage::ImageRgba16(buf) => fill_buffer(buf, clipped, color.rgba16()),
        DynamicImage::ImageRgb32F(buf) => fill_buffer(buf, clipped, color.rgb32f()),
        DynamicImage::ImageRgba32F(buf) => fill_buffer(buf, clipped, color.rgba32f()),
        other => return Err(PatchError::UnsupportedLayout(other.color())),
    };
    Ok(written)
}

fn fill_buffer<P: Pixel>(
    buf: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    rect: Rect,
    px: P,
) -> usize {
    for (x, y) in rect.points() {
        buf.put_pixel(x, y, px);
    }
    rect.area() as usize
}

/// `true` when every on-image pixel of `rect` holds exactly the value
/// [`fill_rect`] would have written for `color`.
///
/// A rectangle entirely outside the image is trivially uniform.
pub fn region_is_uniform(image: &DynamicImage, rect: Rect, color: FillColor) -> bool {
    let Some(clipped) = rect.clip(image.width(), image.height()) else {
        return true;
    };

    match image {
        DynamicImage::ImageLuma8(buf) => buffer_is_uniform(buf, clipped, color.luma8()),
        DynamicImage::ImageLumaA8(buf) => buffer_is_uniform(buf, clipped, color.luma_a8()),
        DynamicImage::ImageRgb8(buf) => buffer_is_uniform(buf, clipped, color.rgb8()),
        DynamicImage::ImageRgba8(buf) => buffer_is_uniform(buf, clipped, color.rgba8()),
        DynamicImage::ImageLuma16(buf) => buffer_is_uniform(buf, clipped, color.luma16()),
        DynamicImage::ImageLumaA16(buf) => buffer_is_uniform(buf, clipped, color.luma_a16()),
        DynamicImage::ImageRgb16(buf) => buffer_is_uniform(buf, clipped, color.rgb16()),
        DynamicImage::ImageRgba16(buf) => buffer_is_uniform(buf, clipped, color.rgba16()),
        DynamicImage::ImageRgb32F(buf) => buffer_is_uniform(buf, clipped, color.rgb32f()),
        DynamicImage::ImageRgba32F(buf) => buffer_is_uniform(buf, clipped, color.rgba32f()),
        _ => false,
    }
}

fn buffer_is_uniform<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>, rect: Rect, px: P) -> bool
where
    P: Pixel + PartialEq,
{
    rect.points().all(|(x, y)| *buf.get_pixel(x, y) == px)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
