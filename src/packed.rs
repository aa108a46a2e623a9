//! Palette and low-bit-depth greyscale PNGs.
//!
//! `image` expands these layouts to 8-bit RGB(A) / luma on decode, which would
//! change the sprite's colour mode on the way back out. They are read here with
//! the `png` crate instead, one sample per pixel, and re-encoded with the
//! original palette, `tRNS` chunk and bit depth.
use image::ImageFormat;
use image::error::{DecodingError, EncodingError, ImageError, ImageFormatHint};
use png::{BitDepth, ColorType, Transformations};

use crate::error::PatchError;
use crate::geometry::Rect;
use crate::paint::FillColor;

/// A PNG kept in its stored sample layout: palette indices, or grey levels
/// narrower than eight bits.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedSprite {
    width: u32,
    height: u32,
    color_type: ColorType,
    bit_depth: BitDepth,
    /// `PLTE` as flat `r, g, b` triples.
    palette: Option<Vec<u8>>,
    /// `tRNS` exactly as stored.
    trns: Option<Vec<u8>>,
    /// One sample per pixel, row-major.
    samples: Vec<u8>,
}

impl PackedSprite {
    /// Decode `bytes` if they hold an indexed or sub-8-bit greyscale PNG.
    ///
    /// Returns `Ok(None)` for every other layout, which the regular `image`
    /// path handles without loss.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, ImageError> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(Transformations::IDENTITY);
        let mut reader = decoder.read_info().map_err(decoding_error)?;

        let info = reader.info();
        let (color_type, bit_depth) = (info.color_type, info.bit_depth);
        let packed = match color_type {
            ColorType::Indexed => true,
            ColorType::Grayscale => (bit_depth as u8) < 8,
            _ => false,
        };
        if !packed {
            return Ok(None);
        }

        let (width, height) = (info.width, info.height);
        let palette = info.palette.as_ref().map(|p| p.to_vec());
        let trns = info.trns.as_ref().map(|t| t.to_vec());

        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf).map_err(decoding_error)?;

        let depth = bit_depth as u8;
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for row in buf.chunks_exact(frame.line_size).take(height as usize) {
            samples.extend((0..width as usize).map(|i| unpack(row, i, depth)));
        }

        tracing::debug!(?color_type, ?bit_depth, width, height, "decoded packed PNG");
        Ok(Some(Self {
            width,
            height,
            color_type,
            bit_depth,
            palette,
            trns,
            samples,
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Stored PNG colour type; always `Indexed` or `Grayscale`.
    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// `PLTE` as flat `r, g, b` triples.
    pub fn palette(&self) -> Option<&[u8]> {
        self.palette.as_deref()
    }

    /// Raw sample (palette index or grey level) at `(x, y)`.
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Paint the on-image part of `rect` with `color`.
    ///
    /// Indexed sprites reuse the first opaque palette entry equal to `color`
    /// and append one when none exists, widening the bit depth if the new
    /// index needs it. Greyscale sprites get the fill's luma quantised to
    /// their bit depth.
    ///
    /// Returns the number of pixels written.
    pub fn fill_rect(&mut self, rect: Rect, color: FillColor) -> Result<usize, PatchError> {
        let Some(clipped) = rect.clip(self.width, self.height) else {
            tracing::debug!(?rect, "fill rectangle lies outside the image; nothing to paint");
            return Ok(0);
        };

        let sample = match self.color_type {
            ColorType::Indexed => self.allocate_index(color)?,
            _ => self.grey_level(color),
        };

        let width = self.width as usize;
        for (x, y) in clipped.points() {
            self.samples[y as usize * width + x as usize] = sample;
        }
        Ok(clipped.area() as usize)
    }

    /// `true` when every on-image pixel of `rect` shows `color` as
    /// [`PackedSprite::fill_rect`] would have painted it.
    pub fn region_is_uniform(&self, rect: Rect, color: FillColor) -> bool {
        let Some(clipped) = rect.clip(self.width, self.height) else {
            return true;
        };
        match self.color_type {
            ColorType::Indexed => clipped
                .points()
                .all(|(x, y)| self.is_opaque_entry(self.sample(x, y) as usize, color)),
            _ => {
                let level = self.grey_level(color);
                clipped.points().all(|(x, y)| self.sample(x, y) == level)
            }
        }
    }

    /// Re-encode as PNG with the stored layout, palette and transparency.
    pub fn encode(&self) -> Result<Vec<u8>, ImageError> {
        let depth = self.bit_depth as u8;
        let line_size = (self.width as usize * depth as usize).div_ceil(8);
        let mut data = vec![0u8; line_size * self.height as usize];
        for (row, samples) in data
            .chunks_exact_mut(line_size)
            .zip(self.samples.chunks_exact(self.width as usize))
        {
            for (i, &s) in samples.iter().enumerate() {
                pack(row, i, depth, s);
            }
        }

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
        encoder.set_color(self.color_type);
        encoder.set_depth(self.bit_depth);
        if let Some(palette) = &self.palette {
            encoder.set_palette(palette.clone());
        }
        if let Some(trns) = &self.trns {
            encoder.set_trns(trns.clone());
        }

        let mut writer = encoder.write_header().map_err(encoding_error)?;
        writer.write_image_data(&data).map_err(encoding_error)?;
        writer.finish().map_err(encoding_error)?;
        Ok(out)
    }

    fn is_opaque_entry(&self, index: usize, color: FillColor) -> bool {
        let Some(palette) = &self.palette else {
            return false;
        };
        let opaque = self.trns.as_ref().and_then(|t| t.get(index)).is_none_or(|&a| a == u8::MAX);
        opaque && palette.get(index * 3..index * 3 + 3) == Some(&[color.r, color.g, color.b][..])
    }

    fn allocate_index(&mut self, color: FillColor) -> Result<u8, PatchError> {
        let entries = self.palette.as_ref().map_or(0, |p| p.len() / 3);
        if let Some(index) = (0..entries).find(|&i| self.is_opaque_entry(i, color)) {
            return Ok(index as u8);
        }
        if entries >= 256 {
            return Err(PatchError::PaletteFull);
        }

        self.palette.get_or_insert_with(Vec::new).extend([color.r, color.g, color.b]);
        while (1usize << self.bit_depth as u8) <= entries {
            self.bit_depth = match self.bit_depth {
                BitDepth::One => BitDepth::Two,
                BitDepth::Two => BitDepth::Four,
                _ => BitDepth::Eight,
            };
        }
        tracing::debug!(index = entries, ?color, "appended fill colour to palette");
        Ok(entries as u8)
    }

    /// Fill luma scaled onto `0..=2^depth - 1`, rounded to nearest.
    fn grey_level(&self, color: FillColor) -> u8 {
        let max = (1u32 << self.bit_depth as u8) - 1;
        ((color.luma() as u32 * max + 127) / 255) as u8
    }
}

// ── Bit packing ──────────────────────────────────────────────────────────────

/// Sample `i` of a row packed at `depth` bits per sample, MSB first.
fn unpack(row: &[u8], i: usize, depth: u8) -> u8 {
    let bit = i * depth as usize;
    let shift = 8 - depth as usize - bit % 8;
    let mask = ((1u16 << depth) - 1) as u8;
    (row[bit / 8] >> shift) & mask
}

fn pack(row: &mut [u8], i: usize, depth: u8, sample: u8) {
    let bit = i * depth as usize;
    let shift = 8 - depth as usize - bit % 8;
    let mask = ((1u16 << depth) - 1) as u8;
    row[bit / 8] = (row[bit / 8] & !(mask << shift)) | ((sample & mask) << shift);
}

fn decoding_error(e: png::DecodingError) -> ImageError {
    ImageError::Decoding(DecodingError::new(ImageFormatHint::Exact(ImageFormat::Png), e))
}

fn encoding_error(e: png::EncodingError) -> ImageError {
    ImageError::Encoding(EncodingError::new(ImageFormatHint::Exact(ImageFormat::Png), e))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
