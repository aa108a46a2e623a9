use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader};

use crate::config::PatchJob;
use crate::error::PatchError;
use crate::geometry::Rect;
use crate::packed::PackedSprite;
use crate::paint::{self, FillColor};

// ── SpriteMode ───────────────────────────────────────────────────────────────

/// Pixel layout of a sprite as it is stored, which the output keeps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SpriteMode {
    /// Decoded straight into one of `image`'s buffer types.
    Direct(ColorType),
    /// Palette indices or sub-8-bit grey levels, kept as stored in the PNG.
    Packed {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

// ── Sprite ───────────────────────────────────────────────────────────────────

/// A decoded input sprite.
#[derive(Clone, Debug)]
pub enum Sprite {
    Direct(DynamicImage),
    Packed(PackedSprite),
}

impl Sprite {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Sprite::Direct(img) => (img.width(), img.height()),
            Sprite::Packed(p) => (p.width(), p.height()),
        }
    }

    pub fn mode(&self) -> SpriteMode {
        match self {
            Sprite::Direct(img) => SpriteMode::Direct(img.color()),
            Sprite::Packed(p) => SpriteMode::Packed {
                color_type: p.color_type(),
                bit_depth: p.bit_depth(),
            },
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: FillColor) -> Result<usize, PatchError> {
        match self {
            Sprite::Direct(img) => paint::fill_rect(img, rect, color),
            Sprite::Packed(p) => p.fill_rect(rect, color),
        }
    }

    pub fn region_is_uniform(&self, rect: Rect, color: FillColor) -> bool {
        match self {
            Sprite::Direct(img) => paint::region_is_uniform(img, rect, color),
            Sprite::Packed(p) => p.region_is_uniform(rect, color),
        }
    }

    fn encode(&self, format: ImageFormat) -> Result<Vec<u8>, ImageError> {
        match self {
            Sprite::Direct(img) => {
                let mut bytes = Cursor::new(Vec::new());
                img.write_to(&mut bytes, format)?;
                Ok(bytes.into_inner())
            }
            Sprite::Packed(p) => p.encode(),
        }
    }
}

// ── Job ──────────────────────────────────────────────────────────────────────

/// What a finished job did.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchReport {
    pub width: u32,
    pub height: u32,
    /// Layout of the input, and of the output after any widening of an
    /// indexed sprite's bit depth.
    pub mode: SpriteMode,
    pub format: ImageFormat,
    /// Pixels actually painted after clipping to the image.
    pub pixels_filled: usize,
    pub output: PathBuf,
}

/// Open the input sprite, paint the job's rectangle and write the result.
///
/// The output is encoded in the same container format as the input, keeps
/// its dimensions and colour mode, and replaces any existing file. Nothing
/// is written unless decoding, painting and encoding all succeed.
pub fn run(job: &PatchJob) -> Result<PatchReport, PatchError> {
    job.validate()?;

    let (mut sprite, format) = load(&job.input)?;
    let (width, height) = sprite.dimensions();
    tracing::debug!(
        input = %job.input.display(),
        width,
        height,
        mode = ?sprite.mode(),
        ?format,
        "decoded sprite"
    );

    let pixels_filled = sprite.fill_rect(job.rect, job.fill)?;
    debug_assert!(sprite.region_is_uniform(job.rect, job.fill));

    save(&sprite, format, &job.output)?;
    tracing::info!(
        output = %job.output.display(),
        pixels_filled,
        "wrote patched sprite"
    );

    Ok(PatchReport {
        width,
        height,
        mode: sprite.mode(),
        format,
        pixels_filled,
        output: job.output.clone(),
    })
}

/// Decode `path`, detecting the container format from the file's contents
/// and falling back to its extension.
///
/// Indexed and sub-8-bit greyscale PNGs come back as [`Sprite::Packed`] so
/// their stored layout survives the round trip.
pub fn load(path: &Path) -> Result<(Sprite, ImageFormat), PatchError> {
    let bytes = fs::read(path).map_err(|source| PatchError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ImageReader::new(Cursor::new(bytes.as_slice()));
    if let Ok(format) = ImageFormat::from_path(path) {
        reader.set_format(format);
    }
    let reader = reader.with_guessed_format().map_err(|source| PatchError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let format = reader.format().ok_or_else(|| PatchError::UnknownFormat {
        path: path.to_path_buf(),
    })?;

    let decode_error = |source: ImageError| PatchError::Decode {
        path: path.to_path_buf(),
        source,
    };

    if format == ImageFormat::Png {
        if let Some(packed) = PackedSprite::decode(&bytes).map_err(decode_error)? {
            return Ok((Sprite::Packed(packed), format));
        }
    }

    let image = reader.decode().map_err(decode_error)?;
    Ok((Sprite::Direct(image), format))
}

/// Encode fully in memory, then write, so a failed encode never leaves a
/// truncated file behind.
pub fn save(sprite: &Sprite, format: ImageFormat, path: &Path) -> Result<(), PatchError> {
    let bytes = sprite.encode(format).map_err(|source| PatchError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, bytes).map_err(|source| PatchError::Write {
        path: path.to_path_buf(),
        source,
    })
}
