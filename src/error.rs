use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a patch job.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not detect the image format of {}", .path.display())]
    UnknownFormat { path: PathBuf },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot paint into {0:?} pixels")]
    UnsupportedLayout(image::ColorType),

    #[error("palette already holds 256 colours; no room for the fill colour")]
    PaletteFull,

    #[error("rectangle corners are inverted: ({x0}, {y0}) to ({x1}, {y1})")]
    InvertedRect { x0: u32, y0: u32, x1: u32, y1: u32 },

    #[error("input and output both point at {}", .0.display())]
    SamePath(PathBuf),

    #[error("failed to read job file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid job file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
