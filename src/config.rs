//! Patch job description.
//!
//! A job names one input sprite, one output file, the rectangle to paint and
//! the colour to paint it with. [`PatchJob::default`] is the button-label
//! cover-up the tool exists for; a JSON file can override any subset of the
//! fields:
//!
//! ```json
//! {
//!     "input":  "Assets/Sprites/UI/Bigbutton.png",
//!     "output": "Assets/Sprites/New_Playbutton.png",
//!     "rect":   [110, 90, 390, 150],
//!     "fill":   [182, 202, 212]
//! }
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::geometry::Rect;
use crate::paint::FillColor;

/// Sprite carrying the baked-in "Play" label.
pub const DEFAULT_INPUT: &str = "Assets/Sprites/UI/Bigbutton.png";
/// Where the blank button is written.
pub const DEFAULT_OUTPUT: &str = "Assets/Sprites/New_Playbutton.png";
/// Region of the label text, corners inclusive. Tuned by hand against the sprite.
pub const DEFAULT_RECT: Rect = Rect::ordered(110, 90, 390, 150);
/// Light metallic grey matching the button face around the label.
pub const DEFAULT_FILL: FillColor = FillColor::new(182, 202, 212);

/// One sprite in, one patched sprite out.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rect: Rect,
    pub fill: FillColor,
}

impl Default for PatchJob {
    fn default() -> Self {
        PatchJob {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            rect: DEFAULT_RECT,
            fill: DEFAULT_FILL,
        }
    }
}

impl PatchJob {
    /// Read a job from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, PatchError> {
        let contents = fs::read_to_string(path).map_err(|source| PatchError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let job: PatchJob =
            serde_json::from_str(&contents).map_err(|source| PatchError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), ?job, "loaded patch job");
        Ok(job)
    }

    /// Reject jobs that would overwrite their own input.
    ///
    /// Paths are compared as written and, when both files exist, after
    /// resolving them on disk, so `./a.png` and `a.png` count as the same file.
    /// Rectangle ordering is already enforced when a [`Rect`] is built.
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.input == self.output {
            return Err(PatchError::SamePath(self.input.clone()));
        }
        if let (Ok(input), Ok(output)) =
            (fs::canonicalize(&self.input), fs::canonicalize(&self.output))
        {
            if input == output {
                return Err(PatchError::SamePath(input));
            }
        }
        Ok(())
    }
}
