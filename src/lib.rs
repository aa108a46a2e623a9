//! Paints a solid rectangle over a region of a sprite and saves the result.
//!
//! Built for one job: blanking the label baked into the big UI button so the
//! game can draw its own text on top. See [`config::PatchJob`] for the
//! defaults and [`patch::run`] for the operation itself.

pub mod config;
pub mod error;
pub mod geometry;
pub mod packed;
pub mod paint;
pub mod patch;

pub use config::PatchJob;
pub use error::PatchError;
pub use geometry::Rect;
pub use paint::FillColor;
pub use patch::{PatchReport, Sprite, SpriteMode, run};
