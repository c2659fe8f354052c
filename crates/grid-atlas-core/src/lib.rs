//! Core library for packing same-size sprites into a uniform grid atlas.
//!
//! - Layout: `pack` / `pack_layout` compute the grid, the canvas size and one placement per sprite name
//! - Pipeline: `pack_images` takes in-memory images and returns the layout plus the composited RGBA canvas
//! - Export: `to_json_index` / `AtlasIndex` produce and read `{ "frames": { name: { x, y, w, h } } }`
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use grid_atlas_core::{InputImage, PackerConfig, pack_images, to_json_index};
//! # fn main() -> anyhow::Result<()> {
//! let inputs = vec![
//!   InputImage { key: "ace.png".into(), image: ImageReader::open("ace.png")?.decode()? },
//!   InputImage { key: "two.png".into(), image: ImageReader::open("two.png")?.decode()? },
//! ];
//! let out = pack_images(inputs, PackerConfig::default())?;
//! out.rgba.save("cards.png")?;
//! println!("{}", serde_json::to_string_pretty(&to_json_index(&out.atlas))?);
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `grid_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder};
    pub use crate::error::AtlasError;
    pub use crate::export::{AtlasIndex, to_json_index};
    pub use crate::model::{Atlas, Canvas, Frame, GridLayout, Overflow, PackStats, Rect};
    pub use crate::packer::SpriteSize;
    pub use crate::{InputImage, PackOutput, pack, pack_images, pack_layout};
}
