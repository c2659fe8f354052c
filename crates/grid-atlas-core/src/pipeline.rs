use std::collections::HashMap;

use image::{DynamicImage, RgbaImage};
use tracing::{info, instrument};

use crate::compositing::blit_rgba;
use crate::config::PackerConfig;
use crate::error::{AtlasError, Result};
use crate::model::{Atlas, PackStats};
use crate::packer::{SpriteSize, pack};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// In-memory image to pack (key + decoded image).
#[derive(Debug)]
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Output of a packing run: the layout and the composited RGBA canvas.
#[derive(Debug)]
pub struct PackOutput {
    pub atlas: Atlas,
    pub rgba: RgbaImage,
}

impl PackOutput {
    /// Computes packing statistics for this output.
    /// This is a convenience method that delegates to `atlas.stats()`.
    pub fn stats(&self) -> PackStats {
        self.atlas.stats()
    }
}

/// Packs `inputs` in the given order and composites them onto one canvas.
///
/// Notes:
/// - The canvas starts fully transparent; sprite pixels are copied with their alpha.
/// - When two inputs share a key, only the later one is drawn, at the later placement.
/// - Parts of sprites outside a clamped canvas are cut off; see `Atlas::overflow`.
#[instrument(skip_all, fields(count = inputs.len()))]
pub fn pack_images(inputs: Vec<InputImage>, cfg: PackerConfig) -> Result<PackOutput> {
    cfg.validate()?;
    if inputs.is_empty() {
        return Err(AtlasError::Empty);
    }

    let rgba = to_rgba(&inputs);
    let sizes: Vec<SpriteSize> = inputs
        .iter()
        .zip(&rgba)
        .map(|(inp, img)| SpriteSize::new(inp.key.clone(), img.width(), img.height()))
        .collect();
    let atlas = pack(&sizes, &cfg)?;

    // Last input per key; matches the placement kept in `atlas.frames`.
    let winners: HashMap<&str, usize> = inputs
        .iter()
        .enumerate()
        .map(|(idx, inp)| (inp.key.as_str(), idx))
        .collect();

    let mut canvas = RgbaImage::new(atlas.canvas.width, atlas.canvas.height);
    for f in &atlas.frames {
        if let Some(&idx) = winners.get(f.key.as_str()) {
            blit_rgba(&rgba[idx], &mut canvas, f.frame.x, f.frame.y);
        }
    }
    info!(
        frames = atlas.frames.len(),
        width = canvas.width(),
        height = canvas.height(),
        "atlas composited"
    );
    Ok(PackOutput {
        atlas,
        rgba: canvas,
    })
}

#[cfg(not(feature = "parallel"))]
fn to_rgba(inputs: &[InputImage]) -> Vec<RgbaImage> {
    inputs.iter().map(|inp| inp.image.to_rgba8()).collect()
}

#[cfg(feature = "parallel")]
fn to_rgba(inputs: &[InputImage]) -> Vec<RgbaImage> {
    inputs.par_iter().map(|inp| inp.image.to_rgba8()).collect()
}

/// Packs sizes without compositing pixel data.
/// Inputs are (key, width, height) in placement order. Returns the layout only.
pub fn pack_layout<K: Into<String>>(inputs: Vec<(K, u32, u32)>, cfg: PackerConfig) -> Result<Atlas> {
    let sizes: Vec<SpriteSize> = inputs
        .into_iter()
        .map(|(k, w, h)| SpriteSize::new(k, w, h))
        .collect();
    pack(&sizes, &cfg)
}
