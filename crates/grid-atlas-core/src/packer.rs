//! Uniform grid layout.
//!
//! Every sprite gets a `cell_w x cell_h` cell, where the cell is the largest
//! width and the largest height in the input. Cells are laid out row-major in
//! input order, `padding` pixels apart and `padding` pixels from the border.
//! A sprite smaller than the cell sits in the cell's top-left corner.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::config::PackerConfig;
use crate::error::{AtlasError, Result};
use crate::model::{Atlas, Canvas, Frame, GridLayout, Overflow, Rect};

/// Size of one input sprite; the layout-only form of a sprite record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSize {
    pub key: String,
    pub w: u32,
    pub h: u32,
}

impl SpriteSize {
    pub fn new(key: impl Into<String>, w: u32, h: u32) -> Self {
        Self {
            key: key.into(),
            w,
            h,
        }
    }
}

impl GridLayout {
    /// Computes the grid for `count` cells of `cell_w x cell_h`.
    ///
    /// Fails with `TooLarge` when a single cell plus the border padding on
    /// both sides exceeds `max_dimension` on either axis. A grid whose height
    /// exceeds the maximum is not an error: the canvas is clamped and the
    /// overflowing rows fall outside it.
    pub fn compute(cell_w: u32, cell_h: u32, count: usize, cfg: &PackerConfig) -> Result<Self> {
        cfg.validate()?;
        if count == 0 {
            return Err(AtlasError::Empty);
        }
        if cell_w == 0 || cell_h == 0 {
            return Err(AtlasError::InvalidInput(format!(
                "cell size must be positive, got {cell_w}x{cell_h}"
            )));
        }
        let too_large = || AtlasError::TooLarge {
            cell_w,
            cell_h,
            padding: cfg.padding,
            max_dimension: cfg.max_dimension,
        };

        let max = cfg.max_dimension as u64;
        let pad = cfg.padding as u64;
        let (cw, ch) = (cell_w as u64, cell_h as u64);

        let per_row = max.checked_sub(pad).ok_or_else(too_large)? / (cw + pad);
        if per_row == 0 || ch + 2 * pad > max {
            return Err(too_large());
        }
        let rows = (count as u64).div_ceil(per_row);

        let ideal_width = per_row * (cw + pad) + pad;
        let ideal_height = rows * (ch + pad) + pad;
        let canvas = Canvas::new(ideal_width.min(max) as u32, ideal_height.min(max) as u32);

        let rows = u32::try_from(rows)
            .map_err(|_| AtlasError::InvalidInput(format!("too many sprites: {count}")))?;
        Ok(Self {
            cell_w,
            cell_h,
            padding: cfg.padding,
            per_row: per_row as u32,
            rows,
            ideal_width,
            ideal_height,
            canvas,
        })
    }

    /// Grid cell `(col, row)` for the sprite at input position `index`.
    pub fn cell_of(&self, index: usize) -> (u64, u64) {
        let per_row = self.per_row as u64;
        (index as u64 % per_row, index as u64 / per_row)
    }

    /// Top-left pixel of the cell for input position `index`.
    /// `None` when the offset does not fit in `u32`.
    pub fn cell_origin(&self, index: usize) -> Option<(u32, u32)> {
        let (col, row) = self.cell_of(index);
        let pad = self.padding as u64;
        let x = pad + col * (self.cell_w as u64 + pad);
        let y = pad + row * (self.cell_h as u64 + pad);
        Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }

    /// True when the canvas had to be clamped below the ideal grid size.
    pub fn is_clamped(&self) -> bool {
        self.ideal_width > self.canvas.width as u64 || self.ideal_height > self.canvas.height as u64
    }
}

/// Packs `sprites`, in the given order, into a uniform grid.
///
/// The result is a pure function of the ordered input and `cfg`. Duplicate
/// keys are resolved last-write-wins: the later sprite's placement replaces
/// the earlier one in the earlier one's slot of the mapping.
#[instrument(skip_all, fields(count = sprites.len()))]
pub fn pack(sprites: &[SpriteSize], cfg: &PackerConfig) -> Result<Atlas> {
    if sprites.is_empty() {
        return Err(AtlasError::Empty);
    }
    if let Some(bad) = sprites.iter().find(|s| s.w == 0 || s.h == 0) {
        return Err(AtlasError::InvalidInput(format!(
            "sprite '{}' has zero size {}x{}",
            bad.key, bad.w, bad.h
        )));
    }

    let cell_w = sprites.iter().map(|s| s.w).max().unwrap_or(0);
    let cell_h = sprites.iter().map(|s| s.h).max().unwrap_or(0);
    let grid = GridLayout::compute(cell_w, cell_h, sprites.len(), cfg)?;
    debug!(
        cell_w,
        cell_h,
        per_row = grid.per_row,
        rows = grid.rows,
        width = grid.canvas.width,
        height = grid.canvas.height,
        "grid computed"
    );

    let mut frames: Vec<Frame> = Vec::with_capacity(sprites.len());
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(sprites.len());
    for (idx, s) in sprites.iter().enumerate() {
        let (x, y) = grid.cell_origin(idx).ok_or_else(|| {
            AtlasError::InvalidInput(format!("placement of '{}' exceeds pixel range", s.key))
        })?;
        let frame = Frame {
            key: s.key.clone(),
            frame: Rect::new(x, y, s.w, s.h),
        };
        match slots.get(s.key.as_str()) {
            Some(&slot) => {
                debug!(key = %s.key, "duplicate sprite name, later entry wins");
                frames[slot] = frame;
            }
            None => {
                slots.insert(s.key.as_str(), frames.len());
                frames.push(frame);
            }
        }
    }

    let overflow = if grid.is_clamped() {
        let clipped = frames
            .iter()
            .filter(|f| !f.frame.fits_within(grid.canvas))
            .count();
        warn!(
            ideal_width = grid.ideal_width,
            ideal_height = grid.ideal_height,
            width = grid.canvas.width,
            height = grid.canvas.height,
            clipped,
            "grid exceeds maximum atlas size; placements outside the canvas are truncated"
        );
        Some(Overflow {
            ideal_width: grid.ideal_width,
            ideal_height: grid.ideal_height,
            canvas: grid.canvas,
            clipped,
        })
    } else {
        None
    };

    Ok(Atlas {
        canvas: grid.canvas,
        grid,
        frames,
        overflow,
    })
}
