use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`), widened so it cannot wrap.
    pub fn right_edge(&self) -> u64 {
        self.x as u64 + self.w as u64
    }
    /// Exclusive bottom edge (`y + h`), widened so it cannot wrap.
    pub fn bottom_edge(&self) -> u64 {
        self.y as u64 + self.h as u64
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right_edge() <= other.x as u64
            || other.right_edge() <= self.x as u64
            || self.bottom_edge() <= other.y as u64
            || other.bottom_edge() <= self.y as u64)
    }
    /// Returns true if the rectangle lies entirely within a `width x height` canvas.
    pub fn fits_within(&self, canvas: Canvas) -> bool {
        self.right_edge() <= canvas.width as u64 && self.bottom_edge() <= canvas.height as u64
    }
}

/// A named placement: the sprite key and where it sits in the atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Frame {
    /// Sprite name, derived from the source file name.
    pub key: String,
    /// Placed rectangle. `w,h` are the sprite's own size, not the cell size.
    pub frame: Rect,
}

/// Output raster dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Uniform grid geometry computed for one packing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridLayout {
    /// Widest sprite in the input.
    pub cell_w: u32,
    /// Tallest sprite in the input.
    pub cell_h: u32,
    pub padding: u32,
    /// Cells per row; always at least 1.
    pub per_row: u32,
    pub rows: u32,
    /// Size the full grid needs before clamping.
    pub ideal_width: u64,
    pub ideal_height: u64,
    /// Ideal size clamped to the configured maximum.
    pub canvas: Canvas,
}

/// The clamped canvas is smaller than the grid. Placements outside it are
/// kept in the index but their pixels are cut off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Overflow {
    pub ideal_width: u64,
    pub ideal_height: u64,
    pub canvas: Canvas,
    /// Number of placements not entirely inside the canvas.
    pub clipped: usize,
}

/// Result of a packing run: canvas, grid and the ordered name -> placement mapping.
///
/// `frames` holds one entry per distinct key, in input order. A key seen twice
/// keeps the position of its first occurrence and the placement of its last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Atlas {
    pub canvas: Canvas,
    pub grid: GridLayout,
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

impl Atlas {
    /// Looks up a placement by sprite name.
    pub fn get(&self, key: &str) -> Option<&Rect> {
        self.frames.iter().find(|f| f.key == key).map(|f| &f.frame)
    }

    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> PackStats {
        let canvas_area = self.canvas.area();
        let cell_area = self.grid.cell_w as u64 * self.grid.cell_h as u64;
        let mut used_area = 0u64;
        let mut num_clipped = 0usize;
        for f in &self.frames {
            used_area += f.frame.w as u64 * f.frame.h as u64;
            if !f.frame.fits_within(self.canvas) {
                num_clipped += 1;
            }
        }
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        PackStats {
            num_frames: self.frames.len(),
            canvas_area,
            used_area,
            cell_slack_area: (cell_area * self.frames.len() as u64).saturating_sub(used_area),
            occupancy,
            per_row: self.grid.per_row,
            rows: self.grid.rows,
            num_clipped,
        }
    }
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of entries in the index.
    pub num_frames: usize,
    /// Canvas width * height.
    pub canvas_area: u64,
    /// Sum of sprite width * height.
    pub used_area: u64,
    /// Area inside cells not covered by smaller sprites.
    pub cell_slack_area: u64,
    /// used_area / canvas_area (0.0 to 1.0 when nothing is clipped).
    pub occupancy: f64,
    pub per_row: u32,
    pub rows: u32,
    /// Placements not entirely inside the canvas.
    pub num_clipped: usize,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Frames: {}, Grid: {}x{}, Occupancy: {:.2}%, Canvas Area: {} px², Used Area: {} px², Clipped: {}",
            self.num_frames,
            self.per_row,
            self.rows,
            self.occupancy * 100.0,
            self.canvas_area,
            self.used_area,
            self.num_clipped,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
