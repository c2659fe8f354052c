use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Input directory not found: {}", .0.display())]
    InputDirectoryMissing(PathBuf),
    #[error("No eligible images to pack")]
    Empty,
    #[error(
        "Sprite cell {cell_w}x{cell_h} with padding {padding} does not fit in a {max_dimension}px atlas"
    )]
    TooLarge {
        cell_w: u32,
        cell_h: u32,
        padding: u32,
        max_dimension: u32,
    },
    #[error("Invalid atlas dimension: {max_dimension}")]
    InvalidDimensions { max_dimension: u32 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
