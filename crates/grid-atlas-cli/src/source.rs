use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use grid_atlas_core::{AtlasError, InputImage};
use image::ImageReader;
use tracing::debug;
use walkdir::WalkDir;

/// File-name patterns deciding which files in the input directory are sprites.
pub struct SourceFilter {
    include: GlobSet,
    exclude: Option<GlobSet>,
}

impl SourceFilter {
    /// Patterns are matched case-insensitively against the bare file name.
    /// An empty `include` means `*.png`.
    pub fn new(include: &[String], exclude: &[String]) -> anyhow::Result<Self> {
        let include = if include.is_empty() {
            build_set(&["*.png".to_string()])?
        } else {
            build_set(include)?
        };
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_set(exclude)?)
        };
        Ok(Self { include, exclude })
    }

    fn accepts(&self, file_name: &str) -> bool {
        if file_name.starts_with('.') {
            return false;
        }
        if let Some(ex) = &self.exclude {
            if ex.is_match(file_name) {
                return false;
            }
        }
        self.include.is_match(file_name)
    }
}

fn build_set(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid pattern {pat}"))?;
        b.add(glob);
    }
    Ok(b.build()?)
}

/// Lists the sprite files directly inside `dir`, sorted by file name.
///
/// The sort is the placement order, so it is part of the output contract.
/// Subdirectories are not searched.
pub fn gather_sprite_paths(dir: &Path, filter: &SourceFilter) -> Result<Vec<PathBuf>, AtlasError> {
    if !dir.is_dir() {
        return Err(AtlasError::InputDirectoryMissing(dir.to_path_buf()));
    }
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if filter.accepts(&entry.file_name().to_string_lossy()) {
            list.push(entry.into_path());
        }
    }
    if list.is_empty() {
        return Err(AtlasError::Empty);
    }
    list.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(count = list.len(), dir = %dir.display(), "sprite files found");
    Ok(list)
}

/// Sprite name for a source file: its file name, extension included.
pub fn sprite_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Decodes every file in order. Any unreadable image aborts the run.
pub fn load_sprites(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let key = sprite_name(p);
        if let Some(b) = &bar {
            b.set_message(key.clone());
        }
        let image = ImageReader::open(p)
            .and_then(|r| r.with_guessed_format())
            .with_context(|| format!("open {}", p.display()))?
            .decode()
            .with_context(|| format!("decode {}", p.display()))?;
        list.push(InputImage { key, image });
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}
