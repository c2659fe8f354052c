use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use grid_atlas_core::{AtlasIndex, PackOutput, PackerConfig, pack_images, write_png};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

mod source;

use source::{SourceFilter, gather_sprite_paths, load_sprites};

const DEFAULT_INPUT_DIR: &str = "./cards";
const DEFAULT_OUTPUT_PNG: &str = "cards.png";
const DEFAULT_OUTPUT_JSON: &str = "cards.json";

#[derive(Parser, Debug)]
#[command(
    name = "grid-atlas",
    about = "Pack a folder of same-size sprites into a PNG atlas and a JSON frame index",
    version,
    author
)]
struct Cli {
    // Input/Output
    /// Directory holding the sprite images [default: ./cards]
    #[arg(short, long, help_heading = "Input/Output")]
    input: Option<PathBuf>,
    /// Atlas image path [default: cards.png]
    #[arg(long, help_heading = "Input/Output")]
    out_png: Option<PathBuf>,
    /// Frame index path [default: cards.json]
    #[arg(long, help_heading = "Input/Output")]
    out_json: Option<PathBuf>,
    /// YAML config file; explicit flags take precedence over its values
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// File-name patterns to include (glob, case-insensitive) [default: *.png]
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// File-name patterns to exclude (glob, case-insensitive)
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Maximum atlas width and height in pixels [default: 4096]
    #[arg(long, help_heading = "Layout")]
    max_dimension: Option<u32>,
    /// Pixels between sprites and around the border [default: 2]
    #[arg(long, help_heading = "Layout")]
    padding: Option<u32>,

    // Export
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after YAML/flags) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,

    // Logging/UX
    /// Show a progress bar while decoding (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct RunConfig {
    input_dir: PathBuf,
    out_png: PathBuf,
    out_json: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
    #[serde(flatten)]
    packer: PackerConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            out_png: PathBuf::from(DEFAULT_OUTPUT_PNG),
            out_json: PathBuf::from(DEFAULT_OUTPUT_JSON),
            include: Vec::new(),
            exclude: Vec::new(),
            packer: PackerConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    input_dir: Option<PathBuf>,
    out_png: Option<PathBuf>,
    out_json: Option<PathBuf>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    max_dimension: Option<u32>,
    padding: Option<u32>,
}

impl YamlConfig {
    fn apply(self, cfg: &mut RunConfig) {
        if let Some(v) = self.input_dir {
            cfg.input_dir = v;
        }
        if let Some(v) = self.out_png {
            cfg.out_png = v;
        }
        if let Some(v) = self.out_json {
            cfg.out_json = v;
        }
        if let Some(v) = self.include {
            cfg.include = v;
        }
        if let Some(v) = self.exclude {
            cfg.exclude = v;
        }
        if let Some(v) = self.max_dimension {
            cfg.packer.max_dimension = v;
        }
        if let Some(v) = self.padding {
            cfg.packer.padding = v;
        }
    }
}

/// Defaults, then the YAML file, then explicit flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut cfg = RunConfig::default();
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        y.apply(&mut cfg);
    }
    if let Some(v) = &cli.input {
        cfg.input_dir = v.clone();
    }
    if let Some(v) = &cli.out_png {
        cfg.out_png = v.clone();
    }
    if let Some(v) = &cli.out_json {
        cfg.out_json = v.clone();
    }
    if !cli.include.is_empty() {
        cfg.include = cli.include.clone();
    }
    if !cli.exclude.is_empty() {
        cfg.exclude = cli.exclude.clone();
    }
    if let Some(v) = cli.max_dimension {
        cfg.packer.max_dimension = v;
    }
    if let Some(v) = cli.padding {
        cfg.packer.padding = v;
    }
    cfg.packer.validate()?;
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let cfg = resolve_config(&cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let out = run(&cfg, cli.progress && !cli.quiet, cli.dry_run)?;

    if let Some(stats_path) = &cli.export_stats {
        let stats = out.stats();
        if cli.dry_run {
            println!("{}", stats.summary());
        } else {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        }
    }
    Ok(())
}

/// Discover, decode, pack and (unless `dry_run`) write both outputs.
/// Nothing is written when any step before writing fails.
fn run(cfg: &RunConfig, show_progress: bool, dry_run: bool) -> anyhow::Result<PackOutput> {
    let filter = SourceFilter::new(&cfg.include, &cfg.exclude)?;
    let paths = gather_sprite_paths(&cfg.input_dir, &filter)
        .with_context(|| format!("scan {}", cfg.input_dir.display()))?;

    println!("Packing {} images -> {}", paths.len(), cfg.out_png.display());
    let inputs = load_sprites(&paths, show_progress)?;
    info!(count = inputs.len(), "loaded input images");

    let out = pack_images(inputs, cfg.packer)?;
    if let Some(overflow) = &out.atlas.overflow {
        warn!(
            clipped = overflow.clipped,
            "{} sprite(s) do not fit in the {}x{} atlas",
            overflow.clipped,
            overflow.canvas.width,
            overflow.canvas.height
        );
    }
    let stats = out.stats();
    info!(
        frames = stats.num_frames,
        per_row = stats.per_row,
        rows = stats.rows,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    if dry_run {
        return Ok(out);
    }

    ensure_parent(&cfg.out_png)?;
    let file = File::create(&cfg.out_png)
        .with_context(|| format!("create {}", cfg.out_png.display()))?;
    let mut writer = BufWriter::new(file);
    write_png(&out.rgba, &mut writer)
        .and_then(|_| writer.flush().map_err(Into::into))
        .with_context(|| format!("write {}", cfg.out_png.display()))?;
    info!(png_path = ?cfg.out_png, "wrote atlas image");

    ensure_parent(&cfg.out_json)?;
    let json = AtlasIndex::from_atlas(&out.atlas).to_json_string()?;
    fs::write(&cfg.out_json, json).with_context(|| format!("write {}", cfg.out_json.display()))?;
    info!(json_path = ?cfg.out_json, frames = out.atlas.frames.len(), "wrote frame index");

    println!(
        "Done -> {}  ({}x{})",
        cfg.out_png.display(),
        out.atlas.canvas.width,
        out.atlas.canvas.height
    );
    println!("JSON -> {}", cfg.out_json.display());
    Ok(out)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("create output directory {}", dir.display())),
        _ => Ok(()),
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_atlas_core::Rect;
    use image::{Rgba, RgbaImage};

    fn write_sprite(dir: &Path, name: &str, w: u32, h: u32) {
        RgbaImage::from_pixel(w, h, Rgba([200, 10, 10, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    fn config_in(root: &Path) -> RunConfig {
        RunConfig {
            input_dir: root.join("cards"),
            out_png: root.join("out").join("cards.png"),
            out_json: root.join("out").join("cards.json"),
            ..Default::default()
        }
    }

    #[test]
    fn writes_atlas_and_index() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        fs::create_dir(&cfg.input_dir).unwrap();
        write_sprite(&cfg.input_dir, "two.png", 16, 24);
        write_sprite(&cfg.input_dir, "ace.png", 16, 24);

        let out = run(&cfg, false, false).unwrap();
        assert_eq!(out.atlas.frames[0].key, "ace.png");

        let png = image::open(&cfg.out_png).unwrap().to_rgba8();
        assert_eq!(png.dimensions(), (out.atlas.canvas.width, out.atlas.canvas.height));
        assert_eq!(png.get_pixel(2, 2), &Rgba([200, 10, 10, 255]));
        assert_eq!(png.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));

        let index = AtlasIndex::from_json_str(&fs::read_to_string(&cfg.out_json).unwrap()).unwrap();
        assert_eq!(index.get("ace.png"), Some(&Rect::new(2, 2, 16, 24)));
        assert_eq!(index.get("two.png"), Some(&Rect::new(20, 2, 16, 24)));
    }

    #[test]
    fn empty_directory_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        fs::create_dir(&cfg.input_dir).unwrap();

        let err = run(&cfg, false, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<grid_atlas_core::AtlasError>(),
            Some(grid_atlas_core::AtlasError::Empty)
        ));
        assert!(!cfg.out_png.exists());
        assert!(!cfg.out_json.exists());
    }

    #[test]
    fn missing_directory_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());

        let err = run(&cfg, false, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<grid_atlas_core::AtlasError>(),
            Some(grid_atlas_core::AtlasError::InputDirectoryMissing(_))
        ));
        assert!(!cfg.out_png.exists());
    }

    #[test]
    fn too_large_sprite_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config_in(tmp.path());
        cfg.packer.max_dimension = 32;
        fs::create_dir(&cfg.input_dir).unwrap();
        write_sprite(&cfg.input_dir, "wide.png", 40, 8);

        let err = run(&cfg, false, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<grid_atlas_core::AtlasError>(),
            Some(grid_atlas_core::AtlasError::TooLarge { .. })
        ));
        assert!(!cfg.out_png.exists());
        assert!(!cfg.out_json.exists());
    }

    #[test]
    fn dry_run_does_not_write() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        fs::create_dir(&cfg.input_dir).unwrap();
        write_sprite(&cfg.input_dir, "a.png", 4, 4);

        let out = run(&cfg, false, true).unwrap();
        assert_eq!(out.atlas.frames.len(), 1);
        assert!(!cfg.out_png.exists());
    }

    #[test]
    fn flags_override_yaml_which_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let yaml = tmp.path().join("atlas.yaml");
        fs::write(&yaml, "padding: 0\nmax_dimension: 1024\ninput_dir: sprites\n").unwrap();

        let cli = Cli::parse_from([
            "grid-atlas",
            "--config",
            yaml.to_str().unwrap(),
            "--max-dimension",
            "2048",
        ]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.packer.padding, 0);
        assert_eq!(cfg.packer.max_dimension, 2048);
        assert_eq!(cfg.input_dir, PathBuf::from("sprites"));
        assert_eq!(cfg.out_png, PathBuf::from(DEFAULT_OUTPUT_PNG));
    }

    #[test]
    fn zero_arguments_use_card_defaults() {
        let cli = Cli::parse_from(["grid-atlas"]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.input_dir, PathBuf::from("./cards"));
        assert_eq!(cfg.packer.max_dimension, 4096);
        assert_eq!(cfg.packer.padding, 2);
    }

    #[test]
    fn unknown_yaml_key_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let yaml = tmp.path().join("atlas.yaml");
        fs::write(&yaml, "paddin: 3\n").unwrap();
        let cli = Cli::parse_from(["grid-atlas", "--config", yaml.to_str().unwrap()]);
        assert!(resolve_config(&cli).is_err());
    }
}
