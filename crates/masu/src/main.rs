//! masu: split large (annotated) raster images into overlapping training tiles.
//!
//! Walks an input directory tree for JPEG/PNG sources, plans an
//! overlapping tile grid per image, and writes each kept tile into the
//! output directory as `{base}_{index}{extension}`. In annotated mode a
//! source is paired with its `{name}_mask.png` label mask, only tiles
//! whose mask region carries annotation are emitted, and the mask tile is
//! written next to the image tile under the shared index. In plain mode
//! every planned tile is emitted and no masks are involved.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin masu -- -i /path/to/images -o /path/to/tiles
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use masu_io::ScanOptions;
use masu_pipeline::naming::{self, PairedNaming};
use masu_pipeline::{Dimensions, TilingConfig, plan_emissions};

/// Split large training images, so that generating mini-batches is more
/// convenient.
///
/// Every source image is covered by a grid of overlapping tiles; the last
/// tile of each row and column is clamped flush against the image edge.
#[derive(Parser)]
#[command(name = "masu", version)]
struct Cli {
    /// Directory searched recursively for input images.
    #[arg(short = 'i', long)]
    input_directory: PathBuf,

    /// Directory receiving the emitted tiles. Must differ from the input
    /// directory.
    #[arg(short = 'o', long)]
    output_directory: PathBuf,

    /// Upper bound on tile width in pixels.
    #[arg(short = 'w', long, default_value_t = TilingConfig::DEFAULT_MAX_TILE_WIDTH)]
    max_tile_width: u32,

    /// Upper bound on tile height in pixels.
    #[arg(long, default_value_t = TilingConfig::DEFAULT_MAX_TILE_HEIGHT)]
    max_tile_height: u32,

    /// Minimum horizontal overlap between adjacent tiles in pixels.
    #[arg(short = 'x', long, default_value_t = TilingConfig::DEFAULT_OVERLAP_X)]
    overlap_x: u32,

    /// Minimum vertical overlap between adjacent tiles in pixels.
    #[arg(short = 'y', long, default_value_t = TilingConfig::DEFAULT_OVERLAP_Y)]
    overlap_y: u32,

    /// Processing mode.
    #[arg(long, value_enum, default_value_t = Mode::Annotated)]
    mode: Mode,

    /// Suffix locating a source's paired mask (`{name}{suffix}`).
    #[arg(long, default_value = masu_io::MASK_SUFFIX)]
    mask_suffix: String,

    /// File-name suffix excluded from plain-mode scans, so tiles written
    /// by an earlier run are never re-tiled. Repeatable.
    #[arg(long, default_value = masu_io::PROCESSED_SUFFIX)]
    skip_suffix: Vec<String>,

    /// Full tiling config as a JSON string.
    ///
    /// When provided, the individual tile-size and overlap flags are
    /// ignored. The JSON must be a valid `TilingConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Batch processing mode selection.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Pair every source with its `{name}{mask_suffix}` label mask, keep
    /// only tiles whose mask region carries annotation, and write the
    /// mask tile next to the image tile. Sources without a readable mask
    /// are skipped.
    Annotated,
    /// Tile every source as-is: no masks, every planned tile emitted.
    Plain,
}

/// Build a [`TilingConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual tile flags are ignored. Otherwise the config is assembled
/// from the flags.
fn config_from_cli(cli: &Cli) -> Result<TilingConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(TilingConfig {
        max_tile_width: cli.max_tile_width,
        max_tile_height: cli.max_tile_height,
        overlap_x: cli.overlap_x,
        overlap_y: cli.overlap_y,
    })
}

/// Scanner rules for the selected mode: masks are never sources, and
/// plain mode additionally skips already-processed markers.
fn scan_options(cli: &Cli) -> ScanOptions {
    let mut excluded = vec![cli.mask_suffix.clone()];
    if cli.mode == Mode::Plain {
        excluded.extend(cli.skip_suffix.iter().cloned());
    }
    ScanOptions {
        excluded_suffixes: excluded,
        ..ScanOptions::default()
    }
}

/// Report a configuration error through clap, so usage is printed, and
/// fail before any file is touched.
fn usage_error(message: &str) -> ExitCode {
    let mut command = Cli::command();
    let err = command.error(ErrorKind::ValueValidation, message);
    let _ = err.print();
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(config) => config,
        Err(message) => return usage_error(&message),
    };
    if let Err(err) = config.validate() {
        return usage_error(&err.to_string());
    }
    if cli.input_directory == cli.output_directory {
        return usage_error("the input directory must not equal the output directory");
    }
    if !cli.input_directory.is_dir() {
        return usage_error(&format!(
            "input directory {} is not a directory",
            cli.input_directory.display(),
        ));
    }
    if let Err(err) = std::fs::create_dir_all(&cli.output_directory) {
        return usage_error(&format!(
            "cannot create output directory {}: {err}",
            cli.output_directory.display(),
        ));
    }

    println!("Input directory  : {}", cli.input_directory.display());
    println!("Output directory : {}", cli.output_directory.display());

    let sources = masu_io::scan_sources(&cli.input_directory, &scan_options(&cli));
    println!("Found {} files, now splitting ...", sources.len());

    for source in &sources {
        match cli.mode {
            Mode::Annotated => {
                process_annotated(source, &cli.output_directory, &cli.mask_suffix, &config);
            }
            Mode::Plain => process_plain(source, &cli.output_directory, &config),
        }
    }

    ExitCode::SUCCESS
}

/// Split one annotated source: load its paired mask, keep the tiles with
/// annotated content, and write image/mask tile pairs.
///
/// Every failure here is per-file: it is reported and the batch moves on.
fn process_annotated(source: &Path, output_dir: &Path, mask_suffix: &str, config: &TilingConfig) {
    let Some(file_name) = source.file_name().and_then(|name| name.to_str()) else {
        println!(
            "Processing {} - file name is not valid UTF-8, skipping ...",
            source.display(),
        );
        return;
    };

    let Some(mask) = masu_io::resolve_mask(source, mask_suffix) else {
        println!(
            "Processing {} - unable to read mask, skipping ...",
            source.display(),
        );
        return;
    };

    let image = match masu_io::open_image(source) {
        Ok(image) => image,
        Err(err) => {
            println!(
                "Processing {} - unable to read image, skipping ...",
                source.display(),
            );
            eprintln!("{err}");
            return;
        }
    };

    let mask_name = format!("{file_name}{mask_suffix}");
    let namer = match PairedNaming::derive(file_name, &mask_name) {
        Ok(namer) => namer,
        Err(err) => {
            println!("Processing {} - {err}, skipping ...", source.display());
            return;
        }
    };

    let dims = Dimensions::from(&image);
    let plan = match plan_emissions(dims, Some(&mask), config) {
        Ok(plan) => plan,
        Err(err) => {
            println!("Processing {} - {err}, skipping ...", source.display());
            return;
        }
    };
    println!(
        "Processing {}, {dims}, {} channels, {} candidate tiles",
        source.display(),
        image.color().channel_count(),
        plan.planned_tile_count(),
    );

    let mut emitted = 0_usize;
    for record in plan {
        let image_dest = output_dir.join(namer.image_tile_name(record.index));
        if let Err(err) = masu_io::write_tile(&image, record.image_rect, &image_dest) {
            eprintln!("{err}");
            continue;
        }
        // The mask rect always mirrors the image rect geometrically.
        let mask_rect = record.mask_rect.unwrap_or(record.image_rect);
        let mask_dest = output_dir.join(namer.mask_tile_name(record.index));
        if let Err(err) = masu_io::write_tile(&mask, mask_rect, &mask_dest) {
            eprintln!("{err}");
            continue;
        }
        emitted += 1;
    }
    println!("  emitted {emitted} tile pairs");
}

/// Split one source without a mask: every planned tile is emitted.
fn process_plain(source: &Path, output_dir: &Path, config: &TilingConfig) {
    let Some(file_name) = source.file_name().and_then(|name| name.to_str()) else {
        println!(
            "Processing {} - file name is not valid UTF-8, skipping ...",
            source.display(),
        );
        return;
    };

    let image = match masu_io::open_image(source) {
        Ok(image) => image,
        Err(err) => {
            println!(
                "Processing {} - unable to read image, skipping ...",
                source.display(),
            );
            eprintln!("{err}");
            return;
        }
    };

    let (base, extension) = match naming::split_first_dot(file_name) {
        Ok(parts) => parts,
        Err(err) => {
            println!("Processing {} - {err}, skipping ...", source.display());
            return;
        }
    };

    let dims = Dimensions::from(&image);
    let plan = match plan_emissions(dims, None, config) {
        Ok(plan) => plan,
        Err(err) => {
            println!("Processing {} - {err}, skipping ...", source.display());
            return;
        }
    };
    println!(
        "Processing {}, {dims}, {} channels, {} candidate tiles",
        source.display(),
        image.color().channel_count(),
        plan.planned_tile_count(),
    );

    let mut emitted = 0_usize;
    for record in plan {
        let dest = output_dir.join(naming::tile_name(base, record.index, extension));
        if let Err(err) = masu_io::write_tile(&image, record.image_rect, &dest) {
            eprintln!("{err}");
            continue;
        }
        emitted += 1;
    }
    println!("  emitted {emitted} tiles");
}
