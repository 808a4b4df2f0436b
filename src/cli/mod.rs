//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations. Every command works on a sheet
//! document (`*.json`) and writes it back in place.

mod draw;
mod edit;
mod export;
mod frame;
mod import;
mod info;
mod render;
mod show;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand, ValueEnum};

use crate::codec::Size;
use crate::config::{self, CliOverrides, XbmConfig};
use crate::models::{Frame, PreviewMode, Sheet, Sprite};
use crate::output;
use crate::suggest::unknown_sprite_message;

// Re-export subcommand types used in Commands enum
pub use frame::FrameAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// XBM sprite sheets - edit monochrome bitmaps and export them as C arrays
#[derive(Parser)]
#[command(name = "xbm")]
#[command(about = "Edit monochrome XBM sprite sheets and export them as C arrays")]
#[command(version)]
pub struct Cli {
    /// Config file (default: xbm.toml found from the working directory up)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Mirror axis for `draw --mirror`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mirror {
    /// Flip left to right
    Horizontal,
    /// Flip top to bottom
    Vertical,
}

/// Output style for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShowStyle {
    /// `#` and `.` per pixel
    #[default]
    Text,
    /// Text with coordinate rulers
    Grid,
    /// Half-block characters, two rows per line
    Blocks,
    /// Half blocks in 24-bit color
    Ansi,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a sprite with blank frames (creates the sheet if needed)
    New {
        /// Sheet document
        sheet: PathBuf,

        /// Sprite name (default from config, "untitled")
        #[arg(short, long)]
        name: Option<String>,

        /// Sprite size as WxH, e.g. 8x14 (default from config, 8x8)
        #[arg(short, long, value_parser = parse_size)]
        size: Option<Size>,

        /// Number of blank frames
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=256))]
        frames: u32,
    },

    /// List the sprites of a sheet
    Info {
        /// Sheet document
        sheet: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export sprites as C source (stdout unless -o is given)
    Export {
        /// Sheet document
        sheet: PathBuf,

        /// Output file (.h / .c)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export the sprite with this name
        #[arg(short, long)]
        sprite: Option<String>,

        /// Byte entries per line
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=256))]
        entries_per_line: Option<u32>,

        /// Omit the header comment
        #[arg(long)]
        no_header: bool,
    },

    /// Import an image (red channel > 0x7F is "on")
    Import {
        /// Image file (PNG, GIF, BMP, ...)
        image: PathBuf,

        /// Sheet document (created if missing)
        #[arg(long)]
        sheet: PathBuf,

        /// Name of the new sprite (default: image file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite a frame of this existing sprite instead of adding one
        #[arg(short, long, conflicts_with = "name")]
        sprite: Option<String>,

        /// Frame index used with --sprite
        #[arg(short, long, default_value = "0", requires = "sprite")]
        frame: usize,
    },

    /// Edit pixels of one frame
    Draw {
        /// Sheet document
        sheet: PathBuf,

        /// Sprite to edit
        #[arg(short, long)]
        sprite: String,

        /// Frame index
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Clear the frame first
        #[arg(long)]
        clear: bool,

        /// Set a pixel: x,y (repeatable)
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        set: Vec<(u32, u32)>,

        /// Clear a pixel: x,y (repeatable)
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        erase: Vec<(u32, u32)>,

        /// Toggle a pixel: x,y (repeatable)
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        toggle: Vec<(u32, u32)>,

        /// Shift with wrap-around: dx,dy
        #[arg(long, value_name = "DX,DY", value_parser = parse_offset, allow_hyphen_values = true)]
        shift: Option<(i32, i32)>,

        /// Mirror the frame
        #[arg(long, value_enum)]
        mirror: Option<Mirror>,

        /// Print the result without writing the sheet
        #[arg(long)]
        dry_run: bool,
    },

    /// Add, copy, remove or reorder frames
    Frame {
        #[command(subcommand)]
        action: FrameAction,
    },

    /// Rename a sprite
    Rename {
        /// Sheet document
        sheet: PathBuf,
        /// Current name
        sprite: String,
        /// New name
        new_name: String,
    },

    /// Remove a sprite from the sheet
    Remove {
        /// Sheet document
        sheet: PathBuf,
        /// Sprite name
        sprite: String,
    },

    /// Set a sprite's preview mode (cycles to the next one when omitted)
    Mode {
        /// Sheet document
        sheet: PathBuf,
        /// Sprite name
        sprite: String,
        /// New preview mode
        #[arg(value_enum)]
        mode: Option<PreviewMode>,
    },

    /// Print a sprite to the terminal
    Show {
        /// Sheet document
        sheet: PathBuf,

        /// Sprite name
        #[arg(short, long)]
        sprite: String,

        /// Only show this frame (default: every frame)
        #[arg(short, long)]
        frame: Option<usize>,

        /// Output style
        #[arg(long, value_enum, default_value_t)]
        style: ShowStyle,
    },

    /// Render sprites to PNG (or GIF / spritesheet)
    Render {
        /// Sheet document
        sheet: PathBuf,

        /// Output file or directory.
        /// If omitted: {sheet}_{sprite}.png
        /// If file (single sprite): output.png
        /// If file (multiple): output_{sprite}.png
        /// If directory (ends with /): dir/{sprite}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only render the sprite with this name
        #[arg(short, long)]
        sprite: Option<String>,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: Option<u8>,

        /// Animated GIF following each sprite's preview mode
        #[arg(long, conflicts_with = "spritesheet")]
        gif: bool,

        /// All frames of all sprites in one image
        #[arg(long)]
        spritesheet: bool,

        /// Spritesheet columns (default: one row)
        #[arg(long, requires = "spritesheet")]
        cols: Option<u32>,

        /// GIF frame delay in milliseconds
        #[arg(long)]
        duration: Option<u32>,

        /// Color of set pixels (#RRGGBB, black, white, transparent)
        #[arg(long)]
        on_color: Option<String>,

        /// Color of clear pixels
        #[arg(long)]
        off_color: Option<String>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::New { sheet, name, size, frames } => {
            edit::run_new(&sheet, name.as_deref(), size, frames, config_path)
        }
        Commands::Info { sheet, json } => info::run_info(&sheet, json),
        Commands::Export { sheet, output, sprite, entries_per_line, no_header } => {
            let overrides = CliOverrides {
                entries_per_line: entries_per_line.map(|n| n as usize),
                no_header,
                ..Default::default()
            };
            export::run_export(&sheet, output.as_deref(), sprite.as_deref(), config_path, &overrides)
        }
        Commands::Import { image, sheet, name, sprite, frame } => {
            import::run_import(&image, &sheet, name.as_deref(), sprite.as_deref(), frame)
        }
        Commands::Draw { sheet, sprite, frame, clear, set, erase, toggle, shift, mirror, dry_run } => {
            let ops = draw::DrawOps { clear, set, erase, toggle, shift, mirror };
            draw::run_draw(&sheet, &sprite, frame, &ops, dry_run)
        }
        Commands::Frame { action } => frame::run_frame(action),
        Commands::Rename { sheet, sprite, new_name } => edit::run_rename(&sheet, &sprite, &new_name),
        Commands::Remove { sheet, sprite } => edit::run_remove(&sheet, &sprite),
        Commands::Mode { sheet, sprite, mode } => edit::run_mode(&sheet, &sprite, mode),
        Commands::Show { sheet, sprite, frame, style } => {
            show::run_show(&sheet, &sprite, frame, style, config_path)
        }
        Commands::Render {
            sheet,
            output,
            sprite,
            scale,
            gif,
            spritesheet,
            cols,
            duration,
            on_color,
            off_color,
        } => {
            let overrides = CliOverrides {
                scale,
                frame_duration_ms: duration,
                on_color,
                off_color,
                ..Default::default()
            };
            let mode = if gif {
                render::RenderMode::Gif
            } else if spritesheet {
                render::RenderMode::Spritesheet { cols }
            } else {
                render::RenderMode::Png
            };
            render::run_render(&sheet, output.as_deref(), sprite.as_deref(), mode, config_path, &overrides)
        }
    }
}

/// Parse `x,y` pixel coordinates.
pub(crate) fn parse_point(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x coordinate '{}'", x))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y coordinate '{}'", y))?;
    Ok((x, y))
}

/// Parse a signed `dx,dy` offset.
pub(crate) fn parse_offset(s: &str) -> Result<(i32, i32), String> {
    let (dx, dy) = s.split_once(',').ok_or_else(|| format!("expected DX,DY, got '{}'", s))?;
    let dx = dx.trim().parse().map_err(|_| format!("invalid x offset '{}'", dx))?;
    let dy = dy.trim().parse().map_err(|_| format!("invalid y offset '{}'", dy))?;
    Ok((dx, dy))
}

pub(crate) fn parse_size(s: &str) -> Result<Size, String> {
    Size::parse(s).map_err(|e| e.to_string())
}

/// Load `xbm.toml` (explicit or discovered) and apply CLI overrides.
pub(crate) fn load_settings(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<XbmConfig, ExitCode> {
    let mut settings = config::load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    config::merge_cli_overrides(&mut settings, overrides);
    let errors = settings.validate();
    if let Some(first) = errors.first() {
        eprintln!("Error: {}", first);
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    Ok(settings)
}

/// Load a sheet document, reporting failures.
pub(crate) fn open_sheet(path: &Path) -> Result<Sheet, ExitCode> {
    output::load_sheet(path).map_err(|e| {
        eprintln!("Error: cannot load '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Load a sheet document, or start an empty sheet when the file is missing.
pub(crate) fn open_or_create_sheet(path: &Path) -> Result<Sheet, ExitCode> {
    if path.exists() {
        open_sheet(path)
    } else {
        log::info!("creating new sheet {}", path.display());
        Ok(Sheet::default())
    }
}

pub(crate) fn store_sheet(sheet: &Sheet, path: &Path) -> Result<(), ExitCode> {
    output::save_sheet(sheet, path).map_err(|e| {
        eprintln!("Error: cannot write '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Look up a sprite by name, suggesting close matches on failure.
pub(crate) fn find_sprite(sheet: &Sheet, name: &str) -> Result<Rc<Sprite>, ExitCode> {
    sheet.find(name).ok_or_else(|| {
        eprintln!("Error: {}", unknown_sprite_message(sheet, name));
        ExitCode::from(EXIT_ERROR)
    })
}

pub(crate) fn find_frame(sprite: &Sprite, index: usize) -> Result<Rc<Frame>, ExitCode> {
    sprite.frame(index).ok_or_else(|| {
        eprintln!(
            "Error: sprite '{}' has {} frame(s), no frame {}",
            sprite.name(),
            sprite.frame_count(),
            index
        );
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Collapse a command body returning `Result<(), ExitCode>` into an exit code.
pub(crate) fn finish(result: Result<(), ExitCode>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => code,
    }
}
