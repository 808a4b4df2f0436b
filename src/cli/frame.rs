//! Frame management commands (`xbm frame add|copy|remove|move`)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Subcommand;

use crate::models::Sprite;

use super::{find_frame, find_sprite, finish, open_sheet, store_sheet, EXIT_INVALID_ARGS};

#[derive(Subcommand)]
pub enum FrameAction {
    /// Insert a blank frame
    Add {
        /// Sheet document
        sheet: PathBuf,
        /// Sprite name
        #[arg(short, long)]
        sprite: String,
        /// Insert position (default: append)
        #[arg(long)]
        at: Option<usize>,
    },
    /// Duplicate a frame; the copy follows the original
    Copy {
        /// Sheet document
        sheet: PathBuf,
        /// Sprite name
        #[arg(short, long)]
        sprite: String,
        /// Index of the frame to copy
        index: usize,
    },
    /// Delete a frame (a sprite keeps at least one)
    Remove {
        /// Sheet document
        sheet: PathBuf,
        /// Sprite name
        #[arg(short, long)]
        sprite: String,
        /// Index of the frame to delete
        index: usize,
    },
    /// Move a frame to another position
    Move {
        /// Sheet document
        sheet: PathBuf,
        /// Sprite name
        #[arg(short, long)]
        sprite: String,
        /// Current index
        from: usize,
        /// New index
        to: usize,
    },
}

/// Execute a frame command
pub fn run_frame(action: FrameAction) -> ExitCode {
    match action {
        FrameAction::Add { sheet, sprite, at } => {
            finish(edit_frames(&sheet, &sprite, |target| {
                let index = at.unwrap_or(target.frame_count()).min(target.frame_count());
                target.insert_frame(Some(index));
                Ok(format!("added frame {}", index))
            }))
        }
        FrameAction::Copy { sheet, sprite, index } => finish(edit_frames(&sheet, &sprite, |target| {
            target.copy_frame(index).map_err(report)?;
            Ok(format!("copied frame {} to {}", index, index + 1))
        })),
        FrameAction::Remove { sheet, sprite, index } => {
            finish(edit_frames(&sheet, &sprite, |target| {
                let frame = find_frame(target, index)?;
                if target.is_single_frame() {
                    eprintln!("Error: cannot remove the only frame of '{}'", target.name());
                    return Err(ExitCode::from(EXIT_INVALID_ARGS));
                }
                target.remove_frame(&frame).map_err(report)?;
                Ok(format!("removed frame {}", index))
            }))
        }
        FrameAction::Move { sheet, sprite, from, to } => {
            finish(edit_frames(&sheet, &sprite, |target| {
                target.move_frame(from, to).map_err(report)?;
                Ok(format!("moved frame {} to {}", from, to))
            }))
        }
    }
}

fn report(e: crate::error::XbmError) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::from(EXIT_INVALID_ARGS)
}

/// Load the sheet, run `edit` on the named sprite and save on success.
fn edit_frames(
    sheet_path: &Path,
    sprite: &str,
    edit: impl FnOnce(&Sprite) -> Result<String, ExitCode>,
) -> Result<(), ExitCode> {
    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;
    let message = edit(&target)?;
    store_sheet(&sheet, sheet_path)?;
    println!("{}: {} ({} frame(s))", target.name(), message, target.frame_count());
    Ok(())
}
