//! CLI dispatch for the `xbm draw` command.
//!
//! Operations run in a fixed order: clear, set, erase, toggle, shift, mirror.

use std::path::Path;
use std::process::ExitCode;

use crate::error::Result;
use crate::models::Frame;
use crate::terminal::render_frame_text;

use super::{find_frame, find_sprite, finish, open_sheet, store_sheet, Mirror, EXIT_INVALID_ARGS};

/// Edits requested on the command line
#[derive(Debug, Default, Clone)]
pub struct DrawOps {
    pub clear: bool,
    pub set: Vec<(u32, u32)>,
    pub erase: Vec<(u32, u32)>,
    pub toggle: Vec<(u32, u32)>,
    pub shift: Option<(i32, i32)>,
    pub mirror: Option<Mirror>,
}

impl DrawOps {
    pub fn is_empty(&self) -> bool {
        !self.clear
            && self.set.is_empty()
            && self.erase.is_empty()
            && self.toggle.is_empty()
            && self.shift.is_none()
            && self.mirror.is_none()
    }

    /// Apply every operation to `frame`.
    pub fn apply(&self, frame: &Frame) -> Result<()> {
        if self.clear {
            frame.clear();
        }
        for &(x, y) in &self.set {
            frame.set_pixel(x, y, true)?;
        }
        for &(x, y) in &self.erase {
            frame.set_pixel(x, y, false)?;
        }
        for &(x, y) in &self.toggle {
            frame.toggle_pixel(x, y)?;
        }
        if let Some((dx, dy)) = self.shift {
            frame.shift(dx, dy);
        }
        match self.mirror {
            Some(Mirror::Horizontal) => frame.mirror_horizontal(),
            Some(Mirror::Vertical) => frame.mirror_vertical(),
            None => {}
        }
        Ok(())
    }
}

/// Execute the draw command.
pub fn run_draw(
    sheet_path: &Path,
    sprite: &str,
    frame: usize,
    ops: &DrawOps,
    dry_run: bool,
) -> ExitCode {
    finish(draw(sheet_path, sprite, frame, ops, dry_run))
}

fn draw(
    sheet_path: &Path,
    sprite: &str,
    frame: usize,
    ops: &DrawOps,
    dry_run: bool,
) -> std::result::Result<(), ExitCode> {
    if ops.is_empty() {
        eprintln!("Error: nothing to draw (use --set, --erase, --toggle, --clear, --shift or --mirror)");
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;
    let frame_ref = find_frame(&target, frame)?;

    // the first failing coordinate aborts before anything is written
    let before = frame_ref.data();
    ops.apply(&frame_ref).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;

    if dry_run {
        print!("{}", render_frame_text(&frame_ref));
        return Ok(());
    }
    if frame_ref.data() == before {
        println!("No changes.");
        return Ok(());
    }
    store_sheet(&sheet, sheet_path)?;
    eprintln!("Wrote: {}", sheet_path.display());
    Ok(())
}
