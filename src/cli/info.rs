//! Info command implementation

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use super::{finish, open_sheet, EXIT_ERROR};

/// One row of `xbm info --json`
#[derive(Debug, Serialize)]
struct SpriteSummary {
    name: String,
    width: u32,
    height: u32,
    frames: usize,
    bytes_per_frame: usize,
    #[serde(rename = "previewMode")]
    preview_mode: String,
}

/// Execute the info command
pub fn run_info(sheet_path: &Path, json: bool) -> ExitCode {
    finish(info(sheet_path, json))
}

fn info(sheet_path: &Path, json: bool) -> Result<(), ExitCode> {
    let sheet = open_sheet(sheet_path)?;
    let summaries: Vec<SpriteSummary> = sheet
        .sprites()
        .iter()
        .map(|sprite| SpriteSummary {
            name: sprite.name(),
            width: sprite.width(),
            height: sprite.height(),
            frames: sprite.frame_count(),
            bytes_per_frame: sprite.frame_byte_size(),
            preview_mode: sprite.preview_mode().to_string(),
        })
        .collect();

    if json {
        let text = serde_json::to_string_pretty(&summaries).map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}: {} sprite(s)", sheet_path.display(), summaries.len());
    for s in &summaries {
        println!(
            "  {:<16} {:>3}x{:<3} {:>3} frame(s)  {:>4} bytes each  {}",
            s.name, s.width, s.height, s.frames, s.bytes_per_frame, s.preview_mode
        );
    }
    Ok(())
}
