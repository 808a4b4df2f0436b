//! Show command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::models::Frame;
use crate::renderer::Palette;
use crate::terminal::{
    render_coordinate_grid, render_frame_ansi, render_frame_blocks, render_frame_text,
};

use super::{find_frame, find_sprite, finish, load_settings, open_sheet, ShowStyle};

/// Execute the show command
pub fn run_show(
    sheet_path: &Path,
    sprite: &str,
    frame: Option<usize>,
    style: ShowStyle,
    config: Option<&Path>,
) -> ExitCode {
    finish(show(sheet_path, sprite, frame, style, config))
}

fn show(
    sheet_path: &Path,
    sprite: &str,
    frame: Option<usize>,
    style: ShowStyle,
    config: Option<&Path>,
) -> Result<(), ExitCode> {
    let palette = match style {
        ShowStyle::Ansi => load_settings(config, &CliOverrides::default())?.render.palette(),
        _ => Palette::default(),
    };
    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;

    let frames = match frame {
        Some(index) => vec![(index, find_frame(&target, index)?)],
        None => target.frames().into_iter().enumerate().collect(),
    };

    println!(
        "{} ({}x{}, {} frame(s), {})",
        target.name(),
        target.width(),
        target.height(),
        target.frame_count(),
        target.preview_mode()
    );
    for (index, frame) in frames {
        println!("frame {}:", index);
        print!("{}", draw(&frame, style, palette));
    }
    Ok(())
}

fn draw(frame: &Frame, style: ShowStyle, palette: Palette) -> String {
    match style {
        ShowStyle::Text => render_frame_text(frame),
        ShowStyle::Grid => render_coordinate_grid(frame),
        ShowStyle::Blocks => render_frame_blocks(frame),
        ShowStyle::Ansi => render_frame_ansi(frame, palette),
    }
}
