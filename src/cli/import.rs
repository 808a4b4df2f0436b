//! Import command implementation

use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use crate::import::{load_image, sprite_from_image};

use super::{
    find_frame, find_sprite, finish, open_or_create_sheet, open_sheet, store_sheet, EXIT_ERROR,
    EXIT_INVALID_ARGS,
};

/// Execute the import command
///
/// Without `sprite` a new single-frame sprite sized after the image is added.
/// With `sprite` the image replaces frame `frame` of that sprite and must
/// have the sprite's size.
pub fn run_import(
    image: &Path,
    sheet_path: &Path,
    name: Option<&str>,
    sprite: Option<&str>,
    frame: usize,
) -> ExitCode {
    match sprite {
        Some(sprite) => finish(import_into_frame(image, sheet_path, sprite, frame)),
        None => finish(import_as_sprite(image, sheet_path, name)),
    }
}

fn import_as_sprite(image: &Path, sheet_path: &Path, name: Option<&str>) -> Result<(), ExitCode> {
    // Derive sprite name from filename if not provided
    let name = name
        .map(String::from)
        .unwrap_or_else(|| image.file_stem().unwrap_or_default().to_string_lossy().to_string());

    let sheet = open_or_create_sheet(sheet_path)?;
    let sprite = sprite_from_image(image, &name).map_err(|e| {
        eprintln!("Error: cannot import '{}': {}", image.display(), e);
        ExitCode::from(EXIT_ERROR)
    })?;
    let summary = format!("{} ({}x{})", sprite.name(), sprite.width(), sprite.height());
    sheet.add_sprite(Rc::new(sprite)).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    store_sheet(&sheet, sheet_path)?;
    println!("Imported: {} into {}", summary, sheet_path.display());
    Ok(())
}

fn import_into_frame(
    image: &Path,
    sheet_path: &Path,
    sprite: &str,
    frame: usize,
) -> Result<(), ExitCode> {
    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;
    let frame_ref = find_frame(&target, frame)?;
    let picture = load_image(image).map_err(|e| {
        eprintln!("Error: cannot import '{}': {}", image.display(), e);
        ExitCode::from(EXIT_ERROR)
    })?;
    frame_ref.import_image(&picture).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    store_sheet(&sheet, sheet_path)?;
    println!("Imported: {} into '{}' frame {}", image.display(), sprite, frame);
    Ok(())
}
