//! Sheet editing commands (new, rename, remove, mode)

use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use crate::codec::Size;
use crate::config::CliOverrides;
use crate::models::{PreviewMode, Sprite};

use super::{
    find_sprite, finish, load_settings, open_or_create_sheet, open_sheet, store_sheet,
    EXIT_ERROR, EXIT_INVALID_ARGS,
};

/// Execute the new command
pub fn run_new(
    sheet_path: &Path,
    name: Option<&str>,
    size: Option<Size>,
    frames: u32,
    config: Option<&Path>,
) -> ExitCode {
    finish(new_sprite(sheet_path, name, size, frames, config))
}

fn new_sprite(
    sheet_path: &Path,
    name: Option<&str>,
    size: Option<Size>,
    frames: u32,
    config: Option<&Path>,
) -> Result<(), ExitCode> {
    let settings = load_settings(config, &CliOverrides::default())?;
    let name = name.unwrap_or(&settings.defaults.name).trim();
    if name.is_empty() {
        eprintln!("Error: sprite name must not be empty");
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    let size =
        size.unwrap_or(Size { width: settings.defaults.width, height: settings.defaults.height });

    let sheet = open_or_create_sheet(sheet_path)?;
    let sprite = Sprite::new(size.width, size.height, name).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    for _ in 0..frames {
        sprite.insert_frame(None);
    }
    if sheet.find(name).is_some() {
        eprintln!("Warning: the sheet already has a sprite named '{}'", name);
    }
    sheet.add_sprite(Rc::new(sprite)).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    store_sheet(&sheet, sheet_path)?;
    println!("Added '{}' ({}, {} frame(s)) to {}", name, size, frames, sheet_path.display());
    Ok(())
}

/// Execute the rename command
pub fn run_rename(sheet_path: &Path, sprite: &str, new_name: &str) -> ExitCode {
    finish(rename_sprite(sheet_path, sprite, new_name))
}

fn rename_sprite(sheet_path: &Path, sprite: &str, new_name: &str) -> Result<(), ExitCode> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        eprintln!("Error: sprite name must not be empty");
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;
    if target.set_name(new_name) {
        store_sheet(&sheet, sheet_path)?;
        println!("Renamed '{}' to '{}'", sprite, new_name);
    } else {
        println!("No changes.");
    }
    Ok(())
}

/// Execute the remove command
pub fn run_remove(sheet_path: &Path, sprite: &str) -> ExitCode {
    finish(remove_sprite(sheet_path, sprite))
}

fn remove_sprite(sheet_path: &Path, sprite: &str) -> Result<(), ExitCode> {
    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;
    sheet.remove_sprite(&target).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    store_sheet(&sheet, sheet_path)?;
    println!("Removed '{}' ({} sprite(s) left)", sprite, sheet.len());
    Ok(())
}

/// Execute the mode command
pub fn run_mode(sheet_path: &Path, sprite: &str, mode: Option<PreviewMode>) -> ExitCode {
    finish(set_mode(sheet_path, sprite, mode))
}

fn set_mode(sheet_path: &Path, sprite: &str, mode: Option<PreviewMode>) -> Result<(), ExitCode> {
    let sheet = open_sheet(sheet_path)?;
    let target = find_sprite(&sheet, sprite)?;
    let mode = mode.unwrap_or_else(|| target.preview_mode().next());
    if target.set_preview_mode(mode) {
        store_sheet(&sheet, sheet_path)?;
    }
    println!("{}: {}", target.name(), mode);
    Ok(())
}
