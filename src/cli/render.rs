//! Render command implementation

use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use crate::config::CliOverrides;
use crate::gif::render_sprite_gif;
use crate::models::Sprite;
use crate::output::{generate_output_path, save_png, scale_image};
use crate::renderer::render_preview;
use crate::spritesheet::render_sprites;

use super::{find_sprite, finish, load_settings, open_sheet, EXIT_ERROR};

/// What `xbm render` produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One PNG per sprite showing its preview at rest
    Png,
    /// One animated GIF per sprite
    Gif,
    /// One PNG with every frame of the selected sprites
    Spritesheet { cols: Option<u32> },
}

/// Execute the render command
pub fn run_render(
    sheet_path: &Path,
    output: Option<&Path>,
    sprite: Option<&str>,
    mode: RenderMode,
    config: Option<&Path>,
    overrides: &CliOverrides,
) -> ExitCode {
    finish(render(sheet_path, output, sprite, mode, config, overrides))
}

fn render(
    sheet_path: &Path,
    output: Option<&Path>,
    sprite: Option<&str>,
    mode: RenderMode,
    config: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<(), ExitCode> {
    let settings = load_settings(config, overrides)?;
    let palette = settings.render.palette();
    let scale = settings.render.scale;
    let sheet = open_sheet(sheet_path)?;

    let sprites: Vec<Rc<Sprite>> = match sprite {
        Some(name) => vec![find_sprite(&sheet, name)?],
        None => sheet.sprites(),
    };
    if sprites.is_empty() {
        eprintln!("Error: no sprites in '{}'", sheet_path.display());
        return Err(ExitCode::from(EXIT_ERROR));
    }

    let fail = |path: &Path, e: crate::output::OutputError| {
        eprintln!("Error: cannot write '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    };

    if let RenderMode::Spritesheet { cols } = mode {
        let image = scale_image(render_sprites(&sprites, palette, cols), scale);
        let stem = sprite.unwrap_or("sheet");
        let path = generate_output_path(sheet_path, stem, output, true, "png");
        save_png(&image, &path).map_err(|e| fail(&path, e))?;
        println!("Saved: {} ({}x{})", path.display(), image.width(), image.height());
        return Ok(());
    }

    let single = sprites.len() == 1;
    for sprite in &sprites {
        let name = sprite.name();
        match mode {
            RenderMode::Gif => {
                let path = generate_output_path(sheet_path, &name, output, single, "gif");
                let duration = settings.render.frame_duration_ms;
                let frames = render_sprite_gif(sprite, palette, scale, duration, &path)
                    .map_err(|e| fail(&path, e))?;
                println!("Saved: {} ({} frame(s))", path.display(), frames);
            }
            _ => {
                let Some(image) = render_preview(sprite, palette) else {
                    eprintln!("Warning: '{}' has no frames, skipped", name);
                    continue;
                };
                let image = scale_image(image, scale);
                let path = generate_output_path(sheet_path, &name, output, single, "png");
                save_png(&image, &path).map_err(|e| fail(&path, e))?;
                println!("Saved: {}", path.display());
            }
        }
    }
    Ok(())
}
