//! Spritesheet rendering - combines rendered frames into a grid layout

use std::rc::Rc;

use image::RgbaImage;

use crate::color::TRANSPARENT;
use crate::models::{Sheet, Sprite};
use crate::renderer::{render_frame, Palette};

/// Render multiple frames into a spritesheet grid.
///
/// `cols` defaults to a single row. Cells are as large as the largest frame;
/// smaller frames sit in the top-left corner of their cell and the rest of
/// the cell stays transparent.
///
/// # Examples
///
/// ```
/// use image::RgbaImage;
/// use xbm_editor::spritesheet::render_spritesheet;
///
/// let frame = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
/// let frames = vec![frame.clone(), frame.clone(), frame.clone(), frame];
///
/// let sheet = render_spritesheet(&frames, None);
/// assert_eq!(sheet.dimensions(), (8, 2));
///
/// let sheet = render_spritesheet(&frames, Some(2));
/// assert_eq!(sheet.dimensions(), (4, 4));
/// ```
pub fn render_spritesheet(frames: &[RgbaImage], cols: Option<u32>) -> RgbaImage {
    if frames.is_empty() {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let cell_width = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let cell_height = frames.iter().map(|f| f.height()).max().unwrap_or(1);

    let count = frames.len() as u32;
    let columns = cols.unwrap_or(count).clamp(1, count);
    let rows = count.div_ceil(columns);

    let mut sheet = RgbaImage::from_pixel(columns * cell_width, rows * cell_height, TRANSPARENT);
    for (i, frame) in frames.iter().enumerate() {
        let dest_x = (i as u32 % columns) * cell_width;
        let dest_y = (i as u32 / columns) * cell_height;
        for (x, y, pixel) in frame.enumerate_pixels() {
            sheet.put_pixel(dest_x + x, dest_y + y, *pixel);
        }
    }
    sheet
}

/// Render every sprite of a sheet into one grid.
///
/// Each sprite contributes its frames in order, so an animation reads left
/// to right. Sprites without frames are skipped.
pub fn render_sheet(sheet: &Sheet, palette: Palette, cols: Option<u32>) -> RgbaImage {
    render_sprites(&sheet.sprites(), palette, cols)
}

/// Like [`render_sheet`] for an arbitrary selection of sprites.
pub fn render_sprites(sprites: &[Rc<Sprite>], palette: Palette, cols: Option<u32>) -> RgbaImage {
    let frames: Vec<RgbaImage> = sprites
        .iter()
        .flat_map(|sprite| sprite.frames())
        .map(|frame| render_frame(&frame, palette))
        .collect();
    log::debug!("rendering {} frames into a spritesheet", frames.len());
    render_spritesheet(&frames, cols)
}
