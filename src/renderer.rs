//! Frame rendering to image buffers

use image::{Rgba, RgbaImage};

use crate::models::{Frame, Sprite};
use crate::spritesheet::render_spritesheet;

/// Colors used for set and cleared pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub on: Rgba<u8>,
    pub off: Rgba<u8>,
}

impl Default for Palette {
    /// Black ink on a white background.
    fn default() -> Self {
        Self { on: crate::color::BLACK, off: crate::color::WHITE }
    }
}

/// Render a frame to an RGBA image of the frame's size.
///
/// # Examples
///
/// ```
/// use xbm_editor::codec::Size;
/// use xbm_editor::models::Frame;
/// use xbm_editor::renderer::{render_frame, Palette};
///
/// let frame = Frame::new(Size::new(3, 2).unwrap());
/// frame.set_pixel(1, 1, true).unwrap();
///
/// let image = render_frame(&frame, Palette::default());
/// assert_eq!(image.dimensions(), (3, 2));
/// assert_eq!(*image.get_pixel(1, 1), image::Rgba([0, 0, 0, 255]));
/// assert_eq!(*image.get_pixel(0, 0), image::Rgba([255, 255, 255, 255]));
/// ```
pub fn render_frame(frame: &Frame, palette: Palette) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(frame.width(), frame.height(), palette.off);
    for (y, row) in frame.pixels().iter().enumerate() {
        for (x, &on) in row.iter().enumerate() {
            if on {
                image.put_pixel(x as u32, y as u32, palette.on);
            }
        }
    }
    image
}

/// Render every frame of a sprite, in order.
pub fn render_frames(sprite: &Sprite, palette: Palette) -> Vec<RgbaImage> {
    sprite.frames().iter().map(|frame| render_frame(frame, palette)).collect()
}

/// Render a sprite the way its preview mode shows it at rest.
///
/// `Tile` lays all frames out in a row; every other mode shows the frame
/// of the first animation step. A sprite without frames yields `None`.
pub fn render_preview(sprite: &Sprite, palette: Palette) -> Option<RgbaImage> {
    let mode = sprite.preview_mode();
    match mode.frame_index(0, sprite.frame_count()) {
        Some(index) => sprite.frame(index).map(|frame| render_frame(&frame, palette)),
        None if sprite.frame_count() > 0 => {
            Some(render_spritesheet(&render_frames(sprite, palette), None))
        }
        None => None,
    }
}
