//! GIF animation rendering

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::models::Sprite;
use crate::output::OutputError;
use crate::renderer::{render_frame, Palette};

/// Render a sequence of images as an animated GIF.
///
/// `duration_ms` is rounded down to the GIF resolution of 10ms (at least 10ms).
/// Nothing is written when `frames` is empty.
pub fn render_gif(
    frames: &[RgbaImage],
    duration_ms: u32,
    loop_anim: bool,
    path: &Path,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(if loop_anim { Repeat::Infinite } else { Repeat::Finite(0) })?;

    // GIF delays are in centiseconds
    let delay_ms = (duration_ms / 10).max(1) * 10;
    for image in frames {
        let frame = Frame::from_parts(image.clone(), 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(frame)?;
    }
    Ok(())
}

/// Animate a sprite the way its preview mode plays it.
///
/// `Loop` and `Tile` play the frames in order, `Alternate` plays them
/// back and forth, and `First` produces a still image of frame 0.
/// Returns the number of GIF frames written.
pub fn render_sprite_gif(
    sprite: &Sprite,
    palette: Palette,
    scale: u8,
    duration_ms: u32,
    path: &Path,
) -> Result<usize, OutputError> {
    let rendered: Vec<RgbaImage> = sprite
        .frames()
        .iter()
        .map(|frame| crate::output::scale_image(render_frame(frame, palette), scale))
        .collect();
    let sequence: Vec<RgbaImage> = sprite
        .preview_mode()
        .sequence(rendered.len())
        .into_iter()
        .map(|index| rendered[index].clone())
        .collect();
    log::debug!("'{}': {} gif frames", sprite.name(), sequence.len());
    render_gif(&sequence, duration_ms, sequence.len() > 1, path)?;
    Ok(sequence.len())
}
