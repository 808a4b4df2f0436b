//! Image import: turn raster images into packed XBM frames.
//!
//! A pixel is set when its red channel is above [`RED_THRESHOLD`]. Alpha and
//! the other channels are ignored, so black-on-white and white-on-black
//! artwork both need to be drawn with "on" pixels in a bright red-ish tone.

use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::codec::{self, Size};
use crate::error::{Result, XbmError};
use crate::models::Sprite;

/// Red values strictly above this count as "on".
pub const RED_THRESHOLD: u8 = 0x7F;

/// Pack `image` into the byte layout of a `size` frame.
///
/// The image must be exactly `size`; scaling is left to the caller.
pub fn rasterize(image: &DynamicImage, size: Size) -> Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width != size.width || height != size.height {
        return Err(XbmError::invariant(format!(
            "image is {}x{}, frame is {}",
            width, height, size
        )));
    }
    let rgba = image.to_rgba8();
    let mut data = vec![0u8; codec::byte_size(size)];
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel[0] > RED_THRESHOLD {
            data[codec::byte_index(size, x, y)] |= codec::bit_mask(x);
        }
    }
    Ok(data)
}

/// Open an image file in any format the `image` crate understands.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    log::debug!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Build a single-frame sprite sized after the image at `path`.
pub fn sprite_from_image<P: AsRef<Path>>(path: P, name: &str) -> Result<Sprite> {
    let image = load_image(path)?;
    let sprite = Sprite::single(image.width(), image.height(), name)?;
    if let Some(frame) = sprite.frame(0) {
        frame.import_image(&image)?;
    }
    Ok(sprite)
}
