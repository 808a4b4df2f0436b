//! A single packed-bit bitmap.

use std::cell::RefCell;
use std::fmt;

use image::DynamicImage;

use super::format::FrameFormat;
use crate::codec::{self, Size, DEFAULT_ENTRIES_PER_LINE};
use crate::error::{Result, XbmError};
use crate::observable::{Observable, Subscription};

/// One fixed-size monochrome bitmap stored in XBM byte order.
///
/// The buffer always holds exactly `codec::byte_size(size)` bytes and the
/// unused bits past `width` in each row stay zero. Every mutation that
/// changes something notifies the frame's observers with the frame itself.
#[derive(Debug)]
pub struct Frame {
    size: Size,
    data: RefCell<Vec<u8>>,
    observable: Observable<Frame>,
}

impl Frame {
    /// A blank frame.
    pub fn new(size: Size) -> Self {
        Self::with_buffer(size, vec![0; codec::byte_size(size)])
    }

    /// A frame holding existing packed data, which must have exactly the
    /// length `size` requires.
    pub fn from_data(size: Size, mut data: Vec<u8>) -> Result<Self> {
        let expected = codec::byte_size(size);
        if data.len() != expected {
            return Err(XbmError::invariant(format!(
                "{} frame needs {} bytes, got {}",
                size,
                expected,
                data.len()
            )));
        }
        codec::mask_padding(&mut data, size);
        Ok(Self::with_buffer(size, data))
    }

    fn with_buffer(size: Size, data: Vec<u8>) -> Self {
        Self { size, data: RefCell::new(data), observable: Observable::new() }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn byte_size(&self) -> usize {
        codec::byte_size(self.size)
    }

    /// Observe every change to this frame.
    pub fn add_observer(&self, observer: impl Fn(&Frame) + 'static) -> Subscription {
        self.observable.add_observer(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observable.observer_count()
    }

    fn notify(&self) {
        self.observable.notify(self);
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Result<bool> {
        codec::get_pixel(&self.data.borrow(), self.size, x, y)
    }

    /// Set pixel `(x, y)`. Silent if the pixel already has that value.
    pub fn set_pixel(&self, x: u32, y: u32, on: bool) -> Result<()> {
        let changed = codec::set_pixel(&mut self.data.borrow_mut(), self.size, x, y, on)?;
        if changed {
            log::trace!("pixel ({}, {}) -> {}", x, y, on);
            self.notify();
        }
        Ok(())
    }

    /// Flip pixel `(x, y)` and return its new value.
    pub fn toggle_pixel(&self, x: u32, y: u32) -> Result<bool> {
        let on = !self.get_pixel(x, y)?;
        self.set_pixel(x, y, on)?;
        Ok(on)
    }

    /// True when no pixel is set.
    pub fn is_empty(&self) -> bool {
        self.data.borrow().iter().all(|&byte| byte == 0)
    }

    /// Switch every pixel off. Silent if the frame is already empty.
    pub fn clear(&self) {
        if self.is_empty() {
            return;
        }
        self.data.borrow_mut().fill(0);
        self.notify();
    }

    /// Overwrite the buffer from the start with `bytes`.
    ///
    /// A shorter slice leaves the remaining bytes untouched; a longer one is
    /// rejected. Always notifies.
    pub fn write_data(&self, bytes: &[u8]) -> Result<()> {
        let expected = self.byte_size();
        if bytes.len() > expected {
            return Err(XbmError::invariant(format!(
                "cannot write {} bytes into a {} byte {} frame",
                bytes.len(),
                expected,
                self.size
            )));
        }
        {
            let mut data = self.data.borrow_mut();
            data[..bytes.len()].copy_from_slice(bytes);
            codec::mask_padding(&mut data, self.size);
        }
        self.notify();
        Ok(())
    }

    /// Copy of the packed bytes.
    pub fn data(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }

    /// Run `f` over the packed bytes without copying them.
    pub fn with_data<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.data.borrow())
    }

    /// Pixels as a `[row][column]` grid.
    pub fn pixels(&self) -> Vec<Vec<bool>> {
        codec::unpack(&self.data.borrow(), self.size)
    }

    /// Rotate the image by `(dx, dy)`, wrapping at the edges.
    pub fn shift(&self, dx: i32, dy: i32) {
        let w = i64::from(self.size.width);
        let h = i64::from(self.size.height);
        let result = self.translate(|c, r| {
            (
                (i64::from(c) - i64::from(dx)).rem_euclid(w) as u32,
                (i64::from(r) - i64::from(dy)).rem_euclid(h) as u32,
            )
        });
        debug_assert!(result.is_ok());
    }

    /// Reflect left to right.
    pub fn mirror_horizontal(&self) {
        let w = self.size.width;
        let result = self.translate(|c, r| (w - c - 1, r));
        debug_assert!(result.is_ok());
    }

    /// Reflect top to bottom.
    pub fn mirror_vertical(&self) {
        let h = self.size.height;
        let result = self.translate(|c, r| (c, h - r - 1));
        debug_assert!(result.is_ok());
    }

    /// Rebuild the image so that destination pixel `(c, r)` takes the value
    /// of source pixel `map(c, r)`.
    ///
    /// The source is snapshotted first, so `map` may read any pixel
    /// regardless of write order. An empty frame is left alone without a
    /// notification. Fails without touching the frame if `map` leaves the grid.
    pub fn translate(&self, map: impl Fn(u32, u32) -> (u32, u32)) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let pixels = self.pixels();
        let mut next = vec![0u8; self.byte_size()];
        for r in 0..self.size.height {
            for c in 0..self.size.width {
                let (x, y) = map(c, r);
                if !self.size.contains(x, y) {
                    return Err(XbmError::OutOfRange {
                        x,
                        y,
                        width: self.size.width,
                        height: self.size.height,
                    });
                }
                if pixels[y as usize][x as usize] {
                    next[codec::byte_index(self.size, c, r)] |= codec::bit_mask(c);
                }
            }
        }
        *self.data.borrow_mut() = next;
        self.notify();
        Ok(())
    }

    /// Replace the image with `image` thresholded on its red channel.
    ///
    /// The image must have the frame's dimensions. Always notifies.
    pub fn import_image(&self, image: &DynamicImage) -> Result<()> {
        let packed = crate::import::rasterize(image, self.size)?;
        *self.data.borrow_mut() = packed;
        self.notify();
        Ok(())
    }

    pub fn serialize(&self) -> FrameFormat {
        FrameFormat { data: self.data() }
    }

    /// C source declaring this frame as `<prefix>_xbm[]`.
    pub fn to_c_source(&self, prefix: &str, entries_per_line: usize) -> String {
        format!(
            "{}static unsigned char {}_xbm[] PROGMEM = {{\n{}\n}};",
            codec::write_header(self.size, prefix),
            prefix,
            self.with_data(|data| codec::write_data_block(data, "\t", entries_per_line))
        )
    }

    /// Release all observers.
    pub fn terminate(&self) {
        self.observable.terminate();
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_c_source("xbm", DEFAULT_ENTRIES_PER_LINE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn frame(w: u32, h: u32) -> Frame {
        Frame::new(Size::new(w, h).unwrap())
    }

    fn counter(frame: &Frame) -> (Rc<Cell<usize>>, Subscription) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = frame.add_observer(move |_| h.set(h.get() + 1));
        (hits, sub)
    }

    /// Deterministic pseudo-random pattern so tests need no extra crates.
    fn scribble(frame: &Frame, seed: u32) {
        let mut state = seed.wrapping_mul(2_654_435_761).max(1);
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                frame.set_pixel(x, y, state % 3 == 0).unwrap();
            }
        }
    }

    #[test]
    fn test_new_is_zero_filled() {
        let f = frame(12, 3);
        assert_eq!(f.data(), vec![0; 6]);
        assert!(f.is_empty());
    }

    #[test]
    fn test_set_pixel_8x1() {
        let f = frame(8, 1);
        f.set_pixel(3, 0, true).unwrap();
        assert_eq!(f.data(), vec![8]);
        assert!(f.get_pixel(3, 0).unwrap());
    }

    #[test]
    fn test_to_c_source_8x1() {
        let f = frame(8, 1);
        f.set_pixel(3, 0, true).unwrap();
        assert_eq!(
            f.to_c_source("x", 8),
            "#define x_width 8\n#define x_height 1\nstatic unsigned char x_xbm[] PROGMEM = {\n\t0x08\n};"
        );
    }

    #[test]
    fn test_display_uses_default_prefix() {
        let f = frame(8, 2);
        assert!(f.to_string().starts_with("#define xbm_width 8\n"));
        assert!(f.to_string().ends_with("\t0x00,0x00\n};"));
    }

    #[test]
    fn test_notifications_only_on_change() {
        let f = frame(8, 8);
        let (hits, _sub) = counter(&f);
        f.set_pixel(1, 1, false).unwrap();
        assert_eq!(hits.get(), 0);
        f.set_pixel(1, 1, true).unwrap();
        assert_eq!(hits.get(), 1);
        f.set_pixel(1, 1, true).unwrap();
        assert_eq!(hits.get(), 1);
        f.clear();
        assert_eq!(hits.get(), 2);
        f.clear();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_observer_receives_frame() {
        let f = frame(4, 4);
        let seen = Rc::new(Cell::new(false));
        let s = Rc::clone(&seen);
        let _sub = f.add_observer(move |frame| s.set(frame.get_pixel(2, 2).unwrap()));
        f.set_pixel(2, 2, true).unwrap();
        assert!(seen.get());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let f = frame(13, 7);
        scribble(&f, 7);
        let before = f.data();
        for y in 0..7 {
            for x in 0..13 {
                f.toggle_pixel(x, y).unwrap();
                f.toggle_pixel(x, y).unwrap();
                assert_eq!(f.data(), before);
            }
        }
    }

    #[test]
    fn test_out_of_range_pixels() {
        let f = frame(8, 2);
        assert!(matches!(f.set_pixel(8, 0, true), Err(XbmError::OutOfRange { .. })));
        assert!(matches!(f.get_pixel(0, 2), Err(XbmError::OutOfRange { .. })));
        assert!(matches!(f.toggle_pixel(100, 100), Err(XbmError::OutOfRange { .. })));
        assert!(f.is_empty());
    }

    #[test]
    fn test_write_data_always_notifies() {
        let f = frame(8, 2);
        let (hits, _sub) = counter(&f);
        f.write_data(&[0, 0]).unwrap();
        assert_eq!(hits.get(), 1);
        f.write_data(&[0xAA]).unwrap();
        assert_eq!(f.data(), vec![0xAA, 0]);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_write_data_too_long() {
        let f = frame(8, 2);
        let (hits, _sub) = counter(&f);
        assert!(matches!(f.write_data(&[1, 2, 3]), Err(XbmError::InvariantViolation(_))));
        assert_eq!(hits.get(), 0);
        assert!(f.is_empty());
    }

    #[test]
    fn test_write_data_masks_padding() {
        let f = frame(3, 2);
        f.write_data(&[0xFF, 0xF2]).unwrap();
        assert_eq!(f.data(), vec![0x07, 0x02]);
    }

    #[test]
    fn test_from_data_length_checked() {
        let size = Size::new(9, 2).unwrap();
        assert!(Frame::from_data(size, vec![0; 4]).is_ok());
        assert!(matches!(Frame::from_data(size, vec![0; 3]), Err(XbmError::InvariantViolation(_))));
    }

    #[test]
    fn test_shift_wraps() {
        let f = frame(4, 3);
        f.set_pixel(3, 2, true).unwrap();
        f.shift(1, 1);
        assert!(f.get_pixel(0, 0).unwrap());
        assert_eq!(f.pixels().iter().flatten().filter(|&&p| p).count(), 1);
        f.shift(-1, 0);
        assert!(f.get_pixel(3, 0).unwrap());
    }

    #[test]
    fn test_shift_inverse_restores() {
        for (w, h) in [(8, 8), (5, 3), (17, 9)] {
            let f = frame(w, h);
            scribble(&f, w * h);
            let before = f.data();
            for (dx, dy) in [(1, 0), (0, 1), (3, -2), (-40, 25), (i32::MAX, i32::MIN + 1)] {
                f.shift(dx, dy);
                f.shift(-dx, -dy);
                assert_eq!(f.data(), before, "shift ({}, {}) on {}x{}", dx, dy, w, h);
            }
        }
    }

    #[test]
    fn test_shift_empty_is_silent() {
        let f = frame(8, 8);
        let (hits, _sub) = counter(&f);
        f.shift(2, 3);
        f.mirror_horizontal();
        f.mirror_vertical();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_mirror_horizontal() {
        let f = frame(10, 1);
        f.set_pixel(0, 0, true).unwrap();
        f.set_pixel(2, 0, true).unwrap();
        f.mirror_horizontal();
        assert!(f.get_pixel(9, 0).unwrap());
        assert!(f.get_pixel(7, 0).unwrap());
        assert!(!f.get_pixel(0, 0).unwrap());
        assert_eq!(f.data(), vec![0b1000_0000, 0b0000_0010]);
    }

    #[test]
    fn test_mirror_involution() {
        let f = frame(11, 6);
        scribble(&f, 3);
        let before = f.data();
        f.mirror_horizontal();
        assert_ne!(f.data(), before);
        f.mirror_horizontal();
        assert_eq!(f.data(), before);
        f.mirror_vertical();
        f.mirror_vertical();
        assert_eq!(f.data(), before);
    }

    #[test]
    fn test_translate_rejects_bad_map() {
        let f = frame(4, 4);
        f.set_pixel(1, 1, true).unwrap();
        let before = f.data();
        assert!(f.translate(|c, r| (c + 4, r)).is_err());
        assert_eq!(f.data(), before);
    }

    #[test]
    fn test_terminate_releases_observers() {
        let f = frame(4, 4);
        let (hits, _sub) = counter(&f);
        f.terminate();
        f.set_pixel(0, 0, true).unwrap();
        assert_eq!(hits.get(), 0);
        assert_eq!(f.observer_count(), 0);
    }

    #[test]
    fn test_serialize_has_only_data() {
        let f = frame(8, 1);
        f.set_pixel(0, 0, true).unwrap();
        let json = serde_json::to_string(&f.serialize()).unwrap();
        assert_eq!(json, r#"{"data":[1]}"#);
    }
}
