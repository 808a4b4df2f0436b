//! Packed-bit bitmap layout and its C text form.
//!
//! Pixels are stored row-major, top to bottom, 8 horizontally adjacent
//! pixels per byte with the lowest x in the least significant bit. Every row
//! starts on a byte boundary, so a row whose width is not a multiple of 8
//! leaves the high bits of its last byte unused (always zero).
//!
//! This is the XBM layout; keeping it as the in-memory representation means
//! export is a straight dump of the buffer.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, XbmError};

/// Bytes emitted per line of a C initializer list unless configured otherwise.
pub const DEFAULT_ENTRIES_PER_LINE: usize = 8;

/// Dimensions of a bitmap in pixels. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(XbmError::invariant(format!(
                "bitmap size must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Parse a `"WxH"` string such as `"8x14"` or `"16 x 16"`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || XbmError::invariant(format!("invalid size '{}', expected WxH", s));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(width, height)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = XbmError;

    fn from_str(s: &str) -> Result<Self> {
        Size::parse(s)
    }
}

/// Bytes per row: `ceil(width / 8)`.
pub fn row_stride(size: Size) -> usize {
    (size.width as usize).div_ceil(8)
}

/// Length of the packed buffer for `size`.
pub fn byte_size(size: Size) -> usize {
    size.height as usize * row_stride(size)
}

/// Index of the byte holding pixel `(x, y)`.
pub fn byte_index(size: Size, x: u32, y: u32) -> usize {
    y as usize * row_stride(size) + (x >> 3) as usize
}

/// Mask of pixel column `x` within its byte.
pub fn bit_mask(x: u32) -> u8 {
    1 << (x & 7)
}

/// Bits of a row's final byte that hold pixels (`0xFF` when width is a multiple of 8).
pub fn padding_mask(size: Size) -> u8 {
    match size.width % 8 {
        0 => 0xFF,
        used => (1u8 << used) - 1,
    }
}

fn check_bounds(size: Size, x: u32, y: u32) -> Result<()> {
    if size.contains(x, y) {
        Ok(())
    } else {
        Err(XbmError::OutOfRange { x, y, width: size.width, height: size.height })
    }
}

/// Read pixel `(x, y)` from `data`.
pub fn get_pixel(data: &[u8], size: Size, x: u32, y: u32) -> Result<bool> {
    check_bounds(size, x, y)?;
    Ok(data[byte_index(size, x, y)] & bit_mask(x) != 0)
}

/// Write pixel `(x, y)`; returns whether the byte changed.
pub fn set_pixel(data: &mut [u8], size: Size, x: u32, y: u32, on: bool) -> Result<bool> {
    check_bounds(size, x, y)?;
    let index = byte_index(size, x, y);
    let old = data[index];
    data[index] = if on { old | bit_mask(x) } else { old & !bit_mask(x) };
    Ok(data[index] != old)
}

/// Zero the unused high bits of every row's last byte.
pub fn mask_padding(data: &mut [u8], size: Size) {
    let mask = padding_mask(size);
    if mask == 0xFF {
        return;
    }
    let stride = row_stride(size);
    for row in data.chunks_mut(stride) {
        if row.len() == stride {
            row[stride - 1] &= mask;
        }
    }
}

/// Unpack into a `[row][column]` boolean grid.
pub fn unpack(data: &[u8], size: Size) -> Vec<Vec<bool>> {
    (0..size.height)
        .map(|y| {
            (0..size.width)
                .map(|x| data[byte_index(size, x, y)] & bit_mask(x) != 0)
                .collect()
        })
        .collect()
}

/// `#define` lines announcing the bitmap size.
pub fn write_header(size: Size, prefix: &str) -> String {
    format!(
        "#define {prefix}_width {}\n#define {prefix}_height {}\n",
        size.width, size.height
    )
}

/// Bytes as `0xNN` entries, `entries_per_line` per line, each line indented
/// with `indent`; lines are joined with `,\n` and the last has no trailing comma.
pub fn write_data_block(data: &[u8], indent: &str, entries_per_line: usize) -> String {
    data.chunks(entries_per_line.max(1))
        .map(|line| {
            let entries: Vec<String> = line.iter().map(|byte| format!("0x{:02X}", byte)).collect();
            format!("{}{}", indent, entries.join(","))
        })
        .collect::<Vec<_>>()
        .join(",\n")
}
