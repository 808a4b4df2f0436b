//! Terminal previews of frames
//!
//! Three flavours are available: plain ASCII (`#` and `.`), compact
//! half-block characters packing two bitmap rows per text line, and the
//! half-block form with ANSI 24-bit colors.

use image::Rgba;

use crate::models::Frame;
use crate::renderer::Palette;

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// One text line per bitmap row, `#` for set pixels and `.` for clear ones.
///
/// # Examples
///
/// ```
/// use xbm_editor::codec::Size;
/// use xbm_editor::models::Frame;
/// use xbm_editor::terminal::render_frame_text;
///
/// let frame = Frame::new(Size::new(3, 2).unwrap());
/// frame.set_pixel(0, 0, true).unwrap();
/// frame.set_pixel(2, 1, true).unwrap();
/// assert_eq!(render_frame_text(&frame), "#..\n..#\n");
/// ```
pub fn render_frame_text(frame: &Frame) -> String {
    let mut output = String::new();
    for row in frame.pixels() {
        output.extend(row.iter().map(|&on| if on { '#' } else { '.' }));
        output.push('\n');
    }
    output
}

/// Same as [`render_frame_text`] with x coordinates above and y coordinates
/// on the left, handy for picking pixels to draw.
pub fn render_coordinate_grid(frame: &Frame) -> String {
    let width = frame.width() as usize;
    let label_width = frame.height().saturating_sub(1).to_string().len();
    let mut output = " ".repeat(label_width + 1);
    output.extend((0..width).map(|x| char::from_digit((x % 10) as u32, 10).unwrap_or(' ')));
    output.push('\n');
    for (y, row) in frame.pixels().iter().enumerate() {
        output.push_str(&format!("{:>w$} ", y, w = label_width));
        output.extend(row.iter().map(|&on| if on { '#' } else { '.' }));
        output.push('\n');
    }
    output
}

/// Two bitmap rows per line using `▀`, `▄` and `█`.
pub fn render_frame_blocks(frame: &Frame) -> String {
    let pixels = frame.pixels();
    let mut output = String::new();
    for pair in pixels.chunks(2) {
        let top = &pair[0];
        let bottom = pair.get(1);
        for (x, &upper) in top.iter().enumerate() {
            let lower = bottom.map(|row| row[x]).unwrap_or(false);
            output.push(match (upper, lower) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        output.push('\n');
    }
    output
}

/// Two bitmap rows per line in true color: the upper half block takes the
/// top pixel as foreground and the bottom pixel as background.
///
/// A missing last row (odd height) shows the palette's off color.
pub fn render_frame_ansi(frame: &Frame, palette: Palette) -> String {
    let color = |on: bool| if on { palette.on } else { palette.off };
    let pixels = frame.pixels();
    let mut output = String::new();
    for pair in pixels.chunks(2) {
        for (x, &upper) in pair[0].iter().enumerate() {
            let lower = pair.get(1).map(|row| row[x]).unwrap_or(false);
            output.push_str(&color_to_ansi_fg(color(upper)));
            output.push_str(&color_to_ansi_bg(color(lower)));
            output.push('▀');
        }
        output.push_str(ANSI_RESET);
        output.push('\n');
    }
    output
}

/// ANSI 24-bit background color; fully transparent maps to a dark gray.
///
/// ```
/// use image::Rgba;
/// use xbm_editor::terminal::color_to_ansi_bg;
///
/// assert_eq!(color_to_ansi_bg(Rgba([255, 0, 0, 255])), "\x1b[48;2;255;0;0m");
/// assert_eq!(color_to_ansi_bg(Rgba([0, 0, 0, 0])), "\x1b[48;5;236m");
/// ```
pub fn color_to_ansi_bg(rgba: Rgba<u8>) -> String {
    if rgba[3] == 0 {
        "\x1b[48;5;236m".to_string()
    } else {
        format!("\x1b[48;2;{};{};{}m", rgba[0], rgba[1], rgba[2])
    }
}

/// ANSI 24-bit foreground color; fully transparent maps to a dark gray.
pub fn color_to_ansi_fg(rgba: Rgba<u8>) -> String {
    if rgba[3] == 0 {
        "\x1b[38;5;236m".to_string()
    } else {
        format!("\x1b[38;2;{};{};{}m", rgba[0], rgba[1], rgba[2])
    }
}
