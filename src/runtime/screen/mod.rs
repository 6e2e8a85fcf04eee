//! Monochrome screen buffer.
//!
//! The runtime draws the status line, the stack and the command line into a
//! 400×240 one-bit buffer. The shell displays the pixels and compares them
//! against stored references by digest.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::runtime::{
    config::{AngleMode, RuntimeConfig},
    error::RuntimeError,
    tower::Value,
};

pub mod font;
pub mod reference;

pub use reference::{Comparison, ReferenceImages};

pub const WIDTH: usize = 400;
pub const HEIGHT: usize = 240;
const STRIDE: usize = WIDTH / 8;

/// Glyphs are drawn at twice their bitmap size.
const SCALE: usize = 2;
const ADVANCE: usize = (font::GLYPH_WIDTH + 1) * SCALE;
const LINE: usize = font::GLYPH_HEIGHT * SCALE + 4;
const MARGIN: usize = 4;

/// One bit per pixel, rows top to bottom, most significant bit leftmost
/// (the PBM raw layout).
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    pixels: Vec<u8>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen").field("digest", &self.digest()).finish()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; STRIDE * HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.pixels[y * STRIDE + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Out-of-range coordinates are clipped.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let byte = &mut self.pixels[y * STRIDE + x / 8];
        let mask = 0x80 >> (x % 8);
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, on: bool) {
        for row in y..(y + height).min(HEIGHT) {
            for col in x..(x + width).min(WIDTH) {
                self.set_pixel(col, row, on);
            }
        }
    }

    pub fn text_width(text: &str) -> usize {
        text.chars().count() * ADVANCE
    }

    /// Draws `text` with its top-left corner at (`x`, `y`) and returns the
    /// x coordinate after the last glyph.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, on: bool) -> usize {
        let mut cursor = x;
        for ch in text.chars() {
            for (col, bits) in font::glyph(ch).iter().enumerate() {
                for row in 0..font::GLYPH_HEIGHT {
                    if bits & (1 << row) != 0 {
                        let px = cursor + col * SCALE;
                        let py = y + row * SCALE;
                        self.fill_rect(px, py, SCALE, SCALE, on);
                    }
                }
            }
            cursor += ADVANCE;
        }
        cursor
    }

    /// Renders the whole display: status line, stack levels (level 1
    /// lowest) and the command line being edited.
    pub fn draw_state(
        &mut self,
        stack: &[Value],
        editor: Option<&str>,
        error: Option<&RuntimeError>,
        config: &RuntimeConfig,
    ) {
        self.clear();

        self.fill_rect(0, 0, WIDTH, LINE, true);
        let status = match error {
            Some(err) => err.code().title.to_string(),
            None => format!("{} {} DIG", angle_label(config.angle_mode), config.precision),
        };
        self.draw_text(MARGIN, 2, &status, false);

        let mut bottom = HEIGHT;
        if let Some(text) = editor {
            bottom -= LINE;
            let shown = fit(text, (WIDTH - 2 * MARGIN) / ADVANCE - 1, true);
            let end = self.draw_text(MARGIN, bottom + 2, &shown, true);
            self.fill_rect(end, bottom + 1, SCALE, LINE - 2, true);
        }

        for (level, value) in stack.iter().rev().enumerate() {
            let level = level + 1;
            let Some(y) = bottom.checked_sub(LINE * level).filter(|y| *y >= LINE) else {
                break;
            };
            let label = format!("{}:", level);
            let label_end = self.draw_text(MARGIN, y + 2, &label, true);
            let room = (WIDTH - MARGIN - label_end) / ADVANCE - 1;
            let text = fit(&value.to_string(), room, false);
            let x = WIDTH - MARGIN - Self::text_width(&text);
            self.draw_text(x, y + 2, &text, true);
        }
    }

    /// Hex SHA-256 of the pixel buffer.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.pixels);
        to_hex(&hasher.finalize())
    }

    /// Number of pixels that differ from `other`.
    pub fn diff(&self, other: &Screen) -> usize {
        self.pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum()
    }

    /// Raw PBM (`P4`) image of the screen.
    pub fn to_pbm(&self) -> Vec<u8> {
        let mut out = format!("P4\n{} {}\n", WIDTH, HEIGHT).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }
}

fn angle_label(mode: AngleMode) -> &'static str {
    match mode {
        AngleMode::Radians => "RAD",
        AngleMode::Degrees => "DEG",
        AngleMode::Grads => "GRD",
    }
}

/// Shortens `text` to `room` characters with `...`, keeping the end when
/// `keep_end` is set.
fn fit(text: &str, room: usize, keep_end: bool) -> String {
    let count = text.chars().count();
    if count <= room {
        return text.to_string();
    }
    let keep = room.saturating_sub(3);
    if keep_end {
        format!("...{}", text.chars().skip(count - keep).collect::<String>())
    } else {
        format!("{}...", text.chars().take(keep).collect::<String>())
    }
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_round_trip_and_clip() {
        let mut screen = Screen::new();
        screen.set_pixel(9, 3, true);
        assert!(screen.pixel(9, 3));
        assert!(!screen.pixel(8, 3));
        screen.set_pixel(WIDTH, 0, true);
        assert_eq!(screen.diff(&Screen::new()), 1);
    }

    #[test]
    fn digest_tracks_content() {
        let blank = Screen::new();
        let mut marked = Screen::new();
        assert_eq!(blank.digest(), marked.digest());
        marked.draw_text(0, 0, "1", true);
        assert_ne!(blank.digest(), marked.digest());
        assert_eq!(blank.digest().len(), 64);
    }

    #[test]
    fn long_values_are_shortened() {
        assert_eq!(fit("123456789", 6, false), "123...");
        assert_eq!(fit("123456789", 6, true), "...789");
        assert_eq!(fit("1234", 6, false), "1234");
    }

    #[test]
    fn stack_drawing_is_deterministic() {
        let config = RuntimeConfig::default();
        let stack = [Value::Integer(1), Value::from_ratio(1.into(), 3.into())];
        let mut a = Screen::new();
        let mut b = Screen::new();
        a.draw_state(&stack, None, None, &config);
        b.draw_state(&stack, None, None, &config);
        assert_eq!(a, b);
        b.draw_state(&stack, Some("12"), None, &config);
        assert_ne!(a, b);
    }

    #[test]
    fn pbm_header() {
        let pbm = Screen::new().to_pbm();
        assert!(pbm.starts_with(b"P4\n400 240\n"));
        assert_eq!(pbm.len(), "P4\n400 240\n".len() + STRIDE * HEIGHT);
    }
}
