//! Rasterizes a TrueType font into the fixed 16x24 glyph table consumed by the
//! display firmware's text overlay, and emits it as a C header of packed
//! per-row bitmasks.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use thiserror::Error;

/// Glyph cell width in pixels
pub const CELL_WIDTH: usize = 16;

/// Glyph cell height in pixels (rows per glyph in the emitted table)
pub const CELL_HEIGHT: usize = 24;

/// First character code in the table (space)
pub const FIRST_CHAR: u8 = 32;

/// Last character code in the table ('~')
pub const LAST_CHAR: u8 = 126;

/// Number of glyphs in the table
pub const GLYPH_COUNT: usize = (LAST_CHAR - FIRST_CHAR) as usize + 1;

/// Coverage values above this count as ink when thresholding to monochrome
const INK_THRESHOLD: u8 = 128;

/// Errors raised while loading a font file
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse font file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: &'static str },
}

/// Read and parse a TrueType font file
pub fn load_font(path: &Path) -> Result<Font, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| FontError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

/// One rendered character on a fixed 16x24 monochrome canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphCell {
    pixels: [[bool; CELL_WIDTH]; CELL_HEIGHT],
}

impl GlyphCell {
    /// Create an all-blank cell
    pub fn blank() -> Self {
        Self {
            pixels: [[false; CELL_WIDTH]; CELL_HEIGHT],
        }
    }

    fn set(&mut self, x: usize, y: usize) {
        self.pixels[y][x] = true;
    }

    /// Pack one row MSB-first: column 0 maps to bit 15
    pub fn row_bits(&self, row: usize) -> u16 {
        let mut bits = 0u16;
        for (col, &on) in self.pixels[row].iter().enumerate() {
            if on {
                bits |= 1u16 << (15 - col);
            }
        }
        bits
    }

    /// All rows packed, top to bottom
    pub fn rows(&self) -> [u16; CELL_HEIGHT] {
        std::array::from_fn(|row| self.row_bits(row))
    }
}

/// Center a tight coverage bitmap in a blank cell, thresholding to monochrome.
///
/// Offsets use floor division, so ink wider or taller than the cell is biased
/// left/up by one pixel rather than right/down; anything landing outside the
/// cell is clipped. An empty bitmap (a blank glyph like space) yields an
/// all-blank cell.
fn centered_cell(coverage: &[u8], width: usize, height: usize) -> GlyphCell {
    let mut cell = GlyphCell::blank();
    let x0 = (CELL_WIDTH as i32 - width as i32).div_euclid(2);
    let y0 = (CELL_HEIGHT as i32 - height as i32).div_euclid(2);

    for gy in 0..height {
        for gx in 0..width {
            if coverage[gy * width + gx] <= INK_THRESHOLD {
                continue;
            }
            let x = x0 + gx as i32;
            let y = y0 + gy as i32;
            if (0..CELL_WIDTH as i32).contains(&x) && (0..CELL_HEIGHT as i32).contains(&y) {
                cell.set(x as usize, y as usize);
            }
        }
    }

    cell
}

/// Rasterize one character into a centered 16x24 cell
pub fn rasterize_glyph(font: &Font, ch: char, px: f32) -> GlyphCell {
    let (metrics, coverage) = font.rasterize(ch, px);
    centered_cell(&coverage, metrics.width, metrics.height)
}

// Only backslash needs escaping inside the C comment label; the table range
// is printable ASCII.
fn escape_label(ch: char) -> String {
    if ch == '\\' {
        "\\\\".to_string()
    } else {
        ch.to_string()
    }
}

/// Packed row bitmasks for ASCII 32..=126, 24 rows per glyph, in ascending
/// character-code order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    rows: Vec<u16>,
}

impl FontTable {
    /// Characters covered by the table, in table order
    pub fn chars() -> impl Iterator<Item = char> {
        (FIRST_CHAR..=LAST_CHAR).map(char::from)
    }

    /// Rasterize the full table at the given pixel size, invoking the
    /// callback after each glyph (used for progress reporting)
    pub fn render<F>(font: &Font, px: f32, mut progress: F) -> Self
    where
        F: FnMut(char),
    {
        let mut rows = Vec::with_capacity(GLYPH_COUNT * CELL_HEIGHT);
        for ch in Self::chars() {
            let cell = rasterize_glyph(font, ch, px);
            rows.extend(cell.rows());
            progress(ch);
        }
        Self { rows }
    }

    /// Row bitmasks in table order
    pub fn rows(&self) -> &[u16] {
        &self.rows
    }

    /// Emit the include-guarded C header declaring the table.
    ///
    /// Each glyph is preceded by a `// '<char>'` label line and contributes 24
    /// zero-padded uppercase hex literals, one per line.
    pub fn to_header(&self, font_label: &str, px: u32) -> String {
        let mut out = String::new();
        out.push_str("#ifndef FONT_16X24_H\n");
        out.push_str("#define FONT_16X24_H\n");
        out.push('\n');
        out.push_str("#include <stdint.h>\n");
        out.push('\n');
        let _ = writeln!(out, "// Font: {} {}px", font_label, px);
        let _ = writeln!(out, "// Size: {}x{}", CELL_WIDTH, CELL_HEIGHT);
        out.push('\n');
        let _ = writeln!(
            out,
            "static const uint16_t font_16x24[{} * {}] = {{",
            GLYPH_COUNT, CELL_HEIGHT
        );

        for (ch, glyph) in Self::chars().zip(self.rows.chunks(CELL_HEIGHT)) {
            let _ = writeln!(out, "    // '{}'", escape_label(ch));
            for &row in glyph {
                let _ = writeln!(out, "    0x{:04X},", row);
            }
        }

        out.push_str("};\n");
        out.push('\n');
        out.push_str("#endif // FONT_16X24_H");
        out
    }
}
