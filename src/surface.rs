//! Render target abstraction.
//!
//! Entities only ever place single glyphs; clipping is the surface's job.

use crate::vector::Vector;

pub trait Surface {
    fn put_glyph(&mut self, row: i32, col: i32, glyph: char);
}

/// An in-memory grid of glyphs, one frame's worth.
///
/// The binary flushes it to the terminal; tests inspect it directly.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(size: Vector) -> Self {
        let width = size.x.max(0) as usize;
        let height = size.y.max(0) as usize;
        Canvas {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    pub fn glyph_at(&self, row: i32, col: i32) -> Option<char> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// The row as a string, trailing blanks included.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .collect()
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok().filter(|&r| r < self.height)?;
        let col = usize::try_from(col).ok().filter(|&c| c < self.width)?;
        Some(row * self.width + col)
    }
}

impl Surface for Canvas {
    fn put_glyph(&mut self, row: i32, col: i32, glyph: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = glyph;
        }
    }
}
