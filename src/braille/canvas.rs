/// Braille Unicode canvas used for county outlines.
/// Each character cell holds a 2x4 dot grid (U+2800 to U+28FF).
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>, // Dot bits, row-major
}

impl BrailleCanvas {
    /// Create a blank canvas of `width` x `height` characters.
    /// Pixel resolution is width*2 x height*4.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    /// Set a dot. Out-of-range pixels are ignored.
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }

        const BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
        self.cells[cy * self.width + cx] |= BITS[x % 2][y % 4];
    }

    /// Glyph at a character position, `None` when the cell has no dots
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.cells[row * self.width + col] {
            0 => None,
            bits => char::from_u32(0x2800 + bits as u32),
        }
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.glyph(col, row).unwrap_or('\u{2800}'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
