//! Packed 1-bit glyph cells.

/// Number of bytes a `cell_size × cell_size` 1-bit cell occupies once packed.
pub const fn packed_len(cell_size: u32) -> usize {
    let bits = cell_size as usize * cell_size as usize;
    bits.div_ceil(8)
}

/// A square monochrome cell, row-major, most significant bit first.
///
/// The trailing byte is zero padded in its low-order bits when
/// `cell_size²` is not a multiple of eight.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphBitmap {
    cell_size: u32,
    data: Vec<u8>,
}

impl GlyphBitmap {
    /// An all-zero cell, used for force-blank codepoints such as the ideographic space.
    pub fn blank(cell_size: u32) -> Self {
        Self {
            cell_size,
            data: vec![0; packed_len(cell_size)],
        }
    }

    /// Builds a cell by asking `ink` for every pixel, row by row.
    pub fn from_fn(cell_size: u32, mut ink: impl FnMut(u32, u32) -> bool) -> Self {
        let mut data = Vec::with_capacity(packed_len(cell_size));
        let mut byte = 0u8;
        let mut bit = 7i32;
        for y in 0..cell_size {
            for x in 0..cell_size {
                if ink(x, y) {
                    byte |= 1 << bit;
                }
                bit -= 1;
                if bit < 0 {
                    data.push(byte);
                    byte = 0;
                    bit = 7;
                }
            }
        }
        if bit < 7 {
            data.push(byte);
        }
        Self { cell_size, data }
    }

    /// Wraps already packed bytes; `None` if the length does not match the cell.
    pub fn from_packed(cell_size: u32, bytes: &[u8]) -> Option<Self> {
        (bytes.len() == packed_len(cell_size)).then(|| Self {
            cell_size,
            data: bytes.to_vec(),
        })
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.cell_size || y >= self.cell_size {
            return false;
        }
        let idx = (y * self.cell_size + x) as usize;
        self.data[idx / 8] & (0x80 >> (idx % 8)) != 0
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|b| *b == 0)
    }

    /// Number of set pixels.
    pub fn ink_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Set pixel count per row, top to bottom.
    pub fn row_ink(&self) -> Vec<usize> {
        (0..self.cell_size)
            .map(|y| (0..self.cell_size).filter(|x| self.get(*x, y)).count())
            .collect()
    }

    /// Text rendering of the cell, one line per row.
    pub fn to_ascii(&self, on: char, off: char) -> String {
        let mut out = String::with_capacity((self.cell_size as usize + 1) * self.cell_size as usize);
        for y in 0..self.cell_size {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.cell_size {
                out.push(if self.get(x, y) { on } else { off });
            }
        }
        out
    }
}
