use cellfont::{FontTable, GlyphBitmap};
use image::{GrayImage, Luma};

/// Lays cells out left to right, one gap column between them.
pub struct CellRenderer {
    cell_size: u32,
    cells: Vec<Option<GlyphBitmap>>,
}

impl CellRenderer {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size,
            cells: Vec::new(),
        }
    }

    /// `None` marks a codepoint the table cannot resolve.
    pub fn push(&mut self, cell: Option<GlyphBitmap>) {
        self.cells.push(cell);
    }

    pub fn into_text(self) -> String {
        let mut out = String::new();
        for y in 0..self.cell_size {
            if y > 0 {
                out.push('\n');
            }
            for (i, cell) in self.cells.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                for x in 0..self.cell_size {
                    let ch = match cell {
                        Some(bmp) if bmp.get(x, y) => '█',
                        Some(_) => '·',
                        None => '?',
                    };
                    out.push(ch);
                }
            }
        }
        out
    }

    /// White ink on black, each pixel drawn as a `scale × scale` block.
    pub fn into_image(self, scale: u32) -> GrayImage {
        let scale = scale.max(1);
        let count = self.cells.len().max(1) as u32;
        let pitch = self.cell_size + 1;
        let mut img = GrayImage::new((count * pitch - 1) * scale, self.cell_size * scale);
        for (i, cell) in self.cells.iter().enumerate() {
            let Some(bmp) = cell else { continue };
            let x0 = i as u32 * pitch;
            for y in 0..self.cell_size {
                for x in 0..self.cell_size {
                    if !bmp.get(x, y) {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            img.put_pixel((x0 + x) * scale + dx, y * scale + dy, Luma([255]));
                        }
                    }
                }
            }
        }
        img
    }
}

/// Convenience: look every char of `text` up in `table` the way the firmware would.
pub fn render_text(table: &FontTable, text: &str) -> CellRenderer {
    let mut renderer = CellRenderer::new(table.cell_width());
    for ch in text.chars().filter(|c| !c.is_control()) {
        renderer.push(table.bitmap(u32::from(ch)));
    }
    renderer
}
