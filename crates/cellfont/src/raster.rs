//! Glyph rasterizer: render large, find the ink, crop by positioning mode,
//! shrink to the cell and threshold to one bit.
use crate::{
    bitmap::GlyphBitmap,
    error::{FontError, Result},
    position::{Classifier, PositioningMode},
    source::{GlyphSource, LineMetrics},
};
use image::{imageops, imageops::FilterType, GrayImage, Luma};
use std::collections::BTreeSet;

/// Resampled pixels brighter than this become ink. Kept well below the
/// midpoint so thin strokes survive the downscale.
pub const DEFAULT_THRESHOLD: u8 = 64;

/// Highest accepted threshold; anything at or above the midpoint erases light strokes.
pub const MAX_THRESHOLD: u8 = 127;

/// Ideographic space: present in the index, never inked.
pub const IDEOGRAPHIC_SPACE: u32 = 0x3000;

/// Canvas side as a multiple of the render size.
const CANVAS_SCALE: u32 = 3;
/// Extra pixels around a tight (default mode) crop.
const TIGHT_MARGIN: i64 = 4;
/// Extra pixels added to the ascent for the fixed punctuation window.
const PUNCTUATION_MARGIN: i64 = 4;
/// Gap between an anchored window edge and the ink.
const EDGE_MARGIN: i64 = 2;

/// Inclusive ink bounding box on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InkBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl InkBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    fn mid_x(&self) -> i64 {
        (i64::from(self.min_x) + i64::from(self.max_x) + 1) / 2
    }

    fn mid_y(&self) -> i64 {
        (i64::from(self.min_y) + i64::from(self.max_y) + 1) / 2
    }
}

/// Square crop region on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

#[derive(Clone, Debug)]
pub struct Rasterizer {
    cell_size: u32,
    render_size: u32,
    classifier: Classifier,
    force_blank: BTreeSet<u32>,
    threshold: u8,
}

impl Rasterizer {
    pub fn new(cell_size: u32, render_size: u32, classifier: Classifier) -> Result<Self> {
        if cell_size == 0 {
            return Err(FontError::InvalidConfig("cell size must be at least 1".into()));
        }
        if render_size == 0 {
            return Err(FontError::InvalidConfig("render size must be at least 1".into()));
        }
        Ok(Self {
            cell_size,
            render_size,
            classifier,
            force_blank: BTreeSet::from([IDEOGRAPHIC_SPACE]),
            threshold: DEFAULT_THRESHOLD,
        })
    }

    /// Replace the set of codepoints that always produce an empty cell.
    pub fn with_force_blank(mut self, codepoints: impl IntoIterator<Item = u32>) -> Self {
        self.force_blank = codepoints.into_iter().collect();
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Result<Self> {
        check_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn render_size(&self) -> u32 {
        self.render_size
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn is_force_blank(&self, codepoint: u32) -> bool {
        self.force_blank.contains(&codepoint)
    }

    /// Rasterize one codepoint into a packed cell.
    ///
    /// Returns `None` when the font has no outline for the codepoint or the
    /// outline renders without any ink; callers count those as skipped.
    pub fn rasterize<F: GlyphSource + ?Sized>(&self, font: &F, codepoint: u32) -> Option<GlyphBitmap> {
        if self.is_force_blank(codepoint) {
            return Some(GlyphBitmap::blank(self.cell_size));
        }
        let ch = char::from_u32(codepoint)?;
        let px = self.render_size as f32;
        let bounds = font.glyph_bounds(ch, px)?;
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }

        let mode = self.classifier.classify(codepoint);
        let metrics = font.line_metrics(px);
        let canvas = self.draw(font, ch, mode, &metrics)?;
        let ink = ink_box(&canvas)?;
        let window = self.crop_window(mode, ink, &metrics);

        let crop = imageops::crop_imm(&canvas, window.x, window.y, window.size, window.size).to_image();
        let cell = imageops::resize(&crop, self.cell_size, self.cell_size, FilterType::Lanczos3);
        Some(GlyphBitmap::from_fn(self.cell_size, |x, y| {
            cell.get_pixel(x, y).0[0] > self.threshold
        }))
    }

    fn canvas_side(&self) -> u32 {
        self.render_size * CANVAS_SCALE
    }

    /// Draws the glyph with its em box centered on the canvas.
    /// Bottom-aligned punctuation is drawn a quarter em lower.
    fn draw<F: GlyphSource + ?Sized>(
        &self,
        font: &F,
        ch: char,
        mode: PositioningMode,
        metrics: &LineMetrics,
    ) -> Option<GrayImage> {
        let coverage = font.render(ch, self.render_size as f32)?;
        let side = self.canvas_side();
        let mut canvas = GrayImage::new(side, side);

        let advance = if coverage.advance > 0.0 {
            coverage.advance
        } else {
            coverage.width as f32
        };
        let pen_x = ((side as f32 - advance) / 2.0).round() as i64;
        let top = (side as f32 - metrics.height()) / 2.0;
        let mut baseline = (top + metrics.ascent).round() as i64;
        if mode == PositioningMode::Bottom {
            baseline += i64::from(self.render_size / 4);
        }

        let left = pen_x + i64::from(coverage.xmin);
        let upper = baseline - i64::from(coverage.ymin) - coverage.height as i64;
        for gy in 0..coverage.height {
            let y = upper + gy as i64;
            if y < 0 || y >= i64::from(side) {
                continue;
            }
            for gx in 0..coverage.width {
                let x = left + gx as i64;
                if x < 0 || x >= i64::from(side) {
                    continue;
                }
                let v = coverage.get(gx, gy);
                let px = canvas.get_pixel_mut(x as u32, y as u32);
                if v > px.0[0] {
                    *px = Luma([v]);
                }
            }
        }
        Some(canvas)
    }

    /// Chooses the square crop for `mode`, shifted (never resized) to stay on the canvas.
    pub fn crop_window(&self, mode: PositioningMode, ink: InkBox, metrics: &LineMetrics) -> CropWindow {
        let side = i64::from(self.canvas_side());
        let size = if mode.is_punctuation() {
            metrics.ascent.ceil() as i64 + PUNCTUATION_MARGIN
        } else {
            i64::from(ink.width().max(ink.height())) + TIGHT_MARGIN
        };
        // Only a window bigger than the canvas itself is shrunk.
        let size = size.clamp(1, side);

        let centered_x = ink.mid_x() - size / 2;
        let centered_y = ink.mid_y() - size / 2;
        let bottom_anchored = i64::from(ink.max_y) + 1 + EDGE_MARGIN - size;

        let (x, y) = match mode {
            PositioningMode::Bottom => (centered_x, bottom_anchored),
            PositioningMode::Top => (centered_x, i64::from(ink.min_y) - EDGE_MARGIN),
            PositioningMode::Open => (i64::from(ink.max_x) + 1 + EDGE_MARGIN - size, centered_y),
            PositioningMode::Close => (i64::from(ink.min_x) - EDGE_MARGIN, bottom_anchored),
            PositioningMode::Center | PositioningMode::Default => (centered_x, centered_y),
        };

        CropWindow {
            x: x.clamp(0, side - size) as u32,
            y: y.clamp(0, side - size) as u32,
            size: size as u32,
        }
    }
}

pub(crate) fn check_threshold(threshold: u8) -> Result<()> {
    if threshold > MAX_THRESHOLD {
        return Err(FontError::InvalidConfig(format!(
            "threshold {threshold} must stay below the midpoint (max {MAX_THRESHOLD})"
        )));
    }
    Ok(())
}

/// Bounding box of every non-zero pixel, or `None` for a blank canvas.
pub fn ink_box(canvas: &GrayImage) -> Option<InkBox> {
    let mut found: Option<InkBox> = None;
    for (x, y, px) in canvas.enumerate_pixels() {
        if px.0[0] == 0 {
            continue;
        }
        found = Some(match found {
            None => InkBox {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => InkBox {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SyntheticFont, SyntheticGlyph};

    fn rasterizer(cell: u32, render: u32) -> Rasterizer {
        Rasterizer::new(cell, render, Classifier::default()).unwrap()
    }

    fn metrics() -> LineMetrics {
        LineMetrics {
            ascent: 20.0,
            descent: -4.0,
        }
    }

    #[test]
    fn rejects_zero_sizes() {
        assert!(Rasterizer::new(0, 22, Classifier::default()).is_err());
        assert!(Rasterizer::new(16, 0, Classifier::default()).is_err());
    }

    #[test]
    fn rejects_threshold_at_or_above_midpoint() {
        assert!(rasterizer(16, 22).with_threshold(MAX_THRESHOLD).is_ok());
        assert!(rasterizer(16, 22).with_threshold(128).is_err());
        let err = rasterizer(16, 22).with_threshold(250).unwrap_err();
        assert!(matches!(err, FontError::InvalidConfig(_)));
    }

    #[test]
    fn ink_box_of_blank_canvas_is_none() {
        assert_eq!(ink_box(&GrayImage::new(8, 8)), None);
    }

    #[test]
    fn ink_box_covers_all_pixels() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(2, 3, Luma([1]));
        img.put_pixel(7, 5, Luma([200]));
        assert_eq!(
            ink_box(&img),
            Some(InkBox {
                min_x: 2,
                min_y: 3,
                max_x: 7,
                max_y: 5
            })
        );
    }

    #[test]
    fn default_window_is_tight_and_centered() {
        let r = rasterizer(16, 22);
        let ink = InkBox {
            min_x: 20,
            min_y: 24,
            max_x: 39,
            max_y: 33,
        };
        let w = r.crop_window(PositioningMode::Default, ink, &metrics());
        assert_eq!(w.size, 24);
        assert_eq!(w, CropWindow { x: 18, y: 17, size: 24 });
    }

    #[test]
    fn bottom_window_ends_below_ink() {
        let r = rasterizer(16, 22);
        let ink = InkBox {
            min_x: 30,
            min_y: 40,
            max_x: 33,
            max_y: 43,
        };
        let w = r.crop_window(PositioningMode::Bottom, ink, &metrics());
        assert_eq!(w.size, 24);
        assert_eq!(w.y + w.size, 43 + 1 + 2);
    }

    #[test]
    fn open_and_close_lean_to_opposite_sides() {
        let r = rasterizer(16, 22);
        let ink = InkBox {
            min_x: 28,
            min_y: 20,
            max_x: 33,
            max_y: 41,
        };
        let open = r.crop_window(PositioningMode::Open, ink, &metrics());
        let close = r.crop_window(PositioningMode::Close, ink, &metrics());
        assert_eq!(open.x + open.size, 33 + 1 + 2);
        assert_eq!(close.x, 28 - 2);
        assert_eq!(close.y + close.size, 41 + 1 + 2);
    }

    #[test]
    fn window_is_shifted_not_resized_at_canvas_edge() {
        let r = rasterizer(16, 22);
        let ink = InkBox {
            min_x: 0,
            min_y: 0,
            max_x: 2,
            max_y: 2,
        };
        let w = r.crop_window(PositioningMode::Center, ink, &metrics());
        assert_eq!(w, CropWindow { x: 0, y: 0, size: 24 });

        let ink = InkBox {
            min_x: 63,
            min_y: 63,
            max_x: 65,
            max_y: 65,
        };
        let w = r.crop_window(PositioningMode::Top, ink, &metrics());
        assert_eq!(w.size, 24);
        assert_eq!(w.x + w.size, 66);
        assert_eq!(w.y + w.size, 66);
    }

    #[test]
    fn force_blank_bypasses_font() {
        let font = SyntheticFont::new();
        let r = rasterizer(18, 25);
        let bmp = r.rasterize(&font, IDEOGRAPHIC_SPACE).unwrap();
        assert_eq!(bmp.as_bytes().len(), 41);
        assert!(bmp.is_blank());
    }

    #[test]
    fn missing_glyph_is_none() {
        let font = SyntheticFont::new();
        assert!(rasterizer(16, 22).rasterize(&font, 0xE000).is_none());
    }

    #[test]
    fn blank_render_is_none() {
        let font = SyntheticFont::new().with_glyph('x', SyntheticGlyph::invisible(0.5, 0.5));
        assert!(rasterizer(16, 22).rasterize(&font, 'x' as u32).is_none());
    }

    #[test]
    fn square_ideograph_fills_cell() {
        let font = SyntheticFont::new().with_glyph('口', SyntheticGlyph::rect(0.05, -0.05, 0.9, 0.9));
        let bmp = rasterizer(16, 22).rasterize(&font, '口' as u32).unwrap();
        // tight crop leaves only the margin uninked
        assert!(bmp.get(8, 8));
        assert!(bmp.ink_count() > 16 * 16 / 2, "{}", bmp.to_ascii('#', '.'));
    }
}
