//! Test support utilities for cellfont.
//!
//! Provides a synthetic [`GlyphSource`] whose glyphs are solid rectangles
//! described in em units, so the pipeline can be exercised without a real
//! font file.

use crate::source::{Coverage, GlyphBounds, GlyphSource, LineMetrics};
use std::collections::HashMap;

/// A rectangular glyph in em units; `bottom` is relative to the baseline.
#[derive(Copy, Clone, Debug)]
pub struct SyntheticGlyph {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
    pub advance: f32,
    pub ink: u8,
}

impl SyntheticGlyph {
    pub fn rect(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
            advance: 1.0,
            ink: 255,
        }
    }

    /// Has an outline but renders without coverage.
    pub fn invisible(width: f32, height: f32) -> Self {
        Self {
            ink: 0,
            ..Self::rect(0.0, 0.0, width, height)
        }
    }
}

pub struct SyntheticFont {
    glyphs: HashMap<char, SyntheticGlyph>,
    ascent: f32,
    descent: f32,
}

impl SyntheticFont {
    pub fn new() -> Self {
        Self {
            glyphs: HashMap::new(),
            ascent: 0.88,
            descent: -0.12,
        }
    }

    /// A handful of kana, ideographs and punctuation with plausible shapes.
    pub fn sample() -> Self {
        Self::new()
            .with_glyph('口', SyntheticGlyph::rect(0.08, -0.06, 0.84, 0.84))
            .with_glyph('叱', SyntheticGlyph::rect(0.05, -0.08, 0.9, 0.9))
            .with_glyph('あ', SyntheticGlyph::rect(0.12, -0.04, 0.76, 0.8))
            .with_glyph('ー', SyntheticGlyph::rect(0.1, 0.3, 0.8, 0.08))
            .with_glyph('。', SyntheticGlyph::rect(0.1, 0.0, 0.2, 0.2))
            .with_glyph('、', SyntheticGlyph::rect(0.1, 0.0, 0.18, 0.18))
            .with_glyph('「', SyntheticGlyph::rect(0.55, -0.05, 0.3, 0.85))
            .with_glyph('」', SyntheticGlyph::rect(0.15, -0.05, 0.3, 0.85))
            .with_glyph('・', SyntheticGlyph::rect(0.42, 0.3, 0.16, 0.16))
            .with_glyph('〝', SyntheticGlyph::rect(0.2, 0.55, 0.25, 0.25))
            .with_glyph('〒', SyntheticGlyph::rect(0.15, 0.0, 0.7, 0.7))
    }

    pub fn with_glyph(mut self, ch: char, glyph: SyntheticGlyph) -> Self {
        self.glyphs.insert(ch, glyph);
        self
    }

    pub fn chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.glyphs.keys().copied().collect();
        chars.sort_unstable();
        chars
    }
}

impl Default for SyntheticFont {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphSource for SyntheticFont {
    fn glyph_bounds(&self, ch: char, px: f32) -> Option<GlyphBounds> {
        self.glyphs.get(&ch).map(|g| GlyphBounds {
            width: g.width * px,
            height: g.height * px,
        })
    }

    fn render(&self, ch: char, px: f32) -> Option<Coverage> {
        let g = self.glyphs.get(&ch)?;
        let width = ((g.width * px).round() as usize).max(1);
        let height = ((g.height * px).round() as usize).max(1);
        Some(Coverage {
            width,
            height,
            xmin: (g.left * px).round() as i32,
            ymin: (g.bottom * px).round() as i32,
            advance: g.advance * px,
            pixels: vec![g.ink; width * height],
        })
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        LineMetrics {
            ascent: self.ascent * px,
            descent: self.descent * px,
        }
    }
}
