//! The font capability consumed by the rasterizer.
//!
//! The rasterizer only needs three things from a font: whether a codepoint
//! has an outline (and how big it is), a coverage raster of it, and the
//! font-wide vertical metrics. Anything that answers those can be plugged in,
//! which is how tests drive the pipeline with synthetic glyphs.

/// Size of a glyph's outline at a given pixel size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphBounds {
    pub width: f32,
    pub height: f32,
}

/// Font-wide vertical metrics in pixels; `descent` is negative below the baseline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LineMetrics {
    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// Grayscale coverage of one glyph.
///
/// `xmin` is the offset of the bitmap's left edge from the pen position,
/// `ymin` the offset of its bottom edge from the baseline (positive is up).
/// Rows are stored top to bottom.
#[derive(Clone, Debug, Default)]
pub struct Coverage {
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    pub advance: f32,
    pub pixels: Vec<u8>,
}

impl Coverage {
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels.get(y * self.width + x).copied().unwrap_or(0)
    }
}

pub trait GlyphSource {
    /// Outline bounds of `ch` at `px`, or `None` when the font has no outline for it.
    fn glyph_bounds(&self, ch: char, px: f32) -> Option<GlyphBounds>;

    /// Coverage raster of `ch` at `px`.
    fn render(&self, ch: char, px: f32) -> Option<Coverage>;

    fn line_metrics(&self, px: f32) -> LineMetrics;
}

impl<T: GlyphSource + ?Sized> GlyphSource for &T {
    fn glyph_bounds(&self, ch: char, px: f32) -> Option<GlyphBounds> {
        (**self).glyph_bounds(ch, px)
    }

    fn render(&self, ch: char, px: f32) -> Option<Coverage> {
        (**self).render(ch, px)
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        (**self).line_metrics(px)
    }
}

#[cfg(feature = "fontdue")]
pub use outline::OutlineFont;

#[cfg(feature = "fontdue")]
mod outline {
    use super::{Coverage, GlyphBounds, GlyphSource, LineMetrics};
    use crate::error::{FontError, Result};
    use std::io::{Cursor, Read};
    use std::{fs, path::Path};
    use zip::ZipArchive;

    const FONT_EXTENSIONS: [&str; 4] = [".ttf", ".otf", ".ttc", ".otc"];

    /// A TrueType/OpenType font rasterized with `fontdue`.
    pub struct OutlineFont {
        name: String,
        font: fontdue::Font,
    }

    impl OutlineFont {
        pub fn load(path: &Path) -> Result<Self> {
            let bytes = fs::read(path)
                .map_err(|e| FontError::Load(format!("{}: {e}", path.display())))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Self::from_bytes(name, bytes)
        }

        /// Parses raw font bytes. A ZIP archive is searched for the first font file inside.
        pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
            let mut name = name.into();
            let bytes = if bytes.len() >= 4 && &bytes[0..4] == b"PK\x03\x04" {
                let (inner_name, inner) = extract_font(&bytes)?;
                name = format!("{name}:{inner_name}");
                inner
            } else {
                bytes
            };
            let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
                .map_err(|e| FontError::Load(format!("{name}: {e}")))?;
            Ok(Self { name, font })
        }

        pub fn name(&self) -> &str {
            &self.name
        }

        pub fn has_char(&self, ch: char) -> bool {
            self.font.lookup_glyph_index(ch) != 0
        }

        /// Number of glyphs in the font, including `.notdef`.
        pub fn glyph_count(&self) -> u16 {
            self.font.glyph_count()
        }
    }

    fn extract_font(bytes: &[u8]) -> Result<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| FontError::Zip(format!("zip open error: {e}")))?;
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| FontError::Zip(format!("zip entry error: {e}")))?;
            let lower = file.name().to_ascii_lowercase();
            if FONT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                let name = file.name().to_string();
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)?;
                return Ok((name, buf));
            }
        }
        Err(FontError::Zip("archive contained no font file".into()))
    }

    impl GlyphSource for OutlineFont {
        fn glyph_bounds(&self, ch: char, px: f32) -> Option<GlyphBounds> {
            if !self.has_char(ch) {
                return None;
            }
            let m = self.font.metrics(ch, px);
            if m.width == 0 || m.height == 0 {
                return None;
            }
            Some(GlyphBounds {
                width: m.bounds.width,
                height: m.bounds.height,
            })
        }

        fn render(&self, ch: char, px: f32) -> Option<Coverage> {
            if !self.has_char(ch) {
                return None;
            }
            let (m, pixels) = self.font.rasterize(ch, px);
            Some(Coverage {
                width: m.width,
                height: m.height,
                xmin: m.xmin,
                ymin: m.ymin,
                advance: m.advance_width,
                pixels,
            })
        }

        fn line_metrics(&self, px: f32) -> LineMetrics {
            // Fonts without a hhea table still get a usable em box.
            self.font
                .horizontal_line_metrics(px)
                .map(|m| LineMetrics {
                    ascent: m.ascent,
                    descent: m.descent,
                })
                .unwrap_or(LineMetrics {
                    ascent: px * 0.88,
                    descent: -px * 0.12,
                })
        }
    }
}
