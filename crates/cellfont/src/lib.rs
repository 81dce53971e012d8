//! cellfont: turns an outline font into a fixed-cell monochrome bitmap font.
//!
//! Pipeline: [`charset`] picks codepoints, [`raster::Rasterizer`] renders and
//! positions each one using [`position::Classifier`], [`pack::pack`] builds the
//! blob and sorted index, [`alias::build_aliases`] adds redirects, and
//! [`emit`] writes the result as a C header.

pub mod alias;
pub mod bitmap;
pub mod charset;
pub mod emit;
mod error;
pub mod generate;
pub mod pack;
pub mod position;
pub mod raster;
pub mod source;
mod table;
pub use alias::AliasEntry;
pub use bitmap::{packed_len, GlyphBitmap};
pub use error::{FontError, Result};
pub use generate::{GenerationReport, Generator, GeneratorConfig};
pub use pack::{GlyphEntry, PackedGlyphs};
pub use position::{Classifier, PositionRules, PositioningMode};
pub use raster::Rasterizer;
#[cfg(feature = "fontdue")]
pub use source::OutlineFont;
pub use source::{Coverage, GlyphBounds, GlyphSource, LineMetrics};
pub use table::{FontTable, SizeStats, GLYPH_ENTRY_SIZE, WIDE_GLYPH_ENTRY_SIZE};

// Test utilities
pub mod test_support;
