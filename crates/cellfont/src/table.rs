//! The generated font: packed blob, glyph index, alias index and layout scalars.
use crate::{
    alias::AliasEntry,
    bitmap::{packed_len, GlyphBitmap},
    pack::{GlyphEntry, PackedGlyphs},
};

/// Bytes per glyph index entry on the target (16-bit codepoint, 32-bit offset).
pub const GLYPH_ENTRY_SIZE: usize = 6;
/// Index entry size once a codepoint above U+FFFF needs a 32-bit field.
pub const WIDE_GLYPH_ENTRY_SIZE: usize = 8;
/// Bytes per alias entry on the target (two 32-bit codepoints).
pub const ALIAS_ENTRY_SIZE: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontTable {
    cell_size: u32,
    blob: Vec<u8>,
    glyphs: Vec<GlyphEntry>,
    aliases: Vec<AliasEntry>,
    x_advance: i32,
    y_offset: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SizeStats {
    pub bitmap_bytes: usize,
    pub index_bytes: usize,
    pub alias_bytes: usize,
}

impl SizeStats {
    pub fn total(&self) -> usize {
        self.bitmap_bytes + self.index_bytes + self.alias_bytes
    }
}

impl FontTable {
    pub fn new(packed: PackedGlyphs, aliases: Vec<AliasEntry>, x_advance: i32, y_offset: i32) -> Self {
        Self {
            cell_size: packed.cell_size,
            blob: packed.blob,
            glyphs: packed.entries,
            aliases,
            x_advance,
            y_offset,
        }
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn glyphs(&self) -> &[GlyphEntry] {
        &self.glyphs
    }

    pub fn aliases(&self) -> &[AliasEntry] {
        &self.aliases
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_size
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_size
    }

    pub fn x_advance(&self) -> i32 {
        self.x_advance
    }

    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    pub fn glyph_len(&self) -> usize {
        packed_len(self.cell_size)
    }

    /// Direct index lookup, falling back to the alias table, the way the
    /// display runtime resolves a codepoint.
    pub fn resolve(&self, codepoint: u32) -> Option<&GlyphEntry> {
        self.find(codepoint).or_else(|| {
            let alias = self.aliases.iter().find(|a| a.from == codepoint)?;
            self.find(alias.to)
        })
    }

    fn find(&self, codepoint: u32) -> Option<&GlyphEntry> {
        self.glyphs
            .binary_search_by_key(&codepoint, |e| e.codepoint)
            .ok()
            .map(|i| &self.glyphs[i])
    }

    pub fn glyph_bytes(&self, codepoint: u32) -> Option<&[u8]> {
        let entry = self.resolve(codepoint)?;
        let start = entry.offset as usize;
        self.blob.get(start..start + self.glyph_len())
    }

    pub fn bitmap(&self, codepoint: u32) -> Option<GlyphBitmap> {
        GlyphBitmap::from_packed(self.cell_size, self.glyph_bytes(codepoint)?)
    }

    /// True when the glyph index holds codepoints outside the BMP, so the
    /// runtime's index codepoint field has to be 32 bits wide.
    pub fn has_wide_codepoints(&self) -> bool {
        self.glyphs.last().is_some_and(|e| e.codepoint > 0xFFFF)
    }

    pub fn size_stats(&self) -> SizeStats {
        let entry_size = if self.has_wide_codepoints() {
            WIDE_GLYPH_ENTRY_SIZE
        } else {
            GLYPH_ENTRY_SIZE
        };
        SizeStats {
            bitmap_bytes: self.blob.len(),
            index_bytes: self.glyphs.len() * entry_size,
            alias_bytes: self.aliases.len() * ALIAS_ENTRY_SIZE,
        }
    }
}
