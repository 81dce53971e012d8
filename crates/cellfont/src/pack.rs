//! Bitmap packer: one contiguous blob plus a codepoint-sorted offset index.
use crate::{
    bitmap::{packed_len, GlyphBitmap},
    error::{FontError, Result},
};
use log::warn;

/// Locates one glyph's bytes inside the packed blob.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphEntry {
    pub codepoint: u32,
    pub offset: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedGlyphs {
    pub cell_size: u32,
    pub blob: Vec<u8>,
    pub entries: Vec<GlyphEntry>,
}

impl PackedGlyphs {
    pub fn glyph_len(&self) -> usize {
        packed_len(self.cell_size)
    }

    /// Binary search on the sorted index.
    pub fn find(&self, codepoint: u32) -> Option<&GlyphEntry> {
        self.entries
            .binary_search_by_key(&codepoint, |e| e.codepoint)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn bytes_of(&self, entry: &GlyphEntry) -> &[u8] {
        let start = entry.offset as usize;
        &self.blob[start..start + self.glyph_len()]
    }
}

/// Sorts `glyphs` by codepoint and concatenates their packed bytes.
///
/// Each entry's offset is the blob length before its glyph was appended.
/// A repeated codepoint keeps its first occurrence; later ones are dropped.
/// Every bitmap must have `cell_size`.
pub fn pack(cell_size: u32, glyphs: impl IntoIterator<Item = (u32, GlyphBitmap)>) -> Result<PackedGlyphs> {
    let mut glyphs: Vec<(u32, GlyphBitmap)> = glyphs.into_iter().collect();
    // stable, so the first occurrence of a duplicate stays first
    glyphs.sort_by_key(|(cp, _)| *cp);

    let glyph_len = packed_len(cell_size);
    let mut blob = Vec::with_capacity(glyphs.len() * glyph_len);
    let mut entries: Vec<GlyphEntry> = Vec::with_capacity(glyphs.len());
    for (codepoint, bitmap) in glyphs {
        if bitmap.cell_size() != cell_size {
            return Err(FontError::CellSizeMismatch {
                expected: cell_size,
                found: bitmap.cell_size(),
            });
        }
        if entries.last().is_some_and(|e| e.codepoint == codepoint) {
            warn!("dropping duplicate glyph for U+{codepoint:04X}");
            continue;
        }
        let offset = u32::try_from(blob.len())
            .map_err(|_| FontError::InvalidConfig("bitmap blob exceeds 4 GiB".into()))?;
        entries.push(GlyphEntry { codepoint, offset });
        blob.extend_from_slice(bitmap.as_bytes());
    }

    Ok(PackedGlyphs {
        cell_size,
        blob,
        entries,
    })
}
