//! Alias table: codepoints without a glyph of their own that borrow another's.
use crate::{
    error::{FontError, Result},
    pack::GlyphEntry,
};
use log::warn;
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AliasEntry {
    pub from: u32,
    pub to: u32,
}

// Variant and legacy forms of common kanji, mapped to their standard glyph.
const STANDARD_VARIANTS: &[(u32, u32)] = &[
    (0x20B9F, 0x53F1), // 𠮟 -> 叱
    (0x20BB7, 0x5409), // 𠮷 -> 吉
    (0x9AD9, 0x9AD8),  // 髙 -> 高
    (0xFA11, 0x5D0E),  // 﨑 -> 崎
    (0x5FB7, 0x5FB3),  // 德 -> 徳
    (0x9089, 0x8FBA),  // 邉 -> 辺
    (0x908A, 0x8FBA),  // 邊 -> 辺
    (0x9F4B, 0x658E),  // 齋 -> 斎
    (0x9F4A, 0x6589),  // 齊 -> 斉
    (0x6FF5, 0x6D5C),  // 濵 -> 浜
    (0x6FF1, 0x6D5C),  // 濱 -> 浜
    (0xF9DC, 0x9686),  // compatibility 隆
    (0xFA10, 0x585A),  // compatibility 塚
    (0xFA12, 0x6674),  // compatibility 晴
    (0xFA19, 0x795E),  // compatibility 神
    (0xFA1A, 0x7965),  // compatibility 祥
    (0xFA1B, 0x798F),  // compatibility 福
];

/// The built-in variant table. Targets are not guaranteed to be rendered;
/// use [`retain_resolvable`] before building when the charset may be truncated.
pub fn standard_aliases() -> BTreeMap<u32, u32> {
    STANDARD_VARIANTS
        .iter()
        .copied()
        .collect()
}

/// Drops every pair whose target has no glyph entry.
pub fn retain_resolvable(map: &mut BTreeMap<u32, u32>, entries: &[GlyphEntry]) {
    map.retain(|_, to| has_entry(entries, *to));
}

fn has_entry(entries: &[GlyphEntry], codepoint: u32) -> bool {
    entries.binary_search_by_key(&codepoint, |e| e.codepoint).is_ok()
}

/// Validates `map` against the sorted glyph `entries` and returns the alias
/// table ordered by source codepoint.
///
/// A target without a glyph entry is a configuration error. A source that
/// already has its own glyph is dropped: direct lookups always win.
pub fn build_aliases(map: &BTreeMap<u32, u32>, entries: &[GlyphEntry]) -> Result<Vec<AliasEntry>> {
    let mut aliases = Vec::with_capacity(map.len());
    for (&from, &to) in map {
        if !has_entry(entries, to) {
            return Err(FontError::UnresolvedAlias { from, to });
        }
        if has_entry(entries, from) {
            warn!("U+{from:04X} has its own glyph, ignoring alias to U+{to:04X}");
            continue;
        }
        aliases.push(AliasEntry { from, to });
    }
    Ok(aliases)
}
