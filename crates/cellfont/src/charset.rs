//! Codepoint selection for the Japanese repertoire.
use crate::error::{FontError, Result};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::{fs, path::Path};

pub const HIRAGANA: RangeInclusive<u32> = 0x3041..=0x3096;
pub const KATAKANA: RangeInclusive<u32> = 0x30A1..=0x30FA;
pub const PROLONGED_SOUND_MARK: u32 = 0x30FC;
pub const FULLWIDTH_DIGITS: RangeInclusive<u32> = 0xFF10..=0xFF19;
pub const FULLWIDTH_UPPER: RangeInclusive<u32> = 0xFF21..=0xFF3A;
pub const FULLWIDTH_LOWER: RangeInclusive<u32> = 0xFF41..=0xFF5A;
pub const HALFWIDTH_KATAKANA: RangeInclusive<u32> = 0xFF65..=0xFF9F;
/// CJK Unified Ideographs, used to count kanji in a charset.
pub const CJK_UNIFIED: RangeInclusive<u32> = 0x4E00..=0x9FFF;

const PUNCTUATION: &[&str] = &[
    "。、・「」『』（）【】〜〇々〈〉《》〒〝〞〟",
    "？！，．：；＠＃＄％＆＊＋－＝＜＞／＼｜＿～＾｀",
    "（）［］｛｝「」『』【】＂＇",
];

const SYMBOLS: &[&str] = &[
    "→←↑↓○●◎△▲▽▼□■◇◆★☆※†‡",
    "¢£¥￠￡￥²³×÷¼½¾℃♠♣♥♦♪",
];

pub fn is_ideograph(codepoint: u32) -> bool {
    CJK_UNIFIED.contains(&codepoint)
}

/// Kana, ideographic space, punctuation, fullwidth alphanumerics, symbols,
/// halfwidth katakana and the first `max_ideographs` of `ideographs`.
/// The result is ascending and free of duplicates.
pub fn japanese_codepoints(ideographs: &[char], max_ideographs: Option<usize>) -> Vec<u32> {
    let mut set = BTreeSet::new();
    set.extend(HIRAGANA);
    set.extend(KATAKANA);
    set.insert(PROLONGED_SOUND_MARK);
    set.insert(0x3000);
    for group in PUNCTUATION.iter().chain(SYMBOLS) {
        set.extend(group.chars().map(u32::from));
    }
    set.extend(FULLWIDTH_DIGITS);
    set.extend(FULLWIDTH_UPPER);
    set.extend(FULLWIDTH_LOWER);
    set.extend(HALFWIDTH_KATAKANA);

    let take = max_ideographs.unwrap_or(ideographs.len()).min(ideographs.len());
    set.extend(ideographs[..take].iter().map(|c| u32::from(*c)));
    set.into_iter().collect()
}

/// One character per line; blank lines and lines holding more than a single
/// character are ignored. Order is preserved, repeats are dropped.
pub fn parse_ideograph_list(text: &str) -> Vec<char> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for line in text.lines() {
        let mut chars = line.trim().chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            continue;
        };
        if seen.insert(ch) {
            out.push(ch);
        }
    }
    out
}

pub fn load_ideograph_list(path: &Path) -> Result<Vec<char>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_ideograph_list(&text))
}

/// Accepts `U+53F1`, `0x53F1`, bare hex `53F1`, or a single character.
///
/// A single character is always taken literally, so `A` is U+0041 and `7`
/// is U+0037; write `U+7` or `0x7` for the control code.
pub fn parse_codepoint(s: &str) -> Result<u32> {
    let s = s.trim();
    let mut chars = s.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(u32::from(ch));
    }
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let cp = u32::from_str_radix(hex, 16)
        .map_err(|_| FontError::InvalidConfig(format!("not a codepoint: {s}")))?;
    if char::from_u32(cp).is_none() {
        return Err(FontError::InvalidConfig(format!("not a Unicode scalar value: {s}")));
    }
    Ok(cp)
}
