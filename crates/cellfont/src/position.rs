//! Positioning classifier: decides which crop rule places a glyph in its cell.
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// How the crop window is chosen relative to a glyph's ink box.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositioningMode {
    /// Tight crop around the ink, centered. Kana and ideographs.
    #[default]
    Default,
    /// Sits on the baseline: periods, commas, ellipses, underscore.
    Bottom,
    /// Hangs from the top: quote marks.
    Top,
    /// Opening brackets, pushed toward the text that follows.
    Open,
    /// Closing brackets, pushed toward the text that precedes.
    Close,
    /// Centered in the cell: middle dot, wave dash, most CJK punctuation.
    Center,
}

impl PositioningMode {
    /// Punctuation modes crop with a fixed window instead of a tight one.
    pub fn is_punctuation(self) -> bool {
        self != PositioningMode::Default
    }
}

/// CJK Symbols and Punctuation.
pub const CJK_PUNCTUATION_BLOCK: RangeInclusive<u32> = 0x3000..=0x303F;

// Membership tables for the non-default modes.
const STANDARD_TABLE: &[(PositioningMode, &str)] = &[
    (PositioningMode::Bottom, "、。，．＿…‥,._"),
    (PositioningMode::Top, "〝〞〟＂＇\"'\u{2018}\u{2019}\u{201C}\u{201D}"),
    (PositioningMode::Open, "「『（［｛【〈《〔〖〘〚｟([{"),
    (PositioningMode::Close, "」』）］｝】〉》〕〗〙〛｠)]}"),
    (PositioningMode::Center, "・〜～：；！？·"),
];

static STANDARD_RULES: Lazy<PositionRules> = Lazy::new(|| {
    let mut rules = PositionRules::new();
    for (mode, chars) in STANDARD_TABLE {
        rules.extend(*mode, chars.chars().map(u32::from));
    }
    rules
});

/// Immutable classification data handed to a [`Classifier`].
#[derive(Clone, Debug)]
pub struct PositionRules {
    modes: HashMap<u32, PositioningMode>,
    fallback_block: RangeInclusive<u32>,
    fallback_mode: PositioningMode,
}

impl PositionRules {
    /// Empty rule set; only the CJK punctuation block fallback applies.
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
            fallback_block: CJK_PUNCTUATION_BLOCK,
            fallback_mode: PositioningMode::Center,
        }
    }

    /// Rules for Japanese text: fullwidth and ASCII punctuation.
    pub fn standard() -> Self {
        STANDARD_RULES.clone()
    }

    /// Assign `mode` to every codepoint in `codepoints`. Later calls win.
    pub fn extend(&mut self, mode: PositioningMode, codepoints: impl IntoIterator<Item = u32>) {
        for cp in codepoints {
            self.modes.insert(cp, mode);
        }
    }

    pub fn with(mut self, mode: PositioningMode, codepoints: impl IntoIterator<Item = u32>) -> Self {
        self.extend(mode, codepoints);
        self
    }

    /// Codepoints explicitly assigned to `mode`, ascending.
    pub fn members(&self, mode: PositioningMode) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .modes
            .iter()
            .filter(|(_, m)| **m == mode)
            .map(|(cp, _)| *cp)
            .collect();
        out.sort_unstable();
        out
    }
}

impl Default for PositionRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Classifier {
    rules: PositionRules,
}

impl Classifier {
    pub fn new(rules: PositionRules) -> Self {
        Self { rules }
    }

    /// Total and pure: explicit tables first, then the block fallback, then `Default`.
    pub fn classify(&self, codepoint: u32) -> PositioningMode {
        if let Some(mode) = self.rules.modes.get(&codepoint) {
            return *mode;
        }
        if self.rules.fallback_block.contains(&codepoint) {
            return self.rules.fallback_mode;
        }
        PositioningMode::Default
    }

    pub fn rules(&self) -> &PositionRules {
        &self.rules
    }
}
