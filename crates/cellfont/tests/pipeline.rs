use cellfont::{
    packed_len,
    test_support::{SyntheticFont, SyntheticGlyph},
    Classifier, FontError, Generator, GeneratorConfig, GlyphBitmap, PositioningMode, Rasterizer,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn sample_codepoints(font: &SyntheticFont) -> Vec<u32> {
    let mut cps: Vec<u32> = font.chars().into_iter().map(u32::from).collect();
    cps.push(0x3000);
    cps
}

fn left_right_ink(bmp: &GlyphBitmap) -> (usize, usize) {
    let half = bmp.cell_size() / 2;
    let mut left = 0;
    let mut right = 0;
    for y in 0..bmp.cell_size() {
        for x in 0..bmp.cell_size() {
            if bmp.get(x, y) {
                if x < half {
                    left += 1;
                } else {
                    right += 1;
                }
            }
        }
    }
    (left, right)
}

#[test]
fn index_is_strictly_ascending() {
    let font = SyntheticFont::sample();
    let mut cps = sample_codepoints(&font);
    cps.reverse();
    let (table, _) = Generator::new(GeneratorConfig::new(16))
        .unwrap()
        .generate(&font, &cps)
        .expect("generation should succeed");
    assert!(table
        .glyphs()
        .windows(2)
        .all(|w| w[0].codepoint < w[1].codepoint));
}

#[test]
fn offsets_are_in_bounds_and_disjoint() {
    let font = SyntheticFont::sample();
    let (table, _) = Generator::new(GeneratorConfig::new(16))
        .unwrap()
        .generate(&font, &sample_codepoints(&font))
        .unwrap();
    let len = table.glyph_len();
    let mut ranges: Vec<(usize, usize)> = table
        .glyphs()
        .iter()
        .map(|e| (e.offset as usize, e.offset as usize + len))
        .collect();
    ranges.sort_unstable();
    for (start, end) in &ranges {
        assert!(*end <= table.blob().len(), "{start}..{end} out of bounds");
    }
    for w in ranges.windows(2) {
        assert!(w[0].1 <= w[1].0, "overlap: {:?}", w);
    }
    assert_eq!(table.blob().len(), table.glyph_count() * len);
}

#[test]
fn forced_blank_is_all_zero_regardless_of_font() {
    // even a font that inks U+3000 must yield an empty cell
    let font = SyntheticFont::new().with_glyph('\u{3000}', SyntheticGlyph::rect(0.0, 0.0, 1.0, 1.0));
    let (table, report) = Generator::new(GeneratorConfig::new(18))
        .unwrap()
        .generate(&font, &[0x3000])
        .unwrap();
    let bytes = table.glyph_bytes(0x3000).expect("blank glyph must have an entry");
    assert_eq!(bytes.len(), 41);
    assert!(bytes.iter().all(|b| *b == 0));
    assert_eq!(report.forced_blank, 1);
    assert_eq!(report.skip_count(), 0);
}

#[test]
fn period_sits_in_lower_third() {
    let font = SyntheticFont::sample();
    let r = Rasterizer::new(16, 22, Classifier::default()).unwrap();
    assert_eq!(r.classifier().classify(0x3002), PositioningMode::Bottom);
    let bmp = r.rasterize(&font, 0x3002).expect("period should render");
    let rows = bmp.row_ink();
    let total: usize = rows.iter().sum();
    let lower: usize = rows[16 * 2 / 3..].iter().sum();
    assert!(total > 0);
    assert!(lower * 10 >= total * 9, "{}", bmp.to_ascii('#', '.'));
}

#[test]
fn brackets_lean_toward_enclosed_text() {
    let font = SyntheticFont::sample();
    let r = Rasterizer::new(16, 22, Classifier::default()).unwrap();

    let open = r.rasterize(&font, '「' as u32).unwrap();
    let (left, right) = left_right_ink(&open);
    assert!(right > left, "{}", open.to_ascii('#', '.'));

    let close = r.rasterize(&font, '」' as u32).unwrap();
    let (left, right) = left_right_ink(&close);
    assert!(left > right, "{}", close.to_ascii('#', '.'));
}

#[test]
fn middle_dot_is_centered() {
    let font = SyntheticFont::sample();
    let r = Rasterizer::new(16, 22, Classifier::default()).unwrap();
    let dot = r.rasterize(&font, '・' as u32).unwrap();
    assert!(dot.ink_count() > 0);
    assert!(!dot.get(0, 0));
    assert!(!dot.get(15, 15));
    let rows = dot.row_ink();
    let top: usize = rows[..4].iter().sum();
    let bottom: usize = rows[12..].iter().sum();
    assert_eq!((top, bottom), (0, 0), "{}", dot.to_ascii('#', '.'));
}

#[test]
fn alias_resolves_to_target_offset() {
    let font = SyntheticFont::sample();
    let (table, _) = Generator::new(GeneratorConfig::new(16))
        .unwrap()
        .with_aliases(BTreeMap::from([(0x20B9F, 0x53F1)]))
        .generate(&font, &[0x53F1, 0x3042])
        .unwrap();
    let direct = table.resolve(0x53F1).expect("U+53F1 is rendered");
    let via_alias = table.resolve(0x20B9F).expect("alias should resolve");
    assert_eq!(via_alias.offset, direct.offset);
    assert!(table.glyphs().iter().all(|e| e.codepoint != 0x20B9F));
    for alias in table.aliases() {
        assert!(table.glyphs().iter().any(|e| e.codepoint == alias.to));
    }
}

#[test]
fn unresolved_alias_fails_generation() {
    let font = SyntheticFont::sample();
    let err = Generator::new(GeneratorConfig::new(16))
        .unwrap()
        .with_aliases(BTreeMap::from([(0x20B9F, 0x53F1)]))
        .generate(&font, &[0x3042])
        .unwrap_err();
    assert!(matches!(err, FontError::UnresolvedAlias { .. }));
}

#[test]
fn standard_aliases_only_keep_rendered_targets() {
    let font = SyntheticFont::sample();
    let (table, _) = Generator::new(GeneratorConfig::new(16))
        .unwrap()
        .with_standard_aliases(true)
        .generate(&font, &[0x53F1, 0x53E3])
        .unwrap();
    assert_eq!(table.aliases().len(), 1);
    assert_eq!(table.aliases()[0].from, 0x20B9F);
}

#[test]
fn missing_glyph_is_skipped_and_counted() {
    let font = SyntheticFont::sample();
    let mut cps = sample_codepoints(&font);
    cps.push(0xE000);
    let (table, report) = Generator::new(GeneratorConfig::new(16))
        .unwrap()
        .generate(&font, &cps)
        .unwrap();
    assert_eq!(report.skipped, vec![0xE000]);
    assert_eq!(report.skip_count(), 1);
    assert_eq!(report.rendered, cps.len() - 1);
    assert!(table.resolve(0xE000).is_none());
}

#[test]
fn cell_18_packs_41_bytes_per_glyph() {
    let font = SyntheticFont::sample();
    let (table, _) = Generator::new(GeneratorConfig::new(18))
        .unwrap()
        .generate(&font, &sample_codepoints(&font))
        .unwrap();
    assert_eq!(packed_len(18), 41);
    assert_eq!(table.glyph_len(), 41);
    for e in table.glyphs() {
        assert_eq!(table.glyph_bytes(e.codepoint).unwrap().len(), 41);
        assert_eq!(e.offset as usize % 41, 0);
    }
}

#[test]
fn regeneration_is_byte_identical() {
    let font = SyntheticFont::sample();
    let generator = Generator::new(GeneratorConfig::new(16)).unwrap().with_standard_aliases(true);
    let cps = sample_codepoints(&font);
    let (a, _) = generator.generate(&font, &cps).unwrap();
    let (b, _) = generator.generate(&font, &cps).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_cell_size_is_rejected() {
    let err = Generator::new(GeneratorConfig::new(0)).err().expect("must fail");
    assert!(matches!(err, FontError::InvalidConfig(_)));
}

#[test]
fn threshold_at_or_above_midpoint_is_rejected() {
    let mut config = GeneratorConfig::new(16);
    config.threshold = 250;
    let err = Generator::new(config.clone()).err().expect("must fail");
    assert!(matches!(err, FontError::InvalidConfig(_)));

    config.threshold = 127;
    assert!(Generator::new(config).is_ok());
}

#[test]
fn config_defaults() {
    let c = GeneratorConfig::new(16);
    assert_eq!(c.render_size, 22);
    assert_eq!(c.x_advance, 17);
    assert_eq!(c.y_offset, -16);
    assert_eq!(c.force_blank, vec![0x3000]);
}
