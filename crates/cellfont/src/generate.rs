//! The generation pass: rasterize every requested codepoint, pack the
//! survivors and attach the alias table.
use crate::{
    alias::{build_aliases, retain_resolvable, standard_aliases},
    charset::is_ideograph,
    error::{FontError, Result},
    pack::pack,
    position::{Classifier, PositionRules},
    raster::{check_threshold, Rasterizer, DEFAULT_THRESHOLD, IDEOGRAPHIC_SPACE},
    source::GlyphSource,
    table::FontTable,
};
use log::{debug, info, warn};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    pub cell_size: u32,
    pub render_size: u32,
    pub x_advance: i32,
    pub y_offset: i32,
    pub threshold: u8,
    pub force_blank: Vec<u32>,
}

impl GeneratorConfig {
    /// Defaults for a cell: render at 1.4× the cell, advance one pixel past
    /// the cell, and shift up by a full cell.
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size,
            render_size: Self::default_render_size(cell_size),
            x_advance: cell_size as i32 + 1,
            y_offset: -(cell_size as i32),
            threshold: DEFAULT_THRESHOLD,
            force_blank: vec![IDEOGRAPHIC_SPACE],
        }
    }

    pub fn default_render_size(cell_size: u32) -> u32 {
        cell_size * 14 / 10
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(FontError::InvalidConfig("cell size must be at least 1".into()));
        }
        if self.render_size == 0 {
            return Err(FontError::InvalidConfig("render size must be at least 1".into()));
        }
        check_threshold(self.threshold)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub requested: usize,
    pub rendered: usize,
    pub forced_blank: usize,
    pub ideographs: usize,
    pub skipped: Vec<u32>,
}

impl GenerationReport {
    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }
}

pub struct Generator {
    config: GeneratorConfig,
    rasterizer: Rasterizer,
    aliases: BTreeMap<u32, u32>,
    standard_aliases: bool,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_rules(config, PositionRules::standard())
    }

    pub fn with_rules(config: GeneratorConfig, rules: PositionRules) -> Result<Self> {
        config.validate()?;
        let rasterizer = Rasterizer::new(config.cell_size, config.render_size, Classifier::new(rules))?
            .with_force_blank(config.force_blank.iter().copied())
            .with_threshold(config.threshold)?;
        Ok(Self {
            config,
            rasterizer,
            aliases: BTreeMap::new(),
            standard_aliases: false,
        })
    }

    /// Aliases that must resolve; a missing target fails the run.
    pub fn with_aliases(mut self, aliases: BTreeMap<u32, u32>) -> Self {
        self.aliases.extend(aliases);
        self
    }

    /// Also apply the built-in variant table for every target that got rendered.
    pub fn with_standard_aliases(mut self, enabled: bool) -> Self {
        self.standard_aliases = enabled;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn generate<F: GlyphSource + ?Sized>(&self, font: &F, codepoints: &[u32]) -> Result<(FontTable, GenerationReport)> {
        let mut report = GenerationReport {
            requested: codepoints.len(),
            ..Default::default()
        };
        let mut glyphs = Vec::with_capacity(codepoints.len());
        for &cp in codepoints {
            match self.rasterizer.rasterize(font, cp) {
                Some(bitmap) => {
                    if self.rasterizer.is_force_blank(cp) {
                        report.forced_blank += 1;
                    }
                    if is_ideograph(cp) {
                        report.ideographs += 1;
                    }
                    glyphs.push((cp, bitmap));
                }
                None => {
                    debug!("skipping U+{cp:04X}: no outline or no ink");
                    report.skipped.push(cp);
                }
            }
        }
        report.rendered = glyphs.len();

        let packed = pack(self.config.cell_size, glyphs)?;

        let mut alias_map = BTreeMap::new();
        if self.standard_aliases {
            alias_map = standard_aliases();
            retain_resolvable(&mut alias_map, &packed.entries);
        }
        alias_map.extend(self.aliases.iter().map(|(k, v)| (*k, *v)));
        let aliases = build_aliases(&alias_map, &packed.entries)?;

        info!(
            "rendered {} glyphs ({} kanji), skipped {}, {} aliases",
            packed.entries.len(),
            report.ideographs,
            report.skip_count(),
            aliases.len()
        );

        let table = FontTable::new(packed, aliases, self.config.x_advance, self.config.y_offset);
        if table.has_wide_codepoints() {
            warn!("glyph index holds codepoints above U+FFFF; the runtime needs a 32-bit codepoint field");
        }
        Ok((table, report))
    }
}
