//! C header output consumed by the display firmware.
use crate::table::FontTable;
use std::io::{self, Write};

const BYTES_PER_LINE: usize = 16;

#[derive(Clone, Debug)]
pub struct HeaderOptions {
    /// Prefix of every emitted symbol, e.g. `CJKFont16px`.
    pub var_prefix: String,
    /// Runtime header declaring the glyph, alias and font structs.
    pub include: String,
    /// C++ namespace of those structs.
    pub namespace: String,
    /// File name of the source font, for the banner.
    pub source_name: String,
    pub render_size: u32,
}

impl HeaderOptions {
    pub fn new(cell_size: u32, render_size: u32) -> Self {
        Self {
            var_prefix: default_var_prefix(cell_size),
            include: "graphics/niche/Fonts/CJK/CJKFont.h".into(),
            namespace: "NicheGraphics".into(),
            source_name: String::new(),
            render_size,
        }
    }
}

pub fn default_var_prefix(cell_size: u32) -> String {
    format!("CJKFont{cell_size}px")
}

fn describe(codepoint: u32) -> String {
    match char::from_u32(codepoint) {
        Some(ch) if !ch.is_control() => ch.to_string(),
        _ => format!("U+{codepoint:04X}"),
    }
}

pub fn write_header<W: Write>(out: &mut W, table: &FontTable, options: &HeaderOptions) -> io::Result<()> {
    let prefix = &options.var_prefix;
    let ns = &options.namespace;
    let ideographs = table
        .glyphs()
        .iter()
        .filter(|e| crate::charset::is_ideograph(e.codepoint))
        .count();

    writeln!(
        out,
        "// Auto-generated CJK bitmap font: {}px cell, {}px render",
        table.cell_width(),
        options.render_size
    )?;
    writeln!(out, "// Source: {}", options.source_name)?;
    writeln!(
        out,
        "// Glyphs: {} ({ideographs} kanji), Bitmap: {} bytes",
        table.glyph_count(),
        table.blob().len()
    )?;
    if table.has_wide_codepoints() {
        writeln!(out, "// Codepoints above U+FFFF present: CJKGlyph::codepoint must be 32-bit")?;
    }
    writeln!(out)?;
    writeln!(out, "#pragma once")?;
    writeln!(out)?;
    writeln!(out, "#include \"{}\"", options.include)?;
    writeln!(out)?;

    writeln!(out, "const uint8_t {prefix}Bitmaps[] PROGMEM = {{")?;
    for chunk in table.blob().chunks(BYTES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|b| format!("0x{b:02X}")).collect();
        writeln!(out, "    {},", line.join(", "))?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(out, "const {ns}::CJKGlyph {prefix}Glyphs[] PROGMEM = {{")?;
    for e in table.glyphs() {
        writeln!(
            out,
            "    {{ 0x{:04X}, {:6} }}, // {}",
            e.codepoint,
            e.offset,
            describe(e.codepoint)
        )?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    if !table.aliases().is_empty() {
        writeln!(out, "const {ns}::CJKAlias {prefix}Aliases[] PROGMEM = {{")?;
        for a in table.aliases() {
            writeln!(
                out,
                "    {{ 0x{:04X}, 0x{:04X} }}, // {} -> {}",
                a.from,
                a.to,
                describe(a.from),
                describe(a.to)
            )?;
        }
        writeln!(out, "}};")?;
        writeln!(
            out,
            "const uint16_t {prefix}AliasCount = {};",
            table.aliases().len()
        )?;
        writeln!(out)?;
    }

    writeln!(out, "const {ns}::CJKFont {prefix} PROGMEM = {{")?;
    writeln!(out, "    {prefix}Bitmaps,")?;
    writeln!(out, "    {prefix}Glyphs,")?;
    writeln!(out, "    {},  // glyphCount", table.glyph_count())?;
    writeln!(out, "    {},    // width", table.cell_width())?;
    writeln!(out, "    {},    // height", table.cell_height())?;
    writeln!(out, "    {},    // xAdvance", table.x_advance())?;
    writeln!(out, "    {},     // yOffset", table.y_offset())?;
    writeln!(out, "}};")?;
    Ok(())
}

/// Convenience: render the header into a `String`.
pub fn header_string(table: &FontTable, options: &HeaderOptions) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_header(&mut buf, table, options);
    String::from_utf8_lossy(&buf).into_owned()
}
