use anyhow::{bail, Context, Result};
use cellfont::{
    charset::{is_ideograph, japanese_codepoints, load_ideograph_list, parse_codepoint},
    emit::{default_var_prefix, write_header, HeaderOptions},
    Generator, GeneratorConfig, GlyphSource, OutlineFont,
};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::preview::render_text;
mod preview;

const DEFAULT_KANJI_LIST: &str = "joyo_kanji.txt";

#[derive(Parser)]
#[command(name = "cellfont", about = "Fixed-cell bitmap font generator")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate a C header holding the bitmap font
    Generate {
        /// TrueType/OpenType font, or a ZIP archive containing one
        font: PathBuf,
        /// Cell width and height in pixels
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        cell_size: u32,
        /// Header file to write
        output: PathBuf,
        /// Symbol prefix [default: CJKFont<cell_size>px]
        #[arg(long)]
        var_prefix: Option<String>,
        /// Size the outlines are rendered at before downscaling [default: cell_size * 1.4]
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        render_size: Option<u32>,
        /// Vertical baseline adjustment [default: -cell_size]
        #[arg(long, allow_hyphen_values = true)]
        y_offset: Option<i32>,
        /// Cursor advance per character [default: cell_size + 1]
        #[arg(long, allow_hyphen_values = true)]
        x_advance: Option<i32>,
        /// Only include the first N kanji of the list
        #[arg(long)]
        max_kanji: Option<usize>,
        /// One kanji per line [default: joyo_kanji.txt next to the font]
        #[arg(long)]
        kanji_list: Option<PathBuf>,
        /// Redirect FROM to TO's glyph, e.g. U+20B9F=U+53F1 (repeatable)
        #[arg(long = "alias", value_parser = parse_alias)]
        aliases: Vec<(u32, u32)>,
        /// Add the built-in variant kanji aliases whose targets were rendered
        #[arg(long)]
        standard_aliases: bool,
        /// Runtime header to #include
        #[arg(long, default_value = "graphics/niche/Fonts/CJK/CJKFont.h")]
        include: String,
        /// Namespace of the runtime structs
        #[arg(long, default_value = "NicheGraphics")]
        namespace: String,
    },
    /// Render text through the generated cells
    Preview {
        #[arg(short, long)]
        font: PathBuf,
        #[arg(short, long)]
        text: String,
        #[arg(short, long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..))]
        cell_size: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        render_size: Option<u32>,
        /// Also write the cells to a PNG
        #[arg(long)]
        png: Option<PathBuf>,
        /// Pixel scale for --png
        #[arg(long, default_value = "4")]
        scale: u32,
    },
    /// Inspect font metrics and repertoire coverage
    Inspect {
        #[arg(short, long)]
        font: PathBuf,
        #[arg(long)]
        kanji_list: Option<PathBuf>,
        #[arg(long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..))]
        cell_size: u32,
    },
}

fn parse_alias(s: &str) -> std::result::Result<(u32, u32), String> {
    let (from, to) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FROM=TO, got '{s}'"))?;
    let from = parse_codepoint(from).map_err(|e| e.to_string())?;
    let to = parse_codepoint(to).map_err(|e| e.to_string())?;
    Ok((from, to))
}

fn load_font(path: &Path) -> Result<OutlineFont> {
    info!("Loading font: {}", path.display());
    OutlineFont::load(path).with_context(|| format!("failed to load font {}", path.display()))
}

fn kanji_for(font: &Path, list: Option<PathBuf>) -> Result<Vec<char>> {
    let explicit = list.is_some();
    let path = list.unwrap_or_else(|| {
        font.parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_KANJI_LIST)
    });
    if !path.exists() {
        if explicit {
            bail!("kanji list {} not found", path.display());
        }
        warn!("{} not found, generating without kanji", path.display());
        return Ok(Vec::new());
    }
    load_ideograph_list(&path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Generate {
            font: font_path,
            cell_size,
            output,
            var_prefix,
            render_size,
            y_offset,
            x_advance,
            max_kanji,
            kanji_list,
            aliases,
            standard_aliases,
            include,
            namespace,
        } => {
            let mut config = GeneratorConfig::new(cell_size);
            if let Some(render_size) = render_size {
                config.render_size = render_size;
            }
            if let Some(y_offset) = y_offset {
                config.y_offset = y_offset;
            }
            if let Some(x_advance) = x_advance {
                config.x_advance = x_advance;
            }
            let render_size = config.render_size;

            let font = load_font(&font_path)?;
            let kanji = kanji_for(&font_path, kanji_list)?;
            let codepoints = japanese_codepoints(&kanji, max_kanji);
            let kanji_count = codepoints.iter().filter(|cp| is_ideograph(**cp)).count();
            info!(
                "Processing {} codepoints ({kanji_count} kanji, cell={cell_size}px, render={render_size}px)...",
                codepoints.len()
            );

            let generator = Generator::new(config)?
                .with_aliases(aliases.into_iter().collect::<BTreeMap<_, _>>())
                .with_standard_aliases(standard_aliases);
            let (table, report) = generator.generate(&font, &codepoints)?;
            info!(
                "  Rendered: {} glyphs, skipped: {}",
                report.rendered,
                report.skip_count()
            );
            let stats = table.size_stats();
            info!(
                "  Bitmap: {:.1} KB, table: {:.1} KB, aliases: {:.1} KB, total: {:.1} KB",
                stats.bitmap_bytes as f64 / 1024.0,
                stats.index_bytes as f64 / 1024.0,
                stats.alias_bytes as f64 / 1024.0,
                stats.total() as f64 / 1024.0
            );

            let mut options = HeaderOptions::new(cell_size, render_size);
            options.var_prefix = var_prefix.unwrap_or_else(|| default_var_prefix(cell_size));
            options.include = include;
            options.namespace = namespace;
            options.source_name = font.name().to_string();

            let mut buf = Vec::new();
            write_header(&mut buf, &table, &options)?;
            fs::write(&output, buf).with_context(|| format!("failed to write {}", output.display()))?;
            println!("Written: {}", output.display());
        }
        Cmd::Preview {
            font: font_path,
            text,
            cell_size,
            render_size,
            png,
            scale,
        } => {
            let font = load_font(&font_path)?;
            let mut config = GeneratorConfig::new(cell_size);
            if let Some(render_size) = render_size {
                config.render_size = render_size;
            }
            let mut codepoints: Vec<u32> = text.chars().map(u32::from).collect();
            codepoints.sort_unstable();
            codepoints.dedup();
            let (table, report) = Generator::new(config)?
                .with_standard_aliases(true)
                .generate(&font, &codepoints)?;
            for cp in &report.skipped {
                warn!("no glyph for U+{cp:04X}");
            }
            println!("{}", render_text(&table, &text).into_text());
            if let Some(png) = png {
                render_text(&table, &text)
                    .into_image(scale)
                    .save(&png)
                    .with_context(|| format!("failed to write {}", png.display()))?;
                eprintln!("Preview image -> {}", png.display());
            }
        }
        Cmd::Inspect {
            font: font_path,
            kanji_list,
            cell_size,
        } => {
            let font = load_font(&font_path)?;
            let render_size = GeneratorConfig::default_render_size(cell_size);
            let metrics = font.line_metrics(render_size as f32);
            println!("Font: {}", font.name());
            println!("  Glyphs in font: {}", font.glyph_count());
            println!(
                "  At {render_size}px: ascent {:.2}, descent {:.2}",
                metrics.ascent, metrics.descent
            );

            let kanji = kanji_for(&font_path, kanji_list)?;
            let codepoints = japanese_codepoints(&kanji, None);
            let missing: Vec<u32> = codepoints
                .iter()
                .copied()
                .filter(|cp| char::from_u32(*cp).is_some_and(|ch| !font.has_char(ch)))
                .collect();
            println!(
                "  Repertoire: {} codepoints ({} kanji), {} missing",
                codepoints.len(),
                codepoints.iter().filter(|cp| is_ideograph(**cp)).count(),
                missing.len()
            );
            for cp in missing.iter().take(20) {
                println!("    U+{cp:04X}");
            }
            if missing.len() > 20 {
                println!("    ... and {} more", missing.len() - 20);
            }
        }
    }
    Ok(())
}
