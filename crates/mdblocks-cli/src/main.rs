//! mdblocks CLI - Parse, validate, render and inspect rich-text content
//!
//! Usage:
//!   mdblocks [OPTIONS] <COMMAND> <FILE>
//!
//! Commands:
//!   parse     Display the block structure
//!   render    Render to HTML, markdown or plain text
//!   validate  Report authoring problems
//!   stats     Show document statistics
//!
//! `<FILE>` may be `-` to read standard input.

mod config;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser as ClapParser, Subcommand};
use log::{debug, info, LevelFilter};
use mdblocks_core::{
    to_html_with, Block, BlockKind, DiagnosticKind, Flag, ParseResult, Parser, Renderer, Span,
};
use serde::Serialize;

use crate::config::{Config, RenderFormat};

#[derive(ClapParser)]
#[command(name = "mdblocks", version)]
#[command(about = "Parse, validate and render CMS rich-text markup")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ~/.config/mdblocks/config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and display the block structure
    Parse {
        /// Input file, or - for stdin
        file: PathBuf,

        /// Output the block tree as JSON
        #[arg(short, long)]
        json: bool,

        /// Show every block with its spans
        #[arg(long)]
        verbose: bool,
    },
    /// Render to another format
    Render {
        /// Input file, or - for stdin
        file: PathBuf,

        /// Output format (defaults to the configured format, else html)
        #[arg(short, long, value_enum)]
        format: Option<RenderFormat>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check content for authoring problems
    Validate {
        /// Input file, or - for stdin
        file: PathBuf,

        /// Output the report as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Show document statistics
    Stats {
        /// Input file, or - for stdin
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_verbosity, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref()).context("failed to load configuration")?;
    debug!("configuration: {:?}", config);

    match cli.command {
        Command::Parse {
            file,
            json,
            verbose,
        } => {
            let input = read_input(&file)?;
            cmd_parse(&input, json, verbose)
        }
        Command::Render {
            file,
            format,
            output,
        } => {
            let input = read_input(&file)?;
            let format = format.unwrap_or(config.render.default_format);
            cmd_render(&input, format, output.as_deref(), &config)
        }
        Command::Validate { file, json } => {
            let input = read_input(&file)?;
            cmd_validate(&input, json)
        }
        Command::Stats { file } => {
            let input = read_input(&file)?;
            cmd_stats(&input);
            Ok(())
        }
    }
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read standard input")?;
        return Ok(input);
    }

    fs::read_to_string(file).with_context(|| format!("failed to read '{}'", file.display()))
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(input: &str, json: bool, verbose: bool) -> Result<()> {
    let result = Parser::new().parse_with_diagnostics(input);

    for diagnostic in result.diagnostics.iter() {
        eprintln!("warning: {}", diagnostic);
    }

    if json {
        let blocks: Vec<JsonBlock> = result.blocks.iter().map(convert_block).collect();
        let out = serde_json::to_string_pretty(&blocks).context("failed to serialize blocks")?;
        println!("{}", out);
    } else if verbose {
        print_blocks_verbose(&result.blocks);
    } else {
        print_blocks_summary(&result.blocks);
    }

    Ok(())
}

// =============================================================================
// Render Command
// =============================================================================

fn render(blocks: &[Block<'_>], format: RenderFormat, config: &Config) -> String {
    match format {
        RenderFormat::Html => to_html_with(blocks, &config.html),
        RenderFormat::Markdown => Renderer::markdown().render(blocks),
        RenderFormat::Text => Renderer::plain_text().render(blocks),
    }
}

fn cmd_render(
    input: &str,
    format: RenderFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let blocks = Parser::new().parse(input);
    let mut rendered = render(&blocks, format, config);
    rendered.push('\n');

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

// =============================================================================
// Validate Command
// =============================================================================

fn cmd_validate(input: &str, json: bool) -> Result<()> {
    let result = Parser::new().parse_with_diagnostics(input);

    if json {
        println!("{}", validation_report(&result));
    } else if result.is_clean() {
        println!("Valid: no problems found");
    } else {
        eprintln!("Invalid: {} problem(s) found", result.diagnostics.len());
        for diagnostic in result.diagnostics.iter() {
            eprintln!("  - [{}] {}", diagnostic.kind, diagnostic);
        }
    }

    if !result.is_clean() {
        bail!("{} problem(s) found", result.diagnostics.len());
    }
    Ok(())
}

fn validation_report(result: &ParseResult<'_>) -> serde_json::Value {
    let diagnostics: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "kind": d.kind.as_str(),
                "message": d.message,
                "line": d.line,
            })
        })
        .collect();
    serde_json::json!({"valid": result.is_clean(), "diagnostics": diagnostics})
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(input: &str) {
    let result = Parser::new().parse_with_diagnostics(input);
    let stats = DocumentStats::from_blocks(&result.blocks, input);

    println!("Document Statistics");
    println!("-------------------");
    println!("Content:");
    println!("  Top-level blocks: {}", stats.top_level);
    for kind in BlockKind::ALL {
        println!("  {:<16}  {}", format!("{}:", kind.name()), stats.count(kind));
    }
    println!("  Spans:            {}", stats.spans);
    println!();
    println!("Size:");
    println!("  Characters:       {}", stats.chars);
    println!("  Words (est.):     {}", stats.words);
    println!("  Lines:            {}", stats.lines);
    println!();
    println!("Diagnostics:");
    for kind in [
        DiagnosticKind::UnclosedCodeFence,
        DiagnosticKind::HeadingTooDeep,
        DiagnosticKind::UnbalancedDelimiter,
    ] {
        println!(
            "  {:<22}  {}",
            format!("{}:", kind.as_str()),
            result.diagnostics.count(kind)
        );
    }
}

#[derive(Debug, Default)]
struct DocumentStats {
    top_level: usize,
    kinds: HashMap<BlockKind, usize>,
    spans: usize,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_blocks(blocks: &[Block<'_>], input: &str) -> Self {
        let mut stats = Self {
            top_level: blocks.len(),
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            ..Self::default()
        };

        stats.count_blocks(blocks);
        stats
    }

    fn count_blocks(&mut self, blocks: &[Block<'_>]) {
        for block in blocks {
            self.bump(block.kind());
            match block {
                Block::List(list) => {
                    for item in &list.items {
                        self.bump(BlockKind::ListItem);
                        self.spans += item.spans.len();
                    }
                }
                Block::Quote(quote) => self.count_blocks(&quote.blocks),
                Block::Code(_) => {}
                _ => self.spans += block.spans().map_or(0, |spans| spans.len()),
            }
        }
    }

    fn bump(&mut self, kind: BlockKind) {
        *self.kinds.entry(kind).or_insert(0) += 1;
    }

    fn count(&self, kind: BlockKind) -> usize {
        self.kinds.get(&kind).copied().unwrap_or(0)
    }
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonBlock<'a> {
    Paragraph {
        spans: Vec<JsonSpan<'a>>,
    },
    Heading {
        level: u8,
        spans: Vec<JsonSpan<'a>>,
    },
    List {
        ordered: bool,
        items: Vec<JsonListItem<'a>>,
    },
    Quote {
        level: usize,
        blocks: Vec<JsonBlock<'a>>,
    },
    Code {
        language: &'a str,
        content: &'a str,
    },
    HorizontalRule,
}

#[derive(Debug, Serialize)]
struct JsonListItem<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    explicit_number: Option<u64>,
    spans: Vec<JsonSpan<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonSpan<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    flags: Vec<&'static str>,
}

fn convert_block<'a>(block: &'a Block<'_>) -> JsonBlock<'a> {
    match block {
        Block::Paragraph(p) => JsonBlock::Paragraph {
            spans: convert_spans(&p.spans),
        },
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level,
            spans: convert_spans(&h.spans),
        },
        Block::List(l) => JsonBlock::List {
            ordered: l.ordered,
            items: l
                .items
                .iter()
                .map(|item| JsonListItem {
                    explicit_number: item.explicit_number,
                    spans: convert_spans(&item.spans),
                })
                .collect(),
        },
        Block::Quote(q) => JsonBlock::Quote {
            level: q.level,
            blocks: q.blocks.iter().map(convert_block).collect(),
        },
        Block::Code(c) => JsonBlock::Code {
            language: &c.language,
            content: &c.content,
        },
        Block::HorizontalRule => JsonBlock::HorizontalRule,
    }
}

fn convert_spans<'a>(spans: &'a [Span<'_>]) -> Vec<JsonSpan<'a>> {
    spans
        .iter()
        .map(|span| JsonSpan {
            text: &span.text,
            flags: span.style.flags().map(Flag::name).collect(),
        })
        .collect()
}

// =============================================================================
// Text Output
// =============================================================================

fn print_blocks_summary(blocks: &[Block<'_>]) {
    println!("Blocks: {}", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        println!("  [{}] {}", i + 1, describe_block(block));
    }
}

fn print_blocks_verbose(blocks: &[Block<'_>]) {
    println!("=== mdblocks tree ===");
    for (i, block) in blocks.iter().enumerate() {
        println!();
        println!("[{}] {}", i + 1, describe_block(block));
        print_block_verbose(block, 1);
    }
}

fn describe_block(block: &Block<'_>) -> String {
    match block {
        Block::Heading(h) => format!("Heading (level {})", h.level),
        Block::Paragraph(_) => "Paragraph".to_string(),
        Block::List(l) => format!(
            "List ({}, {} items)",
            if l.ordered { "ordered" } else { "unordered" },
            l.items.len()
        ),
        Block::Quote(q) => format!("Quote (level {}, {} blocks)", q.level, q.blocks.len()),
        Block::Code(c) => format!("Code (language: {})", c.language),
        Block::HorizontalRule => "HorizontalRule".to_string(),
    }
}

fn print_block_verbose(block: &Block<'_>, indent: usize) {
    let prefix = "  ".repeat(indent);

    match block {
        Block::Heading(h) => println!("{}Content: {}", prefix, format_spans(&h.spans)),
        Block::Paragraph(p) => println!("{}Content: {}", prefix, format_spans(&p.spans)),
        Block::List(l) => {
            for (i, item) in l.items.iter().enumerate() {
                let number = match item.explicit_number {
                    Some(n) => format!(" (#{})", n),
                    None => String::new(),
                };
                println!(
                    "{}Item {}{}: {}",
                    prefix,
                    i + 1,
                    number,
                    format_spans(&item.spans)
                );
            }
        }
        Block::Quote(q) => {
            for (i, child) in q.blocks.iter().enumerate() {
                println!("{}Block {}:", prefix, i + 1);
                print_block_verbose(child, indent + 1);
            }
        }
        Block::Code(c) => {
            let preview: String = c.content.chars().take(60).collect();
            let ellipsis = if c.content.chars().count() > 60 {
                "..."
            } else {
                ""
            };
            println!(
                "{}Content: {}{}",
                prefix,
                preview.replace('\n', "\\n"),
                ellipsis
            );
        }
        Block::HorizontalRule => {}
    }
}

/// Spans as `text{flags}` with breaks shown as `\n`.
fn format_spans(spans: &[Span<'_>]) -> String {
    let mut result = String::new();
    for span in spans {
        if span.is_break() {
            result.push_str("\\n");
            continue;
        }
        result.push_str(&span.text);
        if !span.style.is_plain() {
            let flags: Vec<&str> = span.style.flags().map(Flag::name).collect();
            result.push('{');
            result.push_str(&flags.join(","));
            result.push('}');
        }
    }
    result
}
