//! hdoc — scan annotated C headers and report the extracted symbols.
//!
//! Two modes:
//!
//! - **stdin mode**: `hdoc < header.h`
//! - **file mode**: `hdoc include/*.h src/`
//!
//! The engine itself does no I/O; this driver discovers files, reads
//! them, and surfaces diagnostics with file/offset context.

use anyhow::{Context, Result};
use clap::Parser;
use hdoc::{resolve, scan_corpus, scan_named, HeaderSource, ScanOutput};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hdoc",
    about = "Extract a symbol database from annotated C header files"
)]
struct Cli {
    /// Input files, directories, or glob patterns. If omitted, reads a
    /// single header from stdin.
    files: Vec<String>,

    /// Suppress the symbol listing; print diagnostics and the summary only.
    #[arg(short, long)]
    quiet: bool,

    /// Restrict the listing to one category.
    #[arg(short = 'c', long)]
    category: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = if cli.files.is_empty() {
        stdin_mode()?
    } else {
        file_mode(&cli.files)?
    };

    report(&output, &cli)
}

/// stdin mode: one header on standard input.
fn stdin_mode() -> Result<ScanOutput> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(scan_named("<stdin>", &input))
}

/// file mode: expand patterns, read every header, scan the corpus.
fn file_mode(patterns: &[String]) -> Result<ScanOutput> {
    let paths = expand_globs(patterns)?;
    let mut sources = Vec::new();
    for path in &paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        sources.push(HeaderSource::new(path.to_string_lossy(), text));
    }
    Ok(scan_corpus(&sources))
}

fn report(output: &ScanOutput, cli: &Cli) -> Result<()> {
    for diag in &output.diagnostics {
        eprintln!("{}", diag);
    }

    let unresolved = resolve(&output.graph);
    for diag in unresolved.to_diagnostics(&output.graph) {
        eprintln!("{}", diag);
    }

    if !cli.quiet {
        for category in output.graph.categories() {
            if cli.category.as_deref().is_some_and(|c| c != category) {
                continue;
            }
            println!("{}:", category);
            for name in output.graph.in_category(category) {
                if let Some(sym) = output.graph.get(name) {
                    println!("  {:<8} {}", sym.kind.to_string(), sym.name);
                }
            }
        }
    }

    let stats = output.graph.stats();
    println!(
        "{} symbols in {} categories ({} structs, {} enums, {} functions)",
        stats.total, stats.categories, stats.structs, stats.enums, stats.functions
    );

    let errors = output
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .count();
    if errors > 0 {
        anyhow::bail!("scan failed with {} error(s)", errors);
    }
    Ok(())
}

/// File extensions scanned when a bare directory is given.
const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx"];

fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| HEADER_EXTENSIONS.contains(&e))
}

/// Expand glob patterns into a list of real file paths. Bare directories
/// are scanned (non-recursively) for header files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && is_header(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic corpus order.
    files.sort();
    files.dedup();
    Ok(files)
}
