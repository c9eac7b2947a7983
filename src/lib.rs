//! hdoc — extract a symbol database from annotated C header files.
//!
//! Headers document their API with `/** ... */` blocks carrying a small
//! tag vocabulary (`@struct`, `@enum`, `@function`, `@category`, `@brief`,
//! `@param`, `@return`, `@remarks`, `@related`) plus per-member
//! `/* @member ... */` and `/* @entry ... */` comments inside declaration
//! bodies. The engine scans that text, binds each block to the declaration
//! following it, and aggregates the results into a [`SymbolGraph`] keyed
//! by name and grouped by category.
//!
//! The pipeline feeds strictly forward:
//! scanner → tag parser → binder (→ enum unroller) → graph builder, with
//! reference resolution deferred until the whole corpus is in the graph.
//!
//! Rendering the graph into documents is a consumer's concern; the engine
//! returns data plus diagnostics.

pub mod binder;
pub mod corpus;
pub mod diag;
pub mod graph;
pub mod model;
pub mod resolve;
pub mod scanner;
pub mod search;
pub mod tags;
pub mod unroll;

pub use corpus::{scan_corpus, HeaderSource};
pub use diag::{DiagKind, Diagnostic, ScanError, Severity};
pub use graph::{Conflict, Stats, SymbolGraph};
pub use model::{MemberDoc, ParamDoc, Symbol, SymbolKind, TagRecord};
pub use resolve::{resolve, UnresolvedReport};
pub use search::{search, SearchOptions};

use crate::model::line_of;

/// A completed scan: the (possibly partial) symbol graph plus everything
/// reported along the way, in discovery order.
#[derive(Debug)]
pub struct ScanOutput {
    pub graph: SymbolGraph,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanOutput {
    /// True when a fatal scan error aborted some file.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Scan a single header text.
pub fn scan(text: &str) -> ScanOutput {
    scan_named("<input>", text)
}

/// Scan a single header text under an explicit file name (used in symbol
/// source locations and diagnostics).
pub fn scan_named(file: &str, text: &str) -> ScanOutput {
    build_graph(vec![scan_file(file, text)])
}

/// Per-file pipeline result, before graph insertion.
pub(crate) struct FileScan {
    pub symbols: Vec<Symbol>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run one file through scanner → tag parser → binder. A fatal scan error
/// aborts this file but keeps every symbol bound before it.
pub(crate) fn scan_file(file: &str, text: &str) -> FileScan {
    let mut symbols = Vec::new();
    let mut diagnostics = Vec::new();

    for item in scanner::blocks(text) {
        match item {
            Ok((block, trailing)) => {
                if let Some(record) = tags::parse(&block, file, &mut diagnostics) {
                    let line = line_of(text, record.offset);
                    if let Some(symbol) =
                        binder::bind(record, &trailing, file, line, &mut diagnostics)
                    {
                        symbols.push(symbol);
                    }
                }
            }
            Err(err) => {
                diagnostics.push(Diagnostic::new(
                    DiagKind::UnterminatedComment,
                    file,
                    err.offset(),
                    err.to_string(),
                ));
                break;
            }
        }
    }

    FileScan {
        symbols,
        diagnostics,
    }
}

/// Merge per-file results into one graph, serialized in corpus order so
/// first-seen ordering and conflict detection are deterministic.
pub(crate) fn build_graph(scans: Vec<FileScan>) -> ScanOutput {
    let mut graph = SymbolGraph::new();
    let mut diagnostics = Vec::new();

    for scan in scans {
        diagnostics.extend(scan.diagnostics);
        for symbol in scan.symbols {
            if let Some(conflict) = graph.insert(symbol) {
                diagnostics.push(Diagnostic::new(
                    DiagKind::DuplicateSymbol,
                    &conflict.second_file,
                    conflict.second_offset,
                    format!(
                        "duplicate symbol '{}' (first declared at {}:{})",
                        conflict.name, conflict.first_file, conflict.first_offset
                    ),
                ));
            }
        }
    }

    ScanOutput { graph, diagnostics }
}
