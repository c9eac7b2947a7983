//! Corpus scan — many headers, one graph.
//!
//! Per-file pipelines share nothing and run as parallel workers; the
//! merge into the shared graph is serialized in corpus order, so category
//! indices and conflict detection come out deterministic regardless of
//! worker scheduling. Resolution (`crate::resolve`) stays a strict
//! barrier after this returns.

use crate::{build_graph, scan_file, FileScan, ScanOutput};
use rayon::prelude::*;

/// One header's name and contents. Reading files is the caller's job; the
/// engine does no I/O.
#[derive(Debug, Clone)]
pub struct HeaderSource {
    pub name: String,
    pub text: String,
}

impl HeaderSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        HeaderSource {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Scan a corpus of headers into a single graph. A fatal error in one
/// file aborts that file only.
pub fn scan_corpus(files: &[HeaderSource]) -> ScanOutput {
    let scans: Vec<FileScan> = files
        .par_iter()
        .map(|file| scan_file(&file.name, &file.text))
        .collect();
    build_graph(scans)
}
