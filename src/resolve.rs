//! Reference resolver — validates `@related` names against the graph.
//!
//! Runs strictly after the whole corpus has been scanned: a symbol may
//! legitimately reference one declared later, so no partial resolution is
//! attempted mid-scan.

use crate::diag::{DiagKind, Diagnostic};
use crate::graph::SymbolGraph;

/// Unresolved `@related` names, grouped per source symbol in graph order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnresolvedReport {
    entries: Vec<UnresolvedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedEntry {
    pub symbol: String,
    /// Missing target names, in `@related` order.
    pub targets: Vec<String>,
}

impl UnresolvedReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnresolvedEntry> {
        self.entries.iter()
    }

    /// One warning per dangling reference, for the diagnostics stream.
    pub fn to_diagnostics(&self, graph: &SymbolGraph) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for entry in &self.entries {
            let (file, offset) = graph
                .get(&entry.symbol)
                .map(|s| (s.source_file.as_str(), s.offset))
                .unwrap_or(("<unknown>", 0));
            for target in &entry.targets {
                diags.push(Diagnostic::new(
                    DiagKind::UnresolvedReference,
                    file,
                    offset,
                    format!("'{}' relates to unknown symbol '{}'", entry.symbol, target),
                ));
            }
        }
        diags
    }
}

/// Check every symbol's `@related` set against the graph.
pub fn resolve(graph: &SymbolGraph) -> UnresolvedReport {
    let mut entries = Vec::new();
    for sym in graph.iter() {
        let targets: Vec<String> = sym
            .related
            .iter()
            .filter(|name| !graph.contains(name))
            .cloned()
            .collect();
        if !targets.is_empty() {
            entries.push(UnresolvedEntry {
                symbol: sym.name.clone(),
                targets,
            });
        }
    }
    UnresolvedReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Symbol, SymbolKind};

    fn symbol(name: &str, related: &[&str]) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            category: "misc".to_string(),
            brief: None,
            remarks: None,
            example: None,
            signature: None,
            params: Vec::new(),
            returns: None,
            related: related.iter().map(|r| r.to_string()).collect(),
            members: Vec::new(),
            source_file: "t.h".to_string(),
            offset: 0,
            line: 1,
        }
    }

    #[test]
    fn mutually_referencing_symbols_resolve_clean() {
        let mut graph = SymbolGraph::new();
        graph.insert(symbol("a", &["b"]));
        graph.insert(symbol("b", &["a"]));
        assert!(resolve(&graph).is_empty());
    }

    #[test]
    fn dangling_references_reported_exactly() {
        let mut graph = SymbolGraph::new();
        graph.insert(symbol("a", &["b", "ghost", "phantom"]));
        graph.insert(symbol("b", &[]));

        let report = resolve(&graph);
        assert_eq!(report.len(), 1);
        let entry = report.iter().next().unwrap();
        assert_eq!(entry.symbol, "a");
        // True subset check: existing names never show up.
        assert_eq!(entry.targets, vec!["ghost", "phantom"]);
    }

    #[test]
    fn forward_references_are_fine() {
        // "later" is inserted after the symbol that references it; the
        // resolver only runs once the graph is complete.
        let mut graph = SymbolGraph::new();
        graph.insert(symbol("early", &["later"]));
        graph.insert(symbol("later", &[]));
        assert!(resolve(&graph).is_empty());
    }

    #[test]
    fn report_converts_to_diagnostics() {
        let mut graph = SymbolGraph::new();
        graph.insert(symbol("a", &["ghost"]));
        let report = resolve(&graph);
        let diags = report.to_diagnostics(&graph);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagKind::UnresolvedReference);
        assert!(diags[0].message.contains("ghost"));
    }
}
