//! Symbol graph — the durable output of a scan pass.
//!
//! Name-keyed symbol storage plus a category index, both iterated in
//! first-seen order so documentation builds are reproducible. Hash-map
//! ordering is never exposed.

use crate::model::{Symbol, SymbolKind};
use std::collections::HashMap;

/// A rejected duplicate insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    pub first_file: String,
    pub first_offset: usize,
    pub second_file: String,
    pub second_offset: usize,
}

/// Aggregate counts over the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub structs: usize,
    pub enums: usize,
    pub functions: usize,
    pub categories: usize,
}

#[derive(Debug, Default)]
pub struct SymbolGraph {
    symbols: HashMap<String, Symbol>,
    order: Vec<String>,
    by_category: HashMap<String, Vec<String>>,
    category_order: Vec<String>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol. The first insertion of a name wins; a later one is
    /// discarded and returned as a `Conflict` for diagnostic reporting.
    pub fn insert(&mut self, symbol: Symbol) -> Option<Conflict> {
        if let Some(first) = self.symbols.get(&symbol.name) {
            return Some(Conflict {
                name: symbol.name,
                first_file: first.source_file.clone(),
                first_offset: first.offset,
                second_file: symbol.source_file,
                second_offset: symbol.offset,
            });
        }

        let category = symbol.category.clone();
        let names = self.by_category.entry(category.clone()).or_default();
        if names.is_empty() {
            self.category_order.push(category);
        }
        names.push(symbol.name.clone());

        self.order.push(symbol.name.clone());
        self.symbols.insert(symbol.name.clone(), symbol);
        None
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Symbols in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().map(|name| &self.symbols[name])
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_order.iter().map(String::as_str)
    }

    /// Symbol names of one category, in first-seen order.
    pub fn in_category(&self, category: &str) -> &[String] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Symbols whose `@related` set names `name` (back references).
    pub fn related_to(&self, name: &str) -> Vec<&Symbol> {
        self.iter()
            .filter(|sym| sym.name != name && sym.related.iter().any(|r| r == name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            total: self.len(),
            categories: self.category_order.len(),
            ..Stats::default()
        };
        for sym in self.iter() {
            match sym.kind {
                SymbolKind::Struct => stats.structs += 1,
                SymbolKind::Enum => stats.enums += 1,
                SymbolKind::Function => stats.functions += 1,
            }
        }
        stats
    }
}
