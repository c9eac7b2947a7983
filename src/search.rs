//! Keyword search over the symbol graph.
//!
//! Relevance ranking favors name matches over prose matches; scores are
//! summed across all keywords of a query. Ties keep graph order, so
//! results are deterministic.

use crate::graph::SymbolGraph;
use crate::model::{Symbol, SymbolKind};

// Relevance weights, strongest match first.
const EXACT_NAME_MATCH: u32 = 1000;
const PREFIX_MATCH: u32 = 500;
const SUFFIX_MATCH: u32 = 400;
const CONTAINS_MATCH: u32 = 100;
const BRIEF_MATCH: u32 = 50;
const CATEGORY_MATCH: u32 = 30;
const REMARKS_MATCH: u32 = 10;

/// Filters and limits for a search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub kind: Option<SymbolKind>,
    pub category: Option<String>,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            kind: None,
            category: None,
            limit: 20,
        }
    }
}

/// Symbols matching `query`, best first. An empty query returns the
/// filtered graph in insertion order.
pub fn search<'g>(graph: &'g SymbolGraph, query: &str, opts: &SearchOptions) -> Vec<&'g Symbol> {
    let keywords: Vec<String> = query
        .split_whitespace()
        .map(|k| k.to_lowercase())
        .collect();

    let mut results: Vec<&Symbol> = graph
        .iter()
        .filter(|sym| opts.kind.map_or(true, |k| sym.kind == k))
        .filter(|sym| {
            opts.category
                .as_deref()
                .map_or(true, |c| sym.category == c)
        })
        .filter(|sym| keywords.is_empty() || matches(sym, &keywords))
        .collect();

    if !keywords.is_empty() {
        results.sort_by_key(|sym| std::cmp::Reverse(relevance(sym, &keywords)));
    }
    results.truncate(opts.limit);
    results
}

fn matches(sym: &Symbol, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| {
        contains_ci(&sym.name, kw)
            || sym.brief.as_deref().is_some_and(|b| contains_ci(b, kw))
            || sym.remarks.as_deref().is_some_and(|r| contains_ci(r, kw))
            || contains_ci(&sym.category, kw)
    })
}

fn relevance(sym: &Symbol, keywords: &[String]) -> u32 {
    keywords.iter().map(|kw| keyword_score(sym, kw)).sum()
}

fn keyword_score(sym: &Symbol, keyword: &str) -> u32 {
    let name = sym.name.to_lowercase();
    let mut score = 0;

    if name == keyword {
        score += EXACT_NAME_MATCH;
    } else if name.starts_with(keyword) {
        score += PREFIX_MATCH;
    } else if name.ends_with(keyword) {
        score += SUFFIX_MATCH;
    } else if name.contains(keyword) {
        score += CONTAINS_MATCH;
    }

    if sym.brief.as_deref().is_some_and(|b| contains_ci(b, keyword)) {
        score += BRIEF_MATCH;
    }
    if contains_ci(&sym.category, keyword) {
        score += CATEGORY_MATCH;
    }
    if sym
        .remarks
        .as_deref()
        .is_some_and(|r| contains_ci(r, keyword))
    {
        score += REMARKS_MATCH;
    }
    score
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: &str, kind: SymbolKind, category: &str, brief: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind,
            category: category.to_string(),
            brief: Some(brief.to_string()),
            remarks: None,
            example: None,
            signature: None,
            params: Vec::new(),
            returns: None,
            related: Vec::new(),
            members: Vec::new(),
            source_file: "t.h".to_string(),
            offset: 0,
            line: 1,
        }
    }

    fn sample() -> SymbolGraph {
        let mut graph = SymbolGraph::new();
        graph.insert(symbol("make_sprite", SymbolKind::Function, "sprite", "Create a sprite."));
        graph.insert(symbol("Sprite", SymbolKind::Struct, "sprite", "A drawable sprite."));
        graph.insert(symbol("sprite_flags", SymbolKind::Enum, "sprite", "Draw flags."));
        graph.insert(symbol("make_audio", SymbolKind::Function, "audio", "Create an audio source."));
        graph
    }

    #[test]
    fn exact_name_match_ranks_first() {
        let graph = sample();
        let hits = search(&graph, "sprite", &SearchOptions::default());
        assert_eq!(hits[0].name, "Sprite");
    }

    #[test]
    fn kind_filter_applies() {
        let graph = sample();
        let opts = SearchOptions {
            kind: Some(SymbolKind::Function),
            ..Default::default()
        };
        let hits = search(&graph, "sprite", &opts);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "make_sprite");
    }

    #[test]
    fn category_filter_applies() {
        let graph = sample();
        let opts = SearchOptions {
            category: Some("audio".to_string()),
            ..Default::default()
        };
        let hits = search(&graph, "", &opts);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "make_audio");
    }

    #[test]
    fn empty_query_returns_graph_order() {
        let graph = sample();
        let hits = search(&graph, "", &SearchOptions::default());
        let names: Vec<_> = hits.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["make_sprite", "Sprite", "sprite_flags", "make_audio"]
        );
    }

    #[test]
    fn limit_truncates() {
        let graph = sample();
        let opts = SearchOptions {
            limit: 2,
            ..Default::default()
        };
        assert_eq!(search(&graph, "", &opts).len(), 2);
    }

    #[test]
    fn multi_keyword_scores_sum() {
        let graph = sample();
        let hits = search(&graph, "make sprite", &SearchOptions::default());
        let names: Vec<_> = hits.iter().map(|s| s.name.as_str()).collect();
        // Sprite: exact 1000 + brief 50 + category 30.
        // make_sprite: prefix 500 + suffix 400 + brief 50 + category 30.
        assert_eq!(
            names,
            vec!["Sprite", "make_sprite", "sprite_flags", "make_audio"]
        );
    }
}
