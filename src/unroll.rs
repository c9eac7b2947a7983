//! Enum unroller — the list-macro idiom.
//!
//! Recognizes enums whose body is generated by expanding a macro-defined
//! entry list:
//!
//! ```c
//! #define COLOR_DEFS \
//!     /* @entry Opaque red. */ \
//!     COLOR_DEF(COLOR_RED, 0) \
//!     /* @end */
//!
//! typedef enum Color {
//!     #define COLOR_DEF(K, V) K = V,
//!     COLOR_DEFS
//!     #undef COLOR_DEF
//! } Color;
//! ```
//!
//! The unroller is a line-oriented idiom detector working on the textual
//! entry list; it never expands macros.

use regex::Regex;
use std::sync::LazyLock;

static RE_ENTRY_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\s*@entry\s+(.*?)\s*\*/").unwrap());

static RE_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s\\]*$").unwrap());

/// One unrolled enum entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Explicit value from the invocation, when given and integral.
    pub explicit: Option<i64>,
    /// Resolved value: explicit, or previous + 1 (first defaults to 0).
    pub value: i64,
    pub description: Option<String>,
}

/// Unroll the list macro named `list` out of `span` (the source span that
/// also holds the enum declaration). `generator` is the entry macro named
/// by the in-body `#define`, when the binder could extract it.
///
/// Returns `None` when no such list definition precedes the enum.
pub fn unroll(span: &str, list: &str, generator: Option<&str>) -> Option<Vec<Entry>> {
    let define = Regex::new(&format!(r"#\s*define\s+{}\b", regex::escape(list))).ok()?;
    let m = define.find(span)?;
    let body = continuation_body(&span[m.end()..]);
    let region = crate::tags::cut_at_end_marker(&body);

    let mac = match generator {
        Some(name) => regex::escape(name),
        None => r"[A-Za-z_]\w*".to_string(),
    };
    let invocation = Regex::new(&format!(
        r"\b{}\s*\(\s*(\w+)\s*(?:,\s*([^)]*?)\s*)?\)",
        mac
    ))
    .ok()?;

    // Entry comments in order; each attaches to the invocation that
    // immediately follows it.
    let comments: Vec<(usize, String)> = RE_ENTRY_COMMENT
        .captures_iter(region)
        .map(|c| (c.get(0).unwrap().end(), c[1].trim().to_string()))
        .collect();

    let mut entries = Vec::new();
    let mut cursor = 0;
    let mut prev = -1i64;
    for caps in invocation.captures_iter(region) {
        let inv = caps.get(0).unwrap();
        let mut description = None;
        while cursor < comments.len() && comments[cursor].0 <= inv.start() {
            let (end, text) = &comments[cursor];
            if RE_GAP.is_match(&region[*end..inv.start()]) {
                description = Some(text.clone());
            }
            cursor += 1;
        }

        let explicit = caps.get(2).and_then(|v| parse_int(v.as_str()));
        let value = explicit.unwrap_or(prev + 1);
        prev = value;
        entries.push(Entry {
            name: caps[1].to_string(),
            explicit,
            value,
            description,
        });
    }
    Some(entries)
}

/// The macro body: everything reachable through backslash continuations
/// from the `#define` line.
fn continuation_body(rest: &str) -> String {
    let mut body = String::new();
    let mut continued = true;
    for line in rest.lines() {
        if !continued {
            break;
        }
        continued = line.trim_end().ends_with('\\');
        body.push_str(line);
        body.push('\n');
    }
    body
}

/// Integer literal parser for entry values: decimal or `0x` hex, with an
/// optional leading minus.
pub(crate) fn parse_int(s: &str) -> Option<i64> {
    let t = s.trim();
    let (neg, t) = match t.strip_prefix('-') {
        Some(r) => (true, r.trim_start()),
        None => (false, t),
    };
    let v = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        t.parse::<i64>().ok()?
    };
    Some(if neg { -v } else { v })
}
