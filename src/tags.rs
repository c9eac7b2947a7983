//! Tag grammar parser — line-by-line over a documentation block.
//!
//! Owns both grammars: the `@tag` lines inside `/** ... */` blocks, and
//! the one-line `/* @member|@entry ... */` sub-entry comments the binder
//! collects from declaration bodies.

use crate::diag::{DiagKind, Diagnostic};
use crate::model::{ParamDoc, Subentry, TagKind, TagRecord};
use crate::scanner::CommentBlock;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_DECOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\*+\s?").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@(\w+)[ \t]*(.*)$").unwrap());

static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+)\s*(.*)$").unwrap());

static RE_SUBENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\s*@(member|entry)\s+(.*?)\s*\*/").unwrap());

static RE_END_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//\s*@end|/\*\s*@end\s*\*/").unwrap());

// Comment artifacts that survive careless line wrapping in @related lists.
static RE_ARTIFACT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[/*\\]+$").unwrap());

// -- Parser -------------------------------------------------------------------

#[derive(PartialEq)]
enum Multiline {
    None,
    Remarks,
    Example,
}

/// Parse a documentation block into a TagRecord.
///
/// Returns `None` for blocks that declare nothing: no kind tag and no
/// sub-entry lines, or a kind tag with a missing name (reported).
pub fn parse(
    block: &CommentBlock<'_>,
    file: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<TagRecord> {
    let mut rec = TagRecord::new(TagKind::MemberOnly, block.start);
    let mut kind: Option<TagKind> = None;
    let mut invalid = false;
    let mut multiline = Multiline::None;
    let mut remarks = String::new();
    let mut example = String::new();

    for raw in &block.lines {
        let line = RE_DECOR.replace(raw, "").trim_end().to_string();

        // Tags may sit on the opener line itself (`/** @struct S */`),
        // where no `*` decoration precedes them.
        let caps = match RE_TAG.captures(line.trim_start()) {
            Some(caps) => caps,
            None => {
                // Only @remarks and @example continue across lines; the
                // single-line fields never absorb what follows them.
                match multiline {
                    Multiline::Remarks => concat_spaced(&mut remarks, line.trim()),
                    Multiline::Example => concat_line(&mut example, &line),
                    Multiline::None => {}
                }
                continue;
            }
        };

        let tag = caps[1].to_string();
        let rest = caps[2].trim().to_string();
        multiline = Multiline::None;

        match tag.as_str() {
            "struct" | "enum" | "function" => {
                if rest.is_empty() {
                    invalid = true;
                    diags.push(Diagnostic::new(
                        DiagKind::MissingName,
                        file,
                        block.start,
                        format!("@{} tag with no name", tag),
                    ));
                    continue;
                }
                kind = Some(match tag.as_str() {
                    "struct" => TagKind::Struct,
                    "enum" => TagKind::Enum,
                    _ => TagKind::Function,
                });
                rec.name = rest;
            }
            "category" => rec.category = Some(rest),
            "brief" => rec.brief = Some(rest),
            "return" => rec.returns = Some(rest),
            "remarks" => {
                remarks = rest;
                multiline = Multiline::Remarks;
            }
            "example" => {
                example = rest;
                multiline = Multiline::Example;
            }
            "param" => {
                if let Some(p) = RE_PARAM.captures(&rest) {
                    rec.params.push(ParamDoc {
                        name: p[1].to_string(),
                        description: p[2].trim().to_string(),
                    });
                }
            }
            "related" => {
                for name in rest.split_whitespace() {
                    if RE_ARTIFACT.is_match(name) {
                        continue;
                    }
                    if !rec.related.iter().any(|r| r == name) {
                        rec.related.push(name.to_string());
                    }
                }
            }
            "member" | "entry" => rec.subentries.push(Subentry {
                label: None,
                description: rest,
            }),
            "end" => {}
            _ => diags.push(Diagnostic::new(
                DiagKind::UnknownTag,
                file,
                block.start,
                format!("unknown tag '@{}'", tag),
            )),
        }
    }

    if !remarks.is_empty() {
        rec.remarks = Some(remarks);
    }
    if !example.is_empty() {
        rec.example = Some(example);
    }

    if invalid {
        return None;
    }
    match kind {
        Some(kind) => {
            rec.kind = kind;
            Some(rec)
        }
        None if !rec.subentries.is_empty() => Some(rec),
        None => None,
    }
}

/// Body region up to the `@end` marker, when one is present.
pub(crate) fn cut_at_end_marker(body: &str) -> &str {
    match RE_END_MARKER.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    }
}

/// Sub-entry pass over a declaration body: every `/* @member ... */` or
/// `/* @entry ... */` comment before the `@end` marker, in order.
pub fn subentries(body: &str) -> Vec<Subentry> {
    let region = cut_at_end_marker(body);
    RE_SUBENTRY
        .captures_iter(region)
        .map(|caps| Subentry {
            label: None,
            description: caps[2].trim().to_string(),
        })
        .collect()
}

fn concat_spaced(dest: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text);
}

fn concat_line(dest: &mut String, text: &str) {
    if dest.is_empty() {
        *dest = text.to_string();
    } else {
        dest.push('\n');
        dest.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &'static [&'static str]) -> CommentBlock<'static> {
        CommentBlock {
            start: 0,
            end: 0,
            lines: lines.to_vec(),
        }
    }

    fn parse_ok(lines: &'static [&'static str]) -> TagRecord {
        let mut diags = Vec::new();
        parse(&block(lines), "test.h", &mut diags).expect("record")
    }

    #[test]
    fn parses_struct_block() {
        let rec = parse_ok(&[
            " * @struct   Sprite",
            " * @category graphics",
            " * @brief    A drawable sprite.",
            " * @remarks  Owns its pixels.",
            " * @related  draw_sprite Atlas",
        ]);
        assert_eq!(rec.kind, TagKind::Struct);
        assert_eq!(rec.name, "Sprite");
        assert_eq!(rec.category.as_deref(), Some("graphics"));
        assert_eq!(rec.brief.as_deref(), Some("A drawable sprite."));
        assert_eq!(rec.remarks.as_deref(), Some("Owns its pixels."));
        assert_eq!(rec.related, vec!["draw_sprite", "Atlas"]);
    }

    #[test]
    fn single_line_fields_do_not_continue() {
        let rec = parse_ok(&[
            " * @function f",
            " * @brief First sentence.",
            " *        stray continuation",
        ]);
        assert_eq!(rec.brief.as_deref(), Some("First sentence."));
    }

    #[test]
    fn last_occurrence_wins_for_single_line_fields() {
        let rec = parse_ok(&[
            " * @function f",
            " * @category one",
            " * @category two",
        ]);
        assert_eq!(rec.category.as_deref(), Some("two"));
    }

    #[test]
    fn remarks_span_until_next_tag() {
        let rec = parse_ok(&[
            " * @function f",
            " * @remarks Line one",
            " *          line two.",
            " * @return  An int.",
        ]);
        assert_eq!(rec.remarks.as_deref(), Some("Line one line two."));
        assert_eq!(rec.returns.as_deref(), Some("An int."));
    }

    #[test]
    fn example_keeps_line_breaks() {
        let rec = parse_ok(&[
            " * @function f",
            " * @example",
            " * int x = f();",
            " * use(x);",
        ]);
        assert_eq!(rec.example.as_deref(), Some("int x = f();\nuse(x);"));
    }

    #[test]
    fn params_preserve_order() {
        let rec = parse_ok(&[
            " * @function f",
            " * @param b  Second in the alphabet.",
            " * @param a  First in the alphabet.",
        ]);
        let names: Vec<_> = rec.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(rec.params[0].description, "Second in the alphabet.");
    }

    #[test]
    fn related_appends_across_lines_and_dedupes() {
        let rec = parse_ok(&[
            " * @struct S",
            " * @related a b",
            " * @related b c */",
        ]);
        assert_eq!(rec.related, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_name_is_reported() {
        let mut diags = Vec::new();
        let rec = parse(&block(&[" * @struct", " * @brief No name."]), "t.h", &mut diags);
        assert!(rec.is_none());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagKind::MissingName);
    }

    #[test]
    fn unknown_tag_is_recorded_not_fatal() {
        let mut diags = Vec::new();
        let rec = parse(
            &block(&[" * @function f", " * @frobnicate hard"]),
            "t.h",
            &mut diags,
        );
        assert!(rec.is_some());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagKind::UnknownTag);
        assert!(diags[0].message.contains("frobnicate"));
    }

    #[test]
    fn member_only_block() {
        let rec = parse_ok(&[" * @member The width in pixels."]);
        assert_eq!(rec.kind, TagKind::MemberOnly);
        assert_eq!(rec.subentries.len(), 1);
        assert_eq!(rec.subentries[0].description, "The width in pixels.");
    }

    #[test]
    fn block_without_tags_yields_nothing() {
        let mut diags = Vec::new();
        assert!(parse(&block(&["  Banner text only."]), "t.h", &mut diags).is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn subentries_stop_at_end_marker() {
        let body = "/* @member First. */\nint a;\n/* @member Second. */\nint b;\n// @end\n/* @member Ghost. */";
        let subs = subentries(body);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].description, "First.");
        assert_eq!(subs[1].description, "Second.");
    }

    #[test]
    fn subentries_parse_entry_comments() {
        let subs = subentries("/* @entry First value. */ X(A, 0)");
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].description, "First value.");
    }
}
