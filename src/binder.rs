//! Declaration binder — matches a tag record to the source declaration in
//! its trailing span, extracting positional member names and parameter
//! lists for cross-checking.

use crate::diag::{DiagKind, Diagnostic};
use crate::model::{
    Declaration, MemberDecl, MemberDoc, Subentry, Symbol, SymbolKind, TagKind, TagRecord,
    UNCATEGORIZED,
};
use crate::scanner::Trailing;
use crate::unroll::{self, parse_int};
use crate::tags;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static RE_LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//[^\n]*").unwrap());

static RE_STRUCT_KW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bstruct\b").unwrap());

static RE_ENUM_KW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\benum\b").unwrap());

static RE_TYPEDEF_AGGREGATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^typedef\s+(struct|enum)\b").unwrap());

static RE_GENERATOR_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*define\s+(\w+)\s*\(").unwrap());

static RE_BARE_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

static RE_ENUM_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(?:\s*=\s*(.+))?$").unwrap());

// Declarator shapes, tried in order: function pointer, bit-field, array,
// plain trailing identifier.
static RE_FN_PTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\*\s*(\w+)\s*\)").unwrap());

static RE_BITFIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*:\s*[\w\s]+$").unwrap());

static RE_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*(?:\[[^\]]*\]\s*)+$").unwrap());

static RE_LAST_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\s*$").unwrap());

/// Label used for subentries with no corresponding declared member.
const UNKNOWN_LABEL: &str = "<unknown>";

// -- Binding ------------------------------------------------------------------

/// Bind a tag record to the declaration in its trailing span. Member-only
/// records describe no standalone symbol and bind to nothing.
pub fn bind(
    record: TagRecord,
    trailing: &Trailing<'_>,
    file: &str,
    line: u32,
    diags: &mut Vec<Diagnostic>,
) -> Option<Symbol> {
    match record.kind {
        TagKind::MemberOnly => None,
        TagKind::Struct => Some(bind_struct(record, trailing, file, line, diags)),
        TagKind::Enum => Some(bind_enum(record, trailing, file, line, diags)),
        TagKind::Function => Some(bind_function(record, trailing, file, line, diags)),
    }
}

fn bind_struct(
    mut record: TagRecord,
    trailing: &Trailing<'_>,
    file: &str,
    line: u32,
    diags: &mut Vec<Diagnostic>,
) -> Symbol {
    let mut fields = Vec::new();
    let mut subs = std::mem::take(&mut record.subentries);

    if let Some(body) = brace_body(trailing.text, &RE_STRUCT_KW) {
        fields = struct_fields(body);
        subs.extend(tags::subentries(body));
    }

    let decl = Declaration {
        kind: SymbolKind::Struct,
        name: record.name.clone(),
        signature: None,
        members: fields,
    };
    let members = pair_members(&decl, &subs, false, file, record.offset, diags);
    merge(record, decl, members, file, line)
}

fn bind_enum(
    mut record: TagRecord,
    trailing: &Trailing<'_>,
    file: &str,
    line: u32,
    diags: &mut Vec<Diagnostic>,
) -> Symbol {
    let body = brace_body(trailing.text, &RE_ENUM_KW);
    let mut subs = std::mem::take(&mut record.subentries);

    // Generator-only body: nothing but preprocessor lines and a single
    // bare identifier naming the entry list.
    if let Some(body) = body {
        let body_subs = tags::subentries(body);
        if body_subs.is_empty() {
            if let Some(list) = generator_list_name(body) {
                let generator = RE_GENERATOR_DEFINE
                    .captures(body)
                    .map(|c| c[1].to_string());
                return match unroll::unroll(trailing.text, &list, generator.as_deref()) {
                    Some(entries) => {
                        let decl = Declaration {
                            kind: SymbolKind::Enum,
                            name: record.name.clone(),
                            signature: None,
                            members: entries
                                .iter()
                                .map(|e| MemberDecl {
                                    name: e.name.clone(),
                                    value: e.explicit,
                                })
                                .collect(),
                        };
                        let members = entries
                            .into_iter()
                            .map(|e| MemberDoc {
                                label: e.name,
                                value: Some(e.value),
                                description: e.description,
                            })
                            .collect();
                        merge(record, decl, members, file, line)
                    }
                    None => {
                        diags.push(Diagnostic::new(
                            DiagKind::UnresolvedEnumIdiom,
                            file,
                            record.offset,
                            format!(
                                "enum '{}' expands list macro '{}' but no such list was found",
                                record.name, list
                            ),
                        ));
                        let decl = Declaration {
                            kind: SymbolKind::Enum,
                            name: record.name.clone(),
                            signature: None,
                            members: Vec::new(),
                        };
                        merge(record, decl, Vec::new(), file, line)
                    }
                };
            }
        }
        subs.extend(body_subs);
    }

    // Literal members bind positionally, like struct fields.
    let entries = body.map(enum_members).unwrap_or_default();
    let decl = Declaration {
        kind: SymbolKind::Enum,
        name: record.name.clone(),
        signature: None,
        members: entries,
    };
    let members = pair_members(&decl, &subs, true, file, record.offset, diags);
    merge(record, decl, members, file, line)
}

fn bind_function(
    record: TagRecord,
    trailing: &Trailing<'_>,
    file: &str,
    line: u32,
    diags: &mut Vec<Diagnostic>,
) -> Symbol {
    let signature = extract_signature(trailing.text);

    if let Some(sig) = signature.as_deref() {
        if let Some(names) = signature_params(sig, &record.name) {
            for param in &record.params {
                if !names.iter().any(|n| n == &param.name) {
                    diags.push(Diagnostic::new(
                        DiagKind::UnknownParamName,
                        file,
                        record.offset,
                        format!(
                            "@param '{}' does not appear in the signature of '{}'",
                            param.name, record.name
                        ),
                    ));
                }
            }
        }
    }

    let decl = Declaration {
        kind: SymbolKind::Function,
        name: record.name.clone(),
        signature,
        members: Vec::new(),
    };
    merge(record, decl, Vec::new(), file, line)
}

/// Merge the documentation record with its bound declaration.
fn merge(
    record: TagRecord,
    decl: Declaration,
    members: Vec<MemberDoc>,
    file: &str,
    line: u32,
) -> Symbol {
    Symbol {
        name: record.name,
        kind: decl.kind,
        category: record
            .category
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        brief: record.brief,
        remarks: record.remarks,
        example: record.example,
        signature: decl.signature,
        params: record.params,
        returns: record.returns,
        related: record.related,
        members,
        source_file: file.to_string(),
        offset: record.offset,
        line,
    }
}

// -- Positional member labeling -----------------------------------------------

/// Zip declared members with sub-entry docs by position. A count mismatch
/// is reported (when any sub-entries exist at all); surplus entries get
/// the `<unknown>` label, surplus members keep a null description.
fn pair_members(
    decl: &Declaration,
    subs: &[Subentry],
    enum_values: bool,
    file: &str,
    offset: usize,
    diags: &mut Vec<Diagnostic>,
) -> Vec<MemberDoc> {
    if !subs.is_empty() && subs.len() != decl.members.len() {
        diags.push(Diagnostic::new(
            DiagKind::MemberCountMismatch,
            file,
            offset,
            format!(
                "'{}' declares {} members but has {} documented entries",
                decl.name,
                decl.members.len(),
                subs.len()
            ),
        ));
    }

    let mut members = Vec::new();
    let mut prev = -1i64;
    for i in 0..decl.members.len().max(subs.len()) {
        let (label, value) = match decl.members.get(i) {
            Some(m) => {
                let value = if enum_values {
                    let v = m.value.unwrap_or(prev + 1);
                    prev = v;
                    Some(v)
                } else {
                    None
                };
                (m.name.clone(), value)
            }
            None => (UNKNOWN_LABEL.to_string(), None),
        };
        let label = subs
            .get(i)
            .and_then(|s| s.label.clone())
            .unwrap_or(label);
        members.push(MemberDoc {
            label,
            value,
            description: subs.get(i).map(|s| s.description.clone()),
        });
    }
    members
}

// -- Source inspection --------------------------------------------------------

fn strip_comments(text: &str) -> String {
    let without_blocks = RE_BLOCK_COMMENT.replace_all(text, "");
    RE_LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
}

/// Interior of the brace-delimited body following the first `keyword`
/// occurrence that opens one (a `;` before the `{` is a forward
/// declaration and is skipped).
fn brace_body<'t>(text: &'t str, keyword: &Regex) -> Option<&'t str> {
    for m in keyword.find_iter(text) {
        let rest = &text[m.end()..];
        let open_rel = match rest.find('{') {
            Some(i) => i,
            None => continue,
        };
        if let Some(semi) = rest.find(';') {
            if semi < open_rel {
                continue;
            }
        }
        let open = m.end() + open_rel;
        let close = matching_brace(text, open)?;
        return Some(&text[open + 1..close]);
    }
    None
}

fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Field identifiers of a struct body, in declaration order.
fn struct_fields(body: &str) -> Vec<MemberDecl> {
    let cleaned = strip_comments(body);
    cleaned
        .split(';')
        .filter_map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() || piece.starts_with('#') {
                return None;
            }
            declared_ident(piece).map(|name| MemberDecl { name, value: None })
        })
        .collect()
}

/// Name of the entry list a generator-only enum body expands: the single
/// bare identifier left once preprocessor lines are set aside.
fn generator_list_name(body: &str) -> Option<String> {
    let cleaned = strip_comments(body);
    let content: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    match content.as_slice() {
        [only] if RE_BARE_IDENT.is_match(only) => Some((*only).to_string()),
        _ => None,
    }
}

/// Entry names and explicit values of a literal enum body.
fn enum_members(body: &str) -> Vec<MemberDecl> {
    let cleaned = strip_comments(body);
    let without_pp: String = cleaned
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    without_pp
        .split(',')
        .filter_map(|piece| {
            let piece = piece.trim();
            let caps = RE_ENUM_MEMBER.captures(piece)?;
            Some(MemberDecl {
                name: caps[1].to_string(),
                value: caps.get(2).and_then(|v| parse_int(v.as_str())),
            })
        })
        .collect()
}

/// The identifier a declarator introduces.
fn declared_ident(piece: &str) -> Option<String> {
    if let Some(caps) = RE_FN_PTR.captures(piece) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = RE_BITFIELD.captures(piece) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = RE_ARRAY.captures(piece) {
        return Some(caps[1].to_string());
    }
    RE_LAST_IDENT
        .captures(piece)
        .map(|caps| caps[1].to_string())
}

/// First declaration statement of the span: lines up to one containing
/// `;` or `{`, with comments removed. Aggregate typedefs and preprocessor
/// lines are not function signatures.
fn extract_signature(span: &str) -> Option<String> {
    let cleaned = strip_comments(span);
    let mut collected = String::new();
    for line in cleaned.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if collected.is_empty() {
                continue;
            }
            break;
        }
        if collected.is_empty()
            && (trimmed.starts_with('#') || RE_TYPEDEF_AGGREGATE.is_match(trimmed))
        {
            return None;
        }
        if !collected.is_empty() {
            collected.push(' ');
        }
        collected.push_str(trimmed);
        if trimmed.contains(';') || trimmed.contains('{') {
            break;
        }
    }
    let end = collected
        .find(|c| c == ';' || c == '{')
        .unwrap_or(collected.len());
    let sig = collected[..end].trim().to_string();
    if sig.is_empty() {
        None
    } else {
        Some(sig)
    }
}

/// Ordered parameter names of `name`'s parameter list inside `sig`.
fn signature_params(sig: &str, name: &str) -> Option<Vec<String>> {
    let call = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok()?;
    let m = call.find(sig)?;
    let open = m.end() - 1;
    let close = matching_paren(sig, open)?;
    let interior = &sig[open + 1..close];

    let mut names = Vec::new();
    for arg in split_args(interior) {
        let arg = arg.trim();
        if arg.is_empty() || arg == "void" || arg == "..." {
            continue;
        }
        if let Some(ident) = declared_ident(arg) {
            names.push(ident);
        }
    }
    Some(names)
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas at parenthesis/bracket depth zero.
fn split_args(interior: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, b) in interior.bytes().enumerate() {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b',' if depth == 0 => {
                args.push(&interior[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&interior[start..]);
    args
}
