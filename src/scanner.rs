//! Block comment scanner.
//!
//! Walks the header text comment by comment and yields each `/** ... */`
//! documentation block paired with the raw source span that follows it
//! (everything up to the next `/**` opener). Plain `/* ... */` comments
//! are never yielded on their own — they stay inside trailing spans so the
//! binder can run the sub-entry pass over declaration bodies.

use crate::diag::ScanError;

/// Raw lines of one documentation comment, with its byte extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock<'a> {
    /// Offset of the `/**` opener.
    pub start: usize,
    /// Offset just past the closing `*/`.
    pub end: usize,
    /// Raw interior lines, comment decoration included.
    pub lines: Vec<&'a str>,
}

/// Source span between a documentation block and the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailing<'a> {
    pub text: &'a str,
    /// Offset of `text` within the original input.
    pub offset: usize,
}

pub type ScanItem<'a> = Result<(CommentBlock<'a>, Trailing<'a>), ScanError>;

/// Lazy sequence of (block, trailing span) pairs over `text`.
pub fn blocks(text: &str) -> Blocks<'_> {
    Blocks {
        text,
        pos: 0,
        pending: None,
        done: false,
    }
}

pub struct Blocks<'a> {
    text: &'a str,
    pos: usize,
    /// Unterminated comment found while delimiting a trailing span; the
    /// pair before it is yielded first, then this error.
    pending: Option<ScanError>,
    done: bool,
}

/// Extent of the comment starting at `open`. Returns the offset past the
/// closing `*/` and, for `/**` blocks, the interior byte range. `None`
/// means the comment never closes.
fn comment_at(text: &str, open: usize) -> Option<(usize, Option<(usize, usize)>)> {
    debug_assert!(text[open..].starts_with("/*"));
    if text[open..].starts_with("/**") {
        if let Some(close) = find_from(text, "*/", open + 3) {
            return Some((close + 2, Some((open + 3, close))));
        }
        // `/**/` closes using its second star; an empty plain comment.
        if let Some(close) = find_from(text, "*/", open + 2) {
            return Some((close + 2, None));
        }
        return None;
    }
    find_from(text, "*/", open + 2).map(|close| (close + 2, None))
}

fn find_from(text: &str, pat: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(pat).map(|i| i + from)
}

impl<'a> Iterator for Blocks<'a> {
    type Item = ScanItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(err) = self.pending.take() {
            self.done = true;
            return Some(Err(err));
        }

        // Next documentation block, stepping over plain comments.
        let mut i = self.pos;
        let (start, content, end) = loop {
            let open = find_from(self.text, "/*", i)?;
            match comment_at(self.text, open) {
                None => {
                    self.done = true;
                    return Some(Err(ScanError::UnterminatedComment { offset: open }));
                }
                Some((close, Some(interior))) => break (open, interior, close),
                Some((close, None)) => i = close,
            }
        };

        // Trailing span runs to the next `/**` opener, again stepping over
        // plain comments. An unterminated comment here still ends the span
        // so this pair is not lost; the error surfaces on the next call.
        let mut j = end;
        let trailing_end = loop {
            match find_from(self.text, "/*", j) {
                None => break self.text.len(),
                Some(open) => match comment_at(self.text, open) {
                    None => {
                        self.pending = Some(ScanError::UnterminatedComment { offset: open });
                        break open;
                    }
                    Some((_, Some(_))) => break open,
                    Some((close, None)) => j = close,
                },
            }
        };
        self.pos = trailing_end;

        let block = CommentBlock {
            start,
            end,
            lines: self.text[content.0..content.1].lines().collect(),
        };
        let trailing = Trailing {
            text: &self.text[end..trailing_end],
            offset: end,
        };
        Some(Ok((block, trailing)))
    }
}
