//! Diagnostics and the fatal scan error.
//!
//! Everything the engine reports is either a `ScanError` (fatal for the
//! current file) or a `Diagnostic` accumulated alongside the symbol graph.

use std::fmt;
use thiserror::Error;

/// Fatal scanner failure. Aborts the current file's scan; other files in a
/// corpus run continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A block comment opener with no matching `*/` before end of input.
    #[error("unterminated block comment at byte {offset}")]
    UnterminatedComment { offset: usize },
}

impl ScanError {
    /// Byte offset of the construct that failed.
    pub fn offset(&self) -> usize {
        match self {
            ScanError::UnterminatedComment { offset } => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// What kind of finding a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    /// Block comment never closed; the file's scan was aborted here.
    UnterminatedComment,
    /// `@struct`/`@enum`/`@function` with an empty name argument.
    MissingName,
    /// A tag outside the recognized vocabulary.
    UnknownTag,
    /// `@member`/`@entry` count differs from the declared member count.
    MemberCountMismatch,
    /// `@param` name absent from the function signature.
    UnknownParamName,
    /// Enum body only invokes a generator macro and no list macro was found.
    UnresolvedEnumIdiom,
    /// Second declaration of an already-recorded symbol name.
    DuplicateSymbol,
    /// `@related` name with no matching symbol in the graph.
    UnresolvedReference,
}

impl DiagKind {
    /// Default severity for this kind, per the error taxonomy.
    pub fn severity(self) -> Severity {
        match self {
            DiagKind::UnterminatedComment => Severity::Error,
            DiagKind::UnknownTag => Severity::Note,
            _ => Severity::Warning,
        }
    }
}

/// One reported finding. `offset` is a byte position into the original
/// input text of `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagKind,
    pub file: String,
    pub offset: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagKind, file: &str, offset: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: kind.severity(),
            kind,
            file: file.to_string(),
            offset,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.offset, self.severity, self.message
        )
    }
}
