//! Diagnostic message types.

use banjo_core::Span;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Coarse classification of a diagnostic, mirroring the error-kind taxonomy
/// in spec.md §7. Purely informational: it does not change how a diagnostic
/// is rendered, only how callers may filter or count it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Lexical,
    Syntax,
    Lookup,
    Overload,
    Type,
    Constraint,
    Declaration,
    Internal,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::Lexical => "lexical",
            Kind::Syntax => "syntax",
            Kind::Lookup => "lookup",
            Kind::Overload => "overload",
            Kind::Type => "type",
            Kind::Constraint => "constraint",
            Kind::Declaration => "declaration",
            Kind::Internal => "internal",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticMessage {
    pub(crate) severity: Severity,
    pub(crate) kind: Kind,
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(severity: Severity, kind: Kind, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            span,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] at {}..{}: {}",
            self.severity, self.kind, self.span.start, self.span.end, self.message
        )
    }
}
