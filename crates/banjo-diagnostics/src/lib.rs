//! Diagnostic collection and rendering for the banjo front end.
//!
//! Per spec.md §7, every error kind (lexical, syntax, lookup, overload,
//! type, constraint, declaration) is non-fatal to the translation unit as a
//! whole: it is recorded here and the unit's failure is decided at the end
//! by whether any diagnostic was an error. Only the "internal error"
//! (unhandled case / unreachable) class aborts immediately and is therefore
//! never routed through `Diagnostics` — see `banjo_sema::error::InternalError`.

mod message;
mod printer;

pub use message::{Kind, Severity};
pub use printer::DiagnosticsPrinter;

use banjo_core::Span;
use message::{DiagnosticMessage, RelatedInfo};

/// Collection of diagnostics accumulated over one translation unit.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder returned by `Diagnostics::error`/`warning`; chain `.related(...)`
/// calls before `.emit()`.
#[must_use = "diagnostic not recorded until .emit() is called"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, kind: Kind, span: Span, msg: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(Severity::Error, kind, span, msg),
        }
    }

    pub fn warning(&mut self, kind: Kind, span: Span, msg: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(Severity::Warning, kind, span, msg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(DiagnosticMessage::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer<'a>(&'a self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(&self.messages, source)
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn related(mut self, span: Span, msg: impl Into<String>) -> Self {
        self.message.related.push(RelatedInfo { span, message: msg.into() });
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::SourceId;

    fn span(a: u32, b: u32) -> Span {
        Span::new(SourceId::from_raw(0), a, b)
    }

    #[test]
    fn accumulates_and_counts_errors() {
        let mut diags = Diagnostics::new();
        diags.error(Kind::Syntax, span(0, 3), "unexpected token").emit();
        diags.warning(Kind::Type, span(4, 5), "unused").emit();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.error_count(), 1);
        assert!(diags.has_errors());
    }

    #[test]
    fn extend_merges_two_collections() {
        let mut a = Diagnostics::new();
        a.error(Kind::Lookup, span(0, 1), "undeclared name").emit();
        let mut b = Diagnostics::new();
        b.error(Kind::Overload, span(2, 3), "no viable candidate").emit();
        a.extend(b);
        assert_eq!(a.len(), 2);
    }
}
