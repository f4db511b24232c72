//! `annotate-snippets` rendering of a diagnostic batch.
//!
//! Only a single-snippet-per-message renderer: a driver and its tests need
//! *some* human-readable output, not a full multi-span/multi-file layout
//! engine.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::message::{DiagnosticMessage, Severity};

pub struct DiagnosticsPrinter<'a> {
    messages: &'a [DiagnosticMessage],
    source: &'a str,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub(crate) fn new(messages: &'a [DiagnosticMessage], source: &'a str) -> Self {
        Self {
            messages,
            source,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.messages.iter().enumerate() {
            let range = adjust_range(diag.span.start as usize, diag.span.end as usize, self.source.len());

            let mut snippet = Snippet::source(self.source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(range).label(&diag.message));

            for related in &diag.related {
                let r = adjust_range(related.span.start as usize, related.span.end as usize, self.source.len());
                snippet = snippet.annotation(AnnotationKind::Context.span(r).label(&related.message));
            }

            let level = severity_to_level(diag.severity);
            let report: Vec<Group> = vec![level.primary_title(&diag.message).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(start: usize, end: usize, limit: usize) -> std::ops::Range<usize> {
    let start = start.min(limit);
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end.min(limit)
}
