//! Diagnostic reporting.
//!
//! Grammar compilation recognizes exactly two severities: a [`Level::Fatal`]
//! diagnostic aborts the run once the current pass returns, a
//! [`Level::Warning`] is collected and generation continues. There is no
//! note/help ladder here, the grammar format does not need one.

use crate::span::{SourceMap, Span};
use std::fmt;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Fatal,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Fatal => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn fatal(message: impl Into<String>, span: Span) -> Self {
        Diagnostic { level: Level::Fatal, message: message.into(), span }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Diagnostic { level: Level::Warning, message: message.into(), span }
    }

    pub fn render(&self, sources: &SourceMap) -> String {
        format!("{}: {}: {}", sources.format_span(self.span), self.level, self.message)
    }
}

/// Accumulates diagnostics for a run. Fatal diagnostics are also returned as
/// `Err` by the call site that raised them; the handler's job is to collect
/// warnings so they can all be reported together once generation finishes.
#[derive(Default)]
pub struct Handler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diag);
    }

    pub fn warn(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(message, span));
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.lock().unwrap().iter().any(|d| d.level == Level::Fatal)
    }

    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics.lock().unwrap())
    }

    pub fn render_all(&self, sources: &SourceMap) -> Vec<String> {
        self.diagnostics.lock().unwrap().iter().map(|d| d.render(sources)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceMap;
    use std::path::Path;

    #[test]
    fn handler_collects_warnings() {
        let handler = Handler::new();
        handler.warn("constant redefined", Span::DUMMY);
        assert!(!handler.has_fatal());
        assert_eq!(handler.drain().len(), 1);
    }

    #[test]
    fn render_formats_level_and_location() {
        let sources = SourceMap::new();
        let file = sources.load_file(Path::new("g.dg"), "x\n".into());
        let diag = Diagnostic::fatal("undefined reference", Span::new(file, 1));
        assert!(diag.render(&sources).contains("error"));
        assert!(diag.render(&sources).contains("g.dg:1"));
    }
}
