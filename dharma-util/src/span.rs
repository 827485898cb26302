//! Source locations.
//!
//! Grammar files are line-oriented, so a [`Span`] is a file identity plus a
//! 1-based line number rather than a byte range. That is enough to reproduce
//! every diagnostic the engine emits ("namespace, line N, rule `ident`").

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

/// Identifies a loaded grammar file within a [`SourceMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

/// A location within a loaded grammar file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub line: u32,
}

impl Span {
    pub const DUMMY: Span = Span { file: FileId(u32::MAX), line: 0 };

    pub fn new(file: FileId, line: u32) -> Self {
        Span { file, line }
    }

    pub fn is_dummy(&self) -> bool {
        *self == Span::DUMMY
    }
}

/// A single loaded grammar file: its path and raw contents, split into lines
/// once so every later stage can re-quote source text by line number.
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

impl SourceFile {
    pub fn line(&self, line: u32) -> Option<&str> {
        self.contents.lines().nth(line.saturating_sub(1) as usize)
    }
}

/// Registry of every grammar file loaded in a run, indexed by [`FileId`].
#[derive(Default)]
pub struct SourceMap {
    files: RwLock<Vec<SourceFile>>,
    next_id: AtomicU32,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_file(&self, path: &Path, contents: String) -> FileId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.files.write().unwrap().push(SourceFile { path: path.to_path_buf(), contents });
        FileId(id)
    }

    pub fn path_of(&self, file: FileId) -> PathBuf {
        self.files
            .read()
            .unwrap()
            .get(file.0 as usize)
            .map(|f| f.path.clone())
            .unwrap_or_default()
    }

    /// Render `span` as `path:line: text`, matching the one-line diagnostic
    /// format the engine always emits.
    pub fn format_span(&self, span: Span) -> String {
        if span.is_dummy() {
            return "<unknown>".to_string();
        }
        let files = self.files.read().unwrap();
        match files.get(span.file.0 as usize) {
            Some(file) => format!("{}:{}", file.path.display(), span.line),
            None => format!("<file {}>:{}", span.file.0, span.line),
        }
    }
}

impl fmt::Debug for SourceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceMap({} files)", self.files.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_span_includes_path_and_line() {
        let map = SourceMap::new();
        let id = map.load_file(Path::new("common.dg"), "a\nb\nc\n".to_string());
        let rendered = map.format_span(Span::new(id, 2));
        assert!(rendered.ends_with("common.dg:2"));
    }

    #[test]
    fn dummy_span_formats_as_unknown() {
        let map = SourceMap::new();
        assert_eq!(map.format_span(Span::DUMMY), "<unknown>");
    }
}
