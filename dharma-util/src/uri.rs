//! Alias table for `%uri%` meta tokens, shared between the grammar parser
//! (which resolves aliases to file-system paths while building [`crate::Token`]-
//! shaped nodes) and the generator's configuration (which owns the table).

use std::collections::HashMap;
use std::path::PathBuf;

/// Maps a short alias (`images`, `videos`, ...) to a directory or file path.
#[derive(Clone, Debug, Default)]
pub struct UriTable(HashMap<String, PathBuf>);

impl UriTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, path: impl Into<PathBuf>) {
        self.0.insert(alias.into(), path.into());
    }

    /// Resolve `raw` through the alias table, falling back to treating `raw`
    /// itself as a literal path when no alias matches.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        self.0.get(raw).cloned().unwrap_or_else(|| PathBuf::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_alias_to_mapped_path() {
        let mut table = UriTable::new();
        table.insert("images", "fuzzdata/samples/jpg/");
        assert_eq!(table.resolve("images"), PathBuf::from("fuzzdata/samples/jpg/"));
    }

    #[test]
    fn falls_back_to_literal_path() {
        let table = UriTable::new();
        assert_eq!(table.resolve("some/dir"), PathBuf::from("some/dir"));
    }
}
