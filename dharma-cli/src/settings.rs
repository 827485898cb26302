//! Settings-file loader (SPEC_FULL.md §5 "Settings file", §9 decision).
//!
//! Unlike grammar loading, there is no search order: the reference
//! implementation's `-settings` flag has none either. Without an explicit
//! `--settings <path>`, `dharma_gen::Config::default()` stands untouched.

use crate::error::{CliError, Result};
use dharma_grammar::ConstValue;
use dharma_util::UriTable;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    constants: HashMap<String, toml::Value>,
    /// Alias overrides for `%uri%(alias)` resolution (SPEC_FULL.md §6
    /// `URI_TABLE`), merged on top of `dharma_gen::Config::default()`'s
    /// built-in `images`/`videos`/`audios` aliases.
    #[serde(default)]
    uri_table: HashMap<String, PathBuf>,
}

/// Settings loaded from a TOML file: `%const%`-style overrides plus
/// `%uri%` alias overrides.
#[derive(Debug, Default)]
pub struct Settings {
    pub constants: HashMap<String, ConstValue>,
    pub uri_table: HashMap<String, PathBuf>,
}

/// Load the `[constants]` and `[uri_table]` tables from a TOML settings file.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let text =
        std::fs::read_to_string(path).map_err(|e| CliError::Settings(format!("{}: {e}", path.display())))?;
    let file: SettingsFile =
        toml::from_str(&text).map_err(|e| CliError::Settings(format!("{}: {e}", path.display())))?;
    let constants = file
        .constants
        .into_iter()
        .map(|(name, value)| Ok((name.clone(), to_const_value(&name, value)?)))
        .collect::<Result<HashMap<_, _>>>()?;
    Ok(Settings { constants, uri_table: file.uri_table })
}

/// Merge `overrides` on top of `base`, returning the combined table.
pub fn merge_uri_table(mut base: UriTable, overrides: HashMap<String, PathBuf>) -> UriTable {
    for (alias, path) in overrides {
        base.insert(alias, path);
    }
    base
}

fn to_const_value(name: &str, value: toml::Value) -> Result<ConstValue> {
    match value {
        toml::Value::String(s) => Ok(ConstValue::Str(s)),
        toml::Value::Integer(i) => Ok(ConstValue::Int(i)),
        toml::Value::Float(f) => Ok(ConstValue::Float(f)),
        other => Err(CliError::Settings(format!("constant `{name}` has an unsupported value: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_mixed_constant_types() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[constants]\nLEAF_TRIGGER = 10\nVARIANCE_TEMPLATE = \"<%s>\"\n").unwrap();
        let loaded = load_settings(file.path()).unwrap();
        assert_eq!(loaded.constants.get("LEAF_TRIGGER"), Some(&ConstValue::Int(10)));
        assert_eq!(loaded.constants.get("VARIANCE_TEMPLATE"), Some(&ConstValue::Str("<%s>".to_string())));
    }

    #[test]
    fn loads_uri_table_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[uri_table]\nimages = \"/custom/images\"\nwidgets = \"/custom/widgets\"\n").unwrap();
        let loaded = load_settings(file.path()).unwrap();
        assert_eq!(loaded.uri_table.get("images"), Some(&PathBuf::from("/custom/images")));
        assert_eq!(loaded.uri_table.get("widgets"), Some(&PathBuf::from("/custom/widgets")));
    }

    #[test]
    fn merge_overrides_and_keeps_unrelated_defaults() {
        let base = dharma_drv::SessionConfig::default().uri_table;
        let default_videos = dharma_drv::SessionConfig::default().uri_table.resolve("videos");
        let mut overrides = HashMap::new();
        overrides.insert("images".to_string(), PathBuf::from("/custom/images"));
        let merged = merge_uri_table(base, overrides);
        assert_eq!(merged.resolve("images"), PathBuf::from("/custom/images"));
        // `videos` is untouched, so it should keep whatever the default table set.
        assert_eq!(merged.resolve("videos"), default_videos);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_settings(Path::new("/no/such/settings.toml")).is_err());
    }

    #[test]
    fn unsupported_value_kind_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[constants]\nVARIANCE_MIN = [1, 2]\n").unwrap();
        assert!(load_settings(file.path()).is_err());
    }
}
