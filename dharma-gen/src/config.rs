//! Tuning constants for the generator (SPEC_FULL.md §6).
//!
//! Populated from three layers, applied in order: built-in defaults, an
//! optional settings file (`dharma-cli`), then any `%const%` directive found
//! while parsing a grammar file. An unrecognized name at any layer is fatal.

use dharma_grammar::ConstValue;
use dharma_util::error::{GrammarError, Result};
use dharma_util::UriTable;

#[derive(Clone, Debug)]
pub struct Config {
    pub variance_min: i64,
    pub variance_max: i64,
    pub variable_min: i64,
    pub variable_max: i64,
    pub variance_template: String,
    pub max_repeat_power: u32,
    pub leaf_trigger: u64,
    pub uri_table: UriTable,
}

impl Default for Config {
    fn default() -> Self {
        let mut uri_table = UriTable::new();
        uri_table.insert("images", "fuzzdata/samples/images");
        uri_table.insert("videos", "fuzzdata/samples/videos");
        uri_table.insert("audios", "fuzzdata/samples/audios");
        Config {
            variance_min: 1,
            variance_max: 8,
            variable_min: 1,
            variable_max: 4,
            variance_template: "%s".to_string(),
            max_repeat_power: 12,
            leaf_trigger: 256,
            uri_table,
        }
    }
}

impl Config {
    /// Apply one named constant, failing fatally on an unrecognized name or a
    /// value of the wrong kind (SPEC_FULL.md §9 "Configuration constants").
    pub fn apply_const(&mut self, name: &str, value: &ConstValue) -> Result<()> {
        match name.to_ascii_uppercase().as_str() {
            "VARIANCE_MIN" => self.variance_min = expect_int(name, value)?,
            "VARIANCE_MAX" => self.variance_max = expect_int(name, value)?,
            "VARIABLE_MIN" => self.variable_min = expect_int(name, value)?,
            "VARIABLE_MAX" => self.variable_max = expect_int(name, value)?,
            "VARIANCE_TEMPLATE" => self.variance_template = expect_str(name, value)?,
            "MAX_REPEAT_POWER" => self.max_repeat_power = expect_int(name, value)? as u32,
            "LEAF_TRIGGER" => self.leaf_trigger = expect_int(name, value)? as u64,
            other => {
                return Err(GrammarError::Config(format!("unrecognized constant `{other}`")));
            }
        }
        Ok(())
    }
}

fn expect_int(name: &str, value: &ConstValue) -> Result<i64> {
    match value {
        ConstValue::Int(i) => Ok(*i),
        _ => Err(GrammarError::Config(format!("constant `{name}` expects an integer value"))),
    }
}

fn expect_str(name: &str, value: &ConstValue) -> Result<String> {
    match value {
        ConstValue::Str(s) => Ok(s.clone()),
        _ => Err(GrammarError::Config(format!("constant `{name}` expects a string value"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_table() {
        let cfg = Config::default();
        assert_eq!(cfg.variance_min, 1);
        assert_eq!(cfg.variance_max, 8);
        assert_eq!(cfg.variable_min, 1);
        assert_eq!(cfg.variable_max, 4);
        assert_eq!(cfg.variance_template, "%s");
        assert_eq!(cfg.max_repeat_power, 12);
        assert_eq!(cfg.leaf_trigger, 256);
    }

    #[test]
    fn apply_const_overrides_known_name() {
        let mut cfg = Config::default();
        cfg.apply_const("LEAF_TRIGGER", &ConstValue::Int(0)).unwrap();
        assert_eq!(cfg.leaf_trigger, 0);
    }

    #[test]
    fn apply_const_rejects_unknown_name() {
        let mut cfg = Config::default();
        let err = cfg.apply_const("NOT_A_REAL_CONSTANT", &ConstValue::Int(1));
        assert!(matches!(err, Err(GrammarError::Config(_))));
    }

    #[test]
    fn apply_const_rejects_wrong_kind() {
        let mut cfg = Config::default();
        let err = cfg.apply_const("LEAF_TRIGGER", &ConstValue::Str("nope".into()));
        assert!(err.is_err());
    }
}
