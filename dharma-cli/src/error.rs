//! Error handling for the CLI front end.
//!
//! Scoped to argument/settings/transport failures; pipeline failures surface
//! through [`dharma_util::GrammarError`] and convert in with `#[from]`,
//! matching the layered error-enum-per-crate convention used throughout the
//! workspace.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Grammar(#[from] dharma_util::GrammarError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_error_display() {
        let err = CliError::Settings("missing [constants]".to_string());
        assert_eq!(err.to_string(), "settings error: missing [constants]");
    }

    #[test]
    fn grammar_error_converts_via_from() {
        let grammar_err = dharma_util::GrammarError::Config("bad".to_string());
        let cli_err: CliError = grammar_err.into();
        assert!(matches!(cli_err, CliError::Grammar(_)));
    }
}
