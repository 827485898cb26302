//! Fatal error types shared across the pipeline.
//!
//! A [`GrammarError`] always carries enough context to print the
//! `namespace, line N, rule` style message the engine's diagnostics require,
//! even outside of a [`crate::diagnostic::Handler`] (e.g. I/O failures that
//! happen before a [`crate::span::SourceMap`] exists).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("{path}: {message}")]
    Io { path: String, message: String },

    #[error("{location}: parse error: {message}")]
    Parse { location: String, message: String },

    #[error("{location}: undefined reference `{reference}`")]
    UndefinedReference { location: String, reference: String },

    #[error("{location}: duplicate definition of `{ident}`")]
    DuplicateDefinition { location: String, ident: String },

    #[error("{location}: {message}")]
    Resolve { location: String, message: String },

    #[error("{location}: {message}")]
    Generate { location: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GrammarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_reference_message_contains_identifier() {
        let err = GrammarError::UndefinedReference {
            location: "html:1".into(),
            reference: "html:missing".into(),
        };
        assert!(err.to_string().contains("html:missing"));
    }
}
