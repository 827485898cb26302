//! Shared infrastructure for the dharma grammar engine.
//!
//! This crate holds nothing specific to grammar syntax or generation; it is
//! the same kind of foundation layer a compiler front end keeps in its
//! `util` crate: string interning, source locations, diagnostics, and a
//! typed arena.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;
pub mod uri;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::{GrammarError, Result};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceMap, Span};
pub use symbol::Symbol;
pub use uri::UriTable;
