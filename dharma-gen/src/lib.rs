//! Stochastic expansion engine over a resolved grammar rule graph
//! (SPEC_FULL.md §4.5).

pub mod config;
pub mod generator;
pub mod state;

pub use config::Config;
pub use generator::Generator;
