//! Argument surface (SPEC_FULL.md §5 "Command surface"), mirroring the
//! reference implementation's `dharma.py` flags with the ambient stack's
//! usual knobs (`--verbose`/`RUST_LOG`) in place of a numeric `-logging`
//! level.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dharma")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generation-based context-free grammar fuzzer", long_about = None)]
pub struct Cli {
    /// Grammar files to load, in addition to the bundled `common` grammar.
    #[arg(long = "grammars", required = true, num_args = 1.., value_name = "FILE")]
    pub grammars: Vec<PathBuf>,

    /// PRNG seed. Defaults to the process id, matching the reference
    /// implementation's `-seed` default.
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML settings file overriding constants from SPEC_FULL.md §6's
    /// defaults table. No search path: omit this to use the defaults as-is.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Number of test cases to generate.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Output file extension used in storage mode.
    #[arg(long, default_value = "txt")]
    pub format: String,

    /// File whose contents are prepended to every test case.
    #[arg(long)]
    pub prefix: Option<PathBuf>,

    /// File whose contents are appended to every test case.
    #[arg(long)]
    pub suffix: Option<PathBuf>,

    /// File containing a `$testcase_content` placeholder to substitute into.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory to write numbered test case files into. Omit to print to
    /// stdout instead (ignored when `--server` is set).
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Run as a WebSocket server instead of a one-shot batch.
    #[arg(long)]
    pub server: bool,

    /// Host to bind when `--server` is set.
    #[arg(long = "server-host", default_value = "127.0.0.1")]
    pub server_host: String,

    /// Port to bind when `--server` is set.
    #[arg(long = "server-port", default_value_t = 9090)]
    pub server_port: u16,

    /// Advisory documentation of the expected native-recursion depth bound;
    /// `LEAF_TRIGGER`-forced leaf mode is the real termination guarantee
    /// (SPEC_FULL.md §5 "Per-case bounds").
    #[arg(long = "recursion-limit", default_value_t = 20_000)]
    pub recursion_limit: u64,

    /// Enable debug-level logging (or set `RUST_LOG` directly).
    #[arg(short, long, global = true, env = "DHARMA_VERBOSE")]
    pub verbose: bool,
}
