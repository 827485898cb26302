//! Entry point: parse arguments, load settings, build a `DharmaSession`, and
//! dispatch to stdout, storage, or server output (SPEC_FULL.md §5).

mod cli;
mod error;
mod server;
mod settings;

use clap::Parser;
use cli::Cli;
use dharma_drv::{DharmaSession, SessionConfig};
use error::Result;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)?;
    Ok(())
}

/// `RUST_LOG` wins when set; `--verbose` otherwise raises the default level
/// to debug, matching the reference implementation's `-logging` flag with
/// the ambient stack's usual tracing knobs instead of a numeric level.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(false)).init();
}

fn run(cli: Cli) -> Result<()> {
    let seed = cli.seed.unwrap_or_else(|| std::process::id() as u64);
    let prefix = read_optional(&cli.prefix)?;
    let suffix = read_optional(&cli.suffix)?;
    let template = cli.template.as_deref().map(fs::read_to_string).transpose()?;

    let settings = match &cli.settings {
        Some(path) => settings::load_settings(path)?,
        None => Default::default(),
    };

    if cli.recursion_limit < 100 {
        tracing::warn!(
            limit = cli.recursion_limit,
            "--recursion-limit is documentation-only; LEAF_TRIGGER is the real termination guarantee"
        );
    }

    let uri_table = settings::merge_uri_table(SessionConfig::default().uri_table, settings.uri_table);

    let config = SessionConfig {
        grammar_paths: cli.grammars.clone(),
        seed,
        prefix,
        suffix,
        template,
        uri_table,
        settings: settings.constants,
        ..SessionConfig::default()
    };

    let mut session = DharmaSession::build(config)?;

    if cli.server {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(server::serve(session, &cli.server_host, cli.server_port))?;
        return Ok(());
    }

    match &cli.storage {
        Some(dir) => session.generate_testcases(dir, &cli.format, cli.count)?,
        None => {
            for _ in 0..cli.count {
                print!("{}", session.generate_testcase()?);
            }
        }
    }

    for warning in session.handler.render_all(&session.sources) {
        tracing::warn!("{warning}");
    }

    Ok(())
}

fn read_optional(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(p) => Ok(fs::read_to_string(p)?),
        None => Ok(String::new()),
    }
}
