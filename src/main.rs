//! logtail entry point: sets up logging, parses the CLI and starts the async runtime.
//! The main function is intentionally thin and delegates to the runtime in `app`.

mod app;
mod cli;
mod error;
mod filter;
mod log;
mod since;
mod stack;
mod state;
mod tail;
mod ui;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostics filter, e.g. `LOGTAIL_LOG=debug`.
const LOG_ENV: &str = "LOGTAIL_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = cli::parse();
    app::run(config).await
}

/// Diagnostics go to stderr so they never interleave with entries on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
