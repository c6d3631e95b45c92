use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use tokio_util::sync::CancellationToken;

use crate::cli::Config;
use crate::log::LogQuery;
use crate::since;
use crate::stack::require_stack;
use crate::tail;
use crate::ui::{self, ConsoleSink};

/// Application runtime: resolves the stack and window, then runs the tail loop against stdout.
pub async fn run(config: Config) -> Result<()> {
    let stack = require_stack(&config.stack, &config.logs_dir).await?;

    let start_time = since::resolve(&config.since, Local::now().fixed_offset())
        .context("failed to parse argument to '--since' as duration or timestamp")?;
    let query = LogQuery {
        start_time,
        resource_filter: config.resource.clone(),
    };
    tracing::debug!(
        stack = %stack.name,
        start = ?query.start_time,
        resource = query.resource_filter.as_ref().map(|f| f.as_str()),
        follow = config.follow,
        "starting log tail"
    );

    let mut stdout = io::stdout();
    ui::write_header(&mut stdout, start_time, config.zone).context("failed to write header")?;

    let cancel = CancellationToken::new();
    if config.follow {
        // Only follow mode swaps the default Ctrl-C behaviour for a clean stop.
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received, stopping");
                interrupt.cancel();
            }
        });
    }

    let options = config.tail_options();
    let source = stack.source();
    let mut sink = ConsoleSink::new(stdout, config.zone);
    let summary = tail::run(&query, config.follow, &options, &source, &mut sink, &cancel).await?;

    tracing::debug!(polls = summary.polls, emitted = summary.emitted, "log tail finished");
    Ok(())
}
