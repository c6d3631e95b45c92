//! The tail loop: poll the source with a fixed window, emit entries not seen before, and in
//! follow mode sleep and repeat until cancelled.
//!
//! The window is never narrowed to the newest timestamp already shown. Sources can deliver
//! entries late, and those still have to be printed even though they sort before lines that
//! are already on screen.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::error::TailError;
use crate::log::{LogQuery, LogSource};
use crate::state::SeenSet;
use crate::ui::EntrySink;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct TailOptions {
    /// Pause between polls in follow mode.
    pub poll_interval: Duration,
    /// Seen-set retention window; `None` remembers every entry for the whole session and never
    /// drops an entry it has not shown.
    pub retention: Option<Duration>,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            retention: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailSummary {
    pub polls: usize,
    pub emitted: usize,
}

/// Run one tail session.
///
/// One-shot (`follow == false`) returns after a single poll. Follow mode returns once `cancel`
/// fires while waiting between polls. A failed poll ends the session and none of its entries
/// are written.
pub async fn run(
    query: &LogQuery,
    follow: bool,
    options: &TailOptions,
    source: &dyn LogSource,
    sink: &mut dyn EntrySink,
    cancel: &CancellationToken,
) -> Result<TailSummary, TailError> {
    let mut seen = SeenSet::new(options.retention);
    let mut summary = TailSummary::default();

    if cancel.is_cancelled() {
        tracing::debug!("cancelled before first poll");
        return Ok(summary);
    }

    loop {
        let entries = source.query(query).await.map_err(TailError::Query)?;
        summary.polls += 1;

        let mut fresh = 0usize;
        for entry in &entries {
            if seen.insert(entry) {
                sink.write(entry);
                fresh += 1;
            }
        }
        sink.flush();
        summary.emitted += fresh;

        let evicted = seen.evict(Utc::now().timestamp_millis());
        tracing::debug!(
            poll = summary.polls,
            returned = entries.len(),
            fresh,
            evicted,
            tracked = seen.len(),
            "poll complete"
        );

        if !follow {
            return Ok(summary);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(summary),
            _ = tokio::time::sleep(options.poll_interval) => {}
        }
    }
}
