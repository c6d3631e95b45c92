//! Log ingestion layer: the entry model and the `LogSource` abstraction the tail loop polls.
//!
//! The runtime depends on the `LogSource` trait rather than a concrete backend. `JsonLinesFile`
//! is the backend shipped with the binary: one JSON-encoded entry per line, re-read on every poll.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::filter::ResourceFilter;

/// One log line as returned by a source. All three fields form the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct LogEntry {
    /// Identifier of the emitting resource (name, `type::name` or URN).
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
}

#[cfg(test)]
impl LogEntry {
    pub fn new(id: impl Into<String>, timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            message: message.into(),
        }
    }
}

/// The window every poll of a session is issued with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Lower bound; `None` returns all available history.
    pub start_time: Option<DateTime<Utc>>,
    pub resource_filter: Option<ResourceFilter>,
}

impl LogQuery {
    /// Whether `entry` falls inside this window.
    pub fn admits(&self, entry: &LogEntry) -> bool {
        if let Some(start) = self.start_time {
            if entry.timestamp < start.timestamp_millis() {
                return false;
            }
        }
        match &self.resource_filter {
            Some(filter) => filter.matches(&entry.id),
            None => true,
        }
    }
}

/// Generic trait for log sources.
///
/// Implementors may return entries in any order, may repeat entries returned by earlier
/// calls, and may surface entries late.
#[async_trait::async_trait]
pub trait LogSource: Send + Sync {
    async fn query(&self, query: &LogQuery) -> Result<Vec<LogEntry>>;
}

/// File-backed source: a JSON-lines file holding the entries of one stack.
pub struct JsonLinesFile {
    pub path: PathBuf,
}

impl JsonLinesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl LogSource for JsonLinesFile {
    async fn query(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("failed to open log file {}", self.path.display()))?;
        let mut lines = BufReader::new(file).lines();
        let mut entries = Vec::new();
        let mut line_no = 0usize;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) if query.admits(&entry) => entries.push(entry),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        file = %self.path.display(),
                        line = line_no,
                        error = %err,
                        "skipping malformed log line"
                    );
                }
            }
        }
        tracing::trace!(file = %self.path.display(), count = entries.len(), "poll read entries");
        Ok(entries)
    }
}
