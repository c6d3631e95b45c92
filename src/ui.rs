//! Terminal presentation: the header line and the sink that prints one line per entry.

use std::io::{self, Write};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use crossterm::style::Stylize;

use crate::log::LogEntry;

/// Width of the timestamp and identifier columns; longer values are cut.
const COLUMN_WIDTH: usize = 30;

/// Destination for newly observed entries.
///
/// Failures are the sink's own business: the tail loop treats writes as infallible.
pub trait EntrySink {
    fn write(&mut self, entry: &LogEntry);

    /// Called once a poll's entries have all been written.
    fn flush(&mut self) {}
}

/// Zone used when rendering entry timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    #[default]
    Local,
    Utc,
}

impl DisplayZone {
    /// RFC 5424 style with millisecond precision, e.g. `2024-03-01T08:15:30.500Z`.
    pub fn format(self, instant: DateTime<Utc>) -> String {
        match self {
            Self::Local => instant
                .with_timezone(&Local)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            Self::Utc => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Render one entry as `<timestamp>[<id>] <message>` with fixed-width columns.
pub fn format_entry(entry: &LogEntry, zone: DisplayZone) -> String {
    let timestamp = match DateTime::from_timestamp_millis(entry.timestamp) {
        Some(instant) => zone.format(instant),
        None => entry.timestamp.to_string(),
    };
    format!(
        "{timestamp:>w$.w$}[{id:>w$.w$}] {message}",
        id = entry.id,
        message = entry.message,
        w = COLUMN_WIDTH,
    )
}

pub fn header_text(start: Option<DateTime<Utc>>, zone: DisplayZone) -> String {
    match start {
        Some(start) => format!("Collecting logs since {}.", zone.format(start)),
        None => "Collecting all available logs.".to_string(),
    }
}

/// Print the header in bright magenta, followed by a blank line.
pub fn write_header(out: &mut impl Write, start: Option<DateTime<Utc>>, zone: DisplayZone) -> io::Result<()> {
    writeln!(out, "{}\n", header_text(start, zone).magenta())?;
    out.flush()
}

/// Sink that writes formatted entries to any `Write`, normally stdout.
pub struct ConsoleSink<W: Write> {
    out: W,
    zone: DisplayZone,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, zone: DisplayZone) -> Self {
        Self { out, zone }
    }
}

impl<W: Write> EntrySink for ConsoleSink<W> {
    fn write(&mut self, entry: &LogEntry) {
        if let Err(err) = writeln!(self.out, "{}", format_entry(entry, self.zone)) {
            tracing::warn!(error = %err, id = %entry.id, "failed to write log entry");
        }
    }

    fn flush(&mut self) {
        if let Err(err) = self.out.flush() {
            tracing::warn!(error = %err, "failed to flush output");
        }
    }
}
