use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::filter::ResourceFilter;
use crate::since::parse_span;
use crate::tail::TailOptions;
use crate::ui::DisplayZone;

/// Immutable configuration used by the application runtime
#[derive(Debug, Clone)]
pub struct Config {
    /// Stack name; empty selects the current stack.
    pub stack: String,
    pub logs_dir: PathBuf,
    pub since: String,
    pub follow: bool,
    pub resource: Option<ResourceFilter>,
    pub poll_interval: Duration,
    /// `None` keeps every shown entry for the whole session.
    pub retention: Option<Duration>,
    pub zone: DisplayZone,
}

impl Config {
    pub fn tail_options(&self) -> TailOptions {
        TailOptions {
            poll_interval: self.poll_interval,
            retention: self.retention,
        }
    }
}

/// User-facing CLI arguments (kept private to the CLI layer)
#[derive(Parser, Debug)]
#[command(name = "logtail", version, about = "Show aggregated logs for a stack")]
struct Args {
    /// Show logs for a different stack than the currently selected one
    #[arg(short = 's', long = "stack", default_value = "")]
    stack: String,

    /// Directory holding `<stack>.jsonl` log files and the `current` stack marker
    #[arg(long = "logs-dir", env = "LOGTAIL_DIR", default_value = ".logtail")]
    logs_dir: PathBuf,

    /// Only return logs newer than a relative duration ('5s', '2m', '3h') or absolute timestamp.
    /// Defaults to returning the last 1 hour of logs.
    #[arg(long = "since", default_value = "1h", allow_hyphen_values = true)]
    since: String,

    /// Follow the log stream in real time (like tail -f)
    #[arg(short = 'f', long = "follow")]
    follow: bool,

    /// Only return logs for the requested resource ('name', 'type::name' or full URN).
    /// Defaults to returning all logs.
    #[arg(short = 'r', long = "resource", default_value = "")]
    resource: String,

    /// Time between polls when following
    #[arg(long = "interval", default_value = "1s", value_parser = poll_interval)]
    interval: Duration,

    /// Bound memory by remembering shown entries only this far behind the newest one (capped at
    /// the current time). Entries arriving later than this are not shown. 0 remembers all of them.
    #[arg(long = "dedup-window", default_value = "0", value_parser = parse_span)]
    dedup_window: Duration,

    /// Print timestamps in UTC instead of local time
    #[arg(long = "utc")]
    utc: bool,
}

fn poll_interval(value: &str) -> Result<Duration, String> {
    match parse_span(value) {
        Ok(span) if span.is_zero() => Err("interval must be greater than zero".to_string()),
        Ok(span) => Ok(span),
        Err(err) => Err(err.to_string()),
    }
}

/// Parse CLI options into an application Config
pub fn parse() -> Config {
    into_config(Args::parse())
}

fn into_config(args: Args) -> Config {
    Config {
        stack: args.stack,
        logs_dir: args.logs_dir,
        since: args.since,
        follow: args.follow,
        resource: ResourceFilter::new(args.resource),
        poll_interval: args.interval,
        retention: (!args.dedup_window.is_zero()).then_some(args.dedup_window),
        zone: if args.utc { DisplayZone::Utc } else { DisplayZone::Local },
    }
}
