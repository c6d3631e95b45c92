use std::collections::HashSet;
use std::time::Duration;

use crate::log::LogEntry;

/// Entries already emitted during one tail session.
///
/// With a retention window the set only remembers entries within `window` of the newest
/// timestamp seen. Anything older than that horizon is treated as handled, so an entry that
/// first shows up more than `window` behind the newest one is dropped instead of shown.
/// The newest timestamp is capped at the wall clock when the horizon moves, so one entry
/// stamped in the future cannot push the horizon past entries that are still arriving.
/// Without a window the set grows for the whole session and never suppresses a new entry.
#[derive(Debug, Default)]
pub struct SeenSet {
    entries: HashSet<LogEntry>,
    // Milliseconds.
    retention: Option<i64>,
    newest: Option<i64>,
    horizon: Option<i64>,
}

impl SeenSet {
    pub fn new(retention: Option<Duration>) -> Self {
        Self {
            retention: retention.map(|window| i64::try_from(window.as_millis()).unwrap_or(i64::MAX)),
            ..Self::default()
        }
    }

    /// Records `entry` and returns true if this is its first sighting.
    pub fn insert(&mut self, entry: &LogEntry) -> bool {
        if self.horizon.is_some_and(|horizon| entry.timestamp < horizon) {
            return false;
        }
        if self.entries.contains(entry) {
            return false;
        }
        self.entries.insert(entry.clone());
        self.newest = Some(self.newest.map_or(entry.timestamp, |n| n.max(entry.timestamp)));
        true
    }

    /// Moves the horizon up to `min(newest, now) - retention` and forgets entries behind it.
    /// `now` is wall-clock milliseconds. Returns the number of entries dropped.
    pub fn evict(&mut self, now: i64) -> usize {
        let (Some(retention), Some(newest)) = (self.retention, self.newest) else {
            return 0;
        };
        let horizon = newest.min(now).saturating_sub(retention);
        if self.horizon.is_some_and(|current| current >= horizon) {
            return 0;
        }
        self.horizon = Some(horizon);
        let before = self.entries.len();
        self.entries.retain(|entry| entry.timestamp >= horizon);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_000_000_000;

    fn entry(ts: i64, msg: &str) -> LogEntry {
        LogEntry::new("a", ts, msg)
    }

    #[test]
    fn second_sighting_is_rejected() {
        let mut seen = SeenSet::new(None);
        assert!(seen.insert(&entry(100, "m1")));
        assert!(!seen.insert(&entry(100, "m1")));
        assert!(seen.insert(&entry(100, "m2")));
        assert!(seen.insert(&LogEntry::new("b", 100, "m1")));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn unbounded_set_keeps_everything_and_accepts_late_entries() {
        let mut seen = SeenSet::new(None);
        assert!(seen.insert(&entry(1_000_000, "new")));
        assert_eq!(seen.evict(NOW), 0);
        assert!(seen.insert(&entry(1, "very late")));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn eviction_drops_entries_behind_the_window() {
        let mut seen = SeenSet::new(Some(Duration::from_secs(10)));
        seen.insert(&entry(1_000, "old"));
        seen.insert(&entry(15_000, "mid"));
        seen.insert(&entry(20_000, "new"));
        assert_eq!(seen.evict(NOW), 1);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn evicted_entries_are_not_shown_again() {
        let mut seen = SeenSet::new(Some(Duration::from_secs(10)));
        seen.insert(&entry(1_000, "old"));
        seen.insert(&entry(20_000, "new"));
        seen.evict(NOW);
        assert!(!seen.insert(&entry(1_000, "old")));
        assert!(!seen.insert(&entry(20_000, "new")));
    }

    #[test]
    fn late_entries_inside_the_window_are_accepted() {
        let mut seen = SeenSet::new(Some(Duration::from_secs(10)));
        seen.insert(&entry(20_000, "new"));
        seen.evict(NOW);
        assert!(seen.insert(&entry(12_000, "late but in window")));
        assert!(!seen.insert(&entry(9_999, "too late")));
    }

    #[test]
    fn future_timestamps_do_not_move_the_horizon_past_now() {
        let mut seen = SeenSet::new(Some(Duration::from_secs(10)));
        seen.insert(&entry(i64::MAX, "skewed"));
        seen.insert(&entry(NOW - 1_000, "current"));
        assert_eq!(seen.evict(NOW), 0);
        assert!(seen.insert(&entry(NOW - 5_000, "recent")));
        assert!(!seen.insert(&entry(NOW - 20_000, "behind window")));
    }
}
