//! Append-only activity logs.

use chrono::{DateTime, NaiveDate, Utc};
use innerzen_core::{Calendar, Timestamped};
use std::collections::BTreeSet;

/// Distinct local days with at least one entry.
pub fn active_days<T: Timestamped>(entries: &[T], calendar: &Calendar) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .map(|e| calendar.date_of(e.timestamp()))
        .collect()
}

/// A chronological, append-only log of entries.
///
/// Entries are never edited or removed. An entry stamped earlier than the
/// current tail (clock moved backwards) is inserted at its chronological
/// position so the log stays sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog<T> {
    entries: Vec<T>,
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Timestamped + Clone> EventLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted entries, restoring chronological order.
    pub fn from_persisted(mut entries: Vec<T>) -> Self {
        let sorted = entries
            .windows(2)
            .all(|pair| pair[0].timestamp() <= pair[1].timestamp());
        if !sorted {
            tracing::warn!("Persisted log of {} entries was out of order, re-sorting", entries.len());
            // stable: entries sharing a timestamp keep their stored order
            entries.sort_by_key(|e| e.timestamp());
        }
        Self { entries }
    }

    pub fn append(&mut self, entry: T) {
        let ts = entry.timestamp();
        match self.entries.last() {
            Some(last) if last.timestamp() > ts => {
                let at = self.entries.partition_point(|e| e.timestamp() <= ts);
                tracing::warn!("Entry at {} predates the log tail, inserting at {}", ts, at);
                self.entries.insert(at, entry);
            }
            _ => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Entries whose local calendar day is `day`.
    pub fn on_day<'a>(
        &'a self,
        calendar: &'a Calendar,
        day: NaiveDate,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.entries
            .iter()
            .filter(move |e| calendar.date_of(e.timestamp()) == day)
    }

    /// Entries on the same local day as `now`.
    pub fn today<'a>(
        &'a self,
        calendar: &'a Calendar,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.on_day(calendar, calendar.date_of(now))
    }

    pub fn active_days(&self, calendar: &Calendar) -> BTreeSet<NaiveDate> {
        active_days(&self.entries, calendar)
    }
}
