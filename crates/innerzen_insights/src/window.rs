//! Timeframe windows over a chronological log.

use chrono::{DateTime, Duration, Months, Utc};
use innerzen_core::{Timeframe, Timestamped};
use std::borrow::Cow;

/// Earliest instant included in `timeframe`, or `None` for `All`.
///
/// A month back from the 31st lands on the last day of the shorter month.
pub fn cutoff(timeframe: Timeframe, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match timeframe {
        Timeframe::Week => Some(now - Duration::days(7)),
        Timeframe::Month => Some(
            now.checked_sub_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        ),
        Timeframe::All => None,
    }
}

/// Entries with `timestamp >= cutoff(timeframe, now)`.
///
/// Logs kept in chronological order (the normal case) are answered with a
/// borrowed tail slice; anything else is filtered into an owned copy. The
/// source is never mutated.
pub fn filter_by_timeframe<T>(log: &[T], timeframe: Timeframe, now: DateTime<Utc>) -> Cow<'_, [T]>
where
    T: Timestamped + Clone,
{
    let Some(cutoff) = cutoff(timeframe, now) else {
        return Cow::Borrowed(log);
    };

    let chronological = log
        .windows(2)
        .all(|pair| pair[0].timestamp() <= pair[1].timestamp());

    if chronological {
        let start = log.partition_point(|e| e.timestamp() < cutoff);
        Cow::Borrowed(&log[start..])
    } else {
        tracing::debug!("Log is out of order, filtering into an owned window");
        Cow::Owned(
            log.iter()
                .filter(|e| e.timestamp() >= cutoff)
                .cloned()
                .collect(),
        )
    }
}
