use crate::avg::RunningAverage;
use crate::slot::SlotKey;
use crate::store::Store;
use crate::week;
use chrono::{DateTime, Duration, Utc, Weekday};
use std::collections::BTreeMap;

/// Rebuilds the per-slot averages for one weekday from raw history.
///
/// Starting from the most recent occurrence of `weekday` strictly before
/// `now`, walks `weeks_back` occurrences in 7-day steps and folds every
/// history entry recorded on those dates into a fresh running average per
/// recurring slot. The persisted `stats` table is never consulted; the
/// result is rebuilt from scratch on every call.
///
/// The returned pairs are ordered by time-of-day. A `weeks_back` of zero,
/// or a window without any history, yields an empty sequence.
///
/// # Errors
///
/// Returns error if the storage engine fails.
pub fn weekday_profile(
    store: &Store,
    weekday: Weekday,
    weeks_back: u32,
    now: &DateTime<Utc>,
) -> crate::Result<Vec<(SlotKey, RunningAverage)>> {
    let anchor = week::most_recent_past_occurrence(weekday, now.date_naive());

    let mut slots: BTreeMap<SlotKey, RunningAverage> = BTreeMap::new();

    for weeks_ago in 0..weeks_back {
        let date = anchor - Duration::weeks(i64::from(weeks_ago));

        for (ts, value) in store.history_for_day(date)? {
            let slot = SlotKey::at(&ts);
            let folded = RunningAverage::fold_into(slots.get(&slot).copied(), value);
            slots.insert(slot, folded);
        }
    }

    Ok(slots.into_iter().collect())
}
