use crate::slot;
use crate::store::Store;
use crate::{rollup, week, Value};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One labeled reading in a query response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    /// Slot key or full timestamp, depending on the selector.
    pub timestamp: String,

    /// Averaged or raw value.
    pub value: Value,
}

/// Resolves a day selector against the store.
///
/// - `today` returns the raw history entries for the current calendar
///   date, unaggregated, labeled by their full timestamps
/// - a weekday name returns the reconstructed weekly profile over the
///   lookback window, labeled by slot key
/// - anything else resolves to an empty sequence; unknown selectors are
///   filtered here at the boundary and are not an error
///
/// Both variants are ordered ascending by time.
///
/// # Errors
///
/// Returns error if the storage engine fails.
pub fn day_query(
    store: &Store,
    selector: &str,
    lookback_weeks: u32,
    now: &DateTime<Utc>,
) -> crate::Result<Vec<Sample>> {
    if selector == "today" {
        let entries = store.history_for_day(now.date_naive())?;

        return Ok(entries
            .into_iter()
            .map(|(ts, value)| Sample {
                timestamp: slot::history_key(&ts),
                value,
            })
            .collect());
    }

    let Ok(weekday) = week::parse_weekday(selector) else {
        log::debug!("unknown day selector {selector:?}");
        return Ok(vec![]);
    };

    let profile = rollup::weekday_profile(store, weekday, lookback_weeks, now)?;

    Ok(profile
        .into_iter()
        .map(|(slot, avg)| Sample {
            timestamp: slot.to_string(),
            value: avg.value(),
        })
        .collect())
}
