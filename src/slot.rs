use crate::week;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};

/// Width of a recurring weekly slot, in minutes.
pub const SLOT_RESOLUTION_MINUTES: u32 = 15;

const HISTORY_KEY_FORMAT: &str = "%Y/%m/%d %H:%M";
const DAY_KEY_FORMAT: &str = "%Y/%m/%d";

/// A recurring weekly time bucket (weekday plus time-of-day truncated to
/// [`SLOT_RESOLUTION_MINUTES`]), independent of calendar date.
///
/// Instants exactly 7 days apart project onto the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotKey {
    weekday: Weekday,
    hour: u8,
    minute: u8,
}

impl SlotKey {
    /// Projects an absolute instant (UTC) onto its recurring weekly slot.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn at(instant: &DateTime<Utc>) -> Self {
        let minute = instant.minute() - instant.minute() % SLOT_RESOLUTION_MINUTES;

        Self {
            weekday: instant.weekday(),
            hour: instant.hour() as u8,
            minute: minute as u8,
        }
    }

    /// The weekday this slot recurs on.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {:02}:{:02}",
            week::weekday_name(self.weekday),
            self.hour,
            self.minute
        )
    }
}

impl Ord for SlotKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.weekday.num_days_from_monday(), self.hour, self.minute).cmp(&(
            other.weekday.num_days_from_monday(),
            other.hour,
            other.minute,
        ))
    }
}

impl PartialOrd for SlotKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Formats a calendar date as the key prefix shared by every history entry
/// recorded on that day.
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Formats an instant (UTC) as a minute-resolution history key.
///
/// Lexicographic order of these keys equals chronological order, so the
/// history table can be scanned by day prefix.
#[must_use]
pub fn history_key(instant: &DateTime<Utc>) -> String {
    instant.format(HISTORY_KEY_FORMAT).to_string()
}

/// Parses a history key back into the instant it was formatted from.
#[must_use]
pub fn parse_history_key(key: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(key, HISTORY_KEY_FORMAT)
        .ok()
        .map(|ndt| ndt.and_utc())
}
