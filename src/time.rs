use chrono::{DateTime, Utc};

/// Returns the current instant in UTC.
///
/// Every timestamp, day key and slot key in the crate is derived from UTC,
/// so recurring slots are unaffected by DST transitions.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
