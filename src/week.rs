use crate::Error;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Looks up a weekday from its lowercase English name.
///
/// The seven names are the only recognized day selectors besides `today`;
/// matching is case-insensitive so that `Monday` and `monday` resolve to
/// the same day.
///
/// # Errors
///
/// Returns [`Error::InvalidWeekday`] for anything else.
pub fn parse_weekday(name: &str) -> crate::Result<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(Error::InvalidWeekday(name.to_string())),
    }
}

/// Full English name of a weekday, as used in slot keys.
#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Date of the most recent occurrence of `weekday` strictly before `today`.
///
/// If `today` itself falls on `weekday`, the occurrence one week earlier is
/// returned, never the same day.
#[must_use]
pub fn most_recent_past_occurrence(weekday: Weekday, today: NaiveDate) -> NaiveDate {
    let gap =
        (today.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    let gap = if gap == 0 { 7 } else { gap };
    today - Duration::days(i64::from(gap))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test_log::test]
    fn parse_known_weekdays() {
        assert_eq!(Weekday::Mon, parse_weekday("monday").unwrap());
        assert_eq!(Weekday::Sun, parse_weekday("sunday").unwrap());
        assert_eq!(Weekday::Wed, parse_weekday("Wednesday").unwrap());
    }

    #[test_log::test]
    fn parse_unknown_weekday() {
        assert!(matches!(
            parse_weekday("caturday"),
            Err(Error::InvalidWeekday(_))
        ));
        assert!(matches!(parse_weekday("today"), Err(Error::InvalidWeekday(_))));
        assert!(matches!(parse_weekday(""), Err(Error::InvalidWeekday(_))));
    }

    #[test_log::test]
    fn past_occurrence_earlier_in_week() {
        // 2024-06-12 was a Wednesday
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        assert_eq!(
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            most_recent_past_occurrence(Weekday::Mon, today),
        );
    }

    #[test_log::test]
    fn past_occurrence_later_in_week() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        assert_eq!(
            NaiveDate::from_ymd_opt(2024, 6, 6).unwrap(),
            most_recent_past_occurrence(Weekday::Thu, today),
        );
    }

    #[test_log::test]
    fn past_occurrence_same_weekday_is_a_week_back() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        assert_eq!(
            NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            most_recent_past_occurrence(Weekday::Wed, today),
        );
    }

    #[test_log::test]
    fn past_occurrence_is_strictly_before_and_at_most_a_week() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        for offset in 0..14 {
            let today = start + Duration::days(offset);

            for weekday in [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ] {
                let date = most_recent_past_occurrence(weekday, today);

                assert_eq!(weekday, date.weekday());
                assert!(date < today);
                assert!(today - date <= Duration::days(7));
            }
        }
    }
}
