//! Arrival-time computation for directions queries.
//!
//! Queries are always anchored to a *future* arrival time: starting
//! from tomorrow avoids same-day edge cases where the configured time
//! has already passed.

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone, Weekday};

use super::DayKind;

/// Parse an `hh:mm` config string, defaulting malformed input to 09:00.
pub fn parse_time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M")
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default())
}

/// Next occurrence of `time` on a day matching `day`, starting from
/// tomorrow relative to `now`.
///
/// Weekday advances until Mon–Fri; weekend advances to the next
/// Saturday; any takes tomorrow verbatim. A date whose local time is
/// skipped by a DST transition is passed over.
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, day: DayKind, time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive() + Days::new(1);

    loop {
        let day_matches = match day {
            DayKind::Weekday => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            DayKind::Weekend => date.weekday() == Weekday::Sat,
            DayKind::Any => true,
        };

        if day_matches {
            if let Some(dt) = date.and_time(time).and_local_timezone(tz.clone()).earliest() {
                return dt;
            }
        }

        date = date + Days::new(1);
    }
}
