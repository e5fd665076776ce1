//! Time utilities: Dhaka-local instants and the Friday→Thursday week rule.

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Asia::Dhaka;
use chrono_tz::Tz;

/// All reporting happens in Bangladesh time.
pub const BD_TZ: Tz = Dhaka;

/// Calendar date format used by the chat export and the ledger table.
pub const DATE_FORMAT: &str = "%m/%d/%y";
/// Clock time format used by the chat export and the ledger table.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Parse a ledger date string like "3/5/24". None on mismatch.
pub fn parse_ledger_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse a ledger time string like "9:00 PM". None on mismatch.
pub fn parse_ledger_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

/// Combine a row's date and time strings into a Dhaka instant.
/// None when either part fails to parse.
pub fn to_bd_datetime(date: &str, time: &str) -> Option<DateTime<Tz>> {
    let ndt = NaiveDateTime::new(parse_ledger_date(date)?, parse_ledger_time(time)?);
    BD_TZ.from_local_datetime(&ndt).single()
}

/// Current instant in Dhaka.
pub fn bd_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&BD_TZ)
}

/// The Friday→Thursday week containing `at`, as [start, end] in Dhaka
/// time: Friday 00:00:00.000000 through Thursday 23:59:59.999999.
pub fn week_range(at: DateTime<Tz>) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
    // Mon=0 .. Thu=3 .. Sun=6; how far forward the closing Thursday is.
    let to_thursday = (3 + 7 - at.weekday().num_days_from_monday() as i64) % 7;
    let end_date = at.date_naive() + Duration::days(to_thursday);

    let start = bd_local(end_date - Duration::days(6), NaiveTime::MIN)?;
    let end = start + Duration::days(7) - Duration::microseconds(1);
    Ok((start, end))
}

fn bd_local(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    BD_TZ
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {date} {time}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_digit_date_parts() {
        assert_eq!(
            parse_ledger_date("3/5/24"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_ledger_date("12/31/25"),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(parse_ledger_date("not a date"), None);
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(
            parse_ledger_time("9:00 PM"),
            NaiveTime::from_hms_opt(21, 0, 0)
        );
        assert_eq!(
            parse_ledger_time("12:15 AM"),
            NaiveTime::from_hms_opt(0, 15, 0)
        );
        assert_eq!(parse_ledger_time("25:00 PM"), None);
    }

    #[test]
    fn test_to_bd_datetime_carries_dhaka_offset() {
        let dt = to_bd_datetime("3/5/24", "9:00 PM").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-05T21:00:00+06:00");
    }

    #[test]
    fn test_to_bd_datetime_rejects_garbage() {
        assert!(to_bd_datetime("??", "9:00 PM").is_none());
        assert!(to_bd_datetime("3/5/24", "??").is_none());
    }

    #[test]
    fn test_week_of_a_friday_starts_that_day() {
        // 2024-03-08 was a Friday.
        let at = BD_TZ.with_ymd_and_hms(2024, 3, 8, 10, 0, 0).unwrap();
        let (start, end) = week_range(at).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-08T00:00:00+06:00");
        assert_eq!(end.to_rfc3339(), "2024-03-14T23:59:59.999999+06:00");
    }

    #[test]
    fn test_week_of_a_thursday_ends_that_day() {
        // 2024-03-07 was a Thursday; its week opened the prior Friday.
        let at = BD_TZ.with_ymd_and_hms(2024, 3, 7, 23, 0, 0).unwrap();
        let (start, end) = week_range(at).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+06:00");
        assert_eq!(end.to_rfc3339(), "2024-03-07T23:59:59.999999+06:00");
    }

    #[test]
    fn test_week_is_exactly_seven_days() {
        let at = BD_TZ.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let (start, end) = week_range(at).unwrap();
        assert_eq!(end - start, Duration::days(7) - Duration::microseconds(1));
        assert!(start <= at && at <= end);
    }
}
