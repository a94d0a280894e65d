use chrono::{DateTime, Datelike, Duration, Local, Utc};
use chrono_humanize::HumanTime;

/// Format a timestamp for feeds and chat, relative when recent.
/// - <1h: humanized ("now", "12 minutes ago")
/// - Today: "9:39 PM"
/// - Yesterday: "Yesterday, 9:39 PM"
/// - Older: "6/16/25, 8:30 AM"
pub fn format_timestamp(ts: DateTime<Utc>, now: DateTime<Local>) -> String {
    let local = ts.with_timezone(&Local);
    let elapsed = now.signed_duration_since(local);
    if elapsed < Duration::hours(1) && elapsed >= Duration::zero() {
        HumanTime::from(-elapsed).to_string()
    } else if local.date_naive() == now.date_naive() {
        local.format("%-I:%M %p").to_string()
    } else if local.date_naive() == (now - Duration::days(1)).date_naive() {
        format!("Yesterday, {}", local.format("%-I:%M %p"))
    } else {
        local.format("%-m/%-d/%y, %-I:%M %p").to_string()
    }
}

/// Short form for list rows: "now", "5m", "3h", "2d".
pub fn short_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    if elapsed < Duration::minutes(1) {
        "now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h", elapsed.num_hours())
    } else {
        format!("{}d", elapsed.num_days())
    }
}

/// Deadline label for bounties, e.g. "in 3 days" or "2 hours ago".
pub fn format_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    HumanTime::from(deadline.signed_duration_since(now)).to_string()
}

/// Format a date for a date delimiter (e.g., "June 16th, 2025")
pub fn format_date_delimiter(ts: DateTime<Utc>) -> String {
    let dt = ts.with_timezone(&Local);
    let day = dt.day();
    let suffix = match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", dt.format("%B"), day, suffix, dt.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn short_form_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap();
        assert_eq!(short_ago(now - Duration::seconds(20), now), "now");
        assert_eq!(short_ago(now - Duration::minutes(5), now), "5m");
        assert_eq!(short_ago(now - Duration::hours(3), now), "3h");
        assert_eq!(short_ago(now - Duration::days(2), now), "2d");
    }

    #[test]
    fn recent_timestamps_are_humanized() {
        let now = Local::now();
        let ts = (now - Duration::minutes(10)).with_timezone(&Utc);
        assert!(format_timestamp(ts, now).contains("ago"));
    }

    #[test]
    fn old_timestamps_show_the_date() {
        let now = Local::now();
        let ts = (now - Duration::days(40)).with_timezone(&Utc);
        assert!(format_timestamp(ts, now).contains('/'));
    }

    #[test]
    fn date_delimiter_suffixes() {
        let ts = Local.with_ymd_and_hms(2025, 6, 22, 12, 0, 0).unwrap().with_timezone(&Utc);
        assert_eq!(format_date_delimiter(ts), "June 22nd, 2025");
    }

    #[test]
    fn deadlines_read_naturally() {
        let now = Utc::now();
        assert!(format_deadline(now + Duration::days(3), now).starts_with("in"));
        assert!(format_deadline(now - Duration::days(3), now).ends_with("ago"));
    }
}
