// Launch line: the synthetic first line of every captured stream

use chrono::{DateTime, TimeZone};

use super::constants::LAUNCH_TIMESTAMP_FORMAT;

/// Format `[YYYY-MM-DD HH:MM:SS] Running subcommand\n` for `at`
pub fn format_launch_line<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "[{}] Running subcommand\n",
        at.format(LAUNCH_TIMESTAMP_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_launch_line_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(
            format_launch_line(&at),
            "[2024-03-07 09:05:02] Running subcommand\n"
        );
    }

    #[test]
    fn test_launch_line_uses_24h_clock_in_given_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = zone.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            format_launch_line(&at),
            "[2024-12-31 23:59:59] Running subcommand\n"
        );
    }
}
