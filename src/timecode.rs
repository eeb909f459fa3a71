//! Clock-time parsing and LRC timestamp formatting.

/// Parses a TTML clock time (`HH:MM:SS` with an optional `.fff` fraction)
/// into seconds. A single trailing ASCII letter, as in a `t` unit suffix, is
/// stripped first. Malformed input collapses to 0 seconds; conversion is
/// best-effort per line and never negative.
pub fn parse_clock_time(raw: &str) -> f64 {
    try_parse_clock_time(raw).unwrap_or(0.0)
}

fn try_parse_clock_time(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_suffix(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed);

    let mut fields = trimmed.split(':');
    let (hours, minutes, seconds) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, digits)) => (whole, Some(digits)),
        None => (seconds, None),
    };
    let whole: u64 = whole.parse().ok()?;
    // The fraction field is decimal digits after the point: "5" means 0.5.
    let fraction = match fraction {
        Some(digits) => format!("0.{digits}").parse::<f64>().ok()?,
        None => 0.0,
    };

    Some((hours * 3600 + minutes * 60 + whole) as f64 + fraction)
}

/// Formats seconds as an LRC timestamp `[MM:SS.CC]`. Minutes are not capped
/// at 59 and simply grow; centiseconds are truncated, not rounded.
pub fn format_lrc_timestamp(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds - seconds.floor()) * 100.0).floor() as u64;
    format!("[{minutes:02}:{secs:02}.{centis:02}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_clock_time() {
        assert_eq!(parse_clock_time("01:02:03.500"), 3723.5);
        assert_eq!(parse_clock_time("00:00:10"), 10.0);
        assert_eq!(parse_clock_time("10:00:00"), 36000.0);
    }

    #[test]
    fn test_fraction_is_decimal_digits() {
        // "5" is half a second, not five milliseconds.
        assert_eq!(parse_clock_time("00:00:01.5"), 1.5);
        assert_eq!(parse_clock_time("00:00:01.25"), 1.25);
        assert_eq!(parse_clock_time("00:00:01."), 1.0);
    }

    #[test]
    fn test_trailing_unit_suffix_stripped() {
        assert_eq!(parse_clock_time("00:00:10t"), 10.0);
        assert_eq!(parse_clock_time("00:00:02.5s"), 2.5);
    }

    #[test]
    fn test_malformed_input_collapses_to_zero() {
        assert_eq!(parse_clock_time(""), 0.0);
        assert_eq!(parse_clock_time("12:34"), 0.0);
        assert_eq!(parse_clock_time("aa:bb:cc"), 0.0);
        assert_eq!(parse_clock_time("1:2:3:4"), 0.0);
        assert_eq!(parse_clock_time("-1:00:00"), 0.0);
        assert_eq!(parse_clock_time("00:00:0x5"), 0.0);
    }

    #[test]
    fn test_format_pads_and_truncates() {
        assert_eq!(format_lrc_timestamp(0.0), "[00:00.00]");
        assert_eq!(format_lrc_timestamp(10.0), "[00:10.00]");
        assert_eq!(format_lrc_timestamp(9.25), "[00:09.25]");
        assert_eq!(format_lrc_timestamp(59.999), "[00:59.99]");
    }

    #[test]
    fn test_format_minutes_uncapped() {
        // 62 minutes, not 1 hour 2 minutes.
        assert_eq!(format_lrc_timestamp(3723.5), "[62:03.50]");
        assert_eq!(format_lrc_timestamp(3660.0), "[61:00.00]");
    }
}
