//! Text parsers for user-supplied dates, durations and scores, plus the
//! canonical duration text used in the ledger file.
use chrono::NaiveDate;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

/// A rejected piece of user input. The message is meant to be shown as-is
/// before the same question is asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(String);

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone; the default for an empty date answer.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date. Empty input means `today`.
pub fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ParseError::new(format!(
            "invalid date {trimmed:?}: expected YYYY-MM-DD (or leave empty for today)"
        ))
    })
}

/// Parse a run time typed by a user.
///
/// Accepted forms, first match wins: `H:MM:SS`, `M:SS`, `1h30m15s` (any
/// subset, in that order) and bare seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, ParseError> {
    let trimmed = raw.trim();
    let invalid = || {
        ParseError::new(format!(
            "invalid time {trimmed:?}: expected H:MM:SS, M:SS, a combination like 1h30m15s, or whole seconds"
        ))
    };

    read_duration(trimmed).ok_or_else(invalid)
}

/// `None` when no form matches or the value does not fit in a `Duration`.
fn read_duration(trimmed: &str) -> Option<Duration> {
    let hms = Regex::new(r"^(\d{1,2}):([0-5]\d):([0-5]\d)$").expect("regex for H:MM:SS");
    if let Some(cap) = hms.captures(trimmed) {
        return from_parts(number(&cap[1])?, number(&cap[2])?, number(&cap[3])?);
    }

    let ms = Regex::new(r"^(\d{1,3}):([0-5]\d)$").expect("regex for M:SS");
    if let Some(cap) = ms.captures(trimmed) {
        return from_parts(0, number(&cap[1])?, number(&cap[2])?);
    }

    let compound = Regex::new(r"(?i)^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?\s*(?:(\d+)\s*s)?$")
        .expect("regex for compound durations");
    if let Some(cap) = compound.captures(trimmed) {
        let parts = [cap.get(1), cap.get(2), cap.get(3)];
        if parts.iter().any(Option::is_some) {
            let [hours, minutes, seconds] =
                parts.map(|part| part.map_or(Some(0), |m| number(m.as_str())));
            return from_parts(hours?, minutes?, seconds?);
        }
    }

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return number(trimmed).map(Duration::from_secs);
    }
    None
}

/// Parse a score. Anything that reads as a finite float is accepted.
pub fn parse_score(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(ParseError::new(format!(
            "invalid score {trimmed:?}: must be a finite number"
        ))),
        Err(_) => Err(ParseError::new(format!(
            "invalid score {trimmed:?}: expected a number such as 1200 or 98.5"
        ))),
    }
}

/// Parse the ISO-8601 duration text stored in a ledger (`PT1H2M3.5S`,
/// `P1DT2H`). Only day, hour, minute and second designators are supported.
pub fn parse_iso_duration(raw: &str) -> Option<Duration> {
    let iso = Regex::new(
        r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.(\d{1,9}))?S)?)?$",
    )
    .expect("regex for ISO-8601 durations");
    let trimmed = raw.trim();
    let cap = iso.captures(trimmed)?;
    if cap.iter().skip(1).all(|group| group.is_none()) || trimmed.ends_with('T') {
        return None;
    }
    let field = |index: usize| -> Option<u64> {
        match cap.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let secs = field(1)?
        .checked_mul(86_400)?
        .checked_add(field(2)?.checked_mul(3_600)?)?
        .checked_add(field(3)?.checked_mul(60)?)?
        .checked_add(field(4)?)?;
    let nanos = match cap.get(5) {
        Some(frac) => format!("{:0<9}", frac.as_str()).parse::<u32>().ok()?,
        None => 0,
    };
    Some(Duration::new(secs, nanos))
}

/// Canonical ledger text for a duration: `PT2H30M`, `PT45.25S`, `PT0S`.
pub fn format_iso_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3_600, (total % 3_600) / 60, total % 60);
    let nanos = duration.subsec_nanos();

    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 || nanos > 0 {
        out.push_str(&seconds.to_string());
        if nanos > 0 {
            let frac = format!("{nanos:09}");
            out.push('.');
            out.push_str(frac.trim_end_matches('0'));
        }
        out.push('S');
    }
    if out == "PT" {
        out.push_str("0S");
    }
    out
}

/// Clock-style rendering for reports: `1:02:03`, `4:05`, `0:07.250`.
pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3_600, (total % 3_600) / 60, total % 60);
    let mut out = if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    };
    let millis = duration.subsec_millis();
    if millis > 0 {
        out.push_str(&format!(".{millis:03}"));
    }
    out
}

fn number(digits: &str) -> Option<u64> {
    digits.parse().ok()
}

fn from_parts(hours: u64, minutes: u64, seconds: u64) -> Option<Duration> {
    let secs = hours
        .checked_mul(3_600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(hours: u64, minutes: u64, seconds: u64) -> Duration {
        Duration::from_secs(hours * 3_600 + minutes * 60 + seconds)
    }

    #[test]
    fn parses_accepted_duration_forms() {
        let cases = [
            ("0:00:01", hms(0, 0, 1)),
            ("23:59:59", hms(23, 59, 59)),
            ("0:30", hms(0, 0, 30)),
            ("120:00", hms(0, 120, 0)),
            ("1h", hms(1, 0, 0)),
            ("30m", hms(0, 30, 0)),
            ("45s", hms(0, 0, 45)),
            ("2h30m", hms(2, 30, 0)),
            ("1h 2m 3s", hms(1, 2, 3)),
            ("0", hms(0, 0, 0)),
            ("5025", hms(1, 23, 45)),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_duration(input), Ok(expected), "input {input:?}");
        }
    }

    #[test]
    fn rejects_unrecognized_durations() {
        for input in [
            "invalid",
            "",
            "1x2y3z",
            "1:60",
            "100:00:00",
            "30m1h",
            "-5",
            "9999999999999999h",
            "99999999999999999999",
            "18446744073709551615m",
        ] {
            let err = parse_duration(input).expect_err(input);
            assert!(err.to_string().contains("H:MM:SS"), "message for {input:?}: {err}");
        }
    }

    #[test]
    fn empty_date_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
        assert_eq!(parse_date("", today), Ok(today));
        assert_eq!(parse_date("  ", today), Ok(today));
        assert_eq!(
            parse_date("2023-11-05", today),
            Ok(NaiveDate::from_ymd_opt(2023, 11, 5).expect("valid date"))
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        for input in ["05/11/2023", "2023-13-01", "yesterday"] {
            let err = parse_date(input, today).expect_err(input);
            assert!(err.to_string().contains("YYYY-MM-DD"));
        }
    }

    #[test]
    fn scores_must_be_finite_numbers() {
        assert_eq!(parse_score("1200"), Ok(1200.0));
        assert_eq!(parse_score(" -3.5 "), Ok(-3.5));
        assert!(parse_score("lots").is_err());
        assert!(parse_score("nan").is_err());
        assert!(parse_score("inf").is_err());
    }

    #[test]
    fn iso_duration_text_is_canonical() {
        assert_eq!(format_iso_duration(hms(2, 30, 0)), "PT2H30M");
        assert_eq!(format_iso_duration(hms(0, 0, 0)), "PT0S");
        assert_eq!(format_iso_duration(hms(26, 0, 5)), "PT26H5S");
        assert_eq!(
            format_iso_duration(Duration::from_millis(45_250)),
            "PT45.25S"
        );
        for duration in [hms(1, 2, 3), Duration::new(7, 123_456_789), hms(0, 0, 0)] {
            assert_eq!(
                parse_iso_duration(&format_iso_duration(duration)),
                Some(duration)
            );
        }
    }

    #[test]
    fn reads_iso_durations_with_days() {
        assert_eq!(parse_iso_duration("P1DT2H"), Some(hms(26, 0, 0)));
        assert_eq!(parse_iso_duration("P2D"), Some(hms(48, 0, 0)));
        assert_eq!(parse_iso_duration("P"), None);
        assert_eq!(parse_iso_duration("PT"), None);
        assert_eq!(parse_iso_duration("P1DT"), None);
        assert_eq!(parse_iso_duration("1:00:00"), None);
    }

    #[test]
    fn clock_format_drops_empty_hours() {
        assert_eq!(format_clock(hms(1, 2, 3)), "1:02:03");
        assert_eq!(format_clock(hms(0, 4, 5)), "4:05");
        assert_eq!(format_clock(Duration::from_millis(7_250)), "0:07.250");
    }
}
