use chrono::NaiveDateTime;

/// Sentinel returned by `detect_date_format` for RFC 3339 / ISO 8601
/// timestamps with timezone (e.g. `2019-03-12T09:26:28.987Z`).
pub const RFC3339_FORMAT: &str = "__rfc3339__";

/// Formats the logger's export tools have been seen to write.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y",
];

/// Detect the most likely date format from a sample of string values.
/// Returns the format with the highest parse success rate, or
/// `RFC3339_FORMAT` for timezone-carrying ISO timestamps.
pub fn detect_date_format(values: &[String]) -> Option<&'static str> {
    let sample: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();

    if sample.is_empty() {
        return None;
    }

    let mut best_format: Option<&'static str> = None;
    let mut best_score =
        parse_fraction(&sample, |s| chrono::DateTime::parse_from_rfc3339(s).is_ok());
    if best_score > 0.0 {
        best_format = Some(RFC3339_FORMAT);
    }

    // Strictly greater: on a tie the earlier format stays, so the
    // optional-fraction variants listed first take precedence.
    for &fmt in DATE_FORMATS {
        let score = parse_fraction(&sample, |s| {
            NaiveDateTime::parse_from_str(s, fmt).is_ok()
                || chrono::NaiveDate::parse_from_str(s, fmt).is_ok()
        });
        if score > best_score {
            best_score = score;
            best_format = Some(fmt);
        }
    }

    if best_score > 0.0 {
        best_format
    } else {
        None
    }
}

fn parse_fraction(sample: &[&str], parses: impl Fn(&str) -> bool) -> f64 {
    let valid = sample.iter().copied().filter(|&s| parses(s)).count();
    valid as f64 / sample.len() as f64
}

/// Parse one value to Unix seconds (with subsecond precision) using a
/// format from `detect_date_format`.
pub fn parse_to_timestamp(value: &str, format: &str) -> Option<f64> {
    if format == RFC3339_FORMAT {
        let dt = chrono::DateTime::parse_from_rfc3339(value).ok()?;
        return Some(dt.timestamp_millis() as f64 / 1000.0);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt.and_utc().timestamp_millis() as f64 / 1000.0);
    }
    let date = chrono::NaiveDate::parse_from_str(value, format).ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp() as f64)
}

/// Format Unix seconds for axis ticks and the cursor readout. Shows
/// milliseconds only when the value has a fractional part.
pub fn format_timestamp(ts: f64) -> String {
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1_000_000_000.0) as u32;
    let Some(dt) = chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nanos) else {
        return format!("{ts:.3}");
    };
    let pattern = if nanos == 0 {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d %H:%M:%S%.3f"
    };
    dt.format(pattern).to_string()
}
