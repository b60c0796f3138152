use std::collections::HashMap;

/// Decode raw file bytes as UTF-8, falling back to Latin-1 (each byte
/// maps to the same Unicode code point). The logger's export tool
/// writes ISO-8859-1 when column headers carry degree signs.
pub fn decode_bytes(content: Vec<u8>) -> String {
    String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect())
}

/// Guess the CSV delimiter by counting candidate separators over the
/// first lines. Ties go to the earlier candidate; a file with no
/// separator at all falls back to comma.
pub fn detect_delimiter(text: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
    let sample: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).take(20).collect();

    let mut best = b',';
    let mut best_count = 0usize;
    for &cand in &CANDIDATES {
        let count: usize = sample
            .iter()
            .map(|line| line.bytes().filter(|&b| b == cand).count())
            .sum();
        if count > best_count {
            best_count = count;
            best = cand;
        }
    }
    best
}

/// Detect the header row in decoded CSV text.
/// Returns the 0-based row index of the header row.
pub fn detect_csv_header(text: &str, delimiter: u8, max_lines: usize) -> Result<usize, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records().take(max_lines) {
        let Ok(record) = result else { continue };
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err("no rows found in file".to_string());
    }

    // Full-width rows dominate a log; narrower rows are preamble.
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for row in &rows {
        *counts.entry(row.len()).or_default() += 1;
    }
    let full_width = counts
        .into_iter()
        .max_by_key(|&(_, c)| c)
        .map(|(len, _)| len)
        .unwrap_or(0);

    // The header is the lowest full-width row that is all text with no
    // empty cells. Conditions rows under the header carry empty cells,
    // data rows carry numbers or dates, so both are passed over.
    for i in (0..rows.len()).rev() {
        let row = &rows[i];
        if row.len() != full_width {
            continue;
        }
        let header_like = row.iter().all(|cell| {
            let cell = cell.trim();
            !cell.is_empty() && cell.parse::<f64>().is_err() && !is_date_like(cell)
        });
        if header_like {
            return Ok(i);
        }
    }

    Ok(0)
}

/// Detect the header row index in an Excel sheet already read into
/// string rows.
pub fn detect_excel_header(rows: &[Vec<String>], max_rows: usize) -> usize {
    let scan = &rows[..rows.len().min(max_rows)];

    let used_cols = scan
        .iter()
        .map(|row| row.iter().filter(|c| !c.trim().is_empty()).count())
        .max()
        .unwrap_or(0);

    for i in (0..scan.len()).rev() {
        let row = &scan[i];
        let non_empty = row.iter().filter(|c| !c.trim().is_empty()).count();
        if non_empty < used_cols {
            continue;
        }

        let all_strings = row.iter().filter(|c| !c.trim().is_empty()).all(|val| {
            let val = val.trim();
            val.parse::<f64>().is_err() && !is_date_like(val)
        });

        if all_strings {
            return i;
        }
    }

    0
}

/// Markers the logger writes into the free-text test-conditions row
/// that some exports carry directly under the header.
const CONDITIONS_MARKERS: [&str; 4] = ["load", "aux", "setpoint", "PdT"];

/// True when the first data row is a test-conditions description
/// (e.g. `full load | 7/45 setpoint`) rather than samples.
pub fn is_conditions_row(row: &[String]) -> bool {
    row.iter().any(|cell| {
        cell.contains('|') || CONDITIONS_MARKERS.iter().any(|m| cell.contains(m))
    })
}

pub(crate) fn is_date_like(s: &str) -> bool {
    let has_separators = s.contains('/') || s.contains(':');
    let has_date_words = s.to_lowercase().contains("am") || s.to_lowercase().contains("pm");

    if !has_separators && !has_date_words {
        return false;
    }

    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d",
        "%m/%d/%Y",
    ];
    FORMATS.iter().any(|fmt| {
        chrono::NaiveDateTime::parse_from_str(s, fmt).is_ok()
            || chrono::NaiveDate::parse_from_str(s, fmt).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_bytes_decode_without_loss() {
        // 0xB0 is the degree sign in ISO-8859-1 and invalid UTF-8.
        let bytes = vec![b'T', b'1', b' ', 0xB0, b'C'];
        assert_eq!(decode_bytes(bytes), "T1 \u{00B0}C");
    }

    #[test]
    fn utf8_passes_through_unchanged() {
        let text = "t,T1 (\u{00B0}C)\n0,21.5\n";
        assert_eq!(decode_bytes(text.as_bytes().to_vec()), text);
    }

    #[test]
    fn delimiter_detection_prefers_the_dominant_separator() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(detect_delimiter("a\tb\n1\t2\n"), b'\t');
        assert_eq!(detect_delimiter("single column\n1\n2\n"), b',');
    }

    #[test]
    fn header_detection_skips_preamble_lines() {
        let text = "Logger export\nDevice 7\nt,T1,pin\n0,21.5,801.2\n1,21.6,801.4\n";
        assert_eq!(detect_csv_header(text, b',', 50).unwrap(), 2);
    }

    #[test]
    fn header_detection_on_clean_file_is_row_zero() {
        let text = "t,T1,pin\n0,21.5,801.2\n";
        assert_eq!(detect_csv_header(text, b',', 50).unwrap(), 0);
    }

    #[test]
    fn conditions_row_is_recognized() {
        let row = vec!["full load | 7/45 setpoint".to_string(), String::new()];
        assert!(is_conditions_row(&row));
        let row = vec!["aux heater on".to_string()];
        assert!(is_conditions_row(&row));
        let row = vec!["PdT 5K".to_string()];
        assert!(is_conditions_row(&row));
        let numeric = vec!["0".to_string(), "21.5".to_string()];
        assert!(!is_conditions_row(&numeric));
    }

    #[test]
    fn excel_header_detection_scans_bottom_up() {
        let rows = vec![
            vec!["export".to_string(), String::new()],
            vec!["t".to_string(), "T1".to_string()],
            vec!["0".to_string(), "21.5".to_string()],
        ];
        assert_eq!(detect_excel_header(&rows, 50), 1);
    }
}
