use std::path::Path;

use crate::data::datetime::{detect_date_format, parse_to_timestamp};
use crate::data::parser;
use crate::error::{Result, ThermoLogError};

/// Raw content of a loaded log file: header names and column-major
/// string data, before any identifier mapping or numeric conversion.
#[derive(Debug)]
pub struct LoadedData {
    pub columns: Vec<String>,
    /// column-major: column_data[col_idx][row_idx]
    pub column_data: Vec<Vec<String>>,
    pub row_count: usize,
}

/// Load a CSV or Excel log and return header names plus raw string
/// columns. A free-text test-conditions row under the header is
/// dropped here.
pub fn load_file(path: &Path) -> Result<LoadedData> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "xls" | "xlsx" => load_excel(path),
        _ => Err(ThermoLogError::file_read(
            path,
            format!("unsupported file format: .{ext}"),
        )),
    }
}

fn load_csv(path: &Path) -> Result<LoadedData> {
    let content =
        std::fs::read(path).map_err(|e| ThermoLogError::file_read(path, e.to_string()))?;
    let text = parser::decode_bytes(content);

    let delimiter = parser::detect_delimiter(&text);
    let header_row = parser::detect_csv_header(&text, delimiter, 50)
        .map_err(|msg| ThermoLogError::file_read(path, msg))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => all_rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(_) => continue,
        }
    }

    if all_rows.is_empty() || header_row >= all_rows.len() {
        return Err(ThermoLogError::file_read(
            path,
            "no data found after header detection",
        ));
    }

    let columns: Vec<String> = all_rows[header_row]
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let data_rows = &all_rows[header_row + 1..];
    Ok(columnize(columns, data_rows))
}

fn load_excel(path: &Path) -> Result<LoadedData> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| ThermoLogError::file_read(path, e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or_else(|| ThermoLogError::file_read(path, "no sheets found"))?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ThermoLogError::file_read(path, e.to_string()))?;

    let all_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => dt.to_string(),
                    Data::DateTimeIso(s) => s.clone(),
                    Data::DurationIso(s) => s.clone(),
                    Data::Error(e) => format!("{e:?}"),
                })
                .collect()
        })
        .collect();

    if all_rows.is_empty() {
        return Err(ThermoLogError::file_read(path, "no data in sheet"));
    }

    let header_row = parser::detect_excel_header(&all_rows, 50);
    if header_row >= all_rows.len() {
        return Err(ThermoLogError::file_read(
            path,
            "no data found after header detection",
        ));
    }

    let columns: Vec<String> = all_rows[header_row]
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let data_rows = &all_rows[header_row + 1..];
    Ok(columnize(columns, data_rows))
}

/// Row-major strings to column-major, padding short rows and dropping
/// a leading test-conditions row.
fn columnize(columns: Vec<String>, data_rows: &[Vec<String>]) -> LoadedData {
    let data_rows = match data_rows.first() {
        Some(first) if parser::is_conditions_row(first) => &data_rows[1..],
        _ => data_rows,
    };

    let num_cols = columns.len();
    let mut column_data: Vec<Vec<String>> = vec![Vec::new(); num_cols];
    let row_count = data_rows.len();

    for row in data_rows {
        for (col_idx, col_data) in column_data.iter_mut().enumerate() {
            col_data.push(row.get(col_idx).cloned().unwrap_or_default());
        }
    }

    LoadedData {
        columns,
        column_data,
        row_count,
    }
}

/// Parse a string column into f64 samples, NaN for anything unparseable.
/// Also returns the fraction of entries that produced a finite value.
pub fn column_to_f64(data: &[String]) -> (Vec<f64>, f64) {
    let mut values = Vec::with_capacity(data.len());
    let mut valid = 0usize;
    for s in data {
        let v = s.trim().parse::<f64>().unwrap_or(f64::NAN);
        if v.is_finite() {
            valid += 1;
        }
        values.push(v);
    }
    (values, valid_fraction(valid, data.len()))
}

/// Interpret a string column as wall-clock datetimes, yielding epoch
/// seconds. None unless a detected format parses most of the entries.
pub fn column_to_timestamps(data: &[String]) -> Option<(Vec<f64>, f64)> {
    let format = detect_date_format(data)?;

    let mut valid = 0usize;
    let timestamps: Vec<f64> = data
        .iter()
        .map(|s| match parse_to_timestamp(s.trim(), format) {
            Some(ts) => {
                valid += 1;
                ts
            }
            None => f64::NAN,
        })
        .collect();

    let frac = valid_fraction(valid, data.len());
    if frac > 0.7 {
        Some((timestamps, frac))
    } else {
        None
    }
}

fn valid_fraction(valid: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        valid as f64 / total as f64
    }
}
