use std::io;
use std::path::Path;

use crate::data::datetime;
use crate::plot::figure::Figure;

/// Write a figure's resolved series as one CSV table: the x column
/// first, then one column per series, headers `symbol (unit)`.
/// Non-finite samples become empty cells; epoch x values are written
/// as wall-clock timestamps.
pub fn write_figure_csv(figure: &Figure, path: &Path) -> io::Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(into_io)?;

    let mut header = vec![figure.x_label.clone()];
    for subplot in &figure.subplots {
        for series in &subplot.series {
            header.push(format!("{} ({})", series.symbol, series.unit));
        }
    }
    writer.write_record(&header).map_err(into_io)?;

    for (i, &x) in figure.x.iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(if figure.x_is_epoch {
            datetime::format_timestamp(x)
        } else {
            format!("{x}")
        });
        for subplot in &figure.subplots {
            for series in &subplot.series {
                let v = series.values.get(i).copied().unwrap_or(f64::NAN);
                record.push(if v.is_finite() {
                    format!("{v}")
                } else {
                    String::new()
                });
            }
        }
        writer.write_record(&record).map_err(into_io)?;
    }
    writer.flush()
}

fn into_io(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::log::LogFile;
    use crate::data::name_table::NameTable;
    use std::sync::Arc;

    #[test]
    fn exported_csv_has_header_and_blank_cells_for_nan() {
        let table = Arc::new(NameTable::default_table().unwrap());
        let log = LogFile::from_columns(
            table,
            vec![("T1", vec![10.0, f64::NAN, 12.0])],
        );
        let figure = Figure::build(&log, "T1").unwrap();

        let path = std::env::temp_dir().join("thermolog_export_test.csv");
        write_figure_csv(&figure, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "sample,T_1 (\u{00B0}C)");
        assert_eq!(lines[1], "0,10");
        assert_eq!(lines[2], "1,");
        assert_eq!(lines[3], "2,12");
    }
}
