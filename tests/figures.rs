use std::path::{Path, PathBuf};
use std::sync::Arc;

use thermolog::plot::export::write_figure_csv;
use thermolog::{FileComparison, Figure, LogFile, NameTable};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn open(name: &str) -> LogFile {
    let table = Arc::new(NameTable::default_table().unwrap());
    LogFile::open(&fixture(name), table).unwrap()
}

#[test]
fn grouped_request_resolves_axes_and_units() {
    let log = open("heating_full_load.csv");
    let fig = Figure::build(&log, "(T1 T2) pin:MPa f").unwrap();
    assert_eq!(fig.subplots.len(), 3);
    assert_eq!(fig.subplots[0].series.len(), 2);
    assert_eq!(fig.subplots[0].y_label, "T (\u{00B0}C)");
    assert_eq!(fig.subplots[1].y_label, "p_in (MPa)");
    assert_eq!(fig.subplots[2].y_label, "f (Hz)");
    assert_eq!(fig.x_label, "t (s)");
    assert!(!fig.x_is_epoch);

    let pin = &fig.subplots[1].series[0];
    assert!((pin.values[5] - 0.9339).abs() < 1e-9);
}

#[test]
fn all_groups_channels_by_property_category() {
    let log = open("heating_full_load.csv");
    let fig = Figure::build(&log, "all").unwrap();
    // Temperatures, humidities (relative and absolute), pressures,
    // flow, direction, frequency, electrical power, heat flows and
    // compressor work.
    assert_eq!(fig.subplots.len(), 10);
    assert_eq!(fig.subplots[0].series.len(), 7);
    assert_eq!(fig.subplots[0].y_label, "T (\u{00B0}C)");
    // Derived Pel lands on the phase-power axis in kW next to the W
    // channels, which the figure flags.
    assert_eq!(fig.warnings.len(), 1);
    assert!(fig.warnings[0].contains("different units"));
}

#[test]
fn allsplit_gives_every_channel_its_own_axis() {
    let log = open("defrost_reversed.csv");
    let merged = Figure::build(&log, "all").unwrap();
    let split = Figure::build(&log, "allsplit").unwrap();
    let merged_series: usize = merged.subplots.iter().map(|s| s.series.len()).sum();
    assert_eq!(split.subplots.len(), merged_series);
    assert!(split.subplots.iter().all(|s| s.series.len() == 1));
}

#[test]
fn comparison_draws_one_panel_per_file() {
    let table = Arc::new(NameTable::default_table().unwrap());
    let heating = LogFile::open(&fixture("heating_full_load.csv"), Arc::clone(&table)).unwrap();
    let defrost = LogFile::open(&fixture("defrost_reversed.csv"), Arc::clone(&table)).unwrap();

    let cmp = FileComparison::build(&[&heating, &defrost], "T1").unwrap();
    assert_eq!(cmp.title, "suction line temperature");
    assert_eq!(cmp.y_label, "T_1 (\u{00B0}C)");
    assert_eq!((cmp.cols, cmp.rows), (1, 2));
    assert_eq!(cmp.panels[0].title, "heating_full_load");
    assert_eq!(cmp.panels[1].title, "defrost_reversed");
    // Each panel keeps its own time base.
    assert!(!cmp.panels[0].x_is_epoch);
    assert!(cmp.panels[1].x_is_epoch);
}

#[test]
fn comparison_fails_when_one_file_lacks_the_channel() {
    let table = Arc::new(NameTable::default_table().unwrap());
    let heating = LogFile::open(&fixture("heating_full_load.csv"), Arc::clone(&table)).unwrap();
    let defrost = LogFile::open(&fixture("defrost_reversed.csv"), Arc::clone(&table)).unwrap();
    // Supply air temperature is only logged on the heating rig.
    assert!(FileComparison::build(&[&heating, &defrost], "Ts").is_err());
}

#[test]
fn exported_csv_keeps_headers_and_sample_rows() {
    let log = open("heating_full_load.csv");
    let fig = Figure::build(&log, "(T1 T2)").unwrap();
    let path = std::env::temp_dir().join("thermolog_heating_export.csv");
    write_figure_csv(&fig, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "t (s),T_1 (\u{00B0}C),T_2 (\u{00B0}C)");
    assert_eq!(lines[1], "0,18.2,19");
}

#[test]
fn epoch_x_values_export_as_wall_clock_timestamps() {
    let log = open("defrost_reversed.csv");
    let fig = Figure::build(&log, "T1").unwrap();
    let path = std::env::temp_dir().join("thermolog_defrost_export.csv");
    write_figure_csv(&fig, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "t,T_1 (\u{00B0}C)");
    assert_eq!(lines[1], "2023-01-12 06:30:00,4.1");
}
