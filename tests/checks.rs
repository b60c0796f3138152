use std::path::{Path, PathBuf};
use std::sync::Arc;

use thermolog::{validate, LogFile, NameTable};

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
fn steady_heating_run_passes_humidity_and_cycling() {
    let warnings = validate(&open("heating_full_load.csv"));
    assert!(warnings.iter().all(|w| w.check != "humidity"));
    assert!(warnings.iter().all(|w| w.check != "cycling"));
}

#[test]
fn coverage_lists_channels_the_file_cannot_produce() {
    let warnings = validate(&open("heating_full_load.csv"));
    let coverage: Vec<_> = warnings.iter().filter(|w| w.check == "coverage").collect();
    assert_eq!(coverage.len(), 1);
    assert!(coverage[0].message.contains("Tamb"));
    // No line-loss rule in forward flow, so it counts as unobtainable.
    assert!(coverage[0].message.contains("Qloss_ev"));
    assert!(!coverage[0].message.contains("Qcond"));
}

#[test]
fn cycling_and_humidity_fire_on_an_unstable_run() {
    let warnings = validate(&open("unstable_cycling.csv"));

    let humidity: Vec<_> = warnings.iter().filter(|w| w.check == "humidity").collect();
    assert_eq!(humidity.len(), 1);
    assert!(humidity[0].message.contains("100.0% of the time"));
    assert_eq!(humidity[0].involved, Some("(wr ws)"));

    let cycling: Vec<_> = warnings.iter().filter(|w| w.check == "cycling").collect();
    assert_eq!(cycling.len(), 1);
    assert_eq!(cycling[0].message, "There appears to be cycling.");
    assert_eq!(cycling[0].involved, Some("f"));
}

#[test]
fn missing_air_channels_downgrade_the_humidity_check() {
    // The defrost export has no air-side sensors at all.
    let warnings = validate(&open("defrost_reversed.csv"));
    let humidity: Vec<_> = warnings.iter().filter(|w| w.check == "humidity").collect();
    assert_eq!(humidity.len(), 1);
    assert!(humidity[0].message.starts_with("check skipped"));
    assert_eq!(humidity[0].involved, None);
    // Eight samples are below the cycling window; the check stays
    // silent rather than skipped.
    assert!(warnings.iter().all(|w| w.check != "cycling"));
}
