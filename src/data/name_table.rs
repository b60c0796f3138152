use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ThermoLogError};
use crate::quantity::{Property, Unit};

/// Table shipped with the application, covering the rig's logger
/// channels.
const DEFAULT_TABLE: &str = include_str!("name_table.toml");

/// One row of the name table: how a logged channel is identified,
/// labelled and dimensioned.
#[derive(Debug, Clone)]
pub struct NameTableEntry {
    pub identifier: String,
    /// Column header the logger writes into exported files.
    pub column: String,
    pub label: String,
    /// Math-style form for axes and legends.
    pub symbol: String,
    pub property: Property,
    pub unit: Unit,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    identifier: String,
    /// Defaults to the identifier itself for channels logged under
    /// their short name.
    column: Option<String>,
    label: String,
    symbol: String,
    property: Property,
    unit: String,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawTable {
    entry: Vec<RawEntry>,
}

/// The static identifier → (labels, property, unit) mapping. Loaded
/// once at startup and read-only afterwards; deactivated historical
/// rows are kept in `entries` for inspection but never returned by
/// `lookup`.
#[derive(Debug, Clone)]
pub struct NameTable {
    entries: Vec<NameTableEntry>,
    /// identifier → index of the active entry in `entries`.
    index: HashMap<String, usize>,
}

impl NameTable {
    /// The embedded default table.
    pub fn default_table() -> Result<Self> {
        Self::from_toml(DEFAULT_TABLE)
    }

    /// Load a replacement or extended table from a user-supplied file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read(path)
            .map_err(|e| ThermoLogError::file_read(path, e.to_string()))
            .map(crate::data::parser::decode_bytes)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: RawTable = toml::from_str(text)
            .map_err(|e| ThermoLogError::NameTable(format!("parse error: {e}")))?;

        let mut entries = Vec::with_capacity(raw.entry.len());
        let mut index = HashMap::new();

        for raw_entry in raw.entry {
            let unit = Unit::from_symbol(&raw_entry.unit).ok_or_else(|| {
                ThermoLogError::NameTable(format!(
                    "unknown unit '{}' for '{}'",
                    raw_entry.unit, raw_entry.identifier
                ))
            })?;
            if unit.dimension() != raw_entry.property.dimension() {
                return Err(ThermoLogError::NameTable(format!(
                    "unit '{}' of '{}' does not match property '{}'",
                    raw_entry.unit,
                    raw_entry.identifier,
                    raw_entry.property.label()
                )));
            }

            let entry = NameTableEntry {
                column: raw_entry
                    .column
                    .unwrap_or_else(|| raw_entry.identifier.clone()),
                identifier: raw_entry.identifier,
                label: raw_entry.label,
                symbol: raw_entry.symbol,
                property: raw_entry.property,
                unit,
                active: raw_entry.active,
            };

            if entry.active {
                if index.contains_key(&entry.identifier) {
                    return Err(ThermoLogError::NameTable(format!(
                        "two active entries for '{}'",
                        entry.identifier
                    )));
                }
                index.insert(entry.identifier.clone(), entries.len());
            }
            entries.push(entry);
        }

        Ok(Self { entries, index })
    }

    /// The active entry for an identifier. Deactivated alternates are
    /// never returned.
    pub fn lookup(&self, identifier: &str) -> Result<&NameTableEntry> {
        self.index
            .get(identifier)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ThermoLogError::unknown(identifier))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Active identifiers in table order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.identifier.as_str())
    }

    /// Every row, including deactivated historical alternates.
    pub fn entries(&self) -> &[NameTableEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_loads() {
        let table = NameTable::default_table().unwrap();
        assert!(table.contains("t"));
        assert!(table.contains("T1"));
        assert!(table.contains("pin"));
        assert!(table.contains("flowrt_r"));
    }

    #[test]
    fn lookup_returns_metadata() {
        let table = NameTable::default_table().unwrap();
        let entry = table.lookup("pin").unwrap();
        assert_eq!(entry.unit, Unit::Kilopascal);
        assert_eq!(entry.property, Property::Pressure);
        assert_eq!(entry.column, "p_suction");
    }

    #[test]
    fn unknown_identifier_is_reported() {
        let table = NameTable::default_table().unwrap();
        let err = table.lookup("T99").unwrap_err();
        assert!(matches!(err, ThermoLogError::UnknownIdentifier { .. }));
    }

    #[test]
    fn deactivated_alternates_are_invisible_to_lookup() {
        let table = NameTable::default_table().unwrap();

        // Both identifiers carry a historical alternate row.
        let ptot = table.lookup("Ptot").unwrap();
        assert!(ptot.active);
        assert_eq!(ptot.column, "P_total");
        let pfan = table.lookup("Pfan_in").unwrap();
        assert_eq!(pfan.column, "P_fan_indoor");

        // The alternates are still present in the full row list.
        let inactive: Vec<_> = table.entries().iter().filter(|e| !e.active).collect();
        assert_eq!(inactive.len(), 2);
        assert!(inactive.iter().any(|e| e.column == "Aux_ch2"));
    }

    #[test]
    fn replacement_table_loads_from_a_file() {
        let text = r#"
            [[entry]]
            identifier = "T1"
            column = "Sensor_01"
            label = "suction line temperature"
            symbol = "T_1"
            property = "temperature"
            unit = "degC"
        "#;
        let path = std::env::temp_dir().join("thermolog_name_table_test.toml");
        std::fs::write(&path, text).unwrap();
        let table = NameTable::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table.lookup("T1").unwrap().column, "Sensor_01");
        assert_eq!(table.lookup("T1").unwrap().unit, Unit::Celsius);
    }

    #[test]
    fn duplicate_active_entries_are_rejected() {
        let text = r#"
            [[entry]]
            identifier = "f"
            label = "compressor frequency"
            symbol = "f"
            property = "frequency"
            unit = "Hz"

            [[entry]]
            identifier = "f"
            column = "F_alt"
            label = "compressor frequency"
            symbol = "f"
            property = "frequency"
            unit = "Hz"
        "#;
        let err = NameTable::from_toml(text).unwrap_err();
        assert!(matches!(err, ThermoLogError::NameTable(_)));
    }

    #[test]
    fn unit_must_match_property_dimension() {
        let text = r#"
            [[entry]]
            identifier = "pin"
            label = "suction pressure"
            symbol = "p_in"
            property = "pressure"
            unit = "W"
        "#;
        let err = NameTable::from_toml(text).unwrap_err();
        assert!(matches!(err, ThermoLogError::NameTable(_)));
    }

    #[test]
    fn column_defaults_to_identifier() {
        let text = r#"
            [[entry]]
            identifier = "f"
            label = "compressor frequency"
            symbol = "f"
            property = "frequency"
            unit = "Hz"
        "#;
        let table = NameTable::from_toml(text).unwrap();
        assert_eq!(table.lookup("f").unwrap().column, "f");
    }
}
