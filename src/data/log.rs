use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::loader;
use crate::data::name_table::NameTable;
use crate::error::Result;
use crate::processing::resolver;
use crate::quantity::Quantity;

/// Which way the four-way valve routes the refrigerant, judged from
/// the dominant value of the `refdir` channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Forward,
    Reversed,
}

/// A loaded log file: cleaned numeric columns keyed by the name
/// table's identifiers. Immutable once opened; every operation on it
/// is a pure request/response.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    stem: String,
    name_table: Arc<NameTable>,
    columns: HashMap<String, Vec<f64>>,
    row_count: usize,
    direction: FlowDirection,
    /// True when the time column held datetimes and was parsed to
    /// Unix seconds.
    time_is_epoch: bool,
}

impl LogFile {
    /// Open a CSV or Excel log and map its columns to identifiers.
    /// File columns without a name-table entry are ignored; name-table
    /// channels missing from the file simply stay unavailable.
    pub fn open(path: &Path, name_table: Arc<NameTable>) -> Result<Self> {
        let loaded = loader::load_file(path)?;

        let mut columns: HashMap<String, Vec<f64>> = HashMap::new();
        let mut time_is_epoch = false;

        for entry in name_table.entries().iter().filter(|e| e.active) {
            let Some(col_idx) = loaded
                .columns
                .iter()
                .position(|header| header == &entry.column || header == &entry.identifier)
            else {
                continue;
            };
            let raw = &loaded.column_data[col_idx];

            let values = match entry.identifier.as_str() {
                "t" => {
                    if let Some((timestamps, _)) = loader::column_to_timestamps(raw) {
                        time_is_epoch = true;
                        timestamps
                    } else {
                        loader::column_to_f64(raw).0
                    }
                }
                "f" => clean_frequency(raw),
                _ => {
                    let (values, frac) = loader::column_to_f64(raw);
                    if frac < 0.9 {
                        tracing::warn!(
                            identifier = entry.identifier.as_str(),
                            valid_fraction = frac,
                            "column has unparseable cells"
                        );
                    }
                    values
                }
            };
            columns.insert(entry.identifier.clone(), values);
        }

        // The flow meter reads noise while the compressor is off.
        if let Some(f) = columns.get("f").cloned() {
            if let Some(flow) = columns.get_mut("flowrt_r") {
                for (flow_v, f_v) in flow.iter_mut().zip(f.iter()) {
                    if *f_v == 0.0 {
                        *flow_v = 0.0;
                    }
                }
            }
        }

        let direction = direction_of(columns.get("refdir").map(Vec::as_slice));

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("log")
            .to_string();

        tracing::info!(
            file = %path.display(),
            rows = loaded.row_count,
            channels = columns.len(),
            ?direction,
            "log loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            stem,
            name_table,
            columns,
            row_count: loaded.row_count,
            direction,
            time_is_epoch,
        })
    }

    /// Resolve identifiers, in request order. Accepts a single
    /// space-separated string, e.g. `"T1 T2 Qcond"`.
    pub fn get(&self, names: &str) -> Result<Vec<Quantity>> {
        let requested: Vec<&str> = names.split_whitespace().collect();
        resolver::resolve(self, &requested)
    }

    /// Resolve one identifier.
    pub fn quantity(&self, name: &str) -> Result<Quantity> {
        let mut resolved = resolver::resolve(self, &[name])?;
        Ok(resolved.remove(0))
    }

    pub fn name_table(&self) -> &NameTable {
        &self.name_table
    }

    pub fn column(&self, identifier: &str) -> Option<&[f64]> {
        self.columns.get(identifier).map(Vec::as_slice)
    }

    pub fn has_column(&self, identifier: &str) -> bool {
        self.columns.contains_key(identifier)
    }

    /// Identifiers with a raw column, in name-table order.
    pub fn raw_identifiers(&self) -> Vec<&str> {
        self.name_table
            .entries()
            .iter()
            .filter(|e| e.active && self.columns.contains_key(&e.identifier))
            .map(|e| e.identifier.as_str())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction
    }

    pub fn time_is_epoch(&self) -> bool {
        self.time_is_epoch
    }

    /// Time axis for plotting: the `t` column when present, sample
    /// index otherwise.
    pub fn time_values(&self) -> Vec<f64> {
        match self.columns.get("t") {
            Some(t) => t.clone(),
            None => (0..self.row_count).map(|i| i as f64).collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_columns(
        name_table: Arc<NameTable>,
        columns: Vec<(&str, Vec<f64>)>,
    ) -> Self {
        let row_count = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let columns: HashMap<String, Vec<f64>> = columns
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let direction = direction_of(columns.get("refdir").map(Vec::as_slice));
        Self {
            path: PathBuf::from("in-memory"),
            stem: "in-memory".to_string(),
            name_table,
            columns,
            row_count,
            direction,
            time_is_epoch: false,
        }
    }
}

/// The compressor-frequency channel needs two fixes: the logger
/// writes `UnderRange` while the compressor is off, and the channel
/// counts both half-waves of the inverter output, doubling the real
/// frequency.
fn clean_frequency(raw: &[String]) -> Vec<f64> {
    raw.iter()
        .map(|s| {
            let s = s.trim();
            if s == "UnderRange" {
                0.0
            } else {
                match s.parse::<f64>() {
                    Ok(v) => v / 2.0,
                    Err(_) => f64::NAN,
                }
            }
        })
        .collect()
}

fn direction_of(refdir: Option<&[f64]>) -> FlowDirection {
    let Some(values) = refdir else {
        return FlowDirection::Forward;
    };
    if values.is_empty() {
        return FlowDirection::Forward;
    }
    let nonzero = values.iter().filter(|v| v.is_finite() && **v != 0.0).count();
    if nonzero < values.len() / 2 {
        FlowDirection::Forward
    } else {
        FlowDirection::Reversed
    }
}
