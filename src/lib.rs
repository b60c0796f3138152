//! Viewer for heat pump test bench logs.
//!
//! The core is a pure library. A name table maps logger column headers
//! to short channel identifiers, log files load into immutable
//! [`LogFile`]s, and plot requests like `(Ts Tr) pin:MPa` resolve to
//! [`Figure`]s without touching any UI. Quantities the logger does not
//! record, such as heat flows and humidity ratios, are derived on
//! demand from the recorded channels and refrigerant property tables.
//! The [`app`] module wraps that core in an egui desktop application.

pub mod app;
pub mod data;
pub mod error;
pub mod plot;
pub mod processing;
pub mod props;
pub mod quantity;
pub mod state;
pub mod ui;

pub use data::log::{FlowDirection, LogFile};
pub use data::name_table::NameTable;
pub use error::{Result, ThermoLogError};
pub use plot::figure::{FileComparison, Figure};
pub use processing::statistics::SeriesStats;
pub use processing::validate::{validate, Warning};
pub use quantity::{Dimension, Property, Quantity, Unit};
