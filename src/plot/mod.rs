pub mod export;
pub mod figure;
pub mod spec;

pub use figure::{ComparisonPanel, FileComparison, Figure, Subplot};
pub use spec::{PlotItem, PlotRequest};
