use crate::data::log::LogFile;
use crate::error::{Result, ThermoLogError};
use crate::plot::spec::{self, PlotItem, PlotRequest};
use crate::processing::resolver;
use crate::quantity::Quantity;

/// One axis of a figure and the series drawn on it.
#[derive(Debug, Clone)]
pub struct Subplot {
    pub series: Vec<Quantity>,
    pub y_label: String,
}

/// A fully resolved figure, ready for any rendering surface. Axis
/// labels and grouping are already decided; the renderer only draws.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Shared x values, one per sample.
    pub x: Vec<f64>,
    pub x_label: String,
    /// True when x values are Unix seconds and ticks should render as
    /// wall-clock times.
    pub x_is_epoch: bool,
    pub subplots: Vec<Subplot>,
    /// Advisory notes about axis sharing, never fatal.
    pub warnings: Vec<String>,
}

impl Figure {
    /// Build a figure for a plot request against one log.
    ///
    /// Identifiers resolve through the name table and derivation
    /// rules; a group mixing dimensions on one axis fails with
    /// `DimensionalityMismatch`, as does a unit override outside the
    /// channel's dimension.
    pub fn build(log: &LogFile, request: &str) -> Result<Figure> {
        let groups: Vec<Vec<Quantity>> = match spec::parse(request)? {
            PlotRequest::Groups(groups) => groups
                .iter()
                .map(|group| resolve_group(log, group))
                .collect::<Result<_>>()?,
            PlotRequest::All => group_by_property(resolve_all(log)?),
            PlotRequest::AllSplit => resolve_all(log)?.into_iter().map(|q| vec![q]).collect(),
        };
        if groups.is_empty() {
            return Err(ThermoLogError::PlotSpec(
                "nothing to plot in this file".into(),
            ));
        }

        let mut warnings = Vec::new();
        let subplots = groups
            .into_iter()
            .map(|series| {
                let y_label = axis_label(&series, &mut warnings)?;
                Ok(Subplot { series, y_label })
            })
            .collect::<Result<Vec<_>>>()?;

        let (x_label, x_is_epoch) = x_axis(log);
        Ok(Figure {
            x: log.time_values(),
            x_label,
            x_is_epoch,
            subplots,
            warnings,
        })
    }
}

/// The same quantity drawn from one log, as a panel of a comparison.
#[derive(Debug, Clone)]
pub struct ComparisonPanel {
    /// File stem, used as the panel title.
    pub title: String,
    pub x: Vec<f64>,
    pub x_is_epoch: bool,
    pub series: Quantity,
}

/// One quantity across several logs: a near-square grid with one
/// panel per file and a shared y label.
#[derive(Debug, Clone)]
pub struct FileComparison {
    /// Shared figure title, the quantity's display label.
    pub title: String,
    pub y_label: String,
    pub cols: usize,
    pub rows: usize,
    pub panels: Vec<ComparisonPanel>,
}

impl FileComparison {
    /// Resolve `identifier` (optionally with a `:unit` override) in
    /// every log. Fails if any single log cannot produce it.
    pub fn build(logs: &[&LogFile], identifier: &str) -> Result<FileComparison> {
        if logs.is_empty() {
            return Err(ThermoLogError::PlotSpec("no files to compare".into()));
        }
        let item = spec::parse_item(identifier.trim())?;
        let panels = logs
            .iter()
            .map(|log| {
                let series = resolve_item(log, &item)?;
                Ok(ComparisonPanel {
                    title: log.stem().to_string(),
                    x: log.time_values(),
                    x_is_epoch: log.time_is_epoch(),
                    series,
                })
            })
            .collect::<Result<Vec<ComparisonPanel>>>()?;

        let first = &panels[0].series;
        let title = first.label.clone();
        let y_label = format!("{} ({})", first.symbol, first.unit);
        let cols = ((panels.len() as f64).sqrt().floor() as usize).max(1);
        let rows = (panels.len() + cols - 1) / cols;
        Ok(FileComparison {
            title,
            y_label,
            cols,
            rows,
            panels,
        })
    }
}

// ----------------------------------------------------------------------------

fn resolve_item(log: &LogFile, item: &PlotItem) -> Result<Quantity> {
    let quantity = log.quantity(&item.identifier)?;
    match item.unit_override {
        Some(unit) => quantity.convert_to(unit),
        None => Ok(quantity),
    }
}

fn resolve_group(log: &LogFile, items: &[PlotItem]) -> Result<Vec<Quantity>> {
    items.iter().map(|item| resolve_item(log, item)).collect()
}

fn resolve_all(log: &LogFile) -> Result<Vec<Quantity>> {
    let ids = resolver::available_identifiers(log);
    let names: Vec<&str> = ids.iter().map(String::as_str).collect();
    resolver::resolve(log, &names)
}

/// Group quantities by property category, preserving first-seen order.
fn group_by_property(quantities: Vec<Quantity>) -> Vec<Vec<Quantity>> {
    let mut groups: Vec<Vec<Quantity>> = Vec::new();
    for q in quantities {
        match groups.iter_mut().find(|g| g[0].property == q.property) {
            Some(group) => group.push(q),
            None => groups.push(vec![q]),
        }
    }
    groups
}

/// Label for one shared axis.
///
/// A lone series keeps its own symbol. Several series of one category
/// use the category symbol. Mixed categories fall back to the bare
/// unit, with a figure warning; mixed dimensions are an error. The
/// last series names the unit, so a group with mixed units (possible
/// through overrides) is labelled after its final member and warned
/// about.
fn axis_label(series: &[Quantity], warnings: &mut Vec<String>) -> Result<String> {
    let first = &series[0];
    for q in &series[1..] {
        if q.unit.dimension() != first.unit.dimension() {
            return Err(ThermoLogError::dimensionality(
                format!("{:?}", first.unit.dimension()),
                format!("{:?}", q.unit.dimension()),
            ));
        }
    }
    let unit = series[series.len() - 1].unit;
    if series.iter().any(|q| q.unit != first.unit) {
        warn_once(
            warnings,
            "Quantities with different units are displayed on the same axis.",
        );
    }
    if series.len() == 1 {
        return Ok(format!("{} ({})", first.symbol, first.unit));
    }
    if series.iter().all(|q| q.property == first.property) {
        Ok(format!("{} ({})", first.property.axis_symbol(), unit))
    } else {
        warn_once(
            warnings,
            "Quantities of different categories are displayed on the same axis.",
        );
        Ok(format!("({unit})"))
    }
}

fn warn_once(warnings: &mut Vec<String>, message: &str) {
    if !warnings.iter().any(|w| w == message) {
        warnings.push(message.to_string());
    }
}

fn x_axis(log: &LogFile) -> (String, bool) {
    if log.time_is_epoch() {
        return ("t".to_string(), true);
    }
    match log.name_table().lookup("t") {
        Ok(entry) if log.has_column("t") => {
            (format!("{} ({})", entry.symbol, entry.unit), false)
        }
        _ => ("sample".to_string(), false),
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::name_table::NameTable;
    use std::sync::Arc;

    fn table() -> Arc<NameTable> {
        Arc::new(NameTable::default_table().unwrap())
    }

    fn log_with(columns: Vec<(&str, Vec<f64>)>) -> LogFile {
        LogFile::from_columns(table(), columns)
    }

    #[test]
    fn bare_identifiers_get_their_own_subplot_and_symbol_label() {
        let log = log_with(vec![
            ("T1", vec![10.0, 11.0]),
            ("pin", vec![800.0, 810.0]),
        ]);
        let fig = Figure::build(&log, "T1 pin").unwrap();
        assert_eq!(fig.subplots.len(), 2);
        assert_eq!(fig.subplots[0].y_label, "T_1 (\u{00B0}C)");
        assert_eq!(fig.subplots[1].y_label, "p_in (kPa)");
        assert_eq!(fig.x_label, "sample");
        assert_eq!(fig.x, vec![0.0, 1.0]);
        assert!(fig.warnings.is_empty());
    }

    #[test]
    fn grouped_same_category_uses_the_category_symbol() {
        let log = log_with(vec![("T1", vec![10.0]), ("T2", vec![60.0])]);
        let fig = Figure::build(&log, "(T1 T2)").unwrap();
        assert_eq!(fig.subplots.len(), 1);
        assert_eq!(fig.subplots[0].series.len(), 2);
        assert_eq!(fig.subplots[0].y_label, "T (\u{00B0}C)");
    }

    #[test]
    fn mixed_dimensions_in_one_group_fail() {
        let log = log_with(vec![("T1", vec![10.0]), ("pin", vec![800.0])]);
        let err = Figure::build(&log, "(T1 pin)").unwrap_err();
        assert!(matches!(
            err,
            ThermoLogError::DimensionalityMismatch { .. }
        ));
    }

    #[test]
    fn unit_override_converts_the_series() {
        let log = log_with(vec![("pin", vec![2000.0])]);
        let fig = Figure::build(&log, "pin:MPa").unwrap();
        assert_eq!(fig.subplots[0].y_label, "p_in (MPa)");
        assert!((fig.subplots[0].series[0].values[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn override_outside_the_dimension_fails() {
        let log = log_with(vec![("pin", vec![2000.0])]);
        assert!(matches!(
            Figure::build(&log, "pin:W").unwrap_err(),
            ThermoLogError::DimensionalityMismatch { .. }
        ));
    }

    #[test]
    fn mixed_units_in_one_group_warn_and_take_the_last_unit() {
        let log = log_with(vec![
            ("pin", vec![800.0]),
            ("pout", vec![2600.0]),
        ]);
        let fig = Figure::build(&log, "(pin:MPa pout)").unwrap();
        assert_eq!(fig.subplots[0].y_label, "p (kPa)");
        assert_eq!(fig.warnings.len(), 1);
        assert!(fig.warnings[0].contains("different units"));
    }

    #[test]
    fn all_groups_by_property_category() {
        let log = log_with(vec![
            ("T1", vec![10.0]),
            ("T2", vec![60.0]),
            ("pin", vec![800.0]),
        ]);
        let fig = Figure::build(&log, "all").unwrap();
        assert_eq!(fig.subplots.len(), 2);
        assert_eq!(fig.subplots[0].series.len(), 2);
        assert_eq!(fig.subplots[0].y_label, "T (\u{00B0}C)");
        assert_eq!(fig.subplots[1].series[0].identifier, "pin");
    }

    #[test]
    fn allsplit_gives_one_subplot_per_identifier() {
        let log = log_with(vec![
            ("T1", vec![10.0]),
            ("T2", vec![60.0]),
            ("pin", vec![800.0]),
        ]);
        let fig = Figure::build(&log, "allsplit").unwrap();
        assert_eq!(fig.subplots.len(), 3);
    }

    #[test]
    fn unknown_identifier_propagates() {
        let log = log_with(vec![("T1", vec![10.0])]);
        assert!(matches!(
            Figure::build(&log, "bogus").unwrap_err(),
            ThermoLogError::UnknownIdentifier { .. }
        ));
    }

    #[test]
    fn comparison_lays_panels_on_a_near_square_grid() {
        let a = log_with(vec![("T1", vec![10.0, 11.0])]);
        let b = log_with(vec![("T1", vec![12.0, 13.0])]);
        let cmp = FileComparison::build(&[&a, &b], "T1").unwrap();
        assert_eq!(cmp.panels.len(), 2);
        assert_eq!((cmp.cols, cmp.rows), (1, 2));
        assert_eq!(cmp.title, "suction line temperature");
        assert_eq!(cmp.y_label, "T_1 (\u{00B0}C)");
        assert_eq!(cmp.panels[0].title, "in-memory");
    }

    #[test]
    fn comparison_fails_when_one_file_lacks_the_channel() {
        let a = log_with(vec![("T1", vec![10.0])]);
        let b = log_with(vec![("T2", vec![20.0])]);
        assert!(FileComparison::build(&[&a, &b], "T1").is_err());
    }

    #[test]
    fn five_panels_make_a_two_by_three_grid() {
        let logs: Vec<LogFile> = (0..5)
            .map(|i| log_with(vec![("T1", vec![i as f64])]))
            .collect();
        let refs: Vec<&LogFile> = logs.iter().collect();
        let cmp = FileComparison::build(&refs, "T1").unwrap();
        assert_eq!((cmp.cols, cmp.rows), (2, 3));
    }
}
