use crate::quantity::Quantity;

/// Summary statistics over one measurement series.
#[derive(Debug, Clone)]
pub struct SeriesStats {
    /// Finite samples that entered the computation.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    /// Compute statistics from samples, filtering out NaN. `None`
    /// when no finite sample remains.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }
        vals.sort_by(f64::total_cmp);

        let count = vals.len();
        let (min, max) = (vals[0], vals[count - 1]);
        let mean = vals.iter().sum::<f64>() / count as f64;
        let median = match count % 2 {
            0 => (vals[count / 2 - 1] + vals[count / 2]) / 2.0,
            _ => vals[count / 2],
        };
        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(SeriesStats {
            count,
            min,
            max,
            peak_to_peak: max - min,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }

    pub fn for_quantity(quantity: &Quantity) -> Option<Self> {
        Self::compute(&quantity.values)
    }

    /// Multi-line block for the statistics panel and the quantity
    /// info listing.
    pub fn report(&self, label: &str, unit: &str) -> String {
        format!(
            "{label}:\n  Count: {}\n  Min: {:.3} {unit}\n  Max: {:.3} {unit}\n  Peak-to-Peak: {:.3} {unit}\n  Mean: {:.3} {unit}\n  Median: {:.3} {unit}\n  Std Dev: {:.3} {unit}\n",
            self.count, self.min, self.max, self.peak_to_peak, self.mean, self.median, self.std_dev
        )
    }
}
