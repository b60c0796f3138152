use crate::data::log::LogFile;
use crate::processing::derivation;
use crate::processing::smoothing::moving_mean;

/// Fraction of samples allowed to show supply air more humid than
/// return air before the humidity warning fires.
const OVERHUM_LIMIT: f64 = 0.02;

/// Window of the detrending mean and variance threshold of the
/// compressor cycling check.
const CYCLING_WINDOW: usize = 15;
const CYCLING_VARIANCE_LIMIT_HZ2: f64 = 100.0;

/// One advisory finding. Validation never fails an operation; a check
/// that cannot run (missing channels) reports itself as skipped.
#[derive(Debug, Clone)]
pub struct Warning {
    pub check: &'static str,
    pub message: String,
    /// Plot request showing the quantities the check inspected, for
    /// display next to the message.
    pub involved: Option<&'static str>,
}

/// Run the fixed battery of sanity checks against a loaded log.
pub fn validate(log: &LogFile) -> Vec<Warning> {
    let mut warnings = Vec::new();
    humidity_check(log, &mut warnings);
    cycling_check(log, &mut warnings);
    coverage_check(log, &mut warnings);
    warnings
}

/// In a healthy run the unit dries the air stream, so the supply
/// humidity ratio stays below the return one. Condensate carry-over
/// or a failed RH sensor shows up as the opposite.
fn humidity_check(log: &LogFile, warnings: &mut Vec<Warning>) {
    let resolved = log.get("wr ws");
    let (wr, ws) = match resolved.as_deref() {
        Ok([wr, ws]) => (wr, ws),
        Ok(_) => return,
        Err(e) => {
            warnings.push(Warning {
                check: "humidity",
                message: format!("check skipped: {e}"),
                involved: None,
            });
            return;
        }
    };

    if wr.is_empty() {
        return;
    }
    let exceeded = wr
        .values
        .iter()
        .zip(ws.values.iter())
        .filter(|(r, s)| r < s)
        .count();
    let overhum = exceeded as f64 / wr.len() as f64;
    if overhum > OVERHUM_LIMIT {
        warnings.push(Warning {
            check: "humidity",
            message: format!(
                "The supply humidity ratio exceeds the return humidity ratio {:.1}% of the time.",
                overhum * 100.0
            ),
            involved: Some("(wr ws)"),
        });
    }
}

/// Rapid on/off switching of the compressor leaves a large variance
/// around the slow trend of its frequency channel.
fn cycling_check(log: &LogFile, warnings: &mut Vec<Warning>) {
    let f = match log.quantity("f") {
        Ok(f) => f,
        Err(e) => {
            warnings.push(Warning {
                check: "cycling",
                message: format!("check skipped: {e}"),
                involved: None,
            });
            return;
        }
    };

    if f.len() <= CYCLING_WINDOW {
        return;
    }
    let trend = moving_mean(&f.values, CYCLING_WINDOW);
    // Drop the half-window edges where the mirror padding biases the
    // trend.
    let lo = CYCLING_WINDOW / 2;
    let hi = f.len() - CYCLING_WINDOW / 2 - 1;

    let residuals: Vec<f64> = (lo..hi)
        .map(|i| f.values[i] - trend[i])
        .filter(|v| v.is_finite())
        .collect();
    if residuals.is_empty() {
        return;
    }
    let mean = residuals.iter().sum::<f64>() / residuals.len() as f64;
    let variance =
        residuals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / residuals.len() as f64;

    if variance > CYCLING_VARIANCE_LIMIT_HZ2 {
        warnings.push(Warning {
            check: "cycling",
            message: "There appears to be cycling.".to_string(),
            involved: Some("f"),
        });
    }
}

/// Report name-table channels this file can neither read nor derive.
fn coverage_check(log: &LogFile, warnings: &mut Vec<Warning>) {
    let mut missing: Vec<&str> = Vec::new();
    for entry in log.name_table().entries().iter().filter(|e| e.active) {
        if !log.has_column(&entry.identifier) {
            missing.push(&entry.identifier);
        }
    }
    for id in derivation::derived_identifiers() {
        let derivable = derivation::rule_for(id)
            .and_then(|rule| rule.input_identifiers(log.direction()))
            .map(|inputs| inputs.iter().all(|input| log.has_column(input)))
            .unwrap_or(false);
        if !derivable {
            missing.push(id);
        }
    }
    if !missing.is_empty() {
        warnings.push(Warning {
            check: "coverage",
            message: format!("Channels neither logged nor derivable: {}.", missing.join(", ")),
            involved: None,
        });
    }
}
