use crate::data::log::LogFile;
use crate::error::{Result, ThermoLogError};
use crate::processing::derivation;
use crate::quantity::Quantity;

/// Resolve identifiers against a loaded log, in request order.
///
/// Each identifier is either a raw column (emitted with the name
/// table's unit and labels), or the output of a derivation rule whose
/// inputs are resolved the same way. An identifier known to the name
/// table or rule set but not obtainable from this file fails with
/// `UnresolvableQuantity`; one absent from the vocabulary altogether
/// fails with `UnknownIdentifier`. Pure function of its inputs: no
/// caching, no mutation of the log.
pub fn resolve(log: &LogFile, requested: &[&str]) -> Result<Vec<Quantity>> {
    requested.iter().map(|name| resolve_one(log, name)).collect()
}

fn resolve_one(log: &LogFile, name: &str) -> Result<Quantity> {
    if let Some(values) = log.column(name) {
        let entry = log.name_table().lookup(name)?;
        return Ok(Quantity::new(
            &entry.identifier,
            &entry.label,
            &entry.symbol,
            entry.property,
            entry.unit,
            values.to_vec(),
        ));
    }

    if let Some(rule) = derivation::rule_for(name) {
        let Some(inputs) = rule.input_identifiers(log.direction()) else {
            return Err(ThermoLogError::rule_not_applicable(name));
        };
        let resolved: Vec<Quantity> = inputs
            .iter()
            .map(|input| resolve_one(log, input))
            .collect::<Result<_>>()?;
        return rule.compute(&resolved);
    }

    if log.name_table().contains(name) {
        Err(ThermoLogError::unresolvable(
            name,
            "column missing from file and no derivation rule",
        ))
    } else {
        Err(ThermoLogError::unknown(name))
    }
}

/// Identifiers resolvable from this log: raw columns first in name
/// table order, then applicable derived quantities. The time channel
/// is excluded, it serves as the x axis.
pub fn available_identifiers(log: &LogFile) -> Vec<String> {
    let mut available: Vec<String> = log
        .name_table()
        .entries()
        .iter()
        .filter(|e| e.active && e.identifier != "t" && log.has_column(&e.identifier))
        .map(|e| e.identifier.clone())
        .collect();
    for id in derivation::derived_identifiers() {
        let applicable = derivation::rule_for(id)
            .and_then(|rule| rule.input_identifiers(log.direction()))
            .map(|inputs| inputs.iter().all(|input| log.has_column(input)))
            .unwrap_or(false);
        if applicable && !available.iter().any(|a| a == id) {
            available.push(id.to_string());
        }
    }
    available
}
