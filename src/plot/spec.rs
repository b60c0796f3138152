use crate::error::{Result, ThermoLogError};
use crate::quantity::Unit;

/// A single plot item: an identifier plus an optional display unit,
/// written `pin` or `pin:MPa`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotItem {
    pub identifier: String,
    pub unit_override: Option<Unit>,
}

/// A parsed plot request.
///
/// `All` covers both `all` and `allmerge`: every plottable identifier,
/// grouped by property category. `AllSplit` is the same set with one
/// subplot per identifier. `Groups` is an explicit request where each
/// inner vector shares one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    All,
    AllSplit,
    Groups(Vec<Vec<PlotItem>>),
}

/// Parse a plot request string.
///
/// Whitespace separates subplots, parentheses group identifiers onto a
/// shared axis, and `identifier:unit` overrides the display unit:
///
/// ```text
/// T1 T2              two subplots
/// (T1 T2) pin:MPa    one shared axis, then pressure in MPa
/// all                everything, grouped by property
/// ```
pub fn parse(request: &str) -> Result<PlotRequest> {
    let trimmed = request.trim();
    if trimmed.is_empty() {
        return Err(ThermoLogError::PlotSpec("empty plot request".into()));
    }
    match trimmed {
        "all" | "allmerge" => return Ok(PlotRequest::All),
        "allsplit" => return Ok(PlotRequest::AllSplit),
        _ => {}
    }

    let mut groups: Vec<Vec<PlotItem>> = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(closer) = matching_close(rest.chars().next()) {
            let close = rest.find(closer).ok_or_else(|| {
                ThermoLogError::PlotSpec(format!("unclosed group in {trimmed:?}"))
            })?;
            let body = &rest[1..close];
            let group: Vec<PlotItem> = body
                .split_whitespace()
                .map(parse_item)
                .collect::<Result<_>>()?;
            if group.is_empty() {
                return Err(ThermoLogError::PlotSpec(format!(
                    "empty group in {trimmed:?}"
                )));
            }
            groups.push(group);
            rest = &rest[close + closer.len_utf8()..];
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            let token = &rest[..end];
            if token.contains(')') || token.contains(']') || token.contains('}') {
                return Err(ThermoLogError::PlotSpec(format!(
                    "unmatched closing bracket in {trimmed:?}"
                )));
            }
            groups.push(vec![parse_item(token)?]);
            rest = &rest[end..];
        }
    }
    Ok(PlotRequest::Groups(groups))
}

/// Closing bracket for an opening one, if `c` opens a group.
fn matching_close(c: Option<char>) -> Option<char> {
    match c {
        Some('(') => Some(')'),
        Some('[') => Some(']'),
        Some('{') => Some('}'),
        _ => None,
    }
}

pub(crate) fn parse_item(token: &str) -> Result<PlotItem> {
    match token.split_once(':') {
        None => Ok(PlotItem {
            identifier: token.to_string(),
            unit_override: None,
        }),
        Some((name, unit)) => {
            if name.is_empty() {
                return Err(ThermoLogError::PlotSpec(format!(
                    "missing identifier before ':' in {token:?}"
                )));
            }
            let unit = Unit::from_symbol(unit).ok_or_else(|| {
                ThermoLogError::PlotSpec(format!("unknown unit {unit:?} in {token:?}"))
            })?;
            Ok(PlotItem {
                identifier: name.to_string(),
                unit_override: Some(unit),
            })
        }
    }
}

// ----------------------------------------------------------------------------
