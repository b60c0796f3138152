pub mod unit;

pub use unit::{Dimension, Unit};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThermoLogError};

/// Physical-property category of a signal. Finer grained than
/// `Dimension`: electrical power, mechanical power and heat transfer
/// rate are all watt-dimensioned but plot on separate axes and carry
/// different symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Time,
    Temperature,
    Pressure,
    FlowRate,
    ElectricalPower,
    MechanicalPower,
    HeatTransferRate,
    Frequency,
    RelativeHumidity,
    AbsoluteHumidity,
    SpecificEnthalpy,
    FlowDirection,
}

impl Property {
    pub fn dimension(&self) -> Dimension {
        match self {
            Property::Time => Dimension::Time,
            Property::Temperature => Dimension::Temperature,
            Property::Pressure => Dimension::Pressure,
            Property::FlowRate => Dimension::MassFlow,
            Property::ElectricalPower | Property::MechanicalPower | Property::HeatTransferRate => {
                Dimension::Power
            }
            Property::Frequency => Dimension::Frequency,
            Property::RelativeHumidity => Dimension::RelativeHumidity,
            Property::AbsoluteHumidity => Dimension::HumidityRatio,
            Property::SpecificEnthalpy => Dimension::SpecificEnthalpy,
            Property::FlowDirection => Dimension::Dimensionless,
        }
    }

    /// Generic symbol used for the shared y-axis label when all series
    /// on an axis belong to one category.
    pub fn axis_symbol(&self) -> &'static str {
        match self {
            Property::Time => "t",
            Property::Temperature => "T",
            Property::Pressure => "p",
            Property::FlowRate => "m\u{0307}",
            Property::ElectricalPower => "P",
            Property::MechanicalPower => "W\u{0307}",
            Property::HeatTransferRate => "Q\u{0307}",
            Property::Frequency => "f",
            Property::RelativeHumidity => "\u{03C6}",
            Property::AbsoluteHumidity => "\u{03C9}",
            Property::SpecificEnthalpy => "h",
            Property::FlowDirection => "\u{03B3}",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Property::Time => "time",
            Property::Temperature => "temperature",
            Property::Pressure => "pressure",
            Property::FlowRate => "flow rate",
            Property::ElectricalPower => "electrical power",
            Property::MechanicalPower => "mechanical power",
            Property::HeatTransferRate => "heat transfer rate",
            Property::Frequency => "frequency",
            Property::RelativeHumidity => "relative humidity",
            Property::AbsoluteHumidity => "absolute humidity",
            Property::SpecificEnthalpy => "specific enthalpy",
            Property::FlowDirection => "flow direction",
        }
    }
}

/// A measurement series paired with its unit and display metadata.
/// Values stay in `unit`; combining or re-plotting in another unit
/// goes through the checked conversions below.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub identifier: String,
    pub label: String,
    /// Math-style symbol for axis and legend rendering, e.g. `T_1`
    /// or `Q\u{0307}_cond`.
    pub symbol: String,
    pub property: Property,
    pub unit: Unit,
    pub values: Vec<f64>,
}

impl Quantity {
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        symbol: impl Into<String>,
        property: Property,
        unit: Unit,
        values: Vec<f64>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            symbol: symbol.into(),
            property,
            unit,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert the series into another unit of the same dimension.
    pub fn convert_to(mut self, unit: Unit) -> Result<Quantity> {
        if unit.dimension() != self.unit.dimension() {
            return Err(ThermoLogError::dimensionality(
                format!("{:?}", self.unit.dimension()),
                format!("{:?}", unit.dimension()),
            ));
        }
        if unit != self.unit {
            for v in &mut self.values {
                *v = unit::convert_value(*v, self.unit, unit);
            }
            self.unit = unit;
        }
        Ok(self)
    }

    /// Element-wise sum. The other series is converted into this
    /// series' unit first; differing dimensions fail. The result keeps
    /// this series' metadata, which the caller usually replaces.
    pub fn try_add(&self, other: &Quantity) -> Result<Quantity> {
        self.combine(other, |a, b| a + b)
    }

    /// Element-wise difference, with the same conversion rules as
    /// `try_add`.
    pub fn try_sub(&self, other: &Quantity) -> Result<Quantity> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(&self, other: &Quantity, op: impl Fn(f64, f64) -> f64) -> Result<Quantity> {
        if other.unit.dimension() != self.unit.dimension() {
            return Err(ThermoLogError::dimensionality(
                format!("{:?}", self.unit.dimension()),
                format!("{:?}", other.unit.dimension()),
            ));
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(&a, &b)| op(a, unit::convert_value(b, other.unit, self.unit)))
            .collect();
        Ok(Quantity {
            identifier: self.identifier.clone(),
            label: self.label.clone(),
            symbol: self.symbol.clone(),
            property: self.property,
            unit: self.unit,
            values,
        })
    }
}
