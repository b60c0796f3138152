use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical dimension of a unit. Conversions are only defined between
/// units sharing a dimension; anything else is a dimensionality
/// mismatch surfaced by the quantity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Time,
    Temperature,
    Pressure,
    MassFlow,
    Power,
    Frequency,
    RelativeHumidity,
    HumidityRatio,
    SpecificEnthalpy,
    Dimensionless,
}

/// Measurement units the logger and the derivation formulas produce.
/// Each dimension has a base unit the conversions pivot through:
/// s, \u{00B0}C, kPa, kg/s, W, Hz, %, kg/kg, J/kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Celsius,
    Kelvin,
    Pascal,
    Kilopascal,
    Bar,
    Megapascal,
    KilogramPerSecond,
    KilogramPerHour,
    Watt,
    Kilowatt,
    Hertz,
    Percent,
    KilogramPerKilogram,
    GramPerKilogram,
    JoulePerKilogram,
    KilojoulePerKilogram,
    Unitless,
}

const KELVIN_OFFSET: f64 = 273.15;

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Second | Unit::Minute | Unit::Hour => Dimension::Time,
            Unit::Celsius | Unit::Kelvin => Dimension::Temperature,
            Unit::Pascal | Unit::Kilopascal | Unit::Bar | Unit::Megapascal => Dimension::Pressure,
            Unit::KilogramPerSecond | Unit::KilogramPerHour => Dimension::MassFlow,
            Unit::Watt | Unit::Kilowatt => Dimension::Power,
            Unit::Hertz => Dimension::Frequency,
            Unit::Percent => Dimension::RelativeHumidity,
            Unit::KilogramPerKilogram | Unit::GramPerKilogram => Dimension::HumidityRatio,
            Unit::JoulePerKilogram | Unit::KilojoulePerKilogram => Dimension::SpecificEnthalpy,
            Unit::Unitless => Dimension::Dimensionless,
        }
    }

    /// Display symbol, also the spelling accepted by `from_symbol`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Second => "s",
            Unit::Minute => "min",
            Unit::Hour => "h",
            Unit::Celsius => "\u{00B0}C",
            Unit::Kelvin => "K",
            Unit::Pascal => "Pa",
            Unit::Kilopascal => "kPa",
            Unit::Bar => "bar",
            Unit::Megapascal => "MPa",
            Unit::KilogramPerSecond => "kg/s",
            Unit::KilogramPerHour => "kg/h",
            Unit::Watt => "W",
            Unit::Kilowatt => "kW",
            Unit::Hertz => "Hz",
            Unit::Percent => "%",
            Unit::KilogramPerKilogram => "kg/kg",
            Unit::GramPerKilogram => "g/kg",
            Unit::JoulePerKilogram => "J/kg",
            Unit::KilojoulePerKilogram => "kJ/kg",
            Unit::Unitless => "-",
        }
    }

    /// Parse a unit symbol as written in the name table or a plot
    /// request. `degC` is accepted as an ASCII spelling of `\u{00B0}C`.
    pub fn from_symbol(s: &str) -> Option<Unit> {
        match s.trim() {
            "s" => Some(Unit::Second),
            "min" => Some(Unit::Minute),
            "h" => Some(Unit::Hour),
            "\u{00B0}C" | "degC" | "C" => Some(Unit::Celsius),
            "K" => Some(Unit::Kelvin),
            "Pa" => Some(Unit::Pascal),
            "kPa" => Some(Unit::Kilopascal),
            "bar" => Some(Unit::Bar),
            "MPa" => Some(Unit::Megapascal),
            "kg/s" => Some(Unit::KilogramPerSecond),
            "kg/h" => Some(Unit::KilogramPerHour),
            "W" => Some(Unit::Watt),
            "kW" => Some(Unit::Kilowatt),
            "Hz" => Some(Unit::Hertz),
            "%" => Some(Unit::Percent),
            "kg/kg" => Some(Unit::KilogramPerKilogram),
            "g/kg" => Some(Unit::GramPerKilogram),
            "J/kg" => Some(Unit::JoulePerKilogram),
            "kJ/kg" => Some(Unit::KilojoulePerKilogram),
            "-" | "" => Some(Unit::Unitless),
            _ => None,
        }
    }

    /// Convert a value in this unit to the dimension's base unit.
    /// Temperature is affine; everything else is a pure scale factor.
    fn to_base(&self, v: f64) -> f64 {
        match self {
            Unit::Second => v,
            Unit::Minute => v * 60.0,
            Unit::Hour => v * 3600.0,
            Unit::Celsius => v,
            Unit::Kelvin => v - KELVIN_OFFSET,
            Unit::Pascal => v / 1000.0,
            Unit::Kilopascal => v,
            Unit::Bar => v * 100.0,
            Unit::Megapascal => v * 1000.0,
            Unit::KilogramPerSecond => v,
            Unit::KilogramPerHour => v / 3600.0,
            Unit::Watt => v,
            Unit::Kilowatt => v * 1000.0,
            Unit::Hertz => v,
            Unit::Percent => v,
            Unit::KilogramPerKilogram => v,
            Unit::GramPerKilogram => v / 1000.0,
            Unit::JoulePerKilogram => v,
            Unit::KilojoulePerKilogram => v * 1000.0,
            Unit::Unitless => v,
        }
    }

    fn from_base(&self, v: f64) -> f64 {
        match self {
            Unit::Second => v,
            Unit::Minute => v / 60.0,
            Unit::Hour => v / 3600.0,
            Unit::Celsius => v,
            Unit::Kelvin => v + KELVIN_OFFSET,
            Unit::Pascal => v * 1000.0,
            Unit::Kilopascal => v,
            Unit::Bar => v / 100.0,
            Unit::Megapascal => v / 1000.0,
            Unit::KilogramPerSecond => v,
            Unit::KilogramPerHour => v * 3600.0,
            Unit::Watt => v,
            Unit::Kilowatt => v / 1000.0,
            Unit::Hertz => v,
            Unit::Percent => v,
            Unit::KilogramPerKilogram => v,
            Unit::GramPerKilogram => v * 1000.0,
            Unit::JoulePerKilogram => v,
            Unit::KilojoulePerKilogram => v / 1000.0,
            Unit::Unitless => v,
        }
    }
}

/// Convert a value between two units of the same dimension. The
/// caller is responsible for the dimension check; the quantity layer
/// turns a mismatch into an error before reaching this point.
pub(crate) fn convert_value(v: f64, from: Unit, to: Unit) -> f64 {
    debug_assert_eq!(from.dimension(), to.dimension());
    to.from_base(from.to_base(v))
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
