use crate::data::log::FlowDirection;
use crate::error::{Result, ThermoLogError};
use crate::props::moist_air;
use crate::props::r410a::{self, Phase};
use crate::quantity::{Property, Quantity, Unit};

/// A fixed formula producing a named quantity from raw channels, used
/// when the identifier has no column in the file. Every input of
/// every rule is itself a raw channel, so derivation never recurses
/// more than one level.
pub struct DerivationRule {
    pub identifier: &'static str,
    pub label: &'static str,
    pub symbol: &'static str,
    formula: Formula,
}

enum Formula {
    /// Mass flow times enthalpy difference between two refrigerant
    /// states, with the measurement points depending on the flow
    /// direction.
    HeatBalance(Balance),
    /// Sum of the two phase powers feeding the unit.
    PhaseSum,
    /// Humidity ratio of an air stream from dry-bulb temperature and
    /// relative humidity.
    HumidityRatio { temp: &'static str, rh: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Balance {
    Condenser,
    Evaporator,
    Compressor,
    EvaporatorLineLoss,
}

/// Pressure/temperature identifiers describing the refrigerant state
/// at the inlet and outlet of a balance envelope.
struct BalancePoints {
    p_in: &'static str,
    t_in: &'static str,
    p_out: &'static str,
    t_out: &'static str,
}

impl Balance {
    /// Measurement points per circuit direction. The condenser outlet
    /// state doubles as the evaporator inlet state: the expansion
    /// valve between them is isenthalpic.
    fn points(self, direction: FlowDirection) -> Option<BalancePoints> {
        use FlowDirection::{Forward, Reversed};
        let (p_in, t_in, p_out, t_out) = match (self, direction) {
            (Balance::Condenser, Forward) => ("pout", "T4", "pout", "T6"),
            (Balance::Condenser, Reversed) => ("pout", "T9", "pout", "T7"),
            (Balance::Evaporator, Forward) => ("pout", "T6", "pin", "T9"),
            (Balance::Evaporator, Reversed) => ("pout", "T7", "pin", "T4"),
            (Balance::Compressor, _) => ("pin", "T1", "pout", "T2"),
            (Balance::EvaporatorLineLoss, Reversed) => ("pin", "T4", "pin", "T1"),
            (Balance::EvaporatorLineLoss, Forward) => return None,
        };
        Some(BalancePoints {
            p_in,
            t_in,
            p_out,
            t_out,
        })
    }

    /// Phase the refrigerant must have at each point. Logged states
    /// can sit on the wrong side of the saturation line when a sensor
    /// reads a degree off near the dome; the enthalpy lookup then
    /// falls back to the saturated value.
    fn expected_phases(self) -> (Phase, Phase) {
        match self {
            Balance::Condenser => (Phase::Gas, Phase::Liquid),
            Balance::Evaporator => (Phase::Liquid, Phase::Gas),
            Balance::Compressor => (Phase::Gas, Phase::Gas),
            Balance::EvaporatorLineLoss => (Phase::Gas, Phase::Gas),
        }
    }

    /// Released heat is reported positive, so the condenser balance
    /// flips its sign.
    fn sign(self) -> f64 {
        match self {
            Balance::Condenser => -1.0,
            _ => 1.0,
        }
    }

    fn property(self) -> Property {
        match self {
            Balance::Compressor => Property::MechanicalPower,
            _ => Property::HeatTransferRate,
        }
    }
}

const RULES: [DerivationRule; 7] = [
    DerivationRule {
        identifier: "Qcond",
        label: "condenser heat output",
        symbol: "Q\u{0307}_cond",
        formula: Formula::HeatBalance(Balance::Condenser),
    },
    DerivationRule {
        identifier: "Qev",
        label: "evaporator heat input",
        symbol: "Q\u{0307}_ev",
        formula: Formula::HeatBalance(Balance::Evaporator),
    },
    DerivationRule {
        identifier: "Pcomp",
        label: "compressor power",
        symbol: "P_comp",
        formula: Formula::HeatBalance(Balance::Compressor),
    },
    DerivationRule {
        identifier: "Qloss_ev",
        label: "evaporator line heat loss",
        symbol: "Q\u{0307}_loss,ev",
        formula: Formula::HeatBalance(Balance::EvaporatorLineLoss),
    },
    DerivationRule {
        identifier: "Pel",
        label: "electrical power input",
        symbol: "P_el",
        formula: Formula::PhaseSum,
    },
    DerivationRule {
        identifier: "ws",
        label: "supply air humidity ratio",
        symbol: "\u{03C9}_s",
        formula: Formula::HumidityRatio {
            temp: "Ts",
            rh: "RHs",
        },
    },
    DerivationRule {
        identifier: "wr",
        label: "return air humidity ratio",
        symbol: "\u{03C9}_r",
        formula: Formula::HumidityRatio {
            temp: "Tr",
            rh: "RHr",
        },
    },
];

/// The rule producing `identifier`, if one exists.
pub fn rule_for(identifier: &str) -> Option<&'static DerivationRule> {
    RULES.iter().find(|r| r.identifier == identifier)
}

/// Identifiers covered by a rule, in declaration order.
pub fn derived_identifiers() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|r| r.identifier)
}

impl DerivationRule {
    /// Input identifiers to resolve, in the order `compute` expects
    /// them. `None` when the rule does not apply to this circuit
    /// direction.
    pub fn input_identifiers(&self, direction: FlowDirection) -> Option<Vec<&'static str>> {
        match &self.formula {
            Formula::HeatBalance(balance) => {
                let p = balance.points(direction)?;
                Some(vec!["flowrt_r", p.p_in, p.t_in, p.p_out, p.t_out])
            }
            Formula::PhaseSum => Some(vec!["Pa", "Pb"]),
            Formula::HumidityRatio { temp, rh } => Some(vec![temp, rh]),
        }
    }

    /// Union of the inputs over both circuit directions, for
    /// missing-channel reporting.
    pub fn required_identifiers(&self) -> Vec<&'static str> {
        let mut union: Vec<&'static str> = Vec::new();
        for direction in [FlowDirection::Forward, FlowDirection::Reversed] {
            if let Some(inputs) = self.input_identifiers(direction) {
                for id in inputs {
                    if !union.contains(&id) {
                        union.push(id);
                    }
                }
            }
        }
        union
    }

    /// Apply the formula to inputs resolved in `input_identifiers`
    /// order. Samples whose state falls outside the property tables
    /// become NaN rather than failing the whole series.
    pub fn compute(&self, inputs: &[Quantity]) -> Result<Quantity> {
        match &self.formula {
            Formula::HeatBalance(balance) => self.heat_balance(*balance, inputs),
            Formula::PhaseSum => {
                let sum = inputs[0].try_add(&inputs[1])?;
                let sum = sum.convert_to(Unit::Kilowatt)?;
                Ok(Quantity::new(
                    self.identifier,
                    self.label,
                    self.symbol,
                    Property::ElectricalPower,
                    sum.unit,
                    sum.values,
                ))
            }
            Formula::HumidityRatio { .. } => {
                let temp = inputs[0].clone().convert_to(Unit::Celsius)?;
                let rh = inputs[1].clone().convert_to(Unit::Percent)?;
                let values = temp
                    .values
                    .iter()
                    .zip(rh.values.iter())
                    .map(|(&t, &phi)| {
                        if t.is_finite() && phi.is_finite() {
                            moist_air::humidity_ratio(t, phi, moist_air::ATMOSPHERIC_KPA) * 1000.0
                        } else {
                            f64::NAN
                        }
                    })
                    .collect();
                Ok(Quantity::new(
                    self.identifier,
                    self.label,
                    self.symbol,
                    Property::AbsoluteHumidity,
                    Unit::GramPerKilogram,
                    values,
                ))
            }
        }
    }

    fn heat_balance(&self, balance: Balance, inputs: &[Quantity]) -> Result<Quantity> {
        let flow = inputs[0].clone().convert_to(Unit::KilogramPerSecond)?;
        let p_in = inputs[1].clone().convert_to(Unit::Kilopascal)?;
        let t_in = inputs[2].clone().convert_to(Unit::Celsius)?;
        let p_out = inputs[3].clone().convert_to(Unit::Kilopascal)?;
        let t_out = inputs[4].clone().convert_to(Unit::Celsius)?;

        let (phase_in, phase_out) = balance.expected_phases();
        let sign = balance.sign();

        // kg/s times kJ/kg gives kW directly.
        let values = (0..flow.len())
            .map(|i| {
                let h_in = r410a::enthalpy_expecting(p_in.values[i], t_in.values[i], phase_in);
                let h_out = r410a::enthalpy_expecting(p_out.values[i], t_out.values[i], phase_out);
                match (h_in, h_out) {
                    (Ok(h_in), Ok(h_out)) => flow.values[i] * (h_out - h_in) * sign,
                    _ => f64::NAN,
                }
            })
            .collect();

        Ok(Quantity::new(
            self.identifier,
            self.label,
            self.symbol,
            balance.property(),
            Unit::Kilowatt,
            values,
        ))
    }
}

impl ThermoLogError {
    /// Shared message for rules that exist but do not apply to the
    /// file's circuit direction.
    pub(crate) fn rule_not_applicable(name: &str) -> Self {
        ThermoLogError::unresolvable(name, "not defined for this flow direction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_input_is_a_raw_channel() {
        // Keeps the derivation a single-level computation: no rule may
        // name another rule's output as an input.
        for rule in &RULES {
            for input in rule.required_identifiers() {
                assert!(
                    rule_for(input).is_none(),
                    "rule '{}' depends on derived '{}'",
                    rule.identifier,
                    input
                );
            }
        }
    }

    #[test]
    fn balance_points_follow_the_circuit_direction() {
        let p = Balance::Condenser.points(FlowDirection::Forward).unwrap();
        assert_eq!((p.p_in, p.t_in, p.p_out, p.t_out), ("pout", "T4", "pout", "T6"));
        let p = Balance::Condenser.points(FlowDirection::Reversed).unwrap();
        assert_eq!((p.p_in, p.t_in, p.p_out, p.t_out), ("pout", "T9", "pout", "T7"));
        let p = Balance::Evaporator.points(FlowDirection::Forward).unwrap();
        assert_eq!((p.p_in, p.t_in, p.p_out, p.t_out), ("pout", "T6", "pin", "T9"));
    }

    #[test]
    fn line_loss_is_undefined_in_forward_flow() {
        assert!(Balance::EvaporatorLineLoss
            .points(FlowDirection::Forward)
            .is_none());
        assert!(Balance::EvaporatorLineLoss
            .points(FlowDirection::Reversed)
            .is_some());
    }

    #[test]
    fn compressor_points_are_direction_independent() {
        for direction in [FlowDirection::Forward, FlowDirection::Reversed] {
            let p = Balance::Compressor.points(direction).unwrap();
            assert_eq!((p.p_in, p.t_in, p.p_out, p.t_out), ("pin", "T1", "pout", "T2"));
        }
    }

    #[test]
    fn condenser_balance_reports_released_heat_positive() {
        let rule = rule_for("Qcond").unwrap();
        // Discharge gas at 30 K superheat entering, subcooled liquid
        // leaving; enthalpy drops through the condenser, the sign flip
        // makes the output positive.
        let inputs = vec![
            Quantity::new(
                "flowrt_r",
                "flow",
                "m",
                Property::FlowRate,
                Unit::KilogramPerSecond,
                vec![0.02],
            ),
            Quantity::new("pout", "p", "p", Property::Pressure, Unit::Kilopascal, vec![2418.4]),
            Quantity::new("T4", "T", "T", Property::Temperature, Unit::Celsius, vec![70.0]),
            Quantity::new("pout", "p", "p", Property::Pressure, Unit::Kilopascal, vec![2418.4]),
            Quantity::new("T6", "T", "T", Property::Temperature, Unit::Celsius, vec![35.0]),
        ];
        let q = rule.compute(&inputs).unwrap();
        assert_eq!(q.unit, Unit::Kilowatt);
        assert_eq!(q.property, Property::HeatTransferRate);
        assert!(q.values[0] > 0.0, "released heat should be positive, got {}", q.values[0]);
    }

    #[test]
    fn phase_sum_reports_kilowatts() {
        let rule = rule_for("Pel").unwrap();
        let inputs = vec![
            Quantity::new("Pa", "a", "a", Property::ElectricalPower, Unit::Watt, vec![1200.0]),
            Quantity::new("Pb", "b", "b", Property::ElectricalPower, Unit::Watt, vec![800.0]),
        ];
        let q = rule.compute(&inputs).unwrap();
        assert_eq!(q.unit, Unit::Kilowatt);
        assert_eq!(q.values, vec![2.0]);
        assert_eq!(q.identifier, "Pel");
    }

    #[test]
    fn humidity_rule_reports_grams_per_kilogram() {
        let rule = rule_for("ws").unwrap();
        let inputs = vec![
            Quantity::new("Ts", "T", "T", Property::Temperature, Unit::Celsius, vec![25.0]),
            Quantity::new("RHs", "rh", "rh", Property::RelativeHumidity, Unit::Percent, vec![50.0]),
        ];
        let q = rule.compute(&inputs).unwrap();
        assert_eq!(q.unit, Unit::GramPerKilogram);
        assert!((q.values[0] - 9.9).abs() < 0.3);
    }

    #[test]
    fn out_of_range_states_become_nan_samples() {
        let rule = rule_for("Pcomp").unwrap();
        let inputs = vec![
            Quantity::new(
                "flowrt_r",
                "flow",
                "m",
                Property::FlowRate,
                Unit::KilogramPerSecond,
                vec![0.02, 0.02],
            ),
            Quantity::new(
                "pin",
                "p",
                "p",
                Property::Pressure,
                Unit::Kilopascal,
                vec![800.0, 10.0],
            ),
            Quantity::new("T1", "T", "T", Property::Temperature, Unit::Celsius, vec![5.0, 5.0]),
            Quantity::new(
                "pout",
                "p",
                "p",
                Property::Pressure,
                Unit::Kilopascal,
                vec![2400.0, 2400.0],
            ),
            Quantity::new("T2", "T", "T", Property::Temperature, Unit::Celsius, vec![75.0, 75.0]),
        ];
        let q = rule.compute(&inputs).unwrap();
        assert!(q.values[0].is_finite());
        assert!(q.values[1].is_nan());
    }
}
