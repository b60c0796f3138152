//! Moist-air psychrometrics for the supply/return air humidity
//! channels. Tetens saturation pressure plus the 0.622 molar-mass
//! ratio; adequate between 0 and 50 \u{00B0}C.

/// Standard atmospheric pressure, kPa. Air-side sensors on the rig
/// are not pressure-compensated, so humidity ratios are evaluated
/// here.
pub const ATMOSPHERIC_KPA: f64 = 101.325;

/// Saturation pressure of water vapor over liquid water, kPa
/// (Tetens).
pub fn water_saturation_pressure_kpa(t_c: f64) -> f64 {
    0.61078 * ((17.27 * t_c) / (t_c + 237.3)).exp()
}

/// Humidity ratio (kg water / kg dry air) from dry-bulb temperature
/// and relative humidity at the given total pressure.
pub fn humidity_ratio(dry_bulb_c: f64, relative_humidity_pct: f64, pressure_kpa: f64) -> f64 {
    let pws = water_saturation_pressure_kpa(dry_bulb_c);
    let pv = (relative_humidity_pct / 100.0) * pws;
    0.622 * pv / (pressure_kpa - pv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_pressure_at_reference_points() {
        // Tetens at 0 degC is the 0.61078 kPa anchor itself.
        assert!((water_saturation_pressure_kpa(0.0) - 0.61078).abs() < 1e-6);
        // Near-boiling check: about 101 kPa at 100 degC.
        let p100 = water_saturation_pressure_kpa(100.0);
        assert!((95.0..108.0).contains(&p100));
    }

    #[test]
    fn humidity_ratio_at_room_conditions() {
        // 25 degC, 50 % RH, 1 atm is about 9.9 g/kg.
        let w = humidity_ratio(25.0, 50.0, ATMOSPHERIC_KPA);
        assert!((w * 1000.0 - 9.9).abs() < 0.3, "got {} g/kg", w * 1000.0);
    }

    #[test]
    fn humidity_ratio_grows_with_rh_and_temperature() {
        let base = humidity_ratio(20.0, 40.0, ATMOSPHERIC_KPA);
        assert!(humidity_ratio(20.0, 60.0, ATMOSPHERIC_KPA) > base);
        assert!(humidity_ratio(30.0, 40.0, ATMOSPHERIC_KPA) > base);
    }

    #[test]
    fn dry_air_carries_no_water() {
        assert_eq!(humidity_ratio(20.0, 0.0, ATMOSPHERIC_KPA), 0.0);
    }
}
