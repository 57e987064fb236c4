//! Reference evapotranspiration (ET0) from daily temperature and solar
//! radiation, using a Hargreaves-style simplification.

/// Estimate ET0 in mm/day.
///
/// `temperature_c` is the daily mean air temperature in degrees C and
/// `solar_radiation` the all-sky shortwave irradiance in MJ/m2/day.
/// Callers must screen out sentinel values first; solar radiation must be
/// non-negative or the square root is undefined.
pub fn estimate(temperature_c: f64, solar_radiation: f64) -> f64 {
    0.0023 * (temperature_c + 17.8) * (solar_radiation * 0.408).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_known_value() {
        // 30C and 20 MJ/m2/day: 0.0023 * 47.8 * sqrt(8.16)
        let et0 = estimate(30.0, 20.0);
        assert!((et0 - 0.0023 * 47.8 * 8.16_f64.sqrt()).abs() < 1e-12);
        assert!((et0 - 0.314).abs() < 0.001);
    }

    #[test]
    fn test_estimate_monotonic_in_temperature() {
        let lo = estimate(10.0, 15.0);
        let mid = estimate(20.0, 15.0);
        let hi = estimate(35.0, 15.0);
        assert!(lo < mid && mid < hi);
    }

    #[test]
    fn test_estimate_monotonic_in_radiation() {
        let lo = estimate(25.0, 5.0);
        let mid = estimate(25.0, 15.0);
        let hi = estimate(25.0, 25.0);
        assert!(lo < mid && mid < hi);
    }

    #[test]
    fn test_estimate_zero_radiation() {
        assert_eq!(estimate(25.0, 0.0), 0.0);
    }
}
