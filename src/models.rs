use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of weather from the provider, mapped onto the canonical
/// schema. A field is `None` when the provider omitted it or sent its
/// missing-value sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherObservation {
    /// Mean air temperature at 2m, degrees C
    pub temperature_c: Option<f64>,
    /// Total precipitation, mm/day
    pub precipitation_mm: Option<f64>,
    /// All-sky surface shortwave downward irradiance, MJ/m2/day
    pub solar_radiation: Option<f64>,
}

impl WeatherObservation {
    /// Returns (temperature, precipitation, solar radiation) only when all
    /// three measurements are present and physically plausible. A date
    /// missing any of them, carrying a non-finite value, or reporting
    /// negative solar radiation is excluded from advice computation; the
    /// ET0 estimator takes a square root of the radiation and must never
    /// see a negative input.
    pub fn complete(&self) -> Option<(f64, f64, f64)> {
        match (self.temperature_c, self.precipitation_mm, self.solar_radiation) {
            (Some(t), Some(p), Some(r))
                if t.is_finite() && p.is_finite() && r.is_finite() && r >= 0.0 =>
            {
                Some((t, p, r))
            }
            _ => None,
        }
    }
}

/// Request body for `POST /irrigation-advice`
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Field size in hectares
    pub field_size: f64,
    pub planting_date: NaiveDate,
}

/// Today's recommendation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyAdvice {
    pub date: NaiveDate,
    pub irrigate: bool,
    pub amount_liters: f64,
}

/// One day of the weekly outlook
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub expected_rainfall_mm: f64,
    pub irrigation_need_mm: f64,
}

/// Full advisory payload. Built fresh per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct IrrigationAdvisory {
    pub daily_advice: DailyAdvice,
    pub weekly_forecast: Vec<ForecastEntry>,
    pub water_saving_tip: String,
}
