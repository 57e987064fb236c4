use crate::crop;
use crate::error::{AppError, Result};
use crate::et0;
use crate::models::{AdviceRequest, DailyAdvice, ForecastEntry, IrrigationAdvisory};
use crate::provider::WeatherProvider;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

/// Advisory window: today plus seven days ahead
const WINDOW_DAYS: i64 = 8;

/// Converts mm of water depth over one hectare into liters for the given
/// field size. Fixed external contract; do not change.
const MM_HA_TO_LITERS: f64 = 10.0;

const WATER_SAVING_TIPS: [&str; 5] = [
    "Consider mulching your field to reduce water evaporation.",
    "Implement drip irrigation for more efficient water use.",
    "Monitor soil moisture levels regularly to avoid over-irrigation.",
    "Adjust irrigation schedules based on growth stage and weather conditions.",
    "Maintain your irrigation system to prevent leaks and ensure even distribution.",
];

/// Compute the irrigation advisory for `request` over the window starting at
/// `reference_date`.
///
/// Validation happens before the weather fetch; a planting date after the
/// reference date, a non-positive field size, or out-of-range coordinates
/// all reject the request without touching the provider. Dates in the
/// window with an incomplete observation are skipped; if the reference date
/// itself is incomplete the whole request fails rather than defaulting to
/// "no irrigation needed".
pub async fn plan<P: WeatherProvider>(
    request: &AdviceRequest,
    reference_date: NaiveDate,
    provider: &P,
) -> Result<IrrigationAdvisory> {
    validate(request, reference_date)?;

    let end_date = reference_date + Duration::days(WINDOW_DAYS - 1);
    let observations = provider
        .fetch(request.latitude, request.longitude, reference_date, end_date)
        .await?;

    let mut daily_advice = None;
    let mut weekly_forecast = Vec::with_capacity(WINDOW_DAYS as usize);

    for offset in 0..WINDOW_DAYS {
        let date = reference_date + Duration::days(offset);

        let Some((temperature, precipitation, solar_radiation)) =
            observations.get(&date).and_then(|obs| obs.complete())
        else {
            warn!("Skipping {}: observation missing or incomplete", date);
            continue;
        };

        let et0 = et0::estimate(temperature, solar_radiation);
        let days_since_planting = (date - request.planting_date).num_days();
        let kc = crop::coefficient(days_since_planting);
        let crop_water_need = et0 * kc;
        let irrigation_need = (crop_water_need - precipitation).max(0.0);
        let irrigation_amount = irrigation_need * request.field_size * MM_HA_TO_LITERS;

        debug!(
            "{}: et0={:.3} kc={:.2} need={:.3}mm",
            date, et0, kc, irrigation_need
        );

        if offset == 0 {
            daily_advice = Some(DailyAdvice {
                date,
                irrigate: irrigation_need > 0.0,
                amount_liters: round2(irrigation_amount),
            });
        }

        weekly_forecast.push(ForecastEntry {
            date,
            expected_rainfall_mm: round2(precipitation),
            irrigation_need_mm: round2(irrigation_need),
        });
    }

    if weekly_forecast.is_empty() {
        return Err(AppError::DataUnavailable(format!(
            "no usable observations between {} and {}",
            reference_date, end_date
        )));
    }

    let daily_advice = daily_advice.ok_or_else(|| {
        AppError::InsufficientData(format!(
            "no valid observation for reference date {}",
            reference_date
        ))
    })?;

    Ok(IrrigationAdvisory {
        daily_advice,
        weekly_forecast,
        water_saving_tip: tip_for(reference_date).to_string(),
    })
}

fn validate(request: &AdviceRequest, reference_date: NaiveDate) -> Result<()> {
    if request.planting_date > reference_date {
        return Err(AppError::InvalidInput(format!(
            "planting_date {} is after reference date {}",
            request.planting_date, reference_date
        )));
    }
    if request.field_size <= 0.0 || !request.field_size.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "field_size must be positive, got {}",
            request.field_size
        )));
    }
    if !(-90.0..=90.0).contains(&request.latitude) {
        return Err(AppError::InvalidInput(format!(
            "latitude {} out of range [-90, 90]",
            request.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&request.longitude) {
        return Err(AppError::InvalidInput(format!(
            "longitude {} out of range [-180, 180]",
            request.longitude
        )));
    }
    Ok(())
}

/// Tip rotation keyed on day of month, so the tip is stable for a given
/// calendar day and cycles daily.
fn tip_for(reference_date: NaiveDate) -> &'static str {
    WATER_SAVING_TIPS[reference_date.day() as usize % WATER_SAVING_TIPS.len()]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_rotation_cycles_every_five_days() {
        let d1 = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        let d6 = NaiveDate::from_ymd_opt(2024, 8, 6).unwrap();

        assert_eq!(tip_for(d1), tip_for(d6));
        assert_ne!(tip_for(d1), tip_for(d2));
    }

    #[test]
    fn test_tip_stable_for_same_day_of_month() {
        let aug = NaiveDate::from_ymd_opt(2024, 8, 13).unwrap();
        let sep = NaiveDate::from_ymd_opt(2024, 9, 13).unwrap();
        assert_eq!(tip_for(aug), tip_for(sep));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.3141), 0.31);
        assert_eq!(round2(5.4962), 5.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_coordinates() {
        let reference = NaiveDate::from_ymd_opt(2024, 8, 22).unwrap();
        let mut request = AdviceRequest {
            latitude: 19.7,
            longitude: 75.7,
            field_size: 5.0,
            planting_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        assert!(validate(&request, reference).is_ok());

        request.latitude = 91.0;
        assert!(matches!(
            validate(&request, reference),
            Err(AppError::InvalidInput(_))
        ));

        request.latitude = 19.7;
        request.longitude = -200.0;
        assert!(matches!(
            validate(&request, reference),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_field_size() {
        let reference = NaiveDate::from_ymd_opt(2024, 8, 22).unwrap();
        let request = AdviceRequest {
            latitude: 19.7,
            longitude: 75.7,
            field_size: 0.0,
            planting_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        assert!(matches!(
            validate(&request, reference),
            Err(AppError::InvalidInput(_))
        ));
    }
}
