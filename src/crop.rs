//! Growth-stage crop coefficients (Kc) for cotton.
//!
//! Four-phase step model keyed on days since planting. Bands are half-open
//! on the upper edge: `[0,30) [30,70) [70,120) [120,inf)`.

/// Kc multiplier for the given crop age in days.
///
/// Negative input is a caller error (advice is never computed for dates
/// before planting); no validation happens here.
pub fn coefficient(days_since_planting: i64) -> f64 {
    if days_since_planting < 30 {
        0.35
    } else if days_since_planting < 70 {
        0.75
    } else if days_since_planting < 120 {
        1.15
    } else {
        0.70
    }
}
