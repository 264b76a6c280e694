//! Feature construction for energy consumption inference
//!
//! Builds the full named feature set from a sparse request: time defaults
//! from the current instant, cyclical encodings, daypart indicators, and the
//! interaction/polynomial terms the trained model was fitted on.

use crate::error::PredictError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::{Map, Value};
use std::f64::consts::TAU;

/// Denominator floor for ratio features
pub const EPSILON: f64 = 1e-8;

/// Number of features produced per request
pub const NUM_FEATURES: usize = 45;

const DEFAULT_TEMPERATURE: f64 = 25.0;
const DEFAULT_HUMIDITY: f64 = 60.0;
const DEFAULT_SQUARE_FOOTAGE: f64 = 1000.0;
const DEFAULT_OCCUPANCY: f64 = 5.0;
const DEFAULT_RENEWABLE_ENERGY: f64 = 10.0;
const DEFAULT_CONSUMPTION_HINT: f64 = 50.0;

/// Named feature values in insertion order
///
/// Always fully populated before vector assembly; the persisted schema
/// decides which entries end up in the vector and in what order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    entries: Vec<(&'static str, f64)>,
}

impl FeatureSet {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, name: &'static str, value: f64) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Coerce an optional numeric request field
///
/// Accepts numbers, booleans (1/0), and numeric strings. JSON null counts as
/// absent. Anything else is a `FeatureError` and rejects the request.
fn numeric(data: &Map<String, Value>, key: &str, default: f64) -> Result<f64, PredictError> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| PredictError::feature(key, "number is not representable as f64")),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| PredictError::feature(key, format!("cannot parse '{}' as a number", s))),
        Some(other) => Err(PredictError::feature(
            key,
            format!("expected a number, got {}", type_name(other)),
        )),
    }
}

/// Coerce an optional flag request field, defaulting to false
fn flag(data: &Map<String, Value>, key: &str) -> Result<bool, PredictError> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            _ => Err(PredictError::feature(
                key,
                format!("cannot interpret '{}' as a flag", s),
            )),
        },
        Some(other) => Err(PredictError::feature(
            key,
            format!("expected a flag, got {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn as_indicator(active: bool) -> f64 {
    if active {
        1.0
    } else {
        0.0
    }
}

/// Build the full feature set from a request
///
/// Deterministic given the request and `now`; the caller passes the current
/// instant so defaults stay reproducible under test.
pub fn build_features(
    data: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<FeatureSet, PredictError> {
    // Time fields: out-of-range inputs are clamped, never rejected
    let hour = numeric(data, "hour", f64::from(now.hour()))?
        .trunc()
        .clamp(0.0, 23.0);
    let day_of_week = numeric(
        data,
        "dayOfWeek",
        f64::from(now.weekday().num_days_from_monday()),
    )?
    .trunc()
    .clamp(0.0, 6.0);
    let month = numeric(data, "month", f64::from(now.month()))?
        .trunc()
        .clamp(1.0, 12.0);
    let day_of_year = numeric(data, "dayOfYear", f64::from(now.ordinal()))?;
    let week_of_year = numeric(data, "weekOfYear", f64::from(now.iso_week().week()))?;
    let day_of_month = numeric(data, "dayOfMonth", f64::from(now.day()))?;
    let quarter = ((month - 1.0) / 3.0).floor() + 1.0;

    let temperature = numeric(data, "temperature", DEFAULT_TEMPERATURE)?;
    let humidity = numeric(data, "humidity", DEFAULT_HUMIDITY)?;
    let square_footage = numeric(data, "squareFootage", DEFAULT_SQUARE_FOOTAGE)?;
    let occupancy = numeric(data, "occupancy", DEFAULT_OCCUPANCY)?;
    let renewable_energy = numeric(data, "renewableEnergy", DEFAULT_RENEWABLE_ENERGY)?;
    let consumption_hint = numeric(data, "energyConsumption", DEFAULT_CONSUMPTION_HINT)?;

    let hvac = as_indicator(flag(data, "hvacUsage")?);
    let lighting = as_indicator(flag(data, "lightingUsage")?);
    let holiday = as_indicator(flag(data, "isHoliday")?);

    let mut features = FeatureSet::with_capacity(NUM_FEATURES);

    features.push("Hour", hour);
    features.push("DayOfWeek", day_of_week);
    features.push("Month", month);
    features.push("Quarter", quarter);
    features.push("DayOfYear", day_of_year);
    features.push("WeekOfYear", week_of_year);
    features.push("DayOfMonth", day_of_month);

    // Cyclical encodings avoid the discontinuity at each period boundary
    features.push("Hour_sin", (TAU * hour / 24.0).sin());
    features.push("Hour_cos", (TAU * hour / 24.0).cos());
    features.push("DayOfWeek_sin", (TAU * day_of_week / 7.0).sin());
    features.push("DayOfWeek_cos", (TAU * day_of_week / 7.0).cos());
    features.push("Month_sin", (TAU * month / 12.0).sin());
    features.push("Month_cos", (TAU * month / 12.0).cos());
    features.push("DayOfYear_sin", (TAU * day_of_year / 365.0).sin());
    features.push("DayOfYear_cos", (TAU * day_of_year / 365.0).cos());

    // Daypart windows are inclusive and overlap at the boundaries (hour 18
    // is both afternoon and evening)
    features.push("IsWeekend", as_indicator(day_of_week >= 5.0));
    features.push(
        "IsPeakHour",
        as_indicator((7.0..=9.0).contains(&hour) || (17.0..=19.0).contains(&hour)),
    );
    features.push("IsBusinessHour", as_indicator((8.0..=18.0).contains(&hour)));
    features.push("IsNight", as_indicator(hour >= 22.0 || hour <= 6.0));
    features.push("IsMorning", as_indicator((6.0..=12.0).contains(&hour)));
    features.push("IsAfternoon", as_indicator((12.0..=18.0).contains(&hour)));
    features.push("IsEvening", as_indicator((18.0..=22.0).contains(&hour)));

    features.push("Temperature", temperature);
    features.push("Humidity", humidity);
    features.push("SquareFootage", square_footage);
    features.push("Occupancy", occupancy);
    features.push("HVACUsage", hvac);
    features.push("LightingUsage", lighting);
    features.push("Holiday", holiday);
    features.push("RenewableEnergy", renewable_energy);

    features.push("TempHumidity", temperature * humidity);
    features.push("TempSquared", temperature.powi(2));
    features.push("HumiditySquared", humidity.powi(2));
    features.push("TempCubed", temperature.powi(3));
    features.push("HumidityCubed", humidity.powi(3));
    features.push("HVAC_Temp", hvac * temperature);
    features.push("Lighting_Hour", lighting * hour);
    features.push("Occupancy_SqFt", occupancy / square_footage.max(EPSILON));
    features.push(
        "EnergyEfficiency",
        renewable_energy / consumption_hint.max(EPSILON),
    );
    features.push("OccupancyDensity", occupancy / square_footage.max(EPSILON));
    features.push("TempHumidityRatio", temperature / humidity.max(EPSILON));

    features.push("TotalUsage", hvac + lighting);
    features.push("UsageIntensity", (hvac + lighting) * occupancy);
    features.push("EnvironmentalStress", temperature * humidity * occupancy);
    features.push(
        "BuildingEfficiency",
        square_footage / consumption_hint.max(EPSILON),
    );

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn request(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test request is an object")
    }

    fn fixed_now() -> DateTime<Utc> {
        // Wednesday 2024-06-12 14:30 UTC
        Utc.with_ymd_and_hms(2024, 6, 12, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_cyclical_encoding_on_unit_circle() {
        for hour in 0..24 {
            let data = request(json!({ "hour": hour }));
            let f = build_features(&data, fixed_now()).unwrap();
            let sin = f.get("Hour_sin").unwrap();
            let cos = f.get("Hour_cos").unwrap();
            assert!(
                (sin * sin + cos * cos - 1.0).abs() < 1e-9,
                "hour {} off the unit circle",
                hour
            );
        }
    }

    #[test]
    fn test_empty_request_uses_defaults() {
        let f = build_features(&Map::new(), fixed_now()).unwrap();
        assert_eq!(f.len(), NUM_FEATURES);
        assert_eq!(f.get("Hour"), Some(14.0));
        assert_eq!(f.get("DayOfWeek"), Some(2.0));
        assert_eq!(f.get("Month"), Some(6.0));
        assert_eq!(f.get("DayOfYear"), Some(164.0));
        assert_eq!(f.get("DayOfMonth"), Some(12.0));
        assert_eq!(f.get("Temperature"), Some(25.0));
        assert_eq!(f.get("Humidity"), Some(60.0));
        assert_eq!(f.get("SquareFootage"), Some(1000.0));
        assert_eq!(f.get("Occupancy"), Some(5.0));
        assert_eq!(f.get("RenewableEnergy"), Some(10.0));
        assert_eq!(f.get("HVACUsage"), Some(0.0));
        assert_eq!(f.get("LightingUsage"), Some(0.0));
        assert_eq!(f.get("Holiday"), Some(0.0));
    }

    #[test]
    fn test_out_of_range_time_fields_clamped() {
        let data = request(json!({ "hour": 42, "dayOfWeek": -3, "month": 0 }));
        let f = build_features(&data, fixed_now()).unwrap();
        assert_eq!(f.get("Hour"), Some(23.0));
        assert_eq!(f.get("DayOfWeek"), Some(0.0));
        assert_eq!(f.get("Month"), Some(1.0));
    }

    #[test]
    fn test_quarter_from_month() {
        for (month, quarter) in [(1, 1.0), (3, 1.0), (4, 2.0), (6, 2.0), (9, 3.0), (12, 4.0)] {
            let data = request(json!({ "month": month }));
            let f = build_features(&data, fixed_now()).unwrap();
            assert_eq!(f.get("Quarter"), Some(quarter), "month {}", month);
        }
    }

    #[test]
    fn test_daypart_windows_overlap_at_18() {
        let data = request(json!({ "hour": 18 }));
        let f = build_features(&data, fixed_now()).unwrap();
        assert_eq!(f.get("IsAfternoon"), Some(1.0));
        assert_eq!(f.get("IsEvening"), Some(1.0));
        assert_eq!(f.get("IsBusinessHour"), Some(1.0));
        assert_eq!(f.get("IsPeakHour"), Some(1.0));
        assert_eq!(f.get("IsNight"), Some(0.0));
    }

    #[test]
    fn test_weekend_indicator() {
        for (dow, weekend) in [(4, 0.0), (5, 1.0), (6, 1.0)] {
            let data = request(json!({ "dayOfWeek": dow }));
            let f = build_features(&data, fixed_now()).unwrap();
            assert_eq!(f.get("IsWeekend"), Some(weekend), "dayOfWeek {}", dow);
        }
    }

    #[test]
    fn test_zero_square_footage_stays_finite() {
        let data = request(json!({ "squareFootage": 0.0, "occupancy": 5.0 }));
        let f = build_features(&data, fixed_now()).unwrap();
        let density = f.get("Occupancy_SqFt").unwrap();
        assert!(density.is_finite());
        assert_eq!(f.get("OccupancyDensity"), Some(density));
    }

    #[test]
    fn test_interaction_terms() {
        let data = request(json!({
            "temperature": 30.0,
            "humidity": 50.0,
            "occupancy": 4.0,
            "hvacUsage": true,
            "lightingUsage": true,
            "hour": 10
        }));
        let f = build_features(&data, fixed_now()).unwrap();
        assert_eq!(f.get("TempHumidity"), Some(1500.0));
        assert_eq!(f.get("TempCubed"), Some(27000.0));
        assert_eq!(f.get("HVAC_Temp"), Some(30.0));
        assert_eq!(f.get("Lighting_Hour"), Some(10.0));
        assert_eq!(f.get("TotalUsage"), Some(2.0));
        assert_eq!(f.get("UsageIntensity"), Some(8.0));
        assert_eq!(f.get("EnvironmentalStress"), Some(6000.0));
    }

    #[test]
    fn test_numeric_string_coercion() {
        let data = request(json!({ "temperature": "21.5", "occupancy": "3" }));
        let f = build_features(&data, fixed_now()).unwrap();
        assert_eq!(f.get("Temperature"), Some(21.5));
        assert_eq!(f.get("Occupancy"), Some(3.0));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let data = request(json!({ "temperature": "balmy" }));
        let err = build_features(&data, fixed_now()).unwrap_err();
        assert!(matches!(err, PredictError::Feature { ref field, .. } if field == "temperature"));
    }

    #[test]
    fn test_array_value_rejected() {
        let data = request(json!({ "humidity": [60.0] }));
        assert!(build_features(&data, fixed_now()).is_err());
    }

    #[test]
    fn test_null_treated_as_absent() {
        let data = request(json!({ "temperature": null, "hvacUsage": null }));
        let f = build_features(&data, fixed_now()).unwrap();
        assert_eq!(f.get("Temperature"), Some(25.0));
        assert_eq!(f.get("HVACUsage"), Some(0.0));
    }

    #[test]
    fn test_truthy_flag_coercion() {
        let data = request(json!({ "hvacUsage": 1, "lightingUsage": "true", "isHoliday": 0 }));
        let f = build_features(&data, fixed_now()).unwrap();
        assert_eq!(f.get("HVACUsage"), Some(1.0));
        assert_eq!(f.get("LightingUsage"), Some(1.0));
        assert_eq!(f.get("Holiday"), Some(0.0));
    }

    #[test]
    fn test_deterministic_given_request_and_instant() {
        let data = request(json!({ "hour": 9, "temperature": 22.0 }));
        let a = build_features(&data, fixed_now()).unwrap();
        let b = build_features(&data, fixed_now()).unwrap();
        assert_eq!(a, b);
    }
}
