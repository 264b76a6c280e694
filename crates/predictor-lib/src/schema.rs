//! Feature schema and vector assembly
//!
//! The persisted schema names every column the model expects, in order. The
//! assembled vector always has exactly `schema.len()` entries regardless of
//! which request fields were supplied — this ordering contract is what the
//! trained model depends on.

use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};

/// Canonical column order used when no schema artifact is persisted
pub const DEFAULT_FEATURE_COLUMNS: [&str; 45] = [
    "Hour",
    "Month",
    "Quarter",
    "DayOfYear",
    "WeekOfYear",
    "DayOfMonth",
    "DayOfWeek",
    "Hour_sin",
    "Hour_cos",
    "DayOfWeek_sin",
    "DayOfWeek_cos",
    "Month_sin",
    "Month_cos",
    "DayOfYear_sin",
    "DayOfYear_cos",
    "IsWeekend",
    "IsPeakHour",
    "IsBusinessHour",
    "IsNight",
    "IsMorning",
    "IsAfternoon",
    "IsEvening",
    "Temperature",
    "Humidity",
    "SquareFootage",
    "Occupancy",
    "HVACUsage",
    "LightingUsage",
    "Holiday",
    "RenewableEnergy",
    "TempHumidity",
    "TempSquared",
    "HumiditySquared",
    "TempCubed",
    "HumidityCubed",
    "HVAC_Temp",
    "Lighting_Hour",
    "Occupancy_SqFt",
    "EnergyEfficiency",
    "OccupancyDensity",
    "TempHumidityRatio",
    "TotalUsage",
    "UsageIntensity",
    "EnvironmentalStress",
    "BuildingEfficiency",
];

/// Ordered list of the columns the model expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            columns: DEFAULT_FEATURE_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Order a feature set into the schema's fixed-length numeric vector
///
/// Schema columns with no matching feature become 0.0; feature entries not
/// named by the schema are dropped.
pub fn assemble(features: &FeatureSet, schema: &FeatureSchema) -> Vec<f64> {
    schema
        .columns()
        .iter()
        .map(|column| features.get(column).unwrap_or(0.0))
        .collect()
}
