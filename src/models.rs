use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::FeatureVector;

/// Lap telemetry posted to `/predict`
///
/// Every field is optional; `null` is treated the same as a missing key.
/// Unrecognised keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LapFeatures {
    #[serde(rename = "TyreLife")]
    pub tyre_life: Option<f64>,
    #[serde(rename = "LapTime_label")]
    pub lap_time_label: Option<f64>,
    #[serde(rename = "Compound_label")]
    pub compound_label: Option<f64>,
    #[serde(rename = "PitInTime_label")]
    pub pit_in_time_label: Option<f64>,
    #[serde(rename = "TrackTemp")]
    pub track_temp: Option<f64>,
    #[serde(rename = "Humidity")]
    pub humidity: Option<f64>,
    #[serde(rename = "Rainfall_encoded")]
    pub rainfall_encoded: Option<f64>,
    #[serde(rename = "AirTemp")]
    pub air_temp: Option<f64>,
    #[serde(rename = "Sector3Time_label")]
    pub sector3_time_label: Option<f64>,
    #[serde(rename = "LapNumber")]
    pub lap_number: Option<f64>,
    #[serde(rename = "Sector2Time_label")]
    pub sector2_time_label: Option<f64>,
    #[serde(rename = "Sector1Time_label")]
    pub sector1_time_label: Option<f64>,
    #[serde(rename = "Position")]
    pub position: Option<f64>,
    #[serde(rename = "PitOutTime_label")]
    pub pit_out_time_label: Option<f64>,
    #[serde(rename = "FreshTyre_encoded")]
    pub fresh_tyre_encoded: Option<f64>,
}

impl LapFeatures {
    /// Parse a request body, which must be a JSON object
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Convert to model input, order matches `features::FEATURES`
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::from_optional([
            self.tyre_life,
            self.lap_time_label,
            self.compound_label,
            self.pit_in_time_label,
            self.track_temp,
            self.humidity,
            self.rainfall_encoded,
            self.air_temp,
            self.sector3_time_label,
            self.lap_number,
            self.sector2_time_label,
            self.sector1_time_label,
            self.position,
            self.pit_out_time_label,
            self.fresh_tyre_encoded,
        ])
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Pit stop prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitStopPrediction {
    /// 1 if the driver is expected to pit, otherwise 0
    pub pit_stop_prediction: u8,
    /// Laps until the stop; always 0 when no stop is predicted
    pub lap_time_prediction: u32,
}

impl PitStopPrediction {
    pub fn no_stop() -> Self {
        Self {
            pit_stop_prediction: 0,
            lap_time_prediction: 0,
        }
    }

    pub fn stop_in(laps: u32) -> Self {
        Self {
            pit_stop_prediction: 1,
            lap_time_prediction: laps,
        }
    }
}

/// Root endpoint greeting
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
