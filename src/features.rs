//! Lap feature vector
//!
//! Fixed 15-field layout shared by the pit classifier and the laps-left regressor.

/// Number of features expected by both models
pub const FEATURE_COUNT: usize = 15;

/// How a missing field is defaulted before inference
///
/// Both kinds default to zero once converted to model input; the split
/// records which fields are integer labels (`0`) and which are continuous
/// readings (`0.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Encoded/label fields, default `0`
    Integer,
    /// Weather readings, default `0.0`
    Continuous,
}

impl FeatureKind {
    pub fn default_value(self) -> f64 {
        match self {
            FeatureKind::Integer => 0.0,
            FeatureKind::Continuous => 0.0,
        }
    }
}

/// Wire names and kinds, in model input order
pub const FEATURES: [(&str, FeatureKind); FEATURE_COUNT] = [
    ("TyreLife", FeatureKind::Integer),
    ("LapTime_label", FeatureKind::Integer),
    ("Compound_label", FeatureKind::Integer),
    ("PitInTime_label", FeatureKind::Integer),
    ("TrackTemp", FeatureKind::Continuous),
    ("Humidity", FeatureKind::Continuous),
    ("Rainfall_encoded", FeatureKind::Continuous),
    ("AirTemp", FeatureKind::Continuous),
    ("Sector3Time_label", FeatureKind::Integer),
    ("LapNumber", FeatureKind::Integer),
    ("Sector2Time_label", FeatureKind::Integer),
    ("Sector1Time_label", FeatureKind::Integer),
    ("Position", FeatureKind::Integer),
    ("PitOutTime_label", FeatureKind::Integer),
    ("FreshTyre_encoded", FeatureKind::Integer),
];

/// Get feature names in model input order
pub fn feature_names() -> Vec<&'static str> {
    FEATURES.iter().map(|(name, _)| *name).collect()
}

/// A single row of model input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build a vector from optional values, filling gaps with each field's default
    pub fn from_optional(values: [Option<f64>; FEATURE_COUNT]) -> Self {
        let mut row = [0.0f64; FEATURE_COUNT];
        for (i, value) in values.iter().enumerate() {
            row[i] = value.unwrap_or_else(|| FEATURES[i].1.default_value());
        }
        Self(row)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a named feature, if the name is recognised
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURES
            .iter()
            .position(|(n, _)| *n == name)
            .map(|idx| self.0[idx])
    }

    /// ONNX models take f32 input
    pub fn to_f32(&self) -> Vec<f32> {
        self.0.iter().map(|&x| x as f32).collect()
    }
}
