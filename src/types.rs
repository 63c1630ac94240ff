//! Core types for the stress prediction pipeline
//!
//! This module defines the data structures that flow through each stage:
//! raw form input, the encoded feature vector, and the prediction output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::encoding::{
    BmiCategory, Categorical, SleepDisorder, GENDER_PLACEHOLDER, OCCUPATION_PLACEHOLDER,
    SLEEP_QUALITY_PLACEHOLDER,
};

/// Number of features the scaler and classifier were fitted on
pub const FEATURE_COUNT: usize = 10;

/// Field order of the feature vector. Must match the order used at training.
pub const FEATURE_ORDER: [Field; FEATURE_COUNT] = [
    Field::Gender,
    Field::Age,
    Field::Occupation,
    Field::SleepDuration,
    Field::SleepQuality,
    Field::PhysicalActivity,
    Field::BmiCategory,
    Field::HeartRate,
    Field::DailySteps,
    Field::SleepDisorder,
];

/// Input fields of the stress form, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Gender,
    Age,
    Occupation,
    SleepDuration,
    PhysicalActivity,
    HeartRate,
    DailySteps,
    SleepQuality,
    BmiCategory,
    SleepDisorder,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; FEATURE_COUNT] = [
        Field::Gender,
        Field::Age,
        Field::Occupation,
        Field::SleepDuration,
        Field::PhysicalActivity,
        Field::HeartRate,
        Field::DailySteps,
        Field::SleepQuality,
        Field::BmiCategory,
        Field::SleepDisorder,
    ];

    /// Selection fields that start at a placeholder
    pub const SELECTIONS: [Field; 3] = [Field::Gender, Field::Occupation, Field::SleepQuality];

    /// Free-text numeric fields
    pub const NUMERIC: [Field; 5] = [
        Field::Age,
        Field::SleepDuration,
        Field::PhysicalActivity,
        Field::HeartRate,
        Field::DailySteps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::Age => "age",
            Field::Occupation => "occupation",
            Field::SleepDuration => "sleep_duration",
            Field::PhysicalActivity => "physical_activity",
            Field::HeartRate => "heart_rate",
            Field::DailySteps => "daily_steps",
            Field::SleepQuality => "sleep_quality",
            Field::BmiCategory => "bmi_category",
            Field::SleepDisorder => "sleep_disorder",
        }
    }

    /// Name shown to the user
    pub fn display_name(&self) -> &'static str {
        match self {
            Field::Gender => "Gender",
            Field::Age => "Age",
            Field::Occupation => "Occupation",
            Field::SleepDuration => "Sleep Duration",
            Field::PhysicalActivity => "Physical Activity Level",
            Field::HeartRate => "Heart Rate",
            Field::DailySteps => "Daily Steps",
            Field::SleepQuality => "Quality of Sleep",
            Field::BmiCategory => "BMI Category",
            Field::SleepDisorder => "Sleep Disorder",
        }
    }

    /// Placeholder sentinel for selection fields
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Field::Gender => Some(GENDER_PLACEHOLDER),
            Field::Occupation => Some(OCCUPATION_PLACEHOLDER),
            Field::SleepQuality => Some(SLEEP_QUALITY_PLACEHOLDER),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form input, exactly as entered by the user.
///
/// Missing keys deserialize to the form defaults, so a partially filled JSON
/// object behaves like a partially filled form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInput {
    /// Gender label or placeholder
    pub gender: String,
    /// Age in years (integer)
    pub age: String,
    /// Occupation label or placeholder
    pub occupation: String,
    /// Sleep duration in hours (decimal)
    pub sleep_duration: String,
    /// Physical activity in minutes per day (integer)
    pub physical_activity: String,
    /// Heart rate in bpm (integer)
    pub heart_rate: String,
    /// Steps per day (integer)
    pub daily_steps: String,
    /// Sleep quality band label or placeholder
    pub sleep_quality: String,
    /// BMI category label
    pub bmi_category: String,
    /// Sleep disorder label
    pub sleep_disorder: String,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            gender: GENDER_PLACEHOLDER.to_string(),
            age: String::new(),
            occupation: OCCUPATION_PLACEHOLDER.to_string(),
            sleep_duration: String::new(),
            physical_activity: String::new(),
            heart_rate: String::new(),
            daily_steps: String::new(),
            sleep_quality: SLEEP_QUALITY_PLACEHOLDER.to_string(),
            bmi_category: BmiCategory::OPTIONS[0].label().to_string(),
            sleep_disorder: SleepDisorder::OPTIONS[0].label().to_string(),
        }
    }
}

impl RawInput {
    /// Current text of a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Gender => &self.gender,
            Field::Age => &self.age,
            Field::Occupation => &self.occupation,
            Field::SleepDuration => &self.sleep_duration,
            Field::PhysicalActivity => &self.physical_activity,
            Field::HeartRate => &self.heart_rate,
            Field::DailySteps => &self.daily_steps,
            Field::SleepQuality => &self.sleep_quality,
            Field::BmiCategory => &self.bmi_category,
            Field::SleepDisorder => &self.sleep_disorder,
        }
    }

    /// Replace the text of a field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Gender => &mut self.gender,
            Field::Age => &mut self.age,
            Field::Occupation => &mut self.occupation,
            Field::SleepDuration => &mut self.sleep_duration,
            Field::PhysicalActivity => &mut self.physical_activity,
            Field::HeartRate => &mut self.heart_rate,
            Field::DailySteps => &mut self.daily_steps,
            Field::SleepQuality => &mut self.sleep_quality,
            Field::BmiCategory => &mut self.bmi_category,
            Field::SleepDisorder => &mut self.sleep_disorder,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`RawInput::set`]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

/// Encoded feature vector in [`FEATURE_ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub(crate) fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Value encoded for a given field
    pub fn get(&self, field: Field) -> f64 {
        let index = FEATURE_ORDER
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        self.0[index]
    }

    /// (field name, value) pairs in feature order
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_ORDER
            .iter()
            .zip(self.0.iter())
            .map(|(field, value)| (field.as_str(), *value))
            .collect()
    }
}

/// Stress level predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    High,
    Low,
    Medium,
}

impl StressLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::High => "High",
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted stress level
    pub stress_level: StressLevel,
    /// Raw class index returned by the classifier
    pub class_index: usize,
}

/// Producer metadata embedded in reports
#[derive(Debug, Clone, Serialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
}

/// Serializable record of one prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    /// Unique report identifier
    pub report_id: Uuid,
    /// When the prediction was computed (UTC)
    pub computed_at: DateTime<Utc>,
    /// Producer metadata
    pub producer: Producer,
    /// Predicted stress level
    pub stress_level: StressLevel,
    /// Raw class index returned by the classifier
    pub class_index: usize,
    /// Encoded (unscaled) features the prediction was made from
    pub features: FeatureVector,
}
