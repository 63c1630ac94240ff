//! Error types for Stress Sense

use thiserror::Error;

use crate::types::Field;

/// Reasons a raw form submission cannot be encoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing selection: {}", join_fields(.fields))]
    MissingSelection { fields: Vec<Field> },

    #[error("Unknown option {label:?} for {field}")]
    UnknownOption { field: Field, label: String },

    #[error("Missing numeric field: {}", join_fields(.fields))]
    MissingNumericField { fields: Vec<Field> },

    #[error("Invalid numeric format: {}", join_fields(.fields))]
    InvalidNumericFormat { fields: Vec<Field> },
}

impl ValidationError {
    /// Fields the error refers to
    pub fn fields(&self) -> Vec<Field> {
        match self {
            ValidationError::MissingSelection { fields }
            | ValidationError::MissingNumericField { fields }
            | ValidationError::InvalidNumericFormat { fields } => fields.clone(),
            ValidationError::UnknownOption { field, .. } => vec![*field],
        }
    }

    /// Message suitable for showing next to the form
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingSelection { fields } => {
                format!("Please select {}.", english_list(fields))
            }
            ValidationError::UnknownOption { field, label } => {
                format!("Unknown option '{}' for {}.", label, field.display_name())
            }
            ValidationError::MissingNumericField { fields } => format!(
                "Please fill in all numeric fields: {}.",
                fields
                    .iter()
                    .map(|f| f.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ValidationError::InvalidNumericFormat { .. } => {
                "Please enter valid numeric values.".to_string()
            }
        }
    }
}

/// Failures at the scaler/classifier boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("{stage} expected {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} produced a non-finite value at column {column}")]
    NonFiniteOutput { stage: &'static str, column: usize },

    #[error("Classifier returned unknown class index {0}")]
    UnknownClass(usize),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

/// Errors that can occur while producing a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// "A", "A and B", "A, B, and C"
fn english_list(fields: &[Field]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.display_name()).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [a, b] => format!("{a} and {b}"),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}
