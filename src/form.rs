//! Form state and user feedback
//!
//! The form state is owned by the caller and moves through two phases:
//!
//! ```text
//!            Reset
//! Editing ----------> ResetRequested
//!    ^                     |
//!    +---- settle() -------+   (input replaced by defaults)
//! ```
//!
//! Edits made while a reset is pending are discarded by that reset, and a
//! submission applies the pending reset first. Re-rendering after a
//! transition is left to the UI.

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, ValidationError};
use crate::model::{Classifier, Scaler};
use crate::pipeline::StressPredictor;
use crate::types::{Field, PredictionResult, RawInput, StressLevel};

/// Message shown when the scaler or classifier fails
pub const PREDICTION_UNAVAILABLE: &str = "Prediction unavailable. Please try again later.";

/// Phase of the form lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    ResetRequested,
}

/// User actions that change the form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Edit { field: Field, value: String },
    Reset,
}

/// Caller-owned form state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    input: RawInput,
    phase: FormPhase,
}

impl Default for FormState {
    fn default() -> Self {
        reset()
    }
}

/// Fresh form state with every field at its default
pub fn reset() -> FormState {
    FormState {
        input: RawInput::default(),
        phase: FormPhase::Editing,
    }
}

impl FormState {
    /// Start editing from an existing submission
    pub fn with_input(input: RawInput) -> Self {
        Self {
            input,
            phase: FormPhase::Editing,
        }
    }

    pub fn input(&self) -> &RawInput {
        &self.input
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Apply a user action and return the next state.
    ///
    /// An edit made while a reset is pending is discarded along with the
    /// rest of the input.
    pub fn transition(mut self, action: FormAction) -> Self {
        match (self.phase, action) {
            (FormPhase::ResetRequested, FormAction::Edit { .. }) => reset(),
            (FormPhase::Editing, FormAction::Edit { field, value }) => {
                self.input.set(field, value);
                self
            }
            (_, FormAction::Reset) => {
                self.phase = FormPhase::ResetRequested;
                self
            }
        }
    }

    /// Apply a pending reset, if any
    pub fn settle(self) -> Self {
        match self.phase {
            FormPhase::Editing => self,
            FormPhase::ResetRequested => reset(),
        }
    }

    /// Submit the current input to a predictor.
    ///
    /// A pending reset is applied first, so the submission sees the defaults.
    pub fn submit<S: Scaler, C: Classifier>(
        &mut self,
        predictor: &StressPredictor<S, C>,
    ) -> Feedback {
        if self.phase == FormPhase::ResetRequested {
            *self = reset();
        }
        Feedback::from(predictor.predict(&self.input))
    }
}

/// User-visible outcome of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// Correctable omission, such as an unselected option
    Warning { message: String },
    /// Input or prediction failure
    Error { message: String },
    /// Successful prediction
    Success { stress_level: StressLevel },
}

impl Feedback {
    pub fn message(&self) -> String {
        match self {
            Feedback::Warning { message } | Feedback::Error { message } => message.clone(),
            Feedback::Success { stress_level } => {
                format!("Predicted Stress Level: {stress_level}")
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Feedback::Success { .. })
    }
}

impl From<ValidationError> for Feedback {
    fn from(e: ValidationError) -> Self {
        let message = e.user_message();
        match e {
            ValidationError::MissingSelection { .. } | ValidationError::MissingNumericField { .. } => {
                Feedback::Warning { message }
            }
            ValidationError::UnknownOption { .. } | ValidationError::InvalidNumericFormat { .. } => {
                Feedback::Error { message }
            }
        }
    }
}

impl From<Result<PredictionResult, PredictError>> for Feedback {
    fn from(result: Result<PredictionResult, PredictError>) -> Self {
        match result {
            Ok(prediction) => Feedback::Success {
                stress_level: prediction.stress_level,
            },
            Err(PredictError::Validation(e)) => Feedback::from(e),
            Err(_) => Feedback::Error {
                message: PREDICTION_UNAVAILABLE.to_string(),
            },
        }
    }
}
