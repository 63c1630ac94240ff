//! Stress Sense - stress level prediction from lifestyle and sleep signals
//!
//! Stress Sense turns a raw form submission into a stress level through a
//! deterministic pipeline: validation → categorical encoding → feature
//! scaling → classification → label lookup.
//!
//! ## Modules
//!
//! - **Encoding**: static label/code tables for every categorical field
//! - **Encoder**: validation and feature vector assembly
//! - **Model**: scaler/classifier traits and the JSON model bundle
//! - **Pipeline**: the end-to-end [`StressPredictor`]
//! - **Form**: caller-owned form state, reset handling and user feedback

pub mod encoder;
pub mod encoding;
pub mod error;
pub mod form;
pub mod model;
pub mod pipeline;
pub mod types;

pub use encoder::FeatureEncoder;
pub use error::{InferenceError, PredictError, ValidationError};
pub use form::{Feedback, FormAction, FormPhase, FormState};
pub use model::{Classifier, LinearClassifier, ModelBundle, Scaler, StandardScaler};
pub use pipeline::StressPredictor;
pub use types::{FeatureVector, Field, PredictionReport, PredictionResult, RawInput, StressLevel};

/// Version embedded in all prediction reports
pub const STRESS_SENSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for prediction reports
pub const PRODUCER_NAME: &str = "stress-sense";
