//! Pipeline orchestration
//!
//! This module provides the public prediction API. It runs a form submission
//! through encoding, scaling, classification and the reverse label lookup.

use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::encoder::FeatureEncoder;
use crate::encoding::stress_level_for_class;
use crate::error::{InferenceError, PredictError};
use crate::model::{Classifier, LinearClassifier, ModelBundle, Scaler, StandardScaler};
use crate::types::{
    FeatureVector, PredictionReport, PredictionResult, Producer, RawInput, FEATURE_COUNT,
};
use crate::{PRODUCER_NAME, STRESS_SENSE_VERSION};

/// Stateless predictor over a loaded scaler and classifier.
///
/// The scaler and classifier are read-only after construction, so one
/// predictor can serve every submission.
pub struct StressPredictor<S, C> {
    scaler: S,
    classifier: C,
}

impl StressPredictor<StandardScaler, LinearClassifier> {
    /// Build a predictor from a model bundle
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self::new(bundle.scaler, bundle.classifier)
    }

    /// Load a model bundle from disk and build a predictor
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        Ok(Self::from_bundle(ModelBundle::load(path)?))
    }
}

impl<S: Scaler, C: Classifier> StressPredictor<S, C> {
    pub fn new(scaler: S, classifier: C) -> Self {
        Self { scaler, classifier }
    }

    /// Validate, encode and classify a form submission
    pub fn predict(&self, input: &RawInput) -> Result<PredictionResult, PredictError> {
        let features = FeatureEncoder::encode(input)?;
        Ok(self.predict_features(&features)?)
    }

    /// Classify an already encoded feature vector.
    ///
    /// Failures from the scaler or classifier are not retried.
    pub fn predict_features(
        &self,
        features: &FeatureVector,
    ) -> Result<PredictionResult, InferenceError> {
        let result = self.infer(features);
        match &result {
            Ok(prediction) => info!(
                stress_level = %prediction.stress_level,
                class_index = prediction.class_index,
                "predicted stress level"
            ),
            Err(e) => warn!(error = %e, "inference failed"),
        }
        result
    }

    /// Predict and wrap the result in a serializable report
    pub fn report(&self, input: &RawInput) -> Result<PredictionReport, PredictError> {
        let features = FeatureEncoder::encode(input)?;
        let prediction = self.predict_features(&features)?;

        Ok(PredictionReport {
            report_id: Uuid::new_v4(),
            computed_at: Utc::now(),
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: STRESS_SENSE_VERSION.to_string(),
            },
            stress_level: prediction.stress_level,
            class_index: prediction.class_index,
            features,
        })
    }

    fn infer(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let scaled = self.scaler.transform(features.as_slice())?;
        if scaled.len() != FEATURE_COUNT {
            return Err(InferenceError::ShapeMismatch {
                stage: "classifier",
                expected: FEATURE_COUNT,
                actual: scaled.len(),
            });
        }

        let class_index = self.classifier.predict(&scaled)?;
        let stress_level =
            stress_level_for_class(class_index).ok_or(InferenceError::UnknownClass(class_index))?;

        Ok(PredictionResult {
            stress_level,
            class_index,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::model::tests::sample_bundle_json;
    use crate::types::{Field, StressLevel};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn sample_input() -> RawInput {
        RawInput {
            gender: "Male".to_string(),
            age: "29".to_string(),
            occupation: "Software Engineer".to_string(),
            sleep_duration: "7.5".to_string(),
            physical_activity: "45".to_string(),
            heart_rate: "72".to_string(),
            daily_steps: "8000".to_string(),
            sleep_quality: "7–8: Good sleep (mostly undisturbed, feel okay)".to_string(),
            bmi_category: "Normal".to_string(),
            sleep_disorder: "None".to_string(),
        }
    }

    pub(crate) fn sample_predictor() -> StressPredictor<StandardScaler, LinearClassifier> {
        StressPredictor::from_bundle(ModelBundle::from_json(sample_bundle_json()).unwrap())
    }

    struct Identity;

    impl Scaler for Identity {
        fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(row.to_vec())
        }
    }

    /// Classifier that counts calls and always answers the same class
    struct Fixed {
        class: usize,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(class: usize) -> Self {
            Self {
                class,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Classifier for Fixed {
        fn predict(&self, _row: &[f64]) -> Result<usize, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.class)
        }
    }

    struct Truncating;

    impl Scaler for Truncating {
        fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(row[..3].to_vec())
        }
    }

    #[test]
    fn test_predict_maps_class_index() {
        for (class, level) in [
            (0, StressLevel::High),
            (1, StressLevel::Low),
            (2, StressLevel::Medium),
        ] {
            let predictor = StressPredictor::new(Identity, Fixed::new(class));
            let result = predictor.predict(&sample_input()).unwrap();
            assert_eq!(result.stress_level, level);
            assert_eq!(result.class_index, class);
        }
    }

    #[test]
    fn test_unknown_class_is_inference_error() {
        let predictor = StressPredictor::new(Identity, Fixed::new(7));
        let err = predictor.predict(&sample_input()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::Inference(InferenceError::UnknownClass(7))
        ));
    }

    #[test]
    fn test_placeholder_never_reaches_model() {
        let predictor = StressPredictor::new(Identity, Fixed::new(0));
        let input = sample_input().with(Field::Occupation, "Select Occupation");

        let err = predictor.predict(&input).unwrap_err();
        assert!(matches!(
            err,
            PredictError::Validation(ValidationError::MissingSelection { .. })
        ));
        assert_eq!(predictor.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scaler_width_checked_before_classifier() {
        let predictor = StressPredictor::new(Truncating, Fixed::new(0));
        let err = predictor.predict(&sample_input()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::Inference(InferenceError::ShapeMismatch { actual: 3, .. })
        ));
        assert_eq!(predictor.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bundle_predictions_follow_sleep_quality() {
        let predictor = sample_predictor();
        let cases = [
            ("poor", StressLevel::High),
            ("average", StressLevel::Medium),
            ("good", StressLevel::Low),
            ("excellent", StressLevel::Low),
        ];
        for (quality, expected) in cases {
            let input = sample_input().with(Field::SleepQuality, quality);
            let result = predictor.predict(&input).unwrap();
            assert_eq!(result.stress_level, expected, "{quality}");
        }
    }

    #[test]
    fn test_report_carries_features_and_producer() {
        let report = sample_predictor().report(&sample_input()).unwrap();
        assert_eq!(report.stress_level, StressLevel::Low);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(
            report.features.values(),
            [1.0, 29.0, 0.0, 7.5, 7.0, 45.0, 0.0, 72.0, 8000.0, 0.0]
        );

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stress_level"], "Low");
        assert_eq!(json["features"].as_array().unwrap().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_repeated_predictions_are_identical() {
        let predictor = sample_predictor();
        let first = predictor.predict(&sample_input()).unwrap();
        let second = predictor.predict(&sample_input()).unwrap();
        assert_eq!(first, second);
    }
}
