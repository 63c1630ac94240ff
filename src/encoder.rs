//! Feature encoding
//!
//! This module validates raw form input and encodes it into the fixed-order
//! numeric feature vector consumed by the scaler and classifier.
//!
//! Validation runs in four passes, each reporting every offending field at once:
//! 1. selection fields still at their placeholder
//! 2. categorical labels outside their table
//! 3. empty numeric fields
//! 4. numeric fields that do not parse
//!
//! A vector is only built once all four passes succeed.

use tracing::debug;

use crate::encoding::{BmiCategory, Categorical, Gender, Occupation, SleepDisorder, SleepQuality};
use crate::error::ValidationError;
use crate::types::{FeatureVector, Field, RawInput};

/// Stateless encoder from raw form input to feature vectors
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Validate and encode a form submission
    pub fn encode(input: &RawInput) -> Result<FeatureVector, ValidationError> {
        check_selections(input)?;

        let gender = lookup::<Gender>(input)?;
        let occupation = lookup::<Occupation>(input)?;
        let quality = lookup::<SleepQuality>(input)?;
        let bmi = lookup::<BmiCategory>(input)?;
        let disorder = lookup::<SleepDisorder>(input)?;

        check_numeric_presence(input)?;
        let numbers = parse_numbers(input)?;

        let vector = FeatureVector::new([
            f64::from(gender.code()),
            numbers.age as f64,
            f64::from(occupation.code()),
            numbers.sleep_duration,
            f64::from(quality.code()),
            numbers.physical_activity as f64,
            f64::from(bmi.code()),
            numbers.heart_rate as f64,
            numbers.daily_steps as f64,
            f64::from(disorder.code()),
        ]);

        debug!(features = ?vector.as_slice(), "encoded form input");
        Ok(vector)
    }
}

/// Parsed numeric fields
struct NumericFields {
    age: i64,
    sleep_duration: f64,
    physical_activity: i64,
    heart_rate: i64,
    daily_steps: i64,
}

fn check_selections(input: &RawInput) -> Result<(), ValidationError> {
    let fields: Vec<Field> = Field::SELECTIONS
        .iter()
        .copied()
        .filter(|f| f.placeholder() == Some(input.get(*f)))
        .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingSelection { fields })
    }
}

fn lookup<T: Categorical>(input: &RawInput) -> Result<T, ValidationError> {
    let label = input.get(T::FIELD);
    T::from_label(label).ok_or_else(|| ValidationError::UnknownOption {
        field: T::FIELD,
        label: label.to_string(),
    })
}

fn check_numeric_presence(input: &RawInput) -> Result<(), ValidationError> {
    let fields: Vec<Field> = Field::NUMERIC
        .iter()
        .copied()
        .filter(|f| input.get(*f).is_empty())
        .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingNumericField { fields })
    }
}

fn parse_numbers(input: &RawInput) -> Result<NumericFields, ValidationError> {
    let mut invalid = Vec::new();

    let mut int = |field: Field| match input.get(field).trim().parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            invalid.push(field);
            0
        }
    };

    let age = int(Field::Age);
    let physical_activity = int(Field::PhysicalActivity);
    let heart_rate = int(Field::HeartRate);
    let daily_steps = int(Field::DailySteps);

    let sleep_duration = match input.sleep_duration.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            invalid.push(Field::SleepDuration);
            0.0
        }
    };

    if invalid.is_empty() {
        Ok(NumericFields {
            age,
            sleep_duration,
            physical_activity,
            heart_rate,
            daily_steps,
        })
    } else {
        // Report in form order regardless of parse order
        invalid.sort_by_key(|f| Field::ALL.iter().position(|a| a == f));
        Err(ValidationError::InvalidNumericFormat { fields: invalid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::GENDER_PLACEHOLDER;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn valid_input() -> RawInput {
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

    #[test]
    fn test_encode_reference_submission() {
        let vector = FeatureEncoder::encode(&valid_input()).unwrap();
        assert_eq!(
            vector.values(),
            [1.0, 29.0, 0.0, 7.5, 7.0, 45.0, 0.0, 72.0, 8000.0, 0.0]
        );
    }

    #[test]
    fn test_encode_uses_every_table() {
        let input = valid_input()
            .with(Field::Gender, "Female")
            .with(Field::Occupation, "Student")
            .with(Field::SleepQuality, "poor")
            .with(Field::BmiCategory, "Underweight")
            .with(Field::SleepDisorder, "Sleep Apnea");
        let vector = FeatureEncoder::encode(&input).unwrap();

        assert_eq!(vector.get(Field::Gender), 0.0);
        assert_eq!(vector.get(Field::Occupation), 9.0);
        assert_eq!(vector.get(Field::SleepQuality), 2.0);
        assert_eq!(vector.get(Field::BmiCategory), 3.0);
        assert_eq!(vector.get(Field::SleepDisorder), 2.0);
    }

    #[test]
    fn test_placeholder_selection_is_missing() {
        let input = valid_input().with(Field::Gender, GENDER_PLACEHOLDER);
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::MissingSelection {
                fields: vec![Field::Gender]
            })
        );
    }

    #[test]
    fn test_all_placeholders_reported_together() {
        let mut input = RawInput::default();
        for field in Field::NUMERIC {
            input.set(field, "1");
        }
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::MissingSelection {
                fields: vec![Field::Gender, Field::Occupation, Field::SleepQuality]
            })
        );
    }

    #[test]
    fn test_selection_checked_before_numeric_presence() {
        let err = FeatureEncoder::encode(&RawInput::default()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSelection { .. }));
    }

    #[test]
    fn test_unknown_option() {
        let input = valid_input().with(Field::BmiCategory, "Athletic");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::UnknownOption {
                field: Field::BmiCategory,
                label: "Athletic".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_selection_label() {
        // Labels are case-sensitive; only the placeholder counts as missing
        let input = valid_input().with(Field::Gender, "male");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::UnknownOption {
                field: Field::Gender,
                label: "male".to_string()
            })
        );
    }

    #[test]
    fn test_first_unknown_option_wins() {
        let input = valid_input()
            .with(Field::Gender, "male")
            .with(Field::BmiCategory, "Athletic");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::UnknownOption {
                field: Field::Gender,
                label: "male".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_option_precedes_missing_numeric() {
        let input = valid_input()
            .with(Field::SleepDisorder, "Narcolepsy")
            .with(Field::HeartRate, "");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::UnknownOption {
                field: Field::SleepDisorder,
                label: "Narcolepsy".to_string()
            })
        );
    }

    #[test]
    fn test_missing_heart_rate() {
        let input = valid_input().with(Field::HeartRate, "");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::MissingNumericField {
                fields: vec![Field::HeartRate]
            })
        );
    }

    #[test]
    fn test_missing_numeric_fields_reported_together() {
        let input = valid_input()
            .with(Field::Age, "")
            .with(Field::DailySteps, "")
            .with(Field::SleepDuration, "");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::MissingNumericField {
                fields: vec![Field::Age, Field::SleepDuration, Field::DailySteps]
            })
        );
    }

    #[test]
    fn test_missing_checked_before_format() {
        let input = valid_input()
            .with(Field::Age, "twenty")
            .with(Field::HeartRate, "");
        let err = FeatureEncoder::encode(&input).unwrap_err();
        assert!(matches!(err, ValidationError::MissingNumericField { .. }));
    }

    #[test]
    fn test_non_numeric_age() {
        let input = valid_input().with(Field::Age, "twenty");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::InvalidNumericFormat {
                fields: vec![Field::Age]
            })
        );
    }

    #[test]
    fn test_integer_fields_reject_decimals() {
        let input = valid_input()
            .with(Field::DailySteps, "8000.5")
            .with(Field::PhysicalActivity, "abc");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::InvalidNumericFormat {
                fields: vec![Field::PhysicalActivity, Field::DailySteps]
            })
        );
    }

    #[test]
    fn test_sleep_duration_must_be_finite() {
        for text in ["NaN", "inf", "-infinity", "seven"] {
            let input = valid_input().with(Field::SleepDuration, text);
            assert_eq!(
                FeatureEncoder::encode(&input),
                Err(ValidationError::InvalidNumericFormat {
                    fields: vec![Field::SleepDuration]
                }),
                "{text}"
            );
        }
    }

    #[test]
    fn test_whitespace_around_numbers_is_ignored() {
        let input = valid_input()
            .with(Field::Age, " 29 ")
            .with(Field::SleepDuration, "7.5\n");
        let vector = FeatureEncoder::encode(&input).unwrap();
        assert_eq!(vector.get(Field::Age), 29.0);
        assert_eq!(vector.get(Field::SleepDuration), 7.5);
    }

    #[test]
    fn test_blank_numeric_is_invalid_not_missing() {
        let input = valid_input().with(Field::Age, "   ");
        assert_eq!(
            FeatureEncoder::encode(&input),
            Err(ValidationError::InvalidNumericFormat {
                fields: vec![Field::Age]
            })
        );
    }

    proptest! {
        #[test]
        fn prop_encode_is_idempotent(age in any::<i32>(), hours in 0.0f64..24.0, steps in 0u32..100_000) {
            let input = valid_input()
                .with(Field::Age, age.to_string())
                .with(Field::SleepDuration, hours.to_string())
                .with(Field::DailySteps, steps.to_string());
            let first = FeatureEncoder::encode(&input).unwrap();
            let second = FeatureEncoder::encode(&input).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.get(Field::Age), f64::from(age));
            prop_assert_eq!(first.get(Field::SleepDuration), hours);
        }

        #[test]
        fn prop_every_empty_numeric_is_reported(mask in 1u8..32) {
            let mut input = valid_input();
            let mut expected = Vec::new();
            for (bit, field) in Field::NUMERIC.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    input.set(*field, "");
                    expected.push(*field);
                }
            }
            prop_assert_eq!(
                FeatureEncoder::encode(&input),
                Err(ValidationError::MissingNumericField { fields: expected })
            );
        }

        #[test]
        fn prop_any_placeholder_fails(mask in 1u8..8) {
            let mut input = valid_input();
            for (bit, field) in Field::SELECTIONS.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    input.set(*field, field.placeholder().unwrap());
                }
            }
            let is_missing_selection = matches!(
                FeatureEncoder::encode(&input),
                Err(ValidationError::MissingSelection { .. })
            );
            prop_assert!(is_missing_selection);
        }
    }
}
