//! Static encoding tables
//!
//! Every categorical form field maps a human-readable label to the small
//! integer code the classifier was trained on. The tables are fixed at
//! compile time and shared by the encoder, the form defaults and the CLI.
//!
//! - Gender: Female=0, Male=1
//! - Occupation: 11 labels, Software Engineer=0 .. Other=10
//! - BMI category: Normal=0, Overweight=1, Obese=2, Underweight=3
//! - Sleep disorder: None=0, Insomnia=1, Sleep Apnea=2
//! - Sleep quality: four coarse bands scored 2, 5, 7, 9

use crate::types::{Field, StressLevel};

/// Placeholder shown by the gender selector before a choice is made
pub const GENDER_PLACEHOLDER: &str = "Select Gender";

/// Placeholder shown by the occupation selector before a choice is made
pub const OCCUPATION_PLACEHOLDER: &str = "Select Occupation";

/// Placeholder shown by the sleep quality selector before a choice is made
pub const SLEEP_QUALITY_PLACEHOLDER: &str = "Select Quality of Sleep";

/// Reverse lookup from classifier output index to stress level
pub const STRESS_LABELS: [StressLevel; 3] = [StressLevel::High, StressLevel::Low, StressLevel::Medium];

/// A categorical field with a fixed label set and integer codes
pub trait Categorical: Sized + Copy + 'static {
    /// Form field this category is entered through
    const FIELD: Field;

    /// All options in display order. The first one is the form default for
    /// fields without a placeholder.
    const OPTIONS: &'static [Self];

    /// Human-readable label as shown in the form
    fn label(&self) -> &'static str;

    /// Integer code fed to the classifier
    fn code(&self) -> u8;

    /// Look up an option by its exact label
    fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS.iter().copied().find(|o| o.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Categorical for Gender {
    const FIELD: Field = Field::Gender;
    const OPTIONS: &'static [Self] = &[Gender::Female, Gender::Male];

    fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }

    fn code(&self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupation {
    SoftwareEngineer,
    Doctor,
    Teacher,
    Nurse,
    Lawyer,
    Accountant,
    Salesperson,
    Scientist,
    Manager,
    Student,
    Other,
}

impl Categorical for Occupation {
    const FIELD: Field = Field::Occupation;
    const OPTIONS: &'static [Self] = &[
        Occupation::SoftwareEngineer,
        Occupation::Doctor,
        Occupation::Teacher,
        Occupation::Nurse,
        Occupation::Lawyer,
        Occupation::Accountant,
        Occupation::Salesperson,
        Occupation::Scientist,
        Occupation::Manager,
        Occupation::Student,
        Occupation::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            Occupation::SoftwareEngineer => "Software Engineer",
            Occupation::Doctor => "Doctor",
            Occupation::Teacher => "Teacher",
            Occupation::Nurse => "Nurse",
            Occupation::Lawyer => "Lawyer",
            Occupation::Accountant => "Accountant",
            Occupation::Salesperson => "Salesperson",
            Occupation::Scientist => "Scientist",
            Occupation::Manager => "Manager",
            Occupation::Student => "Student",
            Occupation::Other => "Other",
        }
    }

    fn code(&self) -> u8 {
        match self {
            Occupation::SoftwareEngineer => 0,
            Occupation::Doctor => 1,
            Occupation::Teacher => 2,
            Occupation::Nurse => 3,
            Occupation::Lawyer => 4,
            Occupation::Accountant => 5,
            Occupation::Salesperson => 6,
            Occupation::Scientist => 7,
            Occupation::Manager => 8,
            Occupation::Student => 9,
            Occupation::Other => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Normal,
    Overweight,
    Obese,
    Underweight,
}

impl Categorical for BmiCategory {
    const FIELD: Field = Field::BmiCategory;
    const OPTIONS: &'static [Self] = &[
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
        BmiCategory::Underweight,
    ];

    fn label(&self) -> &'static str {
        match self {
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::Underweight => "Underweight",
        }
    }

    fn code(&self) -> u8 {
        match self {
            BmiCategory::Normal => 0,
            BmiCategory::Overweight => 1,
            BmiCategory::Obese => 2,
            BmiCategory::Underweight => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepDisorder {
    None,
    Insomnia,
    SleepApnea,
}

impl Categorical for SleepDisorder {
    const FIELD: Field = Field::SleepDisorder;
    const OPTIONS: &'static [Self] = &[
        SleepDisorder::None,
        SleepDisorder::Insomnia,
        SleepDisorder::SleepApnea,
    ];

    fn label(&self) -> &'static str {
        match self {
            SleepDisorder::None => "None",
            SleepDisorder::Insomnia => "Insomnia",
            SleepDisorder::SleepApnea => "Sleep Apnea",
        }
    }

    fn code(&self) -> u8 {
        match self {
            SleepDisorder::None => 0,
            SleepDisorder::Insomnia => 1,
            SleepDisorder::SleepApnea => 2,
        }
    }
}

/// Self-reported sleep quality band.
///
/// The classifier was trained on a 1-10 quality score; the form offers four
/// coarse bands, each standing in for a representative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepQuality {
    Poor,
    Average,
    Good,
    Excellent,
}

impl SleepQuality {
    /// Short keyword for the band, accepted as an alias of the full label
    pub fn keyword(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Average => "average",
            SleepQuality::Good => "good",
            SleepQuality::Excellent => "excellent",
        }
    }
}

impl Categorical for SleepQuality {
    const FIELD: Field = Field::SleepQuality;
    const OPTIONS: &'static [Self] = &[
        SleepQuality::Poor,
        SleepQuality::Average,
        SleepQuality::Good,
        SleepQuality::Excellent,
    ];

    fn label(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "1–3: Poor sleep (frequent waking, restlessness, low energy)",
            SleepQuality::Average => {
                "4–6: Average or disturbed sleep (some issues, not fully rested)"
            }
            SleepQuality::Good => "7–8: Good sleep (mostly undisturbed, feel okay)",
            SleepQuality::Excellent => "9–10: Excellent sleep (deep, restful, uninterrupted)",
        }
    }

    /// Representative score of the band
    fn code(&self) -> u8 {
        match self {
            SleepQuality::Poor => 2,
            SleepQuality::Average => 5,
            SleepQuality::Good => 7,
            SleepQuality::Excellent => 9,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|o| o.label() == label || o.keyword() == label)
    }
}

/// Map a classifier output index to its stress level
pub fn stress_level_for_class(index: usize) -> Option<StressLevel> {
    STRESS_LABELS.get(index).copied()
}
