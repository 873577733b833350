use serde::{Deserialize, Serialize};

use crate::shared::constants::{DEFAULT_ELDERLY_CUTOFF, DEFAULT_MIDDLE_AGED_CUTOFF};

use super::analysis_error::ConfigError;

/// Age bracket inferred from wrinkle density. Ordered youngest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeCategory {
    Young,
    MiddleAged,
    Elderly,
}

impl AgeCategory {
    pub const ALL: &[AgeCategory] = &[
        AgeCategory::Young,
        AgeCategory::MiddleAged,
        AgeCategory::Elderly,
    ];
}

impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeCategory::Young => write!(f, "Young"),
            AgeCategory::MiddleAged => write!(f, "Middle-aged"),
            AgeCategory::Elderly => write!(f, "Elderly"),
        }
    }
}

/// Wrinkle percentages separating the three categories.
///
/// Both bounds are exclusive from below: a score equal to a cutoff stays in
/// the lower category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeCutoffs {
    pub middle_aged: f64,
    pub elderly: f64,
}

impl Default for AgeCutoffs {
    fn default() -> Self {
        Self {
            middle_aged: DEFAULT_MIDDLE_AGED_CUTOFF,
            elderly: DEFAULT_ELDERLY_CUTOFF,
        }
    }
}

impl AgeCutoffs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.middle_aged.is_finite() || !self.elderly.is_finite() {
            return Err(ConfigError::NonFiniteCutoff);
        }
        if self.middle_aged > self.elderly {
            return Err(ConfigError::InvertedCutoffs {
                middle: self.middle_aged,
                elderly: self.elderly,
            });
        }
        Ok(())
    }
}

/// Maps a wrinkle score to an [`AgeCategory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeClassifier {
    cutoffs: AgeCutoffs,
}

impl AgeClassifier {
    pub fn new(cutoffs: AgeCutoffs) -> Self {
        Self { cutoffs }
    }

    /// Total over all floats; NaN falls through to `Young`.
    pub fn classify(&self, score: f64) -> AgeCategory {
        if score > self.cutoffs.elderly {
            AgeCategory::Elderly
        } else if score > self.cutoffs.middle_aged {
            AgeCategory::MiddleAged
        } else {
            AgeCategory::Young
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, AgeCategory::Young)]
    #[case::at_middle_cutoff(8.0, AgeCategory::Young)]
    #[case::just_above_middle(8.0001, AgeCategory::MiddleAged)]
    #[case::mid_band(12.0, AgeCategory::MiddleAged)]
    #[case::at_elderly_cutoff(15.0, AgeCategory::MiddleAged)]
    #[case::just_above_elderly(15.0001, AgeCategory::Elderly)]
    #[case::maximum(100.0, AgeCategory::Elderly)]
    #[case::negative(-3.0, AgeCategory::Young)]
    #[case::above_range(250.0, AgeCategory::Elderly)]
    #[case::nan(f64::NAN, AgeCategory::Young)]
    fn test_default_cutoffs(#[case] score: f64, #[case] expected: AgeCategory) {
        assert_eq!(AgeClassifier::default().classify(score), expected);
    }

    #[test]
    fn test_custom_cutoffs() {
        let classifier = AgeClassifier::new(AgeCutoffs {
            middle_aged: 2.0,
            elderly: 4.0,
        });
        assert_eq!(classifier.classify(3.0), AgeCategory::MiddleAged);
        assert_eq!(classifier.classify(4.5), AgeCategory::Elderly);
    }

    #[test]
    fn test_equal_cutoffs_skip_middle_band() {
        let classifier = AgeClassifier::new(AgeCutoffs {
            middle_aged: 10.0,
            elderly: 10.0,
        });
        assert_eq!(classifier.classify(10.0), AgeCategory::Young);
        assert_eq!(classifier.classify(10.5), AgeCategory::Elderly);
    }

    #[test]
    fn test_categories_are_ordered() {
        assert!(AgeCategory::Young < AgeCategory::MiddleAged);
        assert!(AgeCategory::MiddleAged < AgeCategory::Elderly);
    }

    #[test]
    fn test_display_labels() {
        let labels: Vec<String> = AgeCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["Young", "Middle-aged", "Elderly"]);
    }

    #[test]
    fn test_inverted_cutoffs_rejected() {
        let cutoffs = AgeCutoffs {
            middle_aged: 20.0,
            elderly: 15.0,
        };
        assert!(matches!(
            cutoffs.validate(),
            Err(ConfigError::InvertedCutoffs { .. })
        ));
    }

    #[test]
    fn test_nan_cutoff_rejected() {
        let cutoffs = AgeCutoffs {
            middle_aged: f64::NAN,
            elderly: 15.0,
        };
        assert_eq!(cutoffs.validate(), Err(ConfigError::NonFiniteCutoff));
    }
}
