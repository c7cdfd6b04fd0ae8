//! Category and risk bands for a BMI value.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};
use utoipa::ToSchema;

/// Classification band of a BMI value.
///
/// Bands are closed on the documented bounds and leave the intervals
/// (22.9, 23), (24.9, 25) and (29.9, 30] unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    ObeseClass2,
    ObeseClass3,
}

impl BmiClass {
    /// `None` for the unclassified gaps, `value == 30` and NaN.
    pub fn from_value(value: f64) -> Option<Self> {
        if value < 18.5 {
            Some(Self::Underweight)
        } else if (18.5..=22.9).contains(&value) {
            Some(Self::Normal)
        } else if (23.0..=24.9).contains(&value) {
            Some(Self::Overweight)
        } else if (25.0..=29.9).contains(&value) {
            Some(Self::ObeseClass2)
        } else if value > 30.0 {
            Some(Self::ObeseClass3)
        } else {
            None
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Underweight => "underweight",
            Self::Normal => "normal",
            Self::Overweight => "overweight / obesity class 1",
            Self::ObeseClass2 => "obese / obesity class 2",
            Self::ObeseClass3 => "obese / obesity class 3",
        }
    }

    pub fn risk(self) -> &'static str {
        match self {
            Self::Underweight => "above-normal risk",
            Self::Normal => "normal risk",
            Self::Overweight => "elevated risk level 1",
            Self::ObeseClass2 => "elevated risk level 2",
            Self::ObeseClass3 => "elevated risk level 3",
        }
    }
}

/// `(category, risk)` for `value`; both empty when unclassified.
pub fn category_and_risk(value: f64) -> (&'static str, &'static str) {
    BmiClass::from_value(value).map_or(("", ""), |class| (class.category(), class.risk()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_boundary_table() {
        let cases = [
            (18.49, "underweight", "above-normal risk"),
            (18.5, "normal", "normal risk"),
            (22.9, "normal", "normal risk"),
            (22.91, "", ""),
            (23.0, "overweight / obesity class 1", "elevated risk level 1"),
            (24.9, "overweight / obesity class 1", "elevated risk level 1"),
            (25.0, "obese / obesity class 2", "elevated risk level 2"),
            (29.9, "obese / obesity class 2", "elevated risk level 2"),
            (30.0, "", ""),
            (30.01, "obese / obesity class 3", "elevated risk level 3"),
        ];

        for (value, category, risk) in cases {
            assert_eq!(
                category_and_risk(value),
                (category, risk),
                "unexpected classification for {value}"
            );
        }
    }

    #[test]
    fn test_gaps_are_unclassified() {
        for value in [22.95, 24.95, 29.95, 30.0] {
            assert_eq!(BmiClass::from_value(value), None, "{value} should be unclassified");
        }
        assert_eq!(BmiClass::from_value(f64::NAN), None);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(BmiClass::from_value(0.0), Some(BmiClass::Underweight));
        assert_eq!(BmiClass::from_value(f64::INFINITY), Some(BmiClass::ObeseClass3));
    }

    #[test]
    fn test_every_band_has_text() {
        for class in BmiClass::iter() {
            assert!(!class.category().is_empty());
            assert!(!class.risk().is_empty());
            assert_eq!(class.to_string(), class.as_ref());
        }
    }
}
