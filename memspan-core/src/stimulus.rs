use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Magnitude bucket controlling how many digits each generated value has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigitLength {
    One,
    Two,
    Three,
    Four,
}

impl DigitLength {
    /// Difficulty schedule over a run: trials 1-4 use single digits,
    /// 5-8 two, 9-12 three, and everything after that four.
    pub fn for_trial(trial_index: usize) -> Self {
        match trial_index {
            0..=4 => DigitLength::One,
            5..=8 => DigitLength::Two,
            9..=12 => DigitLength::Three,
            _ => DigitLength::Four,
        }
    }

    pub fn digits(self) -> u8 {
        match self {
            DigitLength::One => 1,
            DigitLength::Two => 2,
            DigitLength::Three => 3,
            DigitLength::Four => 4,
        }
    }

    /// Numeric range values of this class are drawn from.
    pub fn value_range(self) -> RangeInclusive<u32> {
        match self {
            DigitLength::One => 0..=9,
            _ => {
                let d = u32::from(self.digits());
                10u32.pow(d - 1)..=10u32.pow(d) - 1
            }
        }
    }
}

impl TryFrom<u8> for DigitLength {
    type Error = TaskError;

    fn try_from(value: u8) -> Result<Self, TaskError> {
        match value {
            1 => Ok(DigitLength::One),
            2 => Ok(DigitLength::Two),
            3 => Ok(DigitLength::Three),
            4 => Ok(DigitLength::Four),
            other => Err(TaskError::Configuration(format!(
                "digit length class must be 1..=4, got {other}"
            ))),
        }
    }
}

/// The memory set shown during the presentation phase. Immutable once built;
/// duplicates are possible and kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusSet {
    items: Vec<String>,
    digit_length: DigitLength,
}

impl StimulusSet {
    pub fn new(items: Vec<String>, digit_length: DigitLength) -> Self {
        Self { items, digit_length }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn digit_length(&self) -> DigitLength {
        self.digit_length
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }
}

/// The single item shown after retention, to be judged for set membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub value: String,
    pub is_member: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_class_follows_trial_thresholds() {
        for trial in 1..=4 {
            assert_eq!(DigitLength::for_trial(trial), DigitLength::One);
        }
        for trial in 5..=8 {
            assert_eq!(DigitLength::for_trial(trial), DigitLength::Two);
        }
        for trial in 9..=12 {
            assert_eq!(DigitLength::for_trial(trial), DigitLength::Three);
        }
        assert_eq!(DigitLength::for_trial(13), DigitLength::Four);
        assert_eq!(DigitLength::for_trial(40), DigitLength::Four);
    }

    #[test]
    fn value_ranges_match_digit_counts() {
        assert_eq!(DigitLength::One.value_range(), 0..=9);
        assert_eq!(DigitLength::Two.value_range(), 10..=99);
        assert_eq!(DigitLength::Three.value_range(), 100..=999);
        assert_eq!(DigitLength::Four.value_range(), 1000..=9999);
    }

    #[test]
    fn digit_class_from_raw_value() {
        assert_eq!(DigitLength::try_from(3).unwrap(), DigitLength::Three);
        assert!(DigitLength::try_from(0).is_err());
        assert!(DigitLength::try_from(5).is_err());
    }

    #[test]
    fn set_membership_is_exact_string_match() {
        let set = StimulusSet::new(
            vec!["3".into(), "7".into(), "1".into()],
            DigitLength::One,
        );
        assert!(set.contains("7"));
        assert!(!set.contains("9"));
        assert_eq!(set.len(), 3);
    }
}
