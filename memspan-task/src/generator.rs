//! Stimulus generation: the memory set and the probe.

use memspan_core::{DigitLength, Probe, StimulusSet, TaskError};
use rand::Rng;
use rand::seq::IndexedRandom;

pub const MIN_SET_SIZE: usize = 5;
pub const MAX_SET_SIZE: usize = 10;

/// Draws `length` digit strings of the given class, uniformly with
/// replacement. Duplicates are possible and kept.
pub fn generate_set<R: Rng>(
    rng: &mut R,
    length: usize,
    digit_length: DigitLength,
) -> Result<StimulusSet, TaskError> {
    if !(MIN_SET_SIZE..=MAX_SET_SIZE).contains(&length) {
        return Err(TaskError::Configuration(format!(
            "set size must be {MIN_SET_SIZE}..={MAX_SET_SIZE}, got {length}"
        )));
    }
    let range = digit_length.value_range();
    let items = (0..length)
        .map(|_| rng.random_range(range.clone()).to_string())
        .collect();
    Ok(StimulusSet::new(items, digit_length))
}

/// Picks the probe for a trial.
///
/// With probability `foil_probability` the probe is a same-class value
/// absent from the set; otherwise it is drawn uniformly from the set.
/// When the class range has no absent value left (only possible for
/// single-digit sets covering all of 0..=9), falls back to a member probe.
pub fn pick_probe<R: Rng>(rng: &mut R, set: &StimulusSet, foil_probability: f64) -> Probe {
    let p = foil_probability.clamp(0.0, 1.0);
    if p > 0.0 && rng.random_bool(p) {
        if let Some(value) = draw_foil(rng, set) {
            return Probe {
                value,
                is_member: false,
            };
        }
    }
    let value = match set.items().choose(rng) {
        Some(item) => item.clone(),
        // Sets are never empty by construction; keep the probe total anyway.
        None => String::new(),
    };
    Probe {
        value,
        is_member: true,
    }
}

fn draw_foil<R: Rng>(rng: &mut R, set: &StimulusSet) -> Option<String> {
    let range = set.digit_length().value_range();
    // Rejection sampling first; tiny ranges may be saturated by the set.
    for _ in 0..64 {
        let candidate = rng.random_range(range.clone()).to_string();
        if !set.contains(&candidate) {
            return Some(candidate);
        }
    }
    range.map(|v| v.to_string()).find(|v| !set.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_values_stay_in_class_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for class in [
            DigitLength::One,
            DigitLength::Two,
            DigitLength::Three,
            DigitLength::Four,
        ] {
            let set = generate_set(&mut rng, 8, class).unwrap();
            assert_eq!(set.len(), 8);
            for item in set.items() {
                let value: u32 = item.parse().unwrap();
                assert!(class.value_range().contains(&value), "{value} out of range");
            }
        }
    }

    #[test]
    fn out_of_range_cardinality_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_set(&mut rng, 4, DigitLength::One).is_err());
        assert!(generate_set(&mut rng, 11, DigitLength::Two).is_err());
    }

    #[test]
    fn member_probe_comes_from_the_set() {
        let mut rng = StdRng::seed_from_u64(21);
        let set = StimulusSet::new(
            vec!["3".into(), "7".into(), "1".into(), "9".into(), "2".into()],
            DigitLength::One,
        );
        for _ in 0..20 {
            let probe = pick_probe(&mut rng, &set, 0.0);
            assert!(probe.is_member);
            assert!(set.contains(&probe.value));
        }
    }

    #[test]
    fn foil_probe_is_absent_from_the_set() {
        let mut rng = StdRng::seed_from_u64(42);
        let set = generate_set(&mut rng, 6, DigitLength::Three).unwrap();
        for _ in 0..20 {
            let probe = pick_probe(&mut rng, &set, 1.0);
            assert!(!probe.is_member);
            assert!(!set.contains(&probe.value));
        }
    }

    #[test]
    fn saturated_class_falls_back_to_member_probe() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<String> = (0..=9).map(|v| v.to_string()).collect();
        let set = StimulusSet::new(items, DigitLength::One);
        let probe = pick_probe(&mut rng, &set, 1.0);
        assert!(probe.is_member);
        assert!(set.contains(&probe.value));
    }
}
