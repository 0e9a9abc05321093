//! Run-level aggregates over response latencies and correctness.

use memspan_core::{RunSummary, TaskError};

/// Fewer samples than this cannot support a sample standard deviation.
pub const MIN_SAMPLES: usize = 2;

/// Latency summary over one run's response times, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// Aggregates consumed by the results screen and the run recorder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Percent correct over the whole run.
    pub accuracy: f64,
    pub latency: LatencyStats,
}

impl RunStats {
    pub fn from_summary(summary: &RunSummary) -> Result<Self, TaskError> {
        Ok(Self {
            accuracy: accuracy(summary.correct, summary.incorrect),
            latency: summarize(&summary.response_times)?,
        })
    }
}

/// Mean, median and sample standard deviation of a latency sequence.
///
/// The precondition is guarded explicitly: fewer than two samples would
/// make the deviation estimate degenerate, so the caller gets an error
/// instead of a NaN.
pub fn summarize(times: &[f64]) -> Result<LatencyStats, TaskError> {
    if times.len() < MIN_SAMPLES {
        return Err(TaskError::InsufficientData {
            samples: times.len(),
            required: MIN_SAMPLES,
        });
    }
    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = mean(&sorted);
    Ok(LatencyStats {
        mean,
        median: median(&sorted),
        std_dev: std_dev(&sorted, mean),
    })
}

/// Percent correct; zero for an empty run rather than a division fault.
pub fn accuracy(correct: u32, incorrect: u32) -> f64 {
    let total = correct + incorrect;
    if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total) * 100.0
    }
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn std_dev(data: &[f64], mean: f64) -> f64 {
    let variance = data
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (data.len() as f64 - 1.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        let stats = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.median - 4.5).abs() < 1e-12);
        // Sample deviation of the classic 2,4,4,4,5,5,7,9 sequence.
        assert!((stats.std_dev - 2.138089935299395).abs() < 1e-9);
    }

    #[test]
    fn median_of_odd_length_is_the_middle_element() {
        let stats = summarize(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn too_few_samples_is_an_explicit_error() {
        assert!(matches!(
            summarize(&[]),
            Err(TaskError::InsufficientData { samples: 0, .. })
        ));
        assert!(matches!(
            summarize(&[1.0]),
            Err(TaskError::InsufficientData { samples: 1, .. })
        ));
    }

    #[test]
    fn accuracy_guards_the_empty_run() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert!((accuracy(5, 1) - 83.33333333333334).abs() < 1e-9);
        assert_eq!(accuracy(4, 4), 50.0);
    }
}
