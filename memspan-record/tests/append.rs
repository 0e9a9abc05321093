//! Recorder behavior against a real (temporary) destination.

use memspan_core::{DigitLength, RunSummary, StimulusSet, TrialOutcome};
use memspan_record::{COLUMNS, RunRecorder};
use memspan_task::RunStats;

fn outcome(trial_index: usize, correct: bool, rt: f64) -> TrialOutcome {
    let set = StimulusSet::new(
        vec!["3".into(), "7".into(), "1".into(), "9".into(), "2".into()],
        DigitLength::One,
    );
    TrialOutcome {
        trial_index,
        probe: "7".into(),
        probe_is_member: true,
        response: correct,
        response_time_s: rt,
        correct,
        set,
    }
}

fn summary(trials: usize) -> (RunSummary, RunStats) {
    let mut summary = RunSummary::new();
    for i in 1..=trials {
        summary.record(outcome(i, i % 2 == 0, 0.5 + i as f64 / 10.0));
    }
    let stats = RunStats::from_summary(&summary).unwrap();
    (summary, stats)
}

#[test]
fn two_runs_get_consecutive_indices_and_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let recorder = RunRecorder::new(&path);

    let (first, first_stats) = summary(3);
    let (second, second_stats) = summary(2);

    assert_eq!(recorder.append(&first, &first_stats).unwrap(), 1);
    assert_eq!(recorder.append(&second, &second_stats).unwrap(), 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1 + 3 + 2);
    assert_eq!(lines[0], COLUMNS.join(","));
    assert!(!lines[1..].iter().any(|l| l.starts_with("Index Run")));

    for (i, line) in lines[1..4].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), COLUMNS.len());
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], (i + 1).to_string());
    }
    for line in &lines[4..6] {
        assert!(line.starts_with("2,"));
    }
}

#[test]
fn rows_carry_trial_and_aggregate_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let recorder = RunRecorder::new(&path);

    let (summary, stats) = summary(4);
    recorder.append(&summary, &stats).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let row: Vec<&str> = contents.lines().nth(1).unwrap().split(',').collect();

    assert_eq!(row[2], "3 7 1 9 2");
    assert_eq!(row[3], "7");
    assert_eq!(row[4], "no"); // trial 1 scripted incorrect: denied a member
    assert_eq!(row[5], "yes");
    assert_eq!(row[6], format!("{:.2}", stats.accuracy));
    assert_eq!(row[7], format!("{:.4}", stats.latency.mean));
    assert_eq!(row[8], format!("{:.4}", stats.latency.median));
    assert_eq!(row[9], format!("{:.4}", stats.latency.std_dev));

    // Aggregates repeat identically on every row of the run.
    for line in contents.lines().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields[6..10], row[6..10]);
    }
}

#[test]
fn next_index_survives_a_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = RunRecorder::new(dir.path().join("fresh.csv"));
    assert_eq!(recorder.next_run_index().unwrap(), 1);
}

#[test]
fn unwritable_destination_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    // The destination is a directory, so the append must fail.
    let recorder = RunRecorder::new(dir.path());
    let (summary, stats) = summary(2);
    assert!(matches!(
        recorder.append(&summary, &stats),
        Err(memspan_core::TaskError::Persistence(_))
    ));
}
