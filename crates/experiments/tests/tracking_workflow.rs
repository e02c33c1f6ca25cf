//! Model-selection workflow against a temporary experiments directory

use pipewatch_core::Error;
use pipewatch_experiments::{ExperimentTracker, Params};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap()
}

#[test]
fn compare_two_tracked_models() {
    let temp_dir = TempDir::new().unwrap();
    let tracker = ExperimentTracker::new(temp_dir.path().join("experiments")).unwrap();

    let runs = [("exp_linear", "linear", 0.5), ("exp_forest", "forest", 0.75)];
    for (id, model, r2) in runs {
        tracker
            .track(Some(id), Some(&params(json!({"model_type": model}))), |run| {
                run.record_metric("test_r2", r2)?;
                run.record_metric("test_rmse", 1.0)?;
                Ok(())
            })
            .unwrap();
    }

    assert_eq!(
        tracker.list_experiments().unwrap(),
        ["exp_forest", "exp_linear"]
    );

    let comparison = tracker
        .compare_experiments("exp_linear", "exp_forest")
        .unwrap();
    assert_eq!(comparison.metrics_diff["test_r2"], 0.25);
    assert_eq!(comparison.metrics_diff["test_rmse"], 0.0);
    assert_eq!(
        comparison.experiment2.params.unwrap()["model_type"],
        json!("forest")
    );
}

#[test]
fn files_on_disk_use_params_and_metrics_suffixes() {
    let temp_dir = TempDir::new().unwrap();
    let tracker = ExperimentTracker::new(temp_dir.path()).unwrap();

    let mut run = tracker
        .start_run(Some("exp_layout"), Some(&params(json!({"alpha": 0.1}))))
        .unwrap();
    run.record_metric("mae", 0.3).unwrap();
    run.finish().unwrap();

    let params_file = temp_dir.path().join("exp_layout_params.json");
    let metrics_file = temp_dir.path().join("exp_layout_metrics.json");
    assert!(params_file.is_file());
    assert!(metrics_file.is_file());

    let content = fs::read_to_string(metrics_file).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(raw, json!({"mae": 0.3}));
}

#[test]
fn diverged_training_metric_never_reaches_disk() {
    let temp_dir = TempDir::new().unwrap();
    let tracker = ExperimentTracker::new(temp_dir.path()).unwrap();

    let result = tracker.track(Some("exp_diverged"), None, |run| {
        run.record_metric("train_loss", 0.4)?;
        run.record_metric("test_loss", f64::INFINITY)?;
        Ok(())
    });
    assert!(matches!(result, Err(Error::Experiment { .. })));

    let metrics_file = temp_dir.path().join("exp_diverged_metrics.json");
    let content = fs::read_to_string(metrics_file).unwrap();
    assert!(!content.contains("null"));

    let experiment = tracker.get_experiment("exp_diverged").unwrap();
    assert_eq!(experiment.metrics.unwrap()["train_loss"], 0.4);
}

#[test]
fn reopened_tracker_sees_earlier_runs() {
    let temp_dir = TempDir::new().unwrap();
    {
        let tracker = ExperimentTracker::new(temp_dir.path()).unwrap();
        tracker
            .log_params("exp_persisted", &params(json!({"depth": 4})))
            .unwrap();
    }

    let tracker = ExperimentTracker::new(temp_dir.path()).unwrap();
    let experiment = tracker.get_experiment("exp_persisted").unwrap();
    assert_eq!(experiment.params.unwrap()["depth"], json!(4));
    assert!(experiment.metrics.is_none());
}
