//! Sweep pipeline tests against a stub engine and a recording reporter.

use std::collections::HashMap;

use treesweep_engine::{AlignedLabels, AssetHandle, AssetKind, Engine, EngineError};
use treesweep_io::AssetId;
use treesweep_metrics::{ClassificationScores, Metric, MetricError};
use treesweep_sweep::{
    AssetIds, EvaluationSettings, MetricSeries, Reporter, SweepError, TreeCounts, load_assets,
    run_sweep,
};

const TRUTH: [i64; 6] = [0, 1, 1, 0, 2, 2];

/// Predictions the stub returns for `n_trees`: more trees, fewer mistakes.
fn stub_predictions(n_trees: usize) -> Vec<i64> {
    let mistakes = match n_trees {
        0..=10 => 3,
        11..=100 => 2,
        101..=300 => 1,
        _ => 0,
    };
    TRUTH
        .iter()
        .enumerate()
        .map(|(i, &t)| if i < mistakes { (t + 1) % 3 } else { t })
        .collect()
}

#[derive(Default)]
struct StubEngine {
    trained: Vec<usize>,
    surfaces: HashMap<AssetId, usize>,
    fail_at: Option<usize>,
    truncate_predictions: bool,
}

impl Engine for StubEngine {
    fn resolve(&mut self, id: &str) -> Result<AssetHandle, EngineError> {
        let kind = match id {
            "users/me/image" => AssetKind::Image,
            "users/me/points" => AssetKind::FeatureCollection,
            _ => {
                return Err(EngineError::AssetNotFound {
                    id: id.to_string(),
                    root: "stub".into(),
                });
            }
        };
        Ok(AssetHandle::new(AssetId::new(id).unwrap(), kind))
    }

    fn train_and_classify(
        &mut self,
        image: &AssetHandle,
        _points: &AssetHandle,
        n_trees: usize,
        label: &str,
        inputs: &[String],
    ) -> Result<AssetHandle, EngineError> {
        assert_eq!(label, "landcover");
        assert_eq!(inputs, ["B2", "B3", "B4"]);
        if self.fail_at == Some(n_trees) {
            return Err(EngineError::UnknownHandle {
                id: image.id().to_string(),
            });
        }
        self.trained.push(n_trees);
        let id = image.id().child(&format!("classified_{n_trees}")).unwrap();
        self.surfaces.insert(id.clone(), n_trees);
        Ok(AssetHandle::new(id, AssetKind::Image))
    }

    fn reduce_to_aligned(
        &mut self,
        predicted: &AssetHandle,
        _points: &AssetHandle,
        _label: &str,
        scale: f64,
    ) -> Result<AlignedLabels, EngineError> {
        assert!((scale - 30.0).abs() < f64::EPSILON);
        let n_trees = self.surfaces[predicted.id()];
        let mut predicted = stub_predictions(n_trees);
        if self.truncate_predictions {
            predicted.pop();
        }
        Ok(AlignedLabels {
            predicted,
            truth: TRUTH.to_vec(),
            n_dropped: 0,
        })
    }
}

#[derive(Default)]
struct RecordingReporter {
    calls: Vec<MetricSeries>,
}

impl Reporter for RecordingReporter {
    fn render(&mut self, series: &MetricSeries) -> Result<(), SweepError> {
        self.calls.push(series.clone());
        Ok(())
    }
}

fn settings() -> EvaluationSettings {
    let inputs = ["B2", "B3", "B4"].map(String::from).to_vec();
    EvaluationSettings::new("landcover", inputs).unwrap()
}

const IDS: AssetIds<'static> = AssetIds {
    image: "users/me/image",
    points: "users/me/points",
};

#[test]
fn full_sweep_reports_once_with_aligned_series() {
    let mut engine = StubEngine::default();
    let mut reporter = RecordingReporter::default();
    let counts = TreeCounts::default();

    let outcome = run_sweep(&mut engine, &mut reporter, IDS, settings(), &counts).unwrap();

    assert_eq!(engine.trained, vec![10, 50, 100, 200, 300, 500]);
    assert_eq!(reporter.calls.len(), 1, "exactly one render per sweep");
    let series = &reporter.calls[0];
    assert_eq!(series, &outcome.series);
    assert_eq!(series.tree_counts(), counts.as_slice());

    for metric in Metric::ALL {
        let values = series.values(metric);
        assert_eq!(values.len(), 6);
        for (&n_trees, &value) in counts.as_slice().iter().zip(values) {
            let expected = ClassificationScores::from_labels(&TRUTH, &stub_predictions(n_trees))
                .unwrap()
                .get(metric);
            assert!((value - expected).abs() < 1e-12, "{metric} at {n_trees}");
        }
    }
    assert!((series.values(Metric::Accuracy)[5] - 1.0).abs() < 1e-12);
    assert_eq!(outcome.evaluations.len(), 6);
}

#[test]
fn evaluation_records_carry_confusion_matrix() {
    let mut engine = StubEngine::default();
    let mut reporter = RecordingReporter::default();
    let counts = TreeCounts::new(vec![10]).unwrap();
    let outcome = run_sweep(&mut engine, &mut reporter, IDS, settings(), &counts).unwrap();

    let record = outcome.evaluations[0].to_record();
    assert_eq!(record.n_trees, 10);
    assert_eq!(record.classes, vec![0, 1, 2]);
    assert_eq!(record.n_samples, 6);
    assert_eq!(record.per_class.len(), 3);
    let total: usize = record.confusion_matrix.iter().flatten().sum();
    assert_eq!(total, 6);
}

#[test]
fn length_mismatch_is_an_error_not_a_truncation() {
    let mut engine = StubEngine {
        truncate_predictions: true,
        ..StubEngine::default()
    };
    let mut reporter = RecordingReporter::default();

    let err = run_sweep(&mut engine, &mut reporter, IDS, settings(), &TreeCounts::default())
        .unwrap_err();

    assert!(matches!(
        err,
        SweepError::Metric {
            n_trees: 10,
            source: MetricError::LengthMismatch { truth: 6, predicted: 5 },
        }
    ));
    assert!(reporter.calls.is_empty());
}

#[test]
fn engine_failure_stops_the_sweep_without_retry() {
    let mut engine = StubEngine {
        fail_at: Some(200),
        ..StubEngine::default()
    };
    let mut reporter = RecordingReporter::default();

    let err = run_sweep(&mut engine, &mut reporter, IDS, settings(), &TreeCounts::default())
        .unwrap_err();

    assert!(matches!(err, SweepError::Engine(EngineError::UnknownHandle { .. })));
    assert_eq!(engine.trained, vec![10, 50, 100]);
    assert!(reporter.calls.is_empty());
}

#[test]
fn missing_asset_propagates_engine_error() {
    let mut engine = StubEngine::default();
    let err = load_assets(&mut engine, "users/me/nothing", "users/me/points").unwrap_err();
    assert!(matches!(err, SweepError::Engine(EngineError::AssetNotFound { .. })));
}

#[test]
fn swapped_assets_are_rejected() {
    let mut engine = StubEngine::default();
    let err = load_assets(&mut engine, "users/me/points", "users/me/image").unwrap_err();
    assert!(matches!(
        err,
        SweepError::UnexpectedAssetKind {
            expected: AssetKind::Image,
            found: AssetKind::FeatureCollection,
            ..
        }
    ));
}
