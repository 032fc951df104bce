//! JSON result writer for sweep outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::ExperimentName;
use crate::IoError;

/// Per-class scores of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ClassRecord {
    pub class: i64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Everything recorded about one tree count.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub n_trees: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of aligned samples that were scored.
    pub n_samples: usize,
    /// Points dropped during spatial reduction.
    pub n_dropped: usize,
    /// Class ids labelling the rows and columns of `confusion_matrix`.
    pub classes: Vec<i64>,
    /// Rows are true classes, columns predicted classes.
    pub confusion_matrix: Vec<Vec<usize>>,
    pub per_class: Vec<ClassRecord>,
}

/// Parameters shared by every evaluation of a sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepContext<'a> {
    pub image: &'a str,
    pub points: &'a str,
    pub label: &'a str,
    pub inputs: &'a [String],
    pub scale: f64,
}

/// Writes sweep results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_sweep.json`; the chart path
/// `{experiment}_sweep.svg` is handed out to the reporter.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the `{experiment}_sweep.json` artifact.
    #[must_use]
    pub fn sweep_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_sweep.json", self.experiment.as_str()))
    }

    /// Path the metric chart should be rendered to.
    #[must_use]
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_sweep.svg", self.experiment.as_str()))
    }

    /// Write a sweep result to `{experiment}_sweep.json` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_evaluations = evaluations.len()))]
    pub fn write_sweep(
        &self,
        context: SweepContext<'_>,
        evaluations: &[EvaluationRecord],
    ) -> Result<PathBuf, IoError> {
        let path = self.sweep_path();

        let artifact = SweepArtifact {
            experiment: self.experiment.as_str(),
            image: context.image,
            points: context.points,
            label: context.label,
            inputs: context.inputs,
            scale: context.scale,
            tree_counts: evaluations.iter().map(|e| e.n_trees).collect(),
            series: SeriesArtifact {
                accuracy: evaluations.iter().map(|e| e.accuracy).collect(),
                precision: evaluations.iter().map(|e| e.precision).collect(),
                recall: evaluations.iter().map(|e| e.recall).collect(),
                f1_score: evaluations.iter().map(|e| e.f1_score).collect(),
            },
            evaluations,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "sweep result written");
        Ok(path)
    }
}

#[derive(Serialize)]
struct SweepArtifact<'a> {
    experiment: &'a str,
    image: &'a str,
    points: &'a str,
    label: &'a str,
    inputs: &'a [String],
    scale: f64,
    tree_counts: Vec<usize>,
    series: SeriesArtifact,
    evaluations: &'a [EvaluationRecord],
}

#[derive(Serialize)]
struct SeriesArtifact {
    accuracy: Vec<f64>,
    precision: Vec<f64>,
    recall: Vec<f64>,
    f1_score: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_follow_experiment_name() {
        let dir = TempDir::new().unwrap();
        let writer =
            ResultWriter::new(dir.path(), ExperimentName::new("rf".into()).unwrap()).unwrap();
        assert_eq!(writer.sweep_path(), dir.path().join("rf_sweep.json"));
        assert_eq!(writer.chart_path(), dir.path().join("rf_sweep.svg"));
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ResultWriter::new(&nested, ExperimentName::new("rf".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
    }
}
