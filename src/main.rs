use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use treesweep_engine::LocalEngine;
use treesweep_io::{EvaluationRecord, ExperimentName, ResultWriter, SweepContext};
use treesweep_sweep::{
    AssetIds, ChartReporter, DEFAULT_SCALE, DEFAULT_TREE_COUNTS, Evaluation, EvaluationSettings,
    SweepEvaluator, TreeCounts, load_assets, run_sweep,
};

#[derive(Parser)]
#[command(name = "treesweep")]
#[command(about = "Random Forest land-cover accuracy, precision, recall and F1 against number of trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for forest training
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Assets and attributes shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct AssetArgs {
    /// Directory holding exported assets (`<id>.json` images, `<id>.csv` point sets)
    #[arg(long)]
    asset_root: PathBuf,

    /// Asset id of the image to classify
    #[arg(long)]
    image: String,

    /// Asset id of the labelled ground-truth points
    #[arg(long)]
    points: String,

    /// Point property holding the integer class label
    #[arg(long)]
    label: String,

    /// Comma-separated input attributes (point properties and image bands)
    #[arg(long, value_delimiter = ',', required = true)]
    inputs: Vec<String>,

    /// Resolution at which predictions are sampled at the points
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f64,
}

impl AssetArgs {
    fn settings(&self) -> Result<EvaluationSettings> {
        let settings = EvaluationSettings::new(self.label.clone(), self.inputs.clone())?
            .with_scale(self.scale)?;
        Ok(settings)
    }

    fn ids(&self) -> AssetIds<'_> {
        AssetIds {
            image: &self.image,
            points: &self.points,
        }
    }

    fn open_engine(&self, seed: u64) -> Result<LocalEngine> {
        let engine = LocalEngine::initialize(&self.asset_root)
            .context("failed to open asset root")?
            .with_seed(seed);
        Ok(engine)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the classifier at every tree count and chart the metrics
    Sweep {
        #[command(flatten)]
        assets: AssetArgs,

        /// Comma-separated, strictly increasing tree counts
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_TREE_COUNTS)]
        tree_counts: Vec<usize>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Evaluate the classifier at a single tree count
    Evaluate {
        #[command(flatten)]
        assets: AssetArgs,

        /// Number of trees in the Random Forest
        #[arg(long)]
        n_trees: usize,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct SweepOutput {
    experiment: String,
    image: String,
    points: String,
    tree_counts: Vec<usize>,
    accuracy: Vec<f64>,
    precision: Vec<f64>,
    recall: Vec<f64>,
    f1_score: Vec<f64>,
    results_path: PathBuf,
    chart_path: PathBuf,
}

#[derive(Serialize)]
struct EvaluateOutput {
    image: String,
    points: String,
    label: String,
    inputs: Vec<String>,
    scale: f64,
    #[serde(flatten)]
    evaluation: EvaluationRecord,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Bounds the pool used for tree training and per-pixel classification.
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Sweep {
            assets,
            tree_counts,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let settings = assets.settings()?;
            let counts = TreeCounts::new(tree_counts)?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let chart_path = writer.chart_path();
            let mut reporter = ChartReporter::new(&chart_path);
            let mut engine = assets.open_engine(cli.seed)?;

            let outcome = run_sweep(
                &mut engine,
                &mut reporter,
                assets.ids(),
                settings.clone(),
                &counts,
            )
            .context("tree-count sweep failed")?;

            let records: Vec<EvaluationRecord> =
                outcome.evaluations.iter().map(Evaluation::to_record).collect();
            let results_path = writer.write_sweep(
                SweepContext {
                    image: &assets.image,
                    points: &assets.points,
                    label: settings.label(),
                    inputs: settings.inputs(),
                    scale: settings.scale(),
                },
                &records,
            )?;
            engine.shutdown();

            let output = SweepOutput {
                experiment,
                image: assets.image,
                points: assets.points,
                tree_counts: counts.as_slice().to_vec(),
                accuracy: records.iter().map(|r| r.accuracy).collect(),
                precision: records.iter().map(|r| r.precision).collect(),
                recall: records.iter().map(|r| r.recall).collect(),
                f1_score: records.iter().map(|r| r.f1_score).collect(),
                results_path,
                chart_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Evaluate { assets, n_trees } => {
            let settings = assets.settings()?;
            let mut engine = assets.open_engine(cli.seed)?;

            let loaded = load_assets(&mut engine, &assets.image, &assets.points)
                .context("failed to load assets")?;
            let evaluation = SweepEvaluator::new(&mut engine, settings.clone())
                .evaluate(&loaded, n_trees)
                .with_context(|| format!("evaluation with {n_trees} trees failed"))?;
            engine.shutdown();

            let output = EvaluateOutput {
                image: assets.image,
                points: assets.points,
                label: settings.label().to_string(),
                inputs: settings.inputs().to_vec(),
                scale: settings.scale(),
                evaluation: evaluation.to_record(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
