//! Reporting: render the four metric series against tree count.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{info, instrument};
use treesweep_metrics::Metric;

use crate::series::MetricSeries;
use crate::SweepError;

/// Receives the finished sweep. Called exactly once per sweep.
pub trait Reporter {
    /// Render the series.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Report`] if the output cannot be produced.
    fn render(&mut self, series: &MetricSeries) -> Result<(), SweepError>;
}

const CHART_SIZE: (u32, u32) = (1200, 800);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Panel color of each metric.
fn color(metric: Metric) -> RGBColor {
    match metric {
        Metric::Accuracy => BLUE,
        Metric::Precision => GREEN,
        Metric::Recall => ORANGE,
        Metric::F1 => RED,
    }
}

/// Draws a 2x2 grid of line charts (accuracy, precision, recall, F1 against
/// number of trees) into an SVG file.
pub struct ChartReporter {
    path: PathBuf,
}

impl ChartReporter {
    /// Create a reporter writing to `path` at 1200x800.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn draw(&self, series: &MetricSeries) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let root = SVGBackend::new(&self.path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let x_max = series.tree_counts().last().copied().unwrap_or(1);
        let x_range = 0..x_max + x_max / 10 + 1;

        for (panel, metric) in root.split_evenly((2, 2)).iter().zip(Metric::ALL) {
            let style = color(metric);
            let mut chart = ChartBuilder::on(panel)
                .caption(
                    format!("{} vs. Number of Trees", metric.label()),
                    ("sans-serif", 20),
                )
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x_range.clone(), 0f64..1.05)?;

            chart
                .configure_mesh()
                .x_desc("Number of Trees")
                .y_desc(metric.label())
                .draw()?;

            chart.draw_series(LineSeries::new(series.points(metric), style.stroke_width(2)))?;
            chart.draw_series(
                series
                    .points(metric)
                    .map(|point| Circle::new(point, 4, style.filled())),
            )?;
        }

        root.present()?;
        Ok(())
    }
}

impl Reporter for ChartReporter {
    #[instrument(skip_all, fields(path = %self.path.display(), n_points = series.len()))]
    fn render(&mut self, series: &MetricSeries) -> Result<(), SweepError> {
        self.draw(series).map_err(|source| SweepError::Report {
            path: self.path.clone(),
            source,
        })?;
        info!("metric chart written");
        Ok(())
    }
}
