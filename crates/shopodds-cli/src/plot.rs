use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

use shopodds_core::Distribution;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Render(String),
}

/// Draws the bought-count distribution as a PNG bar chart. Bars at or above
/// `desired` are highlighted.
pub fn render_distribution(
    path: impl AsRef<Path>,
    distribution: &Distribution,
    desired: usize,
    caption: &str,
) -> Result<PathBuf, PlotError> {
    let output_path = path.as_ref().to_path_buf();
    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| PlotError::Io {
            context: "creating plot directory",
            source: e,
        })?;
    }

    // Trailing outcomes with negligible mass only squash the chart.
    let shown = distribution
        .iter()
        .filter(|(k, p)| *p >= 1e-4 || *k <= desired)
        .map(|(k, _)| k)
        .max()
        .unwrap_or(0)
        + 1;
    let bars: Vec<f64> = distribution.probabilities()[..shown.min(distribution.len())].to_vec();
    let caption = caption.to_string();

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let plot_attempt = std::panic::catch_unwind(move || {
        let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::Render(e.to_string()))?;

        let y_max = bars.iter().copied().fold(0.0f64, f64::max).max(0.05) * 1.1;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(caption.as_str(), ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0..bars.len(), 0.0..y_max)
            .map_err(|e| PlotError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .y_desc("P(exactly)")
            .x_desc("Copies bought")
            .y_label_formatter(&|v| format!("{:.0}%", v * 100.0))
            .draw()
            .map_err(|e| PlotError::Render(e.to_string()))?;

        chart
            .draw_series(bars.iter().enumerate().map(|(idx, p)| {
                let color = if idx >= desired { &GREEN } else { &BLUE };
                Rectangle::new([(idx, 0.0), (idx + 1, *p)], color.filled())
            }))
            .map_err(|e| PlotError::Render(e.to_string()))?;

        drop(chart);

        root.present()
            .map_err(|e| PlotError::Render(e.to_string()))?;

        drop(root);

        Ok(output_path)
    });

    std::panic::set_hook(prev_hook);

    match plot_attempt {
        Ok(result) => result,
        Err(_) => Err(PlotError::Render(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}
