//! Visualization module for GA runs.
//!
//! Generates SVG line charts of the convergence trace (mean and best fitness
//! per generation). Generations whose mean is `NoPath` leave a gap in the
//! mean line.

use crate::solution::Solution;
use std::fs;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 500.0,
            margin: 60.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an SVG chart of the convergence trace of a solution
    pub fn convergence_svg(&self, solution: &Solution) -> String {
        let history = &solution.generation_history;
        let mean: Vec<Option<f64>> = history.iter().map(|r| r.mean_fitness.value()).collect();
        let best: Vec<Option<f64>> = history.iter().map(|r| r.best_fitness.value()).collect();

        let finite: Vec<f64> = mean.iter().chain(best.iter()).filter_map(|v| *v).collect();
        let min_y = finite.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_y = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut svg = String::new();
        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .axis {{ stroke: #2c3e50; stroke-width: 1.5; }}
    .mean {{ stroke: #3498db; stroke-width: 2; fill: none; }}
    .best {{ stroke: #e74c3c; stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 11px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">{} | Generations: {} | Final distance: {}</text>
"##,
            self.margin, solution.algorithm, history.len(), solution.path_distance
        ));

        let (left, right) = (self.margin, self.width - self.margin);
        let (top, bottom) = (self.margin, self.height - self.margin);

        svg.push_str(&format!(
            r#"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" class="axis"/>
<line x1="{l}" y1="{t}" x2="{l}" y2="{b}" class="axis"/>
"#,
            l = left, r = right, t = top, b = bottom
        ));

        if finite.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">No traversable tour in any generation</text>
"#,
                (left + right) / 2.0, (top + bottom) / 2.0
            ));
            svg.push_str("</svg>");
            return svg;
        }

        let span_x = (history.len().saturating_sub(1)).max(1) as f64;
        let span_y = (max_y - min_y).max(1e-9);
        let transform = |generation: usize, value: f64| -> (f64, f64) {
            let x = left + generation as f64 / span_x * (right - left);
            let y = bottom - (value - min_y) / span_y * (bottom - top);
            (x, y)
        };

        for (series, class) in [(&mean, "mean"), (&best, "best")] {
            for segment in Self::segments(series) {
                let points: Vec<String> = segment
                    .iter()
                    .map(|&(g, v)| {
                        let (x, y) = transform(g, v);
                        format!("{:.2},{:.2}", x, y)
                    })
                    .collect();
                svg.push_str(&format!(
                    r#"<polyline points="{}" class="{}"/>
"#,
                    points.join(" "),
                    class
                ));
            }
        }

        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" class="label" text-anchor="end">{:.2}</text>
<text x="{:.2}" y="{:.2}" class="label" text-anchor="end">{:.2}</text>
<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">generation</text>
"#,
            left - 5.0, top + 4.0, max_y,
            left - 5.0, bottom, min_y,
            (left + right) / 2.0, bottom + 30.0
        ));

        let legend_y = self.height - 20.0;
        svg.push_str(&format!(r##"
<rect x="{}" y="{}" width="15" height="4" fill="#3498db"/>
<text x="{}" y="{}" class="label">Mean fitness</text>
<rect x="{}" y="{}" width="15" height="4" fill="#e74c3c"/>
<text x="{}" y="{}" class="label">Best fitness</text>
"##,
            left, legend_y, left + 20.0, legend_y + 5.0,
            left + 120.0, legend_y, left + 140.0, legend_y + 5.0
        ));

        svg.push_str("</svg>");

        svg
    }

    /// Split a series into runs of consecutive finite values
    fn segments(series: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for (generation, value) in series.iter().enumerate() {
            match value {
                Some(v) => current.push((generation, *v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        fs::write(path, svg)
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(&self, solution: &Solution) -> String {
        let mut data = String::new();

        data.push_str("# GA-TSP Convergence Data\n");
        data.push_str(&format!("# Final distance: {}\n", solution.path_distance));
        data.push_str(&format!("# Path: {:?}\n\n", solution.path));

        data.push_str("generation,mean_fitness,best_fitness\n");
        let show = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        for record in &solution.generation_history {
            data.push_str(&format!("{},{},{}\n",
                record.generation,
                show(record.mean_fitness.value()),
                show(record.best_fitness.value())));
        }

        data
    }
}
