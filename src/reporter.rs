#![warn(missing_docs)]
//! Report generation for dispersion results
//!
//! The reporter is a pure consumer of [`DispersionResult`]s. It exports arrival times and
//! trajectories as CSV, writes a JSON summary, and renders an SVG figure showing the ray paths
//! next to a histogram of the arrival times.
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use log::{info, warn};
use plotters::{coord::Shift, prelude::*};
use serde::Serialize;

use crate::{
    error::{FiberError, FiberResult},
    experiment::{DispersionComparison, DispersionResult, RayResult},
    fiber_profile::FiberProfile,
    propagation::PropagationMode,
    utils::math_utils::{f64_to_usize, linspace, min_max, usize_to_f64},
};

/// Number of histogram bins used for the arrival time plot.
pub const HISTOGRAM_BINS: usize = 10;

const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Equal-width histogram of a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}
impl Histogram {
    /// Creates a histogram of `values` with `bins` equal-width bins spanning `[min, max]`.
    ///
    /// All bins are half-open except the last one, which also contains `max`. If all values are
    /// equal, the bins span `[value - 0.5, value + 0.5]`.
    ///
    /// # Errors
    ///
    /// This function returns an error if `values` is empty or contains non-finite values, or if
    /// `bins` is zero.
    pub fn new(values: &[f64], bins: usize) -> FiberResult<Self> {
        if bins == 0 {
            return Err(FiberError::Other(
                "number of histogram bins must be >0".into(),
            ));
        }
        let (min, max) = min_max(values).ok_or_else(|| {
            FiberError::Other("histogram needs at least one value and only finite values".into())
        })?;
        let (first, last) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let edges = linspace(first, last, bins + 1)?;
        let mut counts = vec![0; bins];
        let width = last - first;
        for value in values {
            let idx = f64_to_usize((value - first) / width * usize_to_f64(bins)).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Self { edges, counts })
    }
    /// Returns the bin edges (`bins + 1` values).
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }
    /// Returns the number of values in each bin.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
    /// Returns an iterator over `(lower edge, upper edge, count)` of all bins.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(e, c)| (e[0], e[1], *c))
    }
}

#[derive(Debug, Serialize)]
struct ArrivalRecord {
    launch_angle_deg: f64,
    arrival_time_ps: f64,
    reflections: usize,
}
impl From<&RayResult> for ArrivalRecord {
    fn from(ray: &RayResult) -> Self {
        Self {
            launch_angle_deg: ray.launch_angle_deg(),
            arrival_time_ps: ray.arrival_time(),
            reflections: ray.trajectory().reflections(),
        }
    }
}

/// Machine-readable summary of a [`DispersionResult`].
#[derive(Debug, Serialize)]
pub struct DispersionSummary {
    mode: PropagationMode,
    profile: FiberProfile,
    rays: Vec<ArrivalRecord>,
    earliest_ps: f64,
    latest_ps: f64,
    pulse_spread_ps: f64,
}
impl From<&DispersionResult> for DispersionSummary {
    fn from(result: &DispersionResult) -> Self {
        Self {
            mode: result.mode(),
            profile: result.profile().clone(),
            rays: result.rays().iter().map(ArrivalRecord::from).collect(),
            earliest_ps: result.earliest(),
            latest_ps: result.latest(),
            pulse_spread_ps: result.pulse_spread(),
        }
    }
}

fn report_error<E: std::fmt::Display>(context: &str) -> impl Fn(E) -> FiberError + '_ {
    move |e| FiberError::Report(format!("{context}: {e}"))
}

/// Generator for all report files of a [`DispersionResult`].
pub struct ReportGenerator<'a> {
    result: &'a DispersionResult,
}
impl<'a> ReportGenerator<'a> {
    /// Creates a new [`ReportGenerator`].
    #[must_use]
    pub const fn new(result: &'a DispersionResult) -> Self {
        Self { result }
    }
    fn file_path(&self, directory: &Path, suffix: &str, extension: &str) -> PathBuf {
        let mut path = directory.to_path_buf();
        path.push(format!("{}_{suffix}", self.result.mode()));
        path.set_extension(extension);
        path
    }
    /// Writes the launch angles, arrival times and reflection counts of all rays as CSV.
    ///
    /// # Errors
    ///
    /// This function returns an error if the file cannot be created or written.
    pub fn write_arrival_times_csv(&self, path: &Path) -> FiberResult<()> {
        let mut writer =
            csv::Writer::from_path(path).map_err(report_error("creating csv file failed"))?;
        for ray in self.result.rays() {
            writer
                .serialize(ArrivalRecord::from(ray))
                .map_err(report_error("writing csv record failed"))?;
        }
        writer
            .flush()
            .map_err(report_error("writing csv file failed"))?;
        info!("Write arrival times to {}", path.display());
        Ok(())
    }
    /// Writes the trajectories of all rays as CSV.
    ///
    /// The first column contains the axial position, followed by one column per ray.
    ///
    /// # Errors
    ///
    /// This function returns an error if the file cannot be created or written.
    pub fn write_trajectories_csv(&self, path: &Path) -> FiberResult<()> {
        let mut writer =
            csv::Writer::from_path(path).map_err(report_error("creating csv file failed"))?;
        let rays = self.result.rays();
        let mut header = vec!["x_um".to_owned()];
        header.extend((0..rays.len()).map(|idx| format!("ray_{idx}")));
        writer
            .write_record(&header)
            .map_err(report_error("writing csv header failed"))?;
        for (sample, x) in self.result.profile().axial_grid().iter().enumerate() {
            let mut record = vec![x.to_string()];
            record.extend(
                rays.iter()
                    .map(|r| r.trajectory().positions()[sample].to_string()),
            );
            writer
                .write_record(&record)
                .map_err(report_error("writing csv record failed"))?;
        }
        writer
            .flush()
            .map_err(report_error("writing csv file failed"))?;
        info!("Write trajectories to {}", path.display());
        Ok(())
    }
    /// Writes a JSON summary (profile, arrival times, pulse spread).
    ///
    /// # Errors
    ///
    /// This function returns an error if the file cannot be created or written.
    pub fn write_summary_json(&self, path: &Path) -> FiberResult<()> {
        let summary = DispersionSummary::from(self.result);
        let json = serde_json::to_string_pretty(&summary)
            .map_err(report_error("serialization of summary failed"))?;
        let mut file = File::create(path).map_err(report_error("creating json file failed"))?;
        write!(file, "{json}").map_err(report_error("writing json file failed"))?;
        info!("Write summary to {}", path.display());
        Ok(())
    }
    /// Renders the ray paths and the arrival time histogram into an SVG file.
    ///
    /// # Errors
    ///
    /// This function returns an error if the plot cannot be rendered or written.
    pub fn plot(&self, path: &Path) -> FiberResult<()> {
        let root = SVGBackend::new(path, (1500, 500)).into_drawing_area();
        root.fill(&WHITE).map_err(report_error("plotting failed"))?;
        let (ray_area, pulse_area) = root.split_horizontally(1125);
        self.plot_rays(&ray_area)?;
        self.plot_pulse(&pulse_area)?;
        root.present().map_err(report_error("plotting failed"))?;
        info!("Write plot to {}", path.display());
        Ok(())
    }
    fn plot_rays<B: DrawingBackend>(&self, area: &DrawingArea<B, Shift>) -> FiberResult<()> {
        let profile = self.result.profile();
        let length = profile.length_um();
        let core_radius = profile.core_radius_um();
        let y_limit = 1.1
            * self
                .result
                .rays()
                .iter()
                .map(|r| r.trajectory().max_excursion())
                .fold(core_radius, f64::max);
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{}-Index: Ray Propagation", self.result.mode().title()),
                ("sans-serif", 20),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..length, -y_limit..y_limit)
            .map_err(report_error("plotting failed"))?;
        chart
            .configure_mesh()
            .x_desc("Distance (x)")
            .y_desc("Core Position (y)")
            .draw()
            .map_err(report_error("plotting failed"))?;
        let grid = profile.axial_grid();
        for (idx, ray) in self.result.rays().iter().enumerate() {
            let color = Palette99::pick(idx).mix(0.7);
            chart
                .draw_series(LineSeries::new(
                    grid.iter()
                        .copied()
                        .zip(ray.trajectory().positions().iter().copied()),
                    color.stroke_width(1),
                ))
                .map_err(report_error("plotting failed"))?;
        }
        for boundary in [core_radius, -core_radius] {
            chart
                .draw_series(LineSeries::new(
                    [(0.0, boundary), (length, boundary)],
                    BLACK.stroke_width(1),
                ))
                .map_err(report_error("plotting failed"))?;
        }
        Ok(())
    }
    fn plot_pulse<B: DrawingBackend>(&self, area: &DrawingArea<B, Shift>) -> FiberResult<()> {
        let histogram = Histogram::new(&self.result.arrival_times(), HISTOGRAM_BINS)?;
        let edges = histogram.edges();
        let (x_min, x_max) = (edges[0], edges[edges.len() - 1]);
        let y_max = usize_to_f64(histogram.counts().iter().copied().max().unwrap_or(0) + 1);
        let mut chart = ChartBuilder::on(area)
            .caption("Signal Pulse at Exit", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(report_error("plotting failed"))?;
        chart
            .configure_mesh()
            .x_desc("Time of Arrival (ps)")
            .y_desc("Intensity")
            .x_labels(4)
            .draw()
            .map_err(report_error("plotting failed"))?;
        chart
            .draw_series(histogram.bins().map(|(lower, upper, count)| {
                Rectangle::new([(lower, 0.0), (upper, usize_to_f64(count))], ORANGE.filled())
            }))
            .map_err(report_error("plotting failed"))?;
        chart
            .draw_series(histogram.bins().map(|(lower, upper, count)| {
                Rectangle::new(
                    [(lower, 0.0), (upper, usize_to_f64(count))],
                    BLACK.stroke_width(1),
                )
            }))
            .map_err(report_error("plotting failed"))?;
        let text_x = 0.3f64.mul_add(x_max - x_min, x_min);
        let font = ("sans-serif", 16).into_font().color(&RED);
        chart
            .draw_series([
                Text::new("Pulse Spread:".to_owned(), (text_x, 0.85 * y_max), font.clone()),
                Text::new(
                    format!("{:.4} ps", self.result.pulse_spread()),
                    (text_x, 0.78 * y_max),
                    font,
                ),
            ])
            .map_err(report_error("plotting failed"))?;
        Ok(())
    }
    /// Writes all report files into the given directory and returns their paths.
    ///
    /// The file names are prefixed with the propagation mode, e.g. `graded_arrival_times.csv`.
    /// A failing plot (e.g. due to missing fonts) is logged as warning and skipped.
    ///
    /// # Errors
    ///
    /// This function returns an error if one of the CSV or JSON files cannot be written.
    pub fn write_all(&self, directory: &Path) -> FiberResult<Vec<PathBuf>> {
        let arrival_times = self.file_path(directory, "arrival_times", "csv");
        self.write_arrival_times_csv(&arrival_times)?;
        let trajectories = self.file_path(directory, "trajectories", "csv");
        self.write_trajectories_csv(&trajectories)?;
        let summary = self.file_path(directory, "summary", "json");
        self.write_summary_json(&summary)?;
        let mut files = vec![arrival_times, trajectories, summary];
        let plot = self.file_path(directory, "dispersion", "svg");
        match self.plot(&plot) {
            Ok(()) => files.push(plot),
            Err(e) => warn!("plot {} could not be created: {e}", plot.display()),
        }
        Ok(files)
    }
}

/// Writes a [`DispersionComparison`] as `comparison.json` into the given directory.
///
/// # Errors
///
/// This function returns an error if the file cannot be created or written.
pub fn write_comparison(directory: &Path, comparison: &DispersionComparison) -> FiberResult<PathBuf> {
    #[derive(Serialize)]
    struct ComparisonRecord {
        step_spread_ps: f64,
        graded_spread_ps: f64,
        reduction_factor: Option<f64>,
    }
    let record = ComparisonRecord {
        step_spread_ps: comparison.step_spread(),
        graded_spread_ps: comparison.graded_spread(),
        reduction_factor: comparison.reduction_factor(),
    };
    let mut path = directory.to_path_buf();
    path.push("comparison.json");
    let json = serde_json::to_string_pretty(&record)
        .map_err(report_error("serialization of comparison failed"))?;
    let mut file = File::create(&path).map_err(report_error("creating json file failed"))?;
    write!(file, "{json}").map_err(report_error("writing json file failed"))?;
    info!("Write comparison to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, experiment::DispersionExperiment};
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;
    fn small_result(mode: PropagationMode) -> DispersionResult {
        let profile = FiberProfile::new(100.0, 50.0, 1.5, 0.01, 3.0e8, 11).unwrap();
        DispersionExperiment::new(profile, mode, degree!(1.0, 6.0, 12.0))
            .unwrap()
            .run()
    }
    #[test]
    fn histogram_counts() {
        let h = Histogram::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 10).unwrap();
        assert_eq!(h.edges().len(), 11);
        assert_eq!(h.edges()[0], 0.0);
        assert_eq!(h.edges()[10], 10.0);
        assert_eq!(h.counts(), &[1, 1, 1, 1, 1, 0, 0, 0, 0, 1]);
        assert_eq!(h.counts().iter().sum::<usize>(), 6);
    }
    #[test]
    fn histogram_equal_values() {
        let h = Histogram::new(&[3.0, 3.0, 3.0], 10).unwrap();
        assert_relative_eq!(h.edges()[0], 2.5);
        assert_relative_eq!(h.edges()[10], 3.5);
        assert_eq!(h.counts()[5], 3);
        assert_eq!(h.counts().iter().sum::<usize>(), 3);
    }
    #[test]
    fn histogram_bins_iterator() {
        let h = Histogram::new(&[0.0, 1.0], 2).unwrap();
        let bins: Vec<_> = h.bins().collect();
        assert_eq!(bins, vec![(0.0, 0.5, 1), (0.5, 1.0, 1)]);
    }
    #[test]
    fn histogram_invalid() {
        assert!(Histogram::new(&[], 10).is_err());
        assert!(Histogram::new(&[1.0, f64::NAN], 10).is_err());
        assert!(Histogram::new(&[1.0], 0).is_err());
    }
    #[test]
    fn histogram_of_reference_step_run() {
        let result = DispersionExperiment::with_reference_angles(
            FiberProfile::default(),
            PropagationMode::Step,
        )
        .run();
        let h = Histogram::new(&result.arrival_times(), HISTOGRAM_BINS).unwrap();
        assert_eq!(h.counts().iter().sum::<usize>(), 10);
        assert_eq!(h.counts()[0], 3);
        assert_eq!(h.counts()[9], 1);
    }
    #[test]
    fn arrival_times_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arrival.csv");
        let result = small_result(PropagationMode::Step);
        ReportGenerator::new(&result)
            .write_arrival_times_csv(&path)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "launch_angle_deg,arrival_time_ps,reflections");
    }
    #[test]
    fn trajectories_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trajectories.csv");
        let result = small_result(PropagationMode::Graded);
        ReportGenerator::new(&result)
            .write_trajectories_csv(&path)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "x_um,ray_0,ray_1,ray_2");
        assert_eq!(lines[1], "0,0,0,0");
        assert!(lines[11].starts_with("100,"));
    }
    #[test]
    fn summary_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let result = small_result(PropagationMode::Step);
        ReportGenerator::new(&result)
            .write_summary_json(&path)
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mode"], "step");
        assert_eq!(value["profile"]["step_count"], 11);
        assert_eq!(value["rays"].as_array().unwrap().len(), 3);
        assert_relative_eq!(
            value["pulse_spread_ps"].as_f64().unwrap(),
            result.pulse_spread()
        );
    }
    #[test]
    fn write_all_files() {
        let dir = TempDir::new().unwrap();
        let result = small_result(PropagationMode::Graded);
        let files = ReportGenerator::new(&result).write_all(dir.path()).unwrap();
        assert!(files.len() >= 3);
        assert_eq!(files[0], dir.path().join("graded_arrival_times.csv"));
        assert_eq!(files[1], dir.path().join("graded_trajectories.csv"));
        assert_eq!(files[2], dir.path().join("graded_summary.json"));
        for file in &files {
            assert!(file.is_file());
        }
    }
    #[test]
    fn write_all_invalid_directory() {
        let result = small_result(PropagationMode::Step);
        assert!(matches!(
            ReportGenerator::new(&result).write_all(Path::new("./this_dir_does_not_exist")),
            Err(FiberError::Report(_))
        ));
    }
    #[test]
    fn comparison_json() {
        let dir = TempDir::new().unwrap();
        let step = small_result(PropagationMode::Step);
        let graded = small_result(PropagationMode::Graded);
        let comparison = DispersionComparison::new(&step, &graded).unwrap();
        let path = write_comparison(dir.path(), &comparison).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_relative_eq!(
            value["step_spread_ps"].as_f64().unwrap(),
            step.pulse_spread()
        );
        assert_relative_eq!(
            value["graded_spread_ps"].as_f64().unwrap(),
            graded.pulse_spread()
        );
    }
}
