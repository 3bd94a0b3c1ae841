//! Handling the fibersim CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;

use crate::{
    error::{FiberError, FiberResult},
    get_version,
    propagation::PropagationMode,
};

/// Command line arguments for the fibersim application.
#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    /// file path of the simulation configuration. `None` selects the reference setup.
    pub config_path: Option<PathBuf>,

    /// index profiles to simulate. `None` keeps the modes of the configuration.
    pub modes: Option<Vec<PropagationMode>>,

    /// destination directory of the report files
    pub report_directory: PathBuf,

    /// propagate the rays of each experiment in parallel
    pub parallel: bool,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct PartialArgs {
    /// file path of a YAML simulation configuration. if not defined, the reference setup is simulated
    #[arg(short, long)]
    config: Option<String>,

    /// index profile to simulate: "step", "graded" or "both". overrides the modes of the configuration
    #[arg(short, long)]
    mode: Option<String>,

    /// destination directory of the report files. if not defined, the current directory is used
    #[arg(short, long)]
    report_directory: Option<String>,

    /// propagate the rays of an experiment in parallel
    #[arg(short, long)]
    parallel: bool,
}

/// Checks if the passed file path is valid.
/// # Attributes
/// * `path`: Path to the file
/// # Returns
/// Returns True if the file exists and has a `yaml` or `yml` extension, false otherwise
fn file_path_is_valid(path: &Path) -> bool {
    Path::exists(path)
        && Path::is_file(path)
        && path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

fn eval_config_path_input(file_path: &str) -> Option<PathBuf> {
    if file_path_is_valid(Path::new(file_path)) {
        Some(PathBuf::from(file_path))
    } else {
        None
    }
}

/// Evaluates if the passed mode string is valid.
/// # Attributes
/// * `mode_input`: String description of the index profile(s)
/// # Returns
/// * `Some` list of [`PropagationMode`]s: one entry for `step` or `graded`, both modes for `both`
/// * None if the mode string is invalid
fn eval_mode_input(mode_input: &str) -> Option<Vec<PropagationMode>> {
    if mode_input == "both" {
        Some(vec![PropagationMode::Step, PropagationMode::Graded])
    } else {
        PropagationMode::from_str(mode_input).ok().map(|m| vec![m])
    }
}

/// Evaluates if the passed report-directory string is valid.
/// # Attributes
/// * `report_path`: String description of the directory of the report
/// # Returns
/// * [`Option<PathBuf>`] with the given directory if it exists
/// * None if the directory does not exist
fn eval_report_directory_input(report_path: &str) -> Option<PathBuf> {
    let r_path = Path::new(report_path);
    if Path::is_dir(r_path) {
        Some(PathBuf::from(report_path))
    } else {
        None
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = FiberError;

    fn try_from(part_args: PartialArgs) -> FiberResult<Self> {
        let config_path = part_args
            .config
            .as_deref()
            .map(|c| {
                eval_config_path_input(c).ok_or_else(|| {
                    FiberError::Console(format!(
                        "invalid configuration file: {c} (must be an existing .yaml or .yml file)"
                    ))
                })
            })
            .transpose()?;
        let modes = part_args
            .mode
            .as_deref()
            .map(|m| {
                eval_mode_input(m).ok_or_else(|| {
                    FiberError::Console(format!(
                        "invalid mode: {m} (must be \"step\", \"graded\" or \"both\")"
                    ))
                })
            })
            .transpose()?;
        let report_directory = match part_args.report_directory.as_deref() {
            Some(r) => eval_report_directory_input(r).ok_or_else(|| {
                FiberError::Console(format!("report directory {r} does not exist"))
            })?,
            None => PathBuf::from("."),
        };
        Ok(Self {
            config_path,
            modes,
            report_directory,
            parallel: part_args.parallel,
        })
    }
}

/// Creates the intro string shown when the program starts.
#[must_use]
fn create_intro() -> String {
    format!(
        "{: ^100}\n{: ^100}\n",
        "fibersim - ray propagation and modal dispersion in optical fibers",
        "version ".to_owned() + &get_version()
    )
}

/// Show the fibersim intro and the CLI version information.
pub fn show_intro() {
    println!("{}", create_intro());
}
