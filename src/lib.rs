#![allow(clippy::module_name_repetitions)]
//! This is the documentation for the **fibersim** software package. **fibersim** traces meridional
//! rays through step-index and graded-index optical fibers and quantifies the resulting modal
//! dispersion.
//!
//! A typical workflow:
//!   - describe the fiber by a [`FiberProfile`](fiber_profile::FiberProfile)
//!   - set up a [`DispersionExperiment`](experiment::DispersionExperiment) with a
//!     [`PropagationMode`](propagation::PropagationMode) and a list of launch angles
//!   - run it and inspect the [`DispersionResult`](experiment::DispersionResult) or write it with
//!     the [`ReportGenerator`](reporter::ReportGenerator)
pub mod config;

pub mod console;

pub mod error;

pub mod experiment;

pub mod fiber_profile;

pub mod propagation;

pub mod ray;

pub mod reporter;

pub mod utils;

/// Returns the version of the fibersim package.
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}
