#![warn(missing_docs)]
//! Modal dispersion experiment
//!
//! A [`DispersionExperiment`] launches a bundle of rays under different angles into a fiber,
//! propagates each of them with a [`RayIntegrator`] and compares their arrival times. The spread
//! between the earliest and the latest ray is the pulse spread caused by modal dispersion.
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use uom::si::{angle::degree, f64::Angle};

use crate::{
    degree,
    error::{FiberError, FiberResult},
    fiber_profile::FiberProfile,
    propagation::{PropagationMode, RayIntegrator},
    ray::{RayState, Trajectory},
    utils::math_utils::linspace,
};

/// Returns the reference set of launch angles: 10 angles evenly spaced from 1° to 12°.
#[must_use]
pub fn reference_launch_angles() -> Vec<Angle> {
    linspace(1.0, 12.0, 10)
        .unwrap_or_default()
        .into_iter()
        .map(|a| degree!(a))
        .collect()
}

/// Configuration of a single dispersion run.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionExperiment {
    profile: FiberProfile,
    mode: PropagationMode,
    launch_angles: Vec<Angle>,
}
impl DispersionExperiment {
    /// Creates a new [`DispersionExperiment`].
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - the list of launch angles is empty
    ///   - a launch angle is not finite
    ///   - the magnitude of a launch angle is >= 90°
    pub fn new(
        profile: FiberProfile,
        mode: PropagationMode,
        launch_angles: Vec<Angle>,
    ) -> FiberResult<Self> {
        if launch_angles.is_empty() {
            return Err(FiberError::Configuration(
                "at least one launch angle is required".into(),
            ));
        }
        for angle in &launch_angles {
            let angle_deg = angle.get::<degree>();
            if !angle_deg.is_finite() {
                return Err(FiberError::Configuration(
                    "launch angles must be finite".into(),
                ));
            }
            if angle_deg.abs() >= 90.0 {
                return Err(FiberError::Configuration(format!(
                    "launch angle {angle_deg}° is not propagating along the fiber (|angle| must be < 90°)"
                )));
            }
        }
        Ok(Self {
            profile,
            mode,
            launch_angles,
        })
    }
    /// Creates a [`DispersionExperiment`] with the reference launch angles (see [`reference_launch_angles`]).
    #[must_use]
    pub fn with_reference_angles(profile: FiberProfile, mode: PropagationMode) -> Self {
        Self {
            profile,
            mode,
            launch_angles: reference_launch_angles(),
        }
    }
    /// Returns a reference to the [`FiberProfile`] of this [`DispersionExperiment`].
    #[must_use]
    pub const fn profile(&self) -> &FiberProfile {
        &self.profile
    }
    /// Returns the [`PropagationMode`] of this [`DispersionExperiment`].
    #[must_use]
    pub const fn mode(&self) -> PropagationMode {
        self.mode
    }
    /// Returns the launch angles of this [`DispersionExperiment`].
    #[must_use]
    pub fn launch_angles(&self) -> &[Angle] {
        &self.launch_angles
    }
    /// Propagates all rays sequentially in the order of the launch angles.
    #[must_use]
    pub fn run(&self) -> DispersionResult {
        self.log_start();
        let integrator = RayIntegrator::new(&self.profile, self.mode);
        let rays = self
            .launch_angles
            .iter()
            .map(|angle| Self::trace(&integrator, *angle))
            .collect();
        self.finish(rays)
    }
    /// Propagates all rays in parallel.
    ///
    /// The rays are independent of each other, so the result is identical to [`DispersionExperiment::run`].
    /// The ray order still follows the order of the launch angles.
    #[must_use]
    pub fn run_parallel(&self) -> DispersionResult {
        self.log_start();
        let integrator = RayIntegrator::new(&self.profile, self.mode);
        let rays = self
            .launch_angles
            .par_iter()
            .map(|angle| Self::trace(&integrator, *angle))
            .collect();
        self.finish(rays)
    }
    fn log_start(&self) {
        info!(
            "Performing {}-index dispersion analysis with {} rays.",
            self.mode,
            self.launch_angles.len()
        );
    }
    fn trace(integrator: &RayIntegrator<'_>, launch_angle: Angle) -> RayResult {
        let (trajectory, arrival_time) = integrator
            .propagate(RayState::launch(launch_angle))
            .into_parts();
        RayResult {
            launch_angle,
            arrival_time,
            trajectory,
        }
    }
    fn finish(&self, rays: Vec<RayResult>) -> DispersionResult {
        let core_radius = self.profile.core_radius_um();
        for ray in &rays {
            debug!(
                "ray {:.2}°: arrival time {:.6} ps, {} reflections",
                ray.launch_angle_deg(),
                ray.arrival_time,
                ray.trajectory.reflections()
            );
            let excursion = ray.trajectory.max_excursion();
            if self.mode == PropagationMode::Graded && excursion > core_radius {
                warn!(
                    "ray launched at {:.2}° leaves the core (max. excursion {excursion:.2} µm > core radius {core_radius} µm). Index profile is extrapolated beyond the core.",
                    ray.launch_angle_deg()
                );
            }
        }
        let result = DispersionResult {
            mode: self.mode,
            profile: self.profile.clone(),
            rays,
        };
        info!(
            "{}-index pulse spread: {:.4} ps",
            self.mode,
            result.pulse_spread()
        );
        result
    }
}

/// Outcome of a single ray of a [`DispersionExperiment`].
#[derive(Debug, Clone, PartialEq)]
pub struct RayResult {
    launch_angle: Angle,
    arrival_time: f64,
    trajectory: Trajectory,
}
impl RayResult {
    /// Returns the launch angle of this ray.
    #[must_use]
    pub const fn launch_angle(&self) -> Angle {
        self.launch_angle
    }
    /// Returns the launch angle of this ray in degrees.
    #[must_use]
    pub fn launch_angle_deg(&self) -> f64 {
        self.launch_angle.get::<degree>()
    }
    /// Returns the arrival time at the fiber end.
    #[must_use]
    pub const fn arrival_time(&self) -> f64 {
        self.arrival_time
    }
    /// Returns the [`Trajectory`] of this ray.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }
}

/// Arrival times of all rays of a [`DispersionExperiment`] and the resulting pulse spread.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionResult {
    mode: PropagationMode,
    profile: FiberProfile,
    rays: Vec<RayResult>,
}
impl DispersionResult {
    /// Returns the [`PropagationMode`] the rays were propagated with.
    #[must_use]
    pub const fn mode(&self) -> PropagationMode {
        self.mode
    }
    /// Returns the [`FiberProfile`] the rays were propagated through.
    #[must_use]
    pub const fn profile(&self) -> &FiberProfile {
        &self.profile
    }
    /// Returns all rays in the order of the launch angles.
    #[must_use]
    pub fn rays(&self) -> &[RayResult] {
        &self.rays
    }
    /// Returns the arrival times in the order of the launch angles.
    #[must_use]
    pub fn arrival_times(&self) -> Vec<f64> {
        self.rays.iter().map(RayResult::arrival_time).collect()
    }
    /// Returns the earliest arrival time.
    #[must_use]
    pub fn earliest(&self) -> f64 {
        self.rays
            .iter()
            .map(RayResult::arrival_time)
            .fold(f64::INFINITY, f64::min)
    }
    /// Returns the latest arrival time.
    #[must_use]
    pub fn latest(&self) -> f64 {
        self.rays
            .iter()
            .map(RayResult::arrival_time)
            .fold(f64::NEG_INFINITY, f64::max)
    }
    /// Returns the pulse spread, i.e. the difference between the latest and the earliest arrival time.
    #[must_use]
    pub fn pulse_spread(&self) -> f64 {
        self.latest() - self.earliest()
    }
}

/// Comparison of the pulse spreads of a step-index and a graded-index fiber.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DispersionComparison {
    step_spread: f64,
    graded_spread: f64,
}
impl DispersionComparison {
    /// Creates a new [`DispersionComparison`].
    ///
    /// # Errors
    ///
    /// This function returns an error if the results were not created with
    /// [`PropagationMode::Step`] and [`PropagationMode::Graded`] respectively.
    pub fn new(step: &DispersionResult, graded: &DispersionResult) -> FiberResult<Self> {
        if step.mode() != PropagationMode::Step || graded.mode() != PropagationMode::Graded {
            return Err(FiberError::Other(
                "comparison requires one step-index and one graded-index result".into(),
            ));
        }
        Ok(Self {
            step_spread: step.pulse_spread(),
            graded_spread: graded.pulse_spread(),
        })
    }
    /// Returns the pulse spread of the step-index fiber.
    #[must_use]
    pub const fn step_spread(&self) -> f64 {
        self.step_spread
    }
    /// Returns the pulse spread of the graded-index fiber.
    #[must_use]
    pub const fn graded_spread(&self) -> f64 {
        self.graded_spread
    }
    /// Returns the ratio `graded / step` of the pulse spreads.
    ///
    /// Returns `None` if the step-index fiber shows no dispersion at all.
    #[must_use]
    pub fn reduction_factor(&self) -> Option<f64> {
        if self.step_spread > 0.0 {
            Some(self.graded_spread / self.step_spread)
        } else {
            None
        }
    }
}
