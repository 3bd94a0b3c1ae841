#![warn(missing_docs)]
//! Fixed-step ray integrator for step-index and graded-index fiber cores
//!
//! The integrator advances a [`RayState`] along the fiber axis in `step_count` equal steps. Each
//! step
//!   1. records the current lateral position,
//!   2. derives the path increment `ds = sqrt(dx² + dy²)` from the slope at the start of the step,
//!   3. updates position and slope according to the [`PropagationMode`],
//!   4. adds the optical travel time `n_local · ds / (c · TIME_UNIT_SCALE)`.
//!
//! In graded mode the path increment is still derived from the slope held at the beginning of the
//! step, while the position is advanced with the already updated slope (semi-implicit Euler).
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    fiber_profile::FiberProfile,
    ray::{RayState, Trajectory},
};

/// Scale factor applied to the speed of light in the transit time calculation.
///
/// With axial distances in µm and the speed of light in m/s, the accumulated times are in ps.
pub const TIME_UNIT_SCALE: f64 = 1e-6;

/// Refractive index profile of the fiber core.
#[derive(
    Default,
    Debug,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropagationMode {
    #[default]
    /// Uniform core index. Rays are guided by total internal reflection at the core boundary.
    Step,
    /// Parabolic core index. Rays are continuously bent back towards the axis.
    Graded,
}
impl PropagationMode {
    /// Returns the capitalized name of this mode as used in plot titles.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Step => "Step",
            Self::Graded => "Graded",
        }
    }
}

/// Result of propagating a single ray through the whole fiber.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagatedRay {
    trajectory: Trajectory,
    arrival_time: f64,
}
impl PropagatedRay {
    /// Returns the recorded [`Trajectory`].
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }
    /// Returns the total travel time at the fiber end.
    #[must_use]
    pub const fn arrival_time(&self) -> f64 {
        self.arrival_time
    }
    /// Splits this [`PropagatedRay`] into trajectory and arrival time.
    #[must_use]
    pub fn into_parts(self) -> (Trajectory, f64) {
        (self.trajectory, self.arrival_time)
    }
}

/// Advances rays through a [`FiberProfile`] under a given [`PropagationMode`].
///
/// The integrator does not validate anything. It relies on the invariants established by
/// [`FiberProfile::new`].
#[derive(Debug, Clone)]
pub struct RayIntegrator<'a> {
    profile: &'a FiberProfile,
    mode: PropagationMode,
    step_size: f64,
    time_scale: f64,
}
impl<'a> RayIntegrator<'a> {
    /// Creates a new [`RayIntegrator`].
    #[must_use]
    pub fn new(profile: &'a FiberProfile, mode: PropagationMode) -> Self {
        Self {
            profile,
            mode,
            step_size: profile.step_size_um(),
            time_scale: profile.speed_of_light_mps() * TIME_UNIT_SCALE,
        }
    }
    /// Returns the [`PropagationMode`] of this [`RayIntegrator`].
    #[must_use]
    pub const fn mode(&self) -> PropagationMode {
        self.mode
    }
    /// Performs a single axial integration step.
    ///
    /// The lateral position held at the beginning of the step is appended to the `trajectory`
    /// together with the local refractive index used for the travel time.
    pub fn step(&self, state: &mut RayState, trajectory: &mut Trajectory) {
        let dx = self.step_size;
        let position = state.lateral_position;
        let dy = state.slope * dx;
        let ds = (dx * dx + dy * dy).sqrt();
        let center_index = self.profile.center_index();
        let core_radius = self.profile.core_radius_um();
        let local_index = match self.mode {
            PropagationMode::Step => {
                state.lateral_position += dy;
                // idealized total internal reflection: no correction of the overshoot
                if state.lateral_position.abs() >= core_radius {
                    state.slope = -state.slope;
                    trajectory.add_reflection();
                }
                center_index
            }
            PropagationMode::Graded => {
                let delta = self.profile.index_delta();
                let relative_position = position / core_radius;
                let local_index =
                    center_index * (1.0 - delta * (relative_position * relative_position));
                let acceleration =
                    -(2.0 * center_index * delta / (core_radius * core_radius)) * position;
                state.slope += acceleration * dx;
                state.lateral_position += state.slope * dx;
                local_index
            }
        };
        trajectory.push(position, local_index);
        state.accumulated_time += (local_index * ds) / self.time_scale;
    }
    /// Propagates a ray from the fiber entrance to the fiber end.
    ///
    /// The state is consumed; the [`Trajectory`] with `step_count` samples and the final
    /// accumulated time are returned.
    #[must_use]
    pub fn propagate(&self, mut state: RayState) -> PropagatedRay {
        let step_count = self.profile.step_count();
        let mut trajectory = Trajectory::with_capacity(step_count);
        for _ in 0..step_count {
            self.step(&mut state, &mut trajectory);
        }
        PropagatedRay {
            trajectory,
            arrival_time: state.accumulated_time,
        }
    }
}
