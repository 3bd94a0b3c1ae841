#![warn(missing_docs)]
//! Module for handling a meridional ray inside a fiber core
//!
//! A [`RayState`] is the mutable state of a single ray which is advanced step by step by the
//! [`RayIntegrator`](crate::propagation::RayIntegrator). Its lateral position history is
//! collected in a [`Trajectory`].
use serde::Serialize;
use uom::si::{angle::radian, f64::Angle};

///Struct that contains the propagation state of a single ray
#[derive(Debug, Clone, PartialEq)]
pub struct RayState {
    /// signed lateral offset from the fiber axis (µm)
    pub(crate) lateral_position: f64,
    /// derivative of the lateral position with respect to the axial distance
    pub(crate) slope: f64,
    /// optical travel time accumulated so far
    pub(crate) accumulated_time: f64,
}
impl RayState {
    /// Creates a new [`RayState`] entering the fiber on axis under the given launch angle.
    ///
    /// The launch angle is measured against the optical axis. The initial slope is `tan(angle)`.
    #[must_use]
    pub fn launch(angle: Angle) -> Self {
        Self {
            lateral_position: 0.0,
            slope: angle.get::<radian>().tan(),
            accumulated_time: 0.0,
        }
    }
    /// Returns the lateral position (in µm) of this [`RayState`].
    #[must_use]
    pub const fn lateral_position(&self) -> f64 {
        self.lateral_position
    }
    /// Returns the slope of this [`RayState`].
    #[must_use]
    pub const fn slope(&self) -> f64 {
        self.slope
    }
    /// Returns the accumulated optical travel time of this [`RayState`].
    #[must_use]
    pub const fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }
}

/// Lateral positions of a ray, one per axial sample.
///
/// Besides the positions, the refractive index used for each step as well as the number of
/// reflections at the core boundary are recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    positions: Vec<f64>,
    local_indices: Vec<f64>,
    reflections: usize,
}
impl Trajectory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            local_indices: Vec::with_capacity(capacity),
            reflections: 0,
        }
    }
    pub(crate) fn push(&mut self, position: f64, local_index: f64) {
        self.positions.push(position);
        self.local_indices.push(local_index);
    }
    pub(crate) fn add_reflection(&mut self) {
        self.reflections += 1;
    }
    /// Returns the lateral positions (in µm) of this [`Trajectory`].
    ///
    /// Entry `i` is the position at the beginning of integration step `i`.
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }
    /// Returns the local refractive index used for each integration step.
    #[must_use]
    pub fn local_indices(&self) -> &[f64] {
        &self.local_indices
    }
    /// Returns the number of reflections at the core boundary.
    #[must_use]
    pub const fn reflections(&self) -> usize {
        self.reflections
    }
    /// Returns the number of samples of this [`Trajectory`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }
    /// Returns `true` if this [`Trajectory`] has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
    /// Returns the largest absolute lateral position of this [`Trajectory`].
    #[must_use]
    pub fn max_excursion(&self) -> f64 {
        self.positions.iter().fold(0.0, |max, p| f64::max(max, p.abs()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::degree;
    use approx::assert_relative_eq;
    #[test]
    fn launch() {
        let state = RayState::launch(degree!(45.0));
        assert_eq!(state.lateral_position(), 0.0);
        assert_relative_eq!(state.slope(), 1.0);
        assert_eq!(state.accumulated_time(), 0.0);
    }
    #[test]
    fn launch_negative_angle() {
        let state = RayState::launch(degree!(-10.0));
        assert_relative_eq!(state.slope(), -(10.0_f64.to_radians().tan()));
    }
    #[test]
    fn launch_on_axis() {
        assert_eq!(RayState::launch(degree!(0.0)).slope(), 0.0);
    }
    #[test]
    fn trajectory_default() {
        let t = Trajectory::default();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert_eq!(t.reflections(), 0);
        assert_eq!(t.max_excursion(), 0.0);
    }
    #[test]
    fn trajectory_push() {
        let mut t = Trajectory::with_capacity(3);
        t.push(0.0, 1.5);
        t.push(-2.5, 1.5);
        t.push(1.0, 1.4);
        t.add_reflection();
        assert_eq!(t.len(), 3);
        assert_eq!(t.positions(), &[0.0, -2.5, 1.0]);
        assert_eq!(t.local_indices(), &[1.5, 1.5, 1.4]);
        assert_eq!(t.reflections(), 1);
        assert_eq!(t.max_excursion(), 2.5);
    }
}
