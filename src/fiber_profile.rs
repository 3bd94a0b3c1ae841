#![warn(missing_docs)]
//! Physical and numerical parameters of an optical fiber.
//!
//! A [`FiberProfile`] is shared (read-only) by all rays of a
//! [`DispersionExperiment`](crate::experiment::DispersionExperiment). It is validated once on
//! construction so that the integrator never has to deal with degenerate values.
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Length, Velocity},
    length::micrometer,
    velocity::meter_per_second,
};

use crate::{
    error::{FiberError, FiberResult},
    meter_per_second, micrometer,
    propagation::TIME_UNIT_SCALE,
    utils::math_utils::{linspace, usize_to_f64},
};

/// Immutable description of a fiber core.
///
/// Lengths are stored in micrometers and the speed of light in meters per second. This is the unit
/// system the propagation arithmetic is defined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FiberProfileData")]
pub struct FiberProfile {
    length_um: f64,
    core_radius_um: f64,
    center_index: f64,
    index_delta: f64,
    speed_of_light_mps: f64,
    step_count: usize,
}

#[derive(Deserialize)]
struct FiberProfileData {
    length_um: f64,
    core_radius_um: f64,
    center_index: f64,
    index_delta: f64,
    speed_of_light_mps: f64,
    step_count: usize,
}

impl TryFrom<FiberProfileData> for FiberProfile {
    type Error = FiberError;

    fn try_from(data: FiberProfileData) -> FiberResult<Self> {
        Self::new(
            data.length_um,
            data.core_radius_um,
            data.center_index,
            data.index_delta,
            data.speed_of_light_mps,
            data.step_count,
        )
    }
}

impl Default for FiberProfile {
    /// Create the reference fiber:
    ///   - length: `2000 µm`
    ///   - core radius: `50 µm`
    ///   - refractive index on axis: `1.5`
    ///   - relative index contrast: `0.01`
    ///   - speed of light: `3e8 m/s`
    ///   - number of axial steps: `5000`
    fn default() -> Self {
        Self {
            length_um: 2000.0,
            core_radius_um: 50.0,
            center_index: 1.5,
            index_delta: 0.01,
            speed_of_light_mps: 3.0e8,
            step_count: 5000,
        }
    }
}

impl FiberProfile {
    /// Creates a new [`FiberProfile`] from plain numbers.
    ///
    /// Lengths are given in micrometers, the speed of light in meters per second. Use
    /// [`FiberProfile::from_quantities`] for unit-aware construction.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - the fiber length is <= 0.0 or not finite
    ///   - the core radius is <= 0.0 or not finite
    ///   - the center refractive index is < 1.0 or not finite
    ///   - the index contrast is outside `[0.0, 1.0)` or not finite
    ///   - the speed of light is <= 0.0 or not finite
    ///   - the step count is zero
    pub fn new(
        length_um: f64,
        core_radius_um: f64,
        center_index: f64,
        index_delta: f64,
        speed_of_light_mps: f64,
        step_count: usize,
    ) -> FiberResult<Self> {
        if length_um <= 0.0 || !length_um.is_finite() {
            return Err(FiberError::Configuration(
                "fiber length must be >0 and finite".into(),
            ));
        }
        if core_radius_um <= 0.0 || !core_radius_um.is_finite() {
            return Err(FiberError::Configuration(
                "core radius must be >0 and finite".into(),
            ));
        }
        if center_index < 1.0 || !center_index.is_finite() {
            return Err(FiberError::Configuration(
                "center refractive index must be >=1.0 and finite".into(),
            ));
        }
        if !(0.0..1.0).contains(&index_delta) {
            return Err(FiberError::Configuration(
                "index contrast must be in the range [0.0, 1.0)".into(),
            ));
        }
        if speed_of_light_mps <= 0.0 || !speed_of_light_mps.is_finite() {
            return Err(FiberError::Configuration(
                "speed of light must be >0 and finite".into(),
            ));
        }
        if step_count == 0 {
            return Err(FiberError::Configuration(
                "number of axial steps must be >0".into(),
            ));
        }
        Ok(Self {
            length_um,
            core_radius_um,
            center_index,
            index_delta,
            speed_of_light_mps,
            step_count,
        })
    }
    /// Creates a new [`FiberProfile`] from unit-aware quantities.
    ///
    /// **Note**: the quantities are converted to micrometers and meters per second. Depending on
    /// the unit used for construction this conversion may change the last digit of a value.
    ///
    /// # Errors
    ///
    /// This function returns an error under the same conditions as [`FiberProfile::new`].
    pub fn from_quantities(
        length: Length,
        core_radius: Length,
        center_index: f64,
        index_delta: f64,
        speed_of_light: Velocity,
        step_count: usize,
    ) -> FiberResult<Self> {
        Self::new(
            length.get::<micrometer>(),
            core_radius.get::<micrometer>(),
            center_index,
            index_delta,
            speed_of_light.get::<meter_per_second>(),
            step_count,
        )
    }
    /// Returns the axial length of this [`FiberProfile`].
    #[must_use]
    pub fn length(&self) -> Length {
        micrometer!(self.length_um)
    }
    /// Returns the core radius of this [`FiberProfile`].
    #[must_use]
    pub fn core_radius(&self) -> Length {
        micrometer!(self.core_radius_um)
    }
    /// Returns the refractive index on the fiber axis.
    #[must_use]
    pub const fn center_index(&self) -> f64 {
        self.center_index
    }
    /// Returns the relative index contrast of this [`FiberProfile`].
    #[must_use]
    pub const fn index_delta(&self) -> f64 {
        self.index_delta
    }
    /// Returns the speed of light used for the transit time calculation.
    #[must_use]
    pub fn speed_of_light(&self) -> Velocity {
        meter_per_second!(self.speed_of_light_mps)
    }
    /// Returns the number of axial integration steps.
    #[must_use]
    pub const fn step_count(&self) -> usize {
        self.step_count
    }
    /// Returns the axial step size (`length / step_count`).
    #[must_use]
    pub fn step_size(&self) -> Length {
        micrometer!(self.step_size_um())
    }
    pub(crate) const fn length_um(&self) -> f64 {
        self.length_um
    }
    pub(crate) const fn core_radius_um(&self) -> f64 {
        self.core_radius_um
    }
    pub(crate) const fn speed_of_light_mps(&self) -> f64 {
        self.speed_of_light_mps
    }
    pub(crate) fn step_size_um(&self) -> f64 {
        self.length_um / usize_to_f64(self.step_count)
    }
    /// Returns the axial sample positions (in µm) the trajectories are plotted against.
    ///
    /// The grid contains `step_count` values linearly spaced over `[0, length]` (both ends included).
    #[must_use]
    pub fn axial_grid(&self) -> Vec<f64> {
        // both bounds are validated finite values
        linspace(0.0, self.length_um, self.step_count).unwrap_or_default()
    }
    /// Returns the transit time of an on-axis ray through a uniform core of index `center_index`.
    ///
    /// This is the closed-form lower bound of all step-index arrival times.
    #[must_use]
    pub fn axial_transit_time(&self) -> f64 {
        self.length_um * self.center_index / (self.speed_of_light_mps * TIME_UNIT_SCALE)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use crate::millimeter;
    use uom::si::length::millimeter;
    fn profile(
        length: f64,
        radius: f64,
        n1: f64,
        delta: f64,
        c: f64,
        steps: usize,
    ) -> FiberResult<FiberProfile> {
        FiberProfile::new(length, radius, n1, delta, c, steps)
    }
    #[test]
    fn default() {
        let p = FiberProfile::default();
        assert_relative_eq!(p.length().get::<millimeter>(), 2.0);
        assert_relative_eq!(p.core_radius().get::<micrometer>(), 50.0);
        assert_eq!(p.center_index(), 1.5);
        assert_eq!(p.index_delta(), 0.01);
        assert_relative_eq!(p.speed_of_light().get::<meter_per_second>(), 3.0e8);
        assert_eq!(p.step_count(), 5000);
        assert_eq!(p.step_size_um(), 0.4);
    }
    #[test]
    fn new_matches_default() {
        let p = profile(2000.0, 50.0, 1.5, 0.01, 3.0e8, 5000).unwrap();
        assert_eq!(p, FiberProfile::default());
        assert_relative_eq!(p.step_size().get::<micrometer>(), 0.4);
    }
    #[test]
    fn from_quantities() {
        let p = FiberProfile::from_quantities(
            millimeter!(2.0),
            micrometer!(50.0),
            1.5,
            0.01,
            meter_per_second!(3.0e8),
            5000,
        )
        .unwrap();
        assert_relative_eq!(p.length_um(), 2000.0, max_relative = 1e-12);
        assert_relative_eq!(p.core_radius_um(), 50.0, max_relative = 1e-12);
        assert_relative_eq!(p.speed_of_light_mps(), 3.0e8);
        assert!(FiberProfile::from_quantities(
            millimeter!(2.0),
            micrometer!(-50.0),
            1.5,
            0.01,
            meter_per_second!(3.0e8),
            5000,
        )
        .is_err());
    }
    #[test]
    fn new_invalid_length() {
        assert!(profile(0.0, 50.0, 1.5, 0.01, 3.0e8, 5000).is_err());
        assert!(profile(-1.0, 50.0, 1.5, 0.01, 3.0e8, 5000).is_err());
        assert!(profile(f64::NAN, 50.0, 1.5, 0.01, 3.0e8, 5000).is_err());
        assert!(profile(f64::INFINITY, 50.0, 1.5, 0.01, 3.0e8, 5000).is_err());
    }
    #[test]
    fn new_invalid_core_radius() {
        assert_eq!(
            profile(2000.0, 0.0, 1.5, 0.01, 3.0e8, 5000).unwrap_err(),
            FiberError::Configuration("core radius must be >0 and finite".into())
        );
        assert!(profile(2000.0, -5.0, 1.5, 0.01, 3.0e8, 5000).is_err());
        assert!(profile(2000.0, f64::NAN, 1.5, 0.01, 3.0e8, 5000).is_err());
    }
    #[test]
    fn new_invalid_index() {
        assert!(profile(2000.0, 50.0, 0.9, 0.01, 3.0e8, 5000).is_err());
        assert!(profile(2000.0, 50.0, f64::NAN, 0.01, 3.0e8, 5000).is_err());
        assert!(profile(2000.0, 50.0, 1.0, 0.01, 3.0e8, 5000).is_ok());
    }
    #[test]
    fn new_invalid_delta() {
        assert!(profile(2000.0, 50.0, 1.5, -0.01, 3.0e8, 5000).is_err());
        assert!(profile(2000.0, 50.0, 1.5, 1.0, 3.0e8, 5000).is_err());
        assert!(profile(2000.0, 50.0, 1.5, f64::NAN, 3.0e8, 5000).is_err());
        assert!(profile(2000.0, 50.0, 1.5, 0.0, 3.0e8, 5000).is_ok());
    }
    #[test]
    fn new_invalid_speed_and_steps() {
        assert!(profile(2000.0, 50.0, 1.5, 0.01, 0.0, 5000).is_err());
        assert!(profile(2000.0, 50.0, 1.5, 0.01, f64::INFINITY, 5000).is_err());
        assert_eq!(
            profile(2000.0, 50.0, 1.5, 0.01, 3.0e8, 0).unwrap_err(),
            FiberError::Configuration("number of axial steps must be >0".into())
        );
    }
    #[test]
    fn axial_grid() {
        let p = profile(10.0, 50.0, 1.5, 0.01, 3.0e8, 11).unwrap();
        let grid = p.axial_grid();
        assert_eq!(grid.len(), 11);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[10], 10.0);
        assert_relative_eq!(grid[5], 5.0);
        assert_eq!(FiberProfile::default().axial_grid().len(), 5000);
    }
    #[test]
    fn axial_transit_time() {
        assert_relative_eq!(FiberProfile::default().axial_transit_time(), 10.0);
    }
    #[test]
    fn serde_roundtrip_validates() {
        let json = serde_json::to_string(&FiberProfile::default()).unwrap();
        let p: FiberProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(p, FiberProfile::default());
        let invalid = json.replace("\"core_radius_um\":50.0", "\"core_radius_um\":0.0");
        assert!(serde_json::from_str::<FiberProfile>(&invalid).is_err());
    }
}
