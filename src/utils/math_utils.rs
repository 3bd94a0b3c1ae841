//! Small numeric helpers shared by the integrator, the experiment and the reporter.
use log::warn;

use crate::error::{FiberError, FiberResult};

#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

#[must_use]
pub const fn f64_to_usize(value: f64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let newval = value as usize;
    newval
}

/// Creates a linearly spaced vector from `start` to `end` with `num` elements.
///
/// The last element is set to `end` exactly, so that e.g. `linspace(1.0, 12.0, 10)` really
/// ends at `12.0` and not at a value differing in the last digit.
///
/// # Errors
/// This function will return an error if `start` or `end` are not finite.
pub fn linspace(start: f64, end: f64, num: usize) -> FiberResult<Vec<f64>> {
    if !start.is_finite() || !end.is_finite() {
        return Err(FiberError::Other(
            "start and end values must be finite!".into(),
        ));
    }
    if num < 2 {
        warn!("Using linspace with less than two elements results in an empty Vector for num=0 or a Vector with one entry being num=start");
        return Ok(vec![start; num]);
    }
    let bin_size = (end - start) / usize_to_f64(num - 1);
    let mut values: Vec<f64> = (0..num)
        .map(|step| usize_to_f64(step) * bin_size + start)
        .collect();
    values[num - 1] = end;
    Ok(values)
}

/// Returns the minimum and maximum of the given values.
///
/// Returns `None` for an empty slice or if any value is not finite.
#[must_use]
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(values.iter().copied().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(current_min, current_max), val| (current_min.min(val), current_max.max(val)),
    ))
}
