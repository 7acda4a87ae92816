//! The utilities module provides general capabilities, that may span the
//! input modeling, models, output analysis, and simulator modules.  The
//! utilities are centered around error reporting and parameter validation.

pub mod errors;

use errors::SimulationError;

/// Probabilities are accepted only within the closed interval [0, 1].  NaN
/// is rejected along with everything else outside of that interval, and
/// nothing is clamped.
pub fn validate_probability(name: &'static str, value: f64) -> Result<f64, SimulationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimulationError::InvalidProbability { name, value })
    }
}

/// Rates and scales must be finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::InvalidParameter {
            name,
            value,
            reason: "must be finite and greater than zero",
        })
    }
}

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see
/// <https://github.com/rustwasm/console_error_panic_hook#readme>
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
