//! General helpers shared by the concepts, activities, plugins and
//! simulator: error types, polynomial evaluation for speed and rate
//! curves, and panic reporting for WASM builds.

pub mod errors;

use errors::SimulationError;

/// Evaluates a polynomial at `x`, with coefficients ordered from the
/// highest order to the zero order.
pub fn evaluate_polynomial(coefficients: &[f64], x: f64) -> Result<f64, SimulationError> {
    if coefficients.is_empty() {
        return Err(SimulationError::EmptyPolynomial);
    }
    Ok(coefficients
        .iter()
        .fold(0.0, |acc, coefficient| acc * x + coefficient))
}

/// Installs `console_error_panic_hook` when the feature is enabled, so
/// panics in the browser end up in the console.  Safe to call repeatedly.
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_from_highest_order() {
        // 2x^2 - 3x + 1 at x = 2
        assert_eq!(evaluate_polynomial(&[2.0, -3.0, 1.0], 2.0).unwrap(), 3.0);
        // constant
        assert_eq!(evaluate_polynomial(&[7.0], 11.0).unwrap(), 7.0);
    }

    #[test]
    fn empty_polynomial_is_rejected() {
        assert!(matches!(
            evaluate_polynomial(&[], 1.0),
            Err(SimulationError::EmptyPolynomial)
        ));
    }
}
