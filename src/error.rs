//! Input validation errors.
//!
//! Only entry points validate. Once a trial has started it cannot fail on
//! bad input; an out-of-range index inside a trial is a bug and panics.

use thiserror::Error;

/// Errors returned by lattice generation and sweep configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PercolationError {
    /// Height or width is zero, or the cell count overflows `usize`.
    #[error("lattice dimensions must be positive and addressable, got {height}x{width}")]
    InvalidDimension { height: usize, width: usize },

    /// Occupation probability outside [0, 1] (or NaN).
    #[error("occupation probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Sweep parameters that cannot produce an estimate.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, PercolationError>;

/// Reject zero-sized lattices and lattices whose cell count overflows.
///
/// Returns the number of cells on success.
pub fn check_dimensions(height: usize, width: usize) -> Result<usize> {
    match height.checked_mul(width) {
        Some(cells) if cells > 0 => Ok(cells),
        _ => Err(PercolationError::InvalidDimension { height, width }),
    }
}

/// Reject probabilities outside the closed unit interval.
pub fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(PercolationError::InvalidProbability(p));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            check_dimensions(0, 5),
            Err(PercolationError::InvalidDimension { height: 0, width: 5 })
        );
        assert!(check_dimensions(3, 0).is_err());
        assert_eq!(check_dimensions(1, 1), Ok(1));
        assert_eq!(check_dimensions(4, 7), Ok(28));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let height = usize::MAX / 2 + 1;
        assert_eq!(
            check_dimensions(height, 2),
            Err(PercolationError::InvalidDimension { height, width: 2 })
        );
        assert!(check_dimensions(usize::MAX, usize::MAX).is_err());
        assert_eq!(check_dimensions(usize::MAX, 1), Ok(usize::MAX));
    }

    #[test]
    fn test_probability_bounds() {
        assert!(check_probability(0.0).is_ok());
        assert!(check_probability(1.0).is_ok());
        assert!(check_probability(-0.01).is_err());
        assert!(check_probability(1.0001).is_err());
        assert!(check_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = PercolationError::InvalidDimension { height: 0, width: 4 };
        assert_eq!(err.to_string(), "lattice dimensions must be positive and addressable, got 0x4");
        let err = PercolationError::InvalidConfiguration("no probabilities".into());
        assert_eq!(err.to_string(), "invalid configuration: no probabilities");
    }
}
