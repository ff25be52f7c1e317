//! Polynomial path representation
//!
//! The upstream curve-fit stage describes the planned lateral offset as a
//! polynomial in the longitudinal coordinate, y = f(x) = Σ cᵢ·xⁱ, with
//! coefficients ordered by ascending power.

use serde::{Deserialize, Serialize};

use super::PlanningError;

/// Coefficients of a path polynomial, index = power of x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialCoefficients(Vec<f64>);

impl PolynomialCoefficients {
    /// Build a coefficient set, rejecting empty or non-finite input
    pub fn new(coefficients: Vec<f64>) -> Result<Self, PlanningError> {
        if coefficients.is_empty() {
            return Err(PlanningError::EmptyCoefficients);
        }
        for (index, &value) in coefficients.iter().enumerate() {
            if !value.is_finite() {
                return Err(PlanningError::NonFiniteCoefficient { index, value });
            }
        }
        Ok(PolynomialCoefficients(coefficients))
    }

    /// Degree of the polynomial
    pub fn degree(&self) -> usize {
        self.0.len() - 1
    }

    /// Evaluate f(x) by Horner's rule
    pub fn eval(&self, x: f64) -> f64 {
        self.0.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// The raw coefficient slice, ascending power order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
