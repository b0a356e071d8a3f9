// src/distributions/exponential.rs
use super::Distribution;
use crate::error::{validation::*, SdeResult};

/// Exponential law with intensity `lambda`
///
/// ```text
/// f(x) = λ e^(-λx),   F(x) = 1 - e^(-λx),   F⁻¹(p) = -ln(1 - p) / λ
/// ```
/// for `x ≥ 0`; density and CDF vanish on the negative half-line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    lambda: f64,
}

impl Exponential {
    pub fn new(lambda: f64) -> SdeResult<Self> {
        validate_finite("lambda", lambda)?;
        validate_positive("lambda", lambda)?;
        Ok(Self { lambda })
    }

    /// Exponential law with intensity one
    pub fn unit() -> Self {
        Self { lambda: 1.0 }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl Distribution for Exponential {
    fn density(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.lambda * (-self.lambda * x).exp()
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            -(-self.lambda * x).exp_m1()
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        -(-p).ln_1p() / self.lambda
    }

    fn analytic_mean(&self) -> f64 {
        1.0 / self.lambda
    }

    fn analytic_std_dev(&self) -> f64 {
        1.0 / self.lambda
    }
}
