// src/models/gbm.rs
//! Geometric Brownian Motion (Black-Scholes)
//!
//! ```text
//! dS_t = μ S_t dt + σ S_t dW_t
//! S_t  = S_0 exp((μ - σ²/2) t + σ W_t)
//! ```

use super::model::SDEModel;
use crate::error::{validation::*, SdeResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(mu: f64, sigma: f64) -> SdeResult<Self> {
        validate_finite("mu", mu)?;
        validate_finite("sigma", sigma)?;
        validate_positive("sigma", sigma)?;
        Ok(Gbm { mu, sigma })
    }

    /// Exact value at `t` given `S_0` and the Brownian value `W_t`
    pub fn exact_solution(&self, s0: f64, t: f64, w_t: f64) -> f64 {
        s0 * ((self.mu - 0.5 * self.sigma * self.sigma) * t + self.sigma * w_t).exp()
    }
}

impl SDEModel for Gbm {
    fn drift(&self, s: f64, _t: f64) -> f64 {
        self.mu * s
    }

    fn diffusion(&self, s: f64, _t: f64) -> f64 {
        self.sigma * s
    }

    fn diffusion_derivative(&self, _s: f64, _t: f64) -> f64 {
        self.sigma
    }

    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        Some((self.mu, self.sigma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_volatility() {
        assert!(Gbm::new(0.0, 0.0).is_err());
        assert!(Gbm::new(f64::NAN, 0.2).is_err());
        assert!(Gbm::new(0.05, 0.2).is_ok());
    }

    #[test]
    fn test_exact_solution_without_noise() {
        let gbm = Gbm::new(0.1, 0.2).unwrap();
        let expected = 100.0 * ((0.1 - 0.02) * 2.0f64).exp();
        assert!((gbm.exact_solution(100.0, 2.0, 0.0) - expected).abs() < 1e-12);
        assert_eq!(gbm.lognormal_parameters(), Some((0.1, 0.2)));
    }
}
