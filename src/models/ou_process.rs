// src/models/ou_process.rs
//! Ornstein-Uhlenbeck Process
//!
//! ```text
//! dX_t = θ (m - X_t) dt + σ dW_t
//! ```
//! Mean reverting with additive noise; not log-normal, and it can cross zero,
//! so it pairs with the Euler and Milstein schemes only.

use super::model::SDEModel;
use crate::error::{validation::*, SdeResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuProcess {
    pub theta: f64,
    pub mean: f64,
    pub sigma: f64,
}

impl OuProcess {
    pub fn new(theta: f64, mean: f64, sigma: f64) -> SdeResult<Self> {
        validate_non_negative("theta", theta)?;
        validate_finite("theta", theta)?;
        validate_finite("mean", mean)?;
        validate_positive("sigma", sigma)?;
        validate_finite("sigma", sigma)?;
        Ok(OuProcess { theta, mean, sigma })
    }

    /// `E[X_t | X_0 = x0]`
    pub fn expected_value(&self, x0: f64, t: f64) -> f64 {
        self.mean + (x0 - self.mean) * (-self.theta * t).exp()
    }

    /// `Var[X_t | X_0]`
    pub fn variance(&self, t: f64) -> f64 {
        if self.theta == 0.0 {
            self.sigma * self.sigma * t
        } else {
            self.sigma * self.sigma * (1.0 - (-2.0 * self.theta * t).exp()) / (2.0 * self.theta)
        }
    }
}

impl SDEModel for OuProcess {
    fn drift(&self, x: f64, _t: f64) -> f64 {
        self.theta * (self.mean - x)
    }

    fn diffusion(&self, _x: f64, _t: f64) -> f64 {
        self.sigma
    }

    fn diffusion_derivative(&self, _x: f64, _t: f64) -> f64 {
        0.0
    }
}
