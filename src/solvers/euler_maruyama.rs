// src/solvers/euler_maruyama.rs
//! Euler-Maruyama Scheme for SDE Integration
//!
//! # Mathematical Framework
//!
//! For a general SDE:
//! ```text
//! dX_t = a(X_t, t) dt + b(X_t, t) dW_t
//! ```
//!
//! The Euler-Maruyama scheme provides the discretization:
//! ```text
//! X_{n+1} = X_n + a(X_n, t_n) Δt + b(X_n, t_n) ΔW_n
//! ```
//! with identity transform.
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 0.5 in step size
//! - **Weak convergence**: Order 1.0 in step size
//! - **Stability**: Conditionally stable (depends on drift/diffusion)

use super::{DiscretizationScheme, StepContext};
use crate::models::model::SDEModel;

/// Euler-Maruyama numerical scheme for SDE integration
#[derive(Debug, Clone, Copy)]
pub struct EulerMaruyama<M> {
    model: M,
}

impl<M: SDEModel> EulerMaruyama<M> {
    pub fn new(model: M) -> Self {
        EulerMaruyama { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: SDEModel> DiscretizationScheme for EulerMaruyama<M> {
    fn name(&self) -> &'static str {
        "Euler"
    }

    /// `a(X_n, t_n) Δt`
    fn drift(&self, previous: f64, step: &StepContext) -> f64 {
        self.model.drift(previous, step.t) * step.dt
    }

    /// `b(X_n, t_n) ΔW_n`
    fn diffusion(&self, previous: f64, step: &StepContext) -> f64 {
        self.model.diffusion(previous, step.t) * step.dw
    }

    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        self.model.lognormal_parameters()
    }
}
