// src/solvers/log_euler.rs
//! Log-Euler Scheme
//!
//! # Mathematical Framework
//!
//! Itô's formula applied to `Y = ln X` for `dX = a dt + b dW` gives
//! ```text
//! dY_t = ( a/X - b²/(2X²) ) dt + (b/X) dW_t
//! ```
//! The scheme runs Euler on `Y` and maps back with `X = exp(Y)`:
//! ```text
//! Y_{n+1} = Y_n + ( a(X_n)/X_n - b(X_n)²/(2X_n²) ) Δt + (b(X_n)/X_n) ΔW_n
//! ```
//! For geometric Brownian motion the increments become `(μ - σ²/2) Δt` and
//! `σ ΔW`, and the scheme reproduces the exact solution on the grid.
//!
//! Paths stay strictly positive. The process must be positive to start
//! with, since `T⁻¹ = ln`.

use super::{DiscretizationScheme, StepContext};
use crate::models::model::SDEModel;

#[derive(Debug, Clone, Copy)]
pub struct LogEuler<M> {
    model: M,
}

impl<M: SDEModel> LogEuler<M> {
    pub fn new(model: M) -> Self {
        LogEuler { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: SDEModel> DiscretizationScheme for LogEuler<M> {
    fn name(&self) -> &'static str {
        "LogEuler"
    }

    fn drift(&self, previous: f64, step: &StepContext) -> f64 {
        let a = self.model.drift(previous, step.t);
        let b = self.model.diffusion(previous, step.t);
        (a / previous - 0.5 * b * b / (previous * previous)) * step.dt
    }

    fn diffusion(&self, previous: f64, step: &StepContext) -> f64 {
        self.model.diffusion(previous, step.t) / previous * step.dw
    }

    fn transform(&self, y: f64) -> f64 {
        y.exp()
    }

    fn inverse_transform(&self, x: f64) -> f64 {
        x.ln()
    }

    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        self.model.lognormal_parameters()
    }
}
