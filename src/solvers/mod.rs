// src/solvers/mod.rs
//! Discretization Schemes
//!
//! Every scheme advances a path through the same update rule
//! ```text
//! X_i = T( T⁻¹(X_{i-1}) + drift(X_{i-1}, i) + diffusion(X_{i-1}, i) )
//! ```
//! and differs only in its drift and diffusion increments and in the
//! transform pair `(T, T⁻¹)`. The simulation engine runs one stepping loop for
//! all of them.

pub mod euler_maruyama;
pub mod log_euler;
pub mod milstein;

pub use euler_maruyama::EulerMaruyama;
pub use log_euler::LogEuler;
pub use milstein::Milstein;

use crate::models::model::SDEModel;

/// Data of the step producing `X_i` from `X_{i-1}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    /// `i`, the index of the value being produced
    pub time_index: usize,
    /// `t_{i-1}`
    pub t: f64,
    /// `t_i - t_{i-1}`
    pub dt: f64,
    /// Brownian increment over `[t_{i-1}, t_i]` of the driving factor
    pub dw: f64,
}

pub trait DiscretizationScheme: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deterministic increment in transformed coordinates
    fn drift(&self, previous: f64, step: &StepContext) -> f64;

    /// Stochastic increment in transformed coordinates
    fn diffusion(&self, previous: f64, step: &StepContext) -> f64;

    /// `T`, maps simulated coordinates back to the process
    fn transform(&self, y: f64) -> f64 {
        y
    }

    /// `T⁻¹`, maps the process into simulated coordinates
    fn inverse_transform(&self, x: f64) -> f64 {
        x
    }

    /// `(μ, σ)` of the underlying model when it is log-normal
    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        None
    }
}

impl<S: DiscretizationScheme + ?Sized> DiscretizationScheme for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn drift(&self, previous: f64, step: &StepContext) -> f64 {
        (**self).drift(previous, step)
    }

    fn diffusion(&self, previous: f64, step: &StepContext) -> f64 {
        (**self).diffusion(previous, step)
    }

    fn transform(&self, y: f64) -> f64 {
        (**self).transform(y)
    }

    fn inverse_transform(&self, x: f64) -> f64 {
        (**self).inverse_transform(x)
    }

    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        (**self).lognormal_parameters()
    }
}

/// Scheme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeKind {
    #[default]
    Euler,
    LogEuler,
    Milstein,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 3] = [SchemeKind::Euler, SchemeKind::LogEuler, SchemeKind::Milstein];

    pub fn build<M: SDEModel + 'static>(self, model: M) -> Box<dyn DiscretizationScheme> {
        match self {
            SchemeKind::Euler => Box::new(EulerMaruyama::new(model)),
            SchemeKind::LogEuler => Box::new(LogEuler::new(model)),
            SchemeKind::Milstein => Box::new(Milstein::new(model)),
        }
    }
}
