// src/models/model.rs
/// Scalar Itô SDE `dX_t = a(X_t, t) dt + b(X_t, t) dW_t`
pub trait SDEModel: Send + Sync {
    /// `a(x, t)`
    fn drift(&self, x: f64, t: f64) -> f64;

    /// `b(x, t)`
    fn diffusion(&self, x: f64, t: f64) -> f64;

    /// `∂b/∂x (x, t)`, used by the Milstein correction
    fn diffusion_derivative(&self, x: f64, t: f64) -> f64;

    /// `(μ, σ)` when the model is a geometric Brownian motion
    /// `dX = μ X dt + σ X dW`, `None` otherwise.
    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        None
    }
}

impl<M: SDEModel + ?Sized> SDEModel for Box<M> {
    fn drift(&self, x: f64, t: f64) -> f64 {
        (**self).drift(x, t)
    }

    fn diffusion(&self, x: f64, t: f64) -> f64 {
        (**self).diffusion(x, t)
    }

    fn diffusion_derivative(&self, x: f64, t: f64) -> f64 {
        (**self).diffusion_derivative(x, t)
    }

    fn lognormal_parameters(&self) -> Option<(f64, f64)> {
        (**self).lognormal_parameters()
    }
}
