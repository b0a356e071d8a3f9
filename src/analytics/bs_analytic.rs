// src/analytics/bs_analytic.rs
//! Closed-form Black-Scholes prices of European options
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//! and
//! ```text
//! d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T),   d₂ = d₁ - σ√T
//! ```
//! These serve as reference values for the Monte Carlo schemes.

use crate::math_utils::norm_cdf;

fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// `C = S Φ(d₁) - K e^(-rT) Φ(d₂)`
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// `P = K e^(-rT) Φ(-d₂) - S Φ(-d₁)`
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}
