// src/mc/payoffs.rs
//! Option Payoffs on Simulated Paths
//!
//! - **European call**: `max(S_T - K, 0)`
//! - **European put**: `max(K - S_T, 0)`
//! - **Asian call**: `max(A - K, 0)` with `A` the arithmetic average of the
//!   path over all grid points
//!
//! Prices are discounted ensemble averages
//! ```text
//! V = e^(-r (T - t₀)) · (1/N) Σ_p payoff(path_p)
//! ```

use super::mc_engine::SdeSimulationEngine;
use crate::analytics::bs_analytic;
use crate::error::{validation::*, SdeError, SdeResult};
use crate::solvers::DiscretizationScheme;
use crate::stats::running::RunningStats;
use ndarray::ArrayView1;
use rayon::prelude::*;

/// Tolerance when matching the model drift against the discount rate
const DRIFT_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    EuropeanCall { k: f64 },
    EuropeanPut { k: f64 },
    AsianCall { k: f64 },
}

impl Payoff {
    /// Payoff of one path `[S_0, …, S_T]`; NaN for an empty path
    pub fn calculate(&self, path: ArrayView1<'_, f64>) -> f64 {
        let terminal = match path.iter().next_back() {
            Some(&s) => s,
            None => return f64::NAN,
        };
        match *self {
            Payoff::EuropeanCall { k } => (terminal - k).max(0.0),
            Payoff::EuropeanPut { k } => (k - terminal).max(0.0),
            Payoff::AsianCall { k } => {
                let average = path.sum() / path.len() as f64;
                (average - k).max(0.0)
            }
        }
    }

    pub fn strike(&self) -> f64 {
        match *self {
            Payoff::EuropeanCall { k } | Payoff::EuropeanPut { k } | Payoff::AsianCall { k } => k,
        }
    }
}

/// Discounted Monte Carlo price of `payoff` over the engine's ensemble.
///
/// Returns `(price, variance_of_estimate)`; the variance is the sample
/// variance of the discounted payoffs divided by the number of paths.
pub fn price_payoff<S: DiscretizationScheme>(
    engine: &SdeSimulationEngine<S>,
    payoff: Payoff,
    rate: f64,
) -> SdeResult<(f64, f64)> {
    validate_finite("rate", rate)?;
    validate_finite("strike", payoff.strike())?;
    engine.check_finite()?;

    let paths = engine.paths();
    let maturity = engine.time_horizon() - engine.grid().initial_time();
    let discount = (-rate * maturity).exp();

    let payoffs: Vec<f64> = (0..engine.number_of_paths())
        .into_par_iter()
        .map(|p| payoff.calculate(paths.column(p)))
        .collect();
    let stats: RunningStats = payoffs.into_iter().collect();

    let n = stats.count() as f64;
    let variance = if stats.count() > 1 {
        discount * discount * stats.sample_variance() / n
    } else {
        0.0
    };
    Ok((discount * stats.mean(), variance))
}

/// `|V_MC - V_BS| / V_BS · 100` for a European call.
///
/// The engine's model must be log-normal with drift equal to `rate`,
/// otherwise the closed form does not apply and
/// [`SdeError::ModelMismatch`] is returned.
pub fn black_scholes_percentage_error<S: DiscretizationScheme>(
    engine: &SdeSimulationEngine<S>,
    strike: f64,
    rate: f64,
) -> SdeResult<f64> {
    validate_positive("strike", strike)?;
    let (mu, sigma) = engine
        .scheme()
        .lognormal_parameters()
        .ok_or_else(|| SdeError::ModelMismatch {
            operation: "black_scholes_percentage_error".to_string(),
            requirement: "a log-normal (Black-Scholes) model".to_string(),
        })?;
    if (mu - rate).abs() > DRIFT_TOLERANCE {
        return Err(SdeError::ModelMismatch {
            operation: "black_scholes_percentage_error".to_string(),
            requirement: format!("risk-neutral drift: mu = {} differs from rate = {}", mu, rate),
        });
    }

    let maturity = engine.time_horizon() - engine.grid().initial_time();
    let analytic = bs_analytic::bs_call_price(engine.initial_value(), strike, rate, sigma, maturity);
    let (simulated, _) = price_payoff(engine, Payoff::EuropeanCall { k: strike }, rate)?;
    Ok((simulated - analytic).abs() / analytic * 100.0)
}
