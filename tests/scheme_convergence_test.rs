// tests/scheme_convergence_test.rs
//! Convergence of the discretization schemes on a geometric Brownian motion
//! with S0 = K = 100, σ = 0.25, zero drift and rate, T = 1.
use mc_sde::analytics::bs_analytic::bs_call_price;
use mc_sde::mc::payoffs::{black_scholes_percentage_error, price_payoff, Payoff};
use mc_sde::models::Gbm;
use mc_sde::solvers::SchemeKind;
use mc_sde::{BrownianDriver, SdeSimulationEngine, SimulationConfig};
use std::sync::Arc;

const S0: f64 = 100.0;
const STRIKE: f64 = 100.0;
const SIGMA: f64 = 0.25;

fn config(paths: usize, steps: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        paths,
        steps,
        t: 1.0,
        s0: S0,
        mu: 0.0,
        sigma: SIGMA,
        seed,
        ..Default::default()
    }
}

fn gbm() -> Gbm {
    Gbm::new(0.0, SIGMA).unwrap()
}

/// Terminal values of the exact solution driven by the same Brownian paths
fn exact_terminal_values(driver: &BrownianDriver) -> Vec<f64> {
    let grid = driver.grid();
    let horizon = grid.horizon();
    driver
        .path(grid.number_of_steps(), 0)
        .unwrap()
        .iter()
        .map(|&w| gbm().exact_solution(S0, horizon, w))
        .collect()
}

/// Mean of `|payoff(scheme path) - payoff(exact path)|` in percent of the
/// Black-Scholes price
fn payoff_error_pct(driver: &Arc<BrownianDriver>, scheme: SchemeKind) -> f64 {
    let engine = SdeSimulationEngine::new(driver.clone(), scheme.build(gbm()), S0).unwrap();
    let exact = exact_terminal_values(driver);
    let analytic = bs_call_price(S0, STRIKE, 0.0, SIGMA, 1.0);

    let total: f64 = engine
        .final_value()
        .iter()
        .zip(&exact)
        .map(|(&simulated, &reference)| {
            ((simulated - STRIKE).max(0.0) - (reference - STRIKE).max(0.0)).abs()
        })
        .sum();
    total / exact.len() as f64 / analytic * 100.0
}

/// Payoff error averaged over several seeds for 100, 1 000 and 10 000 steps
fn error_by_steps(scheme: SchemeKind) -> Vec<f64> {
    let seeds = [11u64, 12, 13];
    [100usize, 1_000, 10_000]
        .iter()
        .map(|&steps| {
            let total: f64 = seeds
                .iter()
                .map(|&seed| {
                    let driver = config(400, steps, seed).brownian_driver().unwrap();
                    payoff_error_pct(&driver, scheme)
                })
                .sum();
            total / seeds.len() as f64
        })
        .collect()
}

#[test]
fn test_euler_error_decreases_with_steps() {
    let errors = error_by_steps(SchemeKind::Euler);
    assert!(errors[0] > errors[1] && errors[1] > errors[2], "Euler errors {:?}", errors);
    // strong order one half: a hundredfold refinement gains roughly a factor ten
    assert!(errors[0] / errors[2] > 5.0, "Euler errors {:?}", errors);
}

#[test]
fn test_milstein_error_decreases_faster_than_euler() {
    let milstein = error_by_steps(SchemeKind::Milstein);
    assert!(
        milstein[0] > milstein[1] && milstein[1] > milstein[2],
        "Milstein errors {:?}",
        milstein
    );
    assert!(milstein[0] / milstein[2] > 30.0, "Milstein errors {:?}", milstein);

    let euler = error_by_steps(SchemeKind::Euler);
    for (m, e) in milstein.iter().zip(&euler) {
        assert!(m < e, "Milstein {:?} vs Euler {:?}", milstein, euler);
    }
}

#[test]
fn test_log_euler_is_exact_for_gbm() {
    for error in error_by_steps(SchemeKind::LogEuler) {
        assert!(error < 1e-6, "log-Euler error {}", error);
    }
}

#[test]
fn test_prices_match_black_scholes() {
    let analytic = bs_call_price(S0, STRIKE, 0.0, SIGMA, 1.0);
    let driver = config(50_000, 100, 1897).brownian_driver().unwrap();

    for &scheme in SchemeKind::ALL.iter() {
        let engine = SdeSimulationEngine::new(driver.clone(), scheme.build(gbm()), S0).unwrap();
        let (price, variance) =
            price_payoff(&engine, Payoff::EuropeanCall { k: STRIKE }, 0.0).unwrap();
        assert!(
            (price - analytic).abs() < 0.3,
            "{:?}: price {} vs {}",
            scheme,
            price,
            analytic
        );
        assert!(variance > 0.0 && variance.sqrt() < 0.1, "{:?}: variance {}", scheme, variance);

        let error_pct = black_scholes_percentage_error(&engine, STRIKE, 0.0).unwrap();
        assert!(error_pct < 3.0, "{:?}: error {}%", scheme, error_pct);
    }
}

#[test]
fn test_schemes_share_the_driver() {
    let engines: Vec<_> = SchemeKind::ALL
        .iter()
        .map(|&scheme| {
            let config = SimulationConfig {
                scheme,
                ..config(200, 50, 4)
            };
            config.build().unwrap()
        })
        .collect();

    // same seed, same increments, whatever the scheme
    let reference = engines[0].driver().increments();
    for engine in &engines[1..] {
        assert_eq!(engine.driver().increments(), reference);
    }

    // Euler and Milstein start from the same first step up to the correction
    let dw = engines[0].brownian_increment(0).unwrap();
    let euler = engines[0].process_at_time_index(1).unwrap();
    let milstein = engines[2].process_at_time_index(1).unwrap();
    let dt = 1.0 / 50.0;
    for p in 0..200 {
        let correction = 0.5 * SIGMA * SIGMA * S0 * (dw[p] * dw[p] - dt);
        assert!((milstein[p] - euler[p] - correction).abs() < 1e-10);
    }
}
