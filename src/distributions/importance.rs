// src/distributions/importance.rs
//! Importance Sampling (Weighted Monte Carlo)
//!
//! # Mathematical Framework
//!
//! For a target density `p`, a proposal density `q` and an integrand `f`:
//! ```text
//! E_p[f(X)] = ∫ f(x) p(x) dx = ∫ f(y) (p(y)/q(y)) q(y) dy = E_q[f(Y) w(Y)]
//! ```
//! with weight `w = p/q`. Sampling `Y ~ q` and averaging `f(Y) w(Y)` is
//! unbiased as long as `q > 0` wherever `f·p ≠ 0`.
//!
//! # Variance
//!
//! ```text
//! Var(f(X)) - Var(f(Y)w(Y)) = ∫ f²(x) p(x) (1 - p(x)/q(x)) dx
//! ```
//! so the estimator gains when `q` puts more mass than `p` where `f²` is large
//! (e.g. rare-event probabilities such as `P(X > 7)` for `X ~ Exp(1)`).
//!
//! # Caveat
//!
//! Support dominance is *not* checked. A proposal that misses part of the
//! region where `f·p ≠ 0` silently biases the estimate.

use super::Distribution;
use crate::stats::running::RunningStats;
use rand::Rng;

/// Statistics of `f(Y)·p(Y)/q(Y)` over `n` draws `Y ~ proposal`
pub fn weighted_stats<P, Q, R, F>(
    target: &P,
    proposal: &Q,
    n: usize,
    f: F,
    rng: &mut R,
) -> RunningStats
where
    P: Distribution,
    Q: Distribution,
    R: Rng + ?Sized,
    F: Fn(f64) -> f64,
{
    proposal.sample_stats_of(
        n,
        |y| {
            let value = f(y);
            if value == 0.0 {
                // skip the density ratio where the integrand vanishes
                0.0
            } else {
                value * target.density(y) / proposal.density(y)
            }
        },
        rng,
    )
}

/// Weighted Monte Carlo estimate of `E_target[f(X)]`
pub fn weighted_mean<P, Q, R, F>(target: &P, proposal: &Q, n: usize, f: F, rng: &mut R) -> f64
where
    P: Distribution,
    Q: Distribution,
    R: Rng + ?Sized,
    F: Fn(f64) -> f64,
{
    weighted_stats(target, proposal, n, f, rng).mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Exponential, Normal, Uniform};
    use crate::rng::seed_rng_from_u64;

    #[test]
    fn test_identity_proposal_is_plain_monte_carlo() {
        let exp = Exponential::new(1.0).unwrap();
        let mut rng = seed_rng_from_u64(5);
        let estimate = weighted_mean(&exp, &exp, 50_000, |x| x, &mut rng);
        assert!((estimate - 1.0).abs() < 0.03, "estimate {}", estimate);
    }

    #[test]
    fn test_rare_event_probability() {
        let barrier = 7.0;
        let exp = Exponential::new(1.0).unwrap();
        // heavier tail than the target keeps the weights bounded past the barrier
        let stretched = Exponential::new(1.0 / barrier).unwrap();
        let exact = 1.0 - exp.cdf(barrier);
        let indicator = |x: f64| if x > barrier { 1.0 } else { 0.0 };

        let mut rng = seed_rng_from_u64(17);
        let weighted = weighted_stats(&exp, &stretched, 100_000, indicator, &mut rng);
        let relative_error = (weighted.mean() - exact).abs() / exact;
        assert!(relative_error < 0.05, "relative error {}", relative_error);

        let plain = exp.sample_stats_of(100_000, indicator, &mut rng);
        assert!(weighted.std_dev() < plain.std_dev());
    }

    #[test]
    fn test_shifted_normal_proposal_lands_near_the_tail_mass() {
        let barrier = 7.0;
        let exp = Exponential::new(1.0).unwrap();
        let shifted = Normal::new(barrier, 1.0).unwrap();
        let exact = 1.0 - exp.cdf(barrier);

        let mut rng = seed_rng_from_u64(23);
        let estimate = exp.sample_mean_weighted(
            50_000,
            |x| if x > barrier { 1.0 } else { 0.0 },
            &shifted,
            &mut rng,
        );
        // the weight is unbounded in the far tail, so only the order of magnitude is stable
        assert!(estimate > 0.5 * exact && estimate < 2.0 * exact, "estimate {}", estimate);
    }

    #[test]
    fn test_uniform_target_under_wider_proposal() {
        let target = Uniform::new(0.0, 1.0).unwrap();
        let proposal = Uniform::new(0.0, 2.0).unwrap();
        let mut rng = seed_rng_from_u64(99);
        let estimate = weighted_mean(&target, &proposal, 100_000, |x| x * x, &mut rng);
        assert!((estimate - 1.0 / 3.0).abs() < 0.01, "estimate {}", estimate);
    }
}
