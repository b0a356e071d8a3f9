// src/distributions/confidence.rs
//! Confidence Intervals for Sample Means
//!
//! For `n` i.i.d. draws with standard deviation `σ` the sample mean `X̄ₙ`
//! has standard deviation `σ/√n`. Two half-widths are offered:
//!
//! - **Chebyshev** (distribution free, conservative):
//!   ```text
//!   P(|X̄ₙ - μ| ≥ h) ≤ σ²/(n h²)   ⇒   h = σ / √(n (1 - level))
//!   ```
//! - **Central limit theorem** (asymptotic, tighter):
//!   ```text
//!   h = z_{(1+level)/2} · σ / √n
//!   ```
//!
//! Both use the analytic standard deviation of the distribution.

use super::Distribution;
use crate::error::{SdeError, SdeResult};
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal as StatrsNormal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalMethod {
    Chebyshev,
    CentralLimit,
}

/// Confidence interval for the mean of `sample_size` draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanConfidenceInterval {
    method: IntervalMethod,
    sample_size: usize,
}

impl MeanConfidenceInterval {
    pub fn new(method: IntervalMethod, sample_size: usize) -> SdeResult<Self> {
        if sample_size == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "sample_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self { method, sample_size })
    }

    pub fn method(&self) -> IntervalMethod {
        self.method
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn half_width<D: Distribution>(&self, distribution: &D, level: f64) -> SdeResult<f64> {
        validate_level(level)?;
        let sigma = distribution.analytic_std_dev();
        let n = self.sample_size as f64;
        match self.method {
            IntervalMethod::Chebyshev => Ok(sigma / (n * (1.0 - level)).sqrt()),
            IntervalMethod::CentralLimit => {
                let standard = StatrsNormal::new(0.0, 1.0).map_err(|e| {
                    SdeError::NumericalInstability {
                        method: "CentralLimit".to_string(),
                        reason: e.to_string(),
                    }
                })?;
                let z = standard.inverse_cdf(0.5 * (1.0 + level));
                Ok(z * sigma / n.sqrt())
            }
        }
    }

    /// Interval around one fresh sample mean
    pub fn bounds<D, R>(&self, distribution: &D, level: f64, rng: &mut R) -> SdeResult<(f64, f64)>
    where
        D: Distribution,
        R: Rng + ?Sized,
    {
        let h = self.half_width(distribution, level)?;
        let mean = distribution.sample_mean(self.sample_size, rng);
        Ok((mean - h, mean + h))
    }

    /// Share of `trials` fresh intervals that contain the analytic mean
    pub fn coverage_frequency<D, R>(
        &self,
        distribution: &D,
        level: f64,
        trials: usize,
        rng: &mut R,
    ) -> SdeResult<f64>
    where
        D: Distribution,
        R: Rng + ?Sized,
    {
        if trials == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "trials".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let h = self.half_width(distribution, level)?;
        let target = distribution.analytic_mean();
        let mut hits = 0usize;
        for _ in 0..trials {
            let mean = distribution.sample_mean(self.sample_size, rng);
            if (mean - target).abs() <= h {
                hits += 1;
            }
        }
        Ok(hits as f64 / trials as f64)
    }
}

fn validate_level(level: f64) -> SdeResult<()> {
    if level.is_nan() || level <= 0.0 || level >= 1.0 {
        Err(SdeError::InvalidParameters {
            parameter: "level".to_string(),
            value: level,
            constraint: "must lie strictly between 0 and 1".to_string(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Exponential, Normal};
    use crate::rng::seed_rng_from_u64;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_half_widths() {
        let normal = Normal::new(0.0, 2.0).unwrap();
        let clt = MeanConfidenceInterval::new(IntervalMethod::CentralLimit, 100).unwrap();
        let cheb = MeanConfidenceInterval::new(IntervalMethod::Chebyshev, 100).unwrap();

        assert_abs_diff_eq!(clt.half_width(&normal, 0.95).unwrap(), 1.959964 * 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(cheb.half_width(&normal, 0.95).unwrap(), 0.2 / 0.05f64.sqrt(), epsilon = 1e-12);
        assert!(cheb.half_width(&normal, 0.95).unwrap() > clt.half_width(&normal, 0.95).unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(MeanConfidenceInterval::new(IntervalMethod::Chebyshev, 0).is_err());
        let ci = MeanConfidenceInterval::new(IntervalMethod::Chebyshev, 10).unwrap();
        let exp = Exponential::new(1.0).unwrap();
        assert!(ci.half_width(&exp, 1.0).is_err());
        assert!(ci.half_width(&exp, 0.0).is_err());
        assert!(ci.half_width(&exp, f64::NAN).is_err());
    }

    #[test]
    fn test_coverage() {
        let exp = Exponential::new(0.5).unwrap();
        let mut rng = seed_rng_from_u64(42);

        let clt = MeanConfidenceInterval::new(IntervalMethod::CentralLimit, 400).unwrap();
        let clt_coverage = clt.coverage_frequency(&exp, 0.9, 1_000, &mut rng).unwrap();
        assert!((clt_coverage - 0.9).abs() < 0.04, "CLT coverage {}", clt_coverage);

        let cheb = MeanConfidenceInterval::new(IntervalMethod::Chebyshev, 400).unwrap();
        let cheb_coverage = cheb.coverage_frequency(&exp, 0.9, 1_000, &mut rng).unwrap();
        assert!(cheb_coverage >= 0.9, "Chebyshev coverage {}", cheb_coverage);
    }

    #[test]
    fn test_bounds_are_centered() {
        let normal = Normal::new(1.0, 1.0).unwrap();
        let ci = MeanConfidenceInterval::new(IntervalMethod::CentralLimit, 50).unwrap();
        let mut rng = seed_rng_from_u64(1);
        let (lo, hi) = ci.bounds(&normal, 0.95, &mut rng).unwrap();
        assert_abs_diff_eq!(hi - lo, 2.0 * ci.half_width(&normal, 0.95).unwrap(), epsilon = 1e-12);
    }
}
