// src/distributions/uniform.rs
use super::Distribution;
use crate::error::{validation::*, SdeError, SdeResult};

/// Uniform law on `[a, b)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    a: f64,
    b: f64,
}

impl Uniform {
    pub fn new(a: f64, b: f64) -> SdeResult<Self> {
        validate_finite("a", a)?;
        validate_finite("b", b)?;
        if b <= a {
            return Err(SdeError::InvalidParameters {
                parameter: "b".to_string(),
                value: b,
                constraint: format!("must be greater than a = {}", a),
            });
        }
        Ok(Self { a, b })
    }

    /// Uniform law on the unit interval
    pub fn unit() -> Self {
        Self { a: 0.0, b: 1.0 }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.a, self.b)
    }
}

impl Distribution for Uniform {
    fn density(&self, x: f64) -> f64 {
        if x < self.a || x >= self.b {
            0.0
        } else {
            1.0 / (self.b - self.a)
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        ((x - self.a) / (self.b - self.a)).clamp(0.0, 1.0)
    }

    fn quantile(&self, p: f64) -> f64 {
        self.a + p * (self.b - self.a)
    }

    fn analytic_mean(&self) -> f64 {
        0.5 * (self.a + self.b)
    }

    fn analytic_std_dev(&self) -> f64 {
        (self.b - self.a) / 12f64.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rejects_empty_interval() {
        assert!(Uniform::new(1.0, 1.0).is_err());
        assert!(Uniform::new(2.0, 1.0).is_err());
    }

    #[test]
    fn test_moments_and_cdf() {
        let u = Uniform::new(-1.0, 3.0).unwrap();
        assert_abs_diff_eq!(u.analytic_mean(), 1.0);
        assert_abs_diff_eq!(u.analytic_std_dev(), 4.0 / 12f64.sqrt());
        assert_eq!(u.cdf(-5.0), 0.0);
        assert_eq!(u.cdf(5.0), 1.0);
        assert_abs_diff_eq!(u.cdf(u.quantile(0.3)), 0.3, epsilon = 1e-15);
        assert_abs_diff_eq!(u.density(0.0), 0.25);
        assert_eq!(u.density(3.0), 0.0);
    }
}
