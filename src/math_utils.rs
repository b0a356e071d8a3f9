// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.975_002_104_851_780, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(-1.0), 0.158_655_253_931_457, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_401_433, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_pdf(1.5), norm_pdf(-1.5), epsilon = 1e-16);
    }
}
