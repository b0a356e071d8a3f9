// src/stats/histogram.rs
use crate::error::{validation::validate_finite, SdeError, SdeResult};

/// Counts of values over `bins` equal sub-intervals of `[left, right)`
/// plus two outlier bins.
///
/// `counts[0]` holds values `< left`, `counts[k]` for `k ∈ 1..=bins` holds
/// values in `[left + (k-1)·w, left + k·w)`, and `counts[bins + 1]` holds
/// values `≥ right`. NaN values are counted in the upper outlier bin, so the
/// counts always add up to the number of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<usize>,
    left: f64,
    right: f64,
    bin_width: f64,
}

impl Histogram {
    pub fn new(values: &[f64], left: f64, right: f64, bins: usize) -> SdeResult<Self> {
        if bins == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "bins".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        validate_finite("left", left)?;
        validate_finite("right", right)?;
        if right <= left {
            return Err(SdeError::InvalidParameters {
                parameter: "right".to_string(),
                value: right,
                constraint: format!("must be greater than left = {}", left),
            });
        }

        let bin_width = (right - left) / bins as f64;
        let mut counts = vec![0usize; bins + 2];
        for &x in values {
            let slot = if x < left {
                0
            } else if x < right {
                // rounding can push values just below `right` one bin too far
                (((x - left) / bin_width) as usize).min(bins - 1) + 1
            } else {
                bins + 1
            };
            counts[slot] += 1;
        }

        Ok(Self {
            counts,
            left,
            right,
            bin_width,
        })
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn into_counts(self) -> Vec<usize> {
        self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len() - 2
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn range(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    pub fn below(&self) -> usize {
        self.counts[0]
    }

    pub fn above(&self) -> usize {
        self.counts[self.counts.len() - 1]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Left edges of the inner bins
    pub fn bin_edges(&self) -> Vec<f64> {
        (0..self.bins())
            .map(|k| self.left + k as f64 * self.bin_width)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_half_open() {
        let values = [0.0, 0.5, 1.0, 1.999, 2.0, -0.1, f64::NAN];
        let h = Histogram::new(&values, 0.0, 2.0, 2).unwrap();
        assert_eq!(h.counts(), &[1, 2, 2, 2]);
        assert_eq!(h.total(), values.len());
        assert_eq!(h.bin_edges(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_rejects_degenerate_layout() {
        assert!(Histogram::new(&[1.0], 0.0, 1.0, 0).is_err());
        assert!(Histogram::new(&[1.0], 1.0, 1.0, 4).is_err());
        assert!(Histogram::new(&[1.0], 0.0, f64::INFINITY, 4).is_err());
    }

    #[test]
    fn test_value_just_below_right_edge() {
        let right = 0.3;
        let x = right - f64::EPSILON / 4.0;
        let h = Histogram::new(&[x], 0.0, right, 3).unwrap();
        assert_eq!(h.counts()[3], 1);
        assert_eq!(h.above(), 0);
    }
}
