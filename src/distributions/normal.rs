// src/distributions/normal.rs
//! Normal Distribution with Selectable Sampling Strategy
//!
//! The normal quantile has no closed form. [`Normal::quantile`] uses the
//! rational approximation of Abramowitz & Stegun 26.2.23:
//! ```text
//! t = √(-2 ln p)
//! Φ⁻¹(p) ≈ -t + (c₀ + c₁t + c₂t²) / (1 + d₁t + d₂t² + d₃t³),   p ≤ ½
//! ```
//! with `|error| < 4.5e-4`, extended to `p > ½` by the symmetry
//! `Φ⁻¹(p) = -Φ⁻¹(1 - p)`. It is an approximation, not an exact inverse.
//!
//! Because inversion is only approximate, draws can also be produced by one
//! of several exact methods, selected through [`NormalSampling`]:
//! - **AcceptanceRejection**: exponential(1) proposal `Y`, accepted with
//!   probability `exp(-(Y-1)²/2)`, then a random sign
//! - **BoxMuller**: `√(-2 ln U₁)·(cos 2πU₂, sin 2πU₂)`
//! - **MarsagliaPolar**: Box-Muller without trigonometry, rejecting points
//!   outside the unit disc
//! - **Ziggurat**: `rand_distr::StandardNormal`

use super::{Distribution, Exponential};
use crate::error::{validation::*, SdeResult};
use crate::math_utils::{norm_cdf, norm_pdf};
use crate::rng;
use rand::Rng;
use std::f64::consts::PI;

/// How standard normal draws are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalSampling {
    /// Quantile approximation evaluated at a uniform draw
    Inversion,
    /// Exponential proposal with acceptance-rejection
    AcceptanceRejection,
    /// Box-Muller transform, two draws per pair of uniforms
    BoxMuller,
    /// Marsaglia polar method (Box-Muller with rejection)
    MarsagliaPolar,
    /// Ziggurat algorithm from `rand_distr`
    #[default]
    Ziggurat,
}

impl NormalSampling {
    /// Whether the strategy naturally yields two draws at a time
    pub fn produces_pairs(self) -> bool {
        matches!(self, NormalSampling::BoxMuller | NormalSampling::MarsagliaPolar)
    }
}

/// Normal law `N(mu, sigma²)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
    sampling: NormalSampling,
}

impl Normal {
    pub fn new(mu: f64, sigma: f64) -> SdeResult<Self> {
        validate_finite("mu", mu)?;
        validate_finite("sigma", sigma)?;
        validate_positive("sigma", sigma)?;
        Ok(Self {
            mu,
            sigma,
            sampling: NormalSampling::default(),
        })
    }

    pub fn standard() -> Self {
        Self {
            mu: 0.0,
            sigma: 1.0,
            sampling: NormalSampling::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: NormalSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn sampling(&self) -> NormalSampling {
        self.sampling
    }

    /// Two independent draws
    pub fn sample_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let (z1, z2) = match self.sampling {
            NormalSampling::BoxMuller => box_muller(rng),
            NormalSampling::MarsagliaPolar => marsaglia_polar(rng),
            _ => (self.standard_draw(rng), self.standard_draw(rng)),
        };
        (self.mu + self.sigma * z1, self.mu + self.sigma * z2)
    }

    /// Fills `out` with independent draws, consuming pairs where the
    /// strategy produces them.
    pub fn fill<R: Rng + ?Sized>(&self, out: &mut [f64], rng: &mut R) {
        if self.sampling.produces_pairs() {
            let mut chunks = out.chunks_exact_mut(2);
            for chunk in &mut chunks {
                let (a, b) = self.sample_pair(rng);
                chunk[0] = a;
                chunk[1] = b;
            }
            if let [last] = chunks.into_remainder() {
                *last = self.sample_pair(rng).0;
            }
        } else {
            for value in out.iter_mut() {
                *value = self.mu + self.sigma * self.standard_draw(rng);
            }
        }
    }

    fn standard_draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.sampling {
            NormalSampling::Inversion => standard_quantile(rng::get_uniform_draw(rng)),
            NormalSampling::AcceptanceRejection => acceptance_rejection(rng),
            NormalSampling::BoxMuller => box_muller(rng).0,
            NormalSampling::MarsagliaPolar => marsaglia_polar(rng).0,
            NormalSampling::Ziggurat => rng::get_normal_draw(rng),
        }
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::standard()
    }
}

impl Distribution for Normal {
    fn density(&self, x: f64) -> f64 {
        norm_pdf((x - self.mu) / self.sigma) / self.sigma
    }

    fn cdf(&self, x: f64) -> f64 {
        norm_cdf((x - self.mu) / self.sigma)
    }

    fn quantile(&self, p: f64) -> f64 {
        self.mu + self.sigma * standard_quantile(p)
    }

    fn analytic_mean(&self) -> f64 {
        self.mu
    }

    fn analytic_std_dev(&self) -> f64 {
        self.sigma
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.mu + self.sigma * self.standard_draw(rng)
    }
}

/// Abramowitz & Stegun 26.2.23 for `p ≤ ½`, mirrored for `p > ½`
pub fn standard_quantile(p: f64) -> f64 {
    if p > 0.5 {
        -abramowitz_stegun_lower_tail(1.0 - p)
    } else {
        abramowitz_stegun_lower_tail(p)
    }
}

fn abramowitz_stegun_lower_tail(p: f64) -> f64 {
    const C0: f64 = 2.515517;
    const C1: f64 = 0.802853;
    const C2: f64 = 0.010328;
    const D1: f64 = 1.432788;
    const D2: f64 = 0.189269;
    const D3: f64 = 0.001308;

    let t = (-2.0 * p.ln()).sqrt();
    -t + (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t)
}

/// Half-normal by rejection from exponential(1), then a random sign.
///
/// The acceptance rate is `√(π/2e) ≈ 0.76`, so the loop terminates quickly
/// with probability one.
fn acceptance_rejection<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let proposal = Exponential::unit();
    loop {
        let u = rng::get_uniform_draw(rng);
        let y = proposal.sample(rng);
        if u <= (-0.5 * (y - 1.0) * (y - 1.0)).exp() {
            return if rng::get_uniform_draw(rng) < 0.5 { y } else { -y };
        }
    }
}

fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    // 1 - U lies in (0, 1], keeping the logarithm finite
    let u1 = 1.0 - rng::get_uniform_draw(rng);
    let u2 = rng::get_uniform_draw(rng);
    let radius = (-2.0 * u1.ln()).sqrt();
    let angle = 2.0 * PI * u2;
    (radius * angle.cos(), radius * angle.sin())
}

fn marsaglia_polar<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    loop {
        let v1 = 2.0 * rng::get_uniform_draw(rng) - 1.0;
        let v2 = 2.0 * rng::get_uniform_draw(rng) - 1.0;
        let s = v1 * v1 + v2 * v2;
        if s > 0.0 && s < 1.0 {
            let factor = (-2.0 * s.ln() / s).sqrt();
            return (v1 * factor, v2 * factor);
        }
    }
}
