// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::SQRT_2;

/// Smallest uniform fed to the inverse CDF; keeps Sobol endpoints finite.
pub const UNIFORM_EPSILON: f64 = 1e-12;

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Inverse standard normal CDF, Φ⁻¹(u) = −√2·erfc⁻¹(2u).
///
/// `u` is clamped into `[ε, 1 − ε]` so that 0 and 1 map to large finite
/// quantiles instead of ±∞.
pub fn norm_inv_cdf(u: f64) -> f64 {
    let u = u.clamp(UNIFORM_EPSILON, 1.0 - UNIFORM_EPSILON);
    -SQRT_2 * erf::erfc_inv(2.0 * u)
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
