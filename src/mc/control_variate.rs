// src/mc/control_variate.rs
//! Control-variate correction against the closed-form bond price
//!
//! # Control
//!
//! For each path with simulated integral `I_i = Σ r_j Δt` the reference is
//! ```text
//! ref_i = P_analytic · (1 - (I_i - E[I]))
//! ```
//! where `E[I]` is the exact mean of the Euler left-Riemann integral. Hence
//! `E[ref_i] = P_analytic` exactly, and `ref_i` is the first-order expansion
//! of the discount factor around its mean, so it is strongly correlated with
//! `D_i = exp(-I_i)`.
//!
//! # Estimator
//!
//! ```text
//! P_cv = mean(D) + β (P_analytic - mean(ref))
//! Var  = Var(D - β ref) / N
//! ```
//!
//! β is a configuration choice ([`ControlVariate`]):
//! - `Fixed`: β = 1, the difference estimator;
//! - `Optimal`: β̂ = Cov(D, ref) / Var(ref), whose residual variance
//!   `Var(D) - Cov²/Var(ref)` can never exceed `Var(D)`.
//!
//! When `Var(ref)` is numerically zero (σ = 0, a single path) β̂ is undefined
//! and the corrector returns the uncorrected estimate with the degeneracy
//! flag set.

use serde::{Deserialize, Serialize};

/// Relative size of Var(ref) (against mean(ref)²) treated as zero
pub const DEGENERACY_TOLERANCE: f64 = 1e-14;

/// Control-variate policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlVariate {
    /// Plain Monte Carlo
    None,
    /// Difference estimator, β = 1
    Fixed,
    /// Sample-optimal β̂ = Cov(D, ref) / Var(ref)
    Optimal,
}

/// Maps a simulated integral to its control value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlReference {
    analytic_price: f64,
    integral_mean: f64,
}

impl ControlReference {
    pub fn new(analytic_price: f64, integral_mean: f64) -> Self {
        Self {
            analytic_price,
            integral_mean,
        }
    }

    pub fn analytic_price(&self) -> f64 {
        self.analytic_price
    }

    #[inline]
    pub fn reference(&self, integral: f64) -> f64 {
        self.analytic_price * (1.0 - (integral - self.integral_mean))
    }
}

/// Sample moments of (discount, reference) pairs.
///
/// Variances and covariance use the unbiased (n - 1) normalization and are
/// zero when fewer than two samples exist.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleMoments {
    pub count: usize,
    pub mean_discount: f64,
    pub mean_reference: f64,
    pub var_discount: f64,
    pub var_reference: f64,
    pub covariance: f64,
}

/// Result of the correction step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub price: f64,
    /// Per-sample variance of the (corrected) estimator
    pub variance: f64,
    /// β applied; `None` when no correction was applied
    pub beta: Option<f64>,
    pub degenerate: bool,
}

impl Correction {
    fn uncorrected(moments: &SampleMoments, degenerate: bool) -> Self {
        Correction {
            price: moments.mean_discount,
            variance: moments.var_discount,
            beta: None,
            degenerate,
        }
    }
}

/// Apply `policy` to the aggregated moments
pub fn correct(moments: &SampleMoments, analytic_price: f64, policy: ControlVariate) -> Correction {
    if policy == ControlVariate::None {
        return Correction::uncorrected(moments, false);
    }

    let scale = moments.mean_reference * moments.mean_reference;
    if moments.var_reference.is_nan() || moments.var_reference <= DEGENERACY_TOLERANCE * scale {
        tracing::warn!(
            var_reference = moments.var_reference,
            paths = moments.count,
            "control variate has no variance; returning the uncorrected estimate"
        );
        return Correction::uncorrected(moments, true);
    }

    let (beta, variance) = if policy == ControlVariate::Optimal {
        let beta = moments.covariance / moments.var_reference;
        let explained = moments.covariance * moments.covariance / moments.var_reference;
        (beta, (moments.var_discount - explained).max(0.0))
    } else {
        let residual = moments.var_discount - 2.0 * moments.covariance + moments.var_reference;
        (1.0, residual.max(0.0))
    };

    Correction {
        price: moments.mean_discount + beta * (analytic_price - moments.mean_reference),
        variance,
        beta: Some(beta),
        degenerate: false,
    }
}
