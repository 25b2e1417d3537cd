// src/analytics/vasicek_analytic.rs
//! Closed-form zero-coupon bond pricing under the Vasicek model
//!
//! # Mathematical Foundation
//!
//! With `dr_t = κ(θ - r_t) dt + σ dW_t`, the integrated rate
//! `I_T = ∫₀ᵀ r_t dt` is Gaussian, so the bond price
//! `P(0,T) = E[exp(-I_T)] = exp(-E[I_T] + Var[I_T]/2)` has the affine form
//! ```text
//! B(T)   = (1 - e^(-κT)) / κ
//! A(T)   = exp[(θ - σ²/(2κ²))(B(T) - T) - σ²B(T)²/(4κ)]
//! P(0,T) = A(T) e^(-B(T) r0)
//! ```
//!
//! The functions taking raw `f64` inputs check κ themselves; the ones taking
//! [`VasicekParams`] rely on its validated κ > 0.

use crate::error::{VasicekError, VasicekResult};
use crate::models::vasicek::VasicekParams;

/// Duration factor `B(T) = (1 - e^(-κT)) / κ`
///
/// # Errors
///
/// `DomainError` if κ is zero (or not finite).
pub fn b_function(kappa: f64, t: f64) -> VasicekResult<f64> {
    if kappa == 0.0 || !kappa.is_finite() {
        return Err(VasicekError::DomainError {
            reason: format!("B(T) requires a non-zero finite kappa, got {}", kappa),
        });
    }
    Ok(b_unchecked(kappa, t))
}

#[inline]
fn b_unchecked(kappa: f64, t: f64) -> f64 {
    -(-kappa * t).exp_m1() / kappa
}

#[inline]
fn log_a(kappa: f64, theta: f64, sigma: f64, t: f64, b: f64) -> f64 {
    let sigma2 = sigma * sigma;
    (theta - sigma2 / (2.0 * kappa * kappa)) * (b - t) - sigma2 * b * b / (4.0 * kappa)
}

/// Closed-form price from raw inputs
///
/// # Errors
///
/// `DomainError` if κ = 0; callers are expected to guard κ > 0 upstream.
pub fn try_zero_coupon_bond_price(
    kappa: f64,
    theta: f64,
    sigma: f64,
    r0: f64,
    t: f64,
) -> VasicekResult<f64> {
    let b = b_function(kappa, t)?;
    Ok((log_a(kappa, theta, sigma, t, b) - b * r0).exp())
}

/// Closed-form price P(0,T) for validated parameters
pub fn zero_coupon_bond_price(params: &VasicekParams) -> f64 {
    let (kappa, t) = (params.kappa(), params.maturity());
    let b = b_unchecked(kappa, t);
    (log_a(kappa, params.theta(), params.sigma(), t, b) - b * params.r0()).exp()
}

/// Continuous-time mean of the integrated short rate, `θT + (r0 - θ)B(T)`
pub fn integral_mean(params: &VasicekParams) -> f64 {
    let b = b_unchecked(params.kappa(), params.maturity());
    params.theta() * params.maturity() + (params.r0() - params.theta()) * b
}

/// Continuous-time variance of the integrated short rate,
/// `σ²/κ² (T - B(T) - κB(T)²/2)`
pub fn integral_variance(params: &VasicekParams) -> f64 {
    let (kappa, t, sigma) = (params.kappa(), params.maturity(), params.sigma());
    let b = b_unchecked(kappa, t);
    sigma * sigma / (kappa * kappa) * (t - b - 0.5 * kappa * b * b)
}

/// Exact mean of the left-Riemann integral `Σ r_i Δt` of the Euler-discretized
/// process on `steps` equal steps.
///
/// The Euler mean recursion is `E[r_{i+1}] - θ = q (E[r_i] - θ)` with
/// `q = 1 - κΔt`, which sums to
/// ```text
/// E[Σ r_i Δt] = θT + (r0 - θ)(1 - q^N)/κ
/// ```
/// and tends to [`integral_mean`] as N grows.
pub fn euler_integral_mean(params: &VasicekParams, steps: usize) -> f64 {
    let (kappa, t) = (params.kappa(), params.maturity());
    let dt = t / steps as f64;
    let q = 1.0 - kappa * dt;
    let q_n = q.powi(steps as i32);
    params.theta() * t + (params.r0() - params.theta()) * (1.0 - q_n) / kappa
}
