// src/models/vasicek.rs
//! Vasicek Short-Rate Model
//!
//! # Mathematical Framework
//!
//! The short rate follows a mean-reverting Ornstein–Uhlenbeck process:
//! ```text
//! dr_t = κ(θ - r_t) dt + σ dW_t
//! ```
//!
//! Where:
//! - r_t: Instantaneous short rate
//! - κ: Speed of mean reversion (κ > 0)
//! - θ: Long-run mean rate
//! - σ: Volatility of the short rate (σ ≥ 0)
//!
//! Conditional on r_0, r_t is Gaussian with
//! ```text
//! E[r_t]   = θ + (r_0 - θ) e^(-κt)
//! Var[r_t] = σ²/(2κ) (1 - e^(-2κt))
//! ```
//! so the rate can go negative; no flooring is applied.

use super::model::SDEModel;
use crate::error::{validation::*, VasicekResult};
use serde::Serialize;

/// Vasicek model parameters together with the bond maturity
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VasicekParams {
    kappa: f64, // Mean reversion speed
    theta: f64, // Long-run mean rate
    sigma: f64, // Short-rate volatility
    r0: f64,    // Initial short rate
    t: f64,     // Bond maturity in years
}

impl VasicekParams {
    /// Validated constructor; rejects κ ≤ 0, σ < 0, T ≤ 0 and non-finite inputs
    pub fn new(kappa: f64, theta: f64, sigma: f64, r0: f64, t: f64) -> VasicekResult<Self> {
        let params = VasicekParams {
            kappa,
            theta,
            sigma,
            r0,
            t,
        };
        params.validate()?;
        Ok(params)
    }

    /// Same as [`VasicekParams::new`] with the maturity given in months
    pub fn from_months(
        kappa: f64,
        theta: f64,
        sigma: f64,
        r0: f64,
        maturity_months: f64,
    ) -> VasicekResult<Self> {
        validate_finite("maturity_months", maturity_months)?;
        Self::new(kappa, theta, sigma, r0, maturity_months / 12.0)
    }

    fn validate(&self) -> VasicekResult<()> {
        validate_finite("kappa", self.kappa)?;
        validate_positive("kappa", self.kappa)?;
        validate_finite("theta", self.theta)?;
        validate_finite("sigma", self.sigma)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("r0", self.r0)?;
        validate_finite("t", self.t)?;
        validate_positive("t", self.t)?;
        Ok(())
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn r0(&self) -> f64 {
        self.r0
    }

    /// Maturity T in years
    pub fn maturity(&self) -> f64 {
        self.t
    }

    /// Copy with a different initial short rate
    pub fn with_r0(&self, r0: f64) -> VasicekResult<Self> {
        Self::new(self.kappa, self.theta, self.sigma, r0, self.t)
    }
}

/// Vasicek short-rate dynamics
#[derive(Clone, Copy, Debug)]
pub struct Vasicek {
    pub params: VasicekParams,
}

impl Vasicek {
    pub fn new(params: VasicekParams) -> Self {
        Vasicek { params }
    }

    /// Exact conditional mean E[r_t | r_0]
    pub fn exact_mean(&self, t: f64) -> f64 {
        let p = &self.params;
        p.theta + (p.r0 - p.theta) * (-p.kappa * t).exp()
    }

    /// Exact conditional variance Var[r_t | r_0]
    pub fn exact_variance(&self, t: f64) -> f64 {
        let p = &self.params;
        p.sigma * p.sigma / (2.0 * p.kappa) * (1.0 - (-2.0 * p.kappa * t).exp())
    }
}

impl SDEModel for Vasicek {
    fn drift(&self, r: f64, _t: f64) -> f64 {
        self.params.kappa * (self.params.theta - r)
    }

    fn diffusion(&self, _r: f64, _t: f64) -> f64 {
        self.params.sigma
    }

    fn step_with_dw(&self, r_current: &mut f64, t_current: f64, dt: f64, dw: f64) {
        *r_current +=
            self.drift(*r_current, t_current) * dt + self.diffusion(*r_current, t_current) * dw;
    }
}
