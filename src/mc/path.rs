// src/mc/path.rs
//! Short-rate path simulation and discounting
//!
//! # Discretization
//!
//! The grid has N equal steps of size Δt = T/N. Rates evolve by
//! Euler–Maruyama (see [`crate::solvers::euler_maruyama`]):
//! ```text
//! r_{i+1} = r_i + κ(θ - r_i)Δt + σ√Δt Z_i,   r_0 = r0
//! ```
//!
//! # Integral policy
//!
//! `∫₀ᵀ r_t dt` is approximated by the **left-Riemann** sum
//! `Σ_{i=0}^{N-1} r_i Δt`, so the terminal rate r_N never enters the
//! discount factor. The exact mean of this sum is
//! [`crate::analytics::vasicek_analytic::euler_integral_mean`], which the
//! control variate relies on.
//!
//! A path is a pure function of its draws; nothing here can fail once the
//! grid and parameters are validated.

use crate::error::{validation::validate_steps, VasicekError, VasicekResult};
use crate::mc::control_variate::ControlReference;
use crate::models::vasicek::Vasicek;
use crate::solvers::euler_maruyama::EulerMaruyama;
use serde::{Deserialize, Serialize};

/// How the time grid is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStepping {
    /// Fixed number of equal steps
    Steps(usize),
    /// Target step size; the step count is `max(1, round(T / Δt))`
    StepSize(f64),
}

impl TimeStepping {
    pub fn validate(&self) -> VasicekResult<()> {
        match *self {
            TimeStepping::Steps(n) => validate_steps(n),
            TimeStepping::StepSize(dt) if dt.is_finite() && dt > 0.0 => Ok(()),
            TimeStepping::StepSize(dt) => Err(VasicekError::InvalidConfiguration {
                field: "time_stepping".to_string(),
                reason: format!("step size must be positive and finite, got {}", dt),
            }),
        }
    }
}

/// Equal-step time grid over [0, T]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    steps: usize,
    dt: f64,
}

impl TimeGrid {
    pub fn new(maturity: f64, stepping: TimeStepping) -> VasicekResult<Self> {
        stepping.validate()?;
        let steps = match stepping {
            TimeStepping::Steps(n) => n,
            // `as usize` saturates, validate_steps rejects the overflow
            TimeStepping::StepSize(dt) => ((maturity / dt).round() as usize).max(1),
        };
        validate_steps(steps)?;
        Ok(TimeGrid {
            steps,
            dt: maturity / steps as f64,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

/// Realized short rates `r_0..=r_N` of one trial
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPath {
    pub rates: Vec<f64>,
    pub dt: f64,
}

impl SimulatedPath {
    /// Left-Riemann approximation of `∫₀ᵀ r_t dt`
    pub fn integral(&self) -> f64 {
        let n = self.rates.len().saturating_sub(1);
        let mut integral = 0.0;
        for &r in &self.rates[..n] {
            integral += r * self.dt;
        }
        integral
    }

    pub fn discount_factor(&self) -> f64 {
        (-self.integral()).exp()
    }
}

/// Per-path outcome aggregated by the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountSample {
    /// `exp(-Σ r_i Δt)`
    pub discount: f64,
    /// Control value from the same realized rates; its expectation is the
    /// analytical bond price
    pub reference: f64,
}

/// Simulate and keep the full path. `draws` holds one normal per step.
pub fn simulate_path(model: &Vasicek, grid: &TimeGrid, draws: &[f64]) -> SimulatedPath {
    debug_assert_eq!(draws.len(), grid.steps);
    let dt = grid.dt;
    let mut rates = Vec::with_capacity(draws.len() + 1);
    let mut r = model.params.r0();
    let mut t = 0.0;
    rates.push(r);
    for &z in draws {
        EulerMaruyama::step_with_normal(model, &mut r, t, dt, z);
        t += dt;
        rates.push(r);
    }
    SimulatedPath { rates, dt }
}

/// Simulate keeping only the running left-Riemann integral
pub fn simulate_integral(model: &Vasicek, grid: &TimeGrid, draws: &[f64]) -> f64 {
    debug_assert_eq!(draws.len(), grid.steps);
    let dt = grid.dt;
    let mut r = model.params.r0();
    let mut t = 0.0;
    let mut integral = 0.0;
    for &z in draws {
        integral += r * dt;
        EulerMaruyama::step_with_normal(model, &mut r, t, dt, z);
        t += dt;
    }
    integral
}

/// Simulate one path and reduce it to its [`DiscountSample`]
pub fn simulate_discount(
    model: &Vasicek,
    grid: &TimeGrid,
    draws: &[f64],
    control: &ControlReference,
) -> DiscountSample {
    let integral = simulate_integral(model, grid, draws);
    DiscountSample {
        discount: (-integral).exp(),
        reference: control.reference(integral),
    }
}
