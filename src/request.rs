// src/request.rs
//! Request/response shape of the bond-pricing job
//!
//! Pricing jobs arrive as a small JSON document:
//! ```json
//! {
//!   "data": {
//!     "Initial Interest Rate": 0.02,
//!     "Volatility": 0.01,
//!     "Maturity Time": 60
//!   },
//!   "solver_params": { "NumberOfSimulations": 10000 }
//! }
//! ```
//! The maturity is in months. κ and θ are optional and default to 0.1 and
//! 0.03. Jobs are priced with Sobol points, the optimal control variate and
//! a 0.01-year step.

use crate::error::VasicekResult;
use crate::mc::control_variate::ControlVariate;
use crate::mc::mc_engine::{mc_price_zero_coupon_bond, PricingMethod, SimulationConfig};
use crate::mc::path::TimeStepping;
use crate::models::vasicek::VasicekParams;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_KAPPA: f64 = 0.1;
pub const DEFAULT_THETA: f64 = 0.03;
pub const DEFAULT_SIMULATIONS: usize = 10_000;
pub const DEFAULT_TIME_STEP: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondData {
    #[serde(rename = "Initial Interest Rate")]
    pub initial_rate: f64,
    #[serde(rename = "Volatility")]
    pub volatility: f64,
    #[serde(rename = "Maturity Time")]
    pub maturity_months: f64,
    #[serde(rename = "Mean Reversion", default = "default_kappa")]
    pub kappa: f64,
    #[serde(rename = "Long Term Rate", default = "default_theta")]
    pub theta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    #[serde(rename = "NumberOfSimulations", default = "default_simulations")]
    pub number_of_simulations: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            number_of_simulations: DEFAULT_SIMULATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub data: BondData,
    #[serde(default)]
    pub solver_params: SolverParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    pub bond_price: f64,
    /// Variance of the simulated discount factors normalized by N, not N - 1.
    /// The engine's `Diagnostics::sample_variance` is the unbiased (N - 1) form.
    pub variance: f64,
    pub standard_error: f64,
    pub simulations: usize,
    pub analytical_price: f64,
    pub method: PricingMethod,
}

fn default_kappa() -> f64 {
    DEFAULT_KAPPA
}

fn default_theta() -> f64 {
    DEFAULT_THETA
}

fn default_simulations() -> usize {
    DEFAULT_SIMULATIONS
}

impl PricingRequest {
    pub fn params(&self) -> VasicekResult<VasicekParams> {
        VasicekParams::from_months(
            self.data.kappa,
            self.data.theta,
            self.data.volatility,
            self.data.initial_rate,
            self.data.maturity_months,
        )
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            paths: self.solver_params.number_of_simulations,
            time_stepping: TimeStepping::StepSize(DEFAULT_TIME_STEP),
            source: RandomSource::Sobol,
            control_variate: ControlVariate::Optimal,
            ..Default::default()
        }
    }
}

/// Rescale an (n - 1)-normalized variance to the 1/n normalization
fn population_variance(sample_variance: f64, n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        sample_variance * (n - 1) as f64 / n as f64
    }
}

/// Price a request end to end
pub fn price_request(request: &PricingRequest) -> VasicekResult<PricingResponse> {
    let params = request.params()?;
    let estimate = mc_price_zero_coupon_bond(&params, &request.simulation_config())?;
    Ok(PricingResponse {
        bond_price: estimate.price,
        variance: population_variance(
            estimate.diagnostics.sample_variance,
            estimate.effective_simulation_count,
        ),
        standard_error: estimate.standard_error,
        simulations: estimate.effective_simulation_count,
        analytical_price: estimate.diagnostics.analytical_price,
        method: estimate.method,
    })
}
