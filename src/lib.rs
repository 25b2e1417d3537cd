//! # vasicek-mc: Zero-Coupon Bond Pricing under the Vasicek Model
//!
//! Simulation-based pricing of a zero-coupon bond when the short rate follows
//! ```text
//! dr_t = κ(θ - r_t) dt + σ dW_t
//! ```
//! cross-checked against, and improved with, the closed-form price.
//!
//! ## Key Features
//!
//! - **Closed form**: Vasicek `P(0,T) = A(T) e^(-B(T) r0)`
//! - **Monte Carlo**: Euler–Maruyama short-rate paths, parallel with Rayon
//! - **Control variate**: fixed (β = 1) or sample-optimal β̂ against the closed form
//! - **Quasi-Monte Carlo**: Sobol points mapped through the inverse normal CDF
//! - **Governed**: at most 65 536 paths per call, over-requests are clamped
//! - **Reproducible**: bit-identical results for a fixed seed on any thread count
//!
//! ## Quick Start
//!
//! ```rust
//! use vasicek_mc::mc::mc_engine::{mc_price_zero_coupon_bond, SimulationConfig};
//! use vasicek_mc::models::vasicek::VasicekParams;
//!
//! // κ = 0.5, θ = 3%, σ = 1%, r0 = 2%, T = 5y
//! let params = VasicekParams::new(0.5, 0.03, 0.01, 0.02, 5.0).expect("Valid parameters");
//!
//! let cfg = SimulationConfig {
//!     paths: 4_096,
//!     ..Default::default()
//! };
//!
//! let estimate = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");
//! println!(
//!     "Bond price: {:.6} ± {:.6} (closed form {:.6})",
//!     estimate.price, estimate.standard_error, estimate.diagnostics.analytical_price
//! );
//! ```

// Module declarations
pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod request;
pub mod rng;
pub mod sobol;
pub mod solvers;

// Re-export commonly used types for convenience
pub use error::{VasicekError, VasicekResult};
pub use mc::mc_engine::{
    analytical_estimate, mc_price_zero_coupon_bond, PriceEstimate, PricingMethod,
    SimulationConfig,
};
pub use models::vasicek::VasicekParams;
