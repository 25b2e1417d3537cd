// src/solvers/euler_maruyama.rs
//! Euler-Maruyama Scheme for SDE Integration
//!
//! # Mathematical Framework
//!
//! For a general SDE:
//! ```text
//! dX_t = a(X_t, t) dt + b(X_t, t) dW_t
//! ```
//!
//! The Euler-Maruyama scheme provides the discretization:
//! ```text
//! X_{n+1} = X_n + a(X_n, t_n) Δt + b(X_n, t_n) √Δt Z_n
//! ```
//!
//! with Z_n ~ N(0,1). For the Vasicek model this reads
//! `r_{n+1} = r_n + κ(θ - r_n)Δt + σ√Δt Z_n`.
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 0.5 in step size (order 1 for additive noise)
//! - **Weak convergence**: Order 1.0 in step size
//! - **Stability**: the mean-reverting drift overshoots θ when κΔt ≥ 1

use crate::models::model::SDEModel;
use crate::rng;
use rand::Rng;

/// Euler-Maruyama numerical scheme for SDE integration
pub struct EulerMaruyama;

impl EulerMaruyama {
    /// Single step driven by a supplied standard-normal draw `z`
    ///
    /// This is the form used by the path simulator: the draw comes from a
    /// pre-assigned [`crate::rng::DrawStream`], so the step is a pure
    /// function of its inputs.
    #[inline]
    pub fn step_with_normal<M: SDEModel>(model: &M, x: &mut f64, t: f64, dt: f64, z: f64) {
        model.step_with_dw(x, t, dt, dt.sqrt() * z);
    }

    /// Single Euler-Maruyama step drawing its own normal from `rng`
    pub fn step<M: SDEModel, R: Rng + ?Sized>(
        model: &M,
        x: &mut f64,
        t: f64,
        dt: f64,
        rng: &mut R,
    ) {
        let normal_draw = rng::get_normal_draw(rng);
        let drift_term = model.drift(*x, t) * dt;
        let diffusion_term = model.diffusion(*x, t) * dt.sqrt() * normal_draw;
        *x += drift_term + diffusion_term;
    }
}
