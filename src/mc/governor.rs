// src/mc/governor.rs
//! Simulation-count ceiling
//!
//! Every pricing run asks the governor for its path count exactly once,
//! before any simulation work starts. Over-requests are clamped, never
//! rejected; the clamp is visible to callers through the effective count
//! reported in [`crate::mc::mc_engine::PriceEstimate`].

/// Hard ceiling on simulated paths per pricing call (2^16)
pub const MAX_SIMULATIONS: usize = 1 << 16;

/// Outcome of governing a requested path count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernedCount {
    pub requested: usize,
    pub effective: usize,
    pub clamped: bool,
}

/// `min(requested, MAX_SIMULATIONS)`
#[inline]
pub fn effective_path_count(requested: usize) -> usize {
    requested.min(MAX_SIMULATIONS)
}

/// Apply the ceiling and record whether it bit
pub fn govern(requested: usize) -> GovernedCount {
    let effective = effective_path_count(requested);
    let clamped = effective < requested;
    if clamped {
        tracing::warn!(
            requested,
            effective,
            "requested path count exceeds the simulation cap; clamping"
        );
    }
    GovernedCount {
        requested,
        effective,
        clamped,
    }
}
