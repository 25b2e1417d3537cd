// src/rng.rs
//! Random draw sources for short-rate path simulation
//!
//! # Design
//!
//! Every path owns its own draw stream. Nothing is shared between paths, so
//! paths can be simulated on any thread in any order and a run with a fixed
//! seed is reproducible regardless of the rayon thread count.
//!
//! Two variants exist, selected once per run via [`RandomSource`]:
//! - **Pseudo-random**: a `StdRng` per path, seeded with a splitmix64 mix of
//!   the run seed and the path index ([`path_seed`]). Neighbouring run seeds
//!   therefore give unrelated path streams.
//! - **Sobol**: path `k` consumes point `k + 1` of a Sobol sequence whose
//!   dimension is the number of time steps (see [`crate::sobol`]).
//!
//! Both variants hand out standard-normal draws, one per time step.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Random draw source variant, fixed for a whole pricing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomSource {
    /// Independent pseudo-random normals, reproducible through the seed
    PseudoRandom,
    /// Deterministic Sobol low-discrepancy points mapped to normals
    Sobol,
}

/// Stream of standard-normal draws consumed by one path simulation
pub trait DrawStream {
    /// Number of draws produced per call (one per time step)
    fn dimension(&self) -> usize;

    /// Fill `out` with the next `dimension()` standard-normal draws.
    ///
    /// Returns `false` if the stream is exhausted and `out` was left untouched.
    fn next_normals(&mut self, out: &mut [f64]) -> bool;
}

/// Pseudo-random draw stream owned by a single path
#[derive(Debug, Clone)]
pub struct PseudoRandomSource {
    rng: StdRng,
    dimension: usize,
}

impl PseudoRandomSource {
    pub fn new(rng: StdRng, dimension: usize) -> Self {
        Self { rng, dimension }
    }
}

impl DrawStream for PseudoRandomSource {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn next_normals(&mut self, out: &mut [f64]) -> bool {
        debug_assert_eq!(out.len(), self.dimension);
        for z in out.iter_mut() {
            *z = get_normal_draw(&mut self.rng);
        }
        true
    }
}

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Create a standard RNG for a specific path
    pub fn create_std_rng(&self, path_id: u64) -> StdRng {
        seed_rng_from_u64(path_seed(self.base_seed, path_id))
    }

    /// Create the draw stream of a specific path
    pub fn create_path_source(&self, path_id: u64, dimension: usize) -> PseudoRandomSource {
        PseudoRandomSource::new(self.create_std_rng(path_id), dimension)
    }
}

/// Per-path seed: `splitmix64(splitmix64(base_seed) + path_id)`.
///
/// Paths of one run get consecutive inputs to the outer mix. Two run seeds
/// only share a path stream if their hashed bases lie within the path count
/// of each other.
pub fn path_seed(base_seed: u64, path_id: u64) -> u64 {
    splitmix64(splitmix64(base_seed).wrapping_add(path_id))
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
