// src/sobol.rs
//! Sobol low-discrepancy draw source for Quasi-Monte Carlo
//!
//! # Dimension-to-path mapping
//!
//! One Sobol point covers the whole time grid of one path: the sequence
//! dimension equals the number of time steps and coordinate `i` of a point
//! drives step `i`. Consecutive paths consume consecutive points, so no point
//! is reused within a run.
//!
//! # Conventions
//!
//! - Direction numbers: Joe–Kuo D6, extended table (`JoeKuoD6::extended()`),
//!   up to [`SOBOL_MAX_DIMENSIONS`] dimensions. The table is decompressed once
//!   per process and shared by every sequence.
//! - No scrambling. The output is deterministic and independent of any seed.
//! - The first point of the sequence is the origin, whose inverse-normal
//!   image is −∞ in every coordinate; it is skipped, so path `k` uses point
//!   `k + 1`. This shifts which points are used (and therefore the convergence
//!   profile) but not the expectation being estimated.
//! - Uniforms are clamped into the open unit interval before the
//!   inverse-CDF transform (see [`crate::math_utils::norm_inv_cdf`]).

use crate::error::{VasicekError, VasicekResult};
use crate::math_utils::norm_inv_cdf;
use crate::rng::DrawStream;
use sobol::params::JoeKuoD6;
use sobol::Sobol;
use std::sync::OnceLock;

/// Largest dimension (time-step count) supported by the extended direction-number table
pub const SOBOL_MAX_DIMENSIONS: usize = 21_201;

/// Number of leading points skipped before the first path
pub const SOBOL_SKIP: usize = 1;

/// Sequential Sobol point stream mapped to standard normals
pub struct SobolSequenceSource {
    sequence: Sobol<f64>,
    dimension: usize,
    index: u64,
}

impl SobolSequenceSource {
    pub fn new(dimension: usize) -> VasicekResult<Self> {
        validate_sobol_dimension(dimension)?;

        let mut sequence = Sobol::<f64>::new(dimension, direction_numbers());
        for _ in 0..SOBOL_SKIP {
            sequence.next();
        }

        Ok(Self {
            sequence,
            dimension,
            index: SOBOL_SKIP as u64,
        })
    }

    /// Index in the raw Sobol sequence of the next point to be handed out
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Fill `out` with the normals of the next `points` paths, laid out
    /// path-major (`out[p * dimension + i]` is step `i` of path `p`).
    ///
    /// Returns the number of paths actually written.
    pub fn fill_block(&mut self, out: &mut [f64], points: usize) -> usize {
        let dims = self.dimension;
        let mut written = 0;
        for chunk in out.chunks_exact_mut(dims).take(points) {
            if !self.next_normals(chunk) {
                break;
            }
            written += 1;
        }
        written
    }
}

impl DrawStream for SobolSequenceSource {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn next_normals(&mut self, out: &mut [f64]) -> bool {
        debug_assert_eq!(out.len(), self.dimension);
        match self.sequence.next() {
            Some(point) => {
                for (z, u) in out.iter_mut().zip(point) {
                    *z = norm_inv_cdf(u);
                }
                self.index += 1;
                true
            }
            None => false,
        }
    }
}

fn direction_numbers() -> &'static JoeKuoD6 {
    static PARAMS: OnceLock<JoeKuoD6> = OnceLock::new();
    PARAMS.get_or_init(JoeKuoD6::extended)
}

/// Check that a time grid can be driven by Sobol points
pub fn validate_sobol_dimension(dimension: usize) -> VasicekResult<()> {
    if dimension == 0 || dimension > SOBOL_MAX_DIMENSIONS {
        Err(VasicekError::InvalidConfiguration {
            field: "steps".to_string(),
            reason: format!(
                "Sobol source supports 1 to {} time steps, got {}",
                SOBOL_MAX_DIMENSIONS, dimension
            ),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sobol_draws_are_finite_and_skip_origin() {
        let mut source = SobolSequenceSource::new(8).unwrap();
        assert_eq!(source.index(), 1);

        let mut out = vec![0.0; 8];
        for _ in 0..1_000 {
            assert!(source.next_normals(&mut out));
            assert!(out.iter().all(|z| z.is_finite()));
        }
        assert_eq!(source.index(), 1_001);
    }

    #[test]
    fn test_sobol_is_deterministic() {
        let mut a = SobolSequenceSource::new(5).unwrap();
        let mut b = SobolSequenceSource::new(5).unwrap();
        let mut out_a = vec![0.0; 5];
        let mut out_b = vec![0.0; 5];

        for _ in 0..100 {
            a.next_normals(&mut out_a);
            b.next_normals(&mut out_b);
            assert_eq!(out_a, out_b);
        }
    }

    #[test]
    fn test_first_dimension_is_balanced() {
        // 2^k - 1 points after the origin cover the first coordinate symmetrically
        let mut source = SobolSequenceSource::new(1).unwrap();
        let mut z = [0.0];
        let mut sum = 0.0;
        for _ in 0..1_023 {
            source.next_normals(&mut z);
            sum += z[0];
        }
        assert!((sum / 1_023.0).abs() < 1e-2, "mean = {}", sum / 1_023.0);
    }

    #[test]
    fn test_fill_block_matches_sequential_draws() {
        let mut block_source = SobolSequenceSource::new(3).unwrap();
        let mut block = vec![0.0; 3 * 4];
        assert_eq!(block_source.fill_block(&mut block, 4), 4);

        let mut seq_source = SobolSequenceSource::new(3).unwrap();
        let mut point = vec![0.0; 3];
        for p in 0..4 {
            seq_source.next_normals(&mut point);
            assert_eq!(&block[p * 3..(p + 1) * 3], point.as_slice());
        }
    }

    #[test]
    fn test_dimension_limits() {
        assert!(SobolSequenceSource::new(0).is_err());
        assert!(validate_sobol_dimension(SOBOL_MAX_DIMENSIONS).is_ok());
        assert!(validate_sobol_dimension(SOBOL_MAX_DIMENSIONS + 1).is_err());
    }

    #[test]
    fn test_wide_grids_build_a_sequence() {
        // Past the 1000 dimensions of the standard table, up to the accepted limit
        for dimension in [1_000, 1_001, 5_000, SOBOL_MAX_DIMENSIONS] {
            let mut source = SobolSequenceSource::new(dimension).unwrap();
            let mut out = vec![0.0; dimension];
            assert!(source.next_normals(&mut out));
            assert!(out.iter().all(|z| z.is_finite()));
        }
    }
}
