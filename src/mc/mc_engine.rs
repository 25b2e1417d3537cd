// src/mc/mc_engine.rs
use crate::analytics::vasicek_analytic::{euler_integral_mean, zero_coupon_bond_price};
use crate::error::{validation::*, VasicekError, VasicekResult};
use crate::mc::control_variate::{self, ControlReference, ControlVariate, SampleMoments};
use crate::mc::governor;
use crate::mc::path::{simulate_discount, DiscountSample, TimeGrid, TimeStepping};
use crate::models::vasicek::{Vasicek, VasicekParams};
use crate::rng::{DrawStream, RandomSource, RngFactory};
use crate::sobol::{validate_sobol_dimension, SobolSequenceSource};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Sobol points generated per block before the block is simulated in parallel
const SOBOL_BLOCK_PATHS: usize = 1_024;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Requested path count; advisory, capped by the governor
    pub paths: usize,
    pub time_stepping: TimeStepping,
    pub source: RandomSource,
    /// Base seed of the pseudo-random source; ignored by Sobol
    pub seed: u64,
    pub control_variate: ControlVariate,
    /// Simulate paths on the rayon pool. Results do not depend on this flag.
    pub parallel: bool,
}

impl SimulationConfig {
    /// Validate the simulation configuration
    pub fn validate(&self) -> VasicekResult<()> {
        validate_paths(self.paths)?;
        self.time_stepping.validate()?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            paths: 10_000,
            time_stepping: TimeStepping::StepSize(0.01),
            source: RandomSource::PseudoRandom,
            seed: 12345,
            control_variate: ControlVariate::Optimal,
            parallel: true,
        }
    }
}

/// How a [`PriceEstimate`] was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMethod {
    Analytical,
    MonteCarlo,
    MonteCarloControlVariate,
    QuasiMonteCarlo,
}

/// Run diagnostics attached to every estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub requested_count: usize,
    /// The governor reduced the requested count
    pub clamped: bool,
    pub steps: usize,
    pub analytical_price: f64,
    pub uncorrected_price: f64,
    pub uncorrected_standard_error: f64,
    /// Unbiased (n - 1) sample variance of the per-path discount factors
    pub sample_variance: f64,
    /// β of the control-variate correction, if one was applied
    pub beta: Option<f64>,
    /// The control had no variance and the correction was skipped
    pub degenerate_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub price: f64,
    pub standard_error: f64,
    pub effective_simulation_count: usize,
    pub method: PricingMethod,
    pub diagnostics: Diagnostics,
}

/// The closed-form price in the estimate shape (no sampling error)
pub fn analytical_estimate(params: &VasicekParams) -> PriceEstimate {
    let price = zero_coupon_bond_price(params);
    PriceEstimate {
        price,
        standard_error: 0.0,
        effective_simulation_count: 0,
        method: PricingMethod::Analytical,
        diagnostics: Diagnostics {
            requested_count: 0,
            clamped: false,
            steps: 0,
            analytical_price: price,
            uncorrected_price: price,
            uncorrected_standard_error: 0.0,
            sample_variance: 0.0,
            beta: None,
            degenerate_control: false,
        },
    }
}

/// Monte Carlo pricing of a zero-coupon bond under the Vasicek model
///
/// # Pipeline
///
/// 1. Validate the configuration and build the time grid.
/// 2. Clamp the path count through [`governor::govern`].
/// 3. Simulate one [`DiscountSample`] per path. Each path owns its draws:
///    pseudo-random paths seed their own `StdRng` from `(seed, index)` via
///    [`crate::rng::path_seed`], Sobol paths take consecutive points of one
///    sequence, generated in blocks.
/// 4. Aggregate the samples in path order (sums, then centered sums).
/// 5. Apply the control-variate policy.
///
/// Samples are collected in path-index order and reduced sequentially, so
/// the estimate is bit-identical across thread counts and with `parallel`
/// switched off.
///
/// # Standard error
///
/// `sqrt(variance / N)` with the unbiased sample variance. A single path has
/// no variance estimate; its standard error is reported as infinity. For the
/// Sobol source the same formula is reported although the points are not
/// independent, so it overstates the QMC error.
///
/// # Errors
///
/// - `InvalidConfiguration` for a zero path count or a bad time grid
/// - `NumericalInstability` if the estimate is not finite
pub fn mc_price_zero_coupon_bond(
    params: &VasicekParams,
    cfg: &SimulationConfig,
) -> VasicekResult<PriceEstimate> {
    cfg.validate()?;
    let grid = TimeGrid::new(params.maturity(), cfg.time_stepping)?;
    if cfg.source == RandomSource::Sobol {
        validate_sobol_dimension(grid.steps())?;
    }
    if params.kappa() * grid.dt() >= 1.0 {
        tracing::warn!(
            kappa = params.kappa(),
            dt = grid.dt(),
            "kappa * dt >= 1: Euler steps overshoot the long-run mean"
        );
    }

    let count = governor::govern(cfg.paths);
    let n = count.effective;

    let model = Vasicek::new(*params);
    let analytic_price = zero_coupon_bond_price(params);
    let control = ControlReference::new(analytic_price, euler_integral_mean(params, grid.steps()));

    tracing::debug!(
        paths = n,
        steps = grid.steps(),
        source = ?cfg.source,
        control_variate = ?cfg.control_variate,
        "simulating Vasicek short-rate paths"
    );

    let samples = match cfg.source {
        RandomSource::PseudoRandom => {
            simulate_pseudo_random(&model, &grid, &control, n, cfg.seed, cfg.parallel)
        }
        RandomSource::Sobol => simulate_sobol(&model, &grid, &control, n, cfg.parallel)?,
    };

    let moments = aggregate(&samples);
    let correction = control_variate::correct(&moments, analytic_price, cfg.control_variate);

    let method = match (cfg.source, correction.beta) {
        (RandomSource::Sobol, _) => PricingMethod::QuasiMonteCarlo,
        (RandomSource::PseudoRandom, Some(_)) => PricingMethod::MonteCarloControlVariate,
        (RandomSource::PseudoRandom, None) => PricingMethod::MonteCarlo,
    };

    let estimate = PriceEstimate {
        price: correction.price,
        standard_error: standard_error(correction.variance, n),
        effective_simulation_count: n,
        method,
        diagnostics: Diagnostics {
            requested_count: count.requested,
            clamped: count.clamped,
            steps: grid.steps(),
            analytical_price: analytic_price,
            uncorrected_price: moments.mean_discount,
            uncorrected_standard_error: standard_error(moments.var_discount, n),
            sample_variance: moments.var_discount,
            beta: correction.beta,
            degenerate_control: correction.degenerate,
        },
    };

    if !estimate.price.is_finite() {
        return Err(VasicekError::NumericalInstability {
            method: format!("{:?}", method),
            reason: format!("Price estimate is not finite: {}", estimate.price),
        });
    }
    if estimate.standard_error.is_nan() {
        return Err(VasicekError::NumericalInstability {
            method: format!("{:?}", method),
            reason: "Standard error is NaN".to_string(),
        });
    }

    tracing::debug!(
        price = estimate.price,
        standard_error = estimate.standard_error,
        analytical = analytic_price,
        beta = ?correction.beta,
        "bond price estimated"
    );

    Ok(estimate)
}

fn simulate_pseudo_random(
    model: &Vasicek,
    grid: &TimeGrid,
    control: &ControlReference,
    n: usize,
    seed: u64,
    parallel: bool,
) -> Vec<DiscountSample> {
    let factory = RngFactory::new(seed);
    let steps = grid.steps();
    let simulate_one = |draws: &mut Vec<f64>, i: usize| {
        let mut source = factory.create_path_source(i as u64, steps);
        source.next_normals(draws);
        simulate_discount(model, grid, draws, control)
    };

    if parallel {
        (0..n)
            .into_par_iter()
            .map_init(|| vec![0.0; steps], simulate_one)
            .collect()
    } else {
        let mut draws = vec![0.0; steps];
        (0..n).map(|i| simulate_one(&mut draws, i)).collect()
    }
}

fn simulate_sobol(
    model: &Vasicek,
    grid: &TimeGrid,
    control: &ControlReference,
    n: usize,
    parallel: bool,
) -> VasicekResult<Vec<DiscountSample>> {
    let steps = grid.steps();
    let mut source = SobolSequenceSource::new(steps)?;
    let mut samples = Vec::with_capacity(n);
    let mut block = vec![0.0; SOBOL_BLOCK_PATHS.min(n) * steps];

    while samples.len() < n {
        let wanted = (n - samples.len()).min(SOBOL_BLOCK_PATHS);
        let block = &mut block[..wanted * steps];
        if source.fill_block(block, wanted) < wanted {
            return Err(VasicekError::NumericalInstability {
                method: "Quasi-Monte Carlo".to_string(),
                reason: format!("Sobol sequence exhausted after {} points", source.index()),
            });
        }

        if parallel {
            samples.par_extend(
                block
                    .par_chunks_exact(steps)
                    .map(|draws| simulate_discount(model, grid, draws, control)),
            );
        } else {
            samples.extend(
                block
                    .chunks_exact(steps)
                    .map(|draws| simulate_discount(model, grid, draws, control)),
            );
        }
    }

    Ok(samples)
}

/// Order-fixed two-pass reduction of the per-path samples
pub fn aggregate(samples: &[DiscountSample]) -> SampleMoments {
    let n = samples.len();
    if n == 0 {
        return SampleMoments::default();
    }

    let (sum_d, sum_ref) = samples
        .iter()
        .fold((0.0, 0.0), |(d, r), s| (d + s.discount, r + s.reference));
    let mean_discount = sum_d / n as f64;
    let mean_reference = sum_ref / n as f64;

    let (ss_d, ss_ref, s_cross) = samples.iter().fold((0.0, 0.0, 0.0), |(dd, rr, dr), s| {
        let d = s.discount - mean_discount;
        let r = s.reference - mean_reference;
        (dd + d * d, rr + r * r, dr + d * r)
    });

    let denom = if n > 1 { (n - 1) as f64 } else { f64::INFINITY };
    SampleMoments {
        count: n,
        mean_discount,
        mean_reference,
        var_discount: ss_d / denom,
        var_reference: ss_ref / denom,
        covariance: s_cross / denom,
    }
}

fn standard_error(variance: f64, n: usize) -> f64 {
    if n < 2 {
        f64::INFINITY
    } else {
        (variance / n as f64).sqrt()
    }
}
