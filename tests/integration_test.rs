// tests/integration_test.rs
use vasicek_mc::analytics::vasicek_analytic;
use vasicek_mc::mc::control_variate::ControlVariate;
use vasicek_mc::mc::governor::MAX_SIMULATIONS;
use vasicek_mc::mc::mc_engine::{mc_price_zero_coupon_bond, PricingMethod, SimulationConfig};
use vasicek_mc::mc::path::TimeStepping;
use vasicek_mc::models::vasicek::VasicekParams;
use vasicek_mc::rng::RandomSource;

// κ = 0.5, θ = 3%, r0 = 2%, σ = 1%, T = 5y
fn scenario() -> VasicekParams {
    VasicekParams::new(0.5, 0.03, 0.01, 0.02, 5.0).expect("Valid parameters")
}

fn plain(paths: usize) -> SimulationConfig {
    SimulationConfig {
        paths,
        seed: 42,
        control_variate: ControlVariate::None,
        ..Default::default()
    }
}

#[test]
fn test_plain_mc_converges_to_closed_form() {
    let params = scenario();
    let analytic = vasicek_analytic::zero_coupon_bond_price(&params);

    let mut standard_errors = Vec::new();
    for &paths in &[100, 1_000, 10_000] {
        let estimate = mc_price_zero_coupon_bond(&params, &plain(paths)).expect("Valid configuration");
        assert_eq!(estimate.method, PricingMethod::MonteCarlo);
        assert_eq!(estimate.effective_simulation_count, paths);

        let abs_error = (estimate.price - analytic).abs();
        println!(
            "N = {:>6}: price {:.6} ± {:.6} (analytic {:.6}, error {:.2e})",
            paths, estimate.price, estimate.standard_error, analytic, abs_error
        );
        // 4 standard errors plus the Euler discretization bias (~1e-5)
        assert!(
            abs_error < 4.0 * estimate.standard_error + 2e-5,
            "N = {}: error {} vs standard error {}",
            paths,
            abs_error,
            estimate.standard_error
        );
        standard_errors.push(estimate.standard_error);
    }

    assert!(standard_errors[0] > standard_errors[1]);
    assert!(standard_errors[1] > standard_errors[2]);

    // 1/√N: 100x the paths gives roughly a tenth of the standard error
    let ratio = standard_errors[0] / standard_errors[2];
    assert!(ratio > 7.0 && ratio < 14.0, "standard error ratio {}", ratio);
}

#[test]
fn test_control_variate_reduces_standard_error() {
    let params = scenario();
    let analytic = vasicek_analytic::zero_coupon_bond_price(&params);

    let plain_estimate = mc_price_zero_coupon_bond(&params, &plain(10_000)).expect("Valid configuration");

    let cv_cfg = SimulationConfig {
        control_variate: ControlVariate::Optimal,
        ..plain(10_000)
    };
    let cv_estimate = mc_price_zero_coupon_bond(&params, &cv_cfg).expect("Valid configuration");

    let vrf = (plain_estimate.standard_error / cv_estimate.standard_error).powi(2);
    println!("\nMC Price (with CV): {}", cv_estimate.price);
    println!("MC Price (without CV): {}", plain_estimate.price);
    println!("Analytic Price: {}", analytic);
    println!("Variance Reduction Factor: {}", vrf);

    assert_eq!(cv_estimate.method, PricingMethod::MonteCarloControlVariate);
    assert!(cv_estimate.standard_error < plain_estimate.standard_error);
    assert!(vrf > 10.0, "Variance Reduction Factor ({}) is too small", vrf);

    // Same draws: the uncorrected part of the CV run is the plain run
    assert_eq!(cv_estimate.diagnostics.uncorrected_price, plain_estimate.price);
    assert_eq!(
        cv_estimate.diagnostics.uncorrected_standard_error,
        plain_estimate.standard_error
    );

    assert!(
        (cv_estimate.price - analytic).abs() < 1e-4,
        "CV price {} vs analytic {}",
        cv_estimate.price,
        analytic
    );
    let beta = cv_estimate.diagnostics.beta.expect("correction applied");
    assert!(beta > 0.9 && beta < 1.1, "beta {}", beta);
}

#[test]
fn test_fixed_beta_also_reduces_standard_error() {
    let params = scenario();
    let fixed_cfg = SimulationConfig {
        control_variate: ControlVariate::Fixed,
        ..plain(5_000)
    };
    let fixed = mc_price_zero_coupon_bond(&params, &fixed_cfg).expect("Valid configuration");
    let optimal_cfg = SimulationConfig {
        control_variate: ControlVariate::Optimal,
        ..plain(5_000)
    };
    let optimal = mc_price_zero_coupon_bond(&params, &optimal_cfg).expect("Valid configuration");

    assert_eq!(fixed.diagnostics.beta, Some(1.0));
    assert!(fixed.standard_error < fixed.diagnostics.uncorrected_standard_error);
    assert!(optimal.standard_error <= fixed.standard_error * (1.0 + 1e-9));
}

#[test]
fn test_quasi_monte_carlo_is_accurate_and_seed_independent() {
    let params = scenario();
    let analytic = vasicek_analytic::zero_coupon_bond_price(&params);

    let qmc = SimulationConfig {
        source: RandomSource::Sobol,
        control_variate: ControlVariate::None,
        ..plain(4_096)
    };
    let a = mc_price_zero_coupon_bond(&params, &qmc).expect("Valid configuration");
    let b = mc_price_zero_coupon_bond(&params, &SimulationConfig { seed: 7, ..qmc })
        .expect("Valid configuration");

    assert_eq!(a.method, PricingMethod::QuasiMonteCarlo);
    assert_eq!(a, b);
    assert!(
        (a.price - analytic).abs() < 1e-3,
        "QMC price {} vs analytic {}",
        a.price,
        analytic
    );

    let qmc_cv = SimulationConfig {
        control_variate: ControlVariate::Optimal,
        ..qmc
    };
    let corrected = mc_price_zero_coupon_bond(&params, &qmc_cv).expect("Valid configuration");
    assert_eq!(corrected.method, PricingMethod::QuasiMonteCarlo);
    assert!(corrected.diagnostics.beta.is_some());
    assert!((corrected.price - analytic).abs() < 1e-4);
}

#[test]
fn test_runs_are_bit_identical() {
    let params = scenario();
    let cfg = SimulationConfig {
        paths: 3_000,
        seed: 2024,
        time_stepping: TimeStepping::Steps(100),
        ..Default::default()
    };

    let first = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");
    let second = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");
    assert_eq!(first, second);
    assert_eq!(first.price.to_bits(), second.price.to_bits());

    let sequential = SimulationConfig {
        parallel: false,
        ..cfg
    };
    let third = mc_price_zero_coupon_bond(&params, &sequential).expect("Valid configuration");
    assert_eq!(first, third);

    let other_seed = SimulationConfig { seed: 2025, ..cfg };
    let fourth = mc_price_zero_coupon_bond(&params, &other_seed).expect("Valid configuration");
    assert_ne!(first.price, fourth.price);
}

#[test]
fn test_adjacent_seeds_give_independent_estimates() {
    let params = scenario();
    let run = |seed: u64| {
        let cfg = SimulationConfig {
            paths: 2_000,
            seed,
            time_stepping: TimeStepping::Steps(100),
            control_variate: ControlVariate::None,
            ..Default::default()
        };
        mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration")
    };

    // Independent runs differ by about sqrt(2) standard errors on average.
    // Runs sharing all but one path would differ by a small fraction of one.
    let estimates: Vec<_> = (100..111).map(run).collect();
    let mean_scaled_gap = estimates
        .windows(2)
        .map(|pair| (pair[0].price - pair[1].price).abs() / pair[0].standard_error)
        .sum::<f64>()
        / 10.0;

    assert!(
        mean_scaled_gap > 0.3,
        "adjacent seeds differ by only {} standard errors on average",
        mean_scaled_gap
    );
}

#[test]
fn test_quasi_monte_carlo_beats_pseudo_random_at_equal_paths() {
    let params = scenario();
    let steps = 16;
    let target = euler_discount_expectation(&params, steps);

    let mut mc_total = 0.0;
    let mut qmc_total = 0.0;
    for &paths in &[1_024, 4_096, 16_384] {
        let mc = SimulationConfig {
            time_stepping: TimeStepping::Steps(steps),
            ..plain(paths)
        };
        let qmc = SimulationConfig {
            source: RandomSource::Sobol,
            ..mc
        };
        let mc_error = (mc_price_zero_coupon_bond(&params, &mc).expect("Valid configuration").price - target).abs();
        let qmc_error = (mc_price_zero_coupon_bond(&params, &qmc).expect("Valid configuration").price - target).abs();
        println!("N = {:>6}: MC error {:.2e}, QMC error {:.2e}", paths, mc_error, qmc_error);

        mc_total += mc_error;
        qmc_total += qmc_error;
    }

    assert!(
        qmc_total < 0.5 * mc_total,
        "QMC total error {} vs MC total error {}",
        qmc_total,
        mc_total
    );
}

/// Exact E[exp(-Σ r_i Δt)] of the Euler scheme on `steps` steps.
///
/// The Euler integral is Gaussian: its mean is the Euler integral mean and
/// draw `Z_i` enters with weight `σ Δt^1.5 (1 - q^(N-1-i)) / (1 - q)`.
fn euler_discount_expectation(params: &VasicekParams, steps: usize) -> f64 {
    let dt = params.maturity() / steps as f64;
    let q = 1.0 - params.kappa() * dt;
    let mean = vasicek_analytic::euler_integral_mean(params, steps);
    let variance: f64 = (0..steps)
        .map(|i| {
            let weight = params.sigma() * dt.powf(1.5) * (1.0 - q.powi((steps - 1 - i) as i32)) / (1.0 - q);
            weight * weight
        })
        .sum();
    (-mean + 0.5 * variance).exp()
}

#[test]
fn test_over_request_is_clamped() {
    let params = scenario();
    let cfg = SimulationConfig {
        paths: 200_000,
        time_stepping: TimeStepping::Steps(10),
        ..Default::default()
    };
    let estimate = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");

    assert_eq!(estimate.effective_simulation_count, 65_536);
    assert_eq!(estimate.effective_simulation_count, MAX_SIMULATIONS);
    assert_eq!(estimate.diagnostics.requested_count, 200_000);
    assert!(estimate.diagnostics.clamped);
}

#[test]
fn test_in_range_request_is_exact() {
    let params = scenario();
    for &paths in &[1, 2, 999, MAX_SIMULATIONS] {
        let cfg = SimulationConfig {
            paths,
            time_stepping: TimeStepping::Steps(2),
            ..Default::default()
        };
        let estimate = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");
        assert_eq!(estimate.effective_simulation_count, paths);
        assert!(!estimate.diagnostics.clamped);
    }
}

#[test]
fn test_zero_volatility_falls_back_to_plain_estimate() {
    let params = VasicekParams::new(0.5, 0.03, 0.0, 0.02, 5.0).expect("Valid parameters");
    let cfg = SimulationConfig {
        paths: 500,
        time_stepping: TimeStepping::Steps(1_000),
        ..Default::default()
    };
    let estimate = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");

    assert!(estimate.diagnostics.degenerate_control);
    assert_eq!(estimate.diagnostics.beta, None);
    assert_eq!(estimate.method, PricingMethod::MonteCarlo);
    assert!(estimate.standard_error < 1e-12);
    assert!((estimate.price - estimate.diagnostics.analytical_price).abs() < 1e-5);
}

#[test]
fn test_json_request_is_priced_and_clamped() {
    use vasicek_mc::request::{price_request, PricingRequest};

    let json = r#"{
        "data": {
            "Initial Interest Rate": 0.02,
            "Volatility": 0.01,
            "Maturity Time": 12
        },
        "solver_params": { "NumberOfSimulations": 200000 }
    }"#;
    let request: PricingRequest = serde_json::from_str(json).expect("Valid request");
    assert_eq!(request.data.kappa, 0.1);
    assert_eq!(request.data.theta, 0.03);

    let response = price_request(&request).expect("Priced request");
    assert_eq!(response.simulations, MAX_SIMULATIONS);
    assert_eq!(response.method, PricingMethod::QuasiMonteCarlo);
    assert!((response.bond_price - response.analytical_price).abs() < 1e-4);

    let body = serde_json::to_value(&response).expect("Serializable response");
    assert_eq!(body["simulations"], 65_536);
    assert_eq!(body["method"], "quasi_monte_carlo");
}

#[test]
fn test_json_request_defaults_simulation_count() {
    use vasicek_mc::request::{PricingRequest, DEFAULT_SIMULATIONS};

    let json = r#"{"data": {"Initial Interest Rate": 0.05, "Volatility": 0.02, "Maturity Time": 6}}"#;
    let request: PricingRequest = serde_json::from_str(json).expect("Valid request");
    assert_eq!(request.solver_params.number_of_simulations, DEFAULT_SIMULATIONS);
    assert_eq!(request.params().expect("Valid parameters").maturity(), 0.5);
}
