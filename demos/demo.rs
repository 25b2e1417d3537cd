// demos/demo.rs
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vasicek_mc::analytics::vasicek_analytic;
use vasicek_mc::math_utils::Timer;
use vasicek_mc::mc::control_variate::ControlVariate;
use vasicek_mc::mc::mc_engine::{analytical_estimate, mc_price_zero_coupon_bond, PriceEstimate, SimulationConfig};
use vasicek_mc::models::vasicek::VasicekParams;
use vasicek_mc::request::{price_request, PricingRequest};
use vasicek_mc::rng::RandomSource;

fn print_estimate(label: &str, estimate: &PriceEstimate, time_ms: f64) {
    println!(
        "{:<28} {:.8}  ± {:.2e}  (error {:+.2e}, {} paths, {:.1} ms)",
        label,
        estimate.price,
        estimate.standard_error,
        estimate.price - estimate.diagnostics.analytical_price,
        estimate.effective_simulation_count,
        time_ms
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Running vasicek-mc Zero-Coupon Bond Demo\n");

    let params = VasicekParams::new(0.5, 0.03, 0.01, 0.02, 5.0).expect("Valid parameters");
    println!(
        "kappa = {}, theta = {}, sigma = {}, r0 = {}, T = {}y",
        params.kappa(),
        params.theta(),
        params.sigma(),
        params.r0(),
        params.maturity()
    );

    let analytic = analytical_estimate(&params);
    println!("\n--- Closed Form ---");
    println!("B(T) = {:.8}", vasicek_analytic::b_function(params.kappa(), params.maturity()).expect("kappa > 0"));
    println!("P(0,T) = {:.8}", analytic.price);

    println!("\n--- Simulation (dt = 0.01) ---");
    let runs = [
        ("Monte Carlo", RandomSource::PseudoRandom, ControlVariate::None),
        ("Monte Carlo + CV (beta = 1)", RandomSource::PseudoRandom, ControlVariate::Fixed),
        ("Monte Carlo + CV (optimal)", RandomSource::PseudoRandom, ControlVariate::Optimal),
        ("Sobol QMC", RandomSource::Sobol, ControlVariate::None),
        ("Sobol QMC + CV", RandomSource::Sobol, ControlVariate::Optimal),
    ];

    let mut timer = Timer::new();
    for (label, source, control_variate) in runs {
        let cfg = SimulationConfig {
            paths: 10_000,
            source,
            control_variate,
            ..Default::default()
        };
        timer.start();
        let estimate = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");
        print_estimate(label, &estimate, timer.elapsed_ms());
        if let Some(beta) = estimate.diagnostics.beta {
            println!("{:<28} beta = {:.4}", "", beta);
        }
    }

    println!("\n--- Simulation Governor ---");
    let cfg = SimulationConfig {
        paths: 200_000,
        ..Default::default()
    };
    timer.start();
    let clamped = mc_price_zero_coupon_bond(&params, &cfg).expect("Valid configuration");
    print_estimate("Requested 200000", &clamped, timer.elapsed_ms());

    println!("\n--- JSON Request ---");
    let json = r#"{
        "data": {
            "Initial Interest Rate": 0.02,
            "Volatility": 0.01,
            "Maturity Time": 60
        },
        "solver_params": { "NumberOfSimulations": 10000 }
    }"#;
    let request: PricingRequest = serde_json::from_str(json).expect("Valid request");
    let response = price_request(&request).expect("Priced request");
    println!(
        "{}",
        serde_json::to_string_pretty(&response).expect("Serializable response")
    );
}
