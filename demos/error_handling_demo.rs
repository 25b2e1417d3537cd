// demos/error_handling_demo.rs
use vasicek_mc::analytics::vasicek_analytic;
use vasicek_mc::error::VasicekError;
use vasicek_mc::mc::mc_engine::{mc_price_zero_coupon_bond, SimulationConfig};
use vasicek_mc::mc::path::TimeStepping;
use vasicek_mc::models::vasicek::VasicekParams;
use vasicek_mc::request::PricingRequest;
use vasicek_mc::rng::RandomSource;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("Error Handling Demo for vasicek-mc");
    println!("==================================\n");

    // Test 1: Invalid model parameters
    println!("1. Testing invalid Vasicek parameters...");
    for (kappa, sigma, t) in [(-0.5, 0.01, 5.0), (0.5, -0.01, 5.0), (0.5, 0.01, 0.0), (0.5, f64::NAN, 5.0)] {
        match VasicekParams::new(kappa, 0.03, sigma, 0.02, t) {
            Ok(_) => println!("   Unexpected: Should have failed!"),
            Err(e) => println!("   ✓ Caught error: {}", e),
        }
    }

    // Test 2: Closed form outside its domain
    println!("\n2. Testing the closed form with kappa = 0...");
    match vasicek_analytic::try_zero_coupon_bond_price(0.0, 0.03, 0.01, 0.02, 5.0) {
        Ok(p) => println!("   Unexpected price: {}", p),
        Err(e @ VasicekError::DomainError { .. }) => println!("   ✓ Caught error: {}", e),
        Err(e) => println!("   Unexpected error kind: {}", e),
    }

    let params = VasicekParams::new(0.5, 0.03, 0.01, 0.02, 5.0).expect("Valid parameters");

    // Test 3: Invalid simulation configurations
    println!("\n3. Testing invalid simulation configurations...");
    let bad_configs = [
        ("zero paths", SimulationConfig { paths: 0, ..Default::default() }),
        (
            "zero steps",
            SimulationConfig {
                time_stepping: TimeStepping::Steps(0),
                ..Default::default()
            },
        ),
        (
            "negative step size",
            SimulationConfig {
                time_stepping: TimeStepping::StepSize(-0.01),
                ..Default::default()
            },
        ),
        (
            "Sobol grid wider than the direction table",
            SimulationConfig {
                paths: 10,
                source: RandomSource::Sobol,
                time_stepping: TimeStepping::Steps(50_000),
                ..Default::default()
            },
        ),
    ];
    for (label, cfg) in &bad_configs {
        match mc_price_zero_coupon_bond(&params, cfg) {
            Ok(_) => println!("   Unexpected: {} should have failed!", label),
            Err(e) => println!("   ✓ {}: {}", label, e),
        }
    }

    // Test 4: Conditions that are reported, not rejected
    println!("\n4. Testing clamped and degenerate runs (see warnings above/below)...");
    let over = SimulationConfig {
        paths: 1_000_000,
        time_stepping: TimeStepping::Steps(10),
        ..Default::default()
    };
    match mc_price_zero_coupon_bond(&params, &over) {
        Ok(est) => println!(
            "   ✓ Requested {} paths, simulated {} (clamped: {})",
            est.diagnostics.requested_count, est.effective_simulation_count, est.diagnostics.clamped
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    let flat = VasicekParams::new(0.5, 0.03, 0.0, 0.02, 5.0).expect("Valid parameters");
    match mc_price_zero_coupon_bond(&flat, &SimulationConfig { paths: 1_000, ..Default::default() }) {
        Ok(est) => println!(
            "   ✓ sigma = 0: price {:.8}, degenerate control: {}",
            est.price, est.diagnostics.degenerate_control
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    let coarse = SimulationConfig {
        paths: 1_000,
        time_stepping: TimeStepping::Steps(2),
        ..Default::default()
    };
    let fast = VasicekParams::new(1.5, 0.03, 0.01, 0.02, 5.0).expect("Valid parameters");
    match mc_price_zero_coupon_bond(&fast, &coarse) {
        Ok(est) => println!(
            "   ✓ kappa * dt = {:.2}: price {:.6} vs closed form {:.6}",
            fast.kappa() * 2.5,
            est.price,
            est.diagnostics.analytical_price
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 5: Malformed requests
    println!("\n5. Testing malformed JSON requests...");
    let missing_field = r#"{"data": {"Initial Interest Rate": 0.02, "Maturity Time": 12}}"#;
    match serde_json::from_str::<PricingRequest>(missing_field) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught parse error: {}", e),
    }

    let negative_vol = r#"{"data": {"Initial Interest Rate": 0.02, "Volatility": -0.1, "Maturity Time": 12}}"#;
    match serde_json::from_str::<PricingRequest>(negative_vol).map(|req| req.params()) {
        Ok(Err(e)) => println!("   ✓ Caught error: {}", e),
        Ok(Ok(_)) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   Unexpected parse error: {}", e),
    }

    println!("\nError handling demo completed!");
}
