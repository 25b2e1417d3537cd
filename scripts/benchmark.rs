// scripts/benchmark.rs
use std::env;
use vasicek_mc::math_utils::Timer;
use vasicek_mc::mc::control_variate::ControlVariate;
use vasicek_mc::mc::mc_engine::{mc_price_zero_coupon_bond, PriceEstimate, SimulationConfig};
use vasicek_mc::models::vasicek::VasicekParams;
use vasicek_mc::output;
use vasicek_mc::rng::RandomSource;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: &'static str,
    time_ms: f64,
    estimate: PriceEstimate,
}

impl BenchmarkResult {
    fn throughput(&self) -> f64 {
        self.estimate.effective_simulation_count as f64 / (self.time_ms / 1000.0)
    }

    fn abs_error(&self) -> f64 {
        (self.estimate.price - self.estimate.diagnostics.analytical_price).abs()
    }
}

const VARIANTS: [(&str, RandomSource, ControlVariate); 4] = [
    ("MC", RandomSource::PseudoRandom, ControlVariate::None),
    ("MC + CV (beta = 1)", RandomSource::PseudoRandom, ControlVariate::Fixed),
    ("MC + CV (optimal beta)", RandomSource::PseudoRandom, ControlVariate::Optimal),
    ("QMC Sobol + CV", RandomSource::Sobol, ControlVariate::Optimal),
];

fn run_convergence_study(params: &VasicekParams) -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    for &paths in &[1_024, 4_096, 16_384, 65_536] {
        println!("Running benchmarks with {} paths...", paths);

        for &(name, source, control_variate) in &VARIANTS {
            let cfg = SimulationConfig {
                paths,
                source,
                control_variate,
                seed: 42,
                ..Default::default()
            };

            let mut timer = Timer::new();
            timer.start();
            let estimate = mc_price_zero_coupon_bond(params, &cfg).expect("Valid configuration");
            let time_ms = timer.elapsed_ms();

            results.push(BenchmarkResult {
                name,
                time_ms,
                estimate,
            });
        }
    }

    results
}

fn main() {
    println!("vasicek-mc Convergence Benchmark");
    println!("================================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    // κ = 0.5, θ = 3%, σ = 1%, r0 = 2%, T = 5y, Δt = 0.01
    let params = VasicekParams::new(0.5, 0.03, 0.01, 0.02, 5.0).expect("Valid parameters");
    let results = run_convergence_study(&params);

    println!("\n{:=<100}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<100}", "");
    println!(
        "{:<24} {:>8} {:>12} {:>15} {:>12} {:>12} {:>12}",
        "Estimator", "Paths", "Time (ms)", "Throughput", "Price", "Std Error", "Abs Error"
    );
    println!("{:-<100}", "");

    for result in &results {
        println!(
            "{:<24} {:>8} {:>12.2} {:>15.0} {:>12.8} {:>12.2e} {:>12.2e}",
            result.name,
            result.estimate.effective_simulation_count,
            result.time_ms,
            result.throughput(),
            result.estimate.price,
            result.estimate.standard_error,
            result.abs_error(),
        );
    }
    println!("{:=<100}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    let estimates: Vec<PriceEstimate> = results.iter().map(|r| r.estimate).collect();
    output::write_estimates_to_csv(&filename, &estimates).expect("Could not write CSV file");

    let date = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let cores = system_info.cpu_cores.to_string();
    let threads = system_info.rayon_threads.to_string();
    let summary_filename = format!("benchmark_summary_{}.csv", timestamp);
    output::write_summary_to_csv(
        &summary_filename,
        &[
            ("os", system_info.os.as_str()),
            ("cpu_cores", cores.as_str()),
            ("rayon_threads", threads.as_str()),
            ("rustflags", system_info.rustc_flags.as_str()),
            ("benchmark_date", date.as_str()),
        ],
    )
    .expect("Could not write summary file");

    println!("\nBenchmark complete!");
    println!("Results saved to: {} and {}", filename, summary_filename);
    println!("\nTo reproduce these results: cargo run --bin benchmark --release");
}
