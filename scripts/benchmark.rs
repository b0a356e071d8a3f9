// scripts/benchmark.rs
use mc_sde::math_utils::Timer;
use mc_sde::mc::payoffs::{black_scholes_percentage_error, price_payoff, Payoff};
use mc_sde::mc::{SdeSimulationEngine, SimulationConfig};
use mc_sde::models::Gbm;
use mc_sde::solvers::SchemeKind;
use mc_sde::stats::experiments::pi_experiment;
use mc_sde::{NormalSampling, SdeResult};
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rayon_threads: usize,
    rustc_flags: String,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    value: f64,
    error_pct: Option<f64>,
}

fn run_scheme_benchmarks() -> SdeResult<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    for &paths in &[10_000usize, 100_000] {
        for &scheme in SchemeKind::ALL.iter() {
            let config = SimulationConfig {
                paths,
                steps: 100,
                seed: 42,
                scheme,
                ..Default::default()
            };
            let driver = config.brownian_driver()?;

            // time Brownian generation apart from path assembly
            let timer = Timer::new();
            let _ = driver.increments();
            let brownian_ms = timer.elapsed_ms();

            let engine = SdeSimulationEngine::new(
                driver,
                scheme.build(Gbm::new(config.mu, config.sigma)?),
                config.s0,
            )?;

            let timer = Timer::new();
            let _ = engine.paths();
            let time_ms = timer.elapsed_ms();

            let (price, _) = price_payoff(&engine, Payoff::EuropeanCall { k: 100.0 }, 0.0)?;
            let error_pct = black_scholes_percentage_error(&engine, 100.0, 0.0)?;
            info!(?scheme, paths, brownian_ms, time_ms, "scheme benchmark done");

            results.push(BenchmarkResult {
                name: format!("{:?} call ({}k paths)", scheme, paths / 1000),
                paths,
                time_ms,
                throughput_paths_per_sec: paths as f64 / (time_ms / 1000.0),
                value: price,
                error_pct: Some(error_pct),
            });
        }
    }

    Ok(results)
}

fn run_sampling_benchmarks() -> SdeResult<Vec<BenchmarkResult>> {
    let mut results = Vec::new();
    let paths = 20_000;

    for &sampling in &[
        NormalSampling::Inversion,
        NormalSampling::AcceptanceRejection,
        NormalSampling::BoxMuller,
        NormalSampling::MarsagliaPolar,
        NormalSampling::Ziggurat,
    ] {
        let config = SimulationConfig {
            paths,
            steps: 250,
            seed: 42,
            normal_sampling: sampling,
            ..Default::default()
        };
        let driver = config.brownian_driver()?;

        let timer = Timer::new();
        let increments = driver.increments();
        let time_ms = timer.elapsed_ms();

        results.push(BenchmarkResult {
            name: format!("Brownian {:?}", sampling),
            paths,
            time_ms,
            throughput_paths_per_sec: paths as f64 / (time_ms / 1000.0),
            value: increments.iter().map(|dw| dw * dw).sum::<f64>() / paths as f64,
            error_pct: None,
        });
    }

    let trials = 1_000;
    let pi = pi_experiment(trials, 100_000, 42)?;
    let timer = Timer::new();
    let _ = pi.results();
    let time_ms = timer.elapsed_ms();
    results.push(BenchmarkResult {
        name: "Pi experiment".to_string(),
        paths: trials,
        time_ms,
        throughput_paths_per_sec: trials as f64 / (time_ms / 1000.0),
        value: pi.average(),
        error_pct: Some((pi.average() - std::f64::consts::PI).abs() / std::f64::consts::PI * 100.0),
    });

    Ok(results)
}

fn main() -> SdeResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("mc-sde Benchmark Suite");
    println!("======================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!(
        "  Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    let mut all_results = run_scheme_benchmarks()?;
    all_results.extend(run_sampling_benchmarks()?);

    println!("\n{:=<80}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<80}", "");
    println!(
        "{:<32} {:>8} {:>12} {:>15} {:>10} {:>10}",
        "Benchmark", "Paths", "Time (ms)", "Throughput", "Value", "Error"
    );
    println!("{:-<80}", "");

    for result in &all_results {
        println!(
            "{:<32} {:>8} {:>12.2} {:>15.0} {:>10.4} {:>10}",
            result.name,
            result.paths,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.value,
            result
                .error_pct
                .map(|e| format!("{:.3}%", e))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }

    println!("{:=<80}", "");
    Ok(())
}
