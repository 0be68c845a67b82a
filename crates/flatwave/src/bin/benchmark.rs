//! Step-throughput benchmark over a range of grid sizes.
//!
//! Run with: cargo run -p flatwave --bin benchmark --release

use std::time::Instant;

use flatwave::{SimulationConfig, Simulation, SourceKind, SourceSpec};

fn main() {
    println!("flatwave step throughput");
    println!();
    println!(
        "{:<12} {:>10} {:>12} {:>14} {:>12}",
        "Domain", "Cells", "Build (ms)", "100 steps (ms)", "Msteps/s"
    );
    println!("{}", "-".repeat(64));

    for &size in &[32usize, 64, 128, 256, 512, 1024] {
        let config = SimulationConfig {
            domain_w: size,
            domain_h: size,
            duration_ms: 1000.0,
            source: SourceSpec {
                kind: SourceKind::Gaussian { frequency_hz: 1000.0 },
                amplitude: 1.0,
            },
            ..Default::default()
        };

        let build_start = Instant::now();
        let mut sim = match Simulation::from_config(&config) {
            Ok(sim) => sim,
            Err(err) => {
                println!("{size}x{size}: {err}");
                continue;
            }
        };
        let build_ms = build_start.elapsed().as_secs_f64() * 1e3;

        let step_start = Instant::now();
        for _ in 0..100 {
            if sim.advance().is_err() {
                break;
            }
        }
        let step_ms = step_start.elapsed().as_secs_f64() * 1e3;

        let cells = sim.grid().rows() * sim.grid().cols();
        let msteps = (cells as f64 * 100.0) / (step_ms * 1e-3) / 1e6;
        println!(
            "{:<12} {:>10} {:>12.2} {:>14.2} {:>12.1}",
            format!("{size}x{size}"),
            cells,
            build_ms,
            step_ms,
            msteps
        );
    }
}
