//! flatwave - aerophone and vocal-tract synthesis from the command line.
//!
//! Runs a simulation from a JSON configuration file (or the default
//! open-air scene when none is given) and prints listener statistics plus
//! the strongest resonances of the recorded signal.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p flatwave --bin flatwave -- [config.json]
//! ```

use anyhow::{Context, Result};

use flatwave::{Simulation, SimulationConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flatwave=info".parse().unwrap()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config from {path}"))?;
            serde_json::from_str::<SimulationConfig>(&text)
                .with_context(|| format!("parsing config from {path}"))?
        }
        None => SimulationConfig::default(),
    };

    tracing::info!(scene = ?config.scene, "starting flatwave");

    let mut sim = Simulation::from_config(&config)?;
    sim.run()?;

    let samples = sim.samples();
    let sample_rate = sim.params().sample_rate as f32;
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    let rms = (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt();

    println!("steps:        {}", sim.completed_steps());
    println!("sample rate:  {} Hz", sim.params().sample_rate);
    println!("cell size:    {:.3} mm", sim.params().dx * 1e3);
    println!("peak |p|:     {peak:.6}");
    println!("rms p:        {rms:.6}");
    if let Some(error) = sim.report().length_error {
        println!("tract length error: {:.2}%", error * 100.0);
    }

    let resonances = flatwave_analysis::find_resonances(samples, sample_rate, 50.0, 5000.0);
    if !resonances.is_empty() {
        println!("resonances:");
        for peak in resonances.iter().take(5) {
            println!(
                "  {:7.1} Hz  (Q ~ {:5.1}, rel. magnitude {:.2})",
                peak.frequency, peak.q_factor, peak.magnitude
            );
        }
    }

    Ok(())
}
