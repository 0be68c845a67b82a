//! Synthesize a vowel and print its formants.
//!
//! Builds the /a/ tract from its area function, drives it with a
//! broadband impulse, and reports the resonance peaks of the pressure
//! recorded at the lips.
//!
//! Run with: cargo run -p flatwave --example vowel_synthesis --release

use flatwave::{SceneKind, Simulation, SimulationConfig, SourceKind, SourceSpec, Vowel};

fn main() -> Result<(), flatwave::FlatwaveError> {
    let config = SimulationConfig {
        scene: SceneKind::Vowel,
        vowel: Some(Vowel::A),
        srate_multiplier: 4,
        duration_ms: 300.0,
        source: SourceSpec {
            kind: SourceKind::Impulse {
                min_hz: 50.0,
                max_hz: 8000.0,
            },
            amplitude: 1.0,
        },
        ..Default::default()
    };

    let mut sim = Simulation::from_config(&config)?;
    println!(
        "tract: {} cells long, length error {:.2}%",
        sim.report().tube_cells.unwrap_or(0),
        sim.report().length_error.unwrap_or(0.0) * 100.0
    );

    sim.run()?;

    let sample_rate = sim.params().sample_rate as f32;
    let formants = flatwave_analysis::find_resonances(sim.samples(), sample_rate, 100.0, 4000.0);
    println!("formants of /a/:");
    for peak in formants.iter().take(4) {
        println!("  {:7.1} Hz  (rel. magnitude {:.2})", peak.frequency, peak.magnitude);
    }

    Ok(())
}
