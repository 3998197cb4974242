//! Example: Remove coherent noise from a synthetic detector event
//!
//! Builds a zero-mean event where every block of channels shares one noise
//! waveform, adds a few signal pulses, and runs both the per-channel and the
//! neighbourhood pipelines over it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example synthetic_event
//! RUST_LOG=denoise=debug cargo run --example synthetic_event
//! ```

use std::time::Instant;

use denoise::{math, Config, DenoiseOutput, Denoiser, Grid, MorphOperator};
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

const CHANNELS: usize = 256;
const TICKS: usize = 2048;
const GROUPING: usize = 32;

fn main() {
    init_tracing();

    let event = synthetic_event(CHANNELS, TICKS, 2024);
    tracing::info!(
        channels = CHANNELS,
        ticks = TICKS,
        rms = math::rms(event.samples()),
        "Synthetic event"
    );

    let configs = [
        (
            "per-channel",
            Config::per_channel(7)
                .with_operator(MorphOperator::Average)
                .with_grouping(GROUPING),
        ),
        (
            "neighborhood",
            Config::neighborhood(3, 7)
                .with_operator(MorphOperator::Average)
                .with_grouping(GROUPING),
        ),
    ];

    for (name, config) in configs {
        let operator = config.resolved_operator();
        let start = Instant::now();
        let output = match Denoiser::new(config).run(&event) {
            Ok(output) => output,
            Err(err) => {
                tracing::error!(pipeline = name, %err, "Denoising failed");
                continue;
            }
        };
        let elapsed = start.elapsed();
        report(name, operator, &output, elapsed.as_secs_f64() * 1000.0);
    }
}

fn report(name: &str, operator: MorphOperator, output: &DenoiseOutput<f32>, elapsed_ms: f64) {
    let unprotected: Vec<f32> = (0..output.denoised.channels())
        .flat_map(|channel| {
            let protected = output.select_vals.row(channel);
            output
                .denoised
                .row(channel)
                .iter()
                .zip(protected.iter())
                .filter_map(|(&value, protected)| (!protected).then_some(value))
                .collect::<Vec<_>>()
        })
        .collect();

    tracing::info!(
        pipeline = name,
        %operator,
        groups = output.num_groups(),
        protected = output.protected_count(),
        roi = output.roi.count_ones(),
        residual_rms = math::rms(&unprotected),
        mean_intrinsic_rms = mean(output.intrinsic_rms.samples()),
        elapsed_ms,
        "Coherent noise removed"
    );
}

fn mean(values: &[f32]) -> f64 {
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len().max(1) as f64
}

/// Coherent noise per channel group, small per-channel noise and a handful
/// of short pulses.
fn synthetic_event(channels: usize, ticks: usize, seed: u64) -> Grid<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let groups = channels.div_ceil(GROUPING);
    let coherent: Vec<f32> = (0..groups * ticks)
        .map(|_| rng.random_range(-15.0..15.0))
        .collect();

    let mut grid = Grid::new_default(channels, ticks);
    for channel in 0..channels {
        let common = &coherent[(channel / GROUPING) * ticks..][..ticks];
        for (value, &noise) in grid.row_mut(channel).iter_mut().zip(common) {
            *value = noise + rng.random_range(-2.0..2.0);
        }
    }

    for _ in 0..16 {
        let channel = rng.random_range(0..channels);
        let start = rng.random_range(0..ticks - 40);
        let height = rng.random_range(80.0..300.0);
        for value in &mut grid.row_mut(channel)[start..start + 30] {
            *value += height;
        }
    }
    grid
}

/// Initialize tracing subscriber with console output.
fn init_tracing() {
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
