//! Ground track demo
//!
//! Propagates one state vector and prints the resulting ground-track report
//! as JSON (or a short summary).
//!
//! Usage:
//!   cargo run --example ground_track_demo -- --epoch 2024-06-01T00:00:00Z \
//!       --position 6778 0 0 --velocity 0 4.77 6.01 --periods 3 --direction centered
//!
//! Set `RUST_LOG=debug` to see integrator statistics.

use std::fs;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use nalgebra::Vector3;
use skytrack::groundtrack::recommended_sample_count;
use skytrack::{
    JulianDate, PropagationDirection, PropagationSettings, PropagationWindow, Propagator,
    StateVector,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Direction {
    Forward,
    Backward,
    Centered,
    /// From the epoch to the observation time
    Between,
}

/// Satellite ground track demo
#[derive(Parser, Debug)]
#[command(author, version, about = "Propagates a state vector and prints its ground track", long_about = None)]
struct Args {
    /// Epoch of the state vector (RFC 3339, UTC)
    #[arg(long, default_value = "2024-06-01T00:00:00Z")]
    epoch: String,

    /// Observation time as days after the epoch (may be negative)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    observation_days: f64,

    /// ECI position in km
    #[arg(long, num_args = 3, allow_hyphen_values = true, default_values_t = [6778.0, 0.0, 0.0])]
    position: Vec<f64>,

    /// ECI velocity in km/s
    #[arg(long, num_args = 3, allow_hyphen_values = true, default_values_t = [0.0, 4.766, 6.010])]
    velocity: Vec<f64>,

    /// Number of orbital periods to cover
    #[arg(long, default_value_t = 1.0)]
    periods: f64,

    /// Which part of the timeline to cover
    #[arg(long, value_enum, default_value_t = Direction::Forward)]
    direction: Direction,

    /// Number of samples (defaults to the altitude-based recommendation)
    #[arg(long)]
    samples: Option<usize>,

    /// JSON file with propagation settings
    #[arg(long)]
    settings: Option<String>,

    /// Disable the J2 term
    #[arg(long, action = ArgAction::SetTrue)]
    two_body: bool,

    /// Print a summary instead of the full JSON report
    #[arg(short, long, action = ArgAction::SetTrue)]
    summary: bool,
}

fn vector(values: &[f64], what: &str) -> Result<Vector3<f64>> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("{} needs exactly three components", what).into()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => PropagationSettings::from_json_str(&fs::read_to_string(path)?)?,
        None => PropagationSettings::default(),
    };
    if args.two_body {
        settings.j2_enabled = false;
    }
    let propagator = Propagator::new(settings)?;

    let epoch_dt: DateTime<Utc> = DateTime::parse_from_rfc3339(&args.epoch)?.with_timezone(&Utc);
    let epoch = JulianDate::from(epoch_dt);
    let observation = epoch + args.observation_days;
    let state = StateVector::new(
        vector(&args.position, "position")?,
        vector(&args.velocity, "velocity")?,
    );

    let period = state.period()?;
    let window = match args.direction {
        Direction::Forward => PropagationWindow::from_periods(
            epoch,
            observation,
            period,
            args.periods,
            PropagationDirection::Forward,
        )?,
        Direction::Backward => PropagationWindow::from_periods(
            epoch,
            observation,
            period,
            args.periods,
            PropagationDirection::Backward,
        )?,
        Direction::Centered => PropagationWindow::from_periods(
            epoch,
            observation,
            period,
            args.periods,
            PropagationDirection::Centered,
        )?,
        Direction::Between => PropagationWindow::between(epoch, observation)?,
    };

    let days = window.length_s() / 86_400.0;
    let samples = args
        .samples
        .unwrap_or_else(|| recommended_sample_count(state.mean_altitude(), days));
    info!(
        "altitude {:.1} km, period {:.1} min, {} samples over {:.3} days",
        state.mean_altitude(),
        period / 60.0,
        samples,
        days
    );

    let report = propagator.ground_track(&state, epoch, &window, samples)?;

    if args.summary {
        println!("Window: {} .. {}", window.start(), window.end());
        println!(
            "Reference point: lat {:.4}, lon {:.4}",
            report.reference_point.latitude_deg, report.reference_point.longitude_deg
        );
        println!("Samples: {}", report.sample_count);
        println!("Segments: {}", report.track.segments().len());
        for (i, segment) in report.track.segments().iter().enumerate() {
            println!(
                "  segment {:>3}: points {}..{}",
                i,
                segment.start_index,
                segment.end_index()
            );
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
