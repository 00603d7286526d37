//! Pettrack Evaluation
//!
//! Replays recorded sensor reports and reports how often the
//! strongest-signal pick and the HMM-smoothed room match where the pets
//! really were.
//!
//! Run with:
//! `cargo run --bin pettrack-eval -- rssi0.txt=0,3 rssi1.txt=1,2`
//!
//! Each trial is `PATH=ROOM0,ROOM1`, the true rooms of pet 0 and pet 1.
//! Trials are replayed in order through one analyzer.

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use pettrack::config::Config;
use pettrack::tracker::{evaluate, read_recording, Analyzer, RoomCode, Trial};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pettrack-eval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate room detection accuracy on recorded RSSI data")]
struct Cli {
    /// Trials as PATH=ROOM0,ROOM1
    #[arg(required = true)]
    trials: Vec<String>,

    /// Config file holding the pet tag addresses (defaults otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    format: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pettrack=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut analyzer = Analyzer::new(config.tracker.tags()?);

    let trials = cli
        .trials
        .iter()
        .map(|spec| load_trial(spec))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = evaluate(&mut analyzer, &trials);

    match cli.format.as_str() {
        "json" => {
            let json = serde_json::json!({
                "results": report.results,
                "mean_strongest": report.mean_strongest(),
                "mean_smoothed": report.mean_smoothed(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        "table" => {
            println!(
                "{:<24} {:>4} {:<14} {:>6} {:>10} {:>10}",
                "TRIAL", "PET", "TRUTH", "STEPS", "STRONGEST", "HMM"
            );
            for r in &report.results {
                println!(
                    "{:<24} {:>4} {:<14} {:>6} {:>9.1}% {:>9.1}%",
                    r.trial,
                    r.pet,
                    r.truth.display_name(),
                    r.steps,
                    r.strongest * 100.0,
                    r.smoothed * 100.0
                );
            }
            println!(
                "\nMean accuracy: strongest {:.1}%, HMM {:.1}%",
                report.mean_strongest() * 100.0,
                report.mean_smoothed() * 100.0
            );
        }
        other => bail!("unknown output format `{}`", other),
    }

    Ok(())
}

/// Parse `PATH=ROOM0,ROOM1` and read the recording
fn load_trial(spec: &str) -> anyhow::Result<Trial> {
    let (path, truth) = spec
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("trial `{}` must be PATH=ROOM0,ROOM1", spec))?;

    let rooms = truth
        .split(',')
        .map(|s| -> anyhow::Result<RoomCode> {
            let code: i32 = s
                .trim()
                .parse()
                .with_context(|| format!("invalid room `{}` in trial `{}`", s, spec))?;
            Ok(RoomCode::try_from(code)?)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let truth: [RoomCode; 2] = rooms
        .try_into()
        .map_err(|_| anyhow!("trial `{}` needs exactly two rooms", spec))?;

    let sets = read_recording(Path::new(path))
        .with_context(|| format!("reading recording {}", path))?;

    Ok(Trial {
        name: path.to_string(),
        sets,
        truth,
    })
}
