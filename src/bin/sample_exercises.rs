//! Exercise sampling binary.
//!
//! Generates a batch of exercise instances in parallel and reports how often
//! the requested structure was forced and how often it is actually present.
//!
//! Usage: `sample_exercises <kind|all> [count] [config.json] [--save out.json]`

use std::fs::File;
use std::io::Write;
use std::process;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use game_theory_core::synth::{generate_batch, Exercise, ExerciseKind, SynthConfig, SynthStats};

const DEFAULT_COUNT: usize = 1000;

#[derive(Serialize)]
struct KindReport {
    kind: ExerciseKind,
    stats: SynthStats,
    with_structure: usize,
    elapsed_secs: f64,
}

#[derive(Serialize)]
struct SampleOutput<'a> {
    config: &'a SynthConfig,
    reports: &'a [KindReport],
    exercises: &'a [Exercise],
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let save_path = args
        .iter()
        .position(|a| a == "--save")
        .and_then(|i| args.get(i + 1).cloned());
    let positional: Vec<&String> = args
        .iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with("--") && (*i == 0 || args[i - 1] != "--save"))
        .map(|(_, a)| a)
        .collect();

    let kinds = match positional.first().map(|s| s.as_str()) {
        None | Some("all") => ExerciseKind::ALL.to_vec(),
        Some(name) => match name.parse::<ExerciseKind>() {
            Ok(kind) => vec![kind],
            Err(e) => {
                eprintln!("{}", e);
                process::exit(2);
            }
        },
    };
    let count = positional
        .get(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_COUNT);
    let config = load_config(positional.get(2).map(|s| s.as_str()));

    println!("=== Exercise Sampler ===");
    println!("Kinds: {}, instances per kind: {}", kinds.len(), count);
    match config.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: entropy"),
    }
    println!();

    let mut reports = Vec::new();
    let mut saved = Vec::new();
    let total_start = Instant::now();

    for kind in kinds {
        let start = Instant::now();
        let bar = ProgressBar::new(count as u64);
        bar.set_style(
            ProgressStyle::with_template("{prefix:>24} [{bar:40}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(kind.name());

        let (exercises, stats) = match generate_batch(&config, kind, count, Some(|_: usize| bar.inc(1))) {
            Ok(batch) => batch,
            Err(e) => {
                bar.abandon();
                eprintln!("Invalid configuration: {}", e);
                process::exit(1);
            }
        };
        bar.finish();

        let with_structure = exercises.iter().filter(|e| e.exhibits_structure()).count();
        let report = KindReport {
            kind,
            stats,
            with_structure,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        println!(
            "{:>24}: forced {:5.1}%, structure present {:5.1}%, {} cells repaired, {:.2}s",
            kind.name(),
            report.stats.forced_rate() * 100.0,
            percentage(with_structure, exercises.len()),
            report.stats.repaired_cells,
            report.elapsed_secs
        );
        reports.push(report);
        if save_path.is_some() {
            saved.extend(exercises);
        }
    }

    println!("\n=== Summary ===");
    println!("Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    let generated: u64 = reports.iter().map(|r| r.stats.generated).sum();
    println!("Instances generated: {}", generated);

    if let Some(path) = save_path {
        let output = SampleOutput {
            config: &config,
            reports: &reports,
            exercises: &saved,
        };
        match export(&output, &path) {
            Ok(()) => println!("Saved {} exercises to {}", saved.len(), path),
            Err(e) => eprintln!("Failed to save {}: {}", path, e),
        }
    }
}

fn load_config(path: Option<&str>) -> SynthConfig {
    let Some(path) = path else {
        return SynthConfig::default();
    };
    match SynthConfig::from_json_file(path) {
        Ok(config) => {
            println!("Loaded config from: {}", path);
            config
        }
        Err(e) => {
            println!("Could not load {}: {}", path, e);
            println!("Using default settings");
            SynthConfig::default()
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn export(output: &SampleOutput<'_>, path: &str) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(output)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
