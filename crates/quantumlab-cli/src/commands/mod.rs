pub mod bell;
pub mod glass;
pub mod mach_zehnder;
pub mod malus;
pub mod penney;
pub mod stern_gerlach;

use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

use clap::Args;
use quantumlab_core::session::{SessionConfig, SessionWriter};
use quantumlab_core::SeededRandom;
use quantumlab_tests::TestResult;
use serde::Serialize;
use serde_json::{Value, json};

/// Flags shared by every experiment.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of trials
    #[arg(long, default_value = "10000")]
    pub trials: u64,

    /// PRNG seed (default: fresh seed from the OS, printed so the run can be replayed)
    #[arg(long, conflicts_with = "seed_label")]
    pub seed: Option<u64>,

    /// Derive the PRNG seed from a label instead of a number
    #[arg(long)]
    pub seed_label: Option<String>,

    /// Write a JSON report to this path
    #[arg(long)]
    pub output: Option<String>,

    /// Record every trial into a session directory under this path
    #[arg(long)]
    pub record: Option<String>,

    /// Session metadata tags as key:value pairs
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Session note
    #[arg(long)]
    pub note: Option<String>,
}

/// Build the run's random source. Returns the numeric seed when there is one.
pub fn make_rng(run: &RunArgs) -> (SeededRandom, Option<u64>) {
    if let Some(label) = &run.seed_label {
        println!("  Seed:      label \"{label}\"");
        return (SeededRandom::from_label(label.as_bytes()), None);
    }
    if let Some(seed) = run.seed {
        println!("  Seed:      {seed}");
        return (SeededRandom::from_seed(seed), Some(seed));
    }
    match SeededRandom::from_os_entropy() {
        Ok((rng, seed)) => {
            println!("  Seed:      {seed} (from OS entropy)");
            (rng, Some(seed))
        }
        Err(e) => {
            eprintln!("Error reading OS entropy: {e}");
            std::process::exit(1);
        }
    }
}

/// Parse `key:value` tags, warning about malformed ones.
pub fn parse_tags(tags: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for tag in tags {
        if let Some((k, v)) = tag.split_once(':') {
            map.insert(k.to_string(), v.to_string());
        } else {
            eprintln!("Warning: ignoring malformed tag '{tag}' (expected key:value)");
        }
    }
    map
}

/// Optional session recording. A write error stops recording but not the run.
pub struct Recorder {
    writer: Option<SessionWriter>,
}

impl Recorder {
    pub fn start(run: &RunArgs, experiment: &str, seed: Option<u64>) -> Self {
        let Some(dir) = &run.record else {
            return Self { writer: None };
        };
        let mut tags = parse_tags(&run.tags);
        if let Some(label) = &run.seed_label {
            tags.insert("seed_label".to_string(), label.clone());
        }
        let config = SessionConfig {
            experiment: experiment.to_string(),
            seed,
            output_dir: PathBuf::from(dir),
            tags,
            note: run.note.clone(),
        };
        match SessionWriter::new(config) {
            Ok(w) => {
                println!("  Recording: {}", w.session_dir().display());
                Self { writer: Some(w) }
            }
            Err(e) => {
                eprintln!("Error creating session: {e}");
                std::process::exit(1);
            }
        }
    }

    pub fn record(&mut self, setting: &str, outcome: &impl Display) {
        let Some(w) = self.writer.as_mut() else {
            return;
        };
        if let Err(e) = w.write_trial(setting, outcome) {
            eprintln!("\nError writing trial: {e}");
            self.writer = None;
        }
    }

    pub fn finish(self) {
        if let Some(w) = self.writer {
            match w.finish() {
                Ok(dir) => println!("\nSession saved to: {}", dir.display()),
                Err(e) => eprintln!("\nError finishing session: {e}"),
            }
        }
    }
}

/// Write a JSON report if `--output` was given.
pub fn write_report(path: Option<&str>, report: &impl Serialize) {
    let Some(path) = path else {
        return;
    };
    let text = match serde_json::to_string_pretty(report) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to serialize report: {e}");
            return;
        }
    };
    match std::fs::write(path, text) {
        Ok(()) => println!("\nReport written to {path}"),
        Err(e) => eprintln!("\nFailed to write {path}: {e}"),
    }
}

/// One theory-vs-observed line.
pub fn print_frequency(label: &str, theory: f64, count: u64, total: u64) {
    let observed = if total == 0 {
        "n/a".to_string()
    } else {
        format!("{:.4}", count as f64 / total as f64)
    };
    println!("  {label:<24} {theory:>8.4} {observed:>10} {count:>10}");
}

pub fn print_frequency_header() {
    println!("  {:<24} {:>8} {:>10} {:>10}", "Outcome", "Theory", "Observed", "Count");
    println!("  {}", "-".repeat(55));
}

/// Print the verification battery and return its JSON form.
pub fn print_battery(results: &[TestResult]) -> Value {
    println!("\n  Verification");
    for r in results {
        let mark = if r.passed { "✓" } else { "✗" };
        let p = r
            .p_value
            .map_or_else(|| "—".to_string(), |p| format!("p={p:.4}"));
        println!("    {mark} {:<34} {:>10}  {}  {}", r.name, p, r.grade, r.details);
    }
    let score = quantumlab_tests::calculate_quality_score(results);
    println!("    Score: {score:.0}/100");

    json!({
        "score": score,
        "tests": results.iter().map(|r| json!({
            "name": r.name,
            "passed": r.passed,
            "p_value": r.p_value,
            "statistic": r.statistic,
            "details": r.details,
            "grade": r.grade.to_string(),
        })).collect::<Vec<_>>(),
    })
}

/// Degrees list for display, e.g. `0°/45°/90°`.
pub fn format_degrees(angles: &[f64]) -> String {
    angles
        .iter()
        .map(|a| format!("{a}°"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Seeded short run writing its report to `output`.
#[cfg(test)]
pub fn seeded_args(trials: u64, output: &std::path::Path) -> RunArgs {
    RunArgs {
        trials,
        seed: Some(1),
        seed_label: None,
        output: Some(output.to_string_lossy().into_owned()),
        record: None,
        tags: Vec::new(),
        note: None,
    }
}

#[cfg(test)]
pub fn read_report(path: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}
