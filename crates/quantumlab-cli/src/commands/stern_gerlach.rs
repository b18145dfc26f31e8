//! `quantumlab stern-gerlach` — filter with one analyzer, measure with the next.

use quantumlab_core::{
    Analyzer, Outcome, StatisticsAggregator, StochasticOutcomeSampler, oven_particle,
};
use serde_json::json;

use super::{Recorder, RunArgs};

pub struct SternGerlachCommandConfig<'a> {
    pub first_deg: f64,
    pub second_deg: f64,
    pub third_deg: Option<f64>,
    pub run: &'a RunArgs,
}

/// `cos²(Δ/2)` for two orientations in degrees.
fn up_after(from_deg: f64, to_deg: f64) -> f64 {
    ((to_deg - from_deg).to_radians() / 2.0).cos().powi(2)
}

fn fail(e: quantumlab_core::LabError) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

pub fn run(cfg: SternGerlachCommandConfig<'_>) {
    let first = Analyzer::new(cfg.first_deg.to_radians());
    let second = Analyzer::new(cfg.second_deg.to_radians());
    let third = cfg.third_deg.map(|d| Analyzer::new(d.to_radians()));

    let mut angles = vec![cfg.first_deg, cfg.second_deg];
    angles.extend(cfg.third_deg);
    let setting = super::format_degrees(&angles);

    println!("Stern-Gerlach chain");
    println!("  Analyzers: {setting} (first keeps only up)");
    println!("  Trials:    {}", cfg.run.trials);
    let (mut rng, seed) = super::make_rng(cfg.run);
    let mut recorder = Recorder::start(cfg.run, "stern-gerlach", seed);

    let sampler = StochasticOutcomeSampler::new();
    let mut filtered = StatisticsAggregator::new();
    let mut second_stats = StatisticsAggregator::new();
    let mut third_stats = StatisticsAggregator::new();
    let mut up_seq = Vec::new();

    for _ in 0..cfg.run.trials {
        let particle = oven_particle(&mut rng);
        let Some(mut state) = first.filter(particle, &sampler, &mut rng).unwrap_or_else(|e| fail(e))
        else {
            filtered.record(Outcome::Blocked);
            recorder.record(&setting, &"blocked");
            continue;
        };
        filtered.record(Outcome::Passed);

        let s2 = second.measure(&mut state, &sampler, &mut rng).unwrap_or_else(|e| fail(e));
        second_stats.record(s2);
        up_seq.push(s2 == Outcome::Up);

        match &third {
            Some(a3) => {
                let s3 = a3.measure(&mut state, &sampler, &mut rng).unwrap_or_else(|e| fail(e));
                third_stats.record((s2, s3));
                recorder.record(&setting, &format!("{s2}-{s3}"));
            }
            None => recorder.record(&setting, &s2),
        }
    }
    recorder.finish();

    let p_up2 = up_after(cfg.first_deg, cfg.second_deg);

    println!();
    super::print_frequency_header();
    super::print_frequency("passed first", 0.5, filtered.count(Outcome::Passed), filtered.total());
    super::print_frequency(
        "up at second",
        p_up2,
        second_stats.count(Outcome::Up),
        second_stats.total(),
    );
    super::print_frequency(
        "down at second",
        1.0 - p_up2,
        second_stats.count(Outcome::Down),
        second_stats.total(),
    );

    let mut third_report = serde_json::Value::Null;
    if let Some(d3) = cfg.third_deg {
        // Only the second result matters: the first one is forgotten.
        let p_up3 = up_after(cfg.second_deg, d3);
        let n = third_stats.total();
        let mut rows = Vec::new();
        for s2 in [Outcome::Up, Outcome::Down] {
            let p2 = if s2 == Outcome::Up { p_up2 } else { 1.0 - p_up2 };
            let p3_up = if s2 == Outcome::Up { p_up3 } else { 1.0 - p_up3 };
            for s3 in [Outcome::Up, Outcome::Down] {
                let p3 = if s3 == Outcome::Up { p3_up } else { 1.0 - p3_up };
                let label = format!("{s2} then {s3}");
                super::print_frequency(&label, p2 * p3, third_stats.count((s2, s3)), n);
                rows.push(json!({
                    "second": s2,
                    "third": s3,
                    "theory": p2 * p3,
                    "count": third_stats.count((s2, s3)),
                }));
            }
        }
        third_report = json!(rows);
    }

    let mut results = vec![quantumlab_tests::proportion_test(
        filtered.count(Outcome::Passed),
        filtered.total(),
        0.5,
    )];
    results.extend(quantumlab_tests::run_battery(&up_seq, p_up2));
    let battery = super::print_battery(&results);

    super::write_report(
        cfg.run.output.as_deref(),
        &json!({
            "experiment": "stern-gerlach",
            "analyzers_deg": angles,
            "seed": seed,
            "theory": { "passed_first": 0.5, "up_at_second": p_up2 },
            "observed": {
                "filter": filtered.snapshot(),
                "second": second_stats.snapshot(),
            },
            "third": third_report,
            "battery": battery,
        }),
    );
}
