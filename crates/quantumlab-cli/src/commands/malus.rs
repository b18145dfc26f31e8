//! `quantumlab malus` — photons through a chain of polarizers.

use quantumlab_core::{
    PhotonFate, Polarization, PolarizerChain, StatisticsAggregator, StochasticOutcomeSampler,
};
use serde_json::json;

use super::{Recorder, RunArgs};

pub struct MalusCommandConfig<'a> {
    pub angles_deg: &'a [f64],
    pub source_deg: Option<f64>,
    pub run: &'a RunArgs,
}

pub fn run(cfg: MalusCommandConfig<'_>) {
    let radians: Vec<f64> = cfg.angles_deg.iter().map(|a| a.to_radians()).collect();
    let chain = PolarizerChain::new(&radians);
    let initial = match cfg.source_deg {
        Some(deg) => Polarization::Linear(deg.to_radians()),
        None => Polarization::Unpolarized,
    };
    let setting = super::format_degrees(cfg.angles_deg);

    println!("Polarizer chain");
    println!("  Axes:      {setting}");
    match cfg.source_deg {
        Some(deg) => println!("  Source:    linear at {deg}°"),
        None => println!("  Source:    unpolarized"),
    }
    println!("  Trials:    {}", cfg.run.trials);
    let (mut rng, seed) = super::make_rng(cfg.run);
    let mut recorder = Recorder::start(cfg.run, "malus", seed);

    let sampler = StochasticOutcomeSampler::new();
    // Category: Some(stage) for blocked photons, None for passed ones.
    let mut stats: StatisticsAggregator<Option<usize>> = StatisticsAggregator::new();
    let mut passed_seq = Vec::with_capacity(cfg.run.trials as usize);

    for _ in 0..cfg.run.trials {
        let fate = match chain.send_photon(initial, &sampler, &mut rng) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        let (category, label) = match fate {
            PhotonFate::Passed { .. } => (None, "passed".to_string()),
            PhotonFate::Blocked { stage } => (Some(stage), format!("blocked@{stage}")),
        };
        stats.record(category);
        passed_seq.push(category.is_none());
        recorder.record(&setting, &label);
    }
    recorder.finish();

    // Probability of being stopped at each stage: reach it, then fail it.
    let mut stage_theory = Vec::with_capacity(chain.len());
    let mut reach = 1.0;
    let mut state = initial;
    for p in &chain.polarizers {
        let pass = p.pass_probability(state);
        stage_theory.push(reach * (1.0 - pass));
        reach *= pass;
        state = Polarization::Linear(p.axis);
    }
    let theory_pass = chain.transmission_probability(initial);

    println!();
    super::print_frequency_header();
    for (stage, theory) in stage_theory.iter().enumerate() {
        let label = format!("blocked at {}°", cfg.angles_deg[stage]);
        super::print_frequency(&label, *theory, stats.count(Some(stage)), stats.total());
    }
    super::print_frequency("passed", theory_pass, stats.count(None), stats.total());

    let mut observed: Vec<u64> = (0..chain.len()).map(|s| stats.count(Some(s))).collect();
    observed.push(stats.count(None));
    let mut expected = stage_theory.clone();
    expected.push(theory_pass);

    let mut results = quantumlab_tests::run_battery(&passed_seq, theory_pass);
    results.push(quantumlab_tests::goodness_of_fit(&observed, &expected));
    let battery = super::print_battery(&results);

    super::write_report(
        cfg.run.output.as_deref(),
        &json!({
            "experiment": "malus",
            "axes_deg": cfg.angles_deg,
            "source_deg": cfg.source_deg,
            "seed": seed,
            "trials": stats.total(),
            "theory": { "passed": theory_pass, "blocked_by_stage": stage_theory },
            "observed": {
                "passed": stats.count(None),
                "blocked_by_stage": &observed[..chain.len()],
            },
            "battery": battery,
        }),
    );
}
