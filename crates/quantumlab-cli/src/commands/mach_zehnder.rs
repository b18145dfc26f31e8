//! `quantumlab mach-zehnder` — single photons, two arms, two detectors.

use quantumlab_core::{
    MachZehnder, PathAmplitudeModel, Port, StatisticsAggregator, StochasticOutcomeSampler,
};
use serde_json::json;

use super::{Recorder, RunArgs};

pub struct MachZehnderCommandConfig<'a> {
    pub reflectance: f64,
    pub upper_length: f64,
    pub lower_length: f64,
    pub block_upper: bool,
    pub block_lower: bool,
    pub wavelength: f64,
    pub run: &'a RunArgs,
}

pub fn run(cfg: MachZehnderCommandConfig<'_>) {
    let mz = MachZehnder {
        reflectance: cfg.reflectance,
        upper_length: cfg.upper_length,
        lower_length: cfg.lower_length,
        upper_open: !cfg.block_upper,
        lower_open: !cfg.block_lower,
    };
    let model = PathAmplitudeModel::new(cfg.wavelength);
    let theory = match mz.probabilities(&model, 1.0) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let arm = |open: bool, len: f64| {
        if open {
            format!("{len}")
        } else {
            "blocked".to_string()
        }
    };
    let setting = format!(
        "R={} upper={} lower={}",
        cfg.reflectance,
        arm(mz.upper_open, mz.upper_length),
        arm(mz.lower_open, mz.lower_length)
    );

    println!("Mach-Zehnder interferometer");
    println!("  Reflectance: {}", cfg.reflectance);
    println!("  Upper arm:   {}", arm(mz.upper_open, mz.upper_length));
    println!("  Lower arm:   {}", arm(mz.lower_open, mz.lower_length));
    println!("  Trials:      {}", cfg.run.trials);
    let (mut rng, seed) = super::make_rng(cfg.run);
    let mut recorder = Recorder::start(cfg.run, "mach-zehnder", seed);

    let sampler = StochasticOutcomeSampler::new();
    let mut stats = StatisticsAggregator::new();
    let mut bright_seq = Vec::with_capacity(cfg.run.trials as usize);
    for _ in 0..cfg.run.trials {
        let port = match mz.fire(&model, 1.0, &sampler, &mut rng) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        stats.record(port);
        bright_seq.push(port == Port::Bright);
        recorder.record(&setting, &port);
    }
    recorder.finish();

    println!();
    super::print_frequency_header();
    let rows = [
        (Port::Bright, theory.bright),
        (Port::Dark, theory.dark),
        (Port::Absorbed, theory.absorbed),
    ];
    for (port, p) in rows {
        super::print_frequency(&port.to_string(), p, stats.count(port), stats.total());
    }

    let observed: Vec<u64> = rows.iter().map(|&(port, _)| stats.count(port)).collect();
    let expected: Vec<f64> = rows.iter().map(|&(_, p)| p).collect();
    let mut results = quantumlab_tests::run_battery(&bright_seq, theory.bright);
    results.push(quantumlab_tests::goodness_of_fit(&observed, &expected));
    let battery = super::print_battery(&results);

    super::write_report(
        cfg.run.output.as_deref(),
        &json!({
            "experiment": "mach-zehnder",
            "config": mz,
            "wavelength": cfg.wavelength,
            "seed": seed,
            "theory": theory,
            "observed": stats.snapshot(),
            "battery": battery,
        }),
    );
}
