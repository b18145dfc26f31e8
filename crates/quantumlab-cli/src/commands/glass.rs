//! `quantumlab glass` — partial reflection from a sheet of glass.

use quantumlab_core::{
    BinaryEvent, Outcome, PathAmplitudeModel, StatisticsAggregator, StochasticOutcomeSampler,
    ThinGlass,
};
use serde_json::json;

use super::{Recorder, RunArgs};

pub struct GlassCommandConfig<'a> {
    pub thickness: f64,
    pub refractive_index: f64,
    pub surface_reflectance: f64,
    pub sweep: Option<usize>,
    pub run: &'a RunArgs,
}

fn reflection_probability(glass: &ThinGlass, model: &PathAmplitudeModel) -> f64 {
    match glass.reflection_probability(model, 1.0) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

pub fn run(cfg: GlassCommandConfig<'_>) {
    let glass = ThinGlass {
        thickness: cfg.thickness,
        refractive_index: cfg.refractive_index,
        surface_reflectance: cfg.surface_reflectance,
    };
    let model = PathAmplitudeModel::default();
    let p_reflect = reflection_probability(&glass, &model);

    println!("Thin glass");
    println!("  Thickness: {}", glass.thickness);
    println!("  Index:     {}", glass.refractive_index);
    println!("  Surface R: {}", glass.surface_reflectance);

    let mut sweep_rows = Vec::new();
    if let Some(steps) = cfg.sweep.filter(|&s| s > 1) {
        println!("\n  {:>10} {:>12}", "thickness", "P(reflect)");
        for i in 0..steps {
            let t = cfg.thickness * i as f64 / (steps - 1) as f64;
            let p = reflection_probability(&ThinGlass { thickness: t, ..glass }, &model);
            let peak = (4.0 * glass.surface_reflectance).max(1e-12);
            let bar = "█".repeat((p / peak * 30.0) as usize);
            println!("  {t:>10.4} {p:>12.5} {bar}");
            sweep_rows.push(json!({ "thickness": t, "probability": p }));
        }
    }

    println!("\n  Trials:    {}", cfg.run.trials);
    let (mut rng, seed) = super::make_rng(cfg.run);
    let mut recorder = Recorder::start(cfg.run, "glass", seed);
    let setting = format!("t={}", glass.thickness);

    let sampler = StochasticOutcomeSampler::new();
    let mut stats = StatisticsAggregator::new();
    let mut reflected_seq = Vec::with_capacity(cfg.run.trials as usize);
    // Transmitted is the primary outcome of a beam-splitter event.
    let p_transmit = (1.0 - p_reflect).clamp(0.0, 1.0);
    for _ in 0..cfg.run.trials {
        let outcome = match sampler.sample(p_transmit, BinaryEvent::BeamSplitter, &mut rng) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        stats.record(outcome);
        reflected_seq.push(outcome == Outcome::Reflected);
        recorder.record(&setting, &outcome);
    }
    recorder.finish();

    println!();
    super::print_frequency_header();
    super::print_frequency("reflected", p_reflect, stats.count(Outcome::Reflected), stats.total());
    super::print_frequency(
        "transmitted",
        p_transmit,
        stats.count(Outcome::Transmitted),
        stats.total(),
    );

    let results = quantumlab_tests::run_battery(&reflected_seq, p_reflect);
    let battery = super::print_battery(&results);

    super::write_report(
        cfg.run.output.as_deref(),
        &json!({
            "experiment": "glass",
            "config": glass,
            "seed": seed,
            "theory": { "reflected": p_reflect, "transmitted": p_transmit },
            "observed": stats.snapshot(),
            "sweep": sweep_rows,
            "battery": battery,
        }),
    );
}
