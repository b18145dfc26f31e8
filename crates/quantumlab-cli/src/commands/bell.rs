//! `quantumlab bell` — three-orientation Bell experiment.

use quantumlab_core::{
    Agreement, BellOrientation, BellSource, BellStatistics, EntanglementCorrelationModel,
    InstructionStrategy, LOCAL_BOUND, LocalHiddenVariableModel, bell_quantum_prediction,
    probability_different,
};
use serde_json::json;

use super::{Recorder, RunArgs};

pub struct BellCommandConfig<'a> {
    pub model: &'a str,
    pub strategy: &'a str,
    pub run: &'a RunArgs,
}

pub fn parse_strategy(s: &str) -> InstructionStrategy {
    match s {
        "uniform" => InstructionStrategy::Uniform,
        "mixed" | "mixed-only" => InstructionStrategy::MixedOnly,
        _ => {
            eprintln!("Unknown strategy '{s}', using uniform");
            InstructionStrategy::Uniform
        }
    }
}

pub fn run(cfg: BellCommandConfig<'_>) {
    let quantum = EntanglementCorrelationModel::new();
    let local = LocalHiddenVariableModel::new(parse_strategy(cfg.strategy));
    let is_local = cfg.model == "local";
    let source: &dyn BellSource = if is_local { &local } else { &quantum };
    let expected_rate = if is_local {
        local.expected_different_rate()
    } else {
        bell_quantum_prediction()
    };
    let pair_theory = |l: BellOrientation, r: BellOrientation| {
        if is_local {
            local.expected_pair_rate(l, r)
        } else {
            probability_different(r.angle() - l.angle())
        }
    };

    println!("Bell experiment");
    println!("  Source:    {}", source.name());
    if is_local {
        println!("  Strategy:  {:?}", local.strategy);
    }
    println!("  Trials:    {}", cfg.run.trials);
    let (mut rng, seed) = super::make_rng(cfg.run);
    let mut recorder = Recorder::start(cfg.run, "bell", seed);

    let mut stats = BellStatistics::new();
    // [left][right] = (different, total)
    let mut grid = [[(0u64, 0u64); 3]; 3];
    let mut different_seq = Vec::with_capacity(cfg.run.trials as usize);
    for _ in 0..cfg.run.trials {
        let trial = source.sample_trial(&mut rng);
        stats.record(&trial);
        let different = trial.pair.agreement() == Agreement::Different;
        let cell = &mut grid[trial.left_setting.index()][trial.right_setting.index()];
        cell.0 += u64::from(different);
        cell.1 += 1;
        different_seq.push(different);
        recorder.record(
            &format!("{}/{}", trial.left_setting, trial.right_setting),
            &trial.pair.agreement(),
        );
    }
    recorder.finish();

    println!("\n  Different-outcome rate by setting (theory / observed)");
    print!("  {:>8}", "L \\ R");
    for r in BellOrientation::ALL {
        print!(" {:>17}", r.to_string());
    }
    println!();
    let mut cells = Vec::new();
    for l in BellOrientation::ALL {
        print!("  {:>8}", l.to_string());
        for r in BellOrientation::ALL {
            let (d, n) = grid[l.index()][r.index()];
            let theory = pair_theory(l, r);
            let observed = if n == 0 { f64::NAN } else { d as f64 / n as f64 };
            print!(" {:>8.3} / {:<6.3}", theory, observed);
            cells.push(json!({
                "left": l.degrees(),
                "right": r.degrees(),
                "theory": theory,
                "different": d,
                "trials": n,
            }));
        }
        println!();
    }

    let total = stats.all.total();
    let different = stats.all.count(Agreement::Different);
    println!();
    super::print_frequency_header();
    super::print_frequency("different (all settings)", expected_rate, different, total);
    super::print_frequency(
        "different (equal setting)",
        1.0,
        stats.same_setting.count(Agreement::Different),
        stats.same_setting.total(),
    );
    println!(
        "\n  Quantum prediction {:.4}, instruction sets can't go below {:.4}",
        bell_quantum_prediction(),
        LOCAL_BOUND
    );
    if let Some(rate) = stats.different_rate() {
        let verdict = if rate < LOCAL_BOUND { "below" } else { "not below" };
        println!("  Observed {rate:.4}: {verdict} the local bound");
    }

    let results = vec![
        quantumlab_tests::exact_invariant(
            "Equal-setting anti-correlation",
            stats.same_setting_violations(),
            stats.same_setting.total(),
        ),
        quantumlab_tests::proportion_test(different, total, expected_rate),
        quantumlab_tests::runs_test(&different_seq),
    ];
    let battery = super::print_battery(&results);

    super::write_report(
        cfg.run.output.as_deref(),
        &json!({
            "experiment": "bell",
            "source": source.name(),
            "strategy": is_local.then_some(local.strategy),
            "seed": seed,
            "expected_different_rate": expected_rate,
            "local_bound": LOCAL_BOUND,
            "different_rate": stats.different_rate(),
            "same_setting_violations": stats.same_setting_violations(),
            "settings": cells,
            "battery": battery,
        }),
    );
}
