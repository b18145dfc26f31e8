//! `quantumlab penney` — Penney's game with red/blue cards.

use quantumlab_core::{
    Outcome, Pattern, PenneyGame, Player, StatisticsAggregator, StochasticOutcomeSampler,
};
use serde_json::json;

use super::{Recorder, RunArgs};

pub struct PenneyCommandConfig<'a> {
    pub first: &'a str,
    pub second: Option<&'a str>,
    pub table: bool,
    pub run: &'a RunArgs,
}

fn parse_pattern(s: &str) -> Pattern {
    match s.parse() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// All eight first picks, RRR through BBB.
fn all_patterns() -> Vec<Pattern> {
    let card = |bit: bool| if bit { Outcome::Blue } else { Outcome::Red };
    (0..8u8)
        .filter_map(|i| Pattern::new([card(i & 4 != 0), card(i & 2 != 0), card(i & 1 != 0)]).ok())
        .collect()
}

fn print_table() {
    println!("  {:>6} {:>8} {:>12}", "First", "Reply", "P(reply)");
    println!("  {}", "-".repeat(28));
    for first in all_patterns() {
        let game = PenneyGame::against_best_response(first);
        println!(
            "  {:>6} {:>8} {:>12.4}",
            game.first,
            game.second,
            game.second_player_win_probability()
        );
    }
}

pub fn run(cfg: PenneyCommandConfig<'_>) {
    if cfg.table {
        println!("Penney's game: best replies");
        print_table();
        return;
    }

    let first = parse_pattern(cfg.first);
    let game = match cfg.second {
        Some(s) => match PenneyGame::new(first, parse_pattern(s)) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => PenneyGame::against_best_response(first),
    };
    let theory = game.second_player_win_probability();
    let setting = format!("{}/{}", game.first, game.second);

    println!("Penney's game");
    println!("  First:     {}", game.first);
    println!(
        "  Second:    {}{}",
        game.second,
        if cfg.second.is_none() { " (best reply)" } else { "" }
    );
    println!("  Games:     {}", cfg.run.trials);
    let (mut rng, seed) = super::make_rng(cfg.run);
    let mut recorder = Recorder::start(cfg.run, "penney", seed);

    let sampler = StochasticOutcomeSampler::new();
    let mut stats = StatisticsAggregator::new();
    let mut second_seq = Vec::with_capacity(cfg.run.trials as usize);
    let mut total_draws = 0u64;
    for _ in 0..cfg.run.trials {
        let result = match game.play(&sampler, &mut rng) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        stats.record(result.winner);
        second_seq.push(result.winner == Player::Second);
        total_draws += u64::from(result.draws);
        let label = match result.winner {
            Player::First => "first",
            Player::Second => "second",
        };
        recorder.record(&setting, &label);
    }
    recorder.finish();

    println!();
    super::print_frequency_header();
    super::print_frequency(
        &format!("first wins ({})", game.first),
        1.0 - theory,
        stats.count(Player::First),
        stats.total(),
    );
    super::print_frequency(
        &format!("second wins ({})", game.second),
        theory,
        stats.count(Player::Second),
        stats.total(),
    );
    let mean_draws = if stats.total() == 0 {
        None
    } else {
        Some(total_draws as f64 / stats.total() as f64)
    };
    if let Some(m) = mean_draws {
        println!("\n  Mean cards per game: {m:.2}");
    }

    let results = quantumlab_tests::run_battery(&second_seq, theory);
    let battery = super::print_battery(&results);

    super::write_report(
        cfg.run.output.as_deref(),
        &json!({
            "experiment": "penney",
            "first": game.first.to_string(),
            "second": game.second.to_string(),
            "seed": seed,
            "theory_second_wins": theory,
            "observed": stats.snapshot(),
            "mean_draws": mean_draws,
            "battery": battery,
        }),
    );
}
