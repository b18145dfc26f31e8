//! Integration tests for quantumlab-core.
//!
//! These tests drive the full pipeline the tutorials use:
//! configuration → amplitudes → probability → sampling → running statistics.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use quantumlab_core::{
    Agreement, BellStatistics, BinaryEvent, EntanglementCorrelationModel, LOCAL_BOUND, LabError,
    LocalHiddenVariableModel, MachZehnder, Medium, Outcome, Path, PathAmplitudeModel, PenneyGame,
    Player, Point, Polarization, Polarizer, PolarizerChain, SeededRandom, SessionConfig,
    SessionWriter, StatisticsAggregator, StochasticOutcomeSampler, bell_quantum_prediction,
    load_session_meta, malus_probability, paths_via, segment_points,
};

#[test]
fn resultant_probability_stays_in_unit_interval() {
    let model = PathAmplitudeModel::new(0.7);
    // Every first-order split of a unit path, at assorted lengths and offsets.
    for r in [0.0, 0.05, 0.3, 0.5, 0.81, 1.0] {
        for length in [0.0, 0.4, 1.7, 12.25] {
            let reflected = Path::new(length).reflect(r, Medium::AIR, Medium::GLASS).unwrap();
            let transmitted = Path::new(length * 1.3).transmit(1.0 - r).unwrap();
            for path in reflected.into_iter().chain(transmitted) {
                let p = model.compute_resultant(&[path], 1.0).probability();
                assert!((0.0..=1.0).contains(&p), "r={r} length={length}: {p}");
            }
        }
    }

    // Two scaled paths recombining, and both Mach-Zehnder ports.
    for r in [0.1_f64, 0.3, 0.5, 0.77, 0.9] {
        for dl in [0.0, 0.25, 0.5, 1.0, 1.37] {
            // Arms of weight r and 1−r recombined on a 50/50 splitter.
            let a = Path::new(2.0).with_scale((r * 0.5).sqrt()).unwrap();
            let b = Path::new(2.0 + dl).with_scale(((1.0 - r) * 0.5).sqrt()).unwrap();
            let p = model.detection_probability(&[a, b], 1.0);
            assert!((0.0..=1.0).contains(&p), "r={r} dl={dl}: {p:e}");

            let mz = MachZehnder {
                reflectance: r,
                lower_length: 1.0 + dl,
                ..MachZehnder::default()
            };
            for m in [PathAmplitudeModel::default(), model] {
                let ports = mz.probabilities(&m, 1.0).unwrap();
                for v in [ports.bright, ports.dark, ports.absorbed] {
                    assert!((0.0..=1.0).contains(&v), "r={r} dl={dl}: {v:e}");
                }
            }
        }
    }
    for len in [0.0, 0.25, 1.0, 3.3] {
        let ports = MachZehnder::balanced(len)
            .probabilities(&PathAmplitudeModel::default(), 1.0)
            .unwrap();
        assert!((0.0..=1.0).contains(&ports.bright), "len={len}: {:e}", ports.bright);
    }

    // Equal-weight sums over many waypoints.
    let source = Point::new(-3.0, 4.0);
    let detector = Point::new(3.0, 4.0);
    for n in [1, 2, 7, 40] {
        let waypoints = segment_points(Point::new(-6.0, 0.0), Point::new(6.0, 0.0), n);
        let p = model.equal_weight_probability(&paths_via(source, detector, &waypoints), 1.0);
        assert!((0.0..=1.0 + 1e-12).contains(&p), "n={n}: {p}");
    }
}

#[test]
fn empty_path_set_has_zero_probability() {
    let model = PathAmplitudeModel::default();
    assert_eq!(model.compute_resultant(&[], 1.0).probability(), 0.0);
    assert_eq!(model.detection_probability(&[], 1.0), 0.0);
}

#[test]
fn malus_law_through_single_paths() {
    let model = PathAmplitudeModel::default();
    let cases = [
        (0.0, FRAC_PI_4, 0.5),
        (0.0, FRAC_PI_2, 0.0),
        (0.3, 0.3, 1.0),
        (0.2, 0.2 + PI / 3.0, 0.25),
    ];
    for (theta1, theta2, expected) in cases {
        let polarizer = Polarizer::new(theta2);
        let p = match polarizer.transmission_path(theta1) {
            Some(path) => model.compute_resultant(&[path], 1.0).probability(),
            None => 0.0,
        };
        assert!((p - expected).abs() < 1e-9, "{theta1}→{theta2}: {p}");
        assert!((p - malus_probability(theta1, theta2)).abs() < 1e-9);
    }
}

#[test]
fn three_polarizers_let_light_through_crossed_pair() {
    let crossed = PolarizerChain::new(&[0.0, FRAC_PI_2]);
    assert!(crossed.transmission_probability(Polarization::Unpolarized) < 1e-30);

    let with_middle = PolarizerChain::new(&[0.0, FRAC_PI_4, FRAC_PI_2]);
    let p = with_middle.transmission_probability(Polarization::Unpolarized);
    assert!((p - 0.125).abs() < 1e-12);

    let sampler = StochasticOutcomeSampler::new();
    let mut rng = SeededRandom::from_seed(1812);
    let mut stats = StatisticsAggregator::new();
    for _ in 0..40_000 {
        let fate = with_middle
            .send_photon(Polarization::Unpolarized, &sampler, &mut rng)
            .unwrap();
        stats.record(fate.outcome());
    }
    let f = stats.frequency(Outcome::Passed).unwrap();
    assert!((f - 0.125).abs() < 0.01, "passed {f}");
}

#[test]
fn beam_splitter_probabilities_sum_to_one() {
    let model = PathAmplitudeModel::default();
    for r in [0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
        let reflected = Path::new(1.0).reflect(r, Medium::AIR, Medium::GLASS).unwrap();
        let transmitted = Path::new(1.0).transmit(1.0 - r).unwrap();
        let p_r = model.detection_probability(reflected.as_slice(), 1.0);
        let p_t = model.detection_probability(transmitted.as_slice(), 1.0);
        assert!((p_r + p_t - 1.0).abs() < 1e-9, "r={r}");
        assert!((p_r - r).abs() < 1e-9);
    }

    let p = MachZehnder {
        reflectance: 0.3,
        lower_length: 1.21,
        ..MachZehnder::default()
    }
    .probabilities(&model, 1.0)
    .unwrap();
    assert!((p.bright + p.dark - 1.0).abs() < 1e-9);
}

#[test]
fn equal_bases_always_anticorrelated() {
    let model = EntanglementCorrelationModel::new();
    let mut rng = SeededRandom::from_seed(1964);
    for i in 0..10_000 {
        let theta = (i % 37) as f64 * 0.17;
        let pair = model.sample_general_basis_pair(theta, theta, &mut rng);
        assert_ne!(pair.left, pair.right, "trial {i} at θ={theta}");
    }
}

#[test]
fn bell_trials_converge_to_one_half() {
    let model = EntanglementCorrelationModel::new();
    let mut rng = SeededRandom::from_seed(1982);
    let mut stats = BellStatistics::new();
    stats.run(&model, 100_000, &mut rng);

    let rate = stats.different_rate().unwrap();
    assert!(
        (rate - bell_quantum_prediction()).abs() < 0.01,
        "different rate {rate}"
    );
    assert!(rate < LOCAL_BOUND);
    assert_eq!(stats.same_setting_violations(), 0);
    assert_eq!(
        stats.same_setting.frequency(Agreement::Different),
        Some(1.0)
    );
}

#[test]
fn local_source_never_reaches_quantum_rate() {
    let model = LocalHiddenVariableModel::default();
    let mut rng = SeededRandom::from_seed(1982);
    let mut stats = BellStatistics::new();
    stats.run(&model, 50_000, &mut rng);
    let rate = stats.different_rate().unwrap();
    assert!(rate > LOCAL_BOUND - 0.01, "local rate {rate}");
    assert_eq!(stats.same_setting_violations(), 0);
}

#[test]
fn aggregator_frequencies_and_reset() {
    let mut stats = StatisticsAggregator::new();
    assert_eq!(stats.frequency(Outcome::Transmitted), None);

    stats.record_n(Outcome::Transmitted, 30);
    stats.record_n(Outcome::Reflected, 70);
    assert_eq!(stats.total(), 100);
    assert_eq!(stats.frequency(Outcome::Transmitted), Some(0.3));
    assert_eq!(stats.frequency(Outcome::Reflected), Some(0.7));

    // State carries over until reset.
    stats.record(Outcome::Transmitted);
    assert_eq!(stats.total(), 101);

    stats.reset();
    assert_eq!(stats.total(), 0);
    assert_eq!(stats.frequency(Outcome::Transmitted), None);
    assert_eq!(stats.frequency(Outcome::Reflected), None);
}

#[test]
fn identical_seeds_give_identical_outcomes() {
    let sampler = StochasticOutcomeSampler::new();
    let run = |seed: u64| -> Vec<Outcome> {
        let mut rng = SeededRandom::from_seed(seed);
        (0..500)
            .map(|_| sampler.sample(0.37, BinaryEvent::BeamSplitter, &mut rng).unwrap())
            .collect()
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}

#[test]
fn invalid_configuration_fails_fast() {
    let sampler = StochasticOutcomeSampler::new();
    let mut rng = SeededRandom::from_seed(0);
    assert!(matches!(
        sampler.sample(-0.1, BinaryEvent::Detection, &mut rng),
        Err(LabError::InvalidProbability { .. })
    ));
    assert!(matches!(
        sampler.sample_weighted(&[(Outcome::Up, 0.5), (Outcome::Down, 0.6)], &mut rng),
        Err(LabError::WeightsNotNormalized { .. })
    ));
    // Nothing was drawn by the failed calls.
    assert_eq!(rng.draws(), 0);
}

#[test]
fn penney_best_response_wins_recorded_session() {
    let tmp = tempfile::tempdir().unwrap();
    let game = PenneyGame::against_best_response("RBR".parse().unwrap());
    let sampler = StochasticOutcomeSampler::new();
    let mut rng = SeededRandom::from_seed(3);

    let mut writer = SessionWriter::new(SessionConfig {
        experiment: "penney".to_string(),
        seed: Some(3),
        output_dir: tmp.path().to_path_buf(),
        ..Default::default()
    })
    .unwrap();

    let mut second_wins = 0u64;
    for _ in 0..2_000 {
        let result = game.play(&sampler, &mut rng).unwrap();
        let label = match result.winner {
            Player::First => "first",
            Player::Second => "second",
        };
        if result.winner == Player::Second {
            second_wins += 1;
        }
        writer
            .write_trial(&format!("{}/{}", game.first, game.second), &label)
            .unwrap();
    }
    let dir = writer.finish().unwrap();

    let meta = load_session_meta(&dir).unwrap();
    assert_eq!(meta.total_trials, 2_000);
    assert_eq!(meta.counts.get("second").copied(), Some(second_wins));
    let rate = second_wins as f64 / 2_000.0;
    assert!(rate > 0.6, "second player won {rate}");
}
