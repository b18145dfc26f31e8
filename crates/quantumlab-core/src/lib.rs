//! # quantumlab-core
//!
//! **Quantum probabilities the way Feynman draws them: little clocks, added head to tail.**
//!
//! `quantumlab-core` is the simulation engine behind a set of interactive
//! physics tutorials. It turns every alternative way an event can happen into a
//! rotating arrow, adds the arrows, squares the length, and then lets a random
//! source decide what the detector actually sees.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quantumlab_core::{
//!     EntanglementCorrelationModel, Path, PathAmplitudeModel, SeededRandom, StatisticsAggregator,
//!     StochasticOutcomeSampler, BinaryEvent,
//! };
//!
//! // Two equal-length paths interfere constructively.
//! let model = PathAmplitudeModel::default();
//! let paths = [Path::new(2.0), Path::new(2.0)];
//! let p = model.equal_weight_probability(&paths, 1.0);
//! assert!((p - 1.0).abs() < 1e-9);
//!
//! // Sample a detector 10,000 times and tally the results.
//! let sampler = StochasticOutcomeSampler::new();
//! let mut rng = SeededRandom::from_seed(42);
//! let mut stats = StatisticsAggregator::new();
//! for _ in 0..10_000 {
//!     stats.record(sampler.sample(0.25, BinaryEvent::Detection, &mut rng).unwrap());
//! }
//!
//! // Entangled pairs measured along the same axis always disagree.
//! let pair = EntanglementCorrelationModel::new().sample_general_basis_pair(0.0, 0.0, &mut rng);
//! assert!(pair.is_anticorrelated());
//! ```
//!
//! ## Architecture
//!
//! Paths → Phase clocks → Resultant → Probability → Sampler → Statistics
//!
//! - [`PathAmplitudeModel`] is deterministic: identical inputs give identical
//!   probabilities.
//! - Every random draw goes through a [`RandomSource`]. Pass a
//!   [`SeededRandom`] for reproducible runs or a [`ScriptedRandom`] in tests.
//! - [`StatisticsAggregator`] keeps running counts and frequencies.
//!
//! The experiment modules ([`polarization`], [`interferometer`],
//! [`stern_gerlach`], [`bell`], [`penney`]) compose these pieces into the
//! setups the tutorials show.

pub mod amplitude;
pub mod bell;
pub mod entanglement;
pub mod error;
pub mod geometry;
pub mod interferometer;
pub mod outcome;
pub mod path;
pub mod penney;
pub mod phase;
pub mod polarization;
pub mod random;
pub mod sampler;
pub mod session;
pub mod statistics;
pub mod stern_gerlach;

pub use amplitude::PathAmplitudeModel;
pub use bell::{
    BellSource, BellStatistics, InstructionSet, InstructionStrategy, LOCAL_BOUND,
    LocalHiddenVariableModel,
};
pub use entanglement::{
    Agreement, BellOrientation, BellTrial, EntangledPair, EntanglementCorrelationModel,
    bell_quantum_prediction, probability_different, probability_same,
};
pub use error::{LabError, Result};
pub use geometry::{Point, paths_via, segment_points};
pub use interferometer::{MachZehnder, Port, PortProbabilities, ThinGlass};
pub use outcome::{BinaryEvent, Outcome};
pub use path::{Medium, Path, check_junction};
pub use penney::{Pattern, PenneyGame, PenneyResult, Player};
pub use phase::{PhaseClock, ResultantAmplitude};
pub use polarization::{PhotonFate, Polarization, Polarizer, PolarizerChain, malus_probability};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use sampler::StochasticOutcomeSampler;
pub use session::{SessionConfig, SessionMeta, SessionWriter, load_session_meta};
pub use statistics::{CategoryCount, StatisticsAggregator, StatisticsSnapshot};
pub use stern_gerlach::{Analyzer, SpinState, oven_particle};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
