//! Three-orientation Bell experiment: sources, local comparison model, tally.
//!
//! Any source that pre-assigns answers to the particles (an "instruction
//! set") and still guarantees opposite results for equal settings can't
//! push the different-outcome rate below [`LOCAL_BOUND`] = 5/9. The singlet
//! source reaches 1/2.

use serde::{Deserialize, Serialize};

use crate::entanglement::{
    Agreement, BellOrientation, BellTrial, EntangledPair, EntanglementCorrelationModel,
};
use crate::outcome::Outcome;
use crate::random::RandomSource;
use crate::statistics::StatisticsAggregator;

/// Lowest different-outcome rate reachable by instruction-set sources.
pub const LOCAL_BOUND: f64 = 5.0 / 9.0;

/// Anything that can produce three-orientation trials.
pub trait BellSource {
    /// Short name for reports.
    fn name(&self) -> &'static str;

    /// Choose both settings uniformly and produce the measured pair.
    fn sample_trial(&self, rng: &mut dyn RandomSource) -> BellTrial;
}

impl BellSource for EntanglementCorrelationModel {
    fn name(&self) -> &'static str {
        "quantum"
    }

    fn sample_trial(&self, rng: &mut dyn RandomSource) -> BellTrial {
        self.sample_bell_trial(rng)
    }
}

/// Predetermined left-particle answers for each orientation. The right
/// particle carries the complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructionSet(pub [Outcome; 3]);

impl InstructionSet {
    /// All eight sets, indexed by bit pattern (bit i set → Down at orientation i).
    pub fn from_index(index: usize) -> Self {
        let pick = |bit: usize| {
            if index & (1 << bit) == 0 {
                Outcome::Up
            } else {
                Outcome::Down
            }
        };
        Self([pick(0), pick(1), pick(2)])
    }

    pub fn left(&self, setting: BellOrientation) -> Outcome {
        self.0[setting.index()]
    }

    pub fn right(&self, setting: BellOrientation) -> Outcome {
        self.left(setting).opposite()
    }

    /// `UUU` / `DDD`: every setting pair disagrees.
    pub fn is_uniform(&self) -> bool {
        self.0[0] == self.0[1] && self.0[1] == self.0[2]
    }

    /// Different-outcome rate over the nine equally likely setting pairs.
    pub fn different_rate(&self) -> f64 {
        let mut n = 0;
        for l in BellOrientation::ALL {
            for r in BellOrientation::ALL {
                if self.left(l) != self.right(r) {
                    n += 1;
                }
            }
        }
        n as f64 / 9.0
    }
}

/// Which instruction sets the local source hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InstructionStrategy {
    /// All eight sets equally often (rate 2/3).
    #[default]
    Uniform,
    /// Only the six non-uniform sets (rate exactly 5/9, the best a local
    /// source can do).
    MixedOnly,
}

/// Local hidden-variable comparison source.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHiddenVariableModel {
    pub strategy: InstructionStrategy,
}

impl LocalHiddenVariableModel {
    pub fn new(strategy: InstructionStrategy) -> Self {
        Self { strategy }
    }

    /// Draw the instruction set carried by the next pair. One draw.
    pub fn draw_instructions<R: RandomSource + ?Sized>(&self, rng: &mut R) -> InstructionSet {
        match self.strategy {
            InstructionStrategy::Uniform => InstructionSet::from_index(rng.next_index(8)),
            // Indices 1..=6 are exactly the non-uniform sets.
            InstructionStrategy::MixedOnly => InstructionSet::from_index(1 + rng.next_index(6)),
        }
    }

    /// Long-run different-outcome rate of this strategy.
    pub fn expected_different_rate(&self) -> f64 {
        match self.strategy {
            InstructionStrategy::Uniform => 2.0 / 3.0,
            InstructionStrategy::MixedOnly => LOCAL_BOUND,
        }
    }

    /// Different-outcome rate at one setting pair, averaged over the sets
    /// this strategy hands out.
    pub fn expected_pair_rate(&self, left: BellOrientation, right: BellOrientation) -> f64 {
        let indices = match self.strategy {
            InstructionStrategy::Uniform => 0..8,
            InstructionStrategy::MixedOnly => 1..7,
        };
        let n = indices.len();
        let differ = indices
            .map(InstructionSet::from_index)
            .filter(|s| s.left(left) != s.right(right))
            .count();
        differ as f64 / n as f64
    }

    /// A fresh pair measured at the given settings. One draw.
    pub fn sample_pair<R: RandomSource + ?Sized>(
        &self,
        left_setting: BellOrientation,
        right_setting: BellOrientation,
        rng: &mut R,
    ) -> EntangledPair {
        let instructions = self.draw_instructions(rng);
        self.measure(instructions, left_setting, right_setting).pair
    }

    pub fn measure(
        &self,
        instructions: InstructionSet,
        left_setting: BellOrientation,
        right_setting: BellOrientation,
    ) -> BellTrial {
        BellTrial {
            left_setting,
            right_setting,
            pair: EntangledPair {
                left: instructions.left(left_setting),
                right: instructions.right(right_setting),
                left_basis_angle: left_setting.angle(),
                right_basis_angle: right_setting.angle(),
            },
        }
    }
}

impl BellSource for LocalHiddenVariableModel {
    fn name(&self) -> &'static str {
        "local"
    }

    fn sample_trial(&self, rng: &mut dyn RandomSource) -> BellTrial {
        let instructions = self.draw_instructions(rng);
        let left_setting = BellOrientation::random(rng);
        let right_setting = BellOrientation::random(rng);
        self.measure(instructions, left_setting, right_setting)
    }
}

/// Agreement counts over every trial and over equal-setting trials only.
#[derive(Debug, Clone, Default)]
pub struct BellStatistics {
    pub all: StatisticsAggregator<Agreement>,
    pub same_setting: StatisticsAggregator<Agreement>,
}

impl BellStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trial: &BellTrial) {
        let agreement = trial.pair.agreement();
        self.all.record(agreement);
        if trial.same_setting() {
            self.same_setting.record(agreement);
        }
    }

    /// Run `trials` trials from `source`, recording each.
    pub fn run(&mut self, source: &dyn BellSource, trials: u64, rng: &mut dyn RandomSource) {
        for _ in 0..trials {
            let trial = source.sample_trial(rng);
            self.record(&trial);
        }
        log::debug!(
            "{} bell trials from {} source, different rate {:?}",
            trials,
            source.name(),
            self.different_rate()
        );
    }

    pub fn different_rate(&self) -> Option<f64> {
        self.all.frequency(Agreement::Different)
    }

    /// Number of equal-setting trials that agreed. Must be zero for any
    /// valid source.
    pub fn same_setting_violations(&self) -> u64 {
        self.same_setting.count(Agreement::Same)
    }

    pub fn reset(&mut self) {
        self.all.reset();
        self.same_setting.reset();
    }
}
