//! Entangled spin-pair source.
//!
//! The source emits two spin-1/2 particles in the singlet state. Each side's
//! result on its own is a fair coin; jointly they obey
//!
//! ```text
//! P(same outcome      | Δθ) = sin²(Δθ/2)
//! P(different outcome | Δθ) = cos²(Δθ/2)
//! ```
//!
//! so equal analyzer orientations always disagree and opposite orientations
//! always agree. There is no single-particle entry point: an entangled
//! source is only ever drawn from as a pair.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;
use crate::random::RandomSource;

/// Two outcomes produced together, with the bases they were measured in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntangledPair {
    pub left: Outcome,
    pub right: Outcome,
    pub left_basis_angle: f64,
    pub right_basis_angle: f64,
}

impl EntangledPair {
    /// `right_basis_angle − left_basis_angle`.
    pub fn relative_angle(&self) -> f64 {
        self.right_basis_angle - self.left_basis_angle
    }

    pub fn agreement(&self) -> Agreement {
        if self.left == self.right {
            Agreement::Same
        } else {
            Agreement::Different
        }
    }

    pub fn is_anticorrelated(&self) -> bool {
        self.agreement() == Agreement::Different
    }
}

/// Whether the two sides of a pair read the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agreement {
    Same,
    Different,
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Same => write!(f, "same"),
            Self::Different => write!(f, "different"),
        }
    }
}

/// The three analyzer orientations of the Bell setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BellOrientation {
    Deg0,
    Deg120,
    Deg240,
}

impl BellOrientation {
    pub const ALL: [Self; 3] = [Self::Deg0, Self::Deg120, Self::Deg240];

    pub fn index(self) -> usize {
        match self {
            Self::Deg0 => 0,
            Self::Deg120 => 1,
            Self::Deg240 => 2,
        }
    }

    /// Orientation in radians.
    pub fn angle(self) -> f64 {
        self.index() as f64 * TAU / 3.0
    }

    pub fn degrees(self) -> u32 {
        self.index() as u32 * 120
    }

    /// Uniform choice among the three orientations. One draw.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.next_index(3)]
    }
}

impl std::fmt::Display for BellOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// One trial of the three-orientation experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BellTrial {
    pub left_setting: BellOrientation,
    pub right_setting: BellOrientation,
    pub pair: EntangledPair,
}

impl BellTrial {
    pub fn same_setting(&self) -> bool {
        self.left_setting == self.right_setting
    }
}

/// Probability that the two sides disagree at relative angle `delta`.
pub fn probability_different(delta: f64) -> f64 {
    let c = (delta / 2.0).cos();
    c * c
}

/// Probability that the two sides agree at relative angle `delta`.
pub fn probability_same(delta: f64) -> f64 {
    let s = (delta / 2.0).sin();
    s * s
}

/// Quantum prediction for the different-outcome rate with both sides choosing
/// uniformly among [`BellOrientation::ALL`].
pub fn bell_quantum_prediction() -> f64 {
    let mut total = 0.0;
    for l in BellOrientation::ALL {
        for r in BellOrientation::ALL {
            total += probability_different(r.angle() - l.angle());
        }
    }
    total / 9.0
}

/// Singlet-state pair source. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntanglementCorrelationModel;

impl EntanglementCorrelationModel {
    pub fn new() -> Self {
        Self
    }

    /// Measure a fresh pair in the given bases. Consumes exactly two draws:
    /// the left result (50/50), then the correlation coin.
    pub fn sample_general_basis_pair<R: RandomSource + ?Sized>(
        &self,
        left_basis_angle: f64,
        right_basis_angle: f64,
        rng: &mut R,
    ) -> EntangledPair {
        let left = if rng.next_bool() {
            Outcome::Up
        } else {
            Outcome::Down
        };
        let delta = right_basis_angle - left_basis_angle;
        // sin(0) is exactly 0, so equal bases never take the `same` branch.
        let p_same = if delta == 0.0 {
            0.0
        } else {
            probability_same(delta)
        };
        let right = if rng.next_unit() < p_same {
            left
        } else {
            left.opposite()
        };
        log::trace!("pair Δθ={:.4} rad: {left} / {right}", delta);
        EntangledPair {
            left,
            right,
            left_basis_angle,
            right_basis_angle,
        }
    }

    /// Both sides pick one of the three orientations uniformly and
    /// independently, then the pair is measured. Four draws.
    pub fn sample_bell_trial<R: RandomSource + ?Sized>(&self, rng: &mut R) -> BellTrial {
        let left_setting = BellOrientation::random(rng);
        let right_setting = BellOrientation::random(rng);
        let pair = self.sample_general_basis_pair(left_setting.angle(), right_setting.angle(), rng);
        BellTrial {
            left_setting,
            right_setting,
            pair,
        }
    }
}
