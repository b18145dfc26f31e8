//! Linear polarizers and Malus's law.
//!
//! A photon meeting a polarizer whose axis is `Δ` away from its polarization
//! passes with probability `cos²Δ`. Passing resets its polarization to the
//! polarizer axis, so each stage only sees the axis of the stage before it.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::outcome::{BinaryEvent, Outcome};
use crate::path::Path;
use crate::random::RandomSource;
use crate::sampler::StochasticOutcomeSampler;

/// `cos²(θ2 − θ1)`.
pub fn malus_probability(theta1: f64, theta2: f64) -> f64 {
    let c = (theta2 - theta1).cos();
    c * c
}

/// Polarization state of a photon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Polarization {
    /// Linear polarization at the given angle (radians).
    Linear(f64),
    /// Natural light: passes any polarizer half the time.
    Unpolarized,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polarizer {
    /// Transmission axis in radians.
    pub axis: f64,
}

impl Polarizer {
    pub fn new(axis: f64) -> Self {
        Self { axis }
    }

    /// Amplitude path through this polarizer for a photon polarized at
    /// `incoming`: scale `|cos Δ|`, half-turn offset when `cos Δ < 0`.
    /// Exactly crossed polarizers give no path at all.
    pub fn transmission_path(&self, incoming: f64) -> Option<Path> {
        let c = (self.axis - incoming).cos();
        if c == 0.0 {
            return None;
        }
        Some(Path {
            length: 0.0,
            medium_phase_offset: if c < 0.0 { PI } else { 0.0 },
            amplitude_scale: c.abs(),
        })
    }

    pub fn pass_probability(&self, incoming: Polarization) -> f64 {
        match incoming {
            Polarization::Linear(theta) => malus_probability(theta, self.axis),
            Polarization::Unpolarized => 0.5,
        }
    }

    /// Sample one photon. On `Passed` the photon is now polarized along `axis`.
    pub fn interact<R: RandomSource + ?Sized>(
        &self,
        incoming: Polarization,
        sampler: &StochasticOutcomeSampler,
        rng: &mut R,
    ) -> Result<Outcome> {
        sampler.sample(self.pass_probability(incoming), BinaryEvent::Polarizer, rng)
    }
}

/// What happened to a photon sent through a chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PhotonFate {
    /// Made it through every stage, leaving with this polarization.
    Passed { polarization: Polarization },
    /// Absorbed at the given zero-based stage.
    Blocked { stage: usize },
}

impl PhotonFate {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Passed { .. } => Outcome::Passed,
            Self::Blocked { .. } => Outcome::Blocked,
        }
    }
}

/// Polarizers traversed in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarizerChain {
    pub polarizers: Vec<Polarizer>,
}

impl PolarizerChain {
    pub fn new(axes: &[f64]) -> Self {
        Self {
            polarizers: axes.iter().map(|&a| Polarizer::new(a)).collect(),
        }
    }

    pub fn push(&mut self, polarizer: Polarizer) {
        self.polarizers.push(polarizer);
    }

    pub fn len(&self) -> usize {
        self.polarizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarizers.is_empty()
    }

    /// Probability of passing every stage: the product of Malus factors.
    pub fn transmission_probability(&self, initial: Polarization) -> f64 {
        let mut state = initial;
        let mut p = 1.0;
        for polarizer in &self.polarizers {
            p *= polarizer.pass_probability(state);
            state = Polarization::Linear(polarizer.axis);
        }
        p
    }

    /// Send one photon through, stage by stage. One draw per stage reached.
    pub fn send_photon<R: RandomSource + ?Sized>(
        &self,
        initial: Polarization,
        sampler: &StochasticOutcomeSampler,
        rng: &mut R,
    ) -> Result<PhotonFate> {
        let mut state = initial;
        for (stage, polarizer) in self.polarizers.iter().enumerate() {
            if polarizer.interact(state, sampler, rng)? == Outcome::Blocked {
                return Ok(PhotonFate::Blocked { stage });
            }
            state = Polarization::Linear(polarizer.axis);
        }
        Ok(PhotonFate::Passed {
            polarization: state,
        })
    }
}
