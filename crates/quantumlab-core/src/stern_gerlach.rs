//! Stern-Gerlach analyzers for spin-1/2 particles.
//!
//! An analyzer at orientation `φ` sends a particle whose spin points along
//! `θ` up with probability `cos²((φ − θ)/2)`. Measurement is memoryless: the
//! particle leaves pointing along `φ` (up) or `φ + π` (down), and nothing
//! about its earlier history survives.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::outcome::{BinaryEvent, Outcome};
use crate::random::RandomSource;
use crate::sampler::StochasticOutcomeSampler;

/// Reduce an angle to `(-π, π]`.
fn wrap_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(TAU);
    if t > PI { t - TAU } else { t }
}

/// Spin state: spin-up along `axis` (radians in the measurement plane).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    pub axis: f64,
}

impl SpinState {
    pub fn new(axis: f64) -> Self {
        Self {
            axis: wrap_angle(axis),
        }
    }

    pub fn up_along(orientation: f64) -> Self {
        Self::new(orientation)
    }

    pub fn down_along(orientation: f64) -> Self {
        Self::new(orientation + PI)
    }
}

/// A Stern-Gerlach apparatus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analyzer {
    /// Field orientation in radians.
    pub orientation: f64,
}

impl Analyzer {
    pub fn new(orientation: f64) -> Self {
        Self { orientation }
    }

    /// `cos²((orientation − axis)/2)`.
    pub fn up_probability(&self, state: &SpinState) -> f64 {
        let c = ((self.orientation - state.axis) / 2.0).cos();
        c * c
    }

    /// Measure and collapse `state`. One draw.
    pub fn measure<R: RandomSource + ?Sized>(
        &self,
        state: &mut SpinState,
        sampler: &StochasticOutcomeSampler,
        rng: &mut R,
    ) -> Result<Outcome> {
        let outcome = sampler.sample(self.up_probability(state), BinaryEvent::Spin, rng)?;
        *state = match outcome {
            Outcome::Up => SpinState::up_along(self.orientation),
            _ => SpinState::down_along(self.orientation),
        };
        Ok(outcome)
    }

    /// Keep only the up beam: returns the collapsed state for particles
    /// that went up, `None` for those blocked.
    pub fn filter<R: RandomSource + ?Sized>(
        &self,
        state: SpinState,
        sampler: &StochasticOutcomeSampler,
        rng: &mut R,
    ) -> Result<Option<SpinState>> {
        let mut s = state;
        Ok(match self.measure(&mut s, sampler, rng)? {
            Outcome::Up => Some(s),
            _ => None,
        })
    }
}

/// Particles straight from the oven: uniformly random spin direction.
pub fn oven_particle<R: RandomSource + ?Sized>(rng: &mut R) -> SpinState {
    SpinState::new(rng.next_unit() * 2.0 * PI)
}
