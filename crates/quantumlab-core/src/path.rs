//! Alternative paths and the interface phase rules.
//!
//! Reflection rule: reflecting off a medium of *higher* refractive index adds
//! a half-turn (π) to the clock. Reflecting off a lower-index medium, which
//! includes reflecting from inside glass back toward air, adds nothing.
//! Transmission never adds an offset.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Tolerance for junction unitarity (`Σ scale² == 1`).
pub const UNITARITY_TOLERANCE: f64 = 1e-9;

/// An optical medium, identified by its refractive index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    pub refractive_index: f64,
}

impl Medium {
    pub const VACUUM: Self = Self::new(1.0);
    pub const AIR: Self = Self::new(1.0003);
    pub const WATER: Self = Self::new(1.333);
    pub const GLASS: Self = Self::new(1.5);
    /// Metal mirror: denser than anything, so reflections always turn π.
    pub const MIRROR: Self = Self::new(f64::INFINITY);

    pub const fn new(refractive_index: f64) -> Self {
        Self { refractive_index }
    }
}

/// Phase offset picked up when light travelling in `from` reflects off `to`.
pub fn reflection_offset(from: Medium, to: Medium) -> f64 {
    if to.refractive_index > from.refractive_index {
        PI
    } else {
        0.0
    }
}

/// One distinguishable way an event can happen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Optical path length, arbitrary units.
    pub length: f64,
    /// Extra phase from interface rules.
    pub medium_phase_offset: f64,
    /// Attenuation in `(0, 1]`, e.g. `√R` or `√T`.
    pub amplitude_scale: f64,
}

impl Path {
    /// Unit-amplitude path with no interface offset.
    pub fn new(length: f64) -> Self {
        Self {
            length,
            medium_phase_offset: 0.0,
            amplitude_scale: 1.0,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.medium_phase_offset = offset;
        self
    }

    /// Set the attenuation. Rejects scales outside `(0, 1]`.
    pub fn with_scale(mut self, scale: f64) -> Result<Self> {
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(LabError::InvalidAmplitudeScale { value: scale });
        }
        self.amplitude_scale = scale;
        Ok(self)
    }

    /// Append a transmission through a surface with transmittance `t`.
    ///
    /// A transmittance of exactly 0 blocks the path and yields `Ok(None)`.
    pub fn transmit(self, transmittance: f64) -> Result<Option<Self>> {
        crate::error::check_probability(transmittance)?;
        if transmittance == 0.0 {
            return Ok(None);
        }
        let scale = self.amplitude_scale * transmittance.sqrt();
        Ok(Some(Self {
            amplitude_scale: scale,
            ..self
        }))
    }

    /// Append a reflection with reflectance `r` off `to`, travelling in `from`.
    ///
    /// A reflectance of exactly 0 yields `Ok(None)`.
    pub fn reflect(self, reflectance: f64, from: Medium, to: Medium) -> Result<Option<Self>> {
        crate::error::check_probability(reflectance)?;
        if reflectance == 0.0 {
            return Ok(None);
        }
        Ok(Some(Self {
            medium_phase_offset: self.medium_phase_offset + reflection_offset(from, to),
            amplitude_scale: self.amplitude_scale * reflectance.sqrt(),
            ..self
        }))
    }

    /// Extend the geometric length by `extra` travelled in `medium`.
    pub fn travel(mut self, extra: f64, medium: Medium) -> Self {
        self.length += extra * medium.refractive_index;
        self
    }
}

/// Check that mutually exclusive first-order alternatives at one junction
/// conserve probability (`Σ amplitude_scale² == 1`).
pub fn check_junction(alternatives: &[Path]) -> Result<()> {
    let sum: f64 = alternatives
        .iter()
        .map(|p| p.amplitude_scale * p.amplitude_scale)
        .sum();
    if (sum - 1.0).abs() > UNITARITY_TOLERANCE {
        return Err(LabError::NonUnitaryJunction { sum });
    }
    Ok(())
}
