//! Phase clocks and their vector sum.
//!
//! A [`PhaseClock`] is one path's contribution to an event: an arrow of length
//! `amplitude_scale` pointing at `phase_angle`. Clocks are computed fresh per
//! configuration and never mutated in place. The [`ResultantAmplitude`] is the
//! vector sum of every clock contributing to the same event.

use std::f64::consts::TAU;

use num_complex::Complex64;
use serde::Serialize;

/// One path's amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseClock {
    /// Radians, unbounded (not reduced mod 2π).
    pub phase_angle: f64,
    pub amplitude_scale: f64,
}

impl PhaseClock {
    pub fn new(phase_angle: f64, amplitude_scale: f64) -> Self {
        Self {
            phase_angle,
            amplitude_scale,
        }
    }

    /// `amplitude_scale · (cos φ, sin φ)`.
    pub fn to_complex(&self) -> Complex64 {
        Complex64::from_polar(self.amplitude_scale, self.phase_angle)
    }

    /// Clock hand position in `[0, 1)` turns, for display.
    pub fn turns(&self) -> f64 {
        self.phase_angle.rem_euclid(TAU) / TAU
    }

    /// A new clock turned by `delta` radians.
    pub fn rotated(&self, delta: f64) -> Self {
        Self::new(self.phase_angle + delta, self.amplitude_scale)
    }
}

/// Vector sum of all clocks for one event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ResultantAmplitude {
    pub real: f64,
    pub imag: f64,
}

impl ResultantAmplitude {
    pub const ZERO: Self = Self {
        real: 0.0,
        imag: 0.0,
    };

    pub fn from_complex(z: Complex64) -> Self {
        Self {
            real: z.re,
            imag: z.im,
        }
    }

    /// Sum a set of clocks. An empty set sums to zero.
    pub fn sum<'a>(clocks: impl IntoIterator<Item = &'a PhaseClock>) -> Self {
        let z: Complex64 = clocks.into_iter().map(PhaseClock::to_complex).sum();
        Self::from_complex(z)
    }

    pub fn to_complex(&self) -> Complex64 {
        Complex64::new(self.real, self.imag)
    }

    pub fn magnitude(&self) -> f64 {
        self.real.hypot(self.imag)
    }

    /// Direction of the resultant arrow in radians.
    pub fn angle(&self) -> f64 {
        self.imag.atan2(self.real)
    }

    /// `magnitude²`, for paths that carry their own amplitude scale.
    pub fn probability(&self) -> f64 {
        self.real * self.real + self.imag * self.imag
    }

    /// `(magnitude / n)²`, for `n` equal-weight unit clocks. `n == 0` yields 0.
    pub fn normalized_probability(&self, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let m = self.magnitude() / n as f64;
        m * m
    }
}

impl std::ops::Add for ResultantAmplitude {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            real: self.real + rhs.real,
            imag: self.imag + rhs.imag,
        }
    }
}
