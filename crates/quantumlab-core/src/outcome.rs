//! Categorical outcomes of a single simulated trial.

use serde::{Deserialize, Serialize};

/// A sampled result. Each variant belongs to exactly one [`BinaryEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Detected,
    NotDetected,
    Transmitted,
    Reflected,
    Passed,
    Blocked,
    Up,
    Down,
    Red,
    Blue,
}

impl Outcome {
    /// The other outcome of the same event.
    pub fn opposite(self) -> Self {
        match self {
            Self::Detected => Self::NotDetected,
            Self::NotDetected => Self::Detected,
            Self::Transmitted => Self::Reflected,
            Self::Reflected => Self::Transmitted,
            Self::Passed => Self::Blocked,
            Self::Blocked => Self::Passed,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// The event this outcome belongs to.
    pub fn event(self) -> BinaryEvent {
        match self {
            Self::Detected | Self::NotDetected => BinaryEvent::Detection,
            Self::Transmitted | Self::Reflected => BinaryEvent::BeamSplitter,
            Self::Passed | Self::Blocked => BinaryEvent::Polarizer,
            Self::Up | Self::Down => BinaryEvent::Spin,
            Self::Red | Self::Blue => BinaryEvent::Card,
        }
    }

    /// Whether this is the event's primary outcome.
    pub fn is_primary(self) -> bool {
        self.event().primary() == self
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detected => write!(f, "detected"),
            Self::NotDetected => write!(f, "not_detected"),
            Self::Transmitted => write!(f, "transmitted"),
            Self::Reflected => write!(f, "reflected"),
            Self::Passed => write!(f, "passed"),
            Self::Blocked => write!(f, "blocked"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

/// A two-way event. The sampler's `probability_of_primary` refers to
/// [`BinaryEvent::primary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryEvent {
    /// Photon reaches a detector or not.
    Detection,
    /// Photon at a partially silvered surface.
    BeamSplitter,
    /// Photon at a linear polarizer.
    Polarizer,
    /// Spin-1/2 particle at an analyzer.
    Spin,
    /// Red/blue card or coin draw.
    Card,
}

impl BinaryEvent {
    pub fn primary(self) -> Outcome {
        match self {
            Self::Detection => Outcome::Detected,
            Self::BeamSplitter => Outcome::Transmitted,
            Self::Polarizer => Outcome::Passed,
            Self::Spin => Outcome::Up,
            Self::Card => Outcome::Red,
        }
    }

    pub fn secondary(self) -> Outcome {
        self.primary().opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Outcome; 10] = [
        Outcome::Detected,
        Outcome::NotDetected,
        Outcome::Transmitted,
        Outcome::Reflected,
        Outcome::Passed,
        Outcome::Blocked,
        Outcome::Up,
        Outcome::Down,
        Outcome::Red,
        Outcome::Blue,
    ];

    #[test]
    fn test_opposite_is_involution() {
        for o in ALL {
            assert_ne!(o, o.opposite());
            assert_eq!(o, o.opposite().opposite());
            assert_eq!(o.event(), o.opposite().event());
        }
    }

    #[test]
    fn test_exactly_one_primary_per_event() {
        for o in ALL {
            assert_ne!(o.is_primary(), o.opposite().is_primary());
        }
        assert_eq!(BinaryEvent::Spin.secondary(), Outcome::Down);
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::NotDetected.to_string(), "not_detected");
        assert_eq!(Outcome::Up.to_string(), "up");
    }
}
