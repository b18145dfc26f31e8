//! Single-draw outcome sampling.
//!
//! A probability outside `[0, 1]` is rejected rather than clamped: it means an
//! upstream amplitude was not normalized, and clamping would hide that.

use crate::error::{LabError, Result, check_probability};
use crate::outcome::{BinaryEvent, Outcome};
use crate::random::RandomSource;

/// Allowed deviation of a weighted set's total from 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Draws discrete outcomes from probabilities. Stateless: all randomness
/// comes from the injected [`RandomSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StochasticOutcomeSampler;

impl StochasticOutcomeSampler {
    pub fn new() -> Self {
        Self
    }

    /// Draw `event.primary()` with probability `probability_of_primary`,
    /// otherwise `event.secondary()`. Consumes exactly one draw.
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        probability_of_primary: f64,
        event: BinaryEvent,
        rng: &mut R,
    ) -> Result<Outcome> {
        let p = check_probability(probability_of_primary)?;
        let u = rng.next_unit();
        Ok(if u < p {
            event.primary()
        } else {
            event.secondary()
        })
    }

    /// Draw one item from a weighted set whose weights sum to 1.
    /// Consumes exactly one draw.
    pub fn sample_weighted<T: Copy, R: RandomSource + ?Sized>(
        &self,
        weights: &[(T, f64)],
        rng: &mut R,
    ) -> Result<T> {
        let (last, _) = *weights.last().ok_or(LabError::EmptyWeights)?;
        let mut sum = 0.0;
        for &(_, w) in weights {
            check_probability(w)?;
            sum += w;
        }
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(LabError::WeightsNotNormalized { sum });
        }

        let u = rng.next_unit();
        let mut acc = 0.0;
        for &(item, w) in weights {
            acc += w;
            if u < acc {
                return Ok(item);
            }
        }
        // Rounding left `acc` a hair under 1; the tail belongs to the last
        // item with non-zero weight.
        Ok(weights
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|&(item, _)| item)
            .unwrap_or(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};

    #[test]
    fn test_sample_threshold() {
        let s = StochasticOutcomeSampler::new();
        let mut rng = ScriptedRandom::new(vec![0.29, 0.3, 0.31]);
        assert_eq!(s.sample(0.3, BinaryEvent::Polarizer, &mut rng).unwrap(), Outcome::Passed);
        assert_eq!(s.sample(0.3, BinaryEvent::Polarizer, &mut rng).unwrap(), Outcome::Blocked);
        assert_eq!(s.sample(0.3, BinaryEvent::Polarizer, &mut rng).unwrap(), Outcome::Blocked);
    }

    #[test]
    fn test_certain_and_impossible() {
        let s = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(3);
        for _ in 0..1000 {
            assert_eq!(s.sample(1.0, BinaryEvent::Spin, &mut rng).unwrap(), Outcome::Up);
            assert_eq!(s.sample(0.0, BinaryEvent::Spin, &mut rng).unwrap(), Outcome::Down);
        }
    }

    #[test]
    fn test_invalid_probability_not_clamped() {
        let s = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(3);
        for bad in [-0.01, 1.000001, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                s.sample(bad, BinaryEvent::Detection, &mut rng),
                Err(LabError::InvalidProbability { .. })
            ));
        }
        // Rejected calls consume no draws.
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_sample_is_deterministic_per_seed() {
        let s = StochasticOutcomeSampler::new();
        let run = |seed| {
            let mut rng = SeededRandom::from_seed(seed);
            (0..500)
                .map(|_| s.sample(0.37, BinaryEvent::BeamSplitter, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn test_sample_frequency_converges() {
        let s = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(2024);
        let n = 100_000;
        let hits = (0..n)
            .filter(|_| {
                s.sample(0.25, BinaryEvent::Detection, &mut rng).unwrap() == Outcome::Detected
            })
            .count();
        let f = hits as f64 / n as f64;
        assert!((f - 0.25).abs() < 0.01, "frequency {f}");
    }

    #[test]
    fn test_weighted_selection() {
        let s = StochasticOutcomeSampler::new();
        let weights = [('a', 0.2), ('b', 0.5), ('c', 0.3)];
        let mut rng = ScriptedRandom::new(vec![0.1, 0.25, 0.65, 0.75, 0.99]);
        let got: Vec<char> = (0..5)
            .map(|_| s.sample_weighted(&weights, &mut rng).unwrap())
            .collect();
        assert_eq!(got, vec!['a', 'b', 'b', 'c', 'c']);
    }

    #[test]
    fn test_weighted_skips_zero_weight_tail() {
        let s = StochasticOutcomeSampler::new();
        let weights = [('a', 0.1), ('b', 0.9), ('z', 0.0)];
        let mut rng = ScriptedRandom::new(vec![0.999_999_999_9]);
        assert_eq!(s.sample_weighted(&weights, &mut rng).unwrap(), 'b');
    }

    #[test]
    fn test_weighted_errors() {
        let s = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(1);
        let empty: [(u8, f64); 0] = [];
        assert!(matches!(
            s.sample_weighted(&empty, &mut rng),
            Err(LabError::EmptyWeights)
        ));
        assert!(matches!(
            s.sample_weighted(&[(1, 0.5), (2, 0.4)], &mut rng),
            Err(LabError::WeightsNotNormalized { .. })
        ));
        assert!(matches!(
            s.sample_weighted(&[(1, 1.5), (2, -0.5)], &mut rng),
            Err(LabError::InvalidProbability { .. })
        ));
        // Within tolerance is accepted.
        assert!(s.sample_weighted(&[(1, 0.5), (2, 0.5 + 1e-12)], &mut rng).is_ok());
    }
}
