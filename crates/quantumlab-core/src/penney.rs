//! Penney's game with red/blue cards.
//!
//! Two players each pick a three-card colour pattern; fair cards are turned
//! over until one pattern shows up as the last three cards. For every first
//! pick there is a second pick that wins at least 2/3 of the time.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::outcome::{BinaryEvent, Outcome};
use crate::random::RandomSource;
use crate::sampler::StochasticOutcomeSampler;

/// Three card colours, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern([Outcome; 3]);

impl Pattern {
    pub fn new(cards: [Outcome; 3]) -> Result<Self> {
        if let Some(bad) = cards.iter().find(|c| c.event() != BinaryEvent::Card) {
            return Err(LabError::InvalidPattern(format!("{bad} is not a card colour")));
        }
        Ok(Self(cards))
    }

    pub fn cards(&self) -> [Outcome; 3] {
        self.0
    }

    /// Conway's reply to `self`: `(¬x2, x1, x2)`.
    pub fn best_response(&self) -> Self {
        let [x1, x2, _] = self.0;
        Self([x2.opposite(), x1, x2])
    }

    /// Whether the last three cards of `window` spell this pattern.
    fn matches(&self, window: &[Outcome; 3]) -> bool {
        &self.0 == window
    }
}

impl std::str::FromStr for Pattern {
    type Err = LabError;

    /// Parses strings like `"RRB"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let cards: Vec<Outcome> = s
            .trim()
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'R' => Ok(Outcome::Red),
                'B' => Ok(Outcome::Blue),
                other => Err(LabError::InvalidPattern(format!(
                    "unexpected card '{other}' in \"{s}\""
                ))),
            })
            .collect::<Result<_>>()?;
        let cards: [Outcome; 3] = cards
            .try_into()
            .map_err(|_| LabError::InvalidPattern(format!("\"{s}\" is not three cards long")))?;
        Ok(Self(cards))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.0 {
            let ch = if c == Outcome::Red { 'R' } else { 'B' };
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Conway correlation number: Σ 2^(k−1) over every k where the last k cards
/// of `a` equal the first k cards of `b`.
fn correlation(a: &Pattern, b: &Pattern) -> u32 {
    (1..=3)
        .filter(|&k| a.0[3 - k..] == b.0[..k])
        .map(|k| 1 << (k - 1))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenneyResult {
    pub winner: Player,
    /// Cards turned over, at least 3.
    pub draws: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenneyGame {
    pub first: Pattern,
    pub second: Pattern,
}

impl PenneyGame {
    pub fn new(first: Pattern, second: Pattern) -> Result<Self> {
        if first == second {
            return Err(LabError::InvalidPattern(format!(
                "both players chose {first}"
            )));
        }
        Ok(Self { first, second })
    }

    /// Second player answers with Conway's best response.
    pub fn against_best_response(first: Pattern) -> Self {
        Self {
            first,
            second: first.best_response(),
        }
    }

    /// Exact probability that the second player's pattern appears first.
    pub fn second_player_win_probability(&self) -> f64 {
        let (a, b) = (&self.first, &self.second);
        let odds_second = (correlation(a, a) - correlation(a, b)) as f64;
        let odds_first = (correlation(b, b) - correlation(b, a)) as f64;
        odds_second / (odds_second + odds_first)
    }

    /// Turn fair cards until a pattern appears. One draw per card.
    pub fn play<R: RandomSource + ?Sized>(
        &self,
        sampler: &StochasticOutcomeSampler,
        rng: &mut R,
    ) -> Result<PenneyResult> {
        let mut window = [Outcome::Red; 3];
        let mut draws = 0u32;
        loop {
            let card = sampler.sample(0.5, BinaryEvent::Card, rng)?;
            window = [window[1], window[2], card];
            draws += 1;
            if draws < 3 {
                continue;
            }
            if self.first.matches(&window) {
                return Ok(PenneyResult {
                    winner: Player::First,
                    draws,
                });
            }
            if self.second.matches(&window) {
                return Ok(PenneyResult {
                    winner: Player::Second,
                    draws,
                });
            }
        }
    }
}
