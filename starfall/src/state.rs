use std::fmt;

use serde::{Deserialize, Serialize};

/// Points awarded so far. Only ever grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Self = Self(0);

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Score and game-over flag for one scene instance.
///
/// Fields are private so the only ways to change them are the two
/// transitions below: the score only grows and the flag only goes from
/// `false` to `true`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    score: Score,
    game_over: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Add `increment` points and return the new score.
    pub fn award(&mut self, increment: u32) -> Score {
        self.score = Score(self.score.0.saturating_add(increment));
        self.score
    }

    /// Mark the game as over. Returns `true` only on the call that flips
    /// the flag.
    pub fn end(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_running() {
        let state = GameState::new();
        assert_eq!(state.score(), Score::ZERO);
        assert!(!state.is_game_over());
    }

    #[test]
    fn award_accumulates_monotonically() {
        let mut state = GameState::new();
        let mut last = state.score();
        for n in 1..=25 {
            let score = state.award(10);
            assert!(score >= last);
            assert_eq!(score.value(), 10 * n);
            last = score;
        }
    }

    #[test]
    fn end_flips_only_once() {
        let mut state = GameState::new();
        assert!(state.end());
        assert!(!state.end());
        assert!(!state.end());
        assert!(state.is_game_over());
    }

    #[test]
    fn score_saturates_instead_of_wrapping() {
        let mut state = GameState::new();
        state.award(u32::MAX);
        assert_eq!(state.award(10).value(), u32::MAX);
    }
}
