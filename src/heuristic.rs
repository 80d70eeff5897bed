use crate::board::*;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scores a position from one player's point of view.
///
/// Implementations hold no per-call state, so a single evaluator can be
/// shared between threads scoring different boards.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, player: Player, board: &dyn Grid) -> f32;

    fn name(&self) -> &str;
}

/// Placeholder evaluator: every position is neutral.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEvaluator;

impl Evaluator for NullEvaluator {
    fn evaluate(&self, _player: Player, _board: &dyn Grid) -> f32 {
        0.0
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Compares the number of tokens of `player` and its opponent.
///
/// Only the direction of the material difference is reported:
/// `1.0` if `player` has more tokens, `-1.0` if fewer, `0.0` on a tie.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenCountEvaluator;

impl Evaluator for TokenCountEvaluator {
    fn evaluate(&self, player: Player, board: &dyn Grid) -> f32 {
        let player_count = count_tokens(player, board);
        let opponent_count = count_tokens(player.opponent(), board);
        if player_count > opponent_count {
            1.0
        } else if player_count < opponent_count {
            -1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "token-count"
    }
}

/// Number of squares holding `player`'s token. Scans all 64 squares.
pub fn count_tokens(player: Player, board: &dyn Grid) -> u32 {
    let token = player.token();
    let mut count = 0;
    for square in Square::all() {
        if board.content(square) == token {
            count += 1;
        }
    }
    count
}

/// `NullEvaluator` as a plain function.
pub fn null_heuristic(player: Player, board: &dyn Grid) -> f32 {
    NullEvaluator.evaluate(player, board)
}

/// `TokenCountEvaluator` as a plain function.
pub fn token_count_heuristic(player: Player, board: &dyn Grid) -> f32 {
    TokenCountEvaluator.evaluate(player, board)
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown heuristic '{0}'")]
pub struct UnknownHeuristicError(pub String);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum HeuristicKind {
    Null,
    #[default]
    TokenCount,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            HeuristicKind::Null => Box::new(NullEvaluator),
            HeuristicKind::TokenCount => Box::new(TokenCountEvaluator),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "null" | "none" => Ok(HeuristicKind::Null),
            "token-count" | "token_count" | "tokens" => Ok(HeuristicKind::TokenCount),
            _ => Err(UnknownHeuristicError(s.to_string())),
        }
    }
}

impl TryFrom<String> for HeuristicKind {
    type Error = UnknownHeuristicError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeuristicKind::Null => write!(f, "null"),
            HeuristicKind::TokenCount => write!(f, "token-count"),
        }
    }
}
