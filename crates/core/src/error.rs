use crate::CardDefId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("invalid hand size: {0}")]
    InvalidHandSize(usize),
    #[error("round not active")]
    RoundNotActive,
    #[error("no hands left")]
    NoHandsLeft,
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("joker capacity exceeded ({capacity} slots)")]
    JokerCapacityExceeded { capacity: usize },
    #[error("invalid joker index {0}")]
    InvalidJokerIndex(usize),
    #[error("invalid round config: target {target_score}, hands {hands}")]
    InvalidRoundConfig { target_score: i64, hands: u32 },
    #[error("unknown card definition {0:?}")]
    UnknownCardDefinition(CardDefId),
    #[error("unknown joker definition {0}")]
    UnknownJokerDefinition(String),
}
