use crate::{HandRule, HandType, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum RuleEffect {
    AddChips(i64),
    AddMult(i64),
    MultiplyMult(f64),
}

impl fmt::Display for RuleEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleEffect::AddChips(value) => write!(f, "{value:+} chips"),
            RuleEffect::AddMult(value) => write!(f, "{value:+} mult"),
            RuleEffect::MultiplyMult(value) => write!(f, "x{value} mult"),
        }
    }
}

/// Running totals of a scoring pass at one point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreSnapshot {
    pub chips: i64,
    pub mult: i64,
    pub x_mult: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreTraceStep {
    pub source: String,
    pub effect: RuleEffect,
    pub before: ScoreSnapshot,
    pub after: ScoreSnapshot,
}

/// Supplies per-hand base values, names and levels to the scoring pipeline.
pub trait ScoringRules: fmt::Debug {
    /// Base `(chips, mult)` for `hand` at its current level.
    fn base_values(&self, hand: HandType) -> (i64, i64);

    fn display_name(&self, hand: HandType) -> &str {
        hand.display_name()
    }

    fn level(&self, _hand: HandType) -> u32 {
        1
    }

    /// Raises the level of `hand` and returns the new level. Rules without
    /// level tracking keep every hand at its current level.
    fn level_up(&mut self, hand: HandType, _amount: u32) -> u32 {
        self.level(hand)
    }
}

/// The built-in table, every hand at level 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScoringRules;

impl ScoringRules for DefaultScoringRules {
    fn base_values(&self, hand: HandType) -> (i64, i64) {
        default_hand_base(hand)
    }
}

/// Config-driven rules with per-hand levels.
#[derive(Debug, Clone, Default)]
pub struct ScoreTables {
    hand_rules: HashMap<HandType, HandRule>,
    hand_levels: HashMap<HandType, u32>,
}

impl ScoreTables {
    pub fn from_config(config: &ScoringConfig) -> Self {
        let mut hand_rules = HashMap::new();
        for rule in &config.hands {
            match HandType::from_id(&rule.id) {
                Some(kind) => {
                    hand_rules.insert(kind, rule.clone());
                }
                None => tracing::warn!(id = %rule.id, "ignoring hand rule with unknown id"),
            }
        }
        Self {
            hand_rules,
            hand_levels: HashMap::new(),
        }
    }

    pub fn hand_base(&self, kind: HandType) -> (i64, i64) {
        self.hand_rules
            .get(&kind)
            .map(|rule| (rule.base_chips, rule.base_mult))
            .unwrap_or_else(|| default_hand_base(kind))
    }

    pub fn hand_base_for_level(&self, kind: HandType, level: u32) -> (i64, i64) {
        let (base_chips, base_mult) = self.hand_base(kind);
        if level <= 1 {
            return (base_chips, base_mult);
        }
        let (level_chips, level_mult) = self
            .hand_rules
            .get(&kind)
            .map(|rule| (rule.level_chips, rule.level_mult))
            .unwrap_or_else(|| default_level_step(kind));
        let extra = (level - 1) as i64;
        (
            base_chips.saturating_add(level_chips.saturating_mul(extra)),
            base_mult.saturating_add(level_mult.saturating_mul(extra)),
        )
    }

    pub fn set_level(&mut self, kind: HandType, level: u32) {
        self.hand_levels.insert(kind.level_kind(), level.max(1));
    }
}

impl ScoringRules for ScoreTables {
    fn base_values(&self, hand: HandType) -> (i64, i64) {
        self.hand_base_for_level(hand, self.level(hand))
    }

    fn display_name(&self, hand: HandType) -> &str {
        self.hand_rules
            .get(&hand)
            .map(|rule| rule.display_name.as_str())
            .unwrap_or_else(|| hand.display_name())
    }

    fn level(&self, hand: HandType) -> u32 {
        self.hand_levels
            .get(&hand.level_kind())
            .copied()
            .unwrap_or(1)
    }

    fn level_up(&mut self, hand: HandType, amount: u32) -> u32 {
        let level = self.hand_levels.entry(hand.level_kind()).or_insert(1);
        *level = level.saturating_add(amount);
        *level
    }
}

pub fn default_hand_base(kind: HandType) -> (i64, i64) {
    match kind {
        HandType::None => (0, 0),
        HandType::HighCard => (5, 1),
        HandType::Pair => (10, 2),
        HandType::TwoPair => (20, 2),
        HandType::ThreeOfAKind => (30, 3),
        HandType::Straight => (30, 4),
        HandType::Flush => (35, 4),
        HandType::FullHouse => (40, 4),
        HandType::FourOfAKind => (60, 7),
        HandType::StraightFlush | HandType::RoyalFlush => (100, 8),
        HandType::FiveOfAKind => (120, 12),
        HandType::FlushHouse => (140, 14),
        HandType::FlushFive => (160, 16),
    }
}

/// Chips and mult gained per level when the config gives no step.
pub fn default_level_step(kind: HandType) -> (i64, i64) {
    match kind {
        HandType::None => (0, 0),
        HandType::HighCard => (10, 1),
        HandType::Pair => (15, 1),
        HandType::TwoPair => (20, 1),
        HandType::ThreeOfAKind => (20, 2),
        HandType::Straight => (30, 3),
        HandType::Flush => (15, 2),
        HandType::FullHouse => (25, 2),
        HandType::FourOfAKind => (30, 3),
        HandType::StraightFlush | HandType::RoyalFlush => (40, 4),
        HandType::FiveOfAKind => (35, 3),
        HandType::FlushHouse => (40, 4),
        HandType::FlushFive => (50, 3),
    }
}
