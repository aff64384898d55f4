use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandRule {
    pub id: String,
    pub display_name: String,
    pub base_chips: i64,
    pub base_mult: i64,
    #[serde(default)]
    pub level_chips: i64,
    #[serde(default)]
    pub level_mult: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoundLimits {
    pub max_hands: u32,
    pub max_discards: u32,
    pub max_jokers: usize,
    pub max_hand_size: usize,
}

impl Default for RoundLimits {
    fn default() -> Self {
        Self {
            max_hands: 4,
            max_discards: 3,
            max_jokers: 5,
            max_hand_size: crate::MAX_HAND_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub hands: Vec<HandRule>,
    #[serde(default)]
    pub limits: RoundLimits,
}

impl ScoringConfig {
    pub fn hand_rule(&self, id: &str) -> Option<&HandRule> {
        self.hands.iter().find(|rule| rule.id == id)
    }
}
