use serde::{Deserialize, Serialize};

pub use chipmult_core::{CardDef, HandRule, JokerRarity, RoundLimits, ScoringConfig, Suit};

/// On-disk form of a joker definition. Hand requirements are hand ids such as
/// `"pair"` and are resolved when the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JokerDefEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rarity: JokerRarity,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub sell_value: i64,
    #[serde(default)]
    pub plus_chips: i64,
    #[serde(default)]
    pub plus_mult: i64,
    #[serde(default = "default_x_mult")]
    pub x_mult: f64,
    #[serde(default)]
    pub required_hand: Option<String>,
    #[serde(default)]
    pub required_suit: Option<Suit>,
    #[serde(default)]
    pub effect: EffectEntry,
}

fn default_x_mult() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectEntry {
    #[default]
    Flat,
    Scaling {
        #[serde(default)]
        chips_per_trigger: i64,
        #[serde(default)]
        mult_per_trigger: i64,
    },
    PerSuitCard {
        suit: Suit,
        #[serde(default)]
        chips: i64,
        #[serde(default)]
        mult: i64,
    },
}
