use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn index(self) -> usize {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Clubs => 2,
            Suit::Diamonds => 3,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Ace-low ordinal in `1..=13`.
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    /// Ordinal with the ace promoted to 14.
    pub fn high_value(self) -> u8 {
        match self {
            Rank::Ace => 14,
            other => other.value(),
        }
    }

    pub fn chip_value(self) -> i64 {
        match self {
            Rank::Ace => 11,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.value() as i64,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Bit set of card keywords. Permanent keywords come from the definition,
/// temporary ones live on the instance for a single combat.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Keywords(u32);

impl Keywords {
    pub const NONE: Keywords = Keywords(0);
    pub const INNATE: Keywords = Keywords(1 << 0);
    pub const RETAIN: Keywords = Keywords(1 << 1);
    pub const EXHAUST: Keywords = Keywords(1 << 2);
    pub const ETHEREAL: Keywords = Keywords(1 << 3);
    pub const UNPLAYABLE: Keywords = Keywords(1 << 4);

    pub const fn from_bits(bits: u32) -> Self {
        Keywords(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Keywords) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Keywords) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Keywords) {
        self.0 &= !other.0;
    }
}

impl BitOr for Keywords {
    type Output = Keywords;

    fn bitor(self, rhs: Keywords) -> Keywords {
        Keywords(self.0 | rhs.0)
    }
}

impl BitOrAssign for Keywords {
    fn bitor_assign(&mut self, rhs: Keywords) {
        self.0 |= rhs.0;
    }
}

/// Situational inputs to card cost calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostContext {
    /// Flat adjustment applied to every card, e.g. from a global discount.
    pub global_modifier: i64,
}

/// Read-only capability of a card definition. The engine never needs more than
/// this from whatever authors the card data.
pub trait CardDefinition {
    fn suit(&self) -> Suit;
    fn rank(&self) -> Rank;
    fn keywords(&self) -> Keywords;
    fn chip_value(&self) -> i64;
    fn calculate_cost(&self, ctx: &CostContext) -> i64;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardDef {
    pub id: String,
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default)]
    pub keywords: Keywords,
    #[serde(default)]
    pub chips: Option<i64>,
    #[serde(default)]
    pub base_cost: i64,
}

impl CardDef {
    pub fn standard(suit: Suit, rank: Rank) -> Self {
        Self {
            id: standard_card_id(suit, rank),
            suit,
            rank,
            keywords: Keywords::NONE,
            chips: None,
            base_cost: 0,
        }
    }
}

impl CardDefinition for CardDef {
    fn suit(&self) -> Suit {
        self.suit
    }

    fn rank(&self) -> Rank {
        self.rank
    }

    fn keywords(&self) -> Keywords {
        self.keywords
    }

    fn chip_value(&self) -> i64 {
        self.chips.unwrap_or_else(|| self.rank.chip_value())
    }

    fn calculate_cost(&self, ctx: &CostContext) -> i64 {
        self.base_cost.saturating_add(ctx.global_modifier)
    }
}

impl fmt::Display for CardDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

pub fn standard_card_id(suit: Suit, rank: Rank) -> String {
    format!("{}_{:?}", rank.label(), suit).to_lowercase()
}

/// Handle into a [`CardCatalog`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardDefId(pub u32);

/// Arena of card definitions. Instances refer to entries by [`CardDefId`].
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    defs: Vec<CardDef>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the 52 standard cards, suit-major in [`Suit::ALL`] order.
    pub fn standard52() -> Self {
        let mut catalog = Self::new();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                catalog.insert(CardDef::standard(suit, rank));
            }
        }
        catalog
    }

    pub fn insert(&mut self, def: CardDef) -> CardDefId {
        let id = CardDefId(self.defs.len() as u32);
        self.defs.push(def);
        id
    }

    pub fn get(&self, id: CardDefId) -> Option<&CardDef> {
        self.defs.get(id.0 as usize)
    }

    pub fn find(&self, key: &str) -> Option<CardDefId> {
        self.defs
            .iter()
            .position(|def| def.id == key)
            .map(|idx| CardDefId(idx as u32))
    }

    pub fn find_standard(&self, suit: Suit, rank: Rank) -> Option<CardDefId> {
        self.defs
            .iter()
            .position(|def| def.suit == suit && def.rank == rank)
            .map(|idx| CardDefId(idx as u32))
    }

    pub fn ids(&self) -> impl Iterator<Item = CardDefId> + '_ {
        (0..self.defs.len()).map(|idx| CardDefId(idx as u32))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
