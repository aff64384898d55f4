use crate::{CardCatalog, CardDefinition, CardInstance, Rank, Suit};
use serde::{Deserialize, Serialize};

pub const MAX_HAND_SIZE: usize = 5;

/// Poker hand categories, weakest first. The derived ordering is hand strength.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HandType {
    #[default]
    None,
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
    FiveOfAKind,
    FlushHouse,
    FlushFive,
}

impl HandType {
    /// Every type a non-empty hand can be classified as.
    pub const ALL: [HandType; 13] = [
        HandType::HighCard,
        HandType::Pair,
        HandType::TwoPair,
        HandType::ThreeOfAKind,
        HandType::Straight,
        HandType::Flush,
        HandType::FullHouse,
        HandType::FourOfAKind,
        HandType::StraightFlush,
        HandType::RoyalFlush,
        HandType::FiveOfAKind,
        HandType::FlushHouse,
        HandType::FlushFive,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandType::None => "none",
            HandType::HighCard => "high_card",
            HandType::Pair => "pair",
            HandType::TwoPair => "two_pair",
            HandType::ThreeOfAKind => "three_of_a_kind",
            HandType::Straight => "straight",
            HandType::Flush => "flush",
            HandType::FullHouse => "full_house",
            HandType::FourOfAKind => "four_of_a_kind",
            HandType::StraightFlush => "straight_flush",
            HandType::RoyalFlush => "royal_flush",
            HandType::FiveOfAKind => "five_of_a_kind",
            HandType::FlushHouse => "flush_house",
            HandType::FlushFive => "flush_five",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        std::iter::once(HandType::None)
            .chain(HandType::ALL)
            .find(|kind| kind.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HandType::None => "None",
            HandType::HighCard => "High Card",
            HandType::Pair => "Pair",
            HandType::TwoPair => "Two Pair",
            HandType::ThreeOfAKind => "Three of a Kind",
            HandType::Straight => "Straight",
            HandType::Flush => "Flush",
            HandType::FullHouse => "Full House",
            HandType::FourOfAKind => "Four of a Kind",
            HandType::StraightFlush => "Straight Flush",
            HandType::RoyalFlush => "Royal Flush",
            HandType::FiveOfAKind => "Five of a Kind",
            HandType::FlushHouse => "Flush House",
            HandType::FlushFive => "Flush Five",
        }
    }

    /// The hand whose level this hand uses. A royal flush levels with straight flushes.
    pub fn level_kind(self) -> HandType {
        match self {
            HandType::RoyalFlush => HandType::StraightFlush,
            other => other,
        }
    }
}

/// Tallies gathered in one pass over the played cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HandShape {
    pairs: usize,
    three_of_kind: usize,
    four_of_kind: usize,
    five_of_kind: usize,
    is_flush: bool,
    straight_high: Option<u8>,
}

impl HandShape {
    fn tally(cards: &[(Rank, Suit)]) -> Self {
        let mut rank_counts = [0usize; 13];
        let mut suit_counts = [0usize; 4];
        for (rank, suit) in cards {
            rank_counts[(rank.value() - 1) as usize] += 1;
            suit_counts[suit.index()] += 1;
        }

        let mut shape = HandShape {
            is_flush: suit_counts.iter().any(|&count| count >= 5),
            straight_high: straight_high(&rank_counts),
            ..HandShape::default()
        };
        for count in rank_counts {
            match count {
                2 => shape.pairs += 1,
                3 => shape.three_of_kind += 1,
                4 => shape.four_of_kind += 1,
                5.. => shape.five_of_kind += 1,
                _ => {}
            }
        }
        shape
    }

    fn classify(&self) -> HandType {
        let is_straight = self.straight_high.is_some();
        if self.five_of_kind > 0 && self.is_flush {
            HandType::FlushFive
        } else if self.three_of_kind > 0 && self.pairs > 0 && self.is_flush {
            HandType::FlushHouse
        } else if self.five_of_kind > 0 {
            HandType::FiveOfAKind
        } else if self.is_flush && self.straight_high == Some(14) {
            HandType::RoyalFlush
        } else if self.is_flush && is_straight {
            HandType::StraightFlush
        } else if self.four_of_kind > 0 {
            HandType::FourOfAKind
        } else if self.three_of_kind > 0 && self.pairs > 0 {
            HandType::FullHouse
        } else if self.is_flush {
            HandType::Flush
        } else if is_straight {
            HandType::Straight
        } else if self.three_of_kind > 0 {
            HandType::ThreeOfAKind
        } else if self.pairs >= 2 {
            HandType::TwoPair
        } else if self.pairs == 1 {
            HandType::Pair
        } else {
            HandType::HighCard
        }
    }
}

/// Highest card of a five-card run. Ten through ace reports 14; the wheel
/// (ace through five) is an ordinary ace-low run and reports 5.
fn straight_high(rank_counts: &[usize; 13]) -> Option<u8> {
    let present = |value: u8| rank_counts[(value - 1) as usize] > 0;
    if present(1) && (10..=13).all(present) {
        return Some(14);
    }
    (5..=13u8)
        .rev()
        .find(|&high| (high - 4..=high).all(present))
}

/// Classifies bare rank/suit pairs. Empty or oversized input is [`HandType::None`].
pub fn classify(cards: &[(Rank, Suit)]) -> HandType {
    if cards.is_empty() || cards.len() > MAX_HAND_SIZE {
        return HandType::None;
    }
    HandShape::tally(cards).classify()
}

pub fn evaluate_hand(cards: &[CardInstance], catalog: &CardCatalog) -> HandType {
    ScoringHand::new(catalog).evaluate(cards)
}

/// Hand classifier that keeps the result of its last evaluation for inspection.
#[derive(Debug, Clone)]
pub struct ScoringHand<'a> {
    catalog: &'a CardCatalog,
    hand_type: HandType,
    scoring_indices: Vec<usize>,
}

impl<'a> ScoringHand<'a> {
    pub fn new(catalog: &'a CardCatalog) -> Self {
        Self {
            catalog,
            hand_type: HandType::None,
            scoring_indices: Vec::new(),
        }
    }

    /// Classifies `cards`. Cards whose definition is not in the catalog are ignored
    /// and never reported as scoring.
    pub fn evaluate(&mut self, cards: &[CardInstance]) -> HandType {
        self.scoring_indices.clear();
        if cards.len() > MAX_HAND_SIZE {
            self.hand_type = HandType::None;
            return self.hand_type;
        }
        let mut known = Vec::with_capacity(cards.len());
        let mut resolved: Vec<(Rank, Suit)> = Vec::with_capacity(cards.len());
        for (idx, card) in cards.iter().enumerate() {
            if let Some(def) = self.catalog.resolve(card) {
                known.push(idx);
                resolved.push((def.rank(), def.suit()));
            }
        }
        self.hand_type = classify(&resolved);
        if self.hand_type != HandType::None {
            self.scoring_indices = find_scoring_cards(&known, self.hand_type);
        }
        self.hand_type
    }

    pub fn hand_type(&self) -> HandType {
        self.hand_type
    }

    /// Indices into the last evaluated input of the cards that score.
    pub fn scoring_indices(&self) -> &[usize] {
        &self.scoring_indices
    }
}

/// Every classified card scores, whatever formed the winning combination.
/// `candidates` are the input indices that took part in classification.
pub fn find_scoring_cards(candidates: &[usize], _hand: HandType) -> Vec<usize> {
    candidates.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;
    use Suit::*;

    #[test]
    fn empty_and_oversized_hands_are_none() {
        assert_eq!(classify(&[]), HandType::None);
        let six = [
            (Two, Spades),
            (Three, Spades),
            (Four, Spades),
            (Five, Spades),
            (Six, Spades),
            (Seven, Spades),
        ];
        assert_eq!(classify(&six), HandType::None);
    }

    #[test]
    fn wheel_is_a_straight_but_not_royal() {
        let wheel = [
            (Ace, Hearts),
            (Two, Hearts),
            (Three, Hearts),
            (Four, Hearts),
            (Five, Hearts),
        ];
        assert_eq!(classify(&wheel), HandType::StraightFlush);
        let mut counts = [0usize; 13];
        for (rank, _) in wheel {
            counts[(rank.value() - 1) as usize] += 1;
        }
        assert_eq!(straight_high(&counts), Some(5));
    }

    #[test]
    fn ace_high_offsuit_run_is_plain_straight() {
        let hand = [
            (Ten, Hearts),
            (Jack, Spades),
            (Queen, Hearts),
            (King, Hearts),
            (Ace, Hearts),
        ];
        assert_eq!(classify(&hand), HandType::Straight);
    }

    #[test]
    fn wrap_around_is_not_a_straight() {
        let hand = [
            (Queen, Hearts),
            (King, Spades),
            (Ace, Hearts),
            (Two, Clubs),
            (Three, Hearts),
        ];
        assert_eq!(classify(&hand), HandType::HighCard);
    }

    #[test]
    fn short_hands_classify_by_rank_groups() {
        assert_eq!(classify(&[(King, Spades)]), HandType::HighCard);
        assert_eq!(classify(&[(King, Spades), (King, Hearts)]), HandType::Pair);
        assert_eq!(
            classify(&[(King, Spades), (King, Hearts), (King, Clubs), (King, Diamonds)]),
            HandType::FourOfAKind
        );
    }

    #[test]
    fn hand_ids_round_trip() {
        for kind in HandType::ALL {
            assert_eq!(HandType::from_id(kind.id()), Some(kind));
        }
        assert_eq!(HandType::from_id("nonsense"), None);
    }

    #[test]
    fn royal_flush_levels_as_straight_flush() {
        assert_eq!(HandType::RoyalFlush.level_kind(), HandType::StraightFlush);
        assert_eq!(HandType::Pair.level_kind(), HandType::Pair);
    }
}
