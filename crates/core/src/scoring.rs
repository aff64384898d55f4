use crate::{HandType, Rank, RuleEffect, ScoreSnapshot, ScoreTraceStep, Suit};
use serde::{Deserialize, Serialize};

/// A played card resolved against its definition for one scoring pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoredCard {
    pub instance_id: u64,
    pub suit: Suit,
    pub rank: Rank,
    pub chips: i64,
}

/// Accumulator for exactly one hand's scoring pass.
///
/// Chips and mult each have a base channel (set once from the rules) and a
/// bonus channel (added to by cards and jokers). `x_mult` composes
/// multiplicatively and is applied on top of the summed mult.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringContext {
    hand_type: HandType,
    scoring_cards: Vec<ScoredCard>,
    base_chips: i64,
    bonus_chips: i64,
    base_mult: i64,
    bonus_mult: i64,
    x_mult: f64,
    active_jokers: Vec<u64>,
    triggered_cards: Vec<ScoredCard>,
    trace: Vec<ScoreTraceStep>,
}

impl Default for ScoringContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringContext {
    pub fn new() -> Self {
        Self {
            hand_type: HandType::None,
            scoring_cards: Vec::new(),
            base_chips: 0,
            bonus_chips: 0,
            base_mult: 0,
            bonus_mult: 0,
            x_mult: 1.0,
            active_jokers: Vec::new(),
            triggered_cards: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.hand_type = HandType::None;
        self.scoring_cards.clear();
        self.base_chips = 0;
        self.bonus_chips = 0;
        self.base_mult = 0;
        self.bonus_mult = 0;
        self.x_mult = 1.0;
        self.active_jokers.clear();
        self.triggered_cards.clear();
        self.trace.clear();
    }

    pub fn set_hand_type(&mut self, hand_type: HandType) {
        self.hand_type = hand_type;
    }

    pub fn set_scoring_cards(&mut self, cards: Vec<ScoredCard>) {
        self.scoring_cards = cards;
    }

    pub fn set_active_jokers(&mut self, instance_ids: Vec<u64>) {
        self.active_jokers = instance_ids;
    }

    pub fn set_base_chips(&mut self, value: i64) {
        self.base_chips = value;
    }

    pub fn set_base_mult(&mut self, value: i64) {
        self.base_mult = value;
    }

    pub fn add_chips(&mut self, value: i64) {
        self.bonus_chips = self.bonus_chips.saturating_add(value);
    }

    pub fn add_mult(&mut self, value: i64) {
        self.bonus_mult = self.bonus_mult.saturating_add(value);
    }

    /// Multiplies the running x-mult. Non-positive or non-finite factors are ignored.
    pub fn apply_x_mult(&mut self, value: f64) {
        if !(value.is_finite() && value > 0.0) {
            tracing::warn!(value, "ignoring invalid x_mult factor");
            return;
        }
        self.x_mult *= value;
    }

    /// Applies `effect` and records it in the trace under `source`.
    pub fn apply(&mut self, source: &str, effect: RuleEffect) {
        let before = self.snapshot();
        match effect {
            RuleEffect::AddChips(value) => self.add_chips(value),
            RuleEffect::AddMult(value) => self.add_mult(value),
            RuleEffect::MultiplyMult(value) => self.apply_x_mult(value),
        }
        let after = self.snapshot();
        self.trace.push(ScoreTraceStep {
            source: source.to_string(),
            effect,
            before,
            after,
        });
    }

    /// Adds a played card's chips and logs it as triggered.
    pub fn score_card(&mut self, card: ScoredCard) {
        self.apply(&format!("card#{}", card.instance_id), RuleEffect::AddChips(card.chips));
        self.triggered_cards.push(card);
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            chips: self.get_total_chips(),
            mult: self.get_total_mult(),
            x_mult: self.x_mult,
        }
    }

    pub fn get_total_chips(&self) -> i64 {
        self.base_chips.saturating_add(self.bonus_chips)
    }

    pub fn get_total_mult(&self) -> i64 {
        self.base_mult.saturating_add(self.bonus_mult)
    }

    pub fn calculate_score(&self) -> i64 {
        let raw = self.get_total_chips() as f64 * (self.get_total_mult() as f64 * self.x_mult);
        raw.floor() as i64
    }

    pub fn hand_type(&self) -> HandType {
        self.hand_type
    }

    pub fn scoring_cards(&self) -> &[ScoredCard] {
        &self.scoring_cards
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.scoring_cards.iter().any(|card| card.suit == suit)
    }

    pub fn count_suit(&self, suit: Suit) -> usize {
        self.scoring_cards
            .iter()
            .filter(|card| card.suit == suit)
            .count()
    }

    pub fn base_chips(&self) -> i64 {
        self.base_chips
    }

    pub fn bonus_chips(&self) -> i64 {
        self.bonus_chips
    }

    pub fn base_mult(&self) -> i64 {
        self.base_mult
    }

    pub fn bonus_mult(&self) -> i64 {
        self.bonus_mult
    }

    pub fn x_mult(&self) -> f64 {
        self.x_mult
    }

    pub fn active_jokers(&self) -> &[u64] {
        &self.active_jokers
    }

    pub fn triggered_cards(&self) -> &[ScoredCard] {
        &self.triggered_cards
    }

    pub fn trace(&self) -> &[ScoreTraceStep] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card(id: u64, suit: Suit, rank: Rank) -> ScoredCard {
        ScoredCard {
            instance_id: id,
            suit,
            rank,
            chips: rank.chip_value(),
        }
    }

    #[test]
    fn fresh_context_scores_zero() {
        let ctx = ScoringContext::new();
        assert_eq!(ctx.hand_type(), HandType::None);
        assert_eq!(ctx.x_mult(), 1.0);
        assert_eq!(ctx.calculate_score(), 0);
    }

    #[test]
    fn pair_of_twos_scores_eighty() {
        let mut ctx = ScoringContext::new();
        ctx.set_hand_type(HandType::Pair);
        ctx.set_base_chips(10);
        ctx.set_base_mult(2);
        for chips in [2, 2, 7, 9, 10] {
            ctx.add_chips(chips);
        }
        assert_eq!(ctx.get_total_chips(), 40);
        assert_eq!(ctx.get_total_mult(), 2);
        assert_eq!(ctx.calculate_score(), 80);
    }

    #[test]
    fn x_mult_composes_multiplicatively() {
        let mut ctx = ScoringContext::new();
        ctx.set_base_chips(10);
        ctx.set_base_mult(1);
        ctx.apply_x_mult(1.5);
        ctx.apply_x_mult(2.0);
        assert_eq!(ctx.x_mult(), 3.0);
        assert_eq!(ctx.calculate_score(), 30);
    }

    #[test]
    fn invalid_x_mult_is_ignored() {
        let mut ctx = ScoringContext::new();
        ctx.apply_x_mult(0.0);
        ctx.apply_x_mult(-2.0);
        ctx.apply_x_mult(f64::NAN);
        assert_eq!(ctx.x_mult(), 1.0);
    }

    #[test]
    fn score_floors_fractional_results() {
        let mut ctx = ScoringContext::new();
        ctx.set_base_chips(7);
        ctx.set_base_mult(1);
        ctx.apply_x_mult(1.5);
        assert_eq!(ctx.calculate_score(), 10);
    }

    #[test]
    fn apply_records_trace_steps() {
        let mut ctx = ScoringContext::new();
        ctx.set_base_chips(10);
        ctx.set_base_mult(2);
        ctx.score_card(card(9, Suit::Spades, Rank::King));
        ctx.apply("joker", RuleEffect::MultiplyMult(2.0));

        assert_eq!(ctx.triggered_cards().len(), 1);
        let trace = ctx.trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].source, "card#9");
        assert_eq!(trace[0].before.chips, 10);
        assert_eq!(trace[0].after.chips, 20);
        assert_eq!(trace[1].after.x_mult, 2.0);
    }

    #[test]
    fn suit_queries_use_scoring_cards() {
        let mut ctx = ScoringContext::new();
        ctx.set_scoring_cards(vec![
            card(1, Suit::Hearts, Rank::Two),
            card(2, Suit::Hearts, Rank::Five),
            card(3, Suit::Clubs, Rank::Nine),
        ]);
        assert!(ctx.has_suit(Suit::Clubs));
        assert!(!ctx.has_suit(Suit::Diamonds));
        assert_eq!(ctx.count_suit(Suit::Hearts), 2);
    }

    #[test]
    fn reset_on_untouched_context_is_noop() {
        let mut ctx = ScoringContext::new();
        ctx.reset();
        assert_eq!(ctx, ScoringContext::new());
    }

    proptest! {
        #[test]
        fn prop_score_matches_formula(
            chips in 0i64..100_000,
            mult in 0i64..1_000,
            x_mult in 0.01f64..50.0,
        ) {
            let mut ctx = ScoringContext::new();
            ctx.set_base_chips(chips);
            ctx.set_base_mult(mult);
            ctx.apply_x_mult(x_mult);
            let expected = (chips as f64 * (mult as f64 * x_mult)).floor() as i64;
            prop_assert_eq!(ctx.calculate_score(), expected);
            prop_assert!(ctx.calculate_score() >= 0);
        }

        #[test]
        fn prop_x_mult_order_does_not_matter(
            a in 0.1f64..10.0,
            b in 0.1f64..10.0,
        ) {
            let mut left = ScoringContext::new();
            left.apply_x_mult(a);
            left.apply_x_mult(b);
            let mut right = ScoringContext::new();
            right.apply_x_mult(b);
            right.apply_x_mult(a);
            prop_assert_eq!(left.x_mult(), right.x_mult());
        }

        #[test]
        fn prop_reset_restores_fresh_state(
            base_chips in -1_000i64..1_000,
            bonus in -1_000i64..1_000,
            mult in -100i64..100,
            x_mult in 0.1f64..10.0,
        ) {
            let mut ctx = ScoringContext::new();
            ctx.set_hand_type(HandType::Flush);
            ctx.set_base_chips(base_chips);
            ctx.set_base_mult(mult);
            ctx.apply("prop", RuleEffect::AddChips(bonus));
            ctx.apply("prop", RuleEffect::AddMult(mult));
            ctx.apply_x_mult(x_mult);
            ctx.score_card(card(1, Suit::Hearts, Rank::Ace));
            ctx.set_active_jokers(vec![1, 2]);
            ctx.reset();
            prop_assert_eq!(ctx, ScoringContext::new());
        }
    }
}
