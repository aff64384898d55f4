use crate::{CardCatalog, CardInstance, RngState, ScoringError, Zone};

/// Draw, hand and discard piles. Every card's zone matches the pile holding it.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    draw: Vec<CardInstance>,
    hand: Vec<CardInstance>,
    discard: Vec<CardInstance>,
}

impl Deck {
    /// One instance of every definition in `catalog`, shuffled into the draw pile.
    pub fn from_catalog(catalog: &CardCatalog, rng: &mut RngState) -> Self {
        let cards = catalog
            .ids()
            .map(|id| CardInstance::in_zone(id, Zone::Draw))
            .collect();
        let mut deck = Self::from_cards(cards);
        deck.shuffle(rng);
        deck
    }

    pub fn from_cards(mut cards: Vec<CardInstance>) -> Self {
        for card in &mut cards {
            card.zone = Zone::Draw;
        }
        Self {
            draw: cards,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    /// Draws up to `count` cards into the hand, reshuffling the discard pile
    /// when the draw pile runs out. Returns how many were drawn.
    pub fn draw_to_hand(&mut self, count: usize, rng: &mut RngState) -> usize {
        let mut drawn = 0;
        while drawn < count {
            if self.draw.is_empty() {
                self.reshuffle_discard(rng);
            }
            let Some(mut card) = self.draw.pop() else {
                break;
            };
            card.zone = Zone::Hand;
            self.hand.push(card);
            drawn += 1;
        }
        drawn
    }

    /// Removes the selected cards from the hand, in hand order.
    pub fn take_from_hand(&mut self, indices: &[usize]) -> Result<Vec<CardInstance>, ScoringError> {
        if indices.is_empty() {
            return Err(ScoringError::InvalidSelection);
        }
        let mut unique = indices.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.iter().any(|&idx| idx >= self.hand.len()) {
            return Err(ScoringError::InvalidSelection);
        }

        let mut picked = Vec::with_capacity(unique.len());
        for idx in unique.into_iter().rev() {
            let mut card = self.hand.remove(idx);
            card.zone = Zone::Played;
            picked.push(card);
        }
        picked.reverse();
        Ok(picked)
    }

    pub fn discard_cards(&mut self, cards: Vec<CardInstance>) {
        for mut card in cards {
            card.zone = Zone::Discard;
            self.discard.push(card);
        }
    }

    pub fn reshuffle_discard(&mut self, rng: &mut RngState) {
        if self.discard.is_empty() {
            return;
        }
        for card in &mut self.discard {
            card.zone = Zone::Draw;
        }
        self.draw.append(&mut self.discard);
        rng.shuffle(&mut self.draw);
    }

    /// Returns the hand to the discard pile and clears per-combat card state.
    pub fn end_combat(&mut self) {
        let hand = std::mem::take(&mut self.hand);
        self.discard_cards(hand);
        for card in self
            .draw
            .iter_mut()
            .chain(self.discard.iter_mut())
        {
            card.reset_combat_state();
        }
    }

    pub fn draw_pile(&self) -> &[CardInstance] {
        &self.draw
    }

    pub fn hand(&self) -> &[CardInstance] {
        &self.hand
    }

    pub fn discard_pile(&self) -> &[CardInstance] {
        &self.discard
    }

    pub fn total_cards(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_deck(seed: u64) -> Deck {
        let catalog = CardCatalog::standard52();
        Deck::from_catalog(&catalog, &mut RngState::from_seed(seed))
    }

    #[test]
    fn same_seed_deals_same_cards() {
        let mut a = standard_deck(11);
        let mut b = standard_deck(11);
        a.draw_to_hand(8, &mut RngState::from_seed(0));
        b.draw_to_hand(8, &mut RngState::from_seed(0));
        let defs_a: Vec<_> = a.hand().iter().map(|card| card.def).collect();
        let defs_b: Vec<_> = b.hand().iter().map(|card| card.def).collect();
        assert_eq!(defs_a, defs_b);
    }

    #[test]
    fn zones_track_piles() {
        let mut deck = standard_deck(3);
        let mut rng = RngState::from_seed(3);
        assert_eq!(deck.draw_to_hand(8, &mut rng), 8);
        assert!(deck.hand().iter().all(|card| card.zone == Zone::Hand));

        let played = deck.take_from_hand(&[0, 2, 4]).expect("take");
        assert_eq!(played.len(), 3);
        assert!(played.iter().all(|card| card.zone == Zone::Played));
        assert_eq!(deck.hand().len(), 5);

        deck.discard_cards(played);
        assert!(deck.discard_pile().iter().all(|card| card.zone == Zone::Discard));
        assert_eq!(deck.total_cards(), 52);
    }

    #[test]
    fn take_keeps_hand_order_and_rejects_bad_indices() {
        let mut deck = standard_deck(5);
        let mut rng = RngState::from_seed(5);
        deck.draw_to_hand(5, &mut rng);
        let expected = vec![deck.hand()[1].instance_id(), deck.hand()[3].instance_id()];
        let taken = deck.take_from_hand(&[3, 1, 3]).expect("take");
        let ids: Vec<u64> = taken.iter().map(CardInstance::instance_id).collect();
        assert_eq!(ids, expected);

        assert_eq!(deck.take_from_hand(&[]), Err(ScoringError::InvalidSelection));
        assert_eq!(deck.take_from_hand(&[9]), Err(ScoringError::InvalidSelection));
    }

    #[test]
    fn empty_draw_pile_reshuffles_discards() {
        let mut deck = standard_deck(9);
        let mut rng = RngState::from_seed(9);
        assert_eq!(deck.draw_to_hand(52, &mut rng), 52);
        let all: Vec<usize> = (0..52).collect();
        let cards = deck.take_from_hand(&all).expect("take all");
        deck.discard_cards(cards);
        assert_eq!(deck.draw_to_hand(5, &mut rng), 5);
        assert_eq!(deck.draw_pile().len(), 47);
        assert!(deck.discard_pile().is_empty());
    }

    #[test]
    fn end_combat_clears_temporary_state() {
        let mut deck = standard_deck(1);
        let mut rng = RngState::from_seed(1);
        deck.draw_to_hand(2, &mut rng);
        let mut played = deck.take_from_hand(&[0]).expect("take");
        played[0].times_played = 1;
        played[0].add_bonus_chips(4);
        deck.discard_cards(played);
        deck.end_combat();
        assert!(deck.hand().is_empty());
        assert!(deck.discard_pile().iter().all(|card| card.times_played == 0));
        assert!(deck.discard_pile().iter().any(|card| card.bonus_chips == 4));
    }
}
