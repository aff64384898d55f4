use crate::{
    CardCatalog, CardInstance, DefaultScoringRules, Edition, Event, EventBus, HandType,
    JokerCatalog, JokerDefId, JokerDefinition, JokerInstance, RoundLimits, ScoreTables,
    ScoredCard, ScoringContext, ScoringError, ScoringHand, ScoringRules, Zone, MAX_HAND_SIZE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Setup,
    Select,
    Finished,
}

/// Result of scoring cards without committing anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePreview {
    pub hand: HandType,
    pub score: i64,
    pub context: ScoringContext,
}

/// Owns the joker roster and the round state, and runs every scoring pass.
#[derive(Debug)]
pub struct ScoringManager {
    cards: CardCatalog,
    joker_defs: JokerCatalog,
    rules: Option<Box<dyn ScoringRules>>,
    limits: RoundLimits,
    phase: Phase,
    round_active: bool,
    current_score: i64,
    target_score: i64,
    hands_remaining: u32,
    discards_remaining: u32,
    max_hands: u32,
    max_discards: u32,
    jokers: Vec<JokerInstance>,
    last_hand_type: HandType,
    last_hand_score: i64,
    last_context: Option<ScoringContext>,
    last_victory: Option<bool>,
}

impl ScoringManager {
    pub fn new(cards: CardCatalog, joker_defs: JokerCatalog) -> Self {
        Self::with_limits(cards, joker_defs, RoundLimits::default())
    }

    pub fn with_limits(cards: CardCatalog, joker_defs: JokerCatalog, limits: RoundLimits) -> Self {
        Self {
            cards,
            joker_defs,
            rules: None,
            limits,
            phase: Phase::Setup,
            round_active: false,
            current_score: 0,
            target_score: 0,
            hands_remaining: 0,
            discards_remaining: 0,
            max_hands: limits.max_hands,
            max_discards: limits.max_discards,
            jokers: Vec::new(),
            last_hand_type: HandType::None,
            last_hand_score: 0,
            last_context: None,
            last_victory: None,
        }
    }

    /// Replaces the base-value source. Without rules the built-in table is used.
    pub fn set_rules(&mut self, rules: Box<dyn ScoringRules>) {
        self.rules = Some(rules);
    }

    pub fn rules(&self) -> &dyn ScoringRules {
        match &self.rules {
            Some(rules) => rules.as_ref(),
            None => &DefaultScoringRules,
        }
    }

    /// Raises the level of `hand`. Installs level-tracking tables first if no
    /// rules were configured.
    pub fn level_up_hand(&mut self, hand: HandType, amount: u32) -> u32 {
        self.rules
            .get_or_insert_with(|| Box::new(ScoreTables::default()) as Box<dyn ScoringRules>)
            .level_up(hand, amount)
    }

    pub fn card_catalog(&self) -> &CardCatalog {
        &self.cards
    }

    pub fn joker_catalog(&self) -> &JokerCatalog {
        &self.joker_defs
    }

    pub fn register_joker(&mut self, def: JokerDefinition) -> JokerDefId {
        self.joker_defs.insert(def)
    }

    pub fn limits(&self) -> RoundLimits {
        self.limits
    }

    pub fn start_round(
        &mut self,
        target_score: i64,
        hands: u32,
        discards: u32,
        events: &mut EventBus,
    ) -> Result<(), ScoringError> {
        if target_score <= 0 || hands == 0 {
            return Err(ScoringError::InvalidRoundConfig {
                target_score,
                hands,
            });
        }
        self.max_hands = hands;
        self.max_discards = discards;
        self.target_score = target_score;
        self.current_score = 0;
        self.hands_remaining = hands;
        self.discards_remaining = discards;
        self.round_active = true;
        self.phase = Phase::Select;
        self.last_hand_type = HandType::None;
        self.last_hand_score = 0;
        self.last_context = None;
        self.last_victory = None;
        debug!(target_score, hands, discards, "round started");
        events.push(Event::RoundStarted {
            target_score,
            hands,
            discards,
        });
        Ok(())
    }

    /// Starts a round with the configured hand and discard limits.
    pub fn start_default_round(
        &mut self,
        target_score: i64,
        events: &mut EventBus,
    ) -> Result<(), ScoringError> {
        self.start_round(
            target_score,
            self.limits.max_hands,
            self.limits.max_discards,
            events,
        )
    }

    /// Scores `cards`, commits the result to the round and moves the cards to
    /// the discard zone. Ends the round once the target is reached or no hands
    /// remain.
    pub fn play_hand(
        &mut self,
        cards: &mut [CardInstance],
        events: &mut EventBus,
    ) -> Result<i64, ScoringError> {
        if !self.round_active {
            return Err(ScoringError::RoundNotActive);
        }
        if self.hands_remaining == 0 {
            return Err(ScoringError::NoHandsLeft);
        }
        self.check_selection(cards)?;

        let mut ctx = ScoringContext::new();
        let hand = self.seed_context(cards, &mut ctx);
        run_jokers(&self.joker_defs, &mut self.jokers, &mut ctx);
        let score = ctx.calculate_score();

        self.current_score = self.current_score.saturating_add(score);
        self.hands_remaining -= 1;
        self.last_hand_type = hand;
        self.last_hand_score = score;
        for card in cards.iter_mut() {
            card.times_played = card.times_played.saturating_add(1);
            card.zone = Zone::Discard;
        }
        debug!(
            hand = hand.id(),
            chips = ctx.get_total_chips(),
            mult = ctx.get_total_mult(),
            x_mult = ctx.x_mult(),
            score,
            total = self.current_score,
            "hand scored"
        );
        events.push(Event::HandScored {
            hand,
            chips: ctx.get_total_chips(),
            mult: ctx.get_total_mult(),
            x_mult: ctx.x_mult(),
            score,
        });
        self.last_context = Some(ctx);

        if self.current_score >= self.target_score || self.hands_remaining == 0 {
            self.end_round(events);
        }
        Ok(score)
    }

    /// Spends a discard and moves `cards` to the discard zone. Score is untouched.
    pub fn discard(
        &mut self,
        cards: &mut [CardInstance],
        events: &mut EventBus,
    ) -> Result<(), ScoringError> {
        if !self.round_active {
            return Err(ScoringError::RoundNotActive);
        }
        if self.discards_remaining == 0 {
            return Err(ScoringError::NoDiscardsLeft);
        }
        if cards.is_empty() || cards.len() > self.max_hand_size() {
            return Err(ScoringError::InvalidHandSize(cards.len()));
        }
        self.discards_remaining -= 1;
        for card in cards.iter_mut() {
            card.zone = Zone::Discard;
        }
        events.push(Event::HandDiscarded {
            count: cards.len(),
            discards_remaining: self.discards_remaining,
        });
        Ok(())
    }

    pub fn evaluate_hand(&self, cards: &[CardInstance]) -> HandType {
        ScoringHand::new(&self.cards).evaluate(cards)
    }

    /// Runs the full pipeline against a copy of the roster. Nothing is committed
    /// and no events are emitted; works outside a round.
    pub fn preview_score(&self, cards: &[CardInstance]) -> Result<ScorePreview, ScoringError> {
        self.check_selection(cards)?;
        let mut ctx = ScoringContext::new();
        let hand = self.seed_context(cards, &mut ctx);
        let mut jokers = self.jokers.clone();
        run_jokers(&self.joker_defs, &mut jokers, &mut ctx);
        Ok(ScorePreview {
            hand,
            score: ctx.calculate_score(),
            context: ctx,
        })
    }

    /// Finishes the active round. Returns the victory flag, or `None` when no
    /// round was active.
    pub fn end_round(&mut self, events: &mut EventBus) -> Option<bool> {
        if !self.round_active {
            return None;
        }
        let victory = self.current_score >= self.target_score;
        self.round_active = false;
        self.phase = Phase::Finished;
        self.last_victory = Some(victory);
        debug!(victory, final_score = self.current_score, "round ended");
        events.push(Event::RoundEnded {
            victory,
            final_score: self.current_score,
        });
        Some(victory)
    }

    /// Slots available, counting one extra per Negative joker held.
    pub fn joker_capacity(&self) -> usize {
        self.limits.max_jokers
            + self
                .jokers
                .iter()
                .map(|joker| joker.edition.extra_slots())
                .sum::<usize>()
    }

    /// Appends `joker` to the roster. A rejected joker is dropped.
    pub fn add_joker(
        &mut self,
        joker: JokerInstance,
        events: &mut EventBus,
    ) -> Result<(), ScoringError> {
        let id = self
            .joker_defs
            .get(joker.def)
            .map(|def| def.id.clone())
            .ok_or_else(|| ScoringError::UnknownJokerDefinition(format!("{:?}", joker.def)))?;
        let capacity = self.joker_capacity() + joker.edition.extra_slots();
        if self.jokers.len() >= capacity {
            warn!(joker = %id, capacity, "joker rejected, roster full");
            return Err(ScoringError::JokerCapacityExceeded { capacity });
        }
        events.push(Event::JokerAdded {
            id,
            instance_id: joker.instance_id(),
        });
        self.jokers.push(joker);
        Ok(())
    }

    /// Instantiates the joker registered under `id` and adds it.
    pub fn add_joker_by_id(
        &mut self,
        id: &str,
        edition: Edition,
        events: &mut EventBus,
    ) -> Result<u64, ScoringError> {
        let joker = self
            .joker_defs
            .find(id)
            .and_then(|def| self.joker_defs.instantiate(def))
            .ok_or_else(|| ScoringError::UnknownJokerDefinition(id.to_string()))?
            .with_edition(edition);
        let instance_id = joker.instance_id();
        self.add_joker(joker, events)?;
        Ok(instance_id)
    }

    pub fn remove_joker(
        &mut self,
        index: usize,
        events: &mut EventBus,
    ) -> Result<JokerInstance, ScoringError> {
        if index >= self.jokers.len() {
            return Err(ScoringError::InvalidJokerIndex(index));
        }
        let joker = self.jokers.remove(index);
        let id = self
            .joker_defs
            .get(joker.def)
            .map(|def| def.id.clone())
            .unwrap_or_default();
        events.push(Event::JokerRemoved {
            id,
            instance_id: joker.instance_id(),
        });
        Ok(joker)
    }

    /// Moves the joker at `from` so it ends up at `to`, shifting the others.
    pub fn move_joker(&mut self, from: usize, to: usize) -> Result<(), ScoringError> {
        let len = self.jokers.len();
        if from >= len {
            return Err(ScoringError::InvalidJokerIndex(from));
        }
        if to >= len {
            return Err(ScoringError::InvalidJokerIndex(to));
        }
        let joker = self.jokers.remove(from);
        self.jokers.insert(to, joker);
        Ok(())
    }

    pub fn get_jokers(&self) -> &[JokerInstance] {
        &self.jokers
    }

    pub fn describe_joker(&self, index: usize) -> Option<String> {
        let joker = self.jokers.get(index)?;
        let def = self.joker_defs.get(joker.def)?;
        Some(def.get_description(joker))
    }

    pub fn get_current_score(&self) -> i64 {
        self.current_score
    }

    pub fn get_target_score(&self) -> i64 {
        self.target_score
    }

    pub fn get_hands_remaining(&self) -> u32 {
        self.hands_remaining
    }

    pub fn get_discards_remaining(&self) -> u32 {
        self.discards_remaining
    }

    pub fn max_hands(&self) -> u32 {
        self.max_hands
    }

    pub fn max_discards(&self) -> u32 {
        self.max_discards
    }

    pub fn get_phase(&self) -> Phase {
        self.phase
    }

    pub fn is_round_active(&self) -> bool {
        self.round_active
    }

    pub fn last_hand_type(&self) -> HandType {
        self.last_hand_type
    }

    pub fn last_hand_score(&self) -> i64 {
        self.last_hand_score
    }

    pub fn last_context(&self) -> Option<&ScoringContext> {
        self.last_context.as_ref()
    }

    /// Outcome of the most recently finished round.
    pub fn last_victory(&self) -> Option<bool> {
        self.last_victory
    }

    fn max_hand_size(&self) -> usize {
        self.limits.max_hand_size.clamp(1, MAX_HAND_SIZE)
    }

    fn check_selection(&self, cards: &[CardInstance]) -> Result<(), ScoringError> {
        if cards.is_empty() || cards.len() > self.max_hand_size() {
            return Err(ScoringError::InvalidHandSize(cards.len()));
        }
        if let Some(card) = cards.iter().find(|card| self.cards.resolve(card).is_none()) {
            return Err(ScoringError::UnknownCardDefinition(card.def));
        }
        Ok(())
    }

    /// Classifies the hand, sets base values and adds every scoring card's chips.
    fn seed_context(&self, cards: &[CardInstance], ctx: &mut ScoringContext) -> HandType {
        let mut evaluator = ScoringHand::new(&self.cards);
        let hand = evaluator.evaluate(cards);
        let scoring: Vec<ScoredCard> = evaluator
            .scoring_indices()
            .iter()
            .filter_map(|&idx| {
                let card = &cards[idx];
                let def = self.cards.resolve(card)?;
                Some(ScoredCard {
                    instance_id: card.instance_id(),
                    suit: def.suit,
                    rank: def.rank,
                    chips: card.get_total_chip_value(def),
                })
            })
            .collect();

        let (base_chips, base_mult) = self.rules().base_values(hand);
        ctx.set_hand_type(hand);
        ctx.set_base_chips(base_chips);
        ctx.set_base_mult(base_mult);
        ctx.set_scoring_cards(scoring.clone());
        ctx.set_active_jokers(self.jokers.iter().map(JokerInstance::instance_id).collect());
        for card in scoring {
            ctx.score_card(card);
        }
        hand
    }
}

/// Runs the roster in order: trigger check, effect, trigger count, edition bonus.
fn run_jokers(defs: &JokerCatalog, jokers: &mut [JokerInstance], ctx: &mut ScoringContext) {
    for joker in jokers.iter_mut() {
        let Some(def) = defs.get(joker.def) else {
            warn!(def = ?joker.def, "joker definition missing, skipping");
            continue;
        };
        if !def.can_trigger(ctx, joker) {
            continue;
        }
        def.apply_effect(ctx, joker);
        joker.times_triggered = joker.times_triggered.saturating_add(1);
        if let Some(bonus) = joker.edition.bonus() {
            ctx.apply(&edition_source(def, joker.edition), bonus);
        }
        trace!(
            joker = %def.id,
            instance = joker.instance_id(),
            edition = ?joker.edition,
            "joker triggered"
        );
    }
}

fn edition_source(def: &JokerDefinition, edition: Edition) -> String {
    format!("{}:{:?}", def.id, edition).to_lowercase()
}
