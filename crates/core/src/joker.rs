use crate::{next_instance_id, HandType, RuleEffect, ScoringContext, Suit};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Edition {
    #[default]
    Base,
    Foil,
    Holographic,
    Polychrome,
    Negative,
}

impl Edition {
    /// The single scoring bonus this edition grants when its joker triggers.
    pub fn bonus(self) -> Option<RuleEffect> {
        match self {
            Edition::Foil => Some(RuleEffect::AddChips(50)),
            Edition::Holographic => Some(RuleEffect::AddMult(10)),
            Edition::Polychrome => Some(RuleEffect::MultiplyMult(1.5)),
            Edition::Base | Edition::Negative => None,
        }
    }

    pub fn extra_slots(self) -> usize {
        match self {
            Edition::Negative => 1,
            _ => 0,
        }
    }
}

/// Hooks for jokers whose logic cannot be expressed by [`JokerEffect`] data.
/// Every method defaults to the behaviour of a plain flat-bonus joker.
pub trait JokerBehavior: fmt::Debug {
    fn can_trigger(
        &self,
        def: &JokerDefinition,
        ctx: &ScoringContext,
        _joker: &JokerInstance,
    ) -> bool {
        def.default_can_trigger(ctx)
    }

    fn apply_effect(
        &self,
        def: &JokerDefinition,
        ctx: &mut ScoringContext,
        _joker: &mut JokerInstance,
    ) {
        def.default_apply_effect(ctx);
    }

    fn get_description(&self, def: &JokerDefinition, _joker: &JokerInstance) -> String {
        def.description.clone()
    }
}

#[derive(Debug, Default)]
pub enum JokerEffect {
    /// Only the definition's `plus_chips`, `plus_mult` and `x_mult`.
    #[default]
    Flat,
    /// Counter grows by one per trigger; contributes `counter * step` on top of the flat fields.
    Scaling {
        chips_per_trigger: i64,
        mult_per_trigger: i64,
    },
    /// Bonus per scoring card of `suit`, on top of the flat fields.
    PerSuitCard { suit: Suit, chips: i64, mult: i64 },
    Custom(Box<dyn JokerBehavior>),
}

/// Static template shared by every instance of a joker.
#[derive(Debug)]
pub struct JokerDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: JokerRarity,
    pub cost: i64,
    pub sell_value: i64,
    pub plus_chips: i64,
    pub plus_mult: i64,
    pub x_mult: f64,
    pub required_hand: Option<HandType>,
    pub required_suit: Option<Suit>,
    pub effect: JokerEffect,
}

impl JokerDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rarity: JokerRarity::Common,
            cost: 0,
            sell_value: 0,
            plus_chips: 0,
            plus_mult: 0,
            x_mult: 1.0,
            required_hand: None,
            required_suit: None,
            effect: JokerEffect::Flat,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rarity(mut self, rarity: JokerRarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_cost(mut self, cost: i64, sell_value: i64) -> Self {
        self.cost = cost;
        self.sell_value = sell_value;
        self
    }

    pub fn with_chips(mut self, chips: i64) -> Self {
        self.plus_chips = chips;
        self
    }

    pub fn with_mult(mut self, mult: i64) -> Self {
        self.plus_mult = mult;
        self
    }

    pub fn with_x_mult(mut self, x_mult: f64) -> Self {
        self.x_mult = x_mult;
        self
    }

    pub fn requires_hand(mut self, hand: HandType) -> Self {
        self.required_hand = Some(hand);
        self
    }

    pub fn requires_suit(mut self, suit: Suit) -> Self {
        self.required_suit = Some(suit);
        self
    }

    pub fn with_effect(mut self, effect: JokerEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn can_trigger(&self, ctx: &ScoringContext, joker: &JokerInstance) -> bool {
        match &self.effect {
            JokerEffect::Custom(behavior) => behavior.can_trigger(self, ctx, joker),
            JokerEffect::PerSuitCard { suit, .. } => {
                self.default_can_trigger(ctx) && ctx.has_suit(*suit)
            }
            JokerEffect::Flat | JokerEffect::Scaling { .. } => self.default_can_trigger(ctx),
        }
    }

    pub fn apply_effect(&self, ctx: &mut ScoringContext, joker: &mut JokerInstance) {
        match &self.effect {
            JokerEffect::Custom(behavior) => behavior.apply_effect(self, ctx, joker),
            JokerEffect::Flat => self.default_apply_effect(ctx),
            JokerEffect::Scaling {
                chips_per_trigger,
                mult_per_trigger,
            } => {
                self.default_apply_effect(ctx);
                joker.counter = joker.counter.saturating_add(1);
                if *chips_per_trigger != 0 {
                    ctx.apply(
                        &self.id,
                        RuleEffect::AddChips(joker.counter.saturating_mul(*chips_per_trigger)),
                    );
                }
                if *mult_per_trigger != 0 {
                    ctx.apply(
                        &self.id,
                        RuleEffect::AddMult(joker.counter.saturating_mul(*mult_per_trigger)),
                    );
                }
            }
            JokerEffect::PerSuitCard { suit, chips, mult } => {
                self.default_apply_effect(ctx);
                let count = ctx.count_suit(*suit) as i64;
                if *chips != 0 {
                    ctx.apply(&self.id, RuleEffect::AddChips(chips.saturating_mul(count)));
                }
                if *mult != 0 {
                    ctx.apply(&self.id, RuleEffect::AddMult(mult.saturating_mul(count)));
                }
            }
        }
    }

    pub fn get_description(&self, joker: &JokerInstance) -> String {
        match &self.effect {
            JokerEffect::Custom(behavior) => behavior.get_description(self, joker),
            JokerEffect::Scaling {
                chips_per_trigger,
                mult_per_trigger,
            } => {
                let chips = joker.counter.saturating_mul(*chips_per_trigger);
                let mult = joker.counter.saturating_mul(*mult_per_trigger);
                self.description
                    .replace("{counter}", &joker.counter.to_string())
                    .replace("{chips}", &chips.to_string())
                    .replace("{mult}", &mult.to_string())
            }
            JokerEffect::Flat | JokerEffect::PerSuitCard { .. } => self.description.clone(),
        }
    }

    /// False when the required hand does not match, or when no scoring card has
    /// the required suit.
    pub fn default_can_trigger(&self, ctx: &ScoringContext) -> bool {
        if let Some(hand) = self.required_hand {
            if ctx.hand_type() != hand {
                return false;
            }
        }
        if let Some(suit) = self.required_suit {
            if !ctx.has_suit(suit) {
                return false;
            }
        }
        true
    }

    pub fn default_apply_effect(&self, ctx: &mut ScoringContext) {
        if self.plus_chips > 0 {
            ctx.apply(&self.id, RuleEffect::AddChips(self.plus_chips));
        }
        if self.plus_mult > 0 {
            ctx.apply(&self.id, RuleEffect::AddMult(self.plus_mult));
        }
        if self.x_mult > 1.0 {
            ctx.apply(&self.id, RuleEffect::MultiplyMult(self.x_mult));
        }
    }
}

/// Handle into a [`JokerCatalog`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JokerDefId(pub u32);

/// Arena of joker definitions. Instances refer to entries by [`JokerDefId`].
#[derive(Debug, Default)]
pub struct JokerCatalog {
    defs: Vec<JokerDefinition>,
}

impl JokerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: JokerDefinition) -> JokerDefId {
        let id = JokerDefId(self.defs.len() as u32);
        self.defs.push(def);
        id
    }

    pub fn get(&self, id: JokerDefId) -> Option<&JokerDefinition> {
        self.defs.get(id.0 as usize)
    }

    pub fn find(&self, key: &str) -> Option<JokerDefId> {
        self.defs
            .iter()
            .position(|def| def.id == key)
            .map(|idx| JokerDefId(idx as u32))
    }

    pub fn instantiate(&self, id: JokerDefId) -> Option<JokerInstance> {
        self.get(id).map(|def| JokerInstance::new(id, def))
    }

    pub fn iter(&self) -> impl Iterator<Item = (JokerDefId, &JokerDefinition)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(idx, def)| (JokerDefId(idx as u32), def))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Runtime state of one owned joker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JokerInstance {
    pub def: JokerDefId,
    pub edition: Edition,
    pub sell_value: i64,
    pub times_triggered: u32,
    pub counter: i64,
    instance_id: u64,
}

impl JokerInstance {
    pub fn new(def_id: JokerDefId, def: &JokerDefinition) -> Self {
        Self {
            def: def_id,
            edition: Edition::Base,
            sell_value: def.sell_value,
            times_triggered: 0,
            counter: 0,
            instance_id: next_instance_id(),
        }
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = edition;
        self
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }
}
