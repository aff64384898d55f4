use crate::{CardCatalog, CardDef, CardDefId, CardDefinition, CostContext, Keywords};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique, monotonically increasing id shared by card and joker instances.
pub fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpgradeTier {
    #[default]
    Base,
    Upgraded,
    Mastered,
}

impl UpgradeTier {
    pub const MAX: UpgradeTier = UpgradeTier::Mastered;

    pub fn next(self) -> Option<UpgradeTier> {
        match self {
            UpgradeTier::Base => Some(UpgradeTier::Upgraded),
            UpgradeTier::Upgraded => Some(UpgradeTier::Mastered),
            UpgradeTier::Mastered => None,
        }
    }

    pub fn level(self) -> i64 {
        match self {
            UpgradeTier::Base => 0,
            UpgradeTier::Upgraded => 1,
            UpgradeTier::Mastered => 2,
        }
    }

    pub fn chip_bonus(self) -> i64 {
        self.level() * 10
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Zone {
    #[default]
    Draw,
    Hand,
    Played,
    Discard,
    Limbo,
    Exhausted,
}

/// A card in play: a definition handle plus mutable per-combat state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardInstance {
    pub def: CardDefId,
    pub upgrade_tier: UpgradeTier,
    pub zone: Zone,
    pub cost_modifier: i64,
    pub temporary_keywords: Keywords,
    pub times_played: u32,
    pub bonus_chips: i64,
    instance_id: u64,
}

impl CardInstance {
    pub fn new(def: CardDefId) -> Self {
        Self {
            def,
            upgrade_tier: UpgradeTier::Base,
            zone: Zone::Draw,
            cost_modifier: 0,
            temporary_keywords: Keywords::NONE,
            times_played: 0,
            bonus_chips: 0,
            instance_id: next_instance_id(),
        }
    }

    pub fn in_zone(def: CardDefId, zone: Zone) -> Self {
        let mut card = Self::new(def);
        card.zone = zone;
        card
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Raises the tier by one step. Returns false once the card is at [`UpgradeTier::MAX`].
    pub fn upgrade(&mut self) -> bool {
        match self.upgrade_tier.next() {
            Some(next) => {
                self.upgrade_tier = next;
                true
            }
            None => false,
        }
    }

    pub fn add_bonus_chips(&mut self, amount: i64) {
        self.bonus_chips = self.bonus_chips.saturating_add(amount);
    }

    pub fn add_temporary_keywords(&mut self, keywords: Keywords) {
        self.temporary_keywords |= keywords;
    }

    pub fn get_all_keywords<D: CardDefinition + ?Sized>(&self, def: &D) -> Keywords {
        def.keywords() | self.temporary_keywords
    }

    pub fn get_effective_cost<D: CardDefinition + ?Sized>(&self, def: &D, ctx: &CostContext) -> i64 {
        def.calculate_cost(ctx)
            .saturating_add(self.cost_modifier)
            .max(0)
    }

    pub fn get_total_chip_value<D: CardDefinition + ?Sized>(&self, def: &D) -> i64 {
        def.chip_value()
            .saturating_add(self.upgrade_tier.chip_bonus())
            .saturating_add(self.bonus_chips)
    }

    /// Clears state that only lasts for one combat. Tier and bonus chips persist.
    pub fn reset_combat_state(&mut self) {
        self.cost_modifier = 0;
        self.temporary_keywords = Keywords::NONE;
        self.times_played = 0;
    }
}

impl CardCatalog {
    pub fn resolve(&self, card: &CardInstance) -> Option<&CardDef> {
        self.get(card.def)
    }

    /// Creates a fresh instance of `def`.
    pub fn instantiate(&self, def: CardDefId) -> Option<CardInstance> {
        self.get(def).map(|_| CardInstance::new(def))
    }
}
