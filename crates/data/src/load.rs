use crate::schema::{EffectEntry, JokerDefEntry};
use anyhow::{bail, Context};
use chipmult_core::{
    CardCatalog, CardDef, HandRule, HandType, JokerCatalog, JokerDefinition, JokerEffect,
    RoundLimits, ScoringConfig,
};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BUILTIN_JOKERS: &[u8] = include_bytes!("../builtin_jokers.json");
const LIMITS_FILE: &str = "limits.json";

/// Reads `hands.json` and, when present, `limits.json` from `dir`.
pub fn load_scoring_config(dir: &Path) -> anyhow::Result<ScoringConfig> {
    let hands: Vec<HandRule> = load_json(dir.join("hands.json"))?;
    for rule in &hands {
        if HandType::from_id(&rule.id).is_none() {
            bail!("unknown hand id '{}' in {}", rule.id, dir.join("hands.json").display());
        }
    }
    let limits_path = dir.join(LIMITS_FILE);
    let limits: RoundLimits = if limits_path.exists() {
        load_json(limits_path)?
    } else {
        RoundLimits::default()
    };
    Ok(ScoringConfig { hands, limits })
}

/// The standard 52 cards followed by the extra definitions in `path`.
pub fn load_card_catalog(path: &Path) -> anyhow::Result<CardCatalog> {
    let extra: Vec<CardDef> = load_json(path)?;
    let mut catalog = CardCatalog::standard52();
    for def in extra {
        if catalog.find(&def.id).is_some() {
            bail!("duplicate card id '{}' in {}", def.id, path.display());
        }
        catalog.insert(def);
    }
    Ok(catalog)
}

pub fn load_joker_catalog(path: &Path) -> anyhow::Result<JokerCatalog> {
    let raw = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    parse_jokers(&raw).with_context(|| format!("load jokers from {}", path.display()))
}

/// The joker roster shipped inside the crate.
pub fn load_builtin_jokers() -> anyhow::Result<JokerCatalog> {
    parse_jokers(BUILTIN_JOKERS).context("load built-in jokers")
}

pub fn parse_jokers(json_bytes: &[u8]) -> anyhow::Result<JokerCatalog> {
    let entries: Vec<JokerDefEntry> =
        serde_json::from_slice(json_bytes).context("parse jokers JSON")?;
    let mut seen = HashSet::new();
    let mut catalog = JokerCatalog::new();
    for entry in entries {
        if !seen.insert(entry.id.clone()) {
            bail!("duplicate joker id '{}'", entry.id);
        }
        let def = build_joker(entry)?;
        catalog.insert(def);
    }
    Ok(catalog)
}

fn build_joker(entry: JokerDefEntry) -> anyhow::Result<JokerDefinition> {
    if !(entry.x_mult.is_finite() && entry.x_mult > 0.0) {
        bail!("joker '{}' has invalid x_mult {}", entry.id, entry.x_mult);
    }
    let mut def = JokerDefinition::new(entry.id, entry.name)
        .with_description(entry.description)
        .with_rarity(entry.rarity)
        .with_cost(entry.cost, entry.sell_value)
        .with_chips(entry.plus_chips)
        .with_mult(entry.plus_mult)
        .with_x_mult(entry.x_mult)
        .with_effect(effect_from_entry(entry.effect));
    if let Some(hand_id) = entry.required_hand {
        let Some(hand) = HandType::from_id(&hand_id) else {
            bail!("joker '{}' requires unknown hand '{}'", def.id, hand_id);
        };
        def = def.requires_hand(hand);
    }
    if let Some(suit) = entry.required_suit {
        def = def.requires_suit(suit);
    }
    Ok(def)
}

fn effect_from_entry(effect: EffectEntry) -> JokerEffect {
    match effect {
        EffectEntry::Flat => JokerEffect::Flat,
        EffectEntry::Scaling {
            chips_per_trigger,
            mult_per_trigger,
        } => JokerEffect::Scaling {
            chips_per_trigger,
            mult_per_trigger,
        },
        EffectEntry::PerSuitCard { suit, chips, mult } => {
            JokerEffect::PerSuitCard { suit, chips, mult }
        }
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_parses() {
        let catalog = load_builtin_jokers().expect("built-in jokers");
        assert!(!catalog.is_empty());
        assert!(catalog.find("joker").is_some());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let catalog = parse_jokers(br#"[{"id": "plain", "name": "Plain"}]"#).expect("parse");
        let def = catalog.get(catalog.find("plain").expect("id")).expect("def");
        assert_eq!(def.x_mult, 1.0);
        assert_eq!(def.plus_chips, 0);
        assert!(def.required_hand.is_none());
        assert!(matches!(def.effect, JokerEffect::Flat));
    }

    #[test]
    fn unknown_hand_requirement_is_an_error() {
        let err = parse_jokers(
            br#"[{"id": "odd", "name": "Odd", "required_hand": "six_of_a_kind"}]"#,
        )
        .expect_err("should fail");
        assert!(format!("{err:#}").contains("six_of_a_kind"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = parse_jokers(
            br#"[{"id": "twin", "name": "A"}, {"id": "twin", "name": "B"}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn tagged_effects_map_to_core_variants() {
        let catalog = parse_jokers(
            br#"[
                {"id": "grow", "name": "Grow", "effect": {"kind": "scaling", "mult_per_trigger": 3}},
                {"id": "hearts", "name": "Hearts", "effect": {"kind": "per_suit_card", "suit": "Hearts", "chips": 7}}
            ]"#,
        )
        .expect("parse");
        let grow = catalog.get(catalog.find("grow").expect("id")).expect("def");
        assert!(matches!(
            grow.effect,
            JokerEffect::Scaling {
                chips_per_trigger: 0,
                mult_per_trigger: 3
            }
        ));
        let hearts = catalog.get(catalog.find("hearts").expect("id")).expect("def");
        assert!(matches!(
            hearts.effect,
            JokerEffect::PerSuitCard {
                suit: chipmult_core::Suit::Hearts,
                chips: 7,
                mult: 0
            }
        ));
    }

    #[test]
    fn non_positive_x_mult_is_rejected() {
        assert!(parse_jokers(br#"[{"id": "zero", "name": "Zero", "x_mult": 0.0}]"#).is_err());
    }
}
