use crate::{JokerRarity, ModMetadata, Rule, UserVariable};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_joker_cost() -> u32 {
    4
}

fn default_consumable_cost() -> u32 {
    3
}

fn default_weight() -> f64 {
    1.0
}

fn default_extra() -> u32 {
    3
}

fn default_choose() -> u32 {
    1
}

fn default_consumable_set() -> String {
    "Tarot".to_string()
}

fn default_card_set() -> String {
    "Joker".to_string()
}

/// Turns a display name into a key fragment: `"Lucky Seven!"` -> `lucky_seven`.
pub fn slugify(value: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        return "item".to_string();
    }
    if out.starts_with(|ch: char| ch.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn resolve_key(key: &str, name: &str) -> String {
    if key.trim().is_empty() {
        slugify(name)
    } else {
        slugify(key)
    }
}

/// Rarity of a joker: one of the four base rarities or a modded rarity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RarityRef {
    Index(i64),
    Named(String),
}

impl Default for RarityRef {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl RarityRef {
    pub fn base(&self) -> Option<JokerRarity> {
        match self {
            Self::Index(index) => JokerRarity::from_index(*index),
            Self::Named(name) => name.parse().ok(),
        }
    }
}

/// Shared view over items whose behaviour is authored as rules.
pub trait RuleOwner {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn key(&self) -> String;
    fn rules(&self) -> &[Rule];
    fn user_variables(&self) -> &[UserVariable];
}

macro_rules! rule_owner {
    ($ty:ty) => {
        impl RuleOwner for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn description(&self) -> &str {
                &self.description
            }

            fn key(&self) -> String {
                resolve_key(&self.key, &self.name)
            }

            fn rules(&self) -> &[Rule] {
                &self.rules
            }

            fn user_variables(&self) -> &[UserVariable] {
                &self.user_variables
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JokerItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_joker_cost")]
    pub cost: u32,
    #[serde(default)]
    pub rarity: RarityRef,
    #[serde(default)]
    pub image_preview: Option<String>,
    #[serde(default)]
    pub overlay_image_preview: Option<String>,
    #[serde(default = "default_true", alias = "blueprint_compat")]
    pub blueprint_compat: bool,
    #[serde(default = "default_true", alias = "eternal_compat")]
    pub eternal_compat: bool,
    #[serde(default = "default_true", alias = "perishable_compat")]
    pub perishable_compat: bool,
    #[serde(default = "default_true")]
    pub unlocked: bool,
    #[serde(default = "default_true")]
    pub discovered: bool,
    #[serde(default = "default_true")]
    pub appears_in_shop: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub user_variables: Vec<UserVariable>,
}

impl JokerItem {
    pub fn new(name: &str) -> Self {
        Self {
            id: slugify(name),
            name: name.to_string(),
            description: String::new(),
            key: String::new(),
            cost: default_joker_cost(),
            rarity: RarityRef::default(),
            image_preview: None,
            overlay_image_preview: None,
            blueprint_compat: true,
            eternal_compat: true,
            perishable_compat: true,
            unlocked: true,
            discovered: true,
            appears_in_shop: true,
            rules: Vec::new(),
            user_variables: Vec::new(),
        }
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay_image_preview
            .as_deref()
            .map(|image| !image.trim().is_empty())
            .unwrap_or(false)
    }
}

rule_owner!(JokerItem);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key: String,
    /// `Tarot`, `Planet`, `Spectral` or the key of a custom set.
    #[serde(default = "default_consumable_set")]
    pub set: String,
    #[serde(default = "default_consumable_cost")]
    pub cost: u32,
    #[serde(default)]
    pub image_preview: Option<String>,
    #[serde(default)]
    pub overlay_image_preview: Option<String>,
    #[serde(default = "default_true")]
    pub unlocked: bool,
    #[serde(default = "default_true")]
    pub discovered: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub can_repeat_soul: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub user_variables: Vec<UserVariable>,
}

impl ConsumableItem {
    pub fn new(name: &str, set: &str) -> Self {
        Self {
            id: slugify(name),
            name: name.to_string(),
            description: String::new(),
            key: String::new(),
            set: set.to_string(),
            cost: default_consumable_cost(),
            image_preview: None,
            overlay_image_preview: None,
            unlocked: true,
            discovered: true,
            hidden: false,
            can_repeat_soul: false,
            rules: Vec::new(),
            user_variables: Vec::new(),
        }
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay_image_preview
            .as_deref()
            .map(|image| !image.trim().is_empty())
            .unwrap_or(false)
    }
}

rule_owner!(ConsumableItem);

/// Custom consumable set (`SMODS.ConsumableType`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableSetDef {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub primary_colour: Option<String>,
    #[serde(default)]
    pub secondary_colour: Option<String>,
    #[serde(default)]
    pub shop_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_joker_cost")]
    pub cost: u32,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Pack family shown by the game (`Arcana`, `Buffoon`, ...).
    #[serde(default)]
    pub kind: String,
    /// Pool the pack draws from: `Joker`, a consumable set, or `Playing Card`.
    #[serde(default = "default_card_set")]
    pub card_set: String,
    #[serde(default = "default_extra")]
    pub extra: u32,
    #[serde(default = "default_choose")]
    pub choose: u32,
    #[serde(default)]
    pub specific_cards: Vec<String>,
    #[serde(default)]
    pub draw_hand: bool,
    #[serde(default)]
    pub background_colour: Option<String>,
    #[serde(default)]
    pub special_colour: Option<String>,
    #[serde(default)]
    pub image_preview: Option<String>,
    #[serde(default = "default_true")]
    pub discovered: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl BoosterItem {
    pub fn key(&self) -> String {
        resolve_key(&self.key, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub image_preview: Option<String>,
    #[serde(default)]
    pub any_suit: bool,
    #[serde(default)]
    pub replace_base_card: bool,
    #[serde(default)]
    pub no_rank: bool,
    #[serde(default)]
    pub no_suit: bool,
    #[serde(default)]
    pub always_scores: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_true")]
    pub unlocked: bool,
    #[serde(default = "default_true")]
    pub discovered: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub user_variables: Vec<UserVariable>,
}

impl EnhancementItem {
    pub fn new(name: &str) -> Self {
        Self {
            id: slugify(name),
            name: name.to_string(),
            description: String::new(),
            key: String::new(),
            image_preview: None,
            any_suit: false,
            replace_base_card: false,
            no_rank: false,
            no_suit: false,
            always_scores: false,
            weight: default_weight(),
            unlocked: true,
            discovered: true,
            rules: Vec::new(),
            user_variables: Vec::new(),
        }
    }
}

rule_owner!(EnhancementItem);

/// Everything one mod export consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModProject {
    #[serde(default)]
    pub metadata: ModMetadata,
    #[serde(default)]
    pub jokers: Vec<JokerItem>,
    #[serde(default)]
    pub consumables: Vec<ConsumableItem>,
    #[serde(default)]
    pub consumable_sets: Vec<ConsumableSetDef>,
    #[serde(default)]
    pub boosters: Vec<BoosterItem>,
    #[serde(default)]
    pub enhancements: Vec<EnhancementItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Lucky Seven!"), "lucky_seven");
        assert_eq!(slugify("  Big--Money  Joker "), "big_money_joker");
        assert_eq!(slugify("7 Up"), "_7_up");
        assert_eq!(slugify("!!!"), "item");
    }

    #[test]
    fn explicit_key_wins_over_name() {
        let mut joker = JokerItem::new("Fancy Name");
        assert_eq!(joker.key(), "fancy_name");
        joker.key = "Short".to_string();
        assert_eq!(joker.key(), "short");
    }

    #[test]
    fn rarity_accepts_numbers_and_names() {
        assert_eq!(RarityRef::Index(2).base(), Some(JokerRarity::Uncommon));
        assert_eq!(
            RarityRef::Named("rare".to_string()).base(),
            Some(JokerRarity::Rare)
        );
        assert_eq!(RarityRef::Named("mymod_mythic".to_string()).base(), None);
    }
}
