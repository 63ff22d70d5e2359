use jokerforge_core::ModMetadata;
use serde::{Deserialize, Serialize};

fn default_prefix() -> String {
    "mycustom".to_string()
}

fn default_joker_atlas() -> String {
    "CustomJokers".to_string()
}

fn default_consumable_atlas() -> String {
    "CustomConsumables".to_string()
}

fn default_booster_atlas() -> String {
    "CustomBoosters".to_string()
}

fn default_enhancement_atlas() -> String {
    "CustomEnhancements".to_string()
}

fn default_columns() -> u32 {
    10
}

/// Flat option bag threaded verbatim into generated identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default = "default_prefix")]
    pub mod_prefix: String,
    #[serde(default)]
    pub mod_id: String,
    #[serde(default)]
    pub mod_name: String,
    #[serde(default = "default_joker_atlas")]
    pub joker_atlas: String,
    #[serde(default = "default_consumable_atlas")]
    pub consumable_atlas: String,
    #[serde(default = "default_booster_atlas")]
    pub booster_atlas: String,
    #[serde(default = "default_enhancement_atlas")]
    pub enhancement_atlas: String,
    #[serde(default = "default_columns")]
    pub atlas_columns: u32,
    #[serde(default)]
    pub check_syntax: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            mod_prefix: default_prefix(),
            mod_id: String::new(),
            mod_name: String::new(),
            joker_atlas: default_joker_atlas(),
            consumable_atlas: default_consumable_atlas(),
            booster_atlas: default_booster_atlas(),
            enhancement_atlas: default_enhancement_atlas(),
            atlas_columns: default_columns(),
            check_syntax: false,
        }
    }
}

impl GenerateOptions {
    pub fn from_metadata(meta: &ModMetadata) -> Self {
        Self {
            mod_prefix: meta.prefix.clone(),
            mod_id: meta.id.clone(),
            mod_name: meta.name.clone(),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.mod_prefix = prefix.to_string();
        self
    }

    /// Cross-reference key of a generated object: `j_<prefix>_<key>`.
    pub fn full_key(&self, object: ObjectKind, key: &str) -> String {
        format!("{}_{}_{}", object.class_prefix(), self.mod_prefix, key)
    }

    pub fn atlas_for(&self, object: ObjectKind) -> &str {
        match object {
            ObjectKind::Joker => &self.joker_atlas,
            ObjectKind::Consumable => &self.consumable_atlas,
            ObjectKind::Booster => &self.booster_atlas,
            ObjectKind::Enhancement => &self.enhancement_atlas,
        }
    }
}

/// Kind of generated game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Joker,
    Consumable,
    Booster,
    Enhancement,
}

impl ObjectKind {
    pub fn class_prefix(self) -> &'static str {
        match self {
            Self::Joker => "j",
            Self::Consumable => "c",
            Self::Booster => "p",
            Self::Enhancement => "m",
        }
    }

    /// Card the rule's per-card triggers talk about.
    pub fn subject_card(self) -> &'static str {
        match self {
            Self::Enhancement => "card",
            _ => "context.other_card",
        }
    }

    pub fn folder(self) -> &'static str {
        match self {
            Self::Joker => "jokers",
            Self::Consumable => "consumables",
            Self::Booster => "boosters",
            Self::Enhancement => "enhancements",
        }
    }
}
