use serde::{Deserialize, Serialize};

fn default_id() -> String {
    "mycustommod".to_string()
}

fn default_name() -> String {
    "My Custom Mod".to_string()
}

fn default_prefix() -> String {
    "mycustom".to_string()
}

fn default_main_file() -> String {
    "main.lua".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_badge_colour() -> String {
    "666665".to_string()
}

fn default_badge_text_colour() -> String {
    "FFFFFF".to_string()
}

/// Mod level metadata. Serialized verbatim as the SMODS manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModMetadata {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub author: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_main_file")]
    pub main_file: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_badge_colour")]
    pub badge_colour: String,
    #[serde(default = "default_badge_text_colour")]
    pub badge_text_colour: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub provides: Vec<String>,
}

impl Default for ModMetadata {
    fn default() -> Self {
        Self {
            id: default_id(),
            name: default_name(),
            display_name: String::new(),
            author: Vec::new(),
            description: String::new(),
            prefix: default_prefix(),
            main_file: default_main_file(),
            version: default_version(),
            priority: 0,
            badge_colour: default_badge_colour(),
            badge_text_colour: default_badge_text_colour(),
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            provides: Vec::new(),
        }
    }
}
