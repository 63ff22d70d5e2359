use crate::{normalize_poker_hand, Rank, Suit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVariableType {
    #[default]
    Number,
    Suit,
    Rank,
    Pokerhand,
}

/// User-declared persistent per-item state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVariable {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub var_type: UserVariableType,
    #[serde(default)]
    pub initial_value: Option<f64>,
    #[serde(default)]
    pub initial_suit: Option<String>,
    #[serde(default)]
    pub initial_rank: Option<String>,
    #[serde(default)]
    pub initial_poker_hand: Option<String>,
}

impl UserVariable {
    pub fn number(name: &str, initial: f64) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            var_type: UserVariableType::Number,
            initial_value: Some(initial),
            initial_suit: None,
            initial_rank: None,
            initial_poker_hand: None,
        }
    }

    pub fn suit(name: &str, initial: Suit) -> Self {
        Self {
            var_type: UserVariableType::Suit,
            initial_value: None,
            initial_suit: Some(initial.name().to_string()),
            ..Self::number(name, 0.0)
        }
    }

    pub fn rank(name: &str, initial: Rank) -> Self {
        Self {
            var_type: UserVariableType::Rank,
            initial_value: None,
            initial_rank: Some(initial.base_value().to_string()),
            ..Self::number(name, 0.0)
        }
    }

    pub fn poker_hand(name: &str, initial: &str) -> Self {
        Self {
            var_type: UserVariableType::Pokerhand,
            initial_value: None,
            initial_poker_hand: Some(initial.to_string()),
            ..Self::number(name, 0.0)
        }
    }

    pub fn initial_number(&self) -> f64 {
        self.initial_value.unwrap_or(0.0)
    }

    pub fn initial_suit(&self) -> Suit {
        self.initial_suit
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or(Suit::Spades)
    }

    pub fn initial_rank(&self) -> Rank {
        self.initial_rank
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or(Rank::Ace)
    }

    pub fn initial_poker_hand(&self) -> &'static str {
        self.initial_poker_hand
            .as_deref()
            .and_then(normalize_poker_hand)
            .unwrap_or("High Card")
    }
}

/// Lookup helpers over an item's declared variables.
pub trait VariableScope {
    fn find_variable(&self, name: &str) -> Option<&UserVariable>;

    fn is_number_variable(&self, name: &str) -> bool {
        self.find_variable(name)
            .map(|var| var.var_type == UserVariableType::Number)
            .unwrap_or(false)
    }
}

impl VariableScope for [UserVariable] {
    fn find_variable(&self, name: &str) -> Option<&UserVariable> {
        self.iter().find(|var| var.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_defaults_apply() {
        let var: UserVariable =
            serde_json::from_str(r#"{"name":"s","type":"suit","initialSuit":"hearts"}"#)
                .expect("var");
        assert_eq!(var.initial_suit(), Suit::Hearts);
        let var: UserVariable =
            serde_json::from_str(r#"{"name":"h","type":"pokerhand"}"#).expect("var");
        assert_eq!(var.initial_poker_hand(), "High Card");
    }
}
