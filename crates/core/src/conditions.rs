use crate::Params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub negate: bool,
}

impl Condition {
    pub fn new(id: &str, condition_type: &str, params: Params) -> Self {
        Self {
            id: id.to_string(),
            condition_type: condition_type.to_string(),
            params,
            negate: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn kind(&self) -> Option<ConditionKind> {
        ConditionKind::from_keyword(&self.condition_type)
    }
}

/// How conditions inside one group combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    pub fn lua(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub operator: LogicOperator,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn all_of(id: &str, conditions: Vec<Condition>) -> Self {
        Self {
            id: id.to_string(),
            operator: LogicOperator::And,
            conditions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    InternalVariable,
    HandType,
    CardRank,
    CardSuit,
    CardEnhancement,
    CardSeal,
    CardEdition,
    CardCount,
    SuitCount,
    RankCount,
    FirstLastScored,
    PlayerMoney,
    RemainingHands,
    RemainingDiscards,
    HandSize,
    BlindType,
    AnteLevel,
    JokerCount,
    SpecificJoker,
    JokerRarity,
    JokerSticker,
    CheckFlag,
    DeckSize,
    HandLevel,
    PokerHandBeenPlayed,
    CardsSelected,
    GenericCompare,
    BlindRequirement,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 28] = [
        ConditionKind::InternalVariable,
        ConditionKind::HandType,
        ConditionKind::CardRank,
        ConditionKind::CardSuit,
        ConditionKind::CardEnhancement,
        ConditionKind::CardSeal,
        ConditionKind::CardEdition,
        ConditionKind::CardCount,
        ConditionKind::SuitCount,
        ConditionKind::RankCount,
        ConditionKind::FirstLastScored,
        ConditionKind::PlayerMoney,
        ConditionKind::RemainingHands,
        ConditionKind::RemainingDiscards,
        ConditionKind::HandSize,
        ConditionKind::BlindType,
        ConditionKind::AnteLevel,
        ConditionKind::JokerCount,
        ConditionKind::SpecificJoker,
        ConditionKind::JokerRarity,
        ConditionKind::JokerSticker,
        ConditionKind::CheckFlag,
        ConditionKind::DeckSize,
        ConditionKind::HandLevel,
        ConditionKind::PokerHandBeenPlayed,
        ConditionKind::CardsSelected,
        ConditionKind::GenericCompare,
        ConditionKind::BlindRequirement,
    ];

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "internal_variable" | "variable" => Some(Self::InternalVariable),
            "hand_type" | "poker_hand" => Some(Self::HandType),
            "card_rank" => Some(Self::CardRank),
            "card_suit" => Some(Self::CardSuit),
            "card_enhancement" => Some(Self::CardEnhancement),
            "card_seal" => Some(Self::CardSeal),
            "card_edition" => Some(Self::CardEdition),
            "card_count" => Some(Self::CardCount),
            "suit_count" => Some(Self::SuitCount),
            "rank_count" => Some(Self::RankCount),
            "first_last_scored" | "card_position" => Some(Self::FirstLastScored),
            "player_money" | "money" => Some(Self::PlayerMoney),
            "remaining_hands" => Some(Self::RemainingHands),
            "remaining_discards" => Some(Self::RemainingDiscards),
            "hand_size" => Some(Self::HandSize),
            "blind_type" => Some(Self::BlindType),
            "ante_level" | "ante" => Some(Self::AnteLevel),
            "joker_count" => Some(Self::JokerCount),
            "specific_joker" | "has_joker" => Some(Self::SpecificJoker),
            "joker_rarity" => Some(Self::JokerRarity),
            "joker_sticker" => Some(Self::JokerSticker),
            "check_flag" | "flag" => Some(Self::CheckFlag),
            "deck_size" => Some(Self::DeckSize),
            "hand_level" => Some(Self::HandLevel),
            "poker_hand_been_played" | "hand_played_this_round" => {
                Some(Self::PokerHandBeenPlayed)
            }
            "cards_selected" | "selected_count" => Some(Self::CardsSelected),
            "generic_compare" | "compare" => Some(Self::GenericCompare),
            "blind_requirement" | "check_blind_requirements" => Some(Self::BlindRequirement),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::InternalVariable => "internal_variable",
            Self::HandType => "hand_type",
            Self::CardRank => "card_rank",
            Self::CardSuit => "card_suit",
            Self::CardEnhancement => "card_enhancement",
            Self::CardSeal => "card_seal",
            Self::CardEdition => "card_edition",
            Self::CardCount => "card_count",
            Self::SuitCount => "suit_count",
            Self::RankCount => "rank_count",
            Self::FirstLastScored => "first_last_scored",
            Self::PlayerMoney => "player_money",
            Self::RemainingHands => "remaining_hands",
            Self::RemainingDiscards => "remaining_discards",
            Self::HandSize => "hand_size",
            Self::BlindType => "blind_type",
            Self::AnteLevel => "ante_level",
            Self::JokerCount => "joker_count",
            Self::SpecificJoker => "specific_joker",
            Self::JokerRarity => "joker_rarity",
            Self::JokerSticker => "joker_sticker",
            Self::CheckFlag => "check_flag",
            Self::DeckSize => "deck_size",
            Self::HandLevel => "hand_level",
            Self::PokerHandBeenPlayed => "poker_hand_been_played",
            Self::CardsSelected => "cards_selected",
            Self::GenericCompare => "generic_compare",
            Self::BlindRequirement => "blind_requirement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for kind in ConditionKind::ALL {
            assert_eq!(ConditionKind::from_keyword(kind.keyword()), Some(kind));
        }
    }
}
