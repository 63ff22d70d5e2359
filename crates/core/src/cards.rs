use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Name used by the runtime (`card:is_suit("Spades")`, `SMODS.change_base`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Spades => "Spades",
            Self::Hearts => "Hearts",
            Self::Clubs => "Clubs",
            Self::Diamonds => "Diamonds",
        }
    }

    /// Prefix letter of `G.P_CARDS` entries.
    pub fn code(self) -> char {
        match self {
            Self::Spades => 'S',
            Self::Hearts => 'H',
            Self::Clubs => 'C',
            Self::Diamonds => 'D',
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Self::Hearts | Self::Diamonds)
    }
}

impl FromStr for Suit {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spades" | "spade" | "s" => Ok(Self::Spades),
            "hearts" | "heart" | "h" => Ok(Self::Hearts),
            "clubs" | "club" | "c" => Ok(Self::Clubs),
            "diamonds" | "diamond" | "d" => Ok(Self::Diamonds),
            _ => Err(ModelError::UnknownSuit(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Value returned by `card:get_id()`.
    pub fn id(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten => 10,
            Self::Jack => 11,
            Self::Queen => 12,
            Self::King => 13,
            Self::Ace => 14,
        }
    }

    /// Value stored in `card.base.value` and accepted by `SMODS.change_base`.
    pub fn base_value(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "Jack",
            Self::Queen => "Queen",
            Self::King => "King",
            Self::Ace => "Ace",
        }
    }

    /// Suffix of `G.P_CARDS` entries (`S_T`, `H_A`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "T",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Self::Jack | Self::Queen | Self::King)
    }
}

impl FromStr for Rank {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "2" | "two" => Ok(Self::Two),
            "3" | "three" => Ok(Self::Three),
            "4" | "four" => Ok(Self::Four),
            "5" | "five" => Ok(Self::Five),
            "6" | "six" => Ok(Self::Six),
            "7" | "seven" => Ok(Self::Seven),
            "8" | "eight" => Ok(Self::Eight),
            "9" | "nine" => Ok(Self::Nine),
            "10" | "t" | "ten" => Ok(Self::Ten),
            "11" | "j" | "jack" => Ok(Self::Jack),
            "12" | "q" | "queen" => Ok(Self::Queen),
            "13" | "k" | "king" => Ok(Self::King),
            "14" | "1" | "a" | "ace" => Ok(Self::Ace),
            _ => Err(ModelError::UnknownRank(value.to_string())),
        }
    }
}

/// Rank shorthands accepted wherever a single rank is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankGroup {
    Face,
    Even,
    Odd,
}

impl RankGroup {
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "face" | "faces" => Some(Self::Face),
            "even" => Some(Self::Even),
            "odd" => Some(Self::Odd),
            _ => None,
        }
    }

    /// Rank ids belonging to the group. Aces count as odd.
    pub fn ids(self) -> Vec<u8> {
        match self {
            Self::Face => vec![11, 12, 13],
            Self::Even => vec![2, 4, 6, 8, 10],
            Self::Odd => vec![3, 5, 7, 9, 14],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Enhancement {
    Bonus,
    Mult,
    Wild,
    Glass,
    Steel,
    Stone,
    Lucky,
    Gold,
}

impl Enhancement {
    pub const ALL: [Enhancement; 8] = [
        Enhancement::Bonus,
        Enhancement::Mult,
        Enhancement::Wild,
        Enhancement::Glass,
        Enhancement::Steel,
        Enhancement::Stone,
        Enhancement::Gold,
        Enhancement::Lucky,
    ];

    /// Center key (`G.P_CENTERS.m_gold`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Bonus => "m_bonus",
            Self::Mult => "m_mult",
            Self::Wild => "m_wild",
            Self::Glass => "m_glass",
            Self::Steel => "m_steel",
            Self::Stone => "m_stone",
            Self::Lucky => "m_lucky",
            Self::Gold => "m_gold",
        }
    }
}

impl FromStr for Enhancement {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.strip_prefix("m_").unwrap_or(&lowered) {
            "bonus" => Ok(Self::Bonus),
            "mult" => Ok(Self::Mult),
            "wild" => Ok(Self::Wild),
            "glass" => Ok(Self::Glass),
            "steel" => Ok(Self::Steel),
            "stone" => Ok(Self::Stone),
            "lucky" => Ok(Self::Lucky),
            "gold" => Ok(Self::Gold),
            _ => Err(ModelError::UnknownEnhancement(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Edition {
    Foil,
    Holographic,
    Polychrome,
    Negative,
}

impl Edition {
    /// Edition key (`e_foil`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Foil => "e_foil",
            Self::Holographic => "e_holo",
            Self::Polychrome => "e_polychrome",
            Self::Negative => "e_negative",
        }
    }

    /// Field set on `card.edition` when the edition is applied.
    pub fn field(self) -> &'static str {
        match self {
            Self::Foil => "foil",
            Self::Holographic => "holo",
            Self::Polychrome => "polychrome",
            Self::Negative => "negative",
        }
    }
}

impl FromStr for Edition {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.strip_prefix("e_").unwrap_or(&lowered) {
            "foil" => Ok(Self::Foil),
            "holo" | "holographic" => Ok(Self::Holographic),
            "polychrome" | "poly" => Ok(Self::Polychrome),
            "negative" => Ok(Self::Negative),
            _ => Err(ModelError::UnknownEdition(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Seal {
    Red,
    Blue,
    Gold,
    Purple,
}

impl Seal {
    pub fn key(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Gold => "Gold",
            Self::Purple => "Purple",
        }
    }
}

impl FromStr for Seal {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            "gold" => Ok(Self::Gold),
            "purple" => Ok(Self::Purple),
            _ => Err(ModelError::UnknownSeal(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl JokerRarity {
    /// Numeric rarity used by `SMODS.Joker { rarity = ... }`.
    pub fn index(self) -> u8 {
        match self {
            Self::Common => 1,
            Self::Uncommon => 2,
            Self::Rare => 3,
            Self::Legendary => 4,
        }
    }

    /// Name accepted by `SMODS.add_card { rarity = ... }`.
    pub fn pool_name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Legendary => "Legendary",
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(Self::Common),
            2 => Some(Self::Uncommon),
            3 => Some(Self::Rare),
            4 => Some(Self::Legendary),
            _ => None,
        }
    }
}

impl FromStr for JokerRarity {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(index) = trimmed.parse::<i64>() {
            return Self::from_index(index).ok_or_else(|| ModelError::UnknownRarity(value.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "uncommon" => Ok(Self::Uncommon),
            "rare" => Ok(Self::Rare),
            "legendary" => Ok(Self::Legendary),
            _ => Err(ModelError::UnknownRarity(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConsumableKind {
    Tarot,
    Planet,
    Spectral,
}

impl ConsumableKind {
    pub fn set_name(self) -> &'static str {
        match self {
            Self::Tarot => "Tarot",
            Self::Planet => "Planet",
            Self::Spectral => "Spectral",
        }
    }

    /// Localization key of the "+1 <kind>" popup.
    pub fn plus_message_key(self) -> &'static str {
        match self {
            Self::Tarot => "k_plus_tarot",
            Self::Planet => "k_plus_planet",
            Self::Spectral => "k_plus_spectral",
        }
    }
}

impl FromStr for ConsumableKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tarot" => Ok(Self::Tarot),
            "planet" => Ok(Self::Planet),
            "spectral" => Ok(Self::Spectral),
            _ => Err(ModelError::UnknownConsumableKind(value.to_string())),
        }
    }
}

/// Poker hands known to the base game, in the order the game lists them.
pub const POKER_HANDS: [&str; 12] = [
    "High Card",
    "Pair",
    "Two Pair",
    "Three of a Kind",
    "Straight",
    "Flush",
    "Full House",
    "Four of a Kind",
    "Straight Flush",
    "Five of a Kind",
    "Flush House",
    "Flush Five",
];

/// Maps UI spellings (`"flush_house"`, `"two pair"`) to the game's hand name.
pub fn normalize_poker_hand(value: &str) -> Option<&'static str> {
    let wanted: String = value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect();
    POKER_HANDS.iter().copied().find(|hand| {
        let name: String = hand
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        name == wanted
    })
}
