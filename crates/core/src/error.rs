use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown suit: {0}")]
    UnknownSuit(String),
    #[error("unknown rank: {0}")]
    UnknownRank(String),
    #[error("unknown enhancement: {0}")]
    UnknownEnhancement(String),
    #[error("unknown edition: {0}")]
    UnknownEdition(String),
    #[error("unknown seal: {0}")]
    UnknownSeal(String),
    #[error("unknown rarity: {0}")]
    UnknownRarity(String),
    #[error("unknown consumable kind: {0}")]
    UnknownConsumableKind(String),
}
