use serde::{Deserialize, Serialize};
use std::fmt;

/// Game event a rule reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Trigger {
    HandPlayed,
    CardScored,
    CardHeldInHand,
    CardHeldInHandEndOfRound,
    BeforeHandPlayed,
    AfterHandPlayed,
    HandDiscarded,
    CardDiscarded,
    RoundEnd,
    BlindSelected,
    BlindSkipped,
    BossDefeated,
    BoosterOpened,
    BoosterSkipped,
    ConsumableUsed,
    HandDrawn,
    FirstHandDrawn,
    ShopEntered,
    ShopExited,
    ShopReroll,
    CardBought,
    CardSold,
    SellingSelf,
    JokerEvaluated,
    CardDestroyed,
    PlayingCardAdded,
    GameOver,
    ChangeProbability,
    Passive,
    /// Trigger name this build does not know about.
    Custom(String),
}

impl Trigger {
    pub const KNOWN: [Trigger; 29] = [
        Trigger::HandPlayed,
        Trigger::CardScored,
        Trigger::CardHeldInHand,
        Trigger::CardHeldInHandEndOfRound,
        Trigger::BeforeHandPlayed,
        Trigger::AfterHandPlayed,
        Trigger::HandDiscarded,
        Trigger::CardDiscarded,
        Trigger::RoundEnd,
        Trigger::BlindSelected,
        Trigger::BlindSkipped,
        Trigger::BossDefeated,
        Trigger::BoosterOpened,
        Trigger::BoosterSkipped,
        Trigger::ConsumableUsed,
        Trigger::HandDrawn,
        Trigger::FirstHandDrawn,
        Trigger::ShopEntered,
        Trigger::ShopExited,
        Trigger::ShopReroll,
        Trigger::CardBought,
        Trigger::CardSold,
        Trigger::SellingSelf,
        Trigger::JokerEvaluated,
        Trigger::CardDestroyed,
        Trigger::PlayingCardAdded,
        Trigger::GameOver,
        Trigger::ChangeProbability,
        Trigger::Passive,
    ];

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hand_played" | "joker_main" => Some(Self::HandPlayed),
            "card_scored" | "scored" => Some(Self::CardScored),
            "card_held_in_hand" | "held" => Some(Self::CardHeldInHand),
            "card_held_in_hand_end_of_round" | "held_end_of_round" => {
                Some(Self::CardHeldInHandEndOfRound)
            }
            "before_hand_played" | "before" => Some(Self::BeforeHandPlayed),
            "after_hand_played" | "after" => Some(Self::AfterHandPlayed),
            "hand_discarded" | "pre_discard" => Some(Self::HandDiscarded),
            "card_discarded" | "discard" => Some(Self::CardDiscarded),
            "round_end" | "end_of_round" => Some(Self::RoundEnd),
            "blind_selected" | "setting_blind" => Some(Self::BlindSelected),
            "blind_skipped" | "skip_blind" => Some(Self::BlindSkipped),
            "boss_defeated" => Some(Self::BossDefeated),
            "booster_opened" | "open_booster" => Some(Self::BoosterOpened),
            "booster_skipped" | "skipping_booster" => Some(Self::BoosterSkipped),
            "consumable_used" | "using_consumeable" => Some(Self::ConsumableUsed),
            "hand_drawn" => Some(Self::HandDrawn),
            "first_hand_drawn" => Some(Self::FirstHandDrawn),
            "shop_entered" | "starting_shop" => Some(Self::ShopEntered),
            "shop_exited" | "ending_shop" => Some(Self::ShopExited),
            "shop_reroll" | "reroll_shop" => Some(Self::ShopReroll),
            "card_bought" | "buying_card" => Some(Self::CardBought),
            "card_sold" | "selling_card" => Some(Self::CardSold),
            "selling_self" => Some(Self::SellingSelf),
            "joker_evaluated" | "other_joker" => Some(Self::JokerEvaluated),
            "card_destroyed" | "remove_playing_cards" => Some(Self::CardDestroyed),
            "playing_card_added" => Some(Self::PlayingCardAdded),
            "game_over" => Some(Self::GameOver),
            "change_probability" | "mod_probability" => Some(Self::ChangeProbability),
            "passive" => Some(Self::Passive),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            Self::HandPlayed => "hand_played",
            Self::CardScored => "card_scored",
            Self::CardHeldInHand => "card_held_in_hand",
            Self::CardHeldInHandEndOfRound => "card_held_in_hand_end_of_round",
            Self::BeforeHandPlayed => "before_hand_played",
            Self::AfterHandPlayed => "after_hand_played",
            Self::HandDiscarded => "hand_discarded",
            Self::CardDiscarded => "card_discarded",
            Self::RoundEnd => "round_end",
            Self::BlindSelected => "blind_selected",
            Self::BlindSkipped => "blind_skipped",
            Self::BossDefeated => "boss_defeated",
            Self::BoosterOpened => "booster_opened",
            Self::BoosterSkipped => "booster_skipped",
            Self::ConsumableUsed => "consumable_used",
            Self::HandDrawn => "hand_drawn",
            Self::FirstHandDrawn => "first_hand_drawn",
            Self::ShopEntered => "shop_entered",
            Self::ShopExited => "shop_exited",
            Self::ShopReroll => "shop_reroll",
            Self::CardBought => "card_bought",
            Self::CardSold => "card_sold",
            Self::SellingSelf => "selling_self",
            Self::JokerEvaluated => "joker_evaluated",
            Self::CardDestroyed => "card_destroyed",
            Self::PlayingCardAdded => "playing_card_added",
            Self::GameOver => "game_over",
            Self::ChangeProbability => "change_probability",
            Self::Passive => "passive",
            Self::Custom(name) => name,
        }
    }

    /// Triggers evaluated while a hand is being scored. Effects that pay out
    /// here return flat fields (`dollars = ...`) instead of animated calls.
    pub fn is_scoring(&self) -> bool {
        matches!(
            self,
            Self::HandPlayed
                | Self::CardScored
                | Self::CardHeldInHand
                | Self::CardHeldInHandEndOfRound
                | Self::BeforeHandPlayed
                | Self::AfterHandPlayed
                | Self::JokerEvaluated
        )
    }

    /// Triggers that evaluate once per playing card (`context.other_card`).
    pub fn is_per_card(&self) -> bool {
        matches!(
            self,
            Self::CardScored
                | Self::CardHeldInHand
                | Self::CardHeldInHandEndOfRound
                | Self::CardDiscarded
        )
    }
}

impl From<String> for Trigger {
    fn from(value: String) -> Self {
        Self::from_keyword(&value).unwrap_or(Self::Custom(value))
    }
}

impl From<Trigger> for String {
    fn from(value: Trigger) -> Self {
        value.keyword().to_string()
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_trigger_round_trips_its_keyword() {
        for trigger in Trigger::KNOWN.iter() {
            assert_eq!(Trigger::from_keyword(trigger.keyword()).as_ref(), Some(trigger));
        }
    }

    #[test]
    fn unknown_names_are_kept() {
        let trigger = Trigger::from("on_moon_phase".to_string());
        assert_eq!(trigger, Trigger::Custom("on_moon_phase".to_string()));
        assert_eq!(trigger.keyword(), "on_moon_phase");
    }
}
