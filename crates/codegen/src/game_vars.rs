//! Read-only game state queries usable wherever a number is expected.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameVariable {
    pub id: &'static str,
    pub label: &'static str,
    pub code: &'static str,
}

const fn var(id: &'static str, label: &'static str, code: &'static str) -> GameVariable {
    GameVariable { id, label, code }
}

pub const GAME_VARIABLES: [GameVariable; 25] = [
    var("money", "Current Money", "G.GAME.dollars"),
    var("hands_left", "Hands Remaining", "G.GAME.current_round.hands_left"),
    var("discards_left", "Discards Remaining", "G.GAME.current_round.discards_left"),
    var("hand_size", "Hand Size", "G.hand.config.card_limit"),
    var("joker_count", "Jokers Owned", "#(G.jokers and G.jokers.cards or {})"),
    var("joker_slots", "Joker Slots", "G.jokers.config.card_limit"),
    var(
        "consumable_count",
        "Consumables Held",
        "#(G.consumeables and G.consumeables.cards or {})",
    ),
    var("consumable_slots", "Consumable Slots", "G.consumeables.config.card_limit"),
    var("ante", "Current Ante", "G.GAME.round_resets.ante"),
    var("round", "Current Round", "G.GAME.round"),
    var("deck_size", "Full Deck Size", "#(G.playing_cards or {})"),
    var("remaining_deck", "Cards Left In Deck", "#(G.deck and G.deck.cards or {})"),
    var("cards_in_hand", "Cards In Hand", "#(G.hand and G.hand.cards or {})"),
    var("blind_chips", "Blind Requirement", "(G.GAME.blind and G.GAME.blind.chips or 0)"),
    var("current_score", "Current Score", "G.GAME.chips"),
    var(
        "hands_played_round",
        "Hands Played This Round",
        "G.GAME.current_round.hands_played",
    ),
    var(
        "discards_used_round",
        "Discards Used This Round",
        "G.GAME.current_round.discards_used",
    ),
    var("total_hands_played", "Total Hands Played", "G.GAME.hands_played"),
    var("skips", "Blinds Skipped", "G.GAME.skips"),
    var("reroll_cost", "Reroll Cost", "G.GAME.current_round.reroll_cost"),
    var("interest_cap", "Interest Cap", "G.GAME.interest_cap"),
    var(
        "tarots_used",
        "Tarot Cards Used",
        "(G.GAME.consumeable_usage_total and G.GAME.consumeable_usage_total.tarot or 0)",
    ),
    var(
        "planets_used",
        "Planet Cards Used",
        "(G.GAME.consumeable_usage_total and G.GAME.consumeable_usage_total.planet or 0)",
    ),
    var(
        "stone_cards_in_deck",
        "Stone Cards In Deck",
        "(function() local count = 0 for _, playing_card in ipairs(G.playing_cards or {}) do if SMODS.has_enhancement(playing_card, 'm_stone') then count = count + 1 end end return count end)()",
    ),
    var("sell_value_self", "This Card's Sell Value", "card.sell_cost"),
];

pub fn find_game_variable(id: &str) -> Option<&'static GameVariable> {
    GAME_VARIABLES.iter().find(|var| var.id == id)
}
