//! Context checks that select the game event a rule answers to.

use crate::options::ObjectKind;
use jokerforge_core::Trigger;

/// Context guard of a trigger. `None` for triggers that never reach
/// `calculate` (passive rules, unknown trigger names).
pub fn trigger_guard(trigger: &Trigger, object: ObjectKind) -> Option<String> {
    if object == ObjectKind::Enhancement {
        if let Some(guard) = enhancement_guard(trigger) {
            return Some(guard.to_string());
        }
    }
    let guard = match trigger {
        Trigger::HandPlayed => "context.cardarea == G.jokers and context.joker_main",
        Trigger::CardScored => "context.individual and context.cardarea == G.play",
        Trigger::CardHeldInHand => {
            "context.individual and context.cardarea == G.hand and not context.end_of_round"
        }
        Trigger::CardHeldInHandEndOfRound => {
            "context.individual and context.cardarea == G.hand and context.end_of_round"
        }
        Trigger::BeforeHandPlayed => "context.before and context.cardarea == G.jokers",
        Trigger::AfterHandPlayed => "context.after and context.cardarea == G.jokers",
        Trigger::HandDiscarded => "context.pre_discard",
        Trigger::CardDiscarded => "context.discard",
        Trigger::RoundEnd => {
            "context.end_of_round and context.game_over == false and context.main_eval"
        }
        Trigger::BlindSelected => "context.setting_blind",
        Trigger::BlindSkipped => "context.skip_blind",
        Trigger::BossDefeated => {
            "context.end_of_round and context.main_eval and G.GAME.blind.boss"
        }
        Trigger::BoosterOpened => "context.open_booster",
        Trigger::BoosterSkipped => "context.skipping_booster",
        Trigger::ConsumableUsed => "context.using_consumeable",
        Trigger::HandDrawn => "context.hand_drawn",
        Trigger::FirstHandDrawn => "context.first_hand_drawn",
        Trigger::ShopEntered => "context.starting_shop",
        Trigger::ShopExited => "context.ending_shop",
        Trigger::ShopReroll => "context.reroll_shop",
        Trigger::CardBought => "context.buying_card",
        Trigger::CardSold => "context.selling_card",
        Trigger::SellingSelf => "context.selling_self",
        Trigger::JokerEvaluated => "context.other_joker",
        Trigger::CardDestroyed => "context.remove_playing_cards",
        Trigger::PlayingCardAdded => "context.playing_card_added",
        Trigger::GameOver => "context.end_of_round and context.game_over",
        Trigger::ChangeProbability => "context.mod_probability",
        Trigger::Passive | Trigger::Custom(_) => return None,
    };
    if object == ObjectKind::Consumable {
        // Held consumables are evaluated from their own area.
        return Some(
            guard
                .replace("context.cardarea == G.jokers and ", "")
                .replace(" and context.cardarea == G.jokers", ""),
        );
    }
    Some(guard.to_string())
}

/// Card-local contexts an enhanced playing card sees.
fn enhancement_guard(trigger: &Trigger) -> Option<&'static str> {
    match trigger {
        Trigger::CardScored => Some("context.main_scoring and context.cardarea == G.play"),
        Trigger::CardHeldInHand => Some("context.main_scoring and context.cardarea == G.hand"),
        Trigger::CardHeldInHandEndOfRound => {
            Some("context.playing_card_end_of_round and context.cardarea == G.hand")
        }
        Trigger::CardDiscarded => Some("context.discard and context.other_card == card"),
        _ => None,
    }
}

/// Adds the blueprint exclusion when the rule must not be copied.
pub fn with_blueprint(guard: &str, blueprint_compatible: bool) -> String {
    if blueprint_compatible {
        guard.to_string()
    } else {
        format!("{} and not context.blueprint", guard)
    }
}

/// Guard of the repetition pass for a trigger's retrigger rules.
pub fn retrigger_guard(trigger: &Trigger, object: ObjectKind) -> String {
    match (trigger, object) {
        (Trigger::CardHeldInHand | Trigger::CardHeldInHandEndOfRound, ObjectKind::Enhancement) => {
            "context.repetition and context.cardarea == G.hand".to_string()
        }
        (Trigger::CardHeldInHand | Trigger::CardHeldInHandEndOfRound, _) => {
            "context.repetition and context.cardarea == G.hand and (next(context.card_effects[1]) or #context.card_effects > 1)"
                .to_string()
        }
        _ => "context.repetition and context.cardarea == G.play".to_string(),
    }
}

/// Guard of the pass that removes cards flagged by an earlier pass.
pub fn destroy_guard(object: ObjectKind) -> &'static str {
    match object {
        ObjectKind::Enhancement => {
            "context.destroy_card and context.destroy_card == card and card.should_destroy"
        }
        _ => "context.destroy_card and context.destroy_card.should_destroy",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_trigger_but_passive_has_a_guard() {
        for trigger in Trigger::KNOWN.iter() {
            let guard = trigger_guard(trigger, ObjectKind::Joker);
            assert_eq!(guard.is_none(), *trigger == Trigger::Passive, "{}", trigger);
        }
    }

    #[test]
    fn unknown_trigger_has_no_guard() {
        assert_eq!(
            trigger_guard(&Trigger::Custom("moon".to_string()), ObjectKind::Joker),
            None
        );
    }

    #[test]
    fn enhancements_score_through_main_scoring() {
        assert_eq!(
            trigger_guard(&Trigger::CardScored, ObjectKind::Enhancement).as_deref(),
            Some("context.main_scoring and context.cardarea == G.play")
        );
        assert_eq!(
            trigger_guard(&Trigger::RoundEnd, ObjectKind::Enhancement),
            trigger_guard(&Trigger::RoundEnd, ObjectKind::Joker)
        );
    }

    #[test]
    fn consumables_drop_the_joker_area_check() {
        assert_eq!(
            trigger_guard(&Trigger::HandPlayed, ObjectKind::Consumable).as_deref(),
            Some("context.joker_main")
        );
        assert_eq!(
            trigger_guard(&Trigger::BeforeHandPlayed, ObjectKind::Consumable).as_deref(),
            Some("context.before")
        );
    }

    #[test]
    fn blueprint_exclusion_is_appended() {
        assert_eq!(
            with_blueprint("context.joker_main", false),
            "context.joker_main and not context.blueprint"
        );
        assert_eq!(with_blueprint("context.joker_main", true), "context.joker_main");
    }
}
