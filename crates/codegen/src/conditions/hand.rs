use super::ConditionScope;
use crate::lua::lua_string;
use jokerforge_core::{normalize_poker_hand, Trigger};

/// Expression naming the poker hand the trigger is about.
pub(crate) fn current_hand(trigger: &Trigger) -> &'static str {
    if *trigger == Trigger::HandDiscarded {
        "G.FUNCS.get_poker_hand_info(G.hand.highlighted)"
    } else if trigger.is_scoring() {
        "context.scoring_name"
    } else {
        "G.GAME.last_hand_played"
    }
}

/// Hand name from `params[key]`: a hand spelled any way the UI spells it,
/// or a poker hand variable. `None` means "the current hand".
fn hand_param(scope: &mut ConditionScope<'_, '_>, key: &str) -> Option<String> {
    let raw = scope.params().str(key)?;
    if matches!(raw.as_str(), "current" | "any") {
        return None;
    }
    if let Some(hand) = normalize_poker_hand(&raw) {
        return Some(lua_string(hand));
    }
    match scope.session.find_user_var(&raw) {
        Some(var) => Some(scope.extra(&var.name)),
        None => {
            scope.warn(format!("unknown poker hand `{}`", raw));
            Some(lua_string("High Card"))
        }
    }
}

pub(super) fn hand_type(scope: &mut ConditionScope<'_, '_>) -> String {
    let Some(hand) = hand_param(scope, "value") else {
        return format!("{} ~= nil", current_hand(scope.trigger));
    };
    let contains = scope.params().str_or("check_type", "scoring") == "contains";
    match (scope.trigger, contains) {
        (Trigger::HandDiscarded, false) => format!(
            "G.FUNCS.get_poker_hand_info(G.hand.highlighted) == {}",
            hand
        ),
        (Trigger::HandDiscarded, true) => format!(
            "(function()\n    local _, _, poker_hands = G.FUNCS.get_poker_hand_info(G.hand.highlighted)\n    return next(poker_hands[{}]) ~= nil\nend)()",
            hand
        ),
        (trigger, true) if trigger.is_scoring() => {
            format!("next(context.poker_hands[{}])", hand)
        }
        (trigger, _) => format!("{} == {}", current_hand(trigger), hand),
    }
}

pub(super) fn hand_level(scope: &mut ConditionScope<'_, '_>) -> String {
    let hand = hand_param(scope, "hand")
        .unwrap_or_else(|| format!("{} or \"High Card\"", current_hand(scope.trigger)));
    scope.compare(&format!("G.GAME.hands[{}].level", hand), 1.0)
}

pub(super) fn poker_hand_been_played(scope: &mut ConditionScope<'_, '_>) -> String {
    let hand = current_hand(scope.trigger);
    format!(
        "G.GAME.hands[{hand}] and G.GAME.hands[{hand}].played_this_round > 1",
        hand = hand
    )
}

#[cfg(test)]
mod tests {
    use crate::conditions::compile_condition;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Condition, Params, Trigger, UserVariable};

    fn compile(params: Params, kind: &str, trigger: Trigger, vars: &[UserVariable]) -> String {
        let options = GenerateOptions::default();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", vars);
        compile_condition(&mut session, &Condition::new("c", kind, params), &trigger)
    }

    #[test]
    fn scoring_hand_type_compares_scoring_name() {
        let text = compile(
            Params::new().with("value", "full_house"),
            "hand_type",
            Trigger::HandPlayed,
            &[],
        );
        assert_eq!(text, "context.scoring_name == \"Full House\"");
    }

    #[test]
    fn contains_checks_poker_hands_table() {
        let text = compile(
            Params::new().with("value", "Pair").with("check_type", "contains"),
            "hand_type",
            Trigger::HandPlayed,
            &[],
        );
        assert_eq!(text, "next(context.poker_hands[\"Pair\"])");
    }

    #[test]
    fn discarded_hand_reads_highlighted_cards() {
        let text = compile(
            Params::new().with("value", "Flush"),
            "hand_type",
            Trigger::HandDiscarded,
            &[],
        );
        assert_eq!(
            text,
            "G.FUNCS.get_poker_hand_info(G.hand.highlighted) == \"Flush\""
        );
    }

    #[test]
    fn hand_variable_reads_slot() {
        let vars = vec![UserVariable::poker_hand("favourite", "Flush")];
        let text = compile(
            Params::new().with("value", "favourite"),
            "hand_type",
            Trigger::HandPlayed,
            &vars,
        );
        assert_eq!(text, "context.scoring_name == card.ability.extra.favourite");
    }

    #[test]
    fn specific_hand_level() {
        let text = compile(
            Params::new()
                .with("hand", "straight")
                .with("operator", "greater_than")
                .with("value", 2),
            "hand_level",
            Trigger::RoundEnd,
            &[],
        );
        assert_eq!(text, "G.GAME.hands[\"Straight\"].level > 2");
    }
}
