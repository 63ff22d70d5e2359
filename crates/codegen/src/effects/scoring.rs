use super::{Colour, EffectOutput, EffectScope};
use crate::lua::lua_string;
use crate::options::ObjectKind;
use jokerforge_core::Trigger;

fn scoring_field(scope: &mut EffectScope<'_, '_>, field: &str, base: &str, default: f64) -> EffectOutput {
    let value = scope.value("value", base, default);
    EffectOutput::field(format!("{} = {}", field, value.expr)).uses(&value)
}

pub(super) fn add_chips(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    scoring_field(scope, "chips", "chips", 10.0)
}

pub(super) fn add_mult(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    scoring_field(scope, "mult", "mult", 5.0)
}

pub(super) fn apply_x_mult(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    scoring_field(scope, "Xmult", "xmult", 1.5)
}

pub(super) fn apply_x_chips(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    scoring_field(scope, "x_chips", "xchips", 1.5)
}

pub(super) fn apply_exp_mult(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    scoring_field(scope, "e_mult", "emult", 1.1)
}

pub(super) fn apply_exp_chips(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    scoring_field(scope, "e_chips", "echips", 1.1)
}

/// Scoring contexts take a flat `dollars` field; every other trigger eases
/// the money counter directly.
pub(super) fn add_dollars(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let value = scope.value("value", "dollars", 5.0);
    if scope.is_scoring() {
        return EffectOutput::field(format!("dollars = {}", value.expr)).uses(&value);
    }
    EffectOutput::func(&format!("ease_dollars({})", value.expr))
        .message(format!("\"$\"..tostring({})", value.expr))
        .colour(Colour::Money)
        .uses(&value)
}

pub(super) fn set_dollars(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let operation = scope.params().str_or("operation", "set");
    let value = scope.value("value", "dollars", 5.0);
    let (body, message) = match operation.as_str() {
        "add" => (
            format!("ease_dollars({})", value.expr),
            format!("\"+$\"..tostring({})", value.expr),
        ),
        "subtract" => (
            format!("ease_dollars(-({}))", value.expr),
            format!("\"-$\"..tostring({})", value.expr),
        ),
        _ => (
            format!(
                "local target_amount = {}\nlocal current_amount = G.GAME.dollars\nlocal difference = target_amount - current_amount\nease_dollars(difference)",
                value.expr
            ),
            format!("\"Set to $\"..tostring({})", value.expr),
        ),
    };
    EffectOutput::func(&body)
        .message(message)
        .colour(Colour::Money)
        .uses(&value)
}

pub(super) fn balance(_scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    EffectOutput::field("balance = true")
}

pub(super) fn swap_chips_mult(_scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    EffectOutput::func(
        "local old_chips = hand_chips\nhand_chips = mod_chips(mult)\nmult = mod_mult(old_chips)\nupdate_hand_text({delay = 0}, {chips = hand_chips, mult = mult})",
    )
    .message("\"Swapped!\"")
    .colour(Colour::Purple)
}

pub(super) fn show_message(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let text = scope.params().str_or("text", "Activated!");
    EffectOutput::message_only(lua_string(&text), Colour::White)
}

pub(super) fn retrigger_cards(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let value = scope.value("repetitions", "repetitions", 1.0);
    EffectOutput::field(format!("repetitions = {}", value.expr))
        .message("localize('k_again_ex')")
        .colour(Colour::Orange)
        .uses(&value)
}

/// Discarded cards are removed through the return table. Scored and held
/// cards are only flagged here and removed in the `destroy_card` context.
pub(super) fn destroy_card(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    if *scope.trigger == Trigger::CardDiscarded {
        return EffectOutput::field("remove = true")
            .message("\"Destroyed!\"")
            .colour(Colour::Red);
    }
    if !scope.trigger.is_per_card() && scope.session.object != ObjectKind::Enhancement {
        scope.warn(format!("destroy_card needs a per-card trigger, not `{}`", scope.trigger));
        return EffectOutput::message_only("\"Destroyed!\"", Colour::Red);
    }
    EffectOutput::message_only("\"Destroyed!\"", Colour::Red)
        .pre(format!("{}.should_destroy = true", scope.subject()))
}

#[cfg(test)]
mod tests {
    use crate::effects::compile_effect;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Effect, Params, Trigger, UserVariable};

    #[test]
    fn dollars_shape_depends_on_trigger() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let effect = Effect::new("e1", "add_dollars", Params::new().with("value", 4));

        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let scored = compile_effect(&mut session, &effect, &Trigger::HandPlayed);
        assert_eq!(scored.statement, "dollars = card.ability.extra.dollars");
        assert!(scored.message.is_none());

        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let shop = compile_effect(&mut session, &effect, &Trigger::ShopEntered);
        assert!(shop.statement.starts_with("func = function()"));
        assert!(shop.statement.contains("ease_dollars(card.ability.extra.dollars)"));
    }

    #[test]
    fn discarded_cards_are_removed_in_place() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let effect = Effect::new("e1", "destroy_card", Params::new());
        let output = compile_effect(&mut session, &effect, &Trigger::CardDiscarded);
        assert_eq!(output.statement, "remove = true");

        let output = compile_effect(&mut session, &effect, &Trigger::CardScored);
        assert_eq!(output.pre_return, vec!["context.other_card.should_destroy = true"]);
    }
}
