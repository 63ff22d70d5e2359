//! Effects that write the item's own user variables.

use super::{Colour, EffectOutput, EffectScope};
use crate::allocator::{ConfigOrigin, ConfigVar};
use crate::lua::{lua_number, lua_string};
use jokerforge_core::{normalize_poker_hand, ParamValue, Rank, Suit, UserVariableType};

/// Slot path of the variable named in `params.variable_name`, declaring a
/// zeroed slot when the item never declared it.
fn target_slot(scope: &mut EffectScope<'_, '_>, expected: UserVariableType) -> (String, EffectOutput) {
    let name = scope.params().str_or("variable_name", "var1");
    let mut output = EffectOutput::empty();
    match scope.session.find_user_var(&name) {
        Some(var) if var.var_type != expected => {
            scope.warn(format!(
                "variable `{}` is {:?}, expected {:?}",
                name, var.var_type, expected
            ));
        }
        Some(_) => {}
        None => {
            scope.warn(format!("effect writes undeclared variable `{}`", name));
            if expected == UserVariableType::Number {
                output = output.declare(
                    ConfigVar::number(&name, 0.0).with_origin(ConfigOrigin::UserNumber),
                );
            }
        }
    }
    (scope.extra(&name), output)
}

pub(super) fn modify_internal_variable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let (slot, declared) = target_slot(scope, UserVariableType::Number);
    let (amount, base) = match scope.params().value("value") {
        ParamValue::Number(number) => (lua_number(number), declared),
        ParamValue::Missing => (lua_number(1.0), declared),
        _ => {
            let resolved = scope.value("value", "change", 1.0);
            (resolved.expr.clone(), declared.uses(&resolved))
        }
    };
    finish_modify(scope, slot, amount, base)
}

fn finish_modify(
    scope: &mut EffectScope<'_, '_>,
    slot: String,
    amount: String,
    base: EffectOutput,
) -> EffectOutput {
    let operation = scope.params().str_or("operation", "increment");
    let (assignment, message) = match operation.as_str() {
        "set" => (
            format!("{} = {}", slot, amount),
            format!("\"Set to \"..tostring({})", amount),
        ),
        "decrement" => (
            format!("{slot} = ({slot}) - {amount}", slot = slot, amount = amount),
            format!("\"-\"..tostring({})", amount),
        ),
        "multiply" => (
            format!("{slot} = ({slot}) * {amount}", slot = slot, amount = amount),
            format!("\"X\"..tostring({})", amount),
        ),
        "divide" => (
            format!("{slot} = ({slot}) / {amount}", slot = slot, amount = amount),
            format!("\"/\"..tostring({})", amount),
        ),
        _ => (
            format!("{slot} = ({slot}) + {amount}", slot = slot, amount = amount),
            format!("\"+\"..tostring({})", amount),
        ),
    };
    let mut output = EffectOutput::func(&assignment)
        .message(message)
        .colour(Colour::Green);
    output.config = base.config;
    output.display = base.display;
    output
}

pub(super) fn change_suit_variable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let (slot, declared) = target_slot(scope, UserVariableType::Suit);
    let value = match scope.params().str_or("change_type", "random").as_str() {
        "specific" => {
            let suit = scope
                .params()
                .str("specific_suit")
                .and_then(|suit| suit.parse::<Suit>().ok())
                .unwrap_or(Suit::Spades);
            lua_string(suit.name())
        }
        "scored_card" | "triggered_card" => format!("{}.base.suit", scope.subject()),
        _ => format!(
            "pseudorandom_element(SMODS.Suits, pseudoseed('{}')).key",
            scope.seed("change_suit")
        ),
    };
    let mut output = EffectOutput::func(&format!("{} = {}", slot, value));
    output.config = declared.config;
    output
}

pub(super) fn change_rank_variable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let (slot, declared) = target_slot(scope, UserVariableType::Rank);
    let value = match scope.params().str_or("change_type", "random").as_str() {
        "specific" => {
            let rank = scope
                .params()
                .str("specific_rank")
                .and_then(|rank| rank.parse::<Rank>().ok())
                .unwrap_or(Rank::Ace);
            lua_string(rank.base_value())
        }
        "scored_card" | "triggered_card" => format!("{}.base.value", scope.subject()),
        _ => format!(
            "pseudorandom_element(SMODS.Ranks, pseudoseed('{}')).key",
            scope.seed("change_rank")
        ),
    };
    let mut output = EffectOutput::func(&format!("{} = {}", slot, value));
    output.config = declared.config;
    output
}

pub(super) fn change_pokerhand_variable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let (slot, declared) = target_slot(scope, UserVariableType::Pokerhand);
    let mut pre = Vec::new();
    let value = match scope.params().str_or("change_type", "random").as_str() {
        "specific" => {
            let hand = scope
                .params()
                .str("specific_pokerhand")
                .and_then(|hand| normalize_poker_hand(&hand))
                .unwrap_or("High Card");
            lua_string(hand)
        }
        "current" => "context.scoring_name or G.GAME.last_hand_played".to_string(),
        "most_played" => {
            let best = scope.local("most_played_hand");
            pre.push(format!("local {} = \"High Card\"", best));
            pre.push("for hand, value in pairs(G.GAME.hands) do".to_string());
            pre.push(format!(
                "    if value.visible and value.played > G.GAME.hands[{}].played then",
                best
            ));
            pre.push(format!("        {} = hand", best));
            pre.push("    end".to_string());
            pre.push("end".to_string());
            best
        }
        _ => {
            let pool = scope.local("pokerhand_pool");
            pre.push(format!("local {} = {{}}", pool));
            pre.push("for hand, value in pairs(G.GAME.hands) do".to_string());
            pre.push("    if value.visible then".to_string());
            pre.push(format!("        {pool}[#{pool} + 1] = hand", pool = pool));
            pre.push("    end".to_string());
            pre.push("end".to_string());
            format!(
                "pseudorandom_element({}, pseudoseed('{}'))",
                pool,
                scope.seed("change_pokerhand")
            )
        }
    };
    let mut output = EffectOutput::func(&format!("{} = {}", slot, value));
    output.pre_return = pre;
    output.config = declared.config;
    output
}
