//! Checks over run state, jokers and the item's own variables.

use super::ConditionScope;
use crate::effects::{flag_path, joker_key};
use crate::lua::lua_string;
use jokerforge_core::{normalize_poker_hand, slugify, JokerRarity, Rank, Suit, Trigger, UserVariableType};

pub(super) fn internal_variable(scope: &mut ConditionScope<'_, '_>) -> String {
    let name = scope.params().str_or("variable_name", "var1");
    let slot = scope.extra(&name);
    let Some(var) = scope.session.find_user_var(&name) else {
        scope.warn(format!("condition reads undeclared variable `{}`", name));
        return scope.compare(&format!("({} or 0)", slot), 0.0);
    };
    let wanted = scope.params().str("value");
    let literal = match var.var_type {
        UserVariableType::Number => return scope.compare(&slot, 0.0),
        UserVariableType::Suit => wanted
            .and_then(|value| value.parse::<Suit>().ok())
            .map(|suit| suit.name().to_string()),
        UserVariableType::Rank => wanted
            .and_then(|value| value.parse::<Rank>().ok())
            .map(|rank| rank.base_value().to_string()),
        UserVariableType::Pokerhand => wanted
            .and_then(|value| normalize_poker_hand(&value))
            .map(str::to_string),
    };
    let op = match scope.operator() {
        "~=" => "~=",
        _ => "==",
    };
    match literal {
        Some(value) => format!("{} {} {}", slot, op, lua_string(&value)),
        None => {
            scope.warn(format!("no comparable value for variable `{}`", name));
            format!("{} ~= nil", slot)
        }
    }
}

pub(super) fn blind_type(scope: &mut ConditionScope<'_, '_>) -> String {
    let kind = match scope.params().str_or("blind_type", "boss").to_ascii_lowercase().as_str() {
        "small" => "Small",
        "big" => "Big",
        _ => "Boss",
    };
    format!(
        "G.GAME.blind and G.GAME.blind:get_type() == {}",
        lua_string(kind)
    )
}

pub(super) fn joker_count(scope: &mut ConditionScope<'_, '_>) -> String {
    match scope.params().str("rarity").and_then(|r| r.parse::<JokerRarity>().ok()) {
        Some(rarity) => {
            let comparison = format!("{} {}", scope.operator(), scope.number("value", 1.0));
            format!(
                "(function()\n    local count = 0\n    for _, joker in ipairs(G.jokers and G.jokers.cards or {{}}) do\n        if joker.config.center.rarity == {} then\n            count = count + 1\n        end\n    end\n    return count {}\nend)()",
                rarity.index(),
                comparison
            )
        }
        None => scope.compare("#(G.jokers and G.jokers.cards or {})", 1.0),
    }
}

pub(super) fn specific_joker(scope: &mut ConditionScope<'_, '_>) -> String {
    let key = joker_key(&scope.params().str_or("joker_key", "joker"));
    format!("next(SMODS.find_card({}))", lua_string(&key))
}

/// Rarity as `config.center.rarity` stores it: an index for base rarities,
/// the prefixed key for modded ones.
fn rarity_value(scope: &ConditionScope<'_, '_>) -> String {
    let raw = scope.params().str_or("rarity", "common");
    match raw.parse::<JokerRarity>() {
        Ok(rarity) => rarity.index().to_string(),
        Err(_) => {
            let prefix = format!("{}_", scope.mod_prefix());
            let key = slugify(&raw);
            if key.starts_with(&prefix) {
                lua_string(&key)
            } else {
                lua_string(&format!("{}{}", prefix, key))
            }
        }
    }
}

pub(super) fn joker_rarity(scope: &mut ConditionScope<'_, '_>) -> String {
    let rarity = rarity_value(scope);
    if *scope.trigger == Trigger::JokerEvaluated {
        return format!("context.other_joker.config.center.rarity == {}", rarity);
    }
    format!(
        "(function()\n    for _, joker in ipairs(G.jokers and G.jokers.cards or {{}}) do\n        if joker ~= card and joker.config.center.rarity == {} then\n            return true\n        end\n    end\n    return false\nend)()",
        rarity
    )
}

pub(super) fn joker_sticker(scope: &mut ConditionScope<'_, '_>) -> String {
    let sticker = match scope.params().str_or("sticker", "eternal").as_str() {
        "perishable" => "perishable",
        "rental" => "rental",
        _ => "eternal",
    };
    let target = scope.params().str_or("target", "self");
    if target == "self" {
        return format!("card.ability.{}", sticker);
    }
    if *scope.trigger == Trigger::JokerEvaluated {
        return format!("context.other_joker.ability.{}", sticker);
    }
    format!(
        "(function()\n    for _, joker in ipairs(G.jokers and G.jokers.cards or {{}}) do\n        if joker ~= card and joker.ability.{} then\n            return true\n        end\n    end\n    return false\nend)()",
        sticker
    )
}

pub(super) fn check_flag(scope: &mut ConditionScope<'_, '_>) -> String {
    let name = scope.params().str_or("flag_name", "custom_flag");
    let path = flag_path(scope.mod_prefix(), &name);
    if scope.params().bool_or("value", true) {
        format!("{} == true", path)
    } else {
        format!("not {}", path)
    }
}

pub(super) fn deck_size(scope: &mut ConditionScope<'_, '_>) -> String {
    let area = match scope.params().str_or("deck", "full").as_str() {
        "remaining" => "#G.deck.cards",
        _ => "#G.playing_cards",
    };
    scope.compare(area, 52.0)
}

pub(super) fn generic_compare(scope: &mut ConditionScope<'_, '_>) -> String {
    let left = scope.number("value1", 0.0);
    let right = scope.number("value2", 0.0);
    format!("({}) {} ({})", left, scope.operator(), right)
}

/// Share of the blind's chip target already scored, in percent.
pub(super) fn blind_requirement(scope: &mut ConditionScope<'_, '_>) -> String {
    let percentage = scope.number("percentage", 100.0);
    format!(
        "G.GAME.blind and G.GAME.blind.chips > 0 and (G.GAME.chips / G.GAME.blind.chips) * 100 {} {}",
        scope.operator_or(">="),
        percentage
    )
}
