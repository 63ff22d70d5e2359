//! Passive rules: ownership hooks, calculate preludes and shared patches.
//!
//! A passive rule never goes through the trigger assembler. Its single
//! effect becomes an `add_to_deck`/`remove_from_deck` pair, a block at the
//! top of `calculate`, or a [`HookRequest`] rendered once per mod.

use crate::effects::{Limit, RoundResource};
use crate::hooks::{HookDetail, HookKind, HookRequest};
use crate::options::ObjectKind;
use crate::session::CompileSession;
use crate::values::{resolve_shared, ResolvedValue};
use jokerforge_core::{Effect, EffectKind, ParamValue, Rank, RankGroup, Rule, Suit};

/// Literal-only value for passive effects. Ranges would roll twice (once
/// when added, once when removed), so they settle on their lower bound.
fn passive_value(
    session: &mut CompileSession<'_>,
    effect: &Effect,
    name: &str,
    default: f64,
) -> ResolvedValue {
    let value = match effect.params.value("value") {
        ParamValue::Range { min, .. } => {
            session.warn(format!(
                "passive `{}` cannot use a random range, using {}",
                effect.effect_type, min
            ));
            ParamValue::Number(min)
        }
        other => other,
    };
    let resolved = resolve_shared(session, &effect.id, &value, name, default);
    session.config.extend(resolved.config.iter().cloned());
    if let Some(display) = &resolved.display {
        if !session.display.contains(display) {
            session.display.push(display.clone());
        }
    }
    resolved
}

fn on_ownership(session: &mut CompileSession<'_>, add: String, remove: String) {
    session.passive.add_to_deck.push(add);
    session.passive.remove_from_deck.push(remove);
}

/// Compiles one passive rule into the session's passive parts and hooks.
pub fn compile_passive(session: &mut CompileSession<'_>, rule: &Rule) {
    if rule.effects.len() != 1 || rule.has_conditions() || !rule.random_groups.is_empty() {
        session.warn(format!(
            "passive rule `{}` must have exactly one effect and no conditions or random groups, using its first effect",
            rule.id
        ));
    }
    let Some(effect) = rule.effects.first() else {
        return;
    };
    let Some(kind) = effect.kind() else {
        session.warn(format!("unknown effect type `{}`", effect.effect_type));
        return;
    };
    if session.object != ObjectKind::Joker && kind != EffectKind::AllCardsScore {
        session.warn(format!(
            "passive `{}` only applies to jokers",
            effect.effect_type
        ));
        return;
    }

    match kind {
        EffectKind::EditHandSize => limit(session, effect, Limit::HandSize),
        EffectKind::EditJokerSlots => limit(session, effect, Limit::JokerSlots),
        EffectKind::EditConsumableSlots => limit(session, effect, Limit::ConsumableSlots),
        EffectKind::EditHand => resource(session, effect, RoundResource::Hands),
        EffectKind::EditDiscard => resource(session, effect, RoundResource::Discards),
        EffectKind::AllowDebt => {
            let debt = passive_value(session, effect, "debt", 20.0);
            on_ownership(
                session,
                format!("G.GAME.bankrupt_at = G.GAME.bankrupt_at - {}", debt.expr),
                format!("G.GAME.bankrupt_at = G.GAME.bankrupt_at + {}", debt.expr),
            );
        }
        EffectKind::FreeRerolls => {
            let rerolls = passive_value(session, effect, "free_rerolls", 1.0);
            on_ownership(
                session,
                format!("SMODS.change_free_rerolls({})", rerolls.expr),
                format!("SMODS.change_free_rerolls(-({}))", rerolls.expr),
            );
        }
        EffectKind::DiscountItems => {
            let discount = passive_value(session, effect, "discount", 25.0);
            on_ownership(
                session,
                discount_change(&format!("+ {}", discount.expr)),
                discount_change(&format!("- {}", discount.expr)),
            );
        }
        EffectKind::CopyJokerAbility => {
            let block = copy_joker_ability(&effect.params.str_or("position", "right"));
            session.passive.calculate.push(block);
        }
        EffectKind::AllCardsScore => {
            session.passive.calculate.push(
                "if context.modify_scoring_hand and not context.blueprint then\n    return {\n        add_to_hand = true\n    }\nend"
                    .to_string(),
            );
        }
        EffectKind::CombineSuits => {
            let first = suit_param(session, effect, "suit_1", Suit::Hearts);
            let second = suit_param(session, effect, "suit_2", Suit::Diamonds);
            request(session, HookKind::CombineSuits, HookDetail::Suits(first, second));
        }
        EffectKind::CombineRanks => {
            let detail = combine_ranks(session, effect);
            request(session, HookKind::CombineRanks, detail);
        }
        EffectKind::AllowDuplicates => request(session, HookKind::AllowDuplicates, HookDetail::None),
        EffectKind::ReduceFlushStraight => {
            request(session, HookKind::ReduceFlushStraight, HookDetail::None)
        }
        EffectKind::Shortcut => request(session, HookKind::Shortcut, HookDetail::None),
        other => {
            session.warn(format!("`{}` has no passive form", other.keyword()));
        }
    }
}

fn limit(session: &mut CompileSession<'_>, effect: &Effect, limit: Limit) {
    let value = passive_value(session, effect, limit.slot(), 1.0);
    let (add, remove) = signed(effect, &value.expr);
    on_ownership(session, limit.delta(&add), limit.delta(&remove));
}

fn resource(session: &mut CompileSession<'_>, effect: &Effect, resource: RoundResource) {
    let value = passive_value(session, effect, resource.slot(), 1.0);
    let (add, remove) = signed(effect, &value.expr);
    on_ownership(
        session,
        resource.permanent_delta(&add),
        resource.permanent_delta(&remove),
    );
}

/// Deltas applied when the card is gained and lost.
fn signed(effect: &Effect, expr: &str) -> (String, String) {
    let negated = format!("-({})", expr);
    match effect.params.str_or("operation", "add").as_str() {
        "subtract" => (negated, expr.to_string()),
        _ => (expr.to_string(), negated),
    }
}

fn discount_change(delta: &str) -> String {
    format!(
        "G.E_MANAGER:add_event(Event({{\n    func = function()\n        G.GAME.discount_percent = (G.GAME.discount_percent or 0) {}\n        for _, v in pairs(G.I.CARD) do\n            if v.set_cost then\n                v:set_cost()\n            end\n        end\n        return true\n    end\n}}))",
        delta
    )
}

fn copy_joker_ability(position: &str) -> String {
    let locate = match position {
        "left" => "local target_joker = nil\nfor i = 1, #G.jokers.cards do\n    if G.jokers.cards[i] == card then\n        target_joker = G.jokers.cards[i - 1]\n    end\nend",
        "leftmost" => "local target_joker = G.jokers.cards[1]",
        "rightmost" => "local target_joker = G.jokers.cards[#G.jokers.cards]",
        _ => "local target_joker = nil\nfor i = 1, #G.jokers.cards do\n    if G.jokers.cards[i] == card then\n        target_joker = G.jokers.cards[i + 1]\n    end\nend",
    };
    format!(
        "{}\nlocal copied_effect = SMODS.blueprint_effect(card, target_joker, context)\nif copied_effect then\n    return copied_effect\nend",
        locate
    )
}

fn request(session: &mut CompileSession<'_>, kind: HookKind, detail: HookDetail) {
    let request = HookRequest {
        kind,
        item_key: session.full_key.clone(),
        detail,
    };
    if !session.hooks.contains(&request) {
        session.hooks.push(request);
    }
}

fn suit_param(session: &mut CompileSession<'_>, effect: &Effect, key: &str, default: Suit) -> Suit {
    match effect.params.str(key) {
        Some(text) => text.parse().unwrap_or_else(|_| {
            session.warn(format!("unknown suit `{}`, using {}", text, default.name()));
            default
        }),
        None => default,
    }
}

fn combine_ranks(session: &mut CompileSession<'_>, effect: &Effect) -> HookDetail {
    let params = &effect.params;
    let mut sources: Vec<u8> = match params.str("source_rank_group").and_then(|g| RankGroup::from_keyword(&g)) {
        Some(group) => group.ids(),
        None => params
            .strings("source_ranks")
            .iter()
            .filter_map(|text| text.parse::<Rank>().ok())
            .map(Rank::id)
            .collect(),
    };
    if sources.is_empty() {
        sources = RankGroup::Face.ids();
    }
    let target = match params.str("target_rank") {
        Some(text) => match text.parse::<Rank>() {
            Ok(rank) => rank.id(),
            Err(_) => {
                session.warn(format!("unknown rank `{}`, using King", text));
                Rank::King.id()
            }
        },
        None => Rank::King.id(),
    };
    sources.retain(|id| *id != target);
    HookDetail::Ranks { sources, target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerateOptions;
    use jokerforge_core::{Condition, ConditionGroup, Params, Trigger, UserVariable};

    fn passive(effect: Effect) -> Rule {
        Rule::new("p", Trigger::Passive).with_effect(effect)
    }

    #[test]
    fn hand_size_changes_on_ownership() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "juggler", &vars);
        let rule = passive(Effect::new("e", "edit_hand_size", Params::new().with("value", 2)));
        compile_passive(&mut session, &rule);
        assert_eq!(
            session.passive.add_to_deck,
            vec!["G.hand:change_size(card.ability.extra.hand_size)".to_string()]
        );
        assert_eq!(
            session.passive.remove_from_deck,
            vec!["G.hand:change_size(-(card.ability.extra.hand_size))".to_string()]
        );
        assert!(session.config.get("hand_size").is_some());
    }

    #[test]
    fn hooks_are_requested_once_per_item() {
        let options = GenerateOptions::default().with_prefix("mymod");
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "showman", &vars);
        let rule = passive(Effect::new("e", "allow_duplicates", Params::new()));
        compile_passive(&mut session, &rule);
        compile_passive(&mut session, &rule);
        assert_eq!(
            session.hooks,
            vec![HookRequest::simple(HookKind::AllowDuplicates, "j_mymod_showman")]
        );
    }

    #[test]
    fn wrong_shape_uses_first_effect_and_warns() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "odd", &vars);
        let rule = Rule::new("p", Trigger::Passive)
            .with_conditions(ConditionGroup::all_of(
                "g",
                vec![Condition::new("c", "remaining_hands", Params::new())],
            ))
            .with_effect(Effect::new("a", "allow_debt", Params::new().with("value", 10)))
            .with_effect(Effect::new("b", "free_rerolls", Params::new()));
        compile_passive(&mut session, &rule);
        assert_eq!(session.warnings.len(), 1);
        assert_eq!(session.passive.add_to_deck.len(), 1);
        assert!(session.passive.add_to_deck[0].contains("bankrupt_at"));
        assert!(session.config.get("free_rerolls").is_none());
    }

    #[test]
    fn copy_ability_goes_into_calculate() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "mirror", &vars);
        let rule = passive(Effect::new(
            "e",
            "copy_joker_ability",
            Params::new().with("position", "leftmost"),
        ));
        compile_passive(&mut session, &rule);
        assert_eq!(session.passive.calculate.len(), 1);
        assert!(session.passive.calculate[0].starts_with("local target_joker = G.jokers.cards[1]"));
        assert!(session.passive.add_to_deck.is_empty());
    }

    #[test]
    fn combined_ranks_default_to_faces_as_kings() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "royal", &vars);
        compile_passive(&mut session, &passive(Effect::new("e", "combine_ranks", Params::new())));
        assert_eq!(
            session.hooks[0].detail,
            HookDetail::Ranks {
                sources: vec![11, 12],
                target: 13
            }
        );
    }
}
