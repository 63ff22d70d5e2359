//! Builds the body of `calculate` from an item's rules.
//!
//! Rules are grouped by trigger in first-seen order. Inside a trigger the
//! rules with a guard form an `if`/`elseif` chain and the unguarded ones
//! share the trailing `else`. Retrigger effects get a repetition pass of
//! their own, cards flagged for destruction are removed by a pass at the
//! top, and probability effects answer the probability contexts directly.
//! Random groups are split the same way: a gated retrigger lands in the
//! repetition pass and a gated probability effect in its probability block.

use crate::conditions::compile_conditions;
use crate::effects::{compile_effect, probability_context, render_apply, render_return, EffectOutput};
use crate::lua::{indent, join_guards, LuaWriter};
use crate::options::ObjectKind;
use crate::random_groups::{compile_gate, raw_roll};
use crate::session::CompileSession;
use crate::triggers::{destroy_guard, retrigger_guard, trigger_guard, with_blueprint};
use indexmap::IndexMap;
use jokerforge_core::{Effect, EffectFamily, EffectKind, RandomGroup, Rule, Trigger};
use tracing::debug;

/// Splits `effects` into those of `family` and the rest, keeping order.
/// Effects of unknown kinds stay with the rest.
pub fn partition_by_effect_kind<'r>(
    effects: impl IntoIterator<Item = &'r Effect>,
    family: EffectFamily,
) -> (Vec<&'r Effect>, Vec<&'r Effect>) {
    effects
        .into_iter()
        .partition(|effect| effect.kind().map(EffectKind::family) == Some(family))
}

/// How a compiled body hands its effect table to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// `return { ... }` from `calculate`.
    Return,
    /// `SMODS.calculate_effect({ ... }, card)` from `use`.
    Apply,
}

/// Effects of one random group that land in the same block.
#[derive(Debug, Clone)]
pub struct GroupPart<'r> {
    /// Position in the rule, which seeds the roll.
    pub index: usize,
    pub group: &'r RandomGroup,
    pub effects: Vec<&'r Effect>,
    pub mode: BodyMode,
}

/// Part of a rule that lands in one block.
#[derive(Debug, Clone)]
pub struct Member<'r> {
    pub rule: &'r Rule,
    pub effects: Vec<&'r Effect>,
    pub groups: Vec<GroupPart<'r>>,
}

impl<'r> Member<'r> {
    pub fn whole(rule: &'r Rule) -> Self {
        Self {
            rule,
            effects: rule.effects.iter().collect(),
            groups: rule
                .random_groups
                .iter()
                .enumerate()
                .map(|(index, group)| GroupPart {
                    index,
                    group,
                    effects: group.effects.iter().collect(),
                    mode: BodyMode::Apply,
                })
                .collect(),
        }
    }

    /// Only the `family` effects of `rule`, random groups included.
    /// Gated effects hand their table back with `gate_mode`.
    pub fn of_family(rule: &'r Rule, family: EffectFamily, gate_mode: BodyMode) -> Option<Self> {
        let (effects, _) = partition_by_effect_kind(&rule.effects, family);
        let groups: Vec<GroupPart<'r>> = rule
            .random_groups
            .iter()
            .enumerate()
            .filter_map(|(index, group)| {
                let (hits, _) = partition_by_effect_kind(&group.effects, family);
                (!hits.is_empty()).then(|| GroupPart {
                    index,
                    group,
                    effects: hits,
                    mode: gate_mode,
                })
            })
            .collect();
        (!effects.is_empty() || !groups.is_empty()).then(|| Self {
            rule,
            effects,
            groups,
        })
    }

    /// What is left of `rule` once retrigger and probability effects have
    /// gone to their own passes. `None` when nothing is left, unless the
    /// rule had no effects at all.
    pub fn residual(rule: &'r Rule) -> Option<Self> {
        let effects: Vec<&'r Effect> = rule
            .effects
            .iter()
            .filter(|effect| !routed_elsewhere(effect))
            .collect();
        let groups: Vec<GroupPart<'r>> = rule
            .random_groups
            .iter()
            .enumerate()
            .filter_map(|(index, group)| {
                let rest: Vec<&'r Effect> = group
                    .effects
                    .iter()
                    .filter(|effect| !routed_elsewhere(effect))
                    .collect();
                (!rest.is_empty() || group.effects.is_empty()).then(|| GroupPart {
                    index,
                    group,
                    effects: rest,
                    mode: BodyMode::Apply,
                })
            })
            .collect();
        let keep = !effects.is_empty() || !groups.is_empty() || rule.all_effects().next().is_none();
        keep.then(|| Self {
            rule,
            effects,
            groups,
        })
    }
}

fn routed_elsewhere(effect: &Effect) -> bool {
    matches!(
        effect.kind().map(EffectKind::family),
        Some(EffectFamily::Retrigger | EffectFamily::Probability)
    )
}

#[derive(Debug, Clone, Default)]
pub struct RuleBody {
    pub code: String,
    /// Usability requirements the compiled effects asked for.
    pub usable: Vec<String>,
}

/// Random group gates, then pre-return statements, then the effect table.
/// Members compiled together share one effect table.
pub fn compile_body(
    session: &mut CompileSession<'_>,
    members: &[Member<'_>],
    mode: BodyMode,
) -> RuleBody {
    let mut lines = Vec::new();
    let mut usable = Vec::new();
    let mut outputs: Vec<EffectOutput> = Vec::new();
    let mut gated = false;

    for member in members {
        for part in &member.groups {
            let block = compile_gate(
                session,
                part.group,
                part.index,
                &member.rule.trigger,
                &part.effects,
                part.mode,
            );
            usable.extend(block.outputs.iter().filter_map(|output| output.usable.clone()));
            lines.push(block.code);
            gated = true;
        }
        for effect in &member.effects {
            let output = compile_effect(session, effect, &member.rule.trigger);
            session.absorb(&output);
            usable.extend(output.usable.clone());
            outputs.push(output);
        }
    }

    // A rule made only of random groups returns nothing of its own.
    if !(outputs.is_empty() && gated) {
        lines.push(match mode {
            BodyMode::Return => render_return(&outputs),
            BodyMode::Apply => render_apply(&outputs),
        });
    }
    RuleBody {
        code: lines.join("\n"),
        usable,
    }
}

/// Guarded `if`/`elseif`/`else` chain under `guard`.
fn emit_chain(
    session: &mut CompileSession<'_>,
    guard: &str,
    prelude: Option<String>,
    members: Vec<Member<'_>>,
) -> String {
    let all_excluded = members.iter().all(|member| !member.rule.blueprint_compatible);
    let guard = with_blueprint(guard, !all_excluded);

    let mut conditioned = Vec::new();
    let mut fallback = Vec::new();
    for member in members {
        let mut condition = compile_conditions(session, member.rule);
        if !all_excluded && !member.rule.blueprint_compatible {
            condition = join_guards(&[condition, "not context.blueprint".to_string()], "and");
        }
        if condition.is_empty() {
            fallback.push(member);
        } else {
            conditioned.push((condition, member));
        }
    }

    let mut w = LuaWriter::new();
    if conditioned.len() == 1 && fallback.is_empty() && prelude.is_none() {
        if let Some((condition, member)) = conditioned.pop() {
            let body = compile_body(session, &[member], BodyMode::Return);
            w.open(&format!("if {} and ({}) then", guard, condition));
            w.block(&body.code);
            w.close("end");
            return w.finish();
        }
    }

    w.open(&format!("if {} then", guard));
    if let Some(prelude) = prelude {
        w.line(&prelude);
    }
    let chained = !conditioned.is_empty();
    for (index, (condition, member)) in conditioned.into_iter().enumerate() {
        let body = compile_body(session, &[member], BodyMode::Return);
        if index == 0 {
            w.open(&format!("if {} then", condition));
        } else {
            w.reopen(&format!("elseif {} then", condition));
        }
        w.block(&body.code);
    }
    if !fallback.is_empty() {
        let body = compile_body(session, &fallback, BodyMode::Return);
        if chained {
            w.reopen("else");
        }
        w.block(&body.code);
    }
    if chained {
        w.close("end");
    }
    w.close("end");
    w.finish()
}

/// Whether destroy effects under `trigger` go through the flag-and-remove
/// passes rather than returning `remove` directly.
fn flags_destruction(trigger: &Trigger, object: ObjectKind) -> bool {
    *trigger != Trigger::CardDiscarded
        && (trigger.is_per_card() || object == ObjectKind::Enhancement)
}

/// Statements of the `kind` effects in `effects`.
fn probability_lines(
    session: &mut CompileSession<'_>,
    effects: &[Effect],
    kind: EffectKind,
    trigger: &Trigger,
) -> Vec<String> {
    let mut lines = Vec::new();
    for effect in effects.iter().filter(|effect| effect.kind() == Some(kind)) {
        let output = compile_effect(session, effect, trigger);
        session.absorb(&output);
        lines.extend(output.pre_return);
    }
    lines
}

/// One block per probability context, outside every trigger guard.
/// Gated probability effects roll inside the block.
fn probability_blocks(session: &mut CompileSession<'_>, rules: &[&Rule]) -> Vec<String> {
    let mut blocks = Vec::new();
    for kind in [EffectKind::ModProbability, EffectKind::FixProbability] {
        let members: Vec<&Rule> = rules
            .iter()
            .copied()
            .filter(|rule| rule.all_effects().any(|effect| effect.kind() == Some(kind)))
            .collect();
        if members.is_empty() {
            continue;
        }

        let mut w = LuaWriter::new();
        w.open(&format!(
            "if {} and not context.blueprint then",
            probability_context(kind)
        ));
        w.line("local numerator, denominator = context.numerator, context.denominator");
        for rule in members {
            let condition = compile_conditions(session, rule);
            let mut lines = probability_lines(session, &rule.effects, kind, &rule.trigger);
            for (index, group) in rule.random_groups.iter().enumerate() {
                if !group.effects.iter().any(|effect| effect.kind() == Some(kind)) {
                    continue;
                }
                let roll = raw_roll(session, group, index);
                let inner = probability_lines(session, &group.effects, kind, &rule.trigger);
                lines.push(format!(
                    "if {} then\n{}\nend",
                    roll,
                    indent(&inner.join("\n"), 1)
                ));
            }
            if condition.is_empty() {
                for line in &lines {
                    w.line(line);
                }
            } else {
                w.open(&format!("if {} then", condition));
                for line in &lines {
                    w.line(line);
                }
                w.close("end");
            }
        }
        w.line("return {\n    numerator = numerator,\n    denominator = denominator\n}");
        w.close("end");
        blocks.push(w.finish());
    }
    blocks
}

/// Body of `calculate` for the given rules, without the function wrapper.
/// Passive rules are skipped; they are compiled separately.
pub fn assemble_calculate(session: &mut CompileSession<'_>, rules: &[&Rule]) -> String {
    let rules: Vec<&Rule> = rules
        .iter()
        .copied()
        .filter(|rule| rule.trigger != Trigger::Passive)
        .collect();

    let mut blocks = probability_blocks(session, &rules);

    let mut by_trigger: IndexMap<&Trigger, Vec<&Rule>> = IndexMap::new();
    for rule in &rules {
        by_trigger.entry(&rule.trigger).or_default().push(*rule);
    }

    let mut removes = false;
    for (trigger, group) in by_trigger {
        let Some(guard) = trigger_guard(trigger, session.object) else {
            session.warn(format!(
                "trigger `{}` never reaches calculate, {} rule(s) skipped",
                trigger,
                group.len()
            ));
            continue;
        };
        debug!(item = %session.full_key, trigger = %trigger, rules = group.len(), "assembling trigger");

        let retriggers: Vec<Member> = group
            .iter()
            .copied()
            .filter_map(|rule| Member::of_family(rule, EffectFamily::Retrigger, BodyMode::Return))
            .collect();
        if !retriggers.is_empty() {
            let guard = retrigger_guard(trigger, session.object);
            blocks.push(emit_chain(session, &guard, None, retriggers));
        }

        let members: Vec<Member> = group.iter().copied().filter_map(Member::residual).collect();
        if members.is_empty() {
            continue;
        }

        let prelude = (flags_destruction(trigger, session.object)
            && members
                .iter()
                .any(|member| member.rule.contains_family(EffectFamily::Delete)))
        .then(|| format!("{}.should_destroy = false", session.object.subject_card()));
        removes |= prelude.is_some();
        blocks.push(emit_chain(session, &guard, prelude, members));
    }

    if removes {
        blocks.insert(
            0,
            format!(
                "if {} then\n    return {{\n        remove = true\n    }}\nend\n",
                destroy_guard(session.object)
            ),
        );
    }

    blocks
        .iter()
        .map(|block| block.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerateOptions;
    use jokerforge_core::{Condition, ConditionGroup, Params, UserVariable};

    fn assemble(rules: &[Rule], vars: &[UserVariable]) -> (String, usize) {
        let options = GenerateOptions::default();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", vars);
        let refs: Vec<&Rule> = rules.iter().collect();
        let text = assemble_calculate(&mut session, &refs);
        (text, session.config.len())
    }

    fn mult(id: &str, value: i64) -> Effect {
        Effect::new(id, "add_mult", Params::new().with("value", value))
    }

    fn money_over(value: i64) -> ConditionGroup {
        ConditionGroup::all_of(
            "g",
            vec![Condition::new(
                "c",
                "player_money",
                Params::new().with("operator", "greater_than").with("value", value),
            )],
        )
    }

    #[test]
    fn partition_keeps_order_and_unknowns_with_rest() {
        let effects = vec![
            Effect::new("a", "retrigger_cards", Params::new()),
            Effect::new("b", "add_chips", Params::new()),
            Effect::new("c", "mystery", Params::new()),
            Effect::new("d", "retrigger_cards", Params::new()),
        ];
        let (hits, rest) = partition_by_effect_kind(&effects, EffectFamily::Retrigger);
        let hit_ids: Vec<&str> = hits.iter().map(|e| e.id.as_str()).collect();
        let rest_ids: Vec<&str> = rest.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(hit_ids, vec!["a", "d"]);
        assert_eq!(rest_ids, vec!["b", "c"]);
    }

    #[test]
    fn unconditioned_rule_sits_in_the_trigger_block() {
        let rules = vec![Rule::new("r", Trigger::HandPlayed).with_effect(mult("e", 5))];
        let (text, _) = assemble(&rules, &[]);
        assert_eq!(
            text,
            "if context.cardarea == G.jokers and context.joker_main then\n    return {\n        mult = card.ability.extra.mult\n    }\nend"
        );
    }

    #[test]
    fn conditioned_rule_comes_before_else() {
        let rules = vec![
            Rule::new("plain", Trigger::CardScored).with_effect(mult("e1", 2)),
            Rule::new("gated", Trigger::CardScored)
                .with_conditions(money_over(10))
                .with_effect(mult("e2", 8)),
        ];
        let (text, _) = assemble(&rules, &[]);
        let gated = text.find("if (G.GAME.dollars").expect("conditioned branch");
        let fallback = text.find("    else\n").expect("else branch");
        assert!(gated < fallback);
        assert!(!text.contains("elseif"));
    }

    #[test]
    fn blueprint_exclusion_on_single_rule() {
        let mut rule = Rule::new("r", Trigger::HandPlayed).with_effect(mult("e", 5));
        rule.blueprint_compatible = false;
        let (text, _) = assemble(&[rule], &[]);
        assert!(text.starts_with(
            "if context.cardarea == G.jokers and context.joker_main and not context.blueprint then"
        ));
    }

    #[test]
    fn retrigger_gets_its_own_repetition_pass() {
        let rule = Rule::new("r", Trigger::CardScored)
            .with_effect(Effect::new("e1", "retrigger_cards", Params::new().with("value", 2)))
            .with_effect(mult("e2", 3));
        let (text, _) = assemble(&[rule], &[]);
        assert!(text.starts_with("if context.repetition and context.cardarea == G.play then"));
        assert!(text.contains("repetitions = card.ability.extra.repetitions"));
        assert!(text.contains("if context.individual and context.cardarea == G.play then"));
        assert_eq!(text.matches("mult = card.ability.extra.mult").count(), 1);
    }

    #[test]
    fn destroy_flags_reset_before_conditions_and_remove_first() {
        let rule = Rule::new("r", Trigger::CardScored)
            .with_conditions(money_over(3))
            .with_effect(Effect::new("e", "destroy_card", Params::new()));
        let (text, _) = assemble(&[rule], &[]);
        assert!(text.starts_with(
            "if context.destroy_card and context.destroy_card.should_destroy then\n    return {\n        remove = true\n    }\nend"
        ));
        let reset = text
            .find("context.other_card.should_destroy = false")
            .expect("reset");
        let flag = text
            .find("context.other_card.should_destroy = true")
            .expect("flag");
        assert!(reset < flag);
    }

    #[test]
    fn probability_effects_answer_probability_context() {
        let rule = Rule::new("r", Trigger::ChangeProbability).with_effect(Effect::new(
            "e",
            "mod_probability",
            Params::new().with("value", 2),
        ));
        let (text, _) = assemble(&[rule], &[]);
        assert!(text.starts_with("if context.mod_probability and not context.blueprint then"));
        assert!(text.contains("numerator = numerator * card.ability.extra.numerator_mod"));
        assert!(!text.contains("Activated!"));
    }

    #[test]
    fn gated_retrigger_joins_the_repetition_pass() {
        let rule = Rule::new("r", Trigger::CardScored).with_random_group(
            RandomGroup::new("retrig", 1.0, 4.0).with_effect(Effect::new(
                "e",
                "retrigger_cards",
                Params::new().with("repetitions", 2),
            )),
        );
        let (text, _) = assemble(&[rule], &[]);
        assert!(text.starts_with(
            "if context.repetition and context.cardarea == G.play then\n    if SMODS.pseudorandom_probability(card, 'group_0_retrig', card.ability.extra.numerator, card.ability.extra.odds, \"j_mycustom_sample\") then\n        return {\n            repetitions = card.ability.extra.repetitions"
        ));
        assert!(!text.contains("context.individual"));
        assert!(!text.contains("SMODS.calculate_effect"));
    }

    #[test]
    fn gated_retrigger_leaves_the_rest_of_the_group_behind() {
        let rule = Rule::new("r", Trigger::CardScored).with_random_group(
            RandomGroup::new("g", 1.0, 4.0)
                .with_effect(Effect::new("e1", "retrigger_cards", Params::new()))
                .with_effect(mult("e2", 3)),
        );
        let (text, _) = assemble(&[rule], &[]);
        let repetition = text.find("if context.repetition").expect("repetition pass");
        let individual = text.find("if context.individual").expect("scoring pass");
        assert!(repetition < individual);
        let scoring = &text[individual..];
        assert!(scoring.contains("SMODS.calculate_effect({\n"));
        assert!(scoring.contains("mult = card.ability.extra.mult"));
        assert!(!scoring.contains("repetitions"));
    }

    #[test]
    fn gated_probability_effect_rolls_inside_the_probability_block() {
        let rule = Rule::new("r", Trigger::ChangeProbability).with_random_group(
            RandomGroup::new("g1", 1.0, 4.0).with_effect(Effect::new(
                "e",
                "mod_probability",
                Params::new().with("value", 2),
            )),
        );
        let (text, config) = assemble(&[rule], &[]);
        assert_eq!(
            text,
            "if context.mod_probability and not context.blueprint then\n    local numerator, denominator = context.numerator, context.denominator\n    if pseudorandom('group_0_g1') < card.ability.extra.numerator / card.ability.extra.odds then\n        numerator = numerator * card.ability.extra.numerator_mod\n    end\n    return {\n        numerator = numerator,\n        denominator = denominator\n    }\nend"
        );
        assert_eq!(config, 3);
    }

    #[test]
    fn gated_destroy_flags_after_the_reset() {
        let rule = Rule::new("r", Trigger::CardScored)
            .with_conditions(money_over(3))
            .with_random_group(
                RandomGroup::new("g", 1.0, 3.0)
                    .with_effect(Effect::new("e", "destroy_card", Params::new())),
            );
        let (text, _) = assemble(&[rule], &[]);
        assert!(text.starts_with(
            "if context.destroy_card and context.destroy_card.should_destroy then"
        ));
        let reset = text
            .find("context.other_card.should_destroy = false")
            .expect("reset");
        let gate = text
            .find("if SMODS.pseudorandom_probability(card, 'group_0_g'")
            .expect("gate");
        let flag = text
            .find("context.other_card.should_destroy = true")
            .expect("flag");
        assert!(reset < gate);
        assert!(gate < flag);
    }

    #[test]
    fn rule_without_effects_still_closes_its_block() {
        let rules = vec![Rule::new("r", Trigger::RoundEnd)];
        let (text, _) = assemble(&rules, &[]);
        assert!(text.contains("message = \"Activated!\""));
        assert_eq!(text.matches("if ").count(), text.matches("\nend").count());
    }

    #[test]
    fn passive_rules_are_not_assembled() {
        let rules = vec![Rule::new("r", Trigger::Passive)
            .with_effect(Effect::new("e", "allow_debt", Params::new()))];
        let (text, config) = assemble(&rules, &[]);
        assert_eq!(text, "");
        assert_eq!(config, 0);
    }
}
