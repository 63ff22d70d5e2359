//! Probability gates around random groups.

use crate::allocator::{ConfigOrigin, ConfigVar};
use crate::assembler::BodyMode;
use crate::effects::{compile_effect, render_apply, render_return, EffectOutput};
use crate::lua::{indent, lua_string};
use crate::session::CompileSession;
use crate::values::seed_for;
use jokerforge_core::{Effect, Odds, RandomGroup, Trigger};

/// One declared `numerator`/`odds` slot pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilitySlot {
    pub numerator: f64,
    pub denominator: f64,
    pub numerator_name: String,
    pub odds_name: String,
}

/// Odds slots of one item. Groups with the same literal odds share a pair;
/// every other pair gets the next suffix in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ProbabilitySlots {
    slots: Vec<ProbabilitySlot>,
}

impl ProbabilitySlots {
    pub fn iter(&self) -> impl Iterator<Item = &ProbabilitySlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn find(&self, numerator: f64, denominator: f64) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.numerator == numerator && slot.denominator == denominator)
    }
}

/// Literal odds entry; anything that is not a number reads as 1.
fn literal_odds(session: &mut CompileSession<'_>, odds: &Odds, what: &str) -> f64 {
    match odds.literal() {
        Some(value) => value,
        None => {
            session.warn(format!(
                "random group {} `{}` is not a number, using 1",
                what,
                match odds {
                    Odds::Text(text) => text.as_str(),
                    Odds::Number(_) => "",
                }
            ));
            1.0
        }
    }
}

/// Slot pair for the given odds, declaring it on first use.
pub fn probability_slot(
    session: &mut CompileSession<'_>,
    numerator: f64,
    denominator: f64,
) -> ProbabilitySlot {
    if let Some(index) = session.probabilities.find(numerator, denominator) {
        return session.probabilities.slots[index].clone();
    }
    let slot = ProbabilitySlot {
        numerator,
        denominator,
        numerator_name: session.allocator.reserve("numerator"),
        odds_name: session.allocator.reserve("odds"),
    };
    session.config.insert(
        ConfigVar::number(&slot.numerator_name, numerator).with_origin(ConfigOrigin::Probability),
    );
    session.config.insert(
        ConfigVar::number(&slot.odds_name, denominator).with_origin(ConfigOrigin::Probability),
    );
    session.probabilities.slots.push(slot.clone());
    slot
}

/// Compiled gate of one random group, plus the outputs of its effects.
pub struct GroupBlock {
    pub code: String,
    pub outputs: Vec<EffectOutput>,
}

/// Declared slots for the group's odds, as `(numerator, odds)` expressions.
fn group_odds(session: &mut CompileSession<'_>, group: &RandomGroup) -> (String, String) {
    let numerator = literal_odds(session, &group.chance_numerator, "numerator");
    let denominator = literal_odds(session, &group.chance_denominator, "denominator");
    let slot = probability_slot(session, numerator, denominator);
    (
        session.extra(&slot.numerator_name),
        session.extra(&slot.odds_name),
    )
}

fn group_seed(group: &RandomGroup, index: usize) -> String {
    seed_for(&format!("group_{}", index), &group.id)
}

/// `if SMODS.pseudorandom_probability(...) then <effects> end`, seeded by
/// the group's position and id.
pub fn compile_random_group(
    session: &mut CompileSession<'_>,
    group: &RandomGroup,
    index: usize,
    trigger: &Trigger,
) -> GroupBlock {
    let effects: Vec<&Effect> = group.effects.iter().collect();
    compile_gate(session, group, index, trigger, &effects, BodyMode::Apply)
}

/// Gate of one random group holding only `effects`. `BodyMode::Return`
/// is for contexts that read the returned table, such as repetitions.
pub fn compile_gate(
    session: &mut CompileSession<'_>,
    group: &RandomGroup,
    index: usize,
    trigger: &Trigger,
    effects: &[&Effect],
    mode: BodyMode,
) -> GroupBlock {
    let (numerator, odds) = group_odds(session, group);

    let outputs: Vec<EffectOutput> = effects
        .iter()
        .map(|effect| compile_effect(session, effect, trigger))
        .collect();
    for output in &outputs {
        session.absorb(output);
    }

    let body = match mode {
        BodyMode::Return => render_return(&outputs),
        BodyMode::Apply => render_apply(&outputs),
    };
    let code = format!(
        "if SMODS.pseudorandom_probability(card, '{}', {}, {}, {}) then\n{}\nend",
        group_seed(group, index),
        numerator,
        odds,
        lua_string(&session.full_key),
        indent(&body, 1)
    );
    GroupBlock { code, outputs }
}

/// Roll used inside the probability contexts themselves. A plain
/// `pseudorandom` draw, since `SMODS.pseudorandom_probability` would
/// re-enter them.
pub fn raw_roll(session: &mut CompileSession<'_>, group: &RandomGroup, index: usize) -> String {
    let (numerator, odds) = group_odds(session, group);
    format!(
        "pseudorandom('{}') < {} / {}",
        group_seed(group, index),
        numerator,
        odds
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GenerateOptions, ObjectKind};
    use jokerforge_core::{Effect, Params, UserVariable};

    fn group(id: &str, numerator: f64, denominator: f64) -> RandomGroup {
        RandomGroup::new(id, numerator, denominator).with_effect(Effect::new(
            "e",
            "add_mult",
            Params::new().with("value", 4),
        ))
    }

    #[test]
    fn equal_odds_share_one_slot_pair() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "lucky", &vars);
        compile_random_group(&mut session, &group("a", 1.0, 4.0), 0, &Trigger::HandPlayed);
        compile_random_group(&mut session, &group("b", 1.0, 4.0), 1, &Trigger::HandPlayed);
        assert_eq!(session.probabilities.len(), 1);
        assert!(session.config.get("odds").is_some());
        assert!(session.config.get("odds2").is_none());
    }

    #[test]
    fn distinct_odds_get_suffixed_pairs_in_order() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "lucky", &vars);
        compile_random_group(&mut session, &group("a", 1.0, 4.0), 0, &Trigger::HandPlayed);
        let block =
            compile_random_group(&mut session, &group("b", 1.0, 6.0), 1, &Trigger::HandPlayed);
        let names: Vec<&str> = session
            .probabilities
            .iter()
            .map(|slot| slot.odds_name.as_str())
            .collect();
        assert_eq!(names, vec!["odds", "odds2"]);
        assert!(block.code.starts_with(
            "if SMODS.pseudorandom_probability(card, 'group_1_b', card.ability.extra.numerator2, card.ability.extra.odds2, \"j_mycustom_lucky\") then"
        ));
    }

    #[test]
    fn returning_gate_hands_back_its_table() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "lucky", &vars);
        let gated = group("a", 1.0, 4.0);
        let effects: Vec<&Effect> = gated.effects.iter().collect();
        let block = compile_gate(
            &mut session,
            &gated,
            0,
            &Trigger::HandPlayed,
            &effects,
            BodyMode::Return,
        );
        assert!(block.code.contains("\n    return {\n        mult = card.ability.extra.mult\n    }\nend"));
        assert!(!block.code.contains("SMODS.calculate_effect"));
    }

    #[test]
    fn raw_roll_shares_the_group_slots() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "lucky", &vars);
        let roll = raw_roll(&mut session, &group("g1", 1.0, 4.0), 0);
        assert_eq!(
            roll,
            "pseudorandom('group_0_g1') < card.ability.extra.numerator / card.ability.extra.odds"
        );
        assert_eq!(session.probabilities.len(), 1);
    }

    #[test]
    fn variable_odds_fall_back_to_one() {
        let options = GenerateOptions::default();
        let vars = vec![UserVariable::number("var1", 7.0)];
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "lucky", &vars);
        let mut gated = group("a", 1.0, 4.0);
        gated.chance_numerator = Odds::Text("var1".to_string());
        compile_random_group(&mut session, &gated, 0, &Trigger::HandPlayed);
        let numerator = session.config.get("numerator").map(|var| var.value.clone());
        assert_eq!(numerator, Some(crate::allocator::ConfigValue::Number(1.0)));
        assert_eq!(
            session.config.get("var1").map(|var| var.value.clone()),
            Some(crate::allocator::ConfigValue::Number(7.0))
        );
        assert_eq!(session.warnings.len(), 1);
    }
}
