//! Effects that rewrite the odds of other probability rolls. They only
//! touch the `numerator`/`denominator` locals of the probability block.

use super::{EffectOutput, EffectScope};
use jokerforge_core::EffectKind;

/// Context flag a probability effect answers to.
pub fn probability_context(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::FixProbability => "context.fix_probability",
        _ => "context.mod_probability",
    }
}

fn part(scope: &EffectScope<'_, '_>) -> &'static str {
    match scope.params().str_or("part", "numerator").as_str() {
        "denominator" => "denominator",
        _ => "numerator",
    }
}

pub(super) fn mod_probability(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let part = part(scope);
    let value = scope.value("value", &format!("{}_mod", part), 2.0);
    let assignment = match scope.params().str_or("operation", "multiply").as_str() {
        "increment" | "add" => format!("{p} = {p} + {v}", p = part, v = value.expr),
        "decrement" | "subtract" => format!("{p} = {p} - {v}", p = part, v = value.expr),
        "divide" => format!("{p} = {p} / {v}", p = part, v = value.expr),
        "set" => format!("{} = {}", part, value.expr),
        _ => format!("{p} = {p} * {v}", p = part, v = value.expr),
    };
    EffectOutput::empty().pre(assignment).uses(&value)
}

pub(super) fn fix_probability(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let part = part(scope);
    let value = scope.value("value", &format!("fixed_{}", part), 1.0);
    EffectOutput::empty()
        .pre(format!("{} = {}", part, value.expr))
        .uses(&value)
}

#[cfg(test)]
mod tests {
    use crate::effects::compile_effect;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Effect, Params, Trigger, UserVariable};

    #[test]
    fn doubling_rewrites_numerator_local() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let effect = Effect::new("e1", "mod_probability", Params::new().with("value", 2));
        let output = compile_effect(&mut session, &effect, &Trigger::ChangeProbability);
        assert_eq!(
            output.pre_return,
            vec!["numerator = numerator * card.ability.extra.numerator_mod"]
        );
        assert!(!output.has_table_entry());
    }
}
