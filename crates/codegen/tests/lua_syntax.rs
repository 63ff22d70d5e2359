#![cfg(feature = "lua_check")]

use jokerforge_codegen::check::check_source;
use jokerforge_codegen::{build_mod, GenerateOptions};
use jokerforge_core::{
    Condition, ConditionGroup, ConditionKind, ConsumableItem, Effect, EffectFamily, EffectKind,
    EnhancementItem, JokerItem, ModProject, Params, RandomGroup, Rule, Trigger,
};

fn effect(kind: EffectKind) -> Effect {
    Effect::new(&format!("e_{}", kind.keyword()), kind.keyword(), Params::new())
}

fn kinds(family: EffectFamily) -> impl Iterator<Item = EffectKind> {
    EffectKind::ALL.into_iter().filter(move |kind| kind.family() == family)
}

fn every_kind_project() -> ModProject {
    let mut project = ModProject::default();

    for trigger in [Trigger::HandPlayed, Trigger::CardScored, Trigger::RoundEnd] {
        let mut joker = JokerItem::new(&format!("All {}", trigger.keyword()));
        joker.description = "#1# #2# #3#".to_string();
        for kind in kinds(EffectFamily::Regular).chain(kinds(EffectFamily::Retrigger)) {
            joker.rules.push(Rule::new(kind.keyword(), trigger.clone()).with_effect(effect(kind)));
        }
        project.jokers.push(joker);
    }

    let mut odds = JokerItem::new("Odds");
    for kind in kinds(EffectFamily::Probability) {
        odds.rules
            .push(Rule::new(kind.keyword(), Trigger::ChangeProbability).with_effect(effect(kind)));
    }
    odds.rules.push(
        Rule::new("gamble", Trigger::HandPlayed)
            .with_random_group(RandomGroup::new("g", 1.0, 3.0).with_effect(effect(EffectKind::AddMult))),
    );
    project.jokers.push(odds);

    let mut gated = JokerItem::new("Gated\nFamilies");
    for kind in kinds(EffectFamily::Probability) {
        gated.rules.push(
            Rule::new(kind.keyword(), Trigger::ChangeProbability).with_random_group(
                RandomGroup::new(&format!("g_{}", kind.keyword()), 1.0, 2.0).with_effect(effect(kind)),
            ),
        );
    }
    gated.rules.push(
        Rule::new("again", Trigger::CardScored).with_random_group(
            RandomGroup::new("retrig", 1.0, 4.0).with_effect(effect(EffectKind::RetriggerCards)),
        ),
    );
    gated.rules.push(
        Rule::new("shatter", Trigger::CardScored)
            .with_effect(effect(EffectKind::AddMult))
            .with_random_group(
                RandomGroup::new("shatter", 1.0, 5.0).with_effect(effect(EffectKind::DestroyCard)),
            ),
    );
    project.jokers.push(gated);

    for kind in kinds(EffectFamily::Passive) {
        let mut joker = JokerItem::new(&format!("Passive {}", kind.keyword()));
        joker
            .rules
            .push(Rule::new("p", Trigger::Passive).with_effect(effect(kind)));
        project.jokers.push(joker);
    }

    for trigger in [Trigger::HandPlayed, Trigger::CardScored] {
        let mut checks = JokerItem::new(&format!("Checks {}", trigger.keyword()));
        for kind in ConditionKind::ALL {
            checks.rules.push(
                Rule::new(kind.keyword(), trigger.clone())
                    .with_conditions(ConditionGroup::all_of(
                        "g",
                        vec![Condition::new("c", kind.keyword(), Params::new())],
                    ))
                    .with_effect(effect(EffectKind::AddChips)),
            );
        }
        project.jokers.push(checks);
    }

    let mut tarot = ConsumableItem::new("Everything", "Tarot");
    for kind in kinds(EffectFamily::Regular) {
        tarot
            .rules
            .push(Rule::new(kind.keyword(), Trigger::ConsumableUsed).with_effect(effect(kind)));
    }
    project.consumables.push(tarot);

    let mut enhancement = EnhancementItem::new("Everything");
    for kind in kinds(EffectFamily::Regular).chain(kinds(EffectFamily::Retrigger)) {
        enhancement
            .rules
            .push(Rule::new(kind.keyword(), Trigger::CardScored).with_effect(effect(kind)));
    }
    project.enhancements.push(enhancement);
    project
}

#[test]
fn every_generated_file_compiles() {
    let options = GenerateOptions {
        check_syntax: false,
        ..GenerateOptions::default()
    };
    let generated = match build_mod(&every_kind_project(), &options) {
        Ok(generated) => generated,
        Err(err) => panic!("generation failed: {}", err),
    };
    for (name, source) in generated.files.iter().filter(|(name, _)| name.ends_with(".lua")) {
        if let Err(err) = check_source(name, source) {
            panic!("{}\n{}", err, source);
        }
    }
}

#[test]
fn build_mod_runs_the_check_when_asked() {
    let options = GenerateOptions {
        check_syntax: true,
        ..GenerateOptions::default()
    };
    assert!(build_mod(&every_kind_project(), &options).is_ok());
}
