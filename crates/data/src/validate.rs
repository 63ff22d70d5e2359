//! Checks that never stop an export but are worth reporting before one.

use jokerforge_core::{
    slugify, ConsumableKind, EffectFamily, ModProject, Rule, RuleOwner, Trigger,
};
use std::collections::HashSet;

/// Warnings for a whole project, in item order.
pub fn validate_project(project: &ModProject) -> Vec<String> {
    let mut warnings = Vec::new();
    let meta = &project.metadata;
    if slugify(&meta.prefix) != meta.prefix {
        warnings.push(format!(
            "metadata: prefix `{}` is not a plain identifier",
            meta.prefix
        ));
    }
    if meta.id.trim().is_empty() {
        warnings.push("metadata: id is empty".to_string());
    }

    duplicate_keys("joker", project.jokers.iter().map(|j| j.key()), &mut warnings);
    duplicate_keys(
        "consumable",
        project.consumables.iter().map(|c| c.key()),
        &mut warnings,
    );
    duplicate_keys("booster", project.boosters.iter().map(|b| b.key()), &mut warnings);
    duplicate_keys(
        "enhancement",
        project.enhancements.iter().map(|e| e.key()),
        &mut warnings,
    );

    for joker in &project.jokers {
        check_owner("joker", joker, &mut warnings);
    }
    let sets: HashSet<&str> = project
        .consumable_sets
        .iter()
        .map(|set| set.key.as_str())
        .collect();
    for consumable in &project.consumables {
        check_owner("consumable", consumable, &mut warnings);
        if consumable.set.parse::<ConsumableKind>().is_err()
            && !sets.contains(consumable.set.as_str())
        {
            warnings.push(format!(
                "consumable {}: set `{}` is neither a base set nor a declared consumable set",
                consumable.key(),
                consumable.set
            ));
        }
    }
    for enhancement in &project.enhancements {
        check_owner("enhancement", enhancement, &mut warnings);
    }
    for booster in &project.boosters {
        if booster.choose > booster.extra {
            warnings.push(format!(
                "booster {}: choose ({}) is larger than the pack ({})",
                booster.key(),
                booster.choose,
                booster.extra
            ));
        }
    }
    warnings
}

fn duplicate_keys(kind: &str, keys: impl Iterator<Item = String>, warnings: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            warnings.push(format!("{} {}: key is used more than once", kind, key));
        }
    }
}

fn check_owner(kind: &str, item: &impl RuleOwner, warnings: &mut Vec<String>) {
    let key = item.key();
    if item.name().trim().is_empty() {
        warnings.push(format!("{} {}: name is empty", kind, key));
    }
    let mut names = HashSet::new();
    for var in item.user_variables() {
        if !names.insert(var.name.as_str()) {
            warnings.push(format!(
                "{} {}: variable `{}` is declared twice",
                kind, key, var.name
            ));
        }
    }
    for rule in item.rules() {
        check_rule(&format!("{} {}", kind, key), rule, warnings);
    }
}

fn check_rule(owner: &str, rule: &Rule, warnings: &mut Vec<String>) {
    let label = if rule.id.is_empty() {
        format!("{}: rule on `{}`", owner, rule.trigger)
    } else {
        format!("{}: rule {}", owner, rule.id)
    };
    if let Trigger::Custom(name) = &rule.trigger {
        warnings.push(format!("{} uses unknown trigger `{}`", label, name));
    }
    for effect in rule.all_effects() {
        if effect.kind().is_none() {
            warnings.push(format!("{} uses unknown effect `{}`", label, effect.effect_type));
        }
    }
    for group in &rule.condition_groups {
        for condition in &group.conditions {
            if condition.kind().is_none() {
                warnings.push(format!(
                    "{} uses unknown condition `{}`",
                    label, condition.condition_type
                ));
            }
        }
    }
    if rule.trigger == Trigger::Passive {
        let shaped = rule.effects.len() == 1
            && !rule.has_conditions()
            && rule.random_groups.is_empty();
        if !shaped {
            warnings.push(format!(
                "{} is passive and should hold exactly one effect without conditions or random groups",
                label
            ));
        }
    } else if rule.contains_family(EffectFamily::Passive) {
        warnings.push(format!("{} has passive-only effects outside a passive rule", label));
    }
}
