use jokerforge_codegen::items::{generate_joker, AtlasCursor};
use jokerforge_codegen::{generate_mod, GenerateOptions, GeneratedItem};
use jokerforge_core::{JokerItem, ModProject};
use serde_json::{json, Value};

fn joker(value: Value) -> JokerItem {
    serde_json::from_value(value).unwrap_or_else(|err| panic!("bad joker fixture: {}", err))
}

fn generate(joker: &JokerItem) -> GeneratedItem {
    generate_joker(joker, &GenerateOptions::default(), &mut AtlasCursor::new(10))
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{}` not found in:\n{}", needle, haystack))
}

#[test]
fn conditioned_single_rule_fuses_into_one_if() {
    let item = generate(&joker(json!({
        "name": "Counter",
        "userVariables": [{ "name": "var1", "type": "number", "initialValue": 0 }],
        "rules": [{
            "id": "r1",
            "trigger": "hand_played",
            "conditionGroups": [{
                "id": "g1",
                "conditions": [{
                    "id": "c1",
                    "type": "internal_variable",
                    "params": { "variable_name": "var1", "operator": "equals", "value": 0 }
                }]
            }],
            "effects": [{ "id": "e1", "type": "add_mult", "params": { "value": 5 } }]
        }]
    })));

    assert!(item.code.contains(
        "        if context.cardarea == G.jokers and context.joker_main and (card.ability.extra.var1 == 0) then\n            return {\n                mult = card.ability.extra.mult\n            }\n        end\n"
    ));
    assert!(!item.code.contains("elseif"));
    assert_eq!(item.code.matches("mult = 5").count(), 1);
    assert!(item.code.contains("        extra = {\n            var1 = 0,\n            mult = 5\n        }\n"));
    assert!(item.warnings.is_empty(), "{:?}", item.warnings);
}

#[test]
fn unconditioned_rule_becomes_the_trailing_else() {
    let item = generate(&joker(json!({
        "name": "Split",
        "rules": [
            {
                "id": "b",
                "trigger": "card_scored",
                "effects": [{ "id": "e2", "type": "add_mult", "params": { "value": 3 } }]
            },
            {
                "id": "a",
                "trigger": "card_scored",
                "conditionGroups": [{
                    "conditions": [{
                        "type": "remaining_hands",
                        "params": { "value": 1 }
                    }]
                }],
                "effects": [{ "id": "e1", "type": "add_chips", "params": { "value": 10 } }]
            }
        ]
    })));

    let guard = position(&item.code, "if context.individual and context.cardarea == G.play then");
    let rule_a = position(&item.code, "if G.GAME.current_round.hands_left == 1 then");
    let fallback = position(&item.code, "else\n");
    let rule_b = position(&item.code, "mult = card.ability.extra.mult");
    assert!(guard < rule_a && rule_a < fallback && fallback < rule_b);
    assert!(!item.code.contains("elseif"));
}

#[test]
fn variable_odds_become_one_without_touching_the_variable() {
    let item = generate(&joker(json!({
        "name": "Gambler",
        "userVariables": [{ "name": "var1", "type": "number", "initialValue": 7 }],
        "rules": [{
            "id": "r1",
            "trigger": "hand_played",
            "effects": [{ "id": "e0", "type": "add_chips", "params": { "value": "var1" } }],
            "randomGroups": [{
                "id": "grp1",
                "chance_numerator": "var1",
                "chance_denominator": 4,
                "effects": [{ "id": "e1", "type": "add_mult", "params": { "value": 2 } }]
            }]
        }]
    })));

    assert!(item.code.contains("            var1 = 7,\n"));
    assert!(item.code.contains("            numerator = 1,\n"));
    assert!(item.code.contains("            odds = 4"));
    assert!(item.code.contains(
        "SMODS.pseudorandom_probability(card, 'group_0_grp1', card.ability.extra.numerator, card.ability.extra.odds, \"j_mycustom_gambler\")"
    ));
    assert!(item.code.contains("chips = card.ability.extra.var1"));
    assert_eq!(item.warnings.len(), 1);
}

#[test]
fn repeated_kinds_get_suffixed_slots_everywhere() {
    let item = generate(&joker(json!({
        "name": "Double",
        "rules": [{
            "trigger": "hand_played",
            "effects": [
                { "id": "e1", "type": "add_mult", "params": { "value": 5 } },
                { "id": "e2", "type": "add_mult", "params": { "value": 3 } }
            ]
        }]
    })));

    assert!(item.code.contains("            mult = 5,\n            mult2 = 3\n"));
    assert!(item.code.contains(
        "return {\n                mult = card.ability.extra.mult,\n                extra = {\n                    mult = card.ability.extra.mult2\n                }\n            }"
    ));
}

#[test]
fn counters_reset_between_items() {
    let mut project = ModProject::default();
    for name in ["First", "Second"] {
        project.jokers.push(joker(json!({
            "name": name,
            "rules": [{
                "trigger": "hand_played",
                "effects": [{ "type": "add_mult", "params": { "value": 1 } }]
            }]
        })));
    }
    let files = generate_mod(&project, &GenerateOptions::default()).unwrap_or_default();
    for path in ["jokers/first.lua", "jokers/second.lua"] {
        assert!(files[path].contains("mult = card.ability.extra.mult\n"), "{}", path);
        assert!(!files[path].contains("mult2"), "{}", path);
    }
    assert!(files["jokers/second.lua"].contains("pos = { x = 1, y = 0 },"));
}

#[test]
fn unknown_effects_still_activate() {
    let item = generate(&joker(json!({
        "name": "Future",
        "rules": [{
            "trigger": "round_end",
            "effects": [{ "type": "summon_dragon" }]
        }]
    })));
    assert!(item.code.contains("message = \"Activated!\""));
    assert_eq!(item.warnings, vec!["unknown effect type `summon_dragon`".to_string()]);
}

#[test]
fn description_slice_matches_the_highest_placeholder() {
    let item = generate(&joker(json!({
        "name": "Reader",
        "description": "Gives #2# chips and #1# mult",
        "rules": [{
            "trigger": "hand_played",
            "effects": [
                { "type": "add_mult", "params": { "value": 4 } },
                { "type": "add_chips", "params": { "value": 20 } }
            ]
        }]
    })));
    assert!(item.code.contains(
        "return { vars = { card.ability.extra.mult, card.ability.extra.chips } }"
    ));
}

#[test]
fn description_without_placeholders_has_no_loc_vars() {
    let item = generate(&joker(json!({
        "name": "Quiet",
        "description": "Does a thing",
        "rules": [{ "trigger": "hand_played", "effects": [{ "type": "add_mult" }] }]
    })));
    assert!(!item.code.contains("loc_vars"));
}

#[test]
fn game_variables_feed_the_description() {
    let item = generate(&joker(json!({
        "name": "Banker",
        "description": "+#1# Mult",
        "rules": [{
            "trigger": "hand_played",
            "effects": [{ "type": "add_mult", "params": { "value": "GAMEVAR:money|2|0" } }]
        }]
    })));
    assert!(item.code.contains("mult = (G.GAME.dollars) * 2"));
    assert!(item.code.contains("return { vars = { (G.GAME.dollars) * 2 } }"));
    assert!(!item.code.contains("config = {"));
}
