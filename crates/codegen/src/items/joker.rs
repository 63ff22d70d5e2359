use super::{calculate_body, write_calculate, write_loc_txt, AtlasCursor, GeneratedItem};
use crate::loc_vars::render_loc_vars;
use crate::lua::{lua_comment, lua_string, LuaWriter};
use crate::options::{GenerateOptions, ObjectKind};
use crate::passive::compile_passive;
use crate::session::CompileSession;
use jokerforge_core::{slugify, JokerItem, RarityRef, RuleOwner, Trigger};

/// `rarity = ...` value: base rarities by index, modded ones by prefixed key.
fn rarity(options: &GenerateOptions, rarity: &RarityRef) -> String {
    if let Some(base) = rarity.base() {
        return base.index().to_string();
    }
    let raw = match rarity {
        RarityRef::Named(name) => slugify(name),
        RarityRef::Index(index) => index.to_string(),
    };
    let prefix = format!("{}_", options.mod_prefix);
    if raw.starts_with(&prefix) {
        lua_string(&raw)
    } else {
        lua_string(&format!("{}{}", prefix, raw))
    }
}

/// `SMODS.Joker` definition of one joker.
pub fn generate_joker(
    joker: &JokerItem,
    options: &GenerateOptions,
    cursor: &mut AtlasCursor,
) -> GeneratedItem {
    let key = joker.key();
    let mut session = CompileSession::new(options, ObjectKind::Joker, &key, joker.user_variables());

    for rule in joker.rules().iter().filter(|rule| rule.trigger == Trigger::Passive) {
        compile_passive(&mut session, rule);
    }
    let body = calculate_body(&mut session, joker.rules());
    let loc_vars = render_loc_vars(&mut session, joker.description());
    let (pos, soul) = cursor.place(joker.has_overlay());

    let mut w = LuaWriter::new();
    w.open(&format!("SMODS.Joker{{ --{}", lua_comment(&joker.name)));
    w.line(&format!("key = {},", lua_string(&key)));
    if let Some(config) = session.config.render() {
        w.line(&config);
    }
    write_loc_txt(
        &mut w,
        &joker.name,
        joker.description(),
        &[("unlock", "{\n    [1] = \"Unlocked by default.\"\n}".to_string())],
    );
    w.line(&pos.render("pos"));
    if let Some(soul) = soul {
        w.line(&soul.render("soul_pos"));
    }
    w.line(&format!("cost = {},", joker.cost));
    w.line(&format!("rarity = {},", rarity(options, &joker.rarity)));
    w.line(&format!("blueprint_compat = {},", joker.blueprint_compat));
    w.line(&format!("eternal_compat = {},", joker.eternal_compat));
    w.line(&format!("perishable_compat = {},", joker.perishable_compat));
    w.line(&format!("unlocked = {},", joker.unlocked));
    w.line(&format!("discovered = {},", joker.discovered));
    w.line(&format!("atlas = {},", lua_string(options.atlas_for(ObjectKind::Joker))));
    if !joker.appears_in_shop {
        w.line("in_pool = function(self, args)\n    return false\nend,");
    }
    if let Some(loc_vars) = loc_vars {
        w.line("");
        w.line(&loc_vars);
    }
    write_calculate(&mut w, &session.passive, &body);
    if !session.passive.add_to_deck.is_empty() {
        w.line("");
        w.open("add_to_deck = function(self, card, from_debuff)");
        for line in &session.passive.add_to_deck {
            w.line(line);
        }
        w.close("end,");
        w.open("remove_from_deck = function(self, card, from_debuff)");
        for line in &session.passive.remove_from_deck {
            w.line(line);
        }
        w.close("end,");
    }
    w.close("}");

    GeneratedItem::finish(session, w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jokerforge_core::{Effect, Params, Rule};

    fn joker_with(rule: Rule) -> JokerItem {
        let mut joker = JokerItem::new("Test Joker");
        joker.description = "{C:mult}+#1#{} Mult".to_string();
        joker.rules.push(rule);
        joker
    }

    #[test]
    fn header_carries_metadata_and_slots() {
        let joker = joker_with(
            Rule::new("r", Trigger::HandPlayed)
                .with_effect(Effect::new("e", "add_mult", Params::new().with("value", 5))),
        );
        let options = GenerateOptions::default();
        let item = generate_joker(&joker, &options, &mut AtlasCursor::new(10));
        assert_eq!(item.full_key, "j_mycustom_test_joker");
        assert!(item.code.starts_with("SMODS.Joker{ --Test Joker\n    key = \"test_joker\",\n"));
        assert!(item.code.contains("    config = {\n        extra = {\n            mult = 5\n        }\n    },\n"));
        assert!(item.code.contains("    pos = { x = 0, y = 0 },\n"));
        assert!(item.code.contains("return { vars = { card.ability.extra.mult } }"));
        assert!(item.code.contains("    calculate = function(self, card, context)\n        if context.cardarea == G.jokers and context.joker_main then\n"));
        assert!(item.code.ends_with("}\n"));
    }

    #[test]
    fn multi_line_names_stay_inside_the_header_comment() {
        let mut joker = joker_with(
            Rule::new("r", Trigger::HandPlayed)
                .with_effect(Effect::new("e", "add_mult", Params::new().with("value", 5))),
        );
        joker.name = "Two\nLines".to_string();
        let item = generate_joker(&joker, &GenerateOptions::default(), &mut AtlasCursor::new(10));
        assert!(item.code.starts_with("SMODS.Joker{ --Two Lines\n    key = \"two_lines\",\n"));
        assert!(item.code.contains("['name'] = \"Two\\nLines\","));
    }

    #[test]
    fn passive_rules_fill_deck_hooks() {
        let joker = joker_with(
            Rule::new("p", Trigger::Passive)
                .with_effect(Effect::new("e", "edit_hand_size", Params::new().with("value", 1))),
        );
        let options = GenerateOptions::default();
        let item = generate_joker(&joker, &options, &mut AtlasCursor::new(10));
        assert!(item.code.contains(
            "    add_to_deck = function(self, card, from_debuff)\n        G.hand:change_size(card.ability.extra.hand_size)\n    end,"
        ));
        assert!(item.code.contains("remove_from_deck"));
        assert!(!item.code.contains("calculate = function"));
    }

    #[test]
    fn modded_rarity_is_prefixed_once() {
        let options = GenerateOptions::default().with_prefix("mymod");
        assert_eq!(rarity(&options, &RarityRef::Index(4)), "4");
        assert_eq!(rarity(&options, &RarityRef::Named("Mythic".to_string())), "\"mymod_mythic\"");
        assert_eq!(
            rarity(&options, &RarityRef::Named("mymod_mythic".to_string())),
            "\"mymod_mythic\""
        );
    }
}
