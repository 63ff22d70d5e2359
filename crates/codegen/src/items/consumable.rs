use super::{write_calculate, write_loc_txt, AtlasCursor, GeneratedItem};
use crate::assembler::{assemble_calculate, compile_body, BodyMode, Member};
use crate::conditions::compile_conditions;
use crate::loc_vars::render_loc_vars;
use crate::lua::{indent, join_guards, lua_comment, lua_number, lua_string, LuaWriter};
use crate::options::{GenerateOptions, ObjectKind};
use crate::session::CompileSession;
use jokerforge_core::{ConsumableItem, ConsumableSetDef, Rule, RuleOwner, Trigger};

/// What `use` does and when the game lets the card be used.
struct UseParts {
    body: String,
    can_use: String,
}

fn compile_use(session: &mut CompileSession<'_>, rules: &[&Rule]) -> UseParts {
    let mut blocks = Vec::new();
    let mut usable: Vec<String> = Vec::new();
    let mut guards = Vec::new();
    let mut always = rules.is_empty();

    for rule in rules {
        let guard = compile_conditions(session, rule);
        let body = compile_body(session, &[Member::whole(rule)], BodyMode::Apply);
        for predicate in body.usable {
            if !usable.contains(&predicate) {
                usable.push(predicate);
            }
        }
        if guard.is_empty() {
            always = true;
            blocks.push(body.code);
        } else {
            blocks.push(format!("if {} then\n{}\nend", guard, indent(&body.code, 1)));
            guards.push(guard);
        }
    }

    let mut parts = Vec::new();
    if !always {
        parts.push(join_guards(&guards, "or"));
    }
    parts.extend(usable);
    let can_use = if parts.is_empty() {
        "true".to_string()
    } else {
        join_guards(&parts, "and")
    };
    UseParts {
        body: blocks.join("\n"),
        can_use,
    }
}

/// `SMODS.Consumable` definition. Rules triggered by the card being used
/// make up `use`; any other trigger goes through `calculate`.
pub fn generate_consumable(
    consumable: &ConsumableItem,
    options: &GenerateOptions,
    cursor: &mut AtlasCursor,
) -> GeneratedItem {
    let key = consumable.key();
    let mut session = CompileSession::new(
        options,
        ObjectKind::Consumable,
        &key,
        consumable.user_variables(),
    );

    let (use_rules, held_rules): (Vec<&Rule>, Vec<&Rule>) = consumable
        .rules()
        .iter()
        .partition(|rule| rule.trigger == Trigger::ConsumableUsed);
    let uses = compile_use(&mut session, &use_rules);
    let body = assemble_calculate(&mut session, &held_rules);
    let loc_vars = render_loc_vars(&mut session, consumable.description());
    let (pos, soul) = cursor.place(consumable.has_overlay());

    let mut w = LuaWriter::new();
    w.open(&format!("SMODS.Consumable {{ --{}", lua_comment(&consumable.name)));
    w.line(&format!("key = {},", lua_string(&key)));
    w.line(&format!("set = {},", lua_string(&consumable.set)));
    w.line(&pos.render("pos"));
    if let Some(soul) = soul {
        w.line(&soul.render("soul_pos"));
    }
    if let Some(config) = session.config.render() {
        w.line(&config);
    }
    write_loc_txt(&mut w, &consumable.name, consumable.description(), &[]);
    w.line(&format!("cost = {},", consumable.cost));
    w.line(&format!("unlocked = {},", consumable.unlocked));
    w.line(&format!("discovered = {},", consumable.discovered));
    w.line(&format!("hidden = {},", consumable.hidden));
    w.line(&format!("can_repeat_soul = {},", consumable.can_repeat_soul));
    w.line(&format!(
        "atlas = {},",
        lua_string(options.atlas_for(ObjectKind::Consumable))
    ));
    if let Some(loc_vars) = loc_vars {
        w.line("");
        w.line(&loc_vars);
    }
    w.line("");
    w.open("use = function(self, card, area, copier)");
    w.line("local used_card = copier or card");
    if !uses.body.is_empty() {
        w.line(&uses.body);
    }
    w.close("end,");
    w.open("can_use = function(self, card)");
    w.line(&format!("return {}", uses.can_use));
    w.close("end,");
    write_calculate(&mut w, &session.passive, &body);
    w.close("}");

    GeneratedItem::finish(session, w.finish())
}

/// `SMODS.ConsumableType` for a custom consumable set.
pub fn generate_consumable_set(set: &ConsumableSetDef) -> String {
    let mut w = LuaWriter::new();
    w.open("SMODS.ConsumableType {");
    w.line(&format!("key = {},", lua_string(&set.key)));
    w.line(&format!(
        "primary_colour = HEX({}),",
        lua_string(set.primary_colour.as_deref().unwrap_or("666666"))
    ));
    w.line(&format!(
        "secondary_colour = HEX({}),",
        lua_string(set.secondary_colour.as_deref().unwrap_or("333333"))
    ));
    w.line("collection_rows = { 6, 6 },");
    w.line(&format!("shop_rate = {},", lua_number(set.shop_rate)));
    w.open("loc_txt = {");
    w.line(&format!("name = {},", lua_string(&set.name)));
    w.line(&format!("collection = {},", lua_string(&format!("{} Cards", set.name))));
    w.close("},");
    w.close("}");
    w.finish()
}
