use super::{Colour, EffectOutput, EffectScope};
use crate::lua::{indent, lua_string};
use jokerforge_core::{ConsumableKind, Edition, Params};

const CAPACITY: &str =
    "#G.consumeables.cards + G.GAME.consumeable_buffer < G.consumeables.config.card_limit";

fn is_negative(params: &Params) -> bool {
    params.bool_or("is_negative", false)
        || params
            .str("edition")
            .and_then(|edition| edition.parse::<Edition>().ok())
            == Some(Edition::Negative)
}

fn consumable_key(raw: &str) -> String {
    if raw.starts_with("c_") {
        raw.to_string()
    } else {
        format!("c_{}", raw)
    }
}

fn set_message(set: &str) -> (String, Colour) {
    match set.parse::<ConsumableKind>() {
        Ok(kind) => {
            let colour = match kind {
                ConsumableKind::Tarot => Colour::Purple,
                ConsumableKind::Planet => Colour::Blue,
                ConsumableKind::Spectral => Colour::DarkEdition,
            };
            (format!("localize('{}')", kind.plus_message_key()), colour)
        }
        Err(_) => ("\"+1 Consumable!\"".to_string(), Colour::Purple),
    }
}

/// Wraps `body` in a deferred event, behind the consumable capacity check
/// and buffer reservation unless `negative`. `flag` must already be declared.
fn reserve_and_schedule(flag: &str, body: &[String], negative: bool) -> String {
    let mut event = body.to_vec();
    if !negative {
        event.push("G.GAME.consumeable_buffer = 0".to_string());
    }
    let scheduled = format!(
        "G.E_MANAGER:add_event(Event({{\n    func = function()\n{}\n        return true\n    end\n}}))",
        indent(&event.join("\n"), 2)
    );
    let mut lines = Vec::new();
    if negative {
        lines.push(format!("{} = true", flag));
        lines.push(scheduled);
    } else {
        lines.push(format!("if {} then", CAPACITY));
        lines.push(format!("    {} = true", flag));
        lines.push("    G.GAME.consumeable_buffer = G.GAME.consumeable_buffer + 1".to_string());
        lines.push(indent(&scheduled, 1));
        lines.push("end".to_string());
    }
    lines.join("\n")
}

pub(super) fn create_consumable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let params = scope.params();
    let flag = scope.local("created_consumable");
    let seed = scope.seed("create_consumable");
    let negative = is_negative(params);
    let set = params.str_or("set", "random");

    let mut fields = Vec::new();
    let (message, colour) = if set == "random" {
        fields.push(format!(
            "set = pseudorandom_element({{'Tarot', 'Planet', 'Spectral'}}, pseudoseed('{}'))",
            seed
        ));
        ("\"+1 Consumable!\"".to_string(), Colour::Purple)
    } else {
        fields.push(format!("set = {}", lua_string(&set)));
        set_message(&set)
    };
    match params.str("specific_card") {
        Some(card) if card != "random" => {
            fields.push(format!("key = {}", lua_string(&consumable_key(&card))));
        }
        _ => {}
    }
    if negative {
        fields.push("edition = 'e_negative'".to_string());
    }
    let body = vec![format!("SMODS.add_card({{ {} }})", fields.join(", "))];
    EffectOutput::message_only(format!("{} and {} or nil", flag, message), colour).pre(format!(
        "local {} = false\n{}",
        flag,
        reserve_and_schedule(&flag, &body, negative)
    ))
}

fn pick_consumable(params: &Params, pool: &str, target: &str, seed: &str) -> Vec<String> {
    let mut filters = vec!["not consumable.getting_sliced".to_string()];
    match params.str("specific_card") {
        Some(card) if card != "random" => filters.push(format!(
            "consumable.config.center.key == {}",
            lua_string(&consumable_key(&card))
        )),
        _ => {
            if let Some(set) = params.str("set").filter(|set| set != "random") {
                filters.push(format!("consumable.ability.set == {}", lua_string(&set)));
            }
        }
    }
    vec![
        format!("local {} = {{}}", pool),
        "for _, consumable in ipairs(G.consumeables.cards) do".to_string(),
        format!("    if {} then", filters.join(" and ")),
        format!("        {pool}[#{pool} + 1] = consumable", pool = pool),
        "    end".to_string(),
        "end".to_string(),
        format!(
            "local {target} = #{pool} > 0 and pseudorandom_element({pool}, pseudoseed('{seed}')) or nil",
            target = target,
            pool = pool,
            seed = seed
        ),
    ]
}

pub(super) fn destroy_consumable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let pool = scope.local("destructable_consumables");
    let target = scope.local("consumable_to_destroy");
    let seed = scope.seed("destroy_consumable");
    let mut lines = pick_consumable(scope.params(), &pool, &target, &seed);
    lines.push(format!("if {} then", target));
    lines.push(format!("    {}.getting_sliced = true", target));
    lines.push("    G.E_MANAGER:add_event(Event({".to_string());
    lines.push("        func = function()".to_string());
    lines.push(format!("            {}:start_dissolve({{G.C.RED}}, nil, 1.6)", target));
    lines.push("            return true".to_string());
    lines.push("        end".to_string());
    lines.push("    }))".to_string());
    lines.push("end".to_string());
    EffectOutput::message_only(
        format!("{} and \"Destroyed Consumable!\" or nil", target),
        Colour::Red,
    )
    .pre(lines.join("\n"))
}

pub(super) fn copy_consumable(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let pool = scope.local("copyable_consumables");
    let target = scope.local("consumable_to_copy");
    let flag = scope.local("copied_consumable");
    let seed = scope.seed("copy_consumable");
    let params = scope.params();
    let negative = is_negative(params);
    let mut lines = vec![format!("local {} = false", flag)];
    lines.extend(pick_consumable(params, &pool, &target, &seed));
    let mut body = vec![format!("local copied = copy_card({}, nil)", target)];
    if negative {
        body.push("copied:set_edition(\"e_negative\", true)".to_string());
    }
    body.push("copied:add_to_deck()".to_string());
    body.push("G.consumeables:emplace(copied)".to_string());
    lines.push(format!("if {} then", target));
    lines.push(indent(&reserve_and_schedule(&flag, &body, negative), 1));
    lines.push("end".to_string());
    EffectOutput::message_only(
        format!("{} and localize('k_duplicated_ex') or nil", flag),
        Colour::Green,
    )
    .pre(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use crate::effects::compile_effect;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Effect, Params, Trigger, UserVariable};

    #[test]
    fn tarot_creation_reserves_buffer() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let effect = Effect::new("e1", "create_consumable", Params::new().with("set", "Tarot"));
        let output = compile_effect(&mut session, &effect, &Trigger::BlindSelected);
        let code = output.pre_return.join("\n");
        assert!(code.contains("G.GAME.consumeable_buffer = G.GAME.consumeable_buffer + 1"));
        assert!(code.contains("SMODS.add_card({ set = \"Tarot\" })"));
        assert_eq!(
            output.message.as_deref(),
            Some("created_consumable and localize('k_plus_tarot') or nil")
        );
    }

    #[test]
    fn copy_flag_is_visible_to_message() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let effect = Effect::new("e1", "copy_consumable", Params::new());
        let output = compile_effect(&mut session, &effect, &Trigger::ShopEntered);
        let code = output.pre_return.join("\n");
        assert!(code.starts_with("local copied_consumable = false"));
        assert_eq!(code.matches("local copied_consumable = false").count(), 1);
    }
}
