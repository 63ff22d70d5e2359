use super::{Colour, EffectOutput, EffectScope};
use crate::lua::lua_string;
use jokerforge_core::{Edition, JokerRarity, Params};

/// Center key of a joker, adding the `j_` class prefix when missing.
pub fn joker_key(raw: &str) -> String {
    if raw.starts_with("j_") {
        raw.to_string()
    } else {
        format!("j_{}", raw)
    }
}

fn is_negative(params: &Params) -> bool {
    params.bool_or("is_negative", false)
        || params
            .str("edition")
            .and_then(|edition| edition.parse::<Edition>().ok())
            == Some(Edition::Negative)
}

/// Fields of the `SMODS.add_card` call for the requested joker.
fn add_card_fields(params: &Params) -> String {
    let mut fields = vec!["set = 'Joker'".to_string()];
    match params.str_or("joker_type", "random").as_str() {
        "specific" => {
            if let Some(key) = params.str("joker_key") {
                fields.push(format!("key = {}", lua_string(&joker_key(&key))));
            }
        }
        _ => {
            if let Some(rarity) = params
                .str("rarity")
                .and_then(|rarity| rarity.parse::<JokerRarity>().ok())
            {
                match rarity {
                    JokerRarity::Legendary => fields.push("legendary = true".to_string()),
                    _ => fields.push(format!("rarity = {}", lua_string(rarity.pool_name()))),
                }
            }
        }
    }
    fields.join(", ")
}

fn edition_line(params: &Params, target: &str, seed: &str) -> Option<String> {
    if is_negative(params) {
        return Some(format!("{}:set_edition(\"e_negative\", true)", target));
    }
    match params.str("edition")?.as_str() {
        "none" => None,
        "random" => Some(format!(
            "{}:set_edition(poll_edition('{}', nil, true, true), true)",
            target, seed
        )),
        other => other
            .parse::<Edition>()
            .ok()
            .map(|edition| format!("{}:set_edition({}, true)", target, lua_string(edition.key()))),
    }
}

/// Capacity check and buffer reservation unless the joker arrives as negative.
pub(super) fn create_joker(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let params = scope.params();
    let flag = scope.local("created_joker");
    let joker = scope.local("joker_card");
    let seed = scope.seed("create_joker");
    let negative = is_negative(params);

    let mut event = vec![format!(
        "local {} = SMODS.add_card({{ {} }})",
        joker,
        add_card_fields(params)
    )];
    if let Some(line) = edition_line(params, &joker, &seed) {
        event.push(format!("if {} then", joker));
        event.push(format!("    {}", line));
        event.push("end".to_string());
    }
    if !negative {
        event.push("G.GAME.joker_buffer = 0".to_string());
    }

    let mut lines = vec![format!("local {} = false", flag)];
    let depth = if negative {
        lines.push(format!("{} = true", flag));
        ""
    } else {
        lines.push(
            "if #G.jokers.cards + G.GAME.joker_buffer < G.jokers.config.card_limit then".to_string(),
        );
        lines.push(format!("    {} = true", flag));
        lines.push("    G.GAME.joker_buffer = G.GAME.joker_buffer + 1".to_string());
        "    "
    };
    lines.push(format!("{}G.E_MANAGER:add_event(Event({{", depth));
    lines.push(format!("{}    func = function()", depth));
    for line in &event {
        lines.push(format!("{}        {}", depth, line));
    }
    lines.push(format!("{}        return true", depth));
    lines.push(format!("{}    end", depth));
    lines.push(format!("{}}}))", depth));
    if !negative {
        lines.push("end".to_string());
    }

    EffectOutput::message_only(
        format!("{} and localize('k_plus_joker') or nil", flag),
        Colour::Blue,
    )
    .pre(lines.join("\n"))
}

fn pick_joker(
    params: &Params,
    pool: &str,
    target: &str,
    seed: &str,
    extra_filters: &[&str],
) -> Vec<String> {
    let mut filters = vec!["not joker.getting_sliced".to_string()];
    filters.extend(extra_filters.iter().map(|filter| filter.to_string()));
    let selection = params.str_or("selection_method", "random");
    if selection == "specific" {
        if let Some(key) = params.str("joker_key") {
            filters.push(format!("joker.config.center.key == {}", lua_string(&joker_key(&key))));
        }
    }
    let mut lines = vec![
        format!("local {} = {{}}", pool),
        "for _, joker in ipairs(G.jokers.cards) do".to_string(),
        format!("    if {} then", filters.join(" and ")),
        format!("        {pool}[#{pool} + 1] = joker", pool = pool),
        "    end".to_string(),
        "end".to_string(),
    ];
    let chosen = match selection.as_str() {
        "first" | "leftmost" => format!("{}[1]", pool),
        "last" | "rightmost" => format!("{pool}[#{pool}]", pool = pool),
        _ => format!(
            "#{pool} > 0 and pseudorandom_element({pool}, pseudoseed('{seed}')) or nil",
            pool = pool,
            seed = seed
        ),
    };
    lines.push(format!("local {} = {}", target, chosen));
    lines
}

pub(super) fn destroy_joker(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let pool = scope.local("destructable_jokers");
    let target = scope.local("joker_to_destroy");
    let seed = scope.seed("destroy_joker");
    let mut lines = pick_joker(
        scope.params(),
        &pool,
        &target,
        &seed,
        &["joker ~= card", "not joker.ability.eternal"],
    );
    lines.push(format!("if {} then", target));
    lines.push(format!("    {}.getting_sliced = true", target));
    lines.push("    G.E_MANAGER:add_event(Event({".to_string());
    lines.push("        func = function()".to_string());
    lines.push(format!("            {}:start_dissolve({{G.C.RED}}, nil, 1.6)", target));
    lines.push("            return true".to_string());
    lines.push("        end".to_string());
    lines.push("    }))".to_string());
    lines.push("end".to_string());
    EffectOutput::message_only(format!("{} and \"Destroyed Joker!\" or nil", target), Colour::Red)
        .pre(lines.join("\n"))
}

pub(super) fn copy_joker(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let pool = scope.local("available_jokers");
    let target = scope.local("target_joker");
    let flag = scope.local("copied_joker");
    let seed = scope.seed("copy_joker");
    let params = scope.params();
    let negative = is_negative(params);
    let mut lines = pick_joker(params, &pool, &target, &seed, &[]);
    lines.push(format!("local {} = false", flag));
    let capacity = if negative {
        String::new()
    } else {
        " and #G.jokers.cards + G.GAME.joker_buffer < G.jokers.config.card_limit".to_string()
    };
    lines.push(format!("if {}{} then", target, capacity));
    lines.push(format!("    {} = true", flag));
    if !negative {
        lines.push("    G.GAME.joker_buffer = G.GAME.joker_buffer + 1".to_string());
    }
    lines.push("    G.E_MANAGER:add_event(Event({".to_string());
    lines.push("        func = function()".to_string());
    lines.push(format!(
        "            local copied = copy_card({}, nil, nil, nil, {}.edition and {}.edition.negative)",
        target, target, target
    ));
    if let Some(line) = edition_line(params, "copied", &seed) {
        lines.push(format!("            {}", line));
    }
    lines.push("            copied:add_to_deck()".to_string());
    lines.push("            G.jokers:emplace(copied)".to_string());
    if !negative {
        lines.push("            G.GAME.joker_buffer = 0".to_string());
    }
    lines.push("            return true".to_string());
    lines.push("        end".to_string());
    lines.push("    }))".to_string());
    lines.push("end".to_string());
    EffectOutput::message_only(
        format!("{} and localize('k_duplicated_ex') or nil", flag),
        Colour::Green,
    )
    .pre(lines.join("\n"))
}

/// Sell value changes share the `sell_value` slot across the item.
pub(super) fn set_sell_value(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let value = scope.shared_value("value", "sell_value", 1.0);
    let operation = scope.params().str_or("operation", "add");
    let update = |target: &str| -> String {
        match operation.as_str() {
            "subtract" => format!(
                "{t}.ability.extra_value = ({t}.ability.extra_value or 0) - {v}\n{t}:set_cost()",
                t = target,
                v = value.expr
            ),
            "set" => format!(
                "{t}.ability.extra_value = ({t}.ability.extra_value or 0) + ({v} - {t}.sell_cost)\n{t}:set_cost()",
                t = target,
                v = value.expr
            ),
            _ => format!(
                "{t}.ability.extra_value = ({t}.ability.extra_value or 0) + {v}\n{t}:set_cost()",
                t = target,
                v = value.expr
            ),
        }
    };
    let body = match scope.params().str_or("target", "self").as_str() {
        "all_jokers" | "all" => {
            let inner = crate::lua::indent(&update("joker"), 1);
            format!("for _, joker in ipairs(G.jokers.cards) do\n{}\nend", inner)
        }
        _ => update("card"),
    };
    EffectOutput::func(&body)
        .message("localize('k_val_up')")
        .colour(Colour::Money)
        .uses(&value)
}

#[cfg(test)]
mod tests {
    use crate::effects::compile_effect;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Effect, Params, Trigger, UserVariable};

    #[test]
    fn creation_checks_capacity_unless_negative() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let normal = Effect::new("e1", "create_joker", Params::new().with("rarity", "rare"));
        let output = compile_effect(&mut session, &normal, &Trigger::RoundEnd);
        let code = output.pre_return.join("\n");
        assert!(code.contains("G.jokers.config.card_limit"));
        assert!(code.contains("G.GAME.joker_buffer = G.GAME.joker_buffer + 1"));
        assert!(code.contains("rarity = \"Rare\""));

        let negative = Effect::new("e2", "create_joker", Params::new().with("is_negative", true));
        let output = compile_effect(&mut session, &negative, &Trigger::RoundEnd);
        let code = output.pre_return.join("\n");
        assert!(!code.contains("card_limit"));
        assert!(code.contains("created_joker2"));
        assert!(code.contains("e_negative"));
    }

    #[test]
    fn sell_value_slot_is_shared() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let first = Effect::new("e1", "set_sell_value", Params::new().with("value", 2));
        let second = Effect::new("e2", "set_sell_value", Params::new().with("value", 7));
        let a = compile_effect(&mut session, &first, &Trigger::RoundEnd);
        session.absorb(&a);
        let b = compile_effect(&mut session, &second, &Trigger::RoundEnd);
        session.absorb(&b);
        assert!(b.statement.contains("card.ability.extra.sell_value"));
        assert_eq!(session.config.len(), 1);
        assert_eq!(
            session.config.get("sell_value").map(|v| v.value.clone()),
            Some(crate::allocator::ConfigValue::Number(2.0))
        );
    }
}
