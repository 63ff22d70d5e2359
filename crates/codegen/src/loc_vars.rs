//! Description variables (`loc_vars`).

use crate::allocator::ConfigOrigin;
use crate::lua::{lua_string, LuaWriter};
use crate::session::CompileSession;

/// Highest `#n#` placeholder index in a description; 0 when there is none.
pub fn placeholder_count(description: &str) -> usize {
    let bytes = description.as_bytes();
    let mut max = 0;
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] != b'#' {
            index += 1;
            continue;
        }
        let start = index + 1;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > start && end < bytes.len() && bytes[end] == b'#' {
            if let Ok(n) = description[start..end].parse::<usize>() {
                max = max.max(n);
            }
            index = end + 1;
        } else {
            index = start;
        }
    }
    max
}

/// Ordered description expressions an item can offer, with the locals
/// they need computed first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocVars {
    pub prelude: Vec<String>,
    pub entries: Vec<String>,
}

/// User numbers, effect slots, game variables, typed user variables, then
/// the odds of every probability slot pair.
pub fn collect(session: &CompileSession<'_>) -> LocVars {
    let mut vars = LocVars::default();
    for origin in [ConfigOrigin::UserNumber, ConfigOrigin::Effect] {
        for var in session.config.with_origin(origin) {
            vars.entries.push(session.extra(&var.name));
        }
    }
    vars.entries.extend(session.display.iter().cloned());
    for var in session.config.with_origin(ConfigOrigin::UserTyped) {
        vars.entries.push(session.extra(&var.name));
    }
    for (index, slot) in session.probabilities.iter().enumerate() {
        let suffix = if index == 0 {
            String::new()
        } else {
            (index + 1).to_string()
        };
        let numerator = format!("new_numerator{}", suffix);
        let denominator = format!("new_denominator{}", suffix);
        vars.prelude.push(format!(
            "local {}, {} = SMODS.get_probability_vars(card, {}, {}, {})",
            numerator,
            denominator,
            session.extra(&slot.numerator_name),
            session.extra(&slot.odds_name),
            lua_string(&session.full_key)
        ));
        vars.entries.push(numerator);
        vars.entries.push(denominator);
    }
    vars
}

/// `loc_vars = function ... end,` returning exactly as many values as the
/// description asks for. `None` when it asks for none.
pub fn render_loc_vars(session: &mut CompileSession<'_>, description: &str) -> Option<String> {
    let wanted = placeholder_count(description);
    if wanted == 0 {
        return None;
    }
    let mut vars = collect(session);
    if vars.entries.len() < wanted {
        session.warn(format!(
            "description uses #{}# but only {} values are available, padding with 0",
            wanted,
            vars.entries.len()
        ));
        vars.entries.resize(wanted, "0".to_string());
    }
    vars.entries.truncate(wanted);
    // Only compute odds the slice actually shows.
    let prelude: Vec<&String> = vars
        .prelude
        .iter()
        .filter(|line| {
            vars.entries
                .iter()
                .any(|entry| entry.starts_with("new_") && line.contains(&format!("local {},", entry)))
        })
        .collect();

    let mut w = LuaWriter::new();
    w.open("loc_vars = function(self, info_queue, card)");
    for line in prelude {
        w.line(line);
    }
    w.line(&format!("return {{ vars = {{ {} }} }}", vars.entries.join(", ")));
    w.close("end,");
    Some(w.finish())
}
