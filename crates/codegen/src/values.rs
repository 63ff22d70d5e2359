//! Turns parameter values into Lua expressions and the slots they need.

use crate::allocator::ConfigVar;
use crate::game_vars::find_game_variable;
use crate::lua::lua_number;
use crate::session::CompileSession;
use jokerforge_core::{ParamValue, UserVariableType};

/// Expression for one parameter plus anything the item has to declare for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub expr: String,
    pub config: Vec<ConfigVar>,
    /// Description expression for values computed from game state.
    pub display: Option<String>,
}

impl ResolvedValue {
    fn plain(expr: String) -> Self {
        Self {
            expr,
            config: Vec::new(),
            display: None,
        }
    }

    /// Literal number if the value was declared from one.
    pub fn literal(&self) -> Option<f64> {
        match self.config.as_slice() {
            [var] => match var.value {
                crate::allocator::ConfigValue::Number(value) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `<base>_<first 8 chars of the effect id>`, stable across runs.
pub fn seed_for(base: &str, effect_id: &str) -> String {
    let short: String = effect_id
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .take(8)
        .collect();
    if short.is_empty() {
        base.to_string()
    } else {
        format!("{}_{}", base, short)
    }
}

/// Game variable composition shared by effect values and description slots.
pub fn compose_game_var(code: &str, multiplier: f64, offset: Option<&str>) -> String {
    let scaled = multiplier != 1.0;
    match (offset, scaled) {
        (None, false) => code.to_string(),
        (None, true) => format!("({}) * {}", code, lua_number(multiplier)),
        (Some(offset), false) => format!("{} + ({})", offset, code),
        (Some(offset), true) => format!("{} + ({}) * {}", offset, code, lua_number(multiplier)),
    }
}

/// Resolves an effect parameter, reserving a config slot named after `base`
/// when the value has to be persisted on the card.
pub fn resolve_value(
    session: &mut CompileSession<'_>,
    effect_id: &str,
    value: &ParamValue,
    base: &str,
    default: f64,
) -> ResolvedValue {
    match value {
        ParamValue::Number(number) => literal_slot(session, base, *number),
        ParamValue::Bool(flag) => literal_slot(session, base, if *flag { 1.0 } else { 0.0 }),
        ParamValue::Missing => literal_slot(session, base, default),
        ParamValue::Variable(name) => match session.find_user_var(name) {
            Some(var) => {
                if var.var_type != UserVariableType::Number {
                    session.warn(format!(
                        "variable `{}` is not numeric but is used as a number",
                        name
                    ));
                }
                ResolvedValue::plain(session.extra(&var.name))
            }
            None => {
                session.warn(format!(
                    "unknown variable `{}`, using literal {}",
                    name,
                    lua_number(default)
                ));
                literal_slot(session, base, default)
            }
        },
        ParamValue::GameVar {
            id,
            multiplier,
            start_from,
        } => {
            let Some(game_var) = find_game_variable(id) else {
                session.warn(format!("unknown game variable `{}`", id));
                return literal_slot(session, base, default);
            };
            let mut config = Vec::new();
            let offset = if *start_from != 0.0 {
                let name = session.allocator.reserve(base);
                config.push(ConfigVar::number(&name, *start_from));
                Some(session.extra(&name))
            } else {
                None
            };
            let expr = compose_game_var(game_var.code, *multiplier, offset.as_deref());
            ResolvedValue {
                display: Some(expr.clone()),
                expr,
                config,
            }
        }
        ParamValue::Range { min, max } => {
            let name = session.allocator.reserve(base);
            let min_name = format!("{}_min", name);
            let max_name = format!("{}_max", name);
            let expr = format!(
                "pseudorandom('{}', {}, {})",
                seed_for(&name, effect_id),
                session.extra(&min_name),
                session.extra(&max_name)
            );
            ResolvedValue {
                expr,
                config: vec![
                    ConfigVar::number(&min_name, *min),
                    ConfigVar::number(&max_name, *max),
                ],
                display: None,
            }
        }
    }
}

/// Like [`resolve_value`], but literals land in one slot per item named
/// exactly `name`; the first effect declaring it sets its value.
pub fn resolve_shared(
    session: &mut CompileSession<'_>,
    effect_id: &str,
    value: &ParamValue,
    name: &str,
    default: f64,
) -> ResolvedValue {
    let literal = match value {
        ParamValue::Number(number) => *number,
        ParamValue::Missing => default,
        _ => return resolve_value(session, effect_id, value, name, default),
    };
    if session.find_user_var(name).is_some() {
        return literal_slot(session, name, literal);
    }
    if !session.allocator.is_taken(name) {
        session.allocator.reserve(name);
    }
    ResolvedValue {
        expr: session.extra(name),
        config: vec![ConfigVar::number(name, literal)],
        display: None,
    }
}

fn literal_slot(session: &mut CompileSession<'_>, base: &str, value: f64) -> ResolvedValue {
    let name = session.allocator.reserve(base);
    ResolvedValue {
        expr: session.extra(&name),
        config: vec![ConfigVar::number(&name, value)],
        display: None,
    }
}

/// Value used inside a guard. Guards never declare slots, so literals stay
/// inline and ranges compare against their lower bound.
pub fn inline_value(session: &CompileSession<'_>, value: &ParamValue, default: f64) -> String {
    match value {
        ParamValue::Number(number) => lua_number(*number),
        ParamValue::Bool(flag) => lua_number(if *flag { 1.0 } else { 0.0 }),
        ParamValue::Missing => lua_number(default),
        ParamValue::Variable(name) => match session.find_user_var(name) {
            Some(var) => session.extra(&var.name),
            None => lua_number(default),
        },
        ParamValue::GameVar {
            id,
            multiplier,
            start_from,
        } => match find_game_variable(id) {
            Some(game_var) => {
                let offset = (*start_from != 0.0).then(|| lua_number(*start_from));
                compose_game_var(game_var.code, *multiplier, offset.as_deref())
            }
            None => lua_number(default),
        },
        ParamValue::Range { min, .. } => lua_number(*min),
    }
}
