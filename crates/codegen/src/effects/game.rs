use super::{Colour, EffectOutput, EffectScope};
use crate::conditions::current_hand;
use crate::lua::lua_string;
use jokerforge_core::{normalize_poker_hand, slugify};

/// `G.GAME.pool_flags` entry shared by `set_flag` and `check_flag`.
pub fn flag_path(prefix: &str, name: &str) -> String {
    format!("G.GAME.pool_flags.{}_{}", prefix, slugify(name))
}

pub(super) fn level_up_hand(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let levels = scope.value("value", "levels", 1.0);
    let selection = scope.params().str_or("hand_selection", "current");

    if selection == "current" && scope.is_scoring() {
        return EffectOutput::field(format!("level_up = {}", levels.expr))
            .message("localize('k_level_up_ex')")
            .colour(Colour::Red)
            .uses(&levels);
    }

    let target = scope.local("target_hand");
    let mut pre = Vec::new();
    match selection.as_str() {
        "specific" => {
            let hand = scope
                .params()
                .str("specific_hand")
                .and_then(|hand| normalize_poker_hand(&hand))
                .unwrap_or("High Card");
            pre.push(format!("local {} = {}", target, lua_string(hand)));
        }
        "random" => {
            let pool = scope.local("available_hands");
            pre.push(format!("local {} = {{}}", pool));
            pre.push("for hand, value in pairs(G.GAME.hands) do".to_string());
            pre.push("    if value.visible then".to_string());
            pre.push(format!("        {pool}[#{pool} + 1] = hand", pool = pool));
            pre.push("    end".to_string());
            pre.push("end".to_string());
            pre.push(format!(
                "local {} = pseudorandom_element({}, pseudoseed('{}'))",
                target,
                pool,
                scope.seed("level_up_hand")
            ));
        }
        "variable" => {
            let name = scope.params().str_or("pokerhand_variable", "");
            match scope.session.find_user_var(&name) {
                Some(var) => pre.push(format!("local {} = {}", target, scope.extra(&var.name))),
                None => {
                    scope.warn(format!("unknown poker hand variable `{}`", name));
                    pre.push(format!("local {} = \"High Card\"", target));
                }
            }
        }
        _ => {
            pre.push(format!("local {} = {}", target, current_hand(scope.trigger)));
        }
    }

    let mut output = EffectOutput::func(&format!(
        "level_up_hand(card, {}, true, {})",
        target, levels.expr
    ))
    .message("localize('k_level_up_ex')")
    .colour(Colour::Red)
    .uses(&levels);
    output.pre_return = pre;
    output
}

/// Per-round counters that effects can raise or lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResource {
    Hands,
    Discards,
}

impl RoundResource {
    pub fn slot(self) -> &'static str {
        match self {
            Self::Hands => "hands",
            Self::Discards => "discards",
        }
    }

    fn ease(self) -> &'static str {
        match self {
            Self::Hands => "ease_hands_played",
            Self::Discards => "ease_discard",
        }
    }

    fn current(self) -> &'static str {
        match self {
            Self::Hands => "G.GAME.current_round.hands_left",
            Self::Discards => "G.GAME.current_round.discards_left",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Hands => "Hand",
            Self::Discards => "Discard",
        }
    }

    /// Permanent change of the per-round allowance, applied this round too.
    pub fn permanent_delta(self, expr: &str) -> String {
        format!(
            "G.GAME.round_resets.{slot} = G.GAME.round_resets.{slot} + {expr}\n{ease}({expr})",
            slot = self.slot(),
            expr = expr,
            ease = self.ease()
        )
    }
}

pub(super) fn edit_round_resource(
    scope: &mut EffectScope<'_, '_>,
    resource: RoundResource,
) -> EffectOutput {
    let value = scope.shared_value("value", resource.slot(), 1.0);
    let operation = scope.params().str_or("operation", "add");
    let (body, message) = match operation.as_str() {
        "subtract" => (
            format!("{}(-({}))", resource.ease(), value.expr),
            format!("\"-\"..tostring({})..\" {}\"", value.expr, resource.label()),
        ),
        "set" => (
            format!("{}({} - {})", resource.ease(), value.expr, resource.current()),
            format!("\"Set to \"..tostring({})..\" {}s\"", value.expr, resource.label()),
        ),
        _ => (
            format!("{}({})", resource.ease(), value.expr),
            format!("\"+\"..tostring({})..\" {}\"", value.expr, resource.label()),
        ),
    };
    let colour = match resource {
        RoundResource::Hands => Colour::Blue,
        RoundResource::Discards => Colour::Red,
    };
    EffectOutput::func(&body)
        .message(message)
        .colour(colour)
        .uses(&value)
}

/// Card area limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    HandSize,
    JokerSlots,
    ConsumableSlots,
}

impl Limit {
    pub fn slot(self) -> &'static str {
        match self {
            Self::HandSize => "hand_size",
            Self::JokerSlots => "joker_slots",
            Self::ConsumableSlots => "consumable_slots",
        }
    }

    fn current(self) -> &'static str {
        match self {
            Self::HandSize => "G.hand.config.card_limit",
            Self::JokerSlots => "G.jokers.config.card_limit",
            Self::ConsumableSlots => "G.consumeables.config.card_limit",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::HandSize => "Hand Size",
            Self::JokerSlots => "Joker Slot",
            Self::ConsumableSlots => "Consumable Slot",
        }
    }

    pub fn delta(self, expr: &str) -> String {
        match self {
            Self::HandSize => format!("G.hand:change_size({})", expr),
            _ => format!("{limit} = {limit} + {expr}", limit = self.current(), expr = expr),
        }
    }
}

pub(super) fn edit_limit(scope: &mut EffectScope<'_, '_>, limit: Limit) -> EffectOutput {
    let value = scope.shared_value("value", limit.slot(), 1.0);
    let operation = scope.params().str_or("operation", "add");
    let (body, message) = match operation.as_str() {
        "subtract" => (
            limit.delta(&format!("-({})", value.expr)),
            format!("\"-\"..tostring({})..\" {}\"", value.expr, limit.label()),
        ),
        "set" => (
            limit.delta(&format!("{} - {}", value.expr, limit.current())),
            format!("\"{} \"..tostring({})", limit.label(), value.expr),
        ),
        _ => (
            limit.delta(&value.expr),
            format!("\"+\"..tostring({})..\" {}\"", value.expr, limit.label()),
        ),
    };
    EffectOutput::func(&body)
        .message(message)
        .colour(Colour::Blue)
        .uses(&value)
}

pub(super) fn disable_boss_blind(_scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    EffectOutput::func(
        "if G.GAME.blind and G.GAME.blind.boss and not G.GAME.blind.disabled then\n    G.GAME.blind:disable()\n    play_sound('timpani')\nend",
    )
    .message("localize('ph_boss_disabled')")
    .colour(Colour::Green)
    .usable("G.GAME.blind and G.GAME.blind.boss and not G.GAME.blind.disabled")
}

pub(super) fn create_tag(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let tag = match scope.params().str_or("tag_type", "random").as_str() {
        "specific" => {
            let key = scope.params().str_or("specific_tag", "tag_double");
            let key = if key.starts_with("tag_") {
                key
            } else {
                format!("tag_{}", key)
            };
            lua_string(&key)
        }
        _ => "get_next_tag_key()".to_string(),
    };
    EffectOutput::func(&format!(
        "G.E_MANAGER:add_event(Event({{\n    func = function()\n        local tag = Tag({})\n        tag:set_ability()\n        add_tag(tag)\n        play_sound('holo1', 1.2 + math.random() * 0.1, 0.4)\n        return true\n    end\n}}))",
        tag
    ))
    .message("\"Created Tag!\"")
    .colour(Colour::Green)
}

pub(super) fn set_flag(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let name = scope.params().str_or("flag_name", "custom_flag");
    let path = flag_path(scope.mod_prefix(), &name);
    let assignment = match scope.params().str_or("value", "true").as_str() {
        "false" => format!("{} = false", path),
        "toggle" => format!("{path} = not {path}", path = path),
        _ => format!("{} = true", path),
    };
    EffectOutput::func(&assignment)
}

#[cfg(test)]
mod tests {
    use crate::effects::compile_effect;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Effect, Params, Trigger, UserVariable};

    fn level_up(params: Params, trigger: Trigger) -> crate::effects::EffectOutput {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "j", &vars);
        let effect = Effect::new("e1", "level_up_hand", params);
        compile_effect(&mut session, &effect, &trigger)
    }

    #[test]
    fn scoring_levels_current_hand_through_return() {
        let output = level_up(Params::new(), Trigger::HandPlayed);
        assert_eq!(output.statement, "level_up = card.ability.extra.levels");
        assert!(output.pre_return.is_empty());
    }

    #[test]
    fn discard_levels_highlighted_hand() {
        let output = level_up(Params::new(), Trigger::HandDiscarded);
        assert_eq!(
            output.pre_return,
            vec!["local target_hand = G.FUNCS.get_poker_hand_info(G.hand.highlighted)"]
        );
        assert!(output.statement.contains("level_up_hand(card, target_hand, true"));
    }

    #[test]
    fn specific_hand_is_normalized() {
        let params = Params::new()
            .with("hand_selection", "specific")
            .with("specific_hand", "two_pair");
        let output = level_up(params, Trigger::RoundEnd);
        assert_eq!(output.pre_return, vec!["local target_hand = \"Two Pair\""]);
    }

    #[test]
    fn flags_are_namespaced_by_prefix() {
        assert_eq!(
            super::flag_path("mymod", "Gros Michel Gone"),
            "G.GAME.pool_flags.mymod_gros_michel_gone"
        );
    }
}
