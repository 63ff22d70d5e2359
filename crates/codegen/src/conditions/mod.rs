//! Condition kind generators.
//!
//! A rule's guard is the OR of its condition groups; conditions inside a
//! group combine with the group's own operator (AND unless the group says
//! otherwise). Guards never allocate config slots, so compiling the same
//! rule twice gives the same text.

mod card;
mod game;
mod hand;

pub(crate) use hand::current_hand;

use crate::lua::join_guards;
use crate::session::CompileSession;
use crate::values::inline_value;
use jokerforge_core::{Condition, ConditionKind, Params, Rule, Trigger};

/// What a condition generator can see.
pub struct ConditionScope<'s, 'a> {
    pub session: &'s mut CompileSession<'a>,
    pub trigger: &'s Trigger,
    pub condition: &'s Condition,
}

impl<'s, 'a> ConditionScope<'s, 'a> {
    pub fn params(&self) -> &'s Params {
        &self.condition.params
    }

    /// Inline expression for `params[key]`.
    pub fn number(&self, key: &str, default: f64) -> String {
        inline_value(self.session, &self.condition.params.value(key), default)
    }

    pub fn operator(&self) -> &'static str {
        self.operator_or("equals")
    }

    pub fn operator_or(&self, default: &str) -> &'static str {
        comparison(&self.params().str_or("operator", default))
    }

    /// `lhs <operator> <value>`.
    pub fn compare(&self, lhs: &str, default: f64) -> String {
        format!("{} {} {}", lhs, self.operator(), self.number("value", default))
    }

    pub fn subject(&self) -> &'static str {
        self.session.object.subject_card()
    }

    pub fn extra(&self, name: &str) -> String {
        self.session.extra(name)
    }

    pub fn mod_prefix(&self) -> &str {
        &self.session.options.mod_prefix
    }

    pub fn warn(&mut self, message: String) {
        self.session.warn(message);
    }
}

/// Lua comparison operator for a UI operator keyword. Unknown keywords
/// compare for equality.
pub fn comparison(operator: &str) -> &'static str {
    match operator.trim() {
        "not_equals" | "not_equal" | "!=" | "~=" => "~=",
        "greater_than" | ">" => ">",
        "less_than" | "<" => "<",
        "greater_equals" | "greater_than_or_equal" | ">=" => ">=",
        "less_equals" | "less_than_or_equal" | "<=" => "<=",
        _ => "==",
    }
}

/// Guard of a whole rule. Empty when the rule has no conditions.
pub fn compile_conditions(session: &mut CompileSession<'_>, rule: &Rule) -> String {
    let mut groups = Vec::with_capacity(rule.condition_groups.len());
    for group in &rule.condition_groups {
        let parts: Vec<String> = group
            .conditions
            .iter()
            .map(|condition| compile_condition(session, condition, &rule.trigger))
            .collect();
        groups.push(join_guards(&parts, group.operator.lua()));
    }
    join_guards(&groups, "or")
}

/// One condition as a boolean expression, negated when asked. Unknown
/// kinds compile to an empty string and drop out of the guard.
pub fn compile_condition(
    session: &mut CompileSession<'_>,
    condition: &Condition,
    trigger: &Trigger,
) -> String {
    let Some(kind) = condition.kind() else {
        session.warn(format!("unknown condition type `{}`", condition.condition_type));
        return String::new();
    };
    let mut scope = ConditionScope {
        session,
        trigger,
        condition,
    };
    let expr = dispatch(kind, &mut scope);
    if condition.negate && !expr.is_empty() {
        format!("not ({})", expr)
    } else {
        expr
    }
}

fn dispatch(kind: ConditionKind, scope: &mut ConditionScope<'_, '_>) -> String {
    match kind {
        ConditionKind::InternalVariable => game::internal_variable(scope),
        ConditionKind::HandType => hand::hand_type(scope),
        ConditionKind::CardRank => card::card_rank(scope),
        ConditionKind::CardSuit => card::card_suit(scope),
        ConditionKind::CardEnhancement => card::card_enhancement(scope),
        ConditionKind::CardSeal => card::card_seal(scope),
        ConditionKind::CardEdition => card::card_edition(scope),
        ConditionKind::CardCount => card::card_count(scope),
        ConditionKind::SuitCount => card::suit_count(scope),
        ConditionKind::RankCount => card::rank_count(scope),
        ConditionKind::FirstLastScored => card::first_last_scored(scope),
        ConditionKind::PlayerMoney => {
            scope.compare("(G.GAME.dollars + (G.GAME.dollar_buffer or 0))", 0.0)
        }
        ConditionKind::RemainingHands => scope.compare("G.GAME.current_round.hands_left", 1.0),
        ConditionKind::RemainingDiscards => {
            scope.compare("G.GAME.current_round.discards_left", 1.0)
        }
        ConditionKind::HandSize => scope.compare("G.hand.config.card_limit", 8.0),
        ConditionKind::BlindType => game::blind_type(scope),
        ConditionKind::AnteLevel => scope.compare("G.GAME.round_resets.ante", 1.0),
        ConditionKind::JokerCount => game::joker_count(scope),
        ConditionKind::SpecificJoker => game::specific_joker(scope),
        ConditionKind::JokerRarity => game::joker_rarity(scope),
        ConditionKind::JokerSticker => game::joker_sticker(scope),
        ConditionKind::CheckFlag => game::check_flag(scope),
        ConditionKind::DeckSize => game::deck_size(scope),
        ConditionKind::HandLevel => hand::hand_level(scope),
        ConditionKind::PokerHandBeenPlayed => hand::poker_hand_been_played(scope),
        ConditionKind::CardsSelected => scope.compare("#G.hand.highlighted", 1.0),
        ConditionKind::GenericCompare => game::generic_compare(scope),
        ConditionKind::BlindRequirement => game::blind_requirement(scope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GenerateOptions, ObjectKind};
    use jokerforge_core::{ConditionGroup, LogicOperator, UserVariable};

    fn guard(rule: &Rule, vars: &[UserVariable]) -> (String, usize) {
        let options = GenerateOptions::default();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", vars);
        let text = compile_conditions(&mut session, rule);
        (text, session.warnings.len())
    }

    #[test]
    fn every_kind_compiles_to_an_expression() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        for kind in ConditionKind::ALL {
            for trigger in [Trigger::HandPlayed, Trigger::CardScored, Trigger::RoundEnd] {
                let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", &vars);
                let condition = Condition::new("c1", kind.keyword(), Params::new());
                let expr = compile_condition(&mut session, &condition, &trigger);
                assert!(!expr.trim().is_empty(), "{} under {}", kind.keyword(), trigger);
            }
        }
    }

    #[test]
    fn groups_or_together_and_conditions_and_inside() {
        let money = Condition::new(
            "c1",
            "player_money",
            Params::new().with("operator", "greater_than").with("value", 10),
        );
        let ante = Condition::new("c2", "ante_level", Params::new().with("value", 2));
        let hands = Condition::new("c3", "remaining_hands", Params::new().with("value", 1));
        let rule = Rule::new("r", Trigger::HandPlayed)
            .with_conditions(ConditionGroup::all_of("g1", vec![money, ante]))
            .with_conditions(ConditionGroup::all_of("g2", vec![hands]));
        let (text, warnings) = guard(&rule, &[]);
        assert_eq!(
            text,
            "(((G.GAME.dollars + (G.GAME.dollar_buffer or 0)) > 10) and (G.GAME.round_resets.ante == 2)) or (G.GAME.current_round.hands_left == 1)"
        );
        assert_eq!(warnings, 0);
    }

    #[test]
    fn group_operator_can_be_or() {
        let group = ConditionGroup {
            id: "g".to_string(),
            operator: LogicOperator::Or,
            conditions: vec![
                Condition::new("a", "remaining_hands", Params::new().with("value", 1)),
                Condition::new("b", "remaining_discards", Params::new().with("value", 0)),
            ],
        };
        let rule = Rule::new("r", Trigger::HandPlayed).with_conditions(group);
        let (text, _) = guard(&rule, &[]);
        assert_eq!(
            text,
            "(G.GAME.current_round.hands_left == 1) or (G.GAME.current_round.discards_left == 0)"
        );
    }

    #[test]
    fn negation_wraps_the_expression() {
        let condition =
            Condition::new("c", "remaining_hands", Params::new().with("value", 1)).negated();
        let rule = Rule::new("r", Trigger::HandPlayed)
            .with_conditions(ConditionGroup::all_of("g", vec![condition]));
        let (text, _) = guard(&rule, &[]);
        assert_eq!(text, "not (G.GAME.current_round.hands_left == 1)");
    }

    #[test]
    fn unknown_kind_drops_out_with_a_warning() {
        let rule = Rule::new("r", Trigger::HandPlayed).with_conditions(ConditionGroup::all_of(
            "g",
            vec![Condition::new("c", "moon_is_full", Params::new())],
        ));
        let (text, warnings) = guard(&rule, &[]);
        assert_eq!(text, "");
        assert_eq!(warnings, 1);
    }

    #[test]
    fn compiling_twice_gives_the_same_text() {
        let vars = vec![UserVariable::number("var1", 0.0)];
        let rule = Rule::new("r", Trigger::CardScored).with_conditions(ConditionGroup::all_of(
            "g",
            vec![
                Condition::new(
                    "c1",
                    "internal_variable",
                    Params::new().with("variable_name", "var1").with("value", 0),
                ),
                Condition::new(
                    "c2",
                    "first_last_scored",
                    Params::new().with("position", "last").with("rank_group", "face"),
                ),
            ],
        ));
        assert_eq!(guard(&rule, &vars), guard(&rule, &vars));
    }

    #[test]
    fn operator_keywords_map_to_lua() {
        assert_eq!(comparison("greater_equals"), ">=");
        assert_eq!(comparison("not_equals"), "~=");
        assert_eq!(comparison("whatever"), "==");
    }
}
