//! Playing card checks: rank, suit, modifiers, counts and scoring position.

use super::ConditionScope;
use crate::lua::{indent, lua_string};
use crate::options::ObjectKind;
use jokerforge_core::{Enhancement, Edition, Params, Rank, RankGroup, Seal, Suit, Trigger};

/// Loop variable used by generated scans.
const SCANNED: &str = "playing_card";

#[derive(Debug, Clone, PartialEq)]
enum RankFilter {
    Any,
    Rank(Rank),
    Group(RankGroup),
    Variable(String),
}

impl RankFilter {
    fn read(params: &Params) -> Self {
        if params.str_or("rank_type", "specific") == "variable" {
            return params
                .str("rank_variable")
                .map(Self::Variable)
                .unwrap_or(Self::Any);
        }
        let raw = params
            .str("specific_rank")
            .or_else(|| params.str("rank_group"))
            .or_else(|| params.str("rank"));
        match raw {
            Some(text) => RankGroup::from_keyword(&text)
                .map(Self::Group)
                .or_else(|| text.parse::<Rank>().ok().map(Self::Rank))
                .unwrap_or(Self::Any),
            None => Self::Any,
        }
    }

    fn check(&self, scope: &ConditionScope<'_, '_>, card: &str) -> Option<String> {
        match self {
            Self::Any => None,
            Self::Rank(rank) => Some(format!("{}:get_id() == {}", card, rank.id())),
            Self::Group(RankGroup::Face) => Some(format!("{}:is_face()", card)),
            Self::Group(RankGroup::Even) => Some(format!(
                "{c}:get_id() <= 10 and {c}:get_id() >= 0 and {c}:get_id() % 2 == 0",
                c = card
            )),
            Self::Group(RankGroup::Odd) => Some(format!(
                "({c}:get_id() <= 10 and {c}:get_id() >= 0 and {c}:get_id() % 2 == 1) or {c}:get_id() == 14",
                c = card
            )),
            Self::Variable(name) => Some(format!("{}.base.value == {}", card, scope.extra(name))),
        }
    }

    fn variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SuitFilter {
    Any,
    Suit(Suit),
    Red,
    Black,
    Variable(String),
}

impl SuitFilter {
    fn read(params: &Params) -> Self {
        if params.str_or("suit_type", "specific") == "variable" {
            return params
                .str("suit_variable")
                .map(Self::Variable)
                .unwrap_or(Self::Any);
        }
        let raw = params
            .str("specific_suit")
            .or_else(|| params.str("suit_group"))
            .or_else(|| params.str("suit"));
        match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("red") => Self::Red,
            Some("black") => Self::Black,
            Some(text) => text.parse::<Suit>().map(Self::Suit).unwrap_or(Self::Any),
            None => Self::Any,
        }
    }

    fn check(&self, scope: &ConditionScope<'_, '_>, card: &str) -> Option<String> {
        let pair = |a: Suit, b: Suit| {
            format!(
                "{c}:is_suit({}) or {c}:is_suit({})",
                lua_string(a.name()),
                lua_string(b.name()),
                c = card
            )
        };
        match self {
            Self::Any => None,
            Self::Suit(suit) => Some(format!("{}:is_suit({})", card, lua_string(suit.name()))),
            Self::Red => Some(pair(Suit::Hearts, Suit::Diamonds)),
            Self::Black => Some(pair(Suit::Spades, Suit::Clubs)),
            Self::Variable(name) => Some(format!("{}:is_suit({})", card, scope.extra(name))),
        }
    }

    fn variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }
}

/// Cards a check runs against: the triggering card itself, or every card
/// of an area.
enum Cards {
    One(&'static str),
    Each(&'static str),
}

fn cards(scope: &ConditionScope<'_, '_>) -> Cards {
    if scope.trigger.is_per_card() || scope.session.object == ObjectKind::Enhancement {
        Cards::One(scope.subject())
    } else {
        Cards::Each(area(scope))
    }
}

/// Card area the trigger's context offers.
fn area(scope: &ConditionScope<'_, '_>) -> &'static str {
    let source = scope.params().str_or("source", "scoring");
    match scope.trigger {
        Trigger::HandDiscarded | Trigger::CardDiscarded => "context.full_hand",
        trigger if trigger.is_scoring() => match source.as_str() {
            "played" | "full_hand" | "all_played" => "context.full_hand",
            "held" | "in_hand" => "G.hand.cards",
            _ => "context.scoring_hand",
        },
        Trigger::ConsumableUsed => "G.hand.highlighted",
        _ if scope.session.object == ObjectKind::Consumable => "G.hand.highlighted",
        _ => "G.hand.cards",
    }
}

fn require_variable(scope: &mut ConditionScope<'_, '_>, name: Option<&str>) {
    if let Some(name) = name {
        if scope.session.find_user_var(name).is_none() {
            scope.warn(format!("condition reads undeclared variable `{}`", name));
        }
    }
}

/// Runs `check` on the subject card, or scans the area for a match
/// (`quantifier = "all"` requires every card to match).
fn over_cards(scope: &ConditionScope<'_, '_>, check: impl Fn(&str) -> Option<String>) -> String {
    match cards(scope) {
        Cards::One(card) => check(card).unwrap_or_else(|| "true".to_string()),
        Cards::Each(area) => match check(SCANNED) {
            Some(test) => scan(area, &test, &scope.params().str_or("quantifier", "any")),
            None => format!("#({} or {{}}) > 0", area),
        },
    }
}

fn scan(area: &str, test: &str, quantifier: &str) -> String {
    let (body, fallthrough) = if quantifier == "all" {
        (format!("if not ({}) then\n    return false\nend", test), "true")
    } else {
        (format!("if {} then\n    return true\nend", test), "false")
    };
    format!(
        "(function()\n    for _, {card} in ipairs({area} or {{}}) do\n{body}\n    end\n    return {fallthrough}\nend)()",
        card = SCANNED,
        area = area,
        body = indent(&body, 2),
        fallthrough = fallthrough
    )
}

fn count(area: &str, test: &str, comparison: &str) -> String {
    format!(
        "(function()\n    local count = 0\n    for _, {card} in ipairs({area} or {{}}) do\n        if {test} then\n            count = count + 1\n        end\n    end\n    return count {comparison}\nend)()",
        card = SCANNED,
        area = area,
        test = test,
        comparison = comparison
    )
}

pub(super) fn card_rank(scope: &mut ConditionScope<'_, '_>) -> String {
    let filter = RankFilter::read(scope.params());
    require_variable(scope, filter.variable());
    over_cards(scope, |card| filter.check(scope, card))
}

pub(super) fn card_suit(scope: &mut ConditionScope<'_, '_>) -> String {
    let filter = SuitFilter::read(scope.params());
    require_variable(scope, filter.variable());
    over_cards(scope, |card| filter.check(scope, card))
}

pub(super) fn card_enhancement(scope: &mut ConditionScope<'_, '_>) -> String {
    let wanted = scope.params().str_or("enhancement", "any");
    let key = match wanted.as_str() {
        "any" | "none" => None,
        other => Some(match other.parse::<Enhancement>() {
            Ok(enhancement) => enhancement.key().to_string(),
            Err(_) if other.starts_with("m_") => other.to_string(),
            Err(_) => format!("m_{}_{}", scope.mod_prefix(), other),
        }),
    };
    over_cards(scope, |card| {
        Some(match (wanted.as_str(), &key) {
            ("none", _) => format!("not next(SMODS.get_enhancements({}))", card),
            (_, Some(key)) => format!("SMODS.has_enhancement({}, {})", card, lua_string(key)),
            _ => format!("next(SMODS.get_enhancements({}))", card),
        })
    })
}

pub(super) fn card_seal(scope: &mut ConditionScope<'_, '_>) -> String {
    let wanted = scope.params().str_or("seal", "any");
    over_cards(scope, |card| {
        Some(match wanted.as_str() {
            "none" => format!("{}.seal == nil", card),
            other => match other.parse::<Seal>() {
                Ok(seal) => format!("{}.seal == {}", card, lua_string(seal.key())),
                Err(_) => format!("{}.seal ~= nil", card),
            },
        })
    })
}

pub(super) fn card_edition(scope: &mut ConditionScope<'_, '_>) -> String {
    let wanted = scope.params().str_or("edition", "any");
    over_cards(scope, |card| {
        Some(match wanted.as_str() {
            "none" => format!("{}.edition == nil", card),
            other => match other.parse::<Edition>() {
                Ok(edition) => format!(
                    "{c}.edition and {c}.edition.key == {}",
                    lua_string(edition.key()),
                    c = card
                ),
                Err(_) => format!("{}.edition ~= nil", card),
            },
        })
    })
}

pub(super) fn card_count(scope: &mut ConditionScope<'_, '_>) -> String {
    let area = area(scope);
    scope.compare(&format!("#({} or {{}})", area), 1.0)
}

pub(super) fn suit_count(scope: &mut ConditionScope<'_, '_>) -> String {
    let filter = SuitFilter::read(scope.params());
    require_variable(scope, filter.variable());
    counted(scope, filter.check(scope, SCANNED))
}

pub(super) fn rank_count(scope: &mut ConditionScope<'_, '_>) -> String {
    let filter = RankFilter::read(scope.params());
    require_variable(scope, filter.variable());
    counted(scope, filter.check(scope, SCANNED))
}

fn counted(scope: &ConditionScope<'_, '_>, test: Option<String>) -> String {
    let area = area(scope);
    match test {
        Some(test) => {
            let comparison = format!("{} {}", scope.operator(), scope.number("value", 1.0));
            count(area, &test, &comparison)
        }
        None => scope.compare(&format!("#({} or {{}})", area), 1.0),
    }
}

/// First or last scoring card, optionally the first/last one matching a
/// rank and suit filter.
pub(super) fn first_last_scored(scope: &mut ConditionScope<'_, '_>) -> String {
    let last = scope.params().str_or("position", "first") == "last";
    let rank = RankFilter::read(scope.params());
    let suit = SuitFilter::read(scope.params());
    require_variable(scope, rank.variable());
    require_variable(scope, suit.variable());

    let tests: Vec<String> = [rank.check(scope, "scoring_card"), suit.check(scope, "scoring_card")]
        .into_iter()
        .flatten()
        .map(|test| format!("({})", test))
        .collect();
    let filter = if tests.is_empty() {
        "true".to_string()
    } else {
        tests.join(" and ")
    };
    let range = if last {
        "#(context.scoring_hand or {}), 1, -1"
    } else {
        "1, #(context.scoring_hand or {})"
    };

    match cards(scope) {
        Cards::One(subject) => format!(
            "(function()\n    for i = {range} do\n        local scoring_card = context.scoring_hand[i]\n        if {filter} then\n            return scoring_card == {subject}\n        end\n    end\n    return false\nend)()",
            range = range,
            filter = filter,
            subject = subject
        ),
        Cards::Each(_) => {
            let index = if last { "#context.scoring_hand" } else { "1" };
            format!(
                "(function()\n    local scoring_card = context.scoring_hand and context.scoring_hand[{index}]\n    return scoring_card ~= nil and ({filter})\nend)()",
                index = index,
                filter = filter
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::conditions::compile_condition;
    use crate::options::{GenerateOptions, ObjectKind};
    use crate::session::CompileSession;
    use jokerforge_core::{Condition, Params, Rank, Trigger, UserVariable};

    fn compile(kind: &str, params: Params, trigger: Trigger, vars: &[UserVariable]) -> (String, usize) {
        let options = GenerateOptions::default();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", vars);
        let condition = Condition::new("c1", kind, params);
        let text = compile_condition(&mut session, &condition, &trigger);
        (text, session.warnings.len())
    }

    #[test]
    fn scored_card_rank_reads_other_card() {
        let (text, _) = compile(
            "card_rank",
            Params::new().with("specific_rank", "A"),
            Trigger::CardScored,
            &[],
        );
        assert_eq!(text, "context.other_card:get_id() == 14");
    }

    #[test]
    fn face_group_uses_is_face() {
        let (text, _) = compile(
            "card_rank",
            Params::new().with("rank_group", "face"),
            Trigger::CardScored,
            &[],
        );
        assert_eq!(text, "context.other_card:is_face()");
    }

    #[test]
    fn hand_level_rank_check_scans_scoring_hand() {
        let (text, _) = compile(
            "card_rank",
            Params::new().with("specific_rank", "K"),
            Trigger::HandPlayed,
            &[],
        );
        assert!(text.starts_with("(function()"));
        assert!(text.contains("for _, playing_card in ipairs(context.scoring_hand or {}) do"));
        assert!(text.contains("if playing_card:get_id() == 13 then"));
        assert!(text.ends_with("end)()"));
    }

    #[test]
    fn red_suits_pair_hearts_and_diamonds() {
        let (text, _) = compile(
            "card_suit",
            Params::new().with("suit_group", "red"),
            Trigger::CardScored,
            &[],
        );
        assert_eq!(
            text,
            "context.other_card:is_suit(\"Hearts\") or context.other_card:is_suit(\"Diamonds\")"
        );
    }

    #[test]
    fn variable_rank_compares_against_slot() {
        let vars = vec![UserVariable::rank("target", Rank::Ace)];
        let (text, warnings) = compile(
            "card_rank",
            Params::new()
                .with("rank_type", "variable")
                .with("rank_variable", "target"),
            Trigger::CardScored,
            &vars,
        );
        assert_eq!(
            text,
            "context.other_card.base.value == card.ability.extra.target"
        );
        assert_eq!(warnings, 0);
    }

    #[test]
    fn undeclared_suit_variable_warns() {
        let (_, warnings) = compile(
            "card_suit",
            Params::new()
                .with("suit_type", "variable")
                .with("suit_variable", "ghost"),
            Trigger::CardScored,
            &[],
        );
        assert_eq!(warnings, 1);
    }

    #[test]
    fn last_face_card_scan_runs_backwards() {
        let (text, _) = compile(
            "first_last_scored",
            Params::new().with("position", "last").with("rank_group", "face"),
            Trigger::CardScored,
            &[],
        );
        assert!(text.contains("for i = #(context.scoring_hand or {}), 1, -1 do"));
        assert!(text.contains("if (scoring_card:is_face()) then"));
        assert!(text.contains("return scoring_card == context.other_card"));
    }

    #[test]
    fn suit_count_counts_matches() {
        let (text, _) = compile(
            "suit_count",
            Params::new()
                .with("specific_suit", "Spades")
                .with("operator", "greater_equals")
                .with("value", 3),
            Trigger::HandPlayed,
            &[],
        );
        assert!(text.contains("if playing_card:is_suit(\"Spades\") then"));
        assert!(text.contains("return count >= 3"));
    }

    #[test]
    fn edition_check_guards_nil_edition() {
        let (text, _) = compile(
            "card_edition",
            Params::new().with("edition", "foil"),
            Trigger::CardScored,
            &[],
        );
        assert_eq!(
            text,
            "context.other_card.edition and context.other_card.edition.key == \"e_foil\""
        );
    }
}
