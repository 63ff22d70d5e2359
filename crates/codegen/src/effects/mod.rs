//! Effect kind generators.
//!
//! Every kind is handled by exactly one arm of [`compile_effect`]; adding a
//! variant to `EffectKind` without a generator is a compile error. Types the
//! model does not know compile to an empty output.

mod cards;
mod consumables;
mod game;
mod jokers;
mod probability;
mod scoring;
mod selected;
mod variables;

pub use cards::{CardSpec, Pick};
pub use game::{flag_path, Limit, RoundResource};
pub use jokers::joker_key;
pub use probability::probability_context;

use crate::allocator::ConfigVar;
use crate::lua::{indent, lua_string};
use crate::session::CompileSession;
use crate::values::{resolve_shared, resolve_value, seed_for, ResolvedValue};
use jokerforge_core::{Effect, EffectFamily, EffectKind, Params, Trigger};

/// Colour the runtime shows next to an effect's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colour {
    Chips,
    Mult,
    Money,
    Red,
    Green,
    Blue,
    Purple,
    Orange,
    Filter,
    DarkEdition,
    #[default]
    White,
}

impl Colour {
    pub fn lua(self) -> &'static str {
        match self {
            Self::Chips => "G.C.CHIPS",
            Self::Mult => "G.C.MULT",
            Self::Money => "G.C.MONEY",
            Self::Red => "G.C.RED",
            Self::Green => "G.C.GREEN",
            Self::Blue => "G.C.BLUE",
            Self::Purple => "G.C.PURPLE",
            Self::Orange => "G.C.ORANGE",
            Self::Filter => "G.C.FILTER",
            Self::DarkEdition => "G.C.DARK_EDITION",
            Self::White => "G.C.WHITE",
        }
    }
}

/// Everything one effect contributes to its rule's block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectOutput {
    /// Field of the returned table, possibly a `func = function() ... end`.
    pub statement: String,
    /// Lua expression shown as the popup message.
    pub message: Option<String>,
    pub colour: Colour,
    /// Statements run before the return table is built.
    pub pre_return: Vec<String>,
    pub config: Vec<ConfigVar>,
    pub display: Vec<String>,
    /// Extra requirement a consumable's `can_use` must satisfy.
    pub usable: Option<String>,
}

impl EffectOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn field(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            ..Self::default()
        }
    }

    /// Deferred imperative body wrapped as `func = function() ... return true end`.
    pub fn func(body: &str) -> Self {
        Self::field(format!(
            "func = function()\n{}\n    return true\nend",
            indent(body.trim_end(), 1)
        ))
    }

    /// Output that only shows a message.
    pub fn message_only(message: impl Into<String>, colour: Colour) -> Self {
        Self::default().message(message).colour(colour)
    }

    pub fn message(mut self, expr: impl Into<String>) -> Self {
        self.message = Some(expr.into());
        self
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn pre(mut self, statement: impl Into<String>) -> Self {
        self.pre_return.push(statement.into());
        self
    }

    pub fn usable(mut self, predicate: impl Into<String>) -> Self {
        self.usable = Some(predicate.into());
        self
    }

    /// Carries the slots a resolved value asked for.
    pub fn uses(mut self, value: &ResolvedValue) -> Self {
        self.config.extend(value.config.iter().cloned());
        if let Some(display) = &value.display {
            self.display.push(display.clone());
        }
        self
    }

    pub fn declare(mut self, var: ConfigVar) -> Self {
        self.config.push(var);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.statement.trim().is_empty() && self.message.is_none() && self.pre_return.is_empty()
    }

    /// Whether the output adds anything to the returned table.
    pub fn has_table_entry(&self) -> bool {
        !self.statement.trim().is_empty() || self.message.is_some()
    }
}

/// What an effect generator can see and allocate.
pub struct EffectScope<'s, 'a> {
    pub session: &'s mut CompileSession<'a>,
    pub trigger: &'s Trigger,
    pub effect: &'s Effect,
}

impl<'s, 'a> EffectScope<'s, 'a> {
    pub fn params(&self) -> &'s Params {
        &self.effect.params
    }

    pub fn is_scoring(&self) -> bool {
        self.trigger.is_scoring()
    }

    /// Resolves `params[key]` into an expression, declaring `base` if needed.
    pub fn value(&mut self, key: &str, base: &str, default: f64) -> ResolvedValue {
        let value = self.effect.params.value(key);
        resolve_value(self.session, &self.effect.id, &value, base, default)
    }

    /// Slot shared by every effect of the item under one fixed name.
    pub fn shared_value(&mut self, key: &str, name: &str, default: f64) -> ResolvedValue {
        let value = self.effect.params.value(key);
        resolve_shared(self.session, &self.effect.id, &value, name, default)
    }

    /// Unique local name, so closures never capture a shadowed local.
    pub fn local(&mut self, base: &str) -> String {
        self.session.allocator.reserve(base)
    }

    pub fn seed(&self, base: &str) -> String {
        seed_for(base, &self.effect.id)
    }

    pub fn extra(&self, name: &str) -> String {
        self.session.extra(name)
    }

    /// Playing card the effect acts on for per-card triggers.
    pub fn subject(&self) -> &'static str {
        self.session.object.subject_card()
    }

    pub fn full_key(&self) -> &str {
        &self.session.full_key
    }

    pub fn mod_prefix(&self) -> &str {
        &self.session.options.mod_prefix
    }

    pub fn warn(&mut self, message: String) {
        self.session.warn(message);
    }
}

/// Compiles one effect for a rule with the given trigger.
pub fn compile_effect(
    session: &mut CompileSession<'_>,
    effect: &Effect,
    trigger: &Trigger,
) -> EffectOutput {
    let Some(kind) = effect.kind() else {
        session.warn(format!("unknown effect type `{}`", effect.effect_type));
        return EffectOutput::empty();
    };
    if kind.family() == EffectFamily::Passive && *trigger != Trigger::Passive {
        session.warn(format!(
            "`{}` only works on passive rules, ignored under `{}`",
            kind.keyword(),
            trigger
        ));
        return EffectOutput::empty();
    }
    let mut scope = EffectScope {
        session,
        trigger,
        effect,
    };
    let mut output = dispatch(kind, &mut scope);
    if let Some(message) = effect.message_override() {
        output.message = Some(lua_string(message));
    }
    output
}

fn dispatch(kind: EffectKind, scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    match kind {
        EffectKind::AddChips => scoring::add_chips(scope),
        EffectKind::AddMult => scoring::add_mult(scope),
        EffectKind::ApplyXMult => scoring::apply_x_mult(scope),
        EffectKind::ApplyXChips => scoring::apply_x_chips(scope),
        EffectKind::ApplyExpMult => scoring::apply_exp_mult(scope),
        EffectKind::ApplyExpChips => scoring::apply_exp_chips(scope),
        EffectKind::AddDollars => scoring::add_dollars(scope),
        EffectKind::SetDollars => scoring::set_dollars(scope),
        EffectKind::Balance => scoring::balance(scope),
        EffectKind::SwapChipsMult => scoring::swap_chips_mult(scope),
        EffectKind::ShowMessage => scoring::show_message(scope),
        EffectKind::RetriggerCards => scoring::retrigger_cards(scope),
        EffectKind::DestroyCard => scoring::destroy_card(scope),
        EffectKind::AddCardToDeck => cards::add_card(scope, cards::Destination::Deck),
        EffectKind::AddCardToHand => cards::add_card(scope, cards::Destination::Hand),
        EffectKind::CopyTriggeredCard => cards::copy_triggered_card(scope),
        EffectKind::CopyPlayedCard => cards::copy_played_card(scope),
        EffectKind::EditCard => cards::edit_card(scope),
        EffectKind::IncrementRank => cards::increment_rank(scope),
        EffectKind::PermanentBonus => cards::permanent_bonus(scope),
        EffectKind::DestroySelf => cards::destroy_self(scope),
        EffectKind::DrawCards => cards::draw_cards(scope),
        EffectKind::CreateJoker => jokers::create_joker(scope),
        EffectKind::DestroyJoker => jokers::destroy_joker(scope),
        EffectKind::CopyJoker => jokers::copy_joker(scope),
        EffectKind::SetSellValue => jokers::set_sell_value(scope),
        EffectKind::CreateConsumable => consumables::create_consumable(scope),
        EffectKind::DestroyConsumable => consumables::destroy_consumable(scope),
        EffectKind::CopyConsumable => consumables::copy_consumable(scope),
        EffectKind::LevelUpHand => game::level_up_hand(scope),
        EffectKind::EditHand => game::edit_round_resource(scope, game::RoundResource::Hands),
        EffectKind::EditDiscard => game::edit_round_resource(scope, game::RoundResource::Discards),
        EffectKind::EditHandSize => game::edit_limit(scope, game::Limit::HandSize),
        EffectKind::EditJokerSlots => game::edit_limit(scope, game::Limit::JokerSlots),
        EffectKind::EditConsumableSlots => game::edit_limit(scope, game::Limit::ConsumableSlots),
        EffectKind::DisableBossBlind => game::disable_boss_blind(scope),
        EffectKind::CreateTag => game::create_tag(scope),
        EffectKind::SetFlag => game::set_flag(scope),
        EffectKind::ModifyInternalVariable => variables::modify_internal_variable(scope),
        EffectKind::ChangeSuitVariable => variables::change_suit_variable(scope),
        EffectKind::ChangeRankVariable => variables::change_rank_variable(scope),
        EffectKind::ChangePokerhandVariable => variables::change_pokerhand_variable(scope),
        EffectKind::FixProbability => probability::fix_probability(scope),
        EffectKind::ModProbability => probability::mod_probability(scope),
        EffectKind::EditSelectedCards => selected::edit_selected_cards(scope),
        EffectKind::DestroySelectedCards => selected::destroy_selected_cards(scope),
        // Passive rules are compiled by `passive::compile_passive`.
        EffectKind::CombineRanks
        | EffectKind::CombineSuits
        | EffectKind::AllowDuplicates
        | EffectKind::AllowDebt
        | EffectKind::FreeRerolls
        | EffectKind::DiscountItems
        | EffectKind::CopyJokerAbility
        | EffectKind::AllCardsScore
        | EffectKind::ReduceFlushStraight
        | EffectKind::Shortcut => EffectOutput::empty(),
    }
}

/// Builds the nested SMODS effect table, chaining later outputs through
/// `extra`. `None` when nothing contributes an entry.
pub fn effect_table(outputs: &[EffectOutput]) -> Option<String> {
    let entries: Vec<&EffectOutput> = outputs.iter().filter(|o| o.has_table_entry()).collect();
    if entries.is_empty() {
        return None;
    }
    Some(nest_table(&entries))
}

fn nest_table(entries: &[&EffectOutput]) -> String {
    let (first, rest) = match entries.split_first() {
        Some(split) => split,
        None => return "{}".to_string(),
    };
    let mut fields = Vec::new();
    if !first.statement.trim().is_empty() {
        fields.push(first.statement.clone());
    }
    if let Some(message) = &first.message {
        fields.push(format!("message = {}", message));
        fields.push(format!("colour = {}", first.colour.lua()));
    }
    if !rest.is_empty() {
        fields.push(format!("extra = {}", nest_table(rest)));
    }
    format!("{{\n{}\n}}", indent(&fields.join(",\n"), 1))
}

/// Pre-return statements followed by `return <table>`, or the fallback
/// activation message when every effect compiled to nothing.
pub fn render_return(outputs: &[EffectOutput]) -> String {
    let mut lines: Vec<String> = outputs
        .iter()
        .flat_map(|output| output.pre_return.iter().cloned())
        .collect();
    match effect_table(outputs) {
        Some(table) => lines.push(format!("return {}", table)),
        None => lines.push("return {\n    message = \"Activated!\"\n}".to_string()),
    }
    lines.join("\n")
}

/// Same as [`render_return`] for contexts that apply effects directly
/// (`use`, random groups): `SMODS.calculate_effect(<table>, card)`.
pub fn render_apply(outputs: &[EffectOutput]) -> String {
    let mut lines: Vec<String> = outputs
        .iter()
        .flat_map(|output| output.pre_return.iter().cloned())
        .collect();
    match effect_table(outputs) {
        Some(table) => lines.push(format!("SMODS.calculate_effect({}, card)", table)),
        None => lines.push(
            "SMODS.calculate_effect({ message = \"Activated!\" }, card)".to_string(),
        ),
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GenerateOptions, ObjectKind};
    use jokerforge_core::UserVariable;

    fn compile(kind: EffectKind, trigger: Trigger) -> EffectOutput {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", &vars);
        let effect = Effect::new("effect_1", kind.keyword(), Params::new());
        compile_effect(&mut session, &effect, &trigger)
    }

    #[test]
    fn every_active_kind_produces_output() {
        for kind in EffectKind::ALL {
            if kind.family() == EffectFamily::Passive {
                continue;
            }
            let trigger = match kind.family() {
                EffectFamily::Probability => Trigger::ChangeProbability,
                _ => Trigger::HandPlayed,
            };
            let output = compile(kind, trigger);
            assert!(!output.is_empty(), "{} compiled to nothing", kind.keyword());
        }
    }

    #[test]
    fn unknown_type_is_inert() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", &vars);
        let effect = Effect::new("e", "summon_dragon", Params::new());
        let output = compile_effect(&mut session, &effect, &Trigger::HandPlayed);
        assert!(output.is_empty());
        assert_eq!(output.colour, Colour::White);
        assert_eq!(session.warnings.len(), 1);
    }

    #[test]
    fn passive_kind_outside_passive_rule_is_dropped() {
        assert!(compile(EffectKind::AllowDebt, Trigger::HandPlayed).is_empty());
    }

    #[test]
    fn custom_message_keeps_colour() {
        let options = GenerateOptions::default();
        let vars: Vec<UserVariable> = Vec::new();
        let mut session = CompileSession::new(&options, ObjectKind::Joker, "sample", &vars);
        let effect = Effect::new("e", "add_dollars", Params::new().with("value", 3))
            .with_message("Payday!");
        let output = compile_effect(&mut session, &effect, &Trigger::RoundEnd);
        assert_eq!(output.message.as_deref(), Some("\"Payday!\""));
        assert_eq!(output.colour, Colour::Money);
    }

    #[test]
    fn empty_outputs_fall_back_to_activated() {
        let text = render_return(&[EffectOutput::empty()]);
        assert_eq!(text, "return {\n    message = \"Activated!\"\n}");
    }

    #[test]
    fn later_outputs_chain_through_extra() {
        let outputs = vec![
            EffectOutput::field("chips = 10"),
            EffectOutput::field("mult = 4"),
        ];
        let text = render_return(&outputs);
        assert_eq!(
            text,
            "return {\n    chips = 10,\n    extra = {\n        mult = 4\n    }\n}"
        );
    }
}
