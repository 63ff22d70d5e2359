//! Playing card creation and modification.

use super::{Colour, EffectOutput, EffectScope};
use crate::lua::lua_string;
use jokerforge_core::{Edition, Enhancement, Params, Rank, Seal, Suit};
use std::str::FromStr;

/// One axis of a card description: left alone, removed, rolled, or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick<T> {
    None,
    Remove,
    Random,
    Specific(T),
}

impl<T: FromStr> Pick<T> {
    fn read(params: &Params, key: &str, default: Pick<T>) -> Self {
        let Some(raw) = params.str(key) else {
            return default;
        };
        match raw.to_ascii_lowercase().as_str() {
            "none" | "keep" | "any" => Pick::None,
            "remove" => Pick::Remove,
            "random" => Pick::Random,
            _ => raw.parse().map(Pick::Specific).unwrap_or(default),
        }
    }
}

/// Suit x rank x enhancement x seal x edition of a card to create or edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSpec {
    pub suit: Pick<Suit>,
    pub rank: Pick<Rank>,
    pub enhancement: Pick<Enhancement>,
    pub seal: Pick<Seal>,
    pub edition: Pick<Edition>,
}

impl CardSpec {
    /// Description of a new card; unspecified suit and rank are rolled.
    pub fn for_creation(params: &Params) -> Self {
        Self {
            suit: Pick::read(params, "suit", Pick::Random),
            rank: Pick::read(params, "rank", Pick::Random),
            enhancement: Pick::read(params, "enhancement", Pick::None),
            seal: Pick::read(params, "seal", Pick::None),
            edition: Pick::read(params, "edition", Pick::None),
        }
    }

    /// Changes applied to an existing card; unspecified axes are kept.
    pub fn for_edit(params: &Params) -> Self {
        Self {
            suit: Pick::read(params, "suit", Pick::None),
            rank: Pick::read(params, "rank", Pick::None),
            enhancement: Pick::read(params, "enhancement", Pick::None),
            seal: Pick::read(params, "seal", Pick::None),
            edition: Pick::read(params, "edition", Pick::None),
        }
    }

    /// `G.P_CARDS` entry for a new card.
    pub fn front_expr(&self, seed: &str) -> String {
        match (self.suit, self.rank) {
            (Pick::Specific(suit), Pick::Specific(rank)) => front(suit, rank),
            (Pick::Specific(suit), _) => {
                let options: Vec<String> = Rank::ALL.iter().map(|rank| front(suit, *rank)).collect();
                format!(
                    "pseudorandom_element({{{}}}, pseudoseed('{}'))",
                    options.join(", "),
                    seed
                )
            }
            (_, Pick::Specific(rank)) => {
                let options: Vec<String> = Suit::ALL.iter().map(|suit| front(*suit, rank)).collect();
                format!(
                    "pseudorandom_element({{{}}}, pseudoseed('{}'))",
                    options.join(", "),
                    seed
                )
            }
            _ => format!("pseudorandom_element(G.P_CARDS, pseudoseed('{}'))", seed),
        }
    }

    /// `G.P_CENTERS` entry for a new card.
    pub fn center_expr(&self, seed: &str) -> String {
        match self.enhancement {
            Pick::Specific(enhancement) => format!("G.P_CENTERS.{}", enhancement.key()),
            Pick::Random => random_enhancement(seed),
            Pick::None | Pick::Remove => "G.P_CENTERS.c_base".to_string(),
        }
    }

    /// Seal and edition calls on `target`.
    pub fn finish_lines(&self, target: &str, seed: &str) -> Vec<String> {
        let mut lines = Vec::new();
        match self.seal {
            Pick::Specific(seal) => lines.push(format!("{}:set_seal({}, true)", target, lua_string(seal.key()))),
            Pick::Random => lines.push(format!(
                "{}:set_seal(SMODS.poll_seal({{guaranteed = true, key = '{}_seal'}}), true)",
                target, seed
            )),
            Pick::Remove => lines.push(format!("{}:set_seal(nil)", target)),
            Pick::None => {}
        }
        match self.edition {
            Pick::Specific(edition) => lines.push(format!(
                "{}:set_edition({}, true)",
                target,
                lua_string(edition.key())
            )),
            Pick::Random => lines.push(format!(
                "{}:set_edition(poll_edition('{}_edition', nil, true, true), true)",
                target, seed
            )),
            Pick::Remove => lines.push(format!("{}:set_edition(nil)", target)),
            Pick::None => {}
        }
        lines
    }

    /// In-place changes for an existing card, base changes first.
    pub fn edit_lines(&self, target: &str, seed: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let suit = match self.suit {
            Pick::Specific(suit) => Some(lua_string(suit.name())),
            Pick::Random => Some(format!(
                "pseudorandom_element(SMODS.Suits, pseudoseed('{}_suit')).key",
                seed
            )),
            _ => None,
        };
        let rank = match self.rank {
            Pick::Specific(rank) => Some(lua_string(rank.base_value())),
            Pick::Random => Some(format!(
                "pseudorandom_element(SMODS.Ranks, pseudoseed('{}_rank')).key",
                seed
            )),
            _ => None,
        };
        if suit.is_some() || rank.is_some() {
            lines.push(format!(
                "assert(SMODS.change_base({}, {}, {}))",
                target,
                suit.unwrap_or_else(|| "nil".to_string()),
                rank.unwrap_or_else(|| "nil".to_string())
            ));
        }
        match self.enhancement {
            Pick::Specific(enhancement) => lines.push(format!(
                "{}:set_ability(G.P_CENTERS.{}, nil, true)",
                target,
                enhancement.key()
            )),
            Pick::Random => lines.push(format!(
                "{}:set_ability({}, nil, true)",
                target,
                random_enhancement(&format!("{}_enhancement", seed))
            )),
            Pick::Remove => lines.push(format!("{}:set_ability(G.P_CENTERS.c_base, nil, true)", target)),
            Pick::None => {}
        }
        lines.extend(self.finish_lines(target, seed));
        lines
    }

    pub fn changes_anything(&self) -> bool {
        !(self.suit == Pick::None
            && self.rank == Pick::None
            && self.enhancement == Pick::None
            && self.seal == Pick::None
            && self.edition == Pick::None)
    }
}

fn front(suit: Suit, rank: Rank) -> String {
    format!("G.P_CARDS.{}_{}", suit.code(), rank.code())
}

fn random_enhancement(seed: &str) -> String {
    let options: Vec<String> = Enhancement::ALL
        .iter()
        .map(|enhancement| format!("G.P_CENTERS.{}", enhancement.key()))
        .collect();
    format!(
        "pseudorandom_element({{{}}}, pseudoseed('{}'))",
        options.join(", "),
        seed
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Destination {
    Deck,
    Hand,
}

impl Destination {
    fn from_params(params: &Params) -> Self {
        match params.str_or("add_to", "deck").as_str() {
            "hand" => Self::Hand,
            _ => Self::Deck,
        }
    }

    fn area(self) -> &'static str {
        match self {
            Self::Deck => "G.deck",
            Self::Hand => "G.hand",
        }
    }
}

pub(super) fn add_card(scope: &mut EffectScope<'_, '_>, destination: Destination) -> EffectOutput {
    let spec = CardSpec::for_creation(scope.params());
    let seed = scope.seed("add_card");
    let mut lines = vec![
        format!("local card_front = {}", spec.front_expr(&seed)),
        "local new_card = create_playing_card({".to_string(),
        "    front = card_front,".to_string(),
        format!("    center = {}", spec.center_expr(&format!("{}_enhancement", seed))),
        format!(
            "}}, {}, nil, nil, {{G.C.SECONDARY_SET.Enhanced}})",
            destination.area()
        ),
    ];
    lines.extend(spec.finish_lines("new_card", &seed));
    lines.push("SMODS.calculate_context({ playing_card_added = true, cards = { new_card } })".to_string());
    let message = match destination {
        Destination::Deck => "\"Added Card!\"",
        Destination::Hand => "\"Added Card to Hand!\"",
    };
    EffectOutput::func(&lines.join("\n"))
        .message(message)
        .colour(Colour::Green)
}

fn copy_lines(source: &str, destination: Destination, spec: &CardSpec, seed: &str) -> Vec<String> {
    let mut lines = vec![
        "G.playing_card = (G.playing_card and G.playing_card + 1) or 1".to_string(),
        format!("local copied_card = copy_card({}, nil, nil, G.playing_card)", source),
        "copied_card:add_to_deck()".to_string(),
        "G.deck.config.card_limit = G.deck.config.card_limit + 1".to_string(),
        "table.insert(G.playing_cards, copied_card)".to_string(),
        format!("{}:emplace(copied_card)", destination.area()),
    ];
    lines.extend(spec.edit_lines("copied_card", seed));
    lines.push("copied_card:start_materialize()".to_string());
    lines.push("SMODS.calculate_context({ playing_card_added = true, cards = { copied_card } })".to_string());
    lines
}

pub(super) fn copy_triggered_card(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let destination = Destination::from_params(scope.params());
    let spec = CardSpec::for_edit(scope.params());
    let seed = scope.seed("copy_card");
    let lines = copy_lines(scope.subject(), destination, &spec, &seed);
    EffectOutput::func(&lines.join("\n"))
        .message("\"Copied Card!\"")
        .colour(Colour::Green)
}

/// Copies a card of the played hand picked by position or at random.
pub(super) fn copy_played_card(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let destination = Destination::from_params(scope.params());
    let spec = CardSpec::for_edit(scope.params());
    let seed = scope.seed("copy_played");
    let source = match scope.params().str_or("card_index", "any").as_str() {
        "any" | "random" => format!(
            "pseudorandom_element(context.scoring_hand or {{}}, pseudoseed('{}'))",
            seed
        ),
        "first" => "(context.scoring_hand or {})[1]".to_string(),
        "last" => "(context.scoring_hand or {})[#(context.scoring_hand or {})]".to_string(),
        index => match index.parse::<u32>() {
            Ok(position) => format!("(context.scoring_hand or {{}})[{}]", position),
            Err(_) => "(context.scoring_hand or {})[1]".to_string(),
        },
    };
    let mut lines = vec![format!("local source_card = {}", source), "if source_card then".to_string()];
    for line in copy_lines("source_card", destination, &spec, &seed) {
        lines.push(format!("    {}", line));
    }
    lines.push("end".to_string());
    EffectOutput::func(&lines.join("\n"))
        .message("\"Copied Card!\"")
        .colour(Colour::Green)
}

pub(super) fn edit_card(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let spec = CardSpec::for_edit(scope.params());
    if !spec.changes_anything() {
        return EffectOutput::message_only("\"Card Modified!\"", Colour::Blue);
    }
    let seed = scope.seed("edit_card");
    let mut lines = vec![format!("local edited_card = {}", scope.subject())];
    lines.extend(spec.edit_lines("edited_card", &seed));
    EffectOutput::func(&lines.join("\n"))
        .message("\"Card Modified!\"")
        .colour(Colour::Blue)
}

pub(super) fn increment_rank(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let decrement = scope.params().str_or("operation", "increment") == "decrement";
    let value = scope.value("value", "rank_change", 1.0);
    let (delta, message) = if decrement {
        (format!("-({})", value.expr), "\"Rank Down!\"")
    } else {
        (value.expr.clone(), "\"Rank Up!\"")
    };
    EffectOutput::func(&format!("assert(SMODS.modify_rank({}, {}))", scope.subject(), delta))
        .message(message)
        .colour(Colour::Orange)
        .uses(&value)
}

const PERMA_FIELDS: [&str; 9] = [
    "perma_bonus",
    "perma_mult",
    "perma_x_mult",
    "perma_x_chips",
    "perma_h_chips",
    "perma_h_mult",
    "perma_h_x_mult",
    "perma_p_dollars",
    "perma_h_dollars",
];

/// Adds to one of the card's `perma_*` fields so the bonus survives rounds.
pub(super) fn permanent_bonus(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let requested = scope.params().str_or("bonus_type", "perma_bonus");
    let field = PERMA_FIELDS
        .iter()
        .copied()
        .find(|field| *field == requested)
        .unwrap_or("perma_bonus");
    let value = scope.value("value", field, 1.0);
    let subject = scope.subject();
    let colour = if field.contains("mult") {
        Colour::Mult
    } else if field.contains("dollars") {
        Colour::Money
    } else {
        Colour::Chips
    };
    EffectOutput::func(&format!(
        "{subject}.ability.{field} = ({subject}.ability.{field} or 0) + {value}",
        subject = subject,
        field = field,
        value = value.expr
    ))
    .message("localize('k_upgrade_ex')")
    .colour(colour)
    .uses(&value)
}

pub(super) fn destroy_self(_scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    EffectOutput::func(
        "card.getting_sliced = true\nG.E_MANAGER:add_event(Event({\n    func = function()\n        card:start_dissolve({G.C.RED}, nil, 1.6)\n        return true\n    end\n}))",
    )
    .message("\"Destroyed!\"")
    .colour(Colour::Red)
}

pub(super) fn draw_cards(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let value = scope.value("value", "card_draw", 1.0);
    EffectOutput::func(&format!(
        "if G.hand and G.deck and #G.deck.cards > 0 then\n    SMODS.draw_cards({})\nend",
        value.expr
    ))
    .message(format!("\"+\"..tostring({})..\" Cards Drawn\"", value.expr))
    .colour(Colour::Blue)
    .uses(&value)
}
