//! Consumable effects over the cards highlighted in hand.

use super::{CardSpec, Colour, EffectOutput, EffectScope};
use crate::lua::{indent, lua_number};

fn selection_predicate(scope: &EffectScope<'_, '_>) -> String {
    let max = scope.params().number_or("max_cards", 1.0).max(1.0);
    format!(
        "G.hand and #G.hand.highlighted >= 1 and #G.hand.highlighted <= {}",
        lua_number(max)
    )
}

pub(super) fn edit_selected_cards(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    let spec = CardSpec::for_edit(scope.params());
    let seed = scope.seed("edit_selected");
    let edits = spec.edit_lines("selected_card", &seed);
    let body = format!(
        "for _, selected_card in ipairs(G.hand.highlighted) do\n{}\nend\nG.E_MANAGER:add_event(Event({{\n    trigger = 'after',\n    delay = 0.2,\n    func = function()\n        G.hand:unhighlight_all()\n        return true\n    end\n}}))",
        indent(&edits.join("\n"), 1)
    );
    EffectOutput::func(&body)
        .message("\"Cards Modified!\"")
        .colour(Colour::Blue)
        .usable(selection_predicate(scope))
}

pub(super) fn destroy_selected_cards(scope: &mut EffectScope<'_, '_>) -> EffectOutput {
    EffectOutput::func(
        "local destroyed_cards = {}\nfor _, selected_card in ipairs(G.hand.highlighted) do\n    destroyed_cards[#destroyed_cards + 1] = selected_card\nend\nSMODS.destroy_cards(destroyed_cards)",
    )
    .message("\"Destroyed!\"")
    .colour(Colour::Red)
    .usable(selection_predicate(scope))
}
