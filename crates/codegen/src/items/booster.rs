use super::{write_loc_txt, AtlasCursor};
use crate::lua::{lua_comment, lua_number, lua_string, LuaWriter};
use crate::options::{GenerateOptions, ObjectKind};
use jokerforge_core::BoosterItem;

/// Table `create_card` returns for the pack's pool.
fn card_source(booster: &BoosterItem, key: &str) -> Vec<String> {
    if !booster.specific_cards.is_empty() {
        let cards: Vec<String> = booster.specific_cards.iter().map(|c| lua_string(c)).collect();
        return vec![
            format!("local selected = pseudorandom_element({{ {} }}, pseudoseed({}))", cards.join(", "), lua_string(key)),
            format!(
                "return {{ key = selected, area = G.pack_cards, skip_materialize = true, soulable = true, key_append = {} }}",
                lua_string(key)
            ),
        ];
    }
    let set = match booster.card_set.as_str() {
        "Playing Card" | "playing_cards" => {
            "(pseudorandom(pseudoseed('stdset' .. G.GAME.round_resets.ante)) > 0.6) and \"Enhanced\" or \"Base\"".to_string()
        }
        other => lua_string(other),
    };
    vec![format!(
        "return {{ set = {}, area = G.pack_cards, skip_materialize = true, soulable = true, key_append = {} }}",
        set,
        lua_string(key)
    )]
}

/// `SMODS.Booster` definition. Boosters carry no rules.
pub fn generate_booster(
    booster: &BoosterItem,
    options: &GenerateOptions,
    cursor: &mut AtlasCursor,
) -> String {
    let key = booster.key();
    let (pos, _) = cursor.place(false);
    let kind = if booster.kind.trim().is_empty() {
        booster.card_set.clone()
    } else {
        booster.kind.clone()
    };

    let mut w = LuaWriter::new();
    w.open(&format!("SMODS.Booster {{ --{}", lua_comment(&booster.name)));
    w.line(&format!("key = {},", lua_string(&key)));
    write_loc_txt(
        &mut w,
        &booster.name,
        &booster.description,
        &[("group_name", lua_string(&format!("{} Pack", kind)))],
    );
    w.line(&format!(
        "config = {{ extra = {}, choose = {} }},",
        booster.extra, booster.choose
    ));
    w.line(&format!("cost = {},", booster.cost));
    w.line(&format!("weight = {},", lua_number(booster.weight)));
    w.line(&format!("kind = {},", lua_string(&kind)));
    w.line(&format!("atlas = {},", lua_string(options.atlas_for(ObjectKind::Booster))));
    w.line(&pos.render("pos"));
    w.line(&format!("discovered = {},", booster.discovered));
    if booster.hidden {
        w.line("hidden = true,");
    }
    if booster.draw_hand {
        w.line("draw_hand = true,");
    }
    w.line("");
    w.open("loc_vars = function(self, info_queue, card)");
    w.line("local cfg = (card and card.ability) or self.config");
    w.line("return { vars = { cfg.choose, cfg.extra } }");
    w.close("end,");
    w.open("create_card = function(self, card, i)");
    for line in card_source(booster, &key) {
        w.line(&line);
    }
    w.close("end,");
    if let Some(background) = &booster.background_colour {
        let special = booster.special_colour.as_deref().unwrap_or(background);
        w.open("ease_background_colour = function(self)");
        w.line(&format!("ease_colour(G.C.DYN_UI.MAIN, HEX({}))", lua_string(background)));
        w.line(&format!(
            "ease_background_colour({{ new_colour = HEX({}), special_colour = HEX({}), contrast = 2 }})",
            lua_string(background),
            lua_string(special)
        ));
        w.close("end,");
    }
    w.close("}");
    w.finish()
}
