use super::{calculate_body, write_calculate, write_loc_txt, AtlasCursor, GeneratedItem};
use crate::loc_vars::render_loc_vars;
use crate::lua::{lua_comment, lua_number, lua_string, LuaWriter};
use crate::options::{GenerateOptions, ObjectKind};
use crate::session::CompileSession;
use jokerforge_core::{EnhancementItem, RuleOwner, Trigger};

/// `SMODS.Enhancement` definition. Rules run on the enhanced card itself.
pub fn generate_enhancement(
    enhancement: &EnhancementItem,
    options: &GenerateOptions,
    cursor: &mut AtlasCursor,
) -> GeneratedItem {
    let key = enhancement.key();
    let mut session = CompileSession::new(
        options,
        ObjectKind::Enhancement,
        &key,
        enhancement.user_variables(),
    );
    if enhancement
        .rules()
        .iter()
        .any(|rule| rule.trigger == Trigger::Passive)
    {
        session.warn("enhancements have no passive rules, skipped".to_string());
    }
    let body = calculate_body(&mut session, enhancement.rules());
    let loc_vars = render_loc_vars(&mut session, enhancement.description());
    let (pos, _) = cursor.place(false);

    let mut w = LuaWriter::new();
    w.open(&format!("SMODS.Enhancement {{ --{}", lua_comment(&enhancement.name)));
    w.line(&format!("key = {},", lua_string(&key)));
    w.line(&pos.render("pos"));
    if let Some(config) = session.config.render() {
        w.line(&config);
    }
    write_loc_txt(&mut w, &enhancement.name, enhancement.description(), &[]);
    w.line(&format!(
        "atlas = {},",
        lua_string(options.atlas_for(ObjectKind::Enhancement))
    ));
    w.line(&format!("any_suit = {},", enhancement.any_suit));
    w.line(&format!("replace_base_card = {},", enhancement.replace_base_card));
    w.line(&format!("no_rank = {},", enhancement.no_rank));
    w.line(&format!("no_suit = {},", enhancement.no_suit));
    w.line(&format!("always_scores = {},", enhancement.always_scores));
    w.line(&format!("unlocked = {},", enhancement.unlocked));
    w.line(&format!("discovered = {},", enhancement.discovered));
    w.line(&format!("weight = {},", lua_number(enhancement.weight)));
    if let Some(loc_vars) = loc_vars {
        w.line("");
        w.line(&loc_vars);
    }
    write_calculate(&mut w, &session.passive, &body);
    w.close("}");

    GeneratedItem::finish(session, w.finish())
}
