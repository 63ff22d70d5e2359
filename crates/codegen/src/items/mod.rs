//! Complete object definitions, one per item.

mod booster;
mod consumable;
mod enhancement;
mod joker;

pub use booster::generate_booster;
pub use consumable::{generate_consumable, generate_consumable_set};
pub use enhancement::generate_enhancement;
pub use joker::generate_joker;

use crate::assembler::assemble_calculate;
use crate::hooks::HookRequest;
use crate::lua::{lua_string, LuaWriter};
use crate::session::{CompileSession, PassiveParts};
use jokerforge_core::Rule;
use tracing::debug;

/// Generated source of one item plus what it asked of the mod.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedItem {
    pub key: String,
    pub full_key: String,
    pub code: String,
    pub hooks: Vec<HookRequest>,
    pub warnings: Vec<String>,
}

impl GeneratedItem {
    fn finish(session: CompileSession<'_>, code: String) -> Self {
        debug!(
            item = %session.full_key,
            slots = session.config.len(),
            warnings = session.warnings.len(),
            "generated item"
        );
        Self {
            key: session.key,
            full_key: session.full_key,
            code,
            hooks: session.hooks,
            warnings: session.warnings,
        }
    }
}

/// Cell of an atlas sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasPos {
    pub x: u32,
    pub y: u32,
}

impl AtlasPos {
    fn render(self, field: &str) -> String {
        format!("{} = {{ x = {}, y = {} }},", field, self.x, self.y)
    }
}

/// Running placement counter of one atlas. An item takes one cell, two
/// when it has an overlay image (rendered as `soul_pos`).
#[derive(Debug, Clone)]
pub struct AtlasCursor {
    next: u32,
    columns: u32,
}

impl AtlasCursor {
    pub fn new(columns: u32) -> Self {
        Self {
            next: 0,
            columns: columns.max(1),
        }
    }

    fn cell(&mut self) -> AtlasPos {
        let index = self.next;
        self.next += 1;
        AtlasPos {
            x: index % self.columns,
            y: index / self.columns,
        }
    }

    pub fn place(&mut self, overlay: bool) -> (AtlasPos, Option<AtlasPos>) {
        let pos = self.cell();
        let soul = overlay.then(|| self.cell());
        (pos, soul)
    }
}

/// Description split into the lines `loc_txt.text` expects.
pub(crate) fn description_lines(description: &str) -> Vec<String> {
    let lines: Vec<String> = description
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// `loc_txt = { ... },` with name and text, plus any extra entries.
pub(crate) fn write_loc_txt(w: &mut LuaWriter, name: &str, description: &str, extra: &[(&str, String)]) {
    w.open("loc_txt = {");
    w.line(&format!("['name'] = {},", lua_string(name)));
    w.open("['text'] = {");
    let lines = description_lines(description);
    let last = lines.len() - 1;
    for (index, line) in lines.iter().enumerate() {
        let sep = if index == last { "" } else { "," };
        w.line(&format!("[{}] = {}{}", index + 1, lua_string(line), sep));
    }
    if extra.is_empty() {
        w.close("}");
    } else {
        w.close("},");
        let last = extra.len() - 1;
        for (index, (key, value)) in extra.iter().enumerate() {
            let sep = if index == last { "" } else { "," };
            w.line(&format!("['{}'] = {}{}", key, value, sep));
        }
    }
    w.close("},");
}

/// `calculate = function ... end,` holding the passive preludes and the
/// assembled rules, or nothing when both are empty.
pub(crate) fn write_calculate(w: &mut LuaWriter, passive: &PassiveParts, body: &str) {
    if passive.calculate.is_empty() && body.trim().is_empty() {
        return;
    }
    w.line("");
    w.open("calculate = function(self, card, context)");
    for block in &passive.calculate {
        w.line(block);
    }
    if !body.trim().is_empty() {
        w.line(body);
    }
    w.close("end,");
}

/// Compiles every non-passive rule into a `calculate` body.
pub(crate) fn calculate_body(session: &mut CompileSession<'_>, rules: &[Rule]) -> String {
    let refs: Vec<&Rule> = rules.iter().collect();
    assemble_calculate(session, &refs)
}

/// Key of a file in the generated mod: `<folder>/<key>.lua`.
pub fn item_path(folder: &str, key: &str) -> String {
    format!("{}/{}.lua", folder, key)
}
