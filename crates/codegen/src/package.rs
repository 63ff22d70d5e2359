//! Whole-mod generation: every item file plus `main.lua`, hooks and the
//! manifest, as a `path -> text` map.

use crate::check::check_files;
use crate::error::{CodegenError, Result};
use crate::hooks::{render_hooks, HookRequest};
use crate::items::{
    generate_booster, generate_consumable, generate_consumable_set, generate_enhancement,
    generate_joker, item_path, AtlasCursor, GeneratedItem,
};
use crate::lua::{lua_string, LuaWriter};
use crate::options::{GenerateOptions, ObjectKind};
use jokerforge_core::{ModProject, RuleOwner};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Files of a generated mod and the warnings raised while compiling it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedMod {
    pub files: BTreeMap<String, String>,
    /// `<full key>: <message>`, in item order.
    pub warnings: Vec<String>,
}

/// Rejects two items of one kind resolving to the same key.
fn unique_keys(object: ObjectKind, keys: impl IntoIterator<Item = String>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            return Err(CodegenError::DuplicateKey(format!(
                "{}/{}",
                object.folder(),
                key
            )));
        }
    }
    Ok(())
}

fn atlas(key: &str) -> String {
    format!(
        "SMODS.Atlas({{\n    key = {},\n    path = {},\n    px = 71,\n    py = 95,\n    atlas_table = \"ASSET_ATLAS\"\n}}):register()",
        lua_string(key),
        lua_string(&format!("{}.png", key))
    )
}

fn render_main(options: &GenerateOptions, project: &ModProject, load_order: &[String]) -> String {
    let mut w = LuaWriter::new();
    let used = [
        (ObjectKind::Joker, !project.jokers.is_empty()),
        (ObjectKind::Consumable, !project.consumables.is_empty()),
        (ObjectKind::Booster, !project.boosters.is_empty()),
        (ObjectKind::Enhancement, !project.enhancements.is_empty()),
    ];
    for (object, present) in used {
        if present {
            w.line(&atlas(options.atlas_for(object)));
            w.line("");
        }
    }
    for set in &project.consumable_sets {
        w.line(&generate_consumable_set(set));
        w.line("");
    }
    for path in load_order {
        w.line(&format!("assert(SMODS.load_file({}))()", lua_string(path)));
    }
    w.finish()
}

/// Compiles a whole project. Item order is kept in `main.lua`.
pub fn build_mod(project: &ModProject, options: &GenerateOptions) -> Result<GeneratedMod> {
    unique_keys(ObjectKind::Joker, project.jokers.iter().map(|j| j.key()))?;
    unique_keys(ObjectKind::Consumable, project.consumables.iter().map(|c| c.key()))?;
    unique_keys(ObjectKind::Booster, project.boosters.iter().map(|b| b.key()))?;
    unique_keys(ObjectKind::Enhancement, project.enhancements.iter().map(|e| e.key()))?;

    let mut generated = GeneratedMod::default();
    let mut load_order = Vec::new();
    let mut hooks: Vec<HookRequest> = Vec::new();
    let mut place = |generated: &mut GeneratedMod, object: ObjectKind, item: GeneratedItem| {
        let path = item_path(object.folder(), &item.key);
        for warning in &item.warnings {
            generated.warnings.push(format!("{}: {}", item.full_key, warning));
        }
        hooks.extend(item.hooks);
        generated.files.insert(path.clone(), item.code);
        load_order.push(path);
    };

    let mut cursor = AtlasCursor::new(options.atlas_columns);
    for joker in &project.jokers {
        place(&mut generated, ObjectKind::Joker, generate_joker(joker, options, &mut cursor));
    }
    let mut cursor = AtlasCursor::new(options.atlas_columns);
    for consumable in &project.consumables {
        place(
            &mut generated,
            ObjectKind::Consumable,
            generate_consumable(consumable, options, &mut cursor),
        );
    }
    let mut cursor = AtlasCursor::new(options.atlas_columns);
    for enhancement in &project.enhancements {
        place(
            &mut generated,
            ObjectKind::Enhancement,
            generate_enhancement(enhancement, options, &mut cursor),
        );
    }
    let mut cursor = AtlasCursor::new(options.atlas_columns);
    for booster in &project.boosters {
        let path = item_path(ObjectKind::Booster.folder(), &booster.key());
        generated
            .files
            .insert(path.clone(), generate_booster(booster, options, &mut cursor));
        load_order.push(path);
    }

    if let Some(text) = render_hooks(&hooks) {
        generated.files.insert("hooks.lua".to_string(), text);
        load_order.push("hooks.lua".to_string());
    }
    generated.files.insert(
        project.metadata.main_file.clone(),
        render_main(options, project, &load_order),
    );

    let mut manifest = project.metadata.clone();
    if !options.mod_id.is_empty() {
        manifest.id = options.mod_id.clone();
    }
    if !options.mod_name.is_empty() {
        manifest.name = options.mod_name.clone();
    }
    manifest.prefix = options.mod_prefix.clone();
    let manifest_name = format!("{}.json", manifest.id);
    generated
        .files
        .insert(manifest_name, serde_json::to_string_pretty(&manifest)?);

    if options.check_syntax {
        check_files(&generated.files)?;
        debug!(files = generated.files.len(), "syntax check passed");
    }
    info!(
        files = generated.files.len(),
        warnings = generated.warnings.len(),
        "generated mod {}",
        manifest.id
    );
    Ok(generated)
}

/// `path -> text` for every file of the mod.
pub fn generate_mod(project: &ModProject, options: &GenerateOptions) -> Result<BTreeMap<String, String>> {
    build_mod(project, options).map(|generated| generated.files)
}
