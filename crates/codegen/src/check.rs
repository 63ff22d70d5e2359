//! Syntax check of generated Lua. Chunks are compiled, never run.

use crate::error::Result;
use std::collections::BTreeMap;

#[cfg(feature = "lua_check")]
pub fn check_source(name: &str, source: &str) -> Result<()> {
    check_with(&mlua::Lua::new(), name, source)
}

#[cfg(feature = "lua_check")]
fn check_with(lua: &mlua::Lua, name: &str, source: &str) -> Result<()> {
    lua.load(source)
        .set_name(name)
        .into_function()
        .map(|_| ())
        .map_err(|err| crate::error::CodegenError::Syntax {
            file: name.to_string(),
            message: err.to_string(),
        })
}

/// Checks every `.lua` entry of a generated mod.
#[cfg(feature = "lua_check")]
pub fn check_files(files: &BTreeMap<String, String>) -> Result<()> {
    let lua = mlua::Lua::new();
    for (name, source) in files.iter().filter(|(name, _)| name.ends_with(".lua")) {
        check_with(&lua, name, source)?;
    }
    Ok(())
}

#[cfg(not(feature = "lua_check"))]
pub fn check_source(_name: &str, _source: &str) -> Result<()> {
    tracing::warn!("built without lua_check, syntax check skipped");
    Ok(())
}

#[cfg(not(feature = "lua_check"))]
pub fn check_files(_files: &BTreeMap<String, String>) -> Result<()> {
    tracing::warn!("built without lua_check, syntax check skipped");
    Ok(())
}

#[cfg(all(test, feature = "lua_check"))]
mod tests {
    use super::*;
    use crate::error::CodegenError;

    #[test]
    fn valid_chunk_passes() {
        assert_eq!(check_source("ok.lua", "local x = 1\nif x then x = 2 end"), Ok(()));
    }

    #[test]
    fn broken_chunk_names_the_file() {
        match check_source("bad.lua", "if x then") {
            Err(CodegenError::Syntax { file, .. }) => assert_eq!(file, "bad.lua"),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn non_lua_entries_are_ignored() {
        let mut files = BTreeMap::new();
        files.insert("mod.json".to_string(), "{ not lua".to_string());
        files.insert("main.lua".to_string(), "return true".to_string());
        assert_eq!(check_files(&files), Ok(()));
    }
}
