use crate::lua::{lua_number, lua_string, LuaWriter};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Hands out per-item names for config slots and generated locals.
///
/// The first request for a base name gets it verbatim, later requests get
/// `name2`, `name3`, ... Names of user variables are pre-reserved so effect
/// slots never shadow them.
#[derive(Debug, Default, Clone)]
pub struct VariableAllocator {
    counts: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl VariableAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counts: HashMap::new(),
            taken: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reserve(&mut self, base: &str) -> String {
        loop {
            let count = self.counts.entry(base.to_string()).or_insert(0);
            *count += 1;
            let name = if *count == 1 {
                base.to_string()
            } else {
                format!("{}{}", base, count)
            };
            if self.taken.insert(name.clone()) {
                return name;
            }
        }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl ConfigValue {
    pub fn to_lua(&self) -> String {
        match self {
            Self::Number(value) => lua_number(*value),
            Self::Text(value) => lua_string(value),
            Self::Bool(value) => value.to_string(),
        }
    }
}

/// Where a declared slot came from; drives description variable ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    UserNumber,
    UserTyped,
    Effect,
    Probability,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigVar {
    pub name: String,
    pub value: ConfigValue,
    pub origin: ConfigOrigin,
}

impl ConfigVar {
    pub fn number(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: ConfigValue::Number(value),
            origin: ConfigOrigin::Effect,
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: ConfigValue::Text(value.to_string()),
            origin: ConfigOrigin::Effect,
        }
    }

    pub fn with_origin(mut self, origin: ConfigOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Ordered, deduplicated `config.extra` table of one item.
#[derive(Debug, Default, Clone)]
pub struct ConfigBlock {
    vars: IndexMap<String, ConfigVar>,
}

impl ConfigBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// First writer wins: a later slot with an existing name is dropped.
    pub fn insert(&mut self, var: ConfigVar) -> bool {
        if self.vars.contains_key(&var.name) {
            return false;
        }
        self.vars.insert(var.name.clone(), var);
        true
    }

    pub fn extend(&mut self, vars: impl IntoIterator<Item = ConfigVar>) {
        for var in vars {
            self.insert(var);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigVar> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigVar> {
        self.vars.values()
    }

    pub fn with_origin(&self, origin: ConfigOrigin) -> impl Iterator<Item = &ConfigVar> {
        self.vars.values().filter(move |var| var.origin == origin)
    }

    /// `config = { extra = { ... } },` entry, or `None` for an empty block.
    pub fn render(&self) -> Option<String> {
        if self.vars.is_empty() {
            return None;
        }
        let mut w = LuaWriter::new();
        w.open("config = {");
        w.open("extra = {");
        let last = self.vars.len() - 1;
        for (index, var) in self.vars.values().enumerate() {
            let sep = if index == last { "" } else { "," };
            w.line(&format!("{} = {}{}", var.name, var.value.to_lua(), sep));
        }
        w.close("}");
        w.close("},");
        Some(w.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_suffixes_repeats() {
        let mut alloc = VariableAllocator::new();
        assert_eq!(alloc.reserve("mult"), "mult");
        assert_eq!(alloc.reserve("mult"), "mult2");
        assert_eq!(alloc.reserve("chips"), "chips");
        assert_eq!(alloc.reserve("mult"), "mult3");
    }

    #[test]
    fn reserve_skips_user_variable_names() {
        let mut alloc = VariableAllocator::with_reserved(["mult"]);
        assert_eq!(alloc.reserve("mult"), "mult2");
    }

    #[test]
    fn config_block_keeps_first_writer() {
        let mut block = ConfigBlock::new();
        assert!(block.insert(ConfigVar::number("hands", 1.0)));
        assert!(!block.insert(ConfigVar::number("hands", 3.0)));
        assert_eq!(block.get("hands").map(|v| v.value.clone()), Some(ConfigValue::Number(1.0)));
    }

    #[test]
    fn empty_block_renders_nothing() {
        assert!(ConfigBlock::new().render().is_none());
        let mut block = ConfigBlock::new();
        block.insert(ConfigVar::number("mult", 5.0));
        block.insert(ConfigVar::text("suit", "Spades"));
        let text = block.render().expect("render");
        assert!(text.contains("mult = 5,\n"));
        assert!(text.contains("suit = \"Spades\"\n"));
    }
}
