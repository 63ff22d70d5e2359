//! Rule-to-Lua compiler for SMODS mods.
//!
//! [`package::generate_mod`] is the entry point for a whole project; the
//! `items` generators compile one object at a time. Generation of an item
//! never fails: unknown kinds and missing parameters degrade with a warning.

pub mod allocator;
pub mod assembler;
pub mod check;
pub mod conditions;
pub mod effects;
pub mod error;
pub mod game_vars;
pub mod hooks;
pub mod items;
pub mod loc_vars;
pub mod lua;
pub mod options;
pub mod package;
pub mod passive;
pub mod random_groups;
pub mod session;
pub mod triggers;
pub mod values;

pub use error::{CodegenError, Result};
pub use items::GeneratedItem;
pub use options::{GenerateOptions, ObjectKind};
pub use package::{build_mod, generate_mod, GeneratedMod};
