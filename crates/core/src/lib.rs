//! Rule model for generated game objects. Keep this crate free of IO and code generation.

pub mod cards;
pub mod conditions;
pub mod effects;
pub mod error;
pub mod items;
pub mod metadata;
pub mod params;
pub mod rules;
pub mod triggers;
pub mod variables;

pub use cards::*;
pub use conditions::*;
pub use effects::*;
pub use error::*;
pub use items::*;
pub use metadata::*;
pub use params::*;
pub use rules::*;
pub use triggers::*;
pub use variables::*;
