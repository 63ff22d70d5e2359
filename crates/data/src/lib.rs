//! Loading and validation of mod projects.

pub mod load;
pub mod validate;

pub use load::*;
pub use validate::*;
