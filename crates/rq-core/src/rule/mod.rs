pub mod file;
mod model;

pub use file::{RuleFile, RuleFileVersion, CURRENT_SCHEMA_VERSION};
pub use model::{Rule, RuleError};
