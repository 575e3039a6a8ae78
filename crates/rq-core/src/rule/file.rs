use serde::{Deserialize, Serialize};

use super::model::Rule;

/// Version 1 stored keyword, replacement and enabled flag only.
/// Version 2 added `required_prefix`.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileVersion {
    V1,
    V2,
}

impl RuleFileVersion {
    pub const CURRENT: RuleFileVersion = RuleFileVersion::V2;

    pub fn as_u32(self) -> u32 {
        match self {
            RuleFileVersion::V1 => 1,
            RuleFileVersion::V2 => 2,
        }
    }
}

/// On-disk representation of the ordered rule list.
///
/// Unknown fields are ignored and missing optional fields default to absent,
/// so older and newer files both load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

// Files without a version field predate versioning.
fn legacy_schema_version() -> u32 {
    RuleFileVersion::V1.as_u32()
}

impl RuleFile {
    pub fn current(rules: Vec<Rule>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            rules,
        }
    }
}

impl Default for RuleFile {
    fn default() -> Self {
        Self::current(Vec::new())
    }
}
