use anyhow::{bail, Result};
use rq_core::ports::RuleFileMigrationPort;
use rq_core::rule::file::{RuleFile, RuleFileVersion, CURRENT_SCHEMA_VERSION};
use tracing::debug;

/// Schema of files holding a bare JSON array of rules.
pub const LEGACY_ARRAY_SCHEMA_VERSION: u32 = 0;

/// Bare array → `{ schema_version, rules }` envelope.
struct MigrationV0ToV1;

impl RuleFileMigrationPort for MigrationV0ToV1 {
    fn from_version(&self) -> u32 {
        LEGACY_ARRAY_SCHEMA_VERSION
    }

    fn to_version(&self) -> u32 {
        RuleFileVersion::V1.as_u32()
    }

    // The envelope is introduced by the loader; only the version moves.
    fn migrate(&self, file: RuleFile) -> RuleFile {
        RuleFile {
            schema_version: self.to_version(),
            rules: file.rules,
        }
    }
}

/// Adds the optional `required_prefix` condition.
struct MigrationV1ToV2;

impl RuleFileMigrationPort for MigrationV1ToV2 {
    fn from_version(&self) -> u32 {
        RuleFileVersion::V1.as_u32()
    }

    fn to_version(&self) -> u32 {
        RuleFileVersion::V2.as_u32()
    }

    // V1 rules carry no prefix, which deserializes to an unconditional rule.
    fn migrate(&self, file: RuleFile) -> RuleFile {
        RuleFile {
            schema_version: self.to_version(),
            rules: file.rules,
        }
    }
}

pub struct RuleFileMigrator {
    migrations: Vec<Box<dyn RuleFileMigrationPort>>,
}

impl RuleFileMigrator {
    pub fn new() -> Self {
        Self {
            migrations: vec![Box::new(MigrationV0ToV1), Box::new(MigrationV1ToV2)],
        }
    }

    /// Applies migrations until the file reaches [`CURRENT_SCHEMA_VERSION`].
    ///
    /// Files from a newer schema are returned unchanged.
    pub fn migrate_to_latest(&self, mut file: RuleFile) -> Result<RuleFile> {
        while file.schema_version < CURRENT_SCHEMA_VERSION {
            let current = file.schema_version;
            let Some(migration) = self.migrations.iter().find(|m| m.from_version() == current)
            else {
                bail!("no rule file migration from schema version {current}");
            };

            debug!(
                from = current,
                to = migration.to_version(),
                "Migrating rule file"
            );
            file = migration.migrate(file);
        }

        Ok(file)
    }
}

impl Default for RuleFileMigrator {
    fn default() -> Self {
        Self::new()
    }
}
