use anyhow::{Context, Result};
use async_trait::async_trait;
use rq_core::ports::RuleRepositoryPort;
use rq_core::rule::file::{RuleFile, CURRENT_SCHEMA_VERSION};
use rq_core::Rule;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::rules::migration::{RuleFileMigrator, LEGACY_ARRAY_SCHEMA_VERSION};

/// Stores the ordered rule list as a versioned JSON document.
///
/// ```json
/// { "schema_version": 2, "rules": [ { "keyword": "teh", "replacement": "the", "is_enabled": true } ] }
/// ```
pub struct FileRuleRepository {
    path: PathBuf,
}

/// Envelope with rules left undecoded, so one bad entry does not sink the file.
#[derive(Deserialize)]
struct RawRuleFile {
    #[serde(default = "unversioned")]
    schema_version: u32,
    #[serde(default)]
    rules: Vec<Value>,
}

fn unversioned() -> u32 {
    rq_core::rule::file::RuleFileVersion::V1.as_u32()
}

impl FileRuleRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create rules dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Writes to a sibling temp file, then renames it over the target.
    async fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp rules failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp rules to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Parses file content into a [`RuleFile`], dropping entries that fail to
    /// decode or validate. `None` when the document itself is unreadable.
    fn decode(&self, content: &str) -> Option<RuleFile> {
        let raw = match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(rules)) => RawRuleFile {
                schema_version: LEGACY_ARRAY_SCHEMA_VERSION,
                rules,
            },
            Ok(value @ Value::Object(_)) => match RawRuleFile::deserialize(value) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Rule file has an unexpected shape");
                    return None;
                }
            },
            Ok(_) => {
                warn!(path = %self.path.display(), "Rule file is neither an object nor an array");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Rule file is not valid JSON");
                return None;
            }
        };

        let rules = raw
            .rules
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let rule = match Rule::deserialize(value) {
                    Ok(rule) => rule,
                    Err(e) => {
                        warn!(index, error = %e, "Skipping undecodable rule");
                        return None;
                    }
                };
                match rule.validate() {
                    Ok(()) => Some(rule),
                    Err(e) => {
                        warn!(index, error = %e, "Skipping invalid rule");
                        None
                    }
                }
            })
            .collect();

        Some(RuleFile {
            schema_version: raw.schema_version,
            rules,
        })
    }
}

#[async_trait]
impl RuleRepositoryPort for FileRuleRepository {
    /// Loads the rules, migrating and re-saving files from older schemas.
    ///
    /// A missing file yields an empty list. So does a file that cannot be
    /// decoded; it is left on disk untouched until the next save.
    async fn load(&self) -> Result<Vec<Rule>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No rule file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read rules failed: {}", self.path.display()))
            }
        };

        let Some(file) = self.decode(&content) else {
            return Ok(Vec::new());
        };

        let original_version = file.schema_version;
        let migrated = RuleFileMigrator::new().migrate_to_latest(file)?;

        if original_version < CURRENT_SCHEMA_VERSION {
            info!(
                from = original_version,
                to = CURRENT_SCHEMA_VERSION,
                "Rule file migrated"
            );
            // The migrated rules are used even if the old file stays on disk.
            if let Err(e) = self.save(&migrated.rules).await {
                warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to save migrated rule file, keeping the old one"
                );
            }
        } else if original_version > CURRENT_SCHEMA_VERSION {
            warn!(
                version = original_version,
                "Rule file was written by a newer version; unknown fields are ignored"
            );
        }

        Ok(migrated.rules)
    }

    async fn save(&self, rules: &[Rule]) -> Result<()> {
        let file = RuleFile::current(rules.to_vec());
        let content = serde_json::to_string_pretty(&file).context("serialize rules failed")?;

        self.atomic_write(&content).await
    }
}
