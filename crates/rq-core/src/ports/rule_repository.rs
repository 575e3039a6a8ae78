use async_trait::async_trait;

use crate::rule::{Rule, RuleFile};

/// Persistence of the ordered rule list.
///
/// 规则列表的持久化端口。
#[async_trait]
pub trait RuleRepositoryPort: Send + Sync {
    /// Load the saved rules in their stored order.
    ///
    /// A missing store yields an empty list.
    async fn load(&self) -> anyhow::Result<Vec<Rule>>;

    async fn save(&self, rules: &[Rule]) -> anyhow::Result<()>;
}

/// One schema step of the rule file.
pub trait RuleFileMigrationPort: Send + Sync {
    fn from_version(&self) -> u32;
    fn to_version(&self) -> u32;
    fn migrate(&self, file: RuleFile) -> RuleFile;
}
