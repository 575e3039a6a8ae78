//! Use case for loading the persisted rules
//! 加载已保存规则的用例

use std::sync::Arc;

use rq_core::ports::RuleRepositoryPort;
use tracing::{info, info_span, warn, Instrument};

use crate::rules::RuleBook;

/// Loads the saved rules into the shared [`RuleBook`].
///
/// ## Behavior / 行为
/// - Replaces the whole book with the stored list, keeping its order
/// - A repository error is logged and leaves an empty book; it never aborts startup
///
/// - 读取失败时记录日志并以空规则集继续运行
pub struct LoadRules {
    repository: Arc<dyn RuleRepositoryPort>,
    rules: RuleBook,
}

impl LoadRules {
    pub fn new(repository: Arc<dyn RuleRepositoryPort>, rules: RuleBook) -> Self {
        Self { repository, rules }
    }

    /// Execute the use case.
    ///
    /// Returns the number of rules now in the book.
    pub async fn execute(&self) -> usize {
        let span = info_span!("usecase.load_rules.execute");

        async {
            let loaded = match self.repository.load().await {
                Ok(rules) => rules,
                Err(e) => {
                    warn!(error = %e, "Failed to load rules, starting with an empty set");
                    Vec::new()
                }
            };

            let count = loaded.len();
            self.rules.replace_all(loaded);
            info!(count, "Rules loaded");
            count
        }
        .instrument(span)
        .await
    }
}
