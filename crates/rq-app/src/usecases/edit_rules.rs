//! Use case for editing the rule list
//! 编辑规则列表的用例

use std::sync::Arc;

use rq_core::ports::RuleRepositoryPort;
use rq_core::Rule;
use tracing::{info, info_span, Instrument};

use crate::rules::RuleBook;

/// One change to the ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEdit {
    /// Append at the lowest priority.
    Add(Rule),
    Remove { index: usize },
    Move { from: usize, to: usize },
    SetEnabled { index: usize, enabled: bool },
    /// `None` or an empty prefix makes the rule unconditional.
    SetPrefix { index: usize, prefix: Option<String> },
}

impl RuleEdit {
    fn name(&self) -> &'static str {
        match self {
            RuleEdit::Add(_) => "add",
            RuleEdit::Remove { .. } => "remove",
            RuleEdit::Move { .. } => "move",
            RuleEdit::SetEnabled { .. } => "set_enabled",
            RuleEdit::SetPrefix { .. } => "set_prefix",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditRulesError {
    #[error("no rule at index {index} (rule count: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to persist rules: {0}")]
    PersistFailed(String),
}

/// Applies a [`RuleEdit`] to the shared book and saves the result.
///
/// ## Behavior / 行为
/// - The edit is visible to the watcher from its next tick
/// - An out-of-range index leaves the book and the store untouched
/// - When saving fails the edit stays active in memory and the error is returned
///
/// - 保存失败时内存中的修改仍然生效，并返回错误
pub struct EditRules {
    repository: Arc<dyn RuleRepositoryPort>,
    rules: RuleBook,
}

impl EditRules {
    pub fn new(repository: Arc<dyn RuleRepositoryPort>, rules: RuleBook) -> Self {
        Self { repository, rules }
    }

    /// Execute the use case and return the resulting rule list.
    pub async fn execute(&self, edit: RuleEdit) -> Result<Vec<Rule>, EditRulesError> {
        let span = info_span!("usecase.edit_rules.execute", edit = edit.name());

        async {
            self.apply(edit)?;

            let rules = self.rules.snapshot();
            self.repository
                .save(&rules)
                .await
                .map_err(|e| EditRulesError::PersistFailed(format!("{e:#}")))?;

            info!(count = rules.len(), "Rules updated");
            Ok(rules)
        }
        .instrument(span)
        .await
    }

    fn apply(&self, edit: RuleEdit) -> Result<(), EditRulesError> {
        let out_of_range = |index| EditRulesError::IndexOutOfRange {
            index,
            len: self.rules.len(),
        };

        match edit {
            RuleEdit::Add(rule) => {
                self.rules.push(rule);
                Ok(())
            }
            RuleEdit::Remove { index } => self
                .rules
                .remove(index)
                .map(|_| ())
                .ok_or_else(|| out_of_range(index)),
            RuleEdit::Move { from, to } => {
                if self.rules.move_rule(from, to) {
                    Ok(())
                } else {
                    Err(out_of_range(from.max(to)))
                }
            }
            RuleEdit::SetEnabled { index, enabled } => {
                if self.rules.set_enabled(index, enabled) {
                    Ok(())
                } else {
                    Err(out_of_range(index))
                }
            }
            RuleEdit::SetPrefix { index, prefix } => self
                .rules
                .update(index, |rule| rule.with_required_prefix(prefix))
                .map(|_| ())
                .ok_or_else(|| out_of_range(index)),
        }
    }
}
