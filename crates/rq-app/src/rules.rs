//! Shared, ordered rule list.
//!
//! The watcher reads a snapshot at every tick while rule-editing views
//! mutate the list from elsewhere. Every operation holds the lock only for
//! the copy or the edit itself, so a mutation takes effect on the next tick.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rq_core::Rule;

/// Cheaply clonable handle to the shared rule list.
///
/// Order is priority: index 0 is applied first.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    rules: Arc<RwLock<Vec<Rule>>>,
}

impl RuleBook {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules: Arc::new(RwLock::new(rules)),
        }
    }

    // The guarded data is a plain Vec, so a poisoned lock still holds a
    // usable value.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Rule>> {
        self.rules.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Rule>> {
        self.rules.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Vec<Rule> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rule> {
        self.read().get(index).cloned()
    }

    pub fn replace_all(&self, rules: Vec<Rule>) {
        *self.write() = rules;
    }

    /// Appends `rule` at the lowest priority.
    pub fn push(&self, rule: Rule) {
        self.write().push(rule);
    }

    pub fn remove(&self, index: usize) -> Option<Rule> {
        let mut rules = self.write();
        (index < rules.len()).then(|| rules.remove(index))
    }

    /// Moves the rule at `from` so that it ends up at index `to`.
    pub fn move_rule(&self, from: usize, to: usize) -> bool {
        let mut rules = self.write();
        if from >= rules.len() || to >= rules.len() {
            return false;
        }
        let rule = rules.remove(from);
        rules.insert(to, rule);
        true
    }

    /// Replaces the rule at `index` with `f(rule)`.
    pub fn update(&self, index: usize, f: impl FnOnce(Rule) -> Rule) -> Option<Rule> {
        let mut rules = self.write();
        let slot = rules.get_mut(index)?;
        let updated = f(slot.clone());
        *slot = updated.clone();
        Some(updated)
    }

    pub fn set_enabled(&self, index: usize, enabled: bool) -> bool {
        self.update(index, |rule| rule.with_enabled(enabled)).is_some()
    }
}
