use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a rule is refused at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("replacement is identical to keyword `{0}`")]
    NoOp(String),
}

/// One keyword → replacement mapping.
///
/// A rule is immutable once built: edits produce a new value through the
/// `with_*` methods. Identity is value-based.
///
/// 一条关键词替换规则，构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    keyword: String,

    #[serde(default)]
    replacement: String,

    #[serde(default = "enabled_by_default")]
    is_enabled: bool,

    /// Absent in files written before prefix conditions existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    required_prefix: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl Rule {
    /// Creates an enabled, unconditional rule.
    ///
    /// # Errors
    ///
    /// - [`RuleError::EmptyKeyword`] when `keyword` is empty
    /// - [`RuleError::NoOp`] when `replacement` equals `keyword`
    pub fn new(
        keyword: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            keyword: keyword.into(),
            replacement: replacement.into(),
            is_enabled: true,
            required_prefix: None,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Returns a copy with the enabled flag set.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    /// Returns a copy gated on `prefix`. An empty prefix means unconditional.
    pub fn with_required_prefix(mut self, prefix: Option<String>) -> Self {
        self.required_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Checks the creation-time invariants.
    ///
    /// Rules that arrive through deserialization skip [`Rule::new`], so loaders
    /// call this before handing rules to the engine.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.keyword.is_empty() {
            return Err(RuleError::EmptyKeyword);
        }
        if self.keyword == self.replacement {
            return Err(RuleError::NoOp(self.keyword.clone()));
        }
        Ok(())
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn required_prefix(&self) -> Option<&str> {
        self.required_prefix.as_deref()
    }

    /// Whether this rule fires against `text`.
    ///
    /// An empty keyword never matches.
    pub fn fires_on(&self, text: &str) -> bool {
        if !self.is_enabled || self.keyword.is_empty() {
            return false;
        }
        if let Some(prefix) = self.required_prefix() {
            if !text.starts_with(prefix) {
                return false;
            }
        }
        text.contains(self.keyword.as_str())
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.keyword, self.replacement)?;
        if let Some(prefix) = self.required_prefix() {
            write!(f, " (prefix {:?})", prefix)?;
        }
        if !self.is_enabled {
            write!(f, " [disabled]")?;
        }
        Ok(())
    }
}
