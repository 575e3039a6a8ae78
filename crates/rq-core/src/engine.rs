//! Rule engine.
//!
//! Rules compose sequentially: each rule sees the text produced by the rules
//! before it. A rule replaces every non-overlapping occurrence of its keyword
//! in a single left-to-right pass, so text it inserts is never matched again
//! by the same rule. The engine is pure and cannot fail.

use crate::rule::Rule;

/// Result of running a rule list over one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    /// Rules that fired, in application order.
    pub fired: Vec<Rule>,
}

impl Outcome {
    pub fn unchanged(input: &str) -> Self {
        Self {
            output: input.to_owned(),
            fired: Vec::new(),
        }
    }

    /// True when at least one rule fired and the text actually differs.
    pub fn rewrote(&self, input: &str) -> bool {
        !self.fired.is_empty() && self.output != input
    }
}

/// Applies `rules` to `input` in order.
pub fn apply(rules: &[Rule], input: &str) -> Outcome {
    let mut current = input.to_owned();
    let mut fired = Vec::new();

    for rule in rules {
        if !rule.fires_on(&current) {
            continue;
        }
        // `str::replace` is a single leftmost-first, non-overlapping pass.
        current = current.replace(rule.keyword(), rule.replacement());
        fired.push(rule.clone());
    }

    Outcome {
        output: current,
        fired,
    }
}
