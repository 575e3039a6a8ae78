//! RepliQ infrastructure
//!
//! File-backed implementations of the persistence ports defined in `rq-core`.

pub mod rules;

pub use rules::FileRuleRepository;
