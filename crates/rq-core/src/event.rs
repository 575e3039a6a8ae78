use crate::rule::Rule;

/// Events broadcast to clipboard observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardEvent {
    /// The clipboard changed externally. `final_text` equals `original` when
    /// no substitution happened.
    ContentChanged { original: String, final_text: String },

    /// One rule fired while rewriting `original` into `final_text`.
    RuleApplied {
        original: String,
        final_text: String,
        rule: Rule,
    },

    /// Monitoring was switched on or off.
    MonitoringChanged { enabled: bool },
}

impl ClipboardEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ClipboardEvent::ContentChanged { .. } => "content_changed",
            ClipboardEvent::RuleApplied { .. } => "rule_applied",
            ClipboardEvent::MonitoringChanged { .. } => "monitoring_changed",
        }
    }
}
