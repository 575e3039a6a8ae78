pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_optional_config};
pub use run::{run_monitor, run_rules_command, LoggingObserver};
pub use wiring::{resolve_environment, wire_dependencies, AppDeps, WiringError};
