use serde::{Deserialize, Serialize};

// Declare all domain modules
pub mod build;
pub mod general;

// Re-export all domain events
pub use build::*;
pub use general::*;

/// Top-level event wrapper grouping events by functional domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum AppEvent {
    Build(BuildEvent),
    General(GeneralEvent),
}
