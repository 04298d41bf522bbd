use serde::{Deserialize, Serialize};

/// Platform-wide figures shown in the hero section. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateStats {
    pub total_projects: u32,
    pub active_projects: u32,
    pub system_uptime: String,
    pub data_processed: String,
}
