// ── Project domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operational status shown on a project card.
///
/// Only `Online` renders an active link; every other value renders the
/// card as offline with an inert link.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectStatus {
    Online,
    #[default]
    Offline,
    Maintenance,
}

impl ProjectStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// Text shown in the card's status badge.
    pub fn label(self) -> &'static str {
        if self.is_online() { "ONLINE" } else { "OFFLINE" }
    }
}

/// Release metadata displayed in the card footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub version: String,
    pub last_update: String,
    pub uptime: String,
}

/// Static description of one sub-project.
///
/// Created at config load. Only `status` changes at runtime, and only
/// through [`Registry::set_status`](crate::store::Registry::set_status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    /// Informational only; never used to build URLs.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: ProjectMetadata,
}
