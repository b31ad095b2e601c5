//! Closed set of list-item variants distinguished by a `type` discriminator.

use serde::{Deserialize, Serialize};

/// Known item variants. Materials may be cars; competences may be driving
/// licenses. Items without a discriminator are plain base items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Car,
    DrivingLicense,
}

impl ItemKind {
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::DrivingLicense => "drivingLicense",
        }
    }

    /// Inverse of [`discriminator`](Self::discriminator).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "car" => Some(Self::Car),
            "drivingLicense" => Some(Self::DrivingLicense),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.discriminator())
    }
}
