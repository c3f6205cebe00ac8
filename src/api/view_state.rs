use serde::{Deserialize, Serialize};

use crate::assets::LoadProgress;

pub const UNAVAILABLE_TITLE: &str = "2.5D View Unavailable";
pub const UNAVAILABLE_HINT: &str =
    "Some resources could not be loaded. Refresh the page to try again.";

/// Why the view stopped drawing. Both causes are terminal until the host
/// remounts the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailableReason {
    CriticalAsset { name: String },
    LoadFailed { message: String },
    DrawFault { message: String },
}

/// Lifecycle of the view as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewStatus {
    Loading(LoadProgress),
    Ready,
    Unavailable(UnavailableReason),
    Unmounted,
}

impl ViewStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewStatus::Ready)
    }

    /// `Unavailable` and `Unmounted` never transition back without a remount.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ViewStatus::Unavailable(_) | ViewStatus::Unmounted)
    }

    /// Title and reload hint a host shows next to its manual-reload button.
    #[must_use]
    pub fn unavailable_copy(&self) -> Option<(&'static str, &'static str)> {
        match self {
            ViewStatus::Unavailable(_) => Some((UNAVAILABLE_TITLE, UNAVAILABLE_HINT)),
            _ => None,
        }
    }
}
