//! Active selection state.

use serde::{Deserialize, Serialize};

use crate::build::Build;

/// What the tracker believes is reflected in the live account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "build", rename_all = "lowercase")]
pub enum ActiveState {
    /// No active build; the live account state is unknown or deliberately cleared.
    Empty,
    /// An orchestration run is in flight.
    Applying,
    /// The build last applied successfully.
    Applied(Build),
}

impl ActiveState {
    pub fn build(&self) -> Option<&Build> {
        match self {
            ActiveState::Applied(build) => Some(build),
            _ => None,
        }
    }
}

/// Active state plus whether the saved entry has drifted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatus {
    #[serde(flatten)]
    pub state: ActiveState,
    /// The stored build with the current build's id was edited or removed
    /// after it was applied.
    pub expired: bool,
}
