//! Observed live account state.
//!
//! Read from the game on demand and never persisted (except inventory
//! labels, which are cosmetic).

use serde::{Deserialize, Serialize};

use crate::build::{Army, FractionId, SkillId};

/// Snapshot of the live account as far as it could be determined.
///
/// Each field is `None` when the corresponding page could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveState {
    pub fraction: Option<FractionId>,
    pub skill: Option<Vec<SkillId>>,
    pub army: Option<Army>,
    pub free_attribute_points: Option<u32>,
}

/// A player-customized equipment set label scraped from the inventory page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLabel {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub name: String,
}

impl InventoryLabel {
    /// Catalog key this label belongs to (`<type><value>`).
    pub fn catalog_key(&self) -> String {
        format!("{}{}", self.kind, self.value)
    }
}
