//! Equipment-set catalog.
//!
//! The set of equip actions is fixed; their display labels can be
//! overridden by names the player gave the sets on the inventory page.

use std::collections::HashMap;
use std::sync::RwLock;

use buildman_types::build::InventoryId;
use buildman_types::live::InventoryLabel;

/// A single equipment-set entry. `kind` and `value` are the request
/// parameter name and value of the equip action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    pub id: InventoryId,
    pub kind: &'static str,
    pub value: &'static str,
    pub default_name: &'static str,
}

const INVENTORY: &[(&str, &str, &str)] = &[
    ("all_off", "100", "Снять все"),
    ("all_on", "1", "Набор 1"),
    ("all_on", "2", "Набор 2"),
    ("all_on", "3", "Набор 3"),
    ("all_on", "4", "Набор 4"),
    ("all_on", "5", "Набор 5"),
];

#[derive(Debug)]
pub struct InventoryCatalog {
    list: Vec<InventoryRecord>,
    index: HashMap<InventoryId, usize>,
    labels: RwLock<HashMap<InventoryId, String>>,
}

impl InventoryCatalog {
    pub fn new() -> Self {
        let list: Vec<InventoryRecord> = INVENTORY
            .iter()
            .map(|&(kind, value, default_name)| InventoryRecord {
                id: InventoryId(format!("{kind}{value}")),
                kind,
                value,
                default_name,
            })
            .collect();
        let index = list
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id.clone(), i))
            .collect();
        Self {
            list,
            index,
            labels: RwLock::new(HashMap::new()),
        }
    }

    pub fn list(&self) -> &[InventoryRecord] {
        &self.list
    }

    pub fn get(&self, id: &InventoryId) -> Option<&InventoryRecord> {
        self.index.get(id).map(|&i| &self.list[i])
    }

    pub fn contains(&self, id: &InventoryId) -> bool {
        self.index.contains_key(id)
    }

    pub fn default_record(&self) -> &InventoryRecord {
        &self.list[0]
    }

    /// Display label: the player's own name for the set when known.
    pub fn name(&self, id: &InventoryId) -> Option<String> {
        let record = self.get(id)?;
        let labels = self.labels.read().unwrap_or_else(|e| e.into_inner());
        Some(
            labels
                .get(id)
                .cloned()
                .unwrap_or_else(|| record.default_name.to_string()),
        )
    }

    /// Override labels of known sets. Labels for unknown sets are ignored.
    /// Returns how many labels were applied.
    pub fn apply_labels(&self, labels: &[InventoryLabel]) -> usize {
        let mut current = self.labels.write().unwrap_or_else(|e| e.into_inner());
        let mut applied = 0;
        for label in labels {
            let id = InventoryId(label.catalog_key());
            if self.index.contains_key(&id) {
                current.insert(id, label.name.clone());
                applied += 1;
            }
        }
        applied
    }
}

impl Default for InventoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}
