//! Catalog services: the fixed domain vocabulary.
//!
//! Built once at startup and shared by reference. Apart from the inventory
//! labels, nothing here changes after construction.

pub mod fraction;
pub mod inventory;
pub mod skill;

use buildman_types::build::{ARMY_SLOTS, Army, AttributePoints};

use self::fraction::FractionCatalog;
use self::inventory::InventoryCatalog;
use self::skill::SkillCatalog;

/// All catalogs bundled together.
#[derive(Debug, Default)]
pub struct Catalogs {
    pub fraction: FractionCatalog,
    pub inventory: InventoryCatalog,
    pub skill: SkillCatalog,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero points in every attribute.
    pub fn default_attribute(&self) -> AttributePoints {
        AttributePoints::default()
    }

    /// Zero troops in every slot.
    pub fn default_army(&self) -> Army {
        [0; ARMY_SLOTS]
    }

    pub fn army_slots(&self) -> usize {
        ARMY_SLOTS
    }
}
