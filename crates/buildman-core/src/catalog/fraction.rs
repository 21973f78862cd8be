//! Faction catalog.
//!
//! A faction is a top-level group (`fract`) plus a subclass (`classid`).
//! Subclass `"0"` is the default subclass of every group.

use std::collections::HashMap;

use buildman_types::build::FractionId;

/// Subclass every group falls back to after a group change.
pub const DEFAULT_CLASSID: &str = "0";

/// A single faction entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionRecord {
    pub id: FractionId,
    pub fract: &'static str,
    pub classid: &'static str,
    pub name: &'static str,
}

impl FractionRecord {
    pub fn is_default_class(&self) -> bool {
        self.classid == DEFAULT_CLASSID
    }
}

const FRACTIONS: &[(&str, &str, &str)] = &[
    ("1", "0", "Рыцарь"),
    ("1", "1", "Рыцарь света"),
    ("2", "0", "Некромант"),
    ("2", "1", "Некромант - повелитель смерти"),
    ("3", "0", "Маг"),
    ("3", "1", "Маг-разрушитель"),
    ("4", "0", "Эльф"),
    ("4", "1", "Эльф-заклинатель"),
    ("5", "0", "Варвар"),
    ("5", "1", "Варвар крови"),
    ("5", "2", "Варвар-шаман"),
    ("6", "0", "Темный эльф"),
    ("6", "1", "Темный эльф-укротитель"),
    ("7", "0", "Демон"),
    ("7", "1", "Демон тьмы"),
    ("8", "0", "Гном"),
    ("9", "0", "Степной варвар"),
];

/// Immutable lookup table of factions, built once at startup.
#[derive(Debug, Clone)]
pub struct FractionCatalog {
    list: Vec<FractionRecord>,
    index: HashMap<FractionId, usize>,
}

impl FractionCatalog {
    pub fn new() -> Self {
        let list: Vec<FractionRecord> = FRACTIONS
            .iter()
            .map(|&(fract, classid, name)| FractionRecord {
                id: FractionId(format!("{fract}{classid}")),
                fract,
                classid,
                name,
            })
            .collect();
        let index = list
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id.clone(), i))
            .collect();
        Self { list, index }
    }

    pub fn list(&self) -> &[FractionRecord] {
        &self.list
    }

    pub fn get(&self, id: &FractionId) -> Option<&FractionRecord> {
        self.index.get(id).map(|&i| &self.list[i])
    }

    pub fn contains(&self, id: &FractionId) -> bool {
        self.index.contains_key(id)
    }

    pub fn default_record(&self) -> &FractionRecord {
        &self.list[0]
    }

    /// Distinct group keys in catalog order.
    pub fn groups(&self) -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = Vec::new();
        for record in &self.list {
            if !groups.contains(&record.fract) {
                groups.push(record.fract);
            }
        }
        groups
    }

    /// Subclass keys of a group in catalog order.
    pub fn classids(&self, fract: &str) -> Vec<&'static str> {
        self.list
            .iter()
            .filter(|r| r.fract == fract)
            .map(|r| r.classid)
            .collect()
    }

    /// Look up the record for a `(fract, classid)` pair.
    pub fn find(&self, fract: &str, classid: &str) -> Option<&FractionRecord> {
        self.list
            .iter()
            .find(|r| r.fract == fract && r.classid == classid)
    }
}

impl Default for FractionCatalog {
    fn default() -> Self {
        Self::new()
    }
}
