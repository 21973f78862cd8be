use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Number of troop slots in a build's army.
pub const ARMY_SLOTS: usize = 7;

/// Desired troop counts, one per slot, positional.
pub type Army = [u32; ARMY_SLOTS];

/// Unique identifier for a build.
///
/// Freshly created builds get a UUID v7 (simple form); imported builds may
/// carry any non-empty token produced by older versions of the manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(pub String);

impl BuildId {
    /// Create a new BuildId using UUID v7 (time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

macro_rules! catalog_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

catalog_key!(
    /// Faction key: `<fract><classid>`, e.g. `"51"` for the blood barbarian.
    FractionId
);

catalog_key!(
    /// Equipment set key: `<type><value>`, e.g. `"all_on3"`.
    InventoryId
);

catalog_key!(
    /// Skill key as used by the skill wheel, e.g. `"attack1"`.
    SkillId
);

/// The four hero attributes, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Attack,
    Defence,
    Power,
    Knowledge,
}

impl Attribute {
    /// All attributes in catalog order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Attack,
        Attribute::Defence,
        Attribute::Power,
        Attribute::Knowledge,
    ];

    /// Wire name used by the game (`increase=<name>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Attack => "attack",
            Attribute::Defence => "defence",
            Attribute::Power => "power",
            Attribute::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "attack" => Ok(Attribute::Attack),
            "defence" => Ok(Attribute::Defence),
            "power" => Ok(Attribute::Power),
            "knowledge" => Ok(Attribute::Knowledge),
            other => Err(format!("invalid attribute: '{other}'")),
        }
    }
}

/// Requested point allocation per attribute. Independent counters.
///
/// Serialized as an object with exactly the four attribute keys; unknown or
/// missing keys are rejected on deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributePoints {
    pub attack: u32,
    pub defence: u32,
    pub power: u32,
    pub knowledge: u32,
}

impl AttributePoints {
    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Attack => self.attack,
            Attribute::Defence => self.defence,
            Attribute::Power => self.power,
            Attribute::Knowledge => self.knowledge,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: u32) {
        match attribute {
            Attribute::Attack => self.attack = value,
            Attribute::Defence => self.defence = value,
            Attribute::Power => self.power = value,
            Attribute::Knowledge => self.knowledge = value,
        }
    }

    /// `(attribute, points)` pairs in catalog order.
    pub fn entries(&self) -> [(Attribute, u32); 4] {
        Attribute::ALL.map(|a| (a, self.get(a)))
    }

}

/// A named, saved preset of character configuration.
///
/// A build is a value: structural equality decides both "no unsaved changes"
/// and "already applied". The `name` is cosmetic and never synced to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Build {
    pub id: BuildId,
    pub name: String,
    pub fraction: FractionId,
    pub inventory: InventoryId,
    pub attribute: AttributePoints,
    pub army: Army,
    /// Insertion order is display order; membership is what matters.
    pub skill: Vec<SkillId>,
}

impl Build {
    /// Whether `other` differs from `self` in the name only.
    pub fn differs_only_by_name(&self, other: &Build) -> bool {
        let mut renamed = self.clone();
        renamed.name = other.name.clone();
        renamed == *other
    }

    /// Add a skill unless it is already present.
    pub fn add_skill(&mut self, skill: SkillId) -> bool {
        if self.skill.contains(&skill) {
            return false;
        }
        self.skill.push(skill);
        true
    }

    /// Drop repeated skills, keeping the first occurrence of each.
    pub fn dedup_skills(&mut self) -> bool {
        let before = self.skill.len();
        let mut seen = Vec::with_capacity(before);
        self.skill.retain(|s| {
            if seen.contains(s) {
                return false;
            }
            seen.push(s.clone());
            true
        });
        before != self.skill.len()
    }

    /// Remove a skill, keeping the order of the rest.
    pub fn remove_skill(&mut self, skill: &SkillId) -> bool {
        let before = self.skill.len();
        self.skill.retain(|s| s != skill);
        before != self.skill.len()
    }
}
