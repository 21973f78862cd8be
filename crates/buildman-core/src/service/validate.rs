//! All-or-nothing validation of imported build lists.

use std::collections::HashSet;

use buildman_types::build::Build;
use buildman_types::error::ImportError;

use crate::catalog::Catalogs;

/// Parse and validate an exported build list.
///
/// Shape is checked by deserialization into [`Build`]: every key present,
/// no extra keys, exact attribute keys, an army of the catalog slot count,
/// non-negative integers. On top of that ids and names must be non-empty,
/// catalog references must resolve, skills must not repeat and ids must be
/// unique within the payload. The first violation is returned.
pub fn validate_import(text: &str, catalogs: &Catalogs) -> Result<Vec<Build>, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let serde_json::Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let mut builds = Vec::with_capacity(items.len());
    let mut ids = HashSet::new();
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(ImportError::Malformed {
                index,
                reason: "not an object".to_string(),
            });
        }
        let build: Build = serde_json::from_value(item).map_err(|e| ImportError::Malformed {
            index,
            reason: e.to_string(),
        })?;

        check_build(index, &build, catalogs)?;
        if !ids.insert(build.id.clone()) {
            return Err(ImportError::DuplicateId {
                index,
                id: build.id.to_string(),
            });
        }
        builds.push(build);
    }
    Ok(builds)
}

fn check_build(index: usize, build: &Build, catalogs: &Catalogs) -> Result<(), ImportError> {
    if build.id.as_str().is_empty() {
        return Err(ImportError::EmptyField { index, field: "id" });
    }
    if build.name.is_empty() {
        return Err(ImportError::EmptyField { index, field: "name" });
    }
    if !catalogs.fraction.contains(&build.fraction) {
        return Err(ImportError::UnknownFraction {
            index,
            id: build.fraction.to_string(),
        });
    }
    if !catalogs.inventory.contains(&build.inventory) {
        return Err(ImportError::UnknownInventory {
            index,
            id: build.inventory.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for skill in &build.skill {
        if !catalogs.skill.contains(skill) {
            return Err(ImportError::UnknownSkill {
                index,
                id: skill.to_string(),
            });
        }
        if !seen.insert(skill) {
            return Err(ImportError::DuplicateSkill {
                index,
                id: skill.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{blood_barbarian, build};
    use serde_json::json;

    fn payload(builds: &[Build]) -> serde_json::Value {
        serde_json::to_value(builds).unwrap()
    }

    fn check(value: serde_json::Value) -> Result<Vec<Build>, ImportError> {
        validate_import(&value.to_string(), &Catalogs::new())
    }

    #[test]
    fn test_valid_payload_round_trips() {
        let builds = vec![blood_barbarian("a"), build("b", "Plain")];
        assert_eq!(check(payload(&builds)).unwrap(), builds);
        assert_eq!(check(json!([])).unwrap(), Vec::<Build>::new());
    }

    #[test]
    fn test_rejects_non_json_and_non_array() {
        let catalogs = Catalogs::new();
        assert!(matches!(
            validate_import("{not json", &catalogs),
            Err(ImportError::InvalidJson(_))
        ));
        assert_eq!(check(json!({"id": "a"})), Err(ImportError::NotAnArray));
        assert!(matches!(
            check(json!([1])),
            Err(ImportError::Malformed { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_missing_key_and_bad_shapes() {
        let mut value = payload(&[blood_barbarian("a")]);
        value[0].as_object_mut().unwrap().remove("inventory");
        assert!(matches!(check(value), Err(ImportError::Malformed { index: 0, .. })));

        let mut value = payload(&[build("x", "X"), blood_barbarian("a")]);
        value[1]["army"] = json!([1, 2, 3, 4, 5, 6]);
        assert!(matches!(check(value), Err(ImportError::Malformed { index: 1, .. })));

        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["attribute"]["luck"] = json!(2);
        assert!(matches!(check(value), Err(ImportError::Malformed { .. })));

        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["army"][0] = json!(-1);
        assert!(matches!(check(value), Err(ImportError::Malformed { .. })));

        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["name"] = json!(42);
        assert!(matches!(check(value), Err(ImportError::Malformed { .. })));
    }

    #[test]
    fn test_rejects_empty_strings() {
        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["name"] = json!("");
        assert_eq!(
            check(value),
            Err(ImportError::EmptyField { index: 0, field: "name" })
        );
    }

    #[test]
    fn test_rejects_unknown_catalog_ids() {
        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["fraction"] = json!("55");
        assert!(matches!(check(value), Err(ImportError::UnknownFraction { .. })));

        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["inventory"] = json!("all_on6");
        assert!(matches!(check(value), Err(ImportError::UnknownInventory { .. })));

        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["skill"] = json!(["attack1", "telekinesis"]);
        assert_eq!(
            check(value),
            Err(ImportError::UnknownSkill {
                index: 0,
                id: "telekinesis".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut value = payload(&[blood_barbarian("a")]);
        value[0]["skill"] = json!(["attack1", "attack1"]);
        assert!(matches!(check(value), Err(ImportError::DuplicateSkill { .. })));

        let value = payload(&[blood_barbarian("a"), build("a", "Same id")]);
        assert_eq!(
            check(value),
            Err(ImportError::DuplicateId {
                index: 1,
                id: "a".to_string()
            })
        );
    }
}
