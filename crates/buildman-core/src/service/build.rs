//! Build Repository: the saved build list.
//!
//! Every mutation persists the whole list under `BM_MANAGER`. Operations
//! that are not valid for the given build return `Ok(None)`; only storage
//! failures are errors.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::RwLock;

use buildman_types::build::{Build, BuildId};
use buildman_types::error::{ImportError, RepositoryError};
use buildman_types::storage::MANAGER_KEY;

use crate::catalog::Catalogs;
use crate::storage::kv_store::KvStore;
use crate::storage::{read_array, write_value};

use super::validate::validate_import;

const DEFAULT_NAME_PREFIX: &str = "Новый билд";
const COPY_SUFFIX: &str = " копия";

static DEFAULT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Новый билд (\d+)$").expect("valid regex"));

/// Result of a successful [`BuildRepository::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub removed: Build,
    /// The entry now occupying the removed position, or the new last entry
    /// when the removed one was last. `None` once the list is empty.
    pub next: Option<Build>,
}

pub struct BuildRepository<S: KvStore> {
    store: Arc<S>,
    catalogs: Arc<Catalogs>,
    builds: RwLock<Vec<Build>>,
}

impl<S: KvStore> BuildRepository<S> {
    /// Load the saved list. Unreadable entries are dropped with a warning.
    pub async fn load(store: Arc<S>, catalogs: Arc<Catalogs>) -> Result<Self, RepositoryError> {
        let builds: Vec<Build> = read_array(store.as_ref(), MANAGER_KEY).await?;
        tracing::debug!(count = builds.len(), "loaded builds");
        Ok(Self {
            store,
            catalogs,
            builds: RwLock::new(builds),
        })
    }

    pub async fn list(&self) -> Vec<Build> {
        self.builds.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.builds.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.builds.read().await.is_empty()
    }

    pub async fn get(&self, id: &BuildId) -> Option<Build> {
        self.builds.read().await.iter().find(|b| &b.id == id).cloned()
    }

    /// Look a build up by id, falling back to an exact name match.
    pub async fn resolve(&self, query: &str) -> Option<Build> {
        let builds = self.builds.read().await;
        builds
            .iter()
            .find(|b| b.id.as_str() == query)
            .or_else(|| builds.iter().find(|b| b.name == query))
            .cloned()
    }

    /// Append a build made of catalog defaults with a fresh id and the next
    /// free default name.
    pub async fn create_default(&self) -> Result<Build, RepositoryError> {
        let mut builds = self.builds.write().await;
        let build = Build {
            id: fresh_id(&builds),
            name: next_default_name(&builds),
            fraction: self.catalogs.fraction.default_record().id.clone(),
            inventory: self.catalogs.inventory.default_record().id.clone(),
            attribute: self.catalogs.default_attribute(),
            army: self.catalogs.default_army(),
            skill: Vec::new(),
        };
        builds.push(build.clone());
        self.persist(&builds).await?;
        tracing::info!(id = %build.id, name = %build.name, "created build");
        Ok(build)
    }

    /// Remove a stored build. `build` must match its stored entry exactly.
    pub async fn remove(&self, build: &Build) -> Result<Option<Removed>, RepositoryError> {
        let mut builds = self.builds.write().await;
        let Some(index) = position_equal(&builds, build) else {
            return Ok(None);
        };

        let removed = builds.remove(index);
        self.persist(&builds).await?;
        tracing::info!(id = %removed.id, "removed build");

        let next = builds.get(index).or_else(|| builds.last()).cloned();
        Ok(Some(Removed { removed, next }))
    }

    /// Append a copy of a stored build under a fresh id.
    pub async fn duplicate(&self, build: &Build) -> Result<Option<Build>, RepositoryError> {
        let mut builds = self.builds.write().await;
        if position_equal(&builds, build).is_none() {
            return Ok(None);
        }

        let mut copy = build.clone();
        copy.id = fresh_id(&builds);
        copy.name.push_str(COPY_SUFFIX);
        builds.push(copy.clone());
        self.persist(&builds).await?;
        tracing::info!(from = %build.id, id = %copy.id, "duplicated build");
        Ok(Some(copy))
    }

    /// Replace the stored entry with the same id. Repeated skills are
    /// collapsed; the returned build is what was stored.
    pub async fn update(&self, build: &Build) -> Result<Option<Build>, RepositoryError> {
        let mut builds = self.builds.write().await;
        let Some(slot) = builds.iter_mut().find(|b| b.id == build.id) else {
            return Ok(None);
        };
        let mut stored = build.clone();
        if stored.dedup_skills() {
            tracing::debug!(id = %build.id, "dropped repeated skills");
        }
        *slot = stored.clone();
        self.persist(&builds).await?;
        tracing::debug!(id = %build.id, "updated build");
        Ok(Some(stored))
    }

    /// Index of the stored entry with the same id, if it is also
    /// structurally identical to `build`.
    pub async fn find_equal(&self, build: &Build) -> Option<usize> {
        position_equal(&self.builds.read().await, build)
    }

    /// JSON dump of every build.
    pub async fn serialize(&self) -> Result<String, RepositoryError> {
        let builds = self.builds.read().await;
        serde_json::to_string(&*builds).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    /// Replace the whole list with an exported one. Returns `false`, leaving
    /// everything untouched, if any part of the payload is invalid.
    pub async fn unserialize(&self, text: &str) -> Result<bool, RepositoryError> {
        match self.validate_import(text) {
            Ok(imported) => {
                let mut builds = self.builds.write().await;
                self.persist(&imported).await?;
                tracing::info!(count = imported.len(), "imported builds");
                *builds = imported;
                Ok(true)
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected import");
                Ok(false)
            }
        }
    }

    pub fn validate_import(&self, text: &str) -> Result<Vec<Build>, ImportError> {
        validate_import(text, &self.catalogs)
    }

    async fn persist(&self, builds: &[Build]) -> Result<(), RepositoryError> {
        write_value(self.store.as_ref(), MANAGER_KEY, builds).await
    }
}

fn position_equal(builds: &[Build], build: &Build) -> Option<usize> {
    builds
        .iter()
        .position(|b| b.id == build.id)
        .filter(|&i| builds[i] == *build)
}

/// A new id not used by any stored build (imported ids are arbitrary).
fn fresh_id(builds: &[Build]) -> BuildId {
    loop {
        let id = BuildId::new();
        if !builds.iter().any(|b| b.id == id) {
            return id;
        }
    }
}

/// One past the highest number among default-named builds.
fn next_default_name(builds: &[Build]) -> String {
    let next = builds
        .iter()
        .filter_map(|b| DEFAULT_NAME_RE.captures(&b.name))
        .filter_map(|c| c[1].parse::<u64>().ok())
        .map(|n| n.saturating_add(1))
        .fold(1, u64::max);
    format!("{DEFAULT_NAME_PREFIX} {next}")
}
