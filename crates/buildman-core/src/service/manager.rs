//! The build manager: repository, tracker and live reader wired together
//! in one place. This is what the CLI and the HTTP API talk to.

use std::sync::Arc;

use buildman_types::build::{Build, BuildId};
use buildman_types::current::ActiveStatus;
use buildman_types::error::{ChangeError, LiveError, RemoteError, RepositoryError};
use buildman_types::live::{InventoryLabel, LiveState};
use buildman_types::storage::INVENTORY_KEY;

use crate::catalog::Catalogs;
use crate::change::ChangeOrchestrator;
use crate::game::client::GameClient;
use crate::import::RemoteStateReader;
use crate::storage::kv_store::KvStore;
use crate::storage::{read_array, write_value};

use super::build::BuildRepository;
use super::current::ActiveBuildTracker;

/// Which live fields [`BuildManager::import_live`] copies into a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveFields {
    pub fraction: bool,
    pub skill: bool,
    pub army: bool,
}

impl LiveFields {
    pub fn all() -> Self {
        Self {
            fraction: true,
            skill: true,
            army: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.fraction || self.skill || self.army)
    }
}

pub struct BuildManager<S: KvStore, C: GameClient> {
    store: Arc<S>,
    catalogs: Arc<Catalogs>,
    repository: BuildRepository<S>,
    tracker: ActiveBuildTracker<S, C>,
}

impl<S: KvStore, C: GameClient> BuildManager<S, C> {
    /// Build every component once, in dependency order, and restore the
    /// persisted build list, selection and inventory labels.
    pub async fn load(store: Arc<S>, client: Arc<C>) -> Result<Self, RepositoryError> {
        let catalogs = Arc::new(Catalogs::new());

        let labels: Vec<InventoryLabel> = read_array(store.as_ref(), INVENTORY_KEY).await?;
        let restored = catalogs.inventory.apply_labels(&labels);
        tracing::debug!(restored, "restored inventory labels");

        let orchestrator = Arc::new(ChangeOrchestrator::new(client, catalogs.clone()));
        let repository = BuildRepository::load(store.clone(), catalogs.clone()).await?;
        let tracker = ActiveBuildTracker::load(store.clone(), orchestrator).await?;

        Ok(Self {
            store,
            catalogs,
            repository,
            tracker,
        })
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn repository(&self) -> &BuildRepository<S> {
        &self.repository
    }

    pub fn tracker(&self) -> &ActiveBuildTracker<S, C> {
        &self.tracker
    }

    pub fn reader(&self) -> &RemoteStateReader<C> {
        self.tracker.orchestrator().reader()
    }

    /// Store an edited build. A pure rename of the current build carries
    /// over to the current selection.
    pub async fn update(&self, build: &Build) -> Result<Option<Build>, RepositoryError> {
        let Some(updated) = self.repository.update(build).await? else {
            return Ok(None);
        };
        self.tracker.note_updated(&updated).await?;
        Ok(Some(updated))
    }

    /// Make `target` the active build. Selecting the build that is already
    /// current is a no-op unless `force` is set.
    pub async fn apply(&self, target: Build, force: bool) -> Result<Option<Build>, ChangeError> {
        if !force && self.tracker.equals(&target).await {
            tracing::debug!(id = %target.id, "already current");
            return Ok(Some(target));
        }
        self.tracker.change(Some(target), force).await
    }

    pub async fn clear(&self) -> Result<(), ChangeError> {
        self.tracker.clear().await
    }

    pub async fn status(&self) -> ActiveStatus {
        ActiveStatus {
            state: self.tracker.state().await,
            expired: self.tracker.is_expired(&self.repository).await,
        }
    }

    pub async fn live(&self) -> Result<LiveState, RemoteError> {
        self.reader().snapshot().await
    }

    /// Take over player set names from inventory page markup, if `page` is
    /// the inventory page. Returns how many labels were applied.
    pub async fn sync_inventory_names_if_available(
        &self,
        page: &str,
        html: &str,
    ) -> Result<usize, RepositoryError> {
        let Some(labels) = self.reader().inventory_labels_if_available(page, html) else {
            return Ok(0);
        };
        self.remember_labels(&labels).await
    }

    /// Visit the inventory page and take over the set names shown there.
    pub async fn sync_inventory_names(&self) -> Result<usize, LiveError> {
        let labels = self.reader().inventory_labels().await?.unwrap_or_default();
        Ok(self.remember_labels(&labels).await?)
    }

    /// A page without any set links (for example a login page) keeps the
    /// remembered labels as they are.
    async fn remember_labels(&self, labels: &[InventoryLabel]) -> Result<usize, RepositoryError> {
        if labels.is_empty() {
            tracing::warn!("no inventory labels on the page, keeping the remembered ones");
            return Ok(0);
        }
        let applied = self.catalogs.inventory.apply_labels(labels);
        write_value(self.store.as_ref(), INVENTORY_KEY, labels).await?;
        tracing::info!(found = labels.len(), applied, "synced inventory labels");
        Ok(applied)
    }

    /// Overwrite fields of a stored build with what the live account shows.
    /// Fields the game pages do not reveal are left as they are.
    pub async fn import_live(&self, id: &BuildId, fields: LiveFields) -> Result<Build, LiveError> {
        let mut build = self
            .repository
            .get(id)
            .await
            .ok_or_else(|| LiveError::BuildNotFound(id.to_string()))?;

        if fields.fraction {
            if let Some(fraction) = self.reader().fraction().await? {
                build.fraction = fraction;
            }
        }
        if fields.skill {
            if let Some(skill) = self.reader().skill().await? {
                build.skill = skill;
            }
        }
        if fields.army {
            if let Some(army) = self.reader().army().await? {
                build.army = army;
            }
        }

        self.update(&build)
            .await?
            .ok_or_else(|| LiveError::BuildNotFound(id.to_string()))
    }
}
