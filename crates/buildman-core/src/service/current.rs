//! Active Build Tracker: which build the live account reflects, and the
//! serial queue every apply goes through.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::Instrument;

use buildman_types::build::Build;
use buildman_types::current::ActiveState;
use buildman_types::error::{ChangeError, RepositoryError};
use buildman_types::storage::CURRENT_KEY;

use crate::change::ChangeOrchestrator;
use crate::game::client::GameClient;
use crate::storage::kv_store::KvStore;
use crate::storage::{read_value, write_value};

use super::build::BuildRepository;

pub struct ActiveBuildTracker<S: KvStore, C: GameClient> {
    store: Arc<S>,
    orchestrator: Arc<ChangeOrchestrator<C>>,
    /// Held for the whole of a run. Tokio's mutex is fair, so queued
    /// changes run in call order.
    queue: Mutex<()>,
    current: RwLock<Option<Build>>,
}

impl<S: KvStore, C: GameClient> ActiveBuildTracker<S, C> {
    /// Restore the persisted selection.
    pub async fn load(
        store: Arc<S>,
        orchestrator: Arc<ChangeOrchestrator<C>>,
    ) -> Result<Self, RepositoryError> {
        let current: Option<Build> = read_value(store.as_ref(), CURRENT_KEY).await?;
        Ok(Self {
            store,
            orchestrator,
            queue: Mutex::new(()),
            current: RwLock::new(current),
        })
    }

    pub fn orchestrator(&self) -> &ChangeOrchestrator<C> {
        &self.orchestrator
    }

    /// Queue a change to `target`, or a clear when `target` is `None`.
    ///
    /// Waits for every earlier change to settle, then diffs against the
    /// settled current build (or forces when there is none or `force` is
    /// set). Success makes the target current; failure clears the current
    /// build, since the live state is then unknown. Either way the result
    /// is persisted.
    pub async fn change(&self, target: Option<Build>, force: bool) -> Result<Option<Build>, ChangeError> {
        let span = tracing::info_span!(
            "apply",
            build.id = target.as_ref().map(|b| b.id.as_str()).unwrap_or(""),
            force
        );
        async move {
            let _turn = self.queue.lock().await;
            let from = self.current.read().await.clone();

            let outcome = match &target {
                None => Ok(None),
                Some(to) => match (&from, force) {
                    (Some(from), false) => self.orchestrator.diff(from, to).await,
                    _ => self.orchestrator.force(to).await,
                }
                .map(Some),
            };

            let next = outcome.as_ref().ok().cloned().flatten();
            *self.current.write().await = next.clone();
            let persisted = self.persist(next.as_ref()).await;

            match outcome {
                Ok(applied) => {
                    persisted?;
                    Ok(applied)
                }
                Err(err) => {
                    if let Err(store_err) = persisted {
                        tracing::warn!(error = %store_err, "failed to persist cleared selection");
                    }
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Forget the current build without touching the game.
    pub async fn clear(&self) -> Result<(), ChangeError> {
        self.change(None, false).await.map(|_| ())
    }

    pub async fn state(&self) -> ActiveState {
        if self.queue.try_lock().is_err() {
            return ActiveState::Applying;
        }
        match self.current.read().await.clone() {
            Some(build) => ActiveState::Applied(build),
            None => ActiveState::Empty,
        }
    }

    pub async fn current(&self) -> Option<Build> {
        self.current.read().await.clone()
    }

    /// Whether `build` is exactly the current build.
    pub async fn equals(&self, build: &Build) -> bool {
        self.current.read().await.as_ref() == Some(build)
    }

    /// True when there is a current build and the repository no longer
    /// holds an identical entry for it.
    pub async fn is_expired(&self, repository: &BuildRepository<S>) -> bool {
        match self.current().await {
            Some(current) => repository.find_equal(&current).await.is_none(),
            None => false,
        }
    }

    /// Follow a rename of the current build's stored entry. Any other
    /// difference is left alone so the current build shows as expired.
    pub async fn note_updated(&self, updated: &Build) -> Result<bool, RepositoryError> {
        let mut current = self.current.write().await;
        let Some(build) = current.as_mut() else {
            return Ok(false);
        };
        if build.id != updated.id || build.name == updated.name || !build.differs_only_by_name(updated) {
            return Ok(false);
        }

        build.name = updated.name.clone();
        tracing::debug!(id = %build.id, name = %build.name, "renamed current build");
        self.persist(current.as_ref()).await?;
        Ok(true)
    }

    async fn persist(&self, current: Option<&Build>) -> Result<(), RepositoryError> {
        write_value(self.store.as_ref(), CURRENT_KEY, &current).await
    }
}
