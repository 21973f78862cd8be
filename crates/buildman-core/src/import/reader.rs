//! Remote State Reader: fetches game pages and runs the page extractors.

use std::sync::Arc;

use buildman_types::build::{Army, FractionId, SkillId};
use buildman_types::error::RemoteError;
use buildman_types::live::{InventoryLabel, LiveState};

use crate::catalog::Catalogs;
use crate::game::client::GameClient;
use crate::game::request::GameRequest;

use super::extract;

pub const CASTLE_PAGE: &str = "/castle.php";
pub const SKILLWHEEL_PAGE: &str = "/skillwheel.php";
pub const ARMY_PAGE: &str = "/army.php";
pub const HOME_PAGE: &str = "/home.php";

/// Read-only view of the live account.
///
/// Every read is a fresh page fetch. Transport failures are errors; pages
/// that cannot be parsed yield `Ok(None)`.
pub struct RemoteStateReader<C: GameClient> {
    client: Arc<C>,
    catalogs: Arc<Catalogs>,
}

impl<C: GameClient> RemoteStateReader<C> {
    pub fn new(client: Arc<C>, catalogs: Arc<Catalogs>) -> Self {
        Self { client, catalogs }
    }

    async fn page(&self, path: &str) -> Result<String, RemoteError> {
        tracing::debug!(path, "reading live page");
        self.client.send(&GameRequest::get(path)).await
    }

    pub async fn fraction(&self) -> Result<Option<FractionId>, RemoteError> {
        let html = self.page(CASTLE_PAGE).await?;
        let fraction = extract::fraction(&html, &self.catalogs.fraction);
        if fraction.is_none() {
            tracing::warn!("could not determine live fraction");
        }
        Ok(fraction)
    }

    pub async fn skill(&self) -> Result<Option<Vec<SkillId>>, RemoteError> {
        let html = self.page(SKILLWHEEL_PAGE).await?;
        let Some(skills) = extract::skills(&html) else {
            tracing::warn!("could not determine live skills");
            return Ok(None);
        };

        let (known, unknown): (Vec<SkillId>, Vec<SkillId>) = skills
            .into_iter()
            .partition(|id| self.catalogs.skill.contains(id));
        if !unknown.is_empty() {
            tracing::warn!(?unknown, "ignoring live skills missing from the catalog");
        }
        Ok(Some(known))
    }

    pub async fn army(&self) -> Result<Option<Army>, RemoteError> {
        let html = self.page(ARMY_PAGE).await?;
        let army = extract::army(&html);
        if army.is_none() {
            tracing::warn!("could not determine live army");
        }
        Ok(army)
    }

    pub async fn free_attribute_points(&self) -> Result<Option<u32>, RemoteError> {
        let html = self.page(HOME_PAGE).await?;
        let points = extract::free_attribute_points(&html);
        if points.is_none() {
            tracing::warn!("could not determine free attribute points");
        }
        Ok(points)
    }

    /// Signed reset link from the home page, if the page carries one.
    pub async fn reset_link(&self) -> Result<Option<String>, RemoteError> {
        let html = self.page(HOME_PAGE).await?;
        Ok(extract::reset_link(&html))
    }

    /// Equipment-set labels as named by the player.
    ///
    /// `page` is the page the given markup came from; anything other than
    /// the inventory page yields `None`.
    pub fn inventory_labels_if_available(&self, page: &str, html: &str) -> Option<Vec<InventoryLabel>> {
        extract::inventory_labels(page, html)
    }

    /// Visit the inventory page and read the set labels from it.
    pub async fn inventory_labels(&self) -> Result<Option<Vec<InventoryLabel>>, RemoteError> {
        let html = self.page(extract::INVENTORY_PAGE).await?;
        Ok(self.inventory_labels_if_available(extract::INVENTORY_PAGE, &html))
    }

    /// Everything readable about the live account, one page at a time.
    pub async fn snapshot(&self) -> Result<LiveState, RemoteError> {
        Ok(LiveState {
            fraction: self.fraction().await?,
            skill: self.skill().await?,
            army: self.army().await?,
            free_attribute_points: self.free_attribute_points().await?,
        })
    }
}
