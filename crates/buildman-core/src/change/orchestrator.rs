//! Build Change Orchestrator: drives the live account from one build to
//! another, one request at a time.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::Instrument;

use buildman_types::build::{AttributePoints, Build, FractionId};
use buildman_types::error::{ChangeError, ChangeStep, RemoteError};

use crate::catalog::Catalogs;
use crate::game::client::GameClient;
use crate::game::request::GameRequest;
use crate::import::RemoteStateReader;

use super::attribute::distribute;
use super::plan::ChangePlan;
use super::wire;

/// Executes change plans against the game.
///
/// Requests are strictly sequential. A failed request aborts the rest of
/// the run; completed steps are not rolled back.
pub struct ChangeOrchestrator<C: GameClient> {
    client: Arc<C>,
    reader: RemoteStateReader<C>,
    catalogs: Arc<Catalogs>,
    /// Signed reset link, discovered once per orchestrator.
    reset_link: RwLock<Option<String>>,
}

impl<C: GameClient> ChangeOrchestrator<C> {
    pub fn new(client: Arc<C>, catalogs: Arc<Catalogs>) -> Self {
        Self {
            reader: RemoteStateReader::new(client.clone(), catalogs.clone()),
            client,
            catalogs,
            reset_link: RwLock::new(None),
        }
    }

    pub fn reader(&self) -> &RemoteStateReader<C> {
        &self.reader
    }

    /// Apply `to` unconditionally.
    pub async fn force(&self, to: &Build) -> Result<Build, ChangeError> {
        self.execute(&ChangePlan::force(), to).await
    }

    /// Apply only what differs between `from` and `to`.
    pub async fn diff(&self, from: &Build, to: &Build) -> Result<Build, ChangeError> {
        self.execute(&ChangePlan::diff(from, to), to).await
    }

    pub async fn execute(&self, plan: &ChangePlan, to: &Build) -> Result<Build, ChangeError> {
        let span = tracing::info_span!("change", mode = %plan.mode, build.id = %to.id);
        async move {
            self.check_targets(plan, to)?;

            for &step in &plan.steps {
                tracing::info!(%step, "running step");
                if let Err(err) = self.run_step(step, plan, to).await {
                    tracing::warn!(%step, error = %err, "change aborted");
                    return Err(err);
                }
            }

            tracing::info!(steps = plan.steps.len(), "change applied");
            Ok(to.clone())
        }
        .instrument(span)
        .await
    }

    /// Reject targets the catalogs cannot express before touching the game.
    fn check_targets(&self, plan: &ChangePlan, to: &Build) -> Result<(), ChangeError> {
        if plan.contains(ChangeStep::Fraction) && !self.catalogs.fraction.contains(&to.fraction) {
            return Err(ChangeError::UnknownFraction(to.fraction.to_string()));
        }
        if plan.contains(ChangeStep::Inventory) && !self.catalogs.inventory.contains(&to.inventory) {
            return Err(ChangeError::UnknownInventory(to.inventory.to_string()));
        }
        Ok(())
    }

    async fn run_step(&self, step: ChangeStep, plan: &ChangePlan, to: &Build) -> Result<(), ChangeError> {
        match step {
            ChangeStep::Fraction => self.fraction(plan.from_fraction.as_ref(), &to.fraction).await,
            ChangeStep::Skill => self.send(step, wire::skills(&to.skill)).await,
            ChangeStep::Army => self.send(step, wire::army(&to.army)).await,
            ChangeStep::Inventory => {
                let record = self
                    .catalogs
                    .inventory
                    .get(&to.inventory)
                    .ok_or_else(|| ChangeError::UnknownInventory(to.inventory.to_string()))?;
                self.send(step, wire::inventory(record)).await
            }
            ChangeStep::AttributeReset => self.reset().await,
            ChangeStep::AttributeAllocate => self.allocate(&to.attribute).await,
        }
    }

    async fn send(&self, step: ChangeStep, request: GameRequest) -> Result<(), ChangeError> {
        tracing::debug!(%step, %request, "sending");
        self.client
            .send(&request)
            .await
            .map(|_| ())
            .map_err(remote(step))
    }

    async fn fraction(&self, from: Option<&FractionId>, to: &FractionId) -> Result<(), ChangeError> {
        let step = ChangeStep::Fraction;
        let target = self
            .catalogs
            .fraction
            .get(to)
            .ok_or_else(|| ChangeError::UnknownFraction(to.to_string()))?;

        let from = match from {
            Some(id) => Some(id.clone()),
            None => self.reader.fraction().await.map_err(remote(step))?,
        };

        match from.as_ref().and_then(|id| self.catalogs.fraction.get(id)) {
            Some(current) if current.fract == target.fract => {
                if current.classid != target.classid {
                    self.send(step, wire::fraction_class(target.classid)).await?;
                }
                Ok(())
            }
            current => {
                if current.is_none() {
                    tracing::warn!(fraction = %to, "starting fraction unknown, switching group unconditionally");
                }
                self.send(step, wire::fraction_group(target.fract)).await?;
                if !target.is_default_class() {
                    self.send(step, wire::fraction_class(target.classid)).await?;
                }
                Ok(())
            }
        }
    }

    async fn reset(&self) -> Result<(), ChangeError> {
        let step = ChangeStep::AttributeReset;
        let cached = self.reset_link.read().await.clone();
        let link = match cached {
            Some(link) => Some(link),
            None => {
                let found = self.reader.reset_link().await.map_err(remote(step))?;
                if let Some(link) = &found {
                    *self.reset_link.write().await = Some(link.clone());
                }
                found
            }
        };

        match link {
            Some(link) => self.send(step, wire::reset(&link)).await,
            None => {
                tracing::warn!("reset link not found, allocating without a reset");
                Ok(())
            }
        }
    }

    async fn allocate(&self, requested: &AttributePoints) -> Result<(), ChangeError> {
        let step = ChangeStep::AttributeAllocate;
        let total = self
            .reader
            .free_attribute_points()
            .await
            .map_err(remote(step))?
            .unwrap_or(0);

        let calls = distribute(requested, total);
        tracing::debug!(total, calls = calls.len(), "distributing attribute points");
        for call in calls {
            self.send(step, wire::attribute(call)).await?;
        }
        Ok(())
    }
}

fn remote(step: ChangeStep) -> impl FnOnce(RemoteError) -> ChangeError {
    move |source| ChangeError::Remote { step, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::reader::{ARMY_PAGE, CASTLE_PAGE, HOME_PAGE};
    use crate::testing::{RecordingGameClient, blood_barbarian, pages};
    use buildman_types::build::InventoryId;

    fn orchestrator(client: RecordingGameClient) -> (Arc<RecordingGameClient>, ChangeOrchestrator<RecordingGameClient>) {
        let client = Arc::new(client);
        let orchestrator = ChangeOrchestrator::new(client.clone(), Arc::new(Catalogs::new()));
        (client, orchestrator)
    }

    fn position(summary: &[String], entry: &str) -> usize {
        summary
            .iter()
            .position(|s| s == entry)
            .unwrap_or_else(|| panic!("{entry} not sent: {summary:?}"))
    }

    #[tokio::test]
    async fn test_force_runs_every_step_in_order() {
        let (client, orchestrator) = orchestrator(
            RecordingGameClient::new()
                .with_page(CASTLE_PAGE, pages::castle("1", Some("0")))
                .with_page(HOME_PAGE, pages::home(20, Some("9f"))),
        );
        let target = blood_barbarian("b1");

        let applied = orchestrator.force(&target).await.unwrap();
        assert_eq!(applied, target);

        let requests = client.requests();
        let summary = client.summary();
        assert_eq!(
            &summary[..8],
            &[
                "GET /castle.php",
                "POST /castle.php",
                "POST /castle.php",
                "POST /skillwheel.php",
                "POST /army_apply.php",
                "GET /inventory.php",
                "GET /home.php",
                "GET /shop.php?b=reset_tube&reset=2&sign=9f",
            ]
        );
        assert_eq!(requests[1].param_value("fract"), Some("5"));
        assert_eq!(requests[2].param_value("classid"), Some("1"));
        assert_eq!(requests[5].param_value("all_on"), Some("2"));

        // Free points read, then defence 1 + attack 4 singly, knowledge in bulk.
        let allocations = &requests[9..];
        assert_eq!(allocations.len(), 6);
        assert_eq!(allocations[0].param_value("increase"), Some("defence"));
        assert_eq!(allocations[5].param_value("increase_all"), Some("knowledge"));
        assert_eq!(client.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_diff_identical_builds_sends_nothing() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let build = blood_barbarian("b1");
        orchestrator.diff(&build, &build.clone()).await.unwrap();
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_diff_name_only_sends_nothing() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.name = "Renamed".to_string();
        let applied = orchestrator.diff(&from, &to).await.unwrap();
        assert_eq!(applied.name, "Renamed");
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_diff_group_change_precedes_skill_and_army() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.fraction = FractionId::from("20");

        orchestrator.diff(&from, &to).await.unwrap();

        let summary = client.summary();
        assert_eq!(
            summary,
            vec!["POST /castle.php", "POST /skillwheel.php", "POST /army_apply.php"]
        );
        assert_eq!(client.requests()[0].param_value("fract"), Some("2"));
        assert!(position(&summary, "POST /castle.php") < position(&summary, "POST /skillwheel.php"));
    }

    #[tokio::test]
    async fn test_diff_subclass_only_change() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.fraction = FractionId::from("52");

        orchestrator.diff(&from, &to).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests[0].param_value("classid"), Some("2"));
        assert!(requests[0].param_value("fract").is_none());
    }

    #[tokio::test]
    async fn test_group_change_to_default_subclass_is_one_request() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.fraction = FractionId::from("80");

        orchestrator.diff(&from, &to).await.unwrap();
        let castle: Vec<_> = client
            .requests()
            .into_iter()
            .filter(|r| r.path == "/castle.php")
            .collect();
        assert_eq!(castle.len(), 1);
        assert_eq!(castle[0].param_value("fract"), Some("8"));
    }

    #[tokio::test]
    async fn test_unknown_live_fraction_switches_group_and_subclass() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let target = blood_barbarian("b1");
        orchestrator.force(&target).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests[1].param_value("fract"), Some("5"));
        assert_eq!(requests[2].param_value("classid"), Some("1"));
    }

    #[tokio::test]
    async fn test_reset_link_is_discovered_once() {
        let (client, orchestrator) = orchestrator(
            RecordingGameClient::new().with_page(HOME_PAGE, pages::home(0, Some("abc"))),
        );
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.attribute.power = 1;

        orchestrator.diff(&from, &to).await.unwrap();
        orchestrator.diff(&to, &from).await.unwrap();

        let requests = client.requests();
        let resets = requests.iter().filter(|r| r.page() == "/shop.php").count();
        let home_reads = requests
            .iter()
            .filter(|r| r.path == HOME_PAGE && r.params.is_empty())
            .count();
        assert_eq!(resets, 2);
        // One discovery plus one free-points read per run.
        assert_eq!(home_reads, 3);
    }

    #[tokio::test]
    async fn test_missing_reset_link_is_not_cached_and_allocation_continues() {
        let (client, orchestrator) = orchestrator(
            RecordingGameClient::new().with_page(HOME_PAGE, pages::home(3, None)),
        );
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.attribute = AttributePoints {
            attack: 3,
            ..Default::default()
        };

        orchestrator.diff(&from, &to).await.unwrap();
        assert!(orchestrator.reset_link.read().await.is_none());
        let last = client.requests().pop().unwrap();
        assert_eq!(last.param_value("increase_all"), Some("attack"));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_steps() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        client.fail_on("/army_apply.php");
        let target = blood_barbarian("b1");

        let err = orchestrator.force(&target).await.unwrap_err();
        assert!(matches!(
            err,
            ChangeError::Remote {
                step: ChangeStep::Army,
                ..
            }
        ));
        let summary = client.summary();
        assert_eq!(summary.last().map(String::as_str), Some("POST /army_apply.php"));
        assert!(!summary.iter().any(|s| s == "GET /inventory.php"));
    }

    #[tokio::test]
    async fn test_failed_live_read_aborts_fraction_step() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        client.fail_on(CASTLE_PAGE);
        let err = orchestrator.force(&blood_barbarian("b1")).await.unwrap_err();
        assert!(matches!(
            err,
            ChangeError::Remote {
                step: ChangeStep::Fraction,
                ..
            }
        ));
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_targets_rejected_before_any_request() {
        let (client, orchestrator) = orchestrator(RecordingGameClient::new());
        let mut target = blood_barbarian("b1");
        target.fraction = FractionId::from("99");
        assert!(matches!(
            orchestrator.force(&target).await,
            Err(ChangeError::UnknownFraction(_))
        ));

        let mut target = blood_barbarian("b1");
        target.inventory = InventoryId::from("all_on9");
        assert!(matches!(
            orchestrator.force(&target).await,
            Err(ChangeError::UnknownInventory(_))
        ));
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_free_points_allocates_nothing() {
        let (client, orchestrator) = orchestrator(
            RecordingGameClient::new().with_page(ARMY_PAGE, pages::army(&[1])),
        );
        let from = blood_barbarian("b1");
        let mut to = from.clone();
        to.attribute.attack = 9;

        orchestrator.diff(&from, &to).await.unwrap();
        assert!(!client.requests().iter().any(|r| r.param_value("increase").is_some()
            || r.param_value("increase_all").is_some()));
    }
}
