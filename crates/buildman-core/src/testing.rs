//! Shared test doubles: a recording game client, canned pages, and build
//! fixtures.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use buildman_types::build::{
    ARMY_SLOTS, AttributePoints, Build, BuildId, FractionId, InventoryId, SkillId,
};
use buildman_types::error::RemoteError;

use crate::game::client::GameClient;
use crate::game::request::GameRequest;

/// Game client that serves canned pages by path and records every request.
#[derive(Default)]
pub struct RecordingGameClient {
    pages: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<GameRequest>>,
    fail_on: Mutex<Option<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingGameClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for every request whose page (path without query) is `page`.
    pub fn with_page(self, page: &str, html: impl Into<String>) -> Self {
        self.set_page(page, html);
        self
    }

    pub fn set_page(&self, page: &str, html: impl Into<String>) {
        self.pages
            .lock()
            .unwrap()
            .insert(page.to_string(), html.into());
    }

    /// Make every request to `page` fail with HTTP 500.
    pub fn fail_on(&self, page: &str) {
        *self.fail_on.lock().unwrap() = Some(page.to_string());
    }

    pub fn requests(&self) -> Vec<GameRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests rendered as `"METHOD /path"` for compact asserts.
    pub fn summary(&self) -> Vec<String> {
        self.requests().iter().map(ToString::to_string).collect()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl GameClient for RecordingGameClient {
    async fn send(&self, request: &GameRequest) -> Result<String, RemoteError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        // Give other tasks a chance to interleave while "in flight".
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let page = request.page().to_string();
        if self.fail_on.lock().unwrap().as_deref() == Some(page.as_str()) {
            return Err(RemoteError::Status {
                path: request.path.clone(),
                status: 500,
            });
        }
        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or_default())
    }
}

/// Canned game pages shaped like the real ones, just enough for the readers.
pub mod pages {
    use super::ARMY_SLOTS;

    const GROUPS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];

    fn classids(fract: &str) -> &'static [&'static str] {
        match fract {
            "5" => &["0", "1", "2"],
            "8" | "9" => &["0"],
            _ => &["0", "1"],
        }
    }

    /// Castle page for a live faction. The page omits the live choice from
    /// its dropdowns; the subclass select is only rendered when `classid`
    /// is given.
    pub fn castle(fract: &str, classid: Option<&str>) -> String {
        let mut html = String::from("<form><select name='fract'>");
        for group in GROUPS.iter().filter(|g| **g != fract) {
            html.push_str(&format!("<option value={group}>{group}</option>"));
        }
        html.push_str("</select>");
        if let Some(classid) = classid {
            html.push_str("<select name='classid'>");
            for c in classids(fract).iter().filter(|c| **c != classid) {
                html.push_str(&format!("<option value={c}>{c}</option>"));
            }
            html.push_str("</select>");
        }
        html.push_str("</form>");
        html
    }

    /// Skill wheel page with learned and unlearned rows.
    pub fn skillwheel(learned: &[&str], unlearned: &[&str]) -> String {
        let rows: Vec<String> = learned
            .iter()
            .map(|id| format!("{id}|n|d|0|0|0|0|0|1|x"))
            .chain(unlearned.iter().map(|id| format!("{id}|n|d|0|0|0|0|0|0|x")))
            .collect();
        format!(
            r#"<object><param name="FlashVars" value='param=77;builds={}'></object>"#,
            rows.join("$")
        )
    }

    /// Army page; slots beyond `counts` are left out of the blob entirely.
    pub fn army(counts: &[u32]) -> String {
        let chunks: Vec<String> = counts
            .iter()
            .take(ARMY_SLOTS)
            .enumerate()
            .map(|(slot, count)| format!("{slot}:{}{count:<3}|tail", "x".repeat(57)))
            .collect();
        format!(
            r#"<param name="FlashVars" value="param=991|M{}">"#,
            chunks.join(";M")
        )
    }

    /// Home page with a free points counter and, optionally, the signed
    /// reset link.
    pub fn home(free_points: u32, sign: Option<&str>) -> String {
        let mut html = format!(
            r#"<table><tr><td><a href="home.php?increase_all=knowledge">+</a></td><td>{free_points}</td></tr></table>"#
        );
        if let Some(sign) = sign {
            html.push_str(&format!(
                r#"<a href="shop.php?b=reset_tube&reset=2&sign={sign}">reset</a>"#
            ));
        }
        html
    }
}

/// A catalog-valid build with distinct content per `id`.
pub fn build(id: &str, name: &str) -> Build {
    Build {
        id: BuildId::from(id),
        name: name.to_string(),
        fraction: FractionId::from("10"),
        inventory: InventoryId::from("all_off100"),
        attribute: AttributePoints::default(),
        army: [0; ARMY_SLOTS],
        skill: Vec::new(),
    }
}

/// A fully populated build.
pub fn blood_barbarian(id: &str) -> Build {
    Build {
        id: BuildId::from(id),
        name: "Blood rush".to_string(),
        fraction: FractionId::from("51"),
        inventory: InventoryId::from("all_on2"),
        attribute: AttributePoints {
            attack: 4,
            defence: 1,
            power: 0,
            knowledge: 10,
        },
        army: [100, 40, 12, 0, 0, 3, 1],
        skill: vec![SkillId::from("attack1"), SkillId::from("tactics")],
    }
}
