//! Request builders for the game's mutation endpoints.

use buildman_types::build::{Army, Attribute, SkillId};

use crate::catalog::inventory::InventoryRecord;
use crate::game::request::GameRequest;

use super::attribute::AttributeCall;

pub const CASTLE_ACTION: &str = "/castle.php";
pub const SKILLWHEEL_ACTION: &str = "/skillwheel.php";
pub const ARMY_ACTION: &str = "/army_apply.php";
pub const INVENTORY_ACTION: &str = "/inventory.php";
pub const HOME_ACTION: &str = "/home.php";

/// Switch the faction group. The game resets the subclass to the default.
pub fn fraction_group(fract: &str) -> GameRequest {
    GameRequest::form(CASTLE_ACTION).param("fract", fract)
}

/// Switch the subclass within the current group.
pub fn fraction_class(classid: &str) -> GameRequest {
    GameRequest::form(CASTLE_ACTION).param("classid", classid)
}

/// Replace the learned skills with `skills`, keyed `param0..`.
pub fn skills(skills: &[SkillId]) -> GameRequest {
    let request = GameRequest::form(SKILLWHEEL_ACTION)
        .param("rand", rand::random::<f64>())
        .param("setstats", 1);
    skills
        .iter()
        .enumerate()
        .fold(request, |req, (i, skill)| req.param(format!("param{i}"), skill))
}

/// Set every troop slot, keyed `countv1..countv7`.
pub fn army(army: &Army) -> GameRequest {
    let request = GameRequest::form(ARMY_ACTION).param("rand", rand::random::<f64>());
    army.iter()
        .enumerate()
        .fold(request, |req, (i, count)| req.param(format!("countv{}", i + 1), count))
}

/// Equip a set. The `r` token keeps the response from being served from cache.
pub fn inventory(record: &InventoryRecord) -> GameRequest {
    GameRequest::get(INVENTORY_ACTION)
        .param("r", cache_buster())
        .param(record.kind, record.value)
}

pub fn attribute(call: AttributeCall) -> GameRequest {
    match call {
        AttributeCall::Increase(attribute) => increase("increase", attribute),
        AttributeCall::IncreaseAll(attribute) => increase("increase_all", attribute),
    }
}

fn increase(key: &str, attribute: Attribute) -> GameRequest {
    GameRequest::get(HOME_ACTION).param(key, attribute.as_str())
}

/// Follow the signed reset link exactly as discovered.
pub fn reset(link: &str) -> GameRequest {
    GameRequest::get(link)
}

fn cache_buster() -> String {
    format!(
        "{}{}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}
