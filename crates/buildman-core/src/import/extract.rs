//! Page readers: pure extraction of live state from game page markup.
//!
//! Every function returns `None` when the page does not look the way it is
//! expected to. Callers treat `None` as "cannot determine".

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use buildman_types::build::{ARMY_SLOTS, Army, FractionId, SkillId};
use buildman_types::live::InventoryLabel;

use crate::catalog::fraction::FractionCatalog;

static FRACT_SELECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<select name='fract'(.+?)</select").expect("valid regex"));
static CLASSID_SELECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<select name='classid'(.+?)</select").expect("valid regex")
});
static OPTION_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"value=(\d)").expect("valid regex"));
static SKILL_BLOB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<param name="FlashVars" value='param=.+?;builds=([^']+)"#).expect("valid regex")
});
static ARMY_BLOB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<param name="FlashVars" value="param=\d+\|M([^"]+)"#).expect("valid regex")
});
static FREE_POINTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)href="home\.php\?increase_all=knowledge".*?(\d+)</td"#).expect("valid regex")
});
static RESET_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"shop\.php\?b=reset_tube&reset=2&sign=[0-9a-f]+").expect("valid regex")
});
static INVENTORY_SET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a[^>]*href="[^"]*inventory\.php\?(all_on)=(\d)[^"]*"[^>]*>(.*?)</a>"#)
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Page the inventory labels can be read from.
pub const INVENTORY_PAGE: &str = "/inventory.php";

/// Field widths of the army blob: the troop count sits at this char offset
/// of the second `:`-separated field of each slot chunk.
const ARMY_COUNT_OFFSET: usize = 57;
const ARMY_COUNT_WIDTH: usize = 3;

/// Number of `|`-separated fields per skill row, and the "learned" flag index.
const SKILL_ROW_FIELDS: usize = 10;
const SKILL_LEARNED_FIELD: usize = 8;

/// Live faction from the castle page.
///
/// The page's own dropdowns omit the currently active choice, so the live
/// group is the first catalog group missing from the `fract` select, and the
/// live subclass is the first catalog subclass of that group missing from
/// the `classid` select. Groups with a single subclass need no second lookup.
pub fn fraction(html: &str, catalog: &FractionCatalog) -> Option<FractionId> {
    let offered = select_values(&FRACT_SELECT_RE, html)?;
    let fract = catalog
        .groups()
        .into_iter()
        .find(|group| !offered.contains(*group))?;

    let classids = catalog.classids(fract);
    let classid = if classids.len() == 1 {
        classids[0]
    } else {
        let offered = select_values(&CLASSID_SELECT_RE, html)?;
        classids.into_iter().find(|c| !offered.contains(*c))?
    };

    catalog.find(fract, classid).map(|record| record.id.clone())
}

fn select_values(select: &Regex, html: &str) -> Option<HashSet<String>> {
    let body = select.captures(html)?.get(1)?.as_str();
    Some(
        OPTION_VALUE_RE
            .captures_iter(body)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect(),
    )
}

/// Learned skills from the skill wheel page, in page order.
pub fn skills(html: &str) -> Option<Vec<SkillId>> {
    let blob = SKILL_BLOB_RE.captures(html)?.get(1)?.as_str();
    let learned = blob
        .split('$')
        .map(|row| row.split('|').collect::<Vec<_>>())
        .filter(|fields| fields.len() == SKILL_ROW_FIELDS)
        .filter(|fields| fields[SKILL_LEARNED_FIELD] == "1")
        .map(|fields| SkillId::from(fields[0]))
        .collect();
    Some(learned)
}

/// Troop counts from the army page. Missing slots read as zero; slots past
/// the army size are ignored.
pub fn army(html: &str) -> Option<Army> {
    let blob = ARMY_BLOB_RE.captures(html)?.get(1)?.as_str();
    let mut army = [0u32; ARMY_SLOTS];
    for (slot, chunk) in blob.split(";M").take(ARMY_SLOTS).enumerate() {
        army[slot] = chunk
            .split(':')
            .nth(1)
            .map(|field| {
                let count: String = field
                    .chars()
                    .skip(ARMY_COUNT_OFFSET)
                    .take(ARMY_COUNT_WIDTH)
                    .collect();
                leading_number(&count).unwrap_or(0)
            })
            .unwrap_or(0);
    }
    Some(army)
}

/// Unallocated attribute points from the home page.
pub fn free_attribute_points(html: &str) -> Option<u32> {
    let digits = FREE_POINTS_RE.captures(html)?.get(1)?.as_str();
    digits.parse().ok()
}

/// Signed "reset attribute points" action URL embedded in the home page.
pub fn reset_link(html: &str) -> Option<String> {
    RESET_LINK_RE
        .find(html)
        .map(|m| format!("/{}", m.as_str()))
}

/// Player-named equipment sets. Only available on the inventory page.
pub fn inventory_labels(page: &str, html: &str) -> Option<Vec<InventoryLabel>> {
    if !page.starts_with(INVENTORY_PAGE) {
        return None;
    }
    Some(
        INVENTORY_SET_RE
            .captures_iter(html)
            .map(|c| InventoryLabel {
                kind: c[1].to_string(),
                value: c[2].to_string(),
                name: TAG_RE.replace_all(&c[3], "").trim().to_string(),
            })
            .collect(),
    )
}

/// Parse the leading decimal digits after optional whitespace.
fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
