//! Commands that read the live account: live, import-live, inventory.

use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use buildman_core::service::LiveFields;

use super::build::{fraction_name, resolve};
use crate::state::AppState;

fn spinner(message: &str, hidden: bool) -> Result<ProgressBar> {
    let spinner = if hidden {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

/// Print what the game pages currently show.
pub async fn live(state: &AppState, json: bool) -> Result<()> {
    let progress = spinner("Reading live account...", json)?;
    let result = state.manager.live().await;
    progress.finish_and_clear();
    let live = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&live)?);
        return Ok(());
    }

    let catalogs = state.manager.catalogs();
    let unknown = style("unknown").dim().to_string();

    println!();
    println!(
        "  {}  {}",
        style("Faction:").bold(),
        live.fraction
            .as_ref()
            .map(|f| format!("{} ({f})", fraction_name(catalogs, f)))
            .unwrap_or_else(|| unknown.clone())
    );
    println!(
        "  {}  {}",
        style("Free points:").bold(),
        live.free_attribute_points
            .map(|p| p.to_string())
            .unwrap_or_else(|| unknown.clone())
    );
    println!(
        "  {}  {}",
        style("Army:").bold(),
        live.army
            .map(|army| army.iter().map(|n| n.to_string()).collect::<Vec<_>>().join("  "))
            .unwrap_or_else(|| unknown.clone())
    );
    match &live.skill {
        Some(skills) => {
            println!("  {}  {}", style("Skills:").bold(), skills.len());
            for skill in skills {
                let name = catalogs.skill.get(skill).map(|s| s.name).unwrap_or("?");
                println!("    {} {} {}", style("•").dim(), name, style(skill.as_str()).dim());
            }
        }
        None => println!("  {}  {}", style("Skills:").bold(), unknown),
    }
    println!();

    Ok(())
}

/// Overwrite parts of a saved build with the live account's values.
/// With no field flags set, every readable field is copied.
pub async fn import_live(
    state: &AppState,
    query: &str,
    fields: LiveFields,
    json: bool,
) -> Result<()> {
    let build = resolve(state, query).await?;
    let fields = if fields.is_empty() { LiveFields::all() } else { fields };

    let progress = spinner("Reading live account...", json)?;
    let result = state.manager.import_live(&build.id, fields).await;
    progress.finish_and_clear();
    let imported = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&imported)?);
        return Ok(());
    }

    let mut copied = Vec::new();
    if fields.fraction && imported.fraction != build.fraction {
        copied.push("faction");
    }
    if fields.skill && imported.skill != build.skill {
        copied.push("skills");
    }
    if fields.army && imported.army != build.army {
        copied.push("army");
    }

    println!();
    if copied.is_empty() {
        println!(
            "  {} {} already matches the live account.",
            style("i").blue().bold(),
            style(&imported.name).cyan()
        );
    } else {
        println!(
            "  {} Updated {} of {}",
            style("✓").green().bold(),
            copied.join(", "),
            style(&imported.name).cyan()
        );
    }
    println!();
    Ok(())
}

pub async fn sync_inventory(state: &AppState, json: bool) -> Result<()> {
    let progress = spinner("Reading inventory page...", json)?;
    let result = state.manager.sync_inventory_names().await;
    progress.finish_and_clear();
    let applied = result?;

    if json {
        println!("{}", serde_json::json!({ "applied": applied }));
        return Ok(());
    }

    println!();
    println!(
        "  {} Took over {} set name{}",
        style("✓").green().bold(),
        applied,
        if applied == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

pub fn list_inventory(state: &AppState, json: bool) -> Result<()> {
    let inventory = &state.manager.catalogs().inventory;

    if json {
        let sets: Vec<serde_json::Value> = inventory
            .list()
            .iter()
            .map(|set| {
                serde_json::json!({
                    "id": set.id,
                    "type": set.kind,
                    "value": set.value,
                    "name": inventory.name(&set.id),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sets)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Default").fg(Color::White),
    ]);

    for set in inventory.list() {
        let name = inventory.name(&set.id).unwrap_or_default();
        let renamed = name != set.default_name;
        table.add_row(vec![
            Cell::new(set.id.as_str()).fg(Color::DarkGrey),
            if renamed {
                Cell::new(&name).fg(Color::Cyan)
            } else {
                Cell::new(&name)
            },
            Cell::new(set.default_name).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
