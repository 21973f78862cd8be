//! Catalog browsing: factions, equipment sets, skills.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use super::live::list_inventory;
use super::CatalogResource;
use crate::state::AppState;

pub fn show(state: &AppState, resource: CatalogResource, json: bool) -> Result<()> {
    match resource {
        CatalogResource::Fractions => fractions(state, json),
        CatalogResource::Inventory => list_inventory(state, json),
        CatalogResource::Skills => skills(state, json),
    }
}

fn fractions(state: &AppState, json: bool) -> Result<()> {
    let catalog = &state.manager.catalogs().fraction;

    if json {
        let list: Vec<serde_json::Value> = catalog
            .list()
            .iter()
            .map(|f| {
                serde_json::json!({
                    "id": f.id,
                    "fract": f.fract,
                    "classid": f.classid,
                    "name": f.name,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Name").fg(Color::White),
    ]);

    for fraction in catalog.list() {
        let name = if fraction.is_default_class() {
            Cell::new(fraction.name)
        } else {
            Cell::new(format!("  {}", fraction.name)).fg(Color::DarkGrey)
        };
        table.add_row(vec![Cell::new(fraction.id.as_str()), name]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

fn skills(state: &AppState, json: bool) -> Result<()> {
    let catalog = &state.manager.catalogs().skill;

    if json {
        let sections: Vec<serde_json::Value> = catalog
            .sections()
            .iter()
            .map(|section| {
                serde_json::json!({
                    "id": section.id,
                    "name": section.name,
                    "skills": section.skills.iter().map(|s| serde_json::json!({
                        "id": s.id,
                        "name": s.name,
                        "main": s.main,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    println!();
    for section in catalog.sections() {
        println!("  {}", style(format!("── {} ──", section.name)).dim());
        for skill in &section.skills {
            let name = if skill.main {
                style(skill.name).bold().to_string()
            } else {
                skill.name.to_string()
            };
            println!("  {:<24} {}", skill.id.as_str(), name);
        }
        println!();
    }
    Ok(())
}
