//! Build lifecycle CLI commands: list, show, new, duplicate, remove, edit.

use anyhow::{Result, anyhow, bail};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use buildman_core::catalog::Catalogs;
use buildman_types::build::{ARMY_SLOTS, Army, Attribute, Build, FractionId, InventoryId, SkillId};
use buildman_types::current::ActiveState;

use crate::state::AppState;

/// Flags of `bman edit`. Unset flags leave the field as it is.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Build id or name.
    pub build: String,

    /// New display name.
    #[arg(long)]
    pub name: Option<String>,

    /// Faction id, e.g. `51` (see `bman catalog fractions`).
    #[arg(long)]
    pub fraction: Option<String>,

    /// Equipment set id, e.g. `all_on2` (see `bman catalog inventory`).
    #[arg(long)]
    pub inventory: Option<String>,

    /// Attribute points as `name=value`; repeatable.
    #[arg(long, value_name = "NAME=VALUE")]
    pub attribute: Vec<String>,

    /// Troop counts per slot, comma separated. Missing slots become 0.
    #[arg(long, value_name = "A,B,C,...")]
    pub army: Option<String>,

    /// Add a skill; repeatable.
    #[arg(long)]
    pub skill: Vec<String>,

    /// Drop all skills before adding the ones given with --skill.
    #[arg(long)]
    pub clear_skills: bool,
}

/// Look a build up by id, then by exact name.
pub async fn resolve(state: &AppState, query: &str) -> Result<Build> {
    state
        .manager
        .repository()
        .resolve(query)
        .await
        .ok_or_else(|| anyhow!("Build '{query}' not found"))
}

/// List all builds in a table, marking the active one.
pub async fn list_builds(state: &AppState, json: bool) -> Result<()> {
    let builds = state.manager.repository().list().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&builds)?);
        return Ok(());
    }

    if builds.is_empty() {
        println!();
        println!(
            "  {} No builds yet. Create one with: {}",
            style("i").blue().bold(),
            style("bman new").yellow()
        );
        println!();
        return Ok(());
    }

    let status = state.manager.status().await;
    let catalogs = state.manager.catalogs();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Faction").fg(Color::White),
        Cell::new("Set").fg(Color::White),
        Cell::new("Skills").fg(Color::White),
        Cell::new("Id").fg(Color::White),
    ]);

    for build in &builds {
        let marker = match status.state.build() {
            Some(current) if current.id == build.id && status.expired => {
                Cell::new("◐").fg(Color::Yellow)
            }
            Some(current) if current.id == build.id => Cell::new("●").fg(Color::Green),
            _ => Cell::new(""),
        };

        table.add_row(vec![
            marker,
            Cell::new(&build.name),
            Cell::new(fraction_name(catalogs, &build.fraction)),
            Cell::new(inventory_name(catalogs, &build.inventory)),
            Cell::new(build.skill.len()),
            Cell::new(build.id.as_str()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} build{}",
        builds.len(),
        if builds.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show the full contents of one build.
pub async fn show_build(state: &AppState, query: &str, json: bool) -> Result<()> {
    let build = resolve(state, query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&build)?);
        return Ok(());
    }

    let catalogs = state.manager.catalogs();
    let active = state.manager.tracker().equals(&build).await;

    println!();
    println!(
        "  {} {}",
        style(&build.name).cyan().bold(),
        if active {
            style("(active)").green().to_string()
        } else {
            String::new()
        }
    );
    println!();
    println!("  {}  {}", style("Id:").bold(), style(build.id.as_str()).dim());
    println!(
        "  {}  {} ({})",
        style("Faction:").bold(),
        fraction_name(catalogs, &build.fraction),
        build.fraction
    );
    println!(
        "  {}  {} ({})",
        style("Set:").bold(),
        inventory_name(catalogs, &build.inventory),
        build.inventory
    );

    println!();
    println!("  {}", style("── Attributes ──").dim());
    for (attribute, points) in build.attribute.entries() {
        println!("  {:<10} {}", attribute.as_str(), style(points).bold());
    }

    println!();
    println!("  {}", style("── Army ──").dim());
    let slots: Vec<String> = build.army.iter().map(|n| n.to_string()).collect();
    println!("  {}", slots.join("  "));

    println!();
    println!("  {}", style("── Skills ──").dim());
    if build.skill.is_empty() {
        println!("  {}", style("none").dim());
    }
    for skill in &build.skill {
        let name = catalogs.skill.get(skill).map(|s| s.name).unwrap_or("?");
        println!("  {} {} {}", style("•").dim(), name, style(skill.as_str()).dim());
    }
    println!();

    Ok(())
}

pub async fn new_build(state: &AppState, name: Option<String>, json: bool) -> Result<()> {
    let mut build = state.manager.repository().create_default().await?;

    if let Some(name) = name {
        build.name = name;
        build = state
            .manager
            .update(&build)
            .await?
            .ok_or_else(|| anyhow!("Build '{}' vanished while renaming", build.id))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&build)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Created {} {}",
        style("✓").green().bold(),
        style(&build.name).cyan(),
        style(build.id.as_str()).dim()
    );
    println!();
    Ok(())
}

pub async fn duplicate_build(state: &AppState, query: &str, json: bool) -> Result<()> {
    let source = resolve(state, query).await?;
    let copy = state
        .manager
        .repository()
        .duplicate(&source)
        .await?
        .ok_or_else(|| anyhow!("Build '{query}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&copy)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Duplicated as {} {}",
        style("✓").green().bold(),
        style(&copy.name).cyan(),
        style(copy.id.as_str()).dim()
    );
    println!();
    Ok(())
}

pub async fn remove_build(state: &AppState, query: &str, force: bool, json: bool) -> Result<()> {
    let build = resolve(state, query).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete build '{}'?", build.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state
        .manager
        .repository()
        .remove(&build)
        .await?
        .ok_or_else(|| anyhow!("Build '{query}' not found"))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "removed": removed.removed,
                "next": removed.next,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} Deleted {}",
        style("✓").green().bold(),
        style(&removed.removed.name).cyan()
    );
    if let Some(next) = &removed.next {
        println!("  Next in list: {}", style(&next.name).dim());
    }
    println!();
    Ok(())
}

pub async fn edit_build(state: &AppState, args: &EditArgs, json: bool) -> Result<()> {
    let build = resolve(state, &args.build).await?;
    let edited = apply_edits(build, args, state.manager.catalogs())?;

    let saved = state
        .manager
        .update(&edited)
        .await?
        .ok_or_else(|| anyhow!("Build '{}' not found", args.build))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }

    let expired = state.manager.status().await.expired;
    println!();
    println!("  {} Saved {}", style("✓").green().bold(), style(&saved.name).cyan());
    if expired {
        println!(
            "  {} The active build changed; run {} to push it to the game.",
            style("!").yellow().bold(),
            style(format!("bman apply {}", saved.id)).yellow()
        );
    }
    println!();
    Ok(())
}

/// Apply the edit flags to `build`, validating ids against the catalogs.
fn apply_edits(mut build: Build, args: &EditArgs, catalogs: &Catalogs) -> Result<Build> {
    if let Some(name) = &args.name {
        if name.trim().is_empty() {
            bail!("Build name must not be empty");
        }
        build.name = name.clone();
    }

    if let Some(fraction) = &args.fraction {
        let id = FractionId::from(fraction.as_str());
        if !catalogs.fraction.contains(&id) {
            bail!("Unknown faction '{fraction}' (see `bman catalog fractions`)");
        }
        build.fraction = id;
    }

    if let Some(inventory) = &args.inventory {
        let id = InventoryId::from(inventory.as_str());
        if !catalogs.inventory.contains(&id) {
            bail!("Unknown equipment set '{inventory}' (see `bman catalog inventory`)");
        }
        build.inventory = id;
    }

    for pair in &args.attribute {
        let (attribute, points) = parse_attribute(pair)?;
        build.attribute.set(attribute, points);
    }

    if let Some(army) = &args.army {
        build.army = parse_army(army)?;
    }

    if args.clear_skills {
        build.skill.clear();
    }
    for skill in &args.skill {
        let id = SkillId::from(skill.as_str());
        if !catalogs.skill.contains(&id) {
            bail!("Unknown skill '{skill}' (see `bman catalog skills`)");
        }
        build.add_skill(id);
    }

    Ok(build)
}

fn parse_attribute(pair: &str) -> Result<(Attribute, u32)> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected NAME=VALUE, got '{pair}'"))?;
    let attribute = name.trim().parse::<Attribute>().map_err(|e| anyhow!(e))?;
    let points = value
        .trim()
        .parse::<u32>()
        .map_err(|_| anyhow!("Invalid point count '{value}' for {attribute}"))?;
    Ok((attribute, points))
}

fn parse_army(list: &str) -> Result<Army> {
    let mut army = [0; ARMY_SLOTS];
    let values: Vec<&str> = list.split(',').map(str::trim).collect();
    if values.len() > ARMY_SLOTS {
        bail!("An army has {ARMY_SLOTS} slots, got {}", values.len());
    }
    for (slot, value) in values.into_iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        army[slot] = value
            .parse()
            .map_err(|_| anyhow!("Invalid troop count '{value}' in slot {}", slot + 1))?;
    }
    Ok(army)
}

pub(crate) fn fraction_name(catalogs: &Catalogs, id: &FractionId) -> String {
    catalogs
        .fraction
        .get(id)
        .map(|f| f.name.to_string())
        .unwrap_or_else(|| id.to_string())
}

pub(crate) fn inventory_name(catalogs: &Catalogs, id: &InventoryId) -> String {
    catalogs.inventory.name(id).unwrap_or_else(|| id.to_string())
}

/// One-word label for an [`ActiveState`].
pub(crate) fn state_label(state: &ActiveState) -> &'static str {
    match state {
        ActiveState::Empty => "none",
        ActiveState::Applying => "applying",
        ActiveState::Applied(_) => "applied",
    }
}
