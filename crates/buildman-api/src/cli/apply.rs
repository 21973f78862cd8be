//! Active build commands: apply, clear, status.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;

use buildman_observe::change_attrs::{BUILD_NAME, CHANGE_ORIGIN, ORIGIN_CLI};
use buildman_types::current::ActiveState;

use super::build::{fraction_name, inventory_name, resolve, state_label};
use crate::state::AppState;

/// Push a build to the live account and make it the active one.
pub async fn apply_build(
    state: &AppState,
    query: &str,
    force: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let build = resolve(state, query).await?;

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Applying {}...", build.name));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let span = tracing::info_span!(
        "request",
        { CHANGE_ORIGIN } = ORIGIN_CLI,
        { BUILD_NAME } = build.name.as_str()
    );
    let result = state
        .manager
        .apply(build.clone(), force)
        .instrument(span)
        .await;

    spinner.finish_and_clear();
    let applied = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&applied)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} is now active{}",
        style("✓").green().bold(),
        style(&build.name).cyan(),
        if force { " (forced)" } else { "" }
    );
    println!();
    Ok(())
}

pub async fn clear(state: &AppState, json: bool) -> Result<()> {
    state.manager.clear().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state.manager.status().await)?);
        return Ok(());
    }

    println!();
    println!("  {} Active build cleared.", style("✓").green().bold());
    println!();
    Ok(())
}

/// Active build dashboard.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let status = state.manager.status().await;
    let builds = state.manager.repository().len().await;

    if json {
        let value = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "game_url": state.config.game_url,
            "builds": builds,
            "current": status,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let catalogs = state.manager.catalogs();

    println!();
    println!("  {} buildman v{}", style("⚔").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Active build ──").dim());
    match &status.state {
        ActiveState::Applied(build) => {
            println!("  Build:    {}", style(&build.name).cyan().bold());
            println!("  Faction:  {}", fraction_name(catalogs, &build.fraction));
            println!("  Set:      {}", inventory_name(catalogs, &build.inventory));
            if status.expired {
                println!(
                    "  {}",
                    style("Edited since it was applied; re-apply to sync the game.").yellow()
                );
            }
        }
        other => {
            println!("  State:    {}", style(state_label(other)).dim());
        }
    }

    println!();
    println!("  {}", style("── Storage ──").dim());
    println!("  Builds:   {}", style(builds).bold());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Game:     {}", style(&state.config.game_url).dim());
    println!();

    Ok(())
}
