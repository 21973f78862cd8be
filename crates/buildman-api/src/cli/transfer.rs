//! Export and import of the whole build list.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use buildman_infra::filesystem::write_export;

use crate::state::AppState;

pub async fn export(state: &AppState, output: Option<&Path>, quiet: bool) -> Result<()> {
    let payload = state.manager.repository().serialize().await?;

    match output {
        Some(path) => {
            write_export(path, &payload)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !quiet {
                println!(
                    "  {} Exported {} builds to {}",
                    style("✓").green().bold(),
                    state.manager.repository().len().await,
                    style(path.display()).dim()
                );
            }
        }
        None => println!("{payload}"),
    }
    Ok(())
}

/// Replace every build with the file's contents. Nothing changes if any
/// entry is invalid; the first problem found is reported.
pub async fn import(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let payload = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let repository = state.manager.repository();
    if let Err(err) = repository.validate_import(&payload) {
        bail!("Import rejected: {err}");
    }
    if !repository.unserialize(&payload).await? {
        bail!("Import rejected");
    }

    let count = repository.len().await;
    if json {
        println!("{}", serde_json::json!({ "imported": count }));
        return Ok(());
    }

    println!();
    println!(
        "  {} Imported {} build{}",
        style("✓").green().bold(),
        count,
        if count == 1 { "" } else { "s" }
    );
    if state.manager.status().await.expired {
        println!(
            "  {} The active build is not among the imported ones.",
            style("!").yellow().bold()
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing;

    #[tokio::test]
    async fn test_export_then_import_into_fresh_state() {
        let (dir, state) = testing::state().await;
        state.manager.repository().create_default().await.unwrap();
        state.manager.repository().create_default().await.unwrap();
        let file = dir.path().join("builds.json");
        export(&state, Some(&file), true).await.unwrap();

        let (_other_dir, other) = testing::state().await;
        import(&other, &file, true).await.unwrap();
        assert_eq!(
            other.manager.repository().list().await,
            state.manager.repository().list().await
        );
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_file_untouched() {
        let (dir, state) = testing::state().await;
        let existing = state.manager.repository().create_default().await.unwrap();
        let file = dir.path().join("bad.json");
        tokio::fs::write(&file, r#"[{"id":"x"}]"#).await.unwrap();

        let err = import(&state, &file, true).await.unwrap_err();
        assert!(err.to_string().starts_with("Import rejected"));
        assert_eq!(state.manager.repository().list().await, vec![existing]);
    }
}
