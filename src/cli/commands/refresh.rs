use crate::config::Config;
use crate::services::WriteOutcome;
use crate::state::{Credentials, SharedState};

pub async fn cmd_refresh(config: Config) -> anyhow::Result<()> {
    let credentials = Credentials::from_env(&config);
    let state = SharedState::new(config, credentials)?;
    let key = state.config.cache.item_key.clone();

    let report = state.issues.refresh().await;

    let issue = match report.issue {
        Ok(issue) => issue,
        Err(e) => anyhow::bail!("Refresh failed: {e}"),
    };

    super::print_issue(&issue);
    println!();

    match report.write {
        Some(WriteOutcome::Written) => println!("✓ Cached as '{key}'"),
        Some(WriteOutcome::Skipped(reason)) => println!("⚠ Cache write skipped: {reason}"),
        Some(WriteOutcome::Failed(reason)) => println!("⚠ Cache write failed: {reason}"),
        None => {}
    }

    Ok(())
}
