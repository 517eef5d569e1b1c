use anyhow::Context;

use crate::config::Config;
use crate::models::IssueRecord;
use crate::state::{Credentials, SharedState};

pub async fn cmd_current(config: Config, raw: bool) -> anyhow::Result<()> {
    let credentials = Credentials::from_env(&config);
    let state = SharedState::new(config, credentials)?;

    let value = state
        .issues
        .current_issue()
        .await
        .context("Failed to read the cached issue")?;

    let Some(value) = value else {
        println!("No issue cached yet.");
        println!();
        println!("Populate it with: issue-roulette refresh");
        return Ok(());
    };

    if raw {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if value.is_object() {
        super::print_issue(&IssueRecord::new(value));
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}
