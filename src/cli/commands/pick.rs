use crate::config::Config;
use crate::state::{Credentials, SharedState};

pub async fn cmd_pick(config: Config) -> anyhow::Result<()> {
    let credentials = Credentials::from_env(&config);
    let state = SharedState::new(config, credentials)?;

    match state.issues.random_issue().await {
        Ok(issue) => {
            super::print_issue(&issue);
            Ok(())
        }
        Err(e) => anyhow::bail!("Failed to pick an issue: {e}"),
    }
}
