/// Key under which the last picked issue is cached.
pub const CURRENT_ISSUE_KEY: &str = "current-issue";

pub mod github {

    pub const ACCEPT: &str = "application/vnd.github+json";

    pub const API_VERSION: &str = "2022-11-28";
}

pub mod rate_limit {

    /// Advisory wait sent back with a rate-limited response.
    pub const RETRY_AFTER_SECONDS: u64 = 60;
}
