pub mod issue;

pub use issue::{IssueLabel, IssueRecord, IssueUser, SearchResult};
