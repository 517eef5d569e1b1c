pub mod cache;
pub use cache::{CacheError, CacheHandle, CacheReader, IssueCache, MemoryIssueCache};

pub mod fetcher;
pub use fetcher::{FetchError, IssueFetcher, IssueSource};

pub mod issue_service;
pub use issue_service::{IssueService, RefreshReport};

pub mod publisher;
pub use publisher::{CachePublisher, WriteOutcome};

pub mod selection;
pub use selection::{select_index, select_random};

#[cfg(test)]
pub(crate) mod fakes;
