pub mod http_fetcher;
pub mod schedule;

use async_trait::async_trait;

use crate::app::Result;

pub use schedule::ScheduleFetcher;

/// Result of a lenient remote call.
///
/// Network and payload failures are not errors for the caller: they end up
/// here as `Unavailable` and the command carries on with whatever it has.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Unavailable { reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn unavailable(reason: impl ToString) -> Self {
        FetchOutcome::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn fetched(self) -> Option<T> {
        match self {
            FetchOutcome::Fetched(value) => Some(value),
            FetchOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }
}

impl<T: Default> FetchOutcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.fetched().unwrap_or_default()
    }
}

#[async_trait]
pub trait Fetcher {
    /// GET `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
