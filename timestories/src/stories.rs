use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::extract::Extractor;
use crate::fetch::{FetchError, PageSource};
use crate::model::Story;

/// Everything that can go wrong serving the story list.
#[derive(Debug, Error)]
pub enum StoriesError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no stories found")]
    NoStoriesFound,
    #[error("unexpected internal error: {0}")]
    Unexpected(String),
}

impl StoriesError {
    /// HTTP status the API answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            StoriesError::Fetch(_) | StoriesError::NoStoriesFound => 502,
            StoriesError::Unexpected(_) => 500,
        }
    }
}

/// Fetch the homepage, then extract. No retries, no caching.
#[derive(Clone)]
pub struct StoryService {
    source: Arc<dyn PageSource>,
    extractor: Extractor,
}

impl StoryService {
    pub fn new(source: Arc<dyn PageSource>, extractor: Extractor) -> Self {
        Self { source, extractor }
    }

    pub async fn latest(&self) -> Result<Vec<Story>, StoriesError> {
        let url = self.extractor.base_url();
        let page = self.source.fetch(url).await?;

        let extractor = self.extractor.clone();
        let stories = tokio::task::spawn_blocking(move || extractor.extract(&page))
            .await
            .map_err(|e| StoriesError::Unexpected(format!("extraction task failed: {}", e)))?;

        if stories.is_empty() {
            warn!(url, "page fetched but no stories matched");
            return Err(StoriesError::NoStoriesFound);
        }

        Ok(stories)
    }
}
