use crate::data::{DataError, Database};
use crate::model::{Bookmark, NewBookmark};
use futures::stream::{self, StreamExt};
use linkmark_scanner::{FetchContext, Metadata, ScanError, Scraper};
use thiserror::Error;
use tracing::{info, warn};

/// What to do when a page's metadata cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataPolicy {
    /// Reject the bookmark outright.
    #[default]
    Strict,
    /// Store the bookmark with empty metadata. Malformed or non-http URLs are
    /// still rejected.
    BestEffort,
}

#[derive(Error, Debug)]
pub enum BookmarkError {
    #[error("Failed to fetch metadata: {0}")]
    Extraction(#[from] ScanError),

    #[error("Failed to store bookmark: {0}")]
    Storage(#[from] DataError),
}

impl BookmarkError {
    /// HTTP status the transport layer reports for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            BookmarkError::Extraction(_) => 400,
            BookmarkError::Storage(DataError::NotFound(_)) => 404,
            BookmarkError::Storage(_) => 500,
        }
    }
}

/// Fetch metadata for `url` and store a new bookmark row.
pub async fn create_bookmark(
    scraper: &Scraper,
    db: &Database,
    url: &str,
    ctx: &FetchContext,
    policy: MetadataPolicy,
) -> Result<Bookmark, BookmarkError> {
    let metadata = resolve_metadata(scraper, url, ctx, policy).await?;
    let bookmark = db.create_bookmark(&NewBookmark::from_metadata(url, &metadata))?;
    info!("Saved bookmark {} ({})", bookmark.id, bookmark.url);
    Ok(bookmark)
}

/// Run the extraction and apply `policy` to any failure.
pub async fn resolve_metadata(
    scraper: &Scraper,
    url: &str,
    ctx: &FetchContext,
    policy: MetadataPolicy,
) -> Result<Metadata, ScanError> {
    match scraper.get_metadata(url, ctx).await {
        Ok(metadata) => Ok(metadata),
        Err(e) if policy == MetadataPolicy::BestEffort && !e.is_validation() => {
            warn!("Storing {} without metadata: {}", url, e);
            Ok(Metadata::default())
        }
        Err(e) => Err(e),
    }
}

/// Result of importing a single URL.
#[derive(Debug)]
pub struct ImportOutcome {
    pub url: String,
    pub result: Result<Bookmark, BookmarkError>,
}

/// Import many URLs, fetching up to `concurrency` pages at a time.
///
/// Fetches run concurrently on the shared client; rows are written one at a
/// time as fetches finish. Outcomes come back in completion order.
pub async fn import_urls(
    scraper: &Scraper,
    db: &Database,
    urls: Vec<String>,
    ctx: &FetchContext,
    policy: MetadataPolicy,
    concurrency: usize,
) -> Vec<ImportOutcome> {
    let mut fetches = stream::iter(urls)
        .map(|url| async move {
            let metadata = resolve_metadata(scraper, &url, ctx, policy).await;
            (url, metadata)
        })
        .buffer_unordered(concurrency.max(1));

    let mut outcomes = Vec::new();
    while let Some((url, metadata)) = fetches.next().await {
        let result = match metadata {
            Ok(metadata) => db
                .create_bookmark(&NewBookmark::from_metadata(&url, &metadata))
                .map_err(BookmarkError::from),
            Err(e) => Err(BookmarkError::from(e)),
        };

        match result {
            Ok(ref bookmark) => info!("Imported {} as bookmark {}", url, bookmark.id),
            Err(ref e) => warn!("Failed to import {}: {}", url, e),
        }
        outcomes.push(ImportOutcome { url, result });
    }

    outcomes
}
