pub mod context;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod result;

pub use context::FetchContext;
pub use error::{FetchCause, ScanError};
pub use extract::extract_metadata;
pub use fetcher::{Scraper, ScraperConfig, validate_url};
pub use result::Metadata;
