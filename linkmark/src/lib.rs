pub mod handlers;
pub mod server;

// Re-export commonly used helpers for convenience
pub use handlers::{load_urls_from_file, parse_bookmark_id, parse_url_line, resolve_db_path};
pub use server::{AppState, router};
