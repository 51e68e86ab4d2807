// JSON HTTP API over the bookmark store

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use linkmark_core::bookmark::{BookmarkError, MetadataPolicy, resolve_metadata};
use linkmark_core::data::{DataError, Database};
use linkmark_core::model::{
    BookmarkResponse, BookmarksResponse, CreateBookmarkRequest, DeleteResponse, NewBookmark,
};
use linkmark_scanner::{FetchContext, Scraper};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::handlers::parse_bookmark_id;

#[derive(Clone)]
pub struct AppState {
    scraper: Scraper,
    db: Arc<Mutex<Database>>,
    policy: MetadataPolicy,
    timeout: Duration,
}

impl AppState {
    pub fn new(scraper: Scraper, db: Database, policy: MetadataPolicy, timeout: Duration) -> Self {
        Self {
            scraper,
            db: Arc::new(Mutex::new(db)),
            policy,
            timeout,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/api/bookmarks/{id}",
            get(get_bookmark).delete(delete_bookmark),
        )
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .await
        .context("Server error")
}

async fn cors(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut res = StatusCode::OK.into_response();
        add_cors_headers(res.headers_mut());
        return res;
    }

    let mut res = next.run(req).await;
    add_cors_headers(res.headers_mut());
    res
}

fn add_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// Only digit strings address a bookmark; digits that overflow an i64 are a
// malformed id rather than a missing route.
fn reject_id(raw: &str) -> (StatusCode, &'static str) {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        (StatusCode::BAD_REQUEST, "Invalid bookmark ID")
    } else {
        (StatusCode::NOT_FOUND, "Bookmark not found")
    }
}

// The handler future is dropped if the client disconnects, which aborts any
// in-flight fetch; the context adds the configured deadline on top.
async fn create_bookmark(
    State(state): State<AppState>,
    body: Result<Json<CreateBookmarkRequest>, JsonRejection>,
) -> (StatusCode, Json<BookmarkResponse>) {
    let Ok(Json(req)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(BookmarkResponse::error("Invalid request body")),
        );
    };

    let ctx = FetchContext::new().with_timeout(state.timeout);
    let metadata = match resolve_metadata(&state.scraper, &req.url, &ctx, state.policy).await {
        Ok(metadata) => metadata,
        Err(e) => {
            let err = BookmarkError::from(e);
            info!("Rejected bookmark for {}: {}", req.url, err);
            return (status(err.status_code()), Json(BookmarkResponse::error(err.to_string())));
        }
    };

    let created = {
        let db = state.db.lock().await;
        db.create_bookmark(&NewBookmark::from_metadata(&req.url, &metadata))
    };

    match created {
        Ok(bookmark) => (StatusCode::OK, Json(BookmarkResponse::ok(bookmark))),
        Err(e) => {
            let err = BookmarkError::from(e);
            error!("{}", err);
            (status(err.status_code()), Json(BookmarkResponse::error(err.to_string())))
        }
    }
}

async fn list_bookmarks(State(state): State<AppState>) -> (StatusCode, Json<BookmarksResponse>) {
    let listed = {
        let db = state.db.lock().await;
        db.list_bookmarks()
    };

    match listed {
        Ok(bookmarks) => (
            StatusCode::OK,
            Json(BookmarksResponse {
                bookmarks,
                error: None,
            }),
        ),
        Err(e) => {
            error!("Failed to list bookmarks: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BookmarksResponse {
                    bookmarks: Vec::new(),
                    error: Some(format!("Failed to list bookmarks: {}", e)),
                }),
            )
        }
    }
}

async fn get_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> (StatusCode, Json<BookmarkResponse>) {
    let Some(id) = parse_bookmark_id(&raw_id) else {
        let (code, message) = reject_id(&raw_id);
        return (code, Json(BookmarkResponse::error(message)));
    };

    let fetched = {
        let db = state.db.lock().await;
        db.get_bookmark(id)
    };

    match fetched {
        Ok(bookmark) => (StatusCode::OK, Json(BookmarkResponse::ok(bookmark))),
        Err(DataError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(BookmarkResponse::error("Bookmark not found")),
        ),
        Err(e) => {
            error!("Failed to get bookmark {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BookmarkResponse::error(format!("Failed to get bookmark: {}", e))),
            )
        }
    }
}

async fn delete_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> (StatusCode, Json<DeleteResponse>) {
    let Some(id) = parse_bookmark_id(&raw_id) else {
        let (code, message) = reject_id(&raw_id);
        return (
            code,
            Json(DeleteResponse {
                success: false,
                error: Some(message.to_string()),
            }),
        );
    };

    let deleted = {
        let db = state.db.lock().await;
        db.delete_bookmark(id)
    };

    match deleted {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success: true,
                error: None,
            }),
        ),
        Err(DataError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(DeleteResponse {
                success: false,
                error: Some("Bookmark not found".to_string()),
            }),
        ),
        Err(e) => {
            error!("Failed to delete bookmark {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteResponse {
                    success: false,
                    error: Some(format!("Failed to delete bookmark: {}", e)),
                }),
            )
        }
    }
}
