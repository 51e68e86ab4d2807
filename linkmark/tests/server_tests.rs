// End-to-end tests for the bookmarks JSON API

use linkmark::server::{AppState, serve};
use linkmark_core::bookmark::MetadataPolicy;
use linkmark_core::data::Database;
use linkmark_scanner::Scraper;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn start_api(policy: MetadataPolicy) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = AppState::new(
        Scraper::new().unwrap(),
        Database::in_memory().unwrap(),
        policy,
        Duration::from_secs(5),
    );
    tokio::spawn(serve(listener, state));

    format!("http://{}/api/bookmarks", addr)
}

async fn start_site() -> MockServer {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(
                    r#"<title>Test Title</title><meta name="description" content="Test Description"><link rel="icon" href="/favicon.ico">"#,
                ),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;
    site
}

#[tokio::test]
async fn test_create_get_list_delete() {
    let site = start_site().await;
    let api = start_api(MetadataPolicy::Strict).await;
    let client = reqwest::Client::new();
    let page = format!("{}/page", site.uri());

    // Create
    let res = client
        .post(&api)
        .json(&json!({ "url": page }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    let bookmark = &body["bookmark"];
    assert_eq!(bookmark["url"], page.as_str());
    assert_eq!(bookmark["title"], "Test Title");
    assert_eq!(bookmark["description"], "Test Description");
    assert_eq!(
        bookmark["favicon_url"],
        format!("{}/favicon.ico", site.uri()).as_str()
    );
    assert!(body.get("error").is_none());
    let id = bookmark["id"].as_i64().unwrap();

    // Get
    let res = client.get(format!("{}/{}", api, id)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bookmark"]["id"], id);

    // List
    let res = client.get(&api).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bookmarks"].as_array().unwrap().len(), 1);

    // Delete
    let res = client.delete(format!("{}/{}", api, id)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    // Gone
    let res = client.get(format!("{}/{}", api, id)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let res = client.delete(format!("{}/{}", api, id)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_empty_is_array() {
    let api = start_api(MetadataPolicy::Strict).await;
    let body: Value = reqwest::get(&api).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({ "bookmarks": [] }));
}

#[tokio::test]
async fn test_extraction_failure_is_bad_request() {
    let site = start_site().await;
    let api = start_api(MetadataPolicy::Strict).await;
    let client = reqwest::Client::new();

    let res = client
        .post(&api)
        .json(&json!({ "url": format!("{}/down", site.uri()) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert!(body.get("bookmark").is_none());

    let res = client
        .post(&api)
        .json(&json!({ "url": "ftp://example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = reqwest::get(&api).await.unwrap().json().await.unwrap();
    assert!(body["bookmarks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_best_effort_server_keeps_bookmark() {
    let site = start_site().await;
    let api = start_api(MetadataPolicy::BestEffort).await;
    let client = reqwest::Client::new();

    let res = client
        .post(&api)
        .json(&json!({ "url": format!("{}/down", site.uri()) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bookmark"]["title"], "");
}

#[tokio::test]
async fn test_bad_body_is_bad_request() {
    let api = start_api(MetadataPolicy::Strict).await;
    let client = reqwest::Client::new();

    let res = client
        .post(&api)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let api = start_api(MetadataPolicy::Strict).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/abc", api)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let res = client.delete(format!("{}/-1", api)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_overflowing_id_is_bad_request() {
    let api = start_api(MetadataPolicy::Strict).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/99999999999999999999999", api))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid bookmark ID");
}

#[tokio::test]
async fn test_cors_headers_and_preflight() {
    let api = start_api(MetadataPolicy::Strict).await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, &api)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        res.headers()["access-control-allow-methods"],
        "GET, POST, DELETE, OPTIONS"
    );

    let res = client.get(&api).send().await.unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}
