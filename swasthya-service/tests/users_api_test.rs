mod common;

use axum::http::StatusCode;
use common::{get, test_router};

#[tokio::test]
async fn search_by_name_fragment() {
    let router = test_router();

    let (status, body) = get(&router, "/api/users/search?query=jane").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["users"][0]["email"], "jane.smith@example.com");
    assert_eq!(body["users"][0]["zipCode"], "90001");
    assert!(body.get("searchType").is_none());
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let router = test_router();

    let (_, lower) = get(&router, "/api/users/search?query=john").await;
    let (_, upper) = get(&router, "/api/users/search?query=JOHN").await;

    assert_eq!(lower["count"], upper["count"]);
    // john.doe plus robert.johnson
    assert_eq!(lower["count"], 2);
}

#[tokio::test]
async fn search_without_query_is_rejected() {
    let router = test_router();

    let (status, body) = get(&router, "/api/users/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Search query is required");

    let (status, _) = get(&router, "/api/users/search?query=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_with_no_match_returns_empty_list() {
    let router = test_router();

    let (status, body) = get(&router, "/api/users/search?query=nobody-here").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["users"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn advanced_search_by_zip_code() {
    let router = test_router();

    let (status, body) = get(
        &router,
        "/api/users/search/advanced?query=90001&searchType=address",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["searchType"], "address");
    assert_eq!(body["count"], 1);
    assert_eq!(body["users"][0]["city"], "Los Angeles");
}

#[tokio::test]
async fn advanced_search_scopes_fields() {
    let router = test_router();

    // "example" appears in emails but in no name
    let (_, by_name) = get(&router, "/api/users/search/advanced?query=example&searchType=name").await;
    assert_eq!(by_name["count"], 0);

    let (_, by_email) =
        get(&router, "/api/users/search/advanced?query=example&searchType=email").await;
    assert_eq!(by_email["count"], 5);
}

#[tokio::test]
async fn advanced_search_defaults_to_all_fields() {
    let router = test_router();

    let (status, body) = get(&router, "/api/users/search/advanced?query=Chicago").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["searchType"], "all");
    assert_eq!(body["count"], 1);
    assert_eq!(body["users"][0]["name"], "Robert Johnson");
}
