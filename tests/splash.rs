mod common;

use common::{get, send, set_cookies, state_for, TestTree};

#[tokio::test]
async fn brand_query_sets_cookie_and_redirects_to_root() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/?brand=acme", &[])).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers()["location"], "/");
    assert_eq!(resp.headers()["vary"], "Cookie");
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("brand=acme; Max-Age=2592000;"));
}

#[tokio::test]
async fn repeated_brand_query_uses_last_value() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/?brand=first&brand=second", &[])).await;

    assert_eq!(resp.status(), 302);
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("brand=second;"));
}

#[tokio::test]
async fn brand_query_does_not_require_authentication() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/?brand=acme", &[("x-requested-with", "XMLHttpRequest")])).await;

    assert_eq!(resp.status(), 302);
}

#[tokio::test]
async fn invalid_brand_query_is_bad_request() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/?brand=..%2F..%2Fetc", &[])).await;

    assert_eq!(resp.status(), 400);
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn unauthenticated_redirects_to_login() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/", &[])).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers()["location"], "/auth/login/?next=%2F");
}

#[tokio::test]
async fn unauthenticated_xhr_is_unauthorized() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/", &[("x-requested-with", "XMLHttpRequest")])).await;

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn regular_user_goes_to_default_dashboard() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(&state, get("/", &[("x-remote-user", "alice"), ("cookie", "brand=acme")])).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers()["location"], "/settings/");
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("brand=acme;"));
}

#[tokio::test]
async fn superuser_prefers_project_dashboard() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(
        &state,
        get("/", &[("x-remote-user", "root"), ("x-remote-roles", "admin")]),
    )
    .await;

    assert_eq!(resp.headers()["location"], "/project/");
}

#[tokio::test]
async fn superuser_without_project_gets_default() {
    let tree = TestTree::new();
    let mut config = common::config_for(tree.root());
    config.dashboards.registered.retain(|d| d.slug != "project");
    let state = std::sync::Arc::new(brandgate::config::AppState::new(config).unwrap());

    let resp = send(
        &state,
        get("/", &[("x-remote-user", "root"), ("x-remote-roles", "admin")]),
    )
    .await;

    assert_eq!(resp.headers()["location"], "/settings/");
}

#[tokio::test]
async fn logout_reason_is_cleared() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let resp = send(
        &state,
        get("/", &[("x-remote-user", "alice"), ("cookie", "logout_reason=expired; brand=acme")]),
    )
    .await;

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("logout_reason=; Max-Age=0;")));
    assert!(cookies.iter().any(|c| c.starts_with("brand=acme;")));
}

#[tokio::test]
async fn unsupported_method_rejected() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    let req = hyper::Request::builder()
        .method("POST")
        .uri("/?brand=acme")
        .body(())
        .unwrap();
    let resp = send(&state, req).await;

    assert_eq!(resp.status(), 405);
    assert!(resp.headers()["server"].to_str().unwrap().starts_with("brandgate/"));
}

#[tokio::test]
async fn health_and_unknown_paths() {
    let tree = TestTree::new();
    let state = state_for(tree.root());

    assert_eq!(send(&state, get("/healthz", &[])).await.status(), 200);
    assert_eq!(send(&state, get("/readyz", &[])).await.status(), 200);
    assert_eq!(send(&state, get("/nowhere", &[])).await.status(), 404);
}
