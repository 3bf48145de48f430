//! Integration tests for the OAuth routes.
//!
//! The handshake never reaches a real provider: these tests exercise the
//! authorize redirect and the callback's CSRF validation, both of which are
//! served entirely by this process.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;

use bazaar_integration_tests::TestContext;

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .expect("redirect without Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_begin_redirects_to_provider() {
    let ctx = TestContext::with_google().await;

    let resp = ctx
        .client
        .get(ctx.url("/auth/google"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let target = location(&resp);
    assert!(target.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(target.contains("client_id=test-google-client-id"));
    assert!(target.contains("state="));
    assert!(target.contains("code_challenge="));
    assert!(target.contains("redirect_uri="));
}

#[tokio::test]
async fn test_begin_issues_fresh_state_each_time() {
    let ctx = TestContext::with_google().await;

    let first = ctx
        .client
        .get(ctx.url("/auth/google"))
        .send()
        .await
        .unwrap();
    let second = ctx
        .client
        .get(ctx.url("/auth/google"))
        .send()
        .await
        .unwrap();

    assert_ne!(location(&first), location(&second));
}

#[tokio::test]
async fn test_callback_with_unknown_state_fails() {
    let ctx = TestContext::with_google().await;

    // Start a handshake so a pending state exists, then come back with a
    // different one.
    ctx.client
        .get(ctx.url("/auth/google"))
        .send()
        .await
        .unwrap();

    let resp = ctx
        .client
        .get(ctx.url("/auth/google/callback?code=abc&state=bogus"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/?auth=fail");
}

#[tokio::test]
async fn test_callback_without_pending_handshake_fails() {
    let ctx = TestContext::with_google().await;

    let resp = ctx
        .client
        .get(ctx.url("/auth/google/callback?code=abc&state=whatever"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/?auth=fail");
}

#[tokio::test]
async fn test_callback_missing_code_fails() {
    let ctx = TestContext::with_google().await;

    let resp = ctx
        .client
        .get(ctx.url("/auth/google/callback?state=abc"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/?auth=fail");
}

#[tokio::test]
async fn test_callback_provider_error_fails() {
    let ctx = TestContext::with_google().await;

    let resp = ctx
        .client
        .get(ctx.url("/auth/google/callback?error=access_denied"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/?auth=fail");
}

#[tokio::test]
async fn test_unconfigured_provider_routes_are_absent() {
    let ctx = TestContext::with_google().await;

    // Facebook and Discord have no credentials in this context, so their
    // routes were never registered.
    for path in [
        "/auth/facebook",
        "/auth/facebook/callback",
        "/auth/discord",
        "/auth/discord/callback",
    ] {
        let resp = ctx.client.get(ctx.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_no_providers_configured_disables_all_oauth_routes() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/auth/google"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The rest of the API is unaffected.
    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
