// tests/e2e_token_redemption.rs
use axum::http::StatusCode;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use sha2::{Digest, Sha256};
use tower::util::ServiceExt as _;

mod support;
use support::*;

const VERIFIER: &str = "redemption-test-verifier-0123456789abcdef";

fn s256_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Drive authorize + callback and return the minted one-time code.
async fn mint_code(harness: &TestHarness, challenge: Option<(&str, &str)>) -> String {
    let mut uri = format!(
        "/authorize?response_type=code&redirect_uri={}",
        urlencoded(CLIENT_REDIRECT_URI)
    );
    if let Some((challenge, method)) = challenge {
        uri.push_str(&format!(
            "&code_challenge={challenge}&code_challenge_method={method}"
        ));
    }

    let resp = harness.router.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    let (_, params) = split_location(&location(&resp));
    let composite = params["state"].clone();

    let resp = harness
        .router
        .clone()
        .oneshot(get(&format!("/callback?code=up-code&state={composite}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    let (_, params) = split_location(&location(&resp));
    params["code"].clone()
}

fn urlencoded(v: &str) -> String {
    serde_urlencoded::to_string([("k", v)])
        .unwrap()
        .trim_start_matches("k=")
        .to_string()
}

#[tokio::test]
async fn wrong_verifier_is_invalid_grant() {
    let harness = make_harness();
    let code = mint_code(&harness, Some((&s256_challenge(VERIFIER), "S256"))).await;

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("code_verifier", "not-the-right-verifier-at-all-000000000000"),
            ],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn missing_verifier_when_challenge_stored_is_invalid_request() {
    let harness = make_harness();
    let code = mint_code(&harness, Some((&s256_challenge(VERIFIER), "S256"))).await;

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[("grant_type", "authorization_code"), ("code", &code)],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}

#[tokio::test]
async fn mismatched_redirect_uri_is_invalid_grant() {
    let harness = make_harness();
    let code = mint_code(&harness, None).await;

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("redirect_uri", "https://attacker.example/cb"),
            ],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn plain_method_challenge_verifies_by_equality() {
    let harness = make_harness();
    let code = mint_code(&harness, Some((VERIFIER, "plain"))).await;

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("code_verifier", VERIFIER),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn code_without_challenge_redeems_without_verifier() {
    let harness = make_harness();
    let code = mint_code(&harness, None).await;

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("redirect_uri", CLIENT_REDIRECT_URI),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_code_is_invalid_grant() {
    let harness = make_harness();
    let code = mint_code(&harness, None).await;

    harness.clock.advance(chrono::Duration::seconds(601));

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[("grant_type", "authorization_code"), ("code", &code)],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn unknown_code_is_invalid_grant() {
    let harness = make_harness();

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "authorization_code"),
                ("code", "never-minted"),
            ],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn json_body_is_accepted_alongside_form() {
    let harness = make_harness();
    let code = mint_code(&harness, Some((&s256_challenge(VERIFIER), "S256"))).await;

    let resp = harness
        .router
        .clone()
        .oneshot(post_json(
            "/token",
            &json!({
                "grant_type": "authorization_code",
                "code": code,
                "code_verifier": VERIFIER,
                "redirect_uri": CLIENT_REDIRECT_URI,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["access_token"], "upstream-access-token");
}
