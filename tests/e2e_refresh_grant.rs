// tests/e2e_refresh_grant.rs
use axum::http::StatusCode;
use tower::util::ServiceExt as _;

mod support;
use support::*;
use tollgate::application::ports::upstream::UpstreamTokens;

fn rotated_tokens() -> UpstreamTokens {
    UpstreamTokens {
        access_token: "rotated-access-token".into(),
        refresh_token: Some("rotated-refresh-token".into()),
        expires_in: Some(1800),
        token_type: Some("Bearer".into()),
        scope: None,
    }
}

#[tokio::test]
async fn refresh_is_forwarded_and_rotates() {
    let harness = make_harness();
    harness
        .upstream
        .set_refresh(UpstreamBehavior::Succeed(rotated_tokens()));

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", "original-refresh-token"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["access_token"], "rotated-access-token");
    assert_eq!(json["refresh_token"], "rotated-refresh-token");
    assert_eq!(json["expires_in"], 1800);

    let refreshes = harness.upstream.refreshes.lock().unwrap().clone();
    assert_eq!(refreshes, vec![("original-refresh-token".to_string(), None)]);
}

#[tokio::test]
async fn rotated_token_replay_is_rejected_before_upstream() {
    let harness = make_harness();
    harness
        .upstream
        .set_refresh(UpstreamBehavior::Succeed(rotated_tokens()));

    let refresh = |token: &'static str| {
        post_form(
            "/token",
            &[("grant_type", "refresh_token"), ("refresh_token", token)],
        )
    };

    let resp = harness
        .router
        .clone()
        .oneshot(refresh("original-refresh-token"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Presenting the retired token again must fail locally; upstream sees
    // exactly one call.
    let resp = harness
        .router
        .clone()
        .oneshot(refresh("original-refresh-token"))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
    assert_eq!(harness.upstream.refreshes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn non_rotating_upstream_echoes_original_token() {
    let harness = make_harness();
    harness
        .upstream
        .set_refresh(UpstreamBehavior::Succeed(UpstreamTokens {
            access_token: "fresh-access".into(),
            refresh_token: None,
            expires_in: Some(3600),
            token_type: Some("Bearer".into()),
            scope: None,
        }));

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", "sticky-refresh-token"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["refresh_token"], "sticky-refresh-token");

    // No rotation happened, so presenting the same token again still works.
    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", "sticky-refresh-token"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn upstream_rejection_maps_to_invalid_grant() {
    let harness = make_harness();
    harness.upstream.set_refresh(UpstreamBehavior::Reject);

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", "whatever"),
            ],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn upstream_transport_failure_is_server_error() {
    let harness = make_harness();
    harness.upstream.set_refresh(UpstreamBehavior::FailTransport);

    let resp = harness
        .router
        .clone()
        .oneshot(post_form(
            "/token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", "whatever"),
            ],
        ))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::INTERNAL_SERVER_ERROR, "server_error").await;
}

#[tokio::test]
async fn missing_refresh_token_is_invalid_request() {
    let harness = make_harness();

    let resp = harness
        .router
        .clone()
        .oneshot(post_form("/token", &[("grant_type", "refresh_token")]))
        .await
        .unwrap();
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}
