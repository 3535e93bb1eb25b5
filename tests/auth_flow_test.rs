use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use folio::{
    CredentialPolicy, FolioService, HashmapUserStore, InMemoryRateLimiter, JwtAuthConfig,
    MockEmailClient, Secret,
};
use regex::Regex;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    email_client: MockEmailClient,
}

fn test_app() -> TestApp {
    let email_client = MockEmailClient::new();
    let service = FolioService::new(
        HashmapUserStore::new(),
        email_client.clone(),
        InMemoryRateLimiter::new(chrono::Duration::minutes(15), 5),
        JwtAuthConfig {
            jwt_cookie_name: "token".to_string(),
            jwt_secret: Secret::from("test_secret".to_string()),
            token_ttl_in_seconds: 604_800,
        },
        CredentialPolicy::default(),
    );

    TestApp {
        router: service.as_nested_router(None),
        email_client,
    }
}

impl TestApp {
    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Option<String>, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, set_cookie, body)
    }

    async fn signup(&self, email: &str, username: &str) -> (StatusCode, Option<String>, Value) {
        self.post(
            "/signup",
            json!({ "email": email, "username": username, "password": "password123" }),
        )
        .await
    }

    async fn latest_verification_code(&self) -> String {
        let re = Regex::new(r"\b(\d{6})\b").unwrap();
        let sent = self.email_client.sent().await;
        let last = sent.last().expect("no email was sent");
        re.captures(&last.content).expect("no code in email")[1].to_string()
    }

    async fn latest_reset_token(&self) -> String {
        let re = Regex::new(r"\b([0-9a-f]{64})\b").unwrap();
        let sent = self.email_client.sent().await;
        let last = sent.last().expect("no email was sent");
        re.captures(&last.content).expect("no token in email")[1].to_string()
    }
}

#[tokio::test]
async fn signup_then_verify_issues_a_session() {
    let app = test_app();

    let (status, _, body) = app.signup("darsh@example.com", "darsh").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "darsh@example.com");
    assert_eq!(body["isEmailVerified"], false);

    let code = app.latest_verification_code().await;
    let (status, cookie, body) = app
        .post(
            "/verify-email",
            json!({ "email": "darsh@example.com", "code": code }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isEmailVerified"], true);
    let cookie = cookie.expect("verification should set a session cookie");
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn signup_rejects_duplicates() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;

    let (status, _, _) = app.signup("darsh@example.com", "other_name").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = app.signup("other@example.com", "darsh").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_rejects_invalid_input() {
    let app = test_app();

    let (status, _, _) = app.signup("not-an-email", "darsh").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = app.signup("darsh@example.com", "Bad Username!").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = app
        .post(
            "/signup",
            json!({ "email": "darsh@example.com", "username": "darsh", "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verifying_twice_looks_like_a_bad_code() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;
    let code = app.latest_verification_code().await;

    let (status, _, _) = app
        .post(
            "/verify-email",
            json!({ "email": "darsh@example.com", "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Replaying the code must not reveal that the account is verified.
    let (status, cookie, body) = app
        .post(
            "/verify-email",
            json!({ "email": "darsh@example.com", "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
    assert_eq!(body["error"], "Invalid or expired verification code");
}

#[tokio::test]
async fn resending_a_code_invalidates_the_previous_one() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;
    let first_code = app.latest_verification_code().await;

    app.post("/resend-code", json!({ "email": "darsh@example.com" }))
        .await;
    let second_code = app.latest_verification_code().await;
    assert_ne!(first_code, second_code);

    // Generate and persist are separate steps, so concurrent resends race on
    // the stored code; the last write wins. Sequentially that means only the
    // newest code is accepted.
    let (status, _, _) = app
        .post(
            "/verify-email",
            json!({ "email": "darsh@example.com", "code": first_code }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app
        .post(
            "/verify-email",
            json!({ "email": "darsh@example.com", "code": second_code }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_before_verification_resends_a_code() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;
    assert_eq!(app.email_client.sent().await.len(), 1);

    let (status, cookie, _) = app
        .post(
            "/login",
            json!({ "email": "darsh@example.com", "password": "password123" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
    assert_eq!(app.email_client.sent().await.len(), 2);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;
    let code = app.latest_verification_code().await;
    app.post(
        "/verify-email",
        json!({ "email": "darsh@example.com", "code": code }),
    )
    .await;

    let (status, _, _) = app
        .post(
            "/login",
            json!({ "email": "darsh@example.com", "password": "wrong_password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, cookie, _) = app
        .post(
            "/login",
            json!({ "email": "darsh@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie.is_some());
}

#[tokio::test]
async fn password_reset_flow_and_token_single_use() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;
    let code = app.latest_verification_code().await;
    app.post(
        "/verify-email",
        json!({ "email": "darsh@example.com", "code": code }),
    )
    .await;

    let (status, _, _) = app
        .post("/forgot-password", json!({ "email": "darsh@example.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = app.latest_reset_token().await;
    let (status, _, _) = app
        .post(
            "/reset-password",
            json!({
                "email": "darsh@example.com",
                "token": token,
                "newPassword": "fresh_password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer works, the new one does.
    let (status, _, _) = app
        .post(
            "/login",
            json!({ "email": "darsh@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app
        .post(
            "/login",
            json!({ "email": "darsh@example.com", "password": "fresh_password" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The token was consumed by the first reset.
    let (status, _, _) = app
        .post(
            "/reset-password",
            json!({
                "email": "darsh@example.com",
                "token": token,
                "newPassword": "another_password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forgot_password_for_unknown_email_is_generic() {
    let app = test_app();

    let (status, _, body) = app
        .post("/forgot-password", json!({ "email": "ghost@example.com" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("If an account"));
    assert!(app.email_client.sent().await.is_empty());
}

#[tokio::test]
async fn rate_limit_kicks_in_after_five_attempts() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;

    for _ in 0..5 {
        let (status, _, _) = app
            .post("/resend-code", json!({ "email": "darsh@example.com" }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let request = Request::builder()
        .method("POST")
        .uri("/resend-code")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "darsh@example.com" }).to_string(),
        ))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .expect("429 must carry Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["retryAfterSeconds"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn check_username_reports_availability() {
    let app = test_app();
    app.signup("darsh@example.com", "darsh").await;

    let (status, _, body) = app
        .post("/check-username", json!({ "username": "darsh" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    let (_, _, body) = app
        .post("/check-username", json!({ "username": "someone_else" }))
        .await;
    assert_eq!(body["available"], true);
}

#[tokio::test]
async fn sign_out_removes_the_session_cookie() {
    let app = test_app();

    let (status, cookie, _) = app.post("/sign-out", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    let cookie = cookie.expect("sign-out should send a removal cookie");
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
}
