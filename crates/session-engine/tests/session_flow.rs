//! End-to-end session flows against a mock API.

use account_client::ApiClient;
use session_engine::{
    AuthController, EmailVerification, HintStore, RegistrationDraft, SessionHint, SessionManager,
    validate_registration,
};
use std::net::TcpListener;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

struct Harness {
    controller: AuthController,
    session: SessionManager,
    hints: HintStore,
    _dir: TempDir,
}

fn harness(server: &MockServer) -> Harness {
    let dir = TempDir::new().unwrap();
    let hints = HintStore::at_path(dir.path().join("session"));
    let api = Arc::new(ApiClient::new(&server.uri()).unwrap());
    let session = SessionManager::new(Arc::clone(&api), hints.clone());
    let controller = AuthController::new(api, session.clone(), hints.clone());
    Harness {
        controller,
        session,
        hints,
        _dir: dir,
    }
}

#[tokio::test]
async fn login_then_check_session_needs_no_second_credential_entry() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    // The token call sets the session cookie; credentials appear exactly once
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(body_string_contains("username=alice"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "access_token=sess-1; Path=/")
                .set_body_json(serde_json::json!({
                    "access_token": "sess-1",
                    "token_type": "bearer"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Every who-am-I rides on the cookie alone
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/me"))
        .and(header("cookie", "access_token=sess-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com"
        })))
        .mount(&server)
        .await;

    let mut h = harness(&server);

    h.controller.login("alice", "secret").await.unwrap();
    assert_eq!(h.hints.load(), SessionHint::LoggedIn);

    // Immediate check-session succeeds without another credential prompt
    let user = h.session.revalidate().await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn logout_clears_cache_and_hint() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = harness(&server);

    h.controller.login("alice", "secret").await.unwrap();
    assert!(h.session.cached_user().is_some());

    h.controller.logout().await;

    assert!(h.session.cached_user().is_none());
    assert!(!h.hints.load().is_logged_in());
    assert!(!h.controller.is_logged_in());
}

#[tokio::test]
async fn registration_submits_verified_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "verify-tok"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/email/verify"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts"))
        .and(body_json(serde_json::json!({
            "token": "verify-tok",
            "user_id": "alice",
            "user_name": "Alice",
            "password": "secret",
            "email": "alice@example.com",
            "phone_number": null
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).unwrap();
    let mut verification = EmailVerification::new();

    // Submission is blocked until the email is verified
    let draft = RegistrationDraft {
        user_id: "alice",
        password: "secret",
        password_confirm: "secret",
        email: "alice@example.com",
        email_verified: verification.is_verified(),
    };
    assert!(validate_registration(&draft).is_err());

    verification
        .request_code(&api, "alice@example.com")
        .await
        .unwrap();
    verification.submit_code(&api, "123456").await.unwrap();

    let draft = RegistrationDraft {
        email_verified: verification.is_verified(),
        ..draft
    };
    validate_registration(&draft).unwrap();

    let token = verification.token().unwrap().to_string();
    api.register(&account_client::RegisterRequest {
        token,
        user_id: "alice".into(),
        user_name: "Alice".into(),
        password: "secret".into(),
        email: "alice@example.com".into(),
        phone_number: None,
    })
    .await
    .unwrap();
}
