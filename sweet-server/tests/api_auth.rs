//! Auth flows over the full middleware stack

mod common;

use common::{Auth, PASSWORD, TestApp};
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::{Role, User};
use sweet_server::Config;

#[tokio::test]
async fn register_sets_session_cookie() {
    let app = TestApp::new().await;

    let response = app
        .register("  Alice  ", "  Alice@Example.COM ", None)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let user = &response.body["user"];
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["role"], "user");
    assert!(user["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(user.get("password").is_none());
    assert!(user.get("hash_pass").is_none());

    let cookie = response.set_cookie().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn register_duplicate_email() {
    let app = TestApp::new().await;
    app.user_token("bob@example.com").await;

    let response = app.register("Bob Again", "BOB@example.com", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.message(), "User with this email already exists");
}

#[tokio::test]
async fn register_validation_errors() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Auth::None,
            Some(json!({ "name": "A", "email": "not-an-email", "password": "123" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let errors = response.errors();
    assert_eq!(errors.len(), 3, "{errors:?}");
    assert!(errors.contains(&"Valid email is required".to_string()));
    assert!(errors.contains(&"Password must be at least 6 characters".to_string()));
    assert_eq!(response.message(), errors[0]);

    let response = app.register("Carol", "carol@example.com", Some("owner")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Role must be either admin or user");
}

#[tokio::test]
async fn register_malformed_json() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Auth::None,
            Some(json!(["not", "an", "object"])),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 2);
}

#[tokio::test]
async fn admin_signup_can_be_disabled() {
    let config = Config {
        allow_admin_signup: false,
        ..Config::for_tests()
    };
    let app = TestApp::with_config(config).await;

    let response = app
        .register("Mallory", "mallory@example.com", Some("admin"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.session_token().is_none());

    // plain users can still sign up
    app.user_token("dave@example.com").await;
}

#[tokio::test]
async fn login_success_and_failures() {
    let app = TestApp::new().await;
    app.user_token("erin@example.com").await;

    let ok = app
        .request(
            Method::POST,
            "/api/auth/login",
            Auth::None,
            Some(json!({ "email": " ERIN@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["user"]["email"], "erin@example.com");
    assert!(ok.session_token().is_some());

    let wrong_password = app
        .request(
            Method::POST,
            "/api/auth/login",
            Auth::None,
            Some(json!({ "email": "erin@example.com", "password": "wrong-password" })),
        )
        .await;
    let unknown_email = app
        .request(
            Method::POST,
            "/api/auth/login",
            Auth::None,
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        )
        .await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.message(), "Invalid credentials");
        assert!(response.session_token().is_none());
    }
    assert_eq!(wrong_password.body, unknown_email.body);

    let missing = app
        .request(
            Method::POST,
            "/api/auth/login",
            Auth::None,
            Some(json!({ "email": "erin@example.com" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.message(), "Password is required");
}

#[tokio::test]
async fn me_with_cookie_or_bearer() {
    let app = TestApp::new().await;
    let token = app.admin_token("frank@example.com").await;

    for auth in [Auth::Cookie(&token), Auth::Bearer(&token)] {
        let response = app.request(Method::GET, "/api/auth/me", auth, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["user"]["email"], "frank@example.com");
        assert_eq!(response.body["user"]["role"], "admin");
    }
}

#[tokio::test]
async fn me_requires_valid_token() {
    let app = TestApp::new().await;

    let missing = app
        .request(Method::GET, "/api/auth/me", Auth::None, None)
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.message(), "Access token is required");

    let garbage = app
        .request(Method::GET, "/api/auth/me", Auth::Bearer("not.a.jwt"), None)
        .await;
    assert_eq!(garbage.status, StatusCode::FORBIDDEN);
    assert_eq!(garbage.message(), "Invalid or expired token");
}

#[tokio::test]
async fn me_for_deleted_account() {
    let app = TestApp::new().await;

    let ghost = User {
        id: "0000000000000000000000000000dead".into(),
        name: "Ghost".into(),
        email: "ghost@example.com".into(),
        role: Role::User,
        created_at: "2024-01-01T00:00:00.000Z".into(),
    };
    let token = app.state.get_jwt_service().generate_token(&ghost).unwrap();

    let response = app.get("/api/auth/me", &token).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = TestApp::new().await;

    // works without a session
    let response = app
        .request(Method::POST, "/api/auth/logout", Auth::None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    let cookie = response.set_cookie().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = TestApp::new().await;

    let health = app.request(Method::GET, "/health", Auth::None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "OK");
    assert!(health.body["timestamp"].is_string());
    assert!(health.headers.contains_key("x-request-id"));

    let detailed = app
        .request(Method::GET, "/health/detailed", Auth::None, None)
        .await;
    assert_eq!(detailed.status, StatusCode::OK);
    assert_eq!(detailed.body["checks"]["database"]["status"], "ok");
    assert_eq!(detailed.body["version"], env!("CARGO_PKG_VERSION"));

    // unknown routes are 404 even without a token
    for uri in ["/nope", "/api/unknown", "/api/sweets/abc/unknown"] {
        let response = app.request(Method::GET, uri, Auth::None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.message(), "Route not found");
        assert_eq!(response.body["code"], 6);
    }
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let app = TestApp::new().await;

    let request = http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/sweets")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(
        sweet_server::build_app(&app.state).with_state(app.state.clone()),
        request,
    )
    .await
    .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
