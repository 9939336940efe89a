//! In-process test harness: the full app on an in-memory database, driven
//! through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use sweet_server::{Config, ServerState, build_app};

pub const PASSWORD: &str = "secret123";

pub struct TestApp {
    pub state: ServerState,
    router: Router,
}

/// Response with the body parsed as JSON (`Value::Null` when empty)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    /// Token carried by the `Set-Cookie` header
    pub fn session_token(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .and_then(|pair| pair.strip_prefix("token="))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.body["details"]["errors"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// How a request carries its session
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    None,
    Cookie(&'a str),
    Bearer(&'a str),
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = ServerState::initialize(&config)
            .await
            .expect("test server state");
        let router = build_app(&state).with_state(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Auth<'_>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        match auth {
            Auth::None => {}
            Auth::Cookie(token) => {
                builder = builder.header(header::COOKIE, format!("token={token}"));
            }
            Auth::Bearer(token) => {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Auth::Cookie(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Auth::Cookie(token), Some(body))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Auth::Cookie(token), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Auth::Cookie(token), None)
            .await
    }

    pub async fn register(&self, name: &str, email: &str, role: Option<&str>) -> TestResponse {
        let mut body = json!({ "name": name, "email": email, "password": PASSWORD });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.request(Method::POST, "/api/auth/register", Auth::None, Some(body))
            .await
    }

    /// Register a user and return its session token
    pub async fn user_token(&self, email: &str) -> String {
        let response = self.register("Test User", email, None).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.session_token().expect("session cookie")
    }

    /// Register an admin and return its session token
    pub async fn admin_token(&self, email: &str) -> String {
        let response = self.register("Test Admin", email, Some("admin")).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.session_token().expect("session cookie")
    }

    /// Create a sweet as `admin` and return its id
    pub async fn create_sweet(
        &self,
        admin: &str,
        name: &str,
        category: &str,
        price: f64,
        quantity: i64,
    ) -> String {
        let response = self
            .post(
                "/api/sweets",
                admin,
                json!({ "name": name, "category": category, "price": price, "quantity": quantity }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_str().expect("sweet id").to_string()
    }
}
