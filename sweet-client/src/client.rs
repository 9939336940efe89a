//! HTTP client for the Sweet Shop API

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::ApiResponse;
use shared::models::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, StockChange, Sweet, SweetCreate,
    SweetSearch, SweetUpdate, User,
};

use crate::{ClientError, ClientResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// Client for the Sweet Shop API
///
/// The session cookie is kept in the client's cookie store. The token is
/// also remembered and sent as a Bearer header, so the session survives a
/// server that marks the cookie `Secure` over plain HTTP.
#[derive(Debug, Clone)]
pub struct SweetClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl SweetClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3001`)
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the session token explicitly
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Current session token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========== Auth ==========

    /// `POST /api/auth/register`, signs the new account in
    pub async fn register(&mut self, req: &RegisterRequest) -> ClientResult<User> {
        let resp = self
            .request(Method::POST, "/api/auth/register")
            .json(req)
            .send()
            .await?;
        self.remember_session(&resp);
        let auth: AuthResponse = Self::handle_response(resp).await?;
        Ok(auth.user)
    }

    /// `POST /api/auth/login`
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<User> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .request(Method::POST, "/api/auth/login")
            .json(&req)
            .send()
            .await?;
        self.remember_session(&resp);
        let auth: AuthResponse = Self::handle_response(resp).await?;
        tracing::debug!(user_id = %auth.user.id, "Logged in");
        Ok(auth.user)
    }

    /// `POST /api/auth/logout`, forgets the session locally as well
    pub async fn logout(&mut self) -> ClientResult<()> {
        let resp = self.request(Method::POST, "/api/auth/logout").send().await?;
        self.token = None;
        let _: LogoutResponse = Self::handle_response(resp).await?;
        Ok(())
    }

    /// `GET /api/auth/me`
    pub async fn me(&self) -> ClientResult<User> {
        let auth: AuthResponse = self.get("/api/auth/me").await?;
        Ok(auth.user)
    }

    // ========== Sweets ==========

    pub async fn list_sweets(&self) -> ClientResult<Vec<Sweet>> {
        self.get("/api/sweets").await
    }

    pub async fn create_sweet(&self, sweet: &SweetCreate) -> ClientResult<Sweet> {
        self.send_json(Method::POST, "/api/sweets", sweet).await
    }

    pub async fn get_sweet(&self, id: &str) -> ClientResult<Sweet> {
        self.get(&format!("/api/sweets/{}", id)).await
    }

    pub async fn update_sweet(&self, id: &str, update: &SweetUpdate) -> ClientResult<Sweet> {
        self.send_json(Method::PUT, &format!("/api/sweets/{}", id), update)
            .await
    }

    pub async fn delete_sweet(&self, id: &str) -> ClientResult<()> {
        let resp = self
            .request(Method::DELETE, &format!("/api/sweets/{}", id))
            .send()
            .await?;
        if resp.status().is_success() {
            return Ok(());
        }
        Err(Self::api_error(resp).await)
    }

    pub async fn search_sweets(&self, params: &SweetSearch) -> ClientResult<Vec<Sweet>> {
        let resp = self
            .request(Method::GET, "/api/sweets/search")
            .query(params)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub async fn purchase(&self, id: &str, quantity: i64) -> ClientResult<Sweet> {
        self.send_json(
            Method::POST,
            &format!("/api/sweets/{}/purchase", id),
            &StockChange { quantity },
        )
        .await
    }

    pub async fn restock(&self, id: &str, quantity: i64) -> ClientResult<Sweet> {
        self.send_json(
            Method::POST,
            &format!("/api/sweets/{}/restock", id),
            &StockChange { quantity },
        )
        .await
    }

    // ========== Health ==========

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.get("/health").await
    }

    // ========== Plumbing ==========

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.request(Method::GET, path).send().await?;
        Self::handle_response(resp).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let resp = self.request(method, path).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// Keep the token from a `Set-Cookie: token=...` response header
    fn remember_session(&mut self, resp: &Response) {
        if !resp.status().is_success() {
            return;
        }
        let token = resp
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|cookie| cookie.split(';').next())
            .filter_map(|pair| pair.trim().strip_prefix("token="))
            .find(|t| !t.is_empty())
            .map(str::to_string);
        if token.is_some() {
            self.token = token;
        }
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
        if !resp.status().is_success() {
            return Err(Self::api_error(resp).await);
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "{}: {}",
                e,
                String::from_utf8_lossy(&bytes)
            ))
        })
    }

    async fn api_error(resp: Response) -> ClientError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        parse_api_error(status, &text)
    }
}

/// Build `ClientError::Api` from a status and the raw error body
fn parse_api_error(status: StatusCode, text: &str) -> ClientError {
    match serde_json::from_str::<ApiResponse>(text) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
            details: body.details,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: None,
            message: if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                text.to_string()
            },
            details: None,
        },
    }
}
