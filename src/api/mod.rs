//! REST adapter for the user administration backend.
//!
//! Every operation issues exactly one request and maps the outcome onto
//! [`ClientError`]: transport failures become `Network`, non-2xx responses
//! become `Server` with the body's `error` text or the call site's fallback.
pub mod models;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
pub use models::{Credentials, Token, UserId, UserPayload, UserRecord};
use models::{ErrorBody, TokenResponse};

/// Backend address used when neither the CLI nor the config file sets one.
pub const DEFAULT_BASE_URL: &str = "http://192.168.1.89:5000";

pub const ADMIN_USERS_PATH: &str = "/admin/users";
pub const USER_REGISTER_PATH: &str = "/users/register";

/// Actor kind; selects the login endpoint and the dashboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn login_path(self) -> &'static str {
        match self {
            Role::Admin => "/login",
            Role::User => "/users/login",
        }
    }

    /// Shown when a rejected login carries no `error` text.
    pub fn login_fallback(self) -> &'static str {
        match self {
            Role::Admin => "Invalid credentials",
            Role::User => "Could not sign in",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::User => "User",
        }
    }
}

pub fn user_path(id: UserId) -> String {
    format!("{ADMIN_USERS_PATH}/{id}")
}

/// Thin wrapper over a shared `reqwest::Client` bound to one backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "request");
        self.http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Response, ClientError> {
        dispatch(self.request(method, path).json(body), fallback).await
    }

    async fn send_empty(&self, method: Method, path: &str, fallback: &str) -> Result<Response, ClientError> {
        dispatch(self.request(method, path), fallback).await
    }

    /// `POST /login` or `POST /users/login`.
    pub async fn login(&self, role: Role, credentials: &Credentials) -> Result<Token, ClientError> {
        let resp = self
            .send_json(Method::POST, role.login_path(), credentials, role.login_fallback())
            .await?;
        let body: TokenResponse = decode(resp).await?;
        Ok(body.token)
    }

    /// `POST /users/register`.
    pub async fn register(&self, payload: &UserPayload) -> Result<(), ClientError> {
        self.send_json(Method::POST, USER_REGISTER_PATH, payload, "Could not register")
            .await
            .map(drop)
    }

    /// `GET /admin/users`, in server order.
    pub async fn list_users(&self, fallback: &str) -> Result<Vec<UserRecord>, ClientError> {
        let resp = self.send_empty(Method::GET, ADMIN_USERS_PATH, fallback).await?;
        decode(resp).await
    }

    /// `POST /admin/users`.
    pub async fn create_user(&self, payload: &UserPayload) -> Result<(), ClientError> {
        self.send_json(Method::POST, ADMIN_USERS_PATH, payload, "Could not create user")
            .await
            .map(drop)
    }

    /// `PUT /admin/users/:id`, replacing the whole record.
    pub async fn update_user(&self, id: UserId, payload: &UserPayload) -> Result<(), ClientError> {
        self.send_json(Method::PUT, &user_path(id), payload, "Could not update user")
            .await
            .map(drop)
    }

    /// `DELETE /admin/users/:id`.
    pub async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &user_path(id), "Could not delete user")
            .await
            .map(drop)
    }
}

async fn dispatch(req: RequestBuilder, fallback: &str) -> Result<Response, ClientError> {
    let resp = req.send().await.map_err(|e| {
        tracing::error!(error = %e, "request did not complete");
        ClientError::network(e)
    })?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    tracing::warn!(status = status.as_u16(), %message, "request rejected");
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    resp.json::<T>().await.map_err(|e| {
        tracing::error!(error = %e, "unreadable response body");
        ClientError::network(e)
    })
}
