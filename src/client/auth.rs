use reqwest::StatusCode;

use super::{decode, ensure_success, error_message, network_error};
use crate::errors::{ApiError, ApiResult};
use crate::models::{LoginForm, RegisterForm, User};

/// Client for the `/auth` resource.
///
/// Login establishes a server-side session identified by a cookie; the cookie
/// lives in the shared `reqwest` cookie store, so this struct only tracks the
/// last user the backend reported. That cache is a belief, not a source of
/// truth: the server stays authoritative and the cache is dropped whenever a
/// current-user fetch fails.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
    cache: Option<User>,
}

impl SessionClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            cache: None,
        }
    }

    /// Log in with form-encoded credentials.
    ///
    /// A successful login carries no guaranteed body, only the session cookie,
    /// so the user record is obtained with one follow-up current-user fetch and
    /// returned as that fetch saw it (`None` if the follow-up failed).
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] with the server's message on rejected credentials,
    /// [`ApiError::Network`] on transport failure.
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<Option<User>> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| network_error("login failed", &e))?;

        if !resp.status().is_success() {
            let message = error_message(resp)
                .await
                .unwrap_or_else(|| "login failed".to_string());
            return Err(ApiError::Auth(message));
        }

        tracing::info!("session established for {username}");
        Ok(self.fetch_current_user().await)
    }

    /// Log out and drop the cached user. The cache survives a failed logout so
    /// the client's belief stays aligned with the (still live) server session.
    pub async fn logout(&mut self) -> ApiResult<()> {
        let resp = self
            .http
            .post(format!("{}/auth/logout", self.base_url))
            .send()
            .await
            .map_err(|e| network_error("logout failed", &e))?;
        ensure_success(resp, "logout failed").await?;
        self.cache = None;
        Ok(())
    }

    /// Register a new account. Does not log in and does not touch the cache.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] with the server's message (duplicate username/email),
    /// [`ApiError::Network`] on transport failure.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<User> {
        let form = RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&form)
            .send()
            .await
            .map_err(|e| network_error("registration failed", &e))?;

        if !resp.status().is_success() {
            let message = error_message(resp)
                .await
                .unwrap_or_else(|| "registration failed".to_string());
            return Err(ApiError::Auth(message));
        }

        decode(resp).await
    }

    /// Fetch the user behind the current session cookie.
    ///
    /// Never fails: a 401, a transport error, or an undecodable body all clear
    /// the cache and come back as `None`. The distinction only matters in the
    /// logs.
    pub async fn fetch_current_user(&mut self) -> Option<User> {
        let result = self
            .http
            .get(format!("{}/auth/current-user", self.base_url))
            .send()
            .await;

        let user = match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<User>().await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::error!("failed to decode current user: {e}");
                    None
                }
            },
            Ok(resp) => {
                if resp.status() != StatusCode::UNAUTHORIZED {
                    tracing::warn!("current-user lookup answered {}", resp.status());
                }
                None
            }
            Err(e) => {
                tracing::error!("failed to fetch current user: {e}");
                None
            }
        };

        self.cache = user.clone();
        user
    }

    /// The last user the backend reported, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.cache.as_ref()
    }

    /// Whether the client believes a session is active. A cache hit answers
    /// immediately; otherwise one current-user fetch decides.
    pub async fn is_authenticated(&mut self) -> bool {
        if self.current_user().is_some() {
            return true;
        }
        self.fetch_current_user().await.is_some()
    }
}
