use crate::client::SessionClient;
use crate::errors::ApiResult;
use crate::models::User;

/// Container for the authentication state a view layer binds to.
///
/// `user` mirrors the session the backend believes in; `loading` is true for
/// the duration of exactly one in-flight action; `error` retains the message of
/// the latest failing action, overwritten by the next one.
pub struct AuthStore {
    session: SessionClient,
    user: Option<User>,
    loading: bool,
    error: Option<String>,
}

impl AuthStore {
    pub fn new(session: SessionClient) -> Self {
        Self {
            session,
            user: None,
            loading: false,
            error: None,
        }
    }

    /// Establish the initial auth state, typically once at startup.
    ///
    /// Cannot fail: an unreachable backend or a dead session both leave
    /// `user` empty, which is a complete answer for the caller.
    pub async fn init_auth(&mut self) {
        self.loading = true;
        self.user = self.session.fetch_current_user().await;
        self.loading = false;
    }

    /// Log in and adopt the resulting user.
    ///
    /// # Errors
    ///
    /// Re-signals the client failure after recording its message; `user` is
    /// left untouched in that case.
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<Option<User>> {
        self.loading = true;
        self.error = None;
        let result = self.session.login(username, password).await;
        self.loading = false;
        match result {
            Ok(user) => {
                self.user = user.clone();
                Ok(user)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create an account and hand back its record. Registration does not log
    /// in, so `user` stays as it was.
    ///
    /// # Errors
    ///
    /// Re-signals the client failure after recording its message.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> ApiResult<User> {
        self.loading = true;
        self.error = None;
        let result = self.session.register(username, email, password).await;
        self.loading = false;
        match result {
            Ok(user) => Ok(user),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Log out. On success the user is cleared; a failing logout is logged and
    /// otherwise silent, leaving `user` in place. Unlike login/register, there
    /// is nothing useful a view could do with the failure.
    pub async fn logout(&mut self) {
        self.loading = true;
        match self.session.logout().await {
            Ok(()) => self.user = None,
            Err(e) => tracing::error!("logout failed: {e}"),
        }
        self.loading = false;
    }

    /// Re-check the session against the server. Any failure clears `user`.
    pub async fn check_auth_status(&mut self) -> bool {
        self.loading = true;
        self.user = self.session.fetch_current_user().await;
        self.loading = false;
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
