//! In-process stand-in for the reference backend.
//!
//! Speaks the same protocol the real service does: session cookie named
//! `session`, bcrypt-checked credentials, per-user task collection, JSON
//! `{"message": ...}` error bodies. The clients and state containers can be
//! driven end-to-end without a deployment; the integration tests under
//! `tests/` run entirely against this.

mod handlers;
mod store;

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::{from_fn, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use store::MemStore;

/// Session key the logged-in username is stored under.
const SESSION_KEY: &str = "user_session";

/// A mock backend bound to an ephemeral loopback port. The server task is
/// aborted when this handle drops.
pub struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Bind a fresh server with empty state.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("mock server has no address");

        let app = router(MemStore::default());
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                tracing::error!("mock server stopped: {e}");
            }
        });

        tracing::debug!("mock server listening on {addr}");
        Self { addr, handle }
    }

    /// Base URL to hand to [`crate::config::Config::with_base_url`].
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(store: MemStore) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    Router::new()
        // Auth routes
        .route("/auth/login", post(handlers::handle_login))
        .route("/auth/register", post(handlers::handle_register))
        .route("/auth/logout", post(handlers::handle_logout))
        .route("/auth/current-user", get(handlers::current_user))
        // Task routes
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/:id",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        // Add middleware
        .layer(from_fn(require_session))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        // Add state
        .with_state(store)
}

/// Everything except the credential endpoints needs a live session; without
/// one the answer is the 401 body the real backend sends.
async fn require_session(session: Session, req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path();

    if path == "/auth/login" || path == "/auth/register" || path == "/auth/logout" {
        return next.run(req).await;
    }

    match session.get::<String>(SESSION_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        _ => handlers::failure(StatusCode::UNAUTHORIZED, "not authenticated"),
    }
}
