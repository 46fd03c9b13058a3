//! Client for a four-quadrant (urgency/importance) task manager backed by a
//! session-cookie-authenticated REST API.
//!
//! The crate has three layers:
//!
//! - [`client`]: thin REST clients for the `/auth` and `/tasks` resources,
//!   sharing one cookie-carrying HTTP client.
//! - [`store`]: state containers holding the authenticated user and the
//!   active/completed task lists, with derived quadrant partitions.
//! - [`mock`]: an in-process backend speaking the same protocol, for tests.
//!
//! ```no_run
//! use quadrant_tasks::{client, AuthStore, Config, TaskStore};
//!
//! # async fn run() -> quadrant_tasks::ApiResult<()> {
//! let config = Config::with_base_url("https://tasks.example.com/api");
//! let http = client::build_http(&config.api)?;
//! let base = config.api.base_url;
//!
//! let mut auth = AuthStore::new(client::SessionClient::new(http.clone(), base.clone()));
//! let mut tasks = TaskStore::new(client::TaskClient::new(http, base));
//!
//! auth.login("ana", "hunter2").await?;
//! tasks.fetch_tasks().await?;
//! println!("{} urgent-important tasks", tasks.quadrants().q1.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod mock;
pub mod models;
pub mod store;

pub use client::{build_http, SessionClient, TaskClient};
pub use config::Config;
pub use errors::{ApiError, ApiResult};
pub use models::{Quadrant, Task, TaskPatch, User};
pub use store::{AuthStore, TaskStore};
