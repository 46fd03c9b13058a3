use serde::{Deserialize, Serialize};

/// The current session's account, as returned by the backend (never carries a
/// password field).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
