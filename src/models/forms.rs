use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Create payload. `quadrant` is a plain string at this layer; the backend
/// accepts any value and the typed check happens in the state containers.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub quadrant: String,
}

/// Partial update payload for `PUT /tasks/:id`. Unset fields are left out of the
/// body so the server only touches what the caller named.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }

    pub fn quadrant(value: impl Into<String>) -> Self {
        Self {
            quadrant: Some(value.into()),
            ..Self::default()
        }
    }
}
