use axum::{
    extract::{Form, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde_json::json;
use tower_sessions::Session;
use uuid::Uuid;

use super::store::{Account, MemStore, TaskRow};
use super::SESSION_KEY;
use crate::models::{LoginForm, NewTask, RegisterForm, TaskPatch};

/// Status plus `{"message": ...}` body, the error shape every endpoint shares.
pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

pub async fn handle_login(
    State(store): State<MemStore>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> Response {
    tracing::debug!("login attempt for user: {}", login_form.username);

    match store.get_user(&login_form.username) {
        Some(account) => {
            if verify(&login_form.password, &account.password_hash).unwrap_or(false) {
                if let Err(e) = session.insert(SESSION_KEY, login_form.username).await {
                    tracing::error!("session error: {e}");
                    return failure(StatusCode::INTERNAL_SERVER_ERROR, "server error");
                }
                StatusCode::OK.into_response()
            } else {
                failure(
                    StatusCode::UNAUTHORIZED,
                    "Password is incorrect, please re-enter",
                )
            }
        }
        None => failure(StatusCode::UNAUTHORIZED, "Username does not exist"),
    }
}

pub async fn handle_register(
    State(store): State<MemStore>,
    Json(register_form): Json<RegisterForm>,
) -> Response {
    if store.get_user(&register_form.username).is_some() {
        return failure(StatusCode::BAD_REQUEST, "Username already taken");
    }
    if store.email_taken(&register_form.email) {
        return failure(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let password_hash = match hash(register_form.password.as_bytes(), DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("failed to hash password: {e}");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "registration failed");
        }
    };
    let account = Account {
        id: Uuid::new_v4().to_string(),
        username: register_form.username,
        email: register_form.email,
        password_hash,
    };
    let user = account.to_user();
    store.save_user(account);

    (StatusCode::CREATED, Json(user)).into_response()
}

pub async fn handle_logout(session: Session) -> Response {
    if let Err(e) = session.remove::<String>(SESSION_KEY).await {
        tracing::warn!("session removal error: {e}");
    }
    StatusCode::OK.into_response()
}

pub async fn current_user(State(store): State<MemStore>, session: Session) -> Response {
    let Some(username) = session_user(&session).await else {
        return failure(StatusCode::UNAUTHORIZED, "not authenticated");
    };
    match store.get_user(&username) {
        Some(account) => Json(account.to_user()).into_response(),
        None => failure(StatusCode::UNAUTHORIZED, "not authenticated"),
    }
}

pub async fn list_tasks(State(store): State<MemStore>, session: Session) -> Response {
    let Some(username) = session_user(&session).await else {
        return failure(StatusCode::UNAUTHORIZED, "not authenticated");
    };
    Json(store.list_tasks(&username)).into_response()
}

pub async fn create_task(
    State(store): State<MemStore>,
    session: Session,
    Json(new_task): Json<NewTask>,
) -> Response {
    let Some(username) = session_user(&session).await else {
        return failure(StatusCode::UNAUTHORIZED, "not authenticated");
    };
    let task = TaskRow {
        id: Uuid::new_v4().to_string(),
        title: new_task.title,
        quadrant: new_task.quadrant,
        completed: false,
        owner: username,
    };
    store.save_task(task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

pub async fn update_task(
    State(store): State<MemStore>,
    session: Session,
    Path(task_id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Response {
    let Some(username) = session_user(&session).await else {
        return failure(StatusCode::UNAUTHORIZED, "not authenticated");
    };
    let updated = store.update_task(&username, &task_id, |task| {
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(quadrant) = patch.quadrant {
            task.quadrant = quadrant;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
    });
    match updated {
        Some(task) => Json(task).into_response(),
        None => failure(StatusCode::NOT_FOUND, "task not found"),
    }
}

pub async fn delete_task(
    State(store): State<MemStore>,
    session: Session,
    Path(task_id): Path<String>,
) -> Response {
    let Some(username) = session_user(&session).await else {
        return failure(StatusCode::UNAUTHORIZED, "not authenticated");
    };
    match store.delete_task(&username, &task_id) {
        Some(task) => Json(task).into_response(),
        None => failure(StatusCode::NOT_FOUND, "task not found"),
    }
}

async fn session_user(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_KEY).await.ok().flatten()
}
