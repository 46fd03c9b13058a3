use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::User;

/// A registered account. The password hash never leaves this module; handlers
/// answer with [`User`] via [`Account::to_user`].
#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl Account {
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: Some(self.email.clone()),
        }
    }
}

/// A stored task. `owner` is bookkeeping and stays out of the wire form;
/// `quadrant` is stored as the string the client sent, unvalidated, which is
/// exactly what the reference backend does.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskRow {
    pub id: String,
    pub title: String,
    pub quadrant: String,
    pub completed: bool,
    #[serde(skip)]
    pub owner: String,
}

/// In-memory backing store for the mock backend, one shared handle per server.
#[derive(Clone, Default)]
pub(crate) struct MemStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<String, Account>,
    tasks: Vec<TaskRow>,
}

impl MemStore {
    pub fn get_user(&self, username: &str) -> Option<Account> {
        self.lock().users.get(username).cloned()
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.lock().users.values().any(|a| a.email == email)
    }

    pub fn save_user(&self, account: Account) {
        self.lock().users.insert(account.username.clone(), account);
    }

    pub fn list_tasks(&self, owner: &str) -> Vec<TaskRow> {
        self.lock()
            .tasks
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect()
    }

    pub fn save_task(&self, task: TaskRow) {
        self.lock().tasks.push(task);
    }

    pub fn update_task<F>(&self, owner: &str, id: &str, apply: F) -> Option<TaskRow>
    where
        F: FnOnce(&mut TaskRow),
    {
        let mut inner = self.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner == owner)?;
        apply(task);
        Some(task.clone())
    }

    pub fn delete_task(&self, owner: &str, id: &str) -> Option<TaskRow> {
        let mut inner = self.lock();
        let position = inner
            .tasks
            .iter()
            .position(|t| t.id == id && t.owner == owner)?;
        Some(inner.tasks.remove(position))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("mock store poisoned")
    }
}
