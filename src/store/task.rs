use std::sync::{Arc, Mutex};

use crate::client::TaskClient;
use crate::errors::ApiResult;
use crate::models::{Quadrant, Task, TaskPatch};

/// Container error shared with detached updates.
///
/// `update_task_quadrant` finishes its remote call after the method has
/// returned, so the slot it reports failures into must outlive the borrow of
/// the store.
#[derive(Clone, Default)]
struct ErrorSlot(Arc<Mutex<Option<String>>>);

impl ErrorSlot {
    fn set(&self, message: &str) {
        *self.0.lock().expect("error slot poisoned") = Some(message.to_string());
    }

    fn get(&self) -> Option<String> {
        self.0.lock().expect("error slot poisoned").clone()
    }
}

/// The active tasks of one matrix view, partitioned by quadrant. Completed
/// tasks never appear here.
pub struct Quadrants<'a> {
    pub q1: Vec<&'a Task>,
    pub q2: Vec<&'a Task>,
    pub q3: Vec<&'a Task>,
    pub q4: Vec<&'a Task>,
}

impl<'a> Quadrants<'a> {
    pub fn get(&self, quadrant: Quadrant) -> &[&'a Task] {
        match quadrant {
            Quadrant::Q1 => &self.q1,
            Quadrant::Q2 => &self.q2,
            Quadrant::Q3 => &self.q3,
            Quadrant::Q4 => &self.q4,
        }
    }
}

/// Container for the task lists a view layer binds to.
///
/// Invariant after every completed action: a task sits in `active` iff its
/// `completed` flag is false and in `completed` iff the flag is true, with one
/// known exception around [`TaskStore::delete_task`] (see that method).
pub struct TaskStore {
    client: TaskClient,
    active: Vec<Task>,
    completed: Vec<Task>,
    loading: bool,
    error: ErrorSlot,
}

impl TaskStore {
    pub fn new(client: TaskClient) -> Self {
        Self {
            client,
            active: Vec::new(),
            completed: Vec::new(),
            loading: false,
            error: ErrorSlot::default(),
        }
    }

    /// Load the remote collection and keep the not-yet-completed half, for the
    /// matrix view.
    ///
    /// # Errors
    ///
    /// Records "failed to load tasks" and re-signals.
    pub async fn fetch_tasks(&mut self) -> ApiResult<()> {
        self.loading = true;
        let result = self.client.list().await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.active = tasks.into_iter().filter(|t| !t.completed).collect();
                Ok(())
            }
            Err(e) => {
                self.error.set("failed to load tasks");
                Err(e)
            }
        }
    }

    /// Load and return the full remote collection without touching local
    /// state, for callers that want their own view over everything.
    ///
    /// # Errors
    ///
    /// Records "failed to load tasks" and re-signals.
    pub async fn fetch_all_tasks(&mut self) -> ApiResult<Vec<Task>> {
        self.loading = true;
        let result = self.client.list().await;
        self.loading = false;
        result.map_err(|e| {
            self.error.set("failed to load tasks");
            e
        })
    }

    /// Load the remote collection and keep the completed half.
    ///
    /// # Errors
    ///
    /// Records "failed to load completed tasks" and re-signals.
    pub async fn fetch_completed_tasks(&mut self) -> ApiResult<()> {
        self.loading = true;
        let result = self.client.list().await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.completed = tasks.into_iter().filter(|t| t.completed).collect();
                Ok(())
            }
            Err(e) => {
                self.error.set("failed to load completed tasks");
                Err(e)
            }
        }
    }

    /// Create a task and append the server-assigned record to the active list.
    ///
    /// # Errors
    ///
    /// Records "failed to create task" and re-signals; local state unchanged.
    pub async fn add_task(&mut self, title: &str, quadrant: Quadrant) -> ApiResult<Task> {
        match self.client.create(title, quadrant.as_str()).await {
            Ok(task) => {
                self.active.push(task.clone());
                Ok(task)
            }
            Err(e) => {
                self.error.set("failed to create task");
                Err(e)
            }
        }
    }

    /// Delete a task remotely and prune it from the active list.
    ///
    /// Known defect, kept for contract stability: the completed list is not
    /// pruned, so deleting a task that only lives there leaves a stale local
    /// entry until the next fetch.
    ///
    /// # Errors
    ///
    /// Records "failed to delete task" and re-signals; local state unchanged.
    pub async fn delete_task(&mut self, id: &str) -> ApiResult<()> {
        match self.client.delete(id).await {
            Ok(()) => {
                self.active.retain(|t| t.id != id);
                Ok(())
            }
            Err(e) => {
                self.error.set("failed to delete task");
                Err(e)
            }
        }
    }

    /// Move a task between quadrants, optimistically.
    ///
    /// The local entry changes synchronously (the matrix view re-renders
    /// before any network traffic) and the remote update runs on a detached
    /// task. A remote failure records "failed to update task" but never
    /// reverts the local change; the next fetch reconciles. This is the one
    /// deliberately fire-and-forget mutation in the container.
    pub fn update_task_quadrant(&mut self, id: &str, quadrant: Quadrant) {
        if let Some(task) = self.active.iter_mut().find(|t| t.id == id) {
            task.quadrant = quadrant;
        }

        let client = self.client.clone();
        let error = self.error.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let patch = TaskPatch::quadrant(quadrant.as_str());
            if let Err(e) = client.update(&id, &patch).await {
                tracing::error!("quadrant update for task {id} failed: {e}");
                error.set("failed to update task");
            }
        });
    }

    /// Update arbitrary task fields, pessimistically: the local entry only
    /// changes once the server has answered, by merging the returned record
    /// over the matching active entry. No-op locally when the id is not in
    /// the active list (e.g. already moved to completed).
    ///
    /// # Errors
    ///
    /// Records "failed to update task" and re-signals.
    pub async fn update_task(&mut self, id: &str, patch: &TaskPatch) -> ApiResult<Task> {
        self.loading = true;
        let result = self.client.update(id, patch).await;
        self.loading = false;
        match result {
            Ok(updated) => {
                if let Some(task) = self.active.iter_mut().find(|t| t.id == id) {
                    *task = updated.clone();
                }
                Ok(updated)
            }
            Err(e) => {
                self.error.set("failed to update task");
                Err(e)
            }
        }
    }

    /// Mark an active task completed and move it to the front of the completed
    /// list. Unknown ids are a local no-op and make no network call.
    ///
    /// # Errors
    ///
    /// Records "failed to complete task" and re-signals; the task stays active.
    pub async fn complete_task(&mut self, id: &str) -> ApiResult<()> {
        let Some(position) = self.active.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        match self.client.update(id, &TaskPatch::completed(true)).await {
            Ok(_) => {
                let mut task = self.active.remove(position);
                task.completed = true;
                self.completed.insert(0, task);
                Ok(())
            }
            Err(e) => {
                self.error.set("failed to complete task");
                Err(e)
            }
        }
    }

    /// Inverse of [`TaskStore::complete_task`]: move a completed task back to
    /// the end of the active list. Unknown ids are a local no-op and make no
    /// network call.
    ///
    /// # Errors
    ///
    /// Records "failed to restore task" and re-signals; the task stays
    /// completed.
    pub async fn restore_task(&mut self, id: &str) -> ApiResult<()> {
        let Some(position) = self.completed.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        match self.client.update(id, &TaskPatch::completed(false)).await {
            Ok(_) => {
                let mut task = self.completed.remove(position);
                task.completed = false;
                self.active.push(task);
                Ok(())
            }
            Err(e) => {
                self.error.set("failed to restore task");
                Err(e)
            }
        }
    }

    /// Partition the active list into the four matrix quadrants. Recomputed on
    /// every call from current state.
    pub fn quadrants(&self) -> Quadrants<'_> {
        let mut quadrants = Quadrants {
            q1: Vec::new(),
            q2: Vec::new(),
            q3: Vec::new(),
            q4: Vec::new(),
        };
        for task in &self.active {
            match task.quadrant {
                Quadrant::Q1 => quadrants.q1.push(task),
                Quadrant::Q2 => quadrants.q2.push(task),
                Quadrant::Q3 => quadrants.q3.push(task),
                Quadrant::Q4 => quadrants.q4.push(task),
            }
        }
        quadrants
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }
}
