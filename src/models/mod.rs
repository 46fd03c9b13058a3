mod forms;
mod task;
mod user;

pub use forms::{LoginForm, NewTask, RegisterForm, TaskPatch};
pub use task::{Quadrant, Task};
pub use user::User;
