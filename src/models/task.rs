use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority bucket in the urgency/importance matrix.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    pub fn as_str(self) -> &'static str {
        match self {
            Quadrant::Q1 => "q1",
            Quadrant::Q2 => "q2",
            Quadrant::Q3 => "q3",
            Quadrant::Q4 => "q4",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as it travels over the wire and lives in the state containers.
///
/// The server assigns `id`; a task is either active or completed, tracked by the
/// `completed` flag. Older backends omit the flag for fresh tasks, so it defaults
/// to `false` when absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub quadrant: Quadrant,
    #[serde(default)]
    pub completed: bool,
}
