use serde::{Deserialize, Serialize};

/// Longest title the `tasks` table accepts, in characters.
pub const TITLE_MAX_LEN: usize = 255;

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Request body for create and update. Every field is replaced on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskIn {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl TaskIn {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into() }
    }

    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.title.chars().count();
        if len > TITLE_MAX_LEN {
            return Err(format!("title must be at most {TITLE_MAX_LEN} characters, got {len}"));
        }
        Ok(())
    }
}
