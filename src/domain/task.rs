use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do record
///
/// Field names follow the stored layout (`createdAt` in epoch milliseconds)
/// so collections written by earlier versions load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier, unique within the collection
    pub id: String,
    /// Trimmed, non-empty text
    pub text: String,
    pub completed: bool,
    /// Creation time in epoch milliseconds
    pub created_at: i64,
}

impl Task {
    /// Create a new open task from raw user input.
    /// Returns None when the input is empty after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self {
            id: new_task_id(),
            text,
            completed: false,
            created_at: Local::now().timestamp_millis(),
        })
    }

    /// Human-readable creation time in the local timezone
    pub fn created_at_formatted(&self, format: &str) -> String {
        match Local.timestamp_millis_opt(self.created_at).single() {
            Some(dt) => dt.format(format).to_string(),
            None => String::from("unknown date"),
        }
    }
}

/// Trim user input; empty or whitespace-only text yields None
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Generate a fresh task identifier.
/// Uniqueness is probabilistic; there is no collision check.
pub fn new_task_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new_trims_text() {
        let task = Task::new("  Buy milk \n").unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(!task.id.is_empty());
        assert!(task.created_at > 0);
    }

    #[test]
    fn test_task_new_rejects_blank() {
        assert!(Task::new("").is_none());
        assert!(Task::new("   ").is_none());
        assert!(Task::new("\t\n").is_none());
    }

    #[test]
    fn test_new_task_ids_differ() {
        let a = Task::new("a").unwrap();
        let b = Task::new("b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialized_field_names() {
        let task = Task {
            id: "lq2x9k3abc12".to_string(),
            text: "Call mom".to_string(),
            completed: true,
            created_at: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":"lq2x9k3abc12","text":"Call mom","completed":true,"createdAt":1700000000000}"#
        );
    }

    #[test]
    fn test_created_at_formatted() {
        let task = Task {
            id: "x".to_string(),
            text: "t".to_string(),
            completed: false,
            created_at: 1_700_000_000_000,
        };
        let formatted = task.created_at_formatted("%Y");
        assert_eq!(formatted, "2023");
    }
}
