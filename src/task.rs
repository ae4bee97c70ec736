//! Template and task data structures.
//!
//! This module defines the records the store caches and the inputs it accepts
//! for mutations. Field names follow the backend's JSON contract (camelCase,
//! identifiers under `_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::TaskStatus;

/// A named, reusable definition that owns a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A unit of work belonging to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub template_id: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Merge a partial update into this task. Omitted fields keep their value.
    pub fn apply(&mut self, payload: &UpdateTaskPayload) {
        if let Some(name) = &payload.name {
            self.name = name.clone();
        }
        if let Some(status) = payload.status {
            self.status = status;
        }
    }
}

/// Fields accepted when creating a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTemplateInput {
    pub name: String,
    pub description: String,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub template_id: String,
    pub status: TaskStatus,
    pub name: String,
}

/// Partial update of a task. An empty `id` marks a payload with no target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTaskPayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None, status: None }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when the payload does not name a task.
    pub fn has_target(&self) -> bool {
        !self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            id: "t1".into(),
            name: "Buy bread".into(),
            status: TaskStatus::Todo,
            template_id: "daily".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut t = task();
        t.apply(&UpdateTaskPayload::new("t1").status(TaskStatus::Done));
        assert_eq!(t.name, "Buy bread");
        assert_eq!(t.status, TaskStatus::Done);

        t.apply(&UpdateTaskPayload::new("t1").name("Buy milk"));
        assert_eq!(t.name, "Buy milk");
        assert_eq!(t.status, TaskStatus::Done);
    }

    #[test]
    fn task_uses_backend_field_names() {
        let json = r#"{"_id":"t9","name":"Stretch","status":"doing","templateId":"daily"}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, "t9");
        assert_eq!(t.template_id, "daily");
        assert_eq!(t.status, TaskStatus::Doing);
        assert_eq!(t.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn payload_omits_absent_fields() {
        let body = serde_json::to_value(UpdateTaskPayload::new("t1").name("x")).unwrap();
        assert_eq!(body, serde_json::json!({"_id": "t1", "name": "x"}));
    }

    #[test]
    fn empty_id_has_no_target() {
        assert!(!UpdateTaskPayload::default().has_target());
        assert!(UpdateTaskPayload::new("t1").has_target());
    }
}
