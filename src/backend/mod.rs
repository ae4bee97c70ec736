//! Backends the store talks to.
//!
//! A backend is the authority on templates and tasks: it assigns ids, checks
//! required fields and rejects references to records it does not know. The
//! store only caches what a backend has confirmed.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::task::{CreateTaskInput, CreateTemplateInput, Task, Template, UpdateTaskPayload};

pub mod file;
pub mod http;

pub use file::FileBackend;
pub use http::HttpBackend;

/// Asynchronous operation set exposed by a task API.
#[async_trait]
pub trait Backend: Send + Sync {
    /// List every template.
    async fn list_templates(&self) -> StoreResult<Vec<Template>>;

    /// Create a template. Fails with a validation error on an empty name.
    async fn create_template(&self, input: &CreateTemplateInput) -> StoreResult<Template>;

    /// Delete a template together with its tasks.
    async fn delete_template(&self, id: &str) -> StoreResult<()>;

    /// List tasks, optionally restricted to one template.
    async fn list_tasks(&self, template_id: Option<&str>) -> StoreResult<Vec<Task>>;

    /// Create a task under an existing template.
    async fn create_task(&self, input: &CreateTaskInput) -> StoreResult<Task>;

    /// Merge a partial update into an existing task and return the result.
    async fn update_task(&self, payload: &UpdateTaskPayload) -> StoreResult<Task>;

    /// Delete a task.
    async fn delete_task(&self, id: &str) -> StoreResult<()>;
}
