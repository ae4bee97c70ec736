//! Task operations scoped to one template.
//!
//! Views nested under a template page hold a [`TemplateContext`] instead of
//! the store itself, so they can only touch tasks of that template.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::fields::TaskStatus;
use crate::store::RemoteStore;
use crate::task::{CreateTaskInput, Task, Template, UpdateTaskPayload};

#[derive(Clone)]
pub struct TemplateContext {
    store: Arc<RemoteStore>,
    template_id: String,
}

impl TemplateContext {
    pub fn new(store: Arc<RemoteStore>, template_id: impl Into<String>) -> Self {
        Self { store, template_id: template_id.into() }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn store(&self) -> &Arc<RemoteStore> {
        &self.store
    }

    /// Cached template record, if loaded.
    pub async fn template(&self) -> Option<Template> {
        self.store.template(&self.template_id).await
    }

    /// Cached tasks of this template.
    pub async fn tasks(&self) -> Vec<Task> {
        self.store.tasks_for(&self.template_id).await
    }

    /// Reload this template's tasks from the backend.
    pub async fn refresh(&self) -> StoreResult<Vec<Task>> {
        self.store.fetch_tasks(&self.template_id).await
    }

    pub async fn create_task(&self, status: TaskStatus, name: impl Into<String>) -> StoreResult<Task> {
        self.store
            .create_task(CreateTaskInput {
                template_id: self.template_id.clone(),
                status,
                name: name.into(),
            })
            .await
    }

    /// Forward a partial update to the store. `Ok(None)` means the payload
    /// had no id and nothing was sent.
    pub async fn update_task(&self, payload: UpdateTaskPayload) -> StoreResult<Option<Task>> {
        self.store.update_task(payload).await
    }

    pub async fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.store.delete_task(id).await
    }
}
