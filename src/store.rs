//! Client-side cache and mutation gateway.
//!
//! [`RemoteStore`] is the only writer of the template/task cache. Every
//! mutation goes to the backend first; the cache changes only after the
//! backend confirms, and each change is announced on a broadcast channel so
//! views can regroup their data.
//!
//! The backend call runs without holding the cache lock. Two overlapping
//! updates of the same task are both sent and whichever resolves last wins.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::error::StoreResult;
use crate::task::{CreateTaskInput, CreateTemplateInput, Task, Template, UpdateTaskPayload};

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 64;

/// Notification sent after the cache changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The template collection changed.
    TemplatesChanged,
    /// Tasks of one template changed.
    TasksChanged { template_id: String },
}

/// Cached collections.
#[derive(Debug, Default, Clone)]
pub struct Cache {
    pub templates: Vec<Template>,
    pub tasks: Vec<Task>,
}

impl Cache {
    pub fn tasks_for(&self, template_id: &str) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.template_id == template_id).cloned().collect()
    }

    /// Newest tasks first, at most `limit`.
    pub fn latest_tasks(&self, limit: usize) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks.truncate(limit);
        tasks
    }
}

/// Shared store in front of a [`Backend`].
pub struct RemoteStore {
    backend: Arc<dyn Backend>,
    cache: RwLock<Cache>,
    events: broadcast::Sender<StoreEvent>,
}

impl RemoteStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { backend, cache: RwLock::new(Cache::default()), events }
    }

    /// Receive a [`StoreEvent`] after every cache change.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: StoreEvent) {
        // No receivers is fine: nobody is rendering.
        let _ = self.events.send(event);
    }

    /// Copy of the whole cache.
    pub async fn snapshot(&self) -> Cache {
        self.cache.read().await.clone()
    }

    pub async fn templates(&self) -> Vec<Template> {
        self.cache.read().await.templates.clone()
    }

    pub async fn template(&self, id: &str) -> Option<Template> {
        self.cache.read().await.templates.iter().find(|t| t.id == id).cloned()
    }

    pub async fn tasks_for(&self, template_id: &str) -> Vec<Task> {
        self.cache.read().await.tasks_for(template_id)
    }

    pub async fn latest_tasks(&self, limit: usize) -> Vec<Task> {
        self.cache.read().await.latest_tasks(limit)
    }

    /// Replace the cached templates with the backend's list.
    pub async fn fetch_templates(&self) -> StoreResult<Vec<Template>> {
        let templates = self.backend.list_templates().await?;
        debug!(count = templates.len(), "fetched templates");
        let pruned = {
            let mut cache = self.cache.write().await;
            cache.templates = templates.clone();
            // Tasks of templates that no longer exist go with them.
            let mut pruned: Vec<String> = cache
                .tasks
                .iter()
                .filter(|t| !templates.iter().any(|tpl| tpl.id == t.template_id))
                .map(|t| t.template_id.clone())
                .collect();
            pruned.sort();
            pruned.dedup();
            cache.tasks.retain(|t| templates.iter().any(|tpl| tpl.id == t.template_id));
            pruned
        };
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "dropped tasks of removed templates");
        }
        self.notify(StoreEvent::TemplatesChanged);
        for template_id in pruned {
            self.notify(StoreEvent::TasksChanged { template_id });
        }
        Ok(templates)
    }

    /// Replace the cached tasks of one template with the backend's list.
    pub async fn fetch_tasks(&self, template_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = self.backend.list_tasks(Some(template_id)).await?;
        debug!(template_id, count = tasks.len(), "fetched tasks");
        {
            let mut cache = self.cache.write().await;
            cache.tasks.retain(|t| t.template_id != template_id);
            cache.tasks.extend(tasks.iter().cloned());
        }
        self.notify(StoreEvent::TasksChanged { template_id: template_id.to_string() });
        Ok(tasks)
    }

    /// Replace every cached task and return the newest `limit` of them.
    pub async fn fetch_latest_tasks(&self, limit: usize) -> StoreResult<Vec<Task>> {
        let tasks = self.backend.list_tasks(None).await?;
        debug!(count = tasks.len(), "fetched all tasks");
        let (latest, touched) = {
            let mut cache = self.cache.write().await;
            // Templates that lost all their tasks must be announced too.
            let mut touched: Vec<String> =
                cache.tasks.iter().chain(tasks.iter()).map(|t| t.template_id.clone()).collect();
            touched.sort();
            touched.dedup();
            cache.tasks = tasks;
            (cache.latest_tasks(limit), touched)
        };
        for template_id in touched {
            self.notify(StoreEvent::TasksChanged { template_id });
        }
        Ok(latest)
    }

    pub async fn create_template(&self, input: CreateTemplateInput) -> StoreResult<Template> {
        let template = self.backend.create_template(&input).await.inspect_err(|e| {
            warn!(name = %input.name, error = %e, "create_template failed");
        })?;
        info!(id = %template.id, name = %template.name, "template created");
        self.cache.write().await.templates.push(template.clone());
        self.notify(StoreEvent::TemplatesChanged);
        Ok(template)
    }

    /// Delete a template; its cached tasks go with it.
    pub async fn delete_template(&self, id: &str) -> StoreResult<()> {
        self.backend.delete_template(id).await.inspect_err(|e| {
            warn!(id, error = %e, "delete_template failed");
        })?;
        info!(id, "template deleted");
        {
            let mut cache = self.cache.write().await;
            cache.templates.retain(|t| t.id != id);
            cache.tasks.retain(|t| t.template_id != id);
        }
        self.notify(StoreEvent::TemplatesChanged);
        self.notify(StoreEvent::TasksChanged { template_id: id.to_string() });
        Ok(())
    }

    pub async fn create_task(&self, input: CreateTaskInput) -> StoreResult<Task> {
        let task = self.backend.create_task(&input).await.inspect_err(|e| {
            warn!(template_id = %input.template_id, error = %e, "create_task failed");
        })?;
        info!(id = %task.id, template_id = %task.template_id, status = %task.status, "task created");
        self.cache.write().await.tasks.push(task.clone());
        self.notify(StoreEvent::TasksChanged { template_id: task.template_id.clone() });
        Ok(task)
    }

    /// Apply a partial update.
    ///
    /// A payload with an empty id is ignored: no backend call, no cache
    /// change, `Ok(None)`. Otherwise the cached record is replaced by the
    /// backend's merged record.
    pub async fn update_task(&self, payload: UpdateTaskPayload) -> StoreResult<Option<Task>> {
        if !payload.has_target() {
            debug!("update_task without id ignored");
            return Ok(None);
        }
        let task = self.backend.update_task(&payload).await.inspect_err(|e| {
            warn!(id = %payload.id, error = %e, "update_task failed");
        })?;
        info!(id = %task.id, status = %task.status, "task updated");
        {
            let mut cache = self.cache.write().await;
            match cache.tasks.iter().position(|t| t.id == task.id) {
                Some(i) => cache.tasks[i] = task.clone(),
                None => cache.tasks.push(task.clone()),
            }
        }
        self.notify(StoreEvent::TasksChanged { template_id: task.template_id.clone() });
        Ok(Some(task))
    }

    pub async fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.backend.delete_task(id).await.inspect_err(|e| {
            warn!(id, error = %e, "delete_task failed");
        })?;
        info!(id, "task deleted");
        let removed = {
            let mut cache = self.cache.write().await;
            let pos = cache.tasks.iter().position(|t| t.id == id);
            pos.map(|i| cache.tasks.remove(i))
        };
        if let Some(task) = removed {
            self.notify(StoreEvent::TasksChanged { template_id: task.template_id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TaskStatus;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, template: &str, secs: i64) -> Task {
        Task {
            id: id.into(),
            name: id.into(),
            status: TaskStatus::Todo,
            template_id: template.into(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn latest_tasks_are_newest_first() {
        let cache = Cache {
            templates: Vec::new(),
            tasks: vec![task("a", "x", 10), task("b", "y", 30), task("c", "x", 20)],
        };
        let ids: Vec<_> = cache.latest_tasks(2).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn tasks_for_filters_by_template() {
        let cache = Cache {
            templates: Vec::new(),
            tasks: vec![task("a", "x", 1), task("b", "y", 2), task("c", "x", 3)],
        };
        assert_eq!(cache.tasks_for("x").len(), 2);
        assert!(cache.tasks_for("z").is_empty());
    }
}
