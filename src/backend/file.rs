//! Local JSON file backend.
//!
//! Stores templates and tasks in a single JSON document and enforces the same
//! rules a remote task API does: non-empty names, known template ids, known
//! task ids. Writes go through a temp file and a rename so a crash never leaves
//! a half-written document behind.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::{StoreError, StoreResult};
use crate::task::{CreateTaskInput, CreateTemplateInput, Task, Template, UpdateTaskPayload};

/// On-disk document holding every template and task.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Database {
    /// Load the document, returning an empty one if the file doesn't exist.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Ok(Database::default());
        }
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        if buf.trim().is_empty() {
            return Ok(Database::default());
        }
        Ok(serde_json::from_str(&buf)?)
    }

    /// Save the document using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// Generate a fresh record id.
fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Trim a required name, rejecting blank input.
fn required_name(name: &str, what: &str) -> StoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation(format!("{what} name is required")));
    }
    Ok(name.to_string())
}

/// Backend persisting to a local JSON file.
pub struct FileBackend {
    path: PathBuf,
    db: Mutex<Database>,
}

impl FileBackend {
    /// Open (or lazily create) the document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let db = Database::load(&path)?;
        debug!(path = %path.display(), templates = db.templates.len(), tasks = db.tasks.len(), "opened data file");
        Ok(Self { path, db: Mutex::new(db) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the document, persist it, then commit it.
    /// A failed change or a failed write leaves the document untouched.
    /// The write runs on the blocking pool; the lock is held until it lands
    /// so writes reach the file in commit order.
    async fn commit<T>(&self, change: impl FnOnce(&mut Database) -> StoreResult<T>) -> StoreResult<T> {
        let mut db = self.db.lock().await;
        let mut next = db.clone();
        let out = change(&mut next)?;
        let path = self.path.clone();
        let next = task::spawn_blocking(move || next.save(&path).map(|()| next))
            .await
            .map_err(|e| StoreError::Storage(io::Error::other(e.to_string())))??;
        *db = next;
        Ok(out)
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn list_templates(&self) -> StoreResult<Vec<Template>> {
        Ok(self.db.lock().await.templates.clone())
    }

    async fn create_template(&self, input: &CreateTemplateInput) -> StoreResult<Template> {
        let name = required_name(&input.name, "Template")?;
        self.commit(|db| {
            let template = Template {
                id: new_id(),
                name,
                description: input.description.trim().to_string(),
            };
            db.templates.push(template.clone());
            Ok(template)
        })
        .await
    }

    async fn delete_template(&self, id: &str) -> StoreResult<()> {
        self.commit(|db| {
            if db.template(id).is_none() {
                return Err(StoreError::NotFound(format!("Template {id} not found")));
            }
            db.templates.retain(|t| t.id != id);
            db.tasks.retain(|t| t.template_id != id);
            Ok(())
        })
        .await
    }

    async fn list_tasks(&self, template_id: Option<&str>) -> StoreResult<Vec<Task>> {
        let db = self.db.lock().await;
        Ok(db
            .tasks
            .iter()
            .filter(|t| template_id.map_or(true, |id| t.template_id == id))
            .cloned()
            .collect())
    }

    async fn create_task(&self, input: &CreateTaskInput) -> StoreResult<Task> {
        let name = required_name(&input.name, "Task")?;
        self.commit(|db| {
            if db.template(&input.template_id).is_none() {
                return Err(StoreError::NotFound(format!(
                    "Template {} not found",
                    input.template_id
                )));
            }
            let task = Task {
                id: new_id(),
                name,
                status: input.status,
                template_id: input.template_id.clone(),
                created_at: Utc::now(),
            };
            db.tasks.push(task.clone());
            Ok(task)
        })
        .await
    }

    async fn update_task(&self, payload: &UpdateTaskPayload) -> StoreResult<Task> {
        let mut payload = payload.clone();
        if let Some(name) = &payload.name {
            payload.name = Some(required_name(name, "Task")?);
        }
        self.commit(|db| {
            let task = db
                .task_mut(&payload.id)
                .ok_or_else(|| StoreError::NotFound(format!("Task {} not found", payload.id)))?;
            task.apply(&payload);
            Ok(task.clone())
        })
        .await
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        self.commit(|db| {
            let before = db.tasks.len();
            db.tasks.retain(|t| t.id != id);
            if db.tasks.len() == before {
                return Err(StoreError::NotFound(format!("Task {id} not found")));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TaskStatus;
    use tempfile::TempDir;

    fn backend(dir: &TempDir) -> FileBackend {
        FileBackend::open(dir.path().join("data.json")).unwrap()
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let b = backend(&dir);
        let template = b
            .create_template(&CreateTemplateInput { name: " Daily ".into(), description: String::new() })
            .await
            .unwrap();
        assert_eq!(template.name, "Daily");
        b.create_task(&CreateTaskInput {
            template_id: template.id.clone(),
            status: TaskStatus::Todo,
            name: "Stretch".into(),
        })
        .await
        .unwrap();

        let reopened = backend(&dir);
        assert_eq!(reopened.list_templates().await.unwrap(), vec![template.clone()]);
        let tasks = reopened.list_tasks(Some(&template.id)).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Stretch");
    }

    #[tokio::test]
    async fn deleting_template_removes_its_tasks() {
        let dir = TempDir::new().unwrap();
        let b = backend(&dir);
        let t = b
            .create_template(&CreateTemplateInput { name: "Weekly".into(), description: String::new() })
            .await
            .unwrap();
        b.create_task(&CreateTaskInput { template_id: t.id.clone(), status: TaskStatus::Doing, name: "Laundry".into() })
            .await
            .unwrap();

        b.delete_template(&t.id).await.unwrap();
        assert!(b.list_tasks(None).await.unwrap().is_empty());
        assert!(matches!(b.delete_template(&t.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn blank_update_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let b = backend(&dir);
        let err = b.update_task(&UpdateTaskPayload::new("nope").name("  ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = b.update_task(&UpdateTaskPayload::new("nope").name("x")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_writes_all_reach_the_file() {
        let dir = TempDir::new().unwrap();
        let b = std::sync::Arc::new(backend(&dir));
        let handles: Vec<_> = ["Daily", "Weekly", "Monthly", "Yearly"]
            .into_iter()
            .map(|name| {
                let b = b.clone();
                tokio::spawn(async move {
                    b.create_template(&CreateTemplateInput { name: name.into(), description: String::new() }).await
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let on_disk = Database::load(b.path()).unwrap();
        assert_eq!(on_disk.templates.len(), 4);
        assert!(!b.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn empty_file_loads_as_empty_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "").unwrap();
        let db = Database::load(&path).unwrap();
        assert!(db.templates.is_empty() && db.tasks.is_empty());
    }
}
