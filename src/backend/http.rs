//! JSON-over-HTTP backend for a remote task API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::backend::Backend;
use crate::error::{StoreError, StoreResult};
use crate::fields::TaskStatus;
use crate::task::{CreateTaskInput, CreateTemplateInput, Task, Template, UpdateTaskPayload};

/// Client for the remote task API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http_client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3333/api`).
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        // Url::join replaces the last segment unless the base ends with '/'.
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| StoreError::Config(format!("invalid API url '{base_url}': {e}")))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http_client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> StoreResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::Config(format!("invalid request path '{path}': {e}")))
    }
}

/// Body of `PUT /tasks/{id}`; the id travels in the path.
#[derive(Serialize)]
struct TaskChanges<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

/// Pull a human-readable message out of an error body: the JSON `message`
/// field, a bare JSON string, the raw text, or the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.as_str() {
            return msg.to_string();
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status.canonical_reason().unwrap_or("request failed").to_string()
}

/// Map non-success responses onto the error taxonomy.
async fn check(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StoreError::Validation(message),
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        _ => StoreError::Backend { status: status.as_u16(), message },
    })
}

async fn parse<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    Ok(check(response).await?.json().await?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_templates(&self) -> StoreResult<Vec<Template>> {
        debug!("GET templates");
        let response = self.http_client.get(self.url("templates")?).send().await?;
        parse(response).await
    }

    async fn create_template(&self, input: &CreateTemplateInput) -> StoreResult<Template> {
        let response = self
            .http_client
            .post(self.url("templates")?)
            .json(input)
            .send()
            .await?;
        parse(response).await
    }

    async fn delete_template(&self, id: &str) -> StoreResult<()> {
        let response = self
            .http_client
            .delete(self.url(&format!("templates/{id}"))?)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_tasks(&self, template_id: Option<&str>) -> StoreResult<Vec<Task>> {
        debug!(template_id, "GET tasks");
        let mut request = self.http_client.get(self.url("tasks")?);
        if let Some(id) = template_id {
            request = request.query(&[("templateId", id)]);
        }
        parse(request.send().await?).await
    }

    async fn create_task(&self, input: &CreateTaskInput) -> StoreResult<Task> {
        let response = self.http_client.post(self.url("tasks")?).json(input).send().await?;
        parse(response).await
    }

    async fn update_task(&self, payload: &UpdateTaskPayload) -> StoreResult<Task> {
        let response = self
            .http_client
            .put(self.url(&format!("tasks/{}", payload.id))?)
            .json(&TaskChanges { name: payload.name.as_deref(), status: payload.status })
            .send()
            .await?;
        parse(response).await
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        let response = self
            .http_client
            .delete(self.url(&format!("tasks/{id}"))?)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
