use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use template_board::backend::{Backend, HttpBackend};
use template_board::error::StoreError;
use template_board::fields::TaskStatus;
use template_board::store::RemoteStore;
use template_board::task::{CreateTaskInput, CreateTemplateInput, UpdateTaskPayload};

async fn setup() -> (MockServer, HttpBackend) {
    let server = MockServer::start().await;
    let backend = HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap();
    (server, backend)
}

fn task_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": "Stretch",
        "status": status,
        "templateId": "daily",
        "createdAt": "2024-05-01T08:00:00Z"
    })
}

#[tokio::test]
async fn lists_templates() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "daily", "name": "Daily", "description": "Tasks to do every day"}
        ])))
        .mount(&server)
        .await;

    let templates = backend.list_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].id, "daily");
    assert_eq!(templates[0].description, "Tasks to do every day");
}

#[tokio::test]
async fn creates_task_with_camel_case_body() {
    let (server, backend) = setup().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({"templateId": "daily", "status": "todo", "name": "Stretch"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json("t1", "todo")))
        .mount(&server)
        .await;

    let task = backend
        .create_task(&CreateTaskInput { template_id: "daily".into(), status: TaskStatus::Todo, name: "Stretch".into() })
        .await
        .unwrap();
    assert_eq!(task.id, "t1");
    assert_eq!(task.template_id, "daily");
}

#[tokio::test]
async fn lists_tasks_filtered_by_template() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("templateId", "daily"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("t1", "doing")])))
        .mount(&server)
        .await;

    let tasks = backend.list_tasks(Some("daily")).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Doing);
}

#[tokio::test]
async fn update_puts_to_task_path() {
    let (server, backend) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/t1"))
        .and(body_json(json!({"status": "done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1", "done")))
        .expect(1)
        .mount(&server)
        .await;

    let task = backend.update_task(&UpdateTaskPayload::new("t1").status(TaskStatus::Done)).await.unwrap();
    assert_eq!(task.status, TaskStatus::Done);
}

#[tokio::test]
async fn bad_request_is_a_validation_error_with_server_message() {
    let (server, backend) = setup().await;
    Mock::given(method("POST"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Name is required"})))
        .mount(&server)
        .await;

    let err = backend.create_template(&CreateTemplateInput::default()).await.unwrap_err();
    assert!(matches!(&err, StoreError::Validation(m) if m == "Name is required"));
    assert_eq!(err.user_message(), "Name is required");
}

#[tokio::test]
async fn unprocessable_entity_is_a_validation_error() {
    let (server, backend) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/t1"))
        .respond_with(ResponseTemplate::new(422).set_body_string("status is invalid"))
        .mount(&server)
        .await;

    let err = backend.update_task(&UpdateTaskPayload::new("t1").name("x")).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(m) if m == "status is invalid"));
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let (server, backend) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = backend.delete_task("gone").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(m) if m == "Not Found"));
}

#[tokio::test]
async fn server_error_keeps_status() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})))
        .mount(&server)
        .await;

    let err = backend.list_templates().await.unwrap_err();
    assert!(matches!(err, StoreError::Backend { status: 503, ref message } if message == "maintenance"));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = backend.list_templates().await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}

#[tokio::test]
async fn failed_update_leaves_the_store_cache_unchanged() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("t1", "todo")])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/t1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let store = RemoteStore::new(Arc::new(backend));
    store.fetch_tasks("daily").await.unwrap();
    let before = store.snapshot().await;

    let err = store.update_task(UpdateTaskPayload::new("t1").status(TaskStatus::Done)).await.unwrap_err();

    assert_eq!(err.user_message(), "boom");
    assert_eq!(store.snapshot().await.tasks, before.tasks);
}
