use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use template_board::backend::{FileBackend, HttpBackend};
use template_board::board::{ColumnMode, SubmitOutcome, TemplateBoard};
use template_board::context::TemplateContext;
use template_board::fields::{TaskStatus, Theme};
use template_board::store::RemoteStore;
use template_board::task::{CreateTaskInput, CreateTemplateInput, Task};
use template_board::tui::board::{BoardExit, BoardScreen};

struct Fixture {
    _dir: TempDir,
    store: Arc<RemoteStore>,
    template_id: String,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::open(dir.path().join("board.json")).unwrap();
    let store = Arc::new(RemoteStore::new(Arc::new(backend)));
    let daily = store
        .create_template(CreateTemplateInput { name: "Daily".into(), description: String::new() })
        .await
        .unwrap();
    Fixture { _dir: dir, store, template_id: daily.id }
}

async fn add(fx: &Fixture, name: &str, status: TaskStatus) -> Task {
    fx.store
        .create_task(CreateTaskInput { template_id: fx.template_id.clone(), status, name: name.into() })
        .await
        .unwrap()
}

async fn board(fx: &Fixture) -> TemplateBoard {
    let mut board = TemplateBoard::new(TemplateContext::new(fx.store.clone(), &fx.template_id), "Daily");
    board.load().await;
    board
}

fn names(board: &TemplateBoard, column: usize) -> Vec<String> {
    board.columns[column].tasks.iter().map(|t| t.name.clone()).collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[tokio::test]
async fn editing_a_task_into_done_moves_it_between_columns() {
    let fx = fixture().await;
    add(&fx, "t1", TaskStatus::Todo).await;
    let mut board = board(&fx).await;
    assert_eq!(names(&board, 0), vec!["t1"]);

    board.edit_selected();
    let ColumnMode::Editing(form) = &mut board.active_column_mut().mode else {
        panic!("edit modal should be open");
    };
    form.next_field();
    form.handle_left_right(true);
    form.handle_left_right(true);
    assert_eq!(form.selected_status(), TaskStatus::Done);

    let outcome = board.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(ref t) if t.status == TaskStatus::Done));
    assert!(names(&board, 0).is_empty());
    assert_eq!(names(&board, 2), vec!["t1"]);
    assert!(matches!(board.columns[0].mode, ColumnMode::Idle));
}

#[tokio::test]
async fn edit_without_target_keeps_the_modal_open() {
    let fx = fixture().await;
    add(&fx, "t1", TaskStatus::Todo).await;
    let mut board = board(&fx).await;

    board.edit_selected();
    if let ColumnMode::Editing(form) = &mut board.active_column_mut().mode {
        form.id.clear();
        form.name.handle_char('x');
    }

    let outcome = board.submit().await;

    assert_eq!(outcome, SubmitOutcome::Ignored);
    assert!(board.active_column().is_editing());
    assert!(board.alert.is_none());
    assert_eq!(names(&board, 0), vec!["t1"]);
}

#[tokio::test]
async fn blank_name_cannot_be_submitted() {
    let fx = fixture().await;
    add(&fx, "t1", TaskStatus::Todo).await;
    let mut board = board(&fx).await;

    board.edit_selected();
    if let ColumnMode::Editing(form) = &mut board.active_column_mut().mode {
        form.name.clear();
        assert!(!form.can_submit());
    }

    assert_eq!(board.submit().await, SubmitOutcome::Ignored);
    assert!(board.active_column().is_editing());
}

#[tokio::test]
async fn inline_create_adds_to_that_column_and_closes() {
    let fx = fixture().await;
    let mut board = board(&fx).await;
    board.select_column(1);
    board.active_column_mut().toggle_creating();
    if let ColumnMode::Creating(form) = &mut board.active_column_mut().mode {
        for c in "Read a chapter".chars() {
            form.name.handle_char(c);
        }
    }

    let outcome = board.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(ref t) if t.status == TaskStatus::Doing));
    assert_eq!(names(&board, 1), vec!["Read a chapter"]);
    assert_eq!(board.columns[1].badge(), 1);
    assert!(!board.active_column().is_creating());
}

#[tokio::test]
async fn moving_a_card_follows_it() {
    let fx = fixture().await;
    add(&fx, "t1", TaskStatus::Todo).await;
    let mut board = board(&fx).await;

    board.move_selected(true).await;
    assert_eq!(board.selected_column, 1);
    assert_eq!(board.selected_task().map(|t| t.name.as_str()), Some("t1"));

    board.move_selected(true).await;
    assert_eq!(board.selected_column, 2);
    assert_eq!(board.move_selected(true).await, SubmitOutcome::Ignored);
}

#[tokio::test]
async fn board_regroups_on_changes_made_elsewhere() {
    let fx = fixture().await;
    let mut board = board(&fx).await;
    assert!(board.columns.iter().all(|c| c.badge() == 0));

    add(&fx, "from cli", TaskStatus::Done).await;

    assert!(board.sync().await);
    assert_eq!(names(&board, 2), vec!["from cli"]);
}

#[tokio::test]
async fn keys_drive_the_board_screen() {
    let fx = fixture().await;
    let mut screen = BoardScreen::new(board(&fx).await, Theme::Light);

    screen.handle_key(key(KeyCode::Char('n'))).await;
    for c in "Stretch".chars() {
        screen.handle_key(key(KeyCode::Char(c))).await;
    }
    screen.handle_key(key(KeyCode::Enter)).await;
    assert_eq!(names(&screen.board, 0), vec!["Stretch"]);
    assert_eq!(screen.status_message, "Task created");

    screen.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL)).await;
    assert_eq!(names(&screen.board, 1), vec!["Stretch"]);

    screen.handle_key(key(KeyCode::Char('x'))).await;
    assert!(screen.board.columns.iter().all(|c| c.badge() == 0));

    assert_eq!(screen.handle_key(key(KeyCode::Esc)).await, Some(BoardExit::Home));
}

#[tokio::test]
async fn failed_update_keeps_form_and_raises_alert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "t1",
            "name": "Stretch",
            "status": "todo",
            "templateId": "daily",
            "createdAt": "2024-05-01T08:00:00Z"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/t1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Name too long"})))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let store = Arc::new(RemoteStore::new(Arc::new(backend)));
    let mut screen = BoardScreen::new(TemplateBoard::new(TemplateContext::new(store, "daily"), "Daily"), Theme::Dark);
    screen.board.load().await;

    screen.handle_key(key(KeyCode::Char('e'))).await;
    screen.handle_key(key(KeyCode::Char('!'))).await;
    screen.handle_key(key(KeyCode::Enter)).await;

    assert_eq!(screen.board.alert.as_deref(), Some("Name too long"));
    let ColumnMode::Editing(form) = &screen.board.active_column().mode else {
        panic!("edit modal should stay open");
    };
    assert_eq!(form.name.value, "Stretch!");
    assert_eq!(names(&screen.board, 0), vec!["Stretch"]);

    // Input is swallowed until the alert is dismissed.
    screen.handle_key(key(KeyCode::Char('z'))).await;
    screen.handle_key(key(KeyCode::Enter)).await;
    assert!(screen.board.alert.is_none());
    assert!(screen.board.active_column().is_editing());
}
