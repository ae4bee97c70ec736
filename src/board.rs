//! Kanban board state for one template.
//!
//! A [`TemplateBoard`] holds one [`KanbanColumn`] per task status. Columns are
//! regrouped from the store's cache whenever the store announces a change, so
//! a column's badge always equals the number of cached tasks with exactly its
//! status.
//!
//! Each column runs a small state machine:
//!
//! ```text
//! Idle --'+'--> Creating --submit ok--> Idle
//!   |               \--submit err--> Creating (input kept, alert raised)
//!   \--edit task--> Editing --submit ok--> Idle (form discarded)
//!                       \--submit err--> Editing (form kept, alert raised)
//! ```
//!
//! Creating and Editing are variants of one enum, so a column never has the
//! inline form and the edit modal open at the same time.

use ratatui::style::Color;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::{
    context::TemplateContext,
    fields::{TaskStatus, Variant},
    store::StoreEvent,
    task::{Task, UpdateTaskPayload},
    tui::{
        colors::variant_color,
        task_form::{NewTaskForm, TaskForm},
        utils::capitalize_text,
    },
};

/// What a column is doing.
#[derive(Debug, Clone, Default)]
pub enum ColumnMode {
    #[default]
    Idle,
    Creating(NewTaskForm),
    Editing(TaskForm),
}

/// Result of submitting a column form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent (no open form, blank name, or no target id).
    Ignored,
    Saved(Task),
    /// The store rejected the change; the message is meant for an alert.
    Failed(String),
}

/// One status column of the board.
#[derive(Debug, Clone)]
pub struct KanbanColumn {
    pub status: TaskStatus,
    pub title: Option<String>,
    pub variant: Variant,
    pub tasks: Vec<Task>,
    pub mode: ColumnMode,
}

impl KanbanColumn {
    pub fn new(status: TaskStatus) -> Self {
        Self { status, title: None, variant: Variant::default(), tasks: Vec::new(), mode: ColumnMode::Idle }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Explicit title, or the capitalised status.
    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| capitalize_text(self.status.as_str()))
    }

    pub fn color(&self) -> Color {
        variant_color(self.variant)
    }

    /// Task count shown in the column header.
    pub fn badge(&self) -> usize {
        self.tasks.len()
    }

    /// Keep the tasks whose status matches this column exactly.
    pub fn set_tasks(&mut self, all: &[Task]) {
        self.tasks = all.iter().filter(|t| t.status == self.status).cloned().collect();
    }

    pub fn is_creating(&self) -> bool {
        matches!(self.mode, ColumnMode::Creating(_))
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, ColumnMode::Editing(_))
    }

    /// Show or hide the inline creation form. Ignored while the edit modal
    /// is open.
    pub fn toggle_creating(&mut self) {
        self.mode = match std::mem::take(&mut self.mode) {
            ColumnMode::Idle => ColumnMode::Creating(NewTaskForm::new()),
            ColumnMode::Creating(_) => ColumnMode::Idle,
            editing @ ColumnMode::Editing(_) => editing,
        };
    }

    /// Open the edit modal populated from `task`, closing the inline form.
    pub fn open_edit(&mut self, task: &Task) {
        self.mode = ColumnMode::Editing(TaskForm::from_task(task));
    }

    /// Close whatever form is open without submitting.
    pub fn close(&mut self) {
        self.mode = ColumnMode::Idle;
    }

    /// Submit the edit modal. The modal closes only once the store has
    /// confirmed the update.
    pub async fn submit_edit(&mut self, ctx: &TemplateContext) -> SubmitOutcome {
        let payload = match &self.mode {
            ColumnMode::Editing(form) if form.can_submit() => form.to_payload(),
            _ => return SubmitOutcome::Ignored,
        };
        match ctx.update_task(payload).await {
            Ok(Some(task)) => {
                self.mode = ColumnMode::Idle;
                SubmitOutcome::Saved(task)
            }
            Ok(None) => SubmitOutcome::Ignored,
            Err(e) => SubmitOutcome::Failed(e.user_message()),
        }
    }

    /// Submit the inline creation form with this column's status.
    pub async fn submit_create(&mut self, ctx: &TemplateContext) -> SubmitOutcome {
        let name = match &self.mode {
            ColumnMode::Creating(form) if form.can_submit() => form.name.value.trim().to_string(),
            _ => return SubmitOutcome::Ignored,
        };
        match ctx.create_task(self.status, name).await {
            Ok(task) => {
                self.mode = ColumnMode::Idle;
                SubmitOutcome::Saved(task)
            }
            Err(e) => SubmitOutcome::Failed(e.user_message()),
        }
    }
}

/// Default column set: one column per status, each with its own colour.
pub fn default_columns() -> Vec<KanbanColumn> {
    TaskStatus::ALL
        .iter()
        .map(|&status| KanbanColumn::new(status).with_variant(Variant::for_status(status)))
        .collect()
}

/// Board for one template.
pub struct TemplateBoard {
    ctx: TemplateContext,
    events: broadcast::Receiver<StoreEvent>,
    pub template_name: String,
    pub columns: Vec<KanbanColumn>,
    pub selected_column: usize,
    pub selected_card: usize,
    /// Blocking notification; input is swallowed until it is dismissed.
    pub alert: Option<String>,
}

impl TemplateBoard {
    pub fn new(ctx: TemplateContext, template_name: impl Into<String>) -> Self {
        let events = ctx.store().subscribe();
        Self {
            ctx,
            events,
            template_name: template_name.into(),
            columns: default_columns(),
            selected_column: 0,
            selected_card: 0,
            alert: None,
        }
    }

    pub fn context(&self) -> &TemplateContext {
        &self.ctx
    }

    /// Fetch this template's tasks from the backend and regroup.
    pub async fn load(&mut self) {
        if let Err(e) = self.ctx.refresh().await {
            self.alert = Some(e.user_message());
        }
        self.reload().await;
    }

    /// Regroup from the store's cache.
    pub async fn reload(&mut self) {
        let tasks = self.ctx.tasks().await;
        self.regroup(&tasks);
    }

    pub fn regroup(&mut self, tasks: &[Task]) {
        for column in &mut self.columns {
            column.set_tasks(tasks);
        }
        self.clamp_selection();
    }

    /// Drain store notifications; regroup if any concerned this template.
    /// Returns whether a regroup happened.
    pub async fn sync(&mut self) -> bool {
        let mut dirty = false;
        loop {
            match self.events.try_recv() {
                Ok(StoreEvent::TasksChanged { template_id }) if template_id == self.ctx.template_id() => {
                    dirty = true
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "board lagged behind store events");
                    dirty = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if dirty {
            self.reload().await;
        }
        dirty
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_column >= self.columns.len() {
            self.selected_column = 0;
        }
        let len = self.columns[self.selected_column].tasks.len();
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    pub fn select_column(&mut self, index: usize) {
        self.selected_column = index.min(self.columns.len() - 1);
        self.clamp_selection();
    }

    pub fn select_card(&mut self, down: bool) {
        let len = self.columns[self.selected_column].tasks.len();
        if down {
            if self.selected_card + 1 < len {
                self.selected_card += 1;
            }
        } else {
            self.selected_card = self.selected_card.saturating_sub(1);
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.columns[self.selected_column].tasks.get(self.selected_card)
    }

    pub fn active_column(&self) -> &KanbanColumn {
        &self.columns[self.selected_column]
    }

    pub fn active_column_mut(&mut self) -> &mut KanbanColumn {
        &mut self.columns[self.selected_column]
    }

    /// Open the edit modal for the selected card.
    pub fn edit_selected(&mut self) {
        if let Some(task) = self.selected_task().cloned() {
            self.active_column_mut().open_edit(&task);
        }
    }

    fn apply_outcome(&mut self, outcome: &SubmitOutcome) {
        if let SubmitOutcome::Failed(message) = outcome {
            self.alert = Some(message.clone());
        }
    }

    /// Submit whichever form the selected column has open.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let ctx = self.ctx.clone();
        let column = &mut self.columns[self.selected_column];
        let outcome = match column.mode {
            ColumnMode::Editing(_) => column.submit_edit(&ctx).await,
            ColumnMode::Creating(_) => column.submit_create(&ctx).await,
            ColumnMode::Idle => SubmitOutcome::Ignored,
        };
        self.apply_outcome(&outcome);
        self.sync().await;
        outcome
    }

    /// Move the selected card to the neighbouring status column.
    pub async fn move_selected(&mut self, forward: bool) -> SubmitOutcome {
        let Some(task) = self.selected_task().cloned() else {
            return SubmitOutcome::Ignored;
        };
        let status = if forward {
            if task.status == TaskStatus::Done {
                return SubmitOutcome::Ignored;
            }
            task.status.next()
        } else {
            if task.status == TaskStatus::Todo {
                return SubmitOutcome::Ignored;
            }
            task.status.prev()
        };
        let outcome = match self.ctx.update_task(UpdateTaskPayload::new(&task.id).status(status)).await {
            Ok(Some(task)) => SubmitOutcome::Saved(task),
            Ok(None) => SubmitOutcome::Ignored,
            Err(e) => SubmitOutcome::Failed(e.user_message()),
        };
        self.apply_outcome(&outcome);
        self.sync().await;
        if let SubmitOutcome::Saved(task) = &outcome {
            self.follow(task);
        }
        outcome
    }

    /// Delete the selected card.
    pub async fn delete_selected(&mut self) -> SubmitOutcome {
        let Some(task) = self.selected_task().cloned() else {
            return SubmitOutcome::Ignored;
        };
        let outcome = match self.ctx.delete_task(&task.id).await {
            Ok(()) => SubmitOutcome::Saved(task),
            Err(e) => SubmitOutcome::Failed(e.user_message()),
        };
        self.apply_outcome(&outcome);
        self.sync().await;
        outcome
    }

    /// Put the selection on `task` after it changed column.
    fn follow(&mut self, task: &Task) {
        if let Some(col) = self.columns.iter().position(|c| c.status == task.status) {
            self.selected_column = col;
            self.selected_card = self.columns[col].tasks.iter().position(|t| t.id == task.id).unwrap_or(0);
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task { id: id.into(), name: id.into(), status, template_id: "daily".into(), created_at: Utc::now() }
    }

    #[test]
    fn title_defaults_to_capitalised_status() {
        assert_eq!(KanbanColumn::new(TaskStatus::Doing).title(), "Doing");
        assert_eq!(KanbanColumn::new(TaskStatus::Doing).with_title("In flight").title(), "In flight");
    }

    #[test]
    fn badge_counts_exact_status_matches() {
        let tasks = vec![task("a", TaskStatus::Todo), task("b", TaskStatus::Done), task("c", TaskStatus::Todo)];
        let mut columns = default_columns();
        for c in &mut columns {
            c.set_tasks(&tasks);
        }
        let badges: Vec<_> = columns.iter().map(KanbanColumn::badge).collect();
        assert_eq!(badges, vec![2, 0, 1]);
    }

    #[test]
    fn default_columns_cover_every_status_once() {
        let statuses: Vec<_> = default_columns().iter().map(|c| c.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
    }

    #[test]
    fn creating_and_editing_are_exclusive() {
        let mut column = KanbanColumn::new(TaskStatus::Todo);
        column.toggle_creating();
        assert!(column.is_creating());

        column.open_edit(&task("a", TaskStatus::Todo));
        assert!(column.is_editing());
        assert!(!column.is_creating());

        column.toggle_creating();
        assert!(column.is_editing());

        column.close();
        column.toggle_creating();
        column.toggle_creating();
        assert!(matches!(column.mode, ColumnMode::Idle));
    }
}
