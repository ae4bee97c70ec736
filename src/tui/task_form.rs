//! Task forms for the kanban board.
//!
//! `TaskForm` backs the "Edit Task" modal; `NewTaskForm` backs the inline
//! creation form at the top of a column. Both are plain state owned by one
//! column and reset at defined points (see `board::KanbanColumn`).

use crate::{
    fields::TaskStatus,
    task::{Task, UpdateTaskPayload},
    tui::input::InputField,
};

/// Field order in the edit modal.
pub const NAME_FIELD: usize = 0;
pub const STATUS_FIELD: usize = 1;

/// Edit form for an existing task.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// Id of the task being edited; empty when the form has no target.
    pub id: String,
    pub name: InputField,
    pub status: usize,
    pub statuses: Vec<TaskStatus>,
    pub current_field: usize,
}

impl TaskForm {
    /// Empty form defaulting to the column's status.
    pub fn new(status: TaskStatus) -> Self {
        let statuses = TaskStatus::ALL.to_vec();
        let status = statuses.iter().position(|&s| s == status).unwrap_or(0);
        let mut form = Self {
            id: String::new(),
            name: InputField::new(),
            status,
            statuses,
            current_field: NAME_FIELD,
        };
        form.update_active_field();
        form
    }

    /// Form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new(task.status);
        form.id = task.id.clone();
        form.name = InputField::with_value(&task.name);
        form.update_active_field();
        form
    }

    pub fn selected_status(&self) -> TaskStatus {
        self.statuses[self.status]
    }

    pub fn field_count(&self) -> usize {
        2
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        self.name.active = self.current_field == NAME_FIELD;
    }

    pub fn handle_char(&mut self, c: char) {
        if self.current_field == NAME_FIELD {
            self.name.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if self.current_field == NAME_FIELD {
            self.name.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if self.current_field == NAME_FIELD {
            self.name.handle_delete();
        }
    }

    /// Move the cursor, or cycle the status selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            NAME_FIELD => {
                if right {
                    self.name.move_cursor_right()
                } else {
                    self.name.move_cursor_left()
                }
            }
            STATUS_FIELD => {
                if right {
                    self.status = (self.status + 1) % self.statuses.len();
                } else {
                    self.status = if self.status == 0 { self.statuses.len() - 1 } else { self.status - 1 };
                }
            }
            _ => {}
        }
    }

    /// Submit stays disabled while the name is blank.
    pub fn can_submit(&self) -> bool {
        !self.name.is_blank()
    }

    pub fn to_payload(&self) -> UpdateTaskPayload {
        UpdateTaskPayload {
            id: self.id.clone(),
            name: Some(self.name.value.trim().to_string()),
            status: Some(self.selected_status()),
        }
    }
}

/// Inline creation form; the status comes from the column.
#[derive(Debug, Clone, Default)]
pub struct NewTaskForm {
    pub name: InputField,
}

impl NewTaskForm {
    pub fn new() -> Self {
        let mut name = InputField::with_placeholder("New task name");
        name.active = true;
        Self { name }
    }

    pub fn can_submit(&self) -> bool {
        !self.name.is_blank()
    }

    pub fn reset(&mut self) {
        self.name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task() -> Task {
        Task {
            id: "t1".into(),
            name: "Buy bread".into(),
            status: TaskStatus::Doing,
            template_id: "daily".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn from_task_copies_fields() {
        let form = TaskForm::from_task(&task());
        assert_eq!(form.id, "t1");
        assert_eq!(form.name.value, "Buy bread");
        assert_eq!(form.selected_status(), TaskStatus::Doing);
        assert!(form.name.active);
    }

    #[test]
    fn status_selector_cycles() {
        let mut form = TaskForm::new(TaskStatus::Done);
        form.next_field();
        assert_eq!(form.current_field, STATUS_FIELD);
        assert!(!form.name.active);
        form.handle_left_right(true);
        assert_eq!(form.selected_status(), TaskStatus::Todo);
        form.handle_left_right(false);
        assert_eq!(form.selected_status(), TaskStatus::Done);
    }

    #[test]
    fn blank_name_disables_submit() {
        let mut form = TaskForm::from_task(&task());
        assert!(form.can_submit());
        form.name.clear();
        form.name.handle_char(' ');
        assert!(!form.can_submit());
    }

    #[test]
    fn payload_carries_trimmed_name_and_status() {
        let mut form = TaskForm::from_task(&task());
        form.name = InputField::with_value("  Buy milk ");
        let payload = form.to_payload();
        assert_eq!(payload.id, "t1");
        assert_eq!(payload.name.as_deref(), Some("Buy milk"));
        assert_eq!(payload.status, Some(TaskStatus::Doing));
    }
}
