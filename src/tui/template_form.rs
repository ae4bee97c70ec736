//! "New Template" form on the home screen.

use crate::{task::CreateTemplateInput, tui::input::InputField};

pub const NAME_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;

#[derive(Debug, Clone)]
pub struct TemplateForm {
    pub name: InputField,
    pub description: InputField,
    pub current_field: usize,
}

impl Default for TemplateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateForm {
    pub fn new() -> Self {
        let mut form = Self {
            name: InputField::with_placeholder("Ex: Daily"),
            description: InputField::with_placeholder("Ex: Tasks to do every day"),
            current_field: NAME_FIELD,
        };
        form.update_active_field();
        form
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % 2;
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        self.name.active = self.current_field == NAME_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
    }

    fn current_mut(&mut self) -> &mut InputField {
        if self.current_field == NAME_FIELD {
            &mut self.name
        } else {
            &mut self.description
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.current_mut().handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.current_mut().handle_backspace();
    }

    pub fn handle_delete(&mut self) {
        self.current_mut().handle_delete();
    }

    pub fn handle_left_right(&mut self, right: bool) {
        let field = self.current_mut();
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    pub fn to_input(&self) -> CreateTemplateInput {
        CreateTemplateInput {
            name: self.name.value.clone(),
            description: self.description.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_active_field() {
        let mut form = TemplateForm::new();
        for c in "Daily".chars() {
            form.handle_char(c);
        }
        form.next_field();
        for c in "Every day".chars() {
            form.handle_char(c);
        }
        let input = form.to_input();
        assert_eq!(input.name, "Daily");
        assert_eq!(input.description, "Every day");
    }

    #[test]
    fn untouched_form_submits_empty_name() {
        assert!(TemplateForm::new().to_input().name.is_empty());
    }
}
