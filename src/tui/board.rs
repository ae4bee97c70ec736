//! Kanban board screen.
//!
//! Renders a [`TemplateBoard`] as three status columns with task cards, the
//! inline creation form, the "Edit Task" modal and the blocking alert, and
//! maps key presses onto board operations.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::{
    board::{ColumnMode, KanbanColumn, SubmitOutcome, TemplateBoard},
    fields::Theme,
    task::Task,
    tui::{
        colors::INK,
        task_form::{TaskForm, STATUS_FIELD},
        utils::wrap_words,
        widgets::{input_lines, render_alert, render_modal},
    },
};

/// Height of one task card in rows.
const CARD_HEIGHT: usize = 4;

/// What the user asked for when leaving the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardExit {
    /// Back to the home screen.
    Home,
    /// Leave the application.
    Quit,
}

/// Board screen state.
pub struct BoardScreen {
    pub board: TemplateBoard,
    pub theme: Theme,
    pub status_message: String,
}

impl BoardScreen {
    pub fn new(board: TemplateBoard, theme: Theme) -> Self {
        Self { board, theme, status_message: String::new() }
    }

    fn report(&mut self, outcome: &SubmitOutcome, done: &str) {
        if let SubmitOutcome::Saved(_) = outcome {
            self.status_message = done.to_string();
        }
    }

    /// Apply one key press. Returns `Some` when the screen should close.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Option<BoardExit> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(BoardExit::Quit);
        }

        // The alert blocks everything else until dismissed.
        if self.board.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.board.dismiss_alert();
            }
            return None;
        }

        let (editing, creating) = {
            let column = self.board.active_column();
            (column.is_editing(), column.is_creating())
        };
        if editing {
            self.handle_edit_key(key).await;
            None
        } else if creating {
            self.handle_create_key(key).await;
            None
        } else {
            self.handle_board_key(key).await
        }
    }

    async fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.board.active_column_mut().close(),
            KeyCode::Enter => {
                let outcome = self.board.submit().await;
                self.report(&outcome, "Task updated");
            }
            _ => {
                if let ColumnMode::Editing(form) = &mut self.board.active_column_mut().mode {
                    match key.code {
                        KeyCode::Tab | KeyCode::Down => form.next_field(),
                        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                        KeyCode::Left => form.handle_left_right(false),
                        KeyCode::Right => form.handle_left_right(true),
                        KeyCode::Backspace => form.handle_backspace(),
                        KeyCode::Delete => form.handle_delete(),
                        KeyCode::Char(c) => form.handle_char(c),
                        _ => {}
                    }
                }
            }
        }
    }

    async fn handle_create_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.board.active_column_mut().close(),
            KeyCode::Enter => {
                let outcome = self.board.submit().await;
                self.report(&outcome, "Task created");
            }
            _ => {
                if let ColumnMode::Creating(form) = &mut self.board.active_column_mut().mode {
                    match key.code {
                        KeyCode::Left => form.name.move_cursor_left(),
                        KeyCode::Right => form.name.move_cursor_right(),
                        KeyCode::Backspace => form.name.handle_backspace(),
                        KeyCode::Delete => form.name.handle_delete(),
                        KeyCode::Char(c) => form.name.handle_char(c),
                        _ => {}
                    }
                }
            }
        }
    }

    async fn handle_board_key(&mut self, key: KeyEvent) -> Option<BoardExit> {
        self.status_message.clear();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(BoardExit::Home),
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let outcome = self.board.move_selected(false).await;
                self.report(&outcome, "Task moved");
            }
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let outcome = self.board.move_selected(true).await;
                self.report(&outcome, "Task moved");
            }
            KeyCode::Left => {
                let col = self.board.selected_column.saturating_sub(1);
                self.board.select_column(col);
            }
            KeyCode::Right => {
                let col = self.board.selected_column + 1;
                self.board.select_column(col);
            }
            KeyCode::Up => self.board.select_card(false),
            KeyCode::Down => self.board.select_card(true),
            KeyCode::Char('+') | KeyCode::Char('n') => self.board.active_column_mut().toggle_creating(),
            KeyCode::Char('e') | KeyCode::Enter => self.board.edit_selected(),
            KeyCode::Char('x') => {
                let outcome = self.board.delete_selected().await;
                self.report(&outcome, "Task deleted");
            }
            KeyCode::Char('r') => {
                self.board.load().await;
                self.status_message = "Reloaded".to_string();
            }
            KeyCode::Char('h') => {
                self.status_message =
                    "n/+: New | e/Enter: Edit | Ctrl+←/→: Move | x: Delete | r: Reload | Esc: Home".to_string();
            }
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        let column = self.board.active_column();
        if let ColumnMode::Editing(form) = &column.mode {
            self.render_edit_modal(f, chunks[1], form, column.color());
        }
        if let Some(message) = &self.board.alert {
            render_alert(f, f.area(), message, self.theme);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled("TEMPLATE", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.board.template_name.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_board(&self, f: &mut Frame, area: Rect) {
        let count = self.board.columns.len() as u16;
        let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count as u32)).collect();
        let areas = Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area);

        for (i, column) in self.board.columns.iter().enumerate() {
            self.render_column(f, areas[i], column, i == self.board.selected_column);
        }
    }

    fn render_column(&self, f: &mut Frame, area: Rect, column: &KanbanColumn, is_selected: bool) {
        let color = column.color();
        let border_style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", column.title()), Style::default().add_modifier(Modifier::BOLD)))
            .title(
                Line::from(Span::styled(format!(" {} ", column.badge()), Style::default().bg(color).fg(INK)))
                    .alignment(Alignment::Right),
            )
            .border_style(border_style);
        let mut inner = block.inner(area);
        f.render_widget(block, area);

        if let ColumnMode::Creating(form) = &column.mode {
            let form_area = Rect { height: inner.height.min(3), ..inner };
            let mut lines = input_lines("New task", &form.name, self.theme);
            lines.push(Line::from(Span::styled("Enter: add  Esc: cancel", Style::default().fg(Color::Gray))));
            f.render_widget(Paragraph::new(lines), form_area);
            inner.y += form_area.height;
            inner.height -= form_area.height;
        }

        if column.tasks.is_empty() {
            return;
        }

        let visible = (inner.height as usize / CARD_HEIGHT).max(1);
        let offset = if is_selected && self.board.selected_card >= visible {
            self.board.selected_card + 1 - visible
        } else {
            0
        };

        let mut y = 0usize;
        for (index, task) in column.tasks.iter().enumerate().skip(offset) {
            if y + CARD_HEIGHT > inner.height as usize {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            let selected = is_selected && index == self.board.selected_card;
            self.render_card(f, card_area, task, color, selected);
            y += CARD_HEIGHT;
        }

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{offset} above")).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { height: 1, ..inner });
        }
        let shown = y / CARD_HEIGHT;
        let remaining = column.tasks.len().saturating_sub(offset + shown);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below")).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { y: inner.y + inner.height - 1, height: 1, ..inner });
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, color: Color, is_selected: bool) {
        let style = if is_selected {
            Style::default().bg(color).fg(INK).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        let width = area.width.saturating_sub(2) as usize;
        let lines: Vec<Line> = wrap_words(&task.name, width, 2).into_iter().map(Line::from).collect();
        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });
        f.render_widget(card, area);
    }

    fn render_edit_modal(&self, f: &mut Frame, area: Rect, form: &TaskForm, color: Color) {
        let inner = render_modal(f, area, "Edit Task", 50, 50, color);
        let mut lines = input_lines("Name", &form.name, self.theme);
        lines.push(Line::from(""));

        let status_label = if form.current_field == STATUS_FIELD {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled("Status", status_label)));
        lines.push(Line::from(format!("◀ {} ▶", form.selected_status())));
        lines.push(Line::from(""));

        let button = if form.can_submit() {
            Style::default().bg(color).fg(INK).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled("[ Update ]", button)));
        lines.push(Line::from(Span::styled(
            "Tab: next field  Enter: update  Esc: cancel",
            Style::default().fg(Color::Gray),
        )));
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let total: usize = self.board.columns.iter().map(KanbanColumn::badge).sum();
            format!("Tasks: {total} | n: New | e: Edit | Ctrl+←/→: Move | x: Delete | h: Help | Esc: Home")
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(self.board.active_column().color()).fg(INK))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop; returns when the user leaves the board.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<BoardExit> {
        loop {
            self.board.sync().await;
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(exit) = self.handle_key(key).await {
                        return Ok(exit);
                    }
                }
            }
        }
    }
}
