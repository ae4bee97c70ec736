//! Home screen: latest tasks, the template list and the "New Template" modal.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::{
    fields::{Theme, Variant},
    store::{RemoteStore, StoreEvent},
    task::{Task, Template},
    tui::{
        colors::{variant_color, COLUMN_BLUE, INK},
        template_form::TemplateForm,
        utils::{centered_rect, truncate},
        widgets::{input_lines, render_alert, render_modal},
    },
};

/// Number of tasks in the "Latest Tasks" section.
pub const LATEST_LIMIT: usize = 5;

/// Result of the home screen loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeExit {
    Quit,
    /// Open the board of the template with this id.
    OpenBoard(String),
}

#[derive(Debug, Clone)]
enum HomeState {
    Templates,
    NewTemplate(TemplateForm),
    DeleteConfirmation(Template),
}

pub struct HomeApp {
    store: Arc<RemoteStore>,
    events: broadcast::Receiver<StoreEvent>,
    theme: Theme,
    state: HomeState,
    list_state: ListState,
    templates: Vec<Template>,
    latest: Vec<Task>,
    alert: Option<String>,
    status_message: String,
}

impl HomeApp {
    pub fn new(store: Arc<RemoteStore>, theme: Theme) -> Self {
        let events = store.subscribe();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            store,
            events,
            theme,
            state: HomeState::Templates,
            list_state,
            templates: Vec::new(),
            latest: Vec::new(),
            alert: None,
            status_message: String::new(),
        }
    }

    /// Fetch templates and latest tasks from the backend.
    pub async fn load(&mut self) {
        if let Err(e) = self.store.fetch_templates().await {
            self.alert = Some(e.user_message());
        }
        if let Err(e) = self.store.fetch_latest_tasks(LATEST_LIMIT).await {
            self.alert = Some(e.user_message());
        }
        self.reload().await;
    }

    async fn reload(&mut self) {
        self.templates = self.store.templates().await;
        self.latest = self.store.latest_tasks(LATEST_LIMIT).await;
        let selected = self.list_state.selected().unwrap_or(0);
        if self.templates.is_empty() {
            self.list_state.select(Some(0));
        } else if selected >= self.templates.len() {
            self.list_state.select(Some(self.templates.len() - 1));
        }
    }

    /// Drain store notifications and refresh both lists if anything changed.
    pub async fn sync(&mut self) -> bool {
        let mut dirty = false;
        loop {
            match self.events.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => dirty = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if dirty {
            self.reload().await;
        }
        dirty
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn latest(&self) -> &[Task] {
        &self.latest
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_creating(&self) -> bool {
        matches!(self.state, HomeState::NewTemplate(_))
    }

    fn selected_template(&self) -> Option<&Template> {
        self.list_state.selected().and_then(|i| self.templates.get(i))
    }

    /// Open the "New Template" modal with an empty form.
    pub fn open_new_template(&mut self) {
        self.state = HomeState::NewTemplate(TemplateForm::new());
    }

    /// Submit the "New Template" form. On failure the form stays open and
    /// the backend's message is raised as an alert.
    pub async fn submit_template(&mut self) -> bool {
        let HomeState::NewTemplate(form) = &self.state else {
            return false;
        };
        let input = form.to_input();
        match self.store.create_template(input).await {
            Ok(template) => {
                self.state = HomeState::Templates;
                self.status_message = format!("Created template '{}'", template.name);
                self.sync().await;
                if let Some(i) = self.templates.iter().position(|t| t.id == template.id) {
                    self.list_state.select(Some(i));
                }
                true
            }
            Err(e) => {
                self.alert = Some(e.user_message());
                false
            }
        }
    }

    async fn delete_template(&mut self, template: &Template) {
        match self.store.delete_template(&template.id).await {
            Ok(()) => self.status_message = format!("Deleted template '{}'", template.name),
            Err(e) => self.alert = Some(e.user_message()),
        }
        self.sync().await;
    }

    /// Apply one key press. Returns `Some` when the screen should close.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Option<HomeExit> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(HomeExit::Quit);
        }
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return None;
        }

        if let HomeState::NewTemplate(form) = &mut self.state {
            match key.code {
                KeyCode::Esc => self.state = HomeState::Templates,
                KeyCode::Enter => {
                    self.submit_template().await;
                }
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.next_field(),
                KeyCode::Left => form.handle_left_right(false),
                KeyCode::Right => form.handle_left_right(true),
                KeyCode::Backspace => form.handle_backspace(),
                KeyCode::Delete => form.handle_delete(),
                KeyCode::Char(c) => form.handle_char(c),
                _ => {}
            }
            return None;
        }

        if let HomeState::DeleteConfirmation(template) = &self.state {
            let template = template.clone();
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.state = HomeState::Templates;
                    self.delete_template(&template).await;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.state = HomeState::Templates,
                _ => {}
            }
            return None;
        }

        self.status_message.clear();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(HomeExit::Quit),
            KeyCode::Up => {
                if let Some(selected) = self.list_state.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.list_state.selected() {
                    if selected + 1 < self.templates.len() {
                        self.list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(template) = self.selected_template() {
                    return Some(HomeExit::OpenBoard(template.id.clone()));
                }
            }
            KeyCode::Char('n') | KeyCode::Char('+') => self.open_new_template(),
            KeyCode::Char('d') => {
                if let Some(template) = self.selected_template().cloned() {
                    self.state = HomeState::DeleteConfirmation(template);
                }
            }
            KeyCode::Char('r') => {
                self.load().await;
                self.status_message = "Reloaded".to_string();
            }
            _ => {}
        }
        None
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                       // Header
                Constraint::Length(LATEST_LIMIT as u16 + 2), // Latest tasks
                Constraint::Min(0),                          // Templates
                Constraint::Length(1),                       // Status bar
            ])
            .split(f.area());

        let header = Paragraph::new(Line::from(Span::styled(
            "TEMPLATE BOARD",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        self.render_latest(f, chunks[1]);
        self.render_templates(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);

        match &self.state {
            HomeState::NewTemplate(form) => self.render_new_template(f, chunks[2], form),
            HomeState::DeleteConfirmation(template) => self.render_delete_confirmation(f, f.area(), template),
            HomeState::Templates => {}
        }
        if let Some(message) = &self.alert {
            render_alert(f, f.area(), message, self.theme);
        }
    }

    fn render_latest(&self, f: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(20) as usize;
        let lines: Vec<Line> = if self.latest.is_empty() {
            vec![Line::from(Span::styled("No tasks yet", Style::default().fg(Color::Gray)))]
        } else {
            self.latest
                .iter()
                .map(|task| {
                    Line::from(vec![
                        Span::styled(
                            format!(" {:<6}", task.status.as_str()),
                            Style::default().bg(variant_color(Variant::for_status(task.status))).fg(INK),
                        ),
                        Span::raw(format!("  {}", truncate(&task.name, width))),
                    ])
                })
                .collect()
        };
        let latest = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Latest Tasks"));
        f.render_widget(latest, area);
    }

    fn render_templates(&mut self, f: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(8) as usize;
        let items: Vec<ListItem> = self
            .templates
            .iter()
            .map(|template| {
                let mut spans = vec![Span::styled(template.name.clone(), Style::default().add_modifier(Modifier::BOLD))];
                if !template.description.is_empty() {
                    let room = width.saturating_sub(template.name.chars().count() + 3);
                    spans.push(Span::styled(
                        format!(" - {}", truncate(&template.description, room)),
                        Style::default().fg(Color::Gray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let title = if self.templates.is_empty() {
            "Your Templates (press n to create one)"
        } else {
            "Your Templates"
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(COLUMN_BLUE).fg(INK))
            .highlight_symbol("► ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_new_template(&self, f: &mut Frame, area: Rect, form: &TemplateForm) {
        let inner = render_modal(f, area, "New Template", 60, 70, COLUMN_BLUE);
        let mut lines = input_lines("Name", &form.name, self.theme);
        lines.push(Line::from(""));
        lines.extend(input_lines("Description", &form.description, self.theme));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab: next field  Enter: create  Esc: cancel",
            Style::default().fg(Color::Gray),
        )));
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_delete_confirmation(&self, f: &mut Frame, area: Rect, template: &Template) {
        let area = centered_rect(60, 30, area);
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Are you sure?", Style::default().add_modifier(Modifier::BOLD).fg(Color::Red))),
            Line::from(""),
            Line::from(format!("Template '{}' and all of its tasks will be deleted.", template.name)),
            Line::from(""),
            Line::from("Press Y to confirm, N or Esc to cancel"),
        ];
        let confirmation = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Delete Template")
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(confirmation, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                HomeState::Templates => "↑↓: Navigate | Enter: Open board | n: Create new Template | d: Delete | r: Reload | q: Quit".to_string(),
                HomeState::NewTemplate(_) => "Type the template name, Enter to create, Esc to cancel".to_string(),
                HomeState::DeleteConfirmation(_) => "Press Y to confirm, N or Esc to cancel".to_string(),
            }
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop for the home screen.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<HomeExit> {
        loop {
            self.sync().await;
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
