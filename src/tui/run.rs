//! Terminal setup and the home/board screen loop.

use std::io;
use std::sync::Arc;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::{
    board::TemplateBoard,
    context::TemplateContext,
    fields::Theme,
    store::RemoteStore,
    tui::{
        board::{BoardScreen, BoardExit},
        home::{HomeApp, HomeExit},
    },
};

/// Initialise the terminal and run the interface until the user quits.
/// `initial_template` opens that template's board first.
pub async fn run_tui(store: Arc<RemoteStore>, theme: Theme, initial_template: Option<String>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = screens(&mut terminal, store, theme, initial_template).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn screens<B: Backend>(
    terminal: &mut Terminal<B>,
    store: Arc<RemoteStore>,
    theme: Theme,
    mut open: Option<String>,
) -> io::Result<()> {
    let mut home = HomeApp::new(store.clone(), theme);
    home.load().await;

    loop {
        if let Some(template_id) = open.take() {
            let name = store.template(&template_id).await.map(|t| t.name).unwrap_or_else(|| template_id.clone());
            info!(template_id, "opening board");
            let mut board = TemplateBoard::new(TemplateContext::new(store.clone(), template_id), name);
            board.load().await;
            let mut screen = BoardScreen::new(board, theme);
            if screen.run(terminal).await? == BoardExit::Quit {
                return Ok(());
            }
        }

        match home.run(terminal).await? {
            HomeExit::Quit => return Ok(()),
            HomeExit::OpenBoard(template_id) => open = Some(template_id),
        }
    }
}
