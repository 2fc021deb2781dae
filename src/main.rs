//! satchel - a draggable JSON document panel over local, library and
//! cloud storage

use std::io::{self, stdout};
use std::panic;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};

mod backends;
mod config;
mod errors;
mod folder;
mod input;
mod state;
mod store;
mod ui;

use config::Config;
use state::panel::Viewport;
use state::{Mode, Session};
use ui::{AlertDialog, ConfirmDialog, InputDialog, PanelWidget, PreviewPane, StatusBar, Theme};

/// Set up panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));
}

/// Initialize the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)?;
    disable_raw_mode()
}

/// Main event loop
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    theme: &Theme,
) -> io::Result<()> {
    loop {
        let mut cursor_position = None;

        terminal.draw(|frame| {
            let size = frame.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            frame.render_widget(PreviewPane::new(session, theme), chunks[0]);
            frame.render_widget(PanelWidget::new(session, theme), size);
            frame.render_widget(StatusBar::new(session, theme), chunks[1]);

            match &session.mode {
                Mode::ConfirmDelete { entry, focus } => {
                    let message = format!("Delete {} from {}?", entry.name, entry.source.label());
                    frame.render_widget(ConfirmDialog::new(&message, *focus, theme), size);
                }
                Mode::SelectFolder { input, cursor } => {
                    frame.render_widget(
                        InputDialog::new("Select Folder", "Directory path:", input, theme),
                        size,
                    );
                    cursor_position = Some(InputDialog::cursor_position(size, input, *cursor));
                }
                Mode::SaveAs { input, cursor } => {
                    frame.render_widget(
                        InputDialog::new("Save As", "Document name:", input, theme),
                        size,
                    );
                    cursor_position = Some(InputDialog::cursor_position(size, input, *cursor));
                }
                Mode::Alert { message } => {
                    frame.render_widget(AlertDialog::new(message, theme), size);
                }
                Mode::Normal => {}
            }

            if let Some((x, y)) = cursor_position {
                frame.set_cursor_position((x, y));
            }
        })?;

        if session.should_quit {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let size = terminal.size()?;
        let viewport = Viewport::new(size.width, size.height);
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                input::handle_key(session, key, viewport);
            }
            Event::Mouse(mouse) => {
                input::handle_mouse(session, mouse, viewport);
            }
            Event::Resize(width, height) => {
                session.resize(Viewport::new(width, height));
            }
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    setup_panic_hook();

    let config = Config::load();
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(());
        }
    };
    let theme = Theme::default();

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut session, &theme);
    session.shutdown();
    restore_terminal()?;

    result
}
