use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::app::{App, TuiCommand};
use super::input::{InputAction, InputHandler};
use super::render::render_ui;
use crate::constants::UI_REFRESH_INTERVAL_MS;
use crate::session::TurnOutcome;

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("Food Scout's full-screen UI requires an interactive terminal.");
        eprintln!("   Use --plain for line mode or --prompt for a single turn.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (tx, mut rx) = mpsc::channel::<TurnOutcome>(8);

    app.add_notice(
        "Hi! Tell me where you are and what you're in the mood for, and I'll find you a place to eat. Type :help for commands.",
    );
    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<TurnOutcome>,
    rx: &mut mpsc::Receiver<TurnOutcome>,
) -> Result<()> {
    let handler = InputHandler::new();

    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handler.handle_key(key) {
                        InputAction::Submit => submit(app, &tx),
                        InputAction::Cancel => app.clear_input(),
                        InputAction::Insert(c) => app.input.push(c),
                        InputAction::Delete => {
                            app.input.pop();
                        }
                        InputAction::ScrollUp(n) => app.scroll_up(n),
                        InputAction::ScrollDown(n) => app.scroll_down(n),
                        InputAction::ToggleSlots => app.toggle_slots(),
                        InputAction::Quit => app.quit(),
                        InputAction::None => {}
                    }
                }
            }
        }

        // Finished turns
        while let Ok(outcome) = rx.try_recv() {
            finish_turn(app, outcome).await;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}

/// Handle Enter: run a `:` command or start a turn
fn submit(app: &mut App, tx: &mpsc::Sender<TurnOutcome>) {
    let input = app.input.trim().to_string();
    if input.is_empty() {
        return;
    }

    if input.starts_with(':') {
        app.clear_input();
        match TuiCommand::parse(&input) {
            Some(command) => run_command(app, command),
            None => app.set_status(format!("Unknown command: {}", input)),
        }
        return;
    }

    if app.is_generating {
        app.set_status("Still waiting on the last reply...");
        return;
    }

    app.clear_input();
    app.clear_status();
    app.is_generating = true;
    app.pending = Some(input.clone());
    app.scroll_offset = 0;

    let assistant = Arc::clone(&app.assistant);
    let session = Arc::clone(&app.session);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = assistant.process_shared(&session, &input).await;
        if tx.send(outcome).await.is_err() {
            debug!("UI closed before the turn finished");
        }
    });
}

async fn finish_turn(app: &mut App, outcome: TurnOutcome) {
    app.is_generating = false;
    app.pending = None;

    let session = Arc::clone(&app.session);
    let guard = session.lock().await;
    app.sync(&guard);

    if let Some(error) = outcome.error {
        app.set_status(format!("Completion failed: {}", error));
    }
}

fn run_command(app: &mut App, command: TuiCommand) {
    match command {
        TuiCommand::Quit => app.quit(),
        TuiCommand::Clear => {
            let session = Arc::clone(&app.session);
            // A turn in flight holds the lock for its whole duration
            let result = match session.try_lock() {
                Ok(mut guard) => guard.clear().map(|()| app.sync(&guard)),
                Err(_) => {
                    app.set_status("Can't clear while a reply is on its way");
                    return;
                }
            };
            match result {
                Ok(()) => {
                    app.reset_notices();
                    app.set_status("Conversation cleared");
                }
                Err(e) => app.set_status(e.to_string()),
            }
        }
        TuiCommand::Examples => {
            app.input = app.example_prompt.clone();
        }
        TuiCommand::Slots => app.toggle_slots(),
        TuiCommand::Help => {
            let mut help = String::from("Commands:\n");
            for (name, description) in TuiCommand::ALL {
                help.push_str(&format!("{:<10} - {}\n", name, description));
            }
            help.push_str("\nKeys:\nEnter - Send\nEsc - Clear input\nTab - Toggle sidebar\nUp/Down, PgUp/PgDn - Scroll\nCtrl+C - Quit");
            app.add_notice(help);
        }
    }
}
