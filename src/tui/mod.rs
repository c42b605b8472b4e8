pub mod render;
pub mod state;
pub mod view;

use crate::engine::form::FormField;
use crate::service::types::{PredictionFailure, PredictionResult, TeamSelection};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;

/// Commands the TUI sends to the request worker.
#[derive(Debug, Clone)]
pub enum TuiCommand {
    Predict(TeamSelection),
    Quit,
}

/// What a key press asks the loop to do after the state has been updated.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Continue,
    Submit(TeamSelection),
    Quit,
}

/// Apply one key press to the form. Pure apart from `state`, so the
/// bindings can be tested without a terminal.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return KeyAction::Quit,
        KeyCode::Tab | KeyCode::Down => state.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.form.focus_prev(),
        KeyCode::Enter => {
            if let Some(selection) = state.try_submit() {
                return KeyAction::Submit(selection);
            }
        }
        KeyCode::Esc => state.form_message = None,
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            if state.form.focus == FormField::Mode =>
        {
            state.form.toggle_mode();
        }
        KeyCode::Right => {
            if let Some(catalog) = &state.catalog {
                state.form.accept_candidate(catalog);
            }
        }
        KeyCode::Char(c) if !ctrl => {
            state.form.push_char(c);
            state.form_message = None;
        }
        KeyCode::Backspace => {
            state.form.backspace();
            state.form_message = None;
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Run the TUI. Owns `state`; sends requests on `cmd_tx` and applies
/// whatever comes back on `result_rx`.
pub async fn run_tui(
    state: AppState,
    cmd_tx: mpsc::Sender<TuiCommand>,
    result_rx: mpsc::Receiver<PredictionResult>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state, cmd_tx, result_rx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state: AppState,
    cmd_tx: mpsc::Sender<TuiCommand>,
    mut result_rx: mpsc::Receiver<PredictionResult>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut spinner_frame: u8 = 0;

    loop {
        terminal.draw(|f| render::draw(f, &state, spinner_frame))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handle_key(&mut state, key) {
                        KeyAction::Continue => {}
                        KeyAction::Submit(selection) => {
                            if cmd_tx.send(TuiCommand::Predict(selection.clone())).await.is_err() {
                                tracing::error!("request worker gone");
                                state.apply_result(PredictionResult::Failure(
                                    PredictionFailure::connection(&selection),
                                ));
                            }
                        }
                        KeyAction::Quit => {
                            let _ = cmd_tx.send(TuiCommand::Quit).await;
                            return Ok(());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(result) = result_rx.recv() => state.apply_result(result),
            _ = tick.tick() => spinner_frame = spinner_frame.wrapping_add(1),
        }
    }
}
