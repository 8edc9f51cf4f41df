use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::info;

use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::ui;

use super::input_pump::InputPump;
use super::terminal_session::{TerminalSession, TerminalSurface};

fn is_quit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

/// Shows the unrecoverable dataset error until the user quits.
pub async fn show_dataset_error(message: &str) -> AppResult<()> {
    let mut session = TerminalSession::enter()?;
    let (_tx, mut rx, mut pump) = InputPump::start();
    let mut redraw = true;

    loop {
        if redraw {
            session.draw(|frame| ui::draw_dataset_error(frame, message))?;
            redraw = false;
        }
        match rx.recv().await {
            Some(DomainEvent::Input(event)) if is_quit_key(&event) => break,
            Some(DomainEvent::Input(Event::Resize(_, _))) => redraw = true,
            Some(_) => {}
            None => break,
        }
    }

    info!("dataset error screen closed");
    pump.stop();
    session.restore()?;
    Ok(())
}
