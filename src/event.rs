use crossterm::event::Event;

use crate::app::Screen;
use crate::command::{ActionId, Command, CommandOutcome};
use crate::gallery::LoadResultEvent;

/// Which navigation context produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Hero,
    Lightbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CommandExecuted {
        id: ActionId,
        outcome: CommandOutcome,
    },
    /// A load completed and the view now shows position `to` (dataset index `work`).
    Navigated {
        view: ViewKind,
        from: usize,
        to: usize,
        work: usize,
    },
    LoadFailed {
        view: ViewKind,
        position: usize,
        message: String,
    },
    ScreenChanged {
        from: Screen,
        to: Screen,
    },
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Command(Command),
    App(AppEvent),
    LoadComplete(LoadResultEvent),
    AutoplayTick,
    RedrawTick,
    Wake,
}
