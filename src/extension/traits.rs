use crate::app::AppState;
use crate::event::AppEvent;

/// A side feature that observes app events without owning any screen.
/// Its state lives in [`super::ExtensionHost`]; the hooks are associated
/// functions so the host can hold each state as a concrete type.
pub trait Extension {
    type State: Send;

    fn init_state() -> Self::State;

    /// Reacts to an event emitted by command dispatch or a finished load.
    fn handle_event(state: &mut Self::State, event: &AppEvent, app: &mut AppState) {
        let _ = (state, event, app);
    }

    /// Polled once per loop iteration. True when the screen needs a redraw.
    fn on_background(state: &mut Self::State, app: &mut AppState) -> bool {
        let _ = (state, app);
        false
    }
}
