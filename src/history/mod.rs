pub mod location;
pub mod state;

use crate::app::AppState;
use crate::event::AppEvent;
use crate::extension::Extension;
pub use location::{format_location, parse_image_param};
pub use state::LocationHistory;

pub struct LocationExtension;

impl Extension for LocationExtension {
    type State = LocationHistory;

    fn init_state() -> Self::State {
        LocationHistory::default()
    }

    fn handle_event(state: &mut Self::State, event: &AppEvent, app: &mut AppState) {
        state.on_event(event);
        if let Some(location) = state.location() {
            app.location = location;
        }
    }
}
