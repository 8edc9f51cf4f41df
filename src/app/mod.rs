mod core;
mod error_screen;
mod event_loop;
mod input_ops;
mod input_pump;
mod load_ops;
mod redraw;
mod state;
pub(crate) mod terminal_session;
mod view_ops;

#[cfg(test)]
mod tests;

pub use core::App;
pub use error_screen::show_dataset_error;
pub use state::{AppState, Mode, Notice, NoticeState, PaletteRequest, Screen, StatusState};
