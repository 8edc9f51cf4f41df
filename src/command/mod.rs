mod core;
mod dispatch;
mod types;

pub(crate) use core::{announce_lightbox, zoom_wheel};
pub use dispatch::{CommandDispatchResult, dispatch, drain_background_events};
pub use types::{ActionId, Command, CommandEffect, CommandOutcome};
