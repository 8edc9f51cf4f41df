mod encode;
mod factory;
mod image_ops;
mod protocol_cache;
mod ratatui;
mod terminal_cell;
mod traits;

#[cfg(test)]
mod tests;

pub use factory::create_presenter;
pub use ratatui::RatatuiImagePresenter;
pub use traits::{FrameKey, ImagePresenter, PresenterKind, Viewport};
