pub mod cache;
pub mod drag;
pub mod frame;
pub mod grid;
pub mod hero;
pub mod layers;
pub mod lightbox;
pub mod loader;
pub mod navigator;
pub mod zoom;

pub use cache::ImageCache;
pub use drag::{DragDecision, DragRecognizer, SwipeDirection};
pub use frame::{CropRect, RgbaFrame};
pub use grid::{FilterKey, GridMove, GridView, PageEntry};
pub use hero::HeroCarousel;
pub use lightbox::{EscapeOutcome, Lightbox, LightboxControl};
pub use loader::{DefaultImageFetcher, ImageFetcher, LoadResultEvent, LoadSlot, LoadTicket, LoadWorker};
pub use navigator::{LoadRequest, NavigationOutcome, Navigator};
pub use zoom::ZoomState;

#[cfg(test)]
mod tests;
