mod chrome;
mod grid;
mod layout;
mod lightbox;
mod overlay;
mod palette;
mod preview;
mod text;

pub use chrome::{draw_chrome, draw_work_info};
pub use grid::{draw_grid, tile_at};
pub use layout::{INFO_ROWS, UiLayout, split_layout};
pub(crate) use layout::shifted_rect;
pub use lightbox::{LightboxRegions, draw_info_panel, draw_lightbox_controls, lightbox_regions};
pub use overlay::{draw_dataset_error, draw_error_overlay, draw_loading_overlay, draw_notices};
pub use palette::draw_palette_overlay;
pub use preview::{NeighborStrip, draw_neighbor_strip};
