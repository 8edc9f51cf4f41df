mod filter;
mod grid_search;
mod works;

pub use filter::FilterPaletteProvider;
pub use grid_search::GridSearchPaletteProvider;
pub use works::{WorksPaletteProvider, matching_works};
