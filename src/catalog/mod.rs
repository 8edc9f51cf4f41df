pub mod action;
pub mod dataset;
pub mod display;
pub mod source;
pub mod work;

pub use action::WorkAction;
pub use dataset::Dataset;
pub use source::ImageSource;
pub use work::{Availability, Work};
