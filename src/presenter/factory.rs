use crate::config::CacheConfig;
use crate::error::AppResult;

use super::ratatui::RatatuiImagePresenter;
use super::traits::{ImagePresenter, PresenterKind};

/// Builds the presenter for `kind`, sizing its protocol cache from `[cache]`.
pub fn create_presenter(
    kind: PresenterKind,
    cache: &CacheConfig,
) -> AppResult<Box<dyn ImagePresenter>> {
    match kind {
        PresenterKind::RatatuiImage => Ok(Box::new(RatatuiImagePresenter::with_cache_limits(
            cache.frame_max_entries,
            cache.frame_memory_budget_bytes(),
        ))),
    }
}
