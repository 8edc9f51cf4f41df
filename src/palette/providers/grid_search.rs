use crate::catalog::work::normalize_term;
use crate::command::Command;
use crate::error::AppResult;
use crate::palette::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteKind, PaletteProvider,
    PaletteSubmitEffect,
};

/// Free-text search scoped to the gallery's active filter.
#[derive(Default)]
pub struct GridSearchPaletteProvider;

impl PaletteProvider for GridSearchPaletteProvider {
    fn kind(&self) -> PaletteKind {
        PaletteKind::GridSearch
    }

    fn title(&self, ctx: &PaletteContext<'_>) -> String {
        format!("Search in {}", ctx.app.grid.filter().label())
    }

    fn input_mode(&self) -> PaletteInputMode {
        PaletteInputMode::ProviderFiltered
    }

    fn list(&self, _ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>> {
        Ok(Vec::new())
    }

    fn on_submit(
        &self,
        ctx: &PaletteContext<'_>,
        _selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect> {
        Ok(PaletteSubmitEffect::Dispatch(Command::GridSearch {
            term: ctx.input.trim().to_string(),
        }))
    }

    fn assistive_text(
        &self,
        ctx: &PaletteContext<'_>,
        _selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        let needle = normalize_term(ctx.input);
        let filter = ctx.app.grid.filter();
        let count = ctx
            .app
            .dataset
            .works()
            .iter()
            .filter(|work| filter.admits(work.year) && work.matches_term(&needle))
            .count();
        Some(format!("{count} matches  Enter: apply  empty clears"))
    }
}
