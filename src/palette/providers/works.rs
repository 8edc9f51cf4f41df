use crate::catalog::Dataset;
use crate::catalog::display::meta_line;
use crate::catalog::work::normalize_term;
use crate::command::Command;
use crate::error::AppResult;
use crate::palette::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteKind, PalettePayload,
    PaletteProvider, PaletteSubmitEffect,
};

const MAX_LISTED: usize = 50;

/// Searches the whole dataset, independent of the gallery filter.
#[derive(Default)]
pub struct WorksPaletteProvider;

/// Dataset indices matching `input`, in dataset order. Empty input matches everything.
pub fn matching_works(dataset: &Dataset, input: &str) -> Vec<usize> {
    let needle = normalize_term(input);
    dataset
        .works()
        .iter()
        .enumerate()
        .filter(|(_, work)| work.matches_term(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

impl PaletteProvider for WorksPaletteProvider {
    fn kind(&self) -> PaletteKind {
        PaletteKind::Works
    }

    fn title(&self, ctx: &PaletteContext<'_>) -> String {
        let count = matching_works(&ctx.app.dataset, ctx.input).len();
        format!("Search artworks ({count})")
    }

    fn input_mode(&self) -> PaletteInputMode {
        PaletteInputMode::ProviderFiltered
    }

    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>> {
        let dataset = &ctx.app.dataset;
        Ok(matching_works(dataset, ctx.input)
            .into_iter()
            .take(MAX_LISTED)
            .filter_map(|idx| {
                let work = dataset.get(idx)?;
                Some(PaletteCandidate {
                    label: work.title.clone(),
                    detail: Some(meta_line(work)),
                    payload: PalettePayload::Work(idx),
                })
            })
            .collect())
    }

    fn on_submit(
        &self,
        ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect> {
        let Some(PalettePayload::Work(work)) = selected.map(|candidate| &candidate.payload) else {
            return Ok(PaletteSubmitEffect::Close);
        };
        let items = matching_works(&ctx.app.dataset, ctx.input);
        let Some(index) = items.iter().position(|idx| idx == work) else {
            return Ok(PaletteSubmitEffect::Close);
        };
        Ok(PaletteSubmitEffect::Dispatch(Command::OpenLightbox { items, index }))
    }

    fn assistive_text(
        &self,
        ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        if selected.is_none() && !ctx.input.trim().is_empty() {
            return Some("No artworks found".to_string());
        }
        Some("Enter: open  Esc: close".to_string())
    }
}
