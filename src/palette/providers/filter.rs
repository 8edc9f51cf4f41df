use crate::command::Command;
use crate::error::AppResult;
use crate::gallery::grid::filter_keys;
use crate::palette::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteKind, PalettePayload,
    PaletteProvider, PaletteSubmitEffect,
};

#[derive(Default)]
pub struct FilterPaletteProvider;

impl PaletteProvider for FilterPaletteProvider {
    fn kind(&self) -> PaletteKind {
        PaletteKind::Filter
    }

    fn title(&self, _ctx: &PaletteContext<'_>) -> String {
        "Filter by year".to_string()
    }

    fn input_mode(&self) -> PaletteInputMode {
        PaletteInputMode::RankLabels
    }

    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>> {
        let dataset = &ctx.app.dataset;
        let active = ctx.app.grid.filter();
        Ok(filter_keys(dataset)
            .into_iter()
            .map(|key| {
                let label = key.label();
                let count = dataset
                    .works()
                    .iter()
                    .filter(|work| key.admits(work.year))
                    .count();
                let marker = if key == active { " (current)" } else { "" };
                PaletteCandidate {
                    detail: Some(format!("{count} works{marker}")),
                    label,
                    payload: PalettePayload::Filter(key),
                }
            })
            .collect())
    }

    fn on_submit(
        &self,
        _ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect> {
        let Some(PalettePayload::Filter(key)) = selected.map(|candidate| &candidate.payload) else {
            return Ok(PaletteSubmitEffect::Close);
        };
        Ok(PaletteSubmitEffect::Dispatch(Command::SetFilter { key: *key }))
    }
}

#[cfg(test)]
mod tests {
    use crate::app::AppState;
    use crate::command::Command;
    use crate::gallery::FilterKey;
    use crate::palette::{PaletteContext, PaletteProvider, PaletteSubmitEffect};

    use super::FilterPaletteProvider;

    #[test]
    fn lists_all_then_years_descending_and_submits_filter() {
        let app = AppState::for_tests();
        let ctx = PaletteContext {
            app: &app,
            input: "",
        };
        let list = FilterPaletteProvider
            .list(&ctx)
            .expect("list should be built");
        let labels = list
            .iter()
            .map(|candidate| candidate.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["All", "2024", "2023", "2022"]);
        assert_eq!(list[0].detail.as_deref(), Some("5 works (current)"));

        let effect = FilterPaletteProvider
            .on_submit(&ctx, list.get(2))
            .expect("submit should succeed");
        assert_eq!(
            effect,
            PaletteSubmitEffect::Dispatch(Command::SetFilter {
                key: FilterKey::Year(2023),
            })
        );
    }
}
