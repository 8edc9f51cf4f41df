use super::kind::PaletteKind;
use super::providers::{FilterPaletteProvider, GridSearchPaletteProvider, WorksPaletteProvider};
use super::types::PaletteProvider;

/// One provider per palette kind.
#[derive(Default)]
pub struct PaletteRegistry {
    works: WorksPaletteProvider,
    filter: FilterPaletteProvider,
    grid_search: GridSearchPaletteProvider,
}

impl PaletteRegistry {
    pub fn get(&self, kind: PaletteKind) -> &dyn PaletteProvider {
        match kind {
            PaletteKind::Works => &self.works,
            PaletteKind::Filter => &self.filter,
            PaletteKind::GridSearch => &self.grid_search,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::AppState;
    use crate::palette::{PaletteContext, PaletteKind};

    use super::PaletteRegistry;

    #[test]
    fn every_kind_has_a_titled_provider() {
        let registry = PaletteRegistry::default();
        let app = AppState::for_tests();
        let ctx = PaletteContext {
            app: &app,
            input: "",
        };

        for kind in [PaletteKind::Works, PaletteKind::Filter, PaletteKind::GridSearch] {
            let provider = registry.get(kind);
            assert_eq!(provider.kind(), kind);
            assert!(!provider.title(&ctx).is_empty());
        }
    }
}
