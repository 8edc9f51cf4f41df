use crate::gallery::{FilterKey, GridMove, LoadRequest, LoadSlot};
use crate::palette::PaletteKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    ToggleGallery,
    OpenPalette {
        kind: PaletteKind,
        seed: Option<String>,
    },
    ClosePalette,
    /// Grid search inside the gallery, the works palette elsewhere.
    OpenSearch,
    OpenLightbox {
        items: Vec<usize>,
        index: usize,
    },
    SetFilter {
        key: FilterKey,
    },
    GridSearch {
        term: String,
    },
    NextPage,
    PrevPage,
    GridMove {
        direction: GridMove,
    },
    ToggleZoom,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Pan {
        dx: i8,
        dy: i8,
    },
    ToggleInfo,
    FocusNext,
    FocusPrev,
    Activate,
    RunAction,
    Retry,
    HistoryBack,
    HistoryForward,
    Cancel,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    Next,
    Prev,
    ToggleGallery,
    OpenPalette,
    ClosePalette,
    Search,
    OpenLightbox,
    SetFilter,
    GridSearch,
    NextPage,
    PrevPage,
    GridMove,
    ToggleZoom,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Pan,
    ToggleInfo,
    FocusNext,
    FocusPrev,
    Activate,
    RunAction,
    Retry,
    HistoryBack,
    HistoryForward,
    Cancel,
    Quit,
    Input,
    Swipe,
    Autoplay,
    LoadImage,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
            Self::ToggleGallery => "toggle-gallery",
            Self::OpenPalette => "open-palette",
            Self::ClosePalette => "close-palette",
            Self::Search => "search",
            Self::OpenLightbox => "open-lightbox",
            Self::SetFilter => "set-filter",
            Self::GridSearch => "grid-search",
            Self::NextPage => "next-page",
            Self::PrevPage => "prev-page",
            Self::GridMove => "grid-move",
            Self::ToggleZoom => "toggle-zoom",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::ZoomReset => "zoom-reset",
            Self::Pan => "pan",
            Self::ToggleInfo => "toggle-info",
            Self::FocusNext => "focus-next",
            Self::FocusPrev => "focus-prev",
            Self::Activate => "activate",
            Self::RunAction => "run-action",
            Self::Retry => "retry",
            Self::HistoryBack => "history-back",
            Self::HistoryForward => "history-forward",
            Self::Cancel => "cancel",
            Self::Quit => "quit",
            Self::Input => "input",
            Self::Swipe => "swipe",
            Self::Autoplay => "autoplay",
            Self::LoadImage => "load-image",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::Next => ActionId::Next,
            Self::Prev => ActionId::Prev,
            Self::ToggleGallery => ActionId::ToggleGallery,
            Self::OpenPalette { .. } => ActionId::OpenPalette,
            Self::ClosePalette => ActionId::ClosePalette,
            Self::OpenSearch => ActionId::Search,
            Self::OpenLightbox { .. } => ActionId::OpenLightbox,
            Self::SetFilter { .. } => ActionId::SetFilter,
            Self::GridSearch { .. } => ActionId::GridSearch,
            Self::NextPage => ActionId::NextPage,
            Self::PrevPage => ActionId::PrevPage,
            Self::GridMove { .. } => ActionId::GridMove,
            Self::ToggleZoom => ActionId::ToggleZoom,
            Self::ZoomIn => ActionId::ZoomIn,
            Self::ZoomOut => ActionId::ZoomOut,
            Self::ZoomReset => ActionId::ZoomReset,
            Self::Pan { .. } => ActionId::Pan,
            Self::ToggleInfo => ActionId::ToggleInfo,
            Self::FocusNext => ActionId::FocusNext,
            Self::FocusPrev => ActionId::FocusPrev,
            Self::Activate => ActionId::Activate,
            Self::RunAction => ActionId::RunAction,
            Self::Retry => ActionId::Retry,
            Self::HistoryBack => ActionId::HistoryBack,
            Self::HistoryForward => ActionId::HistoryForward,
            Self::Cancel => ActionId::Cancel,
            Self::Quit => ActionId::Quit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}

/// Work a command hands back to the event loop, which owns the workers and the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEffect {
    Load { slot: LoadSlot, request: LoadRequest },
    CancelLoads(LoadSlot),
    OpenLink(String),
}

#[cfg(test)]
mod tests {
    use crate::gallery::GridMove;
    use crate::palette::PaletteKind;

    use super::{ActionId, Command};

    #[test]
    fn command_action_id_maps_parameterized_variants() {
        assert_eq!(Command::OpenSearch.action_id(), ActionId::Search);
        assert_eq!(
            Command::GridMove {
                direction: GridMove::Down,
            }
            .action_id(),
            ActionId::GridMove
        );
        assert_eq!(
            Command::OpenPalette {
                kind: PaletteKind::Works,
                seed: None,
            }
            .action_id(),
            ActionId::OpenPalette
        );
        assert_eq!(ActionId::HistoryBack.as_str(), "history-back");
    }
}
