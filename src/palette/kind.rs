#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKind {
    /// Every work in the dataset; Enter opens the lightbox.
    Works,
    /// Year filter keys for the gallery.
    Filter,
    /// Free-text term applied inside the gallery's active filter.
    GridSearch,
}

impl PaletteKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::Works => "works",
            Self::Filter => "filter",
            Self::GridSearch => "grid-search",
        }
    }
}
