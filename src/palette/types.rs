use crate::app::AppState;
use crate::command::Command;
use crate::error::AppResult;
use crate::gallery::FilterKey;

use super::kind::PaletteKind;

/// How typed input narrows the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteInputMode {
    /// The manager ranks candidate labels against the input.
    RankLabels,
    /// The provider already applied the input inside `list`.
    ProviderFiltered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalettePayload {
    Work(usize),
    Filter(FilterKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub payload: PalettePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteSubmitEffect {
    Close,
    /// Close the palette, then run the command.
    Dispatch(Command),
}

pub struct PaletteContext<'a> {
    pub app: &'a AppState,
    pub input: &'a str,
}

pub trait PaletteProvider: Send + Sync {
    fn kind(&self) -> PaletteKind;

    fn title(&self, ctx: &PaletteContext<'_>) -> String;

    fn input_mode(&self) -> PaletteInputMode;

    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>>;

    fn on_submit(
        &self,
        ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect>;

    /// Hint line under the input, e.g. a match count.
    fn assistive_text(
        &self,
        _ctx: &PaletteContext<'_>,
        _selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteItemView {
    pub label: String,
    pub detail: Option<String>,
    pub selected: bool,
}

/// Snapshot of the open palette for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteView {
    pub title: String,
    pub kind: PaletteKind,
    pub input: String,
    pub cursor: usize,
    pub assistive_text: Option<String>,
    pub items: Vec<PaletteItemView>,
    pub selected_idx: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteKeyResult {
    Consumed { redraw: bool },
    CloseRequested { session_id: u64 },
    Submit { session_id: u64, effect: PaletteSubmitEffect },
}
