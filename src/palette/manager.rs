use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::AppState;
use crate::catalog::work::normalize_term;
use crate::error::AppResult;

use super::kind::PaletteKind;
use super::registry::PaletteRegistry;
use super::types::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteItemView, PaletteKeyResult,
    PaletteView,
};

struct OpenPalette {
    id: u64,
    kind: PaletteKind,
    input: Input,
    title: String,
    candidates: Vec<PaletteCandidate>,
    /// Indices into `candidates`, best match first.
    ranked: Vec<usize>,
    selected: usize,
    assistive_text: Option<String>,
}

impl OpenPalette {
    fn selected_candidate(&self) -> Option<&PaletteCandidate> {
        self.ranked
            .get(self.selected)
            .and_then(|idx| self.candidates.get(*idx))
    }

    /// Re-queries the provider for the current input, keeping the selection in range.
    fn refresh(&mut self, registry: &PaletteRegistry, app: &AppState) -> AppResult<()> {
        let provider = registry.get(self.kind);
        let ctx = PaletteContext {
            app,
            input: self.input.value(),
        };
        self.title = provider.title(&ctx);
        self.candidates = provider.list(&ctx)?;
        self.ranked = match provider.input_mode() {
            PaletteInputMode::RankLabels => rank_labels(ctx.input, &self.candidates),
            PaletteInputMode::ProviderFiltered => (0..self.candidates.len()).collect(),
        };
        self.selected = self.selected.min(self.ranked.len().saturating_sub(1));
        let selected = self
            .ranked
            .get(self.selected)
            .and_then(|idx| self.candidates.get(*idx));
        self.assistive_text = provider.assistive_text(&ctx, selected);
        Ok(())
    }

    fn step(&mut self, forward: bool) {
        let last = self.ranked.len().saturating_sub(1);
        self.selected = if forward {
            (self.selected + 1).min(last)
        } else {
            self.selected.saturating_sub(1)
        };
    }
}

/// Owns at most one open palette. Each open gets a fresh session id so late
/// close or submit results from an earlier palette are ignored.
#[derive(Default)]
pub struct PaletteManager {
    last_session_id: u64,
    active: Option<OpenPalette>,
}

impl PaletteManager {
    pub fn open(
        &mut self,
        registry: &PaletteRegistry,
        app: &AppState,
        kind: PaletteKind,
        seed: Option<String>,
    ) -> AppResult<()> {
        self.last_session_id = self.last_session_id.wrapping_add(1);
        let mut palette = OpenPalette {
            id: self.last_session_id,
            kind,
            input: Input::new(seed.unwrap_or_default()),
            title: String::new(),
            candidates: Vec::new(),
            ranked: Vec::new(),
            selected: 0,
            assistive_text: None,
        };
        palette.refresh(registry, app)?;
        self.active = Some(palette);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn close_if_matches(&mut self, session_id: u64) -> bool {
        if self.active.as_ref().map(|palette| palette.id) != Some(session_id) {
            return false;
        }
        self.active = None;
        true
    }

    pub fn handle_key(
        &mut self,
        registry: &PaletteRegistry,
        app: &AppState,
        key: KeyEvent,
    ) -> AppResult<PaletteKeyResult> {
        let Some(palette) = self.active.as_mut() else {
            return Ok(PaletteKeyResult::Consumed { redraw: false });
        };

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                return Ok(PaletteKeyResult::CloseRequested {
                    session_id: palette.id,
                });
            }
            KeyCode::Enter => {
                let ctx = PaletteContext {
                    app,
                    input: palette.input.value(),
                };
                let effect = registry
                    .get(palette.kind)
                    .on_submit(&ctx, palette.selected_candidate())?;
                return Ok(PaletteKeyResult::Submit {
                    session_id: palette.id,
                    effect,
                });
            }
            KeyCode::Up => palette.step(false),
            KeyCode::Down => palette.step(true),
            KeyCode::Char('p') if ctrl => palette.step(false),
            KeyCode::Char('n') if ctrl => palette.step(true),
            _ => {
                let edited = palette
                    .input
                    .handle_event(&Event::Key(key))
                    .is_some_and(|change| change.value);
                if edited {
                    palette.selected = 0;
                }
            }
        }
        palette.refresh(registry, app)?;
        Ok(PaletteKeyResult::Consumed { redraw: true })
    }

    pub fn view(&self) -> Option<PaletteView> {
        let palette = self.active.as_ref()?;
        let items = palette
            .ranked
            .iter()
            .enumerate()
            .filter_map(|(row, idx)| {
                let candidate = palette.candidates.get(*idx)?;
                Some(PaletteItemView {
                    label: candidate.label.clone(),
                    detail: candidate.detail.clone(),
                    selected: row == palette.selected,
                })
            })
            .collect();
        Some(PaletteView {
            title: palette.title.clone(),
            kind: palette.kind,
            input: palette.input.value().to_string(),
            cursor: palette.input.visual_cursor(),
            assistive_text: palette.assistive_text.clone(),
            items,
            selected_idx: palette.selected,
        })
    }
}

/// Labels starting with the input come first, then labels containing it.
/// Each group keeps provider order.
fn rank_labels(input: &str, candidates: &[PaletteCandidate]) -> Vec<usize> {
    let needle = normalize_term(input);
    if needle.is_empty() {
        return (0..candidates.len()).collect();
    }
    let mut prefix = Vec::new();
    let mut contains = Vec::new();
    for (idx, candidate) in candidates.iter().enumerate() {
        let label = normalize_term(&candidate.label);
        if label.starts_with(&needle) {
            prefix.push(idx);
        } else if label.contains(&needle) {
            contains.push(idx);
        }
    }
    prefix.extend(contains);
    prefix
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::AppState;
    use crate::command::Command;
    use crate::gallery::FilterKey;
    use crate::palette::{
        PaletteCandidate, PaletteKeyResult, PaletteKind, PalettePayload, PaletteRegistry,
        PaletteSubmitEffect,
    };

    use super::{PaletteManager, rank_labels};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn candidate(label: &str) -> PaletteCandidate {
        PaletteCandidate {
            label: label.to_string(),
            detail: None,
            payload: PalettePayload::Filter(FilterKey::All),
        }
    }

    #[test]
    fn rank_labels_puts_prefix_matches_before_inner_matches() {
        let candidates = vec![candidate("2022"), candidate("All"), candidate("2024")];
        assert_eq!(rank_labels("2", &candidates), vec![0, 2]);
        assert_eq!(rank_labels("02", &candidates), vec![0, 2]);
        assert_eq!(rank_labels("al", &candidates), vec![1]);
        assert_eq!(rank_labels("  ", &candidates), vec![0, 1, 2]);
    }

    #[test]
    fn selection_clamps_and_resets_on_each_keystroke() {
        let registry = PaletteRegistry::default();
        let app = AppState::for_tests();
        let mut manager = PaletteManager::default();
        manager
            .open(&registry, &app, PaletteKind::Works, None)
            .expect("palette should open");
        assert_eq!(manager.view().map(|view| view.items.len()), Some(5));

        manager
            .handle_key(&registry, &app, key(KeyCode::Up))
            .expect("key should be handled");
        assert_eq!(manager.view().map(|view| view.selected_idx), Some(0));
        for _ in 0..10 {
            manager
                .handle_key(&registry, &app, key(KeyCode::Down))
                .expect("key should be handled");
        }
        assert_eq!(manager.view().map(|view| view.selected_idx), Some(4));

        manager
            .handle_key(&registry, &app, key(KeyCode::Char('o')))
            .expect("key should be handled");
        let view = manager.view().expect("palette should stay open");
        assert_eq!(view.selected_idx, 0);
        assert_eq!(view.input, "o");
    }

    #[test]
    fn enter_submits_selected_work_and_esc_requests_close() {
        let registry = PaletteRegistry::default();
        let app = AppState::for_tests();
        let mut manager = PaletteManager::default();
        manager
            .open(&registry, &app, PaletteKind::Works, Some("field".to_string()))
            .expect("palette should open");

        let result = manager
            .handle_key(&registry, &app, key(KeyCode::Enter))
            .expect("enter should be handled");
        assert!(matches!(
            result,
            PaletteKeyResult::Submit {
                effect: PaletteSubmitEffect::Dispatch(Command::OpenLightbox { ref items, index: 0 }),
                ..
            } if items == &vec![2]
        ));

        let result = manager
            .handle_key(&registry, &app, key(KeyCode::Esc))
            .expect("esc should be handled");
        assert!(matches!(result, PaletteKeyResult::CloseRequested { .. }));
    }

    #[test]
    fn stale_session_id_does_not_close_a_newer_palette() {
        let registry = PaletteRegistry::default();
        let app = AppState::for_tests();
        let mut manager = PaletteManager::default();
        manager
            .open(&registry, &app, PaletteKind::Works, None)
            .expect("palette should open");
        let PaletteKeyResult::CloseRequested { session_id } = manager
            .handle_key(&registry, &app, key(KeyCode::Esc))
            .expect("esc should be handled")
        else {
            panic!("esc should request close");
        };
        manager
            .open(&registry, &app, PaletteKind::Filter, None)
            .expect("palette should reopen");

        assert!(!manager.close_if_matches(session_id));
        assert!(manager.is_open());
    }
}
