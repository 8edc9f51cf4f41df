use std::time::Instant;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::app::App;
use crate::app::terminal_session::TerminalSurface;
use crate::app::{Mode, Screen};
use crate::command::{ActionId, Command, zoom_wheel};
use crate::error::AppResult;
use crate::gallery::{DragDecision, SwipeDirection};
use crate::input::KeymapPreset;
use crate::ui;

pub(crate) struct InputEventOutcome {
    pub(crate) quit_requested: bool,
    pub(crate) command: Option<Command>,
}

impl InputEventOutcome {
    fn none() -> Self {
        Self {
            quit_requested: false,
            command: None,
        }
    }

    fn command(command: Option<Command>) -> Self {
        Self {
            quit_requested: false,
            command,
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

impl App {
    pub(crate) fn handle_input_event(
        &mut self,
        event: Event,
        session: &mut impl TerminalSurface,
        needs_redraw: &mut bool,
        now: Instant,
    ) -> AppResult<InputEventOutcome> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                let preset = KeymapPreset::parse(&self.config.keymap.preset);
                let outcome = self
                    .interaction
                    .handle_key_event(&mut self.state, key, preset)?;
                if outcome.clear_terminal {
                    session.clear()?;
                }
                if outcome.redraw {
                    *needs_redraw = true;
                }
                Ok(InputEventOutcome {
                    quit_requested: outcome.quit_requested,
                    command: outcome.command,
                })
            }
            Event::Mouse(mouse) => {
                let command = self.handle_mouse_event(mouse, session, needs_redraw, now);
                Ok(InputEventOutcome::command(command))
            }
            Event::Resize(_, _) => {
                *needs_redraw = true;
                Ok(InputEventOutcome::none())
            }
            _ => Ok(InputEventOutcome::none()),
        }
    }

    /// Drag swipes on the image, pans the zoomed lightbox, wheel-zooms and opens grid tiles.
    pub(crate) fn handle_mouse_event(
        &mut self,
        mouse: MouseEvent,
        session: &impl TerminalSurface,
        needs_redraw: &mut bool,
        now: Instant,
    ) -> Option<Command> {
        if self.state.mode == Mode::Palette {
            return None;
        }
        let areas = Self::current_areas(session, &self.state)?;
        let (cell_width, _) = self.cell_size_px();
        let x_px = f64::from(mouse.column) * f64::from(cell_width);
        let width_px = f64::from(areas.image.width) * f64::from(cell_width);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match self.state.screen {
                Screen::Grid => {
                    let offset = ui::tile_at(areas.viewer, &self.state.grid, mouse.column, mouse.row)?;
                    self.state.grid.select(offset);
                    *needs_redraw = true;
                    let (items, index) = self.state.grid.open_at(offset)?;
                    Some(Command::OpenLightbox { items, index })
                }
                Screen::Hero | Screen::Lightbox => {
                    if !contains(areas.image, mouse.column, mouse.row) {
                        return None;
                    }
                    if self.state.screen == Screen::Lightbox && !self.state.lightbox.accepts_swipe() {
                        self.interaction.pointer.pan_anchor = Some((mouse.column, mouse.row));
                        return None;
                    }
                    let view = self.state.active_view()?;
                    let transitioning = self.state.navigator(view).is_transitioning();
                    if self.state.drag.begin(x_px, now, transitioning) {
                        *needs_redraw = true;
                    }
                    None
                }
            },
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((last_column, last_row)) = self.interaction.pointer.pan_anchor {
                    let scale = self.state.lightbox.zoom().scale().max(1.0);
                    let dx = -(f32::from(mouse.column) - f32::from(last_column))
                        / f32::from(areas.image.width.max(1))
                        / scale;
                    let dy = -(f32::from(mouse.row) - f32::from(last_row))
                        / f32::from(areas.image.height.max(1))
                        / scale;
                    if self.state.lightbox.zoom_mut().pan_by(dx, dy) {
                        *needs_redraw = true;
                    }
                    self.interaction.pointer.pan_anchor = Some((mouse.column, mouse.row));
                    return None;
                }
                if self.state.drag.update(x_px, width_px).is_some() {
                    *needs_redraw = true;
                }
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.interaction.pointer.pan_anchor.take().is_some() {
                    return None;
                }
                let decision = self.state.drag.release(now)?;
                *needs_redraw = true;
                match decision {
                    DragDecision::Commit(direction) => {
                        debug!(?direction, "swipe committed");
                        self.state.status.last_action_id = Some(ActionId::Swipe);
                        Some(match direction {
                            SwipeDirection::Next => Command::Next,
                            SwipeDirection::Previous => Command::Prev,
                        })
                    }
                    DragDecision::Cancel => None,
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
                if self.state.screen == Screen::Lightbox =>
            {
                let zoom_in = mouse.kind == MouseEventKind::ScrollUp;
                zoom_wheel(&mut self.state, zoom_in);
                *needs_redraw = true;
                None
            }
            _ => None,
        }
    }
}
