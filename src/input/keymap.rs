use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Mode, Screen};
use crate::command::Command;
use crate::gallery::GridMove;
use crate::palette::PaletteKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Vim,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "vim" => Self::Vim,
            _ => Self::Default,
        }
    }
}

/// What the keymap needs to know about the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub mode: Mode,
    pub screen: Screen,
    pub zoomed: bool,
}

impl KeyContext {
    pub fn normal(screen: Screen) -> Self {
        Self {
            mode: Mode::Normal,
            screen,
            zoomed: false,
        }
    }
}

pub fn map_key_to_command(key: KeyEvent, context: KeyContext) -> Option<Command> {
    map_key_to_command_with_preset(key, context, KeymapPreset::Default)
}

pub fn map_key_to_command_with_preset(
    key: KeyEvent,
    context: KeyContext,
    preset: KeymapPreset,
) -> Option<Command> {
    if context.mode == Mode::Palette {
        return None;
    }

    if let Some(command) = map_global_key(key) {
        return Some(command);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
    {
        return None;
    }

    match context.screen {
        Screen::Hero => map_hero_key(key, preset),
        Screen::Grid => map_grid_key(key, preset),
        Screen::Lightbox => map_lightbox_key(key, context.zoomed, preset),
    }
}

fn works_palette() -> Command {
    Command::OpenPalette {
        kind: PaletteKind::Works,
        seed: None,
    }
}

fn map_global_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            KeyCode::Char('k') => Some(works_palette()),
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(':') | KeyCode::Char('G') => Some(works_palette()),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('g') => Some(Command::ToggleGallery),
        KeyCode::Char('r') => Some(Command::Retry),
        KeyCode::Char('a') => Some(Command::RunAction),
        KeyCode::Esc => Some(Command::Cancel),
        _ => None,
    }
}

fn map_hero_key(key: KeyEvent, preset: KeymapPreset) -> Option<Command> {
    match key.code {
        KeyCode::Left => Some(Command::Prev),
        KeyCode::Right | KeyCode::Char(' ') => Some(Command::Next),
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Char('/') => Some(Command::OpenSearch),
        KeyCode::Char('h') => Some(Command::Prev),
        KeyCode::Char('l') => Some(Command::Next),
        KeyCode::Char('j') if preset == KeymapPreset::Vim => Some(Command::Next),
        KeyCode::Char('k') if preset == KeymapPreset::Vim => Some(Command::Prev),
        _ => None,
    }
}

fn map_grid_key(key: KeyEvent, preset: KeymapPreset) -> Option<Command> {
    let direction = match key.code {
        KeyCode::Left => Some(GridMove::Left),
        KeyCode::Right => Some(GridMove::Right),
        KeyCode::Up => Some(GridMove::Up),
        KeyCode::Down => Some(GridMove::Down),
        KeyCode::Char('h') if preset == KeymapPreset::Vim => Some(GridMove::Left),
        KeyCode::Char('l') if preset == KeymapPreset::Vim => Some(GridMove::Right),
        KeyCode::Char('k') if preset == KeymapPreset::Vim => Some(GridMove::Up),
        KeyCode::Char('j') if preset == KeymapPreset::Vim => Some(GridMove::Down),
        _ => None,
    };
    if let Some(direction) = direction {
        return Some(Command::GridMove { direction });
    }

    match key.code {
        KeyCode::Char(']') | KeyCode::PageDown => Some(Command::NextPage),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Command::PrevPage),
        KeyCode::Char('/') => Some(Command::OpenSearch),
        KeyCode::Char('f') => Some(Command::OpenPalette {
            kind: PaletteKind::Filter,
            seed: None,
        }),
        KeyCode::Enter => Some(Command::Activate),
        _ => None,
    }
}

fn map_lightbox_key(key: KeyEvent, zoomed: bool, preset: KeymapPreset) -> Option<Command> {
    if zoomed {
        let pan = match key.code {
            KeyCode::Left => Some((-1, 0)),
            KeyCode::Right => Some((1, 0)),
            KeyCode::Up => Some((0, -1)),
            KeyCode::Down => Some((0, 1)),
            KeyCode::Char('h') if preset == KeymapPreset::Vim => Some((-1, 0)),
            KeyCode::Char('l') if preset == KeymapPreset::Vim => Some((1, 0)),
            KeyCode::Char('k') if preset == KeymapPreset::Vim => Some((0, -1)),
            KeyCode::Char('j') if preset == KeymapPreset::Vim => Some((0, 1)),
            _ => None,
        };
        if let Some((dx, dy)) = pan {
            return Some(Command::Pan { dx, dy });
        }
    } else {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => return Some(Command::Prev),
            KeyCode::Right | KeyCode::Char('l') => return Some(Command::Next),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('i') => Some(Command::ToggleInfo),
        KeyCode::Char('z') => Some(Command::ToggleZoom),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::ZoomIn),
        KeyCode::Char('-') => Some(Command::ZoomOut),
        KeyCode::Char('0') => Some(Command::ZoomReset),
        KeyCode::Tab => Some(Command::FocusNext),
        KeyCode::BackTab => Some(Command::FocusPrev),
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Char('/') => Some(Command::OpenSearch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::{Mode, Screen};
    use crate::command::Command;
    use crate::gallery::GridMove;

    use super::{KeyContext, KeymapPreset, map_key_to_command, map_key_to_command_with_preset};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keymap_preset_parse_defaults_on_unknown_values() {
        assert_eq!(KeymapPreset::parse("default"), KeymapPreset::Default);
        assert_eq!(KeymapPreset::parse("vim"), KeymapPreset::Vim);
        assert_eq!(KeymapPreset::parse("unknown"), KeymapPreset::Default);
    }

    #[test]
    fn arrows_navigate_hero_and_pan_zoomed_lightbox() {
        assert_eq!(
            map_key_to_command(key(KeyCode::Right), KeyContext::normal(Screen::Hero)),
            Some(Command::Next)
        );

        let zoomed = KeyContext {
            mode: Mode::Normal,
            screen: Screen::Lightbox,
            zoomed: true,
        };
        assert_eq!(
            map_key_to_command(key(KeyCode::Right), zoomed),
            Some(Command::Pan { dx: 1, dy: 0 })
        );
        assert_eq!(
            map_key_to_command(key(KeyCode::Left), KeyContext::normal(Screen::Lightbox)),
            Some(Command::Prev)
        );
    }

    #[test]
    fn vim_preset_moves_grid_selection_with_hjkl() {
        let grid = KeyContext::normal(Screen::Grid);
        assert_eq!(
            map_key_to_command_with_preset(key(KeyCode::Char('j')), grid, KeymapPreset::Vim),
            Some(Command::GridMove {
                direction: GridMove::Down,
            })
        );
        assert_eq!(
            map_key_to_command_with_preset(key(KeyCode::Char('j')), grid, KeymapPreset::Default),
            None
        );
    }

    #[test]
    fn ctrl_k_opens_works_palette_everywhere_but_palette_mode() {
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        for screen in [Screen::Hero, Screen::Grid, Screen::Lightbox] {
            assert!(matches!(
                map_key_to_command(ctrl_k, KeyContext::normal(screen)),
                Some(Command::OpenPalette { .. })
            ));
        }

        let palette = KeyContext {
            mode: Mode::Palette,
            screen: Screen::Hero,
            zoomed: false,
        };
        assert_eq!(map_key_to_command(ctrl_k, palette), None);
    }
}
