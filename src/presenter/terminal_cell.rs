use crossterm::terminal;
use ratatui_image::picker::{Capability, Picker, ProtocolType};

/// Rebuilds `picker` when the terminal reports a different cell size than the
/// one the picker guessed. Drag thresholds and encode areas are in pixels, so
/// a wrong cell size skews both.
pub(crate) fn picker_with_resolved_cell_size(
    picker: Picker,
    protocol_type: ProtocolType,
) -> Picker {
    let guessed = picker.font_size();
    let Some(resolved) = window_cell_size().or_else(|| reported_cell_size(&picker)) else {
        return picker;
    };
    if resolved == guessed {
        return picker;
    }

    #[allow(deprecated)]
    let mut rebuilt = Picker::from_fontsize(resolved);
    rebuilt.set_protocol_type(protocol_type);
    rebuilt
}

fn reported_cell_size(picker: &Picker) -> Option<(u16, u16)> {
    picker.capabilities().iter().find_map(|cap| match cap {
        Capability::CellSize(Some((width, height))) if *width > 0 && *height > 0 => {
            Some((*width, *height))
        }
        _ => None,
    })
}

fn window_cell_size() -> Option<(u16, u16)> {
    let window = terminal::window_size().ok()?;
    cell_size_from_window_metrics(window.width, window.height, window.columns, window.rows)
}

pub(crate) fn cell_size_from_window_metrics(
    width_px: u16,
    height_px: u16,
    columns: u16,
    rows: u16,
) -> Option<(u16, u16)> {
    if width_px == 0 || height_px == 0 || columns == 0 || rows == 0 {
        return None;
    }
    let cell = (width_px / columns, height_px / rows);
    (cell.0 > 0 && cell.1 > 0).then_some(cell)
}

pub(crate) fn protocol_type_label(protocol: ProtocolType) -> &'static str {
    match protocol {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}
