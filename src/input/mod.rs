mod handler;
pub mod keymap;

pub use keymap::{KeyContext, KeymapPreset, map_key_to_command, map_key_to_command_with_preset};
