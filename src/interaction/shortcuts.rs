use egui::{Key, Modifiers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shortcut {
    AddNode,
    RemoveSelected,
    Deselect,
    Save,
}

/// Map a key press to an editor shortcut. Callers only ask while no text
/// field has keyboard focus.
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    match key {
        Key::A => Some(Shortcut::AddNode),
        Key::Backspace => Some(Shortcut::RemoveSelected),
        Key::Escape => Some(Shortcut::Deselect),
        Key::S if modifiers.ctrl || modifiers.command || modifiers.mac_cmd => Some(Shortcut::Save),
        _ => None,
    }
}
