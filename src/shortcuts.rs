//! Keyboard-shortcut dispatch: key codes to mixer actions.

/// Step the arrow keys move the master volume by.
pub const MASTER_VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StopAll,
    Toggle(&'static str),
    MasterVolumeUp,
    MasterVolumeDown,
}

/// Map a key code (DOM `KeyboardEvent.code` style) to its action. Digits 1–8
/// toggle the eight base sounds; space toggles the default rain layer.
pub fn action_for_key(code: &str) -> Option<Action> {
    Some(match code {
        "Escape" => Action::StopAll,
        "Space" => Action::Toggle("rain"),
        "ArrowUp" => Action::MasterVolumeUp,
        "ArrowDown" => Action::MasterVolumeDown,
        "Digit1" => Action::Toggle("rain"),
        "Digit2" => Action::Toggle("ocean"),
        "Digit3" => Action::Toggle("coffee"),
        "Digit4" => Action::Toggle("forest"),
        "Digit5" => Action::Toggle("thunder"),
        "Digit6" => Action::Toggle("wind"),
        "Digit7" => Action::Toggle("birds"),
        "Digit8" => Action::Toggle("fire"),
        _ => return None,
    })
}
