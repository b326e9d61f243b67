//! Stock keybindings registered before the tag bindings.

use crate::command::Keybinding;
use crate::command::Modifier::{Control, Shift, Super};

/// Launcher, window focus and layout bindings, in registration order.
pub fn default_bindings() -> Vec<Keybinding> {
    vec![
        Keybinding::normal(&[Super], "Return", ["spawn", "alacritty"]),
        Keybinding::normal(&[Super, Shift], "P", ["spawn", "rofi -show drun"]),
        Keybinding::normal(&[Super], "BackSpace", ["close"]),
        Keybinding::normal(&[Super, Control, Shift], "BackSpace", ["exit"]),
        Keybinding::normal(&[Super], "J", ["focus-view", "next"]),
        Keybinding::normal(&[Super], "K", ["focus-view", "previous"]),
        Keybinding::normal(&[Super, Control], "J", ["swap", "next"]),
        Keybinding::normal(&[Super, Control], "K", ["swap", "previous"]),
        // rivertile main area ratio and count
        Keybinding::normal(
            &[Super, Shift],
            "H",
            ["send-layout-cmd", "rivertile", "main-ratio -0.05"],
        ),
        Keybinding::normal(
            &[Super, Shift],
            "L",
            ["send-layout-cmd", "rivertile", "main-ratio +0.05"],
        ),
        Keybinding::normal(
            &[Super, Control, Shift],
            "H",
            ["send-layout-cmd", "rivertile", "main-count +1"],
        ),
        Keybinding::normal(
            &[Super, Control, Shift],
            "L",
            ["send-layout-cmd", "rivertile", "main-count -1"],
        ),
        Keybinding::normal(&[Super], "Space", ["toggle-float"]),
        Keybinding::normal(&[Super, Shift], "M", ["toggle-fullscreen"]),
    ]
}
