//! Shortcut bindings: the structured trigger form, matching against live
//! input, display/accelerator formatting and the capture ("recording")
//! state machine used by the settings dialog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Logical action names, in matcher order. Dispatch walks this list and
/// the first binding that matches wins, so duplicate bindings across
/// actions resolve deterministically.
pub const ACTIONS: [&str; 22] = [
    "tool-pen",
    "tool-highlighter",
    "tool-rectangle",
    "tool-circle",
    "tool-arrow",
    "tool-line",
    "tool-text",
    "tool-eraser",
    "color-red",
    "color-green",
    "color-blue",
    "color-yellow",
    "color-magenta",
    "color-cyan",
    "color-white",
    "color-black",
    "undo",
    "redo",
    "clear",
    "spotlight",
    "toggle-drawing",
    "toggle-visibility",
];

pub const ACTION_TOGGLE_DRAWING: &str = "toggle-drawing";
pub const ACTION_TOGGLE_VISIBILITY: &str = "toggle-visibility";

pub type ShortcutSet = HashMap<String, ShortcutBinding>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        alt: false,
    };

    pub fn none(self) -> bool {
        !self.ctrl && !self.shift && !self.alt
    }
}

/// One live input event in the shape the matcher understands. Key ids are
/// lowercase ("z", "arrowup", "space"); mouse buttons are ordinals 0..=4.
#[derive(Debug, Clone, PartialEq)]
pub enum Chord {
    Key { id: String, mods: Modifiers },
    Mouse { button: u8, mods: Modifiers },
}

/// Configured trigger for one action. At most one of `key`/`mouse` is
/// meaningful; both unset means the action is unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShortcutBinding {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub mouse: Option<u8>,
}

impl ShortcutBinding {
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn for_key(key: &str, mods: Modifiers) -> Self {
        Self {
            key: Some(key.to_lowercase()),
            ctrl: mods.ctrl,
            shift: mods.shift,
            alt: mods.alt,
            mouse: None,
        }
    }

    pub fn for_mouse(button: u8, mods: Modifiers) -> Self {
        Self {
            key: None,
            ctrl: mods.ctrl,
            shift: mods.shift,
            alt: mods.alt,
            mouse: Some(button),
        }
    }

    pub fn is_unbound(&self) -> bool {
        self.key.is_none() && self.mouse.is_none()
    }

    fn mods(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            shift: self.shift,
            alt: self.alt,
        }
    }

    /// Exact match: key id (or button ordinal) plus all three modifier
    /// flags. An unbound binding never matches anything.
    pub fn matches(&self, chord: &Chord) -> bool {
        match chord {
            Chord::Key { id, mods } => match &self.key {
                Some(key) => key == &id.to_lowercase() && self.mods() == *mods,
                None => false,
            },
            Chord::Mouse { button, mods } => {
                self.mouse == Some(*button) && self.mods() == *mods
            }
        }
    }

    /// Human-readable form shown in the settings dialog and tooltips.
    pub fn display(&self) -> String {
        if self.is_unbound() {
            return "-".to_string();
        }

        let mut parts: Vec<String> = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }

        if let Some(button) = self.mouse {
            parts.push(mouse_display_name(button));
        } else if let Some(key) = &self.key {
            parts.push(key_display_name(key));
        }

        parts.join("+")
    }

    /// Accelerator string in the `Ctrl+Shift+D` grammar understood by
    /// [`crate::hotkey::parse_hotkey`]. `None` for unbound and for
    /// mouse-only bindings, which have no system-wide accelerator form.
    pub fn accelerator(&self) -> Option<String> {
        let key = self.key.as_deref()?;
        let mut parts: Vec<String> = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        parts.push(accelerator_key_name(key));
        Some(parts.join("+"))
    }
}

fn key_display_name(key: &str) -> String {
    match key {
        "space" | " " => "Space".to_string(),
        "arrowup" => "Up Arrow".to_string(),
        "arrowdown" => "Down Arrow".to_string(),
        "arrowleft" => "Left Arrow".to_string(),
        "arrowright" => "Right Arrow".to_string(),
        "escape" => "Esc".to_string(),
        "enter" => "Enter".to_string(),
        "tab" => "Tab".to_string(),
        "backspace" => "Backspace".to_string(),
        "delete" => "Delete".to_string(),
        "insert" => "Insert".to_string(),
        "home" => "Home".to_string(),
        "end" => "End".to_string(),
        "pageup" => "Page Up".to_string(),
        "pagedown" => "Page Down".to_string(),
        other => other.to_uppercase(),
    }
}

fn mouse_display_name(button: u8) -> String {
    match button {
        0 => "Primary".to_string(),
        1 => "Middle".to_string(),
        2 => "Secondary".to_string(),
        3 => "Button 4".to_string(),
        4 => "Button 5".to_string(),
        other => format!("Button {other}"),
    }
}

fn accelerator_key_name(key: &str) -> String {
    match key {
        "space" | " " => "Space".to_string(),
        "arrowup" => "Up".to_string(),
        "arrowdown" => "Down".to_string(),
        "arrowleft" => "Left".to_string(),
        "arrowright" => "Right".to_string(),
        "escape" => "Escape".to_string(),
        "enter" => "Enter".to_string(),
        "tab" => "Tab".to_string(),
        "backspace" => "Backspace".to_string(),
        "delete" => "Delete".to_string(),
        "insert" => "Insert".to_string(),
        "home" => "Home".to_string(),
        "end" => "End".to_string(),
        "pageup" => "PageUp".to_string(),
        "pagedown" => "PageDown".to_string(),
        other => other.to_uppercase(),
    }
}

/// Built-in immutable defaults, also the fallback when persisted settings
/// are missing or corrupt.
pub fn default_bindings() -> ShortcutSet {
    let mut set = ShortcutSet::new();
    set.insert("tool-pen".into(), ShortcutBinding::for_key("1", Modifiers::CTRL));
    set.insert("tool-highlighter".into(), ShortcutBinding::for_key("2", Modifiers::CTRL));
    set.insert("tool-rectangle".into(), ShortcutBinding::for_key("3", Modifiers::CTRL));
    set.insert("tool-circle".into(), ShortcutBinding::for_key("4", Modifiers::CTRL));
    set.insert("tool-arrow".into(), ShortcutBinding::for_key("5", Modifiers::CTRL));
    set.insert("tool-line".into(), ShortcutBinding::for_key("6", Modifiers::CTRL));
    set.insert("tool-text".into(), ShortcutBinding::for_key("t", Modifiers::NONE));
    set.insert("tool-eraser".into(), ShortcutBinding::for_key("e", Modifiers::CTRL));
    for color_action in [
        "color-red",
        "color-green",
        "color-blue",
        "color-yellow",
        "color-magenta",
        "color-cyan",
        "color-white",
        "color-black",
    ] {
        set.insert(color_action.into(), ShortcutBinding::unbound());
    }
    set.insert("undo".into(), ShortcutBinding::for_key("z", Modifiers::CTRL));
    set.insert("redo".into(), ShortcutBinding::for_key("y", Modifiers::CTRL));
    set.insert("clear".into(), ShortcutBinding::for_key("c", Modifiers::CTRL_SHIFT));
    set.insert("spotlight".into(), ShortcutBinding::for_key("s", Modifiers::CTRL_SHIFT));
    set.insert(
        ACTION_TOGGLE_DRAWING.into(),
        ShortcutBinding::for_key("d", Modifiers::CTRL_SHIFT),
    );
    set.insert(
        ACTION_TOGGLE_VISIBILITY.into(),
        ShortcutBinding::for_key("a", Modifiers::CTRL_SHIFT),
    );
    set
}

/// First action (in [`ACTIONS`] order) whose binding matches the chord.
pub fn action_for_chord(bindings: &ShortcutSet, chord: &Chord) -> Option<&'static str> {
    ACTIONS
        .into_iter()
        .find(|action| bindings.get(*action).is_some_and(|b| b.matches(chord)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Not armed, or the event does not qualify (bare modifier, plain
    /// left click). Recording stays armed.
    Ignored,
    /// Escape pressed: recording stopped, binding untouched.
    Cancelled,
    /// Delete/Backspace pressed: binding reset to unbound.
    Cleared,
    /// A qualifying chord overwrote the staged binding.
    Captured,
}

/// Capture state for the settings dialog. At most one action records at a
/// time; arming a second action implicitly disarms the first.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRecorder {
    armed: Option<String>,
}

impl ShortcutRecorder {
    pub fn arm(&mut self, action: &str) {
        self.armed = Some(action.to_string());
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.armed.is_some()
    }

    pub fn capture_key(
        &mut self,
        staged: &mut ShortcutSet,
        key: &str,
        mods: Modifiers,
    ) -> CaptureOutcome {
        let Some(action) = self.armed.clone() else {
            return CaptureOutcome::Ignored;
        };

        let key = key.to_lowercase();
        if matches!(key.as_str(), "control" | "ctrl" | "shift" | "alt" | "meta") {
            return CaptureOutcome::Ignored;
        }

        if key == "escape" && mods.none() {
            self.armed = None;
            return CaptureOutcome::Cancelled;
        }

        if (key == "delete" || key == "backspace") && mods.none() {
            staged.insert(action, ShortcutBinding::unbound());
            self.armed = None;
            return CaptureOutcome::Cleared;
        }

        staged.insert(action, ShortcutBinding::for_key(&key, mods));
        self.armed = None;
        CaptureOutcome::Captured
    }

    pub fn capture_mouse(
        &mut self,
        staged: &mut ShortcutSet,
        button: u8,
        mods: Modifiers,
    ) -> CaptureOutcome {
        let Some(action) = self.armed.clone() else {
            return CaptureOutcome::Ignored;
        };

        // A bare left click is how the user operates the dialog itself.
        if button == 0 && mods.none() {
            return CaptureOutcome::Ignored;
        }

        staged.insert(action, ShortcutBinding::for_mouse(button, mods));
        self.armed = None;
        CaptureOutcome::Captured
    }
}
