//! Session state: current tool/color/size, drawing-mode and spotlight
//! flags, and the staged shortcut-editing flow. Owned by the overlay app
//! and passed by reference to the gesture controller and renderer.

use crate::ink::history::History;
use crate::ink::messages::HostSignal;
use crate::ink::model::{Color, Tool};
use crate::ink::shortcuts::{
    self, CaptureOutcome, Chord, Modifiers, ShortcutRecorder, ShortcutSet,
};

pub const DEFAULT_STROKE_SIZE: f32 = 3.0;
pub const MIN_STROKE_SIZE: f32 = 1.0;
pub const MAX_STROKE_SIZE: f32 = 20.0;

/// Quick palette, in toolbar order. The `color-*` actions resolve
/// through this table.
pub const PALETTE: [(&str, Color); 8] = [
    ("color-red", Color::rgb(255, 0, 0)),
    ("color-green", Color::rgb(0, 255, 0)),
    ("color-blue", Color::rgb(0, 0, 255)),
    ("color-yellow", Color::rgb(255, 255, 0)),
    ("color-magenta", Color::rgb(255, 0, 255)),
    ("color-cyan", Color::rgb(0, 255, 255)),
    ("color-white", Color::rgb(255, 255, 255)),
    ("color-black", Color::rgb(0, 0, 0)),
];

pub fn color_for_action(action: &str) -> Option<Color> {
    PALETTE
        .into_iter()
        .find(|(name, _)| *name == action)
        .map(|(_, color)| color)
}

/// Operations the session asks the host window layer to perform. The
/// core never talks to the platform directly; the overlay app executes
/// these against its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// `true`: the overlay captures pointer input; `false`: pointer
    /// events pass through to the desktop beneath.
    CapturePointer(bool),
    ToggleVisibility,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChordOutcome {
    /// The armed recorder consumed the chord.
    Recording(CaptureOutcome),
    /// Escape dismissed the settings dialog.
    SettingsClosed,
    /// A bound action ran.
    Action {
        name: &'static str,
        request: Option<HostRequest>,
    },
    Unmatched,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    tool: Tool,
    color: Color,
    stroke_size: f32,
    drawing_mode: bool,
    spotlight: bool,
    settings_open: bool,
    bindings: ShortcutSet,
    staged: ShortcutSet,
    recorder: ShortcutRecorder,
}

impl SessionState {
    pub fn new(bindings: ShortcutSet) -> Self {
        Self {
            tool: Tool::Pen,
            color: Color::rgb(255, 0, 0),
            stroke_size: DEFAULT_STROKE_SIZE,
            drawing_mode: true,
            spotlight: false,
            settings_open: false,
            staged: ShortcutSet::new(),
            bindings,
            recorder: ShortcutRecorder::default(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_size(&self) -> f32 {
        self.stroke_size
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn spotlight(&self) -> bool {
        self.spotlight
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn bindings(&self) -> &ShortcutSet {
        &self.bindings
    }

    pub fn staged(&self) -> &ShortcutSet {
        &self.staged
    }

    pub fn recorder(&self) -> &ShortcutRecorder {
        &self.recorder
    }

    /// Gestures are only interpreted while drawing mode is on and neither
    /// the settings dialog nor a shortcut capture is active.
    pub fn gestures_enabled(&self) -> bool {
        self.drawing_mode && !self.settings_open && !self.recorder.is_recording()
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn select_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_stroke_size(&mut self, size: f32) {
        self.stroke_size = size.clamp(MIN_STROKE_SIZE, MAX_STROKE_SIZE);
    }

    pub fn toggle_drawing_mode(&mut self) -> HostRequest {
        self.set_drawing_mode(!self.drawing_mode)
    }

    pub fn set_drawing_mode(&mut self, on: bool) -> HostRequest {
        self.drawing_mode = on;
        tracing::debug!(drawing_mode = on, "drawing mode changed");
        HostRequest::CapturePointer(on)
    }

    pub fn toggle_spotlight(&mut self) {
        self.spotlight = !self.spotlight;
        tracing::debug!(spotlight = self.spotlight, "spotlight toggled");
    }

    /// Open the settings dialog, staging a working copy of the committed
    /// bindings for the editor to mutate.
    pub fn open_settings(&mut self) {
        self.staged = self.bindings.clone();
        self.settings_open = true;
    }

    /// Dismiss the dialog, discarding staged edits.
    pub fn cancel_settings(&mut self) {
        self.settings_open = false;
        self.recorder.disarm();
    }

    /// Atomically replace the committed bindings with the staged copy and
    /// close the dialog. The caller persists the returned set and
    /// re-registers global hotkeys.
    pub fn save_settings(&mut self) -> &ShortcutSet {
        self.bindings = self.staged.clone();
        self.settings_open = false;
        self.recorder.disarm();
        &self.bindings
    }

    /// Restore built-in defaults into the working copy only; nothing is
    /// committed until save.
    pub fn reset_staged(&mut self) {
        self.staged = shortcuts::default_bindings();
        self.recorder.disarm();
    }

    pub fn arm_recording(&mut self, action: &str) {
        self.recorder.arm(action);
    }

    /// Route one live chord: an armed recorder captures it, an open
    /// settings dialog swallows everything but Escape, otherwise the
    /// first matching binding's action runs.
    pub fn handle_chord(&mut self, chord: &Chord, history: &mut History) -> ChordOutcome {
        if self.recorder.is_recording() {
            let outcome = match chord {
                Chord::Key { id, mods } => {
                    self.recorder.capture_key(&mut self.staged, id, *mods)
                }
                Chord::Mouse { button, mods } => {
                    self.recorder.capture_mouse(&mut self.staged, *button, *mods)
                }
            };
            return ChordOutcome::Recording(outcome);
        }

        if self.settings_open {
            if let Chord::Key { id, mods } = chord {
                if id == "escape" && *mods == Modifiers::NONE {
                    self.cancel_settings();
                    return ChordOutcome::SettingsClosed;
                }
            }
            return ChordOutcome::Unmatched;
        }

        match shortcuts::action_for_chord(&self.bindings, chord) {
            Some(name) => {
                let request = self.execute_action(name, history);
                ChordOutcome::Action { name, request }
            }
            None => ChordOutcome::Unmatched,
        }
    }

    /// Run a logical action by name. Unknown names produce no action.
    pub fn execute_action(
        &mut self,
        action: &str,
        history: &mut History,
    ) -> Option<HostRequest> {
        if let Some(tool_name) = action.strip_prefix("tool-") {
            if let Some(tool) = Tool::from_name(tool_name) {
                self.select_tool(tool);
            }
            return None;
        }

        if let Some(color) = color_for_action(action) {
            self.select_color(color);
            return None;
        }

        match action {
            "undo" => {
                history.undo();
                None
            }
            "redo" => {
                history.redo();
                None
            }
            "clear" => {
                history.clear();
                None
            }
            "spotlight" => {
                self.toggle_spotlight();
                None
            }
            shortcuts::ACTION_TOGGLE_DRAWING => Some(self.toggle_drawing_mode()),
            shortcuts::ACTION_TOGGLE_VISIBILITY => Some(HostRequest::ToggleVisibility),
            _ => None,
        }
    }

    /// Apply one host-delivered signal.
    pub fn apply_signal(
        &mut self,
        signal: HostSignal,
        history: &mut History,
    ) -> Option<HostRequest> {
        match signal {
            HostSignal::ClearCanvas => {
                history.clear();
                None
            }
            HostSignal::Undo => {
                history.undo();
                None
            }
            HostSignal::Redo => {
                history.redo();
                None
            }
            HostSignal::SetTool(tool) => {
                self.select_tool(tool);
                None
            }
            HostSignal::ToggleSpotlight => {
                self.toggle_spotlight();
                None
            }
            HostSignal::DrawingModeChanged(on) => Some(self.set_drawing_mode(on)),
            HostSignal::OpenSettings => {
                self.open_settings();
                None
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(shortcuts::default_bindings())
    }
}
