//! Shortcut settings dialog. Edits go to the session's staged working
//! copy; nothing is committed until Save. Chord capture itself happens in
//! the overlay's input loop through the session recorder, this dialog
//! only arms it and shows the staged state.

use crate::ink::session::SessionState;
use crate::ink::shortcuts::ACTIONS;
use eframe::egui;

pub struct SettingsOutcome {
    /// The staged copy was committed; the caller persists it and
    /// re-registers global hotkeys.
    pub saved: bool,
}

fn action_label(action: &str) -> &'static str {
    match action {
        "tool-pen" => "Pen tool",
        "tool-highlighter" => "Highlighter tool",
        "tool-rectangle" => "Rectangle tool",
        "tool-circle" => "Circle tool",
        "tool-arrow" => "Arrow tool",
        "tool-line" => "Line tool",
        "tool-text" => "Text tool",
        "tool-eraser" => "Eraser tool",
        "color-red" => "Red",
        "color-green" => "Green",
        "color-blue" => "Blue",
        "color-yellow" => "Yellow",
        "color-magenta" => "Magenta",
        "color-cyan" => "Cyan",
        "color-white" => "White",
        "color-black" => "Black",
        "undo" => "Undo",
        "redo" => "Redo",
        "clear" => "Clear canvas",
        "spotlight" => "Toggle spotlight",
        "toggle-drawing" => "Toggle drawing mode",
        "toggle-visibility" => "Show / hide window",
        other => {
            debug_assert!(false, "unlabeled action {other}");
            "Unknown action"
        }
    }
}

pub fn show(ctx: &egui::Context, session: &mut SessionState) -> SettingsOutcome {
    if !session.settings_open() {
        return SettingsOutcome { saved: false };
    }

    let mut arm: Option<&'static str> = None;
    let mut save_clicked = false;
    let mut reset_clicked = false;
    let mut cancel_clicked = false;

    egui::Window::new("Shortcut settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Click a shortcut to rebind it. Delete clears, Esc cancels.");
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(420.0)
                .show(ui, |ui| {
                    egui::Grid::new("shortcut_rows")
                        .num_columns(2)
                        .striped(true)
                        .min_col_width(140.0)
                        .show(ui, |ui| {
                            for action in ACTIONS {
                                ui.label(action_label(action));

                                let armed = session.recorder().armed() == Some(action);
                                let text = if armed {
                                    "Press a key…".to_string()
                                } else {
                                    session
                                        .staged()
                                        .get(action)
                                        .map(|binding| binding.display())
                                        .unwrap_or_else(|| "-".to_string())
                                };
                                if ui.selectable_label(armed, text).clicked() {
                                    arm = Some(action);
                                }
                                ui.end_row();
                            }
                        });
                });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    save_clicked = true;
                }
                if ui.button("Restore defaults").clicked() {
                    reset_clicked = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_clicked = true;
                }
            });
        });

    if let Some(action) = arm {
        session.arm_recording(action);
    }
    if reset_clicked {
        session.reset_staged();
    }
    if save_clicked {
        session.save_settings();
        tracing::info!("shortcut settings saved");
        return SettingsOutcome { saved: true };
    }
    if cancel_clicked {
        session.cancel_settings();
    }
    SettingsOutcome { saved: false }
}
