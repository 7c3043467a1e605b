//! Floating toolbar: tool and color selection, stroke width, and the
//! undo/redo/clear/spotlight/mode buttons. Selection highlights mirror
//! the session state directly.

use crate::ink::history::History;
use crate::ink::model::{Color, Tool};
use crate::ink::session::{HostRequest, SessionState, MAX_STROKE_SIZE, MIN_STROKE_SIZE, PALETTE};
use eframe::egui;
use std::collections::HashMap;

fn tool_label(tool: Tool) -> &'static str {
    match tool {
        Tool::Pen => "Pen",
        Tool::Highlighter => "Highlighter",
        Tool::Rectangle => "Rectangle",
        Tool::Circle => "Circle",
        Tool::Arrow => "Arrow",
        Tool::Line => "Line",
        Tool::Text => "Text",
        Tool::Eraser => "Eraser",
    }
}

pub fn show(
    ctx: &egui::Context,
    session: &mut SessionState,
    history: &mut History,
    dirty: &mut bool,
) -> Vec<HostRequest> {
    let mut requests = Vec::new();

    // Tooltip strings are precomputed so the window closure can mutate
    // the session freely.
    let shortcut_tips: HashMap<String, String> = session
        .bindings()
        .iter()
        .map(|(action, binding)| (action.clone(), binding.display()))
        .collect();
    let tip = |action: &str| {
        shortcut_tips
            .get(action)
            .cloned()
            .unwrap_or_else(|| "-".to_string())
    };

    egui::Window::new("glasspen_toolbar")
        .title_bar(false)
        .resizable(false)
        .default_pos(egui::pos2(24.0, 24.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tool in Tool::ALL {
                    let selected = session.tool() == tool;
                    let action = format!("tool-{}", tool.name());
                    let response = ui
                        .selectable_label(selected, tool_label(tool))
                        .on_hover_text(format!("{} ({})", tool_label(tool), tip(&action)));
                    if response.clicked() {
                        session.select_tool(tool);
                    }
                }
            });

            ui.horizontal(|ui| {
                for (action, color) in PALETTE {
                    let fill =
                        egui::Color32::from_rgb(color.r, color.g, color.b);
                    let selected = session.color() == color;
                    let stroke = if selected {
                        egui::Stroke::new(2.0, egui::Color32::WHITE)
                    } else {
                        egui::Stroke::new(1.0, egui::Color32::DARK_GRAY)
                    };
                    let swatch = egui::Button::new("")
                        .fill(fill)
                        .stroke(stroke)
                        .min_size(egui::vec2(18.0, 18.0));
                    if ui.add(swatch).on_hover_text(tip(action)).clicked() {
                        session.select_color(color);
                    }
                }

                let current = session.color();
                let mut rgba = [current.r, current.g, current.b, current.a];
                if ui
                    .color_edit_button_srgba_unmultiplied(&mut rgba)
                    .on_hover_text("Custom color")
                    .changed()
                {
                    session.select_color(Color::rgba(rgba[0], rgba[1], rgba[2], rgba[3]));
                }

                let mut size = session.stroke_size();
                if ui
                    .add(
                        egui::Slider::new(&mut size, MIN_STROKE_SIZE..=MAX_STROKE_SIZE)
                            .text("Size"),
                    )
                    .changed()
                {
                    session.set_stroke_size(size);
                }
            });

            ui.horizontal(|ui| {
                if ui
                    .button("Undo")
                    .on_hover_text(format!("Undo ({})", tip("undo")))
                    .clicked()
                    && history.undo()
                {
                    *dirty = true;
                }
                if ui
                    .button("Redo")
                    .on_hover_text(format!("Redo ({})", tip("redo")))
                    .clicked()
                    && history.redo()
                {
                    *dirty = true;
                }
                if ui
                    .button("Clear")
                    .on_hover_text(format!("Clear ({})", tip("clear")))
                    .clicked()
                    && history.clear()
                {
                    *dirty = true;
                }

                if ui
                    .selectable_label(session.spotlight(), "Spotlight")
                    .on_hover_text(format!("Spotlight ({})", tip("spotlight")))
                    .clicked()
                {
                    session.toggle_spotlight();
                    *dirty = true;
                }

                if ui
                    .selectable_label(session.drawing_mode(), "Drawing")
                    .on_hover_text(format!("Toggle drawing mode ({})", tip("toggle-drawing")))
                    .clicked()
                {
                    requests.push(session.toggle_drawing_mode());
                }

                if ui
                    .button("Hide")
                    .on_hover_text(format!("Hide to tray ({})", tip("toggle-visibility")))
                    .clicked()
                {
                    requests.push(HostRequest::ToggleVisibility);
                }

                if ui.button("Shortcuts…").clicked() {
                    session.open_settings();
                }
            });
        });

    requests
}
