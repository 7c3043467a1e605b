//! The overlay application: a transparent, always-on-top, maximized
//! viewport. Each frame drains host signals and hotkey triggers, routes
//! raw input into the shortcut matcher and the gesture controller, then
//! replays the annotation history into a texture painted across the
//! whole screen.

use crate::config;
use crate::hotkey::{self, Trigger};
use crate::ink::history::History;
use crate::ink::input::{GestureController, PointerOutcome};
use crate::ink::messages::{HostSignal, SignalPump};
use crate::ink::model::Point;
use crate::ink::render::Canvas;
use crate::ink::session::{ChordOutcome, HostRequest, SessionState};
use crate::ink::shortcuts::{
    Chord, Modifiers, ShortcutSet, ACTION_TOGGLE_DRAWING, ACTION_TOGGLE_VISIBILITY,
};
use crate::ui::{settings_ui, toolbar};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

const NOTICE_DURATION: Duration = Duration::from_millis(1800);

/// Host-side wiring handed to the app at startup: the signal channel,
/// the two global hotkey triggers, and (on Linux) the tray.
pub struct HostChannels {
    pub pump: SignalPump,
    pub signal_tx: Sender<HostSignal>,
    pub draw_trigger: Trigger,
    pub visibility_trigger: Trigger,
    #[cfg(target_os = "linux")]
    pub tray: Option<crate::tray::TrayHandle>,
    #[cfg(target_os = "linux")]
    pub tray_rx: Option<crossbeam_channel::Receiver<crate::tray::TrayAction>>,
}

pub struct OverlayApp {
    session: SessionState,
    history: History,
    gesture: GestureController,
    canvas: Canvas,
    texture: Option<egui::TextureHandle>,
    channels: HostChannels,
    shortcuts_path: PathBuf,
    visible: bool,
    cursor: Point,
    dirty: bool,
    text_focus_pending: bool,
    notice: Option<(String, Instant)>,
}

impl OverlayApp {
    pub fn new(bindings: ShortcutSet, shortcuts_path: PathBuf, channels: HostChannels) -> Self {
        Self {
            session: SessionState::new(bindings),
            history: History::default(),
            gesture: GestureController::default(),
            canvas: Canvas::new(0, 0),
            texture: None,
            channels,
            shortcuts_path,
            visible: true,
            cursor: Point::default(),
            dirty: true,
            text_focus_pending: false,
            notice: None,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), Instant::now()));
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|(_, shown_at)| shown_at.elapsed() > NOTICE_DURATION);
        if expired {
            self.notice = None;
        }
        let Some((message, _)) = &self.notice else {
            return;
        };
        egui::Area::new(egui::Id::new("glasspen_notice"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                    ui.label(message);
                });
            });
    }

    fn pump_signals(&mut self, requests: &mut Vec<HostRequest>) {
        let Self {
            channels,
            session,
            history,
            dirty,
            ..
        } = self;
        channels.pump.pump(|signal| {
            tracing::debug!(?signal, "host signal received");
            if let Some(request) = session.apply_signal(signal, history) {
                requests.push(request);
            }
            *dirty = true;
        });
    }

    fn poll_hotkeys(&mut self, requests: &mut Vec<HostRequest>) {
        if self.channels.draw_trigger.take() {
            let next = !self.session.drawing_mode();
            let _ = self
                .channels
                .signal_tx
                .send(HostSignal::DrawingModeChanged(next));
        }
        if self.channels.visibility_trigger.take() {
            requests.push(HostRequest::ToggleVisibility);
        }
    }

    #[cfg(target_os = "linux")]
    fn drain_tray(&mut self, ctx: &egui::Context, requests: &mut Vec<HostRequest>) {
        use crate::tray::TrayAction;

        let actions: Vec<TrayAction> = match &self.channels.tray_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };

        for action in actions {
            tracing::debug!(?action, "tray action");
            match action {
                TrayAction::ToggleVisibility => requests.push(HostRequest::ToggleVisibility),
                TrayAction::ToggleDrawingMode => {
                    let next = !self.session.drawing_mode();
                    let _ = self
                        .channels
                        .signal_tx
                        .send(HostSignal::DrawingModeChanged(next));
                }
                TrayAction::ClearCanvas => {
                    let _ = self.channels.signal_tx.send(HostSignal::ClearCanvas);
                }
                TrayAction::OpenSettings => {
                    if !self.visible {
                        requests.push(HostRequest::ToggleVisibility);
                    }
                    let _ = self.channels.signal_tx.send(HostSignal::OpenSettings);
                }
                TrayAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            }
        }
    }

    #[cfg(target_os = "linux")]
    fn sync_tray(&self) {
        if let Some(handle) = &self.channels.tray {
            let on = self.session.drawing_mode();
            let _ = handle.update(move |tray| tray.set_drawing_mode(on));
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn sync_tray(&self) {}

    fn dispatch_chord(&mut self, chord: &Chord, requests: &mut Vec<HostRequest>) {
        match self.session.handle_chord(chord, &mut self.history) {
            ChordOutcome::Action { name, request } => {
                tracing::debug!(action = name, "shortcut dispatched");
                self.dirty = true;
                if let Some(request) = request {
                    requests.push(request);
                }
            }
            ChordOutcome::Recording(_) | ChordOutcome::SettingsClosed => {
                self.dirty = true;
            }
            ChordOutcome::Unmatched => {}
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context, requests: &mut Vec<HostRequest>) {
        if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
            let pos = Point::new(pos.x, pos.y);
            if pos != self.cursor {
                self.cursor = pos;
                if self.session.spotlight() {
                    self.dirty = true;
                }
            }
        }

        let events = ctx.input(|i| i.events.clone());
        let text_active = self.gesture.text_entry().is_some();
        let over_area = ctx.is_pointer_over_area();

        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    // The floating text field owns the keyboard while open.
                    if text_active {
                        continue;
                    }
                    let chord = Chord::Key {
                        id: key_id(key),
                        mods: chord_mods(modifiers),
                    };
                    self.dispatch_chord(&chord, requests);
                }
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    let ordinal = button_ordinal(button);
                    let mods = chord_mods(modifiers);
                    if pressed {
                        let recording = self.session.recorder().is_recording();
                        let qualifies = ordinal != 0 || mods != Modifiers::NONE;
                        if (recording || (qualifies && !over_area)) && !text_active {
                            let chord = Chord::Mouse {
                                button: ordinal,
                                mods,
                            };
                            self.dispatch_chord(&chord, requests);
                        }

                        if button == egui::PointerButton::Primary && !over_area {
                            let point = Point::new(pos.x, pos.y);
                            match self.gesture.pointer_down(point, &self.session) {
                                PointerOutcome::TextPrompt => self.text_focus_pending = true,
                                PointerOutcome::Started => self.dirty = true,
                                PointerOutcome::Ignored => {}
                            }
                        }
                    } else if button == egui::PointerButton::Primary
                        && self
                            .gesture
                            .finish(Some(Point::new(pos.x, pos.y)), &mut self.history)
                    {
                        self.dirty = true;
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    if self.gesture.pointer_move(Point::new(pos.x, pos.y)) {
                        self.dirty = true;
                    }
                }
                egui::Event::PointerGone => {
                    if self.gesture.finish(None, &mut self.history) {
                        self.dirty = true;
                    }
                }
                _ => {}
            }
        }
    }

    fn show_text_entry(&mut self, ctx: &egui::Context) {
        enum FieldEvent {
            None,
            Submit,
            Cancel,
        }
        let mut field_event = FieldEvent::None;
        let focus_pending = self.text_focus_pending;

        if let Some(entry) = self.gesture.text_entry_mut() {
            let anchor = egui::pos2(entry.anchor.x, entry.anchor.y);
            egui::Area::new(egui::Id::new("glasspen_text_entry"))
                .fixed_pos(anchor)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut entry.buffer)
                            .desired_width(220.0)
                            .hint_text("Text…"),
                    );
                    if focus_pending {
                        response.request_focus();
                    }
                    if response.lost_focus() {
                        let (enter, escape) = ui.input(|i| {
                            (
                                i.key_pressed(egui::Key::Enter),
                                i.key_pressed(egui::Key::Escape),
                            )
                        });
                        field_event = if escape {
                            FieldEvent::Cancel
                        } else if enter || !entry.buffer.trim().is_empty() {
                            FieldEvent::Submit
                        } else {
                            FieldEvent::Cancel
                        };
                    }
                });
            self.text_focus_pending = false;
        }

        match field_event {
            FieldEvent::Submit => {
                if self.gesture.submit_text(&self.session, &mut self.history) {
                    self.dirty = true;
                }
            }
            FieldEvent::Cancel => self.gesture.cancel_text(),
            FieldEvent::None => {}
        }
    }

    fn present_canvas(&mut self, ctx: &egui::Context) {
        let screen = ctx.screen_rect();
        let width = screen.width().max(1.0).ceil() as u32;
        let height = screen.height().max(1.0).ceil() as u32;
        let resized = self.canvas.width() != width || self.canvas.height() != height;
        if resized {
            self.canvas.resize(width, height);
        }

        if self.dirty || resized || self.gesture.is_active() {
            let spotlight = self.session.spotlight().then_some(self.cursor);
            self.canvas
                .redraw(&self.history, self.gesture.in_progress(), spotlight);

            let image = egui::ColorImage::from_rgba_unmultiplied(
                [width as usize, height as usize],
                self.canvas.pixels(),
            );
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("annotation-canvas", image, egui::TextureOptions::NEAREST))
                }
            }
            self.dirty = false;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    ui.painter().image(
                        texture.id(),
                        screen,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            });
    }

    fn rebind_global_hotkeys(&self) {
        let bound = |action: &str| {
            self.session
                .bindings()
                .get(action)
                .and_then(|binding| binding.accelerator())
                .and_then(|accelerator| hotkey::parse_hotkey(&accelerator))
        };
        self.channels.draw_trigger.rebind(bound(ACTION_TOGGLE_DRAWING));
        self.channels
            .visibility_trigger
            .rebind(bound(ACTION_TOGGLE_VISIBILITY));
    }

    fn apply_request(&mut self, ctx: &egui::Context, request: HostRequest) {
        match request {
            HostRequest::CapturePointer(capture) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::MousePassthrough(!capture));
                self.sync_tray();
                self.notify(if capture {
                    "Drawing mode"
                } else {
                    "View mode, input passes through"
                });
            }
            HostRequest::ToggleVisibility => {
                self.visible = !self.visible;
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(self.visible));
            }
        }
    }
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep polling triggers and the signal channel even while idle or
        // unfocused.
        ctx.request_repaint_after(Duration::from_millis(50));

        let mut requests: Vec<HostRequest> = Vec::new();

        #[cfg(target_os = "linux")]
        self.drain_tray(ctx, &mut requests);
        self.poll_hotkeys(&mut requests);
        self.pump_signals(&mut requests);
        self.handle_input(ctx, &mut requests);

        self.present_canvas(ctx);
        self.show_text_entry(ctx);

        requests.extend(toolbar::show(
            ctx,
            &mut self.session,
            &mut self.history,
            &mut self.dirty,
        ));

        let outcome = settings_ui::show(ctx, &mut self.session);
        if outcome.saved {
            if let Err(err) = config::save(&self.shortcuts_path, self.session.bindings()) {
                tracing::warn!(?err, "failed to persist shortcut settings");
            }
            self.rebind_global_hotkeys();
            self.notify("Shortcuts saved");
        }

        for request in requests {
            self.apply_request(ctx, request);
        }

        self.show_notice(ctx);
    }
}

fn chord_mods(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.ctrl,
        shift: modifiers.shift,
        alt: modifiers.alt,
    }
}

/// Lowercase key identifier in the shape the shortcut model stores.
fn key_id(key: egui::Key) -> String {
    use egui::Key;
    match key {
        Key::ArrowUp => "arrowup".to_string(),
        Key::ArrowDown => "arrowdown".to_string(),
        Key::ArrowLeft => "arrowleft".to_string(),
        Key::ArrowRight => "arrowright".to_string(),
        Key::Escape => "escape".to_string(),
        Key::Enter => "enter".to_string(),
        Key::Tab => "tab".to_string(),
        Key::Backspace => "backspace".to_string(),
        Key::Delete => "delete".to_string(),
        Key::Insert => "insert".to_string(),
        Key::Home => "home".to_string(),
        Key::End => "end".to_string(),
        Key::PageUp => "pageup".to_string(),
        Key::PageDown => "pagedown".to_string(),
        Key::Space => "space".to_string(),
        other => other.name().to_lowercase(),
    }
}

/// Mouse button ordinals follow the web convention the binding format
/// uses: primary 0, middle 1, secondary 2, then the side buttons.
fn button_ordinal(button: egui::PointerButton) -> u8 {
    match button {
        egui::PointerButton::Primary => 0,
        egui::PointerButton::Middle => 1,
        egui::PointerButton::Secondary => 2,
        egui::PointerButton::Extra1 => 3,
        egui::PointerButton::Extra2 => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ids_match_the_binding_vocabulary() {
        assert_eq!(key_id(egui::Key::A), "a");
        assert_eq!(key_id(egui::Key::Num5), "5");
        assert_eq!(key_id(egui::Key::ArrowLeft), "arrowleft");
        assert_eq!(key_id(egui::Key::Space), "space");
        assert_eq!(key_id(egui::Key::F5), "f5");
    }

    #[test]
    fn button_ordinals_follow_the_web_convention() {
        assert_eq!(button_ordinal(egui::PointerButton::Primary), 0);
        assert_eq!(button_ordinal(egui::PointerButton::Middle), 1);
        assert_eq!(button_ordinal(egui::PointerButton::Secondary), 2);
        assert_eq!(button_ordinal(egui::PointerButton::Extra1), 3);
        assert_eq!(button_ordinal(egui::PointerButton::Extra2), 4);
    }
}
