use anyhow::anyhow;
use eframe::egui;
use glasspen::hotkey::{parse_hotkey, GlobalHotkeys};
use glasspen::ink::messages::SignalPump;
use glasspen::ink::shortcuts::{
    ShortcutSet, ACTION_TOGGLE_DRAWING, ACTION_TOGGLE_VISIBILITY,
};
use glasspen::ui::{HostChannels, OverlayApp};
use glasspen::{config, logging};

fn bound_hotkey(bindings: &ShortcutSet, action: &str) -> Option<glasspen::hotkey::Hotkey> {
    bindings
        .get(action)?
        .accelerator()
        .and_then(|accelerator| parse_hotkey(&accelerator))
}

fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init(cfg!(debug_assertions));

    let shortcuts_path = config::shortcuts_path()?;
    let bindings = config::load(&shortcuts_path);
    tracing::info!(path = %shortcuts_path.display(), "shortcut settings loaded");

    let (signal_tx, pump) = SignalPump::channel();

    let hotkeys = GlobalHotkeys::new();
    let draw_trigger = hotkeys.register(bound_hotkey(&bindings, ACTION_TOGGLE_DRAWING));
    let visibility_trigger = hotkeys.register(bound_hotkey(&bindings, ACTION_TOGGLE_VISIBILITY));
    hotkeys.start_listener();

    #[cfg(target_os = "linux")]
    let (tray, tray_rx) = {
        let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
        match glasspen::tray::spawn(true, tray_tx) {
            Ok(handle) => (Some(handle), Some(tray_rx)),
            Err(err) => {
                tracing::warn!(?err, "running without a tray icon");
                (None, None)
            }
        }
    };

    let channels = HostChannels {
        pump,
        signal_tx,
        draw_trigger,
        visibility_trigger,
        #[cfg(target_os = "linux")]
        tray,
        #[cfg(target_os = "linux")]
        tray_rx,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_transparent(true)
            .with_decorations(false)
            .with_always_on_top()
            .with_maximized(true),
        ..Default::default()
    };

    eframe::run_native(
        "glasspen",
        native_options,
        Box::new(move |_cc| Box::new(OverlayApp::new(bindings, shortcuts_path, channels))),
    )
    .map_err(|err| anyhow!("run overlay window: {err}"))
}
