//! System tray icon and menu (StatusNotifierItem). Menu activations are
//! forwarded over a channel and drained by the overlay app each frame;
//! the tray never touches session state directly.

use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use ksni::{
    blocking::TrayMethods,
    menu::{CheckmarkItem, StandardItem},
    Icon, MenuItem, Tray,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    ToggleVisibility,
    ToggleDrawingMode,
    ClearCanvas,
    OpenSettings,
    Quit,
}

pub struct OverlayTray {
    drawing_mode: bool,
    tx: Sender<TrayAction>,
    icon: Vec<Icon>,
}

impl OverlayTray {
    pub fn new(drawing_mode: bool, tx: Sender<TrayAction>) -> Self {
        Self {
            drawing_mode,
            tx,
            icon: pen_icon(),
        }
    }

    pub fn set_drawing_mode(&mut self, on: bool) {
        self.drawing_mode = on;
    }

    fn send(&self, action: TrayAction) {
        if let Err(err) = self.tx.send(action) {
            tracing::warn!(?err, ?action, "dropping tray action, channel closed");
        }
    }
}

impl Tray for OverlayTray {
    fn id(&self) -> String {
        "dev.glasspen.overlay".to_string()
    }

    fn title(&self) -> String {
        "Glasspen".to_string()
    }

    fn icon_pixmap(&self) -> Vec<Icon> {
        self.icon.clone()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            title: "Glasspen".to_string(),
            description: "Screen annotation overlay".to_string(),
            icon_name: String::new(),
            icon_pixmap: Vec::new(),
        }
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.send(TrayAction::ToggleVisibility);
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            MenuItem::Standard(StandardItem {
                label: "Show / Hide".to_string(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayAction::ToggleVisibility)),
                ..Default::default()
            }),
            MenuItem::Checkmark(CheckmarkItem {
                label: "Drawing mode".to_string(),
                checked: self.drawing_mode,
                activate: Box::new(|tray: &mut Self| tray.send(TrayAction::ToggleDrawingMode)),
                ..Default::default()
            }),
            MenuItem::Standard(StandardItem {
                label: "Clear canvas".to_string(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayAction::ClearCanvas)),
                ..Default::default()
            }),
            MenuItem::Separator,
            MenuItem::Standard(StandardItem {
                label: "Configure shortcuts…".to_string(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayAction::OpenSettings)),
                ..Default::default()
            }),
            MenuItem::Separator,
            MenuItem::Standard(StandardItem {
                label: "Quit".to_string(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayAction::Quit)),
                ..Default::default()
            }),
        ]
    }
}

pub type TrayHandle = ksni::blocking::Handle<OverlayTray>;

pub fn spawn(drawing_mode: bool, tx: Sender<TrayAction>) -> Result<TrayHandle> {
    OverlayTray::new(drawing_mode, tx)
        .spawn()
        .map_err(|err| anyhow!("spawn tray icon: {err}"))
}

/// Pen-nib pixmap rendered at the usual tray sizes: a dark round badge
/// with a light diagonal stroke. ARGB byte order as ksni expects.
fn pen_icon() -> Vec<Icon> {
    [16, 22, 24, 32, 48]
        .into_iter()
        .filter_map(pen_icon_at)
        .collect()
}

fn pen_icon_at(size: i32) -> Option<Icon> {
    if size <= 0 {
        return None;
    }
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    let center = size as f32 / 2.0;
    let radius = center - 1.0;
    let stroke_half_width = (size as f32 / 10.0).max(1.0);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center + 0.5;
            let dy = y as f32 - center + 0.5;
            let dist = (dx * dx + dy * dy).sqrt();

            // Distance from the bottom-left-to-top-right diagonal.
            let diag = (dx + dy).abs() / std::f32::consts::SQRT_2;

            if dist <= radius {
                if diag <= stroke_half_width {
                    data.extend_from_slice(&[255, 235, 235, 235]);
                } else {
                    data.extend_from_slice(&[255, 40, 70, 140]);
                }
            } else if dist <= radius + 1.0 {
                let alpha = ((radius + 1.0 - dist) * 255.0) as u8;
                data.extend_from_slice(&[alpha, 40, 70, 140]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    Some(Icon {
        width: size,
        height: size,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_activations_forward_over_the_channel() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut tray = OverlayTray::new(true, tx);

        tray.activate(0, 0);
        assert_eq!(rx.try_recv(), Ok(TrayAction::ToggleVisibility));

        for item in tray.menu() {
            match item {
                MenuItem::Standard(entry) => (entry.activate)(&mut tray),
                MenuItem::Checkmark(entry) => (entry.activate)(&mut tray),
                _ => {}
            }
        }
        let actions: Vec<TrayAction> = rx.try_iter().collect();
        assert_eq!(
            actions,
            vec![
                TrayAction::ToggleVisibility,
                TrayAction::ToggleDrawingMode,
                TrayAction::ClearCanvas,
                TrayAction::OpenSettings,
                TrayAction::Quit,
            ]
        );
    }

    #[test]
    fn drawing_mode_checkbox_tracks_state() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut tray = OverlayTray::new(true, tx);

        let checked = |tray: &OverlayTray| {
            tray.menu().into_iter().find_map(|item| match item {
                MenuItem::Checkmark(entry) => Some(entry.checked),
                _ => None,
            })
        };
        assert_eq!(checked(&tray), Some(true));

        tray.set_drawing_mode(false);
        assert_eq!(checked(&tray), Some(false));
    }

    #[test]
    fn icon_pixmaps_cover_the_common_sizes() {
        let icons = pen_icon();
        assert_eq!(icons.len(), 5);
        for icon in icons {
            assert_eq!(icon.data.len(), (icon.width * icon.height * 4) as usize);
        }
    }
}
