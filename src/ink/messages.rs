//! Signals delivered from host-side collaborators (tray, global hotkeys,
//! platform shell) into the core. Delivery is at-most-once per user
//! action; the pump drains whatever arrived since the previous frame.

use crate::ink::model::Tool;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    ClearCanvas,
    Undo,
    Redo,
    SetTool(Tool),
    ToggleSpotlight,
    DrawingModeChanged(bool),
    OpenSettings,
}

/// Receiving end of the host signal channel, drained once per frame on
/// the UI thread.
#[derive(Debug)]
pub struct SignalPump {
    rx: Receiver<HostSignal>,
    disconnected: bool,
}

impl SignalPump {
    pub fn channel() -> (Sender<HostSignal>, SignalPump) {
        let (tx, rx) = channel();
        (
            tx,
            SignalPump {
                rx,
                disconnected: false,
            },
        )
    }

    pub fn pump<F: FnMut(HostSignal)>(&mut self, mut apply: F) {
        if self.disconnected {
            return;
        }
        loop {
            match self.rx.try_recv() {
                Ok(signal) => apply(signal),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("host signal channel disconnected");
                    self.disconnected = true;
                    break;
                }
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.disconnected
    }
}
