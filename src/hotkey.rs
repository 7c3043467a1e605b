//! Process-wide hotkeys, active regardless of window focus. A single
//! rdev listener thread tracks modifier state and flips a trigger flag
//! whenever a registered combination is pressed; the UI thread polls the
//! flags once per frame.

use rdev::{listen, EventType, Key};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Parse an accelerator string like "Ctrl+Shift+D" into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "" => {}
            _ => match parse_key(&upper) {
                Some(k) => key = Some(k),
                None => return None,
            },
        }
    }

    key.map(|k| Hotkey {
        key: k,
        ctrl,
        shift,
        alt,
    })
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "ENTER" | "RETURN" => Some(Key::Return),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "DELETE" => Some(Key::Delete),
        "BACKSPACE" => Some(Key::Backspace),
        "INSERT" => Some(Key::Insert),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "LEFT" | "LEFTARROW" => Some(Key::LeftArrow),
        "RIGHT" | "RIGHTARROW" => Some(Key::RightArrow),
        "UP" | "UPARROW" => Some(Key::UpArrow),
        "DOWN" | "DOWNARROW" => Some(Key::DownArrow),
        _ if upper.starts_with('F') && upper.len() > 1 => match upper[1..].parse::<u8>().ok()? {
            1 => Some(Key::F1),
            2 => Some(Key::F2),
            3 => Some(Key::F3),
            4 => Some(Key::F4),
            5 => Some(Key::F5),
            6 => Some(Key::F6),
            7 => Some(Key::F7),
            8 => Some(Key::F8),
            9 => Some(Key::F9),
            10 => Some(Key::F10),
            11 => Some(Key::F11),
            12 => Some(Key::F12),
            _ => None,
        },
        _ if upper.len() == 1 => {
            let c = upper.chars().next()?;
            if c.is_ascii_digit() {
                Some(match c {
                    '0' => Key::Num0,
                    '1' => Key::Num1,
                    '2' => Key::Num2,
                    '3' => Key::Num3,
                    '4' => Key::Num4,
                    '5' => Key::Num5,
                    '6' => Key::Num6,
                    '7' => Key::Num7,
                    '8' => Key::Num8,
                    _ => Key::Num9,
                })
            } else if c.is_ascii_alphabetic() {
                Some(match c {
                    'A' => Key::KeyA,
                    'B' => Key::KeyB,
                    'C' => Key::KeyC,
                    'D' => Key::KeyD,
                    'E' => Key::KeyE,
                    'F' => Key::KeyF,
                    'G' => Key::KeyG,
                    'H' => Key::KeyH,
                    'I' => Key::KeyI,
                    'J' => Key::KeyJ,
                    'K' => Key::KeyK,
                    'L' => Key::KeyL,
                    'M' => Key::KeyM,
                    'N' => Key::KeyN,
                    'O' => Key::KeyO,
                    'P' => Key::KeyP,
                    'Q' => Key::KeyQ,
                    'R' => Key::KeyR,
                    'S' => Key::KeyS,
                    'T' => Key::KeyT,
                    'U' => Key::KeyU,
                    'V' => Key::KeyV,
                    'W' => Key::KeyW,
                    'X' => Key::KeyX,
                    'Y' => Key::KeyY,
                    'Z' => Key::KeyZ,
                    _ => return None,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

#[derive(Debug, Default)]
struct TriggerInner {
    hotkey: Mutex<Option<Hotkey>>,
    fired: AtomicBool,
}

/// Handle to one registered combination. `take` reads-and-clears the
/// fired flag; `rebind` swaps the combination without restarting the
/// listener (used when shortcut settings are saved).
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    inner: Arc<TriggerInner>,
}

impl Trigger {
    pub fn take(&self) -> bool {
        self.inner.fired.swap(false, Ordering::SeqCst)
    }

    pub fn rebind(&self, hotkey: Option<Hotkey>) {
        if let Ok(mut guard) = self.inner.hotkey.lock() {
            *guard = hotkey;
        }
    }

    fn fire_if_matching(&self, key: Key, ctrl: bool, shift: bool, alt: bool) {
        let matched = self
            .inner
            .hotkey
            .lock()
            .ok()
            .and_then(|guard| *guard)
            .is_some_and(|hk| {
                hk.key == key && hk.ctrl == ctrl && hk.shift == shift && hk.alt == alt
            });
        if matched {
            tracing::debug!(?key, "global hotkey fired");
            self.inner.fired.store(true, Ordering::SeqCst);
        }
    }
}

/// Registry plus the listener thread watching it.
#[derive(Debug, Default)]
pub struct GlobalHotkeys {
    triggers: Arc<Mutex<Vec<Trigger>>>,
}

impl GlobalHotkeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hotkey: Option<Hotkey>) -> Trigger {
        let trigger = Trigger::default();
        trigger.rebind(hotkey);
        if let Ok(mut triggers) = self.triggers.lock() {
            triggers.push(trigger.clone());
        }
        trigger
    }

    /// Spawn the listener thread. rdev's `listen` normally never
    /// returns; if it does, or fails, the thread retries after a short
    /// pause rather than leaving the session without global hotkeys.
    pub fn start_listener(&self) {
        let registry = self.triggers.clone();
        tracing::debug!("starting global hotkey listener");
        thread::spawn(move || loop {
            let registry = registry.clone();
            let mut ctrl = false;
            let mut shift = false;
            let mut alt = false;
            let mut held: HashSet<Key> = HashSet::new();

            let result = listen(move |event| match event.event_type {
                EventType::KeyPress(key) => {
                    match key {
                        Key::ControlLeft | Key::ControlRight => ctrl = true,
                        Key::ShiftLeft | Key::ShiftRight => shift = true,
                        Key::Alt | Key::AltGr => alt = true,
                        _ => {}
                    }
                    // OS auto-repeat delivers repeated presses; only the
                    // first one per physical press may fire.
                    if held.insert(key) {
                        if let Ok(triggers) = registry.lock() {
                            for trigger in triggers.iter() {
                                trigger.fire_if_matching(key, ctrl, shift, alt);
                            }
                        }
                    }
                }
                EventType::KeyRelease(key) => {
                    match key {
                        Key::ControlLeft | Key::ControlRight => ctrl = false,
                        Key::ShiftLeft | Key::ShiftRight => shift = false,
                        Key::Alt | Key::AltGr => alt = false,
                        _ => {}
                    }
                    held.remove(&key);
                }
                _ => {}
            });

            match result {
                Ok(()) => tracing::warn!("hotkey listener exited unexpectedly, restarting shortly"),
                Err(err) => tracing::warn!(?err, "hotkey listener failed, retrying shortly"),
            }
            thread::sleep(Duration::from_millis(500));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifier_combinations() {
        let hotkey = parse_hotkey("Ctrl+Shift+D").unwrap();
        assert_eq!(hotkey.key, Key::KeyD);
        assert!(hotkey.ctrl && hotkey.shift && !hotkey.alt);

        let hotkey = parse_hotkey("alt+F4").unwrap();
        assert_eq!(hotkey.key, Key::F4);
        assert!(hotkey.alt && !hotkey.ctrl);

        let hotkey = parse_hotkey("PageUp").unwrap();
        assert_eq!(hotkey.key, Key::PageUp);
        assert!(!hotkey.ctrl && !hotkey.shift && !hotkey.alt);
    }

    #[test]
    fn rejects_modifier_only_and_unknown_keys() {
        assert_eq!(parse_hotkey("Ctrl+Shift"), None);
        assert_eq!(parse_hotkey("Ctrl+Fn1"), None);
        assert_eq!(parse_hotkey(""), None);
    }

    #[test]
    fn trigger_take_clears_the_flag_and_rebind_swaps_the_key() {
        let hotkeys = GlobalHotkeys::new();
        let trigger = hotkeys.register(parse_hotkey("Ctrl+Shift+D"));

        trigger.fire_if_matching(Key::KeyD, true, true, false);
        assert!(trigger.take());
        assert!(!trigger.take());

        trigger.fire_if_matching(Key::KeyD, true, false, false);
        assert!(!trigger.take());

        trigger.rebind(parse_hotkey("Ctrl+K"));
        trigger.fire_if_matching(Key::KeyK, true, false, false);
        assert!(trigger.take());

        trigger.rebind(None);
        trigger.fire_if_matching(Key::KeyK, true, false, false);
        assert!(!trigger.take());
    }
}
