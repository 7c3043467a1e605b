pub mod config;
pub mod hotkey;
pub mod ink;
pub mod logging;
#[cfg(target_os = "linux")]
pub mod tray;
pub mod ui;
