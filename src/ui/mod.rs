pub mod overlay;
pub mod settings_ui;
pub mod toolbar;

pub use overlay::{HostChannels, OverlayApp};
