//! The annotation engine: drawing model, undo/redo history, replay
//! renderer, gesture interpretation, shortcut matching and session state.
//! Everything here is platform-free; host concerns arrive as
//! [`messages::HostSignal`]s and leave as [`session::HostRequest`]s.

pub mod history;
pub mod input;
pub mod messages;
pub mod model;
pub mod render;
pub mod session;
pub mod shortcuts;
pub mod text;
