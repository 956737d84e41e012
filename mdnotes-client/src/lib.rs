//! Terminal client for the notes server: note list with search, a title and
//! markdown editor with live preview, and transient notifications.

pub mod api;
pub mod app;
pub mod keymap;
pub mod markdown;
pub mod notification;
pub mod state;
pub mod ui;
