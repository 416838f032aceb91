//! MouseChat Library
//!
//! Captures the foreground text selection on a global hotkey and hands it
//! to a chat session backed by a conversational API.

pub mod client;
pub mod clipboard;
pub mod config;
pub mod console;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod history;
pub mod hotkey;
pub mod input;
pub mod keys;
pub mod selection;
pub mod store;
