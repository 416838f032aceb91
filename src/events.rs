//! Messages consumed by the UI-owning thread
//!
//! The hotkey thread, query workers and the presentation layer never touch
//! session state directly; they enqueue one of these instead.

use std::sync::mpsc::{Receiver, Sender};

/// Identifies one open session. Results tagged with a stale id are dropped.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The global hotkey fired
    Trigger,
    /// The global input hook could not be installed
    HotkeyUnavailable(String),

    // From the presentation layer
    Send(String),
    ModelChanged(String),
    HistoryPrev,
    HistoryNext,
    ClearInput,
    ToggleTheme,
    /// The user closed the window
    Closed,
    Quit,

    /// A query worker finished
    QueryFinished {
        session: SessionId,
        outcome: QueryOutcome,
    },
}

/// Response text, or the error text to display in its place
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Answer(String),
    Failed(String),
}

impl QueryOutcome {
    pub fn text(&self) -> &str {
        match self {
            QueryOutcome::Answer(text) | QueryOutcome::Failed(text) => text,
        }
    }
}

pub type EventSender = Sender<AppEvent>;
pub type EventReceiver = Receiver<AppEvent>;

/// Create the UI thread's event queue
pub fn channel() -> (EventSender, EventReceiver) {
    std::sync::mpsc::channel()
}
