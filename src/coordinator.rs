//! Session Coordinator
//!
//! Runs on the UI-owning thread and owns every piece of session state.
//! Everything else talks to it through [`AppEvent`]s.
//!
//! ```text
//! Closed --trigger--> Open-Idle --send--> Open-Busy
//!   ^                   |  ^                 |
//!   +--trigger/close----+  +--result/error---+
//! ```
//! Trigger or close from Open-Busy also goes to Closed; the worker's late
//! result is then dropped.

use crate::dispatcher::{format_failure, Dispatcher, PendingQuery};
use crate::events::{AppEvent, EventReceiver, QueryOutcome, SessionId};
use crate::history::HistoryRing;
use crate::selection::SelectionSource;
use crate::store::{Store, KEY_CURRENT_MODEL, KEY_THEME, KEY_WINDOW_GEOMETRY};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Colour scheme of the chat window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Window position and size, restored on the next open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The presentation layer, driven only from the UI thread
pub trait Presenter {
    /// Show the window with `prefill` in the input box
    fn open(&mut self, prefill: &str, geometry: Option<WindowGeometry>);
    fn close(&mut self);
    fn set_models(&mut self, models: &[String], current: &str);
    fn update_title(&mut self, model: &str);
    fn set_response(&mut self, text: &str);
    fn set_busy(&mut self, busy: bool);
    fn clear_input(&mut self);
    fn set_input(&mut self, text: &str);
    fn apply_theme(&mut self, theme: Theme);
    /// Current window geometry, if the presenter has one
    fn geometry(&self) -> Option<WindowGeometry> {
        None
    }
}

/// Lifecycle state as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    OpenIdle,
    OpenBusy,
}

/// One open interaction
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub model: String,
    pub busy: bool,
    pub prefill: String,
}

pub struct Coordinator<S, P> {
    source: S,
    presenter: P,
    dispatcher: Dispatcher,
    store: Store,
    models: Vec<String>,
    current_model: String,
    history: HistoryRing,
    theme: Theme,
    session: Option<Session>,
    next_id: SessionId,
    hotkey_available: bool,
}

impl<S: SelectionSource, P: Presenter> Coordinator<S, P> {
    /// `models` must be non-empty; the stored model is used only if listed
    pub fn new(
        source: S,
        presenter: P,
        dispatcher: Dispatcher,
        store: Store,
        models: Vec<String>,
    ) -> Self {
        let fallback = models.first().cloned().unwrap_or_default();
        let stored: String = store.get(KEY_CURRENT_MODEL, fallback.clone());
        let current_model = if models.contains(&stored) {
            stored
        } else {
            fallback
        };
        let history = HistoryRing::from_entries(store.history());
        let theme = store.get(KEY_THEME, Theme::default());

        Self {
            source,
            presenter,
            dispatcher,
            store,
            models,
            current_model,
            history,
            theme,
            session: None,
            next_id: 1,
            hotkey_available: true,
        }
    }

    /// Process events until `Quit` or until every sender is gone
    pub fn run(&mut self, events: EventReceiver) {
        info!("✅ Coordinator running");
        while let Ok(event) = events.recv() {
            if self.handle(event).is_break() {
                break;
            }
        }
        if self.session.is_some() {
            self.close_session();
        }
        info!("👋 Coordinator stopped");
    }

    pub fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        debug!("Event: {:?}", event);
        match event {
            AppEvent::Trigger => self.on_trigger(),
            AppEvent::HotkeyUnavailable(reason) => {
                // Reported once by the monitor; the rest of the app keeps going
                warn!("⚠️ Hotkey disabled: {}", reason);
                self.hotkey_available = false;
            }
            AppEvent::Send(text) => self.on_send(&text),
            AppEvent::ModelChanged(model) => self.on_model_changed(model),
            AppEvent::HistoryPrev => {
                if self.session.is_some() {
                    if let Some(text) = self.history.prev() {
                        self.presenter.set_input(text);
                    }
                }
            }
            AppEvent::HistoryNext => {
                if self.session.is_some() {
                    if let Some(text) = self.history.next() {
                        self.presenter.set_input(text);
                    }
                }
            }
            AppEvent::ClearInput => {
                if self.session.is_some() {
                    self.presenter.clear_input();
                    self.history.reset_cursor();
                }
            }
            AppEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.store.set(KEY_THEME, self.theme);
                if self.session.is_some() {
                    self.presenter.apply_theme(self.theme);
                }
            }
            AppEvent::Closed => {
                if self.session.is_some() {
                    self.close_session();
                }
            }
            AppEvent::QueryFinished { session, outcome } => self.on_result(session, outcome),
            AppEvent::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn on_trigger(&mut self) {
        if self.session.is_some() {
            info!("🔽 Hotkey toggled session closed");
            self.close_session();
            return;
        }

        // Capture on this thread, before the popup can steal focus
        let prefill = self.source.capture();
        let id = self.next_id;
        self.next_id += 1;

        let geometry = self.store.get(KEY_WINDOW_GEOMETRY, None::<WindowGeometry>);
        self.presenter.open(&prefill, geometry);
        self.presenter.apply_theme(self.theme);
        self.presenter.set_models(&self.models, &self.current_model);
        self.presenter.update_title(&self.current_model);
        self.history.reset_cursor();

        info!("🔼 Session {} opened ({} chars prefilled)", id, prefill.chars().count());
        self.session = Some(Session {
            id,
            model: self.current_model.clone(),
            busy: false,
            prefill,
        });
    }

    fn on_send(&mut self, text: &str) {
        let Some(session) = self.session.as_mut() else {
            debug!("Send with no open session ignored");
            return;
        };
        if session.busy {
            debug!("Send while busy ignored");
            return;
        }
        let prompt = text.trim();
        if prompt.is_empty() {
            return;
        }

        let query = PendingQuery {
            prompt: prompt.to_string(),
            model: session.model.clone(),
        };
        let id = session.id;
        session.busy = true;

        if self.history.push(prompt) {
            self.store.set_history(&self.history.entries());
        }
        self.presenter.clear_input();
        self.presenter.set_busy(true);

        if let Err(e) = self.dispatcher.dispatch(id, query) {
            warn!("⚠️ Could not start query worker: {}", e);
            self.on_result(id, QueryOutcome::Failed(format_failure(&e.to_string())));
        }
    }

    fn on_model_changed(&mut self, model: String) {
        if model == self.current_model {
            return;
        }
        info!("🔀 Model changed to {}", model);
        self.store.set(KEY_CURRENT_MODEL, &model);
        if let Some(session) = self.session.as_mut() {
            session.model = model.clone();
            self.presenter.update_title(&model);
        }
        self.current_model = model;
    }

    fn on_result(&mut self, id: SessionId, outcome: QueryOutcome) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            debug!("Late result for session {} dropped", id);
            return;
        };
        session.busy = false;
        if let QueryOutcome::Failed(reason) = &outcome {
            warn!("⚠️ Query failed: {}", reason);
        }
        self.presenter.set_response(outcome.text());
        self.presenter.set_busy(false);
    }

    fn close_session(&mut self) {
        if let Some(geometry) = self.presenter.geometry() {
            self.store.set(KEY_WINDOW_GEOMETRY, Some(geometry));
        }
        self.store.set(KEY_THEME, self.theme);
        self.presenter.close();
        if let Some(session) = self.session.take() {
            debug!("Session {} closed (busy: {})", session.id, session.busy);
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::Closed,
            Some(s) if s.busy => SessionState::OpenBusy,
            Some(_) => SessionState::OpenIdle,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_model(&self) -> &str {
        &self.current_model
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn hotkey_available(&self) -> bool {
        self.hotkey_available
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
