//! Presenter that records every call

use mousechat::coordinator::{Presenter, Theme, WindowGeometry};
use mousechat::selection::SelectionSource;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    Open(String),
    Close,
    SetModels(Vec<String>, String),
    Title(String),
    Response(String),
    Busy(bool),
    ClearInput,
    SetInput(String),
    Theme(Theme),
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub calls: Arc<Mutex<Vec<UiCall>>>,
    pub opened_with: Arc<Mutex<Vec<Option<WindowGeometry>>>>,
    pub geometry: Option<WindowGeometry>,
}

impl RecordingPresenter {
    pub fn calls(&self) -> Vec<UiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_response(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|c| match c {
            UiCall::Response(text) => Some(text),
            _ => None,
        })
    }

    fn record(&self, call: UiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn open(&mut self, prefill: &str, geometry: Option<WindowGeometry>) {
        self.opened_with.lock().unwrap().push(geometry);
        self.record(UiCall::Open(prefill.to_string()));
    }
    fn close(&mut self) {
        self.record(UiCall::Close);
    }
    fn set_models(&mut self, models: &[String], current: &str) {
        self.record(UiCall::SetModels(models.to_vec(), current.to_string()));
    }
    fn update_title(&mut self, model: &str) {
        self.record(UiCall::Title(model.to_string()));
    }
    fn set_response(&mut self, text: &str) {
        self.record(UiCall::Response(text.to_string()));
    }
    fn set_busy(&mut self, busy: bool) {
        self.record(UiCall::Busy(busy));
    }
    fn clear_input(&mut self) {
        self.record(UiCall::ClearInput);
    }
    fn set_input(&mut self, text: &str) {
        self.record(UiCall::SetInput(text.to_string()));
    }
    fn apply_theme(&mut self, theme: Theme) {
        self.record(UiCall::Theme(theme));
    }
    fn geometry(&self) -> Option<WindowGeometry> {
        self.geometry
    }
}

/// Selection source yielding queued captures, then empty strings
#[derive(Clone, Default)]
pub struct ScriptedSource {
    captures: Arc<Mutex<VecDeque<String>>>,
    pub count: Arc<Mutex<usize>>,
}

impl ScriptedSource {
    pub fn new(captures: &[&str]) -> Self {
        Self {
            captures: Arc::new(Mutex::new(
                captures.iter().map(|s| s.to_string()).collect(),
            )),
            count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn count(&self) -> usize {
        *self.count.lock().unwrap()
    }
}

impl SelectionSource for ScriptedSource {
    fn capture(&mut self) -> String {
        *self.count.lock().unwrap() += 1;
        self.captures.lock().unwrap().pop_front().unwrap_or_default()
    }
}
