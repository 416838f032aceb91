//! Terminal front-end
//!
//! A minimal presenter for running without a windowing toolkit. Output goes
//! to stdout; a reader thread turns stdin lines into [`AppEvent`]s.

use crate::coordinator::{Presenter, Theme, WindowGeometry};
use crate::events::{AppEvent, EventSender};
use std::io::{BufRead, Write};
use std::thread;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConsolePresenter {
    title: String,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

impl Presenter for ConsolePresenter {
    fn open(&mut self, prefill: &str, _geometry: Option<WindowGeometry>) {
        self.print("──── MouseChat ──── (/help for commands)");
        if !prefill.is_empty() {
            self.print(&format!("Selection:\n{}", prefill));
        }
    }

    fn close(&mut self) {
        self.print("──── closed ────");
    }

    fn set_models(&mut self, models: &[String], current: &str) {
        for model in models {
            let marker = if model == current { "*" } else { " " };
            self.print(&format!(" {} {}", marker, model));
        }
    }

    fn update_title(&mut self, model: &str) {
        self.title = model.to_string();
        self.print(&format!("Model: {}", model));
    }

    fn set_response(&mut self, text: &str) {
        self.print(&format!("\n{}\n", text));
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            self.print(&format!("Thinking… ({})", self.title));
        }
    }

    fn clear_input(&mut self) {}

    fn set_input(&mut self, text: &str) {
        self.print(&format!("> {}", text));
    }

    fn apply_theme(&mut self, theme: Theme) {
        debug!("Theme {:?} has no effect in the terminal", theme);
    }
}

/// Turn one input line into an event. `None` means nothing to send.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix('/') else {
        return (!line.trim().is_empty()).then(|| AppEvent::Send(line.to_string()));
    };

    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "open" => Some(AppEvent::Trigger),
        "close" => Some(AppEvent::Closed),
        "quit" | "exit" => Some(AppEvent::Quit),
        "model" if !arg.is_empty() => Some(AppEvent::ModelChanged(arg.to_string())),
        "prev" => Some(AppEvent::HistoryPrev),
        "next" => Some(AppEvent::HistoryNext),
        "clear" => Some(AppEvent::ClearInput),
        "theme" => Some(AppEvent::ToggleTheme),
        _ => None,
    }
}

pub const HELP: &str = "\
Type a prompt and press Enter to send it.
  /open          open a session (same as the hotkey)
  /model <id>    switch model
  /prev, /next   browse prompt history
  /clear         clear input
  /theme         toggle theme
  /close         close the session
  /quit          exit";

/// Read stdin on a background thread until EOF, then send `Quit`
pub fn spawn_stdin_reader(events: EventSender) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim() == "/help" {
                    println!("{}", HELP);
                    continue;
                }
                if let Some(event) = parse_command(&line) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            let _ = events.send(AppEvent::Quit);
        })
}
