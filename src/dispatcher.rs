//! Query Dispatcher
//!
//! Each send runs on its own short-lived worker thread. The worker owns its
//! query and reports back only by enqueueing [`AppEvent::QueryFinished`].

use crate::client::ChatClient;
use crate::error::ChatResult;
use crate::events::{AppEvent, EventSender, QueryOutcome, SessionId};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// One prompt bound for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub prompt: String,
    pub model: String,
}

/// Text shown in place of a response when the call fails
pub fn format_failure(reason: &str) -> String {
    format!("Error calling model: {}", reason)
}

/// Run the client call and turn any failure into display text
pub fn run_query(client: &dyn ChatClient, query: &PendingQuery) -> QueryOutcome {
    match client.ask(&query.prompt, &query.model) {
        Ok(answer) => QueryOutcome::Answer(answer),
        Err(e) => QueryOutcome::Failed(format_failure(&e.to_string())),
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn ChatClient>,
    events: EventSender,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn ChatClient>, events: EventSender) -> Self {
        Self { client, events }
    }

    /// Start a worker for `query`. The result is tagged with `session` so a
    /// closed session can ignore it.
    pub fn dispatch(&self, session: SessionId, query: PendingQuery) -> ChatResult<()> {
        let client = Arc::clone(&self.client);
        let events = self.events.clone();

        info!("📤 Query for session {} on {}", session, query.model);
        thread::Builder::new()
            .name(format!("query-{}", session))
            .spawn(move || {
                let outcome = run_query(client.as_ref(), &query);
                debug!("Query for session {} finished", session);
                // Receiver gone means the app is shutting down
                let _ = events.send(AppEvent::QueryFinished { session, outcome });
            })?;
        Ok(())
    }
}
