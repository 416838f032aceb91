//! Mock conversational API client

use mousechat::client::ChatClient;
use mousechat::error::{ChatError, ChatResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Returns queued replies in order and records every call
#[derive(Clone, Default)]
pub struct MockClient {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockClient {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        let replies = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChatClient for MockClient {
    fn ask(&self, prompt: &str, model: &str) -> ChatResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(ChatError::Client(reason)),
            None => Err(ChatError::Client("no reply queued".to_string())),
        }
    }
}
