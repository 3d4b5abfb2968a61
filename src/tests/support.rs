//! Shared test fixtures.

use std::sync::{Arc, Mutex};

use crate::observe::Observer;

/// Observer that records every event for assertions.
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    events: Arc<Mutex<Vec<(&'static str, String)>>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(&'static str, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(level, _)| *level == "info")
            .map(|(_, message)| message)
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(level, _)| *level == "error")
            .map(|(_, message)| message)
            .collect()
    }
}

impl Observer for CollectingObserver {
    fn info(&self, message: &str) {
        self.events.lock().unwrap().push(("info", message.into()));
    }

    fn debug(&self, message: &str) {
        self.events.lock().unwrap().push(("debug", message.into()));
    }

    fn error(&self, message: &str) {
        self.events.lock().unwrap().push(("error", message.into()));
    }
}
