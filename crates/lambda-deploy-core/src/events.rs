//! Stack event deduplication

use std::collections::HashSet;

/// Event ids already surfaced during one wait
///
/// Event ids are only unique within one provider event stream, so a set
/// belongs to exactly one poll invocation and is dropped with it.
#[derive(Debug, Default)]
pub struct SeenEvents {
    ids: HashSet<String>,
}

impl SeenEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time an id is offered, false afterwards
    pub fn should_log(&mut self, event_id: &str) -> bool {
        if self.ids.contains(event_id) {
            return false;
        }
        self.ids.insert(event_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
