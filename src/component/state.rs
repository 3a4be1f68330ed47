//! State tracking: diffs successive state snapshots of one component.
//!
//! Components never mark themselves dirty. The session takes a snapshot with
//! [`Component::state`](super::Component::state) and the tracker reports which
//! top-level keys changed since the last snapshot it saw.

use serde_json::{Map, Value};

/// Changed top-level state keys and their new values.
pub type StateDiff = Map<String, Value>;

/// Remembers the last snapshot sent for one component.
#[derive(Debug, Default)]
pub struct StateTracker {
    last: Option<Map<String, Value>>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Compare `state` with the last snapshot and remember it.
    ///
    /// The first call returns the full state. Keys that disappeared are
    /// reported as `null`. Returns `None` when nothing changed or when `state`
    /// is not a JSON object.
    pub fn diff(&mut self, state: &Value) -> Option<StateDiff> {
        let current = state.as_object()?;
        let diff = match &self.last {
            None => current.clone(),
            Some(last) => {
                let mut diff = Map::new();
                for (key, value) in current {
                    if last.get(key) != Some(value) {
                        diff.insert(key.clone(), value.clone());
                    }
                }
                for key in last.keys() {
                    if !current.contains_key(key) {
                        diff.insert(key.clone(), Value::Null);
                    }
                }
                diff
            }
        };
        self.last = Some(current.clone());
        if diff.is_empty() {
            None
        } else {
            tracing::trace!(keys = diff.len(), "state changed");
            Some(diff)
        }
    }

    /// Forget the last snapshot; the next diff is a full state.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn has_sent(&self) -> bool {
        self.last.is_some()
    }
}
