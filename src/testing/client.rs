//! TestClient: plays the browser against a [`Session`].
//!
//! The client queues calls, then on [`sync`](TestClient::sync) lets the
//! session process them and applies the returned state diffs and item
//! payloads to its own mirror, the way a real client would.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::component::{Component, StateDiff};
use crate::data::{DataChange, RowData};
use crate::error::RpcError;
use crate::event::RpcCall;
use crate::session::{ComponentChange, ComponentId, Session, SessionConfig};

// ---------------------------------------------------------------------------
// TestClient
// ---------------------------------------------------------------------------

/// A headless client for tests.
///
/// # Examples
///
/// ```
/// use trellis::components::CheckBox;
/// use trellis::testing::TestClient;
///
/// let mut client = TestClient::new();
/// let id = client.attach(CheckBox::with_caption("Agree"));
/// client.sync();
/// client.set_checked(id, true);
/// assert!(client.sync().is_empty());
/// assert_eq!(client.state_value(id, "checked"), Some(&serde_json::json!(true)));
/// ```
pub struct TestClient {
    session: Session,
    states: HashMap<ComponentId, Map<String, Value>>,
    rows: HashMap<ComponentId, Vec<RowData>>,
    last_changes: Vec<ComponentChange>,
}

impl TestClient {
    /// A client driving a session with default settings.
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_session(Session::new(config))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            states: HashMap::new(),
            rows: HashMap::new(),
            last_changes: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Attach a component to the session.
    pub fn attach(&mut self, component: impl Component) -> ComponentId {
        self.session.attach(Box::new(component))
    }

    /// The attached component at `id`, downcast.
    pub fn get<C: Component>(&self, id: ComponentId) -> Option<&C> {
        self.session.get(id)
    }

    pub fn get_mut<C: Component>(&mut self, id: ComponentId) -> Option<&mut C> {
        self.session.get_mut(id)
    }

    // ----- Sending -----

    /// Queue a call. Nothing happens until [`sync`](Self::sync).
    pub fn send(&mut self, target: ComponentId, call: RpcCall) {
        self.session.queue_rpc(target, call);
    }

    /// Queue a JSON frame exactly as a browser would send it.
    pub fn send_json(&mut self, target: ComponentId, frame: &str) -> Result<(), RpcError> {
        let call = RpcCall::from_json(frame)?;
        self.send(target, call);
        Ok(())
    }

    pub fn click(&mut self, target: ComponentId) {
        self.send(target, RpcCall::Click);
    }

    pub fn set_checked(&mut self, target: ComponentId, checked: bool) {
        self.send(target, RpcCall::SetChecked { checked });
    }

    pub fn set_text(&mut self, target: ComponentId, text: impl Into<String>) {
        self.send(target, RpcCall::SetText { text: text.into() });
    }

    pub fn change_color(&mut self, target: ComponentId, color: impl Into<String>) {
        self.send(target, RpcCall::ChangeColor { color: color.into() });
    }

    /// Select the row whose caption is `caption`. Returns `false` if the
    /// client has no such row.
    pub fn select_caption(&mut self, target: ComponentId, caption: &str) -> bool {
        match self.key_of(target, caption) {
            Some(key) => {
                self.send(target, RpcCall::Select { key });
                true
            }
            None => false,
        }
    }

    /// Deselect the row whose caption is `caption`.
    pub fn deselect_caption(&mut self, target: ComponentId, caption: &str) -> bool {
        match self.key_of(target, caption) {
            Some(key) => {
                self.send(target, RpcCall::Deselect { key });
                true
            }
            None => false,
        }
    }

    /// Process queued calls and apply the resulting changes. Returns the
    /// errors of calls the session rejected.
    pub fn sync(&mut self) -> Vec<RpcError> {
        let errors = self.session.process_rpc();
        let changes = self.session.collect_changes();
        for change in &changes {
            if let Some(diff) = &change.state {
                self.apply_state(change.id, diff);
            }
            if let Some(data) = &change.data {
                self.apply_data(change.id, data);
            }
        }
        self.last_changes = changes;
        errors
    }

    fn apply_state(&mut self, id: ComponentId, diff: &StateDiff) {
        let state = self.states.entry(id).or_default();
        for (key, value) in diff {
            if value.is_null() {
                state.remove(key);
            } else {
                state.insert(key.clone(), value.clone());
            }
        }
    }

    fn apply_data(&mut self, id: ComponentId, data: &DataChange) {
        let rows = self.rows.entry(id).or_default();
        match data {
            DataChange::Reset { rows: fresh, .. } => *rows = fresh.clone(),
            DataChange::Update { rows: updated } => {
                for row in updated {
                    match rows.iter_mut().find(|known| known.key() == row.key()) {
                        Some(known) => *known = row.clone(),
                        None => rows.push(row.clone()),
                    }
                }
            }
        }
    }

    // ----- Inspection -----

    /// Client-side view of the state of `id`.
    pub fn state(&self, id: ComponentId) -> Option<&Map<String, Value>> {
        self.states.get(&id)
    }

    pub fn state_value(&self, id: ComponentId, key: &str) -> Option<&Value> {
        self.states.get(&id)?.get(key)
    }

    /// Rows the client currently shows for `id`.
    pub fn rows(&self, id: ComponentId) -> &[RowData] {
        self.rows.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Key of the row captioned `caption`.
    pub fn key_of(&self, id: ComponentId, caption: &str) -> Option<String> {
        self.rows(id)
            .iter()
            .find(|row| row.get("v").and_then(Value::as_str) == Some(caption))
            .map(|row| row.key().to_owned())
    }

    /// Captions of the rows flagged as selected.
    pub fn selected_captions(&self, id: ComponentId) -> Vec<String> {
        self.rows(id)
            .iter()
            .filter(|row| row.get("s") == Some(&Value::Bool(true)))
            .filter_map(|row| row.get("v").and_then(Value::as_str))
            .map(str::to_owned)
            .collect()
    }

    /// Changes applied by the last [`sync`](Self::sync).
    pub fn last_changes(&self) -> &[ComponentChange] {
        &self.last_changes
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
