//! Session: owns the attached components, routes client calls and collects
//! the changes to send back.
//!
//! Every mutation takes `&mut Session`, so one session is driven by one
//! caller at a time. Components hold `Rc` internally and never leave the
//! thread that created the session.

use serde::Serialize;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::component::{Component, StateDiff, StateTracker};
use crate::data::DataChange;
use crate::design::{Design, DesignContext};
use crate::error::{DesignError, RpcError};
use crate::event::{RpcCall, RpcEnvelope, RpcQueue};

new_key_type! {
    /// Key of a component attached to a [`Session`].
    pub struct ComponentId;
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Settings shared by every design pass and payload of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Write design attributes even when they equal the default.
    pub write_default_values: bool,
    /// Let listing components write their items into markup.
    pub write_data: bool,
    /// Prefix of every component tag, without the trailing dash.
    pub tag_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            write_default_values: false,
            write_data: true,
            tag_prefix: "vaadin".to_owned(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_write_default_values(mut self, write: bool) -> Self {
        self.write_default_values = write;
        self
    }

    pub fn with_write_data(mut self, write: bool) -> Self {
        self.write_data = write;
        self
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }
}

// ---------------------------------------------------------------------------
// ComponentChange
// ---------------------------------------------------------------------------

/// Everything that changed on one component since the last collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentChange {
    #[serde(skip)]
    pub id: ComponentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DataChange>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owns a set of top-level components.
///
/// Layout children are owned by their layout; address the layout to reach
/// them, or attach a component directly to route calls to it.
pub struct Session {
    config: SessionConfig,
    components: SlotMap<ComponentId, Box<dyn Component>>,
    /// Attach order; `collect_changes` reports in this order.
    order: Vec<ComponentId>,
    trackers: SecondaryMap<ComponentId, StateTracker>,
    rpc: RpcQueue,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            components: SlotMap::with_key(),
            order: Vec::new(),
            trackers: SecondaryMap::new(),
            rpc: RpcQueue::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ----- Ownership -----

    /// Take ownership of a component. Its full state is sent on the next
    /// [`collect_changes`](Self::collect_changes).
    pub fn attach(&mut self, component: Box<dyn Component>) -> ComponentId {
        let tag = component.tag_name();
        let id = self.components.insert(component);
        self.trackers.insert(id, StateTracker::new());
        self.order.push(id);
        tracing::debug!(component = tag, ?id, "attached");
        id
    }

    /// Give a component back. Calls still queued for it fail with
    /// [`RpcError::UnknownComponent`].
    pub fn detach(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let component = self.components.remove(id)?;
        self.trackers.remove(id);
        self.order.retain(|&other| other != id);
        tracing::debug!(component = component.tag_name(), ?id, "detached");
        Some(component)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Attached ids in attach order.
    pub fn ids(&self) -> &[ComponentId] {
        &self.order
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.components.get(id).map(|component| component.as_ref())
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        match self.components.get_mut(id) {
            Some(component) => Some(component.as_mut()),
            None => None,
        }
    }

    /// The component at `id` downcast to its concrete type.
    pub fn get<C: Component>(&self, id: ComponentId) -> Option<&C> {
        self.component(id)?.as_any().downcast_ref::<C>()
    }

    pub fn get_mut<C: Component>(&mut self, id: ComponentId) -> Option<&mut C> {
        self.component_mut(id)?.as_any_mut().downcast_mut::<C>()
    }

    // ----- RPC -----

    /// Queue a client call for the next [`process_rpc`](Self::process_rpc).
    pub fn queue_rpc(&mut self, target: ComponentId, call: RpcCall) {
        self.rpc.push(RpcEnvelope::new(target, call));
    }

    pub fn pending_rpc_count(&self) -> usize {
        self.rpc.pending_count()
    }

    /// Dispatch every queued call in arrival order.
    ///
    /// A failing call does not stop the ones after it; the errors are
    /// returned in the same order.
    pub fn process_rpc(&mut self) -> Vec<RpcError> {
        let mut errors = Vec::new();
        for envelope in self.rpc.drain() {
            if let Err(err) = self.dispatch(envelope.target, envelope.call) {
                errors.push(err);
            }
        }
        errors
    }

    /// Decode a JSON frame and dispatch it right away.
    pub fn handle_rpc_json(&mut self, target: ComponentId, frame: &str) -> Result<(), RpcError> {
        let call = RpcCall::from_json(frame)?;
        self.dispatch(target, call)
    }

    fn dispatch(&mut self, target: ComponentId, call: RpcCall) -> Result<(), RpcError> {
        let component = self
            .components
            .get_mut(target)
            .ok_or(RpcError::UnknownComponent(target))?;
        if !component.common().accepts_input() {
            tracing::debug!(
                component = component.tag_name(),
                method = call.method(),
                "call to disabled or hidden component dropped"
            );
            return Ok(());
        }
        tracing::trace!(component = component.tag_name(), method = call.method(), "rpc");
        component.handle_rpc(call)
    }

    // ----- Changes -----

    /// State diffs and item payloads of every component that changed.
    pub fn collect_changes(&mut self) -> Vec<ComponentChange> {
        let mut changes = Vec::new();
        for &id in &self.order {
            let Some(component) = self.components.get_mut(id) else {
                continue;
            };
            let data = component.flush_data();
            let state = self
                .trackers
                .get_mut(id)
                .and_then(|tracker| tracker.diff(&component.state()));
            if state.is_some() || data.is_some() {
                changes.push(ComponentChange { id, state, data });
            }
        }
        tracing::trace!(changed = changes.len(), "collected changes");
        changes
    }

    /// Send the full state of `id` again on the next collection.
    pub fn invalidate(&mut self, id: ComponentId) {
        if let Some(tracker) = self.trackers.get_mut(id) {
            tracker.invalidate();
        }
    }

    // ----- Designs -----

    /// A fresh design context following this session's settings.
    pub fn design_context(&self) -> DesignContext {
        DesignContext::from_config(&self.config)
    }

    /// Build the component tree described by `design` and attach its root.
    pub fn read_design(&mut self, design: &Design) -> Result<ComponentId, DesignError> {
        let component = self.design_context().read_root(design)?;
        Ok(self.attach(component))
    }

    /// Write the component at `id` as a design. `None` if nothing is
    /// attached under `id`.
    pub fn write_design(&self, id: ComponentId) -> Option<Result<Design, DesignError>> {
        let component = self.component(id)?;
        Some(self.design_context().write_component(component))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::component::{HasItems, HasValue};
    use crate::components::{Button, CheckBox, NativeSelect, OrderedLayout, TextField};
    use crate::design::ElementData;

    #[test]
    fn config_builder() {
        let config = SessionConfig::new()
            .with_write_default_values(true)
            .with_write_data(false)
            .with_tag_prefix("acme");
        assert!(config.write_default_values);
        assert!(!config.write_data);
        assert_eq!(config.tag_prefix, "acme");
        assert_eq!(SessionConfig::new(), SessionConfig::default());
    }

    #[test]
    fn attach_get_detach() {
        let mut session = Session::default();
        let id = session.attach(Box::new(Button::with_caption("Save")));
        assert_eq!(session.len(), 1);
        assert_eq!(session.get::<Button>(id).unwrap().caption(), Some("Save"));
        assert!(session.get::<CheckBox>(id).is_none());
        assert!(session.detach(id).is_some());
        assert!(!session.contains(id));
        assert!(session.detach(id).is_none());
    }

    #[test]
    fn rpc_is_processed_in_order() {
        let mut session = Session::default();
        let id = session.attach(Box::new(TextField::new()));
        session.queue_rpc(id, RpcCall::SetText { text: "a".into() });
        session.queue_rpc(id, RpcCall::SetText { text: "b".into() });
        assert_eq!(session.pending_rpc_count(), 2);
        assert!(session.process_rpc().is_empty());
        assert_eq!(session.get::<TextField>(id).unwrap().value(), "b");
        assert_eq!(session.pending_rpc_count(), 0);
    }

    #[test]
    fn errors_do_not_stop_the_queue() {
        let mut session = Session::default();
        let check_box = session.attach(Box::new(CheckBox::new()));
        let gone = session.attach(Box::new(Button::new()));
        session.detach(gone);
        session.queue_rpc(gone, RpcCall::Click);
        session.queue_rpc(check_box, RpcCall::Click);
        session.queue_rpc(check_box, RpcCall::SetChecked { checked: true });
        let errors = session.process_rpc();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], RpcError::UnknownComponent(id) if id == gone));
        assert!(matches!(errors[1], RpcError::Unsupported { .. }));
        assert!(session.get::<CheckBox>(check_box).unwrap().value());
    }

    #[test]
    fn disabled_components_ignore_calls() {
        let mut session = Session::default();
        let id = session.attach(Box::new(CheckBox::new()));
        session.component_mut(id).unwrap().common_mut().enabled = false;
        session
            .handle_rpc_json(id, r#"{"method":"set_checked","checked":true}"#)
            .unwrap();
        assert!(!session.get::<CheckBox>(id).unwrap().value());
    }

    #[test]
    fn malformed_json_frame() {
        let mut session = Session::default();
        let id = session.attach(Box::new(CheckBox::new()));
        let err = session.handle_rpc_json(id, "{").unwrap_err();
        assert!(matches!(err, RpcError::Malformed(_)));
    }

    #[test]
    fn first_collection_sends_everything_then_only_diffs() {
        let mut session = Session::default();
        let id = session.attach(Box::new(CheckBox::with_caption("Agree")));
        let first = session.collect_changes();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].state.as_ref().unwrap()["caption"], "Agree");
        assert!(session.collect_changes().is_empty());

        session.get_mut::<CheckBox>(id).unwrap().set_value(true);
        let changes = session.collect_changes();
        assert_eq!(
            changes[0].state.clone().map(serde_json::Value::Object),
            Some(json!({ "checked": true }))
        );

        session.invalidate(id);
        let again = session.collect_changes();
        assert!(again[0].state.as_ref().unwrap().contains_key("caption"));
    }

    #[test]
    fn data_payloads_are_collected() {
        let mut session = Session::default();
        let mut select = NativeSelect::<String>::new();
        select.set_items(["a", "b"].map(String::from));
        let id = session.attach(Box::new(select));
        let changes = session.collect_changes();
        assert!(matches!(changes[0].data, Some(DataChange::Reset { size: 2, .. })));

        session.queue_rpc(id, RpcCall::Select { key: "2".into() });
        assert!(session.process_rpc().is_empty());
        let changes = session.collect_changes();
        let state = changes[0].state.as_ref().unwrap();
        assert_eq!(state["selectedItemKey"], "2");
        assert_eq!(changes[0].data.as_ref().unwrap().rows().len(), 1);
    }

    #[test]
    fn changes_follow_attach_order() {
        let mut session = Session::default();
        let a = session.attach(Box::new(Button::with_caption("A")));
        let b = session.attach(Box::new(Button::with_caption("B")));
        let ids: Vec<_> = session.collect_changes().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(session.ids(), &[a, b]);
    }

    #[test]
    fn design_round_trip_through_session() {
        let mut design = Design::new();
        let root = design.insert(ElementData::new("vaadin-vertical-layout"));
        let button = design.insert_child(root, ElementData::new("vaadin-button"));
        design.get_mut(button).unwrap().set_text("Go");

        let mut session = Session::default();
        let id = session.read_design(&design).unwrap();
        let layout = session.get::<OrderedLayout>(id).unwrap();
        assert_eq!(layout.child::<Button>(0).unwrap().caption(), Some("Go"));

        let written = session.write_design(id).unwrap().unwrap();
        let root = written.root().unwrap();
        assert_eq!(written.get(root).unwrap().tag, "vaadin-vertical-layout");
        assert_eq!(written.children(root).len(), 1);
    }

    #[test]
    fn prefix_follows_config() {
        let mut session = Session::new(SessionConfig::new().with_tag_prefix("acme"));
        let id = session.attach(Box::new(Button::with_caption("Go")));
        let design = session.write_design(id).unwrap().unwrap();
        assert_eq!(design.get(design.root().unwrap()).unwrap().tag, "acme-button");
    }
}
