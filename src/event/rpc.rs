//! Client RPC calls, their routing envelope and the session's call queue.
//!
//! [`RpcCall`] decodes from JSON frames tagged by `method`, e.g.
//! `{"method": "select", "key": "3"}`. [`RpcQueue`] holds [`RpcEnvelope`]s
//! until the session drains and dispatches them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::session::ComponentId;

// ---------------------------------------------------------------------------
// RpcCall
// ---------------------------------------------------------------------------

/// A named remote call from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RpcCall {
    Click,
    Select {
        key: String,
    },
    Deselect {
        key: String,
    },
    UpdateSelection {
        #[serde(default)]
        selected: Vec<String>,
        #[serde(default)]
        deselected: Vec<String>,
    },
    SetChecked {
        checked: bool,
    },
    SetText {
        text: String,
    },
    ChangeColor {
        color: String,
    },
    SetPopupVisible {
        visible: bool,
    },
}

impl RpcCall {
    /// Decode a JSON frame.
    pub fn from_json(frame: &str) -> Result<Self, RpcError> {
        Ok(serde_json::from_str(frame)?)
    }

    /// The wire name of this call.
    pub fn method(&self) -> &'static str {
        match self {
            RpcCall::Click => "click",
            RpcCall::Select { .. } => "select",
            RpcCall::Deselect { .. } => "deselect",
            RpcCall::UpdateSelection { .. } => "update_selection",
            RpcCall::SetChecked { .. } => "set_checked",
            RpcCall::SetText { .. } => "set_text",
            RpcCall::ChangeColor { .. } => "change_color",
            RpcCall::SetPopupVisible { .. } => "set_popup_visible",
        }
    }
}

// ---------------------------------------------------------------------------
// RpcEnvelope
// ---------------------------------------------------------------------------

/// A call addressed to one attached component.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcEnvelope {
    pub target: ComponentId,
    pub call: RpcCall,
}

impl RpcEnvelope {
    pub fn new(target: ComponentId, call: RpcCall) -> Self {
        Self { target, call }
    }
}

// ---------------------------------------------------------------------------
// RpcQueue
// ---------------------------------------------------------------------------

/// FIFO queue of pending calls.
#[derive(Debug, Default)]
pub struct RpcQueue {
    queue: VecDeque<RpcEnvelope>,
}

impl RpcQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue a call for later dispatch.
    pub fn push(&mut self, envelope: RpcEnvelope) {
        self.queue.push_back(envelope);
    }

    /// Take every pending call, oldest first. The queue is empty afterwards.
    pub fn drain(&mut self) -> Vec<RpcEnvelope> {
        self.queue.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
