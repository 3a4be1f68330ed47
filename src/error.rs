//! Error types shared across the crate.
//!
//! Every fallible operation returns one of these enums. Stale client input
//! (unknown item keys, disabled items) is never an error: it is logged and
//! dropped by the component that received it.

use crate::session::ComponentId;

/// Invalid arguments passed to a component constructor or setter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComponentError {
    #[error("illegal value for {property}: {message}")]
    IllegalArgument { property: String, message: String },
}

impl ComponentError {
    pub(crate) fn illegal(property: &str, message: impl Into<String>) -> Self {
        Self::IllegalArgument {
            property: property.to_owned(),
            message: message.into(),
        }
    }
}

/// Errors from parsing attribute values (sizes, colors, resources).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueParseError {
    #[error("empty value")]
    Empty,
    #[error("invalid {kind} value '{value}': {message}")]
    Invalid {
        kind: &'static str,
        value: String,
        message: String,
    },
}

impl ValueParseError {
    pub(crate) fn invalid(kind: &'static str, value: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            value: value.to_owned(),
            message: message.into(),
        }
    }
}

/// Errors raised while reading or writing declarative markup.
///
/// These are authoring errors, not runtime conditions: callers are not
/// expected to recover from them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    #[error("unexpected child element <{found}>, expected <{expected}>")]
    UnexpectedChildTag { expected: String, found: String },
    #[error("failed to read attribute {attribute}='{value}': {message}")]
    InvalidAttribute {
        attribute: String,
        value: String,
        message: String,
    },
    #[error("the tag name '{0}' is invalid: missing prefix")]
    MissingPrefix(String),
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error("the following global id is not unique: {0}")]
    DuplicateId(String),
    #[error("the following local id is not unique: {0}")]
    DuplicateLocalId(String),
    #[error("cannot read item '{value}': item type {type_name} has no declarative form")]
    UnsupportedItemType { type_name: String, value: String },
    #[error("{0} cannot be written declaratively")]
    UnsupportedPresentation(String),
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Errors from dispatching client RPC calls.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("no component attached with id {0:?}")]
    UnknownComponent(ComponentId),
    #[error("{component} does not accept the '{method}' call")]
    Unsupported { component: String, method: String },
    #[error("malformed rpc frame: {0}")]
    Malformed(#[from] serde_json::Error),
}
