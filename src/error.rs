use crate::session::SessionState;
use thiserror::Error;

/// Errors that can occur while composing or merging a flow graph.
///
/// Content problems (unknown types, dangling `next` references) are not errors: they
/// are logged and the affected entry is passed through or skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParse(String),

    #[error("Drop target '{target_id}' was not found in the current graph")]
    TargetNotFound { target_id: String },

    #[error("Widget '{widget}' does not contain any steps")]
    EmptyWidget { widget: String },
}

/// Errors raised by a `FlowStore` while fetching or publishing a flow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("I/O failure on '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Malformed flow document: {0}")]
    Json(String),

    #[error("Flow store rejected '{flow_type}' with status {status}")]
    Rejected { flow_type: String, status: u16 },
}

/// Errors surfaced by a composer session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("A graph mutation is already in progress; request dropped")]
    Busy,

    #[error("Session is not ready (current state: {0:?})")]
    NotReady(SessionState),

    #[error("Mutation ticket {0} does not match the mutation in progress")]
    StaleTicket(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// Errors that can occur when converting a foreign flow format into a `Template`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
