//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowsmith
//! crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowsmith::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = ResourceCatalog::from_json(&std::fs::read_to_string("catalog.json")?)?;
//! let composer = Composer::builder(catalog).build();
//!
//! let mut session = ComposerSession::new(composer, InMemoryFlowStore::new(), "PASSWORD_RECOVERY");
//! session.open()?;
//! println!("{}", GraphFormatter::format(session.graph()));
//! # Ok(())
//! # }
//! ```

// Composition
pub use crate::composer::ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use crate::composer::{Composer, ComposerBuilder, PlaceholderMap, TemplateLoad, WidgetMerge};
pub use crate::config::ComposerConfig;
pub use crate::migration::migrate_legacy_flow;

// Data model
pub use crate::model::{
    Action, Edge, Element, ElementType, GeneratedFlow, Graph, IntoTemplate, Position, Replacer,
    Resource, ResourceCatalog, Step, StepType, Template, TemplateType, Variant, Widget,
};

// Sessions and persistence
pub use crate::session::{ComposerSession, Notification, NotificationLevel, SessionState};
pub use crate::store::{FlowStore, InMemoryFlowStore, JsonFileFlowStore, PersistedFlow};

// Error types
pub use crate::error::{ComposeError, ConversionError, SessionError, StoreError};

// Rendering
pub use crate::render::GraphFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
