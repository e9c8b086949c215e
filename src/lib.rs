//! # Flowsmith - Recovery Flow Composition Engine
//!
//! **Flowsmith** turns declarative flow templates, widgets and individual steps into a
//! consistent node/edge graph for a visual flow editor. Starting from a resource
//! catalog, it fills in metadata, replaces placeholder ids with fresh unique ones,
//! wraps the flow in synthetic Start and End nodes, and derives every edge from the
//! `action.next` declarations carried by steps and buttons.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Catalog**: Parse the resource catalog (steps, elements, templates,
//!     widgets) with `ResourceCatalog::from_json`.
//! 2.  **Build a Composer**: Use `Composer::builder` to configure ids, handle naming and
//!     terminal executors.
//! 3.  **Compose**: Load a template onto an empty canvas, merge widgets onto a drop
//!     point, or recompute edges after the steps changed.
//! 4.  **Persist**: Drive everything through a `ComposerSession`, which migrates legacy
//!     flows on open and writes edges back into actions on publish.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowsmith::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let catalog_json = std::fs::read_to_string("catalog.json")?;
//!     let catalog = ResourceCatalog::from_json(&catalog_json)?;
//!     let mut composer = Composer::builder(catalog).build();
//!
//!     let template = composer
//!         .catalog()
//!         .template(&TemplateType::Basic)
//!         .cloned()
//!         .ok_or("catalog has no BASIC template")?;
//!
//!     if let TemplateLoad::Composed { graph, .. } = composer.load_template(&template) {
//!         println!("{}", GraphFormatter::format(&graph));
//!
//!         let widget = composer.catalog().widget("EMAIL_OTP").cloned();
//!         if let (Some(widget), Some(target)) = (widget, graph.nodes.get(1)) {
//!             let merged = composer.load_widget(&widget, &target.id, &graph)?;
//!             println!("{}", GraphFormatter::format(&merged.graph));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod migration;
pub mod model;
pub mod prelude;
pub mod render;
pub mod resolver;
pub mod session;
pub mod store;
