//! Attaches catalog metadata (display info, default config) to raw steps and elements.

use crate::model::{Element, ResourceCatalog, Step};
use serde_json::Value;
use tracing::warn;

/// Resolves display metadata and default config for every element, recursively.
///
/// Unknown element types are passed through untouched; they are never dropped.
pub fn resolve_component_metadata(
    catalog: &ResourceCatalog,
    components: Vec<Element>,
) -> Vec<Element> {
    components
        .into_iter()
        .map(|component| resolve_element(catalog, component))
        .collect()
}

/// Resolves step-level display metadata. Components are left as they are; run
/// [`resolve_component_metadata`] on them separately.
pub fn resolve_step_metadata(catalog: &ResourceCatalog, steps: Vec<Step>) -> Vec<Step> {
    steps
        .into_iter()
        .map(|mut step| {
            match catalog.step_resource(&step.kind) {
                Some(resource) => {
                    if step.display.is_none() {
                        step.display = resource.display.clone();
                    }
                }
                None if !step.kind.is_boundary() => {
                    warn!(step_id = %step.id, step_type = %step.kind, "step type not found in resource catalog");
                }
                None => {}
            }
            step
        })
        .collect()
}

fn resolve_element(catalog: &ResourceCatalog, mut element: Element) -> Element {
    match catalog.element_resource(&element.kind, element.variant.as_ref()) {
        Some(resource) => {
            if element.display.is_none() {
                element.display = resource.display.clone();
            }
            element.config = with_defaults(element.config, &resource.config);
        }
        None => {
            warn!(
                element_id = %element.id,
                element_type = %element.kind,
                variant = ?element.variant,
                "element type not found in resource catalog"
            );
        }
    }

    element.components = resolve_component_metadata(catalog, element.components);
    element
}

/// Fills keys missing from `config` with the catalog defaults. Existing keys win.
fn with_defaults(config: Value, defaults: &Value) -> Value {
    match (config, defaults) {
        (Value::Null, defaults) => defaults.clone(),
        (Value::Object(mut own), Value::Object(defaults)) => {
            for (key, default) in defaults {
                match own.remove(key) {
                    Some(existing) => {
                        own.insert(key.clone(), with_defaults(existing, default));
                    }
                    None => {
                        own.insert(key.clone(), default.clone());
                    }
                }
            }
            Value::Object(own)
        }
        (own, _) => own,
    }
}

