use crate::model::{Element, Step};
use uuid::Uuid;

/// Source of fresh resource identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a new identifier beginning with `prefix`.
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random identifiers backed by UUID v4, e.g. `button_3f9a0c2b71de`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self, prefix: &str) -> String {
        let raw = Uuid::new_v4().simple().to_string();
        format!("{}_{}", prefix, &raw[..12])
    }
}

/// Deterministic identifiers (`view_1`, `button_2`, ...). Useful for tests and tools.
#[derive(Debug, Default, Clone)]
pub struct SequentialIdGenerator {
    counter: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}_{}", prefix, self.counter)
    }
}

/// The id prefix used for a resource of the given type tag: `VIEW` -> `view`.
pub fn id_prefix(type_tag: &str) -> String {
    let prefix = type_tag.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        "resource".to_string()
    } else {
        prefix
    }
}

/// Gives every step and element that arrived without an id a fresh one.
pub fn assign_missing_ids(steps: &mut [Step], ids: &mut dyn IdGenerator) {
    for step in steps.iter_mut() {
        if step.id.is_empty() {
            step.id = ids.next_id(&id_prefix(step.kind.as_str()));
        }
        assign_missing_component_ids(&mut step.data.components, ids);
    }
}

pub fn assign_missing_component_ids(components: &mut [Element], ids: &mut dyn IdGenerator) {
    for component in components.iter_mut() {
        component.walk_mut(&mut |element| {
            if element.id.is_empty() {
                element.id = ids.next_id(&id_prefix(element.kind.as_str()));
            }
        });
    }
}
