use super::edges::EdgeSynthesizer;
use super::ids::{IdGenerator, assign_missing_ids};
use super::mutate::mutate_components;
use super::placeholder::{PlaceholderMap, substitute_placeholders};
use crate::config::ComposerConfig;
use crate::error::ComposeError;
use crate::model::{
    Action, Edge, Element, Graph, MergeStrategy, Resource, ResourceCatalog, Step, StepData,
    Widget,
};
use crate::resolver::{resolve_component_metadata, resolve_step_metadata};
use ahash::AHashSet;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// The outcome of merging a widget into a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetMerge {
    pub graph: Graph,
    /// The resource the property panel should select after the merge.
    pub default_selector: Option<Resource>,
    /// The step holding `default_selector` (the selector itself when it is a step).
    pub default_selector_step_id: Option<String>,
    pub placeholders: PlaceholderMap,
}

pub(crate) struct WidgetMerger<'a> {
    catalog: &'a ResourceCatalog,
    config: &'a ComposerConfig,
}

impl<'a> WidgetMerger<'a> {
    pub(crate) fn new(catalog: &'a ResourceCatalog, config: &'a ComposerConfig) -> Self {
        Self { catalog, config }
    }

    pub(crate) fn merge(
        &self,
        widget: &Widget,
        target_id: &str,
        current: &Graph,
        ids: &mut dyn IdGenerator,
    ) -> Result<WidgetMerge, ComposeError> {
        if widget.steps().is_empty() {
            return Err(ComposeError::EmptyWidget {
                widget: widget.kind.clone(),
            });
        }
        if !current.contains_node(target_id) {
            return Err(ComposeError::TargetNotFound {
                target_id: target_id.to_string(),
            });
        }

        let mut nodes = current.nodes.clone();
        for step in widget.steps().iter().cloned() {
            match step.merge_strategy() {
                Some(MergeStrategy::MergeWithDropPoint) => {
                    if let Some(target) = nodes.iter_mut().find(|node| node.id == target_id) {
                        debug!(widget = %widget.kind, target_id, "merging widget step into drop point");
                        let mut data = step.data;
                        // Shape incoming components like the ones already on the node.
                        let components = resolve_component_metadata(
                            self.catalog,
                            std::mem::take(&mut data.components),
                        );
                        data.components = mutate_components(components, self.config);
                        merge_step_data(&mut target.data, data);
                    }
                }
                Some(MergeStrategy::Other(strategy)) => {
                    warn!(widget = %widget.kind, strategy = %strategy, "unknown merge strategy, widget step skipped");
                }
                None => {
                    let mut step = step;
                    step.generation_meta = None;
                    nodes.push(step);
                }
            }
        }

        let nodes: Vec<Step> = nodes
            .into_iter()
            .map(|mut node| {
                node.deletable = !node.kind.is_boundary();
                let components = std::mem::take(&mut node.data.components);
                node.data.components = resolve_component_metadata(self.catalog, components);
                node
            })
            .collect();
        let mut nodes = resolve_step_metadata(self.catalog, nodes);
        assign_missing_ids(&mut nodes, ids);

        let (nodes, placeholders) = substitute_placeholders(nodes, widget.replacers(), ids);

        let edges = self.reconcile_edges(&current.edges, &nodes);

        let (default_selector, default_selector_step_id) = widget
            .default_property_selector_id()
            .map(|id| placeholders.remap(id))
            .and_then(|id| find_resource(&nodes, &id))
            .map(|(resource, step_id)| (Some(resource), Some(step_id)))
            .unwrap_or_default();

        Ok(WidgetMerge {
            graph: Graph::new(nodes, edges),
            default_selector,
            default_selector_step_id,
            placeholders,
        })
    }

    /// Keeps existing correct edges, adds the missing ones (replacing a stale edge under
    /// the same source handle) and prunes edges whose endpoints no longer exist.
    fn reconcile_edges(&self, current: &[Edge], nodes: &[Step]) -> Vec<Edge> {
        let missing = EdgeSynthesizer::new(self.config).missing_edges(current, nodes);
        let node_ids: AHashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

        let mut edges: Vec<Edge> = current
            .iter()
            .filter(|edge| {
                !missing.iter().any(|m| {
                    m.source == edge.source && m.source_handle == edge.source_handle
                })
            })
            .filter(|edge| {
                node_ids.contains(edge.source.as_str()) && node_ids.contains(edge.target.as_str())
            })
            .cloned()
            .collect();
        edges.extend(missing);
        edges
    }
}

/// Deep-merges widget step data into an existing node's data.
///
/// `components` are unioned: an incoming component equal to an existing one is dropped,
/// one sharing an existing id is merged into it, anything else is appended. Other keys
/// merge recursively with widget scalars winning.
pub fn merge_step_data(target: &mut StepData, source: StepData) {
    for component in source.components {
        union_component(&mut target.components, component);
    }

    target.action = match (target.action.take(), source.action) {
        (Some(existing), Some(incoming)) => Some(merge_action(existing, incoming)),
        (existing, incoming) => incoming.or(existing),
    };
    target.display_only |= source.display_only;
    merge_maps(&mut target.extra, source.extra);
}

fn union_component(components: &mut Vec<Element>, incoming: Element) {
    if components.contains(&incoming) {
        return;
    }
    match components
        .iter_mut()
        .find(|existing| !existing.id.is_empty() && existing.id == incoming.id)
    {
        Some(existing) => merge_element(existing, incoming),
        None => components.push(incoming),
    }
}

fn merge_element(existing: &mut Element, incoming: Element) {
    if incoming.variant.is_some() {
        existing.variant = incoming.variant;
    }
    merge_values(&mut existing.config, incoming.config);
    if let Some(display) = incoming.display {
        match existing.display.as_mut() {
            Some(own) => merge_values(own, display),
            None => existing.display = Some(display),
        }
    }
    existing.action = match (existing.action.take(), incoming.action) {
        (Some(own), Some(other)) => Some(merge_action(own, other)),
        (own, other) => other.or(own),
    };
    for child in incoming.components {
        union_component(&mut existing.components, child);
    }
    merge_maps(&mut existing.extra, incoming.extra);
}

fn merge_action(mut existing: Action, incoming: Action) -> Action {
    if incoming.kind.is_some() {
        existing.kind = incoming.kind;
    }
    if incoming.next.is_some() {
        existing.next = incoming.next;
    }
    if incoming.executor.is_some() {
        existing.executor = incoming.executor;
    }
    merge_maps(&mut existing.extra, incoming.extra);
    existing
}

fn merge_maps(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        match target.get_mut(&key) {
            Some(existing) => merge_values(existing, incoming),
            None => {
                target.insert(key, incoming);
            }
        }
    }
}

fn merge_values(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(own), Value::Object(other)) => merge_maps(own, other),
        (Value::Array(own), Value::Array(other)) => {
            for item in other {
                if !own.contains(&item) {
                    own.push(item);
                }
            }
        }
        (_, Value::Null) => {}
        (slot, incoming) => *slot = incoming,
    }
}

/// Finds a step, component or nested component by id.
fn find_resource(nodes: &[Step], id: &str) -> Option<(Resource, String)> {
    nodes.iter().find_map(|node| {
        if node.id == id {
            return Some((Resource::Step(node.clone()), node.id.clone()));
        }
        node.find_component(id)
            .map(|component| (Resource::Element(component.clone()), node.id.clone()))
    })
}
