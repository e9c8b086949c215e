use super::step::Step;
use super::tags::StepType;
use serde::{Deserialize, Serialize};

/// Edge rendering hint used for every generated edge unless configured otherwise.
pub const DEFAULT_EDGE_TYPE: &str = "base-edge";

/// A directed transition between two steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub marker_end: MarkerEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerEnd {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for MarkerEnd {
    fn default() -> Self {
        Self {
            kind: "arrow".to_string(),
        }
    }
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            kind: kind.into(),
            animated: false,
            marker_end: MarkerEnd::default(),
        }
    }
}

/// The renderable (nodes, edges) snapshot. Replaced wholesale on every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Step>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Step>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Step> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn start_node(&self) -> Option<&Step> {
        self.nodes.iter().find(|node| node.kind == StepType::Start)
    }

    pub fn end_node(&self) -> Option<&Step> {
        self.nodes.iter().find(|node| node.kind == StepType::End)
    }

    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == source)
    }

    /// True when `to` can be reached from `from` by following edges.
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        let mut seen = ahash::AHashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            stack.extend(self.edges_from(current).map(|edge| edge.target.as_str()));
        }
        false
    }
}
