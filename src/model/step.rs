use super::element::{Action, Element};
use super::tags::{MergeStrategy, StepType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canvas coordinates of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A screen or executable action in the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StepType,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub data: StepData,
    /// Display metadata attached from the resource catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    /// Present on widget steps only.
    #[serde(
        rename = "__generationMeta__",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generation_meta: Option<StepGenerationMeta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub display_only: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepGenerationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MergeStrategy>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    pub fn new(id: impl Into<String>, kind: StepType) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            size: None,
            deletable: false,
            data: StepData::default(),
            display: None,
            generation_meta: None,
            extra: Map::new(),
        }
    }

    pub fn view(id: impl Into<String>, components: Vec<Element>) -> Self {
        Self::new(id, StepType::View).with_components(components)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_components(mut self, components: Vec<Element>) -> Self {
        self.data.components = components;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.data.action = Some(action);
        self
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.generation_meta = Some(StepGenerationMeta {
            strategy: Some(strategy),
            extra: Map::new(),
        });
        self
    }

    /// The merge strategy requested by widget generation metadata, if any.
    pub fn merge_strategy(&self) -> Option<&MergeStrategy> {
        self.generation_meta.as_ref()?.strategy.as_ref()
    }

    /// Finds a component (at any depth) by id.
    pub fn find_component(&self, id: &str) -> Option<&Element> {
        self.data
            .components
            .iter()
            .find_map(|component| component.find(id))
    }

    /// Visits every component of the step, parents before children.
    pub fn walk_components_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        for component in &mut self.data.components {
            component.walk_mut(visit);
        }
    }

    pub fn walk_components(&self, visit: &mut impl FnMut(&Element)) {
        for component in &self.data.components {
            component.walk(visit);
        }
    }
}
