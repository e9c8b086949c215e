use super::tags::{ActionType, ElementType, Variant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `config.type` value marking a button as the form's submit button.
pub const SUBMIT_BUTTON_TYPE: &str = "submit";

/// A UI element inside a step: button, form, input, typography, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
    /// Children of container elements (forms).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Display metadata attached from the resource catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A transition descriptor attached to a button or a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named backend action, e.g. `PasswordOnboardExecutor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executor {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Action {
    /// An action pointing straight at another step.
    pub fn next(target: impl Into<String>) -> Self {
        Self {
            kind: Some(ActionType::Next),
            next: Some(target.into()),
            ..Self::default()
        }
    }

    /// An action running the given executor.
    pub fn executor(name: impl Into<String>) -> Self {
        Self {
            kind: Some(ActionType::Executor),
            executor: Some(Executor::named(name)),
            ..Self::default()
        }
    }

    /// The declared target; an empty `next` counts as no target.
    pub fn next_target(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }

    pub fn executor_name(&self) -> Option<&str> {
        self.executor.as_ref().map(|e| e.name.as_str())
    }
}

impl Executor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementType) -> Self {
        Self {
            id: id.into(),
            kind,
            variant: None,
            config: Value::Null,
            components: Vec::new(),
            action: None,
            display: None,
            extra: Map::new(),
        }
    }

    pub fn button(id: impl Into<String>) -> Self {
        Self::new(id, ElementType::Button)
    }

    pub fn form(id: impl Into<String>, components: Vec<Element>) -> Self {
        Self::new(id, ElementType::Form).with_components(components)
    }

    pub fn input(id: impl Into<String>, variant: Variant) -> Self {
        Self::new(id, ElementType::Input).with_variant(variant)
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_components(mut self, components: Vec<Element>) -> Self {
        self.components = components;
        self
    }

    pub fn is_button(&self) -> bool {
        self.kind == ElementType::Button
    }

    pub fn is_form(&self) -> bool {
        self.kind == ElementType::Form
    }

    pub fn has_variant(&self, variant: &Variant) -> bool {
        self.variant.as_ref() == Some(variant)
    }

    /// True for buttons whose `config.type` is `submit`.
    pub fn is_submit_button(&self) -> bool {
        self.is_button()
            && self.config.get("type").and_then(Value::as_str) == Some(SUBMIT_BUTTON_TYPE)
    }

    /// Sets a key on the free-form config, turning a null config into an object first.
    pub fn set_config_value(&mut self, key: &str, value: Value) {
        if !self.config.is_object() {
            self.config = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.config {
            map.insert(key.to_string(), value);
        }
    }

    /// Depth-first search for an element with the given id, including `self`.
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.components.iter().find_map(|child| child.find(id))
    }

    /// Buttons nested anywhere below this element, in document order.
    pub fn nested_buttons(&self) -> Vec<&Element> {
        let mut buttons = Vec::new();
        collect_buttons(&self.components, &mut buttons);
        buttons
    }

    /// Visits this element and every descendant, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in &mut self.components {
            child.walk_mut(visit);
        }
    }

    pub fn walk(&self, visit: &mut impl FnMut(&Element)) {
        visit(self);
        for child in &self.components {
            child.walk(visit);
        }
    }
}

fn collect_buttons<'a>(components: &'a [Element], out: &mut Vec<&'a Element>) {
    for component in components {
        if component.is_button() {
            out.push(component);
        } else if !component.components.is_empty() {
            collect_buttons(&component.components, out);
        }
    }
}
