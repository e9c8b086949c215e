use super::element::Element;
use super::step::Step;
use super::tags::{ElementType, ReplacerStrategy, StepType, TemplateType, Variant};
use crate::error::ComposeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Steps plus the generation metadata shipped with a template or widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(
        rename = "__generationMeta__",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generation_meta: Option<GenerationMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMeta {
    #[serde(default)]
    pub replacers: Vec<Replacer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_property_selector_id: Option<String>,
}

/// Maps a placeholder token to a freshly generated identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacer {
    pub placeholder: String,
    #[serde(rename = "type", default = "default_replacer_strategy")]
    pub strategy: ReplacerStrategy,
}

fn default_replacer_strategy() -> ReplacerStrategy {
    ReplacerStrategy::Id
}

impl Replacer {
    pub fn id(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            strategy: ReplacerStrategy::Id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub data: FlowData,
}

/// A complete starter flow from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "type")]
    pub kind: TemplateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub config: ResourceConfig,
}

/// A partial flow fragment merged into an existing graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub config: ResourceConfig,
}

impl Template {
    pub fn new(kind: TemplateType, steps: Vec<Step>, replacers: Vec<Replacer>) -> Self {
        Self {
            kind,
            category: None,
            display: None,
            version: None,
            config: ResourceConfig {
                data: FlowData {
                    steps,
                    generation_meta: Some(GenerationMeta {
                        replacers,
                        default_property_selector_id: None,
                    }),
                },
            },
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.config.data.steps
    }

    pub fn replacers(&self) -> &[Replacer] {
        self.config
            .data
            .generation_meta
            .as_ref()
            .map(|meta| meta.replacers.as_slice())
            .unwrap_or_default()
    }
}

impl Widget {
    pub fn new(
        kind: impl Into<String>,
        steps: Vec<Step>,
        replacers: Vec<Replacer>,
        default_property_selector_id: Option<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            display: None,
            version: None,
            config: ResourceConfig {
                data: FlowData {
                    steps,
                    generation_meta: Some(GenerationMeta {
                        replacers,
                        default_property_selector_id,
                    }),
                },
            },
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.config.data.steps
    }

    pub fn replacers(&self) -> &[Replacer] {
        self.config
            .data
            .generation_meta
            .as_ref()
            .map(|meta| meta.replacers.as_slice())
            .unwrap_or_default()
    }

    pub fn default_property_selector_id(&self) -> Option<&str> {
        self.config
            .data
            .generation_meta
            .as_ref()?
            .default_property_selector_id
            .as_deref()
    }
}

/// The resource the property panel should focus after a load.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Step(Step),
    Element(Element),
}

impl Resource {
    pub fn id(&self) -> &str {
        match self {
            Resource::Step(step) => &step.id,
            Resource::Element(element) => &element.id,
        }
    }
}

/// Catalog entry describing a supported step type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResource {
    #[serde(rename = "type")]
    pub kind: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

/// Catalog entry describing a supported element type/variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementResource {
    #[serde(rename = "type")]
    pub kind: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

/// Read-only catalog of supported steps, elements, templates and widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default)]
    pub steps: Vec<StepResource>,
    #[serde(default)]
    pub elements: Vec<ElementResource>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl ResourceCatalog {
    pub fn from_json(json: &str) -> Result<Self, ComposeError> {
        serde_json::from_str(json).map_err(|e| ComposeError::JsonParse(e.to_string()))
    }

    /// Combines the core catalog with a flow-specific one. Entries of `specific` replace
    /// core entries with the same type (and variant).
    pub fn aggregate(core: ResourceCatalog, specific: ResourceCatalog) -> Self {
        let mut merged = core;

        for step in specific.steps {
            merged.steps.retain(|existing| existing.kind != step.kind);
            merged.steps.push(step);
        }
        for element in specific.elements {
            merged
                .elements
                .retain(|e| !(e.kind == element.kind && e.variant == element.variant));
            merged.elements.push(element);
        }
        for template in specific.templates {
            merged.templates.retain(|t| t.kind != template.kind);
            merged.templates.push(template);
        }
        for widget in specific.widgets {
            merged.widgets.retain(|w| w.kind != widget.kind);
            merged.widgets.push(widget);
        }
        merged
    }

    pub fn step_resource(&self, kind: &StepType) -> Option<&StepResource> {
        self.steps.iter().find(|resource| &resource.kind == kind)
    }

    /// Exact type+variant match first, then a variant-less entry of the same type.
    pub fn element_resource(
        &self,
        kind: &ElementType,
        variant: Option<&Variant>,
    ) -> Option<&ElementResource> {
        let same_kind = || self.elements.iter().filter(move |r| &r.kind == kind);
        same_kind()
            .find(|r| r.variant.as_ref() == variant)
            .or_else(|| same_kind().find(|r| r.variant.is_none()))
    }

    pub fn template(&self, kind: &TemplateType) -> Option<&Template> {
        self.templates.iter().find(|template| &template.kind == kind)
    }

    pub fn widget(&self, kind: &str) -> Option<&Widget> {
        self.widgets.iter().find(|widget| widget.kind == kind)
    }

    /// The template a fresh canvas starts from: `BASIC` when available, else the first.
    pub fn default_template(&self) -> Option<&Template> {
        self.template(&TemplateType::Basic)
            .or_else(|| self.templates.first())
    }
}
