use super::resource::{FlowData, ResourceConfig, Template};
use super::step::Step;
use super::tags::TemplateType;
use crate::error::ConversionError;
use serde::Deserialize;
use serde_json::json;

/// A trait for foreign flow descriptions that can be loaded onto the canvas as a template.
///
/// This is the extension point for feeding flows that did not come from the resource
/// catalog (for example the result of an AI generation request) through the ordinary
/// template-load path.
///
/// # Example
///
/// ```rust,no_run
/// use flowsmith::model::{IntoTemplate, Step, Template};
/// use flowsmith::error::ConversionError;
///
/// struct Imported { screens: Vec<String> }
///
/// impl IntoTemplate for Imported {
///     fn into_template(self) -> Result<Template, ConversionError> {
///         let steps = self
///             .screens
///             .into_iter()
///             .map(|id| Step::view(id, vec![]))
///             .collect();
///         Ok(Template::from_generated_steps(steps))
///     }
/// }
/// ```
pub trait IntoTemplate {
    /// Consumes the object and converts it into a loadable template.
    fn into_template(self) -> Result<Template, ConversionError>;
}

/// The payload returned by a completed AI generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedFlow {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl IntoTemplate for GeneratedFlow {
    fn into_template(self) -> Result<Template, ConversionError> {
        if self.steps.is_empty() {
            return Err(ConversionError::ValidationError(
                "generated flow contains no steps".to_string(),
            ));
        }
        Ok(Template::from_generated_steps(self.steps))
    }
}

impl Template {
    /// Wraps generated steps into a synthetic starter template.
    pub fn from_generated_steps(steps: Vec<Step>) -> Self {
        Template {
            kind: TemplateType::Other("AI".to_string()),
            category: Some("STARTER".to_string()),
            display: Some(json!({
                "label": "Blank",
                "description": "Start a new flow from scratch",
                "showOnResourcePanel": false,
            })),
            version: Some("0.1.0".to_string()),
            config: ResourceConfig {
                data: FlowData {
                    steps,
                    generation_meta: None,
                },
            },
        }
    }
}
