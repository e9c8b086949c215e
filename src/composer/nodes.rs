use super::ids::{IdGenerator, assign_missing_ids};
use crate::config::ComposerConfig;
use crate::model::{ResourceCatalog, Step, StepType};
use crate::resolver::{resolve_component_metadata, resolve_step_metadata};
use tracing::warn;

/// Wraps raw steps into canvas nodes bounded by a Start and an End node.
pub(crate) struct NodeGenerator<'a> {
    catalog: &'a ResourceCatalog,
    config: &'a ComposerConfig,
}

impl<'a> NodeGenerator<'a> {
    pub(crate) fn new(catalog: &'a ResourceCatalog, config: &'a ComposerConfig) -> Self {
        Self { catalog, config }
    }

    /// Produces `[Start, ...steps, End]`.
    ///
    /// Steps already typed START/END are reused as the boundaries instead of being
    /// duplicated, so a graph never holds more than one of each.
    pub(crate) fn generate(&self, steps: Vec<Step>, ids: &mut dyn IdGenerator) -> Vec<Step> {
        let mut start: Option<Step> = None;
        let mut end: Option<Step> = None;
        let mut intermediate = Vec::with_capacity(steps.len());

        for step in steps {
            if !step.kind.is_boundary() {
                intermediate.push(self.prepare_step(step));
                continue;
            }
            let slot = if step.kind == StepType::Start {
                &mut start
            } else {
                &mut end
            };
            if slot.is_some() {
                warn!(step_id = %step.id, step_type = %step.kind, "duplicate boundary step dropped");
                continue;
            }
            *slot = Some(step);
        }

        assign_missing_ids(&mut intermediate, ids);

        let start = start
            .map(|step| self.boundary(step, &self.config.start_step_id))
            .unwrap_or_else(|| self.synthetic_start());
        let end = end
            .map(|step| self.boundary(step, &self.config.end_step_id))
            .unwrap_or_else(|| {
                let anchor = intermediate
                    .last()
                    .map(|step| step.position)
                    .unwrap_or(start.position);
                let mut end = Step::new(self.config.end_step_id.clone(), StepType::End);
                end.position = self.config.end_position_after(anchor);
                end.data.display_only = true;
                end
            });

        let mut nodes = Vec::with_capacity(intermediate.len() + 2);
        nodes.push(start);
        nodes.extend(intermediate);
        nodes.push(end);

        resolve_step_metadata(self.catalog, nodes)
    }

    fn prepare_step(&self, mut step: Step) -> Step {
        step.deletable = true;
        let components = std::mem::take(&mut step.data.components);
        step.data.components = resolve_component_metadata(self.catalog, components);
        step
    }

    fn synthetic_start(&self) -> Step {
        let mut start = Step::new(self.config.start_step_id.clone(), StepType::Start);
        start.position = self.config.start_position;
        start.data.display_only = true;
        start
    }

    fn boundary(&self, mut step: Step, fallback_id: &str) -> Step {
        if step.id.is_empty() {
            step.id = fallback_id.to_string();
        }
        step.deletable = false;
        step.data.display_only = true;
        step
    }
}
