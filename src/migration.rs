//! Upgrades persisted flows written before End became a real node.
//!
//! Older flows marked the end of the journey with a literal terminal marker in
//! `action.next` instead of pointing at an End-typed step.

use crate::config::ComposerConfig;
use crate::model::{Action, Step, StepType};
use tracing::info;

/// Rewrites legacy terminal references into a proper End node.
///
/// A flow that already contains an End-typed step, or that never references the
/// terminal marker, is returned unchanged. Running the migration twice is a no-op.
pub fn migrate_legacy_flow(mut steps: Vec<Step>, config: &ComposerConfig) -> Vec<Step> {
    if steps.iter().any(|step| step.kind == StepType::End) {
        return steps;
    }

    let end_id = config.end_step_id.clone();
    let mut rewritten = 0usize;
    let mut rewrite = |action: &mut Action| {
        if let Some(next) = action.next.as_mut()
            && config.is_terminal_marker(next)
        {
            *next = end_id.clone();
            rewritten += 1;
        }
    };

    for step in &mut steps {
        if let Some(action) = step.data.action.as_mut() {
            rewrite(action);
        }
        step.walk_components_mut(&mut |element| {
            if let Some(action) = element.action.as_mut() {
                rewrite(action);
            }
        });
    }

    if rewritten == 0 {
        return steps;
    }

    let anchor = steps
        .iter()
        .rev()
        .find(|step| !step.kind.is_boundary())
        .map(|step| step.position)
        .unwrap_or_default();
    let mut end = Step::new(end_id, StepType::End);
    end.position = config.end_position_after(anchor);
    end.data.display_only = true;
    steps.push(end);

    info!(rewritten, "migrated legacy terminal references to an End node");
    steps
}
