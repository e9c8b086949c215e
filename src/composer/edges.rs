use crate::config::ComposerConfig;
use crate::model::{Action, Edge, Element, Step, StepType};
use ahash::AHashSet;
use tracing::warn;

/// Derives the edge set of a graph from the actions declared on its steps.
///
/// Edges are a pure function of the node list: the same nodes always yield the same
/// edges, in the same order (step order, then component order, then button order).
pub(crate) struct EdgeSynthesizer<'a> {
    config: &'a ComposerConfig,
}

/// Bookkeeping for one synthesis pass.
struct Pass<'s> {
    step_ids: AHashSet<&'s str>,
    end_id: Option<&'s str>,
    edges: Vec<Edge>,
}

impl<'a> EdgeSynthesizer<'a> {
    pub(crate) fn new(config: &'a ComposerConfig) -> Self {
        Self { config }
    }

    pub(crate) fn synthesize(&self, steps: &[Step]) -> Vec<Edge> {
        let mut pass = Pass {
            step_ids: steps.iter().map(|step| step.id.as_str()).collect(),
            end_id: end_id(steps),
            edges: Vec::new(),
        };

        self.connect_start(steps, &mut pass);

        for step in steps.iter().filter(|step| step.kind != StepType::End) {
            for component in &step.data.components {
                if component.is_form() {
                    for button in component.nested_buttons() {
                        self.connect_button(step, button, &mut pass);
                    }
                } else if component.is_button() {
                    self.connect_button(step, component, &mut pass);
                }
            }

            if let Some(action) = &step.data.action {
                let actor = step.id.as_str();
                self.connect_action(step, actor, action, &mut pass, |target| {
                    format!("{}-to-{}", actor, target)
                });
            }
        }

        if let Some(edge) = self.fallback_to_end(steps, &pass) {
            pass.edges.push(edge);
        }

        pass.edges
    }

    /// Edges implied by actions but absent from `current`.
    ///
    /// An edge is missing when nothing leaves `(step, <actor handle>)`, or when the edge
    /// under that handle points somewhere other than the action's declared target.
    pub(crate) fn missing_edges(&self, current: &[Edge], steps: &[Step]) -> Vec<Edge> {
        let step_ids: AHashSet<&str> = steps.iter().map(|step| step.id.as_str()).collect();
        let end = end_id(steps);
        let mut missing = Vec::new();

        let mut check = |step_id: &str, actor: &str, action: Option<&Action>| {
            let Some(next) = action.and_then(Action::next_target) else {
                return;
            };
            let Some(target) = self.resolve_target(next, &step_ids, end) else {
                warn!(step_id, actor, next, "expected target node not found in current graph");
                return;
            };
            let handle = self.config.handle_for(actor);
            let existing = current
                .iter()
                .find(|edge| edge.source == step_id && edge.source_handle == handle);
            if existing.is_none_or(|edge| edge.target != target) {
                missing.push(Edge::new(
                    format!("{}_MISSING_EDGE", actor),
                    step_id,
                    handle,
                    target,
                    self.config.edge_type.clone(),
                ));
            }
        };

        for step in steps {
            for component in &step.data.components {
                component.walk(&mut |element: &Element| {
                    check(&step.id, &element.id, element.action.as_ref());
                });
            }
            check(&step.id, &step.id, step.data.action.as_ref());
        }

        missing
    }

    fn connect_start(&self, steps: &[Step], pass: &mut Pass<'_>) {
        let Some(start) = steps.iter().find(|step| step.kind == StepType::Start) else {
            return;
        };
        let Some(first) = steps.iter().find(|step| step.kind != StepType::Start) else {
            return;
        };
        pass.edges.push(Edge::new(
            format!("{}-{}", start.id, first.id),
            start.id.clone(),
            self.config.handle_for(&start.id),
            first.id.clone(),
            self.config.edge_type.clone(),
        ));
    }

    fn connect_button(&self, step: &Step, button: &Element, pass: &mut Pass<'_>) {
        if let Some(action) = &button.action {
            let id = button.id.as_str();
            self.connect_action(step, id, action, pass, |_| id.to_string());
        }
    }

    /// Emits the edge for a single action, if it has a resolvable target.
    ///
    /// Explicit `next` wins; without one, a terminal executor implies the End node.
    fn connect_action(
        &self,
        step: &Step,
        actor: &str,
        action: &Action,
        pass: &mut Pass<'_>,
        edge_id: impl Fn(&str) -> String,
    ) {
        let target = match action.next_target() {
            Some(next) => match self.resolve_target(next, &pass.step_ids, pass.end_id) {
                Some(target) => target,
                None => {
                    warn!(step_id = %step.id, actor, next, "action references an unknown step, skipping edge");
                    return;
                }
            },
            None => match action.executor_name() {
                Some(name) if self.config.is_terminal_executor(name) => match pass.end_id {
                    Some(end) => end.to_string(),
                    None => {
                        warn!(step_id = %step.id, actor, "terminal executor but no End node in graph");
                        return;
                    }
                },
                _ => return,
            },
        };

        pass.edges.push(Edge::new(
            edge_id(&target),
            step.id.clone(),
            self.config.handle_for(actor),
            target,
            self.config.edge_type.clone(),
        ));
    }

    /// An edge to End for flows where no path from Start gets there.
    ///
    /// Candidates are the steps reachable from Start, views first, latest first. The
    /// edge leaves the first form button of the candidate that has no outgoing edge yet,
    /// else its first such top-level button, else the step's own handle. Actors that
    /// already own an edge are never reused.
    fn fallback_to_end(&self, steps: &[Step], pass: &Pass<'_>) -> Option<Edge> {
        let end = pass.end_id?;
        let reachable = match steps.iter().find(|step| step.kind == StepType::Start) {
            Some(start) => reachable_from(&start.id, &pass.edges),
            None if pass.edges.iter().any(|edge| edge.target == end) => return None,
            None => steps.iter().map(|step| step.id.as_str()).collect(),
        };
        if reachable.contains(end) {
            return None;
        }

        let (views, others): (Vec<&Step>, Vec<&Step>) = steps
            .iter()
            .rev()
            .filter(|step| !step.kind.is_boundary() && reachable.contains(step.id.as_str()))
            .partition(|step| step.kind == StepType::View);

        let found = views.into_iter().chain(others).find_map(|step| {
            self.free_actor(step, &pass.edges, end)
                .map(|(edge_id, actor)| (step, edge_id, actor))
        });
        let Some((step, edge_id, actor)) = found else {
            warn!(end, "no free handle on any reachable step, End stays unreachable");
            return None;
        };

        Some(Edge::new(
            edge_id,
            step.id.clone(),
            self.config.handle_for(actor),
            end,
            self.config.edge_type.clone(),
        ))
    }

    /// The first actor of `step` without an outgoing edge, with the id its edge would get.
    fn free_actor<'s>(
        &self,
        step: &'s Step,
        edges: &[Edge],
        end: &str,
    ) -> Option<(String, &'s str)> {
        let taken = |actor: &str| {
            let handle = self.config.handle_for(actor);
            edges
                .iter()
                .any(|edge| edge.source == step.id && edge.source_handle == handle)
        };

        let components = &step.data.components;
        let button = components
            .iter()
            .filter(|component| component.is_form())
            .flat_map(|form| form.nested_buttons())
            .chain(components.iter().filter(|component| component.is_button()))
            .find(|button| !taken(&button.id));

        match button {
            Some(button) => Some((button.id.clone(), button.id.as_str())),
            None if !taken(&step.id) => {
                Some((format!("{}-to-{}", step.id, end), step.id.as_str()))
            }
            None => None,
        }
    }

    /// Maps a declared `next` onto an existing node id. The legacy terminal marker maps
    /// onto the End node.
    fn resolve_target(
        &self,
        next: &str,
        step_ids: &AHashSet<&str>,
        end_id: Option<&str>,
    ) -> Option<String> {
        if step_ids.contains(next) {
            return Some(next.to_string());
        }
        if self.config.is_terminal_marker(next) {
            return end_id.map(str::to_string);
        }
        None
    }
}

fn end_id(steps: &[Step]) -> Option<&str> {
    steps
        .iter()
        .find(|step| step.kind == StepType::End)
        .map(|step| step.id.as_str())
}

/// Every node id reachable from `start`, `start` included.
fn reachable_from<'e>(start: &'e str, edges: &'e [Edge]) -> AHashSet<&'e str> {
    let mut seen = AHashSet::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        stack.extend(
            edges
                .iter()
                .filter(|edge| edge.source == current)
                .map(|edge| edge.target.as_str()),
        );
    }
    seen
}
