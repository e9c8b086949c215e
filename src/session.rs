//! The editing session: one graph snapshot, a store, and the state machine guarding
//! mutations of that snapshot.
//!
//! `Idle -> Loading -> Ready -> Mutating -> Ready`. Only one mutation may be in
//! flight; a second request while `Mutating` is rejected with [`SessionError::Busy`]
//! and dropped rather than queued.

use crate::composer::{Composer, TemplateLoad};
use crate::config::ComposerConfig;
use crate::error::SessionError;
use crate::migration::migrate_legacy_flow;
use crate::model::{Action, Graph, Resource, Step, StepType, Template, Widget};
use crate::store::{FlowStore, PersistedFlow};
use serde::Serialize;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    Mutating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message raised by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub description: Option<String>,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            description: None,
        }
    }

    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Proof that the holder started the mutation currently in progress.
///
/// Consumed by [`ComposerSession::commit`] or [`ComposerSession::abort`].
#[derive(Debug, PartialEq, Eq)]
pub struct MutationTicket {
    id: u64,
}

impl MutationTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

pub struct ComposerSession<S: FlowStore> {
    composer: Composer,
    store: S,
    flow_type: String,
    graph: Graph,
    state: SessionState,
    issued_tickets: u64,
    active_ticket: Option<u64>,
    default_selector: Option<Resource>,
    notifications: Vec<Notification>,
}

impl<S: FlowStore> ComposerSession<S> {
    pub fn new(composer: Composer, store: S, flow_type: impl Into<String>) -> Self {
        Self {
            composer,
            store,
            flow_type: flow_type.into(),
            graph: Graph::default(),
            state: SessionState::Idle,
            issued_tickets: 0,
            active_ticket: None,
            default_selector: None,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn flow_type(&self) -> &str {
        &self.flow_type
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// The resource the property panel should focus after the last mutation.
    pub fn default_selector(&self) -> Option<&Resource> {
        self.default_selector.as_ref()
    }

    /// Drains the pending notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Loads the persisted flow, or the catalog default when there is none.
    ///
    /// A failing store is reported as a notification; the session still becomes ready
    /// with the default graph.
    pub fn open(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Mutating {
            return Err(SessionError::Busy);
        }
        self.state = SessionState::Loading;

        let graph = match self.store.fetch(&self.flow_type) {
            Ok(Some(flow)) if !flow.steps.is_empty() => {
                let steps = migrate_legacy_flow(flow.steps, self.composer.config());
                let nodes = self.composer.generate_steps(steps);
                self.composer.recompute(nodes)
            }
            Ok(_) => {
                debug!(flow_type = %self.flow_type, "no persisted flow, using default template");
                self.composer.default_graph()
            }
            Err(e) => {
                error!(flow_type = %self.flow_type, error = %e, "failed to fetch flow");
                self.notify(
                    Notification::new(NotificationLevel::Error, "Failed to load the flow")
                        .with_description(e.to_string()),
                );
                self.composer.default_graph()
            }
        };

        info!(
            flow_type = %self.flow_type,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "session opened"
        );
        self.graph = graph;
        self.default_selector = None;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Latches the session into `Mutating`.
    pub fn begin_mutation(&mut self) -> Result<MutationTicket, SessionError> {
        match self.state {
            SessionState::Ready => {
                self.issued_tickets += 1;
                self.active_ticket = Some(self.issued_tickets);
                self.state = SessionState::Mutating;
                Ok(MutationTicket {
                    id: self.issued_tickets,
                })
            }
            SessionState::Mutating => {
                warn!("mutation requested while another is in progress, dropped");
                Err(SessionError::Busy)
            }
            state => Err(SessionError::NotReady(state)),
        }
    }

    /// Replaces the snapshot with `graph` and releases the latch.
    pub fn commit(&mut self, ticket: MutationTicket, graph: Graph) -> Result<(), SessionError> {
        self.release(ticket)?;
        self.graph = graph;
        Ok(())
    }

    /// Releases the latch keeping the previous snapshot.
    pub fn abort(&mut self, ticket: MutationTicket) -> Result<(), SessionError> {
        self.release(ticket)
    }

    fn release(&mut self, ticket: MutationTicket) -> Result<(), SessionError> {
        if self.state != SessionState::Mutating || self.active_ticket != Some(ticket.id) {
            return Err(SessionError::StaleTicket(ticket.id));
        }
        self.active_ticket = None;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Replaces the canvas with a composed template.
    pub fn apply_template(&mut self, template: &Template) -> Result<(), SessionError> {
        let ticket = self.begin_mutation()?;
        match self.composer.load_template(template) {
            TemplateLoad::Composed {
                graph,
                default_selector,
            } => {
                self.default_selector = default_selector;
                self.commit(ticket, graph)
            }
            TemplateLoad::RequiresGeneration => {
                self.notify(Notification::new(
                    NotificationLevel::Info,
                    format!("Template '{}' must be generated first", template.kind),
                ));
                self.abort(ticket)
            }
        }
    }

    /// Merges `widget` into the node `target_id`.
    pub fn apply_widget(&mut self, widget: &Widget, target_id: &str) -> Result<(), SessionError> {
        let ticket = self.begin_mutation()?;
        match self.composer.load_widget(widget, target_id, &self.graph) {
            Ok(merged) => {
                self.default_selector = merged.default_selector;
                self.commit(ticket, merged.graph)
            }
            Err(e) => {
                self.abort(ticket)?;
                self.notify(
                    Notification::new(NotificationLevel::Error, "Failed to add the widget")
                        .with_description(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    /// Adds a step to the canvas, ahead of the End node.
    pub fn add_step(&mut self, step: Step) -> Result<(), SessionError> {
        let ticket = self.begin_mutation()?;
        let mut step = self.composer.load_step(step);
        step.deletable = true;

        let mut nodes = self.graph.nodes.clone();
        let slot = nodes
            .iter()
            .position(|node| node.kind == StepType::End)
            .unwrap_or(nodes.len());
        let step_id = step.id.clone();
        nodes.insert(slot, step);

        let graph = self.composer.recompute(nodes);
        self.default_selector = graph.node(&step_id).cloned().map(Resource::Step);
        self.commit(ticket, graph)
    }

    /// Writes the current graph back to the store.
    pub fn publish(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady(self.state));
        }

        let flow = PersistedFlow {
            flow_type: self.flow_type.clone(),
            steps: to_persisted_steps(&self.graph, self.composer.config()),
        };
        match self.store.publish(&flow) {
            Ok(()) => {
                info!(flow_type = %self.flow_type, steps = flow.steps.len(), "flow published");
                self.notify(Notification::new(
                    NotificationLevel::Success,
                    "Flow updated successfully",
                ));
                Ok(())
            }
            Err(e) => {
                error!(flow_type = %self.flow_type, error = %e, "failed to publish flow");
                self.notify(
                    Notification::new(NotificationLevel::Error, "Failed to update the flow")
                        .with_description(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Folds the edges of `graph` back into step and component actions and drops the
/// synthetic Start and End nodes.
///
/// An edge leaving handle `<actor>_NEXT` sets `next` on the step or component whose
/// id is `<actor>`. Edges whose handle names no actor are ignored.
pub fn to_persisted_steps(graph: &Graph, config: &ComposerConfig) -> Vec<Step> {
    let mut steps: Vec<Step> = graph
        .nodes
        .iter()
        .filter(|node| !node.kind.is_boundary())
        .cloned()
        .collect();

    for step in steps.iter_mut() {
        let step_id = step.id.clone();
        for edge in graph.edges_from(&step_id) {
            let Some(actor) = config.actor_for_handle(&edge.source_handle) else {
                debug!(edge = %edge.id, handle = %edge.source_handle, "edge handle names no actor");
                continue;
            };
            if actor == step_id {
                point_at(&mut step.data.action, &edge.target);
                continue;
            }
            step.walk_components_mut(&mut |element| {
                if element.id == actor {
                    point_at(&mut element.action, &edge.target);
                }
            });
        }
    }
    steps
}

fn point_at(action: &mut Option<Action>, target: &str) {
    match action {
        Some(action) => action.next = Some(target.to_string()),
        None => *action = Some(Action::next(target)),
    }
}
