use crate::config::ComposerConfig;
use crate::error::ComposeError;
use crate::model::{
    Edge, Element, Graph, Resource, ResourceCatalog, Step, StepType, Template, TemplateType, Widget,
};
use crate::resolver::{resolve_component_metadata, resolve_step_metadata};
use tracing::{debug, info};

mod edges;
pub mod ids;
mod merge;
pub mod mutate;
mod nodes;
pub mod placeholder;

use edges::EdgeSynthesizer;
use ids::{IdGenerator, RandomIdGenerator, assign_missing_component_ids, assign_missing_ids};
use nodes::NodeGenerator;
use placeholder::substitute_placeholders;

pub use merge::{WidgetMerge, merge_step_data};
pub use mutate::mutate_components;
pub use placeholder::PlaceholderMap;

/// The result of loading a template onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateLoad {
    /// A composed graph, with the resource the property panel should focus (if any).
    Composed {
        graph: Graph,
        default_selector: Option<Resource>,
    },
    /// The template asks for AI generation; nothing is composed until the generated flow
    /// comes back through [`Template::from_generated_steps`].
    RequiresGeneration,
}

impl TemplateLoad {
    pub fn graph(&self) -> Option<&Graph> {
        match self {
            TemplateLoad::Composed { graph, .. } => Some(graph),
            TemplateLoad::RequiresGeneration => None,
        }
    }
}

/// Turns templates, widgets and raw steps into consistent (nodes, edges) graphs.
///
/// The catalog and config are read-only for the composer's whole life; the only
/// mutable state is the id generator.
pub struct Composer {
    catalog: ResourceCatalog,
    config: ComposerConfig,
    ids: Box<dyn IdGenerator>,
}

pub struct ComposerBuilder {
    catalog: ResourceCatalog,
    config: ComposerConfig,
    ids: Box<dyn IdGenerator>,
}

impl ComposerBuilder {
    pub fn new(catalog: ResourceCatalog) -> Self {
        Self {
            catalog,
            config: ComposerConfig::default(),
            ids: Box::new(RandomIdGenerator),
        }
    }

    pub fn with_config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Registers another executor whose presence implies a transition to End.
    pub fn with_terminal_executor(mut self, name: &str) -> Self {
        if !self.config.is_terminal_executor(name) {
            self.config.terminal_executors.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> Composer {
        Composer {
            catalog: self.catalog,
            config: self.config,
            ids: self.ids,
        }
    }
}

impl Composer {
    pub fn builder(catalog: ResourceCatalog) -> ComposerBuilder {
        ComposerBuilder::new(catalog)
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Wraps raw steps into nodes bounded by Start and End. Does not create edges.
    pub fn generate_steps(&mut self, steps: Vec<Step>) -> Vec<Step> {
        NodeGenerator::new(&self.catalog, &self.config).generate(steps, self.ids.as_mut())
    }

    /// Derives the full edge set for `nodes`. Deterministic and idempotent.
    pub fn synthesize_edges(&self, nodes: &[Step]) -> Vec<Edge> {
        EdgeSynthesizer::new(&self.config).synthesize(nodes)
    }

    /// Edges implied by actions in `nodes` that `edges` does not yet contain.
    pub fn missing_edges(&self, edges: &[Edge], nodes: &[Step]) -> Vec<Edge> {
        EdgeSynthesizer::new(&self.config).missing_edges(edges, nodes)
    }

    /// Normalizes the components of one step. See [`mutate_components`].
    pub fn mutate_components(&self, components: Vec<Element>) -> Vec<Element> {
        mutate_components(components, &self.config)
    }

    /// The single `nodes -> graph` entry point: normalizes every step's components and
    /// regenerates the edge set from scratch.
    pub fn recompute(&self, nodes: Vec<Step>) -> Graph {
        let nodes: Vec<Step> = nodes
            .into_iter()
            .map(|mut node| {
                let components = std::mem::take(&mut node.data.components);
                node.data.components = mutate_components(components, &self.config);
                node
            })
            .collect();
        let edges = self.synthesize_edges(&nodes);
        Graph::new(nodes, edges)
    }

    /// Loads a catalog (or generated) template onto an empty canvas.
    pub fn load_template(&mut self, template: &Template) -> TemplateLoad {
        if template.kind == TemplateType::GenerateWithAi {
            return TemplateLoad::RequiresGeneration;
        }
        if template.steps().is_empty() {
            debug!(template = %template.kind, "template has no steps");
            return TemplateLoad::Composed {
                graph: Graph::default(),
                default_selector: None,
            };
        }

        let nodes = self.generate_steps(template.steps().to_vec());
        let (nodes, _) = substitute_placeholders(nodes, template.replacers(), self.ids.as_mut());
        let graph = self.recompute(nodes);
        info!(
            template = %template.kind,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "template composed"
        );

        let default_selector = if template.kind == TemplateType::BasicFederated {
            graph
                .nodes
                .iter()
                .find(|node| node.kind == StepType::Execution)
                .map(|node| Resource::Step(node.clone()))
        } else {
            None
        };

        TemplateLoad::Composed {
            graph,
            default_selector,
        }
    }

    /// Merges a widget into `current`, anchored at the node `target_id`.
    pub fn load_widget(
        &mut self,
        widget: &Widget,
        target_id: &str,
        current: &Graph,
    ) -> Result<WidgetMerge, ComposeError> {
        let merged = merge::WidgetMerger::new(&self.catalog, &self.config).merge(
            widget,
            target_id,
            current,
            self.ids.as_mut(),
        )?;
        info!(
            widget = %widget.kind,
            target_id,
            nodes = merged.graph.nodes.len(),
            edges = merged.graph.edges.len(),
            "widget merged"
        );
        Ok(merged)
    }

    /// Prepares a step dragged onto the canvas.
    ///
    /// A view without components starts with the blank template's components.
    pub fn load_step(&mut self, mut step: Step) -> Step {
        if step.kind == StepType::View && step.data.components.is_empty() {
            step.data.components = self.blank_components();
        }
        let mut steps = vec![step];
        assign_missing_ids(&mut steps, self.ids.as_mut());
        let mut steps = resolve_step_metadata(&self.catalog, steps);
        let mut step = steps.remove(0);
        let components = std::mem::take(&mut step.data.components);
        step.data.components = resolve_component_metadata(&self.catalog, components);
        step
    }

    /// The graph a fresh canvas shows: the catalog's default template, composed.
    pub fn default_graph(&mut self) -> Graph {
        match self.catalog.default_template().cloned() {
            Some(template) => match self.load_template(&template) {
                TemplateLoad::Composed { graph, .. } => graph,
                TemplateLoad::RequiresGeneration => Graph::default(),
            },
            None => {
                let nodes = self.generate_steps(Vec::new());
                self.recompute(nodes)
            }
        }
    }

    fn blank_components(&mut self) -> Vec<Element> {
        let Some(blank) = self.catalog.template(&TemplateType::Blank) else {
            return Vec::new();
        };
        let mut components = blank
            .steps()
            .first()
            .map(|step| step.data.components.clone())
            .unwrap_or_default();
        // Blank template ids are placeholders; a dragged step always gets fresh ones.
        for component in components.iter_mut() {
            component.walk_mut(&mut |element| element.id.clear());
        }
        assign_missing_component_ids(&mut components, self.ids.as_mut());
        resolve_component_metadata(&self.catalog, components)
    }
}
