use crate::model::{Element, Graph, Position, Step};
use itertools::Itertools;

/// Formats graphs into human-readable text.
pub struct GraphFormatter;

impl GraphFormatter {
    /// Format a graph as a node listing (with nested components) followed by its edges.
    pub fn format(graph: &Graph) -> String {
        let nodes = graph.nodes.iter().map(Self::format_step).join("\n");
        let edges = graph
            .edges
            .iter()
            .map(|edge| {
                format!(
                    "  {} --[{}]--> {}",
                    edge.source, edge.source_handle, edge.target
                )
            })
            .join("\n");

        let mut result = format!(
            "Graph: {} nodes, {} edges\nNodes:\n{}",
            graph.nodes.len(),
            graph.edges.len(),
            nodes
        );
        if !edges.is_empty() {
            result.push_str("\nEdges:\n");
            result.push_str(&edges);
        }
        result
    }

    fn format_step(step: &Step) -> String {
        let mut lines = vec![format!(
            "  {} [{}] at {}",
            step.id,
            step.kind,
            Self::format_position(step.position)
        )];
        if let Some(next) = step.data.action.as_ref().and_then(|a| a.next_target()) {
            lines.push(format!("      -> {}", next));
        }
        for component in &step.data.components {
            Self::format_recursive(component, 2, &mut lines);
        }
        lines.join("\n")
    }

    /// Recursively formats an element and its children, one level of indentation per depth.
    fn format_recursive(element: &Element, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        let variant = element
            .variant
            .as_ref()
            .map(|v| format!("/{}", v))
            .unwrap_or_default();
        let action = match element.action.as_ref() {
            Some(action) => [
                action.next_target().map(|next| format!("next={}", next)),
                action.executor_name().map(|name| format!("executor={}", name)),
            ]
            .into_iter()
            .flatten()
            .join(" "),
            None => String::new(),
        };

        let mut line = format!("{}{} [{}{}]", indent, element.id, element.kind, variant);
        if !action.is_empty() {
            line.push_str(&format!(" {}", action));
        }
        lines.push(line);

        for child in &element.components {
            Self::format_recursive(child, depth + 1, lines);
        }
    }

    fn format_position(position: Position) -> String {
        let fmt = |n: f64| {
            if n.fract() == 0.0 {
                format!("{}", n as i64)
            } else {
                format!("{}", n)
            }
        };
        format!("({}, {})", fmt(position.x), fmt(position.y))
    }
}
