//! Tests for loading templates and steps through the composer facade.
mod common;
use common::*;
use flowsmith::config::PASSWORD_ONBOARD_EXECUTOR;
use flowsmith::prelude::*;

#[cfg(test)]
mod template_tests {
    use super::*;

    fn load(kind: TemplateType) -> (Graph, Option<Resource>) {
        let mut composer = composer();
        let template = composer.catalog().template(&kind).cloned().unwrap();
        match composer.load_template(&template) {
            TemplateLoad::Composed {
                graph,
                default_selector,
            } => (graph, default_selector),
            TemplateLoad::RequiresGeneration => panic!("template should compose"),
        }
    }

    #[test]
    fn test_basic_template_composes() {
        let (graph, selector) = load(TemplateType::Basic);

        assert!(selector.is_none());
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.start_node().unwrap().id, "start");
        assert_eq!(graph.end_node().unwrap().id, "END");

        // No placeholder survives composition.
        for node in &graph.nodes {
            assert!(!node.id.contains('{'), "unsubstituted step id {}", node.id);
            node.walk_components(&mut |element| {
                assert!(!element.id.contains('{'), "unsubstituted id {}", element.id);
                if let Some(next) = element.action.as_ref().and_then(|a| a.next_target()) {
                    assert!(!next.contains('{'), "unsubstituted next {}", next);
                }
            });
        }

        let email = &graph.nodes[1];
        let reset = &graph.nodes[2];
        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("start".to_string(), email.id.clone()),
                (email.id.clone(), reset.id.clone()),
                (reset.id.clone(), "END".to_string()),
            ]
        );

        let reset_form = &reset.data.components[0];
        let submit = reset_form.nested_buttons()[0];
        assert!(submit.is_submit_button());
        assert_eq!(
            submit.action.as_ref().unwrap().executor_name(),
            Some(PASSWORD_ONBOARD_EXECUTOR)
        );
        assert!(graph.has_path("start", "END"));
    }

    #[test]
    fn test_federated_template_selects_execution_step() {
        let (graph, selector) = load(TemplateType::BasicFederated);

        let Some(Resource::Step(step)) = selector else {
            panic!("expected a step selector");
        };
        assert_eq!(step.kind, StepType::Execution);
        assert!(graph.contains_node(&step.id));
        assert!(graph.has_path("start", "END"));
        assert_eq!(graph.edges.last().unwrap().id, format!("{}-to-END", step.id));
    }

    #[test]
    fn test_ai_template_requires_generation() {
        let mut composer = composer();
        let template = composer
            .catalog()
            .template(&TemplateType::GenerateWithAi)
            .cloned()
            .unwrap();

        assert_eq!(composer.load_template(&template), TemplateLoad::RequiresGeneration);
    }

    #[test]
    fn test_template_without_steps_yields_empty_graph() {
        let mut composer = composer();
        let template = Template::new(TemplateType::Other("EMPTY".to_string()), vec![], vec![]);

        let load = composer.load_template(&template);

        assert_eq!(load.graph(), Some(&Graph::default()));
    }

    #[test]
    fn test_generated_flow_loads_like_a_template() {
        let mut composer = composer();
        let generated = GeneratedFlow {
            steps: vec![single_view_to_end()],
        };
        let template = generated.into_template().unwrap();

        let load = composer.load_template(&template);
        let graph = load.graph().unwrap();

        assert_eq!(node_ids(graph), vec!["start", "StepA", "END"]);
        assert!(graph.has_path("start", "END"));
    }

    #[test]
    fn test_default_graph_uses_basic_template() {
        let mut composer = composer();
        let graph = composer.default_graph();

        assert_eq!(graph.nodes.len(), 4);
        assert!(graph.has_path("start", "END"));
    }

    #[test]
    fn test_default_graph_without_templates() {
        let mut composer = Composer::builder(ResourceCatalog::default()).build();
        let graph = composer.default_graph();

        assert_eq!(node_ids(&graph), vec!["start", "END"]);
        assert_eq!(graph.edges.len(), 1);
    }
}

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn test_empty_view_gets_blank_components() {
        let mut composer = composer();

        let step = composer.load_step(Step::new("", StepType::View));

        assert!(!step.id.is_empty());
        assert_eq!(step.display, Some(serde_json::json!({ "label": "View" })));
        assert_eq!(step.data.components.len(), 2);
        let mut ids = Vec::new();
        step.walk_components(&mut |element| ids.push(element.id.clone()));
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| !id.is_empty() && !id.contains('{')));

        let submit = step.data.components[1].nested_buttons()[0];
        assert_eq!(submit.config["text"], serde_json::json!("Continue"));
    }

    #[test]
    fn test_each_dragged_view_gets_fresh_ids() {
        let mut composer = composer();

        let first = composer.load_step(Step::new("", StepType::View));
        let second = composer.load_step(Step::new("", StepType::View));

        assert_ne!(first.id, second.id);
        assert_ne!(first.data.components[0].id, second.data.components[0].id);
    }

    #[test]
    fn test_non_empty_step_keeps_its_components() {
        let mut composer = composer();
        let step = Step::new("", StepType::Execution).with_action(Action::next("END"));

        let loaded = composer.load_step(step);

        assert_eq!(loaded.id, "execution_1");
        assert!(loaded.data.components.is_empty());
        assert_eq!(loaded.display, Some(serde_json::json!({ "label": "Execution" })));
    }
}

#[cfg(test)]
mod normalizer_tests {
    use super::*;
    use flowsmith::composer::ids::assign_missing_ids;
    use flowsmith::composer::mutate_components;
    use flowsmith::config::EMAIL_OTP_EXECUTOR;

    fn submit_of(components: &[Element]) -> &Element {
        components[0]
            .components
            .iter()
            .find(|c| c.is_button())
            .unwrap()
    }

    #[test]
    fn test_only_first_form_survives() {
        let components = vec![
            Element::form("first", vec![]),
            Element::button("standalone"),
            Element::form("second", vec![]),
        ];

        let normalized = mutate_components(components, &ComposerConfig::default());

        let ids: Vec<&str> = normalized.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "standalone"]);
    }

    #[test]
    fn test_password_form_gets_onboard_executor() {
        let view = form_view("reset", Variant::Password);
        let normalized = mutate_components(view.data.components, &ComposerConfig::default());

        let submit = submit_of(&normalized);
        assert!(submit.is_submit_button());
        let action = submit.action.as_ref().unwrap();
        assert_eq!(action.executor_name(), Some(PASSWORD_ONBOARD_EXECUTOR));
    }

    #[test]
    fn test_otp_form_keeps_next_and_gets_otp_executor() {
        let mut view = form_view("otp", Variant::Otp);
        view.data.components[0].components[1].action = Some(Action::next("reset"));

        let normalized = mutate_components(view.data.components, &ComposerConfig::default());

        let action = submit_of(&normalized).action.as_ref().unwrap();
        assert_eq!(action.executor_name(), Some(EMAIL_OTP_EXECUTOR));
        assert_eq!(action.next_target(), Some("reset"));
    }

    #[test]
    fn test_two_submit_buttons_get_no_executor() {
        let form = Element::form(
            "form",
            vec![
                Element::input("password", Variant::Password),
                Element::button("a").with_variant(Variant::Primary),
                Element::button("b").with_variant(Variant::Primary),
            ],
        );

        let normalized = mutate_components(vec![form], &ComposerConfig::default());

        assert!(
            normalized[0]
                .components
                .iter()
                .filter(|c| c.is_button())
                .all(|c| c.is_submit_button() && c.action.is_none())
        );
    }

    #[test]
    fn test_missing_ids_are_filled_recursively() {
        let mut steps = vec![
            Step::new("", StepType::View).with_components(vec![Element::form(
                "",
                vec![Element::button("kept")],
            )]),
        ];
        let mut ids = SequentialIdGenerator::new();

        assign_missing_ids(&mut steps, &mut ids);

        assert_eq!(steps[0].id, "view_1");
        assert_eq!(steps[0].data.components[0].id, "form_2");
        assert_eq!(steps[0].data.components[0].components[0].id, "kept");
    }
}
