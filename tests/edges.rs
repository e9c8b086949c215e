//! Tests for node generation and edge synthesis.
mod common;
use common::*;
use flowsmith::config::PASSWORD_ONBOARD_EXECUTOR;
use flowsmith::prelude::*;
use serde_json::json;

#[cfg(test)]
mod node_tests {
    use super::*;

    #[test]
    fn test_nodes_are_bounded_by_start_and_end() {
        let mut composer = composer();
        let nodes = composer.generate_steps(vec![
            Step::view("a", vec![]).at(0.0, 100.0),
            Step::view("b", vec![]).at(300.0, 100.0),
        ]);

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "a", "b", "END"]);

        let start = &nodes[0];
        assert_eq!(start.kind, StepType::Start);
        assert_eq!(start.position, Position { x: -300.0, y: 330.0 });
        assert!(!start.deletable);
        assert!(start.data.display_only);

        let end = &nodes[3];
        assert_eq!(end.kind, StepType::End);
        assert_eq!(end.position, Position { x: 900.0, y: 300.0 });
        assert!(!end.deletable);

        assert!(nodes[1].deletable && nodes[2].deletable);
        assert_eq!(nodes[1].display, Some(json!({ "label": "View" })));
    }

    #[test]
    fn test_existing_boundaries_are_reused() {
        let mut composer = composer();
        let mut end = Step::new("END", StepType::End).at(50.0, 50.0);
        end.deletable = true;

        let nodes = composer.generate_steps(vec![
            Step::new("", StepType::Start),
            Step::view("a", vec![]),
            end,
            Step::new("END2", StepType::End),
        ]);

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "a", "END"]);
        assert_eq!(nodes[2].position, Position { x: 50.0, y: 50.0 });
        assert!(!nodes[2].deletable);
    }

    #[test]
    fn test_missing_ids_are_assigned() {
        let mut composer = composer();
        let nodes = composer.generate_steps(vec![Step::view(
            "",
            vec![Element::button("").with_action(Action::next("End"))],
        )]);

        let view = &nodes[1];
        assert_eq!(view.id, "view_1");
        assert_eq!(view.data.components[0].id, "button_2");
    }

    #[test]
    fn test_empty_flow_still_has_boundaries() {
        let mut composer = composer();
        let graph = compose(&mut composer, vec![]);

        assert_eq!(node_ids(&graph), vec!["start", "END"]);
        assert_eq!(
            graph.end_node().unwrap().position,
            Position { x: 300.0, y: 530.0 }
        );
        assert_eq!(edge_pairs(&graph), vec![("start".to_string(), "END".to_string())]);
    }
}

#[cfg(test)]
mod edge_tests {
    use super::*;

    #[test]
    fn test_single_view_connects_start_and_end() {
        let mut composer = composer();
        let graph = compose(&mut composer, vec![single_view_to_end()]);

        assert_eq!(node_ids(&graph), vec!["start", "StepA", "END"]);
        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("start".to_string(), "StepA".to_string()),
                ("StepA".to_string(), "END".to_string()),
            ]
        );

        let start_edge = &graph.edges[0];
        assert_eq!(start_edge.id, "start-StepA");
        assert_eq!(start_edge.source_handle, "start_NEXT");
        assert_eq!(start_edge.kind, "base-edge");
        assert_eq!(start_edge.marker_end.kind, "arrow");

        let button_edge = &graph.edges[1];
        assert_eq!(button_edge.id, "buttonA");
        assert_eq!(button_edge.source_handle, "buttonA_NEXT");
    }

    #[test]
    fn test_password_form_submit_implies_end() {
        let mut composer = composer();
        let step = Step::view(
            "reset",
            vec![Element::form(
                "reset_form",
                vec![
                    Element::input("new_password", Variant::Password),
                    Element::button("confirm").with_config(json!({ "type": "submit" })),
                ],
            )],
        );

        let graph = compose(&mut composer, vec![step]);

        let button = graph.node("reset").unwrap().find_component("confirm").unwrap();
        let action = button.action.as_ref().unwrap();
        assert_eq!(action.executor_name(), Some(PASSWORD_ONBOARD_EXECUTOR));
        assert_eq!(action.next_target(), None);

        let edge = graph.edges.iter().find(|e| e.id == "confirm").unwrap();
        assert_eq!(edge.source, "reset");
        assert_eq!(edge.target, "END");
        assert_eq!(edge.source_handle, "confirm_NEXT");
    }

    #[test]
    fn test_primary_buttons_become_submit() {
        let mut composer = composer();
        let graph = compose(&mut composer, vec![form_view("otp", Variant::Otp)]);

        let button = graph.node("otp").unwrap().find_component("otp_submit").unwrap();
        assert!(button.is_submit_button());
        assert_eq!(
            button.action.as_ref().unwrap().executor_name(),
            Some("EmailOTPExecutor")
        );
        // OTP is not a terminal executor: the fallback ties the form button to End.
        let edge = graph.edges.iter().find(|e| e.source == "otp").unwrap();
        assert_eq!(edge.id, "otp_submit");
        assert_eq!(edge.target, "END");
    }

    #[test]
    fn test_ambiguous_submit_buttons_get_no_executor() {
        let mut composer = composer();
        let step = Step::view(
            "reset",
            vec![Element::form(
                "f",
                vec![
                    Element::input("p", Variant::Password),
                    Element::button("one").with_variant(Variant::Primary),
                    Element::button("two").with_variant(Variant::Primary),
                ],
            )],
        );

        let graph = compose(&mut composer, vec![step]);

        let node = graph.node("reset").unwrap();
        assert!(node.find_component("one").unwrap().action.is_none());
        assert!(node.find_component("two").unwrap().action.is_none());
    }

    #[test]
    fn test_only_first_form_is_kept() {
        let mut composer = composer();
        let step = Step::view(
            "v",
            vec![
                Element::form("first", vec![]),
                Element::new("text", ElementType::Typography),
                Element::form("second", vec![]),
            ],
        );

        let graph = compose(&mut composer, vec![step]);

        let ids: Vec<&str> = graph.node("v").unwrap().data.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "text"]);
    }

    #[test]
    fn test_step_level_action() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![
                Step::view("a", vec![]).with_action(Action::next("b")),
                Step::new("b", StepType::Execution).with_action(Action::next("END")),
            ],
        );

        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("start".to_string(), "a".to_string()),
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "END".to_string()),
            ]
        );
        assert_eq!(graph.edges[1].id, "a-to-b");
        assert_eq!(graph.edges[1].source_handle, "a_NEXT");
        assert_eq!(graph.edges[2].id, "b-to-END");
    }

    #[test]
    fn test_fallback_without_buttons_uses_step_handle() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![Step::view("only", vec![Element::new("t", ElementType::Typography)])],
        );

        let edge = graph.edges.last().unwrap();
        assert_eq!(edge.id, "only-to-END");
        assert_eq!(edge.source_handle, "only_NEXT");
        assert_eq!(edge.target, "END");
    }

    #[test]
    fn test_fallback_prefers_form_button() {
        let mut composer = composer();
        let step = Step::view(
            "last",
            vec![
                Element::button("top"),
                Element::form("f", vec![Element::button("inner")]),
            ],
        );

        let graph = compose(&mut composer, vec![step]);

        let edge = graph.edges.last().unwrap();
        assert_eq!(edge.id, "inner");
        assert_eq!(edge.target, "END");
    }

    #[test]
    fn test_dangling_next_is_skipped() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![
                Step::view("a", vec![Element::button("ghost_button").with_action(Action::next("ghost"))]),
                Step::view("b", vec![Element::button("done").with_action(Action::next("END"))]),
            ],
        );

        assert!(graph.edges.iter().all(|e| e.target != "ghost"));
        // `b` is unreachable, so its End edge does not count: `a` is tied to End.
        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("start".to_string(), "a".to_string()),
                ("b".to_string(), "END".to_string()),
                ("a".to_string(), "END".to_string()),
            ]
        );
        assert_eq!(graph.edges[2].id, "ghost_button");
    }

    #[test]
    fn test_fallback_skips_buttons_that_already_have_edges() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![
                Step::view("v0", vec![Element::button("b0").with_action(Action::next("v1"))]),
                Step::view(
                    "v1",
                    vec![Element::form(
                        "f1",
                        vec![Element::button("b1").with_action(Action::next("v0"))],
                    )],
                ),
            ],
        );

        let b1_edges: Vec<&Edge> = graph.edges.iter().filter(|e| e.id == "b1").collect();
        assert_eq!(b1_edges.len(), 1);
        assert_eq!(b1_edges[0].target, "v0");

        let last = graph.edges.last().unwrap();
        assert_eq!(last.id, "v1-to-END");
        assert_eq!(last.source_handle, "v1_NEXT");
        assert!(graph.has_path("start", "END"));
    }

    #[test]
    fn test_fallback_uses_next_free_form_button() {
        let mut composer = composer();
        let step = Step::view(
            "last",
            vec![Element::form(
                "f",
                vec![
                    Element::button("back").with_action(Action::next("first")),
                    Element::button("done"),
                ],
            )],
        );

        let first = Step::view("first", vec![Element::button("go").with_action(Action::next("last"))]);

        let graph = compose(&mut composer, vec![first, step]);

        let last = graph.edges.last().unwrap();
        assert_eq!(last.id, "done");
        assert_eq!(last.source, "last");
        assert_eq!(last.target, "END");
    }

    #[test]
    fn test_execution_only_flow_reaches_end() {
        let mut composer = composer();
        let graph = compose(&mut composer, vec![Step::new("exec", StepType::Execution)]);

        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("start".to_string(), "exec".to_string()),
                ("exec".to_string(), "END".to_string()),
            ]
        );
        assert_eq!(graph.edges[1].id, "exec-to-END");
    }

    #[test]
    fn test_self_loop_with_unreachable_exit_reaches_end() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![
                Step::view("a", vec![Element::button("loop").with_action(Action::next("a"))]),
                Step::view("b", vec![Element::button("fin").with_action(Action::next("END"))]),
            ],
        );

        assert!(graph.has_path("start", "END"));
        let last = graph.edges.last().unwrap();
        assert_eq!(last.id, "a-to-END");
        assert_eq!(last.source_handle, "a_NEXT");
    }

    #[test]
    fn test_every_edge_targets_an_existing_node() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![
                form_view("a", Variant::Email),
                Step::view("b", vec![Element::button("x").with_action(Action::next("nowhere"))]),
                form_view("c", Variant::Password),
            ],
        );

        for edge in &graph.edges {
            assert!(graph.contains_node(&edge.source), "bad source {}", edge.source);
            assert!(graph.contains_node(&edge.target), "bad target {}", edge.target);
        }
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![form_view("a", Variant::Email), form_view("b", Variant::Password)],
        );

        assert_eq!(composer.synthesize_edges(&graph.nodes), graph.edges);
        let again = composer.recompute(graph.nodes.clone());
        assert_eq!(again, graph);
    }

    #[test]
    fn test_no_start_edge_without_start_node() {
        let composer = composer();
        let edges = composer.synthesize_edges(&[
            Step::view("a", vec![Element::button("b").with_action(Action::next("c"))]),
            Step::view("c", vec![]),
        ]);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "a");
        assert_eq!(edges[0].target, "c");
    }

    #[test]
    fn test_terminal_edges_skipped_without_end_node() {
        let composer = composer();
        let edges = composer.synthesize_edges(&[Step::view(
            "a",
            vec![Element::button("b").with_action(Action::executor(PASSWORD_ONBOARD_EXECUTOR))],
        )]);

        assert!(edges.is_empty());
    }

    #[test]
    fn test_custom_terminal_executor() {
        let mut composer = Composer::builder(catalog())
            .with_id_generator(SequentialIdGenerator::new())
            .with_terminal_executor("SmsOtpExecutor")
            .build();
        let graph = compose(
            &mut composer,
            vec![
                Step::view("a", vec![Element::button("sms").with_action(Action::executor("SmsOtpExecutor"))]),
                Step::view("b", vec![]),
            ],
        );

        let edge = graph.edges.iter().find(|e| e.id == "sms").unwrap();
        assert_eq!(edge.target, "END");
        // End is already reached, so the last view gets no fallback edge.
        assert!(graph.edges.iter().all(|e| e.source != "b"));
    }

    #[test]
    fn test_custom_handle_suffix() {
        let config = ComposerConfig {
            next_handle_suffix: "-out".to_string(),
            ..ComposerConfig::default()
        };
        let mut composer = Composer::builder(catalog())
            .with_config(config)
            .with_id_generator(SequentialIdGenerator::new())
            .build();

        let graph = compose(&mut composer, vec![single_view_to_end()]);

        assert_eq!(graph.edges[0].source_handle, "start-out");
        assert_eq!(graph.edges[1].source_handle, "buttonA-out");
    }

    #[test]
    fn test_missing_edges_detects_wrong_targets() {
        let mut composer = composer();
        let graph = compose(
            &mut composer,
            vec![
                Step::view("a", vec![Element::button("go").with_action(Action::next("b"))]),
                Step::view("b", vec![Element::button("done").with_action(Action::next("END"))]),
            ],
        );
        assert!(composer.missing_edges(&graph.edges, &graph.nodes).is_empty());

        let mut stale = graph.edges.clone();
        let go = stale.iter_mut().find(|e| e.id == "go").unwrap();
        go.target = "END".to_string();
        stale.retain(|e| e.id != "done");

        let missing = composer.missing_edges(&stale, &graph.nodes);
        let ids: Vec<&str> = missing.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["go_MISSING_EDGE", "done_MISSING_EDGE"]);
        assert_eq!(missing[0].target, "b");
        assert_eq!(missing[1].target, "END");
    }
}
