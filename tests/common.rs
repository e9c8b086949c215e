//! Common test utilities for building catalogs, steps and composers.
use flowsmith::prelude::*;

/// A small catalog with the step and element types the composer tests rely on.
///
/// `TYPOGRAPHY` and `RICH_TEXT` are deliberately absent so they pass through resolution
/// untouched.
#[allow(dead_code)]
pub const CATALOG_JSON: &str = r#"{
  "steps": [
    { "type": "VIEW", "display": { "label": "View" } },
    { "type": "EXECUTION", "display": { "label": "Execution" } }
  ],
  "elements": [
    { "type": "BUTTON", "display": { "label": "Button" }, "config": { "text": "Button" } },
    { "type": "BUTTON", "variant": "PRIMARY", "display": { "label": "Primary Button" }, "config": { "text": "Continue" } },
    { "type": "INPUT", "display": { "label": "Input" }, "config": { "required": false } },
    { "type": "INPUT", "variant": "PASSWORD", "display": { "label": "Password" }, "config": { "required": true, "label": "Password" } },
    { "type": "FORM", "display": { "label": "Form" } }
  ],
  "templates": [
    {
      "type": "BLANK",
      "config": { "data": { "steps": [
        { "id": "{{BLANK_VIEW}}", "type": "VIEW", "data": { "components": [
          { "id": "{{BLANK_TEXT}}", "type": "TYPOGRAPHY", "config": { "text": "Title" } },
          { "id": "{{BLANK_FORM}}", "type": "FORM", "components": [
            { "id": "{{BLANK_SUBMIT}}", "type": "BUTTON", "variant": "PRIMARY" }
          ] }
        ] } }
      ] } }
    },
    {
      "type": "BASIC",
      "config": { "data": {
        "steps": [
          { "id": "{{EMAIL_VIEW}}", "type": "VIEW", "position": { "x": 0, "y": 330 }, "data": { "components": [
            { "id": "{{EMAIL_FORM}}", "type": "FORM", "components": [
              { "id": "{{EMAIL_INPUT}}", "type": "INPUT", "variant": "EMAIL" },
              { "id": "{{EMAIL_SUBMIT}}", "type": "BUTTON", "variant": "PRIMARY", "action": { "type": "NEXT", "next": "{{RESET_VIEW}}" } }
            ] }
          ] } },
          { "id": "{{RESET_VIEW}}", "type": "VIEW", "position": { "x": 300, "y": 330 }, "data": { "components": [
            { "id": "{{RESET_FORM}}", "type": "FORM", "components": [
              { "id": "{{RESET_PASSWORD}}", "type": "INPUT", "variant": "PASSWORD" },
              { "id": "{{RESET_SUBMIT}}", "type": "BUTTON", "variant": "PRIMARY" }
            ] }
          ] } }
        ],
        "__generationMeta__": { "replacers": [
          { "placeholder": "{{EMAIL_VIEW}}", "type": "ID" },
          { "placeholder": "{{EMAIL_FORM}}", "type": "ID" },
          { "placeholder": "{{EMAIL_INPUT}}", "type": "ID" },
          { "placeholder": "{{EMAIL_SUBMIT}}", "type": "ID" },
          { "placeholder": "{{RESET_VIEW}}", "type": "ID" },
          { "placeholder": "{{RESET_FORM}}", "type": "ID" },
          { "placeholder": "{{RESET_PASSWORD}}", "type": "ID" },
          { "placeholder": "{{RESET_SUBMIT}}", "type": "ID" }
        ] }
      } }
    },
    {
      "type": "BASIC_FEDERATED",
      "config": { "data": {
        "steps": [
          { "id": "{{FED_VIEW}}", "type": "VIEW", "data": { "components": [
            { "id": "{{FED_BUTTON}}", "type": "BUTTON", "action": { "type": "NEXT", "next": "{{FED_EXEC}}" } }
          ] } },
          { "id": "{{FED_EXEC}}", "type": "EXECUTION", "data": { "action": { "type": "NEXT", "next": "END" } } }
        ],
        "__generationMeta__": { "replacers": [
          { "placeholder": "{{FED_VIEW}}" },
          { "placeholder": "{{FED_BUTTON}}" },
          { "placeholder": "{{FED_EXEC}}" }
        ] }
      } }
    },
    { "type": "GENERATE_WITH_AI" }
  ],
  "widgets": [
    {
      "type": "EMAIL_OTP",
      "config": { "data": {
        "steps": [
          { "id": "drop", "type": "VIEW", "__generationMeta__": { "strategy": "MERGE_WITH_DROP_POINT" }, "data": { "components": [
            { "id": "{{OTP_FORM}}", "type": "FORM", "components": [
              { "id": "{{OTP_INPUT}}", "type": "INPUT", "variant": "OTP" },
              { "id": "{{OTP_SUBMIT}}", "type": "BUTTON", "variant": "PRIMARY", "action": { "type": "NEXT", "next": "END" } }
            ] }
          ] } }
        ],
        "__generationMeta__": {
          "replacers": [
            { "placeholder": "{{OTP_FORM}}" },
            { "placeholder": "{{OTP_INPUT}}" },
            { "placeholder": "{{OTP_SUBMIT}}" }
          ],
          "defaultPropertySelectorId": "{{OTP_FORM}}"
        }
      } }
    },
    {
      "type": "RECOVERY_CODE",
      "config": { "data": {
        "steps": [
          { "id": "{{CODE_VIEW}}", "type": "VIEW", "position": { "x": 900, "y": 330 }, "data": { "components": [
            { "id": "{{CODE_SUBMIT}}", "type": "BUTTON", "action": { "type": "NEXT", "next": "END" } }
          ] } }
        ],
        "__generationMeta__": {
          "replacers": [
            { "placeholder": "{{CODE_VIEW}}" },
            { "placeholder": "{{CODE_SUBMIT}}" }
          ],
          "defaultPropertySelectorId": "{{CODE_VIEW}}"
        }
      } }
    },
    { "type": "EMPTY" }
  ]
}"#;

#[allow(dead_code)]
pub fn catalog() -> ResourceCatalog {
    ResourceCatalog::from_json(CATALOG_JSON).expect("fixture catalog should parse")
}

/// A composer over the fixture catalog with deterministic ids.
#[allow(dead_code)]
pub fn composer() -> Composer {
    Composer::builder(catalog())
        .with_id_generator(SequentialIdGenerator::new())
        .build()
}

/// Generates nodes for `steps` and derives their edges.
#[allow(dead_code)]
pub fn compose(composer: &mut Composer, steps: Vec<Step>) -> Graph {
    let nodes = composer.generate_steps(steps);
    composer.recompute(nodes)
}

/// Scenario A: a single view whose button points at the legacy terminal marker.
#[allow(dead_code)]
pub fn single_view_to_end() -> Step {
    Step::view(
        "StepA",
        vec![Element::button("buttonA").with_action(Action::next("End"))],
    )
}

/// A form with one input of `variant` and one primary button without `next`.
#[allow(dead_code)]
pub fn form_view(id: &str, variant: Variant) -> Step {
    Step::view(
        id,
        vec![Element::form(
            format!("{}_form", id),
            vec![
                Element::input(format!("{}_input", id), variant),
                Element::button(format!("{}_submit", id)).with_variant(Variant::Primary),
            ],
        )],
    )
}

/// The (source, target) pairs of every edge, in order.
#[allow(dead_code)]
pub fn edge_pairs(graph: &Graph) -> Vec<(String, String)> {
    graph
        .edges
        .iter()
        .map(|edge| (edge.source.clone(), edge.target.clone()))
        .collect()
}

#[allow(dead_code)]
pub fn node_ids(graph: &Graph) -> Vec<String> {
    graph.nodes.iter().map(|node| node.id.clone()).collect()
}

/// A store whose every call fails, for exercising error notifications.
#[allow(dead_code)]
pub struct RejectingStore;

impl FlowStore for RejectingStore {
    fn fetch(&self, flow_type: &str) -> std::result::Result<Option<PersistedFlow>, StoreError> {
        Err(StoreError::Rejected {
            flow_type: flow_type.to_string(),
            status: 503,
        })
    }

    fn publish(&mut self, flow: &PersistedFlow) -> std::result::Result<(), StoreError> {
        Err(StoreError::Rejected {
            flow_type: flow.flow_type.clone(),
            status: 500,
        })
    }
}

/// A legacy flow: the last button still ends the journey with the literal marker.
#[allow(dead_code)]
pub fn legacy_flow(flow_type: &str) -> PersistedFlow {
    PersistedFlow {
        flow_type: flow_type.to_string(),
        steps: vec![
            Step::view(
                "email",
                vec![Element::form(
                    "email_form",
                    vec![
                        Element::input("email_input", Variant::Email),
                        Element::button("email_submit")
                            .with_variant(Variant::Primary)
                            .with_action(Action::next("reset")),
                    ],
                )],
            )
            .at(0.0, 330.0),
            Step::view(
                "reset",
                vec![Element::form(
                    "reset_form",
                    vec![
                        Element::input("reset_password", Variant::Password),
                        Element::button("reset_submit")
                            .with_variant(Variant::Primary)
                            .with_action(Action::next("End")),
                    ],
                )],
            )
            .at(300.0, 330.0),
        ],
    }
}
