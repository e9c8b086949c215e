use clap::Parser;
use flowsmith::model::{Action, Element, ElementType, Step, Variant};
use flowsmith::store::{PASSWORD_RECOVERY_FLOW_TYPE, PersistedFlow};
use rand::{Rng, rngs::ThreadRng};
use serde_json::json;
use std::fs;

/// A CLI tool to generate random persisted flows for the flowsmith composer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The flow type recorded in the generated document
    #[arg(long, default_value = PASSWORD_RECOVERY_FLOW_TYPE)]
    flow_type: String,

    /// The minimum number of view steps to generate
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of view steps to generate
    #[arg(long, default_value_t = 6)]
    max: usize,

    /// End the flow with the legacy terminal marker instead of an executor
    #[arg(long)]
    legacy: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.min == 0 || cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) must be at least 1 and not greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    let count = rng.random_range(cli.min..=cli.max);
    println!("Generating a flow with {} view step(s)...", count);

    let steps = (0..count)
        .map(|index| generate_view(&mut rng, index, count, cli.legacy))
        .collect();
    let flow = PersistedFlow {
        flow_type: cli.flow_type,
        steps,
    };

    let json_output = serde_json::to_string_pretty(&flow)?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved flow to '{}'", cli.output);

    Ok(())
}

/// Generates one view: a heading and a form whose primary button leads to the next view.
fn generate_view(rng: &mut ThreadRng, index: usize, count: usize, legacy: bool) -> Step {
    let id = format!("view_{}", index + 1);
    let is_last = index + 1 == count;

    let action = if !is_last {
        Action::next(format!("view_{}", index + 2))
    } else if legacy {
        Action::next("END")
    } else {
        Action::executor(flowsmith::config::PASSWORD_ONBOARD_EXECUTOR)
    };

    let mut fields = vec![generate_input(rng, &id)];
    if rng.random_bool(0.3) {
        fields.push(generate_input(rng, &format!("{}_extra", id)));
    }
    fields.push(
        Element::button(format!("{}_submit", id))
            .with_variant(Variant::Primary)
            .with_config(json!({ "text": "Continue" }))
            .with_action(action),
    );

    let heading = Element::new(format!("{}_heading", id), ElementType::Typography)
        .with_config(json!({ "text": format!("Step {}", index + 1) }));
    let form = Element::form(format!("{}_form", id), fields);

    let x = 300.0 * index as f64 + rng.random_range(-40.0..40.0);
    let y = rng.random_range(200.0..400.0);
    Step::view(id, vec![heading, form]).at(x, y)
}

fn generate_input(rng: &mut ThreadRng, owner: &str) -> Element {
    let variant = match rng.random_range(0..3) {
        0 => Variant::Email,
        1 => Variant::Password,
        _ => Variant::Otp,
    };
    Element::input(format!("{}_{}", owner, variant.as_str().to_lowercase()), variant)
}
