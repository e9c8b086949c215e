use clap::{Parser, Subcommand, ValueEnum};
use flowsmith::prelude::*;
use serde::Serialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Compose, merge and migrate recovery-flow graphs from a resource catalog
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the resource catalog JSON file
    #[arg(short, long, global = true, default_value = "data/catalog.json")]
    catalog: String,

    /// Optional path to a composer config JSON file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a catalog template onto an empty canvas
    Compose {
        /// Template type, e.g. BASIC or BASIC_FEDERATED
        #[arg(short, long, default_value = "BASIC")]
        template: String,
    },
    /// Merge a catalog widget into a graph at a drop point
    Merge {
        /// Path to the graph JSON file ({ nodes, edges })
        graph: String,
        /// Widget type, e.g. EMAIL_OTP
        #[arg(short, long)]
        widget: String,
        /// Id of the node the widget is dropped on
        #[arg(short, long)]
        target: String,
    },
    /// Upgrade a persisted flow that still uses the legacy terminal marker
    Migrate {
        /// Path to the persisted flow JSON file ({ flowType, steps })
        flow: String,
    },
    /// Open a flow from a directory store and optionally publish it back
    Open {
        /// Directory holding `<flow_type>.json` files
        #[arg(short, long, default_value = "flows")]
        store: String,
        #[arg(long, default_value = flowsmith::store::PASSWORD_RECOVERY_FLOW_TYPE)]
        flow_type: String,
        /// Write the opened graph back to the store
        #[arg(long)]
        publish: bool,
    },
    /// Render a graph JSON file as text
    Render {
        /// Path to the graph JSON file ({ nodes, edges })
        graph: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let start = Instant::now();
    let format = cli.format;
    let mut composer = build_composer(&cli.catalog, cli.config.as_deref());

    match cli.command {
        Command::Compose { template } => {
            let kind = TemplateType::from(template.as_str());
            let template = composer
                .catalog()
                .template(&kind)
                .cloned()
                .unwrap_or_else(|| exit_with_error(&format!("Template '{}' not in catalog", kind)));
            match composer.load_template(&template) {
                TemplateLoad::Composed {
                    graph,
                    default_selector,
                } => {
                    emit_graph(&graph, format);
                    if let Some(selector) = default_selector {
                        tracing::info!(selector = selector.id(), "default property selector");
                    }
                }
                TemplateLoad::RequiresGeneration => exit_with_error(&format!(
                    "Template '{}' must be generated before it can be composed",
                    kind
                )),
            }
        }
        Command::Merge {
            graph,
            widget,
            target,
        } => {
            let current: Graph = read_json(&graph);
            let widget = composer
                .catalog()
                .widget(&widget)
                .cloned()
                .unwrap_or_else(|| exit_with_error(&format!("Widget '{}' not in catalog", widget)));
            let merged = composer
                .load_widget(&widget, &target, &current)
                .unwrap_or_else(|e| exit_with_error(&format!("Widget merge failed: {}", e)));
            emit_graph(&merged.graph, format);
            if let Some(id) = merged.default_selector_step_id {
                tracing::info!(step_id = %id, "default property selector step");
            }
        }
        Command::Migrate { flow } => {
            let mut flow: PersistedFlow = read_json(&flow);
            flow.steps = migrate_legacy_flow(flow.steps, composer.config());
            emit(&flow, format, |flow| {
                flow.steps
                    .iter()
                    .map(|step| format!("{} [{}]", step.id, step.kind))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
        }
        Command::Open {
            store,
            flow_type,
            publish,
        } => {
            let mut session =
                ComposerSession::new(composer, JsonFileFlowStore::new(store), flow_type);
            session
                .open()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to open session: {}", e)));
            if publish {
                // Failures are reported through the drained notifications below.
                let _ = session.publish();
            }
            for notification in session.take_notifications() {
                match &notification.description {
                    Some(description) => eprintln!(
                        "[{:?}] {}: {}",
                        notification.level, notification.message, description
                    ),
                    None => eprintln!("[{:?}] {}", notification.level, notification.message),
                }
            }
            emit_graph(session.graph(), format);
        }
        Command::Render { graph } => {
            let graph: Graph = read_json(&graph);
            println!("{}", GraphFormatter::format(&graph));
        }
    }

    tracing::debug!(elapsed = ?start.elapsed(), "done");
}

fn build_composer(catalog_path: &str, config_path: Option<&str>) -> Composer {
    let catalog_json = fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read catalog file '{}': {}",
            catalog_path, e
        ))
    });
    let catalog = ResourceCatalog::from_json(&catalog_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse catalog: {}", e)));

    let mut builder = Composer::builder(catalog);
    if let Some(path) = config_path {
        let config_json = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read config file '{}': {}", path, e))
        });
        let config = ComposerConfig::from_json(&config_json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse config: {}", e)));
        builder = builder.with_config(config);
    }
    builder.build()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn emit_graph(graph: &Graph, format: OutputFormat) {
    emit(graph, format, GraphFormatter::format);
}

fn emit<T: Serialize>(value: &T, format: OutputFormat, text: impl Fn(&T) -> String) {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", text(value)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
