//! Drillnav CLI
//!
//! Operator tooling for the workflow navigation engine:
//! - Inspecting the entity relationship catalog (`catalog`)
//! - Decoding workflow URLs with real diagnostics (`url parse`)
//! - Replaying navigation scripts against a starting URL (`walk`)

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use drillnav_catalog::{
    children, contains, entity_types_by_relationship, extended_matches, parents, pure_matches,
    use_case_entity_types, EntityType, RelationshipKind, UseCase,
};
use drillnav_state::{WorkflowEntity, WorkflowState};
use drillnav_url::{to_url, try_parse_workflow_url};

#[derive(Parser)]
#[command(name = "drillnav")]
#[command(author, version, about = "Workflow navigation engine tooling")]
struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the static entity relationship catalog.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Decode and inspect workflow URLs.
    Url {
        #[command(subcommand)]
        command: UrlCommands,
    },

    /// Replay a navigation script against a starting URL, printing the
    /// URL after every step.
    ///
    /// Steps: `list:<TYPE>`, `item:<id>`, `entity:<TYPE>:<id>`, `pop`,
    /// `close` (close side panel), `skim`, `clear`.
    Walk {
        /// Starting workflow URL (malformed input degrades to the
        /// dashboard, exactly as the console would).
        url: String,
        /// Navigation steps to apply in order.
        #[arg(required = true)]
        steps: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Show every declared and derived relationship of an entity type.
    Relations {
        /// Entity type wire name, e.g. DEPLOYMENT.
        entity_type: String,
        /// Restrict lists to the types registered for a use case.
        #[arg(long)]
        use_case: Option<String>,
    },
    /// List the entity types registered for a use case.
    Types {
        /// Use case slug, e.g. vulnerability-management.
        use_case: String,
    },
}

#[derive(Subcommand)]
enum UrlCommands {
    /// Parse a workflow URL and print the decoded state.
    Parse {
        url: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Catalog { command } => run_catalog(command, cli.json),
        Commands::Url { command } => run_url(command, cli.json),
        Commands::Walk { url, steps } => run_walk(&url, &steps, cli.json),
    }
}

fn parse_entity_type(raw: &str) -> Result<EntityType> {
    raw.to_uppercase()
        .replace('-', "_")
        .parse::<EntityType>()
        .map_err(|_| anyhow!("unknown entity type {raw:?} (expected e.g. DEPLOYMENT)"))
}

fn parse_use_case(raw: &str) -> Result<UseCase> {
    raw.parse::<UseCase>()
        .map_err(|_| anyhow!("unknown use case {raw:?} (expected e.g. vulnerability-management)"))
}

// ----------------------------------------------------------------------
// catalog
// ----------------------------------------------------------------------

fn run_catalog(command: CatalogCommands, json: bool) -> Result<()> {
    match command {
        CatalogCommands::Relations { entity_type, use_case } => {
            let t = parse_entity_type(&entity_type)?;
            match use_case {
                Some(raw) => {
                    let use_case = parse_use_case(&raw)?;
                    let scoped = |kind| entity_types_by_relationship(t, kind, use_case);
                    print_relations(
                        t,
                        json,
                        scoped(RelationshipKind::Children),
                        scoped(RelationshipKind::Parents),
                        scoped(RelationshipKind::Matches),
                        Vec::new(),
                        scoped(RelationshipKind::Contains),
                    );
                }
                None => print_relations(
                    t,
                    json,
                    children(t).to_vec(),
                    parents(t).to_vec(),
                    pure_matches(t).to_vec(),
                    extended_matches(t).to_vec(),
                    contains(t),
                ),
            }
        }
        CatalogCommands::Types { use_case } => {
            let use_case = parse_use_case(&use_case)?;
            let types = use_case_entity_types(use_case);
            if json {
                println!("{}", serde_json::to_string_pretty(&types)?);
            } else {
                println!("{} {}", "use case:".bold(), use_case);
                for t in types {
                    println!("  {t}");
                }
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn print_relations(
    t: EntityType,
    json: bool,
    children: Vec<EntityType>,
    parents: Vec<EntityType>,
    matches: Vec<EntityType>,
    extended: Vec<EntityType>,
    contains: Vec<EntityType>,
) {
    if json {
        let value = serde_json::json!({
            "entityType": t,
            "children": children,
            "parents": parents,
            "matches": matches,
            "extendedMatches": extended,
            "contains": contains,
        });
        println!("{}", serde_json::to_string_pretty(&value).expect("serialize relations"));
        return;
    }

    println!("{} {}", "entity type:".bold(), t);
    print_relation_row("children", &children);
    print_relation_row("parents", &parents);
    print_relation_row("matches", &matches);
    print_relation_row("extended", &extended);
    print_relation_row("contains", &contains);
}

fn print_relation_row(label: &str, types: &[EntityType]) {
    let rendered = if types.is_empty() {
        "-".dimmed().to_string()
    } else {
        types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
    };
    println!("  {:>9}: {rendered}", label.cyan());
}

// ----------------------------------------------------------------------
// url
// ----------------------------------------------------------------------

fn run_url(command: UrlCommands, json: bool) -> Result<()> {
    match command {
        UrlCommands::Parse { url } => {
            let state = try_parse_workflow_url(&url)
                .with_context(|| format!("cannot decode workflow url {url:?}"))?;
            print_state(&state, json)?;
        }
    }
    Ok(())
}

fn print_state(state: &WorkflowState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    println!("{} {}", "use case:".bold(), state.use_case());
    if state.state_stack().is_empty() {
        println!("  {}", "(dashboard)".dimmed());
    }
    for (depth, frame) in state.state_stack().iter().enumerate() {
        let marker = if depth < state.page_stack().len() { "page" } else { "side" };
        println!("  {} {frame}", marker.dimmed());
    }
    if state.is_side_panel_open() {
        println!("{}", "side panel open".yellow());
    }
    Ok(())
}

// ----------------------------------------------------------------------
// walk
// ----------------------------------------------------------------------

enum Step {
    List(EntityType),
    Item(String),
    Entity(EntityType, String),
    Pop,
    Close,
    Skim,
    Clear,
}

fn parse_step(raw: &str) -> Result<Step> {
    if let Some(rest) = raw.strip_prefix("list:") {
        return Ok(Step::List(parse_entity_type(rest)?));
    }
    if let Some(rest) = raw.strip_prefix("item:") {
        if rest.is_empty() {
            return Err(anyhow!("step {raw:?} is missing an id"));
        }
        return Ok(Step::Item(rest.to_string()));
    }
    if let Some(rest) = raw.strip_prefix("entity:") {
        let (entity_type, id) = rest
            .split_once(':')
            .ok_or_else(|| anyhow!("step {raw:?} should be entity:<TYPE>:<id>"))?;
        if id.is_empty() {
            return Err(anyhow!("step {raw:?} is missing an id"));
        }
        return Ok(Step::Entity(parse_entity_type(entity_type)?, id.to_string()));
    }
    match raw {
        "pop" => Ok(Step::Pop),
        "close" => Ok(Step::Close),
        "skim" => Ok(Step::Skim),
        "clear" => Ok(Step::Clear),
        _ => Err(anyhow!("unknown step {raw:?}")),
    }
}

fn run_walk(url: &str, steps: &[String], json: bool) -> Result<()> {
    let mut state = drillnav_url::parse_workflow_url(url);
    let mut trace = vec![to_url(&state)];

    for raw in steps {
        let step = parse_step(raw)?;
        state = match step {
            Step::List(t) => state.push_list(t),
            Step::Item(id) => state.push_list_item(id),
            Step::Entity(t, id) => state.push_related_entity(t, id),
            Step::Pop => state.pop(),
            Step::Close => state.remove_side_panel_params(),
            Step::Skim => state.skimmed(),
            Step::Clear => state.clear(),
        };
        trace.push(to_url(&state));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    let mut lines = trace.iter();
    if let Some(start) = lines.next() {
        println!("{} {start}", "start".dimmed());
    }
    for (step, url) in steps.iter().zip(lines) {
        println!("{:>6} {}", step.green(), url);
    }
    println!(
        "{} {}",
        "stack:".bold(),
        state
            .state_stack()
            .iter()
            .map(WorkflowEntity::to_string)
            .collect::<Vec<_>>()
            .join(" > ")
    );
    Ok(())
}
