use std::env;
use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::resolve::load_config_with_override;
use crate::config::Settings;
use crate::core::model::{Graph, NodeRef};
use crate::core::search::{search, SearchOptions, SearchOutcome};
use crate::core::store::GraphStore;
use crate::error::{BatchGraphError, Result};
use crate::graph::builder::BuildReport;
use crate::graph::check::{check_graph, GraphReport};
use crate::graph::nodeps::{compute_nodeps_ids, filter_graph};
use crate::graph::ops::{find_node_by_id, find_node_by_label, predecessors_of, successors_of};
use crate::graph::tree::{build_tree, CyclePolicy};
use crate::graph::viz;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "batchgraph")]
#[command(about = "Batch dependency graph explorer", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Node CSV (`id,name,shortName`)
    #[arg(long, global = true)]
    pub nodes: Option<PathBuf>,
    /// Edge CSV (`predecessorId,successorId`)
    #[arg(long, global = true)]
    pub edges: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the full graph
    Graph(GraphArgs),
    /// Expand the tree below the node whose label matches TERM
    Tree(TreeArgs),
    /// Print the graph without dependency-free starting batches
    Nodeps(NodepsArgs),
    /// Look a node up by label
    Find(FindArgs),
    /// Direct successors of a node id
    Succ(NeighborArgs),
    /// Direct predecessors of a node id
    Pred(NeighborArgs),
    /// Report cycles, dangling links and dropped rows
    Check(CheckArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[arg(long, default_value = "json")]
    pub format: String,
    /// Inline full nodes as link endpoints instead of ids
    #[arg(long)]
    pub resolved: bool,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    pub term: String,
    #[arg(long)]
    pub case_sensitive: bool,
    #[arg(long)]
    pub cycle_policy: Option<String>,
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct NodepsArgs {
    #[arg(long)]
    pub sentinel: Option<String>,
    #[arg(long)]
    pub ids_only: bool,
    #[arg(long, default_value = "json")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct FindArgs {
    pub label: String,
    #[arg(long)]
    pub case_sensitive: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NeighborArgs {
    pub id: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

struct Session {
    settings: Settings,
    store: GraphStore,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        output::set_colors(false);
    }
    init_tracing(cli.verbose, cli.quiet, !cli.no_color);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool, ansi: bool) {
    let filter = EnvFilter::try_from_env("BATCHGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "batchgraph=debug,info",
            (false, _) => "trace",
        })
    });
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_ansi(ansi)
                .compact(),
        )
        .with(filter)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return handle_completions(args);
    }
    let mut session = load_session(cli.config, cli.nodes, cli.edges)?;
    match cli.command {
        Commands::Graph(args) => handle_graph(args, &mut session),
        Commands::Tree(args) => handle_tree(args, &mut session),
        Commands::Nodeps(args) => handle_nodeps(args, &mut session),
        Commands::Find(args) => handle_find(args, &mut session),
        Commands::Succ(args) => handle_neighbors(args, Direction::Successors, &mut session),
        Commands::Pred(args) => handle_neighbors(args, Direction::Predecessors, &mut session),
        Commands::Check(args) => handle_check(args, &mut session),
        Commands::Completions(_) => Ok(()),
    }
}

fn load_session(
    config_path: Option<PathBuf>,
    nodes: Option<PathBuf>,
    edges: Option<PathBuf>,
) -> Result<Session> {
    let cwd = env::current_dir()?;
    let mut settings = load_config_with_override(cwd, config_path)?.settings;
    if let Some(nodes) = nodes {
        settings.sources.nodes = nodes;
    }
    if let Some(edges) = edges {
        settings.sources.edges = edges;
    }
    let store = GraphStore::from_settings(&settings)?;
    Ok(Session { settings, store })
}

fn handle_graph(args: GraphArgs, session: &mut Session) -> Result<()> {
    let graph = session.store.graph()?;
    if args.resolved {
        let mut resolved = graph.clone();
        resolved.materialize();
        return print_graph(&resolved, &args.format);
    }
    print_graph(graph, &args.format)
}

fn handle_tree(args: TreeArgs, session: &mut Session) -> Result<()> {
    let policy = match args.cycle_policy.as_deref() {
        Some(raw) => raw.parse::<CyclePolicy>()?,
        None => session.settings.tree.cycle_policy,
    };
    let mut options = SearchOptions::from(&session.settings.search);
    if args.case_sensitive {
        options.case_insensitive = false;
    }
    let format = parse_format(&args.format, &["text", "json"])?;

    let graph = session.store.graph()?;
    let root = match search(graph, &args.term, options) {
        SearchOutcome::Found(node) => node,
        SearchOutcome::TermTooShort => {
            warn!(
                term = %args.term,
                min_len = options.min_term_len,
                "search term too short, showing full graph"
            );
            return print_graph(graph, fallback_format(format));
        }
        SearchOutcome::NotFound => {
            warn!(term = %args.term, "no batch with that label, showing full graph");
            return print_graph(graph, fallback_format(format));
        }
    };

    let Some(tree) = build_tree(graph, Some(root), policy)? else {
        return print_graph(graph, fallback_format(format));
    };
    debug!(root = %tree.id, nodes = tree.size(), depth = tree.depth(), "tree expanded");
    match format {
        "json" => print_json(&tree),
        _ => {
            print!("{}", viz::render_tree(&tree));
            Ok(())
        }
    }
}

fn handle_nodeps(args: NodepsArgs, session: &mut Session) -> Result<()> {
    let sentinel = args
        .sentinel
        .unwrap_or_else(|| session.settings.graph.sentinel.clone());
    let graph = session.store.graph()?;
    if !graph.contains_node(&sentinel) {
        warn!(sentinel = %sentinel, "sentinel id does not name a node");
    }
    let ids = compute_nodeps_ids(graph, &sentinel);

    if args.ids_only {
        if parse_format(&args.format, &["json", "text"])? == "json" {
            return print_json(&ids);
        }
        for id in ids {
            println!("{}", id);
        }
        return Ok(());
    }

    print_graph(&filter_graph(graph, &ids), &args.format)
}

#[derive(Debug, Serialize)]
struct NodeJson {
    id: String,
    name: String,
    label: String,
}

fn handle_find(args: FindArgs, session: &mut Session) -> Result<()> {
    let case_insensitive = !args.case_sensitive && session.settings.search.case_insensitive;
    let graph = session.store.graph()?;
    let node = find_node_by_label(graph, &args.label, case_insensitive).ok_or_else(|| {
        BatchGraphError::Other(anyhow::anyhow!("no batch labelled '{}'", args.label))
    })?;

    if args.json {
        return print_json(&NodeJson {
            id: node.id.clone(),
            name: node.name.clone(),
            label: node.label.clone(),
        });
    }
    println!("{} [{}] {}", node.label, node.id, node.name);
    Ok(())
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Successors,
    Predecessors,
}

#[derive(Debug, Serialize)]
struct NeighborJson {
    id: String,
    label: Option<String>,
}

fn handle_neighbors(args: NeighborArgs, direction: Direction, session: &mut Session) -> Result<()> {
    let graph = session.store.graph()?;
    if find_node_by_id(graph, &args.id).is_none() {
        output::warn(&format!("unknown batch id {}", args.id));
    }
    let refs: Vec<&NodeRef> = match direction {
        Direction::Successors => successors_of(graph, &args.id),
        Direction::Predecessors => predecessors_of(graph, &args.id),
    };
    let neighbors: Vec<NeighborJson> = refs
        .into_iter()
        .map(|node_ref| NeighborJson {
            id: node_ref.id().to_string(),
            label: find_node_by_id(graph, node_ref.id()).map(|node| node.label.clone()),
        })
        .collect();

    if args.json {
        return print_json(&neighbors);
    }
    for neighbor in neighbors {
        match neighbor.label {
            Some(label) => println!("{} [{}]", label, neighbor.id),
            None => println!("? [{}] (missing)", neighbor.id),
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckJson<'a> {
    #[serde(flatten)]
    graph: GraphReport,
    #[serde(flatten)]
    build: &'a BuildReport,
}

fn handle_check(args: CheckArgs, session: &mut Session) -> Result<()> {
    let report = check_graph(session.store.graph()?);
    let build = session.store.report()?;

    if args.json {
        return print_json(&CheckJson {
            graph: report,
            build,
        });
    }

    if report.is_clean() && build.duplicate_ids.is_empty() {
        output::info("no graph issues found");
    }
    if !report.cycles.is_empty() {
        output::heading("cycles:");
        for cycle in &report.cycles {
            println!("  {}", cycle.join(", "));
        }
    }
    if !report.dangling.is_empty() {
        output::heading("dangling links:");
        for link in &report.dangling {
            println!(
                "  {} -> {} (missing {})",
                link.source,
                link.target,
                link.missing.join(", ")
            );
        }
    }
    if !build.duplicate_ids.is_empty() {
        output::heading("duplicate ids (last row wins):");
        for id in &build.duplicate_ids {
            println!("  {}", id);
        }
    }
    if build.dropped_node_rows > 0 || build.dropped_edge_rows > 0 {
        output::info(&format!(
            "dropped {} malformed node rows and {} malformed edge rows",
            build.dropped_node_rows, build.dropped_edge_rows
        ));
    }
    Ok(())
}

fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "batchgraph", &mut io::stdout());
    Ok(())
}

fn print_graph(graph: &Graph, format: &str) -> Result<()> {
    match parse_format(format, &["json", "dot", "text"])? {
        "json" => print_json(graph),
        "dot" => {
            print!("{}", viz::render_dot(graph));
            Ok(())
        }
        _ => {
            print!("{}", viz::render_flat(graph));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| BatchGraphError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn parse_format<'a>(input: &str, allowed: &[&'a str]) -> Result<&'a str> {
    let lowered = input.to_ascii_lowercase();
    allowed
        .iter()
        .find(|candidate| **candidate == lowered)
        .copied()
        .ok_or_else(|| {
            BatchGraphError::Other(anyhow::anyhow!(format!("unknown format '{}'", input)))
        })
}

fn fallback_format(tree_format: &str) -> &'static str {
    if tree_format == "json" {
        "json"
    } else {
        "text"
    }
}
