use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use waypath::{
    util::{load_config, load_nodes, load_surface},
    Planner, PlannerConfig, RouteOutcome,
};

/// Finds the cheapest route between two waypoints on a cost grid
#[derive(Parser)]
#[command(version)]
struct Options {
    /// Cost grid, either the text format or an image
    grid: PathBuf,
    /// Node list file
    nodes: PathBuf,
    /// Index of the source node
    source: usize,
    /// Index of the destination node
    dest: usize,
    /// Where to write the report, stdout if omitted
    output: Option<PathBuf>,

    /// JSON file with planner settings, flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    min_nodes: Option<usize>,
    #[arg(long)]
    max_nodes: Option<usize>,
    /// Nearest neighbors linked to each node
    #[arg(long)]
    neighbors: Option<usize>,
    #[arg(long)]
    threads: Option<usize>,
    /// Cost of a black pixel when the grid is an image
    #[arg(long, default_value_t = 10.0)]
    max_cost: f64,
    /// Write the report as JSON
    #[arg(long)]
    json: bool,
    /// More logging, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Options {
    fn planner_config(&self) -> Result<PlannerConfig, anyhow::Error> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PlannerConfig::default(),
        };

        if let Some(min_nodes) = self.min_nodes {
            config.min_nodes = min_nodes;
        }
        if let Some(max_nodes) = self.max_nodes {
            config.max_nodes = max_nodes;
        }
        if let Some(neighbors) = self.neighbors {
            config.neighbors = neighbors;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }

        Ok(config)
    }
}

fn main() -> Result<(), anyhow::Error> {
    let options = Options::parse();

    let level = match options.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let surface = load_surface(&options.grid, options.max_cost)?;
    let positions = load_nodes(&options.nodes)?;
    let planner = Planner::new(surface, positions, options.planner_config()?)?;

    let outcome = planner.route(options.source, options.dest)?;

    let report = if options.json {
        serde_json::to_string_pretty(&outcome)? + "\n"
    } else {
        outcome.to_string()
    };

    match &options.output {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{}", report),
    }

    if matches!(outcome, RouteOutcome::NoPathFound) {
        log::warn!(
            "no sequence from node {} to node {} fits the length window",
            options.source,
            options.dest
        );
    }

    Ok(())
}
