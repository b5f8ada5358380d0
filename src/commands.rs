//! CLI command implementations

use crate::config::{Overrides, RunConfig};
use anyhow::Context;
use std::path::Path;
use strata_core::{
    Graph, GraphSnapshot, LayerPass, RandomSource, analysis, generate as generate_graph,
    lineage_report, load_snapshot, save_snapshot, transform_layers, transform_layers_observed,
};

/// Load the config file, apply CLI overrides and validate. `generating` is
/// false when the graph comes from `--input`.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &Overrides,
    generating: bool,
) -> anyhow::Result<RunConfig> {
    let config = RunConfig::load(path)?.apply(overrides);
    config.validate(generating)?;
    tracing::debug!("Resolved config: {:?}", config);
    Ok(config)
}

pub fn run(
    config: &RunConfig,
    input: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let mut rng = RandomSource::from_seed_option(config.seed);
    let mut graph = obtain_graph(config, input, &mut rng)?;

    let strategy = config.strategy.strategy();
    tracing::info!("Layering with the {} strategy", strategy.name());
    let layering = strategy.produce_layers(&graph, &mut rng)?;

    if json {
        transform_layers(&mut graph, &layering, &mut rng)?;
        println!("{}", serde_json::to_string_pretty(&lineage_report(&graph))?);
    } else {
        print_graph(&graph, "ORIGINAL GRAPH")?;
        for (i, layer) in layering.layer_report().iter().enumerate() {
            println!("Layer {}: {}", i, layer.join(", "));
        }
        let mut printed: anyhow::Result<()> = Ok(());
        transform_layers_observed(&mut graph, &layering, &mut rng, |g, pass| {
            if printed.is_ok() {
                printed = print_pass(g, pass);
            }
        })?;
        printed?;
        print_graph(&graph, "FINAL TRANSFORMED GRAPH")?;
        println!("\n===== FULL NODE HISTORIES =====");
        println!("{}", lineage_report(&graph));
    }

    if let Some(path) = output {
        save_snapshot(&graph, path).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Snapshot written to {}", path.display());
    }
    Ok(())
}

pub fn generate(config: &RunConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let mut rng = RandomSource::from_seed_option(config.seed);
    let graph = generate_graph(&config.generator(), &mut rng)?;
    match output {
        Some(path) => {
            save_snapshot(&graph, path).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Snapshot written to {}", path.display());
        }
        None => println!("{}", GraphSnapshot::capture(&graph).to_json()?),
    }
    Ok(())
}

pub fn layers(config: &RunConfig, input: Option<&Path>) -> anyhow::Result<()> {
    let mut rng = RandomSource::from_seed_option(config.seed);
    let graph = obtain_graph(config, input, &mut rng)?;
    let layering = config.strategy.strategy().produce_layers(&graph, &mut rng)?;
    for (i, layer) in layering.layer_report().iter().enumerate() {
        println!("Layer {}: {}", i, layer.join(", "));
    }
    for forced in &layering.forced {
        tracing::info!("Forced placement: {:?}", forced);
    }
    Ok(())
}

pub fn analyze(
    config: &RunConfig,
    input: Option<&Path>,
    path: Option<(String, String)>,
) -> anyhow::Result<()> {
    let mut rng = RandomSource::from_seed_option(config.seed);
    let graph = obtain_graph(config, input, &mut rng)?;

    println!("{}", serde_json::to_string_pretty(&analysis::metrics(&graph))?);
    let cycles = analysis::dependency_cycles(&graph);
    if cycles.is_empty() {
        println!("No cycles");
    }
    for group in cycles {
        let ids: Vec<&str> = group.iter().map(|id| id.as_str()).collect();
        println!("Cycle group: {}", ids.join(", "));
    }

    if let Some((from, to)) = path {
        match analysis::dependency_path(&graph, &from.as_str().into(), &to.as_str().into()) {
            Some(ids) => {
                let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                println!("Path: {}", ids.join(" -> "));
            }
            None => println!("No path from {} to {}", from, to),
        }
    }
    Ok(())
}

/// Load the input snapshot, or generate a graph from the config.
fn obtain_graph(
    config: &RunConfig,
    input: Option<&Path>,
    rng: &mut RandomSource,
) -> anyhow::Result<Graph> {
    let graph = match input {
        Some(path) => {
            load_snapshot(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => generate_graph(&config.generator(), rng)?,
    };
    tracing::info!(
        "Graph ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn print_graph(graph: &Graph, header: &str) -> anyhow::Result<()> {
    println!("\n=== {} ===", header);
    println!("{}", serde_json::to_string_pretty(&graph.successor_view())?);
    Ok(())
}

/// Renames of one layer, the graph afterwards, and the parents each node saw.
fn print_pass(graph: &Graph, pass: &LayerPass) -> anyhow::Result<()> {
    println!("\n--- TRANSFORMING LAYER {} ---", pass.depth);
    for step in &pass.steps {
        println!("   {:>8}: {} → {}", step.alias, step.old_name, step.new_name);
    }
    print_graph(
        graph,
        &format!("graph after transforming up through layer {}", pass.depth),
    )?;
    if pass.depth == 0 {
        return Ok(());
    }
    for step in &pass.steps {
        let Some(node) = graph.node(&step.canonical_id) else {
            continue;
        };
        if let Some(parents) = node.parent_history().last() {
            let pretty: Vec<String> = parents.iter().map(ToString::to_string).collect();
            println!("   {}: parents [{}]", node.display_name(), pretty.join(", "));
        }
    }
    Ok(())
}
