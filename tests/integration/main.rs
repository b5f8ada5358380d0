//! Integration tests for Strata
//!
//! The property suite runs against every layering strategy on a spread of
//! seeded random graphs; the CLI tests drive the built binary.

use std::collections::{HashMap, HashSet};
use std::process::Command;
use strata_core::*;
use tempfile::TempDir;

const SEEDS: std::ops::Range<u64> = 0..40;

fn random_graph(seed: u64) -> (Graph, RandomSource) {
    let mut rng = RandomSource::seeded(seed);
    let config = GeneratorConfig {
        nodes: 3 + (seed as usize % 10),
        edge_density: [0.1, 0.25, 0.5, 0.8][seed as usize % 4],
    };
    let graph = generate(&config, &mut rng).unwrap();
    (graph, rng)
}

fn full_run(seed: u64, kind: StrategyKind) -> (Graph, Layering) {
    let (mut graph, mut rng) = random_graph(seed);
    let layering = kind.strategy().produce_layers(&graph, &mut rng).unwrap();
    transform_layers(&mut graph, &layering, &mut rng).unwrap();
    (graph, layering)
}

#[test]
fn test_every_edge_accounted_for_exactly_once() {
    for kind in StrategyKind::all() {
        for seed in SEEDS {
            let (graph, layering) = full_run(seed, kind);
            let processed: HashSet<&GraphEdge> = layering.processed_edges.iter().collect();
            let dropped: HashSet<&GraphEdge> = layering.dropped_edges.iter().collect();
            assert_eq!(processed.len(), layering.processed_edges.len(), "{kind} seed {seed}: edge processed twice");
            assert!(processed.is_disjoint(&dropped), "{kind} seed {seed}");
            for edge in graph.edges() {
                assert!(
                    processed.contains(edge) || dropped.contains(edge),
                    "{kind} seed {seed}: edge {edge} never resolved"
                );
            }
            assert_eq!(processed.len() + dropped.len(), graph.edge_count());
        }
    }
}

#[test]
fn test_kahn_orders_resolved_edges() {
    for seed in SEEDS {
        let (graph, layering) = full_run(seed, StrategyKind::Kahn);
        let layer_of: HashMap<&CanonicalId, usize> = layering
            .layers
            .iter()
            .enumerate()
            .flat_map(|(depth, layer)| layer.iter().map(move |a| (&a.canonical, depth)))
            .collect();
        assert_eq!(layer_of.len(), graph.node_count(), "seed {seed}: node placed twice or never");

        let forced: HashSet<&CanonicalId> = layering.forced_breaks().collect();
        for edge in graph.edges() {
            if forced.contains(&edge.target) {
                continue;
            }
            assert!(
                layer_of[&edge.target] > layer_of[&edge.source],
                "seed {seed}: {edge} not layered forward"
            );
        }
    }
}

#[test]
fn test_aliases_unique_and_resolvable() {
    for kind in StrategyKind::all() {
        for seed in SEEDS {
            let (graph, layering) = full_run(seed, kind);
            let mut seen = HashSet::new();
            for alias in layering.layers.iter().flatten() {
                assert!(seen.insert(alias.clone()), "{kind} seed {seed}: duplicate alias {alias}");
                assert!(graph.contains(&alias.canonical));
                assert_eq!(Alias::parse(&alias.to_string()), *alias);
            }
        }
    }
}

#[test]
fn test_every_node_transformed() {
    for kind in StrategyKind::all() {
        for seed in SEEDS {
            let (graph, _) = full_run(seed, kind);
            for node in graph.all_nodes() {
                assert!(node.transform_count() >= 1, "{kind} seed {seed}: {} untouched", node.canonical_id());
                if kind == StrategyKind::Kahn {
                    assert_eq!(node.transform_count(), 1);
                }
            }
        }
    }
}

#[test]
fn test_rename_monotonic_and_counts_consistent() {
    for kind in StrategyKind::all() {
        for seed in SEEDS {
            let (graph, layering) = full_run(seed, kind);
            let total: usize = layering.layers.iter().map(Vec::len).sum();
            let mut renames = 0;
            for node in graph.all_nodes() {
                let history = node.rename_history();
                assert_eq!(history.len(), node.transform_count() as usize);
                renames += history.len();
                for (i, record) in history.iter().enumerate() {
                    let (old_prefix, old) = parse_name(&record.old_name).unwrap();
                    let (new_prefix, new) = parse_name(&record.new_name).unwrap();
                    assert_eq!(new, old + 1);
                    assert!(old_prefix.eq_ignore_ascii_case(new_prefix));
                    if i > 0 {
                        assert_eq!(record.old_name, history[i - 1].new_name);
                    }
                }
                assert!(node.parent_history().len() <= history.len());
            }
            assert_eq!(renames, total, "{kind} seed {seed}: one rename per alias");
        }
    }
}

#[test]
fn test_same_seed_same_history() {
    for kind in StrategyKind::all() {
        for seed in [0, 7, 42] {
            let (a, la) = full_run(seed, kind);
            let (b, lb) = full_run(seed, kind);
            assert_eq!(la.layer_report(), lb.layer_report());
            assert_eq!(lineage_report(&a), lineage_report(&b));
            assert_eq!(lineage_report(&a).to_string(), lineage_report(&b).to_string());
        }
    }
}

#[test]
fn test_parent_snapshots_cover_all_parents() {
    for kind in StrategyKind::all() {
        for seed in SEEDS {
            let (graph, _) = full_run(seed, kind);
            for node in graph.all_nodes() {
                let parents = graph.predecessors(node.canonical_id()).len();
                for snapshot in node.parent_history() {
                    assert_eq!(snapshot.len(), parents);
                }
            }
        }
    }
}

// ── CLI ─────────────────────────────────────────────────

fn strata() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_strata"));
    cmd.env_remove("STRATA_SEED").env_remove("RUST_LOG");
    cmd
}

fn write_chain_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("chain.json");
    std::fs::write(
        &path,
        r#"{
  "nodes": {
    "A0": { "display_name": "A0" },
    "B0": { "display_name": "B0" },
    "C0": { "display_name": "C0" }
  },
  "edges": [["A0", "B0"], ["B0", "C0"]]
}"#,
    )
    .unwrap();
    path
}

#[test]
fn test_cli_help() {
    let output = strata().arg("--help").output().expect("Failed to execute strata");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Layer dependency graphs and trace per-layer renaming"));
}

#[test]
fn test_cli_run_json_is_reproducible() {
    let run = || {
        let output = strata()
            .args(["run", "--seed", "42", "--nodes", "6", "--json"])
            .output()
            .expect("Failed to execute strata");
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        output.stdout
    };
    let first = run();
    assert_eq!(first, run());

    let report: serde_json::Value = serde_json::from_slice(&first).unwrap();
    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    assert_eq!(nodes[0]["canonical_id"], "A0");
}

#[test]
fn test_cli_seed_from_env() {
    let output = strata()
        .env("STRATA_SEED", "5")
        .args(["run", "--json", "--nodes", "4", "--strategy", "kahn"])
        .output()
        .unwrap();
    let again = strata()
        .args(["run", "--json", "--nodes", "4", "--strategy", "kahn", "--seed", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, again.stdout);
}

#[test]
fn test_cli_layers_and_output_snapshot() {
    let dir = TempDir::new().unwrap();
    let input = write_chain_snapshot(&dir);

    let output = strata()
        .args(["layers", "--strategy", "kahn", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout.trim(), "Layer 0: A0\nLayer 1: B0\nLayer 2: C0");

    let saved = dir.path().join("after.json");
    let output = strata()
        .args(["run", "--seed", "1", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&saved)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FULL NODE HISTORIES"));

    let graph = load_snapshot(&saved).unwrap();
    assert!(graph.all_nodes().all(|n| n.transform_count() == 1));
}

#[test]
fn test_cli_analyze_path() {
    let dir = TempDir::new().unwrap();
    let input = write_chain_snapshot(&dir);

    let output = strata()
        .args(["analyze", "--from", "A0", "--to", "C0", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Path: A0 -> B0 -> C0"));
    assert!(stdout.contains("No cycles"));

    let output = strata()
        .args(["analyze", "--from", "C0", "--to", "A0", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No path from C0 to A0"));
}

#[test]
fn test_cli_input_ignores_generator_settings() {
    let dir = TempDir::new().unwrap();
    let input = write_chain_snapshot(&dir);

    let output = strata()
        .args(["layers", "--nodes", "0", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = strata().args(["generate", "--nodes", "0"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_rejects_bad_density() {
    let output = strata()
        .args(["generate", "--density", "2.0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
