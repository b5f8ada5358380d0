//! Per-layer transformation pass with parent-name provenance

use crate::error::{Result, StrataError};
use crate::graph::Graph;
use crate::layering::{Alias, Layering};
use crate::model::{CanonicalId, ParentRename};
use crate::naming::{bump_name, parse_name};
use crate::random::RandomSource;
use serde::Serialize;
use std::collections::HashMap;

/// One rename performed during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameStep {
    pub canonical_id: CanonicalId,
    pub alias: String,
    pub old_name: String,
    pub new_name: String,
}

/// Everything that happened while transforming one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerPass {
    pub depth: usize,
    pub steps: Vec<RenameStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub passes: Vec<LayerPass>,
}

impl TransformReport {
    pub fn total_renames(&self) -> usize {
        self.passes.iter().map(|p| p.steps.len()).sum()
    }
}

/// Walk `layering` in order and rename every alias's canonical node once.
///
/// Layer `k` is finished before layer `k + 1` starts. For nodes outside layer
/// 0 the current parent names are recorded: `before` is the parent's name when
/// the layer began and `after` its name at the moment of this rename, so the
/// two differ only when the parent was renamed earlier in the same layer.
///
/// Every alias is checked before the first rename, so an unknown node or a
/// suffix that would overflow fails the call with the graph left untouched.
pub fn transform_layers(
    graph: &mut Graph,
    layering: &Layering,
    rng: &mut RandomSource,
) -> Result<TransformReport> {
    transform_layers_observed(graph, layering, rng, |_, _| {})
}

/// Like [`transform_layers`], calling `observer` after each layer completes.
pub fn transform_layers_observed<F>(
    graph: &mut Graph,
    layering: &Layering,
    rng: &mut RandomSource,
    mut observer: F,
) -> Result<TransformReport>
where
    F: FnMut(&Graph, &LayerPass),
{
    check_layering(graph, layering)?;
    let mut report = TransformReport::default();

    for (depth, layer) in layering.layers.iter().enumerate() {
        let layer_start = current_names(graph);
        let mut pass = LayerPass {
            depth,
            steps: Vec::with_capacity(layer.len()),
        };

        for alias in layer {
            pass.steps.push(transform_alias(graph, alias, depth, &layer_start, rng)?);
        }

        tracing::debug!("Transformed layer {} ({} renames)", depth, pass.steps.len());
        observer(&*graph, &pass);
        report.passes.push(pass);
    }

    tracing::info!(
        "Transformed {} layers, {} renames",
        report.passes.len(),
        report.total_renames()
    );
    Ok(report)
}

fn transform_alias(
    graph: &mut Graph,
    alias: &Alias,
    depth: usize,
    layer_start: &HashMap<CanonicalId, String>,
    rng: &mut RandomSource,
) -> Result<RenameStep> {
    let id = &alias.canonical;

    let parents = if depth > 0 {
        let snapshot = graph
            .predecessors(id)
            .into_iter()
            .map(|parent| -> Result<ParentRename> {
                let after = graph
                    .node(parent)
                    .map(|n| n.display_name().to_string())
                    .ok_or_else(|| StrataError::UnknownNode(parent.clone()))?;
                let before = layer_start.get(parent).cloned().unwrap_or_else(|| after.clone());
                Ok(ParentRename { before, after })
            })
            .collect::<Result<Vec<_>>>()?;
        Some(snapshot)
    } else {
        None
    };

    let node = graph
        .node_mut(id)
        .ok_or_else(|| StrataError::UnknownNode(id.clone()))?;
    let new_name = bump_name(node.display_name(), rng)?;
    let record = node.apply_rename(new_name)?.clone();
    if let Some(snapshot) = parents {
        node.record_parents(snapshot);
    }

    tracing::trace!("{}: {} -> {}", alias, record.old_name, record.new_name);
    Ok(RenameStep {
        canonical_id: id.clone(),
        alias: alias.to_string(),
        old_name: record.old_name,
        new_name: record.new_name,
    })
}

/// Reject a layering that would fail part way through.
fn check_layering(graph: &Graph, layering: &Layering) -> Result<()> {
    let mut occurrences: HashMap<&CanonicalId, u64> = HashMap::new();
    for alias in layering.layers.iter().flatten() {
        *occurrences.entry(&alias.canonical).or_insert(0) += 1;
    }
    for (id, count) in occurrences {
        let node = graph
            .node(id)
            .ok_or_else(|| StrataError::UnknownNode(id.clone()))?;
        let (_, suffix) = parse_name(node.display_name())?;
        if suffix.checked_add(count).is_none() {
            return Err(StrataError::format(node.display_name()));
        }
    }
    Ok(())
}

fn current_names(graph: &Graph) -> HashMap<CanonicalId, String> {
    graph
        .all_nodes()
        .map(|n| (n.canonical_id().clone(), n.display_name().to_string()))
        .collect()
}
