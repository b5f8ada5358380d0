//! Layering: turn a possibly cyclic graph into ordered layers of aliases
//!
//! Two strategies share the [`LayeringStrategy`] contract:
//!
//! - [`DuplicateLayering`] walks edges breadth-first and mints a fresh alias
//!   every time an edge reaches a node, so cycles terminate once each edge has
//!   been consumed.
//! - [`KahnLayering`] is an in-degree driven topological walk that breaks
//!   residual cycles by forcing a node free.

mod duplicate;
mod kahn;

pub use duplicate::DuplicateLayering;
pub use kahn::KahnLayering;

use crate::error::Result;
use crate::graph::Graph;
use crate::model::{CanonicalId, GraphEdge};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Separator between a canonical id and its disambiguation index.
pub const ALIAS_SEPARATOR: char = '#';

/// A layering-local occurrence of a canonical node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    pub canonical: CanonicalId,
    /// 0 for the first occurrence, then 1, 2, …
    pub index: u32,
}

impl Alias {
    pub fn new(canonical: CanonicalId, index: u32) -> Self {
        Alias { canonical, index }
    }

    /// Split `id` or `id#k` back into its parts.
    pub fn parse(alias: &str) -> Alias {
        if let Some((id, k)) = alias.rsplit_once(ALIAS_SEPARATOR) {
            if let Ok(index) = k.parse::<u32>() {
                if index > 0 {
                    return Alias::new(CanonicalId::from(id), index);
                }
            }
        }
        Alias::new(CanonicalId::from(alias), 0)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "{}", self.canonical)
        } else {
            write!(f, "{}{}{}", self.canonical, ALIAS_SEPARATOR, self.index)
        }
    }
}

/// Mints aliases with a per-canonical counter.
#[derive(Debug, Default)]
pub(crate) struct AliasMinter {
    counts: HashMap<CanonicalId, u32>,
}

impl AliasMinter {
    pub(crate) fn mint(&mut self, id: &CanonicalId) -> Alias {
        let count = self.counts.entry(id.clone()).or_insert(0);
        let alias = Alias::new(id.clone(), *count);
        *count += 1;
        alias
    }

    pub(crate) fn seen(&self, id: &CanonicalId) -> bool {
        self.counts.contains_key(id)
    }
}

/// Why a node was placed without all of its dependencies resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForcedPlacement {
    /// No natural root was available; the node seeded a traversal.
    Root(CanonicalId),
    /// A stalled in-degree walk was unblocked by zeroing this node.
    CycleBreak(CanonicalId),
}

impl ForcedPlacement {
    pub fn node(&self) -> &CanonicalId {
        match self {
            ForcedPlacement::Root(id) | ForcedPlacement::CycleBreak(id) => id,
        }
    }
}

/// Output of one layering run.
#[derive(Debug, Clone, Default)]
pub struct Layering {
    pub layers: Vec<Vec<Alias>>,
    /// Edges consumed by the traversal, in processing order.
    pub processed_edges: Vec<GraphEdge>,
    /// Edges ignored because their target was forced into place.
    pub dropped_edges: Vec<GraphEdge>,
    pub forced: Vec<ForcedPlacement>,
}

impl Layering {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Alias strings per layer.
    pub fn layer_report(&self) -> Vec<Vec<String>> {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(Alias::to_string).collect())
            .collect()
    }

    /// Index of the first layer holding an occurrence of `id`.
    pub fn first_layer_of(&self, id: &CanonicalId) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.iter().any(|a| &a.canonical == id))
    }

    pub fn forced_breaks(&self) -> impl Iterator<Item = &CanonicalId> {
        self.forced.iter().filter_map(|f| match f {
            ForcedPlacement::CycleBreak(id) => Some(id),
            ForcedPlacement::Root(_) => None,
        })
    }

    pub(crate) fn place(&mut self, depth: usize, alias: Alias) {
        while self.layers.len() <= depth {
            self.layers.push(Vec::new());
        }
        self.layers[depth].push(alias);
    }
}

/// A way of ordering a graph into layers.
pub trait LayeringStrategy {
    fn name(&self) -> &'static str;

    /// Produce ordered layers. Never mutates the graph; an empty graph yields
    /// no layers.
    fn produce_layers(&self, graph: &Graph, rng: &mut RandomSource) -> Result<Layering>;
}

/// Selects a layering strategy by name (e.g. from configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Breadth-first edge walk with node duplication
    #[default]
    Duplicate,
    /// In-degree driven walk with forced cycle breaks
    Kahn,
}

impl StrategyKind {
    pub fn strategy(self) -> Box<dyn LayeringStrategy> {
        match self {
            StrategyKind::Duplicate => Box::new(DuplicateLayering),
            StrategyKind::Kahn => Box::new(KahnLayering),
        }
    }

    pub fn all() -> [StrategyKind; 2] {
        [StrategyKind::Duplicate, StrategyKind::Kahn]
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Duplicate => f.write_str("duplicate"),
            StrategyKind::Kahn => f.write_str("kahn"),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duplicate" | "a" => Ok(StrategyKind::Duplicate),
            "kahn" | "b" => Ok(StrategyKind::Kahn),
            other => Err(format!("unknown layering strategy `{other}`")),
        }
    }
}
