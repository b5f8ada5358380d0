//! Strata Core: graph layering, traceable renaming and lineage reporting

pub mod error;
pub mod model;
pub mod naming;
pub mod random;
pub mod graph;
pub mod generator;
pub mod layering;
pub mod transform;
pub mod history;
pub mod analysis;
pub mod snapshot;


#[cfg(test)]
pub mod test_utils;

pub use error::{Result, StrataError};
pub use model::{CanonicalId, GraphNode, GraphEdge, RenameRecord, ParentRename, ParentSnapshot};
pub use naming::{bump_name, nth_name, parse_name};
pub use random::RandomSource;
pub use graph::{AdjacencyView, Graph};
pub use generator::{GeneratorConfig, generate};
pub use layering::{Alias, DuplicateLayering, ForcedPlacement, KahnLayering, Layering, LayeringStrategy, StrategyKind};
pub use transform::{LayerPass, RenameStep, TransformReport, transform_layers, transform_layers_observed};
pub use history::{LineageReport, NodeLineage, lineage_report};
pub use analysis::{GraphMetrics, dependency_cycles, dependency_path, metrics};
pub use snapshot::{GraphSnapshot, NodeState, load_snapshot, save_snapshot};
