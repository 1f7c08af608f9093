//! Composable execution nodes.
//!
//! A pipeline is a tree of stage nodes built once at startup. `Sequence`
//! children run in order, each one's blackboard writes visible to the
//! next; `Parallel` children run concurrently and must not depend on each
//! other's slots.

use std::sync::Arc;

use crate::unit::WorkUnit;

/// Child indices from the root identifying one node in the tree.
pub type StagePath = Vec<usize>;

/// Render a stage path for logs and error messages.
pub fn format_path(path: &[usize]) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

pub enum StageNode {
    Single(Arc<dyn WorkUnit>),
    Sequence(Vec<StageNode>),
    Parallel(Vec<StageNode>),
}

impl StageNode {
    pub fn single(unit: Arc<dyn WorkUnit>) -> Self {
        Self::Single(unit)
    }

    pub fn sequence(children: Vec<StageNode>) -> Self {
        Self::Sequence(children)
    }

    pub fn parallel(children: Vec<StageNode>) -> Self {
        Self::Parallel(children)
    }

    /// Number of work units in the tree.
    pub fn unit_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequence(children) | Self::Parallel(children) => {
                children.iter().map(StageNode::unit_count).sum()
            }
        }
    }

    /// Names of all work units, in depth-first order.
    pub fn unit_names(&self) -> Vec<String> {
        match self {
            Self::Single(unit) => vec![unit.name().to_string()],
            Self::Sequence(children) | Self::Parallel(children) => {
                children.iter().flat_map(StageNode::unit_names).collect()
            }
        }
    }
}

impl std::fmt::Debug for StageNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(unit) => write!(f, "Single({})", unit.name()),
            Self::Sequence(children) => f.debug_tuple("Sequence").field(children).finish(),
            Self::Parallel(children) => f.debug_tuple("Parallel").field(children).finish(),
        }
    }
}
