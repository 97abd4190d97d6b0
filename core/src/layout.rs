//! # Layout
//!
//! Decides where new entities go after a reconciliation pass. Entities already on screen never
//! move; a new entity goes to its remembered position when the [`PositionStore`] has one.
//! Everything else is placed either at random or by the force-directed solver, depending on the
//! configured [`LayoutStrategy`].

use chanman_common::config::{Config, LayoutStrategy};
use chanman_common::geometry::Position;
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::panel::EntitiesPanel;
use crate::store::PositionStore;

pub mod graph;
pub mod random;
pub mod solver;

pub use graph::{LayoutGraph, LayoutNode};
pub use solver::{ForceSolver, SolverSettings, SolverStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub anchor_edges: usize,
}

/// What one layout pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub force_directed: bool,
    /// Final positions of this pass' new entities.
    pub placed: Vec<(String, Position)>,
    pub graph: Option<GraphSummary>,
    /// `None` when the solver was skipped.
    pub solver: Option<SolverStats>,
}

#[derive(Debug)]
pub struct LayoutEngine {
    strategy: LayoutStrategy,
    rng: StdRng,
    solver: ForceSolver,
    initial_positioning_done: bool,
}

impl LayoutEngine {
    /// A fixed `seed` makes every pass reproducible.
    pub fn new(strategy: LayoutStrategy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            strategy,
            rng,
            solver: ForceSolver::default(),
            initial_positioning_done: false,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.layout, cfg.seed)
    }

    /// Positions the panel's new entities. Node handles are always cleared afterwards.
    pub fn set_entity_positions(
        &mut self,
        panel: &mut EntitiesPanel,
        remembered: &PositionStore,
    ) -> LayoutReport {
        let force_directed = match self.strategy {
            LayoutStrategy::Random => false,
            LayoutStrategy::ForceDirected => true,
            LayoutStrategy::ForceOnce => !self.initial_positioning_done,
        };
        self.initial_positioning_done = true;

        let mut report = LayoutReport {
            force_directed,
            ..LayoutReport::default()
        };

        if force_directed {
            let mut graph = LayoutGraph::build(panel, remembered, &mut self.rng);
            report.graph = Some(GraphSummary {
                nodes: graph.node_count(),
                edges: graph.edge_count(),
                anchor_edges: graph.anchor_edge_count(),
            });
            if graph.needs_solving() {
                report.solver = Some(self.solver.solve(&mut graph));
            } else {
                debug!("Every new entity has a remembered position, skipping the solver");
            }
            graph.commit(panel, remembered);
        } else {
            random::place_new_entities(panel, remembered, &mut self.rng);
            panel.clear_node_values();
        }

        report.placed = panel
            .entities()
            .iter()
            .filter(|entity| entity.is_new())
            .map(|entity| (entity.name.clone(), entity.position()))
            .collect();
        report
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
