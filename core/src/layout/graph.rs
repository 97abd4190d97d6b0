//! The throw-away graph one force-directed pass works on.
//!
//! Nodes are the displayed entities plus one small *anchor* node. Entities with no connection
//! get an edge to the anchor so the solver has something to hold them by; without it isolated
//! nodes drift to the origin and pile up there.

use chanman_common::geometry::{Position, Size};
use petgraph::graph::{DiGraph, NodeIndex};
use rand::Rng;

use super::random::random_top_left;
use crate::panel::{EntitiesPanel, Entity};
use crate::store::PositionStore;

pub const ANCHOR_SIZE: Size = Size {
    width: 1.0,
    height: 1.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// `None` for the anchor.
    pub entity: Option<String>,
    pub size: Size,
    /// Top-left corner.
    pub position: Position,
    /// The solver treats the position as given and does not move the node.
    pub pinned: bool,
}

#[derive(Debug)]
pub struct LayoutGraph {
    graph: DiGraph<LayoutNode, ()>,
    anchor: NodeIndex,
    needs_solving: bool,
}

impl LayoutGraph {
    /// Seeds one node per displayed entity and wires the edges.
    ///
    /// New entities are moved to their seed position right away: the remembered one if there
    /// is one, a random in-bounds one otherwise. Entities already on screen are pinned where
    /// they are. Every entity's node handle is refreshed.
    pub fn build<R: Rng>(
        panel: &mut EntitiesPanel,
        remembered: &PositionStore,
        rng: &mut R,
    ) -> Self {
        let area = panel.size();
        let mut graph = DiGraph::new();
        let anchor = graph.add_node(LayoutNode {
            entity: None,
            size: ANCHOR_SIZE,
            position: Position::new(
                rng.random::<f32>() * area.width,
                rng.random::<f32>() * area.height,
            ),
            pinned: false,
        });
        let mut needs_solving = false;

        panel.clear_node_values();
        for entity in panel.entities_mut() {
            let size = entity.size();
            let (position, pinned) = if entity.is_new() {
                let seed = match remembered.get(&entity.name) {
                    Some(known) => (known, true),
                    None => {
                        needs_solving = true;
                        (random_top_left(rng, area, size), false)
                    }
                };
                entity.set_position(seed.0);
                seed
            } else {
                (entity.position(), true)
            };

            let node = graph.add_node(LayoutNode {
                entity: Some(entity.name.clone()),
                size,
                position,
                pinned,
            });
            entity.set_node(Some(node));
        }

        for (from, to) in collect_edges(panel, anchor) {
            graph.add_edge(from, to, ());
        }

        Self {
            graph,
            anchor,
            needs_solving,
        }
    }

    /// True when at least one new entity has no remembered position.
    pub fn needs_solving(&self) -> bool {
        self.needs_solving
    }

    pub fn anchor(&self) -> NodeIndex {
        self.anchor
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&LayoutNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_for(&self, entity: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].entity.as_deref() == Some(entity))
    }

    /// Whether the graph holds an edge from `from`'s node to `to`'s node.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_for(from), self.node_for(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    pub fn is_anchored(&self, entity: &str) -> bool {
        self.node_for(entity)
            .is_some_and(|node| self.graph.contains_edge(self.anchor, node))
    }

    pub fn anchor_edge_count(&self) -> usize {
        self.graph.neighbors(self.anchor).count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn graph(&self) -> &DiGraph<LayoutNode, ()> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut DiGraph<LayoutNode, ()> {
        &mut self.graph
    }

    /// Moves each new, unremembered entity to its solved position, kept inside the panel, then
    /// drops the graph along with every entity's node handle. Returns how many were moved.
    pub fn commit(self, panel: &mut EntitiesPanel, remembered: &PositionStore) -> usize {
        let area = panel.size();
        let mut moved = 0;

        for entity in panel.entities_mut() {
            if !entity.is_new() || remembered.contains(&entity.name) {
                continue;
            }
            let Some(node) = entity.node().and_then(|idx| self.graph.node_weight(idx)) else {
                continue;
            };
            let solved = clamp_into(node.position.truncated(), entity.size(), area);
            entity.set_position(solved);
            moved += 1;
        }

        panel.clear_node_values();
        moved
    }
}

fn collect_edges(panel: &EntitiesPanel, anchor: NodeIndex) -> Vec<(NodeIndex, NodeIndex)> {
    let mut edges = Vec::new();

    for entity in panel.entities() {
        let Some(this_node) = entity.node() else {
            continue;
        };
        let mut was_connected = false;

        for port in entity.ports() {
            for link in port.output_connections() {
                let other = panel.find_known_entity(&link.entity).and_then(Entity::node);
                if let Some(other_node) = other.filter(|&other| other != this_node) {
                    edges.push((this_node, other_node));
                    was_connected = true;
                }
            }
            if !port.input_connections().is_empty() {
                was_connected = true;
            }
        }

        if !was_connected {
            edges.push((anchor, this_node));
        }
    }
    edges
}

fn clamp_into(position: Position, size: Size, area: Size) -> Position {
    Position::new(
        position.x.clamp(0.0, (area.width - size.width).max(0.0)),
        position.y.clamp(0.0, (area.height - size.height).max(0.0)),
    )
}
