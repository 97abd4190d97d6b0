//! Multilevel, size-aware force-directed placement.
//!
//! Nodes repel each other in inverse proportion to their distance and edges pull their
//! endpoints together once the boxes stop touching. Each round moves a node along its net force
//! by at most the current temperature, which cools every round.
//!
//! Before relaxing, movable nodes joined by an edge are merged pairwise into coarser levels.
//! The coarsest level is relaxed first; its movement is projected back onto the finer levels,
//! each of which gets a shorter refinement run. Pinned nodes never merge and never move.

use petgraph::visit::EdgeRef;
use tracing::trace;

use super::graph::{LayoutGraph, LayoutNode};

const MIN_DISTANCE: f32 = 0.01;
const MIN_TEMPERATURE: f32 = 0.5;
const OVERLAP_BOOST: f32 = 4.0;
const MAX_LEVELS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    /// Rounds spent on the coarsest level.
    pub iterations: usize,
    /// Rounds spent on each finer level after projection.
    pub refinement_iterations: usize,
    /// Preferred gap between the boxes at either end of an edge.
    pub ideal_edge_length: f32,
    pub repulsion_strength: f32,
    pub attraction_strength: f32,
    /// Temperature multiplier applied after every round.
    pub cooling: f32,
    /// Coarsening stops once a level is this small.
    pub coarsest_size: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iterations: 250,
            refinement_iterations: 80,
            ideal_edge_length: 80.0,
            repulsion_strength: 2.0,
            attraction_strength: 1.0,
            cooling: 0.96,
            coarsest_size: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub levels: usize,
    pub iterations: usize,
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ForceSolver {
    settings: SolverSettings,
}

/// A node reduced to its centre and a bounding radius.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Body {
    x: f32,
    y: f32,
    radius: f32,
    movable: bool,
}

impl Body {
    fn from_node(node: &LayoutNode) -> Self {
        let (w, h) = (node.size.width, node.size.height);
        Self {
            x: node.position.x + w / 2.0,
            y: node.position.y + h / 2.0,
            radius: (w * w + h * h).sqrt() / 2.0,
            movable: !node.pinned,
        }
    }

    fn merged(a: &Body, b: &Body) -> Self {
        Self {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
            radius: (a.radius * a.radius + b.radius * b.radius).sqrt(),
            movable: true,
        }
    }
}

struct Level {
    bodies: Vec<Body>,
    edges: Vec<(usize, usize)>,
}

impl ForceSolver {
    /// Moves every unpinned node of `layout` to its relaxed top-left position.
    pub fn solve(&self, layout: &mut LayoutGraph) -> SolverStats {
        let graph = layout.graph();
        let bodies: Vec<Body> = graph.node_weights().map(Body::from_node).collect();
        let edges: Vec<(usize, usize)> = graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .filter(|(a, b)| a != b)
            .collect();

        let mut stats = SolverStats {
            levels: 0,
            iterations: 0,
            nodes: bodies.len(),
            edges: edges.len(),
        };
        if bodies.is_empty() {
            return stats;
        }

        let (mut levels, parents) = self.coarsen_all(Level { bodies, edges });
        stats.levels = levels.len();

        let initial: Vec<Vec<(f32, f32)>> = levels
            .iter()
            .map(|level| level.bodies.iter().map(|b| (b.x, b.y)).collect())
            .collect();
        let temperature = self.settings.ideal_edge_length * 2.0;

        let coarsest = levels.len() - 1;
        stats.iterations += self.relax(&mut levels[coarsest], self.settings.iterations, temperature);

        for fine in (0..coarsest).rev() {
            let (lower, upper) = levels.split_at_mut(fine + 1);
            let coarse = &upper[0];
            let level = &mut lower[fine];

            for (idx, body) in level.bodies.iter_mut().enumerate() {
                if !body.movable {
                    continue;
                }
                let parent = parents[fine][idx];
                let (start_x, start_y) = initial[fine + 1][parent];
                body.x += coarse.bodies[parent].x - start_x;
                body.y += coarse.bodies[parent].y - start_y;
            }
            stats.iterations +=
                self.relax(level, self.settings.refinement_iterations, temperature / 2.0);
        }

        let graph = layout.graph_mut();
        for (node, body) in graph.node_weights_mut().zip(&levels[0].bodies) {
            if node.pinned {
                continue;
            }
            node.position.x = body.x - node.size.width / 2.0;
            node.position.y = body.y - node.size.height / 2.0;
        }

        trace!(
            "Force layout: {} nodes, {} edges, {} levels, {} rounds",
            stats.nodes, stats.edges, stats.levels, stats.iterations
        );
        stats
    }

    /// Builds the level stack, finest first, with the body-to-coarser-body map of every level
    /// but the last.
    fn coarsen_all(&self, finest: Level) -> (Vec<Level>, Vec<Vec<usize>>) {
        let mut levels = vec![finest];
        let mut parents = Vec::new();

        while levels.len() < MAX_LEVELS {
            let current = &levels[levels.len() - 1];
            if current.bodies.len() <= self.settings.coarsest_size {
                break;
            }
            let Some((coarser, parent)) = coarsen(current) else {
                break;
            };
            levels.push(coarser);
            parents.push(parent);
        }
        (levels, parents)
    }

    fn relax(&self, level: &mut Level, rounds: usize, start_temperature: f32) -> usize {
        let bodies = &mut level.bodies;
        let n = bodies.len();
        if n < 2 || bodies.iter().all(|body| !body.movable) {
            return 0;
        }

        let k = self.settings.ideal_edge_length;
        let mut temperature = start_temperature;
        let mut displacement = vec![(0.0f32, 0.0f32); n];

        for _ in 0..rounds {
            displacement.fill((0.0, 0.0));

            for i in 0..n {
                for j in (i + 1)..n {
                    let (dx, dy, dist) = separation(&bodies[i], &bodies[j], i, j);
                    let mut force = self.settings.repulsion_strength * k * k / dist;
                    if dist < bodies[i].radius + bodies[j].radius {
                        force *= OVERLAP_BOOST;
                    }
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    displacement[i].0 += fx;
                    displacement[i].1 += fy;
                    displacement[j].0 -= fx;
                    displacement[j].1 -= fy;
                }
            }

            for &(a, b) in &level.edges {
                let (dx, dy, dist) = separation(&bodies[a], &bodies[b], a, b);
                let gap = (dist - bodies[a].radius - bodies[b].radius).max(0.0);
                let force = self.settings.attraction_strength * gap * gap / k;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                displacement[a].0 -= fx;
                displacement[a].1 -= fy;
                displacement[b].0 += fx;
                displacement[b].1 += fy;
            }

            for (body, &(dx, dy)) in bodies.iter_mut().zip(&displacement) {
                if !body.movable {
                    continue;
                }
                let length = (dx * dx + dy * dy).sqrt();
                if length > 0.0 {
                    let step = length.min(temperature);
                    body.x += dx / length * step;
                    body.y += dy / length * step;
                }
            }
            temperature = (temperature * self.settings.cooling).max(MIN_TEMPERATURE);
        }
        rounds
    }
}

/// Vector from `b` to `a` and its length. Coincident bodies get a fixed direction derived from
/// their indices so the result does not depend on a random source.
fn separation(a: &Body, b: &Body, i: usize, j: usize) -> (f32, f32, f32) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > MIN_DISTANCE {
        return (dx, dy, dist);
    }
    let angle = (i * 31 + j * 17) as f32;
    (angle.cos() * MIN_DISTANCE, angle.sin() * MIN_DISTANCE, MIN_DISTANCE)
}

/// Merges movable edge endpoints pairwise. `None` if nothing merged or the level barely shrank.
fn coarsen(level: &Level) -> Option<(Level, Vec<usize>)> {
    let n = level.bodies.len();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut bodies = Vec::new();

    for &(a, b) in &level.edges {
        if a == b || parent[a].is_some() || parent[b].is_some() {
            continue;
        }
        let (first, second) = (&level.bodies[a], &level.bodies[b]);
        if !(first.movable && second.movable) {
            continue;
        }
        parent[a] = Some(bodies.len());
        parent[b] = Some(bodies.len());
        bodies.push(Body::merged(first, second));
    }

    if bodies.is_empty() {
        return None;
    }

    let parent: Vec<usize> = parent
        .into_iter()
        .enumerate()
        .map(|(idx, merged)| {
            merged.unwrap_or_else(|| {
                bodies.push(level.bodies[idx]);
                bodies.len() - 1
            })
        })
        .collect();

    if bodies.len() * 20 > n * 19 {
        return None;
    }

    let mut edges: Vec<(usize, usize)> = level
        .edges
        .iter()
        .map(|&(a, b)| (parent[a], parent[b]))
        .filter(|(a, b)| a != b)
        .collect();
    edges.sort_unstable();
    edges.dedup();

    Some((Level { bodies, edges }, parent))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
