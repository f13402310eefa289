//! Layout seam for graph renderers.
//!
//! # Responsibility
//! - Define the `GraphLayout` contract consumed by render shells.
//! - Provide a deterministic Fruchterman-Reingold implementation.
//!
//! # Invariants
//! - Every graph node gets exactly one position, in graph node order.
//! - Positions stay inside `[0, width] x [0, height]`.
//! - Isolated nodes do not take part in the simulation; they are placed on
//!   an outer ring and keep their `isolated` flag.

use crate::graph::link_graph::LinkGraph;
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::TAU;

const MIN_DISTANCE: f64 = 0.01;
const INNER_RING_FACTOR: f64 = 0.25;
const OUTER_RING_FACTOR: f64 = 0.45;

/// Tuning knobs for force-directed layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub iterations: u32,
    /// Multiplier on the node-node repulsive force.
    pub repulsion: f64,
    /// Multiplier on the edge spring force.
    pub attraction: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            repulsion: 1.0,
            attraction: 1.0,
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// Placed node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub isolated: bool,
}

/// Strategy turning a link graph into node coordinates.
pub trait GraphLayout {
    fn layout(&self, graph: &LinkGraph) -> Vec<NodePosition>;
}

/// Classic Fruchterman-Reingold spring embedder with linear cooling.
#[derive(Debug, Clone, Default)]
pub struct FruchtermanReingold {
    config: LayoutConfig,
}

impl FruchtermanReingold {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn center(&self) -> (f64, f64) {
        (self.config.width / 2.0, self.config.height / 2.0)
    }

    fn ring(&self, factor: f64, index: usize, count: usize) -> (f64, f64) {
        let (cx, cy) = self.center();
        let radius = self.config.width.min(self.config.height) * factor;
        let angle = TAU * index as f64 / count.max(1) as f64;
        (cx + radius * angle.cos(), cy + radius * angle.sin())
    }

    fn clamp(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            x.clamp(0.0, self.config.width.max(0.0)),
            y.clamp(0.0, self.config.height.max(0.0)),
        )
    }

    fn simulate(&self, positions: &mut [(f64, f64)], springs: &[(usize, usize)]) {
        let count = positions.len();
        if count == 0 {
            return;
        }

        let area = (self.config.width * self.config.height).max(1.0);
        let k = (area / count as f64).sqrt();
        let initial_temperature = self.config.width.min(self.config.height) / 10.0;
        let iterations = self.config.iterations;

        for step in 0..iterations {
            let cooling = 1.0 - f64::from(step) / f64::from(iterations);
            let temperature = initial_temperature * cooling;
            let mut displacement = vec![(0.0_f64, 0.0_f64); count];

            for u in 0..count {
                for v in 0..count {
                    if u == v {
                        continue;
                    }
                    let (dx, dy, distance) = separation(positions[u], positions[v], u, v);
                    let force = self.config.repulsion * k * k / distance;
                    displacement[u].0 += dx / distance * force;
                    displacement[u].1 += dy / distance * force;
                }
            }

            for &(source, target) in springs {
                let (dx, dy, distance) =
                    separation(positions[source], positions[target], source, target);
                let force = self.config.attraction * distance * distance / k;
                displacement[source].0 -= dx / distance * force;
                displacement[source].1 -= dy / distance * force;
                displacement[target].0 += dx / distance * force;
                displacement[target].1 += dy / distance * force;
            }

            for (position, (dx, dy)) in positions.iter_mut().zip(displacement) {
                let length = (dx * dx + dy * dy).sqrt();
                if length < f64::EPSILON {
                    continue;
                }
                let step_length = length.min(temperature);
                let moved = (
                    position.0 + dx / length * step_length,
                    position.1 + dy / length * step_length,
                );
                *position = self.clamp(moved);
            }
        }
    }
}

impl GraphLayout for FruchtermanReingold {
    fn layout(&self, graph: &LinkGraph) -> Vec<NodePosition> {
        let nodes = graph.nodes();
        let connected: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].isolated).collect();
        let isolated: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].isolated).collect();

        let slot_by_name: HashMap<&str, usize> = connected
            .iter()
            .enumerate()
            .map(|(slot, &index)| (nodes[index].name.as_str(), slot))
            .collect();
        // Self-loops carry no spring force.
        let springs: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = *slot_by_name.get(edge.source.as_str())?;
                let target = *slot_by_name.get(edge.target.as_str())?;
                (source != target).then_some((source, target))
            })
            .collect();

        let mut simulated: Vec<(f64, f64)> = (0..connected.len())
            .map(|slot| self.clamp(self.ring(INNER_RING_FACTOR, slot, connected.len())))
            .collect();
        self.simulate(&mut simulated, &springs);

        let mut placed = vec![(0.0, 0.0); nodes.len()];
        for (slot, &index) in connected.iter().enumerate() {
            placed[index] = simulated[slot];
        }
        for (slot, &index) in isolated.iter().enumerate() {
            placed[index] = self.clamp(self.ring(OUTER_RING_FACTOR, slot, isolated.len()));
        }

        nodes
            .iter()
            .zip(placed)
            .map(|(node, (x, y))| NodePosition {
                name: node.name.clone(),
                x,
                y,
                isolated: node.isolated,
            })
            .collect()
    }
}

/// Vector from `b` to `a` and its length, never zero.
///
/// Coincident points are pushed apart along a direction derived from the
/// indices so the result stays deterministic.
fn separation(a: (f64, f64), b: (f64, f64), a_index: usize, b_index: usize) -> (f64, f64, f64) {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance >= MIN_DISTANCE {
        return (dx, dy, distance);
    }
    let angle = TAU * (a_index as f64 - b_index as f64) / 7.0;
    (
        MIN_DISTANCE * angle.cos(),
        MIN_DISTANCE * angle.sin(),
        MIN_DISTANCE,
    )
}

#[cfg(test)]
mod tests {
    use super::{FruchtermanReingold, GraphLayout, LayoutConfig};
    use crate::graph::link_graph::build_link_graph;
    use crate::model::note::Note;

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::new("hub", "[[a]] [[b]] [[c]]"),
            Note::new("a", "[[b]]"),
            Note::new("b", ""),
            Note::new("c", "[[hub]]"),
            Note::new("lonely", "[[nowhere]]"),
            Note::new("quiet", "no links"),
        ]
    }

    #[test]
    fn every_node_is_placed_once_inside_bounds() {
        let graph = build_link_graph(&sample_notes());
        let config = LayoutConfig {
            width: 400.0,
            height: 300.0,
            ..LayoutConfig::default()
        };
        let positions = FruchtermanReingold::new(config).layout(&graph);

        let names: Vec<&str> = positions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["hub", "a", "b", "c", "lonely", "quiet"]);
        for position in &positions {
            assert!((0.0..=400.0).contains(&position.x), "{position:?}");
            assert!((0.0..=300.0).contains(&position.y), "{position:?}");
            assert!(position.x.is_finite() && position.y.is_finite());
        }
    }

    #[test]
    fn isolated_nodes_sit_on_outer_ring() {
        let graph = build_link_graph(&sample_notes());
        let layout = FruchtermanReingold::default();
        let positions = layout.layout(&graph);

        let (cx, cy) = (500.0, 500.0);
        for position in positions.iter().filter(|p| p.isolated) {
            let radius = ((position.x - cx).powi(2) + (position.y - cy).powi(2)).sqrt();
            assert!((radius - 450.0).abs() < 1e-6, "{position:?}");
        }
        assert_eq!(positions.iter().filter(|p| p.isolated).count(), 2);
    }

    #[test]
    fn layout_is_deterministic() {
        let graph = build_link_graph(&sample_notes());
        let layout = FruchtermanReingold::default();
        assert_eq!(layout.layout(&graph), layout.layout(&graph));
    }

    #[test]
    fn zero_iterations_keeps_seed_ring() {
        let graph = build_link_graph(&[Note::new("a", "[[b]]"), Note::new("b", "")]);
        let layout = FruchtermanReingold::new(LayoutConfig {
            iterations: 0,
            ..LayoutConfig::default()
        });
        let positions = layout.layout(&graph);
        assert_eq!(positions[0].x, 750.0);
        assert_eq!(positions[0].y, 500.0);
    }
}
