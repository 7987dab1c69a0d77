use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::scale;
use super::types::SyntaxGraph;

/// Rest length the link pass pulls connected nodes toward.
pub const LINK_DISTANCE: f64 = 100.0;
/// Per-node collision radius; two nodes closer than twice this are pushed apart.
pub const COLLIDE_RADIUS: f64 = 30.0;

const LINK_STRENGTH: f64 = 0.5;
const COLLIDE_STRENGTH: f64 = 0.7;
const RING_RADIUS: f64 = 60.0;

// alpha decays from 1 to ALPHA_MIN in ~300 ticks
const ALPHA_MIN: f64 = 0.001;
const ALPHA_DECAY: f64 = 0.0228;
const DRAG_ALPHA_TARGET: f64 = 0.3;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub word: String,
	pub role: String,
	pub group: i64,
	pub radius: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub value: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<DefaultNodeIdx>,
}

impl DragState {
	pub fn active(&self) -> bool {
		self.node_idx.is_some()
	}
}

#[derive(Clone, Copy, Debug)]
struct Body {
	x: f64,
	y: f64,
	fixed: bool,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
	alpha: f64,
	alpha_target: f64,
	links: Vec<LinkInfo>,
	dropped_links: usize,
}

impl ForceGraphState {
	pub fn new(data: &SyntaxGraph, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 200.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut links = Vec::new();
		let mut dropped_links = 0;

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = (
				(width / 2.0 + RING_RADIUS * angle.cos()) as f32,
				(height / 2.0 + RING_RADIUS * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					word: node.word.clone(),
					role: node.role.clone(),
					group: node.group,
					radius: scale::node_radius(node.weight),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				(Some(&src), Some(&tgt)) if src == tgt => {
					// force_graph cannot step a self-edge
					warn!("dropping self-link on {}", link.source);
					dropped_links += 1;
				}
				(Some(&src), Some(&tgt)) => {
					graph.add_edge(src, tgt, EdgeData::default());
					links.push(LinkInfo {
						source: src,
						target: tgt,
						value: link.value,
					});
				}
				_ => {
					warn!(
						"dropping link {} -> {}: endpoint not in graph",
						link.source, link.target
					);
					dropped_links += 1;
				}
			}
		}

		Self {
			graph,
			drag: DragState::default(),
			width,
			height,
			alpha: 1.0,
			alpha_target: 0.0,
			links,
			dropped_links,
		}
	}

	pub fn links(&self) -> &[LinkInfo] {
		&self.links
	}

	pub fn dropped_links(&self) -> usize {
		self.dropped_links
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	/// Whether the animation loop should keep ticking.
	pub fn is_active(&self) -> bool {
		self.alpha >= ALPHA_MIN || self.drag.active()
	}

	#[cfg(test)]
	pub fn position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	#[cfg(test)]
	pub fn is_pinned(&self, idx: DefaultNodeIdx) -> bool {
		let mut pinned = false;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pinned = node.data.is_anchor;
			}
		});
		pinned
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<DefaultNodeIdx> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - x, node.y() as f64 - y);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Pins the node under the pointer and reheats the simulation.
	/// Returns false when the pointer is over empty space.
	pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
		let Some(idx) = self.node_at_position(x, y) else {
			return false;
		};
		self.drag.node_idx = Some(idx);
		self.alpha_target = DRAG_ALPHA_TARGET;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = true;
			}
		});
		true
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});
	}

	/// Releases the pin; the layout relaxes and eventually stops.
	pub fn end_drag(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
		self.alpha_target = 0.0;
	}

	pub fn tick(&mut self, dt: f32) {
		if !self.is_active() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		self.graph.update(dt);
		self.apply_constraints();
	}

	/// Link distance, collision and centering on top of the charge/spring
	/// step done by `force_graph`.
	fn apply_constraints(&mut self) {
		let mut index = HashMap::new();
		let mut bodies = Vec::new();
		self.graph.visit_nodes(|node| {
			index.insert(node.index(), bodies.len());
			bodies.push(Body {
				x: node.x() as f64,
				y: node.y() as f64,
				fixed: node.data.is_anchor,
			});
		});
		if bodies.is_empty() {
			return;
		}

		for link in &self.links {
			let (Some(&a), Some(&b)) = (index.get(&link.source), index.get(&link.target)) else {
				continue;
			};
			if a == b {
				continue;
			}
			let (dx, dy) = (bodies[b].x - bodies[a].x, bodies[b].y - bodies[a].y);
			let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
			let shift = (dist - LINK_DISTANCE) / dist * LINK_STRENGTH * self.alpha;
			separate(&mut bodies, a, b, -dx * shift, -dy * shift);
		}

		for a in 0..bodies.len() {
			for b in (a + 1)..bodies.len() {
				let (mut dx, mut dy) = (bodies[b].x - bodies[a].x, bodies[b].y - bodies[a].y);
				if dx == 0.0 && dy == 0.0 {
					dx = 1e-3 * (b - a) as f64;
					dy = 1e-3;
				}
				let dist = (dx * dx + dy * dy).sqrt();
				let min = COLLIDE_RADIUS * 2.0;
				if dist >= min {
					continue;
				}
				let push = (min - dist) / dist * COLLIDE_STRENGTH;
				separate(&mut bodies, a, b, dx * push, dy * push);
			}
		}

		let n = bodies.len() as f64;
		let (mx, my) = bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), body| (sx + body.x, sy + body.y));
		let (cx, cy) = (self.width / 2.0 - mx / n, self.height / 2.0 - my / n);
		for body in bodies.iter_mut().filter(|body| !body.fixed) {
			body.x += cx;
			body.y += cy;
		}

		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&i) = index.get(&node.index()) {
				node.data.x = bodies[i].x as f32;
				node.data.y = bodies[i].y as f32;
			}
		});
	}
}

/// Moves `b` by `(dx, dy)` away from `a`, split between the free bodies.
fn separate(bodies: &mut [Body], a: usize, b: usize, dx: f64, dy: f64) {
	let (share_a, share_b) = match (bodies[a].fixed, bodies[b].fixed) {
		(true, true) => return,
		(true, false) => (0.0, 1.0),
		(false, true) => (1.0, 0.0),
		(false, false) => (0.5, 0.5),
	};
	bodies[a].x -= dx * share_a;
	bodies[a].y -= dy * share_a;
	bodies[b].x += dx * share_b;
	bodies[b].y += dy * share_b;
}
