//! Force-directed layout.
//!
//! Wraps the `force_graph` physics engine (charge repulsion plus link springs)
//! and adds the forces it lacks: a centering force that keeps the mean of all
//! nodes on the layout center, collision separation with a fixed radius, and
//! a cooling schedule that winds the simulation down and stops it.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::model::{GraphModel, NodeId};
use super::style::StyleConfig;
use crate::config::SimulationConfig;

/// Per-node metadata attached to each simulated node.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Index into [`GraphModel::nodes`].
	pub point: usize,
	/// Drawn and hit-tested radius in world units.
	pub radius: f64,
}

/// Physics state for one graph.
pub struct LayoutSimulation {
	/// Underlying physics graph.
	pub graph: ForceGraph<NodeInfo, ()>,
	config: SimulationConfig,
	center: (f64, f64),
	alpha: f64,
	/// Simulation index for each model node, aligned with [`GraphModel::nodes`].
	indices: Vec<DefaultNodeIdx>,
}

impl LayoutSimulation {
	/// Seed every model node around `center` and connect the links.
	pub fn new(
		model: &GraphModel,
		config: &SimulationConfig,
		style: &StyleConfig,
		center: (f64, f64),
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: config.charge,
			force_spring: config.spring,
			force_max: config.max_force,
			node_speed: config.node_speed,
			damping_factor: config.damping,
		});
		let center = config.center.unwrap_or(center);
		let mut id_to_idx: HashMap<NodeId, DefaultNodeIdx> = HashMap::new();
		let mut indices = Vec::with_capacity(model.nodes().len());

		for (i, point) in model.nodes().iter().enumerate() {
			let (x, y) = initial_position(i, center);
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: config.mass,
				is_anchor: false,
				user_data: NodeInfo {
					point: i,
					radius: style.for_kind(point.kind()).radius(),
				},
			});
			id_to_idx.insert(point.id(), idx);
			indices.push(idx);
		}

		for link in model.links() {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		debug!(
			"connections: simulation seeded with {} nodes around ({:.0}, {:.0})",
			indices.len(),
			center.0,
			center.1
		);

		Self {
			graph,
			config: config.clone(),
			center,
			alpha: 1.0,
			indices,
		}
	}

	/// Point the centering force pulls towards.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Whether the layout is still cooling.
	pub fn is_running(&self) -> bool {
		self.alpha >= self.config.alpha_min
	}

	/// Restart cooling from full temperature.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
	}

	/// Move the layout center, e.g. after the container was resized.
	pub fn set_center(&mut self, center: (f64, f64)) {
		if self.config.center.is_none() {
			self.center = center;
			self.reheat();
		}
	}

	/// Simulation index of model node `point`.
	pub fn index_of(&self, point: usize) -> Option<DefaultNodeIdx> {
		self.indices.get(point).copied()
	}

	/// Current world position of model node `point`.
	pub fn position(&self, point: usize) -> Option<(f64, f64)> {
		let idx = self.index_of(point)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// Topmost model node whose disc contains world point `(wx, wy)`.
	pub fn node_at(&self, wx: f64, wy: f64) -> Option<usize> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - wx, node.y() as f64 - wy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius {
				found = Some(node.data.user_data.point);
			}
		});
		found
	}

	/// Advance one step. Returns whether the simulation is still running.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.is_running() {
			return false;
		}
		self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
		self.graph.update(dt * self.alpha as f32);
		self.separate_collisions();
		self.apply_centering();
		self.is_running()
	}

	fn apply_centering(&mut self) {
		let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
		self.graph.visit_nodes(|node| {
			sx += node.x() as f64;
			sy += node.y() as f64;
			n += 1;
		});
		if n == 0 {
			return;
		}
		let (dx, dy) = (
			(self.center.0 - sx / n as f64) as f32,
			(self.center.1 - sy / n as f64) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			node.data.x += dx;
			node.data.y += dy;
		});
	}

	fn separate_collisions(&mut self) {
		let mut nodes: Vec<(DefaultNodeIdx, f64, f64)> = Vec::with_capacity(self.indices.len());
		self.graph.visit_nodes(|node| {
			nodes.push((node.index(), node.x() as f64, node.y() as f64));
		});

		let min_dist = self.config.collide_radius * 2.0;
		let mut shift: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
		for (i, &(a, ax, ay)) in nodes.iter().enumerate() {
			for &(b, bx, by) in &nodes[i + 1..] {
				let (mut dx, mut dy) = (bx - ax, by - ay);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist {
					continue;
				}
				if dist < 1e-6 {
					// Coincident nodes: split them along a deterministic direction.
					let angle = (i as f64) * PI * (3.0 - 5f64.sqrt());
					(dx, dy, dist) = (angle.cos() * 1e-3, angle.sin() * 1e-3, 1e-3);
				}
				let push = (min_dist - dist) / dist * self.config.collide_strength * 0.5;
				let (px, py) = (dx * push, dy * push);
				let sa = shift.entry(a).or_insert((0.0, 0.0));
				sa.0 -= px;
				sa.1 -= py;
				let sb = shift.entry(b).or_insert((0.0, 0.0));
				sb.0 += px;
				sb.1 += py;
			}
		}

		if shift.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(sx, sy)) = shift.get(&node.index()) {
				node.data.x += sx as f32;
				node.data.y += sy as f32;
			}
		});
	}
}

/// Phyllotaxis spiral around `center`, so initial positions never coincide.
fn initial_position(i: usize, (cx, cy): (f64, f64)) -> (f64, f64) {
	let radius = 10.0 * (0.5 + i as f64).sqrt();
	let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
	(cx + radius * angle.cos(), cy + radius * angle.sin())
}
