//! Graph view state and interaction tracking.
//!
//! Combines the graph model, the layout simulation, the pan/zoom viewport,
//! the current selection and in-progress pointer gestures. Created once when
//! the component mounts, then mutated by the animation loop and event
//! handlers.

use std::time::Duration;

use super::model::{DataPoint, GraphModel, Link, is_incident};
use super::simulation::LayoutSimulation;
use super::style::StyleConfig;
use super::view::Viewport;
use crate::config::ConnectionsConfig;

/// Tracks a press that may turn into a click or a pan.
#[derive(Clone, Debug, Default)]
pub struct PointerState {
	/// A press is in progress.
	pub active: bool,
	/// Screen point where the press started.
	pub start_x: f64,
	/// Vertical counterpart of `start_x`.
	pub start_y: f64,
	/// Last pointer position seen while pressed.
	pub last_x: f64,
	/// Vertical counterpart of `last_x`.
	pub last_y: f64,
	/// Set once the pointer travelled beyond the click tolerance.
	pub moved: bool,
	/// Node under the pointer when the press started.
	pub pressed: Option<usize>,
}

/// Outcome of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
	/// Press and release on the same node without dragging.
	Click(usize),
	/// The view was panned.
	Panned,
	/// Nothing happened (e.g. click on empty background).
	None,
}

/// Core graph state combining the physics simulation with view and selection tracking.
pub struct ConnectionsState {
	/// Nodes and links being shown.
	pub model: GraphModel,
	/// Layout physics.
	pub sim: LayoutSimulation,
	/// Pan and zoom.
	pub viewport: Viewport,
	/// Visual encoding.
	pub style: StyleConfig,
	/// In-progress press, if any.
	pub pointer: PointerState,
	/// Model node under the pointer.
	pub hovered: Option<usize>,
	selected: Option<usize>,
}

impl ConnectionsState {
	/// Lay out `model` in a `width` by `height` container.
	pub fn new(model: GraphModel, config: &ConnectionsConfig, width: f64, height: f64) -> Self {
		let sim = LayoutSimulation::new(
			&model,
			&config.simulation,
			&config.style,
			(width / 2.0, height / 2.0),
		);
		Self {
			model,
			sim,
			viewport: Viewport::new(config.zoom.clone(), width, height),
			style: config.style.clone(),
			pointer: PointerState::default(),
			hovered: None,
			selected: None,
		}
	}

	/// Advance the simulation and any view transition by `dt`.
	pub fn tick(&mut self, dt: Duration) {
		self.sim.tick(dt.as_secs_f32());
		self.viewport.tick(dt);
	}

	/// Follow a container resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		self.sim.set_center((width / 2.0, height / 2.0));
	}

	/// Model node under screen point `(sx, sy)`.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (wx, wy) = self.viewport.transform().screen_to_world(sx, sy);
		self.sim.node_at(wx, wy)
	}

	/// The selected node, if any.
	pub fn selected(&self) -> Option<&DataPoint> {
		self.selected.map(|i| &self.model.nodes()[i])
	}

	/// Select model node `point`, returning a copy for the host callback.
	pub fn select(&mut self, point: usize) -> Option<DataPoint> {
		let node = self.model.nodes().get(point)?.clone();
		self.selected = Some(point);
		Some(node)
	}

	/// Deselect, removing every link highlight.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Whether `link` touches the selected node.
	pub fn is_link_highlighted(&self, link: &Link) -> bool {
		self.selected()
			.is_some_and(|node| is_incident(&node.id(), link))
	}

	/// Whether the edge between model nodes `a` and `b` touches the selected node.
	pub fn is_edge_highlighted(&self, a: usize, b: usize) -> bool {
		self.selected.is_some_and(|s| s == a || s == b)
	}

	/// Animated zoom in about the viewport center.
	pub fn zoom_in(&mut self) {
		let factor = self.viewport.zoom_config().zoom_in_factor;
		self.viewport.scale_by(factor);
	}

	/// Animated zoom out about the viewport center.
	pub fn zoom_out(&mut self) {
		let factor = self.viewport.zoom_config().zoom_out_factor;
		self.viewport.scale_by(factor);
	}

	/// Ease back to the recenter scale with the layout center mid-screen.
	///
	/// The layout center follows the container, so it is mapped to the
	/// container center rather than resetting the translation to the origin.
	pub fn recenter(&mut self) {
		let (cx, cy) = self.sim.center();
		let k = self.viewport.zoom_config().recenter_scale;
		self.viewport.center_on(cx, cy, k);
	}

	/// Center the contribution node called `name` at the pan scale (1.0 by
	/// default) and select it.
	///
	/// Unknown names leave the view and selection untouched.
	pub fn pan_to_contribution(&mut self, name: &str) -> Option<DataPoint> {
		let point = self.model.find_contribution(name)?;
		if let Some((x, y)) = self.sim.position(point) {
			let k = self.viewport.zoom_config().pan_scale;
			self.viewport.center_on(x, y, k);
		}
		self.select(point)
	}

	/// Start a press at screen point `(sx, sy)`.
	pub fn press(&mut self, sx: f64, sy: f64) {
		self.pointer = PointerState {
			active: true,
			start_x: sx,
			start_y: sy,
			last_x: sx,
			last_y: sy,
			moved: false,
			pressed: self.node_at_position(sx, sy),
		};
	}

	/// Pointer moved to `(sx, sy)`. Pans while pressed; returns whether the view moved.
	pub fn drag(&mut self, sx: f64, sy: f64) -> bool {
		if !self.pointer.active {
			self.hovered = self.node_at_position(sx, sy);
			return false;
		}
		let tolerance = self.viewport.zoom_config().click_tolerance;
		let (tx, ty) = (sx - self.pointer.start_x, sy - self.pointer.start_y);
		if !self.pointer.moved && (tx * tx + ty * ty).sqrt() <= tolerance {
			return false;
		}
		self.pointer.moved = true;
		self.viewport
			.pan_by(sx - self.pointer.last_x, sy - self.pointer.last_y);
		self.pointer.last_x = sx;
		self.pointer.last_y = sy;
		true
	}

	/// Finish the press at `(sx, sy)`.
	pub fn release(&mut self, sx: f64, sy: f64) -> Release {
		let pointer = std::mem::take(&mut self.pointer);
		if !pointer.active {
			return Release::None;
		}
		if pointer.moved {
			return Release::Panned;
		}
		match (pointer.pressed, self.node_at_position(sx, sy)) {
			(Some(a), Some(b)) if a == b => Release::Click(a),
			_ => Release::None,
		}
	}

	/// Abandon any press, e.g. when the pointer leaves the canvas.
	pub fn cancel_pointer(&mut self) {
		self.pointer = PointerState::default();
		self.hovered = None;
	}

	/// Wheel zoom about the pointer. `delta_mode` follows `WheelEvent.deltaMode`.
	pub fn wheel(&mut self, delta_y: f64, delta_mode: u32, sx: f64, sy: f64) {
		let scale = if delta_mode == 1 { 0.05 } else { 0.002 };
		let factor = 2f64.powf(-delta_y * scale);
		self.viewport.zoom_at(factor, sx, sy);
	}

	/// Double-click zoom about the pointer: in by 2, or out by 2 with shift held.
	pub fn double_click(&mut self, sx: f64, sy: f64, shift: bool) {
		let current = self.viewport.target();
		let k = current.k * if shift { 0.5 } else { 2.0 };
		let k = self.viewport.zoom_config().clamp(k);
		self.viewport.animate_to(current.rescaled_about(k, sx, sy));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::connections::model::{MergePolicy, NodeId};
	use crate::components::connections::types::{Contribution, ContributionName, Contributor};
	use crate::components::connections::view::ViewTransform;

	fn records() -> Vec<ContributionName> {
		let person = |name: &str| Contribution {
			contributor: Contributor {
				name: name.into(),
				image: None,
			},
		};
		vec![
			ContributionName {
				name: "Radar".into(),
				image: None,
				contribution: vec![person("Jane"), person("Ada")],
			},
			ContributionName {
				name: "Sonar".into(),
				image: None,
				contribution: vec![person("Ada"), person("Grace")],
			},
		]
	}

	fn state() -> ConnectionsState {
		let model = GraphModel::build(&records(), MergePolicy::default()).unwrap();
		ConnectionsState::new(model, &ConnectionsConfig::default(), 800.0, 600.0)
	}

	fn settle(state: &mut ConnectionsState) {
		state.viewport.tick(Duration::from_secs(1));
	}

	fn highlighted(state: &ConnectionsState) -> Vec<bool> {
		state
			.model
			.links()
			.iter()
			.map(|l| state.is_link_highlighted(l))
			.collect()
	}

	#[test]
	fn selection_highlights_exactly_incident_links() {
		let mut state = state();
		assert_eq!(highlighted(&state), vec![false; 4]);

		let ada = state.model.index_of(&NodeId::contributor("Ada")).unwrap();
		state.select(ada);
		// Links: Jane-Radar, Ada-Radar, Ada-Sonar, Grace-Sonar
		assert_eq!(highlighted(&state), vec![false, true, true, false]);

		let sonar = state.model.find_contribution("Sonar").unwrap();
		state.select(sonar);
		assert_eq!(highlighted(&state), vec![false, false, true, true]);

		state.clear_selection();
		assert_eq!(highlighted(&state), vec![false; 4]);
	}

	#[test]
	fn edge_highlight_agrees_with_link_highlight() {
		let mut state = state();
		let radar = state.model.find_contribution("Radar").unwrap();
		state.select(radar);
		for link in state.model.links() {
			let a = state.model.index_of(&link.source).unwrap();
			let b = state.model.index_of(&link.target).unwrap();
			assert_eq!(state.is_edge_highlighted(a, b), state.is_link_highlighted(link));
		}
	}

	#[test]
	fn pan_to_unknown_name_changes_nothing() {
		let mut state = state();
		let before = state.viewport.target();
		assert!(state.pan_to_contribution("Lidar").is_none());
		assert_eq!(state.viewport.target(), before);
		assert!(!state.viewport.is_animating());
		assert!(state.selected().is_none());
	}

	#[test]
	fn pan_to_known_name_centers_and_selects() {
		let mut state = state();
		state.zoom_in();
		let selected = state.pan_to_contribution("Sonar").unwrap();
		assert_eq!(selected.name(), "Sonar");
		assert_eq!(state.selected().map(DataPoint::name), Some("Sonar"));

		settle(&mut state);
		let sonar = state.model.find_contribution("Sonar").unwrap();
		let (x, y) = state.sim.position(sonar).unwrap();
		let (sx, sy) = state.viewport.transform().world_to_screen(x, y);
		assert!((sx - 400.0).abs() < 1e-6);
		assert!((sy - 300.0).abs() < 1e-6);
		assert_eq!(state.viewport.transform().k, 1.0, "pan resets to unit scale");
	}

	#[test]
	fn recenter_resets_to_half_scale() {
		let mut state = state();
		state.zoom_in();
		state.zoom_in();
		state.recenter();
		settle(&mut state);
		let t = state.viewport.transform();
		assert_eq!(t.k, 0.5);
		let (cx, cy) = state.sim.center();
		assert_eq!(t.world_to_screen(cx, cy), (400.0, 300.0));
	}

	#[test]
	fn press_and_release_on_node_is_a_click() {
		let mut state = state();
		let radar = state.model.find_contribution("Radar").unwrap();
		let (x, y) = state.sim.position(radar).unwrap();
		let (sx, sy) = state.viewport.transform().world_to_screen(x, y);
		let hit = state.node_at_position(sx, sy).unwrap();

		state.press(sx, sy);
		assert!(!state.drag(sx + 1.0, sy + 1.0), "within tolerance");
		assert_eq!(state.release(sx, sy), Release::Click(hit));
	}

	#[test]
	fn dragging_pans_instead_of_clicking() {
		let mut state = state();
		state.press(10.0, 10.0);
		assert!(state.drag(60.0, 30.0));
		assert_eq!(
			state.viewport.transform(),
			ViewTransform {
				x: 50.0,
				y: 20.0,
				k: 1.0
			}
		);
		assert_eq!(state.release(60.0, 30.0), Release::Panned);
		assert!(!state.pointer.active);
	}

	#[test]
	fn wheel_and_double_click_zoom() {
		let mut state = state();
		state.wheel(-500.0, 0, 400.0, 300.0);
		assert!((state.viewport.transform().k - 2.0).abs() < 1e-9);

		state.double_click(400.0, 300.0, false);
		settle(&mut state);
		assert_eq!(state.viewport.transform().k, 3.0, "clamped to max scale");

		state.double_click(400.0, 300.0, true);
		settle(&mut state);
		assert_eq!(state.viewport.transform().k, 1.5);
	}
}
