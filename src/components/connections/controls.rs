//! Control handle handed to the host UI.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use super::controller::GraphController;
use super::idle::BrowserScheduler;

/// Zoom, recenter and pan-to-node controls for a mounted graph.
///
/// Create one in the host, pass it to the graph component, and call it from
/// buttons or search boxes. Clones share the same target. Calls made before
/// the graph mounts are ignored.
#[derive(Clone, Default)]
pub struct ConnectionsControls {
	target: Rc<RefCell<Option<Rc<GraphController<BrowserScheduler>>>>>,
}

impl ConnectionsControls {
	/// A handle not yet attached to any graph.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn attach(&self, controller: Rc<GraphController<BrowserScheduler>>) {
		*self.target.borrow_mut() = Some(controller);
	}

	/// Whether a graph has mounted with this handle.
	pub fn is_attached(&self) -> bool {
		self.target.borrow().is_some()
	}

	fn with(&self, op: &str, f: impl FnOnce(&GraphController<BrowserScheduler>)) {
		// Clone out so the handle is not borrowed while the controller runs.
		let controller = self.target.borrow().clone();
		match controller {
			Some(c) => f(&c),
			None => debug!("connections: {} ignored, graph not mounted", op),
		}
	}

	/// Zoom in by the configured factor (1.3 by default).
	pub fn zoom_in(&self) {
		self.with("zoom_in", |c| c.zoom_in());
	}

	/// Zoom out by the configured factor (0.7 by default).
	pub fn zoom_out(&self) {
		self.with("zoom_out", |c| c.zoom_out());
	}

	/// Return to 50% scale with the layout centered.
	pub fn recenter(&self) {
		self.with("recenter", |c| c.recenter());
	}

	/// Center and select the contribution called `name`.
	pub fn pan_to_contribution(&self, name: &str) {
		self.with("pan_to_contribution", |c| c.pan_to_contribution(name));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unattached_controls_are_noops() {
		let controls = ConnectionsControls::new();
		assert!(!controls.is_attached());
		controls.zoom_in();
		controls.zoom_out();
		controls.recenter();
		controls.pan_to_contribution("Radar");
		assert!(!controls.clone().is_attached());
	}
}
