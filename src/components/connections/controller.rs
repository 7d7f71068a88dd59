//! Interaction controller.
//!
//! Every user-facing operation goes through [`GraphController`]: it mutates
//! the shared [`ConnectionsState`], restarts the idle timer and reports
//! selection changes to the host. State borrows are always released before the
//! host callback runs.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::debug;

use super::idle::{IdleTimer, Scheduler};
use super::model::DataPoint;
use super::state::{ConnectionsState, Release};

/// Receives the selected node, or `None` when the selection is cleared.
pub type SelectionHandler = Rc<dyn Fn(Option<DataPoint>)>;

/// Drives one mounted graph view.
pub struct GraphController<S: Scheduler> {
	state: Rc<RefCell<ConnectionsState>>,
	idle: RefCell<IdleTimer<S>>,
	notify: SelectionHandler,
}

impl<S: Scheduler> GraphController<S> {
	/// Wire a controller around `state`. The idle timer starts on the first
	/// interaction; when it expires the view recenters and the selection is
	/// cleared.
	pub fn new(
		state: Rc<RefCell<ConnectionsState>>,
		scheduler: S,
		idle_delay: Duration,
		notify: SelectionHandler,
	) -> Self {
		let mut idle = IdleTimer::new(scheduler, idle_delay);
		let (state_idle, notify_idle) = (state.clone(), notify.clone());
		idle.on_timeout(move || {
			{
				let mut s = state_idle.borrow_mut();
				s.recenter();
				s.clear_selection();
			}
			notify_idle(None);
		});

		Self {
			state,
			idle: RefCell::new(idle),
			notify,
		}
	}

	/// Shared view state.
	pub fn state(&self) -> &Rc<RefCell<ConnectionsState>> {
		&self.state
	}

	/// Restart the inactivity countdown.
	pub fn touch(&self) {
		self.idle.borrow_mut().reset();
	}

	/// Zoom in by the configured factor.
	pub fn zoom_in(&self) {
		debug!("connections: zoom in");
		self.state.borrow_mut().zoom_in();
		self.touch();
	}

	/// Zoom out by the configured factor.
	pub fn zoom_out(&self) {
		debug!("connections: zoom out");
		self.state.borrow_mut().zoom_out();
		self.touch();
	}

	/// Return to the recenter scale with the layout centered.
	pub fn recenter(&self) {
		debug!("connections: recenter");
		self.state.borrow_mut().recenter();
		self.touch();
	}

	/// Center and select the contribution called `name`. Unknown names only
	/// restart the idle timer.
	pub fn pan_to_contribution(&self, name: &str) {
		let selected = self.state.borrow_mut().pan_to_contribution(name);
		self.touch();
		match selected {
			Some(node) => {
				debug!("connections: panned to {}", node.id());
				(self.notify)(Some(node));
			}
			None => debug!("connections: no contribution named {:?}", name),
		}
	}

	/// Select model node `point` and report it.
	pub fn select(&self, point: usize) {
		let selected = self.state.borrow_mut().select(point);
		self.touch();
		if let Some(node) = selected {
			debug!("connections: selected {}", node.id());
			(self.notify)(Some(node));
		}
	}

	/// Pointer pressed at a screen point.
	pub fn press(&self, sx: f64, sy: f64) {
		self.state.borrow_mut().press(sx, sy);
	}

	/// Pointer moved; pans while pressed.
	pub fn drag(&self, sx: f64, sy: f64) {
		self.state.borrow_mut().drag(sx, sy);
	}

	/// Finish a press: clicks select, pans restart the idle timer.
	pub fn release(&self, sx: f64, sy: f64) {
		let outcome = self.state.borrow_mut().release(sx, sy);
		match outcome {
			Release::Click(point) => self.select(point),
			Release::Panned => self.touch(),
			Release::None => {}
		}
	}

	/// Abandon an in-progress gesture. A pan that already moved still counts
	/// as interaction.
	pub fn cancel(&self) {
		let moved = {
			let mut s = self.state.borrow_mut();
			let moved = s.pointer.moved;
			s.cancel_pointer();
			moved
		};
		if moved {
			self.touch();
		}
	}

	/// Wheel zoom about the pointer.
	pub fn wheel(&self, delta_y: f64, delta_mode: u32, sx: f64, sy: f64) {
		self.state.borrow_mut().wheel(delta_y, delta_mode, sx, sy);
		self.touch();
	}

	/// Double-click zoom about the pointer.
	pub fn double_click(&self, sx: f64, sy: f64, shift: bool) {
		self.state.borrow_mut().double_click(sx, sy, shift);
		self.touch();
	}
}
