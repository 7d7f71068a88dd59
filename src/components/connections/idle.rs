//! Inactivity timeout.
//!
//! [`IdleTimer`] owns at most one pending task on a [`Scheduler`]. Every
//! [`IdleTimer::reset`] cancels the pending task and schedules a fresh one, so
//! the handler only runs once the view has been left alone for the whole
//! delay. Dropping the timer cancels whatever is pending.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::error::{Error, Result};

/// Runs one-shot tasks after a delay.
pub trait Scheduler {
	/// Token identifying a scheduled task.
	type Handle;

	/// Run `task` once after `delay`.
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<Self::Handle>;

	/// Prevent a scheduled task from running. Cancelling a task that already
	/// ran is a no-op.
	fn cancel(&self, handle: Self::Handle);
}

type Handler = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

/// Single cancellable inactivity timer.
pub struct IdleTimer<S: Scheduler> {
	scheduler: S,
	delay: Duration,
	pending: Option<S::Handle>,
	handler: Handler,
}

impl<S: Scheduler> IdleTimer<S> {
	/// Unarmed timer firing `delay` after the last reset.
	pub fn new(scheduler: S, delay: Duration) -> Self {
		Self {
			scheduler,
			delay,
			pending: None,
			handler: Rc::new(RefCell::new(None)),
		}
	}

	/// Replace the handler run when the timer expires.
	pub fn on_timeout(&mut self, handler: impl FnMut() + 'static) {
		*self.handler.borrow_mut() = Some(Box::new(handler));
	}

	/// Cancel the pending timeout, if any, and start a new one.
	pub fn reset(&mut self) {
		self.cancel();
		let handler = self.handler.clone();
		let task = Box::new(move || {
			debug!("connections: idle timeout fired");
			if let Some(h) = handler.borrow_mut().as_mut() {
				h();
			}
		});
		match self.scheduler.schedule(self.delay, task) {
			Ok(handle) => self.pending = Some(handle),
			Err(e) => warn!("connections: failed to arm idle timer: {}", e),
		}
	}

	/// Cancel the pending timeout without scheduling another.
	pub fn cancel(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel(handle);
		}
	}

	/// Whether a timeout was scheduled and not cancelled since.
	pub fn is_armed(&self) -> bool {
		self.pending.is_some()
	}
}

impl<S: Scheduler> Drop for IdleTimer<S> {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// Pending `setTimeout` registration. Holds the closure alive until the
/// timeout fires or is cleared.
pub struct BrowserTimeout {
	id: i32,
	_callback: Closure<dyn FnMut()>,
}

/// [`Scheduler`] backed by `window.setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
	type Handle = BrowserTimeout;

	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<Self::Handle> {
		let window = web_sys::window().ok_or_else(|| Error::Timer("no window".into()))?;
		let callback = Closure::once(task);
		let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		let id = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				callback.as_ref().unchecked_ref(),
				millis,
			)
			.map_err(|e| Error::Timer(format!("{:?}", e)))?;
		Ok(BrowserTimeout {
			id,
			_callback: callback,
		})
	}

	fn cancel(&self, handle: Self::Handle) {
		if let Some(window) = web_sys::window() {
			window.clear_timeout_with_handle(handle.id);
		}
	}
}

/// Deterministic scheduler driven by a virtual clock.
#[cfg(test)]
pub(crate) mod testing {
	use std::cell::{Cell, RefCell};
	use std::rc::Rc;
	use std::time::Duration;

	use super::Scheduler;
	use crate::error::Result;

	struct Task {
		id: u64,
		due: Duration,
		run: Box<dyn FnOnce()>,
	}

	#[derive(Default)]
	struct Clock {
		now: Cell<Duration>,
		next_id: Cell<u64>,
		tasks: RefCell<Vec<Task>>,
	}

	/// Cheap to clone; clones share one clock.
	#[derive(Clone, Default)]
	pub(crate) struct ManualScheduler {
		clock: Rc<Clock>,
	}

	impl ManualScheduler {
		pub(crate) fn pending(&self) -> usize {
			self.clock.tasks.borrow().len()
		}

		/// Move the clock forward, running every task that comes due.
		pub(crate) fn advance(&self, by: Duration) {
			let deadline = self.clock.now.get() + by;
			loop {
				let next = {
					let mut tasks = self.clock.tasks.borrow_mut();
					let due = tasks
						.iter()
						.enumerate()
						.filter(|(_, t)| t.due <= deadline)
						.min_by_key(|(_, t)| t.due)
						.map(|(i, _)| i);
					due.map(|i| tasks.remove(i))
				};
				let Some(task) = next else {
					break;
				};
				self.clock.now.set(task.due);
				(task.run)();
			}
			self.clock.now.set(deadline);
		}
	}

	impl Scheduler for ManualScheduler {
		type Handle = u64;

		fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<u64> {
			let id = self.clock.next_id.get();
			self.clock.next_id.set(id + 1);
			self.clock.tasks.borrow_mut().push(Task {
				id,
				due: self.clock.now.get() + delay,
				run: task,
			});
			Ok(id)
		}

		fn cancel(&self, handle: u64) {
			self.clock.tasks.borrow_mut().retain(|t| t.id != handle);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::testing::ManualScheduler;
	use super::*;

	const THREE_MINUTES: Duration = Duration::from_secs(180);

	fn counting_timer(scheduler: &ManualScheduler) -> (IdleTimer<ManualScheduler>, Rc<Cell<u32>>) {
		let fired = Rc::new(Cell::new(0));
		let mut timer = IdleTimer::new(scheduler.clone(), THREE_MINUTES);
		let counter = fired.clone();
		timer.on_timeout(move || counter.set(counter.get() + 1));
		(timer, fired)
	}

	#[test]
	fn fires_once_after_delay() {
		let scheduler = ManualScheduler::default();
		let (mut timer, fired) = counting_timer(&scheduler);
		timer.reset();

		scheduler.advance(Duration::from_secs(179));
		assert_eq!(fired.get(), 0);
		scheduler.advance(Duration::from_secs(1));
		assert_eq!(fired.get(), 1);
		scheduler.advance(THREE_MINUTES * 2);
		assert_eq!(fired.get(), 1);
	}

	#[test]
	fn reset_postpones_and_keeps_a_single_task() {
		let scheduler = ManualScheduler::default();
		let (mut timer, fired) = counting_timer(&scheduler);

		timer.reset();
		scheduler.advance(Duration::from_secs(120));
		timer.reset();
		timer.reset();
		assert_eq!(scheduler.pending(), 1);

		scheduler.advance(Duration::from_secs(120));
		assert_eq!(fired.get(), 0, "deadline moved by the reset");
		scheduler.advance(Duration::from_secs(60));
		assert_eq!(fired.get(), 1);
	}

	#[test]
	fn never_fires_without_reset() {
		let scheduler = ManualScheduler::default();
		let (timer, fired) = counting_timer(&scheduler);
		scheduler.advance(THREE_MINUTES * 2);
		assert_eq!(fired.get(), 0);
		assert!(!timer.is_armed());
	}

	#[test]
	fn cancel_and_drop_clear_pending_task() {
		let scheduler = ManualScheduler::default();
		let (mut timer, fired) = counting_timer(&scheduler);
		timer.reset();
		timer.cancel();
		assert_eq!(scheduler.pending(), 0);

		timer.reset();
		drop(timer);
		scheduler.advance(THREE_MINUTES);
		assert_eq!(fired.get(), 0);
		assert_eq!(scheduler.pending(), 0);
	}
}
