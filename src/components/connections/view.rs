//! Pan and zoom transform with animated transitions.
//!
//! Screen coordinates relate to world coordinates by
//! `screen = world * k + (x, y)`. Programmatic changes (zoom buttons,
//! recenter, pan-to-node) ease towards their target; direct manipulation
//! (drag, wheel) applies immediately. Successive programmatic changes compose
//! from the pending target so rapid clicks accumulate.

use std::time::Duration;

use crate::config::ZoomConfig;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No translation, unit scale.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Map a screen point to world coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Map a world point to screen coordinates.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Rescale to `k`, keeping the world point under screen point `(px, py)` fixed.
	pub fn rescaled_about(&self, k: f64, px: f64, py: f64) -> Self {
		let ratio = k / self.k;
		Self {
			x: px - (px - self.x) * ratio,
			y: py - (py - self.y) * ratio,
			k,
		}
	}

	/// Transform at scale `k` that puts world point `(wx, wy)` at screen point `(sx, sy)`.
	pub fn centered_on(wx: f64, wy: f64, k: f64, sx: f64, sy: f64) -> Self {
		Self {
			x: sx - wx * k,
			y: sy - wy * k,
			k,
		}
	}

	fn lerp(&self, other: &Self, t: f64) -> Self {
		Self {
			x: self.x + (other.x - self.x) * t,
			y: self.y + (other.y - self.y) * t,
			k: self.k + (other.k - self.k) * t,
		}
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

#[derive(Clone, Debug)]
struct ZoomTransition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

/// Current transform, any in-flight transition, and the viewport size.
#[derive(Clone, Debug)]
pub struct Viewport {
	transform: ViewTransform,
	transition: Option<ZoomTransition>,
	zoom: ZoomConfig,
	/// Viewport width in pixels.
	pub width: f64,
	/// Viewport height in pixels.
	pub height: f64,
}

impl Viewport {
	/// Identity transform over a `width` by `height` viewport.
	pub fn new(zoom: ZoomConfig, width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::IDENTITY,
			transition: None,
			zoom,
			width,
			height,
		}
	}

	/// Transform to draw with this frame.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Where the view is heading: the transition target, or the current transform.
	pub fn target(&self) -> ViewTransform {
		self.transition
			.as_ref()
			.map(|t| t.to)
			.unwrap_or(self.transform)
	}

	/// Whether a transition is in flight.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Zoom limits and factors.
	pub fn zoom_config(&self) -> &ZoomConfig {
		&self.zoom
	}

	/// Jump to `transform` immediately, cancelling any transition.
	pub fn set(&mut self, transform: ViewTransform) {
		self.transition = None;
		self.transform = ViewTransform {
			k: self.zoom.clamp(transform.k),
			..transform
		};
	}

	/// Ease towards `transform` over the configured transition duration.
	pub fn animate_to(&mut self, transform: ViewTransform) {
		let to = ViewTransform {
			k: self.zoom.clamp(transform.k),
			..transform
		};
		let duration = self.zoom.transition().as_secs_f64();
		if duration <= 0.0 {
			self.set(to);
			return;
		}
		self.transition = Some(ZoomTransition {
			from: self.transform,
			to,
			elapsed: 0.0,
			duration,
		});
	}

	/// Animated zoom by `factor` about the viewport center.
	pub fn scale_by(&mut self, factor: f64) {
		let target = self.target();
		let k = self.zoom.clamp(target.k * factor);
		let next = target.rescaled_about(k, self.width / 2.0, self.height / 2.0);
		self.animate_to(next);
	}

	/// Immediate zoom by `factor` about screen point `(px, py)`.
	pub fn zoom_at(&mut self, factor: f64, px: f64, py: f64) {
		let current = self.transform;
		let k = self.zoom.clamp(current.k * factor);
		self.set(current.rescaled_about(k, px, py));
	}

	/// Immediate translation by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		let current = self.transform;
		self.set(ViewTransform {
			x: current.x + dx,
			y: current.y + dy,
			..current
		});
	}

	/// Animated move that centers world point `(wx, wy)` at scale `k`.
	pub fn center_on(&mut self, wx: f64, wy: f64, k: f64) {
		let k = self.zoom.clamp(k);
		let next = ViewTransform::centered_on(wx, wy, k, self.width / 2.0, self.height / 2.0);
		self.animate_to(next);
	}

	/// Track a new container size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Advance the running transition by `dt`.
	pub fn tick(&mut self, dt: Duration) {
		let Some(transition) = self.transition.as_mut() else {
			return;
		};
		transition.elapsed += dt.as_secs_f64();
		let t = (transition.elapsed / transition.duration).min(1.0);
		self.transform = transition.from.lerp(&transition.to, ease_cubic_in_out(t));
		if t >= 1.0 {
			self.transform = transition.to;
			self.transition = None;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn viewport() -> Viewport {
		Viewport::new(ZoomConfig::default(), 800.0, 600.0)
	}

	fn settle(view: &mut Viewport) {
		view.tick(Duration::from_secs(1));
	}

	#[test]
	fn zoom_in_then_out_is_not_an_inverse() {
		let mut view = viewport();
		view.scale_by(1.3);
		view.scale_by(0.7);
		settle(&mut view);
		assert!((view.transform().k - 0.91).abs() < EPS);
	}

	#[test]
	fn zoom_about_center_keeps_center_fixed() {
		let mut view = viewport();
		let before = view.transform().screen_to_world(400.0, 300.0);
		view.scale_by(1.3);
		settle(&mut view);
		let after = view.transform().screen_to_world(400.0, 300.0);
		assert!((before.0 - after.0).abs() < EPS);
		assert!((before.1 - after.1).abs() < EPS);
	}

	#[test]
	fn scale_is_bounded() {
		let mut view = viewport();
		for _ in 0..20 {
			view.scale_by(1.3);
		}
		assert_eq!(view.target().k, 3.0);
		for _ in 0..40 {
			view.scale_by(0.7);
		}
		assert_eq!(view.target().k, 0.1);
	}

	#[test]
	fn transition_eases_then_lands_on_target() {
		let mut view = viewport();
		view.animate_to(ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		});
		assert_eq!(view.transform(), ViewTransform::IDENTITY);
		assert!(view.is_animating());

		view.tick(Duration::from_millis(125));
		let mid = view.transform();
		assert!((mid.k - 1.5).abs() < EPS, "halfway in time is halfway eased");

		view.tick(Duration::from_millis(200));
		assert!(!view.is_animating());
		assert_eq!(
			view.transform(),
			ViewTransform {
				x: 100.0,
				y: 50.0,
				k: 2.0
			}
		);
	}

	#[test]
	fn direct_manipulation_cancels_transition() {
		let mut view = viewport();
		view.scale_by(2.0);
		view.pan_by(10.0, -5.0);
		assert!(!view.is_animating());
		assert_eq!(view.transform().x, 10.0);
		assert_eq!(view.transform().y, -5.0);
	}

	#[test]
	fn center_on_puts_point_mid_screen() {
		let mut view = viewport();
		view.center_on(120.0, -40.0, 0.5);
		settle(&mut view);
		let (sx, sy) = view.transform().world_to_screen(120.0, -40.0);
		assert!((sx - 400.0).abs() < EPS);
		assert!((sy - 300.0).abs() < EPS);
		assert_eq!(view.transform().k, 0.5);
	}

	#[test]
	fn wheel_zoom_keeps_pointer_anchor() {
		let mut view = viewport();
		let before = view.transform().screen_to_world(100.0, 80.0);
		view.zoom_at(1.5, 100.0, 80.0);
		let after = view.transform().screen_to_world(100.0, 80.0);
		assert!((before.0 - after.0).abs() < EPS);
		assert!((before.1 - after.1).abs() < EPS);
	}
}
