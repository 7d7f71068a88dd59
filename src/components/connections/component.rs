//! Leptos component wrapping the connections graph canvas.
//!
//! The component creates an HTML canvas element and wires mouse, wheel and
//! touch handlers to a [`GraphController`]. An animation loop runs via
//! `requestAnimationFrame`, advancing the simulation and view transitions and
//! redrawing each frame. When the data signal changes the graph is rebuilt
//! in place; the loop and listeners are installed only once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::controller::{GraphController, SelectionHandler};
use super::controls::ConnectionsControls;
use super::idle::BrowserScheduler;
use super::images::ImageCache;
use super::model::{DataPoint, GraphModel, MergePolicy};
use super::render;
use super::state::ConnectionsState;
use super::types::ContributionName;
use crate::config::ConnectionsConfig;

/// Longest frame step fed to the simulation, so a backgrounded tab does not
/// produce one huge jump.
const MAX_FRAME: f64 = 0.05;

type Slot = Rc<RefCell<Option<Rc<GraphController<BrowserScheduler>>>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn build_model(records: &[ContributionName], policy: MergePolicy) -> GraphModel {
	GraphModel::build(records, policy).unwrap_or_else(|e| {
		warn!("connections: {}; falling back to last-wins merge", e);
		GraphModel::build(records, MergePolicy::KeepLast).unwrap_or_default()
	})
}

/// Renders the contributor/contribution graph on a canvas element.
///
/// Pass the records via the reactive `data` signal. `on_select` receives the
/// clicked node, or `None` when the view resets after inactivity. Pass a
/// [`ConnectionsControls`] to drive zoom and pan from the host. The canvas
/// sizes itself to its parent container by default; set `fullscreen = true`
/// to fill the viewport and follow window resizes.
#[component]
pub fn ConnectionsGraph(
	#[prop(into)] data: Signal<Vec<ContributionName>>,
	#[prop(into)] on_select: Callback<Option<DataPoint>>,
	#[prop(optional)] config: Option<ConnectionsConfig>,
	#[prop(optional)] controls: Option<ConnectionsControls>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let config = Rc::new(config.unwrap_or_default());
	let slot: Slot = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (slot_init, animate_init, resize_cb_init) = (slot.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let records = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("connections: no window, graph not mounted");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("connections: canvas 2d context unavailable");
			return;
		};

		let model = build_model(&records, config.merge);
		info!(
			"connections: mounting {} contributors, {} contributions, {} links",
			model.contributor_count(),
			model.contribution_count(),
			model.links().len()
		);
		let state = Rc::new(RefCell::new(ConnectionsState::new(model, &config, w, h)));
		let notify: SelectionHandler = Rc::new(move |node: Option<DataPoint>| on_select.run(node));
		let controller = Rc::new(GraphController::new(
			state,
			BrowserScheduler,
			config.idle.timeout(),
			notify,
		));
		if let Some(ref controls) = controls {
			controls.attach(controller.clone());
		}
		*slot_init.borrow_mut() = Some(controller);

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (slot_resize, canvas_resize) = (slot_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref c) = *slot_resize.borrow() {
					c.state().borrow_mut().resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let (slot_anim, animate_inner) = (slot_init.clone(), animate_init.clone());
		let last_frame = Cell::new(js_sys::Date::now());
		let mut images = ImageCache::default();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame.get()) / 1000.0).clamp(0.0, MAX_FRAME);
			last_frame.set(now);

			if let Some(ref c) = *slot_anim.borrow() {
				let mut s = c.state().borrow_mut();
				s.tick(Duration::from_secs_f64(dt));
				render::render(&s, &ctx, &mut images);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let local_point = move |client_x: f64, client_y: f64| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((client_x - rect.left(), client_y - rect.top()))
	};
	let current = move |slot: &Slot| slot.borrow().clone();

	let slot_md = slot.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (Some(c), Some((x, y))) = (
			current(&slot_md),
			local_point(ev.client_x() as f64, ev.client_y() as f64),
		) else {
			return;
		};
		c.press(x, y);
	};

	let slot_mm = slot.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (Some(c), Some((x, y))) = (
			current(&slot_mm),
			local_point(ev.client_x() as f64, ev.client_y() as f64),
		) else {
			return;
		};
		let was_hovering = c.state().borrow().hovered.is_some();
		c.drag(x, y);
		let hovering = c.state().borrow().hovered.is_some();
		if hovering != was_hovering {
			if let Some(canvas) = canvas_ref.get() {
				let canvas: HtmlCanvasElement = canvas.into();
				let cursor = if hovering { "pointer" } else { "grab" };
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
		}
	};

	let slot_mu = slot.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (Some(c), Some((x, y))) = (
			current(&slot_mu),
			local_point(ev.client_x() as f64, ev.client_y() as f64),
		) else {
			return;
		};
		c.release(x, y);
	};

	let slot_ml = slot.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = current(&slot_ml) {
			c.cancel();
		}
	};

	let slot_wh = slot.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (Some(c), Some((x, y))) = (
			current(&slot_wh),
			local_point(ev.client_x() as f64, ev.client_y() as f64),
		) else {
			return;
		};
		c.wheel(ev.delta_y(), ev.delta_mode(), x, y);
	};

	let slot_dc = slot.clone();
	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		let (Some(c), Some((x, y))) = (
			current(&slot_dc),
			local_point(ev.client_x() as f64, ev.client_y() as f64),
		) else {
			return;
		};
		c.double_click(x, y, ev.shift_key());
	};

	let slot_ts = slot.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		let (Some(c), Some((x, y))) = (
			current(&slot_ts),
			local_point(touch.client_x() as f64, touch.client_y() as f64),
		) else {
			return;
		};
		c.press(x, y);
	};

	let slot_tm = slot.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		let (Some(c), Some((x, y))) = (
			current(&slot_tm),
			local_point(touch.client_x() as f64, touch.client_y() as f64),
		) else {
			return;
		};
		c.drag(x, y);
	};

	let slot_te = slot.clone();
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(c) = current(&slot_te) else {
			return;
		};
		match ev
			.changed_touches()
			.get(0)
			.and_then(|t| local_point(t.client_x() as f64, t.client_y() as f64))
		{
			Some((x, y)) => c.release(x, y),
			None => c.cancel(),
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="connections-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
