//! Canvas rendering for the connections graph.
//!
//! Drawing order gives the z-ordering: background, plain links, highlighted
//! links, node images, then labels on top.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::images::ImageCache;
use super::state::ConnectionsState;

/// Renders the complete graph to the canvas.
pub fn render(state: &ConnectionsState, ctx: &CanvasRenderingContext2d, images: &mut ImageCache) {
	let (width, height) = (state.viewport.width, state.viewport.height);
	let transform = state.viewport.transform();

	ctx.set_fill_style_str(&state.style.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	draw_links(state, ctx, false);
	draw_links(state, ctx, true);
	draw_nodes(state, ctx, images);
	draw_labels(state, ctx);

	ctx.restore();
}

fn draw_links(state: &ConnectionsState, ctx: &CanvasRenderingContext2d, highlighted: bool) {
	let style = &state.style;
	ctx.set_stroke_style_str(&style.link_color(highlighted).to_css());
	ctx.set_line_width(style.link_width);

	state.sim.graph.visit_edges(|n1, n2, _| {
		let (a, b) = (n1.data.user_data.point, n2.data.user_data.point);
		if state.is_edge_highlighted(a, b) != highlighted {
			return;
		}
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

fn draw_nodes(state: &ConnectionsState, ctx: &CanvasRenderingContext2d, images: &mut ImageCache) {
	let style = &state.style;

	state.sim.graph.visit_nodes(|node| {
		let point = &state.model.nodes()[node.data.user_data.point];
		let node_style = style.for_kind(point.kind());
		let (x, y, r) = (node.x() as f64, node.y() as f64, node_style.radius());
		let src = style.image_source(point);

		ctx.save();
		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.clip();

		let image = if style.is_placeholder(&src) {
			None
		} else {
			images.request(&src);
			images.ready(&src)
		};
		match image {
			Some(img) => {
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					img,
					x - r,
					y - r,
					node_style.image_size,
					node_style.image_size,
				);
			}
			None => {
				ctx.set_fill_style_str(&node_style.placeholder.to_css());
				ctx.fill();
			}
		}
		ctx.restore();
	});
}

fn draw_labels(state: &ConnectionsState, ctx: &CanvasRenderingContext2d) {
	let style = &state.style;
	ctx.set_fill_style_str(&style.label.to_css());

	state.sim.graph.visit_nodes(|node| {
		let point = &state.model.nodes()[node.data.user_data.point];
		let node_style = style.for_kind(point.kind());
		ctx.set_font(&node_style.font());
		let _ = ctx.fill_text(
			point.name(),
			node.x() as f64 + node_style.label_dx,
			node.y() as f64 + node_style.label_dy,
		);
	});
}
