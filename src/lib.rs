//! connections-graph: Interactive force-directed graph of contributors and
//! the contribution names they contributed to.
//!
//! This crate provides a WASM-based graph component that lays out contributors
//! and contributions with a physics simulation, highlights the links of the
//! selected node, and exposes zoom, recenter and pan-to-contribution controls
//! to the host page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod config;
pub mod error;

pub use components::connections::{
	ConnectionsControls, ConnectionsGraph, ContributionName, DataPoint, GraphModel, MergePolicy,
	NodeKind,
};
pub use config::ConnectionsConfig;
pub use error::{Error, Result};

/// Id of the script element holding the contribution records.
pub const DATA_SCRIPT_ID: &str = "connections-data";
/// Id of the optional script element holding a [`ConnectionsConfig`].
pub const CONFIG_SCRIPT_ID: &str = "connections-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("connections-graph: logging initialized");
}

/// Text content of the script element with the given id.
fn script_text(id: &str) -> Result<String> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| Error::Dom("no document".into()))?;
	let element = document
		.get_element_by_id(id)
		.ok_or_else(|| Error::Dom(format!("no element #{}", id)))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| Error::Dom(format!("#{} is not a script element", id)))?;
	script.text().map_err(|e| Error::Dom(format!("{:?}", e)))
}

fn load_json<T: DeserializeOwned>(id: &str) -> Result<T> {
	Ok(serde_json::from_str(&script_text(id)?)?)
}

/// Load contribution records from the script element with id="connections-data".
/// Expected format: JSON array of `{ name, image?, contribution: [{ contributor }] }`.
pub fn load_records() -> Option<Vec<ContributionName>> {
	match load_json::<Vec<ContributionName>>(DATA_SCRIPT_ID) {
		Ok(records) => {
			info!(
				"connections-graph: loaded {} contribution names",
				records.len()
			);
			Some(records)
		}
		Err(e) => {
			warn!("connections-graph: failed to load records: {}", e);
			None
		}
	}
}

/// Load configuration from the script element with id="connections-config".
/// A missing element is not an error; the defaults apply.
pub fn load_config() -> ConnectionsConfig {
	let text = match script_text(CONFIG_SCRIPT_ID) {
		Ok(text) => text,
		Err(e) => {
			debug!("connections-graph: using default config ({})", e);
			return ConnectionsConfig::default();
		}
	};
	ConnectionsConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("connections-graph: invalid config, using defaults: {}", e);
		ConnectionsConfig::default()
	})
}

fn kind_label(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Contributor => "Contributor",
		NodeKind::Contribution => "Contribution",
	}
}

/// Main application component.
/// Loads records and config from the DOM and renders the graph with a small
/// control overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let records = load_records().unwrap_or_default();
	let config = load_config();

	let mut names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
	names.sort();
	names.dedup();

	let data = Signal::derive(move || records.clone());
	let (selected, set_selected) = signal(None::<DataPoint>);
	let controls = ConnectionsControls::new();

	let (zoom_in, zoom_out, recenter) = (controls.clone(), controls.clone(), controls.clone());
	let name_buttons = names
		.into_iter()
		.map(|name| {
			let (controls, target) = (controls.clone(), name.clone());
			view! {
				<li>
					<button on:click=move |_| controls.pan_to_contribution(&target)>{name}</button>
				</li>
			}
		})
		.collect_view();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Connections" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ConnectionsGraph
				data=data
				config=config
				on_select={move |node: Option<DataPoint>| set_selected.set(node)}
				controls=controls
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Connections"</h1>
				<p class="subtitle">"Click a node to highlight its links. Drag to pan. Scroll to zoom."</p>
				<div class="graph-controls">
					<button on:click=move |_| zoom_in.zoom_in()>"+"</button>
					<button on:click=move |_| zoom_out.zoom_out()>"-"</button>
					<button on:click=move |_| recenter.recenter()>"Recenter"</button>
				</div>
				<ul class="contribution-list">{name_buttons}</ul>
				{move || {
					selected
						.get()
						.map(|node| {
							view! {
								<div class="selection">
									<span class="kind">{kind_label(node.kind())}</span>
									<strong>{node.name().to_string()}</strong>
								</div>
							}
						})
				}}
			</div>
		</div>
	}
}
