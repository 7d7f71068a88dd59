//! Contributor/contribution graph visualization component.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - Two node kinds, contributors and contribution names, linked by contributions
//! - Click to select a node and highlight its links
//! - Drag to pan, scroll or double-click to zoom
//! - Host-driven zoom, recenter and pan-to-contribution controls
//! - Automatic recenter after a period of inactivity
//!
//! # Example
//!
//! ```ignore
//! use connections_graph::components::connections::{ConnectionsControls, ConnectionsGraph};
//!
//! let controls = ConnectionsControls::new();
//! view! {
//!     <ConnectionsGraph
//!         data=records
//!         on_select=move |node| set_selected.set(node)
//!         controls=controls.clone()
//!         fullscreen=true
//!     />
//!     <button on:click=move |_| controls.zoom_in()>"+"</button>
//! }
//! ```

mod component;
pub mod controller;
mod controls;
pub mod idle;
mod images;
pub mod model;
mod render;
pub mod simulation;
pub mod state;
pub mod style;
mod types;
pub mod view;

pub use component::ConnectionsGraph;
pub use controls::ConnectionsControls;
pub use idle::{IdleTimer, Scheduler};
pub use model::{DataPoint, GraphModel, Link, MergePolicy, NodeId, NodeKind};
pub use style::{Color, NodeStyle, StyleConfig};
pub use types::{Contribution, ContributionName, ContributionSummary, Contributor, ImageRef};
