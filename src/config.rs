//! Runtime configuration for the connections graph.
//!
//! Every section is optional in JSON; missing fields take the defaults below.

use std::time::Duration;

use serde::Deserialize;

use crate::components::connections::{MergePolicy, StyleConfig};
use crate::error::{Error, Result};

/// Physics parameters for the layout simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Repulsion between every pair of nodes.
	pub charge: f32,
	/// Spring stiffness along links.
	pub spring: f32,
	/// Upper bound on the force applied to a node in one step.
	pub max_force: f32,
	/// Velocity scale of the physics integration.
	pub node_speed: f32,
	/// Velocity retained per step.
	pub damping: f32,
	/// Mass of every node.
	pub mass: f32,
	/// Nodes are kept at least twice this far apart.
	pub collide_radius: f64,
	/// Fraction of an overlap resolved per step.
	pub collide_strength: f64,
	/// Layout center in world units. Defaults to the center of the container.
	pub center: Option<(f64, f64)>,
	/// Per-tick cooling rate of the simulation temperature.
	pub alpha_decay: f64,
	/// The simulation stops once the temperature falls below this value.
	pub alpha_min: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge: 500.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			mass: 10.0,
			collide_radius: 100.0,
			collide_strength: 1.0,
			center: None,
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			alpha_min: 0.001,
		}
	}
}

/// Zoom and pan parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	/// Smallest allowed scale.
	pub min_scale: f64,
	/// Largest allowed scale.
	pub max_scale: f64,
	/// Multiplier applied by the zoom-in control.
	pub zoom_in_factor: f64,
	/// Multiplier applied by the zoom-out control.
	pub zoom_out_factor: f64,
	/// Scale restored by recenter and by the idle timeout.
	pub recenter_scale: f64,
	/// Scale used when panning to a contribution.
	pub pan_scale: f64,
	/// Duration of animated transitions in milliseconds.
	pub transition_ms: f64,
	/// Pointer travel, in pixels, beyond which a press becomes a pan instead of a click.
	pub click_tolerance: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 3.0,
			zoom_in_factor: 1.3,
			zoom_out_factor: 0.7,
			recenter_scale: 0.5,
			pan_scale: 1.0,
			transition_ms: 250.0,
			click_tolerance: 3.0,
		}
	}
}

/// Longest accepted transition, in milliseconds.
const MAX_TRANSITION_MS: f64 = 60_000.0;

impl ZoomConfig {
	/// Duration of animated transitions.
	pub fn transition(&self) -> Duration {
		Duration::try_from_secs_f64(self.transition_ms / 1000.0).unwrap_or(Duration::ZERO)
	}

	/// Bound `k` to the scale extent.
	pub fn clamp(&self, k: f64) -> f64 {
		k.max(self.min_scale).min(self.max_scale)
	}

	fn validate(&self) -> Result<()> {
		if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale && self.max_scale.is_finite())
		{
			return Err(Error::InvalidConfig(format!(
				"zoom scale extent [{}, {}] must satisfy 0 < min <= max",
				self.min_scale, self.max_scale
			)));
		}
		for (name, value) in [
			("zoom_in_factor", self.zoom_in_factor),
			("zoom_out_factor", self.zoom_out_factor),
			("recenter_scale", self.recenter_scale),
			("pan_scale", self.pan_scale),
		] {
			positive(name, value)?;
		}
		if !(0.0..=MAX_TRANSITION_MS).contains(&self.transition_ms) {
			return Err(Error::InvalidConfig(format!(
				"zoom.transition_ms must be within 0..={}, got {}",
				MAX_TRANSITION_MS, self.transition_ms
			)));
		}
		non_negative("click_tolerance", self.click_tolerance)
	}
}

fn positive(name: &str, value: f64) -> Result<()> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(Error::InvalidConfig(format!(
			"{} must be finite and positive, got {}",
			name, value
		)))
	}
}

fn non_negative(name: &str, value: f64) -> Result<()> {
	if value.is_finite() && value >= 0.0 {
		Ok(())
	} else {
		Err(Error::InvalidConfig(format!(
			"{} must be finite and non-negative, got {}",
			name, value
		)))
	}
}

/// Inactivity timeout parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
	/// Seconds without interaction before the view resets.
	pub timeout_secs: u64,
}

impl Default for IdleConfig {
	fn default() -> Self {
		Self { timeout_secs: 180 }
	}
}

impl IdleConfig {
	/// The inactivity delay.
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectionsConfig {
	/// Layout physics.
	pub simulation: SimulationConfig,
	/// Zoom and pan behavior.
	pub zoom: ZoomConfig,
	/// Inactivity reset.
	pub idle: IdleConfig,
	/// Colors and node styles.
	pub style: StyleConfig,
	/// How duplicate names in the input are reconciled.
	pub merge: MergePolicy,
}

impl ConnectionsConfig {
	/// Parse and validate a JSON configuration.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values that would break the layout or the view transform.
	pub fn validate(&self) -> Result<()> {
		self.zoom.validate()?;
		let sim = &self.simulation;
		for (name, value) in [
			("charge", sim.charge),
			("spring", sim.spring),
			("max_force", sim.max_force),
			("node_speed", sim.node_speed),
			("damping", sim.damping),
		] {
			non_negative(name, value as f64)?;
		}
		positive("mass", sim.mass as f64)?;
		non_negative("collide_radius", sim.collide_radius)?;
		non_negative("collide_strength", sim.collide_strength)?;
		positive("alpha_min", sim.alpha_min)?;
		if !(sim.alpha_decay > 0.0 && sim.alpha_decay <= 1.0) {
			return Err(Error::InvalidConfig(format!(
				"alpha_decay must be within (0, 1], got {}",
				sim.alpha_decay
			)));
		}
		if let Some((x, y)) = sim.center {
			if !(x.is_finite() && y.is_finite()) {
				return Err(Error::InvalidConfig("simulation center must be finite".into()));
			}
		}
		positive("contributor.image_size", self.style.contributor.image_size)?;
		positive("contribution.image_size", self.style.contribution.image_size)?;
		non_negative("link_width", self.style.link_width)
	}
}
