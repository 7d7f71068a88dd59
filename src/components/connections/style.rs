//! Visual encoding for the connections graph.
//!
//! Colors, per-kind node styles and link colors. Every value here can be
//! overridden from the JSON configuration.

use serde::{Deserialize, Deserializer};

use super::model::{DataPoint, NodeKind};
use crate::error::Error;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color from channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS color string: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses hex (`#RRGGBB`, `#RGB`), `rgb()`/`rgba()` and a few named colors.
	pub fn parse(s: &str) -> Result<Self, Error> {
		let s = s.trim();
		let invalid = || Error::InvalidColor(s.to_string());

		if let Some(hex) = s.strip_prefix('#') {
			let channel = |range: std::ops::Range<usize>| {
				hex.get(range)
					.and_then(|h| u8::from_str_radix(h, 16).ok())
					.ok_or_else(invalid)
			};
			return match hex.len() {
				6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
				3 => {
					let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
					Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => Err(invalid()),
			};
		}

		if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let channel = |i: usize| {
				nums.get(i)
					.and_then(|v| v.parse::<u8>().ok())
					.ok_or_else(invalid)
			};
			let a = match nums.get(3) {
				Some(v) => v.parse::<f64>().map_err(|_| invalid())?,
				None => 1.0,
			};
			return Ok(Color::rgba(channel(0)?, channel(1)?, channel(2)?, a));
		}

		match s {
			"green" => Ok(Color::rgb(0, 128, 0)),
			"white" => Ok(Color::rgb(255, 255, 255)),
			"black" => Ok(Color::rgb(0, 0, 0)),
			"gray" | "grey" => Ok(Color::rgb(128, 128, 128)),
			"transparent" => Ok(Color::rgba(0, 0, 0, 0.0)),
			_ => Err(invalid()),
		}
	}
}

impl TryFrom<String> for Color {
	type Error = Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value)
	}
}

/// Label font weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
	/// Regular weight.
	Normal,
	/// Bold weight.
	Bold,
}

/// How one kind of node is drawn.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeStyle {
	/// Width and height of the circular image, in world units.
	pub image_size: f64,
	/// Label font size in world units.
	pub font_size: f64,
	/// Label font weight.
	pub font_weight: FontWeight,
	/// Horizontal label offset from the node center.
	pub label_dx: f64,
	/// Vertical label offset from the node center.
	pub label_dy: f64,
	/// Fill used while the image is missing or still loading.
	pub placeholder: Color,
}

impl NodeStyle {
	/// Default style for contributor nodes.
	pub fn contributor() -> Self {
		Self {
			image_size: 40.0,
			font_size: 15.0,
			font_weight: FontWeight::Normal,
			label_dx: 15.0,
			label_dy: 4.0,
			placeholder: Color::rgb(129, 161, 193),
		}
	}

	/// Default style for contribution-name nodes.
	pub fn contribution() -> Self {
		Self {
			image_size: 80.0,
			font_size: 17.0,
			font_weight: FontWeight::Bold,
			label_dx: 40.0,
			label_dy: 11.0,
			placeholder: Color::rgb(94, 129, 172),
		}
	}

	/// Drawn and hit-tested radius.
	pub fn radius(&self) -> f64 {
		self.image_size / 2.0
	}

	/// Canvas font shorthand, e.g. `"bold 17px sans-serif"`.
	pub fn font(&self) -> String {
		match self.font_weight {
			FontWeight::Normal => format!("{}px sans-serif", self.font_size),
			FontWeight::Bold => format!("bold {}px sans-serif", self.font_size),
		}
	}
}

/// Partial [`NodeStyle`] as written in configuration. Unset fields keep the
/// defaults of the node kind being overridden.
#[derive(Default, Deserialize)]
#[serde(default)]
struct NodeStylePatch {
	image_size: Option<f64>,
	font_size: Option<f64>,
	font_weight: Option<FontWeight>,
	label_dx: Option<f64>,
	label_dy: Option<f64>,
	placeholder: Option<Color>,
}

impl NodeStylePatch {
	fn over(self, base: NodeStyle) -> NodeStyle {
		NodeStyle {
			image_size: self.image_size.unwrap_or(base.image_size),
			font_size: self.font_size.unwrap_or(base.font_size),
			font_weight: self.font_weight.unwrap_or(base.font_weight),
			label_dx: self.label_dx.unwrap_or(base.label_dx),
			label_dy: self.label_dy.unwrap_or(base.label_dy),
			placeholder: self.placeholder.unwrap_or(base.placeholder),
		}
	}
}

fn contributor_style<'de, D: Deserializer<'de>>(d: D) -> Result<NodeStyle, D::Error> {
	Ok(NodeStylePatch::deserialize(d)?.over(NodeStyle::contributor()))
}

fn contribution_style<'de, D: Deserializer<'de>>(d: D) -> Result<NodeStyle, D::Error> {
	Ok(NodeStylePatch::deserialize(d)?.over(NodeStyle::contribution()))
}

/// Complete visual configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
	/// Style of contributor nodes.
	#[serde(deserialize_with = "contributor_style")]
	pub contributor: NodeStyle,
	/// Style of contribution-name nodes.
	#[serde(deserialize_with = "contribution_style")]
	pub contribution: NodeStyle,
	/// Canvas fill behind the graph.
	pub background: Color,
	/// Label text color.
	pub label: Color,
	/// Color of links not touching the selection.
	pub link: Color,
	/// Color of links incident to the selected node.
	pub link_selected: Color,
	/// Link stroke width in world units.
	pub link_width: f64,
	/// Prefixed to every image file name.
	pub image_base: String,
	/// Image source used when an entity has no image.
	pub placeholder_image: String,
}

impl Default for StyleConfig {
	fn default() -> Self {
		Self {
			contributor: NodeStyle::contributor(),
			contribution: NodeStyle::contribution(),
			background: Color::rgb(255, 255, 255),
			label: Color::rgb(34, 34, 34),
			link: Color::rgb(0xE5, 0xE5, 0xE5),
			link_selected: Color::rgb(0, 128, 0),
			link_width: 3.0,
			image_base: String::new(),
			placeholder_image: "unknown".to_string(),
		}
	}
}

impl StyleConfig {
	/// Style for nodes of `kind`.
	pub fn for_kind(&self, kind: NodeKind) -> &NodeStyle {
		match kind {
			NodeKind::Contributor => &self.contributor,
			NodeKind::Contribution => &self.contribution,
		}
	}

	/// Image source for a node, falling back to the placeholder token.
	pub fn image_source(&self, point: &DataPoint) -> String {
		match point.image() {
			Some(image) if !image.file_name.is_empty() => {
				format!("{}{}", self.image_base, image.file_name)
			}
			_ => self.placeholder_image.clone(),
		}
	}

	/// Whether `src` is the placeholder token rather than a real image.
	pub fn is_placeholder(&self, src: &str) -> bool {
		src == self.placeholder_image
	}

	/// Stroke color for a link, highlighted or not.
	pub fn link_color(&self, highlighted: bool) -> Color {
		if highlighted {
			self.link_selected
		} else {
			self.link
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::connections::types::{ContributionSummary, Contributor, ImageRef};

	#[test]
	fn parses_css_colors() {
		assert_eq!(Color::parse("#E5E5E5").unwrap(), Color::rgb(229, 229, 229));
		assert_eq!(Color::parse("#fff").unwrap(), Color::rgb(255, 255, 255));
		assert_eq!(
			Color::parse("rgba(10, 20, 30, 0.5)").unwrap(),
			Color::rgba(10, 20, 30, 0.5)
		);
		assert_eq!(Color::parse("green").unwrap(), Color::rgb(0, 128, 0));
		assert!(matches!(
			Color::parse("#12"),
			Err(Error::InvalidColor(_))
		));
		assert!(Color::parse("chartreuse-ish").is_err());
	}

	#[test]
	fn css_output_drops_alpha_when_opaque() {
		assert_eq!(Color::rgb(0, 128, 0).to_css(), "#008000");
		assert_eq!(
			Color::rgba(0, 128, 0, 0.25).to_css(),
			"rgba(0, 128, 0, 0.25)"
		);
	}

	#[test]
	fn kind_styles_match_legacy_encoding() {
		let style = StyleConfig::default();
		let person = style.for_kind(NodeKind::Contributor);
		let topic = style.for_kind(NodeKind::Contribution);

		assert_eq!(person.radius(), 20.0);
		assert_eq!(topic.radius(), 40.0);
		assert_eq!(person.font(), "15px sans-serif");
		assert_eq!(topic.font(), "bold 17px sans-serif");
		assert_eq!((person.label_dx, person.label_dy), (15.0, 4.0));
		assert_eq!((topic.label_dx, topic.label_dy), (40.0, 11.0));
	}

	#[test]
	fn image_source_falls_back_to_placeholder() {
		let style = StyleConfig {
			image_base: "/media/".into(),
			..StyleConfig::default()
		};
		let with_image = DataPoint::Contributor(Contributor {
			name: "Jane".into(),
			image: Some(ImageRef {
				file_name: "jane.png".into(),
			}),
		});
		let without = DataPoint::Contribution(ContributionSummary {
			name: "Radar".into(),
			image: None,
		});

		assert_eq!(style.image_source(&with_image), "/media/jane.png");
		assert_eq!(style.image_source(&without), "unknown");
		assert!(style.is_placeholder("unknown"));
	}

	#[test]
	fn partial_style_config_keeps_defaults() {
		let style: StyleConfig =
			serde_json::from_str(r##"{ "link_selected": "#ff0000", "image_base": "/media/" }"##)
				.unwrap();
		assert_eq!(style.link_selected, Color::rgb(255, 0, 0));
		assert_eq!(style.link, Color::rgb(229, 229, 229));
		assert_eq!(style.image_base, "/media/");
		assert_eq!(style.contribution, NodeStyle::contribution());

		let bad = serde_json::from_str::<StyleConfig>(r#"{ "link": "not-a-color" }"#);
		assert!(bad.is_err());
	}

	#[test]
	fn partial_node_style_keeps_kind_defaults() {
		let style: StyleConfig = serde_json::from_str(
			r#"{ "contributor": { "font_size": 20 }, "contribution": { "font_weight": "normal" } }"#,
		)
		.unwrap();
		assert_eq!(
			style.contributor,
			NodeStyle {
				font_size: 20.0,
				..NodeStyle::contributor()
			}
		);
		assert_eq!(
			style.contribution,
			NodeStyle {
				font_weight: FontWeight::Normal,
				..NodeStyle::contribution()
			}
		);

		let bad = serde_json::from_str::<StyleConfig>(
			r#"{ "contribution": { "placeholder": "not-a-color" } }"#,
		);
		assert!(bad.is_err());
	}
}
