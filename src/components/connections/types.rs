//! Input records consumed by the graph, as delivered by the host API.

use serde::{Deserialize, Serialize};

/// Reference to an uploaded image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
	/// File name or URL of the image, relative to the configured image base.
	pub file_name: String,
}

/// A person who contributed to one or more contribution names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
	/// Display name. Contributors are identified by name.
	pub name: String,
	/// Optional portrait.
	#[serde(default)]
	pub image: Option<ImageRef>,
}

/// A single contribution, linking a contributor to the enclosing contribution name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
	/// Who made the contribution.
	pub contributor: Contributor,
}

/// A named topic or category together with everyone who contributed to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionName {
	/// Display name. Contribution names are identified by name.
	pub name: String,
	/// Optional illustration.
	#[serde(default)]
	pub image: Option<ImageRef>,
	/// Contributions made under this name.
	#[serde(default)]
	pub contribution: Vec<Contribution>,
}

/// A contribution name without its contribution list, as carried by graph nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSummary {
	/// Display name.
	pub name: String,
	/// Optional illustration.
	pub image: Option<ImageRef>,
}

impl From<&ContributionName> for ContributionSummary {
	fn from(record: &ContributionName) -> Self {
		Self {
			name: record.name.clone(),
			image: record.image.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_api_payload_and_ignores_unknown_fields() {
		let json = r#"[{
			"id": 7,
			"name": "Radar",
			"image": { "file_name": "radar.png", "alt": "dish" },
			"contribution": [
				{ "id": 1, "contributor": { "name": "Jane" } }
			]
		}]"#;
		let records: Vec<ContributionName> = serde_json::from_str(json).unwrap();

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].name, "Radar");
		assert_eq!(
			records[0].image.as_ref().map(|i| i.file_name.as_str()),
			Some("radar.png")
		);
		assert_eq!(records[0].contribution[0].contributor.name, "Jane");
		assert!(records[0].contribution[0].contributor.image.is_none());
	}

	#[test]
	fn missing_contribution_list_defaults_to_empty() {
		let records: Vec<ContributionName> =
			serde_json::from_str(r#"[{ "name": "Sonar" }]"#).unwrap();
		assert!(records[0].contribution.is_empty());
		assert!(records[0].image.is_none());
	}
}
