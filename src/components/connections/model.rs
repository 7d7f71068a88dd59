//! Graph model built from contribution records.
//!
//! Turns the nested API records into a flat, deduplicated node list and a link
//! list. Contributors and contribution names live in separate identity spaces,
//! so a person and a topic that happen to share a name stay distinct nodes.
//! Duplicate records are resolved here, at ingestion, according to a
//! [`MergePolicy`].

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::types::{ContributionName, ContributionSummary, Contributor, ImageRef};
use crate::error::{Error, Result};

/// The two kinds of node shown in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
	/// A person.
	Contributor,
	/// A topic or category contributed to.
	Contribution,
}

/// Namespaced node identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
	/// Identity space the name belongs to.
	pub kind: NodeKind,
	/// Contributor or contribution name.
	pub name: String,
}

impl NodeId {
	/// Identity of the contributor called `name`.
	pub fn contributor(name: impl Into<String>) -> Self {
		Self {
			kind: NodeKind::Contributor,
			name: name.into(),
		}
	}

	/// Identity of the contribution name `name`.
	pub fn contribution(name: impl Into<String>) -> Self {
		Self {
			kind: NodeKind::Contribution,
			name: name.into(),
		}
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let prefix = match self.kind {
			NodeKind::Contributor => "contributor",
			NodeKind::Contribution => "contribution",
		};
		write!(f, "{}:{}", prefix, self.name)
	}
}

/// A graph node: exactly one contributor or one contribution name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataPoint {
	/// A person node.
	Contributor(Contributor),
	/// A contribution-name node.
	Contribution(ContributionSummary),
}

impl DataPoint {
	/// Which identity space this node belongs to.
	pub fn kind(&self) -> NodeKind {
		match self {
			DataPoint::Contributor(_) => NodeKind::Contributor,
			DataPoint::Contribution(_) => NodeKind::Contribution,
		}
	}

	/// Display name, also the node's key within its kind.
	pub fn name(&self) -> &str {
		match self {
			DataPoint::Contributor(c) => &c.name,
			DataPoint::Contribution(c) => &c.name,
		}
	}

	/// Attached image, if any.
	pub fn image(&self) -> Option<&ImageRef> {
		match self {
			DataPoint::Contributor(c) => c.image.as_ref(),
			DataPoint::Contribution(c) => c.image.as_ref(),
		}
	}

	/// Namespaced identity of this node.
	pub fn id(&self) -> NodeId {
		NodeId {
			kind: self.kind(),
			name: self.name().to_string(),
		}
	}
}

/// A contribution edge from a contributor to a contribution name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Link {
	/// The contributor node.
	pub source: NodeId,
	/// The contribution-name node.
	pub target: NodeId,
	/// Link force weight.
	pub strength: f32,
}

/// Returns true when `node` is either end of `link`.
pub fn is_incident(node: &NodeId, link: &Link) -> bool {
	link.source == *node || link.target == *node
}

/// How duplicate records sharing a name are reconciled at ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
	/// The later record replaces the earlier one.
	KeepLast,
	/// The first record wins; fields it lacks are filled from later duplicates
	/// and duplicate contribution names pool their contributions.
	#[default]
	MergeFields,
	/// Conflicting duplicates are an error.
	Reject,
}

/// Deduplicated nodes plus links, ready for layout.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<DataPoint>,
	links: Vec<Link>,
	index: HashMap<NodeId, usize>,
	contributors: usize,
}

impl GraphModel {
	/// Build the model from API records, resolving duplicates with `policy`.
	///
	/// Contributor nodes come first in first-seen order, followed by
	/// contribution nodes in first-seen order. Every contribution produces one
	/// link of strength 1.
	pub fn build(records: &[ContributionName], policy: MergePolicy) -> Result<Self> {
		let mut contributors: Vec<Contributor> = Vec::new();
		let mut contributor_idx: HashMap<&str, usize> = HashMap::new();
		let mut contributions: Vec<ContributionSummary> = Vec::new();
		let mut contribution_idx: HashMap<&str, usize> = HashMap::new();
		let mut links = Vec::new();

		for record in records {
			match contribution_idx.get(record.name.as_str()) {
				Some(&i) => match policy {
					MergePolicy::Reject => {
						return Err(Error::DuplicateContribution(record.name.clone()));
					}
					MergePolicy::KeepLast => contributions[i] = record.into(),
					MergePolicy::MergeFields => {
						if contributions[i].image.is_none() {
							contributions[i].image = record.image.clone();
						}
					}
				},
				None => {
					contribution_idx.insert(&record.name, contributions.len());
					contributions.push(record.into());
				}
			}

			for contribution in &record.contribution {
				let person = &contribution.contributor;
				match contributor_idx.get(person.name.as_str()) {
					Some(&i) => {
						let existing = &mut contributors[i];
						match policy {
							MergePolicy::Reject if *existing != *person => {
								return Err(Error::DuplicateContributor(person.name.clone()));
							}
							MergePolicy::Reject => {}
							MergePolicy::KeepLast => *existing = person.clone(),
							MergePolicy::MergeFields => {
								if existing.image.is_none() {
									existing.image = person.image.clone();
								}
							}
						}
					}
					None => {
						contributor_idx.insert(&person.name, contributors.len());
						contributors.push(person.clone());
					}
				}

				links.push(Link {
					source: NodeId::contributor(&person.name),
					target: NodeId::contribution(&record.name),
					strength: 1.0,
				});
			}
		}

		let contributor_count = contributors.len();
		let nodes: Vec<DataPoint> = contributors
			.into_iter()
			.map(DataPoint::Contributor)
			.chain(contributions.into_iter().map(DataPoint::Contribution))
			.collect();
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id(), i))
			.collect();

		debug!(
			"connections: built model with {} nodes, {} links",
			nodes.len(),
			links.len()
		);

		Ok(Self {
			nodes,
			links,
			index,
			contributors: contributor_count,
		})
	}

	/// All nodes, contributors first.
	pub fn nodes(&self) -> &[DataPoint] {
		&self.nodes
	}

	/// All links in record order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Position of the node with identity `id` in [`GraphModel::nodes`].
	pub fn index_of(&self, id: &NodeId) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// The node with identity `id`.
	pub fn node(&self, id: &NodeId) -> Option<&DataPoint> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Index of the contribution-name node called `name`.
	pub fn find_contribution(&self, name: &str) -> Option<usize> {
		self.index_of(&NodeId::contribution(name))
	}

	/// Number of distinct contributors.
	pub fn contributor_count(&self) -> usize {
		self.contributors
	}

	/// Number of distinct contribution names.
	pub fn contribution_count(&self) -> usize {
		self.nodes.len() - self.contributors
	}

	/// Contribution names in first-seen order.
	pub fn contribution_names(&self) -> impl Iterator<Item = &str> {
		self.nodes[self.contributors..].iter().map(DataPoint::name)
	}
}
