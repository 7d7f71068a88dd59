//! Building the graph model from host JSON through the public API.

#![allow(unused_crate_dependencies)]

use connections_graph::components::connections::{Link, NodeId};
use connections_graph::{ContributionName, Error, GraphModel, MergePolicy, NodeKind};
use pretty_assertions::assert_eq;

const RECORDS: &str = r#"[
	{
		"name": "Radar",
		"image": { "file_name": "radar.png" },
		"contribution": [
			{ "contributor": { "name": "Jane", "image": { "file_name": "jane.jpg" } } },
			{ "contributor": { "name": "Omar" } }
		]
	},
	{
		"name": "Sonar",
		"contribution": [
			{ "contributor": { "name": "Jane" } }
		]
	},
	{ "name": "Lidar", "contribution": [] }
]"#;

fn records() -> Vec<ContributionName> {
	serde_json::from_str(RECORDS).unwrap()
}

#[test]
fn single_contribution_yields_two_nodes_and_one_link() {
	let json = r#"[{ "name": "Radar", "contribution": [{ "contributor": { "name": "Jane" } }] }]"#;
	let records: Vec<ContributionName> = serde_json::from_str(json).unwrap();
	let model = GraphModel::build(&records, MergePolicy::default()).unwrap();

	assert_eq!(model.nodes().len(), 2);
	assert_eq!(
		model.links(),
		&[Link {
			source: NodeId::contributor("Jane"),
			target: NodeId::contribution("Radar"),
			strength: 1.0,
		}]
	);
}

#[test]
fn node_counts_match_distinct_names() {
	let model = GraphModel::build(&records(), MergePolicy::default()).unwrap();

	assert_eq!(model.contributor_count(), 2);
	assert_eq!(model.contribution_count(), 3);
	assert_eq!(model.nodes().len(), 5);
	assert_eq!(
		model.contribution_names().collect::<Vec<_>>(),
		vec!["Radar", "Sonar", "Lidar"]
	);
}

#[test]
fn every_link_connects_a_contributor_to_a_contribution() {
	let model = GraphModel::build(&records(), MergePolicy::default()).unwrap();

	assert_eq!(model.links().len(), 3);
	for link in model.links() {
		let source = model.node(&link.source).unwrap();
		let target = model.node(&link.target).unwrap();
		assert_eq!(source.kind(), NodeKind::Contributor);
		assert_eq!(target.kind(), NodeKind::Contribution);
	}
}

#[test]
fn contribution_without_contributors_is_an_isolated_node() {
	let model = GraphModel::build(&records(), MergePolicy::default()).unwrap();
	let lidar = NodeId::contribution("Lidar");

	assert!(model.node(&lidar).is_some());
	assert!(
		!model
			.links()
			.iter()
			.any(|l| l.source == lidar || l.target == lidar)
	);
}

#[test]
fn merge_fields_keeps_first_seen_image() {
	let model = GraphModel::build(&records(), MergePolicy::MergeFields).unwrap();
	let jane = model.node(&NodeId::contributor("Jane")).unwrap();

	assert_eq!(jane.image().map(|i| i.file_name.as_str()), Some("jane.jpg"));
}

#[test]
fn reject_policy_reports_conflicting_contributor() {
	let err = GraphModel::build(&records(), MergePolicy::Reject).unwrap_err();

	assert!(matches!(err, Error::DuplicateContributor(ref name) if name == "Jane"));
}

#[test]
fn malformed_json_is_a_parse_error() {
	let err: Error = serde_json::from_str::<Vec<ContributionName>>("[{ \"name\": 3 }]")
		.unwrap_err()
		.into();

	assert!(matches!(err, Error::Parse(_)));
}
