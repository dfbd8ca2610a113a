// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reconcile module scenarios against a scripted SWIS

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use orion_infrastructure::domain::NodeRef;
use orion_infrastructure::errors::OrionError;
use orion_infrastructure::reconcile::CheckMode;
use orion_infrastructure::resolver::resolve_node;
use orion_infrastructure::resources::custom_poller::{self, CustomPollerParams};
use orion_infrastructure::resources::custom_property::{self, CustomPropertyParams};
use orion_infrastructure::resources::node::{self, NodeParams, NodeState};
use orion_infrastructure::resources::node_poller::{self, NodePollerParams};
use orion_infrastructure::resources::update_node::{self, UpdateNodeParams};
use orion_infrastructure::resources::PresenceState;

fn router1_params(state: NodeState) -> NodeParams {
    let mut reference = NodeRef::by_name("router1");
    reference.ip_address = Some("10.0.0.1".into());
    NodeParams::new(reference, state)
}

#[test_case(NodeRef::by_id(7); "by id")]
#[test_case(NodeRef::by_address("10.0.0.1"); "by address")]
#[test_case(NodeRef::by_name("router1"); "by name")]
#[tokio::test]
async fn test_resolve_by_any_key_yields_same_record(reference: NodeRef) {
    let swis = swis_with_router1();
    let node = resolve_node(&swis, &reference).await.unwrap().unwrap();

    assert_eq!(node.node_id, 7);
    assert_eq!(node.caption, "router1");
    assert_eq!(node.net_object_id, "N:7");
    assert_eq!(swis.query_count(), 1);
}

#[tokio::test]
async fn test_create_router1() {
    let swis = FakeSwis::new()
        .on_query(NODE_QUERY, vec![])
        .on_query(NODE_QUERY, vec![node_row(7, "router1", "10.0.0.1")]);

    let outcome = node::run(&swis, &router1_params(NodeState::Present), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.changed());
    assert_eq!(outcome.node().unwrap().node_id, 7);

    let created = swis.creates_of("Orion.Nodes");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["Caption"], "router1");
    assert_eq!(created[0]["IPAddress"], "10.0.0.1");
    assert_eq!(created[0]["ObjectSubType"], "ICMP");
    assert_eq!(created[0]["EngineID"], 1);

    // default ICMP pollers
    assert_eq!(swis.creates_of("Orion.Pollers").len(), 3);
}

#[tokio::test]
async fn test_existing_router1_is_unchanged() {
    let swis = swis_with_router1();
    let outcome = node::run(&swis, &router1_params(NodeState::Present), CheckMode::Apply)
        .await
        .unwrap();

    assert!(!outcome.changed());
    assert_eq!(outcome.node().unwrap().caption, "router1");
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_dry_run_create_predicts_change() {
    let swis = FakeSwis::new();
    let outcome = node::run(&swis, &router1_params(NodeState::Present), CheckMode::DryRun)
        .await
        .unwrap();

    assert!(outcome.changed());
    assert!(outcome.node().is_none());
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_absent_deletes_by_uri() {
    let swis = swis_with_router1();
    let outcome = node::run(&swis, &router1_params(NodeState::Absent), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.changed());
    assert_eq!(
        swis.corrective_calls(),
        vec![Call::Delete {
            uri: "swis://orion/Orion/Orion.Nodes/NodeID=7".into()
        }]
    );
}

#[tokio::test]
async fn test_absent_missing_node_is_unchanged() {
    let swis = FakeSwis::new();
    let outcome = node::run(&swis, &router1_params(NodeState::Absent), CheckMode::Apply)
        .await
        .unwrap();

    assert!(!outcome.changed());
    assert!(!outcome.is_skipped());
}

#[test_case(NodeState::Managed)]
#[test_case(NodeState::Unmanaged)]
#[test_case(NodeState::Muted)]
#[test_case(NodeState::Unmuted)]
#[tokio::test]
async fn test_state_change_on_missing_node_is_skipped(state: NodeState) {
    let swis = FakeSwis::new();
    let outcome = node::run(&swis, &router1_params(state), CheckMode::Apply).await.unwrap();

    assert!(outcome.is_skipped());
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_unmanage_sends_window() {
    let swis = swis_with_router1();
    let outcome = node::run(&swis, &router1_params(NodeState::Unmanaged), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.changed());
    let calls = swis.invokes_of("Unmanage");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0], "N:7");
    assert_eq!(calls[0][3], false);
}

#[tokio::test]
async fn test_mute_only_when_not_suppressed() {
    let swis = swis_with_router1().on_invoke("GetAlertSuppressionState", json!([{"SuppressionMode": 1}]));
    let outcome = node::run(&swis, &router1_params(NodeState::Muted), CheckMode::Apply)
        .await
        .unwrap();

    assert!(!outcome.changed());
    assert!(swis.invokes_of("SuppressAlerts").is_empty());
}

#[tokio::test]
async fn test_remote_failure_names_the_step() {
    let swis = FakeSwis::new().fail_on("create", "Node with IP 10.0.0.1 already exists");
    let err = node::run(&swis, &router1_params(NodeState::Present), CheckMode::Apply)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to create node: Node with IP 10.0.0.1 already exists"
    );
}

#[tokio::test]
async fn test_custom_property_update() {
    let swis = swis_with_router1().on_query(
        "FROM Orion.NodesCustomProperties",
        vec![row(json!({"Site": "Chicago"}))],
    );
    let params = CustomPropertyParams {
        node: NodeRef::by_name("router1"),
        state: PresenceState::Present,
        property_name: "Site".into(),
        property_value: Some("Denver".into()),
    };

    let outcome = custom_property::run(&swis, &params, CheckMode::Apply).await.unwrap();

    assert!(outcome.changed());
    assert_eq!(
        swis.corrective_calls(),
        vec![Call::Update {
            uri: "swis://orion/Orion/Orion.Nodes/NodeID=7/CustomProperties".into(),
            properties: row(json!({"Site": "Denver"})),
        }]
    );
    let change = outcome.payload().unwrap();
    assert_eq!(change.before, Some(json!("Chicago")));
    assert_eq!(change.after, Some(json!("Denver")));
}

#[tokio::test]
async fn test_unknown_custom_poller_is_a_precondition_failure() {
    let swis = swis_with_router1();
    let params = CustomPollerParams {
        node: NodeRef::by_name("router1"),
        state: PresenceState::Present,
        custom_poller: "ciscoMemoryPoolFree".into(),
    };

    let err = custom_poller::run(&swis, &params, CheckMode::Apply).await.unwrap_err();
    assert!(matches!(err, OrionError::Precondition(_)));
    assert_eq!(err.to_string(), "Custom poller ciscoMemoryPoolFree not found.");
}

#[tokio::test]
async fn test_poller_enabled_flip_updates_in_place() {
    let poller_uri = "swis://orion/Orion/Orion.Pollers/PollerID=12";
    let swis = swis_with_router1().on_query(
        "FROM Orion.Pollers",
        vec![row(json!({"PollerType": "N.Cpu.SNMP.HrProcessorLoad", "Enabled": false, "Uri": poller_uri}))],
    );
    let params = NodePollerParams {
        node: NodeRef::by_name("router1"),
        state: PresenceState::Present,
        poller: "N.Cpu.SNMP.HrProcessorLoad".into(),
        enabled: true,
    };

    let outcome = node_poller::run(&swis, &params, CheckMode::Apply).await.unwrap();
    assert!(outcome.changed());
    let corrective = swis.corrective_calls();
    assert_eq!(corrective.len(), 1);
    assert!(matches!(&corrective[0], Call::Update { uri, .. } if uri == poller_uri));
}

#[tokio::test]
async fn test_update_node_sends_only_differences() {
    let uri = "swis://orion/Orion/Orion.Nodes/NodeID=7";
    let swis = swis_with_router1().on_read(uri, row(json!({"Caption": "router1", "PollInterval": 120})));
    let params = UpdateNodeParams {
        node: NodeRef::by_name("router1"),
        properties: row(json!({"Caption": "router1", "PollInterval": "60"})),
    };

    let outcome = update_node::run(&swis, &params, CheckMode::Apply).await.unwrap();
    assert!(outcome.changed());
    assert_eq!(
        swis.corrective_calls(),
        vec![Call::Update {
            uri: uri.into(),
            properties: row(json!({"PollInterval": "60"})),
        }]
    );
}
