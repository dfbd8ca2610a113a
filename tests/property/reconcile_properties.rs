// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Reconcile Modules
//!
//! - Desired state equal to current state: `changed = false`, no corrective call
//! - Dry run: no corrective call, whatever `changed` predicts

use proptest::prelude::*;
use serde_json::{json, Value};

use orion_infrastructure::client::Row;
use orion_infrastructure::domain::NodeRef;
use orion_infrastructure::reconcile::CheckMode;
use orion_infrastructure::resources::custom_property::{self, CustomPropertyParams};
use orion_infrastructure::resources::node::{self, NodeParams, NodeState};
use orion_infrastructure::resources::node_poller::{self, NodePollerParams};
use orion_infrastructure::resources::update_node::{self, UpdateNodeParams};
use orion_infrastructure::resources::PresenceState;

use crate::fixtures::*;

const NODE_URI: &str = "swis://orion/Orion/Orion.Nodes/NodeID=7";

fn property_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _-]{1,16}"
}

fn presence() -> impl Strategy<Value = PresenceState> {
    prop_oneof![Just(PresenceState::Present), Just(PresenceState::Absent)]
}

fn node_state() -> impl Strategy<Value = NodeState> {
    prop_oneof![
        Just(NodeState::Present),
        Just(NodeState::Absent),
        Just(NodeState::Managed),
        Just(NodeState::Unmanaged),
        Just(NodeState::Muted),
        Just(NodeState::Unmuted),
    ]
}

fn node_properties() -> impl Strategy<Value = Row> {
    prop::collection::btree_map("[A-Z][A-Za-z]{2,10}", property_value(), 0..5)
        .prop_map(|map| map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

fn custom_property_swis(current: Option<&str>) -> FakeSwis {
    let rows = match current {
        Some(value) => vec![row(json!({"Site": value}))],
        None => vec![],
    };
    swis_with_router1().on_query("FROM Orion.NodesCustomProperties", rows)
}

fn custom_property_params(state: PresenceState, value: Option<String>) -> CustomPropertyParams {
    CustomPropertyParams {
        node: NodeRef::by_name("router1"),
        state,
        property_name: "Site".into(),
        property_value: value,
    }
}

proptest! {
    #[test]
    fn prop_equal_custom_property_is_unchanged(value in property_value()) {
        let swis = custom_property_swis(Some(&value));
        let params = custom_property_params(PresenceState::Present, Some(value));

        let outcome = tokio_test::block_on(custom_property::run(&swis, &params, CheckMode::Apply)).unwrap();
        prop_assert!(!outcome.changed());
        prop_assert!(swis.corrective_calls().is_empty());
    }

    #[test]
    fn prop_absent_custom_property_is_unchanged(value in prop::option::of(property_value())) {
        let swis = custom_property_swis(None);
        let params = custom_property_params(PresenceState::Absent, value);

        let outcome = tokio_test::block_on(custom_property::run(&swis, &params, CheckMode::Apply)).unwrap();
        prop_assert!(!outcome.changed());
        prop_assert!(swis.corrective_calls().is_empty());
    }

    #[test]
    fn prop_equal_node_properties_are_unchanged(properties in node_properties()) {
        let swis = swis_with_router1().on_read(NODE_URI, properties.clone());
        let params = UpdateNodeParams { node: NodeRef::by_name("router1"), properties };

        let outcome = tokio_test::block_on(update_node::run(&swis, &params, CheckMode::Apply)).unwrap();
        prop_assert!(!outcome.changed());
        prop_assert!(swis.corrective_calls().is_empty());
    }

    #[test]
    fn prop_equal_poller_is_unchanged(enabled in any::<bool>()) {
        let swis = swis_with_router1().on_query(
            "FROM Orion.Pollers",
            vec![row(json!({"PollerType": "N.Cpu.SNMP.HrProcessorLoad", "Enabled": enabled, "Uri": "swis://p"}))],
        );
        let params = NodePollerParams {
            node: NodeRef::by_name("router1"),
            state: PresenceState::Present,
            poller: "N.Cpu.SNMP.HrProcessorLoad".into(),
            enabled,
        };

        let outcome = tokio_test::block_on(node_poller::run(&swis, &params, CheckMode::Apply)).unwrap();
        prop_assert!(!outcome.changed());
        prop_assert!(swis.corrective_calls().is_empty());
    }

    #[test]
    fn prop_dry_run_custom_property_issues_no_call(
        current in prop::option::of(property_value()),
        desired in property_value(),
        state in presence(),
    ) {
        let swis = custom_property_swis(current.as_deref());
        let params = custom_property_params(state, Some(desired));

        tokio_test::block_on(custom_property::run(&swis, &params, CheckMode::DryRun)).unwrap();
        prop_assert!(swis.corrective_calls().is_empty());
    }

    #[test]
    fn prop_dry_run_node_issues_no_call(
        state in node_state(),
        exists in any::<bool>(),
        suppressed in 0i64..=1,
    ) {
        let swis = (if exists { swis_with_router1() } else { FakeSwis::new() })
            .on_invoke("GetAlertSuppressionState", json!([{"SuppressionMode": suppressed}]));
        let mut reference = NodeRef::by_name("router1");
        reference.ip_address = Some("10.0.0.1".into());
        let params = NodeParams::new(reference, state);

        tokio_test::block_on(node::run(&swis, &params, CheckMode::DryRun)).unwrap();
        prop_assert!(swis.corrective_calls().is_empty());
    }

    #[test]
    fn prop_dry_run_update_node_issues_no_call(current in node_properties(), desired in node_properties()) {
        let swis = swis_with_router1().on_read(NODE_URI, current);
        let params = UpdateNodeParams { node: NodeRef::by_name("router1"), properties: desired };

        tokio_test::block_on(update_node::run(&swis, &params, CheckMode::DryRun)).unwrap();
        prop_assert!(swis.corrective_calls().is_empty());
    }
}
