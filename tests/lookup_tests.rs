// Copyright (c) 2025 - Cowboy AI, Inc.
//! Read-only lookups, ad-hoc queries and NCM scenarios

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use orion_infrastructure::errors::OrionError;
use orion_infrastructure::reconcile::CheckMode;
use orion_infrastructure::resources::ncm_config::{self, NcmConfigParams, HISTORY_LIMIT};
use orion_infrastructure::resources::node_info::{self, NodeInfoParams};
use orion_infrastructure::resources::node_interface_info::{self, NodeInterfaceInfoParams};
use orion_infrastructure::resources::node_ncm::{self, NcmMembership, NodeNcmParams};
use orion_infrastructure::resources::node_poller_info::{self, NodePollerInfoParams};
use orion_infrastructure::resources::query::{self, QueryParams};
use orion_infrastructure::resources::volume_info::{self, VolumeInfoParams};

const NCM_NODE_ID: &str = "6f1c2a8e-3b4d-4e5f-8a9b-0c1d2e3f4a5b";

fn params<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn snmp_router1() -> FakeSwis {
    let mut node = node_row(7, "router1", "10.0.0.1");
    node.insert("ObjectSubType".into(), json!("SNMP"));
    FakeSwis::new().on_query(NODE_QUERY, vec![node])
}

#[tokio::test]
async fn test_icmp_node_is_reported_without_polling() {
    let swis = swis_with_router1();
    let outcome = node_info::run(&swis, &params::<NodeInfoParams>(json!({"name": "router1"})), CheckMode::Apply)
        .await
        .unwrap();

    assert!(!outcome.changed());
    assert_eq!(outcome.report().unwrap().node.as_ref().unwrap().node_id, 7);
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_stale_snmp_node_is_polled_first() {
    let swis = snmp_router1();
    let outcome = node_info::run(&swis, &params::<NodeInfoParams>(json!({"name": "router1"})), CheckMode::Apply)
        .await
        .unwrap();

    assert!(!outcome.changed());
    assert_eq!(swis.invokes_of("PollNow"), vec![vec![json!("N:7")]]);
}

#[tokio::test]
async fn test_stale_snmp_node_is_not_polled_in_dry_run() {
    let swis = snmp_router1();
    node_info::run(&swis, &params::<NodeInfoParams>(json!({"name": "router1"})), CheckMode::DryRun)
        .await
        .unwrap();

    assert!(swis.invokes_of("PollNow").is_empty());
}

#[tokio::test]
async fn test_missing_node_is_skipped() {
    let swis = FakeSwis::new();
    let outcome = node_info::run(&swis, &params::<NodeInfoParams>(json!({"name": "ghost"})), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.is_skipped());
}

#[tokio::test]
async fn test_node_outside_ncm_is_already_absent() {
    let swis = swis_with_router1();
    let p: NodeNcmParams = params(json!({"name": "router1", "state": "absent"}));

    let outcome = node_ncm::run(&swis, &p, CheckMode::Apply).await.unwrap();
    assert!(!outcome.changed());
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_ncm_member_is_removed() {
    let swis = swis_with_router1().on_query("FROM Cirrus.Nodes", vec![row(json!({"NodeID": NCM_NODE_ID}))]);
    let p: NodeNcmParams = params(json!({"name": "router1", "state": "absent"}));

    let outcome = node_ncm::run(&swis, &p, CheckMode::Apply).await.unwrap();
    assert!(outcome.changed());
    assert_eq!(swis.invokes_of("RemoveNode"), vec![vec![json!(NCM_NODE_ID)]]);
}

const CIRRUS_QUERY: &str = "FROM Cirrus.Nodes";

fn with_profiles(swis: FakeSwis, current_profile: i64) -> FakeSwis {
    swis.on_invoke(
        "GetAllConnectionProfiles",
        json!([{"ID": 3, "Name": "Juniper_NCM"}, {"ID": 5, "Name": "Cisco_SSH"}]),
    )
    .on_invoke("GetNode", json!({"NodeID": NCM_NODE_ID, "ConnectionProfile": current_profile}))
}

fn ncm_present() -> NodeNcmParams {
    params(json!({"name": "router1", "state": "present", "profile_name": "Cisco_SSH"}))
}

#[tokio::test]
async fn test_node_added_to_ncm_with_profile() {
    let swis = with_profiles(swis_with_router1(), -1)
        .on_query(CIRRUS_QUERY, vec![])
        .on_query(CIRRUS_QUERY, vec![row(json!({"NodeID": NCM_NODE_ID}))]);

    let outcome = node_ncm::run(&swis, &ncm_present(), CheckMode::Apply).await.unwrap();

    assert!(outcome.changed());
    assert_eq!(swis.invokes_of("AddNodeToNCM"), vec![vec![json!(7)]]);
    assert_eq!(
        swis.invokes_of("UpdateNode"),
        vec![vec![json!({"NodeID": NCM_NODE_ID, "ConnectionProfile": 5})]]
    );
    assert_eq!(
        outcome.payload(),
        Some(&NcmMembership {
            ncm_node_id: Some(NCM_NODE_ID.into()),
            connection_profile: Some(5),
        })
    );
}

#[tokio::test]
async fn test_ncm_profile_updated_in_place() {
    let swis = with_profiles(swis_with_router1(), 3).on_query(CIRRUS_QUERY, vec![row(json!({"NodeID": NCM_NODE_ID}))]);

    let outcome = node_ncm::run(&swis, &ncm_present(), CheckMode::Apply).await.unwrap();

    assert!(outcome.changed());
    assert!(swis.invokes_of("AddNodeToNCM").is_empty());
    assert_eq!(
        swis.invokes_of("UpdateNode"),
        vec![vec![json!({"NodeID": NCM_NODE_ID, "ConnectionProfile": 5})]]
    );
}

#[tokio::test]
async fn test_ncm_member_with_profile_is_unchanged() {
    let swis = with_profiles(swis_with_router1(), 5).on_query(CIRRUS_QUERY, vec![row(json!({"NodeID": NCM_NODE_ID}))]);

    let outcome = node_ncm::run(&swis, &ncm_present(), CheckMode::Apply).await.unwrap();

    assert!(!outcome.changed());
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_ncm_add_in_dry_run() {
    let swis = with_profiles(swis_with_router1(), -1);

    let outcome = node_ncm::run(&swis, &ncm_present(), CheckMode::DryRun).await.unwrap();

    assert!(outcome.changed());
    assert_eq!(swis.corrective_calls(), vec![]);
    assert_eq!(
        outcome.payload(),
        Some(&NcmMembership {
            ncm_node_id: None,
            connection_profile: Some(5),
        })
    );
}

#[tokio::test]
async fn test_unknown_connection_profile() {
    let swis = with_profiles(swis_with_router1(), -1);
    let p: NodeNcmParams = params(json!({"name": "router1", "state": "present", "profile_name": "Arista"}));

    let err = node_ncm::run(&swis, &p, CheckMode::Apply).await.unwrap_err();
    assert!(matches!(err, OrionError::InvalidParameters(_)));
    assert_eq!(swis.corrective_calls(), vec![]);
}

const ARCHIVE_QUERY: &str = "FROM Cirrus.ConfigArchive";

fn ncm_member() -> FakeSwis {
    swis_with_router1().on_query(CIRRUS_QUERY, vec![row(json!({"NodeID": NCM_NODE_ID.to_uppercase()}))])
}

fn archive_rows(count: usize) -> Vec<orion_infrastructure::client::Row> {
    (0..count)
        .map(|i| {
            row(json!({
                "ConfigID": format!("cfg-{}", i),
                "ConfigTitle": "manual-import",
                "ConfigType": "Manual",
                "DownloadTime": format!("2026-01-{:02}T00:00:00Z", 19 - i),
            }))
        })
        .collect()
}

fn config_params(method: &str, content: Option<&str>) -> NcmConfigParams {
    params(json!({"name": "router1", "method": method, "config_content": content}))
}

fn archive_query_texts(swis: &FakeSwis) -> Vec<String> {
    swis.calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Query { text, .. } if text.contains(ARCHIVE_QUERY) => Some(text),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_config_import_returns_recent_history() {
    let swis = ncm_member()
        .on_invoke("ImportConfig", json!("cfg-0"))
        .on_query(ARCHIVE_QUERY, archive_rows(HISTORY_LIMIT));

    let outcome = ncm_config::run(&swis, &config_params("import", Some("hostname router1")), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.changed());
    let imports = swis.invokes_of("ImportConfig");
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0][0], json!(NCM_NODE_ID));
    assert_eq!(imports[0][2], json!("hostname router1"));

    let result = outcome.payload().unwrap();
    assert_eq!(result.method, "ImportConfig");
    assert_eq!(result.ncm_node_id, NCM_NODE_ID);
    assert_eq!(result.config_length, "hostname router1".len());
    assert_eq!(result.operation, "Configuration processed for device router1");
    assert_eq!(result.result, Some(json!("cfg-0")));
    assert_eq!(result.history.len(), HISTORY_LIMIT);

    let history_queries = archive_query_texts(&swis);
    assert_eq!(history_queries.len(), 1);
    assert!(history_queries[0].starts_with("SELECT TOP 5 "));
    assert!(history_queries[0].ends_with("ORDER BY DownloadTime DESC"));
}

#[tokio::test]
async fn test_config_upload_has_no_history() {
    let swis = ncm_member().on_invoke("UploadConfig", json!(true));

    let outcome = ncm_config::run(&swis, &config_params("upload", Some("interface Gi0/1")), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.changed());
    let uploads = swis.invokes_of("UploadConfig");
    assert_eq!(uploads[0][0], json!([NCM_NODE_ID]));
    assert_eq!(uploads[0][3], json!(true));
    assert!(outcome.payload().unwrap().history.is_empty());
    assert!(archive_query_texts(&swis).is_empty());
}

#[tokio::test]
async fn test_config_download() {
    let swis = ncm_member()
        .on_invoke("DownloadConfig", json!(["transfer-1"]))
        .on_query(ARCHIVE_QUERY, archive_rows(2));

    let outcome = ncm_config::run(&swis, &config_params("download", None), CheckMode::Apply)
        .await
        .unwrap();

    assert!(outcome.changed());
    assert_eq!(
        swis.invokes_of("DownloadConfig"),
        vec![vec![json!([NCM_NODE_ID]), json!("Manual")]]
    );
    let result = outcome.payload().unwrap();
    assert_eq!(result.operation, "Configuration downloaded from device router1");
    assert_eq!(result.history.len(), 2);
}

#[tokio::test]
async fn test_config_download_in_dry_run() {
    let swis = ncm_member();

    let outcome = ncm_config::run(&swis, &config_params("download", None), CheckMode::DryRun)
        .await
        .unwrap();

    assert!(outcome.changed());
    assert_eq!(swis.corrective_calls(), vec![]);
    let result = outcome.payload().unwrap();
    assert_eq!(result.operation, "Configuration would be downloaded from device router1");
    assert_eq!(result.result, None);
    assert!(archive_query_texts(&swis).is_empty());
}

#[tokio::test]
async fn test_config_requires_ncm_membership() {
    let swis = swis_with_router1();
    let err = ncm_config::run(&swis, &config_params("download", None), CheckMode::Apply)
        .await
        .unwrap_err();

    assert!(matches!(err, OrionError::Precondition(_)));
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_volume_info() {
    let swis = swis_with_router1().on_query(
        "FROM Orion.Volumes",
        vec![row(json!({
            "VolumeID": 31,
            "Caption": "/var",
            "VolumeIndex": 4,
            "Uri": "swis://orion/Orion/Orion.Nodes/NodeID=7/Volumes/VolumeID=31",
        }))],
    );
    let p: VolumeInfoParams = params(json!({"name": "router1", "volume": {"name": "/var"}}));

    let outcome = volume_info::run(&swis, &p, CheckMode::DryRun).await.unwrap();

    assert!(!outcome.changed());
    let volume = outcome.payload().unwrap();
    assert_eq!(volume.volume_id, 31);
    assert_eq!(volume.volume_index, 4);
    assert_eq!(swis.corrective_calls(), vec![]);
}

#[tokio::test]
async fn test_missing_volume_is_skipped() {
    let swis = swis_with_router1();
    let p: VolumeInfoParams = params(json!({"name": "router1", "volume": {"caption": "/srv"}}));

    let outcome = volume_info::run(&swis, &p, CheckMode::Apply).await.unwrap();
    assert!(outcome.is_skipped());
}

#[tokio::test]
async fn test_node_poller_info() {
    let swis = swis_with_router1().on_query(
        "FROM Orion.Pollers WHERE NetObject",
        vec![
            row(json!({"PollerType": "N.Cpu.SNMP.HrProcessorLoad", "Enabled": true, "Uri": "swis://p/1"})),
            row(json!({"PollerType": "N.Memory.SNMP.HrStorage", "Enabled": false, "Uri": "swis://p/2"})),
        ],
    );
    let p: NodePollerInfoParams = params(json!({"name": "router1"}));

    let outcome = node_poller_info::run(&swis, &p, CheckMode::Apply).await.unwrap();

    assert!(!outcome.changed());
    let pollers = outcome.payload().unwrap();
    assert_eq!(pollers.len(), 2);
    assert!(!pollers[1].enabled);

    let parameters = swis
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::Query { text, parameters } if text.contains("FROM Orion.Pollers") => Some(parameters),
            _ => None,
        })
        .unwrap();
    assert_eq!(parameters["net_object"], "N:7");
}

#[tokio::test]
async fn test_node_interface_info() {
    let swis = swis_with_router1().on_query(
        "FROM Orion.NPM.Interfaces WHERE NodeID",
        vec![row(json!({"Caption": "Gi0/1", "Name": "GigabitEthernet0/1", "InterfaceID": 55, "Speed": 1e9}))],
    );
    let p: NodeInterfaceInfoParams = params(json!({"node_id": "7"}));

    let outcome = node_interface_info::run(&swis, &p, CheckMode::Apply).await.unwrap();

    assert!(!outcome.changed());
    let interfaces = outcome.payload().unwrap();
    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].interface_id, 55);
    assert_eq!(interfaces[0].name, "GigabitEthernet0/1");
}

#[tokio::test]
async fn test_query_rows_written_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("cisco.csv");
    let swis = FakeSwis::new().on_query(
        "WHERE Vendor = @vendor",
        vec![
            row(json!({"NodeID": 7, "Caption": "router1"})),
            row(json!({"NodeID": 8, "Caption": "router2"})),
        ],
    );
    let p: QueryParams = params(json!({
        "query": "SELECT NodeID, Caption FROM Orion.Nodes WHERE Vendor = @vendor",
        "parameters": {"vendor": "Cisco"},
        "csv_path": csv_path,
    }));

    let outcome = query::run(&swis, &p, CheckMode::Apply).await.unwrap();

    assert!(!outcome.changed());
    assert_eq!(outcome.payload().unwrap().len(), 2);
    assert_eq!(
        swis.calls(),
        vec![Call::Query {
            text: "SELECT NodeID, Caption FROM Orion.Nodes WHERE Vendor = @vendor".into(),
            parameters: row(json!({"vendor": "Cisco"})),
        }]
    );

    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().map(|h| h.split(',').count()), Some(2));
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let swis = FakeSwis::new();
    let p: QueryParams = params(json!({"query": "  "}));

    let err = query::run(&swis, &p, CheckMode::Apply).await.unwrap_err();
    assert!(matches!(err, OrionError::InvalidParameters(_)));
    assert_eq!(swis.calls(), vec![]);
}
