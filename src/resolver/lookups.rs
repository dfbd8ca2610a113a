// Copyright (c) 2025 - Cowboy AI, Inc.
//! Sub-resource lookups
//!
//! Each lookup issues one parameterized query and returns `None` when the
//! object does not exist. Identifiers that have to be spliced into query
//! text (custom property columns) are validated first.

use serde_json::Value;
use tracing::debug;

use crate::client::{Row, RowExt, Swis};
use crate::domain::credential::SNMPV3_CREDENTIAL_TYPE;
use crate::domain::{
    ArchivedConfig, CredentialSet, Interface, NetObject, Node, Poller, StoredSnmpv3Credential, Volume,
};
use crate::errors::{OrionError, OrionResult};
use crate::swql::{identifier, Query};

/// Engine used when the deployment has a single polling engine
pub const PRIMARY_ENGINE_ID: i64 = 1;

/// Current value of a node custom property, `None` when unset
pub async fn custom_property_value(
    swis: &dyn Swis,
    node: &Node,
    property: &str,
) -> OrionResult<Option<Value>> {
    let column = identifier(property)?;
    let query = Query::new(format!(
        "SELECT {} FROM Orion.NodesCustomProperties WHERE NodeID = @node_id",
        column
    ))
    .param("node_id", node.node_id);

    match swis.query_one(&query).await? {
        Some(row) => Ok(row.opt_field(column).cloned()),
        None => Ok(None),
    }
}

/// Poller of a given type attached to a net object
pub async fn poller(swis: &dyn Swis, net_object: &NetObject, poller_type: &str) -> OrionResult<Option<Poller>> {
    let query = Query::new(
        "SELECT PollerType, Enabled, Uri FROM Orion.Pollers \
         WHERE NetObject = @net_object AND PollerType = @poller_type",
    )
    .param("net_object", net_object.to_string())
    .param("poller_type", poller_type);

    swis.query_one(&query).await?.map(|row| Poller::from_row(&row)).transpose()
}

/// All pollers attached to a net object
pub async fn pollers(swis: &dyn Swis, net_object: &NetObject) -> OrionResult<Vec<Poller>> {
    let query = Query::new("SELECT PollerType, Enabled, Uri FROM Orion.Pollers WHERE NetObject = @net_object")
        .param("net_object", net_object.to_string());

    swis.query(&query).await?.iter().map(Poller::from_row).collect()
}

/// `CustomPollerID` of a Universal Device Poller definition
pub async fn custom_poller_id(swis: &dyn Swis, unique_name: &str) -> OrionResult<Option<String>> {
    let query = Query::new("SELECT CustomPollerID FROM Orion.NPM.CustomPollers WHERE UniqueName = @name")
        .param("name", unique_name);

    swis.query_one(&query)
        .await?
        .map(|row| row.string("CustomPollerID"))
        .transpose()
}

/// URI of a custom poller assignment on a node
pub async fn custom_poller_uri(swis: &dyn Swis, node: &Node, poller_name: &str) -> OrionResult<Option<String>> {
    let query = Query::new(
        "SELECT Uri FROM Orion.NPM.CustomPollerAssignment \
         WHERE NodeID = @node_id AND CustomPollerName = @name",
    )
    .param("node_id", node.node_id)
    .param("name", poller_name);

    uri_of(swis, &query).await
}

/// Volume of a node by caption
pub async fn volume(swis: &dyn Swis, node: &Node, caption: &str) -> OrionResult<Option<Volume>> {
    let query = Query::new(format!(
        "SELECT {} FROM Orion.Volumes WHERE NodeID = @node_id AND Caption = @caption",
        Volume::FIELDS
    ))
    .param("node_id", node.node_id)
    .param("caption", caption);

    swis.query_one(&query).await?.map(|row| Volume::from_row(&row)).transpose()
}

/// Index the next volume on a node should take
pub async fn next_volume_index(swis: &dyn Swis, node: &Node) -> OrionResult<i64> {
    let query = Query::new("SELECT MAX(VolumeIndex) AS max_index FROM Orion.Volumes WHERE NodeID = @node_id")
        .param("node_id", node.node_id);

    let max = swis
        .query_one(&query)
        .await?
        .and_then(|row| row.opt_int("max_index"))
        .unwrap_or(0);
    Ok(max + 1)
}

/// URI of a monitored interface by name
pub async fn interface_uri(swis: &dyn Swis, node: &Node, name: &str) -> OrionResult<Option<String>> {
    let query = Query::new("SELECT Uri FROM Orion.NPM.Interfaces WHERE NodeID = @node_id AND InterfaceName = @name")
        .param("node_id", node.node_id)
        .param("name", name);

    uri_of(swis, &query).await
}

/// Monitored interfaces of a node
pub async fn interfaces(swis: &dyn Swis, node: &Node) -> OrionResult<Vec<Interface>> {
    let query = Query::new(format!(
        "SELECT {} FROM Orion.NPM.Interfaces WHERE NodeID = @node_id",
        Interface::FIELDS
    ))
    .param("node_id", node.node_id);

    swis.query(&query).await?.iter().map(Interface::from_row).collect()
}

pub async fn application_template_id(swis: &dyn Swis, name: &str) -> OrionResult<Option<i64>> {
    let query = Query::new("SELECT ApplicationTemplateID FROM Orion.APM.ApplicationTemplate WHERE Name = @name")
        .param("name", name);

    int_of(swis, &query, "ApplicationTemplateID").await
}

/// Credential owned by the application monitor
pub async fn apm_credential_id(swis: &dyn Swis, name: &str) -> OrionResult<Option<i64>> {
    let query = Query::new("SELECT ID FROM Orion.Credential WHERE CredentialOwner = 'APM' AND Name = @name")
        .param("name", name);

    int_of(swis, &query, "ID").await
}

pub async fn application_id(swis: &dyn Swis, node: &Node, name: &str) -> OrionResult<Option<i64>> {
    let query = Query::new("SELECT ApplicationID FROM Orion.APM.Application WHERE NodeID = @node_id AND Name = @name")
        .param("node_id", node.node_id)
        .param("name", name);

    int_of(swis, &query, "ApplicationID").await
}

/// Additional polling engine with the fewest nodes, or the primary engine
/// when there is only one
pub async fn least_used_engine(swis: &dyn Swis) -> OrionResult<i64> {
    let count = swis
        .query_one(&Query::new("SELECT COUNT(EngineID) AS NumEngines FROM Orion.Engines"))
        .await?
        .and_then(|row| row.opt_int("NumEngines"))
        .unwrap_or(0);

    if count <= 1 {
        return Ok(PRIMARY_ENGINE_ID);
    }

    let engine = swis
        .query_one(&Query::new(
            "SELECT TOP 1 Nodes, EngineID FROM Orion.Engines WHERE EngineID != 1 ORDER BY Nodes ASC",
        ))
        .await?
        .map(|row| row.int("EngineID"))
        .transpose()?
        .unwrap_or(PRIMARY_ENGINE_ID);

    debug!("Selected polling engine {} of {}", engine, count);
    Ok(engine)
}

/// NCM node id (a GUID) for a core node, `None` when NCM does not manage it
pub async fn ncm_node_id(swis: &dyn Swis, node: &Node) -> OrionResult<Option<String>> {
    let query = Query::new("SELECT NodeID FROM Cirrus.Nodes WHERE CoreNodeID = @node_id").param("node_id", node.node_id);

    swis.query_one(&query).await?.map(|row| row.string("NodeID")).transpose()
}

/// Newest archived configurations of an NCM node
pub async fn config_history(swis: &dyn Swis, ncm_node_id: &str, limit: usize) -> OrionResult<Vec<ArchivedConfig>> {
    let query = Query::new(format!(
        "SELECT TOP {} {} FROM Cirrus.ConfigArchive WHERE NodeID = @ncm_node_id ORDER BY DownloadTime DESC",
        limit,
        ArchivedConfig::FIELDS
    ))
    .param("ncm_node_id", ncm_node_id);

    swis.query(&query).await?.iter().map(ArchivedConfig::from_row).collect()
}

/// Credential set by name
pub async fn credential_set(swis: &dyn Swis, name: &str) -> OrionResult<Option<CredentialSet>> {
    let query = Query::new("SELECT ID, Name, CredentialType FROM Orion.Credential WHERE Name = @name").param("name", name);

    swis.query_one(&query)
        .await?
        .map(|row| CredentialSet::from_row(&row))
        .transpose()
}

/// One `Orion.NodeSettings` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSetting {
    pub value: String,
    pub uri: Option<String>,
}

/// Value of a node setting, such as the assigned credential id
pub async fn node_setting(swis: &dyn Swis, node: &Node, setting: &str) -> OrionResult<Option<NodeSetting>> {
    let query = Query::new(
        "SELECT SettingValue, Uri FROM Orion.NodeSettings WHERE NodeID = @node_id AND SettingName = @setting",
    )
    .param("node_id", node.node_id)
    .param("setting", setting);

    Ok(swis.query_one(&query).await?.map(|row| NodeSetting {
        value: row.opt_string("SettingValue").unwrap_or_default(),
        uri: row.opt_string("Uri"),
    }))
}

/// SNMPv3 credential currently bound to a node
pub async fn stored_snmpv3_credential(swis: &dyn Swis, node: &Node) -> OrionResult<Option<StoredSnmpv3Credential>> {
    let query = Query::new(
        "SELECT c.ID AS CredentialID, c.Name AS CredentialName, m.Username, m.AuthenticationKey, \
         m.AuthenticationKeyIsPassword, m.AuthenticationMethod, m.Context, m.PrivacyKey, \
         m.PrivacyKeyIsPassword, m.PrivacyMethod \
         FROM Orion.Nodes n \
         JOIN Orion.NodeSettings s ON n.NodeID = s.NodeID AND s.SettingName = 'ROSNMPCredentialID' \
         JOIN Orion.Credential c ON c.ID = s.SettingValue \
         JOIN Orion.SNMPv3Credentials m ON m.NodeID = n.NodeID \
         WHERE n.NodeID = @node_id",
    )
    .param("node_id", node.node_id);

    swis.query_one(&query)
        .await?
        .map(|row| StoredSnmpv3Credential::from_row(&row))
        .transpose()
}

/// SNMPv3 credential set by name, with its key material
pub async fn snmpv3_credential_by_name(swis: &dyn Swis, name: &str) -> OrionResult<Option<StoredSnmpv3Credential>> {
    let query = Query::new(
        "SELECT c.ID AS CredentialID, c.Name AS CredentialName, s.Username, s.Context, \
         s.AuthenticationMethod, s.AuthenticationKey, s.AuthenticationKeyIsPassword, \
         s.PrivacyMethod, s.PrivacyKey, s.PrivacyKeyIsPassword \
         FROM Orion.Credential c \
         LEFT JOIN Orion.SNMPv3Credentials s ON c.ID = s.ID \
         WHERE c.Name = @name AND c.CredentialType = @credential_type",
    )
    .param("name", name)
    .param("credential_type", SNMPV3_CREDENTIAL_TYPE);

    swis.query_one(&query)
        .await?
        .map(|row| StoredSnmpv3Credential::from_row(&row))
        .transpose()
}

/// Hardware health polling method id configured for a node
pub async fn hardware_health_method(swis: &dyn Swis, node: &Node) -> OrionResult<Option<i64>> {
    let query = Query::new("SELECT PollingMethod FROM Orion.HardwareHealth.HardwareInfoBase WHERE ParentObjectID = @node_id")
        .param("node_id", node.node_id);

    int_of(swis, &query, "PollingMethod").await
}

/// Alert suppression mode of an entity (0 = not suppressed, 1 = suppressed)
pub async fn suppression_mode(swis: &dyn Swis, uri: &str) -> OrionResult<i64> {
    let state = swis
        .invoke(
            "Orion.AlertSuppression",
            "GetAlertSuppressionState",
            vec![Value::Array(vec![uri.into()])],
        )
        .await?;

    state
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .map(|entry: &Row| entry.int("SuppressionMode"))
        .transpose()?
        .ok_or_else(|| OrionError::Parse(format!("unexpected alert suppression state: {}", state)))
}

async fn uri_of(swis: &dyn Swis, query: &Query) -> OrionResult<Option<String>> {
    swis.query_one(query).await?.map(|row| row.string("Uri")).transpose()
}

async fn int_of(swis: &dyn Swis, query: &Query, column: &str) -> OrionResult<Option<i64>> {
    swis.query_one(query).await?.map(|row| row.int(column)).transpose()
}
