// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Configuration Manager (NCM) membership and connection profile

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{RowExt, Swis};
use crate::domain::ncm::NO_PROFILE;
use crate::domain::{Node, NodeRef, ProfileIndex};
use crate::errors::{OrionError, OrionResult};
use crate::reconcile::{CheckMode, ModuleOutcome, Reconciler};
use crate::resolver::{lookups, resolve_node};

use super::PresenceState;

const CIRRUS_NODES: &str = "Cirrus.Nodes";

fn default_profile() -> String {
    NO_PROFILE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeNcmParams {
    #[serde(flatten)]
    pub node: NodeRef,
    pub state: PresenceState,
    /// Connection profile name; `-1` clears the profile
    #[serde(default = "default_profile")]
    pub profile_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NcmMembership {
    pub ncm_node_id: Option<String>,
    pub connection_profile: Option<i64>,
}

pub async fn connection_profiles(swis: &dyn Swis) -> OrionResult<ProfileIndex> {
    let profiles = swis
        .invoke(CIRRUS_NODES, "GetAllConnectionProfiles", Vec::new())
        .await
        .map_err(|e| e.during("list connection profiles"))?;
    ProfileIndex::from_value(&profiles)
}

async fn ncm_node_object(swis: &dyn Swis, ncm_node_id: &str) -> OrionResult<Value> {
    swis.invoke(CIRRUS_NODES, "GetNode", vec![ncm_node_id.into()])
        .await
        .map_err(|e| e.during("read NCM node"))
}

fn connection_profile_of(object: &Value) -> OrionResult<i64> {
    object
        .as_object()
        .ok_or_else(|| OrionError::Parse(format!("NCM node is not an object: {}", object)))?
        .int("ConnectionProfile")
}

async fn set_connection_profile(swis: &dyn Swis, mut object: Value, profile: i64) -> OrionResult<()> {
    object["ConnectionProfile"] = profile.into();
    swis.invoke(CIRRUS_NODES, "UpdateNode", vec![object]).await?;
    Ok(())
}

async fn add_to_ncm(swis: &dyn Swis, node: &Node, profile: i64) -> OrionResult<String> {
    swis.invoke(CIRRUS_NODES, "AddNodeToNCM", vec![node.node_id.into()]).await?;

    let ncm_node_id = lookups::ncm_node_id(swis, node).await?.ok_or_else(|| {
        OrionError::Precondition(format!("Node {} was not found in NCM after adding it", node.caption))
    })?;

    let object = ncm_node_object(swis, &ncm_node_id).await?;
    if connection_profile_of(&object)? != profile {
        set_connection_profile(swis, object, profile).await?;
    }
    Ok(ncm_node_id)
}

pub async fn run(swis: &dyn Swis, params: &NodeNcmParams, mode: CheckMode) -> OrionResult<ModuleOutcome<NcmMembership>> {
    let Some(node) = resolve_node(swis, &params.node).await? else {
        return Ok(ModuleOutcome::node_not_found());
    };

    let mut membership = NcmMembership {
        ncm_node_id: lookups::ncm_node_id(swis, &node).await?,
        connection_profile: None,
    };
    let mut reconciler = Reconciler::new(mode);

    match params.state {
        PresenceState::Present => {
            let profile = connection_profiles(swis).await?.resolve(&params.profile_name)?;

            match membership.ncm_node_id.clone() {
                Some(ncm_node_id) => {
                    let object = ncm_node_object(swis, &ncm_node_id).await?;
                    let current = connection_profile_of(&object)?;
                    reconciler
                        .converge(current != profile, "update NCM connection profile", || {
                            set_connection_profile(swis, object, profile)
                        })
                        .await?;
                }
                None => {
                    if let Some(ncm_node_id) = reconciler
                        .converge(true, "add node to NCM", || add_to_ncm(swis, &node, profile))
                        .await?
                    {
                        membership.ncm_node_id = Some(ncm_node_id);
                    }
                }
            }
            membership.connection_profile = Some(profile);
        }
        PresenceState::Absent => {
            if let Some(ncm_node_id) = membership.ncm_node_id.clone() {
                reconciler
                    .converge(true, "remove node from NCM", || {
                        swis.invoke(CIRRUS_NODES, "RemoveNode", vec![ncm_node_id.into()])
                    })
                    .await?;
            }
        }
    }

    Ok(reconciler.finish(Some(node), membership))
}
