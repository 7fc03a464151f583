//! Typed payloads of the Element OS JSON-RPC methods the probe consumes.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: serde_json::Value,
    pub id: u32,
}

#[derive(Debug, Deserialize)]
pub struct RpcFault {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GetClusterState`, answered by a storage node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeClusterState {
    pub state: String,
    #[serde(default)]
    pub cluster: Option<String>,
}

/// `TestConnectMvip`
#[derive(Debug, Clone, Deserialize)]
pub struct MvipConnectTest {
    pub details: MvipConnectDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MvipConnectDetails {
    #[serde(default)]
    pub mvip: Option<String>,
}

/// `GetClusterStats`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatsResult {
    pub cluster_stats: ClusterStats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStats {
    pub read_bytes: u64,
    pub write_bytes: u64,
    /// Kept as the API rendered it so `95.0` is shown as `95.0`.
    pub cluster_utilization: serde_json::Number,
}

/// `ListISCSISessions`; only the count matters.
#[derive(Debug, Clone, Deserialize)]
pub struct IscsiSessions {
    pub sessions: Vec<IgnoredAny>,
}

/// `GetClusterInfo`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfoResult {
    pub cluster_info: ClusterInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    pub ensemble: Vec<String>,
}

/// `GetClusterVersionInfo`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionInfo {
    pub cluster_version: String,
}

/// `ListClusterFaults`
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterFaults {
    pub faults: Vec<ClusterFault>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterFault {
    #[serde(default)]
    pub resolved: bool,
    pub date: String,
    pub details: String,
}
