use crate::error::ProbeError;
use crate::report::Report;
use crate::rpc::types::{MvipConnectTest, NodeClusterState};
use crate::rpc::RpcClient;
use crate::severity::{Severity, Signal};
use serde_json::json;
use tracing::debug;

const ACTIVE_STATE: &str = "Active";
const NOT_IN_CLUSTER: &str = "n/a Not in Cluster";

/// Cluster membership of a single storage node.
pub async fn probe_node(client: &RpcClient) -> Result<Report, ProbeError> {
    let state: NodeClusterState = client
        .call("GetClusterState", json!({ "force": "true", "nodeID": "1" }))
        .await?;
    debug!(host = client.host(), state = %state.state, "node cluster state");

    if state.state != ACTIVE_STATE {
        return Ok(node_report(
            Signal::new(state.state, Severity::Unknown),
            "n/a",
            Signal::ok("n/a"),
        ));
    }

    let cluster = state.cluster.ok_or_else(|| {
        client.malformed("GetClusterState", "missing field `cluster`".to_string())
    })?;

    let test: MvipConnectTest = client.call("TestConnectMvip", json!({})).await?;
    let mvip = match test.details.mvip {
        Some(mvip) => Signal::ok(mvip),
        None => Signal::new(NOT_IN_CLUSTER, Severity::Warning),
    };

    Ok(node_report(Signal::ok(state.state), &cluster, mvip))
}

fn node_report(node_status: Signal, cluster_name: &str, mvip: Signal) -> Report {
    let status = Severity::worst([node_status.severity, mvip.severity]);
    Report::new(status)
        .field("Node Status", "Node Status", node_status.display())
        .field("Cluster Name", "Cluster Name", cluster_name)
        .field("MVIP", "MVIP", mvip.display())
}
