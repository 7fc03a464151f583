pub mod mvip;
pub mod node;

use crate::cli::{ProbeMode, ProbeRequest};
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::report::Report;
use crate::rpc::RpcClient;

/// Runs the probe selected by the request mode. Calls are issued one after
/// another and the first failure aborts the run.
pub async fn run_probe(
    client: &RpcClient,
    request: &ProbeRequest,
    cfg: &ProbeConfig,
) -> Result<Report, ProbeError> {
    match request.mode {
        ProbeMode::Node => node::probe_node(client).await,
        ProbeMode::Mvip => mvip::probe_cluster(client, cfg).await,
    }
}
