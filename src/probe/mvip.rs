use crate::activity::ActivityTracker;
use crate::config::{ProbeConfig, ThresholdsConfig};
use crate::error::ProbeError;
use crate::report::Report;
use crate::rpc::types::{
    ClusterFault, ClusterFaults, ClusterInfoResult, ClusterStatsResult, ClusterVersionInfo,
    IscsiSessions,
};
use crate::rpc::RpcClient;
use crate::severity::{evaluate, Severity, Signal};
use serde_json::json;
use tracing::debug;

/// Fault dates end in a fractional-seconds suffix that is not shown.
const FAULT_DATE_SUFFIX_LEN: usize = 8;

/// Everything the cluster reports in one mvip-mode run.
#[derive(Debug, Clone)]
pub struct ClusterSnapshot {
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub utilization: serde_json::Number,
    pub session_count: usize,
    pub ensemble: Vec<String>,
    pub name: String,
    pub version: String,
    /// `None` when the fault check is disabled and faults were not queried.
    pub faults: Option<Vec<ClusterFault>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub warning: u64,
    pub maximum: u64,
}

impl SessionLimits {
    /// Per-node soft limit scaled by ensemble size, keeping headroom below
    /// it. Both products are truncated, not rounded.
    pub fn for_ensemble(members: usize, cfg: &ThresholdsConfig) -> Self {
        let maximum =
            (members as f64 * f64::from(cfg.sessions_per_node) * cfg.session_headroom) as u64;
        let warning = (maximum as f64 * cfg.session_warning_ratio) as u64;
        Self { warning, maximum }
    }
}

/// Cluster-wide health through the management virtual IP.
pub async fn probe_cluster(client: &RpcClient, cfg: &ProbeConfig) -> Result<Report, ProbeError> {
    let snapshot = fetch_snapshot(client, cfg.checks.cluster_faults).await?;
    evaluate_snapshot(&snapshot, client.host(), cfg)
}

pub async fn fetch_snapshot(
    client: &RpcClient,
    with_faults: bool,
) -> Result<ClusterSnapshot, ProbeError> {
    let stats: ClusterStatsResult = client
        .call("GetClusterStats", json!({ "nodeID": "1", "force": "True" }))
        .await?;
    let sessions: IscsiSessions = client.call("ListISCSISessions", json!({})).await?;
    let info: ClusterInfoResult = client.call("GetClusterInfo", json!({})).await?;
    let version: ClusterVersionInfo = client.call("GetClusterVersionInfo", json!({})).await?;
    let faults = if with_faults {
        let faults: ClusterFaults = client.call("ListClusterFaults", json!({})).await?;
        Some(faults.faults)
    } else {
        None
    };

    Ok(ClusterSnapshot {
        read_bytes: stats.cluster_stats.read_bytes,
        write_bytes: stats.cluster_stats.write_bytes,
        utilization: stats.cluster_stats.cluster_utilization,
        session_count: sessions.sessions.len(),
        ensemble: info.cluster_info.ensemble,
        name: info.cluster_info.name,
        version: version.cluster_version,
        faults,
    })
}

pub fn evaluate_snapshot(
    snapshot: &ClusterSnapshot,
    host: &str,
    cfg: &ProbeConfig,
) -> Result<Report, ProbeError> {
    let faults = match &snapshot.faults {
        Some(faults) if cfg.checks.cluster_faults => fault_signal(faults),
        _ => Signal::ok("n/a"),
    };

    let disk_activity = if cfg.checks.disk_activity {
        let tracker = ActivityTracker::new(&cfg.state_dir, host);
        debug!(path = %tracker.path().display(), "checking disk activity record");
        tracker.check(&format!("{}{}", snapshot.read_bytes, snapshot.write_bytes))?
    } else {
        Signal::ok("n/a")
    };

    let utilization = utilization_signal(&snapshot.utilization, cfg);
    let sessions = session_signal(snapshot.session_count, snapshot.ensemble.len(), cfg);

    let status = Severity::worst(
        [&faults, &disk_activity, &utilization, &sessions].map(|signal| signal.severity),
    );

    Ok(Report::new(status)
        .field("Cluster", "Cluster IP", host)
        .field("Version", "Version", snapshot.version.as_str())
        .field("Disk Activity", "Disk Activity", disk_activity.display())
        .field("Read Bytes", "Read Bytes", snapshot.read_bytes.to_string())
        .field("Write Bytes", "Write Bytes", snapshot.write_bytes.to_string())
        .field("Utilization %", "Utilization", utilization.display())
        .field("iSCSI Sessions", "ISCSI Sessions", sessions.display())
        .field("Cluster Faults", "Cluster Faults", faults.display())
        .field("Cluster Name", "Name", snapshot.name.as_str())
        .field(
            "Ensemble Members",
            "Ensemble",
            format!("[{}]", snapshot.ensemble.join(", ")),
        ))
}

/// Unresolved faults as `<date> <details>`, CRITICAL when there is any.
pub fn fault_signal(faults: &[ClusterFault]) -> Signal {
    let open: Vec<String> = faults
        .iter()
        .filter(|fault| !fault.resolved)
        .map(|fault| format!("{} {}", trim_fault_date(&fault.date), fault.details))
        .collect();

    if open.is_empty() {
        Signal::ok("None")
    } else {
        Signal::new(open.join(", "), Severity::Critical)
    }
}

fn trim_fault_date(date: &str) -> &str {
    let keep = date.chars().count().saturating_sub(FAULT_DATE_SUFFIX_LEN);
    date.char_indices()
        .nth(keep)
        .map_or(date, |(end, _)| &date[..end])
}

fn utilization_signal(utilization: &serde_json::Number, cfg: &ProbeConfig) -> Signal {
    let value = utilization.to_string();
    if !cfg.checks.utilization {
        return Signal::ok(value);
    }

    let percent = utilization.as_f64().unwrap_or_default();
    let severity = evaluate(
        percent,
        cfg.thresholds.utilization_warning_percent,
        cfg.thresholds.utilization_critical_percent,
    );
    Signal::new(value, severity)
}

fn session_signal(count: usize, ensemble_members: usize, cfg: &ProbeConfig) -> Signal {
    if !cfg.checks.sessions {
        return Signal::ok(count.to_string());
    }

    let limits = SessionLimits::for_ensemble(ensemble_members, &cfg.thresholds);
    debug!(
        sessions = count,
        warning = limits.warning,
        maximum = limits.maximum,
        "iscsi session limits"
    );
    let severity = evaluate(count as f64, limits.warning as f64, limits.maximum as f64);
    Signal::new(count.to_string(), severity)
}
