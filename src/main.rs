mod activity;
mod cli;
mod config;
mod error;
mod probe;
mod report;
mod rpc;
mod severity;

use cli::{ProbeRequest, USAGE};
use config::ProbeConfig;
use error::ProbeError;
use report::Report;
use rpc::RpcClient;
use severity::Severity;
use std::io::IsTerminal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let status = match run().await {
        Ok((report, table_width)) => {
            let interactive = std::io::stdout().is_terminal();
            println!("{}", report.render(interactive, table_width));
            report.status
        }
        Err(err) => {
            error!(error = %err, "probe failed");
            print_usage(&err);
            Severity::Unknown
        }
    };

    std::process::exit(status.exit_code());
}

async fn run() -> Result<(Report, usize), ProbeError> {
    let request = ProbeRequest::parse_from(std::env::args_os())?;
    let cfg = ProbeConfig::load()?;
    info!(
        host = %request.host,
        port = request.port,
        mode = ?request.mode,
        api_version = %cfg.api_version,
        "starting probe"
    );

    request.resolve_host().await?;
    let client = RpcClient::new(&request, &cfg)?;
    let report = probe::run_probe(&client, &request, &cfg).await?;
    info!(status = ?report.status, "probe finished");

    Ok((report, cfg.table_width))
}

fn print_usage(err: &ProbeError) {
    let program = std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sfcheck".to_string());
    println!("ERROR: {err}");
    println!("USAGE: {program} {USAGE}");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
