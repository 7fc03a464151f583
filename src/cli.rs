use crate::error::ProbeError;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::debug;

pub const USAGE: &str = "(IP|HOSTNAME) PORT USERNAME PASSWORD (mvip|node)";

#[derive(Parser, Debug)]
#[command(name = "sfcheck")]
#[command(version)]
#[command(about = "Query SolidFire and NetApp HCI clusters and nodes for Nagios")]
pub struct Cli {
    /// Cluster MVIP or node address
    pub host: String,
    pub port: u16,
    #[arg(allow_hyphen_values = true)]
    pub username: String,
    #[arg(allow_hyphen_values = true)]
    pub password: String,
    #[arg(value_enum)]
    pub mode: ProbeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProbeMode {
    /// Membership state of a single storage node
    Node,
    /// Cluster-wide health through the management virtual IP
    Mvip,
}

#[derive(Clone)]
pub struct ProbeRequest {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mode: ProbeMode,
}

impl fmt::Debug for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

impl From<Cli> for ProbeRequest {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            username: cli.username,
            password: cli.password,
            mode: cli.mode,
        }
    }
}

impl ProbeRequest {
    /// Parses the positional arguments. `--help` and `--version` print and
    /// exit from here.
    pub fn parse_from<I, T>(args: I) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli.into()),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => Err(argument_error(&err)),
            },
        }
    }

    /// Hostnames must resolve before any request is made. The endpoint keeps
    /// the name as given.
    pub async fn resolve_host(&self) -> Result<(), ProbeError> {
        if self.host.parse::<Ipv4Addr>().is_ok() {
            return Ok(());
        }

        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|source| ProbeError::NameResolution {
                host: self.host.clone(),
                source,
            })?;
        match addrs.next() {
            Some(addr) => {
                debug!(host = %self.host, address = %addr, "resolved hostname");
                Ok(())
            }
            None => Err(ProbeError::NameResolution {
                host: self.host.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses returned"),
            }),
        }
    }
}

fn argument_error(err: &clap::Error) -> ProbeError {
    let message = match err.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::TooFewValues
        | ErrorKind::TooManyValues
        | ErrorKind::UnknownArgument => "Incorrect Number of Arguments.".to_string(),
        ErrorKind::InvalidValue if is_mode_error(err) => {
            "Invalid type specified, use node or mvip".to_string()
        }
        _ => err
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string(),
    };
    ProbeError::BadArguments(message)
}

fn is_mode_error(err: &clap::Error) -> bool {
    use clap::error::{ContextKind, ContextValue};
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.contains("MODE"),
        _ => err.to_string().contains("<MODE>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ProbeRequest, ProbeError> {
        ProbeRequest::parse_from(std::iter::once("sfcheck").chain(args.iter().copied()))
    }

    fn bad_arguments(err: ProbeError) -> String {
        match err {
            ProbeError::BadArguments(message) => message,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn five_positionals_parse() {
        let req = parse(&["10.0.0.5", "443", "admin", "secret", "mvip"]).expect("valid args");
        assert_eq!(req.host, "10.0.0.5");
        assert_eq!(req.port, 443);
        assert_eq!(req.mode, ProbeMode::Mvip);

        let req = parse(&["sf-node-1", "442", "admin", "secret", "node"]).expect("valid args");
        assert_eq!(req.mode, ProbeMode::Node);
    }

    #[test]
    fn missing_argument_is_reported() {
        let err = parse(&["10.0.0.5", "443", "admin", "secret"]).expect_err("four args");
        assert_eq!(bad_arguments(err), "Incorrect Number of Arguments.");
    }

    #[test]
    fn extra_argument_is_reported() {
        let err = parse(&["10.0.0.5", "443", "admin", "secret", "mvip", "extra"])
            .expect_err("six args");
        assert_eq!(bad_arguments(err), "Incorrect Number of Arguments.");
    }

    #[test]
    fn unknown_mode_is_reported() {
        let err = parse(&["10.0.0.5", "443", "admin", "secret", "cluster"])
            .expect_err("bad mode");
        assert_eq!(bad_arguments(err), "Invalid type specified, use node or mvip");
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = parse(&["10.0.0.5", "https", "admin", "secret", "mvip"])
            .expect_err("bad port");
        let message = bad_arguments(err);
        assert!(message.contains("https"), "message: {message}");
    }

    #[test]
    fn hyphenated_password_is_positional() {
        let req = parse(&["10.0.0.5", "443", "admin", "-s3cret", "mvip"]).expect("valid args");
        assert_eq!(req.password, "-s3cret");
    }

    #[test]
    fn debug_output_hides_password() {
        let req = parse(&["10.0.0.5", "443", "admin", "hunter2", "mvip"]).expect("valid args");
        let text = format!("{req:?}");
        assert!(!text.contains("hunter2"));
        assert!(text.contains("<redacted>"));
    }

    #[tokio::test]
    async fn ipv4_literal_skips_resolution() {
        let req = parse(&["192.0.2.10", "443", "admin", "secret", "mvip"]).expect("valid args");
        req.resolve_host().await.expect("literal needs no lookup");
    }

    #[tokio::test]
    async fn localhost_resolves() {
        let req = parse(&["localhost", "443", "admin", "secret", "node"]).expect("valid args");
        req.resolve_host().await.expect("localhost must resolve");
    }

    #[tokio::test]
    async fn unresolvable_host_fails() {
        let req = parse(&["no-such-host.invalid", "443", "admin", "secret", "mvip"])
            .expect("valid args");
        let err = req.resolve_host().await.expect_err("lookup must fail");
        assert!(matches!(err, ProbeError::NameResolution { .. }));
    }
}
