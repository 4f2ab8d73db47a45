mod membership;

use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use crate::domain::{
    config::{Config, MetadataConfig, Operation},
    error::{LoadBalancerError, LoadBalancerResult},
    membership::Outcome,
    metadata,
};

/// Register or deregister this instance with a Classic Elastic Load Balancer.
#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = None,
    after_help = "On success the outcome line is printed on stdout and the exit status is 0. \
                  Failures, including errors returned by the load balancing API, are printed \
                  on stderr and exit with status 1."
)]
struct Cli {
    /// The access point name of the load balancer.
    #[arg(short, long, env = "ELB_NAME")]
    name: String,

    /// Register this instance in the load balancer.
    #[arg(long)]
    register: bool,

    /// Deregister this instance from the load balancer.
    #[arg(long)]
    deregister: bool,

    /// Region of the load balancing API.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    region: String,

    /// Base URI of the instance metadata service.
    #[arg(long, env = "AWS_EC2_METADATA_SERVICE_ENDPOINT", default_value = metadata::DEFAULT_ENDPOINT)]
    metadata_endpoint: String,

    /// Timeout for each metadata request, e.g. "500ms" or "2s".
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    metadata_timeout: Duration,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl TryFrom<Cli> for Config {
    type Error = LoadBalancerError;

    fn try_from(val: Cli) -> LoadBalancerResult<Self> {
        let operation =
            Operation::from_flags(val.register, val.deregister).ok_or(LoadBalancerError::InvalidFlags)?;

        let load_balancer_name = val.name.trim().to_owned();
        if load_balancer_name.is_empty() {
            return Err(LoadBalancerError::ConfigError(
                "A load balancer name must be specified.".into(),
            ));
        }

        Ok(Config {
            load_balancer_name,
            operation,
            region: val.region,
            metadata: MetadataConfig {
                endpoint: val.metadata_endpoint,
                timeout: val.metadata_timeout,
            },
        })
    }
}

/// Logs go to stderr so stdout only carries the outcome line.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run() -> LoadBalancerResult<Outcome> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    membership::exec(cli.try_into()?).await
}
