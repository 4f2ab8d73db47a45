use domain::{error::LoadBalancerResult, membership::Outcome};

pub mod domain;

mod cli;

pub async fn run() -> LoadBalancerResult<Outcome> {
    cli::run().await
}
