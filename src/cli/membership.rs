use tracing::debug;

use crate::domain::{
    config::Config,
    error::{LoadBalancerError, LoadBalancerResult},
    load_balancer::ElbClient,
    membership::{self, Outcome},
    metadata::MetadataClient,
};

pub async fn exec(config: Config) -> LoadBalancerResult<Outcome> {
    let metadata = MetadataClient::new(&config.metadata.endpoint, config.metadata.timeout)
        .map_err(|e| LoadBalancerError::ConfigError(e.to_string()))?;

    let instance_id = metadata.instance_id().await.map_err(|e| {
        debug!(error = %e, "Instance metadata lookup failed");
        LoadBalancerError::InstanceIdUnavailable(e)
    })?;

    let api = ElbClient::from_env(config.region).await;

    membership::apply(&api, &config.load_balancer_name, config.operation, instance_id).await
}
