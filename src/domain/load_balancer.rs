use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_elasticloadbalancing::{error::DisplayErrorContext, types::Instance, Client};
use tracing::{debug, info};

use super::{
    error::{LoadBalancerError, LoadBalancerResult},
    instance::InstanceId,
};

/// The remote calls this tool is allowed to make, one instance per call.
#[async_trait]
pub trait LoadBalancerApi {
    async fn register_instance(
        &self,
        load_balancer_name: &str,
        instance_id: &InstanceId,
    ) -> LoadBalancerResult<()>;

    async fn deregister_instance(
        &self,
        load_balancer_name: &str,
        instance_id: &InstanceId,
    ) -> LoadBalancerResult<()>;
}

/// Classic Elastic Load Balancing client.
#[derive(Debug, Clone)]
pub struct ElbClient {
    client: Client,
}

impl ElbClient {
    /// Loads credentials from the default provider chain. SDK retries are
    /// turned off: each operation is attempted exactly once.
    pub async fn from_env(region: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl LoadBalancerApi for ElbClient {
    async fn register_instance(
        &self,
        load_balancer_name: &str,
        instance_id: &InstanceId,
    ) -> LoadBalancerResult<()> {
        info!(load_balancer = load_balancer_name, %instance_id, "Registering instance");

        let output = self
            .client
            .register_instances_with_load_balancer()
            .load_balancer_name(load_balancer_name)
            .instances(Instance::builder().instance_id(instance_id.as_str()).build())
            .send()
            .await
            .map_err(|err| LoadBalancerError::ApiError(DisplayErrorContext(&err).to_string()))?;

        debug!(instances = ?output.instances(), "Load balancer membership after registration");
        Ok(())
    }

    async fn deregister_instance(
        &self,
        load_balancer_name: &str,
        instance_id: &InstanceId,
    ) -> LoadBalancerResult<()> {
        info!(load_balancer = load_balancer_name, %instance_id, "Deregistering instance");

        let output = self
            .client
            .deregister_instances_from_load_balancer()
            .load_balancer_name(load_balancer_name)
            .instances(Instance::builder().instance_id(instance_id.as_str()).build())
            .send()
            .await
            .map_err(|err| LoadBalancerError::ApiError(DisplayErrorContext(&err).to_string()))?;

        debug!(instances = ?output.instances(), "Load balancer membership after deregistration");
        Ok(())
    }
}
