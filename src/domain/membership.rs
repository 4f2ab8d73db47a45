use std::fmt::Display;

use super::{
    config::Operation, error::LoadBalancerResult, instance::InstanceId,
    load_balancer::LoadBalancerApi,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub operation: Operation,
    pub instance_id: InstanceId,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self.operation {
            Operation::Register => "registered",
            Operation::Deregister => "deregistered",
        };

        write!(f, "Instance {} {verb}.", self.instance_id)
    }
}

/// Issues the single register or deregister call for `instance_id`.
pub async fn apply<A>(
    api: &A,
    load_balancer_name: &str,
    operation: Operation,
    instance_id: InstanceId,
) -> LoadBalancerResult<Outcome>
where
    A: LoadBalancerApi + ?Sized,
{
    match operation {
        Operation::Register => {
            api.register_instance(load_balancer_name, &instance_id)
                .await?
        }
        Operation::Deregister => {
            api.deregister_instance(load_balancer_name, &instance_id)
                .await?
        }
    }

    Ok(Outcome {
        operation,
        instance_id,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::error::LoadBalancerError;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(Operation, String, String)>>,
        failure: Option<String>,
    }

    impl RecordingApi {
        fn record(&self, operation: Operation, name: &str, id: &InstanceId) -> LoadBalancerResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push((operation, name.to_owned(), id.to_string()));

            match &self.failure {
                Some(message) => Err(LoadBalancerError::ApiError(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl LoadBalancerApi for RecordingApi {
        async fn register_instance(&self, name: &str, id: &InstanceId) -> LoadBalancerResult<()> {
            self.record(Operation::Register, name, id)
        }

        async fn deregister_instance(&self, name: &str, id: &InstanceId) -> LoadBalancerResult<()> {
            self.record(Operation::Deregister, name, id)
        }
    }

    fn instance() -> InstanceId {
        InstanceId::try_from("i-0abc".to_string()).unwrap()
    }

    #[tokio::test]
    async fn register_makes_one_register_call() {
        let api = RecordingApi::default();

        let outcome = apply(&api, "web", Operation::Register, instance()).await.unwrap();

        assert_eq!(outcome.to_string(), "Instance i-0abc registered.");
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![(Operation::Register, "web".to_string(), "i-0abc".to_string())]
        );
    }

    #[tokio::test]
    async fn deregister_makes_one_deregister_call() {
        let api = RecordingApi::default();

        let outcome = apply(&api, "web", Operation::Deregister, instance()).await.unwrap();

        assert_eq!(outcome.to_string(), "Instance i-0abc deregistered.");
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![(Operation::Deregister, "web".to_string(), "i-0abc".to_string())]
        );
    }

    #[tokio::test]
    async fn api_error_is_returned_after_a_single_attempt() {
        let api = RecordingApi {
            failure: Some("AccessDenied: not authorized".into()),
            ..Default::default()
        };

        let err = apply(&api, "web", Operation::Register, instance())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "AccessDenied: not authorized");
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }
}
