use std::{str::FromStr, string::FromUtf8Error, time::Duration};

use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    client::conn::http1,
    header::HOST,
    http::uri::InvalidUri,
    Method, Request, StatusCode, Uri,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

use super::instance::InstanceId;

pub const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";

const TOKEN_PATH: &str = "/latest/api/token";
const INSTANCE_ID_PATH: &str = "/latest/meta-data/instance-id";
const TOKEN_TTL_HEADER: &str = "x-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "x-aws-ec2-metadata-token";
const TOKEN_TTL_SECONDS: &str = "21600";

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("invalid metadata endpoint '{0}': expected an absolute http URI")]
    InvalidEndpoint(String),
    #[error("invalid metadata URI: {0}")]
    InvalidUri(#[from] InvalidUri),
    #[error("could not connect to the metadata service: {0}")]
    ConnectError(#[source] std::io::Error),
    #[error("metadata request failed: {0}")]
    HyperError(#[source] hyper::Error),
    #[error("could not build metadata request: {0}")]
    HttpError(#[source] hyper::http::Error),
    #[error("metadata request timed out after {0:?}")]
    Timeout(Duration),
    #[error("metadata service answered {0}")]
    UnexpectedStatus(StatusCode),
    #[error("metadata response is not valid UTF-8: {0}")]
    InvalidBody(#[source] FromUtf8Error),
    #[error("metadata service returned an empty instance ID")]
    EmptyResponse,
    #[error("metadata service reported an unknown instance ID")]
    UnknownInstance,
}

/// Client for the instance metadata service.
///
/// Prefers a session token (IMDSv2) and drops back to plain lookups when the
/// service refuses to hand one out. Every request opens its own connection
/// and is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    endpoint: Uri,
    timeout: Duration,
}

impl MetadataClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MetadataError> {
        let uri = Uri::from_str(endpoint)?;

        if uri.scheme_str() != Some("http") || uri.host().is_none() {
            return Err(MetadataError::InvalidEndpoint(endpoint.to_owned()));
        }

        Ok(Self {
            endpoint: uri,
            timeout,
        })
    }

    pub async fn instance_id(&self) -> Result<InstanceId, MetadataError> {
        let token = self.session_token().await?;
        let header = token.as_deref().map(|token| (TOKEN_HEADER, token));

        let body = self.send(Method::GET, INSTANCE_ID_PATH, header).await?;
        let id = InstanceId::try_from(into_string(body)?)?;

        debug!(instance_id = %id, "Resolved instance identity");
        Ok(id)
    }

    /// Token refusals an IMDSv1-only service answers with, and transport
    /// failures (e.g. a dropped reply past the hop limit), disable the token.
    /// Any other status is an error.
    async fn session_token(&self) -> Result<Option<String>, MetadataError> {
        match self
            .send(
                Method::PUT,
                TOKEN_PATH,
                Some((TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)),
            )
            .await
        {
            Ok(body) => {
                let token = into_string(body)?.trim().to_owned();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(MetadataError::UnexpectedStatus(
                status @ (StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND
                | StatusCode::METHOD_NOT_ALLOWED),
            )) => {
                debug!(%status, "No metadata session token, using unauthenticated lookup");
                Ok(None)
            }
            Err(e @ (MetadataError::Timeout(_) | MetadataError::ConnectError(_))) => {
                debug!(error = %e, "Metadata token request failed, using unauthenticated lookup");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        header: Option<(&'static str, &str)>,
    ) -> Result<Bytes, MetadataError> {
        tokio::time::timeout(self.timeout, self.exchange(method, path, header))
            .await
            .map_err(|_| MetadataError::Timeout(self.timeout))?
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        header: Option<(&'static str, &str)>,
    ) -> Result<Bytes, MetadataError> {
        let authority = self
            .endpoint
            .authority()
            .ok_or_else(|| MetadataError::InvalidEndpoint(self.endpoint.to_string()))?;
        let host = authority.host().trim_start_matches('[').trim_end_matches(']');
        let port = authority.port_u16().unwrap_or(80);

        let uri = Uri::from_str(&format!("http://{authority}{path}"))?;
        debug!("[{method}] Querying '{uri}'");

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(MetadataError::ConnectError)?;
        let io = TokioIo::new(stream);

        let (mut sender, conn) = http1::handshake(io)
            .await
            .map_err(MetadataError::HyperError)?;

        tokio::task::spawn(async move {
            if let Err(err) = conn.await {
                debug!("Metadata connection failed: {err:?}");
            }
        });

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(HOST, authority.as_str());
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let req = builder
            .body(Full::new(Bytes::new()))
            .map_err(MetadataError::HttpError)?;

        let res = sender
            .send_request(req)
            .await
            .map_err(MetadataError::HyperError)?;

        let status = res.status();
        if !status.is_success() {
            return Err(MetadataError::UnexpectedStatus(status));
        }

        Ok(res
            .into_body()
            .collect()
            .await
            .map_err(MetadataError::HyperError)?
            .to_bytes())
    }
}

fn into_string(body: Bytes) -> Result<String, MetadataError> {
    String::from_utf8(body.to_vec()).map_err(MetadataError::InvalidBody)
}
