//! S3 bucket probe.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::Client;

use super::StorageProbe;
use crate::error::CheckError;

/// Probe issuing `HeadBucket` through a shared S3 client.
///
/// Each check is exactly one request: the SDK's retry layer is disabled on
/// every client the probe holds.
#[derive(Debug, Clone)]
pub struct S3Probe {
    client: Client,
}

impl S3Probe {
    /// Wrap an existing client, rebuilt with retries disabled.
    pub fn new(client: Client) -> Self {
        let config = client
            .config()
            .to_builder()
            .retry_config(RetryConfig::disabled())
            .build();
        Self {
            client: Client::from_conf(config),
        }
    }

    /// Build a client from the default AWS configuration chain. Credentials and
    /// region come from the environment, shared profile, or instance/task role.
    pub async fn from_env() -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        Self::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl StorageProbe for S3Probe {
    #[tracing::instrument(name = "probe.storage", level = "debug", skip(self))]
    async fn head_bucket(&self, bucket: &str) -> Result<(), CheckError> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| classify_head_bucket_error(bucket, &e))
    }
}

/// Map an SDK failure onto the failure taxonomy.
///
/// `HeadBucket` responses carry no body, so service errors are described from
/// the HTTP status rather than the (empty) error message.
fn classify_head_bucket_error(
    bucket: &str,
    err: &SdkError<HeadBucketError, HttpResponse>,
) -> CheckError {
    match err {
        SdkError::TimeoutError(_) => CheckError::Timeout(DisplayErrorContext(err).to_string()),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            CheckError::Timeout(DisplayErrorContext(err).to_string())
        }
        SdkError::DispatchFailure(_) => {
            CheckError::Unreachable(DisplayErrorContext(err).to_string())
        }
        SdkError::ConstructionFailure(_) => {
            CheckError::Misconfigured(DisplayErrorContext(err).to_string())
        }
        SdkError::ServiceError(context) => {
            if context.err().is_not_found() {
                return CheckError::Misconfigured(format!("bucket {bucket:?} not found"));
            }
            match context.raw().status().as_u16() {
                401 | 403 => CheckError::Rejected(format!("access to bucket {bucket:?} denied")),
                404 => CheckError::Misconfigured(format!("bucket {bucket:?} not found")),
                301 | 307 => CheckError::Misconfigured(format!(
                    "bucket {bucket:?} is in a different region than the client"
                )),
                status => CheckError::Other(format!(
                    "unexpected response for bucket {bucket:?} (HTTP {status})"
                )),
            }
        }
        _ => CheckError::Other(DisplayErrorContext(err).to_string()),
    }
}
