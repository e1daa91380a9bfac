use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use super::WorkItemSink;
use crate::config::AdoConfig;
use crate::error::RelayError;
use crate::model::work_item::{WorkItemRequest, WorkItemResult};

pub struct AdoProvider {
    create_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl AdoProvider {
    pub fn new(config: &AdoConfig, pat: &str) -> Self {
        // PATs go in the password slot with an empty user name.
        let encoded = base64::engine::general_purpose::STANDARD.encode(format!(":{pat}"));
        Self {
            create_url: config.create_url(),
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WorkItemSink for AdoProvider {
    fn name(&self) -> &str {
        "Azure DevOps"
    }

    async fn create_work_item(
        &self,
        request: &WorkItemRequest,
    ) -> Result<WorkItemResult, RelayError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| RelayError::Unclassified(format!("Failed to encode work item: {e}")))?;
        debug!(url = %self.create_url, "Creating ADO work item");

        let resp = self
            .client
            .post(&self.create_url)
            .header("Content-Type", "application/json-patch+json")
            .header("Authorization", &self.auth_header)
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::PublishTransportFailed(e.to_string()))?;

        let resp = resp
            .error_for_status()
            .map_err(|e| RelayError::PublishRejected(e.to_string()))?;

        resp.json::<WorkItemResult>().await.map_err(|e| {
            RelayError::Unclassified(format!("Failed to parse ADO response: {e}"))
        })
    }
}
