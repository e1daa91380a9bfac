use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::TicketSource;
use crate::error::RelayError;
use crate::model::ticket::{Ticket, TicketId, TICKET_PROPERTIES};

pub struct HubSpotProvider {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl HubSpotProvider {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {access_token}"),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct TicketResponse {
    #[serde(default)]
    properties: Option<HashMap<String, Value>>,
}

#[async_trait]
impl TicketSource for HubSpotProvider {
    fn name(&self) -> &str {
        "HubSpot"
    }

    async fn fetch_ticket(&self, id: &TicketId) -> Result<Ticket, RelayError> {
        let url = format!(
            "{}/crm/v3/objects/tickets/{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        );
        debug!(%url, "Fetching HubSpot ticket");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .query(&[("properties", TICKET_PROPERTIES.join(","))])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RelayError::EnrichmentFailed(e.to_string()))?;

        let body: TicketResponse = resp.json().await.map_err(|e| {
            RelayError::EnrichmentFailed(format!("Failed to parse HubSpot response: {e}"))
        })?;

        Ok(Ticket::from_properties(
            id.clone(),
            &body.properties.unwrap_or_default(),
        ))
    }
}
