pub mod ado;
pub mod hubspot;

use async_trait::async_trait;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::model::ticket::{Ticket, TicketId};
use crate::model::work_item::{WorkItemRequest, WorkItemResult};

/// Where tickets are looked up (HubSpot in production).
#[async_trait]
pub trait TicketSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_ticket(&self, id: &TicketId) -> Result<Ticket, RelayError>;
}

/// Where work items are created (Azure DevOps in production).
#[async_trait]
pub trait WorkItemSink: Send + Sync {
    fn name(&self) -> &str;
    async fn create_work_item(&self, request: &WorkItemRequest)
        -> Result<WorkItemResult, RelayError>;
}


pub fn create_providers(config: &RelayConfig) -> (Box<dyn TicketSource>, Box<dyn WorkItemSink>) {
    let tickets = hubspot::HubSpotProvider::new(
        &config.settings.hubspot.base_url,
        &config.hubspot_access_token,
    );
    let work_items = ado::AdoProvider::new(&config.settings.ado, &config.ado_pat);
    (Box::new(tickets), Box::new(work_items))
}
